use std::fmt;

use thiserror::Error;

use crate::opcode::Opcode;

/// Raised when a packet argument cannot be represented in its wire field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    #[error("payload of {0} bytes does not fit the 16-bit count field")]
    PayloadTooLarge(usize),
}

/// Raised by [`crate::command::Command::decode`] on a malformed packet buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty packet")]
    Empty,
    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),
    #[error("opcode {0} has no packet layout")]
    Unsupported(Opcode),
    #[error("{opcode} packet must be {expected} bytes, got {actual}")]
    LengthMismatch {
        opcode: Opcode,
        expected: usize,
        actual: usize,
    },
    #[error("unknown cpu register id {0}")]
    UnknownRegister(u8),
    #[error(transparent)]
    Packet(#[from] PacketError),
}

/// Expected argument count reported by [`ParseError::Arity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "{n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Raised by the text command parser. Never accompanied by a packet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`")]
    UnknownMnemonic(String),
    #[error("`{0}` has no packet encoding")]
    Unsupported(Opcode),
    #[error("`{mnemonic}` expects {expected} argument(s), got {actual}")]
    Arity {
        mnemonic: &'static str,
        expected: Arity,
        actual: usize,
    },
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("`{token}` does not fit in {bits} bits")]
    OutOfRange { token: String, bits: u32 },
    #[error("unknown cpu register `{0}`")]
    UnknownRegister(String),
    #[error(transparent)]
    Packet(#[from] PacketError),
}
