//! Wire encoding for the nesdbg debug protocol.
//!
//! The host talks to the FPGA NES target with one-byte opcodes followed by a
//! fixed, little-endian body. Every command is modelled by [`command::Command`]
//! and turned into a ready-to-send [`packet::Packet`], which also records how
//! many reply bytes the target will send back.
//!
//! - [`opcode`]: the numeric command catalog
//! - [`cpu_reg`]: addressable CPU registers
//! - [`cart`]: cartridge configuration extracted from an iNES header
//! - [`command`]: typed commands, payloads and target-side decoding
//! - [`packet`]: eagerly encoded packets
//! - [`parse`]: text command parser

pub mod cart;
pub mod command;
pub mod constants;
pub mod cpu_reg;
pub mod error;
pub mod opcode;
pub mod packet;
pub mod parse;

pub use cart::{CartConfig, Mirroring};
pub use command::{Command, Payload};
pub use cpu_reg::CpuRegister;
pub use error::{DecodeError, PacketError, ParseError};
pub use opcode::Opcode;
pub use packet::Packet;
pub use parse::parse_command;
