//! Text command parser.
//!
//! Grammar: `<mnemonic> [arg]*`, whitespace separated. Mnemonics are the
//! lowercase opcode names and match case-insensitively. Numbers are decimal
//! or `0x`-prefixed hexadecimal. Register arguments take a name (`pcl`, `pch`,
//! `ac`/`a`, `x`, `y`, `p`, `s`) or the numeric register id.
//!
//! ```text
//! echo 0x10 0x20 0x30
//! cpumemrd 0x8000 16
//! cpumemwr 0x0200 3 0xaa 0xbb 0xcc
//! cpuregwr pcl 0x00
//! cartsetcfg 0x4e 0x45 0x53 0x1a 2 1 1 0 0 0 0 0 0 0 0 0
//! ```

use std::num::IntErrorKind;
use std::str::FromStr;

use crate::{
    command::{Command, Payload},
    constants::INES_HEADER_LEN,
    cpu_reg::CpuRegister,
    error::{Arity, ParseError},
    opcode::Opcode,
};

/// Parse one command line into a [`Command`].
pub fn parse_command(text: &str) -> Result<Command, ParseError> {
    let mut tokens = text.split_whitespace();
    let head = tokens.next().ok_or(ParseError::Empty)?;
    let opcode: Opcode = head
        .parse()
        .map_err(|_| ParseError::UnknownMnemonic(head.to_owned()))?;
    let args: Vec<&str> = tokens.collect();
    let mnemonic = opcode.mnemonic();

    let command = match opcode {
        Opcode::Echo => Command::Echo {
            data: Payload::new(bytes(&args)?)?,
        },
        Opcode::CpuMemRd => {
            let [addr, count] = exact::<2>(mnemonic, &args)?;
            Command::CpuMemRd {
                addr: parse_u16(addr)?,
                count: parse_u16(count)?,
            }
        }
        Opcode::PpuMemRd => {
            let [addr, count] = exact::<2>(mnemonic, &args)?;
            Command::PpuMemRd {
                addr: parse_u16(addr)?,
                count: parse_u16(count)?,
            }
        }
        Opcode::CpuMemWr => {
            let (addr, data) = block_write(mnemonic, &args)?;
            Command::CpuMemWr { addr, data }
        }
        Opcode::PpuMemWr => {
            let (addr, data) = block_write(mnemonic, &args)?;
            Command::PpuMemWr { addr, data }
        }
        Opcode::DbgBrk => {
            exact::<0>(mnemonic, &args)?;
            Command::DbgBrk
        }
        Opcode::DbgRun => {
            exact::<0>(mnemonic, &args)?;
            Command::DbgRun
        }
        Opcode::QueryDbgBrk => {
            exact::<0>(mnemonic, &args)?;
            Command::QueryDbgBrk
        }
        Opcode::PpuDisable => {
            exact::<0>(mnemonic, &args)?;
            Command::PpuDisable
        }
        Opcode::CpuRegRd => {
            let [reg] = exact::<1>(mnemonic, &args)?;
            Command::CpuRegRd {
                reg: parse_register(reg)?,
            }
        }
        Opcode::CpuRegWr => {
            let [reg, val] = exact::<2>(mnemonic, &args)?;
            Command::CpuRegWr {
                reg: parse_register(reg)?,
                val: parse_u8(val)?,
            }
        }
        Opcode::CartSetCfg => {
            let header = exact::<INES_HEADER_LEN>(mnemonic, &args)?;
            let mut raw = [0u8; INES_HEADER_LEN];
            for (slot, token) in raw.iter_mut().zip(header) {
                *slot = parse_u8(token)?;
            }
            Command::cart_set_cfg(&raw)
        }
        Opcode::QueryErrCode => return Err(ParseError::Unsupported(opcode)),
    };

    Ok(command)
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_command(s)
    }
}

fn exact<'a, const N: usize>(
    mnemonic: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], ParseError> {
    args.try_into().map_err(|_| ParseError::Arity {
        mnemonic,
        expected: Arity::Exactly(N),
        actual: args.len(),
    })
}

/// `<addr> <count> <byte>{count}`
fn block_write(mnemonic: &'static str, args: &[&str]) -> Result<(u16, Payload), ParseError> {
    let [addr, count, data @ ..] = args else {
        return Err(ParseError::Arity {
            mnemonic,
            expected: Arity::AtLeast(2),
            actual: args.len(),
        });
    };

    let addr = parse_u16(addr)?;
    let count = parse_u16(count)? as usize;
    if data.len() != count {
        return Err(ParseError::Arity {
            mnemonic,
            expected: Arity::Exactly(2 + count),
            actual: args.len(),
        });
    }

    Ok((addr, Payload::new(bytes(data)?)?))
}

fn bytes(tokens: &[&str]) -> Result<Vec<u8>, ParseError> {
    tokens.iter().map(|token| parse_u8(token)).collect()
}

fn parse_register(token: &str) -> Result<CpuRegister, ParseError> {
    if let Ok(reg) = token.parse::<CpuRegister>() {
        return Ok(reg);
    }
    match parse_number(token) {
        Ok(id) => u8::try_from(id)
            .ok()
            .and_then(CpuRegister::from_repr)
            .ok_or_else(|| ParseError::UnknownRegister(token.to_owned())),
        Err(ParseError::InvalidNumber(_)) => Err(ParseError::UnknownRegister(token.to_owned())),
        Err(err) => Err(err),
    }
}

fn parse_u8(token: &str) -> Result<u8, ParseError> {
    u8::try_from(parse_number(token)?).map_err(|_| out_of_range(token, u8::BITS))
}

fn parse_u16(token: &str) -> Result<u16, ParseError> {
    u16::try_from(parse_number(token)?).map_err(|_| out_of_range(token, u16::BITS))
}

fn parse_number(token: &str) -> Result<u64, ParseError> {
    let (digits, radix) = match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (token, 10),
    };

    // `from_str_radix` also accepts a leading sign.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ParseError::InvalidNumber(token.to_owned()));
    }

    u64::from_str_radix(digits, radix).map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow => out_of_range(token, u64::BITS),
        _ => ParseError::InvalidNumber(token.to_owned()),
    })
}

fn out_of_range(token: &str, bits: u32) -> ParseError {
    ParseError::OutOfRange {
        token: token.to_owned(),
        bits,
    }
}
