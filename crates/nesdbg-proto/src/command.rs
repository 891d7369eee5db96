use std::ops::Deref;

use crate::{
    cart::CartConfig,
    constants::{CART_CFG_LEN, INES_HEADER_LEN, MAX_PAYLOAD, MEM_HEADER_LEN},
    cpu_reg::CpuRegister,
    error::{DecodeError, PacketError},
    opcode::Opcode,
};

/// A byte block whose length fits the 16-bit count field of the wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Payload(Box<[u8]>);

impl Payload {
    pub fn new(data: impl Into<Vec<u8>>) -> Result<Self, PacketError> {
        let data = data.into();
        if data.len() > MAX_PAYLOAD {
            return Err(PacketError::PayloadTooLarge(data.len()));
        }
        Ok(Self(data.into_boxed_slice()))
    }

    /// Length as it appears in the count field.
    pub fn count(&self) -> u16 {
        // Bounded by `new`.
        self.0.len() as u16
    }
}

impl Deref for Payload {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for Payload {
    type Error = PacketError;

    fn try_from(value: Vec<u8>) -> Result<Self, PacketError> {
        Self::new(value)
    }
}

impl TryFrom<&[u8]> for Payload {
    type Error = PacketError;

    fn try_from(value: &[u8]) -> Result<Self, PacketError> {
        Self::new(value)
    }
}

/// One debugger command with its typed arguments.
///
/// Each variant carries only the fields its wire layout needs; every value
/// of this type has a valid encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    Echo { data: Payload },
    CpuMemRd { addr: u16, count: u16 },
    CpuMemWr { addr: u16, data: Payload },
    DbgBrk,
    DbgRun,
    CpuRegRd { reg: CpuRegister },
    CpuRegWr { reg: CpuRegister, val: u8 },
    QueryDbgBrk,
    PpuMemRd { addr: u16, count: u16 },
    PpuMemWr { addr: u16, data: Payload },
    PpuDisable,
    CartSetCfg { config: CartConfig },
}

impl Command {
    /// Build a `CartSetCfg` command from a raw 16-byte iNES header.
    pub fn cart_set_cfg(header: &[u8; INES_HEADER_LEN]) -> Self {
        Command::CartSetCfg {
            config: CartConfig::from_ines_header(header),
        }
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Command::Echo { .. } => Opcode::Echo,
            Command::CpuMemRd { .. } => Opcode::CpuMemRd,
            Command::CpuMemWr { .. } => Opcode::CpuMemWr,
            Command::DbgBrk => Opcode::DbgBrk,
            Command::DbgRun => Opcode::DbgRun,
            Command::CpuRegRd { .. } => Opcode::CpuRegRd,
            Command::CpuRegWr { .. } => Opcode::CpuRegWr,
            Command::QueryDbgBrk => Opcode::QueryDbgBrk,
            Command::PpuMemRd { .. } => Opcode::PpuMemRd,
            Command::PpuMemWr { .. } => Opcode::PpuMemWr,
            Command::PpuDisable => Opcode::PpuDisable,
            Command::CartSetCfg { .. } => Opcode::CartSetCfg,
        }
    }

    /// Total encoded size, opcode included.
    pub fn encoded_len(&self) -> usize {
        match self {
            Command::Echo { data } => 1 + data.len(),
            Command::CpuMemRd { .. } | Command::PpuMemRd { .. } => MEM_HEADER_LEN,
            Command::CpuMemWr { data, .. } | Command::PpuMemWr { data, .. } => {
                MEM_HEADER_LEN + data.len()
            }
            Command::DbgBrk | Command::DbgRun | Command::QueryDbgBrk | Command::PpuDisable => 1,
            Command::CpuRegRd { .. } => 2,
            Command::CpuRegWr { .. } => 3,
            Command::CartSetCfg { .. } => 1 + CART_CFG_LEN,
        }
    }

    /// Number of bytes the target sends back after receiving this command.
    pub fn reply_len(&self) -> usize {
        match self {
            Command::Echo { data } => data.len(),
            Command::CpuMemRd { count, .. } | Command::PpuMemRd { count, .. } => *count as usize,
            Command::CpuRegRd { .. } | Command::QueryDbgBrk => 1,
            Command::CpuMemWr { .. }
            | Command::PpuMemWr { .. }
            | Command::DbgBrk
            | Command::DbgRun
            | Command::CpuRegWr { .. }
            | Command::PpuDisable
            | Command::CartSetCfg { .. } => 0,
        }
    }

    /// Append the wire encoding to `out`.
    ///
    /// Layout: opcode byte, then the variant fields with 16-bit values in
    /// little-endian order.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.reserve(self.encoded_len());
        out.push(self.opcode() as u8);

        match self {
            Command::Echo { data } => out.extend_from_slice(data),
            Command::CpuMemRd { addr, count } | Command::PpuMemRd { addr, count } => {
                out.extend_from_slice(&addr.to_le_bytes());
                out.extend_from_slice(&count.to_le_bytes());
            }
            Command::CpuMemWr { addr, data } | Command::PpuMemWr { addr, data } => {
                out.extend_from_slice(&addr.to_le_bytes());
                out.extend_from_slice(&data.count().to_le_bytes());
                out.extend_from_slice(data);
            }
            Command::CpuRegRd { reg } => out.push(*reg as u8),
            Command::CpuRegWr { reg, val } => {
                out.push(*reg as u8);
                out.push(*val);
            }
            Command::CartSetCfg { config } => out.extend_from_slice(&config.to_bytes()),
            Command::DbgBrk | Command::DbgRun | Command::QueryDbgBrk | Command::PpuDisable => {}
        }
    }

    /// Decode a buffer holding exactly one packet.
    ///
    /// This is the target's view of the stream: dispatch on the first byte,
    /// then read the fixed or count-derived body. Echo has no length field,
    /// so everything after its opcode is taken as payload.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let (&first, body) = buf.split_first().ok_or(DecodeError::Empty)?;
        let opcode = Opcode::from_repr(first).ok_or(DecodeError::UnknownOpcode(first))?;

        let command = match opcode {
            Opcode::Echo => Command::Echo {
                data: Payload::new(body)?,
            },
            Opcode::CpuMemRd | Opcode::PpuMemRd => {
                let [addr_lo, addr_hi, count_lo, count_hi] = fixed_body::<4>(opcode, body)?;
                let addr = u16::from_le_bytes([addr_lo, addr_hi]);
                let count = u16::from_le_bytes([count_lo, count_hi]);
                if opcode == Opcode::CpuMemRd {
                    Command::CpuMemRd { addr, count }
                } else {
                    Command::PpuMemRd { addr, count }
                }
            }
            Opcode::CpuMemWr | Opcode::PpuMemWr => {
                let (addr, data) = block_body(opcode, body)?;
                if opcode == Opcode::CpuMemWr {
                    Command::CpuMemWr { addr, data }
                } else {
                    Command::PpuMemWr { addr, data }
                }
            }
            Opcode::DbgBrk => {
                fixed_body::<0>(opcode, body)?;
                Command::DbgBrk
            }
            Opcode::DbgRun => {
                fixed_body::<0>(opcode, body)?;
                Command::DbgRun
            }
            Opcode::QueryDbgBrk => {
                fixed_body::<0>(opcode, body)?;
                Command::QueryDbgBrk
            }
            Opcode::PpuDisable => {
                fixed_body::<0>(opcode, body)?;
                Command::PpuDisable
            }
            Opcode::CpuRegRd => {
                let [reg] = fixed_body::<1>(opcode, body)?;
                Command::CpuRegRd {
                    reg: register(reg)?,
                }
            }
            Opcode::CpuRegWr => {
                let [reg, val] = fixed_body::<2>(opcode, body)?;
                Command::CpuRegWr {
                    reg: register(reg)?,
                    val,
                }
            }
            Opcode::CartSetCfg => Command::CartSetCfg {
                config: CartConfig::from_bytes(fixed_body(opcode, body)?),
            },
            Opcode::QueryErrCode => return Err(DecodeError::Unsupported(opcode)),
        };

        Ok(command)
    }
}

fn fixed_body<const N: usize>(opcode: Opcode, body: &[u8]) -> Result<[u8; N], DecodeError> {
    body.try_into().map_err(|_| DecodeError::LengthMismatch {
        opcode,
        expected: 1 + N,
        actual: 1 + body.len(),
    })
}

fn block_body(opcode: Opcode, body: &[u8]) -> Result<(u16, Payload), DecodeError> {
    let mismatch = |expected| DecodeError::LengthMismatch {
        opcode,
        expected,
        actual: 1 + body.len(),
    };

    let (head, data) = body
        .split_at_checked(MEM_HEADER_LEN - 1)
        .ok_or_else(|| mismatch(MEM_HEADER_LEN))?;
    let addr = u16::from_le_bytes([head[0], head[1]]);
    let count = u16::from_le_bytes([head[2], head[3]]) as usize;
    if data.len() != count {
        return Err(mismatch(MEM_HEADER_LEN + count));
    }

    Ok((addr, Payload::new(data)?))
}

fn register(id: u8) -> Result<CpuRegister, DecodeError> {
    CpuRegister::from_repr(id).ok_or(DecodeError::UnknownRegister(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(command: &Command) -> Vec<u8> {
        let mut out = Vec::new();
        command.encode_into(&mut out);
        out
    }

    #[test]
    fn payload_rejects_oversized_blocks() {
        assert!(Payload::new(vec![0u8; MAX_PAYLOAD]).is_ok());
        assert_eq!(
            Payload::new(vec![0u8; MAX_PAYLOAD + 1]),
            Err(PacketError::PayloadTooLarge(MAX_PAYLOAD + 1))
        );
        assert_eq!(Payload::new(vec![1, 2, 3]).map(|p| p.count()), Ok(3));
    }

    #[test]
    fn ppu_block_layout_matches_cpu_block_layout() {
        let data = Payload::new(vec![0x0F, 0x30]).expect("payload");
        let cpu = encode(&Command::CpuMemWr {
            addr: 0x3F00,
            data: data.clone(),
        });
        let ppu = encode(&Command::PpuMemWr { addr: 0x3F00, data });

        assert_eq!(ppu, vec![0x0A, 0x00, 0x3F, 0x02, 0x00, 0x0F, 0x30]);
        assert_eq!(cpu[1..], ppu[1..]);
    }

    #[test]
    fn cpu_reg_wr_layout() {
        let bytes = encode(&Command::CpuRegWr {
            reg: CpuRegister::S,
            val: 0xFD,
        });
        assert_eq!(bytes, vec![0x06, 0x06, 0xFD]);
    }

    #[test]
    fn cart_set_cfg_forwards_selected_header_bytes() {
        let header = [
            b'N', b'E', b'S', 0x1A, 2, 1, 0x01, 0x00, 0, 0, 0, 0, 0, 0, 0, 0,
        ];
        let command = Command::cart_set_cfg(&header);

        assert_eq!(encode(&command), vec![0x0C, 2, 1, 0x01, 0x00, 0]);
        assert_eq!(command.encoded_len(), 6);
        assert_eq!(command.reply_len(), 0);
    }

    #[test]
    fn decode_reads_back_encoded_commands() {
        let commands = [
            Command::Echo {
                data: Payload::new(vec![0xDE, 0xAD]).expect("payload"),
            },
            Command::CpuMemRd {
                addr: 0xFFFC,
                count: 2,
            },
            Command::PpuMemWr {
                addr: 0x2000,
                data: Payload::new(vec![0x24; 32]).expect("payload"),
            },
            Command::CpuRegRd {
                reg: CpuRegister::Pch,
            },
            Command::QueryDbgBrk,
        ];

        for command in commands {
            assert_eq!(Command::decode(&encode(&command)), Ok(command));
        }
    }

    #[test]
    fn decode_rejects_malformed_buffers() {
        assert_eq!(Command::decode(&[]), Err(DecodeError::Empty));
        assert_eq!(Command::decode(&[0x0D]), Err(DecodeError::UnknownOpcode(0x0D)));
        assert_eq!(
            Command::decode(&[0x08]),
            Err(DecodeError::Unsupported(Opcode::QueryErrCode))
        );
        assert_eq!(
            Command::decode(&[0x01, 0x00, 0x80, 0x10]),
            Err(DecodeError::LengthMismatch {
                opcode: Opcode::CpuMemRd,
                expected: 5,
                actual: 4,
            })
        );
        assert_eq!(
            Command::decode(&[0x02, 0x00, 0x02, 0x03, 0x00, 0xAA]),
            Err(DecodeError::LengthMismatch {
                opcode: Opcode::CpuMemWr,
                expected: 8,
                actual: 6,
            })
        );
        assert_eq!(
            Command::decode(&[0x03, 0x00]),
            Err(DecodeError::LengthMismatch {
                opcode: Opcode::DbgBrk,
                expected: 1,
                actual: 2,
            })
        );
        assert_eq!(
            Command::decode(&[0x05, 0x07]),
            Err(DecodeError::UnknownRegister(0x07))
        );
    }
}
