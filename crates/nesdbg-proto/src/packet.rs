use crate::{
    command::{Command, Payload},
    constants::INES_HEADER_LEN,
    cpu_reg::CpuRegister,
    error::{PacketError, ParseError},
    opcode::Opcode,
    parse::parse_command,
};

/// A fully encoded, ready-to-transmit debug packet.
///
/// The wire bytes are produced once, at construction, and never change.
/// `reply_len` tells the transport how many bytes to read back after sending.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Packet {
    opcode: Opcode,
    bytes: Box<[u8]>,
    reply_len: usize,
}

impl Packet {
    pub fn new(command: &Command) -> Self {
        let mut bytes = Vec::with_capacity(command.encoded_len());
        command.encode_into(&mut bytes);
        debug_assert_eq!(bytes.len(), command.encoded_len());

        Self {
            opcode: command.opcode(),
            bytes: bytes.into_boxed_slice(),
            reply_len: command.reply_len(),
        }
    }

    /// Parse a text command (see [`crate::parse`]) and encode it.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parse_command(text).map(|command| Self::new(&command))
    }

    pub fn echo(data: &[u8]) -> Result<Self, PacketError> {
        Ok(Self::new(&Command::Echo {
            data: Payload::new(data)?,
        }))
    }

    pub fn cpu_mem_rd(addr: u16, count: u16) -> Self {
        Self::new(&Command::CpuMemRd { addr, count })
    }

    pub fn cpu_mem_wr(addr: u16, data: &[u8]) -> Result<Self, PacketError> {
        Ok(Self::new(&Command::CpuMemWr {
            addr,
            data: Payload::new(data)?,
        }))
    }

    pub fn dbg_brk() -> Self {
        Self::new(&Command::DbgBrk)
    }

    pub fn dbg_run() -> Self {
        Self::new(&Command::DbgRun)
    }

    pub fn cpu_reg_rd(reg: CpuRegister) -> Self {
        Self::new(&Command::CpuRegRd { reg })
    }

    pub fn cpu_reg_wr(reg: CpuRegister, val: u8) -> Self {
        Self::new(&Command::CpuRegWr { reg, val })
    }

    pub fn query_dbg_brk() -> Self {
        Self::new(&Command::QueryDbgBrk)
    }

    pub fn ppu_mem_rd(addr: u16, count: u16) -> Self {
        Self::new(&Command::PpuMemRd { addr, count })
    }

    pub fn ppu_mem_wr(addr: u16, data: &[u8]) -> Result<Self, PacketError> {
        Ok(Self::new(&Command::PpuMemWr {
            addr,
            data: Payload::new(data)?,
        }))
    }

    pub fn ppu_disable() -> Self {
        Self::new(&Command::PpuDisable)
    }

    pub fn cart_set_cfg(ines_header: &[u8; INES_HEADER_LEN]) -> Self {
        Self::new(&Command::cart_set_cfg(ines_header))
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Complete wire encoding. Never empty; the first byte is the opcode.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size_in_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn return_bytes_expected(&self) -> usize {
        self.reply_len
    }
}

impl From<&Command> for Packet {
    fn from(command: &Command) -> Self {
        Self::new(command)
    }
}

impl From<Command> for Packet {
    fn from(command: Command) -> Self {
        Self::new(&command)
    }
}
