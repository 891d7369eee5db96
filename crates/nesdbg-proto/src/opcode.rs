use strum::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr};

/// Command identifier, always the first byte of a packet.
///
/// The numeric values are what the target firmware dispatches on. New
/// opcodes may be appended; existing ones must never be renumbered.
///
/// The string forms are the mnemonics accepted by [`crate::parse`].
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumIter, EnumString, IntoStaticStr, Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Opcode {
    /// Echo the packet body back to the host.
    Echo = 0x00,
    CpuMemRd = 0x01,
    CpuMemWr = 0x02,
    /// Stop execution (enter the debug break state).
    DbgBrk = 0x03,
    /// Resume execution.
    DbgRun = 0x04,
    CpuRegRd = 0x05,
    CpuRegWr = 0x06,
    /// Ask whether the target currently sits in the debug break state.
    QueryDbgBrk = 0x07,
    /// Query the target error code. Reserved: there is no packet layout for it.
    QueryErrCode = 0x08,
    PpuMemRd = 0x09,
    PpuMemWr = 0x0A,
    PpuDisable = 0x0B,
    /// Configure the cartridge from iNES header fields.
    CartSetCfg = 0x0C,
}

impl Opcode {
    /// Whether a packet layout exists for this opcode.
    pub const fn is_encodable(self) -> bool {
        !matches!(self, Opcode::QueryErrCode)
    }

    pub fn mnemonic(self) -> &'static str {
        self.into()
    }
}
