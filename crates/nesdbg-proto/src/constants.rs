/// Length of the `[opcode][addr_lo][addr_hi][count_lo][count_hi]` header used by
/// the CPU/PPU memory transfer packets.
pub const MEM_HEADER_LEN: usize = 5;

/// Largest payload a single packet may carry.
/// Block writes describe their payload with a 16-bit count; echo shares the bound.
pub const MAX_PAYLOAD: usize = u16::MAX as usize;

/// Size of the iNES file header in bytes.
pub const INES_HEADER_LEN: usize = 16;

/// Number of cartridge configuration bytes sent by `CartSetCfg`.
pub const CART_CFG_LEN: usize = 5;

/// Size of one PRG ROM bank as counted by the iNES header.
pub const PRG_BANK_SIZE: usize = 16 * 1024;

/// Size of one CHR ROM bank as counted by the iNES header.
pub const CHR_BANK_SIZE: usize = 8 * 1024;
