use std::time::Duration;

/// Default serial speed of the target's UART.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default time to wait for reply bytes before giving up, in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(DEFAULT_READ_TIMEOUT_MS);

/// Default number of bytes moved per memory transfer packet.
pub const DEFAULT_CHUNK_SIZE: usize = 0x400;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    pub baud_rate: u32,
    pub read_timeout: Duration,
    /// Upper bound on the payload of each memory read/write packet.
    /// Larger transfers are split; values are clamped to `1..=0xFFFF`.
    pub chunk_size: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}
