use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use nesdbg_link::{
    LinkConfig,
    config::{DEFAULT_BAUD_RATE, DEFAULT_CHUNK_SIZE, DEFAULT_READ_TIMEOUT_MS},
};
use tracing::Level;

/// Host debugger for the FPGA NES target.
///
/// Commands are read one per line, e.g. `cpumemrd 0x8000 16` or
/// `cpuregwr pcl 0x00`. Lines starting with `#` are ignored.
#[derive(Parser, Debug)]
#[command(name = "nesdbg", author, version, about, long_about = None)]
pub struct Args {
    /// Serial port the FPGA board is attached to (e.g. /dev/ttyUSB0, COM3)
    #[arg(required_unless_present = "list_ports")]
    pub port: Option<String>,

    /// Serial baud rate
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// Reply timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Maximum payload per memory transfer packet
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Upload and start this .nes image before running commands
    #[arg(long)]
    pub rom: Option<PathBuf>,

    /// Read commands from this file instead of stdin
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// List available serial ports and exit
    #[arg(long)]
    pub list_ports: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: Level,
}

impl Args {
    pub fn link_config(&self) -> LinkConfig {
        LinkConfig {
            baud_rate: self.baud,
            read_timeout: Duration::from_millis(self.timeout_ms),
            chunk_size: self.chunk_size,
        }
    }
}
