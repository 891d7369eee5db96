//! Host side of the nesdbg debug link.
//!
//! The target answers every packet with exactly
//! [`Packet::return_bytes_expected`](nesdbg_proto::Packet::return_bytes_expected)
//! bytes, so a link is a plain write-then-read loop over any byte stream.
//!
//! - [`link`]: request/response issuing and typed helpers
//! - [`rom`]: `.nes` image slicing for uploads
//! - [`serial`]: opening the serial port the FPGA board is attached to
//! - [`config`]: link tuning
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod link;
pub mod rom;
pub mod serial;

pub use config::LinkConfig;
pub use error::{LinkError, RomError};
pub use link::{Link, MemSpace};
pub use rom::RomImage;
