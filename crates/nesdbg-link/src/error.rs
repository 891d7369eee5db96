//! Link error types.

use nesdbg_proto::PacketError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("short read: target closed the stream after {received} of {expected} reply bytes")]
    ShortRead { expected: usize, received: usize },

    #[error("timed out waiting for reply: got {received} of {expected} bytes")]
    Timeout { expected: usize, received: usize },

    #[error("echo mismatch at byte {offset}: sent {sent:#04x}, got {received:#04x}")]
    EchoMismatch { offset: usize, sent: u8, received: u8 },

    #[error("{len} byte transfer at {addr:#06x} runs past the end of the address space")]
    AddressOverflow { addr: u16, len: usize },

    #[error("packet error: {0}")]
    Packet(#[from] PacketError),

    #[error("ROM error: {0}")]
    Rom(#[from] RomError),
}

#[derive(Error, Debug)]
pub enum RomError {
    #[error("header expected 16 bytes, got {actual}")]
    TooShort { actual: usize },

    #[error("missing NES magic bytes")]
    InvalidMagic,

    #[error("{section} section expected {expected} bytes, got {actual}")]
    SectionTooShort {
        section: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported ROM: {0}")]
    Unsupported(String),

    #[error("IO error while reading ROM: {0}")]
    Io(#[from] std::io::Error),
}
