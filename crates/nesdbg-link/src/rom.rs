//! `.nes` image handling for ROM uploads.
//!
//! The target has flat upload windows: PRG ROM is written through the CPU
//! bus at `$8000-$FFFF` and CHR ROM through the PPU bus at `$0000-$1FFF`.
//! Images that do not fit those windows (bank-switched boards with more than
//! 32 KiB PRG or 8 KiB CHR) are rejected up front.

use std::{fs, path::Path};

use nesdbg_proto::{
    CartConfig,
    constants::{CHR_BANK_SIZE, INES_HEADER_LEN, PRG_BANK_SIZE},
};

use crate::error::RomError;

const NES_MAGIC: &[u8; 4] = b"NES\x1A";

/// Size of the optional trainer block between header and PRG data.
pub const TRAINER_SIZE: usize = 512;

/// Largest PRG image that fits the CPU upload window.
pub const MAX_PRG_SIZE: usize = 2 * PRG_BANK_SIZE;

/// Largest CHR image that fits the PPU upload window.
pub const MAX_CHR_SIZE: usize = CHR_BANK_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomImage {
    header: [u8; INES_HEADER_LEN],
    config: CartConfig,
    prg: Box<[u8]>,
    chr: Box<[u8]>,
}

impl RomImage {
    pub fn parse(bytes: &[u8]) -> Result<Self, RomError> {
        let header: [u8; INES_HEADER_LEN] = bytes
            .get(..INES_HEADER_LEN)
            .and_then(|h| h.try_into().ok())
            .ok_or(RomError::TooShort {
                actual: bytes.len(),
            })?;
        if &header[..4] != NES_MAGIC {
            return Err(RomError::InvalidMagic);
        }

        let config = CartConfig::from_ines_header(&header);
        if config.prg_rom_banks == 0 {
            return Err(RomError::Unsupported("image has no PRG ROM".into()));
        }
        if config.prg_rom_size() > MAX_PRG_SIZE {
            return Err(RomError::Unsupported(format!(
                "{} KiB PRG ROM exceeds the {} KiB upload window",
                config.prg_rom_size() / 1024,
                MAX_PRG_SIZE / 1024
            )));
        }
        if config.chr_rom_size() > MAX_CHR_SIZE {
            return Err(RomError::Unsupported(format!(
                "{} KiB CHR ROM exceeds the {} KiB upload window",
                config.chr_rom_size() / 1024,
                MAX_CHR_SIZE / 1024
            )));
        }

        let mut cursor = INES_HEADER_LEN;
        if config.trainer_present() {
            section(bytes, &mut cursor, TRAINER_SIZE, "trainer")?;
        }
        let prg = section(bytes, &mut cursor, config.prg_rom_size(), "PRG ROM")?;
        let chr = section(bytes, &mut cursor, config.chr_rom_size(), "CHR ROM")?;

        Ok(Self {
            header,
            config,
            prg: prg.into(),
            chr: chr.into(),
        })
    }

    pub fn from_file<P>(path: P) -> Result<Self, RomError>
    where
        P: AsRef<Path>,
    {
        let bytes = fs::read(path)?;
        Self::parse(&bytes)
    }

    pub fn header(&self) -> &[u8; INES_HEADER_LEN] {
        &self.header
    }

    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    pub fn prg(&self) -> &[u8] {
        &self.prg
    }

    /// CHR ROM contents. Empty for boards using CHR RAM.
    pub fn chr(&self) -> &[u8] {
        &self.chr
    }

    /// The 6502 reset vector (`$FFFC/$FFFD`), read from the end of PRG ROM.
    ///
    /// 16 KiB images are mirrored at `$C000`, so the last bytes of PRG always
    /// land on the vector table.
    pub fn reset_vector(&self) -> u16 {
        let len = self.prg.len();
        u16::from_le_bytes([self.prg[len - 4], self.prg[len - 3]])
    }
}

fn section<'a>(
    bytes: &'a [u8],
    cursor: &mut usize,
    len: usize,
    name: &'static str,
) -> Result<&'a [u8], RomError> {
    let too_short = || RomError::SectionTooShort {
        section: name,
        expected: len,
        actual: bytes.len().saturating_sub(*cursor),
    };

    let end = cursor.checked_add(len).ok_or_else(too_short)?;
    let slice = bytes.get(*cursor..end).ok_or_else(too_short)?;

    *cursor = end;
    Ok(slice)
}
