//! Cartridge configuration pushed with `CartSetCfg`.
//!
//! The target does not need the whole 16-byte iNES header, only the fields
//! that describe the board: PRG/CHR ROM bank counts, the two flag bytes that
//! carry the mapper number and nametable mirroring, and the PRG RAM size.
//! On the wire these are sent in header order:
//!
//! ```text
//! [prg_rom_banks][chr_rom_banks][flags6][flags7][prg_ram_banks]
//! ```
//!
//! The header magic is not checked here. Callers that read whole `.nes` files
//! are expected to validate it first.

use bitflags::bitflags;

use crate::constants::{CART_CFG_LEN, CHR_BANK_SIZE, INES_HEADER_LEN, PRG_BANK_SIZE};

bitflags! {
    /// iNES header byte 6.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags6: u8 {
        const MIRRORING        = 0b0000_0001;
        const BATTERY          = 0b0000_0010;
        const TRAINER          = 0b0000_0100;
        const FOUR_SCREEN      = 0b0000_1000;
        const MAPPER_LOW_MASK  = 0b1111_0000;
    }
}

bitflags! {
    /// iNES header byte 7.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags7: u8 {
        const VS_UNISYSTEM     = 0b0000_0001;
        const PLAYCHOICE_10    = 0b0000_0010;
        const NES2_DETECTION   = 0b0000_1100;
        const MAPPER_HIGH_MASK = 0b1111_0000;
    }
}

/// Nametable mirroring selected by the cartridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    /// Cartridge supplies its own four nametables.
    FourScreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CartConfig {
    /// PRG ROM size in 16 KiB units.
    pub prg_rom_banks: u8,
    /// CHR ROM size in 8 KiB units. 0 means the board uses CHR RAM.
    pub chr_rom_banks: u8,
    pub flags6: Flags6,
    pub flags7: Flags7,
    /// PRG RAM size in 8 KiB units, as stored in the header (0 is "assume 8 KiB").
    pub prg_ram_banks: u8,
}

impl CartConfig {
    /// Extract the configuration fields from a raw iNES header.
    pub fn from_ines_header(header: &[u8; INES_HEADER_LEN]) -> Self {
        Self {
            prg_rom_banks: header[4],
            chr_rom_banks: header[5],
            flags6: Flags6::from_bits_retain(header[6]),
            flags7: Flags7::from_bits_retain(header[7]),
            prg_ram_banks: header[8],
        }
    }

    pub fn from_bytes(bytes: [u8; CART_CFG_LEN]) -> Self {
        let [prg_rom_banks, chr_rom_banks, flags6, flags7, prg_ram_banks] = bytes;
        Self {
            prg_rom_banks,
            chr_rom_banks,
            flags6: Flags6::from_bits_retain(flags6),
            flags7: Flags7::from_bits_retain(flags7),
            prg_ram_banks,
        }
    }

    /// Wire order of the configuration bytes.
    pub fn to_bytes(&self) -> [u8; CART_CFG_LEN] {
        [
            self.prg_rom_banks,
            self.chr_rom_banks,
            self.flags6.bits(),
            self.flags7.bits(),
            self.prg_ram_banks,
        ]
    }

    /// iNES 1.0 mapper number (low nibble from flags 6, high nibble from flags 7).
    pub fn mapper(&self) -> u8 {
        (self.flags6.bits() >> 4) | (self.flags7.bits() & 0xF0)
    }

    pub fn mirroring(&self) -> Mirroring {
        if self.flags6.contains(Flags6::FOUR_SCREEN) {
            Mirroring::FourScreen
        } else if self.flags6.contains(Flags6::MIRRORING) {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        }
    }

    pub fn battery_backed(&self) -> bool {
        self.flags6.contains(Flags6::BATTERY)
    }

    /// Whether a 512-byte trainer sits between the header and PRG ROM.
    pub fn trainer_present(&self) -> bool {
        self.flags6.contains(Flags6::TRAINER)
    }

    pub fn prg_rom_size(&self) -> usize {
        self.prg_rom_banks as usize * PRG_BANK_SIZE
    }

    pub fn chr_rom_size(&self) -> usize {
        self.chr_rom_banks as usize * CHR_BANK_SIZE
    }
}
