#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, Read, Write};

use nesdbg_proto::{CartConfig, Command};

pub const CPU_SPACE: usize = 0x1_0000;
pub const PPU_SPACE: usize = 0x4000;

/// In-memory stand-in for the FPGA target.
///
/// Every `write` call is treated as one complete packet (the link writes
/// each packet with a single `write_all`). The packet is decoded, applied to
/// the simulated machine, and its reply queued for the next reads.
pub struct MockTarget {
    pub cpu: Vec<u8>,
    pub ppu: Vec<u8>,
    pub regs: [u8; 7],
    pub halted: bool,
    pub ppu_enabled: bool,
    pub cart: Option<CartConfig>,
    pub log: Vec<Command>,
    /// When set, replies are cut short after this many bytes.
    pub truncate_replies: Option<usize>,
    outbound: VecDeque<u8>,
}

impl MockTarget {
    pub fn new() -> Self {
        Self {
            cpu: vec![0; CPU_SPACE],
            ppu: vec![0; PPU_SPACE],
            regs: [0; 7],
            halted: false,
            ppu_enabled: true,
            cart: None,
            log: Vec::new(),
            truncate_replies: None,
            outbound: VecDeque::new(),
        }
    }

    pub fn pc(&self) -> u16 {
        u16::from_le_bytes([self.regs[0], self.regs[1]])
    }

    fn execute(&mut self, command: &Command) -> Vec<u8> {
        match command {
            Command::Echo { data } => data.to_vec(),
            Command::CpuMemRd { addr, count } => (0..*count as usize)
                .map(|i| self.cpu[(*addr as usize + i) % CPU_SPACE])
                .collect(),
            Command::PpuMemRd { addr, count } => (0..*count as usize)
                .map(|i| self.ppu[(*addr as usize + i) % PPU_SPACE])
                .collect(),
            Command::CpuMemWr { addr, data } => {
                for (i, b) in data.iter().enumerate() {
                    self.cpu[(*addr as usize + i) % CPU_SPACE] = *b;
                }
                Vec::new()
            }
            Command::PpuMemWr { addr, data } => {
                for (i, b) in data.iter().enumerate() {
                    self.ppu[(*addr as usize + i) % PPU_SPACE] = *b;
                }
                Vec::new()
            }
            Command::DbgBrk => {
                self.halted = true;
                Vec::new()
            }
            Command::DbgRun => {
                self.halted = false;
                Vec::new()
            }
            Command::CpuRegRd { reg } => vec![self.regs[*reg as usize]],
            Command::CpuRegWr { reg, val } => {
                self.regs[*reg as usize] = *val;
                Vec::new()
            }
            Command::QueryDbgBrk => vec![u8::from(self.halted)],
            Command::PpuDisable => {
                self.ppu_enabled = false;
                Vec::new()
            }
            Command::CartSetCfg { config } => {
                self.cart = Some(*config);
                Vec::new()
            }
        }
    }
}

impl Read for MockTarget {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.outbound.len());
        for (slot, b) in buf.iter_mut().zip(self.outbound.drain(..n)) {
            *slot = b;
        }
        Ok(n)
    }
}

impl Write for MockTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let command = Command::decode(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut reply = self.execute(&command);
        if let Some(limit) = self.truncate_replies {
            reply.truncate(limit);
        }
        self.outbound.extend(reply);
        self.log.push(command);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Builds a minimal NROM image whose reset vector points at `reset`.
pub fn nrom_image(prg_banks: u8, chr_banks: u8, flags6: u8, reset: u16) -> Vec<u8> {
    let mut rom = vec![
        b'N', b'E', b'S', 0x1A, prg_banks, chr_banks, flags6, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ];

    let mut prg: Vec<u8> = (0..prg_banks as usize * 16 * 1024)
        .map(|i| (i % 251) as u8)
        .collect();
    let len = prg.len();
    prg[len - 4..len - 2].copy_from_slice(&reset.to_le_bytes());
    rom.extend(prg);
    rom.extend((0..chr_banks as usize * 8 * 1024).map(|i| (i % 13) as u8));
    rom
}
