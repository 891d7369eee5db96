use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use nesdbg_proto::{
    CartConfig, Command, CpuRegister, Packet, Payload,
    constants::MAX_PAYLOAD,
};
use tracing::{debug, info, trace, warn};

use crate::{config::LinkConfig, error::LinkError, rom::RomImage};

/// CPU address PRG ROM is uploaded to.
pub const PRG_ROM_START: u16 = 0x8000;

/// PPU address CHR ROM is uploaded to.
pub const CHR_ROM_START: u16 = 0x0000;

/// Which bus a memory transfer goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemSpace {
    Cpu,
    Ppu,
}

/// A request/response channel to the target.
///
/// One packet is in flight at a time: every call writes a packet and then
/// blocks until its whole reply has been read. Exclusive access is enforced
/// by `&mut self`.
pub struct Link<T> {
    io: T,
    config: LinkConfig,
}

impl<T: Read + Write> Link<T> {
    pub fn new(io: T) -> Self {
        Self::with_config(io, LinkConfig::default())
    }

    pub fn with_config(io: T, config: LinkConfig) -> Self {
        Self { io, config }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn get_ref(&self) -> &T {
        &self.io
    }

    /// Send `packet` and read back exactly `packet.return_bytes_expected()`
    /// bytes. The reply is returned uninterpreted.
    pub fn transact(&mut self, packet: &Packet) -> Result<Vec<u8>, LinkError> {
        trace!(
            opcode = %packet.opcode(),
            size = packet.size_in_bytes(),
            reply = packet.return_bytes_expected(),
            "sending packet"
        );

        self.io.write_all(packet.bytes())?;
        self.io.flush()?;

        let mut reply = vec![0u8; packet.return_bytes_expected()];
        self.read_reply(&mut reply)?;
        Ok(reply)
    }

    /// Encode `command` and [`transact`](Self::transact) it.
    pub fn send(&mut self, command: &Command) -> Result<Vec<u8>, LinkError> {
        self.transact(&Packet::new(command))
    }

    fn read_reply(&mut self, buf: &mut [u8]) -> Result<(), LinkError> {
        let expected = buf.len();
        let mut received = 0;

        while received < expected {
            match self.io.read(&mut buf[received..]) {
                Ok(0) => {
                    warn!(expected, received, "target closed the stream mid-reply");
                    return Err(LinkError::ShortRead { expected, received });
                }
                Ok(n) => received += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    warn!(expected, received, "reply timed out");
                    return Err(LinkError::Timeout { expected, received });
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    /// Loopback check: the target must return `data` unchanged.
    pub fn echo(&mut self, data: &[u8]) -> Result<(), LinkError> {
        let reply = self.transact(&Packet::echo(data)?)?;

        if let Some((offset, (&sent, &received))) = data
            .iter()
            .zip(reply.iter())
            .enumerate()
            .find(|(_, (sent, received))| sent != received)
        {
            warn!(offset, sent, received, "echo reply diverged");
            return Err(LinkError::EchoMismatch {
                offset,
                sent,
                received,
            });
        }

        debug!(len = data.len(), "echo ok");
        Ok(())
    }

    pub fn halt(&mut self) -> Result<(), LinkError> {
        debug!("debug break");
        self.transact(&Packet::dbg_brk()).map(drop)
    }

    pub fn resume(&mut self) -> Result<(), LinkError> {
        debug!("debug run");
        self.transact(&Packet::dbg_run()).map(drop)
    }

    /// Whether the target is currently stopped in the debug break state.
    pub fn is_halted(&mut self) -> Result<bool, LinkError> {
        let reply = self.transact(&Packet::query_dbg_brk())?;
        Ok(reply[0] != 0)
    }

    pub fn disable_ppu(&mut self) -> Result<(), LinkError> {
        self.transact(&Packet::ppu_disable()).map(drop)
    }

    pub fn read_reg(&mut self, reg: CpuRegister) -> Result<u8, LinkError> {
        let reply = self.transact(&Packet::cpu_reg_rd(reg))?;
        Ok(reply[0])
    }

    pub fn write_reg(&mut self, reg: CpuRegister, val: u8) -> Result<(), LinkError> {
        self.transact(&Packet::cpu_reg_wr(reg, val)).map(drop)
    }

    pub fn read_pc(&mut self) -> Result<u16, LinkError> {
        let lo = self.read_reg(CpuRegister::Pcl)?;
        let hi = self.read_reg(CpuRegister::Pch)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    pub fn write_pc(&mut self, pc: u16) -> Result<(), LinkError> {
        let [lo, hi] = pc.to_le_bytes();
        self.write_reg(CpuRegister::Pcl, lo)?;
        self.write_reg(CpuRegister::Pch, hi)
    }

    pub fn set_cart_config(&mut self, config: &CartConfig) -> Result<(), LinkError> {
        debug!(
            mapper = config.mapper(),
            mirroring = ?config.mirroring(),
            prg_banks = config.prg_rom_banks,
            chr_banks = config.chr_rom_banks,
            "cart config"
        );
        self.send(&Command::CartSetCfg { config: *config }).map(drop)
    }

    pub fn read_cpu_mem(&mut self, addr: u16, len: usize) -> Result<Vec<u8>, LinkError> {
        self.read_mem(MemSpace::Cpu, addr, len)
    }

    pub fn write_cpu_mem(&mut self, addr: u16, data: &[u8]) -> Result<(), LinkError> {
        self.write_mem(MemSpace::Cpu, addr, data)
    }

    pub fn read_ppu_mem(&mut self, addr: u16, len: usize) -> Result<Vec<u8>, LinkError> {
        self.read_mem(MemSpace::Ppu, addr, len)
    }

    pub fn write_ppu_mem(&mut self, addr: u16, data: &[u8]) -> Result<(), LinkError> {
        self.write_mem(MemSpace::Ppu, addr, data)
    }

    /// Read `len` bytes starting at `addr`, split into `chunk_size` packets.
    pub fn read_mem(
        &mut self,
        space: MemSpace,
        addr: u16,
        len: usize,
    ) -> Result<Vec<u8>, LinkError> {
        let mut out = Vec::with_capacity(len);
        for (chunk_addr, chunk_len) in self.chunks(addr, len)? {
            // Chunks never exceed MAX_PAYLOAD.
            let count = chunk_len as u16;
            let command = match space {
                MemSpace::Cpu => Command::CpuMemRd {
                    addr: chunk_addr,
                    count,
                },
                MemSpace::Ppu => Command::PpuMemRd {
                    addr: chunk_addr,
                    count,
                },
            };
            out.extend(self.send(&command)?);
        }

        trace!(?space, addr, len, "memory read");
        Ok(out)
    }

    /// Write `data` starting at `addr`, split into `chunk_size` packets.
    pub fn write_mem(&mut self, space: MemSpace, addr: u16, data: &[u8]) -> Result<(), LinkError> {
        let mut offset = 0;
        for (chunk_addr, chunk_len) in self.chunks(addr, data.len())? {
            let payload = Payload::new(&data[offset..offset + chunk_len])?;
            let command = match space {
                MemSpace::Cpu => Command::CpuMemWr {
                    addr: chunk_addr,
                    data: payload,
                },
                MemSpace::Ppu => Command::PpuMemWr {
                    addr: chunk_addr,
                    data: payload,
                },
            };
            self.send(&command)?;
            offset += chunk_len;
        }

        trace!(?space, addr, len = data.len(), "memory write");
        Ok(())
    }

    /// Upload a cartridge image and start it from its reset vector.
    ///
    /// Sequence: halt, disable the PPU, push the cart config, write PRG to
    /// `$8000` and CHR to PPU `$0000`, point PC at the reset vector, resume.
    pub fn load_rom(&mut self, rom: &RomImage) -> Result<(), LinkError> {
        let config = rom.config();
        info!(
            mapper = config.mapper(),
            prg = rom.prg().len(),
            chr = rom.chr().len(),
            "loading ROM"
        );

        self.halt()?;
        self.disable_ppu()?;
        self.set_cart_config(config)?;
        self.write_cpu_mem(PRG_ROM_START, rom.prg())?;
        if !rom.chr().is_empty() {
            self.write_ppu_mem(CHR_ROM_START, rom.chr())?;
        }

        let reset = rom.reset_vector();
        self.write_pc(reset)?;
        self.resume()?;

        info!("ROM running from {:#06x}", reset);
        Ok(())
    }

    /// Read a `.nes` file and [`load_rom`](Self::load_rom) it.
    pub fn load_rom_file<P>(&mut self, path: P) -> Result<(), LinkError>
    where
        P: AsRef<Path>,
    {
        let rom = RomImage::from_file(path)?;
        self.load_rom(&rom)
    }

    /// Split `[addr, addr + len)` into `(chunk_addr, chunk_len)` pieces.
    ///
    /// The whole range is checked before anything is sent, so a transfer that
    /// runs past `$FFFF` fails without touching target memory.
    fn chunks(&self, addr: u16, len: usize) -> Result<Vec<(u16, usize)>, LinkError> {
        let overflow = LinkError::AddressOverflow { addr, len };
        let end = (addr as usize).checked_add(len).ok_or(overflow)?;
        if end > 0x1_0000 {
            return Err(LinkError::AddressOverflow { addr, len });
        }

        let chunk_size = self.config.chunk_size.clamp(1, MAX_PAYLOAD);
        let mut chunks = Vec::with_capacity(len.div_ceil(chunk_size));
        let mut start = addr as usize;
        while start < end {
            let chunk_len = chunk_size.min(end - start);
            // `start < end <= 0x10000`, so the address fits.
            chunks.push((start as u16, chunk_len));
            start += chunk_len;
        }

        Ok(chunks)
    }
}
