//! End-to-end link tests against an in-memory target.

mod common;

use anyhow::Result;
use common::{MockTarget, nrom_image};
use ctor::ctor;
use nesdbg_link::{Link, LinkConfig, LinkError, MemSpace, RomImage};
use nesdbg_proto::{Command, CpuRegister, Mirroring, Packet};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[ctor]
fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_test_writer()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
}

fn small_chunks() -> LinkConfig {
    LinkConfig {
        chunk_size: 0x40,
        ..LinkConfig::default()
    }
}

#[test]
fn echo_loopback() -> Result<()> {
    let mut link = Link::new(MockTarget::new());
    link.echo(b"nesdbg")?;
    link.echo(&[])?;
    Ok(())
}

#[test]
fn memory_round_trips_through_chunks() -> Result<()> {
    let mut link = Link::with_config(MockTarget::new(), small_chunks());
    let data: Vec<u8> = (0..=0xFF).collect();

    link.write_cpu_mem(0x0300, &data)?;
    assert_eq!(link.read_cpu_mem(0x0300, data.len())?, data);
    assert_eq!(link.get_ref().cpu[0x03FF], 0xFF);

    link.write_ppu_mem(0x3F00, &data[..32])?;
    assert_eq!(link.read_mem(MemSpace::Ppu, 0x3F00, 32)?, &data[..32]);

    // 256 bytes at 0x40 per packet, written and read back.
    let writes = link
        .get_ref()
        .log
        .iter()
        .filter(|c| matches!(c, Command::CpuMemWr { .. }))
        .count();
    assert_eq!(writes, 4);
    Ok(())
}

#[test]
fn top_of_address_space_is_reachable() -> Result<()> {
    let mut link = Link::new(MockTarget::new());
    link.write_cpu_mem(0xFFFC, &[0x00, 0x80, 0x00, 0x90])?;
    assert_eq!(link.read_cpu_mem(0xFFFE, 2)?, vec![0x00, 0x90]);

    let err = link.read_cpu_mem(0xFFFE, 3).expect_err("past $FFFF");
    assert!(matches!(err, LinkError::AddressOverflow { .. }));
    Ok(())
}

#[test]
fn break_state_follows_brk_and_run() -> Result<()> {
    let mut link = Link::new(MockTarget::new());
    assert!(!link.is_halted()?);

    link.halt()?;
    assert!(link.is_halted()?);

    link.resume()?;
    assert!(!link.is_halted()?);
    Ok(())
}

#[test]
fn registers_and_program_counter() -> Result<()> {
    let mut link = Link::new(MockTarget::new());

    link.write_reg(CpuRegister::Ac, 0x42)?;
    link.write_reg(CpuRegister::S, 0xFD)?;
    link.write_pc(0xC123)?;

    assert_eq!(link.read_reg(CpuRegister::Ac)?, 0x42);
    assert_eq!(link.read_reg(CpuRegister::S)?, 0xFD);
    assert_eq!(link.read_pc()?, 0xC123);
    assert_eq!(link.get_ref().pc(), 0xC123);
    Ok(())
}

#[test]
fn parsed_text_commands_drive_the_target() -> Result<()> {
    let mut link = Link::new(MockTarget::new());

    link.transact(&Packet::parse("cpumemwr 0x0200 3 0xaa 0xbb 0xcc")?)?;
    let reply = link.transact(&Packet::parse("cpumemrd 0x0200 3")?)?;
    assert_eq!(reply, vec![0xAA, 0xBB, 0xCC]);

    let reply = link.transact(&Packet::parse("querydbgbrk")?)?;
    assert_eq!(reply, vec![0]);
    Ok(())
}

#[test]
fn truncated_reply_is_a_short_read() {
    let mut target = MockTarget::new();
    target.truncate_replies = Some(1);
    let mut link = Link::new(target);

    let err = link.read_ppu_mem(0x2000, 8).expect_err("short read");
    assert!(matches!(
        err,
        LinkError::ShortRead {
            expected: 8,
            received: 1
        }
    ));
}

#[test]
fn load_rom_uploads_and_starts_the_image() -> Result<()> {
    let image = nrom_image(1, 1, 0b0000_0001, 0xC004);
    let rom = RomImage::parse(&image)?;
    let mut link = Link::new(MockTarget::new());

    link.load_rom(&rom)?;
    let target = link.get_ref();

    let cart = target.cart.expect("cart configured");
    assert_eq!(cart.mapper(), 0);
    assert_eq!(cart.mirroring(), Mirroring::Vertical);
    assert_eq!(cart.prg_rom_banks, 1);

    assert_eq!(&target.cpu[0x8000..0xC000], rom.prg());
    assert_eq!(&target.ppu[..0x2000], rom.chr());
    assert_eq!(target.pc(), 0xC004);
    assert!(!target.ppu_enabled);
    assert!(!target.halted);

    // Halt first, resume last.
    assert_eq!(target.log.first(), Some(&Command::DbgBrk));
    assert_eq!(target.log.last(), Some(&Command::DbgRun));
    assert_eq!(target.log[1], Command::PpuDisable);
    assert!(matches!(target.log[2], Command::CartSetCfg { .. }));
    Ok(())
}

#[test]
fn load_rom_skips_chr_upload_for_chr_ram_boards() -> Result<()> {
    let rom = RomImage::parse(&nrom_image(2, 0, 0, 0x8000))?;
    let mut link = Link::new(MockTarget::new());

    link.load_rom(&rom)?;
    let target = link.get_ref();

    assert!(
        !target
            .log
            .iter()
            .any(|c| matches!(c, Command::PpuMemWr { .. }))
    );
    assert_eq!(&target.cpu[0x8000..], rom.prg());
    assert_eq!(target.pc(), 0x8000);
    Ok(())
}
