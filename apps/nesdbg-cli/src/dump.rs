use nesdbg_proto::Command;

const BYTES_PER_ROW: usize = 16;

/// Human-readable rendering of a reply to `command`.
pub fn render_reply(command: &Command, reply: &[u8]) -> String {
    match command {
        Command::CpuMemRd { addr, .. } | Command::PpuMemRd { addr, .. } => hex_dump(*addr, reply),
        Command::CpuRegRd { reg } => match reply.first() {
            Some(val) => format!("{reg} = {val:#04x}"),
            None => "ok".to_string(),
        },
        Command::QueryDbgBrk => match reply.first() {
            Some(0) => "running".to_string(),
            Some(_) => "halted".to_string(),
            None => "ok".to_string(),
        },
        _ if reply.is_empty() => "ok".to_string(),
        _ => hex_bytes(reply),
    }
}

/// Rows of `BYTES_PER_ROW` bytes prefixed by the address of the first byte.
pub fn hex_dump(base: u16, bytes: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in bytes.chunks(BYTES_PER_ROW).enumerate() {
        let addr = base.wrapping_add((row * BYTES_PER_ROW) as u16);
        if row > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{addr:04X}: {}", hex_bytes(chunk)));
    }
    out
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
