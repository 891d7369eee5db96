mod app;
mod args;
mod dump;

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{Context, Result};
use clap::Parser;
use nesdbg_link::serial;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::{app::App, args::Args};

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if args.list_ports {
        for port in serial::available_ports()? {
            println!("{port}");
        }
        return Ok(());
    }

    let port = args.port.as_deref().context("no serial port given")?;
    let link = serial::connect(port, args.link_config())
        .with_context(|| format!("opening {port}"))?;
    let mut app = App::new(link);

    if let Some(path) = &args.rom {
        app.link_mut()
            .load_rom_file(path)
            .with_context(|| format!("uploading {}", path.display()))?;
    }

    let mut stdout = io::stdout().lock();
    match &args.script {
        Some(path) => {
            info!("Running script {}", path.display());
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            app.run(BufReader::new(file), &mut stdout)
        }
        None => app.run(io::stdin().lock(), &mut stdout),
    }
}
