//! Prints the 4-byte selectors of every function and event found in the
//! compiled contract artifacts under `ROOT/*/*.json`.

mod abi;
mod artifacts;
mod selector;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "selectors", about = "Print function and event selectors of compiled artifacts")]
struct Args {
    /// Build output directory holding one subdirectory per source file
    #[arg(default_value = "../out")]
    root: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    tracing::debug!("scanning artifacts under {}", args.root.display());

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    let count = artifacts::run(&args.root, &mut writer)?;
    writer.flush()?;

    tracing::info!("processed {count} artifacts");
    Ok(())
}
