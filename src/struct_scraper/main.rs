//! Lists the struct declarations of every `.sol` file under `ROOT`.

mod scraper;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "structs", about = "Print struct declarations found in Solidity sources")]
struct Args {
    /// Source directory to scan recursively
    #[arg(default_value = "../src")]
    root: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    tracing::debug!("scanning sources under {}", args.root.display());

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    let count = scraper::run(&args.root, &mut writer)?;
    writer.flush()?;

    tracing::info!("found {count} structs");
    Ok(())
}
