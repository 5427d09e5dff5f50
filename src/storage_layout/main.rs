//! Prints where each packed member of a struct lives within its storage
//! slots, using the `storageLayout` section of a contract's build output.

mod contract;
mod layout;

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "storage", about = "Print the storage slot positions of a struct's members")]
struct Args {
    /// Contract name, `path/File.sol`, or `path/File.sol:Contract`
    #[arg(short, long, default_value = "WildcatMarket")]
    contract: String,

    /// Struct to print
    #[arg(short, long = "struct", default_value = "MarketState")]
    struct_name: String,

    /// Project root holding `src/` and `out/`
    #[arg(long, default_value = "..")]
    root: PathBuf,
}

fn run(args: &Args, writer: &mut impl Write) -> Result<()> {
    let contract = contract::resolve_contract(&args.root, &args.contract)?;
    tracing::debug!("resolved {} to {}", args.contract, contract.source.display());

    let json_path = contract::find_output_json(&args.root.join("out"), &contract)?;
    writeln!(writer, "Found forge output: {}", json_path.display())?;

    let artifact = read_artifact(&json_path)?;
    let entry = layout::find_struct(&artifact, &args.struct_name)
        .with_context(|| format!("in {}:{}", contract.source.display(), contract.name))?;
    let by_slot = layout::slots(&entry.members)?;
    layout::write_layout(writer, &args.struct_name, &contract.name, &by_slot)?;
    Ok(())
}

fn read_artifact(path: &Path) -> Result<layout::Artifact> {
    let source = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("parsing artifact {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    run(&args, &mut writer)?;
    writer.flush()?;
    Ok(())
}
