use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::debug;

use crate::abi::{Artifact, ItemKind};
use crate::selector::calculate_function_selector;

/// Directories whose name contains this are compiled test contracts.
const TEST_MARKER: &str = "t.sol";

fn visible_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = vec![];
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry.with_context(|| format!("reading {}", dir.display()))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

/// Collects `root/*/*.json`, leaving out artifacts of test contracts.
pub fn find_artifacts(root: &Path) -> Result<Vec<PathBuf>> {
    let mut artifacts = vec![];
    for dir in visible_entries(root)? {
        if !dir.is_dir() {
            continue;
        }
        let dir_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if dir_name.contains(TEST_MARKER) {
            debug!("skipping test artifacts in {}", dir.display());
            continue;
        }
        for file in visible_entries(&dir)? {
            if file.is_file() && file.extension().is_some_and(|ext| ext == "json") {
                artifacts.push(file);
            }
        }
    }
    Ok(artifacts)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Selectors {
    pub functions: Vec<(String, String)>,
    pub events: Vec<(String, String)>,
}

pub fn collect_selectors(artifact: &Artifact) -> Result<Selectors> {
    let mut selectors = Selectors::default();
    for item in &artifact.abi {
        let Some(signature) = item.signature()? else {
            continue;
        };
        let selector = calculate_function_selector(&signature);
        match item.kind()? {
            Some(ItemKind::Function) => selectors.functions.push((signature, selector)),
            Some(ItemKind::Event) => selectors.events.push((signature, selector)),
            None => {}
        }
    }
    Ok(selectors)
}

fn write_section(
    writer: &mut impl Write,
    title: &str,
    entries: &[(String, String)],
) -> std::io::Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    writeln!(writer, "{title}:")?;
    for (i, (signature, selector)) in entries.iter().enumerate() {
        if i > 0 {
            writeln!(writer)?;
        }
        writeln!(writer, "  {signature} {selector}")?;
    }
    writeln!(writer)
}

pub fn process_file(path: &Path, writer: &mut impl Write) -> Result<()> {
    debug!("processing {}", path.display());
    writeln!(writer, "File: {}", path.display())?;

    let source = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let artifact: Artifact = serde_json::from_str(&source)
        .with_context(|| format!("parsing artifact {}", path.display()))?;
    let selectors =
        collect_selectors(&artifact).with_context(|| format!("in artifact {}", path.display()))?;

    write_section(writer, "Functions", &selectors.functions)?;
    write_section(writer, "Events", &selectors.events)?;
    writeln!(writer)?;
    Ok(())
}

/// Prints the selector report for every artifact under `root`.
/// Returns the number of artifacts processed.
pub fn run(root: &Path, writer: &mut impl Write) -> Result<usize> {
    let artifacts = find_artifacts(root)?;
    for path in &artifacts {
        process_file(path, writer)?;
    }
    Ok(artifacts.len())
}
