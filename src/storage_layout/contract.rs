use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::{bail, Context, Result};

/// A source file and the contract it defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRef {
    pub source: PathBuf,
    pub name: String,
}

fn find_file_named(dir: &Path, file_name: &str) -> Result<Vec<PathBuf>> {
    let mut entries = vec![];
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry.with_context(|| format!("reading {}", dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("reading {}", entry.path().display()))?;
        entries.push((entry.path(), file_type.is_dir()));
    }
    entries.sort();

    let mut found = vec![];
    for (path, is_dir) in entries {
        if is_dir {
            found.extend(find_file_named(&path, file_name)?);
        } else if path.file_name().is_some_and(|n| n == file_name) {
            found.push(path);
        }
    }
    Ok(found)
}

/// Accepts `path/File.sol:Name`, `path/Name.sol`, or a bare contract name
/// expected at `<root>/src/<Name>.sol`. A source that does not exist at
/// the given path is looked up by file name under `<root>/src`.
pub fn resolve_contract(root: &Path, contract: &str) -> Result<ContractRef> {
    let (source, name) = if let Some((path, name)) = contract.split_once(':') {
        (PathBuf::from(path), name.to_string())
    } else if contract.contains(".sol") {
        let path = PathBuf::from(contract);
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        (path, name)
    } else {
        (root.join("src").join(format!("{contract}.sol")), contract.to_string())
    };

    if source.exists() {
        return Ok(ContractRef { source, name });
    }

    let Some(file_name) = source.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        bail!("contract not found: {contract}");
    };
    let mut found = find_file_named(&root.join("src"), &file_name)?;
    match found.len() {
        0 => bail!("contract not found: {contract}"),
        1 => Ok(ContractRef {
            source: found.remove(0),
            name,
        }),
        _ => bail!(
            "multiple files found for {contract}: {}",
            found
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// Finds `<out>/<suffix>/<Name>.json`, trying the shortest suffix of the
/// source path first (`File.sol`, then `dir/File.sol`, ...).
pub fn find_output_json(out: &Path, contract: &ContractRef) -> Result<PathBuf> {
    let components: Vec<_> = contract
        .source
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    let json_name = format!("{}.json", contract.name);
    for start in (0..components.len()).rev() {
        let candidate: PathBuf = components[start..].iter().collect();
        let path = out.join(candidate).join(&json_name);
        if path.exists() {
            return Ok(path);
        }
    }
    bail!(
        "failed to find build output JSON for {}:{}",
        contract.source.display(),
        contract.name
    )
}
