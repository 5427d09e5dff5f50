use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

/// A `struct Name { ... }` block as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<String>,
}

/// Lexical scan only: a `}` inside the body (nested braces, comments)
/// ends the match early.
pub struct StructScanner {
    pattern: Regex,
}

impl Default for StructScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl StructScanner {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"struct\s+(\w+)\s*\{([^}]*)\}").expect("struct pattern is valid"),
        }
    }

    pub fn find_structs(&self, source: &str) -> Vec<StructDecl> {
        self.pattern
            .captures_iter(source)
            .map(|caps| StructDecl {
                name: caps[1].to_string(),
                fields: caps[2]
                    .split(';')
                    .map(str::trim)
                    .filter(|field| !field.is_empty())
                    .map(str::to_string)
                    .collect(),
            })
            .collect()
    }
}

/// Every `.sol` file under `dir`, top-down: a directory's own files come
/// before the contents of its subdirectories. Symlinked directories are
/// neither descended into nor listed.
pub fn find_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = vec![];
    let mut files = vec![];
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry.with_context(|| format!("reading {}", dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("reading {}", entry.path().display()))?;
        let path = entry.path();
        if file_type.is_dir() {
            dirs.push(path);
        } else if !(file_type.is_symlink() && path.is_dir()) {
            files.push(path);
        }
    }
    dirs.sort();
    files.sort();

    let mut sources: Vec<PathBuf> = files
        .into_iter()
        .filter(|p| p.to_string_lossy().ends_with(".sol"))
        .collect();
    for sub in dirs {
        sources.extend(find_sources(&sub)?);
    }
    Ok(sources)
}

pub fn write_structs(
    path: &Path,
    structs: &[StructDecl],
    writer: &mut impl Write,
) -> std::io::Result<()> {
    if structs.is_empty() {
        return Ok(());
    }
    writeln!(writer)?;
    writeln!(writer, "File: {}", path.display())?;
    for decl in structs {
        writeln!(writer, "  Struct: {}", decl.name)?;
        for field in &decl.fields {
            writeln!(writer, "    {field}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Prints the structs of every source file under `root`.
/// Returns the number of structs found.
pub fn run(root: &Path, writer: &mut impl Write) -> Result<usize> {
    let scanner = StructScanner::new();
    let mut count = 0;
    for path in find_sources(root)? {
        debug!("scanning {}", path.display());
        let source =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let structs = scanner.find_structs(&source);
        write_structs(&path, &structs, writer)?;
        count += structs.len();
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn report(root: &Path) -> String {
        let mut buf = vec![];
        run(root, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_find_point() {
        let structs = StructScanner::new().find_structs("struct Point { uint x; uint y; }");
        assert_eq!(
            structs,
            vec![StructDecl {
                name: "Point".to_string(),
                fields: vec!["uint x".to_string(), "uint y".to_string()],
            }]
        );
    }

    #[test]
    fn test_find_multiline_structs() {
        let source = r#"
            contract Market {
                struct MarketState {
                    uint128 maxTotalSupply;
                    mapping(address => uint256) balances;
                }

                struct Empty{}
            }
        "#;
        let structs = StructScanner::new().find_structs(source);
        assert_eq!(structs.len(), 2);
        assert_eq!(structs[0].name, "MarketState");
        assert_eq!(
            structs[0].fields,
            vec!["uint128 maxTotalSupply", "mapping(address => uint256) balances"]
        );
        assert_eq!(structs[1].name, "Empty");
        assert!(structs[1].fields.is_empty());
    }

    #[test]
    fn test_nested_brace_ends_match() {
        let structs =
            StructScanner::new().find_structs("struct A { uint a; /* { b } */ uint c; }");
        assert_eq!(structs.len(), 1);
        assert_eq!(structs[0].fields, vec!["uint a", "/* { b"]);
    }

    #[test]
    fn test_report_format() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Geometry.sol");
        fs::write(&path, "struct Point { uint x; uint y; }").unwrap();

        assert_eq!(
            report(tmp.path()),
            format!(
                "\nFile: {}\n  Struct: Point\n    uint x\n    uint y\n\n",
                path.display()
            )
        );
    }

    #[test]
    fn test_files_without_structs_print_nothing() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Plain.sol"), "contract Plain { uint x; }").unwrap();
        assert_eq!(report(tmp.path()), "");
    }

    #[test]
    fn test_walk_order_and_extension() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("interfaces");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("IA.sol"), "").unwrap();
        fs::write(tmp.path().join("B.sol"), "").unwrap();
        fs::write(tmp.path().join("C.SOL"), "").unwrap();
        fs::write(tmp.path().join("notes.md"), "").unwrap();

        assert_eq!(
            find_sources(tmp.path()).unwrap(),
            vec![tmp.path().join("B.sol"), sub.join("IA.sol")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_dirs_are_not_followed() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let lib = tmp.path().join("lib");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&lib).unwrap();
        fs::write(lib.join("L.sol"), "struct L { uint l; }").unwrap();
        fs::write(src.join("A.sol"), "struct A { uint a; }").unwrap();
        symlink(&lib, src.join("linked")).unwrap();
        symlink(&src, src.join("loop")).unwrap();
        symlink(src.join("A.sol"), src.join("B.sol")).unwrap();

        assert_eq!(
            find_sources(&src).unwrap(),
            vec![src.join("A.sol"), src.join("B.sol")]
        );
        assert_eq!(report(&src).matches("Struct: L").count(), 0);
        assert_eq!(report(&src).matches("Struct: A").count(), 2);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let mut buf = vec![];
        assert!(run(&tmp.path().join("src"), &mut buf).is_err());
    }

    #[test]
    fn test_report_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("A.sol"), "struct A { uint a; }").unwrap();
        fs::write(tmp.path().join("B.sol"), "struct B { bool b; }").unwrap();
        assert_eq!(report(tmp.path()), report(tmp.path()));
    }
}
