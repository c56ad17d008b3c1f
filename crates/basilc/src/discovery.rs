//! Source module discovery.

use std::path::{Path, PathBuf};

/// Recursively discover the modules under `root` whose extension is one of
/// `extensions` (case-insensitive).
///
/// Returns paths relative to `root`, sorted for determinism. Hidden files
/// and directories (names starting with `.`) are skipped.
pub fn discover_modules(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();
    discover_recursive(root, root, extensions, &mut files)
        .map_err(|e| format!("Failed to walk directory '{}': {}", root.display(), e))?;
    files.sort();
    Ok(files)
}

fn discover_recursive(
    root: &Path,
    dir: &Path,
    extensions: &[String],
    files: &mut Vec<PathBuf>,
) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let entry_path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        if entry_path.is_dir() {
            discover_recursive(root, &entry_path, extensions, files)?;
        } else if has_extension(&entry_path, extensions) {
            let relative = entry_path
                .strip_prefix(root)
                .unwrap_or(&entry_path)
                .to_path_buf();
            files.push(relative);
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

/// Read a module as text. Bytes that are not UTF-8 (legacy code pages) are
/// replaced rather than rejected.
pub fn read_module(path: &Path) -> Result<String, String> {
    let bytes =
        std::fs::read(path).map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            tracing::warn!(file = %path.display(), "not UTF-8, invalid bytes replaced");
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn exts() -> Vec<String> {
        vec!["bas".to_string(), "cls".to_string()]
    }

    #[test]
    fn finds_modules_recursively() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("forms/sub")).unwrap();
        fs::write(root.join("Main.bas"), "").unwrap();
        fs::write(root.join("forms/Account.CLS"), "").unwrap();
        fs::write(root.join("forms/sub/Util.bas"), "").unwrap();
        fs::write(root.join("readme.txt"), "").unwrap();

        let files = discover_modules(root, &exts()).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("Main.bas"),
                PathBuf::from("forms/Account.CLS"),
                PathBuf::from("forms/sub/Util.bas"),
            ]
        );
    }

    #[test]
    fn skips_hidden_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join(".git/Old.bas"), "").unwrap();
        fs::write(root.join(".Scratch.bas"), "").unwrap();
        fs::write(root.join("Main.bas"), "").unwrap();

        let files = discover_modules(root, &exts()).unwrap();
        assert_eq!(files, vec![PathBuf::from("Main.bas")]);
    }

    #[test]
    fn legacy_encodings_are_read_lossily() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Latin.bas");
        fs::write(&path, b"' caf\xe9\nDim x\n").unwrap();
        let text = read_module(&path).unwrap();
        assert_eq!(text, "' caf\u{fffd}\nDim x\n");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = discover_modules(&tmp.path().join("nope"), &exts()).unwrap_err();
        assert!(err.starts_with("Failed to walk directory"));
    }
}
