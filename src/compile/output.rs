//! Target persistence: directory creation, freshness, write.

use std::fs;
use std::path::Path;

use super::{CompileError, CompileOutcome};

/// Write compiled CSS to `target`, creating missing parent directories.
///
/// When the target already holds identical content the write is skipped,
/// so downstream watchers don't see spurious changes.
pub fn write_css(target: &Path, css: &str) -> Result<CompileOutcome, CompileError> {
    ensure_parent_dir(target)?;

    if is_fresh(target, css) {
        return Ok(CompileOutcome::Unchanged {
            target: target.to_path_buf(),
        });
    }

    fs::write(target, css)
        .map_err(|e| CompileError::Write(target.to_path_buf(), e.to_string()))?;

    Ok(CompileOutcome::Written {
        target: target.to_path_buf(),
        bytes: css.len(),
    })
}

/// Recursive, idempotent parent directory creation.
///
/// A pre-existing non-directory entry at the parent path is a write error,
/// never something to replace.
fn ensure_parent_dir(target: &Path) -> Result<(), CompileError> {
    let Some(parent) = target.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    if parent.exists() {
        if parent.is_dir() {
            return Ok(());
        }
        return Err(CompileError::Write(
            target.to_path_buf(),
            format!(
                "`{}` already exists and is not a directory",
                parent.display()
            ),
        ));
    }

    fs::create_dir_all(parent).map_err(|e| {
        CompileError::Write(
            target.to_path_buf(),
            format!("mkdir `{}`: {e}", parent.display()),
        )
    })
}

/// Existing target already holds exactly this CSS.
fn is_fresh(target: &Path, css: &str) -> bool {
    match fs::read(target) {
        Ok(existing) => blake3::hash(&existing) == blake3::hash(css.as_bytes()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/c/main.css");

        let outcome = write_css(&target, "a{color:red}").unwrap();
        assert!(matches!(outcome, CompileOutcome::Written { bytes: 12, .. }));
        assert_eq!(fs::read_to_string(&target).unwrap(), "a{color:red}");
    }

    #[test]
    fn test_write_is_idempotent_on_existing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("css/main.css");

        write_css(&target, "a{}").unwrap();
        let outcome = write_css(&target, "b{}").unwrap();
        assert!(matches!(outcome, CompileOutcome::Written { .. }));
        assert_eq!(fs::read_to_string(&target).unwrap(), "b{}");
    }

    #[test]
    fn test_identical_content_skips_write() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("main.css");

        write_css(&target, "a{color:red}").unwrap();
        let outcome = write_css(&target, "a{color:red}").unwrap();
        assert_eq!(
            outcome,
            CompileOutcome::Unchanged {
                target: target.clone()
            }
        );
    }

    #[test]
    fn test_non_directory_parent_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("css");
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_css(&blocker.join("main.css"), "a{}").unwrap_err();
        assert_eq!(err.code(), "write_error");
        assert!(err.to_string().contains("not a directory"));
    }
}
