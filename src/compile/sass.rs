//! Entry point into the external SCSS compiler.

use std::path::Path;

use super::CompileError;

/// Compile a stylesheet entry file to CSS.
///
/// The source's parent directory goes on the load path so `@use` and
/// `@import` resolve relative to the entry file. A missing or unreadable
/// source surfaces as a compile error, since the compiler owns the read.
pub fn compile_file(source: &Path) -> Result<String, CompileError> {
    let options = match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            grass::Options::default().load_path(parent)
        }
        _ => grass::Options::default(),
    };

    grass::from_path(source, &options).map_err(|e| CompileError::Compile(e.to_string()))
}
