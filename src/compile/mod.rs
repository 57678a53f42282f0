//! Stylesheet compilation pipeline.
//!
//! SCSS semantics (nesting, variables, mixins) live in the external `grass`
//! compiler. This module owns everything around it: request validation, the
//! failure taxonomy, minification and target persistence.

pub mod minify;
pub mod output;
pub mod sass;

use std::path::{Path, PathBuf};

use thiserror::Error;

/// A compile request, as it arrives in a message.
///
/// All fields are optional at this stage; [`CompileRequest::validate`]
/// resolves them or rejects the request.
#[derive(Debug, Clone, Default)]
pub struct CompileRequest {
    /// Stylesheet entry file to compile.
    pub source: Option<PathBuf>,
    /// Where the compiled CSS goes.
    pub target: Option<PathBuf>,
    /// Minify the output. `None` falls back to the configured default.
    pub minify: Option<bool>,
}

/// A validated request, ready to run.
#[derive(Debug, Clone)]
pub struct CompileJob {
    pub source: PathBuf,
    pub target: PathBuf,
    pub minify: bool,
}

/// Result of a successful compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    /// Fresh CSS was written to the target.
    Written { target: PathBuf, bytes: usize },
    /// Compiled CSS matched the existing target content; nothing written.
    Unchanged { target: PathBuf },
}

impl CompileOutcome {
    /// Target path the outcome refers to.
    pub fn target(&self) -> &Path {
        match self {
            Self::Written { target, .. } | Self::Unchanged { target } => target,
        }
    }
}

/// Failure modes of a compile request.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The request was structurally unusable.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The stylesheet compiler (or the minifier) rejected the source.
    #[error("compilation failed: {0}")]
    Compile(String),

    /// The target could not be written.
    #[error("cannot write `{0}`: {1}")]
    Write(PathBuf, String),
}

impl CompileError {
    /// Stable code for reply envelopes and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::Compile(_) => "compile_error",
            Self::Write(..) => "write_error",
        }
    }
}

impl CompileRequest {
    /// Resolve against the configured minify default, rejecting requests
    /// with missing paths.
    pub fn validate(self, default_minify: bool) -> Result<CompileJob, CompileError> {
        let minify = self.minify.unwrap_or(default_minify);
        match (self.source, self.target) {
            (Some(source), Some(target)) => Ok(CompileJob {
                source,
                target,
                minify,
            }),
            (None, Some(_)) => Err(CompileError::InvalidRequest(
                "source path is missing".into(),
            )),
            (Some(_), None) => Err(CompileError::InvalidRequest(
                "target path is missing".into(),
            )),
            (None, None) => Err(CompileError::InvalidRequest(
                "source and target paths are missing".into(),
            )),
        }
    }
}

/// Run a validated job: compile, optionally minify, persist.
pub fn compile_and_write(job: &CompileJob) -> Result<CompileOutcome, CompileError> {
    let css = sass::compile_file(&job.source)?;
    let css = if job.minify {
        minify::minify_css(&css).map_err(CompileError::Compile)?
    } else {
        css
    };
    output::write_css(&job.target, &css)
}

// ============================================================================
// Tests
// ============================================================================
