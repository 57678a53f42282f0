//! One-shot build command.

use std::time::Instant;

use anyhow::Result;

use crate::compile::{self, CompileOutcome};
use crate::config::Config;
use crate::log;

/// Compile the configured source/target pair once.
///
/// CLI overrides were already folded into the config at load time.
pub fn run_build(config: &Config) -> Result<()> {
    let job = config
        .compile
        .request()
        .validate(config.compile.minify)?;

    let started = Instant::now();
    match compile::compile_and_write(&job)? {
        CompileOutcome::Written { target, bytes } => {
            log!(
                "build";
                "compiled {} -> {} ({} bytes, {:.0?})",
                job.source.display(),
                target.display(),
                bytes,
                started.elapsed()
            );
        }
        CompileOutcome::Unchanged { target } => {
            log!("build"; "{} up to date", target.display());
        }
    }
    Ok(())
}
