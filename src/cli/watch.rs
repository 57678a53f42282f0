//! Watch command: actor system lifecycle.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actor::Coordinator;
use crate::config::Config;
use crate::{core, log};

/// Compile on start, then watch for stylesheet changes until Ctrl+C.
pub fn run_watch(config: Arc<Config>) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = crossbeam::channel::bounded(1);
    core::register_shutdown(shutdown_tx);

    log!("watch"; "watching {} (Ctrl+C to stop)", config.compile.source.display());

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(
        Coordinator::with_config(config)
            .with_shutdown_signal(shutdown_rx)
            .run(),
    )
}
