//! Actor Coordinator - Wires up the Watch-Mode Actor System
//!
//! # Responsibility
//!
//! The Coordinator is a **thin orchestrator** that:
//! - Creates communication channels
//! - Wires up actors
//! - Runs the startup compile
//! - Relays shutdown
//!
//! Compile logic lives in `compile/`, not here.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::compiler::CompilerActor;
use super::fs::FsActor;
use super::messages::{CompilerMsg, request_compile};
use crate::compile::CompileOutcome;
use crate::config::Config;

/// Channel buffer size
const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system
pub struct Coordinator {
    config: Arc<Config>,
    /// Optional shutdown signal receiver
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    /// Create from Arc<Config>
    pub fn with_config(config: Arc<Config>) -> Self {
        Self {
            config,
            shutdown_rx: None,
        }
    }

    /// Set shutdown signal receiver
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system
    pub async fn run(mut self) -> Result<()> {
        let (compiler_tx, compiler_rx) = mpsc::channel::<CompilerMsg>(CHANNEL_BUFFER);

        // Watcher first: events arriving during the startup compile buffer
        // instead of getting lost.
        let fs_actor = FsActor::new(self.watch_paths(), compiler_tx.clone(), self.config.clone())
            .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;
        let compiler_actor = CompilerActor::new(compiler_rx, self.config.clone());

        let compiler_handle = tokio::spawn(compiler_actor.run());
        let fs_handle = tokio::spawn(fs_actor.run());

        // Startup compile goes through the same request path as everything
        // else. A failure here aborts startup.
        if self.config.compile.on_start {
            let outcome = request_compile(&compiler_tx, self.config.compile.request())
                .await
                .context("startup compile failed")?;
            log_startup(&outcome);
        }

        crate::debug!("actor"; "start");
        let shutdown_rx = self.shutdown_rx.take();
        wait_for_shutdown(shutdown_rx, fs_handle).await;

        // Send shutdown to the compiler so it can drain
        crate::debug!("actor"; "sending shutdown to compiler");
        let _ = compiler_tx.send(CompilerMsg::Shutdown).await;
        let _ = tokio::time::timeout(Duration::from_millis(500), compiler_handle).await;

        crate::debug!("actor"; "stopped");
        Ok(())
    }

    /// Directories the watcher observes: the source entry's parent plus any
    /// configured extras.
    fn watch_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(parent) = self.config.compile.source.parent()
            && !parent.as_os_str().is_empty()
        {
            paths.push(parent.to_path_buf());
        }
        for extra in &self.config.watch.paths {
            if !paths.contains(extra) {
                paths.push(extra.clone());
            }
        }
        paths
    }
}

fn log_startup(outcome: &CompileOutcome) {
    match outcome {
        CompileOutcome::Written { target, bytes } => {
            crate::log!("build"; "compiled {} ({} bytes)", target.display(), bytes);
        }
        CompileOutcome::Unchanged { target } => {
            crate::log!("build"; "{} up to date", target.display());
        }
    }
}

/// Wait for a shutdown signal (poll-based since std crossbeam channel), or
/// for the watcher to stop when no signal is wired up.
async fn wait_for_shutdown(shutdown_rx: Option<Receiver<()>>, fs_handle: JoinHandle<()>) {
    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    } else {
        let _ = fs_handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_watch_paths_cover_source_parent_and_extras() {
        let mut config = Config::default();
        config.compile.source = PathBuf::from("/site/scss/main.scss");
        config.watch.paths = vec![PathBuf::from("/site/vendor"), PathBuf::from("/site/scss")];

        let coordinator = Coordinator::with_config(Arc::new(config));
        let paths = coordinator.watch_paths();
        assert_eq!(
            paths,
            vec![PathBuf::from("/site/scss"), PathBuf::from("/site/vendor")]
        );
    }
}
