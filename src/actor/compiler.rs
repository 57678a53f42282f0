//! Compiler Actor - runs compile requests off the message queue.
//!
//! One request at a time, in arrival order. The compile itself is blocking
//! CPU/filesystem work, so it runs on the blocking pool while the actor
//! stays responsive to shutdown.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::messages::{CompileReply, CompilerMsg};
use crate::compile::{self, CompileError, CompileRequest};
use crate::config::Config;

pub struct CompilerActor {
    rx: mpsc::Receiver<CompilerMsg>,
    config: Arc<Config>,
}

impl CompilerActor {
    pub fn new(rx: mpsc::Receiver<CompilerMsg>, config: Arc<Config>) -> Self {
        Self { rx, config }
    }

    /// Main receive loop.
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                CompilerMsg::Compile { request, reply } => {
                    let outcome = self.handle_compile(request).await;
                    // Requester may have timed out and dropped the receiver.
                    let _ = reply.send(outcome);
                }
                CompilerMsg::Shutdown => {
                    crate::debug!("compile"; "shutting down");
                    break;
                }
            }
        }
    }

    async fn handle_compile(&self, request: CompileRequest) -> CompileReply {
        crate::log!(
            "compile";
            "request: source={:?} target={:?} minify={:?}",
            request.source, request.target, request.minify
        );

        let default_minify = self.config.compile.minify;
        let result = tokio::task::spawn_blocking(move || {
            let job = request.validate(default_minify)?;
            compile::compile_and_write(&job)
        })
        .await;

        let reply = match result {
            Ok(reply) => reply,
            Err(join_err) => Err(CompileError::Compile(format!(
                "compile task failed: {join_err}"
            ))),
        };

        if let Err(e) = &reply {
            crate::log!("compile"; "{}: {}", e.code(), e);
        }
        reply
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::messages::request_compile;
    use crate::compile::CompileOutcome;
    use std::path::PathBuf;

    fn spawn_actor() -> mpsc::Sender<CompilerMsg> {
        let (tx, rx) = mpsc::channel(8);
        let actor = CompilerActor::new(rx, Arc::new(Config::default()));
        tokio::spawn(actor.run());
        tx
    }

    #[tokio::test]
    async fn test_compile_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("main.scss");
        std::fs::write(&source, "a { b { color: red; } }").unwrap();
        let target = dir.path().join("css/main.css");

        let tx = spawn_actor();
        let request = CompileRequest {
            source: Some(source),
            target: Some(target.clone()),
            minify: Some(false),
        };

        let outcome = request_compile(&tx, request).await.unwrap();
        assert!(matches!(outcome, CompileOutcome::Written { .. }));
        assert!(std::fs::read_to_string(&target).unwrap().contains("a b"));
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected() {
        let tx = spawn_actor();
        let err = request_compile(&tx, CompileRequest::default())
            .await
            .unwrap_err();
        let err = err.downcast::<CompileError>().unwrap();
        assert_eq!(err.code(), "invalid_request");
    }

    #[tokio::test]
    async fn test_request_minify_defaults_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("main.scss");
        std::fs::write(&source, "a { color: red; }").unwrap();
        let target = dir.path().join("main.css");

        // Config::default() has minify = true; the request leaves it unset.
        let tx = spawn_actor();
        let request = CompileRequest {
            source: Some(source),
            target: Some(target.clone()),
            minify: None,
        };
        request_compile(&tx, request).await.unwrap();

        let css = std::fs::read_to_string(&target).unwrap();
        assert!(css.contains("a{color:red}"));
    }

    #[tokio::test]
    async fn test_shutdown_stops_the_loop() {
        let (tx, rx) = mpsc::channel(8);
        let actor = CompilerActor::new(rx, Arc::new(Config::default()));
        let handle = tokio::spawn(actor.run());

        tx.send(CompilerMsg::Shutdown).await.unwrap();
        handle.await.unwrap();

        // The receiver is gone, so new requests fail at the transport layer.
        let err = request_compile(
            &tx,
            CompileRequest {
                source: Some(PathBuf::from("a.scss")),
                target: Some(PathBuf::from("a.css")),
                minify: None,
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("not running"));
    }
}
