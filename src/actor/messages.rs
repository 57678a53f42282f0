//! Actor Message Definitions
//!
//! One request/reply envelope: callers attach a oneshot sender to each
//! request and get exactly one reply back.
//!
//! ```text
//! FsActor --Compile--> CompilerActor --reply--> requester
//! ```

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::compile::{CompileError, CompileOutcome, CompileRequest};

/// Reply to a compile request.
pub type CompileReply = Result<CompileOutcome, CompileError>;

/// Messages to the Compiler Actor
#[derive(Debug)]
pub enum CompilerMsg {
    /// Compile a stylesheet and reply with the outcome
    Compile {
        request: CompileRequest,
        reply: oneshot::Sender<CompileReply>,
    },
    /// Shutdown
    Shutdown,
}

/// How long a requester waits for the compiler to reply.
pub const REPLY_TIMEOUT: Duration = Duration::from_secs(10);

/// Send a compile request and await the reply.
///
/// Transport failures (actor gone, reply dropped, timeout elapsed) are
/// distinct from the structured failure codes the compiler replies with.
pub async fn request_compile(
    tx: &mpsc::Sender<CompilerMsg>,
    request: CompileRequest,
) -> anyhow::Result<CompileOutcome> {
    let (reply_tx, reply_rx) = oneshot::channel();
    tx.send(CompilerMsg::Compile {
        request,
        reply: reply_tx,
    })
    .await
    .map_err(|_| anyhow::anyhow!("compiler actor is not running"))?;

    match tokio::time::timeout(REPLY_TIMEOUT, reply_rx).await {
        Ok(Ok(reply)) => Ok(reply?),
        Ok(Err(_)) => Err(anyhow::anyhow!("compiler dropped the reply channel")),
        Err(_) => Err(anyhow::anyhow!(
            "no reply within {}s",
            REPLY_TIMEOUT.as_secs()
        )),
    }
}
