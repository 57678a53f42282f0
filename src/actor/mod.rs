//! Actor System for Watch Mode
//!
//! Message-passing concurrency with a request/reply envelope:
//!
//! ```text
//! FsActor --> CompilerActor --> reply (oneshot)
//! (watch)     (grass + write)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types and the request/reply helper
//! - `fs` - File system watcher with debouncing
//! - `compiler` - Compile request execution
//! - `coordinator` - Wires up and runs actors

pub mod compiler;
pub mod coordinator;
pub mod fs;
pub mod messages;

pub use coordinator::Coordinator;
