//! Replay Executor
//!
//! An in-process execution target for replay command streams.
//!
//! [`Executor::spawn`] starts a tokio task that drains commands strictly in
//! submission order and returns a [`CommandStream`], the
//! [`Builder`](replay_core::Builder) feeding it. Read-backs are resolved on the
//! executor task, after every command submitted before them has run.
//!
//! # Example
//!
//! ```rust,ignore
//! use replay_executor::{Executor, ExecutorConfig};
//!
//! let (stream, handle) = Executor::spawn(ExecutorConfig::default());
//! let mut writer = ReplayWriter::new(stream);
//! chain.run(atoms, &mut writer)?;
//! drop(writer);
//! let report = handle.join().await?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod command;
mod config;
mod error;
mod executor;
mod stream;

// Re-exports
pub use command::Command;
pub use config::{ExecutorConfig, Fault};
pub use error::ExecutorError;
pub use executor::{ExecutionReport, Executor, ExecutorHandle};
pub use stream::CommandStream;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
