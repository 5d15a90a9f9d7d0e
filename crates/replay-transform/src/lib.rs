//! Replay Transforms
//!
//! Pipeline stages that sit between the atom producer and the executor.
//!
//! # Core Concepts
//!
//! - [`Transform`]: Observes each atom, forwards it to a [`Writer`], and may inject
//!   trailing work on [`Transform::flush`]
//! - [`Chain`]: Runs an ordered list of transforms into a terminal writer
//! - [`ReplayWriter`]: Terminal writer applying atoms to [`State`](replay_core::State)
//!   and a [`Builder`](replay_core::Builder)
//! - [`CompletionHandshake`]: Transparent transform that, at end of stream, proves the
//!   executor drained everything before closing its issue listeners
//! - [`HandshakeMonitor`]: Observes the handshake after the transform is moved into a chain
//!
//! # Example
//!
//! ```rust,ignore
//! use replay_transform::{Chain, CompletionHandshake, IssueListener, ReplayWriter};
//!
//! let (mut handshake, completion) = CompletionHandshake::new();
//! let (listener, mut issues) = IssueListener::channel(16);
//! handshake.report_to(listener)?;
//!
//! Chain::new().with(handshake).run(atoms, &mut ReplayWriter::new(stream))?;
//!
//! // Resolves once the executor echoes the end-of-stream code.
//! completion.await?;
//! assert!(issues.recv().await.is_none());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod chain;
mod error;
mod handshake;
mod listener;
mod transform;
mod writer;

// Re-exports
pub use chain::Chain;
pub use error::{HandshakeError, HandshakeFailure, RegistrationError, TransformError};
pub use handshake::{
    Completion, CompletionHandshake, HandshakeMonitor, HandshakeReport, HandshakeState, EOS_CODE,
    EOS_CODE_SIZE,
};
pub use listener::{IssueListener, ListenerRegistry, SealedListeners};
pub use transform::{Transform, Writer};
pub use writer::ReplayWriter;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building transform pipelines
    pub use crate::{
        Chain, Completion, CompletionHandshake, IssueListener, ReplayWriter, Transform,
        TransformError, Writer,
    };
    pub use replay_core::{Atom, AtomId, Builder, Value};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
