//! Replay Core
//!
//! The vocabulary shared by every stage of the replay pipeline.
//!
//! # Core Concepts
//!
//! - [`AtomId`]: Ordered identifier of a recorded atom, or [`AtomId::NONE`] for synthetic work
//! - [`Atom`]: A recorded call or a [`Custom`] closure injected by a transform
//! - [`Builder`]: The boundary to the execution target (value pushes and read-backs)
//! - [`Postback`]: One-shot continuation resolved by the executor with read-back bytes
//! - [`State`]: Pipeline state that atoms are applied against
//! - [`ContentId`]: Content address used by resource resolvers
//!
//! # Example
//!
//! ```rust,ignore
//! use replay_core::{Atom, AtomId, Value};
//!
//! let atom = Atom::recorded("vkQueueSubmit", vec![Value::U32(1)]);
//! writer.mutate_and_write(AtomId::new(0), atom)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod atom;
mod builder;
mod content;
mod error;
mod id;
mod issue;
mod state;
mod value;

// Re-exports
pub use atom::{Atom, Custom, Recorded};
pub use builder::{Builder, Postback, ReadbackResult};
pub use content::{ContentId, ContentIdError};
pub use error::{ReadbackError, ReplayError};
pub use id::{AtomId, ReservedAtomId};
pub use issue::{Issue, Severity};
pub use state::State;
pub use value::Value;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
