//! Error types shared across the pipeline

use crate::id::AtomId;

/// Errors raised while applying atoms to the pipeline
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// A recorded atom arrived with an id not greater than its predecessor
    #[error("atom {next} arrived after atom {previous}")]
    OutOfOrder {
        /// Last applied id
        previous: AtomId,
        /// Offending id
        next: AtomId,
    },

    /// A custom atom's closure failed
    #[error("custom atom '{label}' failed: {message}")]
    Custom {
        /// Label of the custom atom
        label: &'static str,
        /// Failure description
        message: String,
    },
}

impl ReplayError {
    /// Create a custom atom failure
    pub fn custom(label: &'static str, message: impl Into<String>) -> Self {
        Self::Custom {
            label,
            message: message.into(),
        }
    }
}

/// Failure delivered to a [`Postback`](crate::Postback) instead of bytes
///
/// This is the transport error kind: the executor could not produce the
/// requested read-back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadbackError {
    /// The stream was aborted before the read-back point was reached
    #[error("stream aborted before read-back")]
    Aborted,

    /// The executor went away before the request could be queued
    #[error("executor disconnected")]
    Disconnected,

    /// The postback was dropped without being resolved
    #[error("postback dropped unresolved")]
    Dropped,

    /// The value at the read-back point has a different size
    #[error("read-back size mismatch: requested {requested} bytes, value has {actual}")]
    SizeMismatch {
        /// Bytes requested by the postback
        requested: usize,
        /// Bytes available at the read-back point
        actual: usize,
    },

    /// Nothing was pushed before the read-back point
    #[error("read-back with empty value stack")]
    EmptyStack,

    /// Transport specific failure
    #[error("transport error: {0}")]
    Transport(String),
}
