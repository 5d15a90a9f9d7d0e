//! Error types for transforms and the completion handshake

use crate::listener::IssueListener;
use replay_core::{ReadbackError, ReplayError};

/// Errors raised while running atoms through transforms
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// Applying an atom failed
    #[error("replay failed: {0}")]
    Replay(#[from] ReplayError),

    /// Listener registration was rejected
    #[error("registration rejected: {0}")]
    Registration(#[from] RegistrationError),

    /// `flush` was called more than once
    #[error("transform '{0}' already flushed")]
    AlreadyFlushed(&'static str),
}

/// Listener registration misuse
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// The registry was sealed by `flush`; the listener is handed back untouched
    #[error("listener registered after flush")]
    Sealed(IssueListener),
}

impl RegistrationError {
    /// Recover the rejected listener
    #[must_use]
    pub fn into_listener(self) -> IssueListener {
        match self {
            Self::Sealed(listener) => listener,
        }
    }
}

/// Why the end-of-stream handshake did not confirm completion
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandshakeError {
    /// The executor failed to deliver the read-back
    #[error("read-back failed: {0}")]
    Transport(#[from] ReadbackError),

    /// The echoed value is not the end-of-stream code
    #[error("end-of-stream code mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Mismatch {
        /// Code that was pushed
        expected: u32,
        /// Code that came back
        actual: u32,
    },

    /// The read-back had the wrong length to hold the code
    #[error("end-of-stream read-back truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes expected
        expected: usize,
        /// Bytes received
        actual: usize,
    },

    /// The synthetic atom was dropped without being executed
    #[error("handshake abandoned before reaching the executor")]
    Abandoned,
}

/// Failed handshake
///
/// Listeners are not closed on failure: the status of the replay is unknown,
/// not finished. They are handed back so the owner decides how to time out or
/// clean up.
#[derive(Debug, thiserror::Error)]
#[error("end-of-stream handshake failed")]
pub struct HandshakeFailure {
    #[source]
    error: HandshakeError,
    listeners: Vec<IssueListener>,
}

impl HandshakeFailure {
    pub(crate) fn new(error: HandshakeError, listeners: Vec<IssueListener>) -> Self {
        Self { error, listeners }
    }

    /// Why the handshake failed
    #[inline]
    #[must_use]
    pub fn error(&self) -> &HandshakeError {
        &self.error
    }

    /// Number of listeners left open
    #[inline]
    #[must_use]
    pub fn open_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Take ownership of the listeners that were left open
    #[must_use]
    pub fn into_listeners(self) -> Vec<IssueListener> {
        self.listeners
    }
}
