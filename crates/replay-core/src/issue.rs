//! Issues reported by transforms to their listeners

use crate::id::AtomId;
use serde::{Deserialize, Serialize};

/// Severity of a replay issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational
    Info,
    /// Suspicious but not fatal
    Warning,
    /// The replay produced wrong results
    Error,
}

/// A problem found while replaying an atom stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Atom the issue refers to
    pub atom: AtomId,
    /// Severity
    pub severity: Severity,
    /// Human readable description
    pub message: String,
}

impl Issue {
    /// Create a new issue
    #[inline]
    pub fn new(atom: AtomId, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            atom,
            severity,
            message: message.into(),
        }
    }
}
