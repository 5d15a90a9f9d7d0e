//! Atom identifiers

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Identifier of a recorded atom
///
/// Real identifiers are assigned in capture order and only ever grow within
/// one replay. [`AtomId::NONE`] marks work that has no recorded counterpart,
/// such as the synthetic atoms emitted by a transform's flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AtomId(u64);

impl AtomId {
    /// Reserved id for synthetic atoms. Never assigned to a recorded atom.
    pub const NONE: AtomId = AtomId(u64::MAX);

    /// Largest id a recorded atom can carry
    pub const MAX: AtomId = AtomId(u64::MAX - 1);

    /// Create an id for a recorded atom
    ///
    /// # Panics
    /// Panics if `value` is `u64::MAX`, which is reserved for
    /// [`AtomId::NONE`]. Use [`AtomId::checked`] for untrusted values.
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        assert!(value != u64::MAX, "u64::MAX is reserved for AtomId::NONE");
        Self(value)
    }

    /// Create an id for a recorded atom, or `None` for the reserved value
    #[inline]
    #[must_use]
    pub const fn checked(value: u64) -> Option<Self> {
        if value == u64::MAX {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Raw value
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// True for ids of recorded atoms
    #[inline]
    #[must_use]
    pub const fn is_real(self) -> bool {
        self.0 != Self::NONE.0
    }

    /// The id following this one, if any
    #[inline]
    #[must_use]
    pub fn next(self) -> Option<Self> {
        if self.0 >= Self::MAX.0 {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }
}

impl Display for AtomId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_real() {
            write!(f, "{}", self.0)
        } else {
            f.write_str("NoID")
        }
    }
}

/// Error converting a raw value into a recorded atom id
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("atom id {0} is reserved for synthetic atoms")]
pub struct ReservedAtomId(pub u64);

impl TryFrom<u64> for AtomId {
    type Error = ReservedAtomId;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::checked(value).ok_or(ReservedAtomId(value))
    }
}
