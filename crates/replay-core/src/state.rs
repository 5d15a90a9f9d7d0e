//! Pipeline state atoms are applied against

use crate::error::ReplayError;
use crate::id::AtomId;

/// Mutable state threaded through atom application
///
/// Tracks the ordering of recorded atoms; synthetic atoms
/// ([`AtomId::NONE`]) do not participate in the ordering check.
#[derive(Debug, Clone, Default)]
pub struct State {
    last_applied: Option<AtomId>,
    recorded: u64,
    synthetic: u64,
}

impl State {
    /// Create empty state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `id` is being applied
    ///
    /// # Errors
    /// Returns [`ReplayError::OutOfOrder`] if `id` is a real id not greater
    /// than the last applied one.
    pub fn advance(&mut self, id: AtomId) -> Result<(), ReplayError> {
        if !id.is_real() {
            self.synthetic += 1;
            return Ok(());
        }
        if let Some(previous) = self.last_applied {
            if id <= previous {
                return Err(ReplayError::OutOfOrder { previous, next: id });
            }
        }
        self.last_applied = Some(id);
        self.recorded += 1;
        Ok(())
    }

    /// Last recorded atom applied
    #[inline]
    #[must_use]
    pub fn last_applied(&self) -> Option<AtomId> {
        self.last_applied
    }

    /// Number of recorded atoms applied
    #[inline]
    #[must_use]
    pub fn recorded_count(&self) -> u64 {
        self.recorded
    }

    /// Number of synthetic atoms applied
    #[inline]
    #[must_use]
    pub fn synthetic_count(&self) -> u64 {
        self.synthetic
    }
}
