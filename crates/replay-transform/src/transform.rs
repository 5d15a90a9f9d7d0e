//! Transform and writer contracts

use crate::error::TransformError;
use replay_core::{Atom, AtomId};

/// Destination of a transform's output
pub trait Writer {
    /// Apply the atom's effect and forward it toward the executor
    ///
    /// Atoms must be forwarded in the order they are written.
    ///
    /// # Errors
    /// Returns an error if the atom could not be applied.
    fn mutate_and_write(&mut self, id: AtomId, atom: Atom) -> Result<(), TransformError>;
}

/// A stage of the replay pipeline
///
/// `transform` is called once per atom, in id order, on a single thread of
/// control. `flush` is called exactly once after the last atom and may write
/// synthetic atoms tagged [`AtomId::NONE`].
pub trait Transform: Send {
    /// Process one atom, writing zero or more atoms to `out`
    ///
    /// # Errors
    /// Propagates failures of the downstream writer.
    fn transform(&mut self, id: AtomId, atom: Atom, out: &mut dyn Writer)
        -> Result<(), TransformError>;

    /// Emit trailing work after the last atom
    ///
    /// # Errors
    /// Propagates downstream failures; transforms may reject a second flush.
    fn flush(&mut self, out: &mut dyn Writer) -> Result<(), TransformError>;

    /// Transform name (for logging)
    fn name(&self) -> &'static str;
}
