//! Terminal writer feeding the execution target

use crate::error::TransformError;
use crate::transform::Writer;
use replay_core::{Atom, AtomId, Builder, State};

/// Writer at the end of a transform chain
///
/// Checks id ordering against [`State`], then applies each atom's effect to
/// the builder. Custom atoms receive the builder as their side channel to the
/// executor.
#[derive(Debug)]
pub struct ReplayWriter<B> {
    state: State,
    builder: B,
}

impl<B: Builder> ReplayWriter<B> {
    /// Create a writer over `builder`
    #[inline]
    #[must_use]
    pub fn new(builder: B) -> Self {
        Self {
            state: State::new(),
            builder,
        }
    }

    /// Pipeline state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Underlying builder
    #[inline]
    #[must_use]
    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Split into state and builder
    #[must_use]
    pub fn into_parts(self) -> (State, B) {
        (self.state, self.builder)
    }
}

impl<B: Builder> Writer for ReplayWriter<B> {
    fn mutate_and_write(&mut self, id: AtomId, atom: Atom) -> Result<(), TransformError> {
        self.state.advance(id)?;
        if !id.is_real() {
            tracing::debug!(atom = atom.name(), "applying synthetic atom");
        }
        atom.mutate(&mut self.state, &mut self.builder)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replay_core::{Postback, ReplayError, Value};

    #[derive(Debug, Default)]
    struct Pushes(Vec<Value>);

    impl Builder for Pushes {
        fn push(&mut self, value: Value) {
            self.0.push(value);
        }

        fn post(&mut self, postback: Postback) {
            postback.resolve(Ok(Vec::new()));
        }
    }

    #[test]
    fn applies_recorded_atoms() {
        let mut writer = ReplayWriter::new(Pushes::default());
        writer
            .mutate_and_write(AtomId::new(0), Atom::recorded("a", vec![Value::U8(1)]))
            .unwrap();
        writer
            .mutate_and_write(AtomId::new(1), Atom::recorded("b", vec![Value::U8(2)]))
            .unwrap();

        assert_eq!(writer.builder().0, vec![Value::U8(1), Value::U8(2)]);
        assert_eq!(writer.state().recorded_count(), 2);
    }

    #[test]
    fn rejects_out_of_order_ids() {
        let mut writer = ReplayWriter::new(Pushes::default());
        writer
            .mutate_and_write(AtomId::new(4), Atom::recorded("a", vec![]))
            .unwrap();
        let err = writer
            .mutate_and_write(AtomId::new(2), Atom::recorded("b", vec![]))
            .unwrap_err();

        assert!(matches!(
            err,
            TransformError::Replay(ReplayError::OutOfOrder { .. })
        ));
    }

    #[test]
    fn custom_atoms_reach_the_builder() {
        let mut writer = ReplayWriter::new(Pushes::default());
        writer
            .mutate_and_write(
                AtomId::NONE,
                Atom::custom("marker", |_, b| {
                    b.push(Value::U32(7));
                    Ok(())
                }),
            )
            .unwrap();

        let (state, builder) = writer.into_parts();
        assert_eq!(builder.0, vec![Value::U32(7)]);
        assert_eq!(state.synthetic_count(), 1);
    }
}
