//! Testing utilities for the replay workspace
//!
//! Shared writers, builders and fixtures.

#![allow(missing_docs)]

use replay_core::{Atom, AtomId, Builder, Issue, Postback, State, Value};
use replay_transform::{IssueListener, TransformError, Writer};
use tokio::sync::mpsc;

/// Writer that keeps every atom it receives, in order
#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub atoms: Vec<(AtomId, Atom)>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> Vec<AtomId> {
        self.atoms.iter().map(|(id, _)| *id).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.atoms.iter().map(|(_, a)| a.name().to_string()).collect()
    }

    /// Remove and return the last atom, which must be custom
    pub fn take_custom(&mut self) -> Atom {
        let (id, atom) = self.atoms.pop().expect("writer recorded no atoms");
        assert_eq!(id, AtomId::NONE, "last atom is not synthetic");
        assert!(atom.is_custom(), "last atom is not custom");
        atom
    }
}

impl Writer for RecordingWriter {
    fn mutate_and_write(&mut self, id: AtomId, atom: Atom) -> Result<(), TransformError> {
        self.atoms.push((id, atom));
        Ok(())
    }
}

/// Builder that captures pushes and parks postbacks for the test to resolve
#[derive(Debug, Default)]
pub struct ScriptedBuilder {
    pub pushed: Vec<Value>,
    pub posts: Vec<Postback>,
}

impl ScriptedBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a custom atom against this builder
    pub fn execute(&mut self, atom: Atom) {
        atom.mutate(&mut State::new(), self).expect("custom atom failed");
    }

    /// Pop the oldest parked postback
    pub fn take_post(&mut self) -> Postback {
        assert!(!self.posts.is_empty(), "no postback parked");
        self.posts.remove(0)
    }
}

impl Builder for ScriptedBuilder {
    fn push(&mut self, value: Value) {
        self.pushed.push(value);
    }

    fn post(&mut self, postback: Postback) {
        self.posts.push(postback);
    }
}

/// `n` recorded atoms with ids `0..n`
pub fn recorded_atoms(n: u64) -> Vec<(AtomId, Atom)> {
    (0..n)
        .map(|i| {
            (
                AtomId::new(i),
                Atom::recorded(format!("cmd{i}"), vec![Value::U64(i)]),
            )
        })
        .collect()
}

/// `n` listeners with their receivers
pub fn listeners(n: usize) -> (Vec<IssueListener>, Vec<mpsc::Receiver<Issue>>) {
    (0..n).map(|_| IssueListener::channel(4)).unzip()
}

/// True if the receiver observed closure
pub fn is_closed(rx: &mut mpsc::Receiver<Issue>) -> bool {
    matches!(
        rx.try_recv(),
        Err(mpsc::error::TryRecvError::Disconnected)
    )
}

/// True if the receiver is still open and empty
pub fn is_open(rx: &mut mpsc::Receiver<Issue>) -> bool {
    matches!(rx.try_recv(), Err(mpsc::error::TryRecvError::Empty))
}
