//! End-of-stream completion handshake
//!
//! Forwarding the last atom only proves it was *queued*. The executor may
//! still be working through buffered commands long after the producer is
//! done. To prove completion, [`CompletionHandshake`] appends one synthetic
//! atom at flush that pushes [`EOS_CODE`] and asks for it back. Because the
//! executor drains strictly in submission order, the echo can only arrive
//! after every preceding atom has run.
//!
//! # State Machine
//!
//! ```text
//! Idle --flush--> AwaitingConfirmation --echo ok--> Completed
//!                                      \--error---> Failed
//! ```
//!
//! Listeners are closed only on `Completed`. On any other ending (read-back
//! error, mismatch, the synthetic atom dropped unexecuted, the transform
//! dropped unflushed) they are handed back, still open, through
//! [`HandshakeFailure::into_listeners`]. If the [`Completion`] was dropped
//! and cannot take them, they are parked for
//! [`HandshakeMonitor::take_unconfirmed`].

use crate::error::{HandshakeError, HandshakeFailure, RegistrationError, TransformError};
use crate::listener::{IssueListener, ListenerRegistry, SealedListeners};
use crate::transform::{Transform, Writer};
use parking_lot::Mutex;
use replay_core::{Atom, AtomId, Postback, Value};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Value pushed at end of stream and expected back verbatim
pub const EOS_CODE: u32 = 0xE11D_E11D;

/// Encoded size of [`EOS_CODE`]; push size and read-back size must agree
pub const EOS_CODE_SIZE: usize = std::mem::size_of::<u32>();

const HANDSHAKE_LABEL: &str = "eos-handshake";

type Outcome = Result<HandshakeReport, HandshakeFailure>;

/// Progress of the handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandshakeState {
    /// Forwarding atoms; listeners may still register
    Idle,
    /// Flushed; waiting for the executor to echo the code
    AwaitingConfirmation,
    /// Code echoed; listeners closed
    Completed,
    /// Handshake failed; listeners left open
    Failed,
}

/// Successful handshake summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeReport {
    /// Number of listeners closed
    pub listeners_closed: usize,
}

#[derive(Debug)]
struct Shared {
    state: HandshakeState,
    unconfirmed: Vec<IssueListener>,
}

/// Transparent transform confirming downstream completion at end of stream
///
/// Created once per replay. Register listeners with
/// [`report_to`](Self::report_to) before the run; they are closed together,
/// exactly once, when the executor echoes the end-of-stream code.
#[derive(Debug)]
pub struct CompletionHandshake {
    registry: ListenerRegistry,
    shared: Arc<Mutex<Shared>>,
    outcome: Option<oneshot::Sender<Outcome>>,
}

impl CompletionHandshake {
    /// Create the transform and the future resolving with its outcome
    #[must_use]
    pub fn new() -> (Self, Completion) {
        let (tx, rx) = oneshot::channel();
        let transform = Self {
            registry: ListenerRegistry::new(),
            shared: Arc::new(Mutex::new(Shared {
                state: HandshakeState::Idle,
                unconfirmed: Vec::new(),
            })),
            outcome: Some(tx),
        };
        (transform, Completion { rx })
    }

    /// Add a listener to close on confirmed completion
    ///
    /// # Errors
    /// Returns [`RegistrationError::Sealed`] after flush, handing the
    /// listener back untouched.
    pub fn report_to(&mut self, listener: impl Into<IssueListener>) -> Result<(), RegistrationError> {
        self.registry.register(listener.into())
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> HandshakeState {
        self.shared.lock().state
    }

    /// Listeners registered and not yet sealed
    #[inline]
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    /// Handle observing this handshake after the transform is moved into a chain
    #[must_use]
    pub fn monitor(&self) -> HandshakeMonitor {
        HandshakeMonitor {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Drop for CompletionHandshake {
    fn drop(&mut self) {
        // Never flushed: nothing was confirmed, so the listeners fail open.
        if let Some(outcome) = self.outcome.take() {
            Pending::new(self.registry.seal(), outcome, Arc::clone(&self.shared))
                .resolve(Err(HandshakeError::Abandoned));
        }
    }
}

impl Transform for CompletionHandshake {
    fn transform(
        &mut self,
        id: AtomId,
        atom: Atom,
        out: &mut dyn Writer,
    ) -> Result<(), TransformError> {
        out.mutate_and_write(id, atom)
    }

    fn flush(&mut self, out: &mut dyn Writer) -> Result<(), TransformError> {
        let outcome = self
            .outcome
            .take()
            .ok_or(TransformError::AlreadyFlushed(self.name()))?;
        let listeners = self.registry.seal();
        self.shared.lock().state = HandshakeState::AwaitingConfirmation;
        tracing::debug!(listeners = listeners.len(), "emitting end-of-stream handshake");

        let pending = Pending::new(listeners, outcome, Arc::clone(&self.shared));
        let atom = Atom::custom(HANDSHAKE_LABEL, move |_, builder| {
            builder.push(Value::U32(EOS_CODE));
            builder.post(Postback::new(EOS_CODE_SIZE, move |result| {
                let verdict = result
                    .map_err(HandshakeError::from)
                    .and_then(|bytes| check_eos(&bytes));
                pending.resolve(verdict);
            }));
            Ok(())
        });

        // A rejected atom is dropped by the writer, which fails `pending`.
        out.mutate_and_write(AtomId::NONE, atom)
    }

    fn name(&self) -> &'static str {
        "completion-handshake"
    }
}

/// Listeners and outcome sender awaiting the read-back
///
/// Resolves exactly once. Dropped unresolved, it resolves as
/// [`HandshakeError::Abandoned`] so the listeners are handed back open.
struct Pending {
    parts: Option<(SealedListeners, oneshot::Sender<Outcome>)>,
    shared: Arc<Mutex<Shared>>,
}

impl Pending {
    fn new(
        listeners: SealedListeners,
        outcome: oneshot::Sender<Outcome>,
        shared: Arc<Mutex<Shared>>,
    ) -> Self {
        Self {
            parts: Some((listeners, outcome)),
            shared,
        }
    }

    fn resolve(mut self, verdict: Result<(), HandshakeError>) {
        self.finish(verdict);
    }

    fn finish(&mut self, verdict: Result<(), HandshakeError>) {
        let Some((listeners, outcome)) = self.parts.take() else {
            return;
        };
        let mut shared = self.shared.lock();

        let message = match verdict {
            Ok(()) => {
                shared.state = HandshakeState::Completed;
                let closed = listeners.close_all();
                tracing::info!(listeners = closed, "end of stream confirmed");
                Ok(HandshakeReport {
                    listeners_closed: closed,
                })
            }
            Err(error) => {
                shared.state = HandshakeState::Failed;
                tracing::warn!(%error, listeners = listeners.len(), "end-of-stream handshake failed");
                Err(HandshakeFailure::new(error, listeners.into_vec()))
            }
        };

        if let Err(undelivered) = outcome.send(message) {
            tracing::warn!("completion handle dropped before the handshake resolved");
            if let Err(failure) = undelivered {
                shared.unconfirmed.extend(failure.into_listeners());
            }
        }
    }
}

impl Drop for Pending {
    fn drop(&mut self) {
        self.finish(Err(HandshakeError::Abandoned));
    }
}

fn check_eos(bytes: &[u8]) -> Result<(), HandshakeError> {
    let raw: [u8; EOS_CODE_SIZE] = bytes.try_into().map_err(|_| HandshakeError::Truncated {
        expected: EOS_CODE_SIZE,
        actual: bytes.len(),
    })?;
    let actual = u32::from_le_bytes(raw);
    if actual != EOS_CODE {
        return Err(HandshakeError::Mismatch {
            expected: EOS_CODE,
            actual,
        });
    }
    Ok(())
}

/// Observer of a [`CompletionHandshake`] that outlives the transform
#[derive(Debug, Clone)]
pub struct HandshakeMonitor {
    shared: Arc<Mutex<Shared>>,
}

impl HandshakeMonitor {
    /// Current state
    #[must_use]
    pub fn state(&self) -> HandshakeState {
        self.shared.lock().state
    }

    /// Take the listeners of a failed handshake whose [`Completion`] was dropped
    ///
    /// They stay open while parked. Parked listeners are closed once the
    /// transform and every monitor are gone.
    #[must_use]
    pub fn take_unconfirmed(&self) -> Vec<IssueListener> {
        std::mem::take(&mut self.shared.lock().unconfirmed)
    }
}

/// Outcome of a [`CompletionHandshake`]
///
/// Resolves once the read-back is delivered, or with
/// [`HandshakeError::Abandoned`] if the synthetic atom is dropped before it
/// reaches a builder.
#[derive(Debug)]
#[must_use = "the completion reports whether the replay finished"]
pub struct Completion {
    rx: oneshot::Receiver<Outcome>,
}

impl Completion {
    /// Non-blocking check; `None` while still pending
    pub fn try_outcome(&mut self) -> Option<Outcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(abandoned())),
        }
    }
}

impl Future for Completion {
    type Output = Outcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(abandoned())))
    }
}

fn abandoned() -> HandshakeFailure {
    HandshakeFailure::new(HandshakeError::Abandoned, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use replay_core::{Builder, Issue, ReadbackError, State};
    use tokio::sync::mpsc;
    use tokio::sync::mpsc::error::TryRecvError;

    /// Captures pushes and postbacks so tests decide what the executor echoes
    #[derive(Debug, Default)]
    struct Capture {
        pushed: Vec<Value>,
        posts: Vec<Postback>,
    }

    impl Builder for Capture {
        fn push(&mut self, value: Value) {
            self.pushed.push(value);
        }

        fn post(&mut self, postback: Postback) {
            self.posts.push(postback);
        }
    }

    #[derive(Debug, Default)]
    struct Keep(Vec<(AtomId, Atom)>);

    impl Writer for Keep {
        fn mutate_and_write(&mut self, id: AtomId, atom: Atom) -> Result<(), TransformError> {
            self.0.push((id, atom));
            Ok(())
        }
    }

    type Receivers = Vec<mpsc::Receiver<Issue>>;

    fn with_listeners(n: usize) -> (CompletionHandshake, Completion, Receivers) {
        let (mut handshake, completion) = CompletionHandshake::new();
        let mut receivers = Vec::new();
        for _ in 0..n {
            let (listener, rx) = IssueListener::channel(1);
            handshake.report_to(listener).unwrap();
            receivers.push(rx);
        }
        assert_eq!(handshake.listener_count(), n);
        (handshake, completion, receivers)
    }

    fn flushed_with_listeners(n: usize) -> (CompletionHandshake, Completion, Capture, Receivers) {
        let (mut handshake, completion, receivers) = with_listeners(n);

        let mut keep = Keep::default();
        handshake.flush(&mut keep).unwrap();
        let (id, atom) = keep.0.pop().unwrap();
        assert_eq!(id, AtomId::NONE);

        let mut capture = Capture::default();
        atom.mutate(&mut State::new(), &mut capture).unwrap();
        (handshake, completion, capture, receivers)
    }

    #[test]
    fn flush_pushes_code_then_posts_four_bytes() {
        let (handshake, _completion, capture, _rx) = flushed_with_listeners(0);
        assert_eq!(capture.pushed, vec![Value::U32(EOS_CODE)]);
        assert_eq!(capture.posts.len(), 1);
        assert_eq!(capture.posts[0].size(), EOS_CODE_SIZE);
        assert_eq!(handshake.state(), HandshakeState::AwaitingConfirmation);
    }

    #[test]
    fn echo_closes_listeners() {
        let (handshake, mut completion, mut capture, mut rx) = flushed_with_listeners(2);
        assert!(completion.try_outcome().is_none());

        let post = capture.posts.pop().unwrap();
        post.resolve(Ok(EOS_CODE.to_le_bytes().to_vec()));

        let report = completion.try_outcome().unwrap().unwrap();
        assert_eq!(report.listeners_closed, 2);
        assert_eq!(handshake.state(), HandshakeState::Completed);
        for r in &mut rx {
            assert_eq!(r.try_recv().unwrap_err(), TryRecvError::Disconnected);
        }
    }

    #[test]
    fn mismatch_leaves_listeners_open() {
        let (handshake, mut completion, mut capture, mut rx) = flushed_with_listeners(2);
        capture.posts.pop().unwrap().resolve(Ok(vec![0, 0, 0, 0]));

        let failure = completion.try_outcome().unwrap().unwrap_err();
        assert_eq!(
            failure.error(),
            &HandshakeError::Mismatch {
                expected: EOS_CODE,
                actual: 0
            }
        );
        assert_eq!(handshake.state(), HandshakeState::Failed);
        for r in &mut rx {
            assert_eq!(r.try_recv().unwrap_err(), TryRecvError::Empty);
        }
        assert_eq!(failure.into_listeners().len(), 2);
    }

    #[test]
    fn truncated_readback_is_reported() {
        let (_handshake, mut completion, mut capture, _rx) = flushed_with_listeners(0);
        capture.posts.pop().unwrap().resolve(Ok(vec![0x1D, 0xE1]));

        let failure = completion.try_outcome().unwrap().unwrap_err();
        assert_eq!(
            failure.error(),
            &HandshakeError::Truncated {
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn transport_error_is_surfaced() {
        let (_handshake, mut completion, mut capture, mut rx) = flushed_with_listeners(1);
        capture.posts.pop().unwrap().resolve(Err(ReadbackError::Aborted));

        let failure = completion.try_outcome().unwrap().unwrap_err();
        assert_eq!(failure.error(), &HandshakeError::Transport(ReadbackError::Aborted));
        assert_eq!(rx[0].try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[test]
    fn dropped_atom_hands_listeners_back_open() {
        let (mut handshake, mut completion, mut rx) = with_listeners(1);
        let mut keep = Keep::default();
        handshake.flush(&mut keep).unwrap();
        assert_eq!(handshake.listener_count(), 0);
        drop(keep);

        let failure = completion.try_outcome().unwrap().unwrap_err();
        assert_eq!(failure.error(), &HandshakeError::Abandoned);
        assert_eq!(failure.open_listeners(), 1);
        assert_eq!(rx[0].try_recv().unwrap_err(), TryRecvError::Empty);
        assert_eq!(handshake.state(), HandshakeState::Failed);
    }

    #[test]
    fn unflushed_transform_fails_open() {
        let (handshake, mut completion, mut rx) = with_listeners(2);
        drop(handshake);

        let failure = completion.try_outcome().unwrap().unwrap_err();
        assert_eq!(failure.error(), &HandshakeError::Abandoned);
        assert_eq!(failure.open_listeners(), 2);
        for r in &mut rx {
            assert_eq!(r.try_recv().unwrap_err(), TryRecvError::Empty);
        }
    }

    #[test]
    fn failure_without_completion_parks_listeners() {
        let (handshake, completion, mut capture, mut rx) = flushed_with_listeners(2);
        let monitor = handshake.monitor();
        drop(completion);
        drop(handshake);

        capture.posts.pop().unwrap().resolve(Ok(vec![0, 0, 0, 0]));

        assert_eq!(monitor.state(), HandshakeState::Failed);
        for r in &mut rx {
            assert_eq!(r.try_recv().unwrap_err(), TryRecvError::Empty);
        }
        let parked = monitor.take_unconfirmed();
        assert_eq!(parked.len(), 2);
        assert!(monitor.take_unconfirmed().is_empty());

        drop(parked);
        for r in &mut rx {
            assert_eq!(r.try_recv().unwrap_err(), TryRecvError::Disconnected);
        }
    }

    #[test]
    fn success_without_completion_still_closes() {
        let (handshake, completion, mut capture, mut rx) = flushed_with_listeners(1);
        let monitor = handshake.monitor();
        drop(completion);

        capture
            .posts
            .pop()
            .unwrap()
            .resolve(Ok(EOS_CODE.to_le_bytes().to_vec()));
        assert_eq!(monitor.state(), HandshakeState::Completed);
        assert!(monitor.take_unconfirmed().is_empty());
        assert_eq!(rx[0].try_recv().unwrap_err(), TryRecvError::Disconnected);
    }

    #[test]
    fn second_flush_is_rejected() {
        let (mut handshake, _completion) = CompletionHandshake::new();
        let mut keep = Keep::default();
        handshake.flush(&mut keep).unwrap();

        let err = handshake.flush(&mut keep).unwrap_err();
        assert!(matches!(err, TransformError::AlreadyFlushed("completion-handshake")));
        assert_eq!(keep.0.len(), 1);
    }

    #[test]
    fn registration_after_flush_is_rejected() {
        let (mut handshake, _completion) = CompletionHandshake::new();
        handshake.flush(&mut Keep::default()).unwrap();

        let (late, mut late_rx) = IssueListener::channel(1);
        let err = handshake.report_to(late).unwrap_err();
        assert!(matches!(err, RegistrationError::Sealed(_)));
        let _kept = err.into_listener();
        assert_eq!(late_rx.try_recv().unwrap_err(), TryRecvError::Empty);
    }
}
