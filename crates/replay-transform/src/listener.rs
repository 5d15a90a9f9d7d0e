//! Issue listeners and their registry
//!
//! A listener is the sending half of an issue channel. Closing a listener
//! means dropping that sender; receivers observe the end of the stream once
//! every sender for their channel is gone, so the registry should hold the
//! only sender.

use crate::error::RegistrationError;
use replay_core::Issue;
use tokio::sync::mpsc;

/// Sending half of an issue channel
#[derive(Debug)]
pub struct IssueListener {
    tx: mpsc::Sender<Issue>,
}

impl IssueListener {
    /// Wrap an existing sender
    #[inline]
    #[must_use]
    pub fn new(tx: mpsc::Sender<Issue>) -> Self {
        Self { tx }
    }

    /// Create a listener and the receiver observing it
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Issue>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// True once the receiving side has gone away
    #[inline]
    #[must_use]
    pub fn is_receiver_gone(&self) -> bool {
        self.tx.is_closed()
    }

    /// Close this listener, signalling "stream ended"
    #[inline]
    pub fn close(self) {
        drop(self.tx);
    }
}

impl From<mpsc::Sender<Issue>> for IssueListener {
    fn from(tx: mpsc::Sender<Issue>) -> Self {
        Self::new(tx)
    }
}

/// Listeners registered before a run
///
/// Open until [`seal`](Self::seal) moves the listeners out; registrations
/// after that are rejected.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    listeners: Vec<IssueListener>,
    sealed: bool,
}

impl ListenerRegistry {
    /// Create an empty, open registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener
    ///
    /// # Errors
    /// Returns [`RegistrationError::Sealed`], carrying the listener back, if
    /// the registry is sealed.
    pub fn register(&mut self, listener: IssueListener) -> Result<(), RegistrationError> {
        if self.sealed {
            return Err(RegistrationError::Sealed(listener));
        }
        self.listeners.push(listener);
        Ok(())
    }

    /// Number of registered listeners
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True if nothing is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// True once sealed
    #[inline]
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Seal the registry, moving the listeners out
    pub fn seal(&mut self) -> SealedListeners {
        self.sealed = true;
        SealedListeners {
            listeners: std::mem::take(&mut self.listeners),
        }
    }
}

/// Immutable snapshot of the listeners taken at seal time
#[derive(Debug)]
pub struct SealedListeners {
    listeners: Vec<IssueListener>,
}

impl SealedListeners {
    /// Number of listeners
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Close every listener, returning how many were closed
    pub fn close_all(self) -> usize {
        let count = self.listeners.len();
        for listener in self.listeners {
            listener.close();
        }
        count
    }

    /// Release the listeners without closing them
    #[must_use]
    pub fn into_vec(self) -> Vec<IssueListener> {
        self.listeners
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;

    #[test]
    fn seal_rejects_late_registration() {
        let mut registry = ListenerRegistry::new();
        let (early, _early_rx) = IssueListener::channel(1);
        registry.register(early).unwrap();

        let sealed = registry.seal();
        assert_eq!(sealed.len(), 1);
        assert!(registry.is_sealed());
        assert!(registry.is_empty());

        let (late, mut late_rx) = IssueListener::channel(1);
        let err = registry.register(late).unwrap_err();
        let late = err.into_listener();

        // The rejected listener is still open.
        assert_eq!(late_rx.try_recv().unwrap_err(), TryRecvError::Empty);
        drop(late);
        assert_eq!(late_rx.try_recv().unwrap_err(), TryRecvError::Disconnected);
    }

    #[test]
    fn close_all_disconnects_receivers() {
        let mut registry = ListenerRegistry::new();
        let (a, mut a_rx) = IssueListener::channel(1);
        let (b, mut b_rx) = IssueListener::channel(1);
        registry.register(a).unwrap();
        registry.register(b).unwrap();

        assert_eq!(registry.seal().close_all(), 2);
        assert_eq!(a_rx.try_recv().unwrap_err(), TryRecvError::Disconnected);
        assert_eq!(b_rx.try_recv().unwrap_err(), TryRecvError::Disconnected);
    }

    #[test]
    fn into_vec_keeps_listeners_open() {
        let mut registry = ListenerRegistry::new();
        let (a, mut a_rx) = IssueListener::channel(1);
        registry.register(a).unwrap();

        let kept = registry.seal().into_vec();
        assert_eq!(a_rx.try_recv().unwrap_err(), TryRecvError::Empty);
        drop(kept);
        assert_eq!(a_rx.try_recv().unwrap_err(), TryRecvError::Disconnected);
    }

    #[test]
    fn notices_dropped_receiver() {
        let (listener, rx) = IssueListener::channel(1);
        assert!(!listener.is_receiver_gone());
        drop(rx);
        assert!(listener.is_receiver_gone());
    }
}
