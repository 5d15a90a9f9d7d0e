//! Boundary to the execution target
//!
//! A [`Builder`] appends work to the outgoing command stream. Two kinds of
//! work exist: scalar pushes, and read-back requests carried by a
//! [`Postback`].
//!
//! # Ordering Contract
//!
//! Implementations must hand work to the executor in submission order, and
//! the executor must drain it in that order with no speculation past a
//! read-back point. A resolved postback therefore proves that everything
//! submitted before it has been executed, not merely queued.

use crate::error::ReadbackError;
use crate::value::Value;
use std::fmt;

/// Outcome delivered to a postback
pub type ReadbackResult = Result<Vec<u8>, ReadbackError>;

type Handler = Box<dyn FnOnce(ReadbackResult) + Send + 'static>;

/// Sink for encoded replay commands
pub trait Builder: Send {
    /// Append a scalar value to the command stream
    fn push(&mut self, value: Value);

    /// Request `postback.size()` bytes of output at this point in the stream
    ///
    /// The postback is resolved later, on a context owned by the executor.
    fn post(&mut self, postback: Postback);
}

/// One-shot continuation for a read-back request
///
/// The handler runs exactly once: either through [`Postback::resolve`], or
/// with [`ReadbackError::Dropped`] if the postback is dropped unresolved.
pub struct Postback {
    size: usize,
    handler: Option<Handler>,
}

impl Postback {
    /// Create a postback expecting `size` bytes
    pub fn new<F>(size: usize, handler: F) -> Self
    where
        F: FnOnce(ReadbackResult) + Send + 'static,
    {
        Self {
            size,
            handler: Some(Box::new(handler)),
        }
    }

    /// Number of bytes requested
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Deliver the read-back result, consuming the postback
    pub fn resolve(mut self, result: ReadbackResult) {
        if let Some(handler) = self.handler.take() {
            handler(result);
        }
    }
}

impl Drop for Postback {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            tracing::warn!(size = self.size, "postback dropped unresolved");
            handler(Err(ReadbackError::Dropped));
        }
    }
}

impl fmt::Debug for Postback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Postback")
            .field("size", &self.size)
            .field("pending", &self.handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn resolve_runs_handler_once() {
        let (tx, rx) = mpsc::channel();
        let postback = Postback::new(4, move |r| tx.send(r).unwrap());
        postback.resolve(Ok(vec![1, 2, 3, 4]));

        assert_eq!(rx.recv().unwrap(), Ok(vec![1, 2, 3, 4]));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn drop_resolves_with_dropped() {
        let (tx, rx) = mpsc::channel();
        drop(Postback::new(4, move |r| tx.send(r).unwrap()));

        assert_eq!(rx.recv().unwrap(), Err(ReadbackError::Dropped));
    }

    #[test]
    fn debug_shows_pending() {
        let postback = Postback::new(8, |_| {});
        assert!(format!("{postback:?}").contains("pending: true"));
        postback.resolve(Ok(vec![]));
    }
}
