//! Builder feeding the executor task

use crate::command::Command;
use replay_core::{Builder, Postback, ReadbackError, Value};
use tokio::sync::mpsc;

/// Ordered command channel into an [`Executor`](crate::Executor)
///
/// Clones share the same FIFO, so ordering holds across clones only for
/// commands issued from one thread of control.
#[derive(Debug, Clone)]
pub struct CommandStream {
    tx: mpsc::UnboundedSender<Command>,
}

impl CommandStream {
    pub(crate) fn new(tx: mpsc::UnboundedSender<Command>) -> Self {
        Self { tx }
    }

    /// True once the executor stopped accepting commands
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Builder for CommandStream {
    fn push(&mut self, value: Value) {
        if self.tx.send(Command::Push(value)).is_err() {
            tracing::debug!(?value, "executor gone; push dropped");
        }
    }

    fn post(&mut self, postback: Postback) {
        if let Err(mpsc::error::SendError(Command::Post(postback))) =
            self.tx.send(Command::Post(postback))
        {
            postback.resolve(Err(ReadbackError::Disconnected));
        }
    }
}
