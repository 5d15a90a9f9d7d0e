//! Executor task
//!
//! # Ordering
//!
//! Commands are received from a single FIFO and executed one at a time, in
//! submission order. A read-back is served only after every earlier command
//! has completed; nothing after it runs until it has been resolved.
//!
//! # Abort
//!
//! After [`ExecutorHandle::abort`] the executor stops executing, closes its
//! queue and resolves every pending read-back with
//! [`ReadbackError::Aborted`]. Read-backs submitted after that are resolved by
//! the stream itself with [`ReadbackError::Disconnected`].

use crate::command::Command;
use crate::config::{ExecutorConfig, Fault};
use crate::error::ExecutorError;
use crate::stream::CommandStream;
use replay_core::{Postback, ReadbackError, ReadbackResult, Value};
use std::ops::ControlFlow;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Statistics of one executor run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Commands executed (not counting discarded ones)
    pub commands_executed: u64,
    /// Values pushed
    pub values_pushed: u64,
    /// Read-backs resolved with bytes
    pub posts_served: u64,
    /// Read-backs resolved with an error
    pub posts_failed: u64,
    /// True if the run ended by abort
    pub aborted: bool,
}

/// Spawns executor tasks
#[derive(Debug, Clone, Copy)]
pub struct Executor;

impl Executor {
    /// Start an executor on the current tokio runtime
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(config: ExecutorConfig) -> (CommandStream, ExecutorHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (abort_tx, abort_rx) = oneshot::channel();
        tracing::debug!(?config, "spawning executor");
        let task = tokio::spawn(run(Machine::new(config), rx, abort_rx));
        (
            CommandStream::new(tx),
            ExecutorHandle {
                abort: Some(abort_tx),
                task,
            },
        )
    }
}

/// Control handle of a running executor
#[derive(Debug)]
pub struct ExecutorHandle {
    abort: Option<oneshot::Sender<()>>,
    task: JoinHandle<ExecutionReport>,
}

impl ExecutorHandle {
    /// Abort the stream
    ///
    /// Pending read-backs are resolved with [`ReadbackError::Aborted`].
    pub fn abort(&mut self) {
        if let Some(abort) = self.abort.take() {
            let _ = abort.send(());
        }
    }

    /// Wait for the executor to finish
    ///
    /// Finishes once every [`CommandStream`] is dropped and the queue is
    /// drained, or after an abort.
    ///
    /// # Errors
    /// Returns [`ExecutorError::Join`] if the task panicked.
    pub async fn join(self) -> Result<ExecutionReport, ExecutorError> {
        Ok(self.task.await?)
    }
}

async fn run(
    mut machine: Machine,
    mut rx: mpsc::UnboundedReceiver<Command>,
    mut abort_rx: oneshot::Receiver<()>,
) -> ExecutionReport {
    let mut abort_armed = true;
    loop {
        tokio::select! {
            biased;
            signal = &mut abort_rx, if abort_armed => {
                abort_armed = false;
                if signal.is_ok() {
                    tracing::warn!("executor aborted");
                    machine.report.aborted = true;
                    break;
                }
            }
            command = rx.recv() => match command {
                Some(command) => {
                    if machine.execute(command).await.is_break() {
                        break;
                    }
                }
                None => break,
            },
        }
    }

    if machine.report.aborted {
        rx.close();
        while let Some(command) = rx.recv().await {
            machine.discard(command);
        }
    }
    tracing::debug!(report = ?machine.report, "executor finished");
    machine.report
}

struct Machine {
    config: ExecutorConfig,
    stack: Vec<Value>,
    report: ExecutionReport,
}

impl Machine {
    fn new(config: ExecutorConfig) -> Self {
        Self {
            config,
            stack: Vec::new(),
            report: ExecutionReport::default(),
        }
    }

    async fn execute(&mut self, command: Command) -> ControlFlow<()> {
        if let Fault::AbortAfter { commands } = self.config.fault {
            if self.report.commands_executed >= commands {
                tracing::warn!(commands, "injected abort");
                self.report.aborted = true;
                self.discard(command);
                return ControlFlow::Break(());
            }
        }

        tracing::trace!(command = command.kind(), "execute");
        match command {
            Command::Push(value) => {
                self.stack.push(value);
                self.report.values_pushed += 1;
            }
            Command::Post(postback) => {
                let latency = self.config.latency();
                if !latency.is_zero() {
                    tokio::time::sleep(latency).await;
                }
                let result = self.read_back(postback.size());
                self.resolve(postback, result);
            }
        }
        self.report.commands_executed += 1;
        ControlFlow::Continue(())
    }

    fn read_back(&mut self, requested: usize) -> ReadbackResult {
        let value = self.stack.pop().ok_or(ReadbackError::EmptyStack)?;
        let mut bytes = value.to_le_bytes();
        if bytes.len() != requested {
            return Err(ReadbackError::SizeMismatch {
                requested,
                actual: bytes.len(),
            });
        }
        if self.config.fault == Fault::CorruptReadback {
            for byte in &mut bytes {
                *byte = !*byte;
            }
        }
        Ok(bytes)
    }

    fn resolve(&mut self, postback: Postback, result: ReadbackResult) {
        if result.is_ok() {
            self.report.posts_served += 1;
        } else {
            self.report.posts_failed += 1;
        }
        postback.resolve(result);
    }

    fn discard(&mut self, command: Command) {
        if let Command::Post(postback) = command {
            self.resolve(postback, Err(ReadbackError::Aborted));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replay_core::Builder;

    fn post(stream: &mut CommandStream, size: usize) -> oneshot::Receiver<ReadbackResult> {
        let (tx, rx) = oneshot::channel();
        stream.post(Postback::new(size, move |r| {
            let _ = tx.send(r);
        }));
        rx
    }

    #[tokio::test]
    async fn echoes_pushed_value() {
        let (mut stream, handle) = Executor::spawn(ExecutorConfig::default());
        stream.push(Value::U32(0xAABB_CCDD));
        let rx = post(&mut stream, 4);

        assert_eq!(rx.await.unwrap(), Ok(vec![0xDD, 0xCC, 0xBB, 0xAA]));
        drop(stream);

        let report = handle.join().await.unwrap();
        assert_eq!(report.commands_executed, 2);
        assert_eq!(report.posts_served, 1);
        assert!(!report.aborted);
    }

    #[tokio::test]
    async fn read_backs_resolve_in_submission_order() {
        let (mut stream, handle) = Executor::spawn(ExecutorConfig::default().with_latency_ms(1));
        let (order_tx, mut order_rx) = mpsc::unbounded_channel();
        for i in 0..5u8 {
            stream.push(Value::U8(i));
            let order_tx = order_tx.clone();
            stream.post(Postback::new(1, move |r| {
                let _ = order_tx.send(r.unwrap()[0]);
            }));
        }
        drop(order_tx);
        drop(stream);

        let mut seen = Vec::new();
        while let Some(i) = order_rx.recv().await {
            seen.push(i);
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(handle.join().await.unwrap().posts_served, 5);
    }

    #[tokio::test]
    async fn size_mismatch_and_empty_stack_fail() {
        let (mut stream, handle) = Executor::spawn(ExecutorConfig::default());
        stream.push(Value::U64(1));
        let wrong_size = post(&mut stream, 4);
        let empty = post(&mut stream, 4);

        assert_eq!(
            wrong_size.await.unwrap(),
            Err(ReadbackError::SizeMismatch {
                requested: 4,
                actual: 8
            })
        );
        assert_eq!(empty.await.unwrap(), Err(ReadbackError::EmptyStack));
        drop(stream);
        assert_eq!(handle.join().await.unwrap().posts_failed, 2);
    }

    #[tokio::test]
    async fn corrupt_fault_inverts_bytes() {
        let config = ExecutorConfig::default().with_fault(Fault::CorruptReadback);
        let (mut stream, _handle) = Executor::spawn(config);
        stream.push(Value::U16(0x00FF));
        let rx = post(&mut stream, 2);
        assert_eq!(rx.await.unwrap(), Ok(vec![0x00, 0xFF]));
    }

    #[tokio::test]
    async fn abort_resolves_pending_read_backs() {
        let (mut stream, mut handle) =
            Executor::spawn(ExecutorConfig::default().with_latency_ms(20));
        stream.push(Value::U32(1));
        let _first = post(&mut stream, 4);
        stream.push(Value::U32(2));
        let second = post(&mut stream, 4);
        handle.abort();

        assert_eq!(second.await.unwrap(), Err(ReadbackError::Aborted));
        let report = handle.join().await.unwrap();
        assert!(report.aborted);

        // The queue is closed now; late read-backs fail immediately.
        assert!(stream.is_closed());
        let late = post(&mut stream, 4);
        assert_eq!(late.await.unwrap(), Err(ReadbackError::Disconnected));
    }

    #[tokio::test]
    async fn injected_abort_stops_after_limit() {
        let config = ExecutorConfig::default().with_fault(Fault::AbortAfter { commands: 1 });
        let (mut stream, handle) = Executor::spawn(config);
        stream.push(Value::U32(1));
        let rx = post(&mut stream, 4);

        assert_eq!(rx.await.unwrap(), Err(ReadbackError::Aborted));
        let report = handle.join().await.unwrap();
        assert!(report.aborted);
        assert_eq!(report.commands_executed, 1);
    }
}
