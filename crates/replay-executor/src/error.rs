//! Executor errors

/// Errors surfaced by an [`ExecutorHandle`](crate::ExecutorHandle)
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// The executor task panicked or was cancelled
    #[error("executor task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
