//! End-to-end pipeline simulator
//!
//! Generates a seeded stream of recorded atoms, replays it through a chain
//! holding a [`CompletionHandshake`] into an in-process executor, and checks
//! that every registered listener is closed once the executor confirms.

use crate::config::ReplayConfig;
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use replay_core::{Atom, AtomId, Issue, Value};
use replay_executor::{ExecutionReport, Executor};
use replay_transform::{
    Chain, CompletionHandshake, HandshakeError, HandshakeReport, IssueListener, ReplayWriter,
};
use std::fmt::Write as _;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const COMMANDS: &[&str] = &[
    "bind_buffer",
    "set_viewport",
    "upload_texture",
    "draw_indexed",
    "submit",
];

/// How the handshake ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Token echoed back; listeners closed
    Confirmed(HandshakeReport),
    /// Read-back failed or did not match; listeners left open
    Failed(HandshakeError),
    /// No outcome within the timeout
    TimedOut,
}

/// Result of one simulator run
#[derive(Debug, Clone)]
pub struct SimulatorReport {
    /// Configuration used
    pub config: ReplayConfig,
    /// Recorded atoms applied by the writer
    pub recorded: u64,
    /// Synthetic atoms applied by the writer
    pub synthetic: u64,
    /// Handshake outcome
    pub verdict: Verdict,
    /// Listener receivers that observed closure
    pub listeners_closed: usize,
    /// Listeners handed back open after a failure
    pub listeners_open: usize,
    /// Executor statistics
    pub execution: ExecutionReport,
    /// Wall time from first atom to verdict
    pub elapsed: Duration,
}

impl SimulatorReport {
    /// True when the handshake confirmed and every listener closed
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(self.verdict, Verdict::Confirmed(_))
            && self.listeners_closed == self.config.handshake.listeners
    }

    /// Human-readable summary
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();
        let _ = writeln!(report, "=== Replay Simulator Report ===\n");
        let _ = writeln!(report, "Seed: {}", self.config.simulate.seed);
        let _ = writeln!(report, "Recorded Atoms: {}", self.recorded);
        let _ = writeln!(report, "Synthetic Atoms: {}", self.synthetic);
        let _ = writeln!(report, "Commands Executed: {}", self.execution.commands_executed);
        let _ = writeln!(report, "Read-backs Served: {}", self.execution.posts_served);
        let _ = writeln!(report, "Read-backs Failed: {}", self.execution.posts_failed);
        let _ = writeln!(report, "Executor Aborted: {}", self.execution.aborted);
        let _ = writeln!(
            report,
            "Listeners: {} registered, {} closed, {} open",
            self.config.handshake.listeners, self.listeners_closed, self.listeners_open
        );
        let _ = writeln!(report, "Elapsed: {}ms", self.elapsed.as_millis());

        match &self.verdict {
            Verdict::Confirmed(_) => {
                let _ = writeln!(report, "Handshake: confirmed");
            }
            Verdict::Failed(error) => {
                let _ = writeln!(report, "Handshake: failed ({error})");
            }
            Verdict::TimedOut => {
                let _ = writeln!(
                    report,
                    "Handshake: no confirmation within {}s",
                    self.config.handshake.timeout_secs
                );
            }
        }

        let _ = writeln!(
            report,
            "\n=== Result: {} ===",
            if self.passed() { "PASS" } else { "FAIL" }
        );
        report
    }
}

/// Generate `count` recorded atoms with random arguments
#[must_use]
pub fn generate_atoms(count: u64, seed: u64) -> Vec<(AtomId, Atom)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let name = COMMANDS[rng.random_range(0..COMMANDS.len())];
            let args = (0..rng.random_range(0..4))
                .map(|_| match rng.random_range(0..4) {
                    0 => Value::U32(rng.random()),
                    1 => Value::F32(rng.random()),
                    2 => Value::Bool(rng.random()),
                    _ => Value::U64(rng.random()),
                })
                .collect();
            (AtomId::new(i), Atom::recorded(name, args))
        })
        .collect()
}

/// Run one simulation
///
/// # Errors
/// Returns an error if the pipeline rejects the stream or the executor task
/// panics. Handshake failures are reported in the [`SimulatorReport`].
pub async fn run_simulator(config: ReplayConfig) -> anyhow::Result<SimulatorReport> {
    let started = Instant::now();
    let atoms = generate_atoms(config.simulate.atoms, config.simulate.seed);

    let (stream, handle) = Executor::spawn(config.executor.clone());
    let (mut handshake, completion) = CompletionHandshake::new();
    let mut receivers = Vec::with_capacity(config.handshake.listeners);
    for _ in 0..config.handshake.listeners {
        let (listener, rx) = IssueListener::channel(16);
        handshake.report_to(listener)?;
        receivers.push(rx);
    }

    let mut writer = ReplayWriter::new(stream);
    Chain::new().with(handshake).run(atoms, &mut writer)?;
    let (state, stream) = writer.into_parts();
    tracing::info!(
        recorded = state.recorded_count(),
        synthetic = state.synthetic_count(),
        "stream flushed"
    );
    // The executor finishes once its last stream is gone.
    drop(stream);

    let timeout = config.handshake.timeout();
    let (verdict, listeners_open, listeners_closed) =
        match tokio::time::timeout(timeout, completion).await {
            Ok(Ok(report)) => {
                let closed = wait_closed(&mut receivers, timeout).await;
                (Verdict::Confirmed(report), 0, closed)
            }
            Ok(Err(failure)) => {
                tracing::error!(error = %failure.error(), "handshake failed");
                let open = failure.open_listeners();
                (Verdict::Failed(failure.error().clone()), open, 0)
            }
            Err(_) => {
                tracing::error!(?timeout, "handshake timed out");
                (Verdict::TimedOut, 0, 0)
            }
        };
    let elapsed = started.elapsed();

    let execution = handle.join().await?;
    Ok(SimulatorReport {
        recorded: state.recorded_count(),
        synthetic: state.synthetic_count(),
        config,
        verdict,
        listeners_closed,
        listeners_open,
        execution,
        elapsed,
    })
}

/// Drain each receiver until its channel closes; returns how many closed in time
async fn wait_closed(receivers: &mut [mpsc::Receiver<Issue>], timeout: Duration) -> usize {
    let waits = receivers.iter_mut().map(|rx| async move {
        let drained = tokio::time::timeout(timeout, async {
            let mut issues = 0usize;
            while let Some(issue) = rx.recv().await {
                tracing::info!(?issue, "issue reported");
                issues += 1;
            }
            issues
        })
        .await;
        drained.is_ok()
    });
    join_all(waits).await.into_iter().filter(|closed| *closed).count()
}
