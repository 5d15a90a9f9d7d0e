//! Replay CLI
//!
//! Library half of the `replay` binary: configuration, logging and the
//! pipeline simulator.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod logging;
pub mod simulator;

pub use config::{HandshakeConfig, ReplayConfig, SimulateConfig};
pub use simulator::{generate_atoms, run_simulator, SimulatorReport, Verdict};
