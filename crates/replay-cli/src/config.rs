//! Simulator configuration file
//!
//! ```toml
//! log_filter = "info"
//!
//! [executor]
//! latency_ms = 0
//! fault = { kind = "none" }
//!
//! [handshake]
//! listeners = 2
//! timeout_secs = 5
//!
//! [simulate]
//! atoms = 100
//! seed = 42
//! ```

use anyhow::Context;
use replay_executor::ExecutorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Executor behaviour
    pub executor: ExecutorConfig,
    /// Listener and confirmation settings
    pub handshake: HandshakeConfig,
    /// Generated stream
    pub simulate: SimulateConfig,
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            executor: ExecutorConfig::default(),
            handshake: HandshakeConfig::default(),
            simulate: SimulateConfig::default(),
            log_filter: "info".to_string(),
            log_json: false,
        }
    }
}

/// `[handshake]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandshakeConfig {
    /// Issue listeners to register
    pub listeners: usize,
    /// How long to wait for confirmation
    pub timeout_secs: u64,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            listeners: 1,
            timeout_secs: 5,
        }
    }
}

impl HandshakeConfig {
    /// Confirmation timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[simulate]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulateConfig {
    /// Recorded atoms to generate
    pub atoms: u64,
    /// Random seed
    pub seed: u64,
}

impl Default for SimulateConfig {
    fn default() -> Self {
        Self {
            atoms: 100,
            seed: 42,
        }
    }
}

impl ReplayConfig {
    /// Read and parse a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// Returns an error on invalid TOML or unknown enum values.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// With a different executor configuration
    #[must_use]
    pub fn with_executor(mut self, executor: ExecutorConfig) -> Self {
        self.executor = executor;
        self
    }

    /// With a different listener count
    #[must_use]
    pub fn with_listeners(mut self, listeners: usize) -> Self {
        self.handshake.listeners = listeners;
        self
    }

    /// With a different atom count
    #[must_use]
    pub fn with_atoms(mut self, atoms: u64) -> Self {
        self.simulate.atoms = atoms;
        self
    }

    /// With a different seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.simulate.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use replay_executor::Fault;
    use tempfile::TempDir;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(ReplayConfig::from_toml("").unwrap(), ReplayConfig::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = ReplayConfig::from_toml(
            r#"
            log_filter = "debug"

            [handshake]
            listeners = 3

            [executor]
            fault = { kind = "abort-after", commands = 7 }
            "#,
        )
        .unwrap();

        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.handshake.listeners, 3);
        assert_eq!(config.handshake.timeout_secs, 5);
        assert_eq!(config.executor.fault, Fault::AbortAfter { commands: 7 });
        assert_eq!(config.simulate, SimulateConfig::default());
    }

    #[test]
    fn unknown_fault_is_rejected() {
        let err = ReplayConfig::from_toml("[executor]\nfault = { kind = \"explode\" }").unwrap_err();
        assert!(err.to_string().contains("explode"));
    }

    #[test]
    fn loads_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("replay.toml");
        std::fs::write(&path, "[simulate]\natoms = 12\nseed = 9\n").unwrap();

        let config = ReplayConfig::from_file(&path).unwrap();
        assert_eq!(config.simulate, SimulateConfig { atoms: 12, seed: 9 });
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        let err = ReplayConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn writes_back_to_toml() {
        let config = ReplayConfig::default().with_atoms(3).with_listeners(4);
        let text = toml::to_string(&config).unwrap();
        assert_eq!(ReplayConfig::from_toml(&text).unwrap(), config);
    }
}
