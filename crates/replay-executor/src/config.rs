//! Executor configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Executor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Delay before each read-back is served, in milliseconds
    pub latency_ms: u64,
    /// Injected failure
    pub fault: Fault,
}

impl ExecutorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With read-back latency
    #[inline]
    #[must_use]
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// With an injected fault
    #[inline]
    #[must_use]
    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.fault = fault;
        self
    }

    /// Read-back latency
    #[inline]
    #[must_use]
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            latency_ms: 0,
            fault: Fault::None,
        }
    }
}

/// Failure injected into the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Fault {
    /// Behave normally
    #[default]
    None,
    /// Invert every read-back byte
    CorruptReadback,
    /// Abort the stream once this many commands have run
    AbortAfter {
        /// Commands executed before the abort
        commands: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_fault_free() {
        let config = ExecutorConfig::new();
        assert_eq!(config.fault, Fault::None);
        assert_eq!(config.latency(), Duration::ZERO);
    }

    #[test]
    fn fault_serde_form() {
        let json = serde_json::to_string(&Fault::AbortAfter { commands: 3 }).unwrap();
        assert_eq!(json, r#"{"kind":"abort-after","commands":3}"#);
        let parsed: ExecutorConfig =
            serde_json::from_str(r#"{"fault":{"kind":"corrupt-readback"}}"#).unwrap();
        assert_eq!(parsed.fault, Fault::CorruptReadback);
        assert_eq!(parsed.latency_ms, 0);
    }
}
