//! Runtime configuration
//!
//! ```rust
//! use tessel_core::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_toml_str("flush_round_limit = 64").unwrap();
//! assert_eq!(config.flush_round_limit, Some(64));
//! ```

use serde::Deserialize;

use crate::error::Result;

/// Tunables for a [`Runtime`](crate::Runtime)
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum number of drain rounds a single flush may take before it is
    /// aborted with [`RuntimeError::FlushRoundLimit`](crate::RuntimeError).
    /// `None` means unbounded.
    pub flush_round_limit: Option<u32>,
    /// Emit a `debug` event for every completed flush
    pub trace_flushes: bool,
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML, missing keys take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn flush_round_limit(mut self, limit: u32) -> Self {
        self.flush_round_limit = Some(limit);
        self
    }

    pub fn trace_flushes(mut self, enabled: bool) -> Self {
        self.trace_flushes = enabled;
        self
    }
}
