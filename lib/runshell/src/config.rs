//! Run shell configuration: the two tunables the shell's firing loop
//! actually reads.
//!
//! This is not a bootstrap layer for a whole scheduler — just the shell's
//! own knobs, loaded the way `ServerConfig::from_env` loads configuration.

use serde::Deserialize;

/// Configuration for [`crate::shell::JobRunShell`].
#[derive(Debug, Clone, Deserialize)]
pub struct RunShellConfig {
    /// Seconds to sleep between persistence-retry attempts.
    #[serde(default = "default_persistence_retry_interval_seconds")]
    pub persistence_retry_interval_seconds: u64,

    /// Milliseconds of slack `updateAfterMisfire`-style repairs are
    /// allowed before a fire time is considered missed.
    #[serde(default = "default_misfire_threshold_ms")]
    pub misfire_threshold_ms: i64,
}

fn default_persistence_retry_interval_seconds() -> u64 {
    5
}

fn default_misfire_threshold_ms() -> i64 {
    60_000
}

impl Default for RunShellConfig {
    fn default() -> Self {
        Self {
            persistence_retry_interval_seconds: default_persistence_retry_interval_seconds(),
            misfire_threshold_ms: default_misfire_threshold_ms(),
        }
    }
}

impl RunShellConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a present environment variable fails to parse.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RunShellConfig::default();
        assert_eq!(config.persistence_retry_interval_seconds, 5);
        assert_eq!(config.misfire_threshold_ms, 60_000);
    }
}
