//! The `Config` struct and its validation.

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::ConfigError;
use crate::types::{LogLevel, PrewarmScope};

/// Settings for a re-styling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default for the "apply tracking" option of a start command
    #[serde(default = "defaults::bool_true")]
    pub apply_tracking: bool,

    /// Minimum milliseconds between two progress messages
    #[serde(default = "defaults::progress_interval_ms")]
    pub progress_interval_ms: u64,

    /// Skip text nodes whose direct parent is a component instance
    #[serde(default = "defaults::bool_false")]
    pub exclude_instance_children: bool,

    /// Which text nodes are scanned when prewarming fonts
    #[serde(default)]
    pub prewarm_scope: PrewarmScope,

    /// Consult the system font database when loading fonts.
    /// When false every load succeeds.
    #[serde(default = "defaults::bool_true")]
    pub verify_system_fonts: bool,

    /// How long user-facing notices stay visible
    #[serde(default = "defaults::notice_timeout_ms")]
    pub notice_timeout_ms: u64,

    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            apply_tracking: defaults::bool_true(),
            progress_interval_ms: defaults::progress_interval_ms(),
            exclude_instance_children: defaults::bool_false(),
            prewarm_scope: PrewarmScope::default(),
            verify_system_fonts: defaults::bool_true(),
            notice_timeout_ms: defaults::notice_timeout_ms(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_apply_tracking(mut self, apply: bool) -> Self {
        self.apply_tracking = apply;
        self
    }

    pub fn with_progress_interval_ms(mut self, interval: u64) -> Self {
        self.progress_interval_ms = interval;
        self
    }

    pub fn with_exclude_instance_children(mut self, exclude: bool) -> Self {
        self.exclude_instance_children = exclude;
        self
    }

    pub fn with_prewarm_scope(mut self, scope: PrewarmScope) -> Self {
        self.prewarm_scope = scope;
        self
    }

    pub fn with_verify_system_fonts(mut self, verify: bool) -> Self {
        self.verify_system_fonts = verify;
        self
    }

    /// Check field values that serde cannot constrain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.progress_interval_ms > defaults::MAX_PROGRESS_INTERVAL_MS {
            return Err(ConfigError::Validation(format!(
                "progress_interval_ms must be at most {} (got {})",
                defaults::MAX_PROGRESS_INTERVAL_MS,
                self.progress_interval_ms
            )));
        }
        Ok(())
    }

    pub fn progress_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.progress_interval_ms)
    }
}
