//! Default value functions for configuration.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on
//! `Config` fields so that partially written YAML files still load.

pub fn bool_false() -> bool {
    false
}

pub fn bool_true() -> bool {
    true
}

/// One animation frame at 60 Hz.
pub fn progress_interval_ms() -> u64 {
    16
}

pub fn notice_timeout_ms() -> u64 {
    1500
}

/// Upper bound accepted by `Config::validate` for `progress_interval_ms`.
pub const MAX_PROGRESS_INTERVAL_MS: u64 = 1000;
