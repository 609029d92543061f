//! Font classification, tracking and loading for retrack.
//!
//! This crate provides:
//! - [`FontDescriptor`], the (family, style) pair that identifies a loadable font
//! - Korean script detection for single characters
//! - Weight → style classification for Apple SD Gothic Neo and SF Pro
//! - The size → letter-spacing tracking table
//! - The [`FontLoader`] seam plus a `fontdb`-backed system loader
//! - [`FontCache`], a per-run deduplicating loader
//!
//! # Architecture
//!
//! Classification and tracking lookups are pure and total. Only loading can
//! fail; the cache decides whether a failure is swallowed (prewarm) or
//! returned to the caller (`ensure_loaded`).

pub mod cache;
pub mod classifier;
pub mod descriptor;
pub mod loader;
pub mod script;
pub mod tracking;

// Re-export main types for convenience
pub use cache::{FontCache, PrewarmOutcome};
pub use classifier::{
    ClassificationRule, KOREAN_FAMILY, KOREAN_RULES, LATIN_FAMILY, LATIN_RULES, classify,
};
pub use descriptor::FontDescriptor;
pub use loader::{FontLoadError, FontLoader, MemoryFontLoader, SystemFontLoader};
pub use script::is_korean;
pub use tracking::{TRACKING_TABLE, tracking_for};
