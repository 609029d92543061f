//! Typed error types for a re-styling run.
//!
//! Classification and tracking lookups are total, so every variant here
//! comes from the host: an empty selection, a font load, or a mutation.

use retrack_fonts::FontLoadError;
use thiserror::Error;

use crate::scene::SceneError;

#[derive(Debug, Error)]
pub enum RestyleError {
    /// Nothing selected, or the selection contains no text node.
    #[error("no eligible selection: select one or more layers containing text")]
    NoSelection,

    /// A font required for rewriting could not be loaded.
    #[error(transparent)]
    FontLoad(#[from] FontLoadError),

    /// The host rejected a read or mutation.
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// A single-character range reported more than one value.
    #[error("node {node} has no single {attribute} at character {index}")]
    MixedRange {
        node: String,
        attribute: &'static str,
        index: usize,
    },
}
