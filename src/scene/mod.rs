//! Host document interface.
//!
//! The scene graph belongs to the host application. A run only holds node
//! ids for the duration of a pass, reads attributes through [`Document`], and
//! mutates text through its fallible, awaitable setters.

pub mod memory;

use std::fmt;
use std::hash::Hash;

use retrack_fonts::FontDescriptor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use memory::{MemoryDocument, NodeId, NodeSpec, SceneFile, TextSegment};

/// Coarse node classification used by traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Text leaf with a character sequence
    Text,
    /// Node exposing an ordered child sequence
    Container,
    /// Anything else (shapes, images, ...)
    Other,
}

/// Half-open character interval `[start, end)`.
///
/// Indices count Unicode scalar values of the node's characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharRange {
    pub start: usize,
    pub end: usize,
}

impl CharRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The one-character range `[index, index + 1)`.
    pub fn single(index: usize) -> Self {
        Self {
            start: index,
            end: index + 1,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for CharRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Value of a style attribute over a character range.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeValue<T> {
    /// Every character in the range has this value
    Uniform(T),
    /// The range mixes values, or has no characters
    Mixed,
}

impl<T> RangeValue<T> {
    pub fn uniform(self) -> Option<T> {
        match self {
            RangeValue::Uniform(v) => Some(v),
            RangeValue::Mixed => None,
        }
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self, RangeValue::Mixed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpacingUnit {
    Pixels,
    Percent,
}

/// Horizontal spacing between characters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LetterSpacing {
    pub value: f64,
    pub unit: SpacingUnit,
}

impl LetterSpacing {
    pub fn pixels(value: f64) -> Self {
        Self {
            value,
            unit: SpacingUnit::Pixels,
        }
    }

    pub fn percent(value: f64) -> Self {
        Self {
            value,
            unit: SpacingUnit::Percent,
        }
    }
}

/// Errors reported by a host document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("node {0} is not a text node")]
    NotText(String),

    #[error("range {range} is out of bounds for node {node} ({len} characters)")]
    RangeOutOfBounds {
        node: String,
        range: CharRange,
        len: usize,
    },

    #[error("invalid scene file: {0}")]
    Invalid(String),

    #[error("host rejected the change: {0}")]
    Host(String),
}

/// Capability interface over the host's scene graph.
///
/// Getters are synchronous snapshots. Setters are modelled as asynchronous
/// and fallible because the host may suspend or refuse a mutation.
#[allow(async_fn_in_trait)]
pub trait Document {
    type NodeId: Copy + Eq + Hash + fmt::Debug;

    /// Currently selected nodes, in selection order.
    fn selection(&self) -> Vec<Self::NodeId>;

    /// Every text node in the document, in pre-order.
    fn text_nodes(&self) -> Vec<Self::NodeId>;

    fn kind(&self, id: Self::NodeId) -> NodeKind;
    fn is_visible(&self, id: Self::NodeId) -> bool;
    fn is_locked(&self, id: Self::NodeId) -> bool;
    fn is_removed(&self, id: Self::NodeId) -> bool;
    fn parent(&self, id: Self::NodeId) -> Option<Self::NodeId>;

    /// Whether the node is an instance of a reusable component.
    fn is_component_instance(&self, id: Self::NodeId) -> bool;

    /// Ordered children; empty for leaves.
    fn children(&self, id: Self::NodeId) -> Vec<Self::NodeId>;

    /// Characters of a text node; empty for other kinds.
    fn characters(&self, id: Self::NodeId) -> String;

    fn font_name(&self, id: Self::NodeId, range: CharRange) -> RangeValue<FontDescriptor>;
    fn font_weight(&self, id: Self::NodeId, range: CharRange) -> RangeValue<f64>;
    fn font_size(&self, id: Self::NodeId, range: CharRange) -> RangeValue<f64>;
    fn letter_spacing(&self, id: Self::NodeId, range: CharRange) -> RangeValue<LetterSpacing>;

    async fn set_font_name(
        &mut self,
        id: Self::NodeId,
        range: CharRange,
        font: &FontDescriptor,
    ) -> Result<(), SceneError>;

    async fn set_letter_spacing(
        &mut self,
        id: Self::NodeId,
        range: CharRange,
        spacing: LetterSpacing,
    ) -> Result<(), SceneError>;
}
