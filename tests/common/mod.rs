//! Shared integration test helpers for retrack.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::{doc_with, latin};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a subset
//! of helpers is used per file.

#![allow(dead_code)]

use retrack::messages::{UiMessage, UiReceiver};
use retrack::scene::{MemoryDocument, NodeSpec, SceneFile, TextSegment};
use retrack_fonts::FontDescriptor;

/// A source font that is neither of the two target families.
pub fn inter(style: &str) -> FontDescriptor {
    FontDescriptor::new("Inter", style)
}

pub fn roboto(style: &str) -> FontDescriptor {
    FontDescriptor::new("Roboto", style)
}

pub fn sf_pro(style: &str) -> FontDescriptor {
    FontDescriptor::new("SF Pro", style)
}

pub fn sd_gothic(style: &str) -> FontDescriptor {
    FontDescriptor::new("Apple SD Gothic Neo", style)
}

/// Single-segment text node.
pub fn text(id: &str, content: &str, font: FontDescriptor, weight: f64, size: f64) -> NodeSpec {
    NodeSpec::text(id, vec![TextSegment::new(content, font, weight, size)])
}

/// Build a document from top-level nodes and a selection given by node id.
pub fn doc_with(nodes: Vec<NodeSpec>, selection: &[&str]) -> MemoryDocument {
    MemoryDocument::from_scene(SceneFile {
        selection: selection.iter().map(|s| s.to_string()).collect(),
        nodes,
    })
    .expect("valid test scene")
}

/// Three-level tree used by traversal tests:
///
/// ```text
/// page
/// ├── header (FRAME)
/// │   ├── title (TEXT)
/// │   └── logo (VECTOR)
/// ├── body (GROUP)
/// │   ├── para1 (TEXT)
/// │   └── card (FRAME)
/// │       └── para2 (TEXT)
/// └── footer (TEXT)
/// ```
pub fn three_level_page() -> Vec<NodeSpec> {
    vec![NodeSpec::new("page", "PAGE").with_children(vec![
        NodeSpec::new("header", "FRAME").with_children(vec![
            text("title", "Title", inter("Bold"), 700.0, 24.0),
            NodeSpec::new("logo", "VECTOR"),
        ]),
        NodeSpec::new("body", "GROUP").with_children(vec![
            text("para1", "Body", inter("Regular"), 400.0, 14.0),
            NodeSpec::new("card", "FRAME").with_children(vec![text(
                "para2",
                "Card",
                inter("Regular"),
                400.0,
                14.0,
            )]),
        ]),
        text("footer", "Foot", inter("Light"), 300.0, 11.0),
    ])]
}

/// Drain every message currently queued on a UI receiver.
pub fn drain(rx: &mut UiReceiver) -> Vec<UiMessage> {
    let mut messages = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        messages.push(msg);
    }
    messages
}

/// `(current, total)` pairs of the progress messages in `messages`.
pub fn progress_of(messages: &[UiMessage]) -> Vec<(usize, usize)> {
    messages
        .iter()
        .filter_map(|m| match m {
            UiMessage::Progress { current, total } => Some((*current, *total)),
            _ => None,
        })
        .collect()
}
