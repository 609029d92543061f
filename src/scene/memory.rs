//! In-memory scene host backed by a JSON scene file.
//!
//! Nodes live in an arena indexed by [`NodeId`]. Text nodes keep one style
//! record per character; on save, adjacent characters with equal style are
//! coalesced back into segments.
//!
//! ```json
//! {
//!   "selection": ["card"],
//!   "nodes": [
//!     { "id": "card", "type": "FRAME", "children": [
//!       { "id": "title", "type": "TEXT", "segments": [
//!         { "text": "Hello", "family": "Inter", "style": "Bold", "weight": 700, "size": 20 }
//!       ] }
//!     ] }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use retrack_fonts::FontDescriptor;
use serde::{Deserialize, Serialize};

use super::{CharRange, Document, LetterSpacing, NodeKind, RangeValue, SceneError};

/// Node types that expose a child sequence.
const CONTAINER_TYPES: &[&str] = &[
    "DOCUMENT",
    "PAGE",
    "FRAME",
    "GROUP",
    "SECTION",
    "COMPONENT",
    "COMPONENT_SET",
    "INSTANCE",
    "BOOLEAN_OPERATION",
];

fn default_true() -> bool {
    true
}

fn is_true(v: &bool) -> bool {
    *v
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// On-disk scene description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    /// Ids of the selected nodes
    #[serde(default)]
    pub selection: Vec<String>,
    /// Top-level nodes, in document order
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub removed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<TextSegment>,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            visible: true,
            locked: false,
            removed: false,
            children: Vec::new(),
            segments: Vec::new(),
        }
    }

    pub fn text(id: impl Into<String>, segments: Vec<TextSegment>) -> Self {
        Self {
            segments,
            ..Self::new(id, "TEXT")
        }
    }

    pub fn with_children(mut self, children: Vec<NodeSpec>) -> Self {
        self.children = children;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn removed(mut self) -> Self {
        self.removed = true;
        self
    }
}

/// A run of characters sharing one style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSegment {
    pub text: String,
    #[serde(flatten)]
    pub font: FontDescriptor,
    pub weight: f64,
    pub size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<LetterSpacing>,
}

impl TextSegment {
    pub fn new(text: impl Into<String>, font: FontDescriptor, weight: f64, size: f64) -> Self {
        Self {
            text: text.into(),
            font,
            weight,
            size,
            letter_spacing: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
struct CharStyle {
    font: FontDescriptor,
    weight: f64,
    size: f64,
    letter_spacing: Option<LetterSpacing>,
}

#[derive(Debug, Clone)]
struct NodeData {
    id: String,
    node_type: String,
    visible: bool,
    locked: bool,
    removed: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    chars: Vec<(char, CharStyle)>,
}

/// Scene graph held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    nodes: Vec<NodeData>,
    roots: Vec<NodeId>,
    selection: Vec<NodeId>,
    index: HashMap<String, NodeId>,
    mutations: usize,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from a parsed scene file.
    pub fn from_scene(scene: SceneFile) -> Result<Self, SceneError> {
        let mut doc = Self::new();
        for spec in scene.nodes {
            let id = doc.insert(None, spec)?;
            doc.roots.push(id);
        }
        let selection = scene
            .selection
            .iter()
            .map(|name| {
                doc.find(name)
                    .ok_or_else(|| SceneError::UnknownNode(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        doc.selection = selection;
        Ok(doc)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let scene: SceneFile = serde_json::from_str(json).context("Failed to parse scene JSON")?;
        Ok(Self::from_scene(scene)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {:?}", path))?;
        Self::from_json(&json)
    }

    /// Write the document back out, atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json_pretty()?;
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write scene file {:?}", temp_path))?;
        std::fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to replace scene file {:?}", path))?;
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_scene())?)
    }

    /// Snapshot the current state as a scene file.
    pub fn to_scene(&self) -> SceneFile {
        SceneFile {
            selection: self
                .selection
                .iter()
                .map(|&id| self.node(id).id.clone())
                .collect(),
            nodes: self.roots.iter().map(|&id| self.spec_of(id)).collect(),
        }
    }

    /// Add a node (and its subtree) under `parent`, or as a new root.
    pub fn add(&mut self, parent: Option<NodeId>, spec: NodeSpec) -> Result<NodeId, SceneError> {
        let id = self.insert(parent, spec)?;
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        Ok(id)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).id
    }

    pub fn set_selection(&mut self, selection: Vec<NodeId>) {
        self.selection = selection;
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.nodes[id.0].visible = visible;
    }

    pub fn set_locked(&mut self, id: NodeId, locked: bool) {
        self.nodes[id.0].locked = locked;
    }

    pub fn set_removed(&mut self, id: NodeId, removed: bool) {
        self.nodes[id.0].removed = removed;
    }

    /// Number of successful setter calls so far.
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn insert(&mut self, parent: Option<NodeId>, spec: NodeSpec) -> Result<NodeId, SceneError> {
        if self.index.contains_key(&spec.id) {
            return Err(SceneError::DuplicateNode(spec.id));
        }
        if spec.node_type != "TEXT" && !spec.segments.is_empty() {
            return Err(SceneError::Invalid(format!(
                "node {} of type {} has text segments",
                spec.id, spec.node_type
            )));
        }

        let chars = spec
            .segments
            .iter()
            .flat_map(|seg| {
                let style = CharStyle {
                    font: seg.font.clone(),
                    weight: seg.weight,
                    size: seg.size,
                    letter_spacing: seg.letter_spacing,
                };
                seg.text.chars().map(move |c| (c, style.clone()))
            })
            .collect();

        let id = NodeId(self.nodes.len());
        self.index.insert(spec.id.clone(), id);
        self.nodes.push(NodeData {
            id: spec.id,
            node_type: spec.node_type,
            visible: spec.visible,
            locked: spec.locked,
            removed: spec.removed,
            parent,
            children: Vec::new(),
            chars,
        });

        for child in spec.children {
            let child_id = self.insert(Some(id), child)?;
            self.nodes[id.0].children.push(child_id);
        }
        Ok(id)
    }

    fn spec_of(&self, id: NodeId) -> NodeSpec {
        let node = self.node(id);
        let mut segments: Vec<TextSegment> = Vec::new();
        let mut last_style: Option<&CharStyle> = None;
        for (c, style) in &node.chars {
            if last_style == Some(style)
                && let Some(seg) = segments.last_mut()
            {
                seg.text.push(*c);
            } else {
                segments.push(TextSegment {
                    text: c.to_string(),
                    font: style.font.clone(),
                    weight: style.weight,
                    size: style.size,
                    letter_spacing: style.letter_spacing,
                });
            }
            last_style = Some(style);
        }

        NodeSpec {
            id: node.id.clone(),
            node_type: node.node_type.clone(),
            visible: node.visible,
            locked: node.locked,
            removed: node.removed,
            children: node.children.iter().map(|&c| self.spec_of(c)).collect(),
            segments,
        }
    }

    fn styles(&self, id: NodeId, range: CharRange) -> Option<impl Iterator<Item = &CharStyle>> {
        let chars = &self.node(id).chars;
        if range.is_empty() || range.end > chars.len() {
            return None;
        }
        Some(chars[range.start..range.end].iter().map(|(_, s)| s))
    }

    fn uniform_by<T, F>(&self, id: NodeId, range: CharRange, f: F) -> RangeValue<T>
    where
        T: PartialEq,
        F: Fn(&CharStyle) -> T,
    {
        let Some(mut styles) = self.styles(id, range) else {
            return RangeValue::Mixed;
        };
        let Some(first) = styles.next().map(&f) else {
            return RangeValue::Mixed;
        };
        if styles.all(|s| f(s) == first) {
            RangeValue::Uniform(first)
        } else {
            RangeValue::Mixed
        }
    }

    /// Mutable styles for a text range, with host-style validation.
    fn styles_mut(
        &mut self,
        id: NodeId,
        range: CharRange,
    ) -> Result<impl Iterator<Item = &mut CharStyle>, SceneError> {
        let node = &mut self.nodes[id.0];
        if node.node_type != "TEXT" {
            return Err(SceneError::NotText(node.id.clone()));
        }
        if range.start > range.end || range.end > node.chars.len() {
            return Err(SceneError::RangeOutOfBounds {
                node: node.id.clone(),
                range,
                len: node.chars.len(),
            });
        }
        Ok(node.chars[range.start..range.end].iter_mut().map(|(_, s)| s))
    }
}

impl Document for MemoryDocument {
    type NodeId = NodeId;

    fn selection(&self) -> Vec<NodeId> {
        self.selection.clone()
    }

    fn text_nodes(&self) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.node_type == "TEXT" {
                found.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        found
    }

    fn kind(&self, id: NodeId) -> NodeKind {
        let node_type = self.node(id).node_type.as_str();
        if node_type == "TEXT" {
            NodeKind::Text
        } else if CONTAINER_TYPES.contains(&node_type) {
            NodeKind::Container
        } else {
            NodeKind::Other
        }
    }

    fn is_visible(&self, id: NodeId) -> bool {
        self.node(id).visible
    }

    fn is_locked(&self, id: NodeId) -> bool {
        self.node(id).locked
    }

    fn is_removed(&self, id: NodeId) -> bool {
        self.node(id).removed
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    fn is_component_instance(&self, id: NodeId) -> bool {
        self.node(id).node_type == "INSTANCE"
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id).children.clone()
    }

    fn characters(&self, id: NodeId) -> String {
        self.node(id).chars.iter().map(|(c, _)| *c).collect()
    }

    fn font_name(&self, id: NodeId, range: CharRange) -> RangeValue<FontDescriptor> {
        self.uniform_by(id, range, |s| s.font.clone())
    }

    fn font_weight(&self, id: NodeId, range: CharRange) -> RangeValue<f64> {
        self.uniform_by(id, range, |s| s.weight)
    }

    fn font_size(&self, id: NodeId, range: CharRange) -> RangeValue<f64> {
        self.uniform_by(id, range, |s| s.size)
    }

    fn letter_spacing(&self, id: NodeId, range: CharRange) -> RangeValue<LetterSpacing> {
        match self.uniform_by(id, range, |s| s.letter_spacing) {
            RangeValue::Uniform(Some(spacing)) => RangeValue::Uniform(spacing),
            RangeValue::Uniform(None) => RangeValue::Uniform(LetterSpacing::pixels(0.0)),
            RangeValue::Mixed => RangeValue::Mixed,
        }
    }

    async fn set_font_name(
        &mut self,
        id: NodeId,
        range: CharRange,
        font: &FontDescriptor,
    ) -> Result<(), SceneError> {
        tokio::task::yield_now().await;
        for style in self.styles_mut(id, range)? {
            style.font = font.clone();
        }
        self.mutations += 1;
        Ok(())
    }

    async fn set_letter_spacing(
        &mut self,
        id: NodeId,
        range: CharRange,
        spacing: LetterSpacing,
    ) -> Result<(), SceneError> {
        tokio::task::yield_now().await;
        for style in self.styles_mut(id, range)? {
            style.letter_spacing = Some(spacing);
        }
        self.mutations += 1;
        Ok(())
    }
}
