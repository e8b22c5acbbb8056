//! Rendering-layer contract: renderable nodes and id lookup.
//!
//! The engine never draws. It writes numeric properties, visibility and text through
//! [`RenderNode`] and asks for a repaint once per frame. [`MemoryNode`] and [`MemoryScene`] are
//! in-memory implementations for headless playback and tests.

use crate::deck::{Deck, ElementData, resolve_original_state};
use crate::foundation::core::{AnimProperty, Pose};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Capabilities the engine needs from a rendered canvas element.
pub trait RenderNode {
    fn property(&self, prop: AnimProperty) -> f64;
    fn set_property(&mut self, prop: AnimProperty, value: f64);

    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);
    /// Whether the node receives pointer hits. Hidden click-gated nodes are excluded.
    fn set_hit_testable(&mut self, hit_testable: bool);

    /// Invalidate the node's layer. Multiple requests within a frame coalesce.
    fn request_repaint(&mut self);

    /// Current text, `None` for non-text nodes.
    fn text(&self) -> Option<String>;
    fn set_text(&mut self, text: &str);
}

/// Shared handle to a node; tweens hold one for their whole lifetime.
pub type NodeHandle = Rc<RefCell<dyn RenderNode>>;

/// Id lookup into the mounted scene.
pub trait SceneGraph {
    fn find_node(&self, id: &str) -> Option<NodeHandle>;
}

/// Write every property of `pose` to `node`.
pub fn apply_pose(node: &mut dyn RenderNode, pose: &Pose) {
    for prop in AnimProperty::ALL {
        node.set_property(prop, pose.get(prop));
    }
}

/// Read the node's live pose.
pub fn read_pose(node: &dyn RenderNode) -> Pose {
    let mut pose = Pose::default();
    for prop in AnimProperty::ALL {
        pose.set(prop, node.property(prop));
    }
    pose
}

/// Plain in-memory node.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryNode {
    pub pose: Pose,
    pub visible: bool,
    pub hit_testable: bool,
    pub text: Option<String>,
    /// Repaint requests received so far.
    pub repaints: u64,
}

impl Default for MemoryNode {
    fn default() -> Self {
        Self {
            pose: Pose::default(),
            visible: true,
            hit_testable: true,
            text: None,
            repaints: 0,
        }
    }
}

impl MemoryNode {
    pub fn from_element(element: &ElementData) -> Self {
        Self {
            pose: resolve_original_state(element),
            text: element.text.clone(),
            ..Self::default()
        }
    }
}

impl RenderNode for MemoryNode {
    fn property(&self, prop: AnimProperty) -> f64 {
        self.pose.get(prop)
    }

    fn set_property(&mut self, prop: AnimProperty, value: f64) {
        self.pose.set(prop, value);
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_hit_testable(&mut self, hit_testable: bool) {
        self.hit_testable = hit_testable;
    }

    fn request_repaint(&mut self) {
        self.repaints += 1;
    }

    fn text(&self) -> Option<String> {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = Some(text.to_owned());
    }
}

/// In-memory scene keyed by element id.
#[derive(Clone, Debug, Default)]
pub struct MemoryScene {
    nodes: BTreeMap<String, Rc<RefCell<MemoryNode>>>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount one node per element of every slide, posed at its persisted state.
    pub fn from_deck(deck: &Deck) -> Self {
        let mut scene = Self::new();
        for slide in &deck.slides {
            for element in &slide.elements {
                scene.insert(&element.id, MemoryNode::from_element(element));
            }
        }
        scene
    }

    pub fn insert(&mut self, id: &str, node: MemoryNode) -> Rc<RefCell<MemoryNode>> {
        let node = Rc::new(RefCell::new(node));
        self.nodes.insert(id.to_owned(), node.clone());
        node
    }

    /// Unmount a node; later lookups of `id` fail.
    pub fn remove(&mut self, id: &str) -> Option<Rc<RefCell<MemoryNode>>> {
        self.nodes.remove(id)
    }

    /// Typed access for inspection.
    pub fn node(&self, id: &str) -> Option<Rc<RefCell<MemoryNode>>> {
        self.nodes.get(id).cloned()
    }

    /// Snapshot of a node's state.
    pub fn state(&self, id: &str) -> Option<MemoryNode> {
        self.nodes.get(id).map(|n| n.borrow().clone())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }
}

impl SceneGraph for MemoryScene {
    fn find_node(&self, id: &str) -> Option<NodeHandle> {
        let node: NodeHandle = self.nodes.get(id)?.clone();
        Some(node)
    }
}

#[cfg(test)]
#[path = "../tests/unit/scene.rs"]
mod tests;
