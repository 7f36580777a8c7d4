//! Concrete visitors shipped with the crate.

use std::fmt;

use crate::domain::arena::{ComponentTree, Container, Leaf, NodeId};
use crate::domain::notation::Notation;
use crate::domain::visitor::Visitor;

/// Which visitor method a node dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Leaf,
    Container,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Leaf => write!(f, "leaf"),
            Variant::Container => write!(f, "container"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub id: NodeId,
    pub variant: Variant,
}

/// Records every dispatch in traversal order.
#[derive(Debug, Default)]
pub struct DispatchLog {
    pub calls: Vec<Dispatch>,
}

impl DispatchLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> Vec<NodeId> {
        self.calls.iter().map(|d| d.id).collect()
    }
}

impl Visitor for DispatchLog {
    fn visit_leaf(&mut self, _tree: &ComponentTree, id: NodeId, _leaf: &Leaf) {
        self.calls.push(Dispatch {
            id,
            variant: Variant::Leaf,
        });
    }

    fn visit_container(&mut self, _tree: &ComponentTree, id: NodeId, _container: &Container) {
        self.calls.push(Dispatch {
            id,
            variant: Variant::Container,
        });
    }
}

/// Counts nodes per variant and the deepest level reached.
///
/// A lone leaf has depth 1, matching [`ComponentTree::depth`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShapeStats {
    pub leaves: usize,
    pub containers: usize,
    pub max_depth: usize,
    level: usize,
}

impl ShapeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.leaves + self.containers
    }
}

impl Visitor for ShapeStats {
    fn visit_leaf(&mut self, _tree: &ComponentTree, _id: NodeId, _leaf: &Leaf) {
        self.leaves += 1;
        self.max_depth = self.max_depth.max(self.level + 1);
    }

    fn visit_container(&mut self, _tree: &ComponentTree, _id: NodeId, _container: &Container) {
        self.containers += 1;
        self.level += 1;
        self.max_depth = self.max_depth.max(self.level);
    }

    fn leave_container(&mut self, _tree: &ComponentTree, _id: NodeId, _container: &Container) {
        self.level -= 1;
    }
}

/// Rebuilds composite results from visitor callbacks.
///
/// Produces one result per accepted root, identical to
/// [`ComponentTree::operation_with`] for the same notation.
#[derive(Debug)]
pub struct NotationWriter {
    notation: Notation,
    frames: Vec<Vec<String>>,
    results: Vec<String>,
}

impl NotationWriter {
    pub fn new(notation: Notation) -> Self {
        Self {
            notation,
            frames: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn into_results(self) -> Vec<String> {
        self.results
    }

    fn emit(&mut self, rendered: String) {
        match self.frames.last_mut() {
            Some(frame) => frame.push(rendered),
            None => self.results.push(rendered),
        }
    }
}

impl Default for NotationWriter {
    fn default() -> Self {
        Self::new(Notation::default())
    }
}

impl Visitor for NotationWriter {
    fn visit_leaf(&mut self, _tree: &ComponentTree, _id: NodeId, _leaf: &Leaf) {
        let rendered = self.notation.leaf.clone();
        self.emit(rendered);
    }

    fn visit_container(&mut self, _tree: &ComponentTree, _id: NodeId, _container: &Container) {
        self.frames.push(Vec::new());
    }

    fn leave_container(&mut self, _tree: &ComponentTree, _id: NodeId, _container: &Container) {
        let parts = self.frames.pop().unwrap_or_default();
        let rendered = self.notation.composite(parts);
        self.emit(rendered);
    }
}

/// Writes `"<label> + <tag>"` for every visited node.
///
/// The label is the node's own name when it has one, otherwise the
/// variant label of the notation.
#[derive(Debug)]
pub struct Annotator {
    tag: String,
    notation: Notation,
    pub lines: Vec<String>,
}

impl Annotator {
    pub fn new(tag: impl Into<String>) -> Self {
        Self::with_notation(tag, Notation::default())
    }

    pub fn with_notation(tag: impl Into<String>, notation: Notation) -> Self {
        Self {
            tag: tag.into(),
            notation,
            lines: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl Visitor for Annotator {
    fn visit_leaf(&mut self, _tree: &ComponentTree, _id: NodeId, leaf: &Leaf) {
        let label = leaf.name().unwrap_or(&self.notation.leaf);
        self.lines.push(format!("{} + {}", label, self.tag));
    }

    fn visit_container(&mut self, _tree: &ComponentTree, _id: NodeId, container: &Container) {
        let label = container.name().unwrap_or(&self.notation.branch);
        self.lines.push(format!("{} + {}", label, self.tag));
    }
}
