use generational_arena::{Arena, Index};
use std::fmt;
use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, TreeResult};
use crate::domain::notation::Notation;

/// Handle to a node stored in a [`ComponentTree`].
///
/// Handles are generational: once a node is discarded its handle stays
/// invalid even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{}.{}", slot, generation)
    }
}

/// Terminal node. Immutable after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaf {
    name: Option<String>,
}

impl Leaf {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Node owning an ordered list of children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    name: Option<String>,
    children: Vec<NodeId>,
}

impl Container {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Closed set of node variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(Leaf),
    Container(Container),
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Variant payload
    pub kind: NodeKind,
    /// Owning container, None for roots and detached nodes
    pub parent: Option<NodeId>,
}

impl TreeNode {
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, NodeKind::Container(_))
    }

    /// Children in insertion order, empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Leaf(_) => &[],
            NodeKind::Container(c) => c.children(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Leaf(l) => l.name(),
            NodeKind::Container(c) => c.name(),
        }
    }

    /// Display label: the node's name, or the variant label of the notation.
    pub fn label(&self, notation: &Notation) -> String {
        match (self.name(), &self.kind) {
            (Some(name), _) => name.to_string(),
            (None, NodeKind::Leaf(_)) => notation.leaf.clone(),
            (None, NodeKind::Container(_)) => notation.branch.clone(),
        }
    }
}

/// Arena-based forest of components.
///
/// The arena owns every node. Ownership between nodes is expressed by the
/// containers' child lists; the parent link is a plain handle and never keeps
/// anything alive. Every node without a parent is a root.
#[derive(Debug, Default)]
pub struct ComponentTree {
    arena: Arena<TreeNode>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    fn insert(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.arena.insert(TreeNode { kind, parent: None }));
        trace!(%id, "inserted node");
        id
    }

    pub fn leaf(&mut self) -> NodeId {
        self.insert(NodeKind::Leaf(Leaf::default()))
    }

    pub fn named_leaf(&mut self, name: impl Into<String>) -> NodeId {
        self.insert(NodeKind::Leaf(Leaf {
            name: Some(name.into()),
        }))
    }

    pub fn container(&mut self) -> NodeId {
        self.insert(NodeKind::Container(Container::default()))
    }

    pub fn named_container(&mut self, name: impl Into<String>) -> NodeId {
        self.insert(NodeKind::Container(Container {
            name: Some(name.into()),
            children: Vec::new(),
        }))
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.arena.get(id.0)
    }

    pub fn node(&self, id: NodeId) -> TreeResult<&TreeNode> {
        self.get_node(id).ok_or(DomainError::InvalidNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut TreeNode> {
        self.arena.get_mut(id.0).ok_or(DomainError::InvalidNode(id))
    }

    pub fn is_composite(&self, id: NodeId) -> TreeResult<bool> {
        Ok(self.node(id)?.is_composite())
    }

    pub fn parent(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> TreeResult<&[NodeId]> {
        Ok(self.node(id)?.children())
    }

    /// Nodes without a parent, in arena order.
    pub fn roots(&self) -> Vec<NodeId> {
        self.arena
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(idx, _)| NodeId(idx))
            .collect()
    }

    /// True if `ancestor` lies on the parent chain of `node` (or is `node`).
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get_node(id).and_then(|n| n.parent);
        }
        false
    }

    /// Attaches `child` as the last child of `parent`.
    ///
    /// No-op when `parent` is a leaf. A child that already has an owner is
    /// detached from it first, so it ends up owned by `parent` only.
    #[instrument(level = "debug", skip(self))]
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        let parent_is_composite = self.is_composite(parent)?;
        let old_parent = self.parent(child)?;
        if !parent_is_composite {
            trace!("parent is a leaf, ignoring add");
            return Ok(());
        }
        // a childless node can only be an ancestor of itself
        let may_contain_parent = !self.children(child)?.is_empty();
        if child == parent || (may_contain_parent && self.is_ancestor(child, parent)) {
            return Err(DomainError::CycleDetected { parent, child });
        }

        if let Some(old) = old_parent {
            debug!(%old, "reparenting");
            self.detach(old, child)?;
        }
        if let NodeKind::Container(c) = &mut self.node_mut(parent)?.kind {
            c.children.push(child);
        }
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detaches `child` from `parent` if it is one of its children.
    ///
    /// The child stays in the tree as a root. Returns whether anything changed.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> TreeResult<bool> {
        self.node(parent)?;
        let removed = self.detach(parent, child)?;
        if removed {
            if let Ok(node) = self.node_mut(child) {
                node.parent = None;
            }
        } else {
            trace!("not a child, ignoring remove");
        }
        Ok(removed)
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) -> TreeResult<bool> {
        let NodeKind::Container(c) = &mut self.node_mut(parent)?.kind else {
            return Ok(false);
        };
        match c.children.iter().position(|&id| id == child) {
            Some(pos) => {
                c.children.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Releases `id` and its whole subtree. Returns the number of released nodes.
    #[instrument(level = "debug", skip(self))]
    pub fn discard(&mut self, id: NodeId) -> TreeResult<usize> {
        if let Some(parent) = self.parent(id)? {
            self.detach(parent, id)?;
        }
        let doomed: Vec<NodeId> = self.iter_postorder(id).map(|(idx, _)| idx).collect();
        for idx in &doomed {
            self.arena.remove(idx.0);
        }
        debug!(released = doomed.len(), "discarded subtree");
        Ok(doomed.len())
    }

    /// Composite result of `id` in the default notation.
    pub fn operation(&self, id: NodeId) -> TreeResult<String> {
        self.operation_with(id, &Notation::default())
    }

    /// Depth-first, left-to-right aggregation of the subtree at `id`.
    #[instrument(level = "trace", skip(self, notation))]
    pub fn operation_with(&self, id: NodeId, notation: &Notation) -> TreeResult<String> {
        enum Emit<'n> {
            Node(NodeId),
            Text(&'n str),
        }

        let mut out = String::new();
        let mut stack = vec![Emit::Node(id)];
        while let Some(step) = stack.pop() {
            let current = match step {
                Emit::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Emit::Node(current) => current,
            };
            match &self.node(current)?.kind {
                NodeKind::Leaf(_) => out.push_str(&notation.leaf),
                NodeKind::Container(c) => {
                    out.push_str(&notation.branch);
                    out.push_str(&notation.open);
                    stack.push(Emit::Text(&notation.close));
                    for (pos, &child) in c.children.iter().enumerate().rev() {
                        stack.push(Emit::Node(child));
                        if pos > 0 {
                            stack.push(Emit::Text(&notation.separator));
                        }
                    }
                }
            }
        }
        Ok(out)
    }

    /// Number of levels below and including `id`.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self, id: NodeId) -> TreeResult<usize> {
        let mut deepest = 0;
        let mut stack = vec![(id, 1)];
        while let Some((current, level)) = stack.pop() {
            let node = self.node(current)?;
            deepest = deepest.max(level);
            stack.extend(node.children().iter().map(|&child| (child, level + 1)));
        }
        Ok(deepest)
    }

    /// Pre-order iterator over the subtree at `root`.
    pub fn iter(&self, root: NodeId) -> TreeIterator<'_> {
        TreeIterator::new(self, root)
    }

    /// Post-order iterator over the subtree at `root`.
    pub fn iter_postorder(&self, root: NodeId) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, root)
    }
}

pub struct TreeIterator<'a> {
    tree: &'a ComponentTree,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a ComponentTree, root: NodeId) -> Self {
        Self {
            tree,
            stack: vec![root],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children().iter().rev());
                return Some((current, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a ComponentTree,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a ComponentTree, root: NodeId) -> Self {
        Self {
            tree,
            stack: vec![(root, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current) {
                if visited {
                    return Some((current, node));
                }
                self.stack.push((current, true));
                for &child in node.children().iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
