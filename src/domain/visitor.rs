//! Double dispatch over the closed set of node variants.
//!
//! A node picks the visitor method matching its own variant; the visitor
//! never inspects node types and the node never knows what the visitor does.
//! Adding a variant adds a required method, so every visitor stops compiling
//! until it handles it.

use tracing::instrument;

use crate::domain::arena::{ComponentTree, Container, Leaf, NodeId, NodeKind, TreeNode};
use crate::domain::error::TreeResult;

/// An operation defined once per node variant.
///
/// The tree is borrowed immutably for the whole traversal.
pub trait Visitor {
    fn visit_leaf(&mut self, tree: &ComponentTree, id: NodeId, leaf: &Leaf);

    fn visit_container(&mut self, tree: &ComponentTree, id: NodeId, container: &Container);

    /// Called after all children of `container` have been accepted.
    fn leave_container(&mut self, _tree: &ComponentTree, _id: NodeId, _container: &Container) {}
}

/// Pending steps of one traversal.
///
/// Traversal runs from an explicit stack, so tree depth is bounded by memory
/// rather than by the call stack.
#[derive(Debug, Default)]
pub struct Walk {
    steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Enter(NodeId),
    Leave(NodeId),
}

impl Walk {
    fn start(root: NodeId) -> Self {
        Self {
            steps: vec![Step::Enter(root)],
        }
    }

    /// Schedules `children` left to right, followed by leaving `id`.
    pub fn descend(&mut self, id: NodeId, children: &[NodeId]) {
        self.steps.push(Step::Leave(id));
        self.steps
            .extend(children.iter().rev().map(|&child| Step::Enter(child)));
    }

    fn pop(&mut self) -> Option<Step> {
        self.steps.pop()
    }
}

/// Entry point of double dispatch, implemented once per variant.
pub trait Accept {
    fn accept<V: Visitor + ?Sized>(
        &self,
        tree: &ComponentTree,
        id: NodeId,
        visitor: &mut V,
        walk: &mut Walk,
    );
}

impl Accept for Leaf {
    fn accept<V: Visitor + ?Sized>(
        &self,
        tree: &ComponentTree,
        id: NodeId,
        visitor: &mut V,
        _walk: &mut Walk,
    ) {
        visitor.visit_leaf(tree, id, self);
    }
}

impl Accept for Container {
    /// Pre-order: the container is visited before its children, left to right.
    fn accept<V: Visitor + ?Sized>(
        &self,
        tree: &ComponentTree,
        id: NodeId,
        visitor: &mut V,
        walk: &mut Walk,
    ) {
        visitor.visit_container(tree, id, self);
        walk.descend(id, self.children());
    }
}

impl Accept for TreeNode {
    fn accept<V: Visitor + ?Sized>(
        &self,
        tree: &ComponentTree,
        id: NodeId,
        visitor: &mut V,
        walk: &mut Walk,
    ) {
        match &self.kind {
            NodeKind::Leaf(leaf) => leaf.accept(tree, id, visitor, walk),
            NodeKind::Container(container) => container.accept(tree, id, visitor, walk),
        }
    }
}

impl ComponentTree {
    /// Lets `visitor` traverse the subtree rooted at `id`.
    pub fn accept<V: Visitor + ?Sized>(&self, id: NodeId, visitor: &mut V) -> TreeResult<()> {
        let mut walk = Walk::start(id);
        while let Some(step) = walk.pop() {
            match step {
                Step::Enter(current) => {
                    self.node(current)?.accept(self, current, &mut *visitor, &mut walk)
                }
                Step::Leave(current) => {
                    if let NodeKind::Container(container) = &self.node(current)?.kind {
                        visitor.leave_container(self, current, container);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Runs `visitor` over each component in order.
#[instrument(level = "debug", skip(tree, visitor))]
pub fn visit_all<V: Visitor + ?Sized>(
    tree: &ComponentTree,
    ids: &[NodeId],
    visitor: &mut V,
) -> TreeResult<()> {
    for &id in ids {
        tree.accept(id, &mut *visitor)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Kinds(Vec<&'static str>);

    impl Visitor for Kinds {
        fn visit_leaf(&mut self, _: &ComponentTree, _: NodeId, _: &Leaf) {
            self.0.push("leaf");
        }

        fn visit_container(&mut self, _: &ComponentTree, _: NodeId, _: &Container) {
            self.0.push("enter");
        }

        fn leave_container(&mut self, _: &ComponentTree, _: NodeId, _: &Container) {
            self.0.push("leave");
        }
    }

    #[test]
    fn test_container_accept_wraps_children() {
        let mut tree = ComponentTree::new();
        let root = tree.container();
        let leaf = tree.leaf();
        tree.add(root, leaf).unwrap();

        let mut kinds = Kinds::default();
        tree.accept(root, &mut kinds).unwrap();
        assert_eq!(kinds.0, vec!["enter", "leaf", "leave"]);
    }

    #[test]
    fn test_nested_containers_leave_innermost_first() {
        let mut tree = ComponentTree::new();
        let outer = tree.container();
        let inner = tree.container();
        let a = tree.leaf();
        let b = tree.leaf();
        tree.add(inner, a).unwrap();
        tree.add(outer, inner).unwrap();
        tree.add(outer, b).unwrap();

        let mut kinds = Kinds::default();
        tree.accept(outer, &mut kinds).unwrap();
        assert_eq!(
            kinds.0,
            vec!["enter", "enter", "leaf", "leave", "leaf", "leave"]
        );
    }

    #[test]
    fn test_dyn_visitor_dispatch() {
        let mut tree = ComponentTree::new();
        let leaf = tree.leaf();
        let mut kinds = Kinds::default();
        let visitor: &mut dyn Visitor = &mut kinds;
        visit_all(&tree, &[leaf, leaf], visitor).unwrap();
        assert_eq!(kinds.0, vec!["leaf", "leaf"]);
    }
}
