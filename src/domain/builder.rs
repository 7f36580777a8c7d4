//! Tree builder materializing shape descriptions into a component tree.

use tracing::instrument;

use crate::domain::arena::{ComponentTree, NodeId, NodeKind};
use crate::domain::error::{DomainError, TreeResult};

/// Plain recursive description of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Leaf,
    Container(Vec<Shape>),
}

impl Shape {
    pub fn container(children: impl IntoIterator<Item = Shape>) -> Self {
        Shape::Container(children.into_iter().collect())
    }

    /// Reads the shape of an existing subtree.
    #[instrument(level = "trace", skip(tree))]
    pub fn of(tree: &ComponentTree, id: NodeId) -> TreeResult<Self> {
        let mut stack = vec![(id, false)];
        let mut shapes: Vec<Shape> = Vec::new();

        while let Some((current, expanded)) = stack.pop() {
            match &tree.node(current)?.kind {
                NodeKind::Leaf(_) => shapes.push(Shape::Leaf),
                NodeKind::Container(c) if expanded => {
                    let children = shapes.split_off(shapes.len() - c.children().len());
                    shapes.push(Shape::Container(children));
                }
                NodeKind::Container(c) => {
                    stack.push((current, true));
                    stack.extend(c.children().iter().rev().map(|&child| (child, false)));
                }
            }
        }

        shapes.pop().ok_or(DomainError::InvalidNode(id))
    }

    /// Number of nested levels, counting `self`.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((current, level)) = stack.pop() {
            deepest = deepest.max(level);
            if let Shape::Container(children) = current {
                stack.extend(children.iter().map(|child| (child, level + 1)));
            }
        }
        deepest
    }
}

impl Drop for Shape {
    // Flattens nested children so dropping a deep shape does not recurse.
    fn drop(&mut self) {
        let Shape::Container(children) = self else {
            return;
        };
        let mut pending = std::mem::take(children);
        while let Some(mut child) = pending.pop() {
            if let Shape::Container(grandchildren) = &mut child {
                pending.append(grandchildren);
            }
        }
    }
}

/// Constructs subtrees from [`Shape`]s.
pub struct TreeBuilder<'a> {
    tree: &'a mut ComponentTree,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(tree: &'a mut ComponentTree) -> Self {
        Self { tree }
    }

    /// Inserts `shape` as a new root and returns its id.
    ///
    /// Iterative: every container reserves its children in order before they
    /// are filled, so child order matches the shape regardless of stack order.
    #[instrument(level = "debug", skip(self, shape))]
    pub fn build(&mut self, shape: &Shape) -> TreeResult<NodeId> {
        let root = self.create(shape);
        let mut stack = vec![(shape, root)];

        while let Some((current, current_id)) = stack.pop() {
            if let Shape::Container(children) = current {
                for child in children {
                    let child_id = self.create(child);
                    self.tree.add(current_id, child_id)?;
                    stack.push((child, child_id));
                }
            }
        }

        Ok(root)
    }

    fn create(&mut self, shape: &Shape) -> NodeId {
        match shape {
            Shape::Leaf => self.tree.leaf(),
            Shape::Container(_) => self.tree.container(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_preserves_order_and_shape() {
        let shape = Shape::container([
            Shape::container([Shape::Leaf, Shape::container([])]),
            Shape::Leaf,
        ]);
        let mut tree = ComponentTree::new();
        let root = TreeBuilder::new(&mut tree).build(&shape).unwrap();

        assert_eq!(tree.len(), 5);
        assert_eq!(Shape::of(&tree, root).unwrap(), shape);
        assert_eq!(
            tree.operation(root).unwrap(),
            "Branch(Branch(Leaf Branch()) Leaf)"
        );
    }

    #[test]
    fn test_shape_of_long_chain() {
        let mut tree = ComponentTree::new();
        let mut top = tree.leaf();
        for _ in 1..50_000 {
            let c = tree.container();
            tree.add(c, top).unwrap();
            top = c;
        }

        let shape = Shape::of(&tree, top).unwrap();
        assert_eq!(shape.depth(), 50_000);

        let mut copy = ComponentTree::new();
        let root = TreeBuilder::new(&mut copy).build(&shape).unwrap();
        assert_eq!(copy.len(), 50_000);
        assert_eq!(copy.depth(root).unwrap(), 50_000);
    }

    #[test]
    fn test_build_leaf_root() {
        let mut tree = ComponentTree::new();
        let root = TreeBuilder::new(&mut tree).build(&Shape::Leaf).unwrap();
        assert!(!tree.is_composite(root).unwrap());
        assert_eq!(tree.roots(), vec![root]);
    }
}
