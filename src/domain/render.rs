use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{ComponentTree, NodeId};
use crate::domain::error::{DomainError, TreeResult};
use crate::domain::notation::Notation;

/// Deepest tree that can be rendered as a [`termtree::Tree`].
///
/// `termtree` nests its trees by value, so both display width and teardown
/// grow with depth.
pub const MAX_RENDER_DEPTH: usize = 1024;

pub trait TreeNodeConvert {
    fn to_tree_string(&self, root: NodeId, notation: &Notation) -> TreeResult<Tree<String>>;
}

impl TreeNodeConvert for ComponentTree {
    #[instrument(level = "debug", skip(self, notation))]
    fn to_tree_string(&self, root: NodeId, notation: &Notation) -> TreeResult<Tree<String>> {
        let depth = self.depth(root)?;
        if depth > MAX_RENDER_DEPTH {
            return Err(DomainError::TooDeep {
                depth,
                limit: MAX_RENDER_DEPTH,
            });
        }

        let mut stack = vec![(root, false)];
        let mut built: Vec<Tree<String>> = Vec::new();

        while let Some((node_idx, expanded)) = stack.pop() {
            let node = self.node(node_idx)?;
            let children = node.children();
            if !expanded {
                stack.push((node_idx, true));
                stack.extend(children.iter().rev().map(|&child| (child, false)));
                continue;
            }
            let leaves = built.split_off(built.len() - children.len());
            built.push(Tree::new(node.label(notation)).with_leaves(leaves));
        }

        built.pop().ok_or(DomainError::InvalidNode(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_tree_string() {
        let mut tree = ComponentTree::new();
        let root = tree.named_container("root");
        let a = tree.named_leaf("A");
        let b = tree.leaf();
        tree.add(root, a).unwrap();
        tree.add(root, b).unwrap();

        let rendered = tree
            .to_tree_string(root, &Notation::default())
            .unwrap()
            .to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, vec!["root", "├── A", "└── Leaf"]);
    }

    #[test]
    fn test_to_tree_string_nested_order() {
        let mut tree = ComponentTree::new();
        let root = tree.named_container("root");
        let inner = tree.named_container("inner");
        let a = tree.named_leaf("a");
        let b = tree.named_leaf("b");
        tree.add(inner, a).unwrap();
        tree.add(root, inner).unwrap();
        tree.add(root, b).unwrap();

        let rendered = tree
            .to_tree_string(root, &Notation::default())
            .unwrap()
            .to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, vec!["root", "├── inner", "│   └── a", "└── b"]);
    }

    #[test]
    fn test_to_tree_string_rejects_deep_tree() {
        let mut tree = ComponentTree::new();
        let mut top = tree.leaf();
        for _ in 0..MAX_RENDER_DEPTH {
            let c = tree.container();
            tree.add(c, top).unwrap();
            top = c;
        }

        let err = tree.to_tree_string(top, &Notation::default()).unwrap_err();
        assert_eq!(
            err,
            DomainError::TooDeep {
                depth: MAX_RENDER_DEPTH + 1,
                limit: MAX_RENDER_DEPTH
            }
        );
    }
}
