//! Unbalanced binary search tree over integers.
//!
//! Nodes live in an [`Arena`] and point at their children by [`NodeId`].
//! Every walk, including the rendered snapshot, is iterative, so a degenerate
//! (list-shaped) tree costs *O*(n) per operation but never deep recursion.

use std::str::FromStr;

use serde::Serialize;

use crate::{
    arena::{Arena, NodeId},
    engine::Engine,
    error::{Error, Result},
    registry::EngineKind,
};

/// A tree node.
#[derive(Debug, Clone)]
struct Node {
    /// Key.
    value: i64,
    /// Subtree of smaller keys.
    left: Option<NodeId>,
    /// Subtree of larger keys.
    right: Option<NodeId>,
}

/// Depth-first visiting orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Left, node, right. Yields keys in ascending order.
    Inorder,
    /// Node, left, right.
    Preorder,
    /// Left, right, node.
    Postorder,
}

impl TraversalOrder {
    /// Lowercase name used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Self::Inorder => "inorder",
            Self::Preorder => "preorder",
            Self::Postorder => "postorder",
        }
    }
}

impl FromStr for TraversalOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "inorder" => Ok(Self::Inorder),
            "preorder" => Ok(Self::Preorder),
            "postorder" => Ok(Self::Postorder),
            other => Err(Error::invalid(format!(
                "unknown traversal '{other}'. Valid options: inorder, preorder, postorder"
            ))),
        }
    }
}

/// Outcome of a search: whether the key exists and the keys compared on the way.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchResult {
    /// Whether the key exists.
    pub found: bool,
    /// Keys visited from the root, ending at the match or the last node before a dead end.
    pub path: Vec<i64>,
}

/// One node of a flattened tree. Children are positions in the same list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FlatNode {
    /// Key.
    pub value: i64,
    /// Position of the left child.
    pub left: Option<usize>,
    /// Position of the right child.
    pub right: Option<usize>,
}

/// Query view of a tree.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BstSnapshot {
    /// Nodes in preorder; the root, if any, is at position 0.
    pub tree: Vec<FlatNode>,
    /// Number of keys.
    pub size: usize,
    /// Number of nodes on the longest root-to-leaf path.
    pub height: usize,
}

/// An unbalanced binary search tree with unique integer keys.
#[derive(Debug, Clone, Default)]
pub struct BinarySearchTree {
    /// Node storage.
    nodes: Arena<Node>,
    /// Root node.
    root: Option<NodeId>,
}

impl BinarySearchTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key. Returns `false` if it was already present.
    pub fn insert(&mut self, value: i64) -> bool {
        let Some(mut cur) = self.root else {
            self.root = Some(self.leaf(value));
            return true;
        };
        loop {
            let node = &self.nodes[cur];
            let next = if value < node.value {
                node.left
            } else if value > node.value {
                node.right
            } else {
                return false;
            };
            match next {
                Some(child) => cur = child,
                None => {
                    let leaf = self.leaf(value);
                    let node = &mut self.nodes[cur];
                    if value < node.value {
                        node.left = Some(leaf);
                    } else {
                        node.right = Some(leaf);
                    }
                    return true;
                }
            }
        }
    }

    /// Allocate a childless node.
    fn leaf(&mut self, value: i64) -> NodeId {
        self.nodes.alloc(Node {
            value,
            left: None,
            right: None,
        })
    }

    /// Locate a key, returning its node and that node's parent.
    fn locate(&self, value: i64) -> Option<(NodeId, Option<NodeId>)> {
        let mut parent = None;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            if value == node.value {
                return Some((id, parent));
            }
            parent = Some(id);
            cursor = if value < node.value {
                node.left
            } else {
                node.right
            };
        }
        None
    }

    /// Point whichever link of `parent` held `old` at `new` instead.
    fn relink(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let node = &mut self.nodes[p];
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            }
        }
    }

    /// Delete a key. Returns `false` if it was absent.
    ///
    /// A node with two children takes its inorder successor's key, and the
    /// successor (which has no left child) is unlinked in its place.
    pub fn delete(&mut self, value: i64) -> bool {
        let Some((id, parent)) = self.locate(value) else {
            return false;
        };
        let (left, right) = (self.nodes[id].left, self.nodes[id].right);
        match (left, right) {
            (Some(_), Some(right)) => {
                let mut succ_parent = id;
                let mut succ = right;
                while let Some(l) = self.nodes[succ].left {
                    succ_parent = succ;
                    succ = l;
                }
                self.nodes[id].value = self.nodes[succ].value;
                let succ_right = self.nodes[succ].right;
                self.relink(Some(succ_parent), succ, succ_right);
                self.nodes.free(succ);
            }
            (only, None) | (None, only) => {
                self.relink(parent, id, only);
                self.nodes.free(id);
            }
        }
        true
    }

    /// Search for a key, recording every key compared against.
    pub fn search(&self, value: i64) -> SearchResult {
        let mut path = Vec::new();
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            path.push(node.value);
            if value == node.value {
                return SearchResult { found: true, path };
            }
            cursor = if value < node.value {
                node.left
            } else {
                node.right
            };
        }
        SearchResult { found: false, path }
    }

    /// Keys in the requested visiting order.
    pub fn traverse(&self, order: TraversalOrder) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.len());
        match order {
            TraversalOrder::Inorder => {
                let mut stack = Vec::new();
                let mut cursor = self.root;
                while cursor.is_some() || !stack.is_empty() {
                    while let Some(id) = cursor {
                        stack.push(id);
                        cursor = self.nodes[id].left;
                    }
                    if let Some(id) = stack.pop() {
                        out.push(self.nodes[id].value);
                        cursor = self.nodes[id].right;
                    }
                }
            }
            TraversalOrder::Preorder => {
                let mut stack: Vec<NodeId> = self.root.into_iter().collect();
                while let Some(id) = stack.pop() {
                    let node = &self.nodes[id];
                    out.push(node.value);
                    stack.extend(node.right);
                    stack.extend(node.left);
                }
            }
            TraversalOrder::Postorder => {
                // Reverse of a node-right-left preorder.
                let mut stack: Vec<NodeId> = self.root.into_iter().collect();
                while let Some(id) = stack.pop() {
                    let node = &self.nodes[id];
                    out.push(node.value);
                    stack.extend(node.left);
                    stack.extend(node.right);
                }
                out.reverse();
            }
        }
        out
    }

    /// The tree as a preorder node list, children addressed by list position.
    pub fn structure(&self) -> Vec<FlatNode> {
        let mut out: Vec<FlatNode> = Vec::with_capacity(self.len());
        // (node, position of its parent, whether it is the left child)
        let mut stack: Vec<(NodeId, Option<(usize, bool)>)> =
            self.root.map(|r| (r, None)).into_iter().collect();
        while let Some((id, parent)) = stack.pop() {
            let at = out.len();
            match parent {
                Some((p, true)) => out[p].left = Some(at),
                Some((p, false)) => out[p].right = Some(at),
                None => {}
            }
            let node = &self.nodes[id];
            out.push(FlatNode {
                value: node.value,
                left: None,
                right: None,
            });
            stack.extend(node.right.map(|r| (r, Some((at, false)))));
            stack.extend(node.left.map(|l| (l, Some((at, true)))));
        }
        out
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut best = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            best = best.max(depth);
            let node = &self.nodes[id];
            stack.extend(node.left.map(|l| (l, depth + 1)));
            stack.extend(node.right.map(|r| (r, depth + 1)));
        }
        best
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

impl Engine for BinarySearchTree {
    const KIND: EngineKind = EngineKind::Bst;
    type Snapshot = BstSnapshot;

    fn snapshot(&self) -> BstSnapshot {
        BstSnapshot {
            tree: self.structure(),
            size: self.len(),
            height: self.height(),
        }
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(keys: &[i64]) -> BinarySearchTree {
        let mut t = BinarySearchTree::new();
        for &k in keys {
            t.insert(k);
        }
        t
    }

    #[test]
    fn traversals() {
        let t = tree_of(&[50, 30, 70, 20, 40, 60, 80]);
        assert_eq!(
            t.traverse(TraversalOrder::Inorder),
            vec![20, 30, 40, 50, 60, 70, 80]
        );
        assert_eq!(
            t.traverse(TraversalOrder::Preorder),
            vec![50, 30, 20, 40, 70, 60, 80]
        );
        assert_eq!(
            t.traverse(TraversalOrder::Postorder),
            vec![20, 40, 30, 60, 80, 70, 50]
        );
        assert_eq!(t.height(), 3);
    }

    #[test]
    fn duplicates_ignored() {
        let mut t = tree_of(&[5, 3]);
        assert!(!t.insert(5));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn search_path() {
        let t = tree_of(&[50, 30, 70, 20, 40]);
        let hit = t.search(40);
        assert!(hit.found);
        assert_eq!(hit.path, vec![50, 30, 40]);

        let miss = t.search(35);
        assert!(!miss.found);
        assert_eq!(miss.path, vec![50, 30, 40]);

        assert_eq!(BinarySearchTree::new().search(1).path, Vec::<i64>::new());
    }

    #[test]
    fn delete_cases() {
        // Leaf.
        let mut t = tree_of(&[50, 30, 70, 20]);
        assert!(t.delete(20));
        assert_eq!(t.traverse(TraversalOrder::Inorder), vec![30, 50, 70]);

        // One child.
        let mut t = tree_of(&[50, 30, 20]);
        assert!(t.delete(30));
        assert_eq!(t.traverse(TraversalOrder::Preorder), vec![50, 20]);

        // Two children, successor deep in the right subtree.
        let mut t = tree_of(&[50, 30, 70, 60, 80, 65]);
        assert!(t.delete(50));
        assert_eq!(t.traverse(TraversalOrder::Preorder), vec![60, 30, 70, 65, 80]);

        // Two children, successor is the right child.
        let mut t = tree_of(&[50, 30, 70, 80]);
        assert!(t.delete(50));
        assert_eq!(t.traverse(TraversalOrder::Preorder), vec![70, 30, 80]);

        // Root with one child, then absent key.
        let mut t = tree_of(&[1, 2]);
        assert!(t.delete(1));
        assert!(!t.delete(1));
        assert_eq!(t.structure().first().map(|n| n.value), Some(2));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn structure_shape() {
        let t = tree_of(&[2, 1, 3]);
        let leaf = |value| FlatNode {
            value,
            left: None,
            right: None,
        };
        assert_eq!(
            t.structure(),
            vec![
                FlatNode {
                    value: 2,
                    left: Some(1),
                    right: Some(2),
                },
                leaf(1),
                leaf(3),
            ]
        );
        assert!(BinarySearchTree::new().structure().is_empty());
    }

    #[test]
    fn degenerate_tree_snapshots() -> serde_json::Result<()> {
        let n: i64 = 20_000;
        let t = tree_of(&(0..n).collect::<Vec<_>>());
        let snap = t.snapshot();
        assert_eq!(snap.size, 20_000);
        assert_eq!(snap.height, 20_000);
        assert_eq!(snap.tree[0].right, Some(1));
        assert_eq!(snap.tree[19_998].right, Some(19_999));
        assert_eq!(snap.tree[19_999].right, None);

        let json = serde_json::to_value(&snap)?;
        assert_eq!(json["tree"][19_999]["value"], 19_999);
        Ok(())
    }

    #[test]
    fn order_names() -> Result<()> {
        assert_eq!("postorder".parse::<TraversalOrder>()?, TraversalOrder::Postorder);
        assert_eq!(TraversalOrder::Inorder.name(), "inorder");
        assert!("levelorder".parse::<TraversalOrder>().is_err());
        Ok(())
    }
}
