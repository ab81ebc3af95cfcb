//! Tree positions.
//!
//! A [`Position`] is a `(node, offset)` location. For a text node the offset counts chars; for
//! a void element it is 0 (before) or 1 (after); for any other node it counts children.
//!
//! Positions are plain values holding a [`NodeId`]. They are not kept up to date when the tree
//! changes: after a structural edit that may have moved or detached `node`, build a fresh
//! position (or [`Position::remap`] it onto the replacement node).

use std::cmp::Ordering;

use crate::error::{EditorError, Result};
use crate::tree::{ContentTree, NodeId, NodeKind};

/// Symbolic anchor relative to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionType {
    /// Offset 0 inside the node.
    Begin,
    /// End offset inside the node.
    End,
    /// Just before the node, in its parent.
    Before,
    /// Just after the node, in its parent.
    After,
}

/// A location in the content tree.
///
/// The derived `PartialEq` compares raw fields. Use [`Position::equal_to`] for the structural
/// comparison that treats two spellings of the same location as equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    node: NodeId,
    offset: usize,
    is_at_end: bool,
}

impl Position {
    /// Create a position, clamping `offset` to the node's end offset.
    pub fn new(tree: &ContentTree, node: NodeId, offset: usize) -> Self {
        let end = Self::end_offset(tree, node);
        let offset = offset.min(end);
        Self {
            node,
            offset,
            is_at_end: offset > 0 && offset == end,
        }
    }

    /// Create a position from a symbolic anchor.
    ///
    /// `Before` and `After` need a parent and fail with [`EditorError::Detached`] otherwise.
    pub fn at(tree: &ContentTree, node: NodeId, anchor: PositionType) -> Result<Self> {
        match anchor {
            PositionType::Begin => Ok(Self::new(tree, node, 0)),
            PositionType::End => Ok(Self::new(tree, node, Self::end_offset(tree, node))),
            PositionType::Before | PositionType::After => {
                let parent = tree.parent(node).ok_or(EditorError::Detached(node))?;
                let index = tree.child_index(node).ok_or(EditorError::Detached(node))?;
                let offset = if anchor == PositionType::After {
                    index + 1
                } else {
                    index
                };
                Ok(Self::new(tree, parent, offset))
            }
        }
    }

    /// Largest valid offset inside `node`.
    pub fn end_offset(tree: &ContentTree, node: NodeId) -> usize {
        match tree.kind(node) {
            NodeKind::Text => tree.text_len(node),
            NodeKind::VoidElement => 1,
            NodeKind::Element | NodeKind::Fragment => tree.children(node).len(),
        }
    }

    /// Container node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Offset inside [`Position::node`].
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether the position sits at the end of its node.
    pub fn is_at_end(&self) -> bool {
        self.is_at_end
    }

    /// Resolve the position down to a leaf (text, void element or childless element).
    ///
    /// An offset past the last child descends to the end of the last child. A container
    /// without children stays where it is. Normalizing twice yields the same value.
    pub fn normalize(&self, tree: &ContentTree) -> Self {
        let mut current = *self;
        loop {
            match tree.kind(current.node) {
                NodeKind::Text | NodeKind::VoidElement => return current,
                NodeKind::Element | NodeKind::Fragment => {
                    let children = tree.children(current.node);
                    current = match children.get(current.offset) {
                        None => match children.last() {
                            Some(&last) => Self {
                                node: last,
                                offset: Self::end_offset(tree, last),
                                is_at_end: true,
                            },
                            None => return current,
                        },
                        Some(&child) => Self {
                            node: child,
                            offset: 0,
                            is_at_end: false,
                        },
                    };
                }
            }
        }
    }

    /// Structural equality: both positions normalize to the same `(node, offset)`.
    pub fn equal_to(&self, tree: &ContentTree, other: &Position) -> bool {
        let a = self.normalize(tree);
        let b = other.normalize(tree);
        a.node == b.node && a.offset == b.offset
    }

    /// Document-order comparison of the normalized positions.
    pub fn compare(&self, tree: &ContentTree, other: &Position) -> Ordering {
        let a = self.normalize(tree).to_dom_point(tree);
        let b = other.normalize(tree).to_dom_point(tree);
        tree.compare_points(a, b)
    }

    /// Returns `true` if `self` comes strictly after `other`.
    pub fn is_after(&self, tree: &ContentTree, other: &Position) -> bool {
        self.compare(tree, other) == Ordering::Greater
    }

    /// Boundary point a host range would use. Void element positions map onto the parent.
    pub fn to_dom_point(&self, tree: &ContentTree) -> (NodeId, usize) {
        if tree.kind(self.node) == NodeKind::VoidElement
            && let (Some(parent), Some(index)) = (tree.parent(self.node), tree.child_index(self.node))
        {
            return (parent, index + self.offset.min(1));
        }
        (self.node, self.offset)
    }

    /// Point this position at `to` if it currently points at `from`.
    pub fn remap(&self, from: NodeId, to: NodeId) -> Self {
        if self.node == from {
            Self { node: to, ..*self }
        } else {
            *self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_fragment;

    fn setup(html: &str) -> (ContentTree, NodeId) {
        let mut tree = ContentTree::default();
        let root = tree.create_element("div");
        tree.append_child(tree.document(), root).unwrap();
        let fragment = parse_fragment(&mut tree, html).unwrap();
        tree.append_child(root, fragment).unwrap();
        (tree, root)
    }

    #[test]
    fn test_offset_is_clamped() {
        let (tree, root) = setup("abc");
        let text = tree.first_child(root).unwrap();
        let pos = Position::new(&tree, text, 10);
        assert_eq!(pos.offset(), 3);
        assert!(pos.is_at_end());
        assert!(!Position::new(&tree, text, 0).is_at_end());
    }

    #[test]
    fn test_normalize_descends_to_leaves() {
        let (tree, root) = setup("<b>ab</b><i>cd</i>");
        let b = tree.children(root)[0];
        let i = tree.children(root)[1];
        let ab = tree.first_child(b).unwrap();
        let cd = tree.first_child(i).unwrap();

        let begin = Position::at(&tree, root, PositionType::Begin).unwrap().normalize(&tree);
        assert_eq!((begin.node(), begin.offset()), (ab, 0));

        let end = Position::at(&tree, root, PositionType::End).unwrap().normalize(&tree);
        assert_eq!((end.node(), end.offset()), (cd, 2));
        assert!(end.is_at_end());

        let after_b = Position::at(&tree, b, PositionType::After).unwrap().normalize(&tree);
        assert_eq!((after_b.node(), after_b.offset()), (cd, 0));
    }

    #[test]
    fn test_empty_container_normalizes_to_itself() {
        let (tree, root) = setup("<span></span>");
        let span = tree.first_child(root).unwrap();
        let pos = Position::at(&tree, span, PositionType::End).unwrap();
        assert_eq!(pos.normalize(&tree), pos);
        assert_eq!(pos.offset(), 0);
    }

    #[test]
    fn test_structural_equality_and_order() {
        let (tree, root) = setup("ab<br>cd");
        let ab = tree.children(root)[0];
        let br = tree.children(root)[1];

        let a = Position::new(&tree, root, 0);
        let b = Position::new(&tree, ab, 0);
        assert_ne!(a, b);
        assert!(a.equal_to(&tree, &b));

        let before_br = Position::at(&tree, br, PositionType::Before).unwrap();
        assert_eq!(before_br.normalize(&tree).node(), br);
        assert_eq!(before_br.to_dom_point(&tree), (root, 1));

        let after_br = Position::new(&tree, br, 1);
        assert_eq!(after_br.to_dom_point(&tree), (root, 2));
        assert!(after_br.is_after(&tree, &before_br));
        assert!(!before_br.is_after(&tree, &after_br));
    }

    #[test]
    fn test_before_detached_node_is_an_error() {
        let mut tree = ContentTree::default();
        let lonely = tree.create_element("span");
        assert!(matches!(
            Position::at(&tree, lonely, PositionType::Before),
            Err(EditorError::Detached(_))
        ));
    }
}
