//! Block Elements
//!
//! A block element is a maximal run of content bounded by block-level structure. It is either
//! a single block-level node, or a run of siblings (`hello<br>`, `<b>a</b>c`) that sits
//! directly in a container that also holds other blocks.
//!
//! # Example
//!
//! ```rust
//! use rich_editor_core::{ContentTree, get_block_element_at_node, markup::parse_fragment};
//!
//! let mut tree = ContentTree::default();
//! let root = tree.create_element("div");
//! tree.append_child(tree.document(), root).unwrap();
//! let fragment = parse_fragment(&mut tree, "one<br>two").unwrap();
//! tree.append_child(root, fragment).unwrap();
//!
//! let one = tree.first_child(root).unwrap();
//! let block = get_block_element_at_node(&tree, root, one).unwrap();
//! assert_eq!(block.start_node(), one);
//! assert_eq!(tree.tag(block.end_node()), Some("br"));
//! ```

use std::cmp::Ordering;

use crate::tree::{ContentTree, NodeId, NodeKind};

/// A block-level unit of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockElement {
    /// A single block-level node.
    Node(NodeId),
    /// A run from `start` to `end` (inclusive) that is not wrapped by a block of its own.
    StartEnd {
        /// The root the run was found in.
        root: NodeId,
        /// First node of the run.
        start: NodeId,
        /// Last node of the run.
        end: NodeId,
    },
}

impl BlockElement {
    /// First node of the block.
    pub fn start_node(&self) -> NodeId {
        match *self {
            BlockElement::Node(node) => node,
            BlockElement::StartEnd { start, .. } => start,
        }
    }

    /// Last node of the block.
    pub fn end_node(&self) -> NodeId {
        match *self {
            BlockElement::Node(node) => node,
            BlockElement::StartEnd { end, .. } => end,
        }
    }

    /// Returns `true` if `node` belongs to this block.
    pub fn contains(&self, tree: &ContentTree, node: NodeId) -> bool {
        match *self {
            BlockElement::Node(block) => tree.contains(block, node, true),
            BlockElement::StartEnd { start, end, .. } => {
                tree.contains(end, node, true)
                    || (tree.compare_document_order(start, node) != Ordering::Greater
                        && tree.compare_document_order(node, end) == Ordering::Less
                        && !tree.contains(node, end, false))
            }
        }
    }

    /// Concatenated text of the block.
    pub fn text_content(&self, tree: &ContentTree) -> String {
        match *self {
            BlockElement::Node(block) => tree.text_content(block),
            BlockElement::StartEnd { root, .. } => tree
                .descendants(root)
                .filter(|&n| tree.kind(n) == NodeKind::Text && self.contains(tree, n))
                .filter_map(|n| tree.text(n))
                .collect(),
        }
    }
}

/// Find the block element containing `node`.
///
/// Returns `None` if `node` is not strictly inside `root`.
pub fn get_block_element_at_node(
    tree: &ContentTree,
    root: NodeId,
    node: NodeId,
) -> Option<BlockElement> {
    if !tree.contains(root, node, false) {
        return None;
    }

    let container = block_context(tree, root, node);
    if container == node {
        return Some(BlockElement::Node(node));
    }

    let head = find_head_tail_leaf(tree, node, container, false);
    let tail = find_head_tail_leaf(tree, node, container, true);
    let mut head = collapse(tree, head, tail, container, false);
    let mut tail = collapse(tree, tail, head, container, true);

    if tree.parent(head) != tree.parent(tail) {
        return Some(BlockElement::StartEnd {
            root,
            start: head,
            end: tail,
        });
    }

    while tree.previous_sibling(head).is_none() && tree.next_sibling(tail).is_none() {
        let Some(parent) = tree.parent(head) else {
            break;
        };
        if parent == container {
            if container != root {
                head = parent;
                tail = parent;
            }
            break;
        }
        if parent == root {
            break;
        }
        head = parent;
        tail = parent;
    }

    if head == tail && tree.is_block_element(head) {
        Some(BlockElement::Node(head))
    } else {
        Some(BlockElement::StartEnd {
            root,
            start: head,
            end: tail,
        })
    }
}

/// First (or last) block element under `root`.
pub fn get_first_last_block_element(
    tree: &ContentTree,
    root: NodeId,
    is_first: bool,
) -> Option<BlockElement> {
    let leaf = if is_first {
        tree.first_leaf(root)
    } else {
        tree.last_leaf(root)
    }?;
    get_block_element_at_node(tree, root, leaf)
}

/// The block element after (or before) `current`.
pub fn get_next_previous_block_element(
    tree: &ContentTree,
    root: NodeId,
    current: &BlockElement,
    is_next: bool,
) -> Option<BlockElement> {
    let leaf = if is_next {
        tree.next_leaf(root, current.end_node())
    } else {
        tree.previous_leaf(root, current.start_node())
    }?;
    get_block_element_at_node(tree, root, leaf)
}

fn block_context(tree: &ContentTree, root: NodeId, node: NodeId) -> NodeId {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .find(|&n| n == root || tree.is_block_element(n))
        .unwrap_or(root)
}

fn find_head_tail_leaf(tree: &ContentTree, node: NodeId, container: NodeId, is_tail: bool) -> NodeId {
    if is_tail && tree.has_tag(node, "br") {
        return node;
    }
    let outer = |n: NodeId| {
        if is_tail {
            tree.next_sibling(n)
        } else {
            tree.previous_sibling(n)
        }
    };
    let inner = |n: NodeId| {
        if is_tail {
            tree.first_child(n)
        } else {
            tree.last_child(n)
        }
    };

    let mut result = node;
    let mut current = node;
    loop {
        let mut sibling = loop {
            if let Some(sibling) = outer(current) {
                break sibling;
            }
            match tree.parent(current) {
                Some(parent) if parent != container => current = parent,
                _ => return result,
            }
        };

        loop {
            if tree.is_block_element(sibling) {
                return result;
            }
            if tree.has_tag(sibling, "br") {
                return if is_tail { sibling } else { result };
            }
            current = sibling;
            match inner(current) {
                Some(child) => sibling = child,
                None => break,
            }
        }
        result = current;
    }
}

fn collapse(
    tree: &ContentTree,
    mut node: NodeId,
    other: NodeId,
    container: NodeId,
    is_tail: bool,
) -> NodeId {
    loop {
        let has_outer_sibling = if is_tail {
            tree.next_sibling(node).is_some()
        } else {
            tree.previous_sibling(node).is_some()
        };
        match tree.parent(node) {
            Some(parent)
                if !has_outer_sibling && parent != container && !tree.contains(parent, other, true) =>
            {
                node = parent;
            }
            _ => return node,
        }
    }
}
