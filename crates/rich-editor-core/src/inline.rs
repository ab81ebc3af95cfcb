//! Inline elements: the smallest traversable units inside a block.

use std::cmp::Ordering;

use unicode_segmentation::UnicodeSegmentation;

use crate::block::{BlockElement, get_block_element_at_node};
use crate::error::Result;
use crate::position::Position;
use crate::range::SelectionRange;
use crate::tree::{ContentTree, NodeId, NodeKind};

/// Char span inside a text node, `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextSpan {
    /// First char (inclusive).
    pub start: usize,
    /// Last char (exclusive).
    pub end: usize,
}

/// One traversal step: a leaf, an atomic inline container, or part of a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InlineElement {
    node: NodeId,
    parent_block: BlockElement,
    span: Option<TextSpan>,
}

impl InlineElement {
    /// An inline element covering all of `node`.
    pub fn new(node: NodeId, parent_block: BlockElement) -> Self {
        Self {
            node,
            parent_block,
            span: None,
        }
    }

    /// An inline element covering `span` of the text node `node`.
    pub fn partial(node: NodeId, parent_block: BlockElement, span: TextSpan) -> Self {
        Self {
            node,
            parent_block,
            span: Some(span),
        }
    }

    /// The node this element stands for.
    pub fn container_node(&self) -> NodeId {
        self.node
    }

    /// Block this element belongs to.
    pub fn parent_block(&self) -> BlockElement {
        self.parent_block
    }

    /// Covered char span, for partial elements.
    pub fn span(&self) -> Option<TextSpan> {
        self.span
    }

    /// Returns `true` if only part of the text node is covered.
    pub fn is_partial(&self) -> bool {
        self.span.is_some()
    }

    /// Position where the element starts.
    pub fn start_position(&self, tree: &ContentTree) -> Position {
        Position::new(tree, self.node, self.span.map_or(0, |s| s.start))
    }

    /// Position where the element ends.
    pub fn end_position(&self, tree: &ContentTree) -> Position {
        let end = self
            .span
            .map_or_else(|| Position::end_offset(tree, self.node), |s| s.end);
        Position::new(tree, self.node, end)
    }

    /// Text covered by the element.
    pub fn text_content(&self, tree: &ContentTree) -> String {
        let text = tree.text_content(self.node);
        match self.span {
            Some(span) => text
                .chars()
                .skip(span.start)
                .take(span.end.saturating_sub(span.start))
                .collect(),
            None => text,
        }
    }

    /// Returns `true` if `position` falls within the element.
    pub fn contains_position(&self, tree: &ContentTree, position: &Position) -> bool {
        SelectionRange::new(tree, self.start_position(tree), self.end_position(tree))
            .contains_position(tree, position)
    }

    /// Returns `true` if this element starts at or after the end of `other`.
    pub fn is_after(&self, tree: &ContentTree, other: &InlineElement) -> bool {
        self.start_position(tree)
            .compare(tree, &other.end_position(tree))
            != Ordering::Less
    }

    /// Style the element.
    ///
    /// Partial text is first split out at grapheme-cluster boundaries. Every text leaf is then
    /// wrapped in a `span` (a parent `span` whose only child is the leaf is reused) and `styler`
    /// runs once per span. The returned spans replace this element's node: the original handle
    /// may now point at a shorter text node.
    pub fn apply_style<F>(&self, tree: &mut ContentTree, mut styler: F) -> Result<Vec<NodeId>>
    where
        F: FnMut(&mut ContentTree, NodeId),
    {
        let leaves = match (tree.kind(self.node), self.span) {
            (NodeKind::Text, Some(span)) => {
                let text = tree.text(self.node).unwrap_or_default();
                let span = snap_to_graphemes(&text, span);
                if span.start >= span.end {
                    return Ok(Vec::new());
                }
                let mut target = self.node;
                if span.start > 0 {
                    target = tree.split_text(target, span.start)?;
                }
                if span.end - span.start < tree.text_len(target) {
                    tree.split_text(target, span.end - span.start)?;
                }
                vec![target]
            }
            (NodeKind::Text, None) => vec![self.node],
            _ => tree
                .descendants(self.node)
                .filter(|&n| tree.kind(n) == NodeKind::Text && tree.text_len(n) > 0)
                .collect(),
        };

        let mut styled = Vec::with_capacity(leaves.len());
        for leaf in leaves {
            let reusable = tree
                .parent(leaf)
                .filter(|&p| tree.has_tag(p, "span") && tree.children(p).len() == 1);
            let element = match reusable {
                Some(span) => span,
                None => tree.wrap(leaf, "span")?,
            };
            styler(tree, element);
            styled.push(element);
        }
        tracing::trace!(count = styled.len(), "styled inline element");
        Ok(styled)
    }
}

fn snap_to_graphemes(text: &str, span: TextSpan) -> TextSpan {
    let mut boundaries = vec![0];
    let mut total = 0;
    for grapheme in text.graphemes(true) {
        total += grapheme.chars().count();
        boundaries.push(total);
    }
    let start = boundaries
        .iter()
        .rev()
        .find(|&&b| b <= span.start)
        .copied()
        .unwrap_or(0);
    let end = boundaries
        .iter()
        .find(|&&b| b >= span.end)
        .copied()
        .unwrap_or(total);
    TextSpan { start, end }
}

/// The inline element containing `node` inside `block`.
///
/// This is the outermost atomic inline container (a link, by default) around `node` that is
/// still inside the block, or `node` itself.
pub fn get_inline_element_at_node(
    tree: &ContentTree,
    block: &BlockElement,
    node: NodeId,
) -> InlineElement {
    let atomic = std::iter::once(node)
        .chain(tree.ancestors(node))
        .take_while(|&n| {
            *block != BlockElement::Node(n) && !tree.is_block_element(n) && block.contains(tree, n)
        })
        .filter(|&n| tree.tag(n).is_some_and(|t| tree.schema().is_atomic_inline(t)))
        .last();
    InlineElement::new(atomic.unwrap_or(node), *block)
}

/// First (or last) inline element under `root`.
pub fn get_first_last_inline_element(
    tree: &ContentTree,
    root: NodeId,
    is_first: bool,
) -> Option<InlineElement> {
    let leaf = if is_first {
        tree.first_leaf(root)
    } else {
        tree.last_leaf(root)
    }?;
    inline_at_leaf(tree, root, leaf)
}

/// The inline element after (or before) `current`, crossing block boundaries.
///
/// After a partial element the rest of the same text node comes first.
pub fn get_next_previous_inline_element(
    tree: &ContentTree,
    root: NodeId,
    current: &InlineElement,
    is_next: bool,
) -> Option<InlineElement> {
    if let Some(span) = current.span {
        let length = tree.text_len(current.node);
        let rest = if is_next {
            (span.end < length).then_some(TextSpan {
                start: span.end,
                end: length,
            })
        } else {
            (span.start > 0).then_some(TextSpan {
                start: 0,
                end: span.start,
            })
        };
        if let Some(rest) = rest {
            return Some(InlineElement::partial(current.node, current.parent_block, rest));
        }
    }

    let leaf = if is_next {
        tree.next_leaf(root, current.node)
    } else {
        tree.previous_leaf(root, current.node)
    }?;
    inline_at_leaf(tree, root, leaf)
}

/// First inline element of `block`.
pub fn get_first_inline_element_in_block(
    tree: &ContentTree,
    block: &BlockElement,
) -> Option<InlineElement> {
    let start = block.start_node();
    let leaf = if tree.children(start).is_empty() {
        start
    } else {
        tree.first_leaf(start)?
    };
    Some(get_inline_element_at_node(tree, block, leaf))
}

fn inline_at_leaf(tree: &ContentTree, root: NodeId, leaf: NodeId) -> Option<InlineElement> {
    let block = get_block_element_at_node(tree, root, leaf)?;
    Some(get_inline_element_at_node(tree, &block, leaf))
}
