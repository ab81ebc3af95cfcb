//! Content Traverser
//!
//! Sequential cursor over the block and inline elements of a scope.
//!
//! # Overview
//!
//! A traverser is created for one of three scopes:
//!
//! - [`TraversalScope::Body`]: everything under the root
//! - [`TraversalScope::Block`]: the single block containing a position
//! - [`TraversalScope::Selection`]: the blocks and inline elements a range touches; inline
//!   elements at the edges of the range are trimmed to partial elements
//!
//! The traverser keeps a current block and a current inline element. Moving past the end of
//! the scope returns `None` and leaves the current element where it was, so repeated calls at
//! the end are harmless.
//!
//! The traverser does not borrow the tree. Every call takes the tree explicitly; mutating the
//! tree between calls is allowed as long as the current elements still exist.
//!
//! # Example
//!
//! ```rust
//! use rich_editor_core::{ContentTraverser, ContentTree, markup::parse_fragment};
//!
//! let mut tree = ContentTree::default();
//! let root = tree.create_element("div");
//! tree.append_child(tree.document(), root).unwrap();
//! let fragment = parse_fragment(&mut tree, "<p>a</p><p>b</p>").unwrap();
//! tree.append_child(root, fragment).unwrap();
//!
//! let mut traverser = ContentTraverser::create_body_traverser(&tree, root);
//! let first = traverser.current_inline_element().unwrap();
//! assert_eq!(first.text_content(&tree), "a");
//! let second = traverser.get_next_inline_element(&tree).unwrap();
//! assert_eq!(second.text_content(&tree), "b");
//! assert!(traverser.get_next_inline_element(&tree).is_none());
//! assert!(traverser.get_next_inline_element(&tree).is_none());
//! ```

use std::cmp::Ordering;

use crate::block::{
    BlockElement, get_block_element_at_node, get_first_last_block_element,
    get_next_previous_block_element,
};
use crate::inline::{
    InlineElement, TextSpan, get_first_inline_element_in_block, get_first_last_inline_element,
    get_inline_element_at_node, get_next_previous_inline_element,
};
use crate::position::Position;
use crate::range::SelectionRange;
use crate::tree::{ContentTree, NodeId, NodeKind};

/// What a traverser walks over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalScope {
    /// The whole root.
    Body,
    /// The block containing the position.
    Block(Position),
    /// Content touched by the range.
    Selection(SelectionRange),
}

enum Fit {
    Inside(InlineElement),
    Before,
    After,
}

/// Cursor over block and inline elements.
#[derive(Debug, Clone)]
pub struct ContentTraverser {
    root: NodeId,
    scope: TraversalScope,
    current_block: Option<BlockElement>,
    current_inline: Option<InlineElement>,
}

impl ContentTraverser {
    /// Traverse everything under `root`.
    pub fn create_body_traverser(tree: &ContentTree, root: NodeId) -> Self {
        Self::new(tree, root, TraversalScope::Body)
    }

    /// Traverse the content touched by `range`.
    pub fn create_selection_traverser(
        tree: &ContentTree,
        root: NodeId,
        range: SelectionRange,
    ) -> Self {
        Self::new(tree, root, TraversalScope::Selection(range))
    }

    /// Traverse the block containing `position`.
    pub fn create_block_traverser(tree: &ContentTree, root: NodeId, position: Position) -> Self {
        Self::new(tree, root, TraversalScope::Block(position))
    }

    fn new(tree: &ContentTree, root: NodeId, scope: TraversalScope) -> Self {
        let mut traverser = Self {
            root,
            scope,
            current_block: None,
            current_inline: None,
        };
        traverser.current_block = traverser.start_block(tree);
        traverser.current_inline = traverser.start_inline(tree);
        tracing::trace!(?scope, block = ?traverser.current_block, "created content traverser");
        traverser
    }

    /// Scope this traverser was created for.
    pub fn scope(&self) -> TraversalScope {
        self.scope
    }

    /// Current block element.
    pub fn current_block_element(&self) -> Option<BlockElement> {
        self.current_block
    }

    /// Current inline element.
    pub fn current_inline_element(&self) -> Option<InlineElement> {
        self.current_inline
    }

    /// Move to the next block in scope.
    pub fn get_next_block_element(&mut self, tree: &ContentTree) -> Option<BlockElement> {
        self.step_block(tree, true)
    }

    /// Move to the previous block in scope.
    pub fn get_previous_block_element(&mut self, tree: &ContentTree) -> Option<BlockElement> {
        self.step_block(tree, false)
    }

    /// Move to the next inline element in scope.
    pub fn get_next_inline_element(&mut self, tree: &ContentTree) -> Option<InlineElement> {
        self.step_inline(tree, true)
    }

    /// Move to the previous inline element in scope.
    pub fn get_previous_inline_element(&mut self, tree: &ContentTree) -> Option<InlineElement> {
        self.step_inline(tree, false)
    }

    fn start_block(&self, tree: &ContentTree) -> Option<BlockElement> {
        match self.scope {
            TraversalScope::Body => get_first_last_block_element(tree, self.root, true),
            TraversalScope::Block(position) => {
                get_block_element_at_node(tree, self.root, position.normalize(tree).node())
            }
            TraversalScope::Selection(range) => {
                get_block_element_at_node(tree, self.root, range.start().normalize(tree).node())
            }
        }
    }

    fn start_inline(&self, tree: &ContentTree) -> Option<InlineElement> {
        match self.scope {
            TraversalScope::Body => get_first_last_inline_element(tree, self.root, true),
            TraversalScope::Block(_) => {
                get_first_inline_element_in_block(tree, self.current_block.as_ref()?)
            }
            TraversalScope::Selection(range) => {
                if range.is_collapsed(tree) {
                    return None;
                }
                let block = self.current_block?;
                let node = range.start().normalize(tree).node();
                let candidate = get_inline_element_at_node(tree, &block, node);
                match self.fit(tree, candidate) {
                    Fit::Inside(inline) => Some(inline),
                    Fit::Before => self.seek(tree, candidate, true),
                    Fit::After => None,
                }
            }
        }
    }

    fn step_block(&mut self, tree: &ContentTree, forward: bool) -> Option<BlockElement> {
        let current = self.current_block?;
        let candidate = get_next_previous_block_element(tree, self.root, &current, forward)?;
        let in_scope = match self.scope {
            TraversalScope::Body => true,
            TraversalScope::Block(_) => false,
            TraversalScope::Selection(range) => block_overlaps(tree, &candidate, &range),
        };
        if !in_scope {
            return None;
        }
        self.current_block = Some(candidate);
        Some(candidate)
    }

    fn step_inline(&mut self, tree: &ContentTree, forward: bool) -> Option<InlineElement> {
        let current = self.current_inline?;
        let next = self.seek(tree, current, forward)?;
        self.current_inline = Some(next);
        Some(next)
    }

    fn seek(
        &self,
        tree: &ContentTree,
        from: InlineElement,
        forward: bool,
    ) -> Option<InlineElement> {
        let mut candidate = get_next_previous_inline_element(tree, self.root, &from, forward)?;
        loop {
            match self.fit(tree, candidate) {
                Fit::Inside(inline) => return Some(inline),
                Fit::Before if forward => {}
                Fit::After if !forward => {}
                Fit::Before | Fit::After => return None,
            }
            candidate = get_next_previous_inline_element(tree, self.root, &candidate, forward)?;
        }
    }

    fn fit(&self, tree: &ContentTree, inline: InlineElement) -> Fit {
        match self.scope {
            TraversalScope::Body => Fit::Inside(inline),
            TraversalScope::Block(_) => match self.current_block {
                Some(block) if block.contains(tree, inline.container_node()) => {
                    Fit::Inside(inline)
                }
                _ => Fit::After,
            },
            TraversalScope::Selection(range) => trim_to_range(tree, inline, &range),
        }
    }
}

fn block_overlaps(tree: &ContentTree, block: &BlockElement, range: &SelectionRange) -> bool {
    let start = Position::new(tree, block.start_node(), 0);
    let end_node = block.end_node();
    let end = Position::new(tree, end_node, Position::end_offset(tree, end_node));
    !start.is_after(tree, &range.end()) && !range.start().is_after(tree, &end)
}

fn trim_to_range(tree: &ContentTree, inline: InlineElement, range: &SelectionRange) -> Fit {
    let range_start = range.start().normalize(tree);
    let range_end = range.end().normalize(tree);
    if inline.end_position(tree).compare(tree, &range_start) != Ordering::Greater {
        return Fit::Before;
    }
    if inline.start_position(tree).compare(tree, &range_end) != Ordering::Less {
        return Fit::After;
    }

    let node = inline.container_node();
    if tree.kind(node) != NodeKind::Text {
        return Fit::Inside(inline);
    }
    let length = tree.text_len(node);
    let span = inline.span().unwrap_or(TextSpan {
        start: 0,
        end: length,
    });
    let start = if range_start.node() == node {
        span.start.max(range_start.offset())
    } else {
        span.start
    };
    let end = if range_end.node() == node {
        span.end.min(range_end.offset())
    } else {
        span.end
    };

    if start >= end {
        Fit::Before
    } else if start == 0 && end == length {
        Fit::Inside(InlineElement::new(node, inline.parent_block()))
    } else {
        Fit::Inside(InlineElement::partial(
            node,
            inline.parent_block(),
            TextSpan { start, end },
        ))
    }
}
