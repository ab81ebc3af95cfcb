//! Ordered position pairs.

use std::cmp::Ordering;

use crate::error::{EditorError, Result};
use crate::position::{Position, PositionType};
use crate::selection::HostRange;
use crate::tree::{ContentTree, NodeId, NodeKind};

/// An ordered pair of positions, `start <= end`.
///
/// Like [`Position`], a range is a value: copying it never shares state with the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionRange {
    start: Position,
    end: Position,
}

impl SelectionRange {
    /// Build a range from two positions in either order.
    pub fn new(tree: &ContentTree, a: Position, b: Position) -> Self {
        if a.is_after(tree, &b) {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    /// A collapsed range at `position`.
    pub fn collapsed_at(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Build a range from a live host range.
    pub fn from_host(tree: &ContentTree, range: &HostRange) -> Self {
        Self::new(
            tree,
            Position::new(tree, range.start_container, range.start_offset),
            Position::new(tree, range.end_container, range.end_offset),
        )
    }

    /// A range that selects `node` itself.
    pub fn from_node(tree: &ContentTree, node: NodeId) -> Result<Self> {
        Ok(Self {
            start: Position::at(tree, node, PositionType::Before)?,
            end: Position::at(tree, node, PositionType::After)?,
        })
    }

    /// A range that selects the contents of `node`.
    pub fn from_node_contents(tree: &ContentTree, node: NodeId) -> Self {
        Self {
            start: Position::new(tree, node, 0),
            end: Position::new(tree, node, Position::end_offset(tree, node)),
        }
    }

    /// Start position.
    pub fn start(&self) -> Position {
        self.start
    }

    /// End position.
    pub fn end(&self) -> Position {
        self.end
    }

    /// Returns `true` when start and end denote the same location.
    pub fn is_collapsed(&self, tree: &ContentTree) -> bool {
        self.start.equal_to(tree, &self.end)
    }

    /// Collapse onto the start (or end).
    pub fn collapse(&self, to_start: bool) -> Self {
        Self::collapsed_at(if to_start { self.start } else { self.end })
    }

    /// Normalize both endpoints.
    pub fn normalize(&self, tree: &ContentTree) -> Self {
        Self {
            start: self.start.normalize(tree),
            end: self.end.normalize(tree),
        }
    }

    /// Materialize the range as host boundary points.
    pub fn get_range(&self, tree: &ContentTree) -> HostRange {
        let (start_container, start_offset) = self.start.to_dom_point(tree);
        let (end_container, end_offset) = self.end.to_dom_point(tree);
        HostRange {
            start_container,
            start_offset,
            end_container,
            end_offset,
        }
    }

    /// Returns `true` if `position` lies within the range (inclusive).
    pub fn contains_position(&self, tree: &ContentTree, position: &Position) -> bool {
        !self.start.is_after(tree, position) && !position.is_after(tree, &self.end)
    }

    /// Returns `true` if the whole content of `node` lies within the range.
    pub fn contains_node(&self, tree: &ContentTree, node: NodeId) -> bool {
        let begin = Position::new(tree, node, 0);
        let end = Position::new(tree, node, Position::end_offset(tree, node));
        self.contains_position(tree, &begin) && self.contains_position(tree, &end)
    }

    /// Point both endpoints at `to` where they currently point at `from`.
    pub fn remap_node(&self, from: NodeId, to: NodeId) -> Self {
        Self {
            start: self.start.remap(from, to),
            end: self.end.remap(from, to),
        }
    }

    /// Remove everything inside the range and return the collapsed position left behind.
    ///
    /// Text at either edge is trimmed; nodes fully inside the range are released. Partially
    /// selected elements are kept, so blocks on both sides are not merged.
    pub fn delete_contents(&self, tree: &mut ContentTree) -> Result<Position> {
        let (start_node, start_offset) = self.start.normalize(tree).to_dom_point(tree);
        let (end_node, end_offset) = self.end.normalize(tree).to_dom_point(tree);

        if start_node == end_node && tree.kind(start_node) == NodeKind::Text {
            if end_offset > start_offset {
                tree.delete_text(start_node, start_offset..end_offset)?;
            }
            return Ok(Position::new(tree, start_node, start_offset));
        }
        if tree.compare_points((start_node, start_offset), (end_node, end_offset))
            != Ordering::Less
        {
            return Ok(Position::new(tree, start_node, start_offset));
        }

        let end = if tree.kind(end_node) == NodeKind::Text {
            let length = tree.text_len(end_node);
            if end_offset > 0 && end_offset < length {
                tree.split_text(end_node, end_offset)?;
            }
            let (parent, index) = parent_and_index(tree, end_node)?;
            (parent, if end_offset > 0 { index + 1 } else { index })
        } else {
            (end_node, end_offset)
        };

        let (start, collapsed) = if tree.kind(start_node) == NodeKind::Text {
            let length = tree.text_len(start_node);
            let (parent, index) = parent_and_index(tree, start_node)?;
            if start_offset > 0 {
                tree.delete_text(start_node, start_offset..length)?;
                ((parent, index + 1), (start_node, start_offset))
            } else {
                ((parent, index), (parent, index))
            }
        } else {
            ((start_node, start_offset), (start_node, start_offset))
        };

        let Some(common) = std::iter::once(start.0)
            .chain(tree.ancestors(start.0))
            .find(|&a| tree.contains(a, end.0, true))
        else {
            return Ok(Position::new(tree, collapsed.0, collapsed.1));
        };

        let fully_inside = |tree: &ContentTree, node: NodeId| -> bool {
            match (tree.parent(node), tree.child_index(node)) {
                (Some(parent), Some(index)) => {
                    tree.compare_points((parent, index), start) != Ordering::Less
                        && tree.compare_points((parent, index + 1), end) != Ordering::Greater
                }
                _ => false,
            }
        };
        let view: &ContentTree = tree;
        let doomed: Vec<NodeId> = view
            .descendants(common)
            .filter(|&node| {
                fully_inside(view, node)
                    && !view
                        .parent(node)
                        .is_some_and(|parent| fully_inside(view, parent))
            })
            .collect();
        for node in doomed {
            tree.release(node);
        }

        Ok(Position::new(tree, collapsed.0, collapsed.1))
    }

    /// Insert `node` at the start of the range and report where it went.
    ///
    /// A text container is split only when the offset is strictly inside it. For an element
    /// container the node goes before the child at the offset.
    pub fn insert_node(&self, tree: &mut ContentTree, node: NodeId) -> Result<Insertion> {
        let (container, offset) = self.start.to_dom_point(tree);
        let count = match tree.kind(node) {
            NodeKind::Fragment => tree.children(node).len(),
            NodeKind::Text | NodeKind::Element | NodeKind::VoidElement => 1,
        };
        match tree.kind(container) {
            NodeKind::Text => {
                let length = tree.text_len(container);
                let (parent, index) = parent_and_index(tree, container)?;
                if offset == 0 {
                    tree.insert_before(parent, node, Some(container))?;
                    Ok(Insertion::new(parent, index, count))
                } else if offset >= length {
                    tree.insert_after(container, node)?;
                    Ok(Insertion::new(parent, index + 1, count))
                } else {
                    let tail = tree.split_text(container, offset)?;
                    tree.insert_before(parent, node, Some(tail))?;
                    Ok(Insertion {
                        split: Some(TextSplit {
                            head: container,
                            offset,
                            tail,
                        }),
                        ..Insertion::new(parent, index + 1, count)
                    })
                }
            }
            NodeKind::Element | NodeKind::Fragment => {
                let children = tree.children(container);
                let index = offset.min(children.len());
                let reference = children.get(offset).copied();
                tree.insert_before(container, node, reference)?;
                Ok(Insertion::new(container, index, count))
            }
            NodeKind::VoidElement => Err(EditorError::HierarchyRequest {
                parent: container,
                child: node,
            }),
        }
    }

    /// Follow the boundary points through an insertion made by [`SelectionRange::insert_node`].
    ///
    /// Points in the split text at or past the split offset move onto the tail. Points in the
    /// parent after the insertion index shift right by the number of new children.
    pub fn track_insertion(&self, tree: &ContentTree, insertion: &Insertion) -> Self {
        self.map_points(tree, |(node, offset)| {
            if let Some(split) = insertion.split
                && node == split.head
                && offset >= split.offset
            {
                return (split.tail, offset - split.offset);
            }
            if node == insertion.parent {
                let added = match insertion.split {
                    Some(_) if offset >= insertion.index => insertion.count + 1,
                    None if offset > insertion.index => insertion.count,
                    _ => 0,
                };
                return (node, offset + added);
            }
            (node, offset)
        })
    }

    /// Rewrite both boundary points with `f`. Endpoints `f` leaves alone keep their original
    /// (possibly unnormalized) form.
    pub fn map_points<F>(&self, tree: &ContentTree, f: F) -> Self
    where
        F: Fn((NodeId, usize)) -> (NodeId, usize),
    {
        let map = |position: Position| {
            let point = position.to_dom_point(tree);
            let mapped = f(point);
            if mapped == point {
                position
            } else {
                Position::new(tree, mapped.0, mapped.1)
            }
        };
        Self {
            start: map(self.start),
            end: map(self.end),
        }
    }
}

/// A text node split made room for an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSplit {
    /// The original node, now holding the head.
    pub head: NodeId,
    /// Char offset of the split.
    pub offset: usize,
    /// New node holding the tail.
    pub tail: NodeId,
}

/// Where [`SelectionRange::insert_node`] put the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    /// Parent that received the new children.
    pub parent: NodeId,
    /// Child index of the first new child, counted before the insertion.
    pub index: usize,
    /// Number of new children (the children of an inserted fragment).
    pub count: usize,
    /// Text split made first, if any. `index` is then the position of the tail.
    pub split: Option<TextSplit>,
}

impl Insertion {
    fn new(parent: NodeId, index: usize, count: usize) -> Self {
        Self {
            parent,
            index,
            count,
            split: None,
        }
    }
}

fn parent_and_index(tree: &ContentTree, node: NodeId) -> Result<(NodeId, usize)> {
    match (tree.parent(node), tree.child_index(node)) {
        (Some(parent), Some(index)) => Ok((parent, index)),
        _ => Err(EditorError::Detached(node)),
    }
}
