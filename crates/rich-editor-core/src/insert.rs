//! Node insertion.
//!
//! Decides where a new node lands relative to block boundaries and performs the insertion.
//! The entry point is [`insert_node`]; [`Editor::insert_node`](crate::Editor::insert_node)
//! forwards to it with the editor's own tree, host and selection cache.

use tracing::debug;

use crate::block::{get_block_element_at_node, get_first_last_block_element};
use crate::error::{EditorError, Result};
use crate::position::{Position, PositionType};
use crate::range::SelectionRange;
use crate::selection::{SelectionCache, SelectionHost};
use crate::tree::{ContentTree, NodeId, NodeKind};

/// Where inserted content is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentPosition {
    /// Start of the first block.
    Begin,
    /// End of the last block.
    End,
    /// Start of the current selection.
    #[default]
    SelectionStart,
    /// Right after the root itself, outside the editable content.
    Outside,
}

/// Options for [`insert_node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InsertOption {
    /// Anchor of the insertion.
    pub position: ContentPosition,
    /// Move the selection after the inserted content.
    pub update_cursor: bool,
    /// Delete the selected content first (`SelectionStart` only).
    pub replace_selection: bool,
    /// Place the content in a block of its own.
    pub insert_on_new_line: bool,
}

impl Default for InsertOption {
    fn default() -> Self {
        Self {
            position: ContentPosition::SelectionStart,
            update_cursor: true,
            replace_selection: true,
            insert_on_new_line: false,
        }
    }
}

impl InsertOption {
    /// Default options anchored at `position`.
    pub fn at(position: ContentPosition) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Set `update_cursor`.
    pub fn with_update_cursor(mut self, update_cursor: bool) -> Self {
        self.update_cursor = update_cursor;
        self
    }

    /// Set `replace_selection`.
    pub fn with_replace_selection(mut self, replace_selection: bool) -> Self {
        self.replace_selection = replace_selection;
        self
    }

    /// Set `insert_on_new_line`.
    pub fn with_insert_on_new_line(mut self, insert_on_new_line: bool) -> Self {
        self.insert_on_new_line = insert_on_new_line;
        self
    }
}

/// Parent and reference sibling chosen for a `Begin`, `End` or `Outside` insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgePlan {
    /// New parent of the inserted node.
    pub parent: NodeId,
    /// Sibling to insert before; `None` appends.
    pub reference: Option<NodeId>,
}

/// Work out where a `Begin`, `End` or `Outside` insertion goes, without touching the tree.
///
/// `SelectionStart` is not an edge position and is rejected with
/// [`EditorError::HierarchyRequest`] on `root`.
pub fn plan_edge_insertion(
    tree: &ContentTree,
    root: NodeId,
    position: ContentPosition,
    insert_on_new_line: bool,
) -> Result<EdgePlan> {
    let is_begin = match position {
        ContentPosition::Begin => true,
        ContentPosition::End => false,
        ContentPosition::Outside => {
            let parent = tree.parent(root).ok_or(EditorError::Detached(root))?;
            return Ok(EdgePlan {
                parent,
                reference: tree.next_sibling(root),
            });
        }
        ContentPosition::SelectionStart => {
            return Err(EditorError::HierarchyRequest {
                parent: root,
                child: root,
            });
        }
    };

    let Some(block) = get_first_last_block_element(tree, root, is_begin) else {
        return Ok(EdgePlan {
            parent: root,
            reference: None,
        });
    };
    let anchor = if is_begin {
        block.start_node()
    } else {
        block.end_node()
    };

    let as_sibling = || -> Result<EdgePlan> {
        let parent = tree.parent(anchor).ok_or(EditorError::Detached(anchor))?;
        let reference = if is_begin {
            Some(anchor)
        } else {
            tree.next_sibling(anchor)
        };
        Ok(EdgePlan { parent, reference })
    };

    if insert_on_new_line {
        return as_sibling();
    }
    match tree.kind(anchor) {
        NodeKind::Text | NodeKind::VoidElement => as_sibling(),
        NodeKind::Element | NodeKind::Fragment => Ok(EdgePlan {
            parent: anchor,
            reference: if is_begin {
                tree.first_child(anchor)
            } else {
                None
            },
        }),
    }
}

/// Insert `node` according to `option`.
///
/// Returns `Ok(false)` only for a `SelectionStart` insertion when there is no selection to
/// anchor to; nothing is changed in that case. Structural misuse (inserting the root into
/// itself, an `Outside` insertion on a detached root, ...) is an error.
pub fn insert_node<H: SelectionHost + ?Sized>(
    tree: &mut ContentTree,
    root: NodeId,
    host: &mut H,
    cache: &mut SelectionCache,
    node: NodeId,
    option: &InsertOption,
) -> Result<bool> {
    debug!(?node, ?option, "inserting node");
    match option.position {
        ContentPosition::Begin | ContentPosition::End | ContentPosition::Outside => {
            let plan = plan_edge_insertion(tree, root, option.position, option.insert_on_new_line)?;
            debug!(?plan, "edge insertion planned");
            let inserted = top_level_nodes(tree, node);
            tree.insert_before(plan.parent, node, plan.reference)?;
            if option.insert_on_new_line && option.position != ContentPosition::Outside {
                wrap_in_block(tree, &inserted)?;
            }
            Ok(true)
        }
        ContentPosition::SelectionStart => insert_at_selection(tree, root, host, cache, node, option),
    }
}

fn insert_at_selection<H: SelectionHost + ?Sized>(
    tree: &mut ContentTree,
    root: NodeId,
    host: &mut H,
    cache: &mut SelectionCache,
    node: NodeId,
    option: &InsertOption,
) -> Result<bool> {
    let Some(mut range) = cache.resolve(tree, root, host, true) else {
        debug!("no selection to insert at");
        return Ok(false);
    };

    if option.replace_selection && !range.is_collapsed(tree) {
        let collapsed = range.delete_contents(tree)?;
        range = SelectionRange::collapsed_at(collapsed);
    }
    let mut restore = range;
    let mut position = range.start();
    let is_fragment = tree.kind(node) == NodeKind::Fragment;

    let start = range.start().normalize(tree);
    if let Some(block) = get_block_element_at_node(tree, root, start.node()) {
        let end = block.end_node();
        if option.insert_on_new_line {
            position = Position::at(tree, end, PositionType::After)?;
        } else if is_fragment
            && tree
                .tag(end)
                .is_some_and(|tag| tree.schema().is_paragraph_like(tag))
        {
            let generic = tree.schema().default_block_tag().to_string();
            let retyped = tree.change_tag(end, &generic)?;
            debug!(from = ?end, to = ?retyped, "retyped paragraph before fragment insertion");
            position = position.remap(end, retyped);
            restore = restore.remap_node(end, retyped);
        }
    }

    let inserted = top_level_nodes(tree, node);
    let cursor_node = inserted.last().copied();
    let insertion = SelectionRange::collapsed_at(position).insert_node(tree, node)?;
    restore = restore.track_insertion(tree, &insertion);
    if option.insert_on_new_line && wrap_in_block(tree, &inserted)?.is_some() {
        // the inserted run now sits in one wrapper
        let after = insertion.index + insertion.count;
        restore = restore.map_points(tree, |(container, offset)| {
            if container == insertion.parent && offset >= after {
                (container, offset + 1 - insertion.count)
            } else {
                (container, offset)
            }
        });
    }

    let selection = match cursor_node {
        Some(cursor) if option.update_cursor => SelectionRange::collapsed_at(
            Position::at(tree, cursor, PositionType::After)?.normalize(tree),
        ),
        _ => restore,
    };
    cache.apply(tree, host, selection);
    Ok(true)
}

fn top_level_nodes(tree: &ContentTree, node: NodeId) -> Vec<NodeId> {
    match tree.kind(node) {
        NodeKind::Fragment => tree.children(node).to_vec(),
        NodeKind::Text | NodeKind::Element | NodeKind::VoidElement => vec![node],
    }
}

fn wrap_in_block(tree: &mut ContentTree, nodes: &[NodeId]) -> Result<Option<NodeId>> {
    if nodes.iter().all(|&n| tree.is_block_element(n)) {
        return Ok(None);
    }
    let tag = tree.schema().default_block_tag().to_string();
    let wrapper = tree.wrap_all(nodes, &tag)?;
    if let Some(wrapper) = wrapper {
        debug!(?wrapper, count = nodes.len(), "wrapped inserted content in a block");
    }
    Ok(wrapper)
}
