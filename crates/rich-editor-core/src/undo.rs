//! Undo snapshots.
//!
//! A linear history of serialized content. Each entry also records the selection as
//! root-relative node paths, so the selection survives re-parsing the content on undo.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::markup::serialize_children;
use crate::position::Position;
use crate::range::SelectionRange;
use crate::tree::{ContentTree, NodeId};

/// Default cap on the total number of content chars kept in history.
pub const DEFAULT_UNDO_MAX_SIZE: usize = 10_000_000;

/// A boundary point stored as a child-index path from the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotPoint {
    /// Child indexes from the root down to the container.
    pub path: Vec<usize>,
    /// Offset inside the container.
    pub offset: usize,
}

/// Serialized content plus selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Serialized children of the root.
    pub content: String,
    /// Selection start and end, if there was a selection inside the root.
    pub selection: Option<(SnapshotPoint, SnapshotPoint)>,
}

impl Snapshot {
    /// Capture the current content and `selection`.
    pub fn capture(tree: &ContentTree, root: NodeId, selection: Option<SelectionRange>) -> Self {
        let selection = selection.and_then(|range| {
            let host = range.get_range(tree);
            let start = tree.path_from(root, host.start_container)?;
            let end = tree.path_from(root, host.end_container)?;
            Some((
                SnapshotPoint {
                    path: start,
                    offset: host.start_offset,
                },
                SnapshotPoint {
                    path: end,
                    offset: host.end_offset,
                },
            ))
        });
        Self {
            content: serialize_children(tree, root),
            selection,
        }
    }

    /// Resolve the stored selection against the (restored) content under `root`.
    ///
    /// Returns `None` if the paths no longer exist, which happens when adjacent text nodes
    /// were merged by re-parsing.
    pub fn restore_selection(&self, tree: &ContentTree, root: NodeId) -> Option<SelectionRange> {
        let (start, end) = self.selection.as_ref()?;
        let start_node = tree.node_at_path(root, &start.path)?;
        let end_node = tree.node_at_path(root, &end.path)?;
        Some(SelectionRange::new(
            tree,
            Position::new(tree, start_node, start.offset),
            Position::new(tree, end_node, end.offset),
        ))
    }

    fn size(&self) -> usize {
        self.content.chars().count()
    }
}

/// Linear undo history with a size cap.
#[derive(Debug, Clone)]
pub struct UndoSnapshots {
    snapshots: VecDeque<Snapshot>,
    index: usize,
    total_size: usize,
    max_size: usize,
}

impl UndoSnapshots {
    /// Create an empty history holding at most `max_size` content chars.
    pub fn new(max_size: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            index: 0,
            total_size: 0,
            max_size,
        }
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns `true` if nothing was recorded yet.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Total content chars across all snapshots.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// The snapshot the history currently points at.
    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.index)
    }

    /// Record `snapshot`. Returns `false` if its content equals the current snapshot.
    ///
    /// Recording drops every redo entry, then evicts the oldest snapshots while the size cap
    /// is exceeded (the newest snapshot is always kept).
    pub fn add_snapshot(&mut self, snapshot: Snapshot) -> bool {
        if self
            .current()
            .is_some_and(|current| current.content == snapshot.content)
        {
            return false;
        }

        if !self.snapshots.is_empty() {
            for dropped in self.snapshots.drain(self.index + 1..) {
                self.total_size -= dropped.size();
            }
        }

        self.total_size += snapshot.size();
        self.snapshots.push_back(snapshot);
        self.index = self.snapshots.len() - 1;

        while self.total_size > self.max_size && self.snapshots.len() > 1 {
            if let Some(evicted) = self.snapshots.pop_front() {
                self.total_size -= evicted.size();
                self.index -= 1;
            }
        }
        true
    }

    /// Returns `true` if moving by `delta` stays inside the history.
    pub fn can_move(&self, delta: isize) -> bool {
        let target = self.index as isize + delta;
        !self.snapshots.is_empty() && target >= 0 && (target as usize) < self.snapshots.len()
    }

    /// Move by `delta` and return the snapshot landed on.
    pub fn move_by(&mut self, delta: isize) -> Option<&Snapshot> {
        if !self.can_move(delta) {
            return None;
        }
        self.index = (self.index as isize + delta) as usize;
        self.snapshots.get(self.index)
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.index = 0;
        self.total_size = 0;
    }
}

impl Default for UndoSnapshots {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_MAX_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(content: &str) -> Snapshot {
        Snapshot {
            content: content.to_string(),
            selection: None,
        }
    }

    #[test]
    fn test_duplicate_content_is_ignored() {
        let mut history = UndoSnapshots::default();
        assert!(history.add_snapshot(snap("a")));
        assert!(!history.add_snapshot(snap("a")));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_add_clears_redo() {
        let mut history = UndoSnapshots::default();
        history.add_snapshot(snap("a"));
        history.add_snapshot(snap("ab"));
        history.add_snapshot(snap("abc"));
        assert_eq!(history.move_by(-2).map(|s| s.content.as_str()), Some("a"));
        assert!(history.can_move(1));

        history.add_snapshot(snap("x"));
        assert!(!history.can_move(1));
        assert_eq!(history.len(), 2);
        assert_eq!(history.total_size(), 2);
    }

    #[test]
    fn test_size_cap_evicts_oldest() {
        let mut history = UndoSnapshots::new(5);
        history.add_snapshot(snap("aa"));
        history.add_snapshot(snap("bb"));
        history.add_snapshot(snap("cc"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.total_size(), 4);
        assert_eq!(history.move_by(-1).map(|s| s.content.as_str()), Some("bb"));
        assert!(!history.can_move(-1));

        history.add_snapshot(snap("a very long snapshot"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().map(|s| s.content.as_str()), Some("a very long snapshot"));
    }

    #[test]
    fn test_selection_paths_round_trip() {
        let mut tree = ContentTree::default();
        let root = tree.create_element("div");
        tree.append_child(tree.document(), root).unwrap();
        let p = tree.create_element("p");
        tree.append_child(root, p).unwrap();
        let text = tree.create_text("hello");
        tree.append_child(p, text).unwrap();

        let range = SelectionRange::new(
            &tree,
            Position::new(&tree, text, 1),
            Position::new(&tree, text, 4),
        );
        let snapshot = Snapshot::capture(&tree, root, Some(range));
        assert_eq!(snapshot.content, "<p>hello</p>");

        let restored = snapshot.restore_selection(&tree, root).unwrap();
        assert_eq!(restored, range);
    }
}
