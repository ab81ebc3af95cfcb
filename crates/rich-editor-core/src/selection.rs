//! Live selection host and the cached backup range.
//!
//! The host (a browser, a terminal front end, a test harness) owns the live selection. The
//! editor only reads and writes it through [`SelectionHost`]. Once the host loses focus its
//! range can no longer be trusted, so [`SelectionCache`] keeps the last range the editor saw
//! and hands it back when asked to.

use crate::position::Position;
use crate::range::SelectionRange;
use crate::tree::{ContentTree, NodeId};

/// Raw boundary points of a live host selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostRange {
    /// Container of the start point.
    pub start_container: NodeId,
    /// Offset inside `start_container`.
    pub start_offset: usize,
    /// Container of the end point.
    pub end_container: NodeId,
    /// Offset inside `end_container`.
    pub end_offset: usize,
}

impl HostRange {
    /// A collapsed host range.
    pub fn collapsed(container: NodeId, offset: usize) -> Self {
        Self {
            start_container: container,
            start_offset: offset,
            end_container: container,
            end_offset: offset,
        }
    }

    /// Returns `true` if both points coincide.
    pub fn is_collapsed(&self) -> bool {
        self.start_container == self.end_container && self.start_offset == self.end_offset
    }

    fn is_inside(&self, tree: &ContentTree, root: NodeId) -> bool {
        tree.contains(root, self.start_container, true)
            && tree.contains(root, self.end_container, true)
    }
}

/// Access to the host's live selection.
pub trait SelectionHost {
    /// Whether the editable root currently has input focus.
    fn has_focus(&self) -> bool;

    /// Give the editable root input focus.
    fn focus(&mut self);

    /// Take input focus away from the editable root.
    fn blur(&mut self);

    /// Current live range, if the host has one.
    fn live_range(&self) -> Option<HostRange>;

    /// Replace the live range.
    fn set_live_range(&mut self, range: Option<HostRange>);
}

/// Headless selection host backed by plain fields.
#[derive(Debug, Clone, Default)]
pub struct InMemorySelection {
    focused: bool,
    range: Option<HostRange>,
}

impl InMemorySelection {
    /// An unfocused host without a range.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionHost for InMemorySelection {
    fn has_focus(&self) -> bool {
        self.focused
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn live_range(&self) -> Option<HostRange> {
        self.range
    }

    fn set_live_range(&mut self, range: Option<HostRange>) {
        self.range = range;
    }
}

/// Backup of the last known selection.
#[derive(Debug, Clone, Default)]
pub struct SelectionCache {
    cached: Option<SelectionRange>,
}

impl SelectionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide which range is authoritative.
    ///
    /// The live range wins when the host has focus (or when the cache may not be used) and the
    /// range lies inside `root`. Otherwise, if `try_from_cache` is set, the cached range is
    /// returned as long as both of its containers are still inside `root`, with its offsets
    /// clamped to the current content.
    pub fn resolve<H: SelectionHost + ?Sized>(
        &self,
        tree: &ContentTree,
        root: NodeId,
        host: &H,
        try_from_cache: bool,
    ) -> Option<SelectionRange> {
        if (host.has_focus() || !try_from_cache)
            && let Some(live) = host.live_range()
            && live.is_inside(tree, root)
        {
            return Some(SelectionRange::from_host(tree, &live));
        }

        if !try_from_cache {
            return None;
        }
        let range = self.cached.filter(|range| {
            tree.contains(root, range.start().node(), true)
                && tree.contains(root, range.end().node(), true)
        })?;
        // the content may have shrunk since the range was saved
        let clamp = |position: Position| Position::new(tree, position.node(), position.offset());
        Some(SelectionRange::new(tree, clamp(range.start()), clamp(range.end())))
    }

    /// Remember `range` as the backup selection.
    pub fn save(&mut self, range: SelectionRange) {
        self.cached = Some(range);
    }

    /// Make `range` the live selection, and keep it as the backup while the host is unfocused.
    pub fn apply<H: SelectionHost + ?Sized>(
        &mut self,
        tree: &ContentTree,
        host: &mut H,
        range: SelectionRange,
    ) {
        host.set_live_range(Some(range.get_range(tree)));
        if !host.has_focus() {
            self.save(range);
        }
    }

    /// Forget the backup selection.
    pub fn clear(&mut self) {
        self.cached = None;
    }

    /// The stored backup selection, unvalidated.
    pub fn cached(&self) -> Option<SelectionRange> {
        self.cached
    }
}
