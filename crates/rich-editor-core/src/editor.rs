//! Editor Façade
//!
//! [`Editor`] owns one editable root and everything attached to it: the content tree, the
//! selection host and its cache, the undo history, observers and deferred tasks.
//!
//! # Overview
//!
//! There is no global "current editor". Every caller holds an `Editor` (or a `&mut Editor`)
//! and passes it explicitly; editors never share state with each other.
//!
//! # Transactions
//!
//! [`Editor::add_undo_snapshot_with`] groups a batch of mutations into one undoable,
//! observable unit:
//!
//! 1. the outermost call snapshots the content, runs the callback, snapshots again, and then
//!    (only if a change source was given) emits a single [`ContentChangedEvent`] carrying the
//!    callback's return value;
//! 2. a call made while another transaction is running only runs its callback.
//!
//! The depth counter is released on every exit path. If the callback fails, the error is
//! returned as is; the snapshot taken before it stays in history and no event is emitted.
//!
//! # Example
//!
//! ```rust
//! use rich_editor_core::{ChangeSource, Editor, EditorOptions};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let mut editor = Editor::new(EditorOptions::default().with_initial_content("<div>a</div>")).unwrap();
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//! editor.subscribe(move |event| sink.borrow_mut().push(event.clone()));
//!
//! let value = editor
//!     .add_undo_snapshot_with(Some(ChangeSource::Format), |editor, _, _| {
//!         editor.add_undo_snapshot_with(Some(ChangeSource::Paste), |_, _, _| Ok(1))?;
//!         Ok(2)
//!     })
//!     .unwrap();
//!
//! assert_eq!(value, 2);
//! assert_eq!(seen.borrow().len(), 1);
//! assert_eq!(seen.borrow()[0].source, ChangeSource::Format);
//! ```

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::block::{BlockElement, get_block_element_at_node};
use crate::error::{EditorError, Result};
use crate::events::{ChangeSource, ContentChangedCallback, ContentChangedEvent};
use crate::inline::{InlineElement, get_inline_element_at_node};
use crate::insert::{self, InsertOption};
use crate::markup::{parse_fragment, serialize_children};
use crate::options::EditorOptions;
use crate::position::Position;
use crate::range::SelectionRange;
use crate::selection::{InMemorySelection, SelectionCache, SelectionHost};
use crate::traverser::ContentTraverser;
use crate::tree::{ContentTree, NodeId, NodeKind};
use crate::undo::{Snapshot, UndoSnapshots};

/// Task queued with [`Editor::run_async`].
pub type DeferredTask<H> = Box<dyn FnOnce(&mut Editor<H>)>;

/// What [`Editor::select`] should select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectTarget {
    /// An existing range.
    Range(SelectionRange),
    /// A collapsed selection at a position.
    Position(Position),
    /// A range between two positions, in either order.
    Positions(Position, Position),
    /// The node itself.
    Node(NodeId),
    /// The contents of the node.
    NodeContents(NodeId),
    /// Explicit `(container, offset)` boundary points.
    Points {
        /// Start container and offset.
        start: (NodeId, usize),
        /// End container and offset.
        end: (NodeId, usize),
    },
}

struct TransactionGuard {
    depth: Rc<Cell<usize>>,
}

impl TransactionGuard {
    fn enter(depth: &Rc<Cell<usize>>) -> Self {
        depth.set(depth.get() + 1);
        Self {
            depth: Rc::clone(depth),
        }
    }
}

impl Drop for TransactionGuard {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

/// A headless rich-text editor bound to one editable root.
pub struct Editor<H: SelectionHost = InMemorySelection> {
    tree: ContentTree,
    root: NodeId,
    host: H,
    cache: SelectionCache,
    undo: UndoSnapshots,
    transaction_depth: Rc<Cell<usize>>,
    observers: Vec<ContentChangedCallback>,
    deferred: VecDeque<DeferredTask<H>>,
}

impl Editor<InMemorySelection> {
    /// Create an editor with the headless in-memory selection host.
    pub fn new(options: EditorOptions) -> Result<Self> {
        Self::with_host(options, InMemorySelection::new())
    }
}

impl<H: SelectionHost> Editor<H> {
    /// Create an editor driven by a custom selection host.
    pub fn with_host(options: EditorOptions, host: H) -> Result<Self> {
        let mut tree = ContentTree::new(options.schema);
        let root = tree.create_element(&options.root_tag);
        if let Some(el) = tree.element_mut(root) {
            el.set_attribute("contenteditable", "true");
        }
        tree.append_child(tree.document(), root)?;

        let mut editor = Self {
            tree,
            root,
            host,
            cache: SelectionCache::new(),
            undo: UndoSnapshots::new(options.undo_max_size),
            transaction_depth: Rc::new(Cell::new(0)),
            observers: Vec::new(),
            deferred: VecDeque::new(),
        };
        if let Some(content) = options.initial_content.as_deref() {
            editor.replace_content(content)?;
        }
        editor.take_snapshot();
        Ok(editor)
    }

    /// The content tree.
    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    /// Mutable access to the content tree.
    ///
    /// Mutations made here are not recorded; wrap them in
    /// [`Editor::add_undo_snapshot_with`] to make them undoable.
    pub fn tree_mut(&mut self) -> &mut ContentTree {
        &mut self.tree
    }

    /// The editable root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The selection host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the selection host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The undo history.
    pub fn undo_snapshots(&self) -> &UndoSnapshots {
        &self.undo
    }

    /// Current transaction nesting depth (0 when idle).
    pub fn transaction_depth(&self) -> usize {
        self.transaction_depth.get()
    }

    /// Serialized content of the root.
    pub fn get_content(&self) -> String {
        serialize_children(&self.tree, self.root)
    }

    /// Replace the whole content and emit a `SetContent` event.
    pub fn set_content(&mut self, content: &str) -> Result<()> {
        self.replace_content(content)?;
        self.trigger_content_changed_event(ChangeSource::SetContent, None);
        Ok(())
    }

    fn replace_content(&mut self, content: &str) -> Result<()> {
        let fragment = parse_fragment(&mut self.tree, content)?;
        for old in self.tree.remove_children(self.root) {
            self.tree.release(old);
        }
        let result = self.tree.append_child(self.root, fragment);
        self.tree.release(fragment);
        result
    }

    /// Returns `true` if the root holds no visible content.
    ///
    /// Whitespace and `br` elements do not count as content; any other void element does.
    pub fn is_empty(&self) -> bool {
        self.tree.text_content(self.root).trim().is_empty()
            && !self.tree.descendants(self.root).any(|n| {
                self.tree.kind(n) == NodeKind::VoidElement && !self.tree.has_tag(n, "br")
            })
    }

    /// Returns `true` if `node` is inside the root (the root itself excluded).
    pub fn contains(&self, node: NodeId) -> bool {
        self.tree.contains(self.root, node, false)
    }

    fn ensure_inside(&self, node: NodeId) -> Result<()> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(EditorError::OutsideRoot {
                node,
                root: self.root,
            })
        }
    }

    /// Insert `node` as described by `option`.
    ///
    /// Returns `Ok(false)` when a `SelectionStart` insertion finds no selection.
    pub fn insert_node(&mut self, node: NodeId, option: &InsertOption) -> Result<bool> {
        if self.tree.contains(node, self.root, true) {
            return Err(EditorError::HierarchyRequest {
                parent: self.root,
                child: node,
            });
        }
        insert::insert_node(
            &mut self.tree,
            self.root,
            &mut self.host,
            &mut self.cache,
            node,
            option,
        )
    }

    /// Parse `html` and insert it as described by `option`.
    pub fn insert_content(&mut self, html: &str, option: &InsertOption) -> Result<bool> {
        let fragment = parse_fragment(&mut self.tree, html)?;
        let result = self.insert_node(fragment, option);
        // whatever was not inserted goes with the fragment
        self.tree.release(fragment);
        result
    }

    /// Remove a node inside the root.
    pub fn delete_node(&mut self, node: NodeId) -> Result<()> {
        self.ensure_inside(node)?;
        self.tree.remove(node);
        Ok(())
    }

    /// Put `replacement` where `existing` is and detach `existing`.
    pub fn replace_node(&mut self, existing: NodeId, replacement: NodeId) -> Result<()> {
        self.ensure_inside(existing)?;
        let parent = self
            .tree
            .parent(existing)
            .ok_or(EditorError::Detached(existing))?;
        self.tree.insert_before(parent, replacement, Some(existing))?;
        self.tree.remove(existing);
        Ok(())
    }

    /// Select `target`. Returns `false` if it does not resolve to a range inside the root.
    pub fn select(&mut self, target: SelectTarget) -> bool {
        let tree = &self.tree;
        let range = match target {
            SelectTarget::Range(range) => range,
            SelectTarget::Position(position) => SelectionRange::collapsed_at(position),
            SelectTarget::Positions(a, b) => SelectionRange::new(tree, a, b),
            SelectTarget::Node(node) => match SelectionRange::from_node(tree, node) {
                Ok(range) => range,
                Err(err) => {
                    warn!(%err, "cannot select node");
                    return false;
                }
            },
            SelectTarget::NodeContents(node) => SelectionRange::from_node_contents(tree, node),
            SelectTarget::Points { start, end } => SelectionRange::new(
                tree,
                Position::new(tree, start.0, start.1),
                Position::new(tree, end.0, end.1),
            ),
        };

        let host_range = range.get_range(tree);
        if !tree.contains(self.root, host_range.start_container, true)
            || !tree.contains(self.root, host_range.end_container, true)
        {
            warn!(?target, "selection target is outside the editable root");
            return false;
        }
        self.cache.apply(&self.tree, &mut self.host, range);
        true
    }

    /// The authoritative selection: live if available, otherwise the cached backup.
    pub fn get_selection_range(&self) -> Option<SelectionRange> {
        self.cache.resolve(&self.tree, self.root, &self.host, true)
    }

    /// Returns `true` if the host has focus.
    pub fn has_focus(&self) -> bool {
        self.host.has_focus()
    }

    /// Focus the root, putting the cached selection back if the host lost it.
    pub fn focus(&mut self) {
        if !self.host.has_focus()
            && let Some(range) = self.cache.resolve(&self.tree, self.root, &self.host, true)
        {
            self.host.set_live_range(Some(range.get_range(&self.tree)));
        }
        self.host.focus();
    }

    /// Blur the root, saving the live selection into the cache first.
    pub fn blur(&mut self) {
        if let Some(range) = self.cache.resolve(&self.tree, self.root, &self.host, false) {
            self.cache.save(range);
        }
        self.host.blur();
    }

    /// Block element containing `node`.
    pub fn get_block_element_at_node(&self, node: NodeId) -> Option<BlockElement> {
        get_block_element_at_node(&self.tree, self.root, node)
    }

    /// Inline element containing `node`.
    pub fn get_inline_element_at_node(&self, node: NodeId) -> Option<InlineElement> {
        let block = self.get_block_element_at_node(node)?;
        Some(get_inline_element_at_node(&self.tree, &block, node))
    }

    /// Traverser over the whole root.
    pub fn get_body_traverser(&self) -> ContentTraverser {
        ContentTraverser::create_body_traverser(&self.tree, self.root)
    }

    /// Traverser over the current selection, if there is one.
    pub fn get_selection_traverser(&self) -> Option<ContentTraverser> {
        let range = self.get_selection_range()?;
        Some(ContentTraverser::create_selection_traverser(
            &self.tree, self.root, range,
        ))
    }

    /// Traverser over the block containing `position`.
    pub fn get_block_traverser(&self, position: Position) -> ContentTraverser {
        ContentTraverser::create_block_traverser(&self.tree, self.root, position)
    }

    /// Record an undo snapshot without running a callback.
    ///
    /// With a change source, a content-changed event without data is emitted afterwards.
    pub fn add_undo_snapshot(&mut self, change_source: Option<ChangeSource>) -> Result<()> {
        self.add_undo_snapshot_with(change_source, |_, _, _| Ok(()))
    }

    /// Run `callback` as one undoable transaction.
    ///
    /// The callback receives the editor and the normalized start and end of the current
    /// selection. See the [module docs](self) for the nesting rules.
    pub fn add_undo_snapshot_with<R, F>(
        &mut self,
        change_source: Option<ChangeSource>,
        callback: F,
    ) -> Result<R>
    where
        R: Serialize,
        F: FnOnce(&mut Self, Option<Position>, Option<Position>) -> Result<R>,
    {
        let outermost = self.transaction_depth.get() == 0;
        let guard = TransactionGuard::enter(&self.transaction_depth);
        let (start, end) = self.selection_endpoints();

        if !outermost {
            trace!(depth = self.transaction_depth.get(), "nested transaction");
            return callback(self, start, end);
        }

        debug!(source = ?change_source, "transaction started");
        self.take_snapshot();
        let result = callback(self, start, end)?;
        self.take_snapshot();
        drop(guard);

        if let Some(source) = change_source {
            let data = match serde_json::to_value(&result)? {
                serde_json::Value::Null => None,
                value => Some(value),
            };
            self.trigger_content_changed_event(source, data);
        }
        Ok(result)
    }

    fn selection_endpoints(&self) -> (Option<Position>, Option<Position>) {
        match self.get_selection_range() {
            Some(range) => (
                Some(range.start().normalize(&self.tree)),
                Some(range.end().normalize(&self.tree)),
            ),
            None => (None, None),
        }
    }

    fn take_snapshot(&mut self) {
        let snapshot = Snapshot::capture(&self.tree, self.root, self.get_selection_range());
        if self.undo.add_snapshot(snapshot) {
            trace!(snapshots = self.undo.len(), "undo snapshot recorded");
        }
    }

    fn has_new_content(&self) -> bool {
        self.undo
            .current()
            .is_some_and(|current| current.content != self.get_content())
    }

    /// Returns `true` if there is something to undo.
    pub fn can_undo(&self) -> bool {
        self.has_new_content() || self.undo.can_move(-1)
    }

    /// Returns `true` if there is something to redo.
    pub fn can_redo(&self) -> bool {
        !self.has_new_content() && self.undo.can_move(1)
    }

    /// Step back one snapshot. Unrecorded changes are recorded first so they can be redone.
    pub fn undo(&mut self) -> Result<bool> {
        if self.has_new_content() {
            self.take_snapshot();
        }
        self.step_history(-1, ChangeSource::Undo)
    }

    /// Step forward one snapshot.
    pub fn redo(&mut self) -> Result<bool> {
        if self.has_new_content() {
            return Ok(false);
        }
        self.step_history(1, ChangeSource::Redo)
    }

    fn step_history(&mut self, delta: isize, source: ChangeSource) -> Result<bool> {
        let Some(snapshot) = self.undo.move_by(delta).cloned() else {
            return Ok(false);
        };
        self.replace_content(&snapshot.content)?;
        if let Some(range) = snapshot.restore_selection(&self.tree, self.root) {
            self.cache.apply(&self.tree, &mut self.host, range);
        }
        debug!(%source, "history step applied");
        self.trigger_content_changed_event(source, None);
        Ok(true)
    }

    /// Notify every observer.
    pub fn trigger_content_changed_event(
        &mut self,
        source: ChangeSource,
        data: Option<serde_json::Value>,
    ) {
        let event = ContentChangedEvent { source, data };
        trace!(source = %event.source, observers = self.observers.len(), "content changed");
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    /// Register a content-changed observer.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&ContentChangedEvent) + 'static,
    {
        self.observers.push(Box::new(callback));
    }

    /// Queue `task` to run later, when the host calls [`Editor::run_deferred`].
    pub fn run_async<F>(&mut self, task: F)
    where
        F: FnOnce(&mut Self) + 'static,
    {
        self.deferred.push_back(Box::new(task));
    }

    /// Number of queued tasks.
    pub fn pending_tasks(&self) -> usize {
        self.deferred.len()
    }

    /// Run queued tasks (including tasks they queue) and return how many ran.
    pub fn run_deferred(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.deferred.pop_front() {
            task(self);
            ran += 1;
        }
        ran
    }
}
