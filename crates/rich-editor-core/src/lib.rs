#![warn(missing_docs)]
//! Rich Editor Core - Headless Rich-Text Editing Kernel
//!
//! # Overview
//!
//! `rich-editor-core` models the editable content of a rich-text editor as an element/text
//! tree and provides the operations an editor front end builds on. It does not render
//! anything and does not talk to a browser; the host (browser binding, terminal UI, test
//! harness) supplies the live selection through the [`SelectionHost`] trait.
//!
//! # Core Features
//!
//! - **Tree Positions**: [`Position`] and [`SelectionRange`] with normalization to leaf level
//! - **Block Model**: [`BlockElement`] covers both real block elements and runs of inline content
//! - **Inline Model**: [`InlineElement`] with partial text spans and per-grapheme styling
//! - **Traversal**: [`ContentTraverser`] walks the body, one block, or the selection
//! - **Insertion**: [`InsertOption`] anchors content at the begin, end, selection or outside
//! - **Selection Cache**: the last selection survives a blur of the host
//! - **Undo Transactions**: nested [`Editor::add_undo_snapshot_with`] calls collapse into one
//!   snapshot pair and one change notification
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Editor (transactions, events, deferred)    │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Insertion / Undo Snapshots                 │  ← Editing
//! ├─────────────────────────────────────────────┤
//! │  Traverser (body / block / selection)       │  ← Iteration
//! ├─────────────────────────────────────────────┤
//! │  Block & Inline Elements                    │  ← Content Model
//! ├─────────────────────────────────────────────┤
//! │  Position / Range / Selection Cache         │  ← Addressing
//! ├─────────────────────────────────────────────┤
//! │  Content Tree + Markup                      │  ← Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use rich_editor_core::{ContentPosition, Editor, EditorOptions, InsertOption};
//!
//! let mut editor = Editor::new(EditorOptions::default().with_initial_content("<div>hello</div>")).unwrap();
//!
//! editor
//!     .insert_content("X", &InsertOption::at(ContentPosition::Begin))
//!     .unwrap();
//! assert_eq!(editor.get_content(), "<div>Xhello</div>");
//!
//! editor
//!     .add_undo_snapshot_with(None, |editor, _, _| {
//!         editor.insert_content(
//!             "world",
//!             &InsertOption::at(ContentPosition::End).with_insert_on_new_line(true),
//!         )
//!     })
//!     .unwrap();
//! assert_eq!(editor.get_content(), "<div>Xhello</div><div>world</div>");
//!
//! assert!(editor.undo().unwrap());
//! assert_eq!(editor.get_content(), "<div>Xhello</div>");
//! ```
//!
//! # Module Description
//!
//! - [`tree`] - arena-backed content tree
//! - [`markup`] - HTML fragment parser and serializer
//! - [`position`] / [`range`] - tree addresses and ranges
//! - [`selection`] - host selection access and the selection cache
//! - [`block`] / [`inline`] - block and inline element model
//! - [`traverser`] - content traversal
//! - [`insert`] - node insertion planning
//! - [`undo`] - snapshot history
//! - [`editor`] - editor façade

pub mod block;
pub mod editor;
pub mod error;
pub mod events;
pub mod inline;
pub mod insert;
pub mod markup;
pub mod options;
pub mod position;
pub mod range;
pub mod selection;
pub mod traverser;
pub mod tree;
pub mod undo;

pub use block::{
    BlockElement, get_block_element_at_node, get_first_last_block_element,
    get_next_previous_block_element,
};
pub use editor::{DeferredTask, Editor, SelectTarget};
pub use error::{EditorError, Result};
pub use events::{ChangeSource, ContentChangedCallback, ContentChangedEvent};
pub use inline::{
    InlineElement, TextSpan, get_first_inline_element_in_block, get_first_last_inline_element,
    get_inline_element_at_node, get_next_previous_inline_element,
};
pub use insert::{ContentPosition, EdgePlan, InsertOption, plan_edge_insertion};
pub use options::EditorOptions;
pub use position::{Position, PositionType};
pub use range::{Insertion, SelectionRange, TextSplit};
pub use rich_editor_schema::ElementSchema;
pub use selection::{HostRange, InMemorySelection, SelectionCache, SelectionHost};
pub use traverser::{ContentTraverser, TraversalScope};
pub use tree::{ContentTree, ElementData, NodeData, NodeId, NodeKind};
pub use undo::{DEFAULT_UNDO_MAX_SIZE, Snapshot, SnapshotPoint, UndoSnapshots};
