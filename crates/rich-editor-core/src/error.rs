use thiserror::Error;

use crate::tree::NodeId;

/// Errors produced by the editing kernel.
///
/// Only genuine misuse is reported here. Structural edge cases such as an empty root or the end
/// of a traversal are modelled as `None` results instead.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The insertion would put a node inside itself, or under a node that cannot have children.
    #[error("cannot insert {child} under {parent}: hierarchy request")]
    HierarchyRequest {
        /// The would-be parent.
        parent: NodeId,
        /// The node being inserted.
        child: NodeId,
    },

    /// A reference sibling does not belong to the given parent.
    #[error("{reference} is not a child of {parent}")]
    NotAChild {
        /// The parent the reference was expected under.
        parent: NodeId,
        /// The reference node.
        reference: NodeId,
    },

    /// A text operation was requested on a non-text node.
    #[error("{0} is not a text node")]
    NotATextNode(NodeId),

    /// An element operation was requested on a text or fragment node.
    #[error("{0} is not an element")]
    NotAnElement(NodeId),

    /// A char or child offset exceeds the node's length.
    #[error("offset {offset} is out of bounds for {node} (length {length})")]
    InvalidOffset {
        /// The node the offset applies to.
        node: NodeId,
        /// The requested offset.
        offset: usize,
        /// The node's length.
        length: usize,
    },

    /// The operation needs a parent, but the node has none.
    #[error("{0} is detached from the document")]
    Detached(NodeId),

    /// The node is not a descendant of the editor's root.
    #[error("{node} is outside the editable root {root}")]
    OutsideRoot {
        /// The offending node.
        node: NodeId,
        /// The editable root.
        root: NodeId,
    },

    /// Serialized content could not be parsed.
    #[error("markup error at byte {offset}: {message}")]
    Markup {
        /// Byte offset into the input.
        offset: usize,
        /// What went wrong.
        message: String,
    },

    /// A transaction result could not be turned into an event payload.
    #[error("payload serialization failed: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EditorError>;
