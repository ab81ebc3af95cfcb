//! Content Tree Storage
//!
//! An arena that owns every node of the edited document.
//!
//! # Overview
//!
//! Nodes are addressed by [`NodeId`] handles. Handles are cheap, `Copy`, and never own the node
//! they point at: [`Position`](crate::Position), [`SelectionRange`](crate::SelectionRange) and the
//! block/inline views all hold plain handles into this arena.
//!
//! Removing a node only detaches it (its parent becomes `None`), exactly like a DOM node that is
//! no longer in the document. Handles to detached nodes stay valid for reads, but any location
//! built from them before the mutation must be re-resolved by the caller.
//!
//! # Example
//!
//! ```rust
//! use rich_editor_core::ContentTree;
//!
//! let mut tree = ContentTree::default();
//! let div = tree.create_element("div");
//! let text = tree.create_text("hello");
//! tree.append_child(tree.document(), div).unwrap();
//! tree.append_child(div, text).unwrap();
//!
//! let right = tree.split_text(text, 2).unwrap();
//! assert_eq!(tree.text(text).as_deref(), Some("he"));
//! assert_eq!(tree.text(right).as_deref(), Some("llo"));
//! assert_eq!(tree.children(div), &[text, right]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;

use rich_editor_schema::ElementSchema;
use ropey::Rope;

use crate::error::{EditorError, Result};

/// Handle of a node inside a [`ContentTree`].
///
/// Arena slots are reused once a node is released, so a handle also carries the generation of
/// its slot. A handle to a released node never compares equal to the handle of the node that
/// took over its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Raw arena index of this node.
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Generation of the arena slot this handle was minted for.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "node#{}", self.index)
        } else {
            write!(f, "node#{}v{}", self.index, self.generation)
        }
    }
}

/// Closed classification of node kinds, matched exhaustively by the placement code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A run of text.
    Text,
    /// An element that can have children.
    Element,
    /// An element that can never have children (`br`, `img`, `hr`, ...).
    VoidElement,
    /// A detached container whose children move on insertion.
    Fragment,
}

/// Tag and attributes of an element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    tag: String,
    attributes: Vec<(String, String)>,
}

impl ElementData {
    /// Create element data with a lowercased tag and no attributes.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
        }
    }

    /// Lowercase tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Value of the attribute `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set (or overwrite) an attribute.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_ascii_lowercase(), value)),
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self
            .attributes
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.attributes.remove(index).1)
    }

    /// Look up a property in the inline `style` attribute.
    pub fn style_property(&self, property: &str) -> Option<&str> {
        self.attribute("style")?.split(';').find_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case(property)
                .then(|| value.trim())
        })
    }
}

/// Payload of a node.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Text content, char-indexed.
    Text(Rope),
    /// An element.
    Element(ElementData),
    /// A fragment (also used for the document node).
    Fragment,
}

#[derive(Debug, Clone)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// Arena that owns the document and every node created for it.
///
/// Accessors index the arena directly and panic when handed a [`NodeId`] minted by another tree.
/// Detached subtrees stay allocated until [`ContentTree::release`] returns their slots.
#[derive(Debug, Clone)]
pub struct ContentTree {
    nodes: Vec<Node>,
    free: Vec<u32>,
    document: NodeId,
    schema: ElementSchema,
}

impl ContentTree {
    /// Create an empty tree holding only the document node.
    pub fn new(schema: ElementSchema) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            document: NodeId {
                index: 0,
                generation: 0,
            },
            schema,
        };
        tree.document = tree.push(NodeData::Fragment);
        tree
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        if let Some(index) = self.free.pop() {
            let node = &mut self.nodes[index as usize];
            node.data = data;
            return NodeId {
                index,
                generation: node.generation,
            };
        }
        let id = NodeId {
            index: self.nodes.len() as u32,
            generation: 0,
        };
        self.nodes.push(Node {
            generation: 0,
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// The document node. The editable root lives somewhere below it.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Element classification in use.
    pub fn schema(&self) -> &ElementSchema {
        &self.schema
    }

    /// Number of live nodes, attached or not. Released nodes are not counted.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Returns `true` if `id` refers to a node that has not been released.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.index())
            .is_some_and(|node| node.generation == id.generation)
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(Rope::from_str(text)))
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(ElementData::new(tag)))
    }

    /// Create an empty fragment.
    pub fn create_fragment(&mut self) -> NodeId {
        self.push(NodeData::Fragment)
    }

    /// Raw node payload.
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.node(id).data
    }

    /// Classify a node.
    pub fn kind(&self, id: NodeId) -> NodeKind {
        match &self.node(id).data {
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Element(el) if self.schema.is_void_tag(el.tag()) => NodeKind::VoidElement,
            NodeData::Element(_) => NodeKind::Element,
            NodeData::Fragment => NodeKind::Fragment,
        }
    }

    /// Element payload, if `id` is an element.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id).data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutable element payload, if `id` is an element.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.node_mut(id).data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Lowercase tag name, if `id` is an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(ElementData::tag)
    }

    /// Returns `true` if `id` is an element with the given tag.
    pub fn has_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id).is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Returns `true` if `id` is a block-level element, by tag or by inline `display` style.
    pub fn is_block_element(&self, id: NodeId) -> bool {
        match self.element(id) {
            Some(el) => {
                self.schema.is_block_tag(el.tag())
                    || el
                        .style_property("display")
                        .is_some_and(|display| self.schema.is_block_display(display))
            }
            None => false,
        }
    }

    /// Text of a text node.
    pub fn text(&self, id: NodeId) -> Option<String> {
        match &self.node(id).data {
            NodeData::Text(rope) => Some(rope.to_string()),
            _ => None,
        }
    }

    /// Char length of a text node (0 for other nodes).
    pub fn text_len(&self, id: NodeId) -> usize {
        match &self.node(id).data {
            NodeData::Text(rope) => rope.len_chars(),
            _ => 0,
        }
    }

    /// Concatenated text of `id` and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        if let NodeData::Text(rope) = &self.node(id).data {
            return rope.to_string();
        }
        let mut out = String::new();
        for node in self.descendants(id) {
            if let NodeData::Text(rope) = &self.node(node).data {
                out.extend(rope.chunks());
            }
        }
        out
    }

    /// DOM-style node length: chars for text, child count otherwise.
    pub fn node_length(&self, id: NodeId) -> usize {
        match &self.node(id).data {
            NodeData::Text(rope) => rope.len_chars(),
            _ => self.node(id).children.len(),
        }
    }

    /// Parent node, if attached.
    ///
    /// A released handle has no parent, so it is never [contained](ContentTree::contains) in
    /// anything but itself.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id);
        if node.generation != id.generation {
            return None;
        }
        node.parent
    }

    /// Children in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// First child.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.first().copied()
    }

    /// Last child.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.last().copied()
    }

    fn edge_child(&self, id: NodeId, first: bool) -> Option<NodeId> {
        if first {
            self.first_child(id)
        } else {
            self.last_child(id)
        }
    }

    /// Index of `id` among its parent's children.
    pub fn child_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.node(parent).children.iter().position(|&c| c == id)
    }

    /// Previous sibling.
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.child_index(id)?;
        index
            .checked_sub(1)
            .map(|i| self.node(parent).children[i])
    }

    /// Next sibling.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.child_index(id)?;
        self.node(parent).children.get(index + 1).copied()
    }

    fn sibling(&self, id: NodeId, forward: bool) -> Option<NodeId> {
        if forward {
            self.next_sibling(id)
        } else {
            self.previous_sibling(id)
        }
    }

    /// Ancestors of `id`, nearest first (excluding `id`).
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// Descendants of `id` in document order (excluding `id`).
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack = self.node(id).children.clone();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    /// Returns `true` if `node` is inside `ancestor`.
    pub fn contains(&self, ancestor: NodeId, node: NodeId, include_self: bool) -> bool {
        if node == ancestor {
            return include_self;
        }
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Insert `child` into `parent` before `reference` (append when `reference` is `None`).
    ///
    /// `child` is detached from its current parent first. Inserting a fragment moves the
    /// fragment's children instead and leaves the fragment empty.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        self.ensure_insertable(parent, child)?;
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(EditorError::NotAChild { parent, reference });
            }
            if reference == child {
                return Ok(());
            }
        }

        let moving: Vec<NodeId> = match self.kind(child) {
            NodeKind::Fragment => self.node(child).children.clone(),
            NodeKind::Text | NodeKind::Element | NodeKind::VoidElement => vec![child],
        };
        for &node in &moving {
            self.detach(node);
        }

        let index = match reference {
            Some(reference) => self
                .node(parent)
                .children
                .iter()
                .position(|&c| c == reference)
                .ok_or(EditorError::NotAChild { parent, reference })?,
            None => self.node(parent).children.len(),
        };
        self.node_mut(parent)
            .children
            .splice(index..index, moving.iter().copied());
        for node in moving {
            self.node_mut(node).parent = Some(parent);
        }
        Ok(())
    }

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` right after `reference`.
    pub fn insert_after(&mut self, reference: NodeId, child: NodeId) -> Result<()> {
        let parent = self
            .parent(reference)
            .ok_or(EditorError::Detached(reference))?;
        let next = self.next_sibling(reference);
        self.insert_before(parent, child, next)
    }

    fn ensure_insertable(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let parent_accepts_children = match self.kind(parent) {
            NodeKind::Element | NodeKind::Fragment => true,
            NodeKind::Text | NodeKind::VoidElement => false,
        };
        if !parent_accepts_children
            || child == self.document
            || self.contains(child, parent, true)
        {
            return Err(EditorError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    /// Detach `id` from its parent. Returns `false` if it was already detached.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let attached = self.parent(id).is_some();
        self.detach(id);
        attached
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|&c| c != id);
        }
    }

    /// Detach `id` and free it together with its whole subtree. Returns the number of nodes freed.
    ///
    /// The freed slots are reused by later allocations. Handles to released nodes must not be
    /// used for anything but [`ContentTree::is_alive`] and containment checks. Releasing the
    /// document node or an already released handle does nothing.
    pub fn release(&mut self, id: NodeId) -> usize {
        if id == self.document || !self.is_alive(id) {
            return 0;
        }
        self.detach(id);
        let mut freed = 0;
        let mut stack = vec![id.index];
        while let Some(index) = stack.pop() {
            let node = &mut self.nodes[index as usize];
            stack.extend(node.children.drain(..).map(|child| child.index));
            node.parent = None;
            node.data = NodeData::Fragment;
            node.generation = node.generation.wrapping_add(1);
            self.free.push(index);
            freed += 1;
        }
        freed
    }

    /// Detach and return every child of `id`.
    pub fn remove_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let children = std::mem::take(&mut self.node_mut(id).children);
        for &child in &children {
            self.node_mut(child).parent = None;
        }
        children
    }

    fn rope_mut(&mut self, id: NodeId) -> Result<&mut Rope> {
        match &mut self.node_mut(id).data {
            NodeData::Text(rope) => Ok(rope),
            _ => Err(EditorError::NotATextNode(id)),
        }
    }

    /// Replace the text of a text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<()> {
        *self.rope_mut(id)? = Rope::from_str(text);
        Ok(())
    }

    /// Insert text at a char offset.
    pub fn insert_text(&mut self, id: NodeId, offset: usize, text: &str) -> Result<()> {
        let rope = self.rope_mut(id)?;
        let length = rope.len_chars();
        if offset > length {
            return Err(EditorError::InvalidOffset {
                node: id,
                offset,
                length,
            });
        }
        rope.insert(offset, text);
        Ok(())
    }

    /// Delete a char range of a text node.
    pub fn delete_text(&mut self, id: NodeId, range: Range<usize>) -> Result<()> {
        let rope = self.rope_mut(id)?;
        let length = rope.len_chars();
        if range.start > range.end || range.end > length {
            return Err(EditorError::InvalidOffset {
                node: id,
                offset: range.end,
                length,
            });
        }
        rope.remove(range);
        Ok(())
    }

    /// Split a text node at `offset`; the tail becomes a new node inserted right after it.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Result<NodeId> {
        let tail = {
            let rope = self.rope_mut(id)?;
            let length = rope.len_chars();
            if offset > length {
                return Err(EditorError::InvalidOffset {
                    node: id,
                    offset,
                    length,
                });
            }
            rope.split_off(offset)
        };
        let new_id = self.push(NodeData::Text(tail));
        if let (Some(parent), Some(index)) = (self.parent(id), self.child_index(id)) {
            self.node_mut(parent).children.insert(index + 1, new_id);
            self.node_mut(new_id).parent = Some(parent);
        }
        Ok(new_id)
    }

    /// Retype an element.
    ///
    /// A fresh element with the new tag takes the old element's place, attributes and children.
    /// The old handle is released; any location that referenced it must be remapped onto the
    /// returned handle.
    pub fn change_tag(&mut self, id: NodeId, tag: &str) -> Result<NodeId> {
        let attributes = self
            .element(id)
            .ok_or(EditorError::NotAnElement(id))?
            .attributes
            .clone();
        let replacement = self.push(NodeData::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            attributes,
        }));

        let children = std::mem::take(&mut self.node_mut(id).children);
        for &child in &children {
            self.node_mut(child).parent = Some(replacement);
        }
        self.node_mut(replacement).children = children;

        if let (Some(parent), Some(index)) = (self.parent(id), self.child_index(id)) {
            self.node_mut(parent).children[index] = replacement;
            self.node_mut(replacement).parent = Some(parent);
            self.node_mut(id).parent = None;
        }
        self.release(id);
        Ok(replacement)
    }

    /// Wrap a single node in a new element of the given tag.
    pub fn wrap(&mut self, id: NodeId, tag: &str) -> Result<NodeId> {
        let parent = self.parent(id).ok_or(EditorError::Detached(id))?;
        let wrapper = self.create_element(tag);
        self.insert_before(parent, wrapper, Some(id))?;
        self.append_child(wrapper, id)?;
        Ok(wrapper)
    }

    /// Wrap sibling nodes (in the given order) in a new element placed where the first one was.
    ///
    /// Returns `Ok(None)` for an empty slice.
    pub fn wrap_all(&mut self, nodes: &[NodeId], tag: &str) -> Result<Option<NodeId>> {
        let Some(&first) = nodes.first() else {
            return Ok(None);
        };
        let parent = self.parent(first).ok_or(EditorError::Detached(first))?;
        if let Some(&stray) = nodes.iter().find(|&&n| self.parent(n) != Some(parent)) {
            return Err(EditorError::NotAChild {
                parent,
                reference: stray,
            });
        }
        let wrapper = self.create_element(tag);
        self.insert_before(parent, wrapper, Some(first))?;
        for &node in nodes {
            self.append_child(wrapper, node)?;
        }
        Ok(Some(wrapper))
    }

    fn is_skippable(&self, id: NodeId) -> bool {
        matches!(&self.node(id).data, NodeData::Text(rope) if rope.len_chars() == 0)
    }

    /// First leaf under `root` in document order, skipping empty text nodes.
    pub fn first_leaf(&self, root: NodeId) -> Option<NodeId> {
        self.edge_leaf(root, true)
    }

    /// Last leaf under `root` in document order, skipping empty text nodes.
    pub fn last_leaf(&self, root: NodeId) -> Option<NodeId> {
        self.edge_leaf(root, false)
    }

    fn edge_leaf(&self, root: NodeId, first: bool) -> Option<NodeId> {
        let mut node = self.edge_child(root, first)?;
        while let Some(child) = self.edge_child(node, first) {
            node = child;
        }
        if self.is_skippable(node) {
            self.leaf_sibling(root, node, first)
        } else {
            Some(node)
        }
    }

    /// Next leaf after `node` (and after its whole subtree) inside `root`.
    pub fn next_leaf(&self, root: NodeId, node: NodeId) -> Option<NodeId> {
        self.leaf_sibling(root, node, true)
    }

    /// Previous leaf before `node` inside `root`.
    pub fn previous_leaf(&self, root: NodeId, node: NodeId) -> Option<NodeId> {
        self.leaf_sibling(root, node, false)
    }

    fn leaf_sibling(&self, root: NodeId, start: NodeId, forward: bool) -> Option<NodeId> {
        if !self.contains(root, start, false) {
            return None;
        }
        let mut current = start;
        loop {
            let sibling = loop {
                if let Some(sibling) = self.sibling(current, forward) {
                    break sibling;
                }
                current = self.parent(current)?;
                if current == root {
                    return None;
                }
            };

            let mut leaf = sibling;
            while let Some(child) = self.edge_child(leaf, forward) {
                leaf = child;
            }
            if !self.is_skippable(leaf) {
                return Some(leaf);
            }
            current = leaf;
        }
    }

    fn lineage(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain: Vec<NodeId> = std::iter::once(id).chain(self.ancestors(id)).collect();
        chain.reverse();
        chain
    }

    /// Compare two nodes in document (pre-)order. Ancestors sort before descendants.
    ///
    /// Nodes in unrelated trees are ordered by handle so the result stays total.
    pub fn compare_document_order(&self, a: NodeId, b: NodeId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let chain_a = self.lineage(a);
        let chain_b = self.lineage(b);
        let shared = chain_a
            .iter()
            .zip(chain_b.iter())
            .take_while(|(x, y)| x == y)
            .count();

        if shared == 0 {
            return a.cmp(&b);
        }
        if shared == chain_a.len() {
            return Ordering::Less;
        }
        if shared == chain_b.len() {
            return Ordering::Greater;
        }
        let index_a = self.child_index(chain_a[shared]);
        let index_b = self.child_index(chain_b[shared]);
        index_a.cmp(&index_b)
    }

    /// Compare two boundary points `(container, offset)` the way DOM ranges do.
    pub fn compare_points(&self, a: (NodeId, usize), b: (NodeId, usize)) -> Ordering {
        let ((node_a, offset_a), (node_b, offset_b)) = (a, b);
        if node_a == node_b {
            return offset_a.cmp(&offset_b);
        }
        if self.contains(node_a, node_b, false) {
            let index = self.child_toward(node_a, node_b).and_then(|c| self.child_index(c));
            return match index {
                Some(index) if index < offset_a => Ordering::Greater,
                _ => Ordering::Less,
            };
        }
        if self.contains(node_b, node_a, false) {
            return self.compare_points(b, a).reverse();
        }
        self.compare_document_order(node_a, node_b)
    }

    fn child_toward(&self, ancestor: NodeId, node: NodeId) -> Option<NodeId> {
        let mut current = node;
        loop {
            let parent = self.parent(current)?;
            if parent == ancestor {
                return Some(current);
            }
            current = parent;
        }
    }

    /// Child-index path from `root` down to `node`.
    pub fn path_from(&self, root: NodeId, node: NodeId) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = node;
        while current != root {
            path.push(self.child_index(current)?);
            current = self.parent(current)?;
        }
        path.reverse();
        Some(path)
    }

    /// Follow a child-index path down from `root`.
    pub fn node_at_path(&self, root: NodeId, path: &[usize]) -> Option<NodeId> {
        path.iter()
            .try_fold(root, |node, &index| self.children(node).get(index).copied())
    }
}

impl Default for ContentTree {
    fn default() -> Self {
        Self::new(ElementSchema::default())
    }
}

/// Pre-order iterator over a subtree, see [`ContentTree::descendants`].
pub struct Descendants<'a> {
    tree: &'a ContentTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
