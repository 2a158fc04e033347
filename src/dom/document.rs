//! Document - arena-based node tree
//!
//! Every node lives in one flat arena (`nodes`), addressed by `NodeId`.
//! The arena is the registry: nodes are pushed exactly once when created
//! and are only freed together, when the document is cleared or dropped.
//! Tree structure is a separate layer on top of it:
//! - `children`: the owning-in-spirit, ordered parent -> child edge
//! - `parent`: a non-owning back-reference (an index, never a pointer)
//!
//! Detaching a node only edits those two layers; the node stays in the
//! arena and can be attached again.

use super::node::{Attribute, Node, NodeId, NodeKind};
use super::strings::{StringPool, Text};
use crate::core::chars::is_whitespace;
use crate::error::{Error, Result};
use crate::options::ParseOptions;

/// Id of the document root node
pub const ROOT: NodeId = 0;

/// A parsed (or programmatically built) document
///
/// Text views borrow from the parse buffer for `'a`; strings set through
/// the editing API are copied into the document's string pool.
#[derive(Debug)]
pub struct Document<'a> {
    /// Parse buffer after in-place compaction
    pub(crate) input: &'a [u8],
    /// Arena of nodes; index 0 is the root
    pub(crate) nodes: Vec<Node>,
    /// Strings that did not come from the buffer
    pub(crate) strings: StringPool,
}

impl Default for Document<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Document<'a> {
    /// Create an empty document holding only its root node
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        nodes.push(Node::new(NodeKind::Document));
        Document {
            input: &[],
            nodes,
            strings: StringPool::new(),
        }
    }

    /// Parse a buffer into a new document.
    ///
    /// The buffer is rewritten in place (entity expansion, whitespace
    /// condensing, lowercased names) and stays borrowed by the document.
    /// Parsing stops at the first NUL byte or the end of the slice.
    pub fn parse(buf: &'a mut [u8], options: ParseOptions) -> Result<Self> {
        Ok(crate::core::parser::parse(buf, &options)?)
    }

    /// Drop every node and start over with a fresh root
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::new(NodeKind::Document));
        self.strings.clear();
        self.input = &[];
    }

    // ========================================================================
    // Arena
    // ========================================================================

    /// Register a node in the arena. The node starts detached.
    #[inline]
    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    /// Append without any checks; used by the parser on fresh nodes
    #[inline]
    pub(crate) fn link_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child as usize].parent = Some(parent);
        self.nodes[parent as usize].children.push(child);
    }

    /// Create a detached node of the given kind
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        self.push(Node::new(kind))
    }

    /// Create a detached element, classified by its lowercased name
    pub fn create_element(&mut self, name: impl AsRef<[u8]>) -> NodeId {
        let lower = name.as_ref().to_ascii_lowercase();
        let mut node = Node::new(NodeKind::for_element(&lower));
        node.name = self.strings.intern(&lower);
        self.push(node)
    }

    /// Create a detached data node holding `text`
    pub fn create_data(&mut self, text: impl AsRef<[u8]>) -> NodeId {
        let mut node = Node::new(NodeKind::Data);
        node.value = self.strings.intern(text.as_ref());
        self.push(node)
    }

    /// Total number of nodes ever created (attached or not)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ========================================================================
    // Read access
    // ========================================================================

    /// The document root (always `ROOT`)
    #[inline]
    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// First element child of the root, if any
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(ROOT)
            .iter()
            .copied()
            .find(|&id| self.kind(id).map_or(false, NodeKind::is_element))
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    /// Resolve a text view owned by this document
    #[inline]
    pub fn text(&self, text: Text) -> &[u8] {
        self.strings.resolve(text, self.input)
    }

    /// Node name (element name, PI target); empty for other kinds
    pub fn name(&self, id: NodeId) -> &[u8] {
        self.node(id).map_or(&[][..], |n| self.text(n.name))
    }

    pub fn name_str(&self, id: NodeId) -> Option<&str> {
        std::str::from_utf8(self.name(id)).ok()
    }

    /// Node value: the first text run of an element, raw content otherwise
    pub fn value(&self, id: NodeId) -> &[u8] {
        self.node(id).map_or(&[][..], |n| self.text(n.value))
    }

    pub fn value_str(&self, id: NodeId) -> Option<&str> {
        std::str::from_utf8(self.value(id)).ok()
    }

    /// Value of the `id` attribute, empty when unset
    pub fn id(&self, id: NodeId) -> &[u8] {
        self.node(id).map_or(&[][..], |n| self.text(n.id))
    }

    pub fn classes(&self, id: NodeId) -> impl Iterator<Item = &[u8]> + '_ {
        self.node(id)
            .map_or(&[][..], |n| &n.classes[..])
            .iter()
            .map(move |&t| self.text(t))
    }

    pub fn contains_class(&self, id: NodeId, class: impl AsRef<[u8]>) -> bool {
        let class = class.as_ref();
        self.classes(id).any(|c| c == class)
    }

    /// Attributes in insertion order, including the mirrored `id`
    pub fn attributes(&self, id: NodeId) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        self.node(id)
            .map_or(&[][..], |n| &n.attributes[..])
            .iter()
            .map(move |a| (self.text(a.name), self.text(a.value)))
    }

    /// Attribute value by exact name
    pub fn attribute(&self, id: NodeId, name: impl AsRef<[u8]>) -> Option<&[u8]> {
        let name = name.as_ref();
        self.attributes(id).find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[][..], |n| &n.children[..])
    }

    /// Iterate over all descendants of a node in document order
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_, 'a> {
        let stack = self.children(id).iter().rev().copied().collect();
        DescendantIter { doc: self, stack }
    }

    /// True if `ancestor` is `id` or lies on its parent chain
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Verify the structural invariants:
    /// - every child's parent back-reference points at its parent
    /// - every node with a parent appears exactly once in that parent's children
    /// - every node reachable from the root is registered, and reached once
    pub fn check_invariants(&self) -> Result<()> {
        if self.nodes.first().map(|n| n.kind) != Some(NodeKind::Document) {
            return Err(Error::Hierarchy("root is not a document node"));
        }
        if self.nodes[ROOT as usize].parent.is_some() {
            return Err(Error::Hierarchy("root has a parent"));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            for &child in &node.children {
                let Some(child_node) = self.nodes.get(child as usize) else {
                    return Err(Error::Hierarchy("child is not registered"));
                };
                if child_node.parent != Some(index as NodeId) {
                    return Err(Error::Hierarchy("child parent link is broken"));
                }
            }
            if let Some(parent) = node.parent {
                let Some(parent_node) = self.nodes.get(parent as usize) else {
                    return Err(Error::Hierarchy("parent is not registered"));
                };
                let occurrences = parent_node
                    .children
                    .iter()
                    .filter(|&&c| c == index as NodeId)
                    .count();
                if occurrences != 1 {
                    return Err(Error::Hierarchy("node is not listed once by its parent"));
                }
            }
        }

        let mut seen = vec![false; self.nodes.len()];
        seen[ROOT as usize] = true;
        for id in self.descendants(ROOT) {
            let slot = &mut seen[id as usize];
            if *slot {
                return Err(Error::Hierarchy("node reachable twice"));
            }
            *slot = true;
        }
        Ok(())
    }

    // ========================================================================
    // Tree editing
    // ========================================================================

    fn check_exists(&self, id: NodeId) -> Result<()> {
        if (id as usize) < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::Hierarchy("unknown node"))
        }
    }

    fn check_attach(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_exists(parent)?;
        self.check_exists(child)?;
        if child == ROOT {
            return Err(Error::Hierarchy("cannot attach the document root"));
        }
        if child == parent {
            return Err(Error::Hierarchy("cannot attach a node to itself"));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(Error::Hierarchy("cannot attach a node under its own descendant"));
        }
        Ok(())
    }

    /// Remove `child` from its current parent, if any
    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes[child as usize].parent.take() {
            self.nodes[parent as usize].children.retain(|&c| c != child);
        }
    }

    fn position_of(&self, parent: NodeId, child: NodeId) -> Result<usize> {
        self.children(parent)
            .iter()
            .position(|&c| c == child)
            .ok_or(Error::Hierarchy("reference is not a child of parent"))
    }

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_attach(parent, child)?;
        self.detach(child);
        self.link_child(parent, child);
        Ok(())
    }

    /// Insert `child` immediately before `reference` in `parent`
    pub fn insert_before(&mut self, parent: NodeId, reference: NodeId, child: NodeId) -> Result<()> {
        self.insert_relative(parent, reference, child, 0)
    }

    /// Insert `child` immediately after `reference` in `parent`
    pub fn insert_after(&mut self, parent: NodeId, reference: NodeId, child: NodeId) -> Result<()> {
        self.insert_relative(parent, reference, child, 1)
    }

    fn insert_relative(&mut self, parent: NodeId, reference: NodeId, child: NodeId, offset: usize) -> Result<()> {
        self.check_attach(parent, child)?;
        self.position_of(parent, reference)?;
        if child == reference {
            return Ok(());
        }
        self.detach(child);
        // Position may have shifted if child was an earlier sibling
        let index = self.position_of(parent, reference)? + offset;
        self.nodes[parent as usize].children.insert(index, child);
        self.nodes[child as usize].parent = Some(parent);
        Ok(())
    }

    /// Detach `child` from `parent`. The node stays alive in the arena.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_exists(parent)?;
        self.check_exists(child)?;
        let index = self.position_of(parent, child)?;
        self.nodes[parent as usize].children.remove(index);
        self.nodes[child as usize].parent = None;
        Ok(())
    }

    /// Detach every child of `parent`
    pub fn clear_children(&mut self, parent: NodeId) -> Result<()> {
        self.check_exists(parent)?;
        let children = std::mem::take(&mut self.nodes[parent as usize].children);
        for child in children {
            self.nodes[child as usize].parent = None;
        }
        Ok(())
    }

    /// Copy a node and its whole subtree. The copy is detached; every
    /// copied child is parented to its copied parent.
    pub fn deep_clone(&mut self, id: NodeId) -> Result<NodeId> {
        self.check_exists(id)?;
        if id == ROOT {
            return Err(Error::Hierarchy("cannot clone the document root"));
        }
        Ok(self.clone_subtree(id))
    }

    /// Pre-order copy driven by an explicit (source, copied parent) stack,
    /// so depth is bounded by the heap rather than the call stack
    fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let root_copy = self.copy_node(id);
        let mut stack: Vec<(NodeId, NodeId)> = self.nodes[id as usize]
            .children
            .iter()
            .rev()
            .map(|&child| (child, root_copy))
            .collect();

        while let Some((source, parent)) = stack.pop() {
            let copy = self.copy_node(source);
            self.link_child(parent, copy);
            stack.extend(self.nodes[source as usize].children.iter().rev().map(|&child| (child, copy)));
        }
        root_copy
    }

    /// Detached, childless copy of one node
    fn copy_node(&mut self, id: NodeId) -> NodeId {
        let source = &self.nodes[id as usize];
        let copy = Node {
            kind: source.kind,
            name: source.name,
            value: source.value,
            id: source.id,
            classes: source.classes.clone(),
            attributes: source.attributes.clone(),
            parent: None,
            children: Vec::with_capacity(source.children.len()),
        };
        self.push(copy)
    }

    // ========================================================================
    // Node data
    // ========================================================================

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id as usize)
            .ok_or(Error::Hierarchy("unknown node"))
    }

    pub fn set_name(&mut self, id: NodeId, name: impl AsRef<[u8]>) -> Result<()> {
        let text = self.strings.intern(name.as_ref());
        self.node_mut(id)?.name = text;
        Ok(())
    }

    pub fn set_value(&mut self, id: NodeId, value: impl AsRef<[u8]>) -> Result<()> {
        let text = self.strings.intern(value.as_ref());
        self.node_mut(id)?.value = text;
        Ok(())
    }

    /// Set the id and the mirrored `id` attribute
    pub fn set_id(&mut self, id: NodeId, value: impl AsRef<[u8]>) -> Result<()> {
        self.check_exists(id)?;
        let value = self.strings.intern(value.as_ref());
        let name = self.strings.intern(b"id");
        let (input, strings) = (self.input, &self.strings);
        let node = &mut self.nodes[id as usize];
        node.id = value;
        upsert_attribute(&mut node.attributes, Attribute { name, value }, |t| {
            strings.resolve(t, input) == b"id"
        });
        Ok(())
    }

    /// Add a class; adding an existing class is a no-op
    pub fn add_class(&mut self, id: NodeId, class: impl AsRef<[u8]>) -> Result<()> {
        self.check_exists(id)?;
        let class = class.as_ref();
        if class.is_empty() || self.contains_class(id, class) {
            return Ok(());
        }
        let text = self.strings.intern(class);
        self.nodes[id as usize].classes.push(text);
        Ok(())
    }

    /// Remove a class; returns whether it was present
    pub fn remove_class(&mut self, id: NodeId, class: impl AsRef<[u8]>) -> Result<bool> {
        self.check_exists(id)?;
        let class = class.as_ref();
        let (input, strings) = (self.input, &self.strings);
        let classes = &mut self.nodes[id as usize].classes;
        let before = classes.len();
        classes.retain(|&t| strings.resolve(t, input) != class);
        Ok(classes.len() != before)
    }

    /// Set an attribute, replacing any existing value for the same name.
    ///
    /// `id` also updates the node id; `class` replaces the class set with
    /// the whitespace-separated tokens of `value`.
    pub fn set_attribute(&mut self, id: NodeId, name: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<()> {
        self.check_exists(id)?;
        let name = name.as_ref().to_ascii_lowercase();
        let (name, value) = (name.as_slice(), value.as_ref());
        match name {
            b"id" => self.set_id(id, value),
            b"class" => {
                self.nodes[id as usize].classes.clear();
                for token in value.split(|&b| is_whitespace(b)).filter(|t| !t.is_empty()) {
                    self.add_class(id, token)?;
                }
                Ok(())
            }
            _ => {
                let name_text = self.strings.intern(name);
                let value_text = self.strings.intern(value);
                let (input, strings) = (self.input, &self.strings);
                upsert_attribute(
                    &mut self.nodes[id as usize].attributes,
                    Attribute { name: name_text, value: value_text },
                    |t| strings.resolve(t, input) == name,
                );
                Ok(())
            }
        }
    }

    /// Remove an attribute; returns whether it was present.
    /// Removing `id` also clears the node id; removing `class` clears
    /// the class set.
    pub fn remove_attribute(&mut self, id: NodeId, name: impl AsRef<[u8]>) -> Result<bool> {
        self.check_exists(id)?;
        let name = name.as_ref().to_ascii_lowercase();
        let name = name.as_slice();
        let (input, strings) = (self.input, &self.strings);
        let node = &mut self.nodes[id as usize];
        if name == b"class" {
            let had = !node.classes.is_empty();
            node.classes.clear();
            return Ok(had);
        }
        let before = node.attributes.len();
        node.attributes.retain(|a| strings.resolve(a.name, input) != name);
        if name == b"id" {
            node.id = Text::EMPTY;
        }
        Ok(node.attributes.len() != before)
    }

    /// Remove every attribute, including the id
    pub fn clear_attributes(&mut self, id: NodeId) -> Result<()> {
        let node = self.node_mut(id)?;
        node.attributes.clear();
        node.id = Text::EMPTY;
        Ok(())
    }

    /// Parse buffer backing this document's views
    pub fn input(&self) -> &'a [u8] {
        self.input
    }
}

/// Insert `attr`, replacing the value of an existing attribute whose name
/// satisfies `same_name`. Insertion order is preserved.
pub(crate) fn upsert_attribute(attrs: &mut Vec<Attribute>, attr: Attribute, same_name: impl Fn(Text) -> bool) {
    match attrs.iter_mut().find(|a| same_name(a.name)) {
        Some(existing) => existing.value = attr.value,
        None => attrs.push(attr),
    }
}

/// Iterator over descendant nodes (depth-first, document order)
pub struct DescendantIter<'d, 'a> {
    doc: &'d Document<'a>,
    stack: Vec<NodeId>,
}

impl<'d, 'a> Iterator for DescendantIter<'d, 'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Reverse so the first child is processed first
        self.stack
            .extend(self.doc.children(current).iter().rev().copied());
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document<'static>, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        doc.append_child(ROOT, div).unwrap();
        doc.append_child(div, a).unwrap();
        doc.append_child(div, b).unwrap();
        (doc, div, a, b)
    }

    #[test]
    fn test_new_document() {
        let doc = Document::new();
        assert_eq!(doc.node_count(), 1);
        assert_eq!(doc.kind(ROOT), Some(NodeKind::Document));
        assert!(doc.root_element().is_none());
        doc.check_invariants().unwrap();
    }

    #[test]
    fn test_append_and_descendants() {
        let (doc, div, a, b) = sample();
        assert_eq!(doc.children(div), &[a, b]);
        assert_eq!(doc.parent(a), Some(div));
        assert_eq!(doc.root_element(), Some(div));
        let all: Vec<_> = doc.descendants(ROOT).collect();
        assert_eq!(all, vec![div, a, b]);
        doc.check_invariants().unwrap();
    }

    #[test]
    fn test_create_element_classifies() {
        let mut doc = Document::new();
        let br = doc.create_element("BR");
        assert_eq!(doc.kind(br), Some(NodeKind::VoidElement));
        assert_eq!(doc.name(br), b"br");
    }

    #[test]
    fn test_remove_clears_parent() {
        let (mut doc, div, a, b) = sample();
        doc.remove_child(div, a).unwrap();
        assert_eq!(doc.parent(a), None);
        assert_eq!(doc.children(div), &[b]);
        // Still registered
        assert_eq!(doc.node_count(), 4);
        assert!(doc.node(a).is_some());
        doc.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_non_child_fails() {
        let (mut doc, _div, a, b) = sample();
        assert!(matches!(doc.remove_child(a, b), Err(Error::Hierarchy(_))));
    }

    #[test]
    fn test_append_moves_node() {
        let (mut doc, div, a, b) = sample();
        doc.append_child(b, a).unwrap();
        assert_eq!(doc.children(div), &[b]);
        assert_eq!(doc.children(b), &[a]);
        assert_eq!(doc.parent(a), Some(b));
        doc.check_invariants().unwrap();
    }

    #[test]
    fn test_illegal_attachments() {
        let (mut doc, div, a, _b) = sample();
        assert!(doc.append_child(div, ROOT).is_err());
        assert!(doc.append_child(div, div).is_err());
        assert!(doc.append_child(a, div).is_err());
        assert!(doc.append_child(div, 999).is_err());
        doc.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_before_and_after() {
        let (mut doc, div, a, b) = sample();
        let c = doc.create_element("c");
        doc.insert_before(div, b, c).unwrap();
        assert_eq!(doc.children(div), &[a, c, b]);
        doc.insert_after(div, b, a).unwrap();
        assert_eq!(doc.children(div), &[c, b, a]);
        doc.insert_before(div, c, a).unwrap();
        assert_eq!(doc.children(div), &[a, c, b]);
        doc.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_with_foreign_reference_fails() {
        let (mut doc, div, a, _b) = sample();
        let c = doc.create_element("c");
        let d = doc.create_element("d");
        assert!(doc.insert_before(div, d, c).is_err());
        assert!(doc.insert_after(a, div, c).is_err());
        assert_eq!(doc.parent(c), None);
    }

    #[test]
    fn test_clear_children() {
        let (mut doc, div, a, b) = sample();
        doc.clear_children(div).unwrap();
        assert!(doc.children(div).is_empty());
        assert_eq!(doc.parent(a), None);
        assert_eq!(doc.parent(b), None);
        doc.check_invariants().unwrap();
    }

    #[test]
    fn test_attributes_and_classes() {
        let (mut doc, div, _a, _b) = sample();
        doc.set_id(div, "main").unwrap();
        doc.set_attribute(div, "title", "first").unwrap();
        doc.set_attribute(div, "title", "second").unwrap();
        doc.add_class(div, "x").unwrap();
        doc.add_class(div, "x").unwrap();
        doc.add_class(div, "y").unwrap();

        assert_eq!(doc.id(div), b"main");
        assert_eq!(doc.attribute(div, "id"), Some(&b"main"[..]));
        assert_eq!(doc.attribute(div, "title"), Some(&b"second"[..]));
        assert_eq!(doc.attributes(div).count(), 2);
        assert_eq!(doc.classes(div).collect::<Vec<_>>(), vec![&b"x"[..], &b"y"[..]]);

        assert!(doc.remove_class(div, "x").unwrap());
        assert!(!doc.contains_class(div, "x"));
        assert!(doc.remove_attribute(div, "id").unwrap());
        assert!(doc.id(div).is_empty());
        assert!(!doc.remove_attribute(div, "missing").unwrap());

        doc.clear_attributes(div).unwrap();
        assert_eq!(doc.attributes(div).count(), 0);
    }

    #[test]
    fn test_set_class_attribute_tokenizes() {
        let (mut doc, div, _a, _b) = sample();
        doc.set_attribute(div, "class", "  one two\tone ").unwrap();
        assert_eq!(doc.classes(div).collect::<Vec<_>>(), vec![&b"one"[..], &b"two"[..]]);
        assert_eq!(doc.attribute(div, "class"), None);
    }

    #[test]
    fn test_attribute_names_lowercased_on_edit() {
        let (mut doc, div, _a, _b) = sample();
        doc.set_attribute(div, "ID", "main").unwrap();
        doc.set_attribute(div, "CLASS", "p q").unwrap();
        doc.set_attribute(div, "Title", "t").unwrap();
        assert_eq!(doc.id(div), b"main");
        assert_eq!(doc.classes(div).collect::<Vec<_>>(), vec![&b"p"[..], &b"q"[..]]);
        assert_eq!(doc.attribute(div, "title"), Some(&b"t"[..]));

        assert!(doc.remove_attribute(div, "TITLE").unwrap());
        assert!(doc.remove_attribute(div, "Id").unwrap());
        assert!(doc.id(div).is_empty());
        assert!(doc.remove_attribute(div, "Class").unwrap());
        assert_eq!(doc.classes(div).count(), 0);
        assert!(!doc.remove_attribute(div, "class").unwrap());
    }

    #[test]
    fn test_deep_clone_of_deep_chain() {
        let mut doc = Document::new();
        let top = doc.create_element("div");
        let mut parent = top;
        for _ in 0..100_000 {
            let child = doc.create_element("div");
            doc.link_child(parent, child);
            parent = child;
        }
        let copy = doc.deep_clone(top).unwrap();
        assert_eq!(doc.descendants(copy).count(), 100_000);
        assert_eq!(doc.node_count(), 200_003);
    }

    #[test]
    fn test_deep_clone() {
        let (mut doc, div, _a, _b) = sample();
        doc.set_id(div, "main").unwrap();
        doc.add_class(div, "box").unwrap();
        let copy = doc.deep_clone(div).unwrap();

        assert_ne!(copy, div);
        assert_eq!(doc.parent(copy), None);
        assert_eq!(doc.id(copy), b"main");
        assert!(doc.contains_class(copy, "box"));
        assert_eq!(doc.children(copy).len(), 2);
        for &child in doc.children(copy) {
            assert_eq!(doc.parent(child), Some(copy));
        }
        assert_eq!(doc.node_count(), 7);
        doc.check_invariants().unwrap();
    }

    #[test]
    fn test_clear() {
        let (mut doc, _div, _a, _b) = sample();
        doc.clear();
        assert_eq!(doc.node_count(), 1);
        assert!(doc.children(ROOT).is_empty());
    }
}
