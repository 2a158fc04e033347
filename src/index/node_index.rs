//! NodeIndex - id, class, attribute and type lookups

use std::collections::{BTreeSet, HashMap};

use crate::dom::document::{Document, ROOT};
use crate::dom::node::NodeId;

/// Read-only lookup tables over a document
///
/// Node sets are ordered by `NodeId`, which is creation order; for a
/// parsed document that is also document order.
#[derive(Debug, Default)]
pub struct NodeIndex<'d> {
    ids: HashMap<&'d [u8], NodeId>,
    classes: HashMap<&'d [u8], BTreeSet<NodeId>>,
    attributes: HashMap<&'d [u8], Vec<(NodeId, &'d [u8])>>,
    types: HashMap<&'d [u8], BTreeSet<NodeId>>,
}

impl<'d> NodeIndex<'d> {
    /// Index every node reachable from the document root
    pub fn build(doc: &'d Document<'_>) -> Self {
        let mut index = NodeIndex::default();
        for id in doc.descendants(ROOT) {
            index.add(doc, id);
        }
        for pairs in index.attributes.values_mut() {
            pairs.sort_by_key(|&(id, _)| id);
        }
        tracing::debug!(
            ids = index.ids.len(),
            classes = index.classes.len(),
            types = index.types.len(),
            "built node index"
        );
        index
    }

    fn add(&mut self, doc: &'d Document<'_>, id: NodeId) {
        let node_id = doc.id(id);
        if !node_id.is_empty() {
            self.ids.insert(node_id, id);
        }

        let name = doc.name(id);
        if !name.is_empty() {
            self.types.entry(name).or_default().insert(id);
        }

        for class in doc.classes(id) {
            self.classes.entry(class).or_default().insert(id);
        }

        for (name, value) in doc.attributes(id) {
            self.attributes.entry(name).or_default().push((id, value));
        }
    }

    /// Node carrying `id`
    pub fn by_id(&self, id: impl AsRef<[u8]>) -> Option<NodeId> {
        self.ids.get(id.as_ref()).copied()
    }

    /// Nodes carrying `class`
    pub fn by_class(&self, class: impl AsRef<[u8]>) -> Vec<NodeId> {
        self.classes
            .get(class.as_ref())
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Nodes that have attribute `name`, whatever its value
    pub fn by_attribute(&self, name: impl AsRef<[u8]>) -> Vec<NodeId> {
        self.attributes
            .get(name.as_ref())
            .map(|pairs| pairs.iter().map(|&(id, _)| id).collect())
            .unwrap_or_default()
    }

    /// Nodes whose attribute `name` equals `value` exactly
    pub fn by_attribute_value(&self, name: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Vec<NodeId> {
        let value = value.as_ref();
        self.attributes
            .get(name.as_ref())
            .map(|pairs| {
                pairs
                    .iter()
                    .filter(|&&(_, v)| v == value)
                    .map(|&(id, _)| id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Nodes named `name` (lowercase for parsed elements)
    pub fn by_type(&self, name: impl AsRef<[u8]>) -> Vec<NodeId> {
        self.types
            .get(name.as_ref())
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Every id in the index
    pub fn ids(&self) -> impl Iterator<Item = (&'d [u8], NodeId)> + '_ {
        self.ids.iter().map(|(&k, &v)| (k, v))
    }

    /// Every class name in the index
    pub fn class_names(&self) -> impl Iterator<Item = &'d [u8]> + '_ {
        self.classes.keys().copied()
    }
}
