//! Object graphs and entity batches

use super::object::{ObjectRef, SchemaObject};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A root object plus every object it transitively owns or references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectGraph {
    pub root: SchemaObject,
    #[serde(default)]
    pub referred: BTreeMap<Uuid, SchemaObject>,
}

impl ObjectGraph {
    pub fn new(root: SchemaObject) -> Self {
        Self {
            root,
            referred: BTreeMap::new(),
        }
    }

    /// Add an owned object to the extended info. Objects without an identity
    /// cannot be resolved and are rejected.
    pub fn add_referred(&mut self, object: SchemaObject) -> bool {
        match object.guid {
            Some(guid) => {
                self.referred.insert(guid, object);
                true
            }
            None => false,
        }
    }

    /// Lookup by surrogate identity
    pub fn by_identity(&self, guid: &Uuid) -> Option<&SchemaObject> {
        if self.root.guid.as_ref() == Some(guid) {
            return Some(&self.root);
        }
        self.referred.get(guid)
    }

    /// Lookup by a stable unique attribute, typically `qualifiedName`
    pub fn by_unique_attribute(
        &self,
        type_name: &str,
        attribute: &str,
        value: &str,
    ) -> Option<&SchemaObject> {
        std::iter::once(&self.root)
            .chain(self.referred.values())
            .find(|obj| obj.type_name == type_name && obj.text(attribute) == Some(value))
    }

    /// Resolve a relationship reference inside this graph.
    ///
    /// The identity wins when present; otherwise the reference falls back to
    /// its qualified name.
    pub fn resolve(&self, reference: &ObjectRef) -> Option<&SchemaObject> {
        match (&reference.guid, &reference.qualified_name) {
            (Some(guid), _) => self.by_identity(guid),
            (None, Some(qn)) => {
                self.by_unique_attribute(&reference.type_name, super::attrs::QUALIFIED_NAME, qn)
            }
            (None, None) => None,
        }
    }

    /// References from any object in the graph that do not resolve locally
    pub fn unresolved_references(&self) -> Vec<&ObjectRef> {
        std::iter::once(&self.root)
            .chain(self.referred.values())
            .flat_map(|obj| obj.relationships.values())
            .flat_map(|rel| rel.refs())
            .filter(|r| self.resolve(r).is_none())
            .collect()
    }

    pub fn qualified_name(&self) -> Option<&str> {
        self.root.qualified_name()
    }
}

/// Payload of full create/update notifications
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityBatch {
    pub entities: Vec<SchemaObject>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub referred: BTreeMap<Uuid, SchemaObject>,
}

impl EntityBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a graph's root and merge its extended info
    pub fn push_graph(&mut self, graph: ObjectGraph) {
        self.entities.push(graph.root);
        self.referred.extend(graph.referred);
    }

    pub fn push_entity(&mut self, entity: SchemaObject) {
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl From<ObjectGraph> for EntityBatch {
    fn from(graph: ObjectGraph) -> Self {
        let mut batch = EntityBatch::new();
        batch.push_graph(graph);
        batch
    }
}

impl From<SchemaObject> for EntityBatch {
    fn from(entity: SchemaObject) -> Self {
        Self {
            entities: vec![entity],
            referred: BTreeMap::new(),
        }
    }
}

impl FromIterator<ObjectGraph> for EntityBatch {
    fn from_iter<I: IntoIterator<Item = ObjectGraph>>(iter: I) -> Self {
        let mut batch = EntityBatch::new();
        for graph in iter {
            batch.push_graph(graph);
        }
        batch
    }
}
