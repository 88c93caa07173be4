//! Schema objects and the references between them

use super::attrs;
use super::value::AttrValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Reference to another schema object, never an embedded copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<Uuid>,
}

impl ObjectRef {
    pub fn new(type_name: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            qualified_name: Some(qualified_name.into()),
            guid: None,
        }
    }

    pub fn with_guid(mut self, guid: Uuid) -> Self {
        self.guid = Some(guid);
        self
    }
}

/// Value of a relationship slot.
///
/// `Cleared` is an explicit instruction to drop the reference downstream and
/// serializes as `null`; a missing key means "unspecified".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Relation {
    One(ObjectRef),
    Many(Vec<ObjectRef>),
    Cleared,
}

impl Relation {
    /// All references held by this slot, in order
    pub fn refs(&self) -> &[ObjectRef] {
        match self {
            Relation::One(r) => std::slice::from_ref(r),
            Relation::Many(rs) => rs,
            Relation::Cleared => &[],
        }
    }
}

/// One catalog entity: table, column, storage descriptor, audit record...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaObject {
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<Uuid>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relation>,
}

impl SchemaObject {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            guid: None,
            attributes: BTreeMap::new(),
            relationships: BTreeMap::new(),
        }
    }

    pub fn with_guid(mut self, guid: Uuid) -> Self {
        self.guid = Some(guid);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<AttrValue> {
        self.attributes.remove(name)
    }

    pub fn relationship(&self, name: &str) -> Option<&Relation> {
        self.relationships.get(name)
    }

    pub fn set_relationship(&mut self, name: impl Into<String>, value: Relation) {
        self.relationships.insert(name.into(), value);
    }

    pub fn clear_relationships(&mut self) {
        self.relationships.clear();
    }

    /// Text attribute lookup; non-text values read as absent
    pub fn text(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(AttrValue::as_str)
    }

    pub fn qualified_name(&self) -> Option<&str> {
        self.text(attrs::QUALIFIED_NAME)
    }

    pub fn name(&self) -> Option<&str> {
        self.text(attrs::NAME)
    }

    /// Reference to this object by type, qualified name and identity
    pub fn to_ref(&self) -> ObjectRef {
        ObjectRef {
            type_name: self.type_name.clone(),
            qualified_name: self.qualified_name().map(str::to_string),
            guid: self.guid,
        }
    }
}
