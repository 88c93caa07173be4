//! Notification Builder
//!
//! Typed change notifications sent to the downstream catalog and the
//! phase-typed builder that assembles them in production order.

pub mod builder;

pub use builder::{Children, NotificationBatch, NotificationBuilder, Roots};

use crate::graph::{EntityBatch, SchemaObject};
use serde::{Deserialize, Serialize};

/// Identifies a partial-update target by a stable unique attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueRef {
    pub type_name: String,
    pub attribute: String,
    pub value: String,
}

impl UniqueRef {
    pub fn by_qualified_name(type_name: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            attribute: crate::graph::attrs::QUALIFIED_NAME.to_string(),
            value: qualified_name.into(),
        }
    }
}

/// One downstream change notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    /// Objects not known to exist downstream
    #[serde(rename = "create")]
    FullCreate {
        user: String,
        #[serde(flatten)]
        batch: EntityBatch,
    },

    /// Replace every attribute and relationship of the carried objects
    #[serde(rename = "update")]
    FullUpdate {
        user: String,
        #[serde(flatten)]
        batch: EntityBatch,
    },

    /// Overwrite only the attributes and relationships present in `patch`
    #[serde(rename = "partial-update")]
    PartialUpdate {
        user: String,
        target: UniqueRef,
        patch: SchemaObject,
    },
}

impl Notification {
    pub fn user(&self) -> &str {
        match self {
            Notification::FullCreate { user, .. }
            | Notification::FullUpdate { user, .. }
            | Notification::PartialUpdate { user, .. } => user,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Notification::FullCreate { .. } => "create",
            Notification::FullUpdate { .. } => "update",
            Notification::PartialUpdate { .. } => "partial-update",
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Notification::PartialUpdate { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{attrs, types, ObjectGraph};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_partial_update_wire_shape() {
        let mut patch = SchemaObject::new(types::COLUMN);
        patch.set_attribute(attrs::QUALIFIED_NAME, "default.sales_v2@primary.id");

        let notification = Notification::PartialUpdate {
            user: "etl".to_string(),
            target: UniqueRef::by_qualified_name(types::COLUMN, "default.sales@primary.id"),
            patch,
        };

        let value = serde_json::to_value(&notification).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "partial-update",
                "user": "etl",
                "target": {
                    "typeName": "hive_column",
                    "attribute": "qualifiedName",
                    "value": "default.sales@primary.id"
                },
                "patch": {
                    "typeName": "hive_column",
                    "attributes": { "qualifiedName": "default.sales_v2@primary.id" }
                }
            })
        );
    }

    #[test]
    fn test_full_update_carries_entities_inline() {
        let mut table = SchemaObject::new(types::TABLE);
        table.set_attribute(attrs::QUALIFIED_NAME, "default.sales@primary");

        let notification = Notification::FullUpdate {
            user: "etl".to_string(),
            batch: ObjectGraph::new(table).into(),
        };

        let value = serde_json::to_value(&notification).unwrap();
        assert_eq!(value["type"], "update");
        assert_eq!(value["entities"][0]["typeName"], "hive_table");

        let decoded: Notification = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, notification);
    }
}
