//! Type schemas checked at the graph-construction boundary
//!
//! Each known `typeName` lists the attributes it must carry and the value kind
//! each must have. Unknown type names pass untouched.

use super::extinfo::ObjectGraph;
use super::object::SchemaObject;
use super::value::AttrValue;
use super::{attrs, types};
use crate::error::{SyncError, SyncResult};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Expected kind of a required attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Bool,
    Int,
    List,
    Ref,
}

impl ValueKind {
    fn matches(self, value: &AttrValue) -> bool {
        matches!(
            (self, value),
            (ValueKind::Text, AttrValue::Text(_))
                | (ValueKind::Bool, AttrValue::Bool(_))
                | (ValueKind::Int, AttrValue::Int(_))
                | (ValueKind::List, AttrValue::List(_))
                | (ValueKind::Ref, AttrValue::Ref(_))
        )
    }
}

#[derive(Debug, Clone)]
pub struct TypeSchema {
    pub type_name: &'static str,
    pub required: &'static [(&'static str, ValueKind)],
}

static SCHEMAS: Lazy<HashMap<&'static str, TypeSchema>> = Lazy::new(|| {
    [
        TypeSchema {
            type_name: types::TABLE,
            required: &[
                (attrs::QUALIFIED_NAME, ValueKind::Text),
                (attrs::NAME, ValueKind::Text),
                ("temporary", ValueKind::Bool),
            ],
        },
        TypeSchema {
            type_name: types::COLUMN,
            required: &[
                (attrs::QUALIFIED_NAME, ValueKind::Text),
                (attrs::NAME, ValueKind::Text),
                ("type", ValueKind::Text),
            ],
        },
        TypeSchema {
            type_name: types::STORAGE_DESC,
            required: &[
                (attrs::QUALIFIED_NAME, ValueKind::Text),
                (attrs::TABLE, ValueKind::Ref),
            ],
        },
        TypeSchema {
            type_name: types::TABLE_DDL,
            required: &[
                (attrs::QUALIFIED_NAME, ValueKind::Text),
                ("queryText", ValueKind::Text),
            ],
        },
        TypeSchema {
            type_name: types::PATH,
            required: &[
                (attrs::QUALIFIED_NAME, ValueKind::Text),
                ("path", ValueKind::Text),
            ],
        },
        TypeSchema {
            type_name: types::PROCESS,
            required: &[
                (attrs::QUALIFIED_NAME, ValueKind::Text),
                ("operationType", ValueKind::Text),
                ("queryText", ValueKind::Text),
            ],
        },
        TypeSchema {
            type_name: types::PROCESS_EXECUTION,
            required: &[
                (attrs::QUALIFIED_NAME, ValueKind::Text),
                ("startTime", ValueKind::Int),
                (attrs::PROCESS, ValueKind::Ref),
            ],
        },
    ]
    .into_iter()
    .map(|schema| (schema.type_name, schema))
    .collect()
});

impl TypeSchema {
    pub fn lookup(type_name: &str) -> Option<&'static TypeSchema> {
        SCHEMAS.get(type_name)
    }
}

/// Check one object against its type schema
pub fn validate_object(object: &SchemaObject) -> SyncResult<()> {
    let Some(schema) = TypeSchema::lookup(&object.type_name) else {
        return Ok(());
    };

    for (name, kind) in schema.required {
        match object.attribute(name) {
            None => {
                return Err(SyncError::conversion(format!(
                    "{} is missing required attribute '{}'",
                    object.type_name, name
                )))
            }
            Some(value) if !kind.matches(value) => {
                return Err(SyncError::conversion(format!(
                    "{}.{} must be {:?}, got {}",
                    object.type_name,
                    name,
                    kind,
                    value.kind()
                )))
            }
            Some(_) => {}
        }
    }

    Ok(())
}

/// Check the root and every referred object of a graph
pub fn validate_graph(graph: &ObjectGraph) -> SyncResult<()> {
    validate_object(&graph.root)?;
    for object in graph.referred.values() {
        validate_object(object)?;
    }
    Ok(())
}
