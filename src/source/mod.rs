//! Source catalog model
//!
//! Source-native table descriptors as delivered by the metastore, the
//! read/write entity sets of a completed query, and the query context used
//! for audit records.

pub mod builder;

pub use builder::DescriptorGraphBuilder;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::{Validate, ValidationError};

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_$]*$").expect("identifier regex is valid")
});

/// Kind of table in the source catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableType {
    #[default]
    ManagedTable,
    ExternalTable,
    VirtualView,
    MaterializedView,
    IndexTable,
}

impl TableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableType::ManagedTable => "MANAGED_TABLE",
            TableType::ExternalTable => "EXTERNAL_TABLE",
            TableType::VirtualView => "VIRTUAL_VIEW",
            TableType::MaterializedView => "MATERIALIZED_VIEW",
            TableType::IndexTable => "INDEX_TABLE",
        }
    }

    pub fn is_view(&self) -> bool {
        matches!(self, TableType::VirtualView | TableType::MaterializedView)
    }
}

/// Column or partition key definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FieldSchema {
    #[validate(length(min = 1, max = 128, message = "Column name must be between 1 and 128 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Column type is required"))]
    #[serde(rename = "type")]
    pub data_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Physical storage of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StorageDescriptor {
    #[validate(length(min = 1, message = "Storage location is required"))]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    #[serde(default)]
    pub compressed: bool,
    #[serde(default)]
    pub num_buckets: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serde_lib: Option<String>,
}

/// Source-native table descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TableDescriptor {
    /// Stable source identity, carried across renames
    pub object_id: Uuid,

    #[validate(length(min = 1, max = 128, message = "Database name must be between 1 and 128 characters"))]
    #[validate(custom(function = "validate_identifier"))]
    pub database: String,

    #[validate(length(min = 1, max = 128, message = "Table name must be between 1 and 128 characters"))]
    #[validate(custom(function = "validate_identifier"))]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default)]
    pub table_type: TableType,

    #[serde(default)]
    pub temporary: bool,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,

    #[serde(default)]
    #[validate(nested)]
    pub columns: Vec<FieldSchema>,

    #[serde(default)]
    #[validate(nested)]
    pub partition_keys: Vec<FieldSchema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub storage: Option<StorageDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_original_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
}

impl TableDescriptor {
    /// Case-insensitive catalog key
    pub fn key(&self) -> (String, String) {
        (self.database.to_lowercase(), self.name.to_lowercase())
    }
}

/// Kind of entity in a query's read or write set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Database,
    Table,
    Partition,
    DfsDir,
    LocalDir,
}

/// One read/write set entry of a completed query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableDescriptor>,
}

impl Entity {
    pub fn table(table: TableDescriptor) -> Self {
        Self {
            kind: EntityKind::Table,
            table: Some(table),
        }
    }

    /// The table descriptor when this is a table-typed entry
    pub fn as_table(&self) -> Option<&TableDescriptor> {
        match self.kind {
            EntityKind::Table => self.table.as_ref(),
            _ => None,
        }
    }
}

/// Session and query details of a completed operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryContext {
    pub query_id: String,
    #[serde(default)]
    pub query_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
}

/// Validate a source identifier (database or table name)
fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    if !IDENTIFIER.is_match(name) {
        let mut err = ValidationError::new("invalid_identifier");
        err.message = Some(
            "Invalid identifier. Must start with a letter or underscore and contain only letters, digits, underscores.".into(),
        );
        return Err(err);
    }
    Ok(())
}
