//! Schema-change events

use crate::source::{Entity, QueryContext, TableDescriptor};
use serde::{Deserialize, Serialize};

/// DDL operation that produced the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CreateTable,
    AlterTable,
    RenameTable,
}

/// Before/after descriptors delivered by a metastore listener
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetastoreEvent {
    #[serde(default)]
    pub old_table: Option<TableDescriptor>,
    #[serde(default)]
    pub new_table: Option<TableDescriptor>,
}

impl MetastoreEvent {
    /// Old and new descriptors name different tables. Names compare the way
    /// qualified names are built, so a case-only change is not a rename.
    pub fn is_rename(&self) -> bool {
        match (&self.old_table, &self.new_table) {
            (Some(old), Some(new)) => old.key() != new.key(),
            _ => false,
        }
    }
}

/// Read and write sets of a completed query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEvent {
    #[serde(default)]
    pub inputs: Vec<Entity>,
    #[serde(default)]
    pub outputs: Vec<Entity>,
    pub query: QueryContext,
}

/// How the event was sourced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EventSource {
    Metastore(MetastoreEvent),
    Query(QueryEvent),
}

impl EventSource {
    pub fn query(&self) -> Option<&QueryContext> {
        match self {
            EventSource::Query(event) => Some(&event.query),
            EventSource::Metastore(_) => None,
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            EventSource::Metastore(_) => "metastore",
            EventSource::Query(_) => "query",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaEvent {
    pub operation: Operation,
    /// Acting user; falls back to the query user, then the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub source: EventSource,
}

impl SchemaEvent {
    pub fn acting_user<'a>(&'a self, default_user: &'a str) -> &'a str {
        self.user
            .as_deref()
            .or_else(|| self.source.query().and_then(|q| q.user.as_deref()))
            .unwrap_or(default_user)
    }
}
