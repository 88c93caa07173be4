//! catalog-sync - schema-change cascade engine
//!
//! Turns create/alter/rename events from a source catalog into ordered,
//! idempotent notifications that keep a downstream metadata catalog in sync
//! while preserving entity identity across renames.
//!
//! - `graph`: object graph model
//! - `resolver`: snapshot resolution from metastore or query events
//! - `cascade`: rename/alter/create cascades and the `resolve_and_cascade` entry point
//! - `notification`: typed notifications and the phase-typed builder
//! - `lineage`: path and process entities recorded for external-table creates
//! - `collaborators`: the traits the core calls out through

pub mod audit;
pub mod cascade;
pub mod catalog;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod graph;
pub mod lineage;
pub mod models;
pub mod naming;
pub mod notification;
pub mod resolver;
pub mod routes;
pub mod source;
pub mod state;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cascade::resolve_and_cascade;
pub use collaborators::CascadeContext;
pub use error::{SyncError, SyncResult};
pub use notification::{Notification, NotificationBatch};
pub use resolver::SchemaEvent;
