//! Collaborator interfaces consumed by the cascade core
//!
//! The core never touches storage, transport or session state directly. Every
//! side effect goes through one of these traits.

use crate::error::SyncResult;
use crate::graph::{ObjectGraph, SchemaObject};
use crate::source::{QueryContext, TableDescriptor};

/// Converts a source-native descriptor into an object graph
pub trait GraphBuilder: Send + Sync {
    fn build_graph(&self, table: &TableDescriptor) -> SyncResult<ObjectGraph>;
}

/// Fresh lookups against the live source catalog
pub trait LiveCatalog: Send + Sync {
    fn lookup_table(&self, database: &str, name: &str) -> SyncResult<TableDescriptor>;
}

/// Computes the qualified name of an owned sub-object
pub trait NamingPolicy: Send + Sync {
    fn child_qualified_name(&self, parent: &str, child: &str) -> SyncResult<String>;
}

/// Cache of qualified names known to exist downstream
pub trait KnownObjects: Send + Sync {
    fn evict(&mut self, qualified_name: &str);
    fn remember(&mut self, qualified_name: &str);
}

/// Builds the DDL/audit record attached to query-mode notifications
pub trait AuditBuilder: Send + Sync {
    fn build_audit_record(
        &self,
        root: &SchemaObject,
        is_update: bool,
        query: &QueryContext,
    ) -> Option<SchemaObject>;
}

/// Builds the lineage entities recorded alongside a table created by a query
pub trait LineageBuilder: Send + Sync {
    fn build_create_lineage(&self, table: &ObjectGraph, query: &QueryContext) -> Vec<SchemaObject>;
}

/// Everything one cascade invocation needs from the outside world
pub struct CascadeContext<'a> {
    pub graphs: &'a dyn GraphBuilder,
    pub catalog: &'a dyn LiveCatalog,
    pub naming: &'a dyn NamingPolicy,
    pub known: &'a mut dyn KnownObjects,
    pub audit: &'a dyn AuditBuilder,
    pub lineage: &'a dyn LineageBuilder,
    /// Acting user when the event carries none
    pub default_user: &'a str,
    pub skip_temporary_tables: bool,
}
