//! Snapshot Resolver
//!
//! Produces the object graphs a cascade works on, either from the descriptors
//! carried by a metastore event or by resolving a query's read/write sets
//! against the live catalog.

pub mod event;

pub use event::{EventSource, MetastoreEvent, Operation, QueryEvent, SchemaEvent};

use crate::collaborators::{GraphBuilder, LiveCatalog};
use crate::error::SyncResult;
use crate::graph::ObjectGraph;
use crate::source::{Entity, TableDescriptor};
use tracing::debug;
use uuid::Uuid;

/// Old and new graphs of a renamed object; either side may be absent
#[derive(Debug, Clone, Default)]
pub struct SnapshotPair {
    pub old: Option<ObjectGraph>,
    pub new: Option<ObjectGraph>,
}

impl SnapshotPair {
    pub fn both(self) -> Option<(ObjectGraph, ObjectGraph)> {
        match (self.old, self.new) {
            (Some(old), Some(new)) => Some((old, new)),
            _ => None,
        }
    }
}

/// Distinct table descriptors of an entity set, deduplicated by identity in
/// first-seen order
fn distinct_tables<'a>(
    entities: &'a [Entity],
    exclude: Option<Uuid>,
) -> Vec<&'a TableDescriptor> {
    let mut seen: Vec<&TableDescriptor> = Vec::new();
    for table in entities.iter().filter_map(Entity::as_table) {
        if Some(table.object_id) == exclude {
            continue;
        }
        if !seen.iter().any(|t| t.object_id == table.object_id) {
            seen.push(table);
        }
    }
    seen
}

fn build_optional(
    graphs: &dyn GraphBuilder,
    table: Option<&TableDescriptor>,
) -> SyncResult<Option<ObjectGraph>> {
    table.map(|t| graphs.build_graph(t)).transpose()
}

/// Resolve the before/after graphs of a rename
pub fn resolve_rename(
    source: &EventSource,
    graphs: &dyn GraphBuilder,
    catalog: &dyn LiveCatalog,
) -> SyncResult<SnapshotPair> {
    match source {
        EventSource::Metastore(event) => Ok(SnapshotPair {
            old: build_optional(graphs, event.old_table.as_ref())?,
            new: build_optional(graphs, event.new_table.as_ref())?,
        }),
        EventSource::Query(event) => resolve_query_rename(event, graphs, catalog),
    }
}

fn resolve_query_rename(
    event: &QueryEvent,
    graphs: &dyn GraphBuilder,
    catalog: &dyn LiveCatalog,
) -> SyncResult<SnapshotPair> {
    let old_table = match distinct_tables(&event.inputs, None).as_slice() {
        [] => {
            debug!("Rename skipped: no table in read set");
            return Ok(SnapshotPair::default());
        }
        [single] => *single,
        many => {
            debug!("Rename skipped: {} distinct tables in read set", many.len());
            return Ok(SnapshotPair::default());
        }
    };

    // Self references are skipped by identity, never by name
    let new_table = match distinct_tables(&event.outputs, Some(old_table.object_id)).as_slice() {
        [] => {
            debug!(
                "Rename skipped: write set holds no table other than {}.{}",
                old_table.database, old_table.name
            );
            return Ok(SnapshotPair::default());
        }
        [single] => *single,
        many => {
            debug!("Rename skipped: {} candidate tables in write set", many.len());
            return Ok(SnapshotPair::default());
        }
    };

    let old = graphs.build_graph(old_table)?;
    let live = catalog.lookup_table(&new_table.database, &new_table.name)?;
    let new = graphs.build_graph(&live)?;

    Ok(SnapshotPair {
        old: Some(old),
        new: Some(new),
    })
}

/// Resolve the target graphs of a create or alter
pub fn resolve_targets(
    source: &EventSource,
    graphs: &dyn GraphBuilder,
    catalog: &dyn LiveCatalog,
) -> SyncResult<Vec<ObjectGraph>> {
    match source {
        EventSource::Metastore(event) => Ok(build_optional(graphs, event.new_table.as_ref())?
            .into_iter()
            .collect()),
        EventSource::Query(event) => distinct_tables(&event.outputs, None)
            .into_iter()
            .map(|table| {
                let live = catalog.lookup_table(&table.database, &table.name)?;
                graphs.build_graph(&live)
            })
            .collect(),
    }
}
