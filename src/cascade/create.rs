//! Create flow
//!
//! Registers new tables with one full create. In query mode the create also
//! carries the lineage of external tables and is followed by one audit record
//! per table.

use crate::collaborators::CascadeContext;
use crate::error::SyncResult;
use crate::graph::{AttrValue, EntityBatch, ObjectGraph, SchemaObject};
use crate::notification::{NotificationBatch, NotificationBuilder};
use crate::source::QueryContext;
use tracing::{debug, info};

pub(crate) fn is_temporary(graph: &ObjectGraph) -> bool {
    matches!(graph.root.attribute("temporary"), Some(AttrValue::Bool(true)))
}

pub fn cascade_create(
    targets: Vec<ObjectGraph>,
    ctx: &mut CascadeContext<'_>,
    user: &str,
    query: Option<&QueryContext>,
) -> SyncResult<NotificationBatch> {
    let tables: Vec<ObjectGraph> = targets
        .into_iter()
        .filter(|graph| {
            let skip = ctx.skip_temporary_tables && is_temporary(graph);
            if skip {
                debug!(
                    "Skipping temporary table {}",
                    graph.qualified_name().unwrap_or("<unnamed>")
                );
            }
            !skip
        })
        .collect();

    if tables.is_empty() {
        debug!("Create produced no tables to register");
        return Ok(NotificationBatch::empty());
    }

    let (lineage, audits): (Vec<SchemaObject>, Vec<SchemaObject>) = match query {
        Some(q) => (
            tables
                .iter()
                .flat_map(|graph| ctx.lineage.build_create_lineage(graph, q))
                .collect(),
            tables
                .iter()
                .filter_map(|graph| ctx.audit.build_audit_record(&graph.root, false, q))
                .collect(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    for qn in tables.iter().filter_map(ObjectGraph::qualified_name) {
        ctx.known.remember(qn);
    }

    let count = tables.len();
    let mut created: EntityBatch = tables.into_iter().collect();
    for entity in lineage {
        created.push_entity(entity);
    }

    let mut roots = NotificationBuilder::new(user).roots();
    roots.full_create(created);
    for record in audits {
        roots.full_create(record);
    }

    info!("Create registered {} tables", count);
    roots.finish()
}
