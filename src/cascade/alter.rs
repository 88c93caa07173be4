//! Alter flow

use crate::collaborators::CascadeContext;
use crate::error::SyncResult;
use crate::graph::{EntityBatch, ObjectGraph, SchemaObject};
use crate::notification::{NotificationBatch, NotificationBuilder};
use crate::source::QueryContext;
use tracing::{debug, info};

pub fn cascade_alter(
    targets: Vec<ObjectGraph>,
    ctx: &mut CascadeContext<'_>,
    user: &str,
    query: Option<&QueryContext>,
) -> SyncResult<NotificationBatch> {
    if targets.is_empty() {
        debug!("Alter produced no tables to update");
        return Ok(NotificationBatch::empty());
    }

    let audits: Vec<SchemaObject> = match query {
        Some(q) => targets
            .iter()
            .filter_map(|graph| ctx.audit.build_audit_record(&graph.root, true, q))
            .collect(),
        None => Vec::new(),
    };

    let count = targets.len();
    let mut roots = NotificationBuilder::new(user).roots();
    roots.full_update(targets.into_iter().collect::<EntityBatch>());
    for record in audits {
        roots.full_create(record);
    }

    info!("Alter updated {} tables", count);
    roots.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::GraphBuilder;
    use crate::fixtures::{self, Harness};
    use crate::notification::Notification;

    #[test]
    fn test_alter_emits_single_full_update() {
        let builder = fixtures::graph_builder();
        let mut harness = Harness::new();

        let batch = cascade_alter(
            vec![builder.build_graph(&fixtures::sales_table()).unwrap()],
            &mut harness.context(),
            "etl",
            Some(&fixtures::query_context("ALTER TABLE sales SET TBLPROPERTIES ('a'='b')")),
        )
        .unwrap();

        let kinds: Vec<_> = batch.iter().map(Notification::kind).collect();
        assert_eq!(kinds, vec!["update", "create"]);
    }

    #[test]
    fn test_alter_without_targets() {
        let mut harness = Harness::new();
        let batch = cascade_alter(Vec::new(), &mut harness.context(), "etl", None).unwrap();
        assert!(batch.is_empty());
    }
}
