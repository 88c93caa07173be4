//! Rename/Alter Cascade Engine
//!
//! Entry point of the core: resolves an event's snapshots and turns them into
//! an ordered notification batch. The computation is synchronous and keeps no
//! state between calls; every side effect goes through the collaborators in
//! the `CascadeContext`.

pub mod alter;
pub mod create;
pub mod rename;

pub use alter::cascade_alter;
pub use create::cascade_create;
pub use rename::cascade_rename;

use crate::collaborators::CascadeContext;
use crate::error::SyncResult;
use crate::notification::NotificationBatch;
use crate::resolver::{self, EventSource, Operation, SchemaEvent};
use tracing::info;

/// Resolve an event and compute its notifications. Returns an empty batch
/// when nothing can be inferred from the event.
pub fn resolve_and_cascade(
    event: &SchemaEvent,
    ctx: &mut CascadeContext<'_>,
) -> SyncResult<NotificationBatch> {
    let user = event.acting_user(ctx.default_user).to_string();
    let query = event.source.query();

    match (event.operation, &event.source) {
        (Operation::RenameTable, source) => {
            let pair = resolver::resolve_rename(source, ctx.graphs, ctx.catalog)?;
            cascade_rename(pair, ctx, &user, query)
        }
        (Operation::AlterTable, EventSource::Metastore(metastore)) if metastore.is_rename() => {
            info!("Metastore alter changes the table name, running rename cascade");
            let pair = resolver::resolve_rename(&event.source, ctx.graphs, ctx.catalog)?;
            cascade_rename(pair, ctx, &user, query)
        }
        (Operation::AlterTable, source) => {
            let targets = resolver::resolve_targets(source, ctx.graphs, ctx.catalog)?;
            cascade_alter(targets, ctx, &user, query)
        }
        (Operation::CreateTable, source) => {
            let targets = resolver::resolve_targets(source, ctx.graphs, ctx.catalog)?;
            cascade_create(targets, ctx, &user, query)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::KnownObjects;
    use crate::error::SyncError;
    use crate::fixtures::{self, Harness};
    use crate::notification::Notification;
    use crate::resolver::{MetastoreEvent, QueryEvent};
    use crate::source::{Entity, TableDescriptor};
    use pretty_assertions::assert_eq;

    fn metastore(
        operation: Operation,
        old: Option<TableDescriptor>,
        new: Option<TableDescriptor>,
    ) -> SchemaEvent {
        SchemaEvent {
            operation,
            user: Some("etl".to_string()),
            source: EventSource::Metastore(MetastoreEvent {
                old_table: old,
                new_table: new,
            }),
        }
    }

    #[test]
    fn test_metastore_rename_end_to_end() {
        let old = fixtures::sales_table();
        let new = fixtures::renamed(&old, "default", "sales_v2");
        let mut harness = Harness::new();

        let batch = resolve_and_cascade(
            &metastore(Operation::RenameTable, Some(old), Some(new)),
            &mut harness.context(),
        )
        .unwrap();

        assert_eq!(batch.len(), 4);
        assert!(batch.iter().all(|n| n.user() == "etl"));
    }

    #[test]
    fn test_metastore_alter_with_name_change_is_rename() {
        let old = fixtures::sales_table();
        let new = fixtures::renamed(&old, "default", "sales_v2");
        let mut harness = Harness::new();

        let batch = resolve_and_cascade(
            &metastore(Operation::AlterTable, Some(old), Some(new)),
            &mut harness.context(),
        )
        .unwrap();

        assert_eq!(batch.len(), 4);
        assert_eq!(batch[3].kind(), "update");
    }

    #[test]
    fn test_metastore_alter_in_place() {
        let old = fixtures::sales_table();
        let mut new = old.clone();
        new.owner = Some("finance".to_string());
        let mut harness = Harness::new();

        let batch = resolve_and_cascade(
            &metastore(Operation::AlterTable, Some(old), Some(new)),
            &mut harness.context(),
        )
        .unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].kind(), "update");
    }

    #[test]
    fn test_metastore_case_only_alter_is_in_place() {
        let old = fixtures::renamed(&fixtures::sales_table(), "default", "SALES");
        let new = fixtures::sales_table();
        let mut harness = Harness::new();
        harness.known.remember("default.sales@primary");

        let batch = resolve_and_cascade(
            &metastore(Operation::AlterTable, Some(old), Some(new)),
            &mut harness.context(),
        )
        .unwrap();

        let kinds: Vec<_> = batch.iter().map(Notification::kind).collect();
        assert_eq!(kinds, vec!["update"]);
        assert!(harness.known.contains("default.sales@primary"));
    }

    #[test]
    fn test_metastore_rename_conversion_failure() {
        let old = fixtures::sales_table();
        let mut new = fixtures::renamed(&old, "default", "sales_v2");
        new.columns[0].name.clear();
        let mut harness = Harness::new();
        harness.known.remember("default.sales@primary");

        let err = resolve_and_cascade(
            &metastore(Operation::RenameTable, Some(old), Some(new)),
            &mut harness.context(),
        )
        .unwrap_err();

        assert!(matches!(err, SyncError::Conversion(_)));
        assert!(harness.known.contains("default.sales@primary"));
    }

    #[test]
    fn test_query_rename_end_to_end_with_audit() {
        let old = fixtures::sales_table();
        let new = fixtures::renamed_with_new_identity(&old, "default", "sales_v2");
        let mut harness = Harness::new();
        harness.catalog.upsert(new.clone());

        let mut query = fixtures::query_context("ALTER TABLE sales RENAME TO sales_v2");
        query.user = Some("analyst".to_string());
        let event = SchemaEvent {
            operation: Operation::RenameTable,
            user: None,
            source: EventSource::Query(QueryEvent {
                inputs: vec![Entity::table(old.clone())],
                outputs: vec![Entity::table(old), Entity::table(new)],
                query,
            }),
        };

        let batch = resolve_and_cascade(&event, &mut harness.context()).unwrap();

        let kinds: Vec<_> = batch.iter().map(Notification::kind).collect();
        assert_eq!(
            kinds,
            vec!["partial-update", "partial-update", "partial-update", "update", "create"]
        );
        assert!(batch.iter().all(|n| n.user() == "analyst"));
    }

    #[test]
    fn test_query_rename_audit_suppressed() {
        let old = fixtures::sales_table();
        let new = fixtures::renamed_with_new_identity(&old, "default", "sales_v2");
        let mut harness = Harness::new();
        harness.catalog.upsert(new.clone());
        harness.audit = crate::audit::DdlAuditBuilder::new(false);

        let event = SchemaEvent {
            operation: Operation::RenameTable,
            user: None,
            source: EventSource::Query(QueryEvent {
                inputs: vec![Entity::table(old)],
                outputs: vec![Entity::table(new)],
                query: fixtures::query_context("ALTER TABLE sales RENAME TO sales_v2"),
            }),
        };

        let batch = resolve_and_cascade(&event, &mut harness.context()).unwrap();
        assert_eq!(batch.len(), 4);
        assert_eq!(batch[3].kind(), "update");
    }

    #[test]
    fn test_case_only_rename_is_processed() {
        let old = fixtures::renamed(&fixtures::sales_table(), "default", "OLD_TABLE");
        let new = fixtures::renamed_with_new_identity(&old, "default", "old_table");
        let mut harness = Harness::new();
        harness.catalog.upsert(new.clone());
        harness.known.remember("default.old_table@primary");

        let event = SchemaEvent {
            operation: Operation::RenameTable,
            user: None,
            source: EventSource::Query(QueryEvent {
                inputs: vec![Entity::table(old.clone())],
                outputs: vec![Entity::table(old), Entity::table(new)],
                query: fixtures::query_context(""),
            }),
        };

        let batch = resolve_and_cascade(&event, &mut harness.context()).unwrap();
        assert_eq!(batch.len(), 4);
        assert!(harness.known.contains("default.old_table@primary"));
    }

    #[test]
    fn test_query_create_registers_live_tables() {
        let mut harness = Harness::new();
        harness.catalog.upsert(fixtures::sales_table());

        let event = SchemaEvent {
            operation: Operation::CreateTable,
            user: None,
            source: EventSource::Query(QueryEvent {
                inputs: vec![],
                outputs: vec![Entity::table(fixtures::sales_table())],
                query: fixtures::query_context("CREATE TABLE sales (id bigint, amount decimal(10,2))"),
            }),
        };

        let batch = resolve_and_cascade(&event, &mut harness.context()).unwrap();
        let kinds: Vec<_> = batch.iter().map(Notification::kind).collect();
        assert_eq!(kinds, vec!["create", "create"]);
        assert!(harness.known.contains("default.sales@primary"));
        assert!(batch.iter().all(|n| n.user() == fixtures::DEFAULT_USER));
    }

    #[test]
    fn test_identical_events_give_identical_checksums() {
        let old = fixtures::sales_table();
        let new = fixtures::renamed(&old, "default", "sales_v2");
        let event = metastore(Operation::RenameTable, Some(old), Some(new));

        let first = resolve_and_cascade(&event, &mut Harness::new().context()).unwrap();
        let second = resolve_and_cascade(&event, &mut Harness::new().context()).unwrap();
        assert_eq!(first.checksum(), second.checksum());
    }
}
