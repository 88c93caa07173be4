//! Rename cascade
//!
//! Walks the old and new graphs of a renamed table and emits, in order:
//! 1. one partial update per column and per partition key renaming its
//!    qualified name under the new table
//! 2. one partial update of the storage descriptor, keyed by its old name
//! 3. a full update of the new table carrying the old name as an alias
//! 4. in query mode, the DDL audit record

use crate::collaborators::{CascadeContext, NamingPolicy};
use crate::error::{SyncError, SyncResult};
use crate::graph::{attrs, ObjectGraph, SchemaObject};
use crate::notification::{Children, NotificationBatch, NotificationBuilder, UniqueRef};
use crate::resolver::SnapshotPair;
use crate::source::QueryContext;
use tracing::{debug, info, warn};

pub fn cascade_rename(
    pair: SnapshotPair,
    ctx: &mut CascadeContext<'_>,
    user: &str,
    query: Option<&QueryContext>,
) -> SyncResult<NotificationBatch> {
    let Some((old, mut new)) = pair.both() else {
        debug!("Rename skipped: old or new table is absent");
        return Ok(NotificationBatch::empty());
    };

    let old_qn = root_qualified_name(&old)?.to_string();
    let new_qn = root_qualified_name(&new)?.to_string();
    let old_name = old
        .root
        .name()
        .ok_or_else(|| SyncError::conversion(format!("{} has no name attribute", old_qn)))?
        .to_string();

    let mut children = NotificationBuilder::new(user);
    rename_owned(&old, attrs::COLUMNS, &new_qn, ctx.naming, &mut children)?;
    rename_owned(&old, attrs::PARTITION_KEYS, &new_qn, ctx.naming, &mut children)?;
    rename_storage(&old, &new, &mut children)?;

    new.root.set_attribute(attrs::ALIASES, vec![old_name]);
    if old_qn != new_qn {
        ctx.known.evict(&old_qn);
    } else {
        debug!("Rename keeps qualified name {}, known object retained", old_qn);
    }

    let audit = query.and_then(|q| ctx.audit.build_audit_record(&new.root, true, q));

    let mut roots = children.roots();
    roots.full_update(new);
    if let Some(record) = audit {
        roots.full_create(record);
    }

    info!(
        "Rename cascade {} -> {} produced {} notifications",
        old_qn,
        new_qn,
        roots.len()
    );
    roots.finish()
}

fn root_qualified_name(graph: &ObjectGraph) -> SyncResult<&str> {
    graph
        .qualified_name()
        .ok_or_else(|| SyncError::conversion(format!("{} root has no qualifiedName", graph.root.type_name)))
}

/// Emit a qualified-name patch for every object in one owned-list slot
fn rename_owned(
    old: &ObjectGraph,
    slot: &str,
    new_root_qn: &str,
    naming: &dyn NamingPolicy,
    builder: &mut NotificationBuilder<Children>,
) -> SyncResult<()> {
    let Some(relation) = old.root.relationship(slot) else {
        return Ok(());
    };

    for reference in relation.refs() {
        let Some(child) = old.resolve(reference) else {
            warn!(
                "Skipping unresolved {} reference {}",
                slot,
                reference.qualified_name.as_deref().unwrap_or("<unnamed>")
            );
            continue;
        };

        let old_child_qn = child.qualified_name().ok_or_else(|| {
            SyncError::conversion(format!("{} in {} has no qualifiedName", child.type_name, slot))
        })?;
        let name = child.name().ok_or_else(|| {
            SyncError::conversion(format!("{} has no name attribute", old_child_qn))
        })?;

        let renamed = naming.child_qualified_name(new_root_qn, name)?;

        let mut patch = SchemaObject::new(child.type_name.as_str());
        patch.set_attribute(attrs::QUALIFIED_NAME, renamed);
        builder.partial_update(
            UniqueRef::by_qualified_name(child.type_name.as_str(), old_child_qn),
            patch,
        );
    }

    Ok(())
}

fn storage_descriptor(graph: &ObjectGraph) -> Option<&SchemaObject> {
    graph
        .root
        .relationship(attrs::SD)?
        .refs()
        .first()
        .and_then(|r| graph.resolve(r))
}

/// Move the old storage descriptor onto the new state, detached from the table
fn rename_storage(
    old: &ObjectGraph,
    new: &ObjectGraph,
    builder: &mut NotificationBuilder<Children>,
) -> SyncResult<()> {
    let (Some(old_sd), Some(new_sd)) = (storage_descriptor(old), storage_descriptor(new)) else {
        debug!("No storage descriptor on both sides, skipping storage rename");
        return Ok(());
    };

    let old_sd_qn = old_sd.qualified_name().ok_or_else(|| {
        SyncError::conversion(format!("{} has no qualifiedName", old_sd.type_name))
    })?;

    let mut patch = new_sd.clone();
    patch.remove_attribute(attrs::TABLE);
    patch.clear_relationships();

    builder.partial_update(
        UniqueRef::by_qualified_name(old_sd.type_name.as_str(), old_sd_qn),
        patch,
    );
    Ok(())
}
