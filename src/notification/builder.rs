//! Phase-typed notification builder
//!
//! The builder starts in the `Children` phase, which only accepts partial
//! updates, and is consumed into the `Roots` phase for full updates and
//! creates. A partial update therefore cannot follow a root update.

use super::{Notification, UniqueRef};
use crate::error::{SyncError, SyncResult};
use crate::graph::{EntityBatch, SchemaObject};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::marker::PhantomData;
use std::ops::Deref;

/// Phase accepting sub-object partial updates
#[derive(Debug)]
pub struct Children;

/// Phase accepting root full updates and creates
#[derive(Debug)]
pub struct Roots;

#[derive(Debug)]
pub struct NotificationBuilder<P> {
    user: String,
    notifications: Vec<Notification>,
    _phase: PhantomData<P>,
}

impl<P> NotificationBuilder<P> {
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

impl NotificationBuilder<Children> {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            notifications: Vec::new(),
            _phase: PhantomData,
        }
    }

    pub fn partial_update(&mut self, target: UniqueRef, patch: SchemaObject) {
        self.notifications.push(Notification::PartialUpdate {
            user: self.user.clone(),
            target,
            patch,
        });
    }

    /// Close the children phase
    pub fn roots(self) -> NotificationBuilder<Roots> {
        NotificationBuilder {
            user: self.user,
            notifications: self.notifications,
            _phase: PhantomData,
        }
    }
}

impl NotificationBuilder<Roots> {
    pub fn full_update(&mut self, batch: impl Into<EntityBatch>) {
        self.notifications.push(Notification::FullUpdate {
            user: self.user.clone(),
            batch: batch.into(),
        });
    }

    pub fn full_create(&mut self, batch: impl Into<EntityBatch>) {
        self.notifications.push(Notification::FullCreate {
            user: self.user.clone(),
            batch: batch.into(),
        });
    }

    pub fn finish(self) -> SyncResult<NotificationBatch> {
        NotificationBatch::new(self.notifications)
    }
}

/// Ordered notification list plus a checksum of its canonical encoding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationBatch {
    checksum: String,
    notifications: Vec<Notification>,
}

impl NotificationBatch {
    pub fn new(notifications: Vec<Notification>) -> SyncResult<Self> {
        let checksum = Self::compute_checksum(&notifications)?;
        Ok(Self {
            checksum,
            notifications,
        })
    }

    pub fn empty() -> Self {
        Self {
            checksum: format!("{:x}", Sha256::digest(b"[]")),
            notifications: Vec::new(),
        }
    }

    /// SHA-256 over the JSON encoding. Graph maps are ordered, so equal
    /// batches always encode identically.
    pub fn compute_checksum(notifications: &[Notification]) -> SyncResult<String> {
        let encoded = serde_json::to_vec(notifications)
            .map_err(|e| SyncError::conversion(format!("notification encoding failed: {}", e)))?;
        let mut hasher = Sha256::new();
        hasher.update(&encoded);
        Ok(format!("{:x}", hasher.finalize()))
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn into_notifications(self) -> Vec<Notification> {
        self.notifications
    }
}

impl Deref for NotificationBatch {
    type Target = [Notification];

    fn deref(&self) -> &Self::Target {
        &self.notifications
    }
}

impl IntoIterator for NotificationBatch {
    type Item = Notification;
    type IntoIter = std::vec::IntoIter<Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.notifications.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{attrs, types};
    use pretty_assertions::assert_eq;

    fn column_patch(qn: &str) -> SchemaObject {
        let mut patch = SchemaObject::new(types::COLUMN);
        patch.set_attribute(attrs::QUALIFIED_NAME, qn);
        patch
    }

    #[test]
    fn test_builder_preserves_production_order() {
        let mut children = NotificationBuilder::new("etl");
        children.partial_update(
            UniqueRef::by_qualified_name(types::COLUMN, "a"),
            column_patch("b"),
        );
        children.partial_update(
            UniqueRef::by_qualified_name(types::COLUMN, "c"),
            column_patch("d"),
        );

        let mut roots = children.roots();
        roots.full_update(SchemaObject::new(types::TABLE));
        roots.full_create(SchemaObject::new(types::TABLE_DDL));

        let batch = roots.finish().unwrap();
        let kinds: Vec<_> = batch.iter().map(Notification::kind).collect();
        assert_eq!(kinds, vec!["partial-update", "partial-update", "update", "create"]);
        assert!(batch.iter().all(|n| n.user() == "etl"));
    }

    #[test]
    fn test_checksum_is_deterministic() {
        let build = || {
            let mut roots = NotificationBuilder::new("etl").roots();
            roots.full_update(SchemaObject::new(types::TABLE));
            roots.finish().unwrap()
        };

        assert_eq!(build().checksum(), build().checksum());
        assert_ne!(build().checksum(), NotificationBatch::empty().checksum());
    }

    #[test]
    fn test_empty_batch_checksum_matches_encoding() {
        let encoded = NotificationBatch::new(Vec::new()).unwrap();
        assert_eq!(encoded.checksum(), NotificationBatch::empty().checksum());
        assert!(encoded.is_empty());
    }
}
