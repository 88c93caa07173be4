//! Known-object cache
//!
//! Qualified names that are known to exist downstream. Creates remember the
//! new name, renames evict the old one.

use crate::collaborators::KnownObjects;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct KnownObjectCache {
    names: BTreeSet<String>,
}

impl KnownObjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.names.contains(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }
}

impl KnownObjects for KnownObjectCache {
    fn evict(&mut self, qualified_name: &str) {
        if self.names.remove(qualified_name) {
            debug!("Evicted known object {}", qualified_name);
        }
    }

    fn remember(&mut self, qualified_name: &str) {
        self.names.insert(qualified_name.to_string());
    }
}

/// One queued change to the known-object cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnownChange {
    Remember(String),
    Evict(String),
}

/// Known-object changes recorded during a cascade and applied afterwards, so
/// the shared cache is only locked when something actually changed.
#[derive(Debug, Clone, Default)]
pub struct PendingKnownChanges {
    changes: Vec<KnownChange>,
}

impl PendingKnownChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Replay the changes in the order they were recorded
    pub fn apply_to(self, cache: &mut KnownObjectCache) {
        for change in self.changes {
            match change {
                KnownChange::Remember(name) => cache.remember(&name),
                KnownChange::Evict(name) => cache.evict(&name),
            }
        }
    }
}

impl KnownObjects for PendingKnownChanges {
    fn evict(&mut self, qualified_name: &str) {
        self.changes.push(KnownChange::Evict(qualified_name.to_string()));
    }

    fn remember(&mut self, qualified_name: &str) {
        self.changes.push(KnownChange::Remember(qualified_name.to_string()));
    }
}
