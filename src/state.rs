//! Application state management
//!
//! Contains shared state accessible across all handlers. The live catalog and
//! the known-object cache sit behind `RwLock`s. A cascade reads the catalog
//! under a read guard and records known-object changes locally; the cache
//! write guard is only taken to apply them.

use crate::audit::DdlAuditBuilder;
use crate::cascade::resolve_and_cascade;
use crate::catalog::{KnownObjectCache, PendingKnownChanges, TableCatalog};
use crate::collaborators::{CascadeContext, NamingPolicy};
use crate::config::SyncConfig;
use crate::error::SyncResult;
use crate::lineage::ProcessLineageBuilder;
use crate::notification::NotificationBatch;
use crate::resolver::SchemaEvent;
use crate::source::{DescriptorGraphBuilder, TableDescriptor};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Application state shared across all handlers
pub struct AppState {
    /// Live source catalog used by query-mode events
    pub catalog: RwLock<TableCatalog>,

    /// Qualified names known downstream
    pub known: RwLock<KnownObjectCache>,

    pub graphs: DescriptorGraphBuilder,
    pub naming: Arc<dyn NamingPolicy>,
    pub audit: DdlAuditBuilder,
    pub lineage: ProcessLineageBuilder,
    pub sync: SyncConfig,
}

impl AppState {
    pub fn new(sync: SyncConfig) -> Self {
        let naming = sync.naming_style.policy();

        Self {
            catalog: RwLock::new(TableCatalog::new()),
            known: RwLock::new(KnownObjectCache::new()),
            graphs: DescriptorGraphBuilder::new(sync.cluster_name.clone(), naming.clone()),
            naming,
            audit: DdlAuditBuilder::new(sync.audit_enabled),
            lineage: ProcessLineageBuilder::new(sync.cluster_name.clone()),
            sync,
        }
    }

    /// Start with a pre-populated live catalog
    pub fn with_tables(sync: SyncConfig, tables: Vec<TableDescriptor>) -> Self {
        let state = Self::new(sync);
        Self {
            catalog: RwLock::new(tables.into_iter().collect()),
            ..state
        }
    }

    /// Run one event through the cascade engine
    pub async fn process_event(&self, event: &SchemaEvent) -> SyncResult<NotificationBatch> {
        let mut pending = PendingKnownChanges::new();

        let batch = {
            let catalog = self.catalog.read().await;
            let mut ctx = CascadeContext {
                graphs: &self.graphs,
                catalog: &*catalog,
                naming: self.naming.as_ref(),
                known: &mut pending,
                audit: &self.audit,
                lineage: &self.lineage,
                default_user: &self.sync.default_user,
                skip_temporary_tables: self.sync.skip_temporary_tables,
            };
            resolve_and_cascade(event, &mut ctx)?
        };

        if !pending.is_empty() {
            let mut known = self.known.write().await;
            pending.apply_to(&mut known);
        }

        Ok(batch)
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
