//! Qualified-name policies for owned sub-objects

use crate::collaborators::NamingPolicy;
use crate::error::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// `parent.child`
#[derive(Debug, Clone, Copy, Default)]
pub struct DottedNaming;

impl NamingPolicy for DottedNaming {
    fn child_qualified_name(&self, parent: &str, child: &str) -> SyncResult<String> {
        if parent.is_empty() {
            return Err(SyncError::naming(parent, child, "parent qualified name is empty"));
        }
        if child.is_empty() {
            return Err(SyncError::naming(parent, child, "child name is empty"));
        }
        Ok(format!("{}.{}", parent, child))
    }
}

/// `db.table.child@cluster`: the child is inserted before the cluster suffix
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterScopedNaming;

impl NamingPolicy for ClusterScopedNaming {
    fn child_qualified_name(&self, parent: &str, child: &str) -> SyncResult<String> {
        if child.is_empty() {
            return Err(SyncError::naming(parent, child, "child name is empty"));
        }
        let (scope, cluster) = parent
            .rsplit_once('@')
            .ok_or_else(|| SyncError::naming(parent, child, "parent has no cluster suffix"))?;
        if scope.is_empty() || cluster.is_empty() {
            return Err(SyncError::naming(parent, child, "malformed parent qualified name"));
        }
        Ok(format!("{}.{}@{}", scope, child, cluster))
    }
}

/// Configured naming style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingStyle {
    #[default]
    Dotted,
    ClusterScoped,
}

impl NamingStyle {
    pub fn policy(self) -> Arc<dyn NamingPolicy> {
        match self {
            NamingStyle::Dotted => Arc::new(DottedNaming),
            NamingStyle::ClusterScoped => Arc::new(ClusterScopedNaming),
        }
    }
}

impl FromStr for NamingStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dotted" => Ok(NamingStyle::Dotted),
            "cluster-scoped" | "cluster_scoped" => Ok(NamingStyle::ClusterScoped),
            other => Err(format!("unknown naming style '{}'", other)),
        }
    }
}
