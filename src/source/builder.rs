//! Descriptor graph builder
//!
//! Converts a `TableDescriptor` into an `ObjectGraph`: the table root, one
//! object per column and partition key, and the storage descriptor. Owned
//! objects get identities derived from the table's source identity, so the
//! same descriptor always yields the same graph and a renamed table keeps the
//! identities of everything it owns.

use super::{FieldSchema, TableDescriptor};
use crate::collaborators::{GraphBuilder, NamingPolicy};
use crate::error::{SyncError, SyncResult};
use crate::graph::{attrs, types, validate_graph, AttrValue, ObjectGraph, ObjectRef, Relation, SchemaObject};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

pub struct DescriptorGraphBuilder {
    cluster: String,
    naming: Arc<dyn NamingPolicy>,
}

impl DescriptorGraphBuilder {
    pub fn new(cluster: impl Into<String>, naming: Arc<dyn NamingPolicy>) -> Self {
        Self {
            cluster: cluster.into(),
            naming,
        }
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    /// `db.table@cluster`, lowercased
    pub fn table_qualified_name(&self, database: &str, table: &str) -> String {
        format!(
            "{}.{}@{}",
            database.to_lowercase(),
            table.to_lowercase(),
            self.cluster
        )
    }

    pub fn database_qualified_name(&self, database: &str) -> String {
        format!("{}@{}", database.to_lowercase(), self.cluster)
    }

    pub fn storage_qualified_name(table_qualified_name: &str) -> String {
        format!("{}_storage", table_qualified_name)
    }

    fn build_field(
        &self,
        field: &FieldSchema,
        position: usize,
        slot: &str,
        table_qn: &str,
        table: &TableDescriptor,
        table_ref: &ObjectRef,
    ) -> SyncResult<SchemaObject> {
        let qualified_name = self
            .naming
            .child_qualified_name(table_qn, &field.name)
            .map_err(|e| SyncError::conversion(e.to_string()))?;
        let guid = Uuid::new_v5(&table.object_id, format!("{}:{}", slot, field.name).as_bytes());

        let mut column = SchemaObject::new(types::COLUMN).with_guid(guid);
        column.set_attribute(attrs::QUALIFIED_NAME, qualified_name);
        column.set_attribute(attrs::NAME, field.name.as_str());
        column.set_attribute("type", field.data_type.as_str());
        column.set_attribute("position", position as i64);
        if let Some(comment) = &field.comment {
            column.set_attribute("comment", comment.as_str());
        }
        column.set_relationship(attrs::TABLE, Relation::One(table_ref.clone()));
        Ok(column)
    }

    fn build_fields(
        &self,
        fields: &[FieldSchema],
        slot: &str,
        table_qn: &str,
        table: &TableDescriptor,
        table_ref: &ObjectRef,
    ) -> SyncResult<Vec<SchemaObject>> {
        fields
            .iter()
            .enumerate()
            .map(|(position, field)| {
                self.build_field(field, position, slot, table_qn, table, table_ref)
            })
            .collect()
    }
}

impl GraphBuilder for DescriptorGraphBuilder {
    fn build_graph(&self, table: &TableDescriptor) -> SyncResult<ObjectGraph> {
        table.validate().map_err(|e| {
            SyncError::conversion(format!(
                "invalid table descriptor {}.{}: {}",
                table.database, table.name, e
            ))
        })?;

        let table_qn = self.table_qualified_name(&table.database, &table.name);
        let table_ref = ObjectRef::new(types::TABLE, table_qn.as_str()).with_guid(table.object_id);

        let mut root = SchemaObject::new(types::TABLE).with_guid(table.object_id);
        root.set_attribute(attrs::QUALIFIED_NAME, table_qn.as_str());
        root.set_attribute(attrs::NAME, table.name.to_lowercase());
        root.set_attribute("tableType", table.table_type.as_str());
        root.set_attribute("temporary", table.temporary);
        if let Some(owner) = &table.owner {
            root.set_attribute("owner", owner.as_str());
        }
        if let Some(created) = table.create_time {
            root.set_attribute("createTime", created.timestamp_millis());
        }
        if let Some(text) = &table.view_original_text {
            root.set_attribute("viewOriginalText", text.as_str());
        }
        if !table.parameters.is_empty() {
            let parameters: BTreeMap<String, AttrValue> = table
                .parameters
                .iter()
                .map(|(k, v)| (k.clone(), AttrValue::from(v.as_str())))
                .collect();
            root.set_attribute("parameters", AttrValue::Map(parameters));
        }
        root.set_relationship(
            attrs::DB,
            Relation::One(ObjectRef::new(
                types::DATABASE,
                self.database_qualified_name(&table.database),
            )),
        );

        let columns = self.build_fields(&table.columns, "column", &table_qn, table, &table_ref)?;
        let partition_keys =
            self.build_fields(&table.partition_keys, "partition", &table_qn, table, &table_ref)?;

        root.set_relationship(
            attrs::COLUMNS,
            Relation::Many(columns.iter().map(SchemaObject::to_ref).collect()),
        );
        root.set_relationship(
            attrs::PARTITION_KEYS,
            Relation::Many(partition_keys.iter().map(SchemaObject::to_ref).collect()),
        );

        let mut referred: Vec<SchemaObject> = columns.into_iter().chain(partition_keys).collect();

        if let Some(storage) = &table.storage {
            let guid = Uuid::new_v5(&table.object_id, b"storage");
            let mut sd = SchemaObject::new(types::STORAGE_DESC).with_guid(guid);
            sd.set_attribute(attrs::QUALIFIED_NAME, Self::storage_qualified_name(&table_qn));
            sd.set_attribute("location", storage.location.as_str());
            sd.set_attribute("compressed", storage.compressed);
            sd.set_attribute("numBuckets", storage.num_buckets);
            if let Some(format) = &storage.input_format {
                sd.set_attribute("inputFormat", format.as_str());
            }
            if let Some(format) = &storage.output_format {
                sd.set_attribute("outputFormat", format.as_str());
            }
            if let Some(serde_lib) = &storage.serde_lib {
                sd.set_attribute("serdeLib", serde_lib.as_str());
            }
            sd.set_attribute(attrs::TABLE, table_ref.clone());
            sd.set_relationship(attrs::TABLE, Relation::One(table_ref.clone()));

            root.set_relationship(attrs::SD, Relation::One(sd.to_ref()));
            referred.push(sd);
        }

        let mut graph = ObjectGraph::new(root);
        for object in referred {
            graph.add_referred(object);
        }

        validate_graph(&graph)?;
        debug!(
            "Built graph for {} with {} owned objects",
            table_qn,
            graph.referred.len()
        );

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::naming::{ClusterScopedNaming, DottedNaming};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_graph_shape() {
        let builder = fixtures::graph_builder();
        let graph = builder.build_graph(&fixtures::sales_table()).unwrap();

        assert_eq!(graph.qualified_name(), Some("default.sales@primary"));
        assert_eq!(graph.root.name(), Some("sales"));
        assert_eq!(graph.root.guid, Some(fixtures::SALES_ID));

        let columns = graph.root.relationship(attrs::COLUMNS).unwrap().refs();
        assert_eq!(columns.len(), 2);
        let id_column = graph.resolve(&columns[0]).unwrap();
        assert_eq!(id_column.qualified_name(), Some("default.sales@primary.id"));
        assert_eq!(id_column.name(), Some("id"));

        let sd_ref = &graph.root.relationship(attrs::SD).unwrap().refs()[0];
        let sd = graph.resolve(sd_ref).unwrap();
        assert_eq!(sd.qualified_name(), Some("default.sales@primary_storage"));
        assert!(sd.attribute(attrs::TABLE).is_some());

        // Only the owning database is external
        assert_eq!(graph.unresolved_references().len(), 1);
    }

    #[test]
    fn test_identities_survive_rename() {
        let builder = fixtures::graph_builder();
        let before = builder.build_graph(&fixtures::sales_table()).unwrap();
        let after = builder
            .build_graph(&fixtures::renamed(&fixtures::sales_table(), "default", "sales_v2"))
            .unwrap();

        let before_ids: Vec<_> = before.referred.keys().collect();
        let after_ids: Vec<_> = after.referred.keys().collect();
        assert_eq!(before_ids, after_ids);
        assert_eq!(after.qualified_name(), Some("default.sales_v2@primary"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = fixtures::graph_builder();
        let table = fixtures::sales_table();
        assert_eq!(
            builder.build_graph(&table).unwrap(),
            builder.build_graph(&table).unwrap()
        );
    }

    #[test]
    fn test_invalid_descriptor_is_conversion_error() {
        let builder = fixtures::graph_builder();
        let mut table = fixtures::sales_table();
        table.database = "bad name".to_string();

        assert!(matches!(
            builder.build_graph(&table),
            Err(SyncError::Conversion(_))
        ));
    }

    #[test]
    fn test_view_has_no_storage_descriptor() {
        let builder = DescriptorGraphBuilder::new("primary", Arc::new(DottedNaming));
        let graph = builder.build_graph(&fixtures::sales_view()).unwrap();

        assert!(graph.root.relationship(attrs::SD).is_none());
        assert_eq!(graph.root.text("tableType"), Some("VIRTUAL_VIEW"));
    }

    #[test]
    fn test_cluster_scoped_child_names() {
        let builder = DescriptorGraphBuilder::new("primary", Arc::new(ClusterScopedNaming));
        let graph = builder.build_graph(&fixtures::sales_table()).unwrap();

        let found = graph.by_unique_attribute(
            types::COLUMN,
            attrs::QUALIFIED_NAME,
            "default.sales.amount@primary",
        );
        assert!(found.is_some());
    }
}
