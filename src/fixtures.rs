//! Shared test fixtures

use crate::audit::DdlAuditBuilder;
use crate::catalog::{KnownObjectCache, TableCatalog};
use crate::collaborators::{CascadeContext, NamingPolicy};
use crate::lineage::ProcessLineageBuilder;
use crate::naming::DottedNaming;
use crate::source::{
    DescriptorGraphBuilder, FieldSchema, QueryContext, StorageDescriptor, TableDescriptor,
    TableType,
};
use chrono::DateTime;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

pub const SALES_ID: Uuid = Uuid::from_u128(0x5a1e_5000_0000_4000_8000_0000_0000_0001);
pub const EVENTS_ID: Uuid = Uuid::from_u128(0xe7e7_5000_0000_4000_8000_0000_0000_0002);
pub const SUMMARY_ID: Uuid = Uuid::from_u128(0x5077_5000_0000_4000_8000_0000_0000_0003);
pub const CLICKS_ID: Uuid = Uuid::from_u128(0xc1c1_5000_0000_4000_8000_0000_0000_0004);
pub const DEFAULT_USER: &str = "catalog-sync";

fn field(name: &str, data_type: &str) -> FieldSchema {
    FieldSchema {
        name: name.to_string(),
        data_type: data_type.to_string(),
        comment: None,
    }
}

fn storage(location: &str) -> StorageDescriptor {
    StorageDescriptor {
        location: location.to_string(),
        input_format: Some("org.apache.hadoop.mapred.TextInputFormat".to_string()),
        output_format: Some(
            "org.apache.hadoop.hive.ql.io.HiveIgnoreKeyTextOutputFormat".to_string(),
        ),
        compressed: false,
        num_buckets: -1,
        serde_lib: Some("org.apache.hadoop.hive.serde2.lazy.LazySimpleSerDe".to_string()),
    }
}

/// `default.sales`: two columns and a storage descriptor
pub fn sales_table() -> TableDescriptor {
    TableDescriptor {
        object_id: SALES_ID,
        database: "default".to_string(),
        name: "sales".to_string(),
        owner: Some("etl".to_string()),
        table_type: TableType::ManagedTable,
        temporary: false,
        parameters: BTreeMap::from([("transient_lastDdlTime".to_string(), "1760875200".to_string())]),
        columns: vec![field("id", "bigint"), field("amount", "decimal(10,2)")],
        partition_keys: vec![],
        storage: Some(storage("hdfs://warehouse/default.db/sales")),
        view_original_text: None,
        create_time: None,
    }
}

/// `default.events`: one column, two partition keys
pub fn partitioned_table() -> TableDescriptor {
    TableDescriptor {
        object_id: EVENTS_ID,
        database: "default".to_string(),
        name: "events".to_string(),
        owner: Some("etl".to_string()),
        table_type: TableType::ExternalTable,
        temporary: false,
        parameters: BTreeMap::new(),
        columns: vec![field("payload", "string")],
        partition_keys: vec![field("dt", "string"), field("region", "string")],
        storage: Some(storage("hdfs://warehouse/default.db/events")),
        view_original_text: None,
        create_time: None,
    }
}

/// `default.clicks`: an external table over a mixed-case location
pub fn external_table() -> TableDescriptor {
    TableDescriptor {
        object_id: CLICKS_ID,
        database: "default".to_string(),
        name: "clicks".to_string(),
        owner: Some("etl".to_string()),
        table_type: TableType::ExternalTable,
        temporary: false,
        parameters: BTreeMap::from([("EXTERNAL".to_string(), "TRUE".to_string())]),
        columns: vec![field("url", "string"), field("ts", "timestamp")],
        partition_keys: vec![],
        storage: Some(storage("hdfs://warehouse/external/Clicks")),
        view_original_text: None,
        create_time: None,
    }
}

/// `default.sales_summary`: a view with one column and no storage
pub fn sales_view() -> TableDescriptor {
    TableDescriptor {
        object_id: SUMMARY_ID,
        database: "default".to_string(),
        name: "sales_summary".to_string(),
        owner: Some("analyst".to_string()),
        table_type: TableType::VirtualView,
        temporary: false,
        parameters: BTreeMap::new(),
        columns: vec![field("total", "decimal(20,2)")],
        partition_keys: vec![],
        storage: None,
        view_original_text: Some("SELECT sum(amount) AS total FROM sales".to_string()),
        create_time: None,
    }
}

/// Same table under a new name, keeping its identity
pub fn renamed(table: &TableDescriptor, database: &str, name: &str) -> TableDescriptor {
    TableDescriptor {
        database: database.to_string(),
        name: name.to_string(),
        ..table.clone()
    }
}

/// Same table under a new name and a new source identity
pub fn renamed_with_new_identity(
    table: &TableDescriptor,
    database: &str,
    name: &str,
) -> TableDescriptor {
    TableDescriptor {
        object_id: Uuid::new_v5(&table.object_id, name.as_bytes()),
        ..renamed(table, database, name)
    }
}

pub fn graph_builder() -> DescriptorGraphBuilder {
    DescriptorGraphBuilder::new("primary", Arc::new(DottedNaming))
}

pub fn query_context(text: &str) -> QueryContext {
    QueryContext {
        query_id: "hive_20261019120000_0001".to_string(),
        query_text: text.to_string(),
        user: None,
        start_time: DateTime::from_timestamp(1_760_875_200, 0).unwrap(),
        end_time: None,
        host_name: Some("hiveserver2-0".to_string()),
    }
}

/// Owns one set of collaborators for a cascade test
pub struct Harness {
    pub graphs: DescriptorGraphBuilder,
    pub catalog: TableCatalog,
    pub naming: Arc<dyn NamingPolicy>,
    pub known: KnownObjectCache,
    pub audit: DdlAuditBuilder,
    pub lineage: ProcessLineageBuilder,
    pub skip_temporary_tables: bool,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_naming(Arc::new(DottedNaming))
    }

    pub fn with_naming(naming: Arc<dyn NamingPolicy>) -> Self {
        Self {
            graphs: graph_builder(),
            catalog: TableCatalog::new(),
            naming,
            known: KnownObjectCache::new(),
            audit: DdlAuditBuilder::new(true),
            lineage: ProcessLineageBuilder::new("primary"),
            skip_temporary_tables: true,
        }
    }

    pub fn context(&mut self) -> CascadeContext<'_> {
        CascadeContext {
            graphs: &self.graphs,
            catalog: &self.catalog,
            naming: self.naming.as_ref(),
            known: &mut self.known,
            audit: &self.audit,
            lineage: &self.lineage,
            default_user: DEFAULT_USER,
            skip_temporary_tables: self.skip_temporary_tables,
        }
    }
}
