//! Object Graph Model
//!
//! In-memory representation of a catalog entity and everything it owns:
//! - `SchemaObject`: one entity with typed attributes and relationship references
//! - `ObjectGraph`: a root entity plus its extended info keyed by identity
//! - `EntityBatch`: the payload of full create/update notifications
//! - Type schemas checked at the graph-construction boundary

pub mod value;
pub mod object;
pub mod extinfo;
pub mod schema;

pub use value::AttrValue;
pub use object::{ObjectRef, Relation, SchemaObject};
pub use extinfo::{EntityBatch, ObjectGraph};
pub use schema::{validate_graph, validate_object, TypeSchema};

/// Catalog type names produced by the descriptor graph builder
pub mod types {
    pub const DATABASE: &str = "hive_db";
    pub const TABLE: &str = "hive_table";
    pub const COLUMN: &str = "hive_column";
    pub const STORAGE_DESC: &str = "hive_storagedesc";
    pub const TABLE_DDL: &str = "hive_table_ddl";
    pub const PATH: &str = "hdfs_path";
    pub const PROCESS: &str = "hive_process";
    pub const PROCESS_EXECUTION: &str = "hive_process_execution";
}

/// Well-known attribute and relationship names
pub mod attrs {
    pub const QUALIFIED_NAME: &str = "qualifiedName";
    pub const NAME: &str = "name";
    pub const ALIASES: &str = "aliases";
    pub const TABLE: &str = "table";
    pub const SD: &str = "sd";
    pub const DB: &str = "db";
    pub const COLUMNS: &str = "columns";
    pub const PARTITION_KEYS: &str = "partitionKeys";
    pub const INPUTS: &str = "inputs";
    pub const OUTPUTS: &str = "outputs";
    pub const PROCESS: &str = "process";
}
