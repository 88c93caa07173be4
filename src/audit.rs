//! DDL audit records
//!
//! Query-mode notifications carry a `hive_table_ddl` record holding the query
//! text that produced the change.

use crate::collaborators::AuditBuilder;
use crate::graph::{attrs, types, Relation, SchemaObject};
use crate::source::QueryContext;

#[derive(Debug, Clone)]
pub struct DdlAuditBuilder {
    enabled: bool,
}

impl DdlAuditBuilder {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl AuditBuilder for DdlAuditBuilder {
    fn build_audit_record(
        &self,
        root: &SchemaObject,
        is_update: bool,
        query: &QueryContext,
    ) -> Option<SchemaObject> {
        if !self.enabled || query.query_text.trim().is_empty() {
            return None;
        }
        let root_qn = root.qualified_name()?;
        let start_millis = query.start_time.timestamp_millis();

        let mut record = SchemaObject::new(types::TABLE_DDL);
        record.set_attribute(
            attrs::QUALIFIED_NAME,
            format!("{}.{}", root_qn, start_millis),
        );
        record.set_attribute(attrs::NAME, query.query_text.trim());
        record.set_attribute("queryText", query.query_text.trim());
        record.set_attribute("execTime", start_millis);
        record.set_attribute("serviceType", "hive");
        if let Some(user) = &query.user {
            record.set_attribute("userName", user.as_str());
        }

        // Updated tables are matched downstream by qualified name only
        let mut table_ref = root.to_ref();
        if is_update {
            table_ref.guid = None;
        }
        record.set_relationship(attrs::TABLE, Relation::One(table_ref));

        Some(record)
    }
}
