//! Create-time lineage
//!
//! An external table created by a query reads data it does not own. Its create
//! notification records the storage location as a path entity, a process
//! linking that path (input) to the table (output), and one execution of the
//! process.

use crate::collaborators::LineageBuilder;
use crate::graph::{attrs, types, ObjectGraph, ObjectRef, Relation, SchemaObject};
use crate::source::{QueryContext, TableType};
use tracing::debug;

const CREATE_OPERATION: &str = "CREATETABLE";

#[derive(Debug, Clone)]
pub struct ProcessLineageBuilder {
    cluster: String,
}

impl ProcessLineageBuilder {
    pub fn new(cluster: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
        }
    }

    /// `<location>@cluster`; paths keep their case
    pub fn path_qualified_name(&self, location: &str) -> String {
        format!("{}@{}", location, self.cluster)
    }

    pub fn process_qualified_name(table_qualified_name: &str) -> String {
        format!("{}_process", table_qualified_name)
    }

    fn path_entity(&self, location: &str) -> SchemaObject {
        let mut path = SchemaObject::new(types::PATH);
        path.set_attribute(attrs::QUALIFIED_NAME, self.path_qualified_name(location));
        path.set_attribute(attrs::NAME, location);
        path.set_attribute("path", location);
        path.set_attribute("clusterName", self.cluster.as_str());
        path
    }
}

fn is_external(table: &SchemaObject) -> bool {
    table.text("tableType") == Some(TableType::ExternalTable.as_str())
}

fn location(graph: &ObjectGraph) -> Option<&str> {
    let sd = graph
        .root
        .relationship(attrs::SD)?
        .refs()
        .first()
        .and_then(|r| graph.resolve(r))?;
    sd.text("location").filter(|l| !l.trim().is_empty())
}

fn query_attributes(entity: &mut SchemaObject, query: &QueryContext) {
    let start = query.start_time.timestamp_millis();
    let end = query.end_time.map_or(start, |t| t.timestamp_millis());

    entity.set_attribute("queryText", query.query_text.trim());
    entity.set_attribute("queryId", query.query_id.as_str());
    entity.set_attribute("startTime", start);
    entity.set_attribute("endTime", end);
    if let Some(user) = &query.user {
        entity.set_attribute("userName", user.as_str());
    }
}

impl LineageBuilder for ProcessLineageBuilder {
    fn build_create_lineage(&self, table: &ObjectGraph, query: &QueryContext) -> Vec<SchemaObject> {
        if !is_external(&table.root) {
            return Vec::new();
        }
        let Some(table_qn) = table.qualified_name() else {
            return Vec::new();
        };
        let Some(location) = location(table) else {
            debug!("External table {} has no storage location, no lineage", table_qn);
            return Vec::new();
        };

        let path = self.path_entity(location);
        let process_qn = Self::process_qualified_name(table_qn);

        let mut process = SchemaObject::new(types::PROCESS);
        process.set_attribute(attrs::QUALIFIED_NAME, process_qn.as_str());
        process.set_attribute(attrs::NAME, process_qn.as_str());
        process.set_attribute("operationType", CREATE_OPERATION);
        process.set_attribute("clusterName", self.cluster.as_str());
        query_attributes(&mut process, query);
        process.set_relationship(attrs::INPUTS, Relation::Many(vec![path.to_ref()]));
        process.set_relationship(attrs::OUTPUTS, Relation::Many(vec![table.root.to_ref()]));

        let execution_qn = format!("{}:{}", process_qn, query.start_time.timestamp_millis());
        let process_ref = ObjectRef::new(types::PROCESS, process_qn.as_str());

        let mut execution = SchemaObject::new(types::PROCESS_EXECUTION);
        execution.set_attribute(attrs::QUALIFIED_NAME, execution_qn.as_str());
        execution.set_attribute(attrs::NAME, execution_qn.as_str());
        query_attributes(&mut execution, query);
        if let Some(host) = &query.host_name {
            execution.set_attribute("hostName", host.as_str());
        }
        execution.set_attribute(attrs::PROCESS, process_ref.clone());
        execution.set_relationship(attrs::PROCESS, Relation::One(process_ref));

        debug!("Recorded lineage {} -> {}", location, table_qn);
        vec![path, process, execution]
    }
}
