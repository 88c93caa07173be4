//! Live catalog route handlers
//!
//! Query-mode events re-fetch renamed tables from the live catalog, so it must
//! be kept current through these routes or the startup seed.

use crate::error::{not_found_error, validation_error, ApiResult};
use crate::models::{KnownObjectsResponse, MessageResponse, SuccessResponse, TableResponse};
use crate::source::TableDescriptor;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{debug, info};
use validator::Validate;

/// Register or replace a live table descriptor
pub async fn upsert_table(
    State(state): State<SharedState>,
    Json(payload): Json<TableDescriptor>,
) -> ApiResult<Json<MessageResponse>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let label = format!("{}.{}", payload.database, payload.name);
    let previous = state.catalog.write().await.upsert(payload);

    let verb = if previous.is_some() { "replaced" } else { "registered" };
    info!("Table '{}' {} in live catalog", label, verb);

    Ok(Json(MessageResponse::new(format!("Table '{}' {}.", label, verb))))
}

/// Fetch a live table descriptor
pub async fn get_table(
    State(state): State<SharedState>,
    Path((database, table)): Path<(String, String)>,
) -> ApiResult<Json<SuccessResponse<TableResponse>>> {
    debug!("Looking up table {}.{}", database, table);

    let found = state
        .catalog
        .read()
        .await
        .get(&database, &table)
        .cloned()
        .ok_or_else(|| not_found_error(format!("Table '{}.{}' not found", database, table)))?;

    Ok(Json(SuccessResponse::with_data(
        "Table retrieved.",
        TableResponse { table: found },
    )))
}

/// Remove a table from the live catalog
pub async fn delete_table(
    State(state): State<SharedState>,
    Path((database, table)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .catalog
        .write()
        .await
        .remove(&database, &table)
        .ok_or_else(|| not_found_error(format!("Table '{}.{}' not found", database, table)))?;

    info!("Table '{}.{}' removed from live catalog", database, table);
    Ok(Json(MessageResponse::new(format!(
        "Table '{}.{}' removed.",
        database, table
    ))))
}

/// List qualified names known to exist downstream
pub async fn list_known_objects(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<KnownObjectsResponse>>> {
    let names = state.known.read().await.names();

    Ok(Json(SuccessResponse::with_data(
        format!("{} known objects.", names.len()),
        KnownObjectsResponse {
            count: names.len(),
            qualified_names: names,
        },
    )))
}
