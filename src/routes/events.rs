//! Schema event route handlers

use crate::error::ApiResult;
use crate::models::{NotificationsResponse, SuccessResponse};
use crate::resolver::SchemaEvent;
use crate::state::SharedState;
use axum::{extract::State, Json};
use tracing::{debug, info};

/// Resolve an event and return its notifications in dispatch order
pub async fn process_event(
    State(state): State<SharedState>,
    Json(event): Json<SchemaEvent>,
) -> ApiResult<Json<SuccessResponse<NotificationsResponse>>> {
    debug!(
        "Processing {:?} event ({} mode)",
        event.operation,
        event.source.mode()
    );

    let batch = state.process_event(&event).await?;

    info!(
        "{:?} event produced {} notifications (checksum {})",
        event.operation,
        batch.len(),
        batch.checksum()
    );

    Ok(Json(SuccessResponse::with_data(
        format!("{} notifications produced.", batch.len()),
        NotificationsResponse::from(batch),
    )))
}
