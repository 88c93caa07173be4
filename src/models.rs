//! Data models and DTOs (Data Transfer Objects)
//!
//! Contains all request/response structures used by the API.

use crate::notification::{Notification, NotificationBatch};
use crate::source::TableDescriptor;
use serde::Serialize;

/// Generic success response
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Message-only response (no data)
#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Notifications produced for one event
#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub count: usize,
    pub checksum: String,
    pub notifications: Vec<Notification>,
}

impl From<NotificationBatch> for NotificationsResponse {
    fn from(batch: NotificationBatch) -> Self {
        let checksum = batch.checksum().to_string();
        let notifications = batch.into_notifications();
        Self {
            count: notifications.len(),
            checksum,
            notifications,
        }
    }
}

/// A single live catalog entry
#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub table: TableDescriptor,
}

/// Contents of the known-object cache
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownObjectsResponse {
    pub count: usize,
    pub qualified_names: Vec<String>,
}
