//! In-app notifications.

use std::sync::Arc;

use serde_json::json;

use super::ServiceResult;
use crate::domain::ports::{ApiGateway, dispatch, request_as};
use crate::domain::records::{Notification, UnreadCount};
use crate::domain::{ApiRequest, Page};

/// Notification service.
#[derive(Clone)]
pub struct NotificationService {
    gateway: Arc<dyn ApiGateway>,
}

impl NotificationService {
    /// Create the service.
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self { gateway }
    }

    /// One page of notifications, newest first.
    ///
    /// # Errors
    ///
    /// Fails on any gateway or decode failure.
    pub async fn list(&self, page: u32) -> ServiceResult<Page<Notification>> {
        Ok(request_as(
            self.gateway.as_ref(),
            ApiRequest::get("notifications").with_payload(json!({ "page": page })),
        )
        .await?)
    }

    /// Mark one notification read.
    ///
    /// # Errors
    ///
    /// Fails on any gateway failure.
    pub async fn mark_read(&self, notification_id: &str) -> ServiceResult<()> {
        dispatch(
            self.gateway.as_ref(),
            ApiRequest::patch(format!("notifications/{notification_id}/read")),
        )
        .await?;
        Ok(())
    }

    /// Mark every notification read.
    ///
    /// # Errors
    ///
    /// Fails on any gateway failure.
    pub async fn mark_all_read(&self) -> ServiceResult<()> {
        dispatch(self.gateway.as_ref(), ApiRequest::patch("notifications/read-all")).await?;
        Ok(())
    }

    /// Badge count of unread notifications.
    ///
    /// # Errors
    ///
    /// Fails on any gateway or decode failure.
    pub async fn unread_count(&self) -> ServiceResult<u64> {
        let count: UnreadCount =
            request_as(self.gateway.as_ref(), ApiRequest::get("notifications/unread-count"))
                .await?;
        Ok(count.count)
    }
}
