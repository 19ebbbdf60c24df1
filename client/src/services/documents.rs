//! Document catalogue and document requests.

use std::sync::Arc;

use serde_json::json;

use super::ServiceResult;
use crate::domain::forms::DocumentRequestForm;
use crate::domain::ports::{ApiGateway, dispatch, request_as, request_listing};
use crate::domain::records::{DocumentRequest, DocumentType};
use crate::domain::{ApiRequest, Page};

/// Document service.
#[derive(Clone)]
pub struct DocumentService {
    gateway: Arc<dyn ApiGateway>,
}

impl DocumentService {
    /// Create the service.
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Documents the barangay issues.
    ///
    /// # Errors
    ///
    /// Fails on any gateway or decode failure.
    pub async fn types(&self) -> ServiceResult<Vec<DocumentType>> {
        Ok(request_listing(self.gateway.as_ref(), ApiRequest::get("document-types")).await?)
    }

    /// One page of the signed-in resident's requests, newest first.
    ///
    /// # Errors
    ///
    /// Fails on any gateway or decode failure.
    pub async fn my_requests(&self, page: u32) -> ServiceResult<Page<DocumentRequest>> {
        Ok(request_as(
            self.gateway.as_ref(),
            ApiRequest::get("document-requests/mine").with_payload(json!({ "page": page })),
        )
        .await?)
    }

    /// Validate and submit a request.
    ///
    /// # Errors
    ///
    /// Fails on invalid input or any gateway failure.
    pub async fn submit(&self, form: &DocumentRequestForm) -> ServiceResult<DocumentRequest> {
        let payload = form.validate()?;
        Ok(request_as(
            self.gateway.as_ref(),
            ApiRequest::post("document-requests").with_json(&payload)?,
        )
        .await?)
    }

    /// Withdraw a pending request.
    ///
    /// # Errors
    ///
    /// Fails on any gateway failure, including the backend refusing to
    /// cancel a request already acted on.
    pub async fn cancel(&self, request_id: &str) -> ServiceResult<()> {
        dispatch(
            self.gateway.as_ref(),
            ApiRequest::patch(format!("document-requests/{request_id}/cancel")),
        )
        .await?;
        Ok(())
    }
}
