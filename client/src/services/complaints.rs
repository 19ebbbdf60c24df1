//! Complaint filing and history.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;

use super::ServiceResult;
use crate::domain::forms::ComplaintForm;
use crate::domain::forms::eligibility::today;
use crate::domain::ports::{ApiGateway, request_as};
use crate::domain::records::Complaint;
use crate::domain::{ApiRequest, Page};

/// Complaint service.
#[derive(Clone)]
pub struct ComplaintService {
    gateway: Arc<dyn ApiGateway>,
    clock: Arc<dyn Clock>,
}

impl ComplaintService {
    /// Create the service.
    pub fn new(gateway: Arc<dyn ApiGateway>, clock: Arc<dyn Clock>) -> Self {
        Self { gateway, clock }
    }

    /// One page of the signed-in resident's complaints.
    ///
    /// # Errors
    ///
    /// Fails on any gateway or decode failure.
    pub async fn mine(&self, page: u32) -> ServiceResult<Page<Complaint>> {
        Ok(request_as(
            self.gateway.as_ref(),
            ApiRequest::get("complaints/mine").with_payload(json!({ "page": page })),
        )
        .await?)
    }

    /// Validate and file a complaint.
    ///
    /// # Errors
    ///
    /// Fails on invalid input or any gateway failure.
    pub async fn submit(&self, form: &ComplaintForm) -> ServiceResult<Complaint> {
        let payload = form.validate(today(self.clock.as_ref()))?;
        Ok(request_as(
            self.gateway.as_ref(),
            ApiRequest::post("complaints").with_json(&payload)?,
        )
        .await?)
    }
}
