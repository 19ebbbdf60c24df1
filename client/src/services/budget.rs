//! Barangay budget transparency.

use std::sync::Arc;

use serde_json::json;

use super::ServiceResult;
use crate::domain::ports::{ApiGateway, request_listing};
use crate::domain::records::BudgetAllocation;
use crate::domain::ApiRequest;

/// Budget service.
#[derive(Clone)]
pub struct BudgetService {
    gateway: Arc<dyn ApiGateway>,
}

impl BudgetService {
    /// Create the service.
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Allocations for `fiscal_year`.
    ///
    /// # Errors
    ///
    /// Fails on any gateway or decode failure.
    pub async fn allocations(&self, fiscal_year: i32) -> ServiceResult<Vec<BudgetAllocation>> {
        Ok(request_listing(
            self.gateway.as_ref(),
            ApiRequest::get("budget").with_payload(json!({ "fiscalYear": fiscal_year })),
        )
        .await?)
    }
}
