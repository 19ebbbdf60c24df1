//! Asset inventory search and borrowing.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;

use super::ServiceResult;
use crate::domain::forms::BorrowRequestForm;
use crate::domain::forms::eligibility::today;
use crate::domain::ports::{ApiGateway, request_as, request_listing};
use crate::domain::records::{Asset, Borrowing};
use crate::domain::{ApiRequest, Page};

/// Asset service.
#[derive(Clone)]
pub struct AssetService {
    gateway: Arc<dyn ApiGateway>,
    clock: Arc<dyn Clock>,
}

impl AssetService {
    /// Create the service.
    pub fn new(gateway: Arc<dyn ApiGateway>, clock: Arc<dyn Clock>) -> Self {
        Self { gateway, clock }
    }

    /// Borrowable assets whose name matches `query`. A blank query lists
    /// everything.
    ///
    /// # Errors
    ///
    /// Fails on any gateway or decode failure.
    pub async fn search(&self, query: &str) -> ServiceResult<Vec<Asset>> {
        let trimmed = query.trim();
        let payload = if trimmed.is_empty() {
            json!({})
        } else {
            json!({ "search": trimmed })
        };
        Ok(request_listing(
            self.gateway.as_ref(),
            ApiRequest::get("assets").with_payload(payload),
        )
        .await?)
    }

    /// Validate and submit a borrow request.
    ///
    /// # Errors
    ///
    /// Fails on invalid input or any gateway failure.
    pub async fn borrow(&self, form: &BorrowRequestForm) -> ServiceResult<Borrowing> {
        let payload = form.validate(today(self.clock.as_ref()))?;
        Ok(request_as(
            self.gateway.as_ref(),
            ApiRequest::post("borrowings").with_json(&payload)?,
        )
        .await?)
    }

    /// One page of the signed-in resident's borrowings.
    ///
    /// # Errors
    ///
    /// Fails on any gateway or decode failure.
    pub async fn my_borrowings(&self, page: u32) -> ServiceResult<Page<Borrowing>> {
        Ok(request_as(
            self.gateway.as_ref(),
            ApiRequest::get("borrowings/mine").with_payload(json!({ "page": page })),
        )
        .await?)
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for asset calls.

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::forms::AssetChoice;
    use crate::domain::ports::MockApiGateway;
    use crate::services::test_support::fixture_clock;

    #[tokio::test]
    async fn blank_search_sends_no_filter() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .withf(|request| request.payload() == Some(&json!({})))
            .returning(|_| Ok(json!({ "data": [{ "_id": "a1", "name": "Tent", "availableQuantity": 2 }] })));
        let service = AssetService::new(Arc::new(gateway), fixture_clock());

        let assets = service.search("   ").await.expect("assets load");
        assert_eq!(assets[0].available_quantity, 2);
    }

    #[tokio::test]
    async fn search_trims_query() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .withf(|request| request.payload() == Some(&json!({ "search": "chair" })))
            .returning(|_| Ok(json!([])));
        let service = AssetService::new(Arc::new(gateway), fixture_clock());

        assert!(service.search(" chair ").await.expect("search").is_empty());
    }

    #[tokio::test]
    async fn borrow_posts_validated_dates() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .withf(|request| {
                request.path() == "borrowings"
                    && request.payload()
                        == Some(&json!({
                            "assetId": "a1",
                            "quantity": 2,
                            "borrowDate": "2026-10-20",
                            "returnDate": "2026-10-21",
                            "purpose": "Fiesta"
                        }))
            })
            .times(1)
            .returning(|_| Ok(json!({ "_id": "b1", "assetName": "Tent", "quantity": 2 })));
        let service = AssetService::new(Arc::new(gateway), fixture_clock());

        let form = BorrowRequestForm {
            asset: Some(AssetChoice {
                id: "a1".to_owned(),
                available: 2,
            }),
            quantity: 2,
            borrow_date: NaiveDate::from_ymd_opt(2026, 10, 20),
            return_date: NaiveDate::from_ymd_opt(2026, 10, 21),
            purpose: " Fiesta ".to_owned(),
        };
        let borrowing = service.borrow(&form).await.expect("borrowed");
        assert_eq!(borrowing.quantity, 2);
    }
}
