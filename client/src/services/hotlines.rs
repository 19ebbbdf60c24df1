//! Emergency hotlines.

use std::sync::Arc;

use super::ServiceResult;
use crate::domain::ports::{ApiGateway, request_listing};
use crate::domain::records::Hotline;
use crate::domain::ApiRequest;

/// Hotline service.
#[derive(Clone)]
pub struct HotlineService {
    gateway: Arc<dyn ApiGateway>,
}

impl HotlineService {
    /// Create the service.
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Every published hotline.
    ///
    /// # Errors
    ///
    /// Fails on any gateway or decode failure.
    pub async fn list(&self) -> ServiceResult<Vec<Hotline>> {
        Ok(request_listing(self.gateway.as_ref(), ApiRequest::get("hotlines")).await?)
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for hotline calls.

    use serde_json::json;

    use super::*;
    use crate::domain::ports::MockApiGateway;

    #[tokio::test]
    async fn list_decodes_hotlines() {
        let mut gateway = MockApiGateway::new();
        gateway.expect_send().returning(|_| {
            Ok(json!([
                { "_id": "h1", "name": "BFP", "number": "160", "category": "fire" },
                { "_id": "h2", "name": "PNP", "number": "117" }
            ]))
        });
        let service = HotlineService::new(Arc::new(gateway));

        let hotlines = service.list().await.expect("hotlines load");
        assert_eq!(hotlines.len(), 2);
        assert!(hotlines[1].category.is_none());
    }
}
