//! Resident profile reads and updates.

use std::sync::Arc;

use mockable::Clock;

use super::ServiceResult;
use crate::domain::ApiRequest;
use crate::domain::forms::ProfileForm;
use crate::domain::forms::eligibility::today;
use crate::domain::ports::{ApiGateway, request_as};
use crate::domain::records::Resident;

const PROFILE_PATH: &str = "residents/me";

/// Profile service.
#[derive(Clone)]
pub struct ProfileService {
    gateway: Arc<dyn ApiGateway>,
    clock: Arc<dyn Clock>,
}

impl ProfileService {
    /// Create the service.
    pub fn new(gateway: Arc<dyn ApiGateway>, clock: Arc<dyn Clock>) -> Self {
        Self { gateway, clock }
    }

    /// Fetch the signed-in resident.
    ///
    /// # Errors
    ///
    /// Fails on any gateway or decode failure.
    pub async fn current(&self) -> ServiceResult<Resident> {
        Ok(request_as(self.gateway.as_ref(), ApiRequest::get(PROFILE_PATH)).await?)
    }

    /// Validate and save profile changes, returning the updated record.
    ///
    /// # Errors
    ///
    /// Fails on invalid input or any gateway failure.
    pub async fn update(&self, form: &ProfileForm) -> ServiceResult<Resident> {
        let payload = form.validate(today(self.clock.as_ref()))?;
        Ok(request_as(
            self.gateway.as_ref(),
            ApiRequest::put(PROFILE_PATH).with_json(&payload)?,
        )
        .await?)
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for profile calls.

    use serde_json::json;

    use super::*;
    use crate::domain::Method;
    use crate::domain::ports::MockApiGateway;
    use crate::services::ServiceError;
    use crate::services::test_support::fixture_clock;

    #[tokio::test]
    async fn current_decodes_resident() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .withf(|request| request.method() == Method::Get && request.path() == PROFILE_PATH)
            .returning(|_| Ok(json!({ "_id": "u1", "firstName": "Rosa", "lastName": "Santos" })));
        let service = ProfileService::new(Arc::new(gateway), fixture_clock());

        let resident = service.current().await.expect("profile loads");
        assert_eq!(resident.display_name(), "Rosa Santos");
    }

    #[tokio::test]
    async fn unexpected_shape_is_decode_error() {
        let mut gateway = MockApiGateway::new();
        gateway.expect_send().returning(|_| Ok(json!(["not", "a", "resident"])));
        let service = ProfileService::new(Arc::new(gateway), fixture_clock());

        let error = service.current().await.expect_err("wrong shape");
        assert!(matches!(
            error,
            ServiceError::Gateway(crate::domain::GatewayError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_update_is_not_sent() {
        let mut gateway = MockApiGateway::new();
        gateway.expect_send().never();
        let service = ProfileService::new(Arc::new(gateway), fixture_clock());

        let error = service
            .update(&ProfileForm::default())
            .await
            .expect_err("blank profile");
        assert!(matches!(error, ServiceError::Invalid(_)));
    }
}
