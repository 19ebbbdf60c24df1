//! Household and member management.

use std::sync::Arc;

use mockable::Clock;

use super::ServiceResult;
use crate::domain::ApiRequest;
use crate::domain::forms::HouseholdMemberForm;
use crate::domain::forms::eligibility::today;
use crate::domain::ports::{ApiGateway, dispatch, request_as};
use crate::domain::records::Household;

const HOUSEHOLD_PATH: &str = "households/me";

fn member_path(member_id: &str) -> String {
    format!("{HOUSEHOLD_PATH}/members/{member_id}")
}

/// Household service.
#[derive(Clone)]
pub struct HouseholdService {
    gateway: Arc<dyn ApiGateway>,
    clock: Arc<dyn Clock>,
}

impl HouseholdService {
    /// Create the service.
    pub fn new(gateway: Arc<dyn ApiGateway>, clock: Arc<dyn Clock>) -> Self {
        Self { gateway, clock }
    }

    /// Fetch the household headed by the signed-in resident.
    ///
    /// # Errors
    ///
    /// Fails on any gateway or decode failure.
    pub async fn current(&self) -> ServiceResult<Household> {
        Ok(request_as(self.gateway.as_ref(), ApiRequest::get(HOUSEHOLD_PATH)).await?)
    }

    /// Add a member, returning the updated household.
    ///
    /// # Errors
    ///
    /// Fails on invalid input or any gateway failure.
    pub async fn add_member(&self, form: &HouseholdMemberForm) -> ServiceResult<Household> {
        let payload = form.validate(today(self.clock.as_ref()))?;
        Ok(request_as(
            self.gateway.as_ref(),
            ApiRequest::post(format!("{HOUSEHOLD_PATH}/members")).with_json(&payload)?,
        )
        .await?)
    }

    /// Replace a member's details, returning the updated household.
    ///
    /// # Errors
    ///
    /// Fails on invalid input or any gateway failure.
    pub async fn update_member(
        &self,
        member_id: &str,
        form: &HouseholdMemberForm,
    ) -> ServiceResult<Household> {
        let payload = form.validate(today(self.clock.as_ref()))?;
        Ok(request_as(
            self.gateway.as_ref(),
            ApiRequest::put(member_path(member_id)).with_json(&payload)?,
        )
        .await?)
    }

    /// Remove a member.
    ///
    /// # Errors
    ///
    /// Fails on any gateway failure.
    pub async fn remove_member(&self, member_id: &str) -> ServiceResult<()> {
        dispatch(self.gateway.as_ref(), ApiRequest::delete(member_path(member_id))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for household calls.

    use chrono::NaiveDate;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::Method;
    use crate::domain::forms::{Relationship, Sex};
    use crate::domain::ports::MockApiGateway;
    use crate::services::test_support::fixture_clock;

    fn member() -> HouseholdMemberForm {
        let mut form = HouseholdMemberForm {
            first_name: "Ana".to_owned(),
            last_name: "Dela Cruz".to_owned(),
            sex: Some(Sex::Female),
            relationship: Some(Relationship::Child),
            ..HouseholdMemberForm::default()
        };
        form.status.set_date_of_birth(
            NaiveDate::from_ymd_opt(2015, 3, 9),
            NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date"),
        );
        form
    }

    #[tokio::test]
    async fn add_member_posts_payload() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .withf(|request| {
                request.method() == Method::Post
                    && request.path() == "households/me/members"
                    && request
                        .payload()
                        .and_then(|payload| payload.get("dateOfBirth"))
                        == Some(&json!("2015-03-09"))
            })
            .times(1)
            .returning(|_| Ok(json!({ "_id": "h1", "members": [{ "_id": "m1", "firstName": "Ana" }] })));
        let service = HouseholdService::new(Arc::new(gateway), fixture_clock());

        let household = service.add_member(&member()).await.expect("member added");
        assert_eq!(household.members.len(), 1);
    }

    #[tokio::test]
    async fn remove_member_targets_member_path() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .withf(|request| {
                request.method() == Method::Delete && request.path() == "households/me/members/m1"
            })
            .times(1)
            .returning(|_| Ok(Value::Null));
        let service = HouseholdService::new(Arc::new(gateway), fixture_clock());

        service.remove_member("m1").await.expect("member removed");
    }
}
