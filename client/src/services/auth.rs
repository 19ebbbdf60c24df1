//! Account flows: login, signup, activation and password management.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::info;

use super::ServiceResult;
use crate::domain::forms::eligibility::today;
use crate::domain::forms::{
    ActivationForm, ChangePasswordForm, ForgotPasswordForm, LoginForm, NewPasswordForm, OtpForm,
    SignupForm,
};
use crate::domain::ports::{ApiGateway, dispatch, request_as};
use crate::domain::{ApiRequest, Session, SessionContext};

/// Account service; owns writes to the session context.
#[derive(Clone)]
pub struct AuthService {
    gateway: Arc<dyn ApiGateway>,
    session: SessionContext,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    /// Create the service.
    pub fn new(
        gateway: Arc<dyn ApiGateway>,
        session: SessionContext,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            session,
            clock,
        }
    }

    async fn open_session(&self, request: ApiRequest) -> ServiceResult<Session> {
        let session: Session = request_as(self.gateway.as_ref(), request).await?;
        self.session.sign_in(&session)?;
        info!(resident = session.id(), "session started");
        Ok(session)
    }

    /// Sign in and persist the issued session.
    ///
    /// # Errors
    ///
    /// Fails on invalid input, any gateway failure, or when the session
    /// cannot be stored.
    pub async fn login(&self, form: &LoginForm) -> ServiceResult<Session> {
        let payload = form.validate()?;
        self.open_session(ApiRequest::post("auth/login").with_json(&payload)?)
            .await
    }

    /// Register a household head with members and persist the session.
    ///
    /// # Errors
    ///
    /// Fails on invalid input (including repeated member emails), any
    /// gateway failure, or when the session cannot be stored.
    pub async fn signup(&self, form: &SignupForm) -> ServiceResult<Session> {
        let payload = form.validate(today(self.clock.as_ref()))?;
        self.open_session(ApiRequest::post("auth/signup").with_json(&payload)?)
            .await
    }

    /// Ask the backend to send an activation code for a pre-registered
    /// account.
    ///
    /// # Errors
    ///
    /// Fails on invalid input or any gateway failure.
    pub async fn activate(&self, form: &ActivationForm) -> ServiceResult<()> {
        let payload = form.validate()?;
        dispatch(
            self.gateway.as_ref(),
            ApiRequest::post("auth/activate").with_json(&payload)?,
        )
        .await?;
        Ok(())
    }

    /// Confirm the activation code for `account_id`.
    ///
    /// # Errors
    ///
    /// Fails on invalid input or any gateway failure.
    pub async fn verify_otp(&self, account_id: &str, form: &OtpForm) -> ServiceResult<()> {
        let otp = form.validate()?;
        dispatch(
            self.gateway.as_ref(),
            ApiRequest::post("auth/verify-otp")
                .with_payload(json!({ "accountId": account_id, "otp": otp })),
        )
        .await?;
        Ok(())
    }

    /// Set the first password of an activated account.
    ///
    /// # Errors
    ///
    /// Fails on invalid input or any gateway failure.
    pub async fn set_password(&self, account_id: &str, form: &NewPasswordForm) -> ServiceResult<()> {
        let password = form.validate()?;
        dispatch(
            self.gateway.as_ref(),
            ApiRequest::post("auth/set-password")
                .with_payload(json!({ "accountId": account_id, "password": password.as_str() })),
        )
        .await?;
        Ok(())
    }

    /// Request a password reset code by email.
    ///
    /// # Errors
    ///
    /// Fails on invalid input or any gateway failure.
    pub async fn forgot_password(&self, form: &ForgotPasswordForm) -> ServiceResult<()> {
        let email = form.validate()?;
        dispatch(
            self.gateway.as_ref(),
            ApiRequest::post("auth/forgot-password").with_payload(json!({ "email": email })),
        )
        .await?;
        Ok(())
    }

    /// Reset the password with the emailed code.
    ///
    /// # Errors
    ///
    /// Fails when the code or password is invalid, or on any gateway
    /// failure.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &OtpForm,
        form: &NewPasswordForm,
    ) -> ServiceResult<()> {
        let otp = code.validate()?;
        let password = form.validate()?;
        dispatch(
            self.gateway.as_ref(),
            ApiRequest::post("auth/reset-password").with_payload(json!({
                "email": email.trim(),
                "otp": otp,
                "password": password.as_str(),
            })),
        )
        .await?;
        Ok(())
    }

    /// Change the password of the signed-in resident.
    ///
    /// # Errors
    ///
    /// Fails on invalid input or any gateway failure.
    pub async fn change_password(&self, form: &ChangePasswordForm) -> ServiceResult<()> {
        let payload = form.validate()?;
        dispatch(
            self.gateway.as_ref(),
            ApiRequest::put("auth/change-password").with_json(&payload)?,
        )
        .await?;
        Ok(())
    }

    /// Forget the session on this device. No request is sent.
    ///
    /// # Errors
    ///
    /// Fails when the stored session cannot be removed.
    pub fn logout(&self) -> ServiceResult<()> {
        self.session.sign_out()?;
        info!("session ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for account flows against a mocked gateway.

    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{InMemorySessionStore, MockApiGateway};
    use crate::domain::{GatewayError, Method};
    use crate::services::ServiceError;
    use crate::services::test_support::fixture_clock;

    fn service(gateway: MockApiGateway) -> (AuthService, SessionContext) {
        let session = SessionContext::new(Arc::new(InMemorySessionStore::default()));
        let service = AuthService::new(Arc::new(gateway), session.clone(), fixture_clock());
        (service, session)
    }

    fn login_form() -> LoginForm {
        LoginForm {
            email: "juan@example.ph".to_owned(),
            password: "secret1".to_owned(),
        }
    }

    #[tokio::test]
    async fn login_persists_issued_session() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .withf(|request| {
                request.method() == Method::Post
                    && request.path() == "auth/login"
                    && request
                        .payload()
                        .and_then(|payload| payload.get("email"))
                        .and_then(Value::as_str)
                        == Some("juan@example.ph")
            })
            .times(1)
            .returning(|_| {
                Ok(json!({
                    "_id": "64f0",
                    "email": "juan@example.ph",
                    "token": "abc.def",
                    "firstName": "Juan"
                }))
            });
        let (service, session) = service(gateway);

        let issued = service.login(&login_form()).await.expect("login succeeds");
        assert_eq!(issued.token(), Some("abc.def"));
        assert_eq!(session.token().as_deref(), Some("abc.def"));
    }

    #[tokio::test]
    async fn invalid_login_never_reaches_gateway() {
        let mut gateway = MockApiGateway::new();
        gateway.expect_send().never();
        let (service, session) = service(gateway);

        let error = service
            .login(&LoginForm::default())
            .await
            .expect_err("blank form");
        assert!(matches!(error, ServiceError::Invalid(_)));
        assert!(!session.is_signed_in());
    }

    #[tokio::test]
    async fn rejected_login_keeps_server_message() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .returning(|_| Err(GatewayError::server(400, "Invalid email or password")));
        let (service, session) = service(gateway);

        let error = service.login(&login_form()).await.expect_err("rejected");
        assert_eq!(error.notice().message(), "Invalid email or password");
        assert!(!session.is_signed_in());
    }

    #[tokio::test]
    async fn verify_otp_sends_account_and_code() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .withf(|request| {
                request.path() == "auth/verify-otp"
                    && request.payload() == Some(&json!({ "accountId": "A1B2", "otp": "123456" }))
            })
            .times(1)
            .returning(|_| Ok(Value::Null));
        let (service, _) = service(gateway);

        let form = OtpForm {
            code: "123456".to_owned(),
        };
        service
            .verify_otp("A1B2", &form)
            .await
            .expect("code accepted");
    }

    #[tokio::test]
    async fn reset_password_validates_code_first() {
        let mut gateway = MockApiGateway::new();
        gateway.expect_send().never();
        let (service, _) = service(gateway);

        let error = service
            .reset_password(
                "juan@example.ph",
                &OtpForm {
                    code: "12ab56".to_owned(),
                },
                &NewPasswordForm {
                    password: "abcdef".to_owned(),
                    confirm_password: "abcdef".to_owned(),
                },
            )
            .await
            .expect_err("bad code");
        let ServiceError::Invalid(errors) = error else {
            panic!("expected validation failure, got {error:?}");
        };
        assert!(errors.get("otp").is_some());
    }

    #[tokio::test]
    async fn logout_clears_session_without_request() {
        let mut gateway = MockApiGateway::new();
        gateway.expect_send().never();
        let session = SessionContext::new(Arc::new(InMemorySessionStore::with_session(
            Session::new("1", "juan@example.ph").with_token("t"),
        )));
        let service = AuthService::new(Arc::new(gateway), session.clone(), fixture_clock());

        service.logout().expect("logout");
        assert!(!session.is_signed_in());
    }
}
