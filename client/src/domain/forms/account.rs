//! Account forms: activation, one-time codes, passwords and login.

use serde::Serialize;
use zeroize::Zeroizing;

use crate::domain::validation::rules::{self, ACCOUNT_ID_LENGTH, PASSWORD_MIN};
use crate::domain::validation::{Field, ValidationErrors, Validator};

/// Account identifier field.
pub const ACCOUNT_ID: Field = Field::new("accountId", "Account ID");
/// One-time code field.
pub const OTP: Field = Field::new("otp", "Verification code");
/// Email field.
pub const EMAIL: Field = Field::new("email", "Email address");
/// Password field.
pub const PASSWORD: Field = Field::new("password", "Password");
/// Password confirmation field.
pub const CONFIRM_PASSWORD: Field = Field::new("confirmPassword", "Confirm password");
/// Current password field.
pub const CURRENT_PASSWORD: Field = Field::new("currentPassword", "Current password");

/// Check a new password and its confirmation.
pub(crate) fn check_new_password(validator: &mut Validator, password: &str, confirm: &str) {
    validator
        .check(
            PASSWORD,
            [rules::required(password), rules::min_length(password, PASSWORD_MIN)],
        )
        .check(
            CONFIRM_PASSWORD,
            [
                rules::required(confirm),
                rules::matches(confirm, password, PASSWORD.label()),
            ],
        );
}

/// Activation screen: the resident enters the id printed on their
/// barangay record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationForm {
    /// Four-character account id.
    pub account_id: String,
}

/// Body of an activation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationPayload {
    /// Trimmed account id.
    pub account_id: String,
}

impl ActivationForm {
    /// Validate and build the request body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when the id is blank or not exactly four
    /// characters.
    pub fn validate(&self) -> Result<ActivationPayload, ValidationErrors> {
        let mut validator = Validator::new();
        validator.check(
            ACCOUNT_ID,
            [
                rules::required(&self.account_id),
                rules::exact_length(&self.account_id, ACCOUNT_ID_LENGTH),
            ],
        );
        validator.finish()?;
        Ok(ActivationPayload {
            account_id: self.account_id.trim().to_owned(),
        })
    }
}

/// Code entry screen shared by activation and password reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpForm {
    /// Code as typed.
    pub code: String,
}

impl OtpForm {
    /// Validate and return the code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] unless the code is exactly six digits.
    pub fn validate(&self) -> Result<String, ValidationErrors> {
        let mut validator = Validator::new();
        validator.check(OTP, [rules::required(&self.code), rules::otp_code(&self.code)]);
        validator.finish()?;
        Ok(self.code.clone())
    }
}

/// Password creation screen after activation or reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPasswordForm {
    /// New password.
    pub password: String,
    /// Repeated password.
    pub confirm_password: String,
}

impl NewPasswordForm {
    /// Validate and return the password.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when the password is shorter than six
    /// characters or the confirmation differs.
    pub fn validate(&self) -> Result<Zeroizing<String>, ValidationErrors> {
        let mut validator = Validator::new();
        check_new_password(&mut validator, &self.password, &self.confirm_password);
        validator.finish()?;
        Ok(Zeroizing::new(self.password.clone()))
    }
}

/// Login screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email as typed.
    pub email: String,
    /// Password as typed.
    pub password: String,
}

/// Body of a login request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginPayload {
    /// Trimmed email.
    pub email: String,
    /// Password, unmodified.
    pub password: Zeroizing<String>,
}

impl LoginForm {
    /// Validate and build the request body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when the email is blank or malformed or
    /// the password is blank.
    pub fn validate(&self) -> Result<LoginPayload, ValidationErrors> {
        let mut validator = Validator::new();
        validator
            .check(EMAIL, [rules::required(&self.email), rules::email(&self.email)])
            .check(PASSWORD, [rules::required(&self.password)]);
        validator.finish()?;
        Ok(LoginPayload {
            email: self.email.trim().to_owned(),
            password: Zeroizing::new(self.password.clone()),
        })
    }
}

/// Forgot-password screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgotPasswordForm {
    /// Email the reset code is sent to.
    pub email: String,
}

impl ForgotPasswordForm {
    /// Validate and return the trimmed email.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when the email is blank or malformed.
    pub fn validate(&self) -> Result<String, ValidationErrors> {
        let mut validator = Validator::new();
        validator.check(EMAIL, [rules::required(&self.email), rules::email(&self.email)]);
        validator.finish()?;
        Ok(self.email.trim().to_owned())
    }
}

/// Change-password screen for a signed-in resident.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangePasswordForm {
    /// Current password.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
    /// Repeated replacement password.
    pub confirm_password: String,
}

/// Body of a change-password request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    /// Current password.
    pub current_password: Zeroizing<String>,
    /// Replacement password.
    pub new_password: Zeroizing<String>,
}

impl ChangePasswordForm {
    /// Validate and build the request body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when the current password is blank or the
    /// new password fails the length or confirmation rules.
    pub fn validate(&self) -> Result<ChangePasswordPayload, ValidationErrors> {
        let mut validator = Validator::new();
        validator.check(CURRENT_PASSWORD, [rules::required(&self.current_password)]);
        check_new_password(&mut validator, &self.new_password, &self.confirm_password);
        validator.finish()?;
        Ok(ChangePasswordPayload {
            current_password: Zeroizing::new(self.current_password.clone()),
            new_password: Zeroizing::new(self.new_password.clone()),
        })
    }
}
