//! Profile update form for the signed-in resident.

use chrono::NaiveDate;
use serde::Serialize;

use super::account::EMAIL;
use super::eligibility::{ResidentStatus, StatusPayload};
use super::household::{FIRST_NAME, LAST_NAME, check_name, trimmed};
use super::signup::{ADDRESS, CONTACT_NUMBER, PUROK};
use crate::domain::validation::rules;
use crate::domain::validation::{ValidationErrors, Validator};

/// Profile screen state, pre-filled from the stored resident record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    /// Given name.
    pub first_name: String,
    /// Middle name, optional.
    pub middle_name: String,
    /// Family name.
    pub last_name: String,
    /// Email; this or `contact_number` is required.
    pub email: String,
    /// Contact number; this or `email` is required.
    pub contact_number: String,
    /// Street address.
    pub address: String,
    /// Purok.
    pub purok: String,
    /// Age-gated toggles and the birth date driving them.
    pub status: ResidentStatus,
}

/// Body of a profile update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    /// Trimmed given name.
    pub first_name: String,
    /// Trimmed middle name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    /// Trimmed family name.
    pub last_name: String,
    /// Email, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact number, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    /// Street address.
    pub address: String,
    /// Purok.
    pub purok: String,
    /// Age-gated status fields.
    #[serde(flatten)]
    pub status: StatusPayload,
}

impl ProfileForm {
    /// Validate and build the request body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when names, contact channels, address or
    /// the age-gated toggles are invalid.
    pub fn validate(&self, today: NaiveDate) -> Result<ProfilePayload, ValidationErrors> {
        let mut validator = Validator::new();
        check_name(&mut validator, None, FIRST_NAME, &self.first_name);
        check_name(&mut validator, None, LAST_NAME, &self.last_name);
        validator
            .check(
                EMAIL,
                [rules::either(&self.email, &self.contact_number, CONTACT_NUMBER.label())],
            )
            .check_optional(EMAIL, &self.email, [rules::email(&self.email)])
            .check_optional(
                CONTACT_NUMBER,
                &self.contact_number,
                [rules::contact_number(&self.contact_number)],
            )
            .check(ADDRESS, [rules::required(&self.address)])
            .check(PUROK, [rules::required(&self.purok)]);
        self.status.validate(&mut validator, None, today);
        validator.finish()?;

        Ok(ProfilePayload {
            first_name: self.first_name.trim().to_owned(),
            middle_name: trimmed(&self.middle_name),
            last_name: self.last_name.trim().to_owned(),
            email: trimmed(&self.email),
            contact_number: trimmed(&self.contact_number),
            address: self.address.trim().to_owned(),
            purok: self.purok.trim().to_owned(),
            status: self.status.payload(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for profile rules.

    use super::*;
    use crate::domain::forms::eligibility::{Attachment, GatedStatus};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
    }

    fn form() -> ProfileForm {
        let mut status = ResidentStatus::default();
        status.set_date_of_birth(NaiveDate::from_ymd_opt(1960, 1, 5), today());
        ProfileForm {
            first_name: "Rosa".to_owned(),
            last_name: "Santos".to_owned(),
            contact_number: "+639171234567".to_owned(),
            address: "4 Rizal Ave.".to_owned(),
            purok: "1".to_owned(),
            status,
            ..ProfileForm::default()
        }
    }

    #[test]
    fn contact_number_alone_is_enough() {
        let payload = form().validate(today()).expect("valid profile");
        assert!(payload.email.is_none());
        assert_eq!(payload.contact_number.as_deref(), Some("+639171234567"));
    }

    #[test]
    fn senior_toggle_needs_id_and_proof() {
        let mut profile = form();
        profile
            .status
            .set_enabled(GatedStatus::SeniorCitizen, true, today())
            .expect("sixty-six years old");
        let errors = profile.validate(today()).expect_err("id and proof missing");
        assert!(errors.get("seniorCitizenId").is_some());
        assert!(errors.get("seniorCitizenProof").is_some());

        profile
            .status
            .set_id_number(GatedStatus::SeniorCitizen, "SC-0042");
        profile.status.set_proof(
            GatedStatus::SeniorCitizen,
            Some(Attachment::new("file:///id.jpg", "id.jpg", "image/jpeg")),
        );
        let payload = profile.validate(today()).expect("complete toggle");
        assert!(payload.status.is_senior_citizen);
    }

    #[test]
    fn malformed_contact_number_is_rejected() {
        let mut profile = form();
        profile.contact_number = "12345".to_owned();
        let errors = profile.validate(today()).expect_err("bad number");
        assert_eq!(
            errors.message_for("contactNumber").as_deref(),
            Some("Contact number must be a valid mobile number (09XXXXXXXXX)")
        );
    }
}
