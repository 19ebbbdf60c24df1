//! Signup form: the household head plus any household members.

use chrono::NaiveDate;
use serde::Serialize;
use zeroize::Zeroizing;

use super::account::{EMAIL, check_new_password};
use super::eligibility::{ResidentStatus, StatusPayload};
use super::household::{
    DATE_OF_BIRTH, FIRST_NAME, HouseholdMemberForm, LAST_NAME, MemberPayload, SEX, Sex,
    check_name, check_unique_member_emails, trimmed,
};
use crate::domain::validation::rules::{self, RuleViolation};
use crate::domain::validation::{Field, ValidationErrors, Validator};

/// Contact number field of the registrant.
pub const CONTACT_NUMBER: Field = Field::new("contactNumber", "Contact number");
/// Street address field.
pub const ADDRESS: Field = Field::new("address", "Address");
/// Purok (zone) field.
pub const PUROK: Field = Field::new("purok", "Purok");

/// Signup screen state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    /// Given name.
    pub first_name: String,
    /// Middle name, optional.
    pub middle_name: String,
    /// Family name.
    pub last_name: String,
    /// Sex.
    pub sex: Option<Sex>,
    /// Email; this or `contact_number` is required.
    pub email: String,
    /// Contact number; this or `email` is required.
    pub contact_number: String,
    /// Street address.
    pub address: String,
    /// Purok (zone) within the barangay.
    pub purok: String,
    /// Password.
    pub password: String,
    /// Repeated password.
    pub confirm_password: String,
    /// Age-gated toggles and the birth date driving them.
    pub status: ResidentStatus,
    /// Household members registered together with the head.
    pub members: Vec<HouseholdMemberForm>,
}

/// Body of a signup request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    /// Trimmed given name.
    pub first_name: String,
    /// Trimmed middle name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    /// Trimmed family name.
    pub last_name: String,
    /// Sex.
    pub sex: Sex,
    /// Birth date.
    pub date_of_birth: NaiveDate,
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
    /// Password.
    pub password: Zeroizing<String>,
    /// Age-gated status fields.
    #[serde(flatten)]
    pub status: StatusPayload,
    /// Household members.
    pub household_members: Vec<MemberPayload>,
}

impl SignupForm {
    /// Append a blank member row.
    #[expect(clippy::indexing_slicing, reason = "the row was pushed just above")]
    pub fn add_member(&mut self) -> &mut HouseholdMemberForm {
        self.members.push(HouseholdMemberForm::default());
        let last = self.members.len() - 1;
        &mut self.members[last]
    }

    /// Remove the member row at `index`, if present.
    pub fn remove_member(&mut self, index: usize) -> Option<HouseholdMemberForm> {
        (index < self.members.len()).then(|| self.members.remove(index))
    }

    /// Validate every field and member before any network call.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] covering the registrant's fields, each
    /// member's fields (indexed), and any repeated member email.
    pub fn validate(&self, today: NaiveDate) -> Result<SignupPayload, ValidationErrors> {
        let mut validator = Validator::new();
        check_name(&mut validator, None, FIRST_NAME, &self.first_name);
        check_name(&mut validator, None, LAST_NAME, &self.last_name);
        validator
            .check(SEX, [rules::required_some(self.sex.as_ref())])
            .check(
                DATE_OF_BIRTH,
                [self.status.date_of_birth().map_or(
                    Err(RuleViolation::Required),
                    |dob| rules::not_in_future(dob, today),
                )],
            )
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
        check_new_password(&mut validator, &self.password, &self.confirm_password);
        self.status.validate(&mut validator, None, today);

        for (index, member) in self.members.iter().enumerate() {
            member.check(&mut validator, Some(index), today);
        }
        check_unique_member_emails(&mut validator, &self.email, &self.members);
        validator.finish()?;

        self.payload().ok_or_else(ValidationErrors::default)
    }

    fn payload(&self) -> Option<SignupPayload> {
        let household_members = self
            .members
            .iter()
            .map(HouseholdMemberForm::payload)
            .collect::<Option<Vec<_>>>()?;
        Some(SignupPayload {
            first_name: self.first_name.trim().to_owned(),
            middle_name: trimmed(&self.middle_name),
            last_name: self.last_name.trim().to_owned(),
            sex: self.sex?,
            date_of_birth: self.status.date_of_birth()?,
            email: trimmed(&self.email),
            contact_number: trimmed(&self.contact_number),
            address: self.address.trim().to_owned(),
            purok: self.purok.trim().to_owned(),
            password: Zeroizing::new(self.password.clone()),
            status: self.status.payload(),
            household_members,
        })
    }
}
