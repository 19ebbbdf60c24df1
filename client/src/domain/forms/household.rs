//! Household member forms and the cross-record email uniqueness check.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::eligibility::{ResidentStatus, StatusPayload};
use crate::domain::validation::rules::{self, RuleViolation};
use crate::domain::validation::{Field, FieldError, ValidationErrors, Validator};

/// Given name field.
pub const FIRST_NAME: Field = Field::new("firstName", "First name");
/// Family name field.
pub const LAST_NAME: Field = Field::new("lastName", "Last name");
/// Birth date field.
pub const DATE_OF_BIRTH: Field = Field::new("dateOfBirth", "Date of birth");
/// Sex field.
pub const SEX: Field = Field::new("sex", "Sex");
/// Relationship picker field.
pub const RELATIONSHIP: Field = Field::new("relationship", "Relationship");
/// Free-text relationship shown when "Other" is picked.
pub const SPECIFY_RELATIONSHIP: Field =
    Field::new("specifyRelationship", "Specify relationship");
/// Member email field.
pub const MEMBER_EMAIL: Field = Field::new("email", "Email address");
/// Member contact number field.
pub const MEMBER_CONTACT: Field = Field::new("contactNumber", "Contact number");

/// Longest accepted name part.
pub const NAME_MAX: usize = 50;

/// Sex as recorded by the barangay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    /// Male.
    Male,
    /// Female.
    Female,
}

/// Relationship of a member to the household head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relationship {
    /// Husband or wife.
    Spouse,
    /// Son or daughter.
    Child,
    /// Father or mother.
    Parent,
    /// Brother or sister.
    Sibling,
    /// Grandparent.
    Grandparent,
    /// Grandchild.
    Grandchild,
    /// Any other relative or household resident; requires a description.
    Other,
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Spouse => "Spouse",
            Self::Child => "Child",
            Self::Parent => "Parent",
            Self::Sibling => "Sibling",
            Self::Grandparent => "Grandparent",
            Self::Grandchild => "Grandchild",
            Self::Other => "Other",
        };
        f.write_str(label)
    }
}

/// One household member as entered on the signup or household screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HouseholdMemberForm {
    /// Given name.
    pub first_name: String,
    /// Middle name, optional.
    pub middle_name: String,
    /// Family name.
    pub last_name: String,
    /// Sex.
    pub sex: Option<Sex>,
    /// Relationship to the head.
    pub relationship: Option<Relationship>,
    /// Description used when `relationship` is [`Relationship::Other`].
    pub specify_relationship: String,
    /// Email, optional for members.
    pub email: String,
    /// Contact number, optional for members.
    pub contact_number: String,
    /// Age-gated toggles and the birth date driving them.
    pub status: ResidentStatus,
}

/// Member as sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPayload {
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
    /// Relationship to the head.
    pub relationship: Relationship,
    /// Description for [`Relationship::Other`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specify_relationship: Option<String>,
    /// Email, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact number, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    /// Age-gated status fields.
    #[serde(flatten)]
    pub status: StatusPayload,
}

pub(crate) fn trimmed(value: &str) -> Option<String> {
    let text = value.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

pub(crate) fn check_name(validator: &mut Validator, index: Option<usize>, field: Field, value: &str) {
    validator.check_at(
        index,
        field,
        [rules::required(value), rules::max_length(value, NAME_MAX)],
    );
}

impl HouseholdMemberForm {
    /// Record this member's violations. `index` places them inside the
    /// signup member list; `None` is the standalone member screen.
    pub fn check(&self, validator: &mut Validator, index: Option<usize>, today: NaiveDate) {
        check_name(validator, index, FIRST_NAME, &self.first_name);
        check_name(validator, index, LAST_NAME, &self.last_name);
        validator
            .check_at(index, SEX, [rules::required_some(self.sex.as_ref())])
            .check_at(
                index,
                DATE_OF_BIRTH,
                [self.status.date_of_birth().map_or(
                    Err(RuleViolation::Required),
                    |dob| rules::not_in_future(dob, today),
                )],
            )
            .check_at(
                index,
                RELATIONSHIP,
                [rules::required_some(self.relationship.as_ref())],
            )
            .check_at(
                index,
                SPECIFY_RELATIONSHIP,
                [rules::required_if(
                    self.relationship == Some(Relationship::Other),
                    &self.specify_relationship,
                )],
            );
        if !self.email.trim().is_empty() {
            validator.check_at(index, MEMBER_EMAIL, [rules::email(&self.email)]);
        }
        if !self.contact_number.trim().is_empty() {
            validator.check_at(
                index,
                MEMBER_CONTACT,
                [rules::contact_number(&self.contact_number)],
            );
        }
        self.status.validate(validator, index, today);
    }

    /// Validate the standalone member screen and build the request body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when any member rule fails.
    pub fn validate(&self, today: NaiveDate) -> Result<MemberPayload, ValidationErrors> {
        let mut validator = Validator::new();
        self.check(&mut validator, None, today);
        validator.finish()?;
        self.payload().ok_or_else(ValidationErrors::default)
    }

    /// Build the body once validation passed. `None` if required choices are
    /// still missing.
    pub(crate) fn payload(&self) -> Option<MemberPayload> {
        Some(MemberPayload {
            first_name: self.first_name.trim().to_owned(),
            middle_name: trimmed(&self.middle_name),
            last_name: self.last_name.trim().to_owned(),
            sex: self.sex?,
            date_of_birth: self.status.date_of_birth()?,
            relationship: self.relationship?,
            specify_relationship: match self.relationship? {
                Relationship::Other => trimmed(&self.specify_relationship),
                _ => None,
            },
            email: trimmed(&self.email),
            contact_number: trimmed(&self.contact_number),
            status: self.status.payload(),
        })
    }
}

/// Reject member emails that repeat the registrant's email or another
/// member's, comparing trimmed and case-folded values. The error lands on
/// the later entry and names the repeated email.
pub fn check_unique_member_emails(
    validator: &mut Validator,
    head_email: &str,
    members: &[HouseholdMemberForm],
) {
    let mut seen: HashSet<String> = HashSet::new();
    if !head_email.trim().is_empty() {
        seen.insert(rules::normalise_email(head_email));
    }
    for (index, member) in members.iter().enumerate() {
        if member.email.trim().is_empty() {
            continue;
        }
        if !seen.insert(rules::normalise_email(&member.email)) {
            validator.reject(
                FieldError::new(
                    MEMBER_EMAIL,
                    RuleViolation::Duplicate {
                        value: member.email.trim().to_owned(),
                    },
                )
                .at(index),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for member rules and email uniqueness.

    use super::*;
    use crate::domain::forms::eligibility::GatedStatus;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
    }

    fn member(first_name: &str, email: &str) -> HouseholdMemberForm {
        let mut status = ResidentStatus::default();
        status.set_date_of_birth(NaiveDate::from_ymd_opt(2010, 4, 1), today());
        HouseholdMemberForm {
            first_name: first_name.to_owned(),
            last_name: "Dela Cruz".to_owned(),
            sex: Some(Sex::Female),
            relationship: Some(Relationship::Child),
            email: email.to_owned(),
            status,
            ..HouseholdMemberForm::default()
        }
    }

    #[test]
    fn complete_member_validates() {
        let payload = member("Maria", "").validate(today()).expect("valid member");
        assert_eq!(payload.relationship, Relationship::Child);
        assert!(payload.email.is_none());
    }

    #[test]
    fn other_relationship_requires_description() {
        let mut form = member("Lito", "");
        form.relationship = Some(Relationship::Other);
        let errors = form.validate(today()).expect_err("description missing");
        assert_eq!(
            errors.message_for("specifyRelationship").as_deref(),
            Some("Specify relationship is required")
        );

        form.specify_relationship = "Cousin".to_owned();
        let payload = form.validate(today()).expect("description given");
        assert_eq!(payload.specify_relationship.as_deref(), Some("Cousin"));
    }

    #[test]
    fn description_is_dropped_for_named_relationships() {
        let mut form = member("Lito", "");
        form.specify_relationship = "ignored".to_owned();
        let payload = form.validate(today()).expect("valid");
        assert!(payload.specify_relationship.is_none());
    }

    #[test]
    fn future_birth_dates_are_rejected() {
        let mut form = member("Ana", "");
        form.status
            .set_date_of_birth(NaiveDate::from_ymd_opt(2027, 1, 1), today());
        let errors = form.validate(today()).expect_err("future date");
        assert!(errors.get("dateOfBirth").is_some());
    }

    #[test]
    fn duplicate_member_emails_name_the_email() {
        let members = vec![
            member("Maria", "maria@example.ph"),
            member("Ana", " MARIA@example.ph "),
        ];
        let mut validator = Validator::new();
        check_unique_member_emails(&mut validator, "juan@example.ph", &members);

        let errors = validator.finish().expect_err("duplicate email");
        let error = errors.get_at("email", Some(1)).expect("second member flagged");
        assert_eq!(
            error.message(),
            "Household member 2: Email address MARIA@example.ph is already used in this registration"
        );
        assert!(errors.get_at("email", Some(0)).is_none());
    }

    #[test]
    fn member_email_may_not_repeat_head_email() {
        let members = vec![member("Maria", "juan@example.ph")];
        let mut validator = Validator::new();
        check_unique_member_emails(&mut validator, "Juan@Example.ph", &members);

        let errors = validator.finish().expect_err("head email reused");
        let error = errors.get_at("email", Some(0)).expect("member flagged");
        assert_eq!(
            error.message(),
            "Household member 1: Email address juan@example.ph is already used in this registration"
        );
        assert!(!error.message().contains("another household member"));
    }

    #[test]
    fn blank_member_emails_never_collide() {
        let members = vec![member("Maria", ""), member("Ana", " ")];
        let mut validator = Validator::new();
        check_unique_member_emails(&mut validator, "", &members);
        assert!(validator.finish().is_ok());
    }

    #[test]
    fn member_toggles_are_indexed() {
        let mut adult = member("Pedro", "");
        adult
            .status
            .set_date_of_birth(NaiveDate::from_ymd_opt(1980, 1, 1), today());
        adult
            .status
            .set_enabled(GatedStatus::Voter, true, today())
            .expect("adult");
        let mut validator = Validator::new();
        adult.check(&mut validator, Some(3), today());
        let errors = validator.finish().expect_err("voter id missing");
        assert!(errors.get_at("voterId", Some(3)).is_some());
    }
}
