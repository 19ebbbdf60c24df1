//! Age-derived gating for voter and senior citizen toggles.
//!
//! A toggle may only be switched on while the resident's age allows it. When
//! a date-of-birth change makes the resident ineligible, the toggle switches
//! off and its dependent id number and proof are cleared. Switching a toggle
//! off always clears its dependents.

use chrono::{Datelike, NaiveDate};
use mockable::Clock;
use serde::Serialize;

use crate::domain::validation::{Field, RuleViolation, Validator, rules};

/// Minimum age for registering as a voter.
pub const VOTER_MIN_AGE: u32 = 18;
/// Minimum age for senior citizen benefits.
pub const SENIOR_MIN_AGE: u32 = 60;

/// Calendar date used for age checks, taken from the injected clock.
pub fn today(clock: &dyn Clock) -> NaiveDate {
    clock.local().date_naive()
}

/// Whole years between `date_of_birth` and `today`. Future birth dates
/// yield zero.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use portal_client::domain::forms::eligibility::age_on;
///
/// let dob = NaiveDate::from_ymd_opt(2008, 6, 15).unwrap();
/// assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(2026, 6, 14).unwrap()), 17);
/// assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()), 18);
/// ```
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> u32 {
    if date_of_birth > today {
        return 0;
    }
    let had_birthday = (today.month(), today.day()) >= (date_of_birth.month(), date_of_birth.day());
    let years = today.year() - date_of_birth.year() - i32::from(!had_birthday);
    u32::try_from(years).unwrap_or(0)
}

/// Reference to a file the resident already picked for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Local URI handed over by the file picker.
    pub uri: String,
    /// Original file name.
    pub file_name: String,
    /// MIME type reported by the picker.
    pub mime_type: String,
}

impl Attachment {
    /// Describe a picked file.
    pub fn new(
        uri: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Which age-gated toggle is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatedStatus {
    /// Registered voter; needs a voter id and proof.
    Voter,
    /// Senior citizen; needs a senior citizen id and proof.
    SeniorCitizen,
}

impl GatedStatus {
    /// Youngest age allowed to switch the toggle on.
    pub const fn min_age(self) -> u32 {
        match self {
            Self::Voter => VOTER_MIN_AGE,
            Self::SeniorCitizen => SENIOR_MIN_AGE,
        }
    }

    const fn fields(self) -> (Field, Field, Field) {
        match self {
            Self::Voter => (IS_VOTER, VOTER_ID, VOTER_PROOF),
            Self::SeniorCitizen => (IS_SENIOR, SENIOR_ID, SENIOR_PROOF),
        }
    }
}

/// Voter toggle field.
pub const IS_VOTER: Field = Field::new("isVoter", "Registered voter");
/// Voter id field.
pub const VOTER_ID: Field = Field::new("voterId", "Voter's ID number");
/// Voter proof field.
pub const VOTER_PROOF: Field = Field::new("voterProof", "Proof of voter registration");
/// Senior toggle field.
pub const IS_SENIOR: Field = Field::new("isSeniorCitizen", "Senior citizen");
/// Senior id field.
pub const SENIOR_ID: Field = Field::new("seniorCitizenId", "Senior citizen ID number");
/// Senior proof field.
pub const SENIOR_PROOF: Field = Field::new("seniorCitizenProof", "Proof of senior citizen status");

/// A toggle with a dependent id number and proof attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatedToggle {
    enabled: bool,
    id_number: String,
    proof: Option<Attachment>,
}

impl GatedToggle {
    /// Whether the toggle is on.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Dependent id number.
    pub fn id_number(&self) -> &str {
        self.id_number.as_str()
    }

    /// Dependent proof.
    pub const fn proof(&self) -> Option<&Attachment> {
        self.proof.as_ref()
    }

    fn switch_off(&mut self) {
        self.enabled = false;
        self.id_number.clear();
        self.proof = None;
    }
}

/// Age-gated status toggles for one resident, keyed to their birth date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidentStatus {
    date_of_birth: Option<NaiveDate>,
    voter: GatedToggle,
    senior: GatedToggle,
}

impl ResidentStatus {
    /// Stored birth date.
    pub const fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
    }

    /// Voter toggle and dependents.
    pub const fn voter(&self) -> &GatedToggle {
        &self.voter
    }

    /// Senior citizen toggle and dependents.
    pub const fn senior(&self) -> &GatedToggle {
        &self.senior
    }

    fn toggle(&self, status: GatedStatus) -> &GatedToggle {
        match status {
            GatedStatus::Voter => &self.voter,
            GatedStatus::SeniorCitizen => &self.senior,
        }
    }

    fn toggle_mut(&mut self, status: GatedStatus) -> &mut GatedToggle {
        match status {
            GatedStatus::Voter => &mut self.voter,
            GatedStatus::SeniorCitizen => &mut self.senior,
        }
    }

    /// Resident's age today, when a birth date is known.
    pub fn age(&self, today: NaiveDate) -> Option<u32> {
        self.date_of_birth.map(|dob| age_on(dob, today))
    }

    /// Whether `status` may currently be switched on.
    pub fn is_eligible(&self, status: GatedStatus, today: NaiveDate) -> bool {
        self.age(today).is_some_and(|age| age >= status.min_age())
    }

    /// Change the birth date and drop any toggle the new age no longer
    /// allows, clearing its id number and proof.
    pub fn set_date_of_birth(&mut self, date_of_birth: Option<NaiveDate>, today: NaiveDate) {
        self.date_of_birth = date_of_birth;
        for status in [GatedStatus::Voter, GatedStatus::SeniorCitizen] {
            if !self.is_eligible(status, today) {
                self.toggle_mut(status).switch_off();
            }
        }
    }

    /// Switch a toggle on or off. Switching off clears its dependents.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::AgeRequirement`] when switching on while the
    /// resident is too young; the toggle stays off.
    pub fn set_enabled(
        &mut self,
        status: GatedStatus,
        enabled: bool,
        today: NaiveDate,
    ) -> Result<(), RuleViolation> {
        if !enabled {
            self.toggle_mut(status).switch_off();
            return Ok(());
        }
        if !self.is_eligible(status, today) {
            return Err(RuleViolation::AgeRequirement {
                min_age: status.min_age(),
            });
        }
        self.toggle_mut(status).enabled = true;
        Ok(())
    }

    /// Set the id number behind an enabled toggle. Ignored while off.
    pub fn set_id_number(&mut self, status: GatedStatus, id_number: impl Into<String>) {
        let toggle = self.toggle_mut(status);
        if toggle.enabled {
            toggle.id_number = id_number.into();
        }
    }

    /// Attach proof behind an enabled toggle. Ignored while off.
    pub fn set_proof(&mut self, status: GatedStatus, proof: Option<Attachment>) {
        let toggle = self.toggle_mut(status);
        if toggle.enabled {
            toggle.proof = proof;
        }
    }

    /// Check toggle rules: an enabled toggle must be age-eligible and carry
    /// both its id number and proof.
    pub fn validate(&self, validator: &mut Validator, index: Option<usize>, today: NaiveDate) {
        for status in [GatedStatus::Voter, GatedStatus::SeniorCitizen] {
            let toggle = self.toggle(status);
            if !toggle.enabled {
                continue;
            }
            let (flag, id_field, proof_field) = status.fields();
            let eligibility = if self.is_eligible(status, today) {
                Ok(())
            } else {
                Err(RuleViolation::AgeRequirement {
                    min_age: status.min_age(),
                })
            };
            validator
                .check_at(index, flag, [eligibility])
                .check_at(index, id_field, [rules::required(&toggle.id_number)])
                .check_at(index, proof_field, [rules::required_some(toggle.proof.as_ref())]);
        }
    }

    /// Wire representation merged into signup and profile payloads.
    pub fn payload(&self) -> StatusPayload {
        StatusPayload {
            is_voter: self.voter.enabled,
            voter_id: non_blank(&self.voter.id_number),
            voter_proof: self.voter.proof.clone(),
            is_senior_citizen: self.senior.enabled,
            senior_citizen_id: non_blank(&self.senior.id_number),
            senior_citizen_proof: self.senior.proof.clone(),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Status fields as sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    /// Voter toggle.
    pub is_voter: bool,
    /// Voter id, when the toggle is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter_id: Option<String>,
    /// Voter proof, when the toggle is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter_proof: Option<Attachment>,
    /// Senior toggle.
    pub is_senior_citizen: bool,
    /// Senior id, when the toggle is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub senior_citizen_id: Option<String>,
    /// Senior proof, when the toggle is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub senior_citizen_proof: Option<Attachment>,
}
