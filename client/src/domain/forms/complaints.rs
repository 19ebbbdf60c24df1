//! Complaint filing form.

use chrono::NaiveDate;
use serde::Serialize;

use super::eligibility::Attachment;
use crate::domain::validation::rules::{self, RuleViolation};
use crate::domain::validation::{Field, ValidationErrors, Validator};

/// Category picker.
pub const CATEGORY: Field = Field::new("category", "Category");
/// Short subject line.
pub const SUBJECT: Field = Field::new("subject", "Subject");
/// Narrative of the incident.
pub const DESCRIPTION: Field = Field::new("description", "Description");
/// Date the incident happened.
pub const INCIDENT_DATE: Field = Field::new("incidentDate", "Incident date");
/// Where the incident happened.
pub const LOCATION: Field = Field::new("location", "Location");

/// Longest accepted subject.
pub const SUBJECT_MAX: usize = 100;
/// Longest accepted description.
pub const DESCRIPTION_MAX: usize = 1000;

/// Complaint screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintForm {
    /// Selected category.
    pub category: String,
    /// Subject line.
    pub subject: String,
    /// Narrative.
    pub description: String,
    /// Incident date.
    pub incident_date: Option<NaiveDate>,
    /// Incident location.
    pub location: String,
    /// Optional photos or documents.
    pub attachments: Vec<Attachment>,
}

/// Body of a complaint submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintPayload {
    /// Category.
    pub category: String,
    /// Trimmed subject.
    pub subject: String,
    /// Trimmed narrative.
    pub description: String,
    /// Incident date.
    pub incident_date: NaiveDate,
    /// Trimmed location.
    pub location: String,
    /// Attachments, omitted when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl ComplaintForm {
    /// Validate and build the request body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when a required field is blank, text is
    /// too long, or the incident date lies in the future.
    pub fn validate(&self, today: NaiveDate) -> Result<ComplaintPayload, ValidationErrors> {
        let mut validator = Validator::new();
        validator
            .check(CATEGORY, [rules::required(&self.category)])
            .check(
                SUBJECT,
                [
                    rules::required(&self.subject),
                    rules::max_length(&self.subject, SUBJECT_MAX),
                ],
            )
            .check(
                DESCRIPTION,
                [
                    rules::required(&self.description),
                    rules::max_length(&self.description, DESCRIPTION_MAX),
                ],
            )
            .check(
                INCIDENT_DATE,
                [self
                    .incident_date
                    .map_or(Err(RuleViolation::Required), |date| {
                        rules::not_in_future(date, today)
                    })],
            )
            .check(LOCATION, [rules::required(&self.location)]);
        validator.finish()?;

        let incident_date = self.incident_date.ok_or_else(ValidationErrors::default)?;
        Ok(ComplaintPayload {
            category: self.category.trim().to_owned(),
            subject: self.subject.trim().to_owned(),
            description: self.description.trim().to_owned(),
            incident_date,
            location: self.location.trim().to_owned(),
            attachments: self.attachments.clone(),
        })
    }
}
