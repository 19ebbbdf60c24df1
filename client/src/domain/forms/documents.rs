//! Document request form.

use serde::Serialize;

use crate::domain::validation::rules;
use crate::domain::validation::{Field, ValidationErrors, Validator};

/// Document type picker.
pub const DOCUMENT_TYPE: Field = Field::new("documentType", "Document type");
/// Purpose picker.
pub const PURPOSE: Field = Field::new("purpose", "Purpose");
/// Free-text purpose shown when "Other" is picked.
pub const OTHER_PURPOSE: Field = Field::new("otherPurpose", "Specify purpose");
/// Number of copies.
pub const COPIES: Field = Field::new("copies", "Number of copies");

/// Purpose value that unlocks the free-text field.
pub const OTHER: &str = "Other";
/// Most copies accepted per request.
pub const MAX_COPIES: u32 = 5;

/// Document request screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequestForm {
    /// Selected document type id.
    pub document_type: String,
    /// Selected purpose, or [`OTHER`].
    pub purpose: String,
    /// Description used when `purpose` is [`OTHER`].
    pub other_purpose: String,
    /// Requested copies.
    pub copies: u32,
}

impl Default for DocumentRequestForm {
    fn default() -> Self {
        Self {
            document_type: String::new(),
            purpose: String::new(),
            other_purpose: String::new(),
            copies: 1,
        }
    }
}

/// Body of a document request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequestPayload {
    /// Document type id.
    pub document_type: String,
    /// Purpose, with "Other" replaced by the resident's description.
    pub purpose: String,
    /// Requested copies.
    pub copies: u32,
}

impl DocumentRequestForm {
    fn wants_other_purpose(&self) -> bool {
        self.purpose.trim().eq_ignore_ascii_case(OTHER)
    }

    /// Validate and build the request body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when a choice is missing, an "Other"
    /// purpose lacks a description, or the copy count is outside
    /// `1..=5`.
    pub fn validate(&self) -> Result<DocumentRequestPayload, ValidationErrors> {
        let mut validator = Validator::new();
        validator
            .check(DOCUMENT_TYPE, [rules::required(&self.document_type)])
            .check(PURPOSE, [rules::required(&self.purpose)])
            .check(
                OTHER_PURPOSE,
                [rules::required_if(self.wants_other_purpose(), &self.other_purpose)],
            )
            .check(COPIES, [rules::within(self.copies, 1, MAX_COPIES)]);
        validator.finish()?;

        let purpose = if self.wants_other_purpose() {
            self.other_purpose.trim()
        } else {
            self.purpose.trim()
        };
        Ok(DocumentRequestPayload {
            document_type: self.document_type.trim().to_owned(),
            purpose: purpose.to_owned(),
            copies: self.copies,
        })
    }
}
