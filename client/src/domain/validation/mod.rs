//! Composable form validation.
//!
//! Forms describe themselves as a list of `(field, rule outcomes)` pairs fed
//! to a [`Validator`]. The validator keeps the first violation per field, in
//! the order fields were checked, so a screen can highlight every bad field
//! and show the first message in a dialog.

pub mod rules;

use std::collections::BTreeMap;
use std::fmt;

pub use self::rules::{RuleResult, RuleViolation};
use super::Notice;

/// Form field identifier paired with the label residents see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    key: &'static str,
    label: &'static str,
}

impl Field {
    /// Declare a field.
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }

    /// Stable key used by screens to attach inline errors.
    pub const fn key(self) -> &'static str {
        self.key
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        self.label
    }
}

/// One rejected field, optionally inside a repeated group such as a
/// household member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: Field,
    index: Option<usize>,
    violation: RuleViolation,
}

impl FieldError {
    /// Pair a field with the rule it broke.
    pub const fn new(field: Field, violation: RuleViolation) -> Self {
        Self {
            field,
            index: None,
            violation,
        }
    }

    /// Place the error inside the repeated group entry at `index`.
    #[must_use]
    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// The rejected field.
    pub const fn field(&self) -> Field {
        self.field
    }

    /// Zero-based entry index for repeated groups.
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    fn is_for(&self, key: &str, index: Option<usize>) -> bool {
        self.field.key == key && self.index == index
    }

    /// The broken rule.
    pub const fn violation(&self) -> &RuleViolation {
        &self.violation
    }

    /// Full sentence shown to the resident.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(index) = self.index {
            write!(f, "Household member {}: ", index + 1)?;
        }
        write!(f, "{} {}", self.field.label, self.violation)
    }
}

/// Field-to-message mapping produced by one validation pass.
///
/// ## Invariants
/// - At most one error per field key and group index.
/// - Iteration follows the order in which fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Record `error` unless its field already has one.
    pub fn insert(&mut self, error: FieldError) {
        if self.get_at(error.field.key, error.index).is_none() {
            self.errors.push(error);
        }
    }

    /// Error recorded for the top-level field `key`, if any.
    pub fn get(&self, key: &str) -> Option<&FieldError> {
        self.get_at(key, None)
    }

    /// Error recorded for `key` in the group entry `index`.
    pub fn get_at(&self, key: &str, index: Option<usize>) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.is_for(key, index))
    }

    /// Message recorded for `key`, if any.
    pub fn message_for(&self, key: &str) -> Option<String> {
        self.get(key).map(FieldError::message)
    }

    /// Drop the top-level error for `key` once the resident corrects it.
    pub fn clear_field(&mut self, key: &str) {
        self.errors.retain(|error| !error.is_for(key, None));
    }

    /// First error in check order.
    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    /// Whether no field failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failed fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Errors in check order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Messages keyed by field for inline rendering. Group entries are keyed
    /// as `key[index]`.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.errors
            .iter()
            .map(|error| {
                let key = match error.index {
                    Some(index) => format!("{}[{index}]", error.field.key),
                    None => error.field.key.to_owned(),
                };
                (key, error.message())
            })
            .collect()
    }

    /// Dialog shown when submission is blocked.
    pub fn notice(&self) -> Notice {
        let message = self
            .first()
            .map_or_else(|| "Please review the form.".to_owned(), FieldError::message);
        Notice::new("Validation Error", message)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(FieldError::message).collect();
        f.write_str(&messages.join("\n"))
    }
}

impl std::error::Error for ValidationErrors {}

/// Collects rule outcomes for a form.
///
/// # Examples
/// ```
/// use portal_client::domain::validation::{Field, Validator, rules};
///
/// const EMAIL: Field = Field::new("email", "Email address");
///
/// let mut validator = Validator::new();
/// validator.check(EMAIL, [rules::required("juan@"), rules::email("juan@")]);
/// let errors = validator.finish().expect_err("email is malformed");
/// assert_eq!(
///     errors.message_for("email").as_deref(),
///     Some("Email address must be a valid email address"),
/// );
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    /// Start an empty pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the first failing outcome for `field`.
    pub fn check(
        &mut self,
        field: Field,
        outcomes: impl IntoIterator<Item = RuleResult>,
    ) -> &mut Self {
        self.check_at(None, field, outcomes)
    }

    /// Record the first failing outcome for `field` in group entry `index`.
    pub fn check_at(
        &mut self,
        index: Option<usize>,
        field: Field,
        outcomes: impl IntoIterator<Item = RuleResult>,
    ) -> &mut Self {
        if let Some(violation) = outcomes.into_iter().find_map(Result::err) {
            let error = FieldError::new(field, violation);
            self.errors.insert(match index {
                Some(index) => error.at(index),
                None => error,
            });
        }
        self
    }

    /// Record an already-detected violation.
    pub fn reject(&mut self, error: FieldError) -> &mut Self {
        self.errors.insert(error);
        self
    }

    /// Record the outcomes for `field` only when `value` is non-blank.
    pub fn check_optional(
        &mut self,
        field: Field,
        value: &str,
        outcomes: impl IntoIterator<Item = RuleResult>,
    ) -> &mut Self {
        if value.trim().is_empty() {
            return self;
        }
        self.check(field, outcomes)
    }

    /// Whether any field has failed so far.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Close the pass.
    ///
    /// # Errors
    ///
    /// Returns the collected [`ValidationErrors`] when any field failed.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
