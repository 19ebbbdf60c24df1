//! Submission state shared by every form screen.
//!
//! A form is `Editable` until a submit passes validation, then `Submitting`
//! until the call settles. A second submit while one is in flight is
//! refused, so a double tap never issues two requests.

use thiserror::Error;

use super::validation::ValidationErrors;

/// Where a form is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    /// Input accepted; submit enabled.
    #[default]
    Editable,
    /// A request is in flight; submit disabled.
    Submitting,
}

/// Why a submit did not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    /// Another submit is still running.
    #[error("a submission is already in progress")]
    InFlight,
    /// Local validation failed; nothing was sent.
    #[error("{0}")]
    Invalid(ValidationErrors),
}

/// Submit state plus the inline errors of the last attempt.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    phase: FormPhase,
    errors: ValidationErrors,
}

impl FormState {
    /// Fresh, editable form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub const fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Whether a request is in flight.
    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Inline errors from the last blocked submit.
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Drop the inline error of a field the resident just edited.
    pub fn clear_field(&mut self, key: &str) {
        self.errors.clear_field(key);
    }

    /// Start a submit with the outcome of the form's `validate`.
    ///
    /// On success the form moves to [`FormPhase::Submitting`] and the payload
    /// is handed back for dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitRejected::InFlight`] while submitting, leaving the
    /// state untouched, or [`SubmitRejected::Invalid`] after recording the
    /// validation errors for inline display.
    pub fn begin_submit<T>(
        &mut self,
        validation: Result<T, ValidationErrors>,
    ) -> Result<T, SubmitRejected> {
        if self.is_submitting() {
            return Err(SubmitRejected::InFlight);
        }
        match validation {
            Ok(payload) => {
                self.errors = ValidationErrors::default();
                self.phase = FormPhase::Submitting;
                Ok(payload)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(SubmitRejected::Invalid(errors))
            }
        }
    }

    /// Return to [`FormPhase::Editable`] once the call settled, whatever the
    /// outcome.
    pub fn finish(&mut self) {
        self.phase = FormPhase::Editable;
    }
}
