//! Predicate rules shared by every form.
//!
//! Each rule is a pure check over borrowed input returning the violation it
//! detected. Rules never look at other fields except through explicit
//! arguments.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

/// Length of an account identifier issued by the barangay office.
pub const ACCOUNT_ID_LENGTH: usize = 4;
/// Minimum password length accepted by the backend.
pub const PASSWORD_MIN: usize = 6;
/// Number of digits in a one-time code.
pub const OTP_DIGITS: usize = 6;

/// Why a single rule rejected a value.
///
/// Messages are predicate phrases; [`super::FieldError`] prefixes the field
/// label to form a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    /// The value is empty or whitespace only.
    #[error("is required")]
    Required,
    /// The value does not have the exact number of characters.
    #[error("must be exactly {expected} characters")]
    ExactLength {
        /// Required character count.
        expected: usize,
    },
    /// The value is shorter than allowed.
    #[error("must be at least {min} characters")]
    TooShort {
        /// Minimum character count.
        min: usize,
    },
    /// The value is longer than allowed.
    #[error("must be at most {max} characters")]
    TooLong {
        /// Maximum character count.
        max: usize,
    },
    /// The value is not a code of the expected number of digits.
    #[error("must be a {digits}-digit code")]
    NotNumericCode {
        /// Required digit count.
        digits: usize,
    },
    /// The value is not a `local@domain.tld` address.
    #[error("must be a valid email address")]
    InvalidEmail,
    /// The value is not a Philippine mobile number.
    #[error("must be a valid mobile number (09XXXXXXXXX)")]
    InvalidContactNumber,
    /// The value differs from the field it must repeat.
    #[error("does not match {other}")]
    Mismatch {
        /// Label of the field being repeated.
        other: &'static str,
    },
    /// Neither this field nor its alternative was provided.
    #[error("or {other} is required")]
    MissingAlternative {
        /// Label of the alternative field.
        other: &'static str,
    },
    /// The value is already used elsewhere in the same submission.
    #[error("{value} is already used in this registration")]
    Duplicate {
        /// The repeated value, as entered.
        value: String,
    },
    /// A date falls before the date it must follow.
    #[error("must not be earlier than {other}")]
    Before {
        /// Label of the earlier date field.
        other: &'static str,
    },
    /// A date lies in the past.
    #[error("must not be in the past")]
    InPast,
    /// A date lies in the future.
    #[error("must not be in the future")]
    InFuture,
    /// A number lies outside its permitted range.
    #[error("must be between {min} and {max}")]
    OutOfRange {
        /// Inclusive lower bound.
        min: u32,
        /// Inclusive upper bound.
        max: u32,
    },
    /// A toggle was switched on for a resident who is too young.
    #[error("requires an age of at least {min_age}")]
    AgeRequirement {
        /// Minimum age for the toggle.
        min_age: u32,
    },
}

/// Outcome of one rule.
pub type RuleResult = Result<(), RuleViolation>;

static OTP_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static CONTACT_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("validation regex {pattern} failed to compile: {error}"))
    })
}

fn otp_regex() -> &'static Regex {
    // ASCII digits only; `\d` would admit other Unicode numerals.
    compiled(&OTP_RE, "^[0-9]{6}$")
}

fn email_regex() -> &'static Regex {
    compiled(&EMAIL_RE, r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
}

fn contact_regex() -> &'static Regex {
    compiled(&CONTACT_RE, r"^(09|\+639)[0-9]{9}$")
}

/// Reject empty and whitespace-only strings.
pub fn required(value: &str) -> RuleResult {
    if value.trim().is_empty() {
        Err(RuleViolation::Required)
    } else {
        Ok(())
    }
}

/// Require an optional value, such as an uploaded proof, to be present.
pub fn required_some<T>(value: Option<&T>) -> RuleResult {
    value.map(drop).ok_or(RuleViolation::Required)
}

/// Require exactly `expected` characters once surrounding whitespace is
/// removed.
pub fn exact_length(value: &str, expected: usize) -> RuleResult {
    if value.trim().chars().count() == expected {
        Ok(())
    } else {
        Err(RuleViolation::ExactLength { expected })
    }
}

/// Require at least `min` characters, counting whitespace.
pub fn min_length(value: &str, min: usize) -> RuleResult {
    if value.chars().count() >= min {
        Ok(())
    } else {
        Err(RuleViolation::TooShort { min })
    }
}

/// Require at most `max` characters once trimmed.
pub fn max_length(value: &str, max: usize) -> RuleResult {
    if value.trim().chars().count() <= max {
        Ok(())
    } else {
        Err(RuleViolation::TooLong { max })
    }
}

/// Require a six-digit one-time code.
pub fn otp_code(value: &str) -> RuleResult {
    if otp_regex().is_match(value) {
        Ok(())
    } else {
        Err(RuleViolation::NotNumericCode { digits: OTP_DIGITS })
    }
}

/// Require a `local@domain.tld` address.
pub fn email(value: &str) -> RuleResult {
    if email_regex().is_match(value.trim()) {
        Ok(())
    } else {
        Err(RuleViolation::InvalidEmail)
    }
}

/// Require a Philippine mobile number.
pub fn contact_number(value: &str) -> RuleResult {
    if contact_regex().is_match(value.trim()) {
        Ok(())
    } else {
        Err(RuleViolation::InvalidContactNumber)
    }
}

/// Require `value` to equal `other` exactly.
pub fn matches(value: &str, other: &str, other_label: &'static str) -> RuleResult {
    if value == other {
        Ok(())
    } else {
        Err(RuleViolation::Mismatch { other: other_label })
    }
}

/// Require at least one of `value` and `alternative` to be non-blank.
pub fn either(value: &str, alternative: &str, alternative_label: &'static str) -> RuleResult {
    if value.trim().is_empty() && alternative.trim().is_empty() {
        Err(RuleViolation::MissingAlternative {
            other: alternative_label,
        })
    } else {
        Ok(())
    }
}

/// Require a non-blank value only when `condition` holds.
pub fn required_if(condition: bool, value: &str) -> RuleResult {
    if condition { required(value) } else { Ok(()) }
}

/// Require `date` to be on or after `earlier`.
pub fn not_before(date: NaiveDate, earlier: NaiveDate, earlier_label: &'static str) -> RuleResult {
    if date < earlier {
        Err(RuleViolation::Before {
            other: earlier_label,
        })
    } else {
        Ok(())
    }
}

/// Require `date` to be today or later.
pub fn not_in_past(date: NaiveDate, today: NaiveDate) -> RuleResult {
    if date < today {
        Err(RuleViolation::InPast)
    } else {
        Ok(())
    }
}

/// Require `date` to be today or earlier.
pub fn not_in_future(date: NaiveDate, today: NaiveDate) -> RuleResult {
    if date > today {
        Err(RuleViolation::InFuture)
    } else {
        Ok(())
    }
}

/// Require `value` within `min..=max`.
pub fn within(value: u32, min: u32, max: u32) -> RuleResult {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(RuleViolation::OutOfRange { min, max })
    }
}

/// Normalise an email for duplicate comparisons.
pub fn normalise_email(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    //! Boundary coverage for individual rules.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", false)]
    #[case("   ", false)]
    #[case("\t\n", false)]
    #[case("x", true)]
    #[case("  Juan ", true)]
    fn required_rejects_blank(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(required(value).is_ok(), ok);
    }

    #[rstest]
    #[case("A1B", false)]
    #[case("A1B2", true)]
    #[case(" A1B2 ", true)]
    #[case("A1B2C", false)]
    #[case("", false)]
    fn account_id_needs_exactly_four(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(exact_length(value, ACCOUNT_ID_LENGTH).is_ok(), ok);
    }

    #[rstest]
    #[case("123456", true)]
    #[case("12345", false)]
    #[case("1234567", false)]
    #[case("12345a", false)]
    #[case(" 123456", false)]
    #[case("١٢٣٤٥٦", false)]
    fn otp_requires_six_ascii_digits(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(otp_code(value).is_ok(), ok);
    }

    #[rstest]
    #[case("abcde", false)]
    #[case("abcdef", true)]
    #[case("      ", true)]
    fn password_minimum_counts_characters(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(min_length(value, PASSWORD_MIN).is_ok(), ok);
    }

    #[rstest]
    #[case("juan@example.ph", true)]
    #[case("juan.dela-cruz@mail.barangay.gov.ph", true)]
    #[case("juan@example", false)]
    #[case("juan example@mail.ph", false)]
    #[case("@example.ph", false)]
    #[case("", false)]
    fn email_format(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(email(value).is_ok(), ok);
    }

    #[rstest]
    #[case("09171234567", true)]
    #[case("+639171234567", true)]
    #[case("9171234567", false)]
    #[case("0917123456", false)]
    #[case("0917-123-4567", false)]
    fn contact_number_format(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(contact_number(value).is_ok(), ok);
    }

    #[test]
    fn matches_is_exact() {
        assert!(matches("secret1", "secret1", "Password").is_ok());
        assert_eq!(
            matches("secret1", "Secret1", "Password"),
            Err(RuleViolation::Mismatch { other: "Password" })
        );
    }

    #[rstest]
    #[case("", "", false)]
    #[case("a@b.co", "", true)]
    #[case("", "09171234567", true)]
    #[case(" ", " ", false)]
    fn either_needs_one_value(#[case] value: &str, #[case] other: &str, #[case] ok: bool) {
        assert_eq!(either(value, other, "Contact number").is_ok(), ok);
    }

    #[test]
    fn date_rules_compare_calendar_days() {
        let day = |d| NaiveDate::from_ymd_opt(2026, 3, d).expect("valid date");
        assert!(not_before(day(5), day(5), "Borrow date").is_ok());
        assert!(not_before(day(4), day(5), "Borrow date").is_err());
        assert!(not_in_past(day(5), day(5)).is_ok());
        assert_eq!(not_in_past(day(4), day(5)), Err(RuleViolation::InPast));
        assert_eq!(not_in_future(day(6), day(5)), Err(RuleViolation::InFuture));
    }

    #[test]
    fn within_is_inclusive() {
        assert!(within(1, 1, 3).is_ok());
        assert!(within(3, 1, 3).is_ok());
        assert_eq!(within(0, 1, 3), Err(RuleViolation::OutOfRange { min: 1, max: 3 }));
    }
}
