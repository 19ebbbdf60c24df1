//! Asset borrow request form.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::validation::rules::{self, RuleViolation};
use crate::domain::validation::{Field, ValidationErrors, Validator};

/// Asset picker.
pub const ASSET: Field = Field::new("asset", "Item");
/// Quantity field.
pub const QUANTITY: Field = Field::new("quantity", "Quantity");
/// First day of the loan.
pub const BORROW_DATE: Field = Field::new("borrowDate", "Borrow date");
/// Day the items come back.
pub const RETURN_DATE: Field = Field::new("returnDate", "Return date");
/// Reason for borrowing.
pub const PURPOSE: Field = Field::new("purpose", "Purpose");

/// Asset chosen on the borrow screen together with its stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetChoice {
    /// Asset id.
    pub id: String,
    /// Units currently available.
    pub available: u32,
}

/// Borrow request screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BorrowRequestForm {
    /// Selected asset.
    pub asset: Option<AssetChoice>,
    /// Units requested.
    pub quantity: u32,
    /// First day of the loan.
    pub borrow_date: Option<NaiveDate>,
    /// Return day.
    pub return_date: Option<NaiveDate>,
    /// Reason for borrowing.
    pub purpose: String,
}

/// Body of a borrow request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequestPayload {
    /// Asset id.
    pub asset_id: String,
    /// Units requested.
    pub quantity: u32,
    /// First day of the loan.
    pub borrow_date: NaiveDate,
    /// Return day.
    pub return_date: NaiveDate,
    /// Trimmed purpose.
    pub purpose: String,
}

fn required_date(date: Option<NaiveDate>) -> Result<NaiveDate, RuleViolation> {
    date.ok_or(RuleViolation::Required)
}

impl BorrowRequestForm {
    /// Validate and build the request body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when no asset is chosen, the quantity is
    /// outside `1..=available`, the borrow date is in the past, the return
    /// date precedes the borrow date, or the purpose is blank.
    pub fn validate(&self, today: NaiveDate) -> Result<BorrowRequestPayload, ValidationErrors> {
        let mut validator = Validator::new();
        validator.check(ASSET, [rules::required_some(self.asset.as_ref())]);
        if let Some(asset) = &self.asset {
            validator.check(QUANTITY, [rules::within(self.quantity, 1, asset.available)]);
        }
        validator
            .check(
                BORROW_DATE,
                [required_date(self.borrow_date)
                    .and_then(|date| rules::not_in_past(date, today))],
            )
            .check(
                RETURN_DATE,
                [required_date(self.return_date).and_then(|date| match self.borrow_date {
                    Some(borrow_date) => {
                        rules::not_before(date, borrow_date, BORROW_DATE.label())
                    }
                    None => Ok(()),
                })],
            )
            .check(PURPOSE, [rules::required(&self.purpose)]);
        validator.finish()?;

        match (&self.asset, self.borrow_date, self.return_date) {
            (Some(asset), Some(borrow_date), Some(return_date)) => Ok(BorrowRequestPayload {
                asset_id: asset.id.clone(),
                quantity: self.quantity,
                borrow_date,
                return_date,
                purpose: self.purpose.trim().to_owned(),
            }),
            _ => Err(ValidationErrors::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for borrow request rules.

    use rstest::rstest;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).expect("valid date")
    }

    fn form(quantity: u32, borrow: u32, ret: u32) -> BorrowRequestForm {
        BorrowRequestForm {
            asset: Some(AssetChoice {
                id: "chairs".to_owned(),
                available: 40,
            }),
            quantity,
            borrow_date: Some(day(borrow)),
            return_date: Some(day(ret)),
            purpose: "Birthday".to_owned(),
        }
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(40, true)]
    #[case(41, false)]
    fn quantity_is_bounded_by_stock(#[case] quantity: u32, #[case] ok: bool) {
        assert_eq!(form(quantity, 20, 21).validate(day(18)).is_ok(), ok);
    }

    #[test]
    fn return_date_may_not_precede_borrow_date() {
        let errors = form(2, 22, 21).validate(day(18)).expect_err("reversed dates");
        assert_eq!(
            errors.message_for("returnDate").as_deref(),
            Some("Return date must not be earlier than Borrow date")
        );
    }

    #[test]
    fn same_day_return_is_allowed() {
        assert!(form(2, 20, 20).validate(day(18)).is_ok());
    }

    #[test]
    fn borrow_date_may_not_be_past() {
        let errors = form(2, 17, 20).validate(day(18)).expect_err("past date");
        assert!(errors.get("borrowDate").is_some());
    }

    #[test]
    fn missing_asset_skips_quantity_check() {
        let mut request = form(0, 20, 21);
        request.asset = None;
        let errors = request.validate(day(18)).expect_err("no asset");
        assert!(errors.get("asset").is_some());
        assert!(errors.get("quantity").is_none());
    }
}
