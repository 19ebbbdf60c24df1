//! Portal records as returned by the backend.
//!
//! Records decode leniently: the backend's `_id` maps to `id`, and fields a
//! screen can live without default when absent so a partially populated
//! document never fails a whole list.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use super::forms::{Relationship, Sex};
use super::money::Pesos;

/// Lifecycle of a document request, complaint or borrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Submitted, awaiting staff review.
    #[default]
    Pending,
    /// Accepted by staff.
    Approved,
    /// Being worked on.
    Processing,
    /// Ready for pickup or resolved.
    Completed,
    /// Declined by staff.
    Rejected,
    /// Withdrawn by the resident.
    Cancelled,
    /// Borrowed items returned.
    Returned,
    /// Status the client does not know yet.
    #[serde(other)]
    Unknown,
}

/// Signed-in resident profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    /// Record id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Four-character account id printed on the barangay record.
    #[serde(default)]
    pub account_id: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Middle name.
    #[serde(default)]
    pub middle_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact number.
    #[serde(default)]
    pub contact_number: Option<String>,
    /// Birth date.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Sex.
    #[serde(default)]
    pub sex: Option<Sex>,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Purok.
    #[serde(default)]
    pub purok: String,
    /// Registered voter.
    #[serde(default)]
    pub is_voter: bool,
    /// Senior citizen.
    #[serde(default)]
    pub is_senior_citizen: bool,
}

impl Resident {
    /// "First Last" as shown in headers.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

/// Household member record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdMember {
    /// Record id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Relationship to the head.
    #[serde(default)]
    pub relationship: Option<Relationship>,
    /// Description when the relationship is "Other".
    #[serde(default)]
    pub specify_relationship: Option<String>,
    /// Birth date.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Email.
    #[serde(default)]
    pub email: Option<String>,
}

/// Household headed by the signed-in resident.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    /// Record id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Household number assigned by the barangay.
    #[serde(default)]
    pub household_number: Option<String>,
    /// Members other than the head.
    #[serde(default)]
    pub members: Vec<HouseholdMember>,
}

/// Document the barangay issues.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentType {
    /// Record id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Fee charged at release.
    #[serde(default)]
    pub fee: Pesos,
    /// Requirements residents must bring.
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Purposes offered in the picker.
    #[serde(default)]
    pub purposes: Vec<String>,
}

/// A resident's document request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    /// Record id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Requested document name.
    #[serde(default)]
    pub document_type: String,
    /// Stated purpose.
    #[serde(default)]
    pub purpose: String,
    /// Copies requested.
    #[serde(default)]
    pub copies: u32,
    /// Current status.
    #[serde(default)]
    pub status: RequestStatus,
    /// Staff remarks, if any.
    #[serde(default)]
    pub remarks: Option<String>,
    /// Submission time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl DocumentRequest {
    /// Residents may only withdraw requests staff have not acted on.
    pub fn can_cancel(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

/// A resident's complaint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    /// Record id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Category.
    #[serde(default)]
    pub category: String,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Current status.
    #[serde(default)]
    pub status: RequestStatus,
    /// Staff response, if any.
    #[serde(default)]
    pub response: Option<String>,
    /// Filing time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Borrowable barangay property.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Record id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Units currently available to borrow.
    #[serde(default)]
    pub available_quantity: u32,
    /// Units owned.
    #[serde(default)]
    pub total_quantity: u32,
}

/// A resident's borrow request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Borrowing {
    /// Record id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Borrowed asset name.
    #[serde(default)]
    pub asset_name: String,
    /// Units borrowed.
    #[serde(default)]
    pub quantity: u32,
    /// First day of the loan.
    #[serde(default)]
    pub borrow_date: Option<NaiveDate>,
    /// Agreed return day.
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    /// Current status.
    #[serde(default)]
    pub status: RequestStatus,
}

/// Budget line for one fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAllocation {
    /// Record id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Spending category.
    pub category: String,
    /// Details.
    #[serde(default)]
    pub description: String,
    /// Allocated amount.
    #[serde(default)]
    pub amount: Pesos,
    /// Amount used so far.
    #[serde(default)]
    pub spent: Pesos,
    /// Fiscal year.
    #[serde(default)]
    pub fiscal_year: i32,
}

impl BudgetAllocation {
    /// Amount not yet used.
    #[must_use]
    pub const fn remaining(&self) -> Pesos {
        self.amount.saturating_sub(self.spent)
    }
}

/// In-app notification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Record id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub message: String,
    /// Whether the resident opened it.
    #[serde(default, alias = "read")]
    pub is_read: bool,
    /// Delivery time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Unread notification badge count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UnreadCount {
    /// Unread notifications.
    #[serde(default)]
    pub count: u64,
}

/// Emergency hotline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotline {
    /// Record id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Agency or office.
    pub name: String,
    /// Number to dial.
    pub number: String,
    /// Grouping such as police or fire.
    #[serde(default)]
    pub category: Option<String>,
}
