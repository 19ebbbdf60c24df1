//! Per-screen forms.
//!
//! Each form holds the raw input of one screen and exposes `validate`,
//! which either yields the request body for the matching portal service or
//! the [`ValidationErrors`](crate::domain::validation::ValidationErrors) to
//! render. Nothing here touches the network.

pub mod account;
pub mod borrowing;
pub mod complaints;
pub mod documents;
pub mod eligibility;
pub mod household;
pub mod profile;
pub mod signup;

pub use self::account::{
    ActivationForm, ActivationPayload, ChangePasswordForm, ChangePasswordPayload,
    ForgotPasswordForm, LoginForm, LoginPayload, NewPasswordForm, OtpForm,
};
pub use self::borrowing::{AssetChoice, BorrowRequestForm, BorrowRequestPayload};
pub use self::complaints::{ComplaintForm, ComplaintPayload};
pub use self::documents::{DocumentRequestForm, DocumentRequestPayload};
pub use self::eligibility::{Attachment, GatedStatus, ResidentStatus, StatusPayload};
pub use self::household::{HouseholdMemberForm, MemberPayload, Relationship, Sex};
pub use self::profile::{ProfileForm, ProfilePayload};
pub use self::signup::{SignupForm, SignupPayload};
