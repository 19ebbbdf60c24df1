//! Behaviour tests for signup validation.
//!
//! These scenarios check that household-level rules run before any request
//! is issued and that age-gated voter details follow the birth date.
#![expect(clippy::expect_used, reason = "test assertions")]

use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use portal_client::domain::forms::eligibility::GatedStatus;
use portal_client::domain::forms::{Attachment, Relationship, SignupForm, Sex};
use portal_client::domain::ports::{ApiGateway, InMemorySessionStore};
use portal_client::domain::{ApiRequest, GatewayError, Session, SessionContext};
use portal_client::services::{AuthService, ServiceError, ServiceResult};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
}

#[derive(Default)]
struct CountingGateway {
    calls: AtomicUsize,
}

#[async_trait]
impl ApiGateway for CountingGateway {
    async fn send(&self, _request: ApiRequest) -> Result<Value, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "_id": "u1", "email": "juan@example.ph", "token": "tok" }))
    }
}

struct SignupWorld {
    form: RefCell<SignupForm>,
    gateway: Arc<CountingGateway>,
    outcome: RefCell<Option<ServiceResult<Session>>>,
}

impl SignupWorld {
    fn new() -> Self {
        Self {
            form: RefCell::new(SignupForm::default()),
            gateway: Arc::new(CountingGateway::default()),
            outcome: RefCell::new(None),
        }
    }

    fn submit(&self) {
        let session = SessionContext::new(Arc::new(InMemorySessionStore::default()));
        let service = AuthService::new(self.gateway.clone(), session, Arc::new(FixtureClock));
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime builds");
        let form = self.form.borrow().clone();
        let result = runtime.block_on(service.signup(&form));
        *self.outcome.borrow_mut() = Some(result);
    }

    fn calls(&self) -> usize {
        self.gateway.calls.load(Ordering::SeqCst)
    }
}

#[fixture]
fn world() -> SignupWorld {
    SignupWorld::new()
}

#[given("a household head registering with email {email}")]
fn a_household_head_registering(world: &SignupWorld, email: String) {
    let mut form = world.form.borrow_mut();
    form.first_name = "Juan".to_owned();
    form.last_name = "Dela Cruz".to_owned();
    form.sex = Some(Sex::Male);
    form.email = email;
    form.address = "12 Mabini St.".to_owned();
    form.purok = "3".to_owned();
    form.password = "abcdef".to_owned();
    form.confirm_password = "abcdef".to_owned();
    form.status
        .set_date_of_birth(NaiveDate::from_ymd_opt(1985, 7, 4), today());
}

#[given("a household member {name} with email {email}")]
fn a_household_member(world: &SignupWorld, name: String, email: String) {
    let mut form = world.form.borrow_mut();
    let member = form.add_member();
    member.first_name = name;
    member.last_name = "Dela Cruz".to_owned();
    member.sex = Some(Sex::Female);
    member.relationship = Some(Relationship::Child);
    member.email = email;
    member
        .status
        .set_date_of_birth(NaiveDate::from_ymd_opt(2012, 2, 2), today());
}

#[given("the head is a registered voter with ID {voter_id}")]
fn the_head_is_a_registered_voter(world: &SignupWorld, voter_id: String) {
    let mut form = world.form.borrow_mut();
    form.status
        .set_enabled(GatedStatus::Voter, true, today())
        .expect("adult may register as voter");
    form.status.set_id_number(GatedStatus::Voter, voter_id);
    form.status.set_proof(
        GatedStatus::Voter,
        Some(Attachment::new(
            "file:///voter.jpg",
            "voter.jpg",
            "image/jpeg",
        )),
    );
    assert!(form.status.voter().proof().is_some());
}

#[when("the signup form is submitted")]
fn the_signup_form_is_submitted(world: &SignupWorld) {
    world.submit();
}

#[when("the head's date of birth changes to {date}")]
fn the_heads_date_of_birth_changes(world: &SignupWorld, date: NaiveDate) {
    world
        .form
        .borrow_mut()
        .status
        .set_date_of_birth(Some(date), today());
}

#[when("the head switches the voter toggle off")]
fn the_head_switches_the_voter_toggle_off(world: &SignupWorld) {
    world
        .form
        .borrow_mut()
        .status
        .set_enabled(GatedStatus::Voter, false, today())
        .expect("switching off always succeeds");
}

#[then("no request reaches the portal")]
fn no_request_reaches_the_portal(world: &SignupWorld) {
    assert_eq!(world.calls(), 0);
}

#[then("one request reaches the portal")]
fn one_request_reaches_the_portal(world: &SignupWorld) {
    assert_eq!(world.calls(), 1);
    let outcome = world.outcome.borrow();
    assert!(matches!(outcome.as_ref(), Some(Ok(_))));
}

#[then("the signup is rejected naming {email}")]
fn the_signup_is_rejected_naming(world: &SignupWorld, email: String) {
    let outcome = world.outcome.borrow();
    let Some(Err(ServiceError::Invalid(errors))) = outcome.as_ref() else {
        panic!("expected a validation failure");
    };
    let message = errors
        .get_at("email", Some(1))
        .map(|error| error.message())
        .expect("second member's email is flagged");
    assert!(message.contains(&email), "{message}");
}

#[then("the voter ID and proof are cleared")]
fn the_voter_id_and_proof_are_cleared(world: &SignupWorld) {
    let form = world.form.borrow();
    let voter = form.status.voter();
    assert!(!voter.is_enabled());
    assert!(voter.id_number().is_empty());
    assert!(voter.proof().is_none());
}

#[then("switching the voter toggle back on is refused")]
fn switching_the_voter_toggle_back_on_is_refused(world: &SignupWorld) {
    let mut form = world.form.borrow_mut();
    assert!(
        form.status
            .set_enabled(GatedStatus::Voter, true, today())
            .is_err()
    );
    assert!(!form.status.voter().is_enabled());
}

#[scenario(
    path = "tests/features/signup_validation.feature",
    name = "Household members sharing an email are rejected"
)]
fn household_members_sharing_an_email_are_rejected(world: SignupWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/signup_validation.feature",
    name = "A valid household is sent to the portal"
)]
fn a_valid_household_is_sent_to_the_portal(world: SignupWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/signup_validation.feature",
    name = "Voter details are cleared once the head is under age"
)]
fn voter_details_are_cleared_once_the_head_is_under_age(world: SignupWorld) {
    drop(world);
}
