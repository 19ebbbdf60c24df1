//! Unit tests for the architecture lint.

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest::rstest;

use super::*;

#[derive(Clone, Copy)]
struct LintSingle;

impl LintSingle {
    fn lint(self, file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
        lint_sources(&[LintSource {
            file: Utf8PathBuf::from(file),
            contents: contents.to_owned(),
        }])
    }
}

#[fixture]
fn lint_single() -> LintSingle {
    LintSingle
}

#[rstest]
#[case(
    "services/profile.rs",
    "use crate::domain::ports::ApiGateway; fn call(_g: &dyn ApiGateway) {}",
    true
)]
#[case(
    "services/profile.rs",
    "use crate::outbound::HttpGateway; fn build() { let _ = HttpGateway::new; }",
    false
)]
#[case(
    "services/profile.rs",
    "use outbound::http::HttpGateway; fn build() {}",
    false
)]
#[case(
    "services/profile.rs",
    "use portal_client::outbound::FileSessionStore; fn build() {}",
    false
)]
#[case(
    "services/profile.rs",
    "fn client() { let _ = reqwest::Client::new(); }",
    false
)]
#[case(
    "domain/session.rs",
    "use crate::services::AuthService; fn thing() {}",
    false
)]
#[case(
    "domain/session.rs",
    "use cap_std::fs::Dir; fn thing(_dir: Dir) {}",
    false
)]
#[case(
    "domain/request.rs",
    "use crate::config::ClientSettings; fn thing() {}",
    false
)]
#[case(
    "domain/request.rs",
    "struct Holder { config: u8 } fn thing(config: u8) -> Holder { Holder { config } }",
    true
)]
#[case(
    "outbound/http/gateway.rs",
    "use crate::services::ServiceError; fn thing() {}",
    false
)]
#[case(
    "outbound/http/gateway.rs",
    "use reqwest::Client; use crate::domain::GatewayError; fn thing() {}",
    true
)]
fn detects_boundary_violations(
    lint_single: LintSingle,
    #[case] file: &str,
    #[case] contents: &str,
    #[case] ok: bool,
) {
    let result = lint_single.lint(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
fn files_outside_known_layers_are_rejected(lint_single: LintSingle) {
    let result = lint_single.lint("bin/portal.rs", "fn main() {}");
    assert!(matches!(result, Err(ArchitectureLintError::Parse { .. })));
}
