//! Command-line entry point: lints `client/src` of the enclosing workspace.

use std::fmt::Display;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};

/// Workspace member holding the layered client crate.
const CLIENT_DIR: &str = "client";

fn main() -> ExitCode {
    let Some(root) = locate_workspace() else {
        report(&"unable to locate the workspace root (no Cargo.toml declaring [workspace])");
        return ExitCode::FAILURE;
    };
    match architecture_lint::lint_client_sources(&root.join(CLIENT_DIR)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn report(message: &dyn Display) {
    writeln!(io::stderr().lock(), "{message}").ok();
}

/// Search upwards from `CARGO_WORKSPACE_DIR`, the working directory and
/// this crate's manifest directory, in that order.
fn locate_workspace() -> Option<Utf8PathBuf> {
    let starts = [
        std::env::var("CARGO_WORKSPACE_DIR")
            .ok()
            .map(Utf8PathBuf::from),
        std::env::current_dir()
            .ok()
            .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok()),
        Some(Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    ];
    starts.into_iter().flatten().find_map(|start| {
        start
            .ancestors()
            .find(|dir| declares_workspace(dir))
            .map(Utf8Path::to_path_buf)
    })
}

fn declares_workspace(dir: &Utf8Path) -> bool {
    fs::read_to_string(dir.join("Cargo.toml"))
        .is_ok_and(|manifest| manifest.lines().any(|line| line.trim() == "[workspace]"))
}
