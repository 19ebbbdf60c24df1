//! Repo-local architectural lint for the portal client's layering.
//!
//! The client is split into a transport-free `domain` (request descriptors,
//! errors, session state, forms and the ports), `services` that drive the
//! ports, and `outbound` adapters that implement them. This crate provides a
//! lightweight lint that:
//!
//! - forbids `domain` code from depending on `services`, `outbound`, or
//!   transport and filesystem crates
//! - forbids `services` from importing `outbound` adapters or transport
//!   crates directly
//! - forbids `outbound` adapters from importing `services`
//!
//! The lint is executed via `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use syn::visit::{self, Visit};
use thiserror::Error;

/// Name the client crate is imported under from its own binaries and tests.
const CRATE_ROOT: &str = "portal_client";

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}: {message}")]
pub struct Violation {
    /// File path relative to `client/src`.
    pub file: Utf8PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

/// Failure modes returned by the architecture lint.
#[derive(Debug, Error)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    #[error("I/O error while linting architecture: {0}")]
    Io(#[from] io::Error),
    /// Rust source parsing failed, or the file sits outside every layer.
    #[error("failed to lint {file}: {message}")]
    Parse {
        /// File that could not be linted.
        file: Utf8PathBuf,
        /// Parser or layout message.
        message: String,
    },
    /// One or more boundary violations were found.
    #[error("architecture boundary violations:\n{}", bulleted(.0))]
    Violations(Vec<Violation>),
}

fn bulleted(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("- {violation}\n"))
        .collect()
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `client/src`.
    pub file: Utf8PathBuf,
    /// File contents.
    pub contents: String,
}

/// Lint the client crate sources on disk.
///
/// `client_dir` must be the `client/` directory at the repository root. Files
/// directly under `src/` (the crate root, `config.rs`, binaries) are wiring
/// and are not linted.
///
/// # Errors
///
/// Returns [`ArchitectureLintError::Violations`] when any layer reaches across
/// a boundary, or an I/O or parse error when the sources cannot be read.
pub fn lint_client_sources(client_dir: &Utf8Path) -> Result<(), ArchitectureLintError> {
    let src_dir = Dir::open_ambient_dir(client_dir.join("src"), ambient_authority())?;
    let mut sources = Vec::new();
    for layer in ModuleLayer::ALL {
        let Ok(layer_dir) = src_dir.open_dir(layer.dir_name()) else {
            continue;
        };
        collect_sources(&layer_dir, Utf8Path::new(layer.dir_name()), &mut sources)?;
    }
    lint_sources(&sources)
}

/// Lint the provided Rust sources. Intended for unit and behaviour tests.
///
/// # Errors
///
/// Fails as [`lint_client_sources`] does; a file whose path names no known
/// layer is reported as [`ArchitectureLintError::Parse`].
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let parse_error = |message: String| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message,
        };
        let layer = ModuleLayer::of_file(&source.file)
            .ok_or_else(|| parse_error("file is not under domain/, services/ or outbound/".to_owned()))?;
        let parsed = syn::parse_file(&source.contents).map_err(|err| parse_error(err.to_string()))?;
        violations.extend(violations_in(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// The architectural layer a file under `client/src` belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleLayer {
    Domain,
    Services,
    Outbound,
}

impl ModuleLayer {
    const ALL: [Self; 3] = [Self::Domain, Self::Services, Self::Outbound];

    fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|layer| layer.dir_name() == name)
    }

    fn of_file(relative_path: &Utf8Path) -> Option<Self> {
        Self::from_dir_name(relative_path.components().next()?.as_str())
    }

    const fn dir_name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Services => "services",
            Self::Outbound => "outbound",
        }
    }

    const fn forbidden_modules(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["services", "outbound", "config"],
            Self::Services => &["outbound", "config"],
            Self::Outbound => &["services"],
        }
    }

    const fn forbidden_crates(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &[
                "actix_web",
                "cap_std",
                "clap",
                "color_eyre",
                "ortho_config",
                "reqwest",
                "tracing_subscriber",
            ],
            Self::Services => &[
                "actix_web",
                "cap_std",
                "clap",
                "color_eyre",
                "reqwest",
                "tracing_subscriber",
            ],
            Self::Outbound => &["actix_web", "clap", "color_eyre"],
        }
    }

    fn forbids(self, dependency: Dependency<'_>) -> bool {
        let (forbidden, name) = match dependency {
            Dependency::Module(name) => (self.forbidden_modules(), name),
            Dependency::Crate(name) => (self.forbidden_crates(), name),
        };
        forbidden.iter().any(|entry| *entry == name)
    }
}

/// What the leading segments of a path refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dependency<'a> {
    /// A top-level module of the client crate.
    Module(&'a str),
    /// An external crate, or a bare identifier that may be one.
    Crate(&'a str),
}

impl<'a> Dependency<'a> {
    fn classify(segments: &'a [String]) -> Option<Self> {
        let (first, rest) = segments.split_first()?;
        match first.as_str() {
            "crate" | "self" | "super" => rest
                .iter()
                .find(|segment| !matches!(segment.as_str(), "self" | "super"))
                .map(|segment| Self::Module(segment.as_str())),
            CRATE_ROOT => rest.first().map(|segment| Self::Module(segment.as_str())),
            root if ModuleLayer::from_dir_name(root).is_some() => Some(Self::Module(root)),
            root => Some(Self::Crate(root)),
        }
    }

    fn describe(self, layer: ModuleLayer) -> String {
        let layer_name = layer.dir_name();
        match self {
            Self::Module(name) => format!("{layer_name} module must not depend on crate::{name}"),
            Self::Crate(name) => {
                format!("{layer_name} module must not depend on external crate `{name}`")
            }
        }
    }
}

fn violations_in(file: &Utf8Path, layer: ModuleLayer, parsed: &syn::File) -> Vec<Violation> {
    let mut collector = ReferenceCollector::default();
    collector.visit_file(parsed);

    let messages: BTreeSet<String> = collector
        .references
        .iter()
        .filter_map(|segments| Dependency::classify(segments.as_slice()))
        .filter(|dependency| layer.forbids(*dependency))
        .map(|dependency| dependency.describe(layer))
        .collect();

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

/// Every path a file mentions, with `use` trees expanded to one entry per leaf.
#[derive(Default)]
struct ReferenceCollector {
    references: BTreeSet<Vec<String>>,
}

impl ReferenceCollector {
    fn collect_use(&mut self, tree: &syn::UseTree) {
        let mut pending = vec![(Vec::new(), tree)];
        while let Some((mut prefix, node)) = pending.pop() {
            match node {
                syn::UseTree::Path(path) => {
                    prefix.push(path.ident.to_string());
                    pending.push((prefix, &*path.tree));
                }
                syn::UseTree::Name(syn::UseName { ident })
                | syn::UseTree::Rename(syn::UseRename { ident, .. }) => {
                    prefix.push(ident.to_string());
                    self.references.insert(prefix);
                }
                syn::UseTree::Glob(_) => {
                    prefix.push("*".to_owned());
                    self.references.insert(prefix);
                }
                syn::UseTree::Group(group) => {
                    pending.extend(group.items.iter().map(|item| (prefix.clone(), item)));
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for ReferenceCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.references.insert(segments);
        }
        visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.collect_use(&node.tree);
    }
}

fn collect_sources(
    dir: &Dir,
    relative: &Utf8Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for item in dir.entries()? {
        let entry = item?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let path = relative.join(&name);
        if entry.file_type()?.is_dir() {
            collect_sources(&entry.open_dir()?, &path, sources)?;
        } else if path.extension() == Some("rs") {
            let contents = dir.read_to_string(&name)?;
            sources.push(LintSource {
                file: path,
                contents,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
