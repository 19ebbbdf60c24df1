//! Command-line access to the barangay resident portal.
//!
//! # Examples
//! ```sh
//! printf '%s\n' "$PASSWORD" | portal login --email juan@example.ph
//! portal hotlines
//! portal assets --search tent
//! portal budget --year 2026
//! ```

use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use chrono::Datelike;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use portal_client::config::ClientSettings;
use portal_client::domain::SessionContext;
use portal_client::domain::forms::LoginForm;
use portal_client::outbound::{FileSessionStore, HttpGateway};
use portal_client::services::{Portal, ServiceError};
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroizing;

/// `portal` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "portal",
    about = "Barangay resident portal client",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in; the password is read from the first line of stdin.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show the signed-in resident.
    Whoami,
    /// List emergency hotlines.
    Hotlines,
    /// Search borrowable assets.
    Assets {
        /// Name filter; lists everything when omitted.
        #[arg(long, default_value = "")]
        search: String,
    },
    /// List notifications.
    Notifications {
        /// One-based page number.
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Print only the unread count.
        #[arg(long)]
        unread: bool,
    },
    /// Show budget allocations.
    Budget {
        /// Fiscal year; defaults to the current year.
        #[arg(long)]
        year: Option<i32>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = ClientSettings::load_from_iter([OsString::from("portal")])
        .wrap_err("failed to load portal settings")?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    runtime.block_on(run(args.command, &settings))
}

fn build_portal(settings: &ClientSettings) -> Result<Portal> {
    let store = FileSessionStore::open(&settings.session_dir())
        .wrap_err("failed to open session directory")?;
    let session = SessionContext::new(Arc::new(store));
    let base_url = settings.base_url().wrap_err("invalid PORTAL_BASE_URL")?;
    let gateway = HttpGateway::new(base_url, settings.request_timeout(), session.clone())
        .wrap_err("failed to build HTTP client")?;
    Ok(Portal::new(Arc::new(gateway), session, Arc::new(DefaultClock))
        .with_search_debounce(settings.search_debounce()))
}

async fn run(command: Command, settings: &ClientSettings) -> Result<()> {
    let portal = build_portal(settings)?;
    let mut out = io::stdout().lock();
    match command {
        Command::Login { email } => {
            let password = read_password()?;
            let form = LoginForm {
                email,
                password: password.as_str().to_owned(),
            };
            let session = portal.auth().login(&form).await.map_err(report)?;
            writeln!(out, "signed in as {}", session.email())?;
        }
        Command::Logout => {
            portal.auth().logout().map_err(report)?;
            writeln!(out, "signed out")?;
        }
        Command::Whoami => {
            let resident = portal.profile().current().await.map_err(report)?;
            writeln!(out, "{} <{}>", resident.display_name(), resident.account_id)?;
        }
        Command::Hotlines => {
            for hotline in portal.hotlines().list().await.map_err(report)? {
                writeln!(out, "{}\t{}", hotline.name, hotline.number)?;
            }
        }
        Command::Assets { search } => {
            let found = portal.asset_search().run(&search).await.map_err(report)?;
            for asset in found.unwrap_or_default() {
                writeln!(out, "{}\t{}", asset.name, asset.available_quantity)?;
            }
        }
        Command::Notifications { page, unread } => {
            let notifications = portal.notifications();
            if unread {
                let count = notifications.unread_count().await.map_err(report)?;
                writeln!(out, "{count}")?;
            } else {
                let listed = notifications.list(page).await.map_err(report)?;
                for notification in &listed.items {
                    let marker = if notification.is_read { ' ' } else { '*' };
                    writeln!(out, "{marker} {}\t{}", notification.title, notification.message)?;
                }
                writeln!(out, "page {} of {}", listed.page, listed.total_pages)?;
            }
        }
        Command::Budget { year } => {
            let fiscal_year = year.unwrap_or_else(|| DefaultClock.local().year());
            for line in portal.budget().allocations(fiscal_year).await.map_err(report)? {
                writeln!(
                    out,
                    "{}\t{}\t{}",
                    line.category,
                    line.amount,
                    line.remaining()
                )?;
            }
        }
    }
    Ok(())
}

fn read_password() -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    io::stdin()
        .lock()
        .read_line(&mut line)
        .wrap_err("failed to read password from stdin")?;
    let trimmed = line.trim_end_matches(['\r', '\n']);
    Ok(Zeroizing::new(trimmed.to_owned()))
}

fn report(error: ServiceError) -> color_eyre::Report {
    let notice = error.notice();
    if error.requires_login() {
        return eyre!("{}: {} Run `portal login` again.", notice.title(), notice.message());
    }
    eyre!("{}: {}", notice.title(), notice.message())
}
