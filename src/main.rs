//! post-store - interactive CLI for captioned image posts.
//!
//! Opens the SQLite file once, selects a user, then runs the menu loop on
//! stdin/stdout. Logs go to stderr.
//!
//! CHANGELOG:
//! - 10/17/2026 - --compact flag; viewer owns its temp files for the run
//! - 10/17/2026 - Initial CLI with clap flags and tracing

use anyhow::{Context, Result};
use clap::Parser;
use post_store::config::{self, Settings, DEFAULT_MAX_ATTEMPTS};
use post_store::db::connection;
use post_store::display::{ImageViewer, NoViewer, SystemViewer};
use post_store::output::OutputControls;
use post_store::session::Session;
use std::path::PathBuf;
use std::process::ExitCode;

/// Store and browse captioned image posts in a local SQLite file.
#[derive(Parser, Debug)]
#[command(name = "post-store")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Database file (default: $POST_STORE_DB or ./posts_data.db)
    #[arg(long)]
    db: Option<PathBuf>,

    /// User ID to act as (prompted when omitted)
    #[arg(short, long)]
    user: Option<String>,

    /// Create the --user namespace if it does not exist
    #[arg(long, requires = "user")]
    create: bool,

    /// Do not open images in the system viewer
    #[arg(long)]
    no_display: bool,

    /// Print post listings as JSON (image bytes omitted)
    #[arg(long)]
    json: bool,

    /// Compact JSON output (no whitespace)
    #[arg(long, requires = "json")]
    compact: bool,

    /// Invalid answers allowed per prompt before the action is abandoned
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let db_path = config::resolve_db_path(cli.db);
    let conn = connection::open(&db_path)
        .with_context(|| format!("Failed to open posts database at {:?}", db_path))?;

    let settings = Settings {
        user: cli.user,
        create_user: cli.create,
        display_images: !cli.no_display,
        output: OutputControls {
            json: cli.json,
            compact: cli.compact,
        },
        max_attempts: cli.max_attempts,
    };

    let system_viewer = SystemViewer::default();
    let viewer: &dyn ImageViewer = if settings.display_images {
        &system_viewer
    } else {
        &NoViewer
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut session = Session::new(&conn, viewer, settings, stdin.lock(), stdout.lock());
    session.run().context("Session aborted")?;
    Ok(())
}
