//! dgl: drag a gif from your Dropbox folder into the terminal, get a public
//! link on the clipboard.
//!
//! # Usage
//!
//! ```text
//! dgl [url|md|markdown|bbcode] [--config <path>] [-v...]
//! ```
//!
//! Reads one path per line from stdin. Type `help` at the prompt for the
//! command list. Logs go to stderr (`RUST_LOG` overrides `-v`).

mod clipboard;
mod commands;
mod messages;
mod mode;
mod session;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use dgl_core::{Config, ConfigProvider};
use dgl_remote::DropboxClient;
use dgl_store::HttpProbe;
use dgl_sync::Reconciler;

use clipboard::SystemClipboard;
use mode::Mode;
use session::Session;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "dgl",
    version,
    about = "Turn gifs in your Dropbox folder into shareable links",
    long_about = None,
)]
struct Cli {
    /// Snippet copied to the clipboard.
    #[arg(value_enum, default_value_t = Mode::Url)]
    mode: Mode,

    /// Config file to use instead of ~/.dgl.json.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    config.validate().context("invalid configuration")?;

    let client = DropboxClient::new(config.clone());
    let mut reconciler = Reconciler::from_config(&config, client, HttpProbe::new());
    reconciler.count().with_context(|| {
        format!(
            "error initiating database at {}",
            config.database_path().display()
        )
    })?;

    let mut session = Session::new(reconciler, SystemClipboard::new(), cli.mode, config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session.run(stdin.lock(), &mut stdout)
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    let config = match explicit {
        Some(path) => Config::load_from(path, &home),
        None => Config::load_at(&home),
    };
    config.context("failed to load configuration")
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}
