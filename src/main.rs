use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hbnb::config::Config;
use hbnb::console::Console;
use hbnb::storage::FileStorage;

#[derive(Parser)]
#[command(name = "hbnb")]
#[command(about = "Command shell for creating, inspecting, updating and deleting HBnB records")]
struct Cli {
    /// Backing JSON file (overrides config and HBNB_FILE)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Refuse to start if any stored entry cannot be read
    #[arg(long)]
    strict: bool,

    /// Log filter used when RUST_LOG is unset, e.g. `hbnb_core=debug`
    #[arg(long)]
    log_filter: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(file) = self.file {
            config.file_path = file;
        }
        if self.strict {
            config.strict_reload = true;
        }
        if let Some(filter) = self.log_filter {
            config.log_filter = filter;
        }
    }
}

/// Logs go to stderr so stdout carries only shell output.
fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env(|name| std::env::var(name).ok())?;
    cli.apply(&mut config);
    init_tracing(&config.log_filter);

    let mut storage = FileStorage::new(&config.file_path).with_policy(config.reload_policy());
    let report = storage
        .reload()
        .with_context(|| format!("Failed to load {}", config.file_path.display()))?;
    tracing::info!(
        path = %config.file_path.display(),
        loaded = report.loaded,
        skipped = report.skipped.len(),
        "storage ready"
    );

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut console = Console::new(&mut storage, io::stdout().lock()).with_prompt(interactive);
    console.run(stdin.lock())?;

    Ok(())
}
