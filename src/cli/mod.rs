//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod areas;
pub mod config;
pub mod near;
pub mod serve;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Explore Australia's Indigenous Protected Areas
#[derive(Parser)]
#[command(name = "ipa-explore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List protected areas, optionally filtered by name and state
    Areas(areas::AreasArgs),

    /// Find the protected areas nearest a town
    Near(near::NearArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Areas(args) => areas::run(args).await,
        Commands::Near(args) => near::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` overrides `default_level`.
pub(crate) fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

/// A token cancelled on Ctrl-C
pub(crate) fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    token
}

/// Write output to a file or stdout
pub(crate) fn emit(output: &str, path: Option<&str>) -> crate::error::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, output)?;
            eprintln!("Output written to {}", path);
        }
        None => print!("{}", output),
    }
    Ok(())
}

/// Print the format list
pub(crate) fn print_formats() {
    println!("Available formats:");
    for f in crate::format::available_formats() {
        println!("  {:8} {}", f.name, f.description);
    }
}
