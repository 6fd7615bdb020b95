//! ipa-explore CLI entry point
//!
//! Indigenous Protected Areas explorer - CLI + web API

use ipa_explore::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
