//! # cobuy - Co-Purchase Graph Server
//!
//! The main binary for the cobuy co-purchase graph.
//!
//! This application provides:
//! - HTTP JSON API server (axum-based)
//! - CLI interface for one-shot graph queries
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │             apps/cobuy (THE BINARY)           │
//! │                                               │
//! │  ┌─────────────┐    ┌─────────────┐           │
//! │  │   CLI       │    │   HTTP API  │           │
//! │  │  (clap)     │    │   (axum)    │           │
//! │  └──────┬──────┘    └──────┬──────┘           │
//! │         └─────────┬────────┘                  │
//! │                   ▼                           │
//! │           ┌───────────────┐                   │
//! │           │  cobuy-core   │                   │
//! │           │ (THE LOGIC)   │                   │
//! │           └───────────────┘                   │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! cobuy serve --host 0.0.0.0 --port 5000
//!
//! # CLI queries
//! cobuy stats B000123
//! cobuy recommend B000123 --top-n 10
//! cobuy path B000123 B000456
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // COBUY_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("COBUY_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cobuy=info,cobuy_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cobuy::cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cobuy::cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
   ___ ___  _____  _ _  _   _
  / __/ _ \| _ ) | | \ \ / /
 | (_| (_) | _ \ |_| |\ V /
  \___\___/|___/\___/  |_|

  Co-Purchase Graph v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
