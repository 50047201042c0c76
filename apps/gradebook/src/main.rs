//! # Gradebook Server
//!
//! The main binary for the Gradebook registry.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for offline roster checks
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 apps/gradebook (THE BINARY)              │
//! │                                                          │
//! │      ┌─────────────┐            ┌─────────────┐          │
//! │      │    CLI      │            │  HTTP API   │          │
//! │      │   (clap)    │            │   (axum)    │          │
//! │      └──────┬──────┘            └──────┬──────┘          │
//! │             └────────────┬─────────────┘                 │
//! │                          ▼                               │
//! │                ┌──────────────────┐                      │
//! │                │  gradebook-core  │                      │
//! │                │   (THE LOGIC)    │                      │
//! │                └──────────────────┘                      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server, seeded from a roster file
//! gradebook server --host 0.0.0.0 --port 8080 --seed roster.json
//!
//! # Offline checks
//! gradebook check -f roster.json
//! gradebook average -f roster.json --student 1 --subject 1
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // GRADEBOOK_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("GRADEBOOK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gradebook=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!(kind = e.kind_tag(), "Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Gradebook startup banner.
fn print_banner() {
    println!(
        r#"
   ____               _      _                 _
  / ___|_ __ __ _  __| | ___| |__   ___   ___ | | __
 | |  _| '__/ _` |/ _` |/ _ \ '_ \ / _ \ / _ \| |/ /
 | |_| | | | (_| | (_| |  __/ |_) | (_) | (_) |   <
  \____|_|  \__,_|\__,_|\___|_.__/ \___/ \___/|_|\_\

  Gradebook Server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
