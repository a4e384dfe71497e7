//! Asana provider served over MCP.
//!
//! This binary exposes the `asana_project` and `asana_task` resource
//! lifecycles as MCP tools for a declarative orchestration host.
//!
//! # Usage
//!
//! Set the `ASANA_TOKEN` environment variable and run:
//!
//! ```bash
//! export ASANA_TOKEN="your-personal-access-token"
//! asanaprovider
//! ```
//!
//! The server communicates via STDIO using the MCP protocol. Logs go to
//! stderr; set `RUST_LOG` to adjust verbosity.

use asanaprovider::ProviderServer;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "asanaprovider=info";

/// `RUST_LOG` directives when set and valid, otherwise info for this crate.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the MCP transport
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        git_sha = concat!(env!("PROVIDER_GIT_SHA"), env!("PROVIDER_GIT_DIRTY")),
        "asanaprovider starting (stdio transport)"
    );

    let server = ProviderServer::new()?;

    let service = server.serve(stdio()).await?;

    service.waiting().await?;

    Ok(())
}
