//! CellBridge Server Binary
//!
//! Starts the HTTP user API in front of the storage gateway.

use std::sync::Arc;

use cellbridge::network::Server;
use cellbridge::{Config, Engine};
use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, EnvFilter};

/// CellBridge Server
#[derive(Parser, Debug)]
#[command(name = "cellbridge-server")]
#[command(about = "REST user API backed by a column-family store's REST gateway")]
#[command(version)]
struct Args {
    /// Storage gateway base URL
    #[arg(short, long, default_value = "http://127.0.0.1:8080", env = "CELLBRIDGE_GATEWAY")]
    gateway: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7070", env = "CELLBRIDGE_LISTEN")]
    listen: String,

    /// Table holding user rows
    #[arg(short, long, default_value = "users", env = "CELLBRIDGE_TABLE")]
    table: String,

    /// Column family for user fields
    #[arg(short = 'f', long, default_value = "info", env = "CELLBRIDGE_FAMILY")]
    family: String,

    /// Rows requested per scanner batch
    #[arg(short, long, default_value = "100", env = "CELLBRIDGE_BATCH")]
    batch: u32,

    /// Gateway request timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0", env = "CELLBRIDGE_TIMEOUT_MS")]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cellbridge=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("CellBridge Server v{}", cellbridge::VERSION);
    tracing::info!("Gateway: {}", args.gateway);
    tracing::info!("Table: {} (family {})", args.table, args.family);

    // Build config from args
    let config = Config::builder()
        .gateway_url(&args.gateway)
        .listen_addr(&args.listen)
        .table_name(&args.table)
        .column_family(&args.family)
        .scan_batch_size(args.batch)
        .request_timeout_ms(args.timeout_ms)
        .build();

    let engine = match Engine::new(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to build engine: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(&config, engine).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.listen_addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run(shutdown_signal()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Received shutdown signal, draining requests...");
}
