//! pagedeck server
//!
//! A no-frills web application for editing PDF pages: upload a document,
//! delete/rotate/reorder pages from a placeholder page list (no
//! thumbnails), download the result. Page mutations are delegated to
//! `pagedeck-core`; this binary is the HTTP flow around them.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod handlers;
mod models;
mod state;
mod views;

use state::AppState;

/// Command-line arguments for the pagedeck server
#[derive(Parser, Debug)]
#[command(name = "pagedeck-server")]
#[command(about = "No-frills web editor for PDF pages")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5001")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Directory for uploaded documents
    #[arg(long, default_value = "uploads")]
    upload_dir: PathBuf,

    /// Upload size limit in megabytes
    #[arg(long, default_value = "20")]
    max_upload_mb: u64,

    /// Hours before an untouched session is expired and removed
    #[arg(long, default_value = "24")]
    session_ttl_hours: i64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Build the application router. Separate from `main` so tests can drive
/// the full middleware stack in-process.
pub fn router(state: AppState) -> Router {
    let max_upload_bytes = state.max_upload_mb as usize * 1024 * 1024;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Upload flow
        .route("/", get(handlers::index))
        .route("/upload", post(handlers::upload))
        // Editing
        .route("/edit/:id", get(handlers::edit))
        .route("/edit/:id/rotate/:page", post(handlers::rotate))
        .route("/edit/:id/delete/:page", post(handlers::delete))
        .route("/edit/:id/move/:page", post(handlers::move_page))
        // Download
        .route("/download/:id", get(handlers::download))
        // Apply middleware
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::new(
        args.upload_dir.clone(),
        args.session_ttl_hours,
        args.max_upload_mb,
    )?;

    // Clear out sessions left behind by earlier runs
    match state.sweep_expired().await {
        Ok(0) => {}
        Ok(removed) => info!("Swept {} stale upload files", removed),
        Err(e) => warn!("Startup sweep failed: {}", e),
    }

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("pagedeck listening on http://{}", addr);
    info!(
        "Upload dir: {}, limit: {} MB, session TTL: {} h",
        args.upload_dir.display(),
        args.max_upload_mb,
        args.session_ttl_hours
    );

    axum::serve(listener, app).await?;

    Ok(())
}
