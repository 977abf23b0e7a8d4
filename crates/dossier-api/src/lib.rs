//! REST gateway for Dossier.
//!
//! External clients talk to the pipeline through this crate only. The hot
//! path answers synchronously; everything the cold path does is visible
//! purely through the report endpoints, eventually.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /api/v1/chat` - Handle a conversational turn
//! - `GET /api/v1/sessions/{id}/history` - Recent turns, oldest first
//! - `DELETE /api/v1/sessions/{id}` - Clear a session's buffer
//! - `GET /api/v1/reports/{id}` - Full candidate report
//! - `GET /api/v1/reports/{id}/skills` - Skills grouped by domain
//! - `GET /api/v1/reports/{id}/traits` - Traits with resolved intensity
//! - `GET /api/v1/reports/{id}/domains/{domain}` - Domain deep dive
//!
//! ```text
//! Client
//!    │
//!    ▼
//! ┌─────────────────┐
//! │   API Gateway   │ ◄── this crate
//! │     (Axum)      │
//! └────────┬────────┘
//!          │
//!     ┌────┴──────────────┐
//!     ▼                   ▼
//! ┌──────────┐      ┌───────────┐
//! │ ChatSvc  │      │ ReportSvc │
//! │ (hot)    │      │ (graph)   │
//! └────┬─────┘      └───────────┘
//!      │ fire-and-forget
//!      ▼
//! ┌──────────┐
//! │ Workers  │ (cold)
//! └──────────┘
//! ```

pub mod routes;
pub mod state;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use state::AppState;

/// Create the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/v1/chat", post(routes::chat))
        .route(
            "/api/v1/sessions/{id}/history",
            get(routes::session_history),
        )
        .route("/api/v1/sessions/{id}", delete(routes::delete_session))
        .route("/api/v1/reports/{id}", get(routes::candidate_report))
        .route("/api/v1/reports/{id}/skills", get(routes::skills_report))
        .route("/api/v1/reports/{id}/traits", get(routes::traits_report))
        .route(
            "/api/v1/reports/{id}/domains/{domain}",
            get(routes::domain_deep_dive),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the API server on the given address.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> anyhow::Result<()> {
    let router = create_router(state);

    info!(%addr, "Starting Dossier API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
