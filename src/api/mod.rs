//! REST API for the market simulator.
//!
//! Routes, mapping the engine operations 1:1:
//! - `GET  /health` — liveness
//! - `GET  /api/prices/day-ahead?date=` — DA curve
//! - `GET  /api/prices/real-time?date=` — RT curve
//! - `GET  /api/orders?date=` / `POST /api/orders` — list / submit
//! - `DELETE /api/orders/{id}?date=` — delete
//! - `GET  /api/pnl?date=` — settlement report

mod handlers;
mod types;

pub use types::ErrorResponse;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::market::engine::Engine;

/// Shared application state: the engine behind every handler.
///
/// The engine serializes submissions internally, so no additional locking
/// is needed here.
pub struct AppState {
    pub engine: Engine,
}

/// Builds the axum router with all API routes.
///
/// CORS is permissive: the chart UI is served from a separate origin.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/prices/day-ahead", get(handlers::day_ahead_prices))
        .route("/api/prices/real-time", get(handlers::real_time_prices))
        .route(
            "/api/orders",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route("/api/orders/{id}", delete(handlers::delete_order))
        .route("/api/pnl", get(handlers::pnl))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    info!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
