//! Request handlers for the market API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use super::AppState;
use super::types::{ApiError, DateQuery, DeleteResponse, HealthResponse, OrdersResponse};
use crate::market::types::{Order, OrderId, OrderRequest, PnlReport, PriceSeries};

/// `GET /health` → 200 + `{"status":"ok"}`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /api/prices/day-ahead?date=` → 200 + `PriceSeries` JSON
///
/// Runs on the blocking pool: the external fetcher, when configured, uses
/// a blocking HTTP client.
pub async fn day_ahead_prices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<PriceSeries>, ApiError> {
    let series = tokio::task::spawn_blocking(move || state.engine.day_ahead_prices(query.date))
        .await
        .map_err(|e| ApiError::Internal(format!("price task failed: {e}")))?;
    Ok(Json(series))
}

/// `GET /api/prices/real-time?date=` → 200 + `PriceSeries` JSON
pub async fn real_time_prices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Json<PriceSeries> {
    Json(state.engine.real_time_prices(query.date))
}

/// `GET /api/orders?date=` → 200 + `OrdersResponse` JSON
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<OrdersResponse>, ApiError> {
    let orders = state.engine.list_orders(query.date)?;
    Ok(Json(OrdersResponse {
        date: query.date,
        orders,
    }))
}

/// `POST /api/orders` → 201 + created `Order` JSON
///
/// `POST /api/orders` with a late, over-cap, or out-of-domain submission
/// → 400 + `ErrorResponse`.
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = state.engine.submit_order(request)?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `DELETE /api/orders/{id}?date=` → 200 + `{"status":"deleted"}`
///
/// `DELETE` of an unknown id → 404 + `ErrorResponse`.
pub async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.engine.delete_order(query.date, OrderId::from_uuid(id))?;
    Ok(Json(DeleteResponse { status: "deleted" }))
}

/// `GET /api/pnl?date=` → 200 + `PnlReport` JSON
pub async fn pnl(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<PnlReport>, ApiError> {
    let report = tokio::task::spawn_blocking(move || state.engine.compute_pnl(query.date))
        .await
        .map_err(|e| ApiError::Internal(format!("settlement task failed: {e}")))??;
    Ok(Json(report))
}
