//! API response, query, and error-mapping types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::market::error::MarketError;
use crate::market::types::Order;

/// Date selector shared by the query endpoints.
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// Delivery date, `YYYY-MM-DD`.
    pub date: NaiveDate,
}

/// Listing response: the date plus its orders in submission order.
#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub date: NaiveDate,
    pub orders: Vec<Order>,
}

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub status: &'static str,
}

/// Liveness body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Error response body for non-2xx results.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Failure carried to the HTTP layer.
#[derive(Debug)]
pub enum ApiError {
    Market(MarketError),
    /// A worker task died before producing a result.
    Internal(String),
}

impl From<MarketError> for ApiError {
    fn from(err: MarketError) -> Self {
        Self::Market(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Market(err) => (market_status(&err), err.to_string()),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Maps market rejections to HTTP statuses: rule violations are the
/// caller's 400, a missing order is 404, internal invariant and storage
/// failures are 500.
fn market_status(err: &MarketError) -> StatusCode {
    match err {
        MarketError::Validation { .. }
        | MarketError::DeadlinePassed { .. }
        | MarketError::HourFull { .. } => StatusCode::BAD_REQUEST,
        MarketError::NotFound { .. } => StatusCode::NOT_FOUND,
        MarketError::PriceSeriesIncomplete { .. } | MarketError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
