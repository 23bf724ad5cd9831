//! Market error taxonomy.
//!
//! Every failure is detected before any mutation: a submission either
//! persists a fully valid order or leaves the store untouched.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::market::types::OrderId;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum MarketError {
    /// A submission field is outside its domain (hour, price, quantity).
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The submission window for the delivery date has closed.
    #[error("submission closed for {date}; deadline was {cutoff}")]
    DeadlinePassed {
        date: NaiveDate,
        cutoff: NaiveDateTime,
    },

    /// The per-hour order cap is already reached.
    #[error("hour {hour} on {date}: order limit reached ({cap})")]
    HourFull {
        date: NaiveDate,
        hour: u8,
        cap: usize,
    },

    /// No order with this id exists for the date.
    #[error("order {id} not found for {date}")]
    NotFound { date: NaiveDate, id: OrderId },

    /// A generated or fetched series lacks an hour. Not reachable through
    /// normal request paths.
    #[error("price series for {date} is missing hour {hour}")]
    PriceSeriesIncomplete { date: NaiveDate, hour: u8 },

    #[error(transparent)]
    Store(#[from] StoreError),
}
