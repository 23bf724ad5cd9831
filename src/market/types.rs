//! Core market types: orders, price series, and settlement records.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::market::error::MarketError;

/// Number of hourly delivery slots per trading date.
pub const HOURS_PER_DAY: u8 = 24;

/// Order side: buy energy at the day-ahead auction, or sell into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Position sign applied to settlement: long (+1) for buys, short (−1)
    /// for sells.
    pub fn sign(&self) -> f64 {
        match self {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Unique order identifier.
///
/// UUID v7, so ids sort in creation order within a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Creates a fresh id stamped with the current time.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored submission. Immutable once created; the only mutation the
/// market allows is deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique id, assigned at creation.
    pub id: OrderId,
    /// Delivery date the bid targets.
    pub date: NaiveDate,
    /// Delivery slot, hour-ending convention (0–23).
    pub hour: u8,
    pub side: Side,
    /// Bid/offer price ($/MWh), positive.
    pub price: f64,
    /// Volume (MWh), positive.
    pub quantity: f64,
    /// Submission time, from the injected clock.
    pub created_at: NaiveDateTime,
}

/// An incoming submission, before the engine assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub date: NaiveDate,
    pub hour: u8,
    pub side: Side,
    pub price: f64,
    pub quantity: f64,
}

impl OrderRequest {
    /// Checks field-level constraints: hour 0–23, positive finite price and
    /// quantity.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<(), MarketError> {
        if self.hour >= HOURS_PER_DAY {
            return Err(MarketError::Validation {
                field: "hour",
                message: format!("must be 0-23, got {}", self.hour),
            });
        }
        if !(self.price.is_finite() && self.price > 0.0) {
            return Err(MarketError::Validation {
                field: "price",
                message: format!("must be a positive number, got {}", self.price),
            });
        }
        if !(self.quantity.is_finite() && self.quantity > 0.0) {
            return Err(MarketError::Validation {
                field: "quantity",
                message: format!("must be a positive number, got {}", self.quantity),
            });
        }
        Ok(())
    }
}

/// Where a price series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Synthetic,
    External,
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceSource::Synthetic => write!(f, "synthetic"),
            PriceSource::External => write!(f, "external"),
        }
    }
}

/// One hourly price observation ($/MWh).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub hour: u8,
    pub price: f64,
}

/// A 24-hour price curve for one delivery date.
///
/// Well-formed series cover hours 0–23 once each in ascending order; the
/// provider guarantees this for everything it hands out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub date: NaiveDate,
    pub source: PriceSource,
    #[serde(rename = "series")]
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(date: NaiveDate, source: PriceSource, points: Vec<PricePoint>) -> Self {
        Self {
            date,
            source,
            points,
        }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Price for the given hour, or `None` if the series lacks it.
    pub fn price_at(&self, hour: u8) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.hour == hour)
            .map(|p| p.price)
    }
}

/// Settlement outcome for one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlDetail {
    pub order_id: OrderId,
    pub hour: u8,
    pub side: Side,
    pub quantity: f64,
    pub bid_price: f64,
    pub day_ahead_price: f64,
    pub real_time_price: f64,
    pub filled: bool,
    pub pnl: f64,
}

impl fmt::Display for PnlDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HE {:>2} {:>4} {:>8.3} MWh | bid={:>7.2}  DA={:>7.2}  RT={:>7.2} | filled={:<5} pnl={:>9.2}",
            self.hour,
            self.side,
            self.quantity,
            self.bid_price,
            self.day_ahead_price,
            self.real_time_price,
            self.filled,
            self.pnl,
        )
    }
}

/// Aggregate settlement for one delivery date.
///
/// `details` preserves submission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlReport {
    pub date: NaiveDate,
    pub currency: String,
    pub total_pnl: f64,
    pub details: Vec<PnlDetail>,
}

impl fmt::Display for PnlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PnL {}: {:.2} {} across {} order(s)",
            self.date,
            self.total_pnl,
            self.currency,
            self.details.len(),
        )
    }
}

/// Rounds a dollar amount to cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(hour: u8, price: f64, quantity: f64) -> OrderRequest {
        OrderRequest {
            date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            hour,
            side: Side::Buy,
            price,
            quantity,
        }
    }

    #[test]
    fn side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"buy\"");
        assert_eq!(serde_json::to_string(&Side::Sell).unwrap(), "\"sell\"");
    }

    #[test]
    fn side_rejects_unknown_tag() {
        let parsed: Result<Side, _> = serde_json::from_str("\"hold\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn validate_accepts_well_formed_request() {
        assert!(request(12, 48.5, 2.0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_hour_24() {
        let err = request(24, 48.5, 2.0).validate().unwrap_err();
        assert!(matches!(err, MarketError::Validation { field: "hour", .. }));
    }

    #[test]
    fn validate_rejects_zero_price() {
        let err = request(12, 0.0, 2.0).validate().unwrap_err();
        assert!(matches!(err, MarketError::Validation { field: "price", .. }));
    }

    #[test]
    fn validate_rejects_negative_quantity() {
        let err = request(12, 48.5, -1.0).validate().unwrap_err();
        assert!(matches!(
            err,
            MarketError::Validation {
                field: "quantity",
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_non_finite_price() {
        let err = request(12, f64::NAN, 2.0).validate().unwrap_err();
        assert!(matches!(err, MarketError::Validation { field: "price", .. }));
    }

    #[test]
    fn order_ids_are_unique() {
        assert_ne!(OrderId::new(), OrderId::new());
    }

    #[test]
    fn price_series_lookup() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let points = (0..3)
            .map(|hour| PricePoint {
                hour,
                price: 40.0 + f64::from(hour),
            })
            .collect();
        let series = PriceSeries::new(date, PriceSource::Synthetic, points);
        assert_eq!(series.price_at(1), Some(41.0));
        assert_eq!(series.price_at(23), None);
    }

    #[test]
    fn price_series_serializes_with_series_key() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let series = PriceSeries::new(
            date,
            PriceSource::Synthetic,
            vec![PricePoint {
                hour: 0,
                price: 45.0,
            }],
        );
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["source"], "synthetic");
        assert_eq!(json["series"][0]["hour"], 0);
    }

    #[test]
    fn order_round_trips_through_json() {
        let order = Order {
            id: OrderId::new(),
            date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            hour: 17,
            side: Side::Sell,
            price: 61.25,
            quantity: 3.5,
            created_at: NaiveDate::from_ymd_opt(2025, 6, 14)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        };
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, back);
    }

    #[test]
    fn round_cents_half_up() {
        assert_eq!(round_cents(45.125), 45.13);
        assert_eq!(round_cents(-0.004), -0.0);
        assert_eq!(round_cents(7.5), 7.5);
    }
}
