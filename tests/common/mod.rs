//! Shared test fixtures for integration tests.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use vet_sim::market::clock::FixedClock;
use vet_sim::market::deadline::DeadlineGuard;
use vet_sim::market::engine::Engine;
use vet_sim::market::error::MarketError;
use vet_sim::market::prices::{DayAheadCurve, PriceProvider, RealTimeCurve};
use vet_sim::market::types::{Order, OrderRequest, Side};
use vet_sim::store::MemoryStore;

/// Delivery date used throughout the integration tests.
pub fn delivery_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

/// An instant on the day before delivery, hours before the 11:00 cutoff.
pub fn before_cutoff() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 14)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

/// Engine with baseline curves, an in-memory store, a 10-order cap, and a
/// clock pinned to the given instant.
pub fn engine_at(now: NaiveDateTime) -> Engine {
    Engine::new(
        PriceProvider::new(DayAheadCurve::default(), RealTimeCurve::default()),
        DeadlineGuard::new(11),
        Arc::new(MemoryStore::new()),
        Arc::new(FixedClock(now)),
        10,
        "USD",
    )
}

/// Submits an order for [`delivery_date`] with quantity 2.0 MWh.
pub fn submit(engine: &Engine, hour: u8, side: Side, price: f64) -> Result<Order, MarketError> {
    engine.submit_order(OrderRequest {
        date: delivery_date(),
        hour,
        side,
        price,
        quantity: 2.0,
    })
}
