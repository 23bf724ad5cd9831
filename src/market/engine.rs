//! The market engine: wires the deadline guard, order store, price
//! provider, matching, and settlement into the operations the calling
//! layer consumes.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::market::clock::Clock;
use crate::market::deadline::DeadlineGuard;
use crate::market::error::MarketError;
use crate::market::pnl;
use crate::market::prices::PriceProvider;
use crate::market::types::{Order, OrderId, OrderRequest, PnlReport, PriceSeries};
use crate::store::OrderStore;

/// Day-ahead market engine for a single participant.
///
/// Stateless between calls apart from the injected store; price
/// generation, matching, and settlement are pure computations, so the
/// engine is safely shared across concurrent requests behind an `Arc`.
pub struct Engine {
    provider: PriceProvider,
    deadline: DeadlineGuard,
    store: Arc<dyn OrderStore>,
    clock: Arc<dyn Clock>,
    max_orders_per_hour: usize,
    currency: String,
    // Serializes the cap check and append; without it two racing
    // submissions for the same (date, hour) could both pass the count.
    submit_lock: Mutex<()>,
}

impl Engine {
    pub fn new(
        provider: PriceProvider,
        deadline: DeadlineGuard,
        store: Arc<dyn OrderStore>,
        clock: Arc<dyn Clock>,
        max_orders_per_hour: usize,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            deadline,
            store,
            clock,
            max_orders_per_hour,
            currency: currency.into(),
            submit_lock: Mutex::new(()),
        }
    }

    /// Day-ahead curve for the date (external source when configured and
    /// valid, synthetic otherwise).
    pub fn day_ahead_prices(&self, date: NaiveDate) -> PriceSeries {
        self.provider.day_ahead(date)
    }

    /// Real-time curve for the date. Always synthetic.
    pub fn real_time_prices(&self, date: NaiveDate) -> PriceSeries {
        self.provider.real_time(date)
    }

    /// All orders for the date, in submission order.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Store` if the store cannot be read.
    pub fn list_orders(&self, date: NaiveDate) -> Result<Vec<Order>, MarketError> {
        Ok(self.store.list_by_date(date)?)
    }

    /// Validates and persists a submission.
    ///
    /// All checks run before any mutation: field validation, then the
    /// deadline, then the per-hour cap. The cap check and the append are
    /// one atomic step with respect to concurrent submissions.
    ///
    /// # Errors
    ///
    /// `Validation` for out-of-domain fields, `DeadlinePassed` once the
    /// submission window has closed, `HourFull` when the (date, hour)
    /// slot already holds the maximum, `Store` on persistence failure.
    pub fn submit_order(&self, request: OrderRequest) -> Result<Order, MarketError> {
        request.validate()?;

        let now = self.clock.now();
        if !self.deadline.is_open(request.date, now) {
            return Err(MarketError::DeadlinePassed {
                date: request.date,
                cutoff: self.deadline.cutoff(request.date),
            });
        }

        let _guard = self
            .submit_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let existing = self.store.list_by_date(request.date)?;
        let count = existing.iter().filter(|o| o.hour == request.hour).count();
        if count >= self.max_orders_per_hour {
            return Err(MarketError::HourFull {
                date: request.date,
                hour: request.hour,
                cap: self.max_orders_per_hour,
            });
        }

        let order = Order {
            id: OrderId::new(),
            date: request.date,
            hour: request.hour,
            side: request.side,
            price: request.price,
            quantity: request.quantity,
            created_at: now,
        };
        self.store.append(&order)?;
        info!(id = %order.id, date = %order.date, hour = order.hour, side = %order.side, "order accepted");
        Ok(order)
    }

    /// Deletes the order with `id` for `date`.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such order exists; `Store` on persistence failure.
    pub fn delete_order(&self, date: NaiveDate, id: OrderId) -> Result<(), MarketError> {
        if self.store.delete(date, id)? {
            info!(%id, %date, "order deleted");
            Ok(())
        } else {
            Err(MarketError::NotFound { date, id })
        }
    }

    /// Settles every order for the date against the DA and RT curves.
    ///
    /// Details appear in submission order; per-order and total PnL are
    /// rounded to cents.
    ///
    /// # Errors
    ///
    /// `Store` if orders cannot be read; `PriceSeriesIncomplete` if a
    /// curve lacks an order's hour (an internal invariant violation).
    pub fn compute_pnl(&self, date: NaiveDate) -> Result<PnlReport, MarketError> {
        let orders = self.store.list_by_date(date)?;
        let da = self.provider.day_ahead(date);
        let rt = self.provider.real_time(date);
        debug!(%date, orders = orders.len(), da_source = %da.source, "settling");

        let mut details = Vec::with_capacity(orders.len());
        for order in &orders {
            let da_price = da
                .price_at(order.hour)
                .ok_or(MarketError::PriceSeriesIncomplete {
                    date,
                    hour: order.hour,
                })?;
            let rt_price = rt
                .price_at(order.hour)
                .ok_or(MarketError::PriceSeriesIncomplete {
                    date,
                    hour: order.hour,
                })?;
            details.push(pnl::settle(order, da_price, rt_price));
        }

        Ok(pnl::report(date, &self.currency, details))
    }
}
