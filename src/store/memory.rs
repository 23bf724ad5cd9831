//! In-memory order store for tests and ephemeral runs.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;

use crate::market::types::{Order, OrderId};
use crate::store::{OrderStore, StoreError};

/// Mutex-guarded map of delivery date to submissions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    orders: Mutex<BTreeMap<NaiveDate, Vec<Order>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for MemoryStore {
    fn append(&self, order: &Order) -> Result<(), StoreError> {
        let mut orders = self.orders.lock().unwrap_or_else(PoisonError::into_inner);
        orders.entry(order.date).or_default().push(order.clone());
        Ok(())
    }

    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(orders.get(&date).cloned().unwrap_or_default())
    }

    fn delete(&self, date: NaiveDate, id: OrderId) -> Result<bool, StoreError> {
        let mut orders = self.orders.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(day) = orders.get_mut(&date) else {
            return Ok(false);
        };
        let before = day.len();
        day.retain(|o| o.id != id);
        Ok(day.len() < before)
    }
}
