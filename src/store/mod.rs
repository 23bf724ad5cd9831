//! Order persistence: the storage contract and its implementations.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use chrono::NaiveDate;
use thiserror::Error;

use crate::market::types::{Order, OrderId};

/// Durable order storage keyed by delivery date.
///
/// Implementations serialize their own operations internally: a reader
/// never observes a partially applied append or delete. The per-hour cap
/// is the engine's concern, not the store's.
pub trait OrderStore: Send + Sync {
    /// Persists a fully validated order.
    fn append(&self, order: &Order) -> Result<(), StoreError>;

    /// All orders for the date, in submission order.
    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Order>, StoreError>;

    /// Removes the order with `id` for `date`. Returns whether an order
    /// was removed.
    fn delete(&self, date: NaiveDate, id: OrderId) -> Result<bool, StoreError>;
}

/// Storage failure, distinct from market-rule rejections.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("order store I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("order store encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}
