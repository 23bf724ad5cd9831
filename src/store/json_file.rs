//! Durable order store backed by a single JSON document.
//!
//! The whole order set lives in one file keyed by ISO delivery date.
//! Every mutation rewrites the document through a temp file and an atomic
//! rename, so a crash mid-write leaves the previous document intact.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;

use crate::market::types::{Order, OrderId};
use crate::store::{OrderStore, StoreError};

type Document = BTreeMap<NaiveDate, Vec<Order>>;

pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens a store at `path`. The file is created on first append; a
    /// missing file reads as an empty order set.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_document(&self) -> Result<Document, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn write_document(&self, document: &Document) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(document)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl OrderStore for JsonFileStore {
    fn append(&self, order: &Order) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut document = self.read_document()?;
        document.entry(order.date).or_default().push(order.clone());
        self.write_document(&document)
    }

    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Order>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let document = self.read_document()?;
        Ok(document.get(&date).cloned().unwrap_or_default())
    }

    fn delete(&self, date: NaiveDate, id: OrderId) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut document = self.read_document()?;
        let Some(day) = document.get_mut(&date) else {
            return Ok(false);
        };
        let before = day.len();
        day.retain(|o| o.id != id);
        if day.len() == before {
            return Ok(false);
        }
        self.write_document(&document)?;
        Ok(true)
    }
}
