//! Injected time source.
//!
//! Deadline checks and order timestamps never read the wall clock
//! directly; they go through a `Clock` so behavior is reproducible in
//! tests.

use chrono::{Local, NaiveDateTime};

/// Supplies "now" for deadline checks and `created_at` stamps.
pub trait Clock: Send + Sync {
    /// Current naive local time.
    fn now(&self) -> NaiveDateTime;
}

/// The system wall clock in local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to a single instant.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use vet_sim::market::clock::{Clock, FixedClock};
///
/// let instant = NaiveDate::from_ymd_opt(2025, 6, 14)
///     .unwrap()
///     .and_hms_opt(10, 59, 0)
///     .unwrap();
/// assert_eq!(FixedClock(instant).now(), instant);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
