//! Submission deadline enforcement.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Computes the submission cutoff for a delivery date.
///
/// The cutoff is `cutoff_hour`:00 local time on the calendar day before
/// delivery, and the boundary is closed: a submission at exactly the
/// cutoff instant is late.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use vet_sim::market::deadline::DeadlineGuard;
///
/// let guard = DeadlineGuard::new(11);
/// let delivery = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
/// let cutoff = guard.cutoff(delivery);
/// assert_eq!(
///     cutoff,
///     NaiveDate::from_ymd_opt(2025, 6, 14)
///         .unwrap()
///         .and_hms_opt(11, 0, 0)
///         .unwrap()
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DeadlineGuard {
    cutoff_hour: u32,
}

impl DeadlineGuard {
    /// Creates a guard with the given local cutoff hour.
    ///
    /// # Panics
    ///
    /// Panics if `cutoff_hour` is not a valid hour of day.
    pub fn new(cutoff_hour: u32) -> Self {
        assert!(cutoff_hour < 24, "cutoff_hour must be 0-23");
        Self { cutoff_hour }
    }

    /// The latest instant (exclusive) a submission for `delivery` is
    /// accepted.
    pub fn cutoff(&self, delivery: NaiveDate) -> NaiveDateTime {
        let day_before = delivery
            .checked_sub_days(Days::new(1))
            .expect("delivery date has a preceding calendar day");
        let time = NaiveTime::from_hms_opt(self.cutoff_hour, 0, 0)
            .expect("cutoff hour validated at construction");
        day_before.and_time(time)
    }

    /// Whether the submission window for `delivery` is still open at `now`.
    pub fn is_open(&self, delivery: NaiveDate, now: NaiveDateTime) -> bool {
        now < self.cutoff(delivery)
    }
}
