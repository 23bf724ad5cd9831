//! Day-ahead and real-time price curve generation.
//!
//! Synthetic curves are deterministic functions of the delivery date: the
//! RNG is seeded from the date, so repeated queries for the same date
//! always produce the same 24 values. The day-ahead curve is a base price
//! plus two diurnal humps (morning and evening peaks); the real-time curve
//! is the synthetic day-ahead value plus bounded noise from a separate
//! date-derived seed.

use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::market::types::{HOURS_PER_DAY, PricePoint, PriceSeries, PriceSource, round_cents};

/// Day-ahead synthetic curve parameters ($/MWh).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DayAheadCurve {
    /// Off-peak base price.
    pub base: f64,
    /// Added at the top of the morning/evening humps.
    pub peak_amplitude: f64,
    /// Uniform noise half-width.
    pub noise_amplitude: f64,
    /// Prices are clamped up to this floor before rounding.
    pub floor: f64,
}

impl Default for DayAheadCurve {
    fn default() -> Self {
        Self {
            base: 45.0,
            peak_amplitude: 30.0,
            noise_amplitude: 3.0,
            floor: 5.0,
        }
    }
}

/// Real-time synthetic curve parameters ($/MWh).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RealTimeCurve {
    /// Uniform deviation half-width around the day-ahead value.
    pub noise_amplitude: f64,
    /// Prices are clamped up to this floor before rounding.
    pub floor: f64,
    /// The RT seed is derived from `date + seed_offset_days` so RT noise
    /// decorrelates from DA noise for the same date.
    pub seed_offset_days: u64,
}

impl Default for RealTimeCurve {
    fn default() -> Self {
        Self {
            noise_amplitude: 7.0,
            floor: 0.0,
            seed_offset_days: 7,
        }
    }
}

/// Failure of an external price fetch. Always recovered by synthetic
/// fallback, never surfaced to callers.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct FetchError(pub String);

/// External source for day-ahead curves.
///
/// Implementations return whatever the remote supplies; the provider
/// validates shape and completeness before trusting it.
pub trait ExternalPriceFetcher: Send + Sync {
    fn fetch_day_ahead(&self, date: NaiveDate) -> Result<Vec<PricePoint>, FetchError>;
}

/// Fetches day-ahead curves from a JSON HTTP endpoint.
///
/// Expects a JSON array of `{"hour": 0-23, "price": number}` objects; any
/// other shape is a fetch failure.
#[cfg(feature = "external-prices")]
pub struct HttpPriceFetcher {
    url: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "external-prices")]
impl HttpPriceFetcher {
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed (TLS backend
    /// initialization failure).
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("HTTP client construction");
        Self {
            url: url.into(),
            client,
        }
    }
}

#[cfg(feature = "external-prices")]
impl ExternalPriceFetcher for HttpPriceFetcher {
    fn fetch_day_ahead(&self, date: NaiveDate) -> Result<Vec<PricePoint>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("date", date.to_string())])
            .send()
            .map_err(|e| FetchError(e.to_string()))?
            .error_for_status()
            .map_err(|e| FetchError(e.to_string()))?;
        response
            .json::<Vec<PricePoint>>()
            .map_err(|e| FetchError(e.to_string()))
    }
}

/// Produces the DA and RT curves for a delivery date.
pub struct PriceProvider {
    day_ahead: DayAheadCurve,
    real_time: RealTimeCurve,
    fetcher: Option<Arc<dyn ExternalPriceFetcher>>,
}

impl PriceProvider {
    pub fn new(day_ahead: DayAheadCurve, real_time: RealTimeCurve) -> Self {
        Self {
            day_ahead,
            real_time,
            fetcher: None,
        }
    }

    /// Attaches an external day-ahead source.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn ExternalPriceFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// The day-ahead curve for `date`.
    ///
    /// Tries the external source first when one is configured. The result
    /// is accepted only if it covers all 24 hours exactly once with finite
    /// prices; anything else is discarded wholesale and the synthetic
    /// curve is used instead.
    pub fn day_ahead(&self, date: NaiveDate) -> PriceSeries {
        if let Some(fetcher) = &self.fetcher {
            match fetcher.fetch_day_ahead(date) {
                Ok(points) => match validate_external(date, points) {
                    Some(series) => return series,
                    None => {
                        warn!(%date, "external day-ahead data incomplete or malformed; using synthetic curve");
                    }
                },
                Err(err) => {
                    warn!(%date, %err, "external day-ahead fetch failed; using synthetic curve");
                }
            }
        }
        self.synthetic_day_ahead(date)
    }

    /// The real-time curve for `date`. Always synthetic, derived from the
    /// synthetic day-ahead curve so it stays deterministic even when an
    /// external DA source is configured.
    pub fn real_time(&self, date: NaiveDate) -> PriceSeries {
        let da = self.synthetic_day_ahead(date);
        let seed_date = date
            .checked_add_days(Days::new(self.real_time.seed_offset_days))
            .expect("seed offset stays within the calendar");
        let mut rng = StdRng::seed_from_u64(date_seed(seed_date));

        let points = da
            .points()
            .iter()
            .map(|p| {
                let noise = if self.real_time.noise_amplitude > 0.0 {
                    rng.random_range(
                        -self.real_time.noise_amplitude..=self.real_time.noise_amplitude,
                    )
                } else {
                    0.0
                };
                PricePoint {
                    hour: p.hour,
                    price: round_cents((p.price + noise).max(self.real_time.floor)),
                }
            })
            .collect();
        PriceSeries::new(date, PriceSource::Synthetic, points)
    }

    fn synthetic_day_ahead(&self, date: NaiveDate) -> PriceSeries {
        let mut rng = StdRng::seed_from_u64(date_seed(date));
        let points = (0..HOURS_PER_DAY)
            .map(|hour| {
                let h = f64::from(hour);
                // Load-shaped curve: quadratic humps peaking ~09-10 and ~18-19.
                let morning = ((h - 6.0) * (12.0 - h)).max(0.0) / 18.0;
                let evening = ((h - 14.0) * (22.0 - h)).max(0.0) / 16.0;
                let noise = if self.day_ahead.noise_amplitude > 0.0 {
                    rng.random_range(
                        -self.day_ahead.noise_amplitude..=self.day_ahead.noise_amplitude,
                    )
                } else {
                    0.0
                };
                let price =
                    self.day_ahead.base + self.day_ahead.peak_amplitude * (morning + evening) + noise;
                PricePoint {
                    hour,
                    price: round_cents(price.max(self.day_ahead.floor)),
                }
            })
            .collect();
        PriceSeries::new(date, PriceSource::Synthetic, points)
    }
}

/// Seed derived from the calendar date as `yyyymmdd`.
fn date_seed(date: NaiveDate) -> u64 {
    date.year() as u64 * 10_000 + u64::from(date.month()) * 100 + u64::from(date.day())
}

/// Accepts an external result only if it is exactly one finite price per
/// hour 0-23. Returns the points sorted by hour.
fn validate_external(date: NaiveDate, mut points: Vec<PricePoint>) -> Option<PriceSeries> {
    if points.len() != usize::from(HOURS_PER_DAY) {
        return None;
    }
    let mut seen = [false; 24];
    for p in &points {
        if p.hour >= HOURS_PER_DAY || !p.price.is_finite() || seen[usize::from(p.hour)] {
            return None;
        }
        seen[usize::from(p.hour)] = true;
    }
    points.sort_by_key(|p| p.hour);
    Some(PriceSeries::new(date, PriceSource::External, points))
}
