//! TOML-based market configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::market::prices::{DayAheadCurve, RealTimeCurve};

/// Top-level market configuration parsed from TOML.
///
/// All fields have defaults matching the baseline market. Load from TOML
/// with [`MarketConfig::from_toml_file`] or use
/// [`MarketConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketConfig {
    /// Submission rules and settlement currency.
    #[serde(default)]
    pub market: MarketRules,
    /// Synthetic day-ahead curve parameters.
    #[serde(default)]
    pub day_ahead: DayAheadCurve,
    /// Synthetic real-time curve parameters.
    #[serde(default)]
    pub real_time: RealTimeCurve,
    /// External day-ahead price source.
    #[serde(default)]
    pub external: ExternalConfig,
    /// Durable order storage.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Submission rules and settlement currency.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketRules {
    /// Maximum orders per (date, hour) slot.
    pub max_orders_per_hour: usize,
    /// Local hour of the submission cutoff on the day before delivery.
    pub cutoff_hour: u32,
    /// Settlement currency code.
    pub currency: String,
}

impl Default for MarketRules {
    fn default() -> Self {
        Self {
            max_orders_per_hour: 10,
            cutoff_hour: 11,
            currency: "USD".to_string(),
        }
    }
}

/// External day-ahead price source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExternalConfig {
    /// Endpoint returning a JSON array of hourly prices for a date.
    /// Unset means synthetic-only operation.
    pub day_ahead_url: Option<String>,
}

/// Durable order storage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Path of the JSON order document.
    pub orders_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            orders_path: "orders.json".to_string(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"market.cutoff_hour"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl MarketConfig {
    /// Returns the baseline market: a 10-order hourly cap, 11:00 cutoff,
    /// and the default synthetic price model.
    pub fn baseline() -> Self {
        Self {
            market: MarketRules::default(),
            day_ahead: DayAheadCurve::default(),
            real_time: RealTimeCurve::default(),
            external: ExternalConfig::default(),
            storage: StorageConfig::default(),
        }
    }

    /// Returns the volatile preset: wider peaks and noisier curves.
    pub fn volatile() -> Self {
        Self {
            day_ahead: DayAheadCurve {
                peak_amplitude: 45.0,
                noise_amplitude: 9.0,
                ..DayAheadCurve::default()
            },
            real_time: RealTimeCurve {
                noise_amplitude: 15.0,
                ..RealTimeCurve::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "volatile"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "volatile" => Ok(Self::volatile()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let m = &self.market;
        if m.max_orders_per_hour == 0 {
            errors.push(ConfigError {
                field: "market.max_orders_per_hour".into(),
                message: "must be > 0".into(),
            });
        }
        if m.cutoff_hour >= 24 {
            errors.push(ConfigError {
                field: "market.cutoff_hour".into(),
                message: "must be 0-23".into(),
            });
        }
        if m.currency.is_empty() {
            errors.push(ConfigError {
                field: "market.currency".into(),
                message: "must not be empty".into(),
            });
        }

        let da = &self.day_ahead;
        if da.base <= 0.0 {
            errors.push(ConfigError {
                field: "day_ahead.base".into(),
                message: "must be > 0".into(),
            });
        }
        if da.peak_amplitude < 0.0 {
            errors.push(ConfigError {
                field: "day_ahead.peak_amplitude".into(),
                message: "must be >= 0".into(),
            });
        }
        if da.noise_amplitude < 0.0 {
            errors.push(ConfigError {
                field: "day_ahead.noise_amplitude".into(),
                message: "must be >= 0".into(),
            });
        }
        if da.floor < 0.0 {
            errors.push(ConfigError {
                field: "day_ahead.floor".into(),
                message: "must be >= 0".into(),
            });
        }

        let rt = &self.real_time;
        if rt.noise_amplitude < 0.0 {
            errors.push(ConfigError {
                field: "real_time.noise_amplitude".into(),
                message: "must be >= 0".into(),
            });
        }
        if rt.floor < 0.0 {
            errors.push(ConfigError {
                field: "real_time.floor".into(),
                message: "must be >= 0".into(),
            });
        }
        if rt.seed_offset_days == 0 {
            errors.push(ConfigError {
                field: "real_time.seed_offset_days".into(),
                message: "must be > 0 so RT noise decorrelates from DA".into(),
            });
        }

        if let Some(url) = &self.external.day_ahead_url {
            if url.is_empty() {
                errors.push(ConfigError {
                    field: "external.day_ahead_url".into(),
                    message: "must not be empty when set".into(),
                });
            }
        }

        if self.storage.orders_path.is_empty() {
            errors.push(ConfigError {
                field: "storage.orders_path".into(),
                message: "must not be empty".into(),
            });
        }

        errors
    }
}
