use crate::money::DEFAULT_PAYMENT_TOLERANCE;
use chrono::{FixedOffset, Offset, Utc};
use std::path::PathBuf;

/// Default local offset (America/Lima, UTC-5)
const DEFAULT_UTC_OFFSET_MINUTES: i32 = -300;

/// Checkout configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | ./pos-data | Working directory (snapshot, logs) |
/// | ENVIRONMENT | development | development, staging or production |
/// | LOG_LEVEL | info | tracing filter level |
/// | LOG_JSON | false | JSON console output |
/// | PAYMENT_TOLERANCE | 0.10 | Shortfall accepted when settling |
/// | UTC_OFFSET_MINUTES | -300 | Local offset for tickets and exit times |
/// | SNAPSHOT_FILE | store.json | Snapshot file name inside WORK_DIR |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/pos PAYMENT_TOLERANCE=0.05 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub payment_tolerance: f64,
    pub utc_offset_minutes: i32,
    pub snapshot_file: String,
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./pos-data".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            payment_tolerance: std::env::var("PAYMENT_TOLERANCE")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(DEFAULT_PAYMENT_TOLERANCE),
            utc_offset_minutes: std::env::var("UTC_OFFSET_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_UTC_OFFSET_MINUTES),
            snapshot_file: std::env::var("SNAPSHOT_FILE").unwrap_or_else(|_| "store.json".into()),
        }
    }

    /// Override the working directory
    ///
    /// Used by tests
    pub fn with_overrides(work_dir: impl Into<String>, payment_tolerance: f64) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.payment_tolerance = payment_tolerance;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn snapshot_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.snapshot_file)
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn checkout_settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            payment_tolerance: self.payment_tolerance,
            utc_offset_minutes: self.utc_offset_minutes,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Settings the store needs at command time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckoutSettings {
    pub payment_tolerance: f64,
    pub utc_offset_minutes: i32,
}

impl CheckoutSettings {
    /// Local offset; out-of-range values fall back to UTC
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            payment_tolerance: DEFAULT_PAYMENT_TOLERANCE,
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }
}
