//! Logging Infrastructure
//!
//! - Console output, pretty in development and JSON in production
//! - Daily rotating application logs, removed after 14 days
//! - Daily audit logs (`target: "audit"`) and security logs
//!   (`target: "security"`), never removed

use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tracing::{Metadata, Subscriber};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt, layer::SubscriberExt, prelude::*};

/// Application logs older than this are deleted
const APP_LOG_RETENTION_DAYS: i64 = 14;

/// Clean up old application log files
///
/// Returns the number of files removed.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    use chrono::{Local, TimeZone};

    let cutoff = Local::now() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);
    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        // app.YYYY-MM-DD.log (appender) or app-YYYY-MM-DD.log
        let Some(date_part) = name
            .strip_prefix("app")
            .and_then(|rest| rest.strip_prefix('.').or_else(|| rest.strip_prefix('-')))
            .and_then(|rest| rest.strip_suffix(".log"))
        else {
            continue;
        };
        let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d") else {
            continue;
        };
        let is_old = date
            .and_hms_opt(0, 0, 0)
            .and_then(|midnight| Local.from_local_datetime(&midnight).single())
            .is_some_and(|local| local < cutoff);
        if is_old {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            removed += 1;
        }
    }

    Ok(removed)
}

/// Initialize logging
///
/// # Arguments
/// * `level` - Filter directive (e.g. "info", "pos_core=debug"); `RUST_LOG` wins when set
/// * `json_format` - JSON console output
/// * `log_dir` - Optional directory for the rotating app / audit / security files
///
/// # Examples
/// ```no_run
/// // Development (console only)
/// pos_core::common::init_logger("debug", false, None)?;
///
/// // Production (console + files)
/// pos_core::common::init_logger("info", true, Some(std::path::Path::new("./pos-data/logs")))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger(level: &str, json_format: bool, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let mut layers = vec![console_layer(level, json_format)];

    if let Some(log_dir) = log_dir {
        let app_log_dir = log_dir.join("app");
        let audit_log_dir = log_dir.join("audit");
        let security_log_dir = log_dir.join("security");
        fs::create_dir_all(&app_log_dir)?;
        fs::create_dir_all(&audit_log_dir)?;
        fs::create_dir_all(&security_log_dir)?;

        layers.push(file_layer(
            daily_appender(&app_log_dir, "app")?,
            json_format,
            |meta| meta.target() != "audit" && meta.target() != "security",
        ));
        layers.push(file_layer(
            daily_appender(&audit_log_dir, "audit")?,
            json_format,
            |meta| meta.target() == "audit",
        ));
        layers.push(file_layer(
            daily_appender(&security_log_dir, "security")?,
            json_format,
            |meta| meta.target() == "security",
        ));
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()?;

    if let Some(log_dir) = log_dir {
        if let Err(e) = cleanup_old_logs(log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
    }

    Ok(())
}

fn daily_appender(dir: &Path, prefix: &str) -> anyhow::Result<RollingFileAppender> {
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)?)
}

fn console_layer<S>(level: &str, json_format: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(EnvFilter::new(level))
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(EnvFilter::new(level))
            .boxed()
    }
}

fn file_layer<S>(
    appender: RollingFileAppender,
    json_format: bool,
    keep: fn(&Metadata<'_>) -> bool,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let writer = Mutex::new(appender);
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(writer)
            .with_filter(filter::filter_fn(keep))
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter::filter_fn(keep))
            .boxed()
    }
}

/// Audit log helper - records committed business operations
///
/// # Examples
/// ```no_run
/// pos_core::audit_log!("rosa", "process_sale", "sale:42");
/// pos_core::audit_log!("rosa", "credit_note", "sale:42", "2 items returned");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($user:expr, $action:expr, $resource:expr) => {
        tracing::info!(
            target: "audit",
            user = $user,
            action = $action,
            resource = $resource,
            "AUDIT"
        );
    };
    ($user:expr, $action:expr, $resource:expr, $details:expr) => {
        tracing::info!(
            target: "audit",
            user = $user,
            action = $action,
            resource = $resource,
            details = $details,
            "AUDIT"
        );
    };
}
