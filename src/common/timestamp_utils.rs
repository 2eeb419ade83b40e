use crate::errors::AppError;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use std::fmt::Write;

pub const SESSION_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn is_valid_format(format_str: &str) -> bool {
    !StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error))
}

// Get current local timestamp as a formatted string
pub fn current_local_timestamp_str(format_str: &str) -> Result<String, AppError> {
    let now: DateTime<Local> = Local::now();
    let mut formatted = String::new();
    write!(formatted, "{}", now.format(format_str)).map_err(|_| {
        AppError::Configuration(format!("Invalid timestamp format '{}'", format_str))
    })?;
    Ok(formatted)
}

// Session expiries are reported in UTC without offset, e.g. "2026-10-16 08:30:00"
pub fn format_session_timestamp(at: &DateTime<Utc>) -> String {
    at.format(SESSION_TIMESTAMP_FORMAT).to_string()
}
