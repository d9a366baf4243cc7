//! Tolerant ISO 8601 date parsing and display formatting
//!
//! Accepted input: `YYYY-MM-DD[THH:MM:SS[.ffffff]][Z|±HH:MM]`. A trailing
//! `Z` is dropped first, then a trailing offset, so `+03:00Z` is accepted
//! too. No timezone conversion happens.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::result::{Error, Result};

/// Pattern named in parse errors
pub const EXPECTED_PATTERN: &str = "YYYY-MM-DD[THH:MM:SS[.ffffff]][Z|±HH:MM]";

/// Default display format: `DD.MM.YYYY`
pub const DISPLAY_FORMAT: &str = "%d.%m.%Y";

/// Date-time formats tried in order; the date-only form is tried last
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

static TZ_OFFSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+-]\d{2}:\d{2}$").expect("valid timezone offset regex"));

fn invalid_date(value: &str) -> Error {
    Error::invalid_input(format!(
        "invalid date {:?}: expected ISO 8601 '{}'",
        value, EXPECTED_PATTERN
    ))
}

/// Render without panicking on items a naive date-time can't supply (e.g. `%z`)
fn render(dt: &NaiveDateTime, display_format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", dt.format(display_format)).ok()?;
    Some(out)
}

/// Parse a tolerant ISO 8601 string into a naive date-time
///
/// Date-only values resolve to midnight.
pub fn parse_date_time(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid_date(value));
    }

    let without_z = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    let s = TZ_OFFSET_RE.replace(without_z, "");

    for fmt in &DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&s, fmt) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(&s, DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| invalid_date(value))
}

/// Reformat a tolerant ISO 8601 string as `DD.MM.YYYY`
///
/// `"2018-07-11T02:26:18.671407"` becomes `"11.07.2018"`.
pub fn reformat_date(value: &str) -> Result<String> {
    let dt = parse_date_time(value)?;
    Ok(dt.format(DISPLAY_FORMAT).to_string())
}

/// Renders parsed dates with a configurable chrono format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatter {
    display_format: String,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self {
            display_format: DISPLAY_FORMAT.to_string(),
        }
    }
}

impl DateFormatter {
    /// Create a formatter, rejecting format strings chrono can't render
    pub fn new(display_format: impl Into<String>) -> Result<Self> {
        let display_format = display_format.into();
        if display_format.trim().is_empty() {
            return Err(Error::config("date display format cannot be empty"));
        }
        let has_bad_item =
            StrftimeItems::new(&display_format).any(|item| matches!(item, Item::Error));
        if has_bad_item || render(&NaiveDateTime::default(), &display_format).is_none() {
            return Err(Error::config(format!(
                "invalid date display format '{}'",
                display_format
            )));
        }
        Ok(Self { display_format })
    }

    pub fn display_format(&self) -> &str {
        &self.display_format
    }

    pub fn format(&self, value: &str) -> Result<String> {
        let dt = parse_date_time(value)?;
        render(&dt, &self.display_format).ok_or_else(|| {
            Error::config(format!("cannot render date with '{}'", self.display_format))
        })
    }
}
