use anyhow::bail;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt::Write;

/// Date formats accepted in front matter, besides RFC 3339 timestamps.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%B %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parses a front matter date. Timestamps are reduced to their UTC calendar day.
pub fn parse(input: &str) -> anyhow::Result<NaiveDate> {
    let input = input.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Ok(datetime.to_utc().date_naive());
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(datetime.date());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Ok(date);
        }
    }

    bail!("Unrecognized date \"{input}\"")
}

/// A validated strftime pattern for the card's date line.
#[derive(Debug, Clone)]
pub struct DateFormat(String);

impl DateFormat {
    pub fn new(pattern: &str) -> anyhow::Result<Self> {
        // Unknown specifiers and time fields only fail once formatted.
        let mut sample = String::new();
        if write!(sample, "{}", NaiveDate::default().format(pattern)).is_err() {
            bail!("Invalid date format \"{pattern}\"");
        }

        Ok(Self(pattern.to_string()))
    }

    pub fn format(&self, date: NaiveDate) -> String {
        date.format(&self.0).to_string()
    }
}
