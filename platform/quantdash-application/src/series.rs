//! Turns the raw equity curve into chart-ready points with readable labels.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use quantdash_domain::services::timestamps::{parse_timestamp, ParsedTimestamp};
use quantdash_domain::value_objects::equity_point::EquityPoint;
use serde::Serialize;

/// en-US `toLocaleString` shape: `1/2/2024, 3:04:05 PM`.
const LABEL_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTimezone {
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl LabelTimezone {
    /// Accepts `local`, `utc` or an offset like `+02:00` / `-0530`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let value = raw.trim();
        match value.to_ascii_lowercase().as_str() {
            "local" => return Ok(Self::Local),
            "utc" | "z" => return Ok(Self::Utc),
            _ => {}
        }
        parse_offset(value)
            .map(Self::Fixed)
            .ok_or_else(|| format!("invalid timezone {raw:?} (expected local, utc or +HH:MM)"))
    }
}

fn parse_offset(value: &str) -> Option<FixedOffset> {
    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub equity: f64,
    pub label: String,
}

/// One output point per input point, same order, equity untouched.
pub fn normalize_series(points: &[EquityPoint], timezone: LabelTimezone) -> Vec<SeriesPoint> {
    points
        .iter()
        .map(|point| SeriesPoint {
            equity: point.equity,
            label: format_label(&point.datetime, timezone),
        })
        .collect()
}

/// Falls back to the raw string when it cannot be parsed.
pub fn format_label(raw: &str, timezone: LabelTimezone) -> String {
    match parse_timestamp(raw) {
        Some(ParsedTimestamp::Zoned(dt)) => format_zoned(dt, timezone),
        Some(ParsedTimestamp::Naive(naive)) => format_naive(naive),
        None => raw.to_string(),
    }
}

fn format_zoned(dt: DateTime<FixedOffset>, timezone: LabelTimezone) -> String {
    match timezone {
        LabelTimezone::Local => format_in(dt, &Local),
        LabelTimezone::Utc => format_in(dt, &Utc),
        LabelTimezone::Fixed(offset) => format_in(dt, &offset),
    }
}

fn format_in<Tz>(dt: DateTime<FixedOffset>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    dt.with_timezone(tz).format(LABEL_FORMAT).to_string()
}

// Naive timestamps already are wall-clock time in the label timezone.
fn format_naive(naive: NaiveDateTime) -> String {
    naive.format(LABEL_FORMAT).to_string()
}
