use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// A parsed `EquityPoint::datetime`.
///
/// Timestamps without an offset stay naive so the caller decides which
/// timezone they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTimestamp {
    Zoned(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

impl ParsedTimestamp {
    /// Instant used for ordering checks; naive values are read as UTC.
    pub fn ordering_key(&self) -> DateTime<Utc> {
        match self {
            Self::Zoned(dt) => dt.with_timezone(&Utc),
            Self::Naive(naive) => naive.and_utc(),
        }
    }
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const ZONED_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Parses the ISO-8601 shapes the engine is known to emit: RFC 3339 with an
/// offset or `Z`, the same with minute precision, naive date-times, and bare
/// dates (UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<ParsedTimestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(ParsedTimestamp::Zoned(dt));
    }
    let zoned = match raw.strip_suffix(['Z', 'z']) {
        Some(stem) => format!("{stem}+00:00"),
        None => raw.to_string(),
    };
    for fmt in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&zoned, fmt) {
            return Some(ParsedTimestamp::Zoned(dt));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ParsedTimestamp::Naive(naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(ParsedTimestamp::Zoned(midnight.and_utc().fixed_offset()));
    }
    None
}
