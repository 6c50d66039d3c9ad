//! Presentation attributes derived from raw todo fields: priority tiers and
//! `es-ES` date strings.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone, Timelike, Utc};

/// Shown in place of a date that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

const MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Zone-less layouts, read as local time in the display zone. The first is
/// what a `datetime-local` input produces.
const LOCAL_LAYOUTS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Presentation tier of a todo's priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Only 3 and 2 map to a raised tier; everything else, missing included,
    /// is Low.
    pub fn from_raw(raw: Option<i64>) -> Self {
        match raw {
            Some(3) => Priority::High,
            Some(2) => Priority::Medium,
            _ => Priority::Low,
        }
    }

    /// The raw value this tier is stored as.
    pub fn value(self) -> i64 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "Alta",
            Priority::Medium => "Media",
            Priority::Low => "Baja",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Priority::High => "priority-high",
            Priority::Medium => "priority-medium",
            Priority::Low => "priority-low",
        }
    }
}

/// Parse a server or form timestamp into the display zone.
pub fn parse_timestamp(raw: &str, zone: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(zone));
    }
    LOCAL_LAYOUTS.iter().find_map(|layout| {
        let naive = NaiveDateTime::parse_from_str(raw, layout).ok()?;
        zone.from_local_datetime(&naive).single()
    })
}

/// `15 mar 2024, 11:00` style, or [`INVALID_DATE`].
pub fn format_date(raw: &str, zone: &FixedOffset) -> String {
    match parse_timestamp(raw, zone) {
        Some(at) => format!(
            "{} {} {}, {:02}:{:02}",
            at.day(),
            MONTHS[at.month0() as usize],
            at.year(),
            at.hour(),
            at.minute()
        ),
        None => INVALID_DATE.to_string(),
    }
}

/// Value for a `datetime-local` input: display-zone time truncated to the
/// minute. Empty when the timestamp cannot be parsed.
pub fn to_input_value(raw: &str, zone: &FixedOffset) -> String {
    parse_timestamp(raw, zone)
        .map(|at| at.format("%Y-%m-%dT%H:%M").to_string())
        .unwrap_or_default()
}

/// Read a `datetime-local` value in the display zone and return it as a UTC
/// ISO-8601 string with millisecond precision.
pub fn from_input_value(raw: &str, zone: &FixedOffset) -> Option<String> {
    parse_timestamp(raw, zone).map(|at| to_iso(at.with_timezone(&Utc)))
}

pub fn to_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
