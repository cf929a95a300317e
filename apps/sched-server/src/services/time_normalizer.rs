//! Wall-clock time normalization.
//!
//! Clients send task times as wall-clock values. Whatever zone tag a value
//! arrives with is discarded: the date and clock fields are read as local
//! time in the configured zone and converted to UTC for storage.
//!
//! A time of day may carry an offset (`09:00:00Z`) or arrive as a datetime on
//! the placeholder date `0000-01-01`, which is how some encoders write a bare
//! clock reading. Both are treated as times of day on the anchor date.

use chrono::{
    DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;

/// Datetime layouts accepted besides RFC 3339. `%.f` also matches no
/// fraction.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Time-of-day layouts, anchored on a date supplied by the caller.
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Time normalization errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    /// The value is not a recognised wall-clock time, or names a local time
    /// that does not exist in the configured zone.
    #[error("{value:?} is not a valid wall-clock time")]
    InvalidTimeFormat { value: String },

    /// The configured zone identifier is not a known IANA zone.
    #[error("unknown time zone {zone:?}")]
    UnknownZone { zone: String },
}

/// Converts client wall-clock times into canonical UTC instants.
#[derive(Debug, Clone, Copy)]
pub struct TimeNormalizer {
    zone: Tz,
}

impl TimeNormalizer {
    /// Creates a normalizer for the named source zone, e.g.
    /// `"America/New_York"`.
    pub fn new(zone: &str) -> Result<Self, TimeError> {
        let zone = zone.parse::<Tz>().map_err(|_| TimeError::UnknownZone {
            zone: zone.to_string(),
        })?;
        Ok(Self { zone })
    }

    /// Returns the configured source zone.
    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Returns the current date in the configured zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.zone).date_naive()
    }

    /// Normalizes `raw`, anchoring bare times of day on today's date.
    pub fn normalize(&self, raw: &str) -> Result<DateTime<Utc>, TimeError> {
        self.normalize_on(raw, self.today())
    }

    /// Normalizes `raw`, anchoring bare times of day on `anchor`.
    ///
    /// Ambiguous local times (when clocks fall back) resolve to the earlier
    /// instant. Local times skipped when clocks spring forward are rejected.
    pub fn normalize_on(&self, raw: &str, anchor: NaiveDate) -> Result<DateTime<Utc>, TimeError> {
        let invalid = || TimeError::InvalidTimeFormat {
            value: raw.to_string(),
        };

        let wall_clock = parse_wall_clock(raw.trim(), anchor).ok_or_else(invalid)?;
        let local = match self.zone.from_local_datetime(&wall_clock) {
            LocalResult::Single(local) => local,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => return Err(invalid()),
        };
        let canonical = local.with_timezone(&Utc);

        tracing::debug!(raw, %canonical, zone = %self.zone, "Normalized wall-clock time");
        Ok(canonical)
    }
}

/// Extracts the local date and clock reading from `raw`, ignoring any offset.
fn parse_wall_clock(raw: &str, anchor: NaiveDate) -> Option<NaiveDateTime> {
    let wall_clock = DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|tagged| tagged.naive_local())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        });
    if let Some(wall_clock) = wall_clock {
        return Some(if is_placeholder_date(wall_clock.date()) {
            anchor.and_time(wall_clock.time())
        } else {
            wall_clock
        });
    }

    DateTime::parse_from_rfc3339(&format!("{anchor}T{raw}"))
        .ok()
        .map(|tagged| tagged.naive_local())
        .or_else(|| {
            TIME_FORMATS
                .iter()
                .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
                .map(|time| anchor.and_time(time))
        })
}

fn is_placeholder_date(date: NaiveDate) -> bool {
    date.year() == 0 && date.ordinal() == 1
}
