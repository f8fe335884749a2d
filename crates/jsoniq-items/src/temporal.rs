//! The temporal item family: date, time, and dateTime
//!
//! Each temporal item holds a timezone-aware instant plus a flag recording
//! whether the lexical source carried an explicit zone offset. A zone-less
//! literal is normalized to UTC while keeping the written field values, so
//! `14:30:00` denotes 14:30:00 pinned to offset zero with
//! `has_explicit_timezone() == false`; no zone is ever invented for it.
//!
//! Two items denoting the same instant are equal even when their
//! explicit-zone flags differ; only serialization tells them apart.

use crate::duration::DayTimeDurationItem;
use chrono::{
    DateTime, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Utc,
};
use jsoniq_diagnostics::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Anchor date for time-of-day instants
const TIME_EPOCH: (i32, u32, u32) = (1970, 1, 1);

/// A time-of-day item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeItem {
    instant: DateTime<FixedOffset>,
    has_timezone: bool,
}

/// A calendar date item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateItem {
    instant: DateTime<FixedOffset>,
    has_timezone: bool,
}

/// A date-and-time item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateTimeItem {
    instant: DateTime<FixedOffset>,
    has_timezone: bool,
}

impl TimeItem {
    /// Parse a time literal: `hh:mm:ss`, optional fraction, optional zone
    /// (`Z` or `±hh:mm`).
    pub fn from_lexical(lexical: &str) -> Result<Self> {
        let (body, zone) = split_zone(lexical, "time")?;
        let time = NaiveTime::parse_from_str(body, "%H:%M:%S%.f")
            .map_err(|_| Error::parse(lexical, "time"))?;
        let (epoch_year, epoch_month, epoch_day) = TIME_EPOCH;
        let date = NaiveDate::from_ymd_opt(epoch_year, epoch_month, epoch_day)
            .ok_or_else(|| Error::parse(lexical, "time"))?;
        resolve(date.and_time(time), zone, lexical, "time")
            .map(|(instant, has_timezone)| Self { instant, has_timezone })
    }

    /// Build from an instant and an explicit-zone flag, e.g. as the
    /// result of arithmetic.
    pub fn from_parts(instant: DateTime<FixedOffset>, has_timezone: bool) -> Self {
        Self {
            instant: truncate_to_millis(instant),
            has_timezone,
        }
    }

    /// The resolved instant
    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    /// Whether the lexical origin carried an explicit zone offset
    pub fn has_explicit_timezone(&self) -> bool {
        self.has_timezone
    }

    /// Shift forward by a day-time duration, preserving the zone flag
    pub fn plus_day_time(&self, duration: &DayTimeDurationItem) -> Self {
        Self {
            instant: self.instant + Duration::milliseconds(duration.as_millis()),
            has_timezone: self.has_timezone,
        }
    }

    /// Shift backward by a day-time duration, preserving the zone flag
    pub fn minus_day_time(&self, duration: &DayTimeDurationItem) -> Self {
        Self {
            instant: self.instant - Duration::milliseconds(duration.as_millis()),
            has_timezone: self.has_timezone,
        }
    }

    /// The exact day-time duration from `other` to `self`
    pub fn minus_time(&self, other: &TimeItem) -> DayTimeDurationItem {
        DayTimeDurationItem::from_millis((self.instant - other.instant).num_milliseconds())
    }

    /// Canonical minimal lexical form
    pub fn serialize(&self) -> String {
        let mut out = self.instant.format("%H:%M:%S").to_string();
        out.push_str(&fraction_suffix(&self.instant));
        if self.has_timezone {
            out.push_str(&zone_suffix(&self.instant));
        }
        out
    }
}

impl DateItem {
    /// Parse a date literal: `yyyy-mm-dd` with an optional zone suffix.
    pub fn from_lexical(lexical: &str) -> Result<Self> {
        let (body, zone) = split_zone(lexical, "date")?;
        let date = NaiveDate::parse_from_str(body, "%Y-%m-%d")
            .map_err(|_| Error::parse(lexical, "date"))?;
        let midnight = NaiveTime::default();
        resolve(date.and_time(midnight), zone, lexical, "date")
            .map(|(instant, has_timezone)| Self { instant, has_timezone })
    }

    /// Build from an instant and an explicit-zone flag
    pub fn from_parts(instant: DateTime<FixedOffset>, has_timezone: bool) -> Self {
        Self {
            instant: truncate_to_millis(instant),
            has_timezone,
        }
    }

    /// The resolved instant
    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    /// Whether the lexical origin carried an explicit zone offset
    pub fn has_explicit_timezone(&self) -> bool {
        self.has_timezone
    }

    /// Shift forward by a day-time duration, preserving the zone flag
    pub fn plus_day_time(&self, duration: &DayTimeDurationItem) -> Self {
        Self {
            instant: self.instant + Duration::milliseconds(duration.as_millis()),
            has_timezone: self.has_timezone,
        }
    }

    /// Shift backward by a day-time duration, preserving the zone flag
    pub fn minus_day_time(&self, duration: &DayTimeDurationItem) -> Self {
        Self {
            instant: self.instant - Duration::milliseconds(duration.as_millis()),
            has_timezone: self.has_timezone,
        }
    }

    /// The exact day-time duration from `other` to `self`
    pub fn minus_date(&self, other: &DateItem) -> DayTimeDurationItem {
        DayTimeDurationItem::from_millis((self.instant - other.instant).num_milliseconds())
    }

    /// Canonical minimal lexical form
    pub fn serialize(&self) -> String {
        let mut out = self.instant.format("%Y-%m-%d").to_string();
        if self.has_timezone {
            out.push_str(&zone_suffix(&self.instant));
        }
        out
    }
}

impl DateTimeItem {
    /// Parse a dateTime literal: `yyyy-mm-ddThh:mm:ss`, optional fraction,
    /// optional zone suffix.
    pub fn from_lexical(lexical: &str) -> Result<Self> {
        let (body, zone) = split_zone(lexical, "dateTime")?;
        let naive = NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|_| Error::parse(lexical, "dateTime"))?;
        resolve(naive, zone, lexical, "dateTime")
            .map(|(instant, has_timezone)| Self { instant, has_timezone })
    }

    /// Build from an instant and an explicit-zone flag
    pub fn from_parts(instant: DateTime<FixedOffset>, has_timezone: bool) -> Self {
        Self {
            instant: truncate_to_millis(instant),
            has_timezone,
        }
    }

    /// The resolved instant
    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    /// Whether the lexical origin carried an explicit zone offset
    pub fn has_explicit_timezone(&self) -> bool {
        self.has_timezone
    }

    /// Shift forward by a day-time duration, preserving the zone flag
    pub fn plus_day_time(&self, duration: &DayTimeDurationItem) -> Self {
        Self {
            instant: self.instant + Duration::milliseconds(duration.as_millis()),
            has_timezone: self.has_timezone,
        }
    }

    /// Shift backward by a day-time duration, preserving the zone flag
    pub fn minus_day_time(&self, duration: &DayTimeDurationItem) -> Self {
        Self {
            instant: self.instant - Duration::milliseconds(duration.as_millis()),
            has_timezone: self.has_timezone,
        }
    }

    /// Calendar-aware month shift; the day of month clamps to the target
    /// month's length (Jan 31 + P1M = Feb 29 in a leap year).
    pub fn plus_months(&self, months: i32) -> Result<Self> {
        let shifted = if months >= 0 {
            self.instant.checked_add_months(Months::new(months as u32))
        } else {
            self.instant
                .checked_sub_months(Months::new(months.unsigned_abs()))
        };
        shifted
            .map(|instant| Self {
                instant,
                has_timezone: self.has_timezone,
            })
            .ok_or_else(|| Error::class_cast("yearMonthDuration", "dateTime"))
    }

    /// The exact day-time duration from `other` to `self`
    pub fn minus_date_time(&self, other: &DateTimeItem) -> DayTimeDurationItem {
        DayTimeDurationItem::from_millis((self.instant - other.instant).num_milliseconds())
    }

    /// Canonical minimal lexical form
    pub fn serialize(&self) -> String {
        let mut out = self.instant.format("%Y-%m-%dT%H:%M:%S").to_string();
        out.push_str(&fraction_suffix(&self.instant));
        if self.has_timezone {
            out.push_str(&zone_suffix(&self.instant));
        }
        out
    }
}

// Equality is instant-only for all three families: the explicit-zone flag
// never participates, so hashing goes through the instant as well.
macro_rules! instant_identity {
    ($ty:ident) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.instant == other.instant
            }
        }

        impl Eq for $ty {}

        impl Hash for $ty {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.instant.timestamp_millis().hash(state);
            }
        }

        impl PartialOrd for $ty {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $ty {
            fn cmp(&self, other: &Self) -> Ordering {
                self.instant.cmp(&other.instant)
            }
        }
    };
}

instant_identity!(TimeItem);
instant_identity!(DateItem);
instant_identity!(DateTimeItem);

/// Split a trailing zone designator off a temporal literal.
///
/// Returns the remaining body and the parsed offset, or `None` when the
/// literal carries no zone at all.
fn split_zone<'a>(lexical: &'a str, target: &str) -> Result<(&'a str, Option<FixedOffset>)> {
    if let Some(body) = lexical.strip_suffix('Z') {
        return Ok((body, Some(Utc.fix())));
    }
    let bytes = lexical.as_bytes();
    if lexical.len() >= 6
        && matches!(bytes[lexical.len() - 6], b'+' | b'-')
        && bytes[lexical.len() - 3] == b':'
    {
        let (body, suffix) = lexical.split_at(lexical.len() - 6);
        let sign = if suffix.starts_with('-') { -1 } else { 1 };
        let hours: i32 = suffix[1..3]
            .parse()
            .map_err(|_| Error::parse(lexical, target))?;
        let minutes: i32 = suffix[4..6]
            .parse()
            .map_err(|_| Error::parse(lexical, target))?;
        // Offsets run to at most 14:00 exactly.
        if hours > 14 || minutes > 59 || (hours == 14 && minutes != 0) {
            return Err(Error::parse(lexical, target));
        }
        let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .ok_or_else(|| Error::parse(lexical, target))?;
        return Ok((body, Some(offset)));
    }
    Ok((lexical, None))
}

/// Resolve parsed local fields against the zone designator.
///
/// With an explicit offset the fields are local to that offset; without
/// one they are pinned to UTC verbatim and flagged as zone-less.
fn resolve(
    naive: NaiveDateTime,
    zone: Option<FixedOffset>,
    lexical: &str,
    target: &str,
) -> Result<(DateTime<FixedOffset>, bool)> {
    match zone {
        Some(offset) => {
            let instant = offset
                .from_local_datetime(&naive)
                .single()
                .ok_or_else(|| Error::parse(lexical, target))?;
            Ok((truncate_to_millis(instant), true))
        }
        None => {
            let instant = Utc
                .fix()
                .from_local_datetime(&naive)
                .single()
                .ok_or_else(|| Error::parse(lexical, target))?;
            Ok((truncate_to_millis(instant), false))
        }
    }
}

/// The value model is millisecond-precise; drop sub-millisecond digits at
/// construction so equality, hashing, and the codec agree.
fn truncate_to_millis(instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let excess = i64::from(instant.timestamp_subsec_nanos() % 1_000_000);
    instant - Duration::nanoseconds(excess)
}

/// Sub-second part of the canonical form: empty when zero, otherwise the
/// millisecond fraction with trailing zeros trimmed.
fn fraction_suffix(instant: &DateTime<FixedOffset>) -> String {
    let millis = instant.timestamp_subsec_millis();
    if millis == 0 {
        String::new()
    } else {
        let fraction = format!(".{millis:03}");
        fraction.trim_end_matches('0').to_string()
    }
}

/// Zone part of the canonical form: `Z` for UTC, `±hh:mm` otherwise
fn zone_suffix(instant: &DateTime<FixedOffset>) -> String {
    let seconds = instant.offset().local_minus_utc();
    if seconds == 0 {
        "Z".to_string()
    } else {
        let sign = if seconds < 0 { '-' } else { '+' };
        let abs = seconds.abs();
        format!("{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
    }
}
