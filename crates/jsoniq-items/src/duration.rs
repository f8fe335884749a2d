//! The duration item family
//!
//! Durations split into an orthogonal month part and a millisecond part,
//! mirroring the calendar model: `yearMonthDuration` is whole months,
//! `dayTimeDuration` is an exact millisecond span, and the general
//! `duration` carries both. Lexical forms follow the standardized
//! `-PnYnMnDTnHnMnS` grammar; canonical serialization drops zero
//! components and renders the zero duration as `PT0S`.

use jsoniq_diagnostics::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// An exact millisecond span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DayTimeDurationItem {
    millis: i64,
}

impl DayTimeDurationItem {
    /// Build from a millisecond count
    pub const fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    /// Parse a `PnDTnHnMn.fffS` literal; month components are rejected.
    pub fn from_lexical(lexical: &str) -> Result<Self> {
        let (months, millis) = parse_duration_lexical(lexical, "dayTimeDuration")?;
        if months != 0 {
            return Err(Error::parse(lexical, "dayTimeDuration"));
        }
        Ok(Self { millis })
    }

    /// The span in milliseconds
    pub const fn as_millis(&self) -> i64 {
        self.millis
    }

    /// Sum of two spans; fails when the result leaves the millisecond
    /// range.
    pub fn plus(&self, other: &DayTimeDurationItem) -> Result<Self> {
        self.millis
            .checked_add(other.millis)
            .map(Self::from_millis)
            .ok_or_else(|| Error::arithmetic("duration addition"))
    }

    /// Difference of two spans; fails when the result leaves the
    /// millisecond range.
    pub fn minus(&self, other: &DayTimeDurationItem) -> Result<Self> {
        self.millis
            .checked_sub(other.millis)
            .map(Self::from_millis)
            .ok_or_else(|| Error::arithmetic("duration subtraction"))
    }

    /// Canonical minimal lexical form
    pub fn serialize(&self) -> String {
        serialize_duration(0, self.millis)
    }
}

/// A whole-month span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonthDurationItem {
    months: i32,
}

impl YearMonthDurationItem {
    /// Build from a month count
    pub const fn from_months(months: i32) -> Self {
        Self { months }
    }

    /// Parse a `PnYnM` literal; day and time components are rejected.
    pub fn from_lexical(lexical: &str) -> Result<Self> {
        let (months, millis) = parse_duration_lexical(lexical, "yearMonthDuration")?;
        if millis != 0 {
            return Err(Error::parse(lexical, "yearMonthDuration"));
        }
        Ok(Self { months })
    }

    /// The span in months
    pub const fn as_months(&self) -> i32 {
        self.months
    }

    /// Sum of two spans; fails when the result leaves the month range.
    pub fn plus(&self, other: &YearMonthDurationItem) -> Result<Self> {
        self.months
            .checked_add(other.months)
            .map(Self::from_months)
            .ok_or_else(|| Error::arithmetic("duration addition"))
    }

    /// Difference of two spans; fails when the result leaves the month
    /// range.
    pub fn minus(&self, other: &YearMonthDurationItem) -> Result<Self> {
        self.months
            .checked_sub(other.months)
            .map(Self::from_months)
            .ok_or_else(|| Error::arithmetic("duration subtraction"))
    }

    /// Canonical minimal lexical form
    pub fn serialize(&self) -> String {
        serialize_duration(self.months, 0)
    }
}

/// A general duration with both month and millisecond parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DurationItem {
    months: i32,
    millis: i64,
}

impl DurationItem {
    /// Build from month and millisecond parts
    pub const fn from_parts(months: i32, millis: i64) -> Self {
        Self { months, millis }
    }

    /// Parse a full `-PnYnMnDTnHnMn.fffS` literal
    pub fn from_lexical(lexical: &str) -> Result<Self> {
        let (months, millis) = parse_duration_lexical(lexical, "duration")?;
        Ok(Self { months, millis })
    }

    /// The month part
    pub const fn months(&self) -> i32 {
        self.months
    }

    /// The millisecond part
    pub const fn millis(&self) -> i64 {
        self.millis
    }

    /// Componentwise sum; fails on overflow or when the parts end up with
    /// opposite signs.
    pub fn plus(&self, other: &DurationItem) -> Result<Self> {
        let months = self.months.checked_add(other.months);
        let millis = self.millis.checked_add(other.millis);
        match (months, millis) {
            (Some(months), Some(millis)) => Self::with_shared_sign(months, millis),
            _ => Err(Error::arithmetic("duration addition")),
        }
    }

    /// Componentwise difference; fails on overflow or when the parts end
    /// up with opposite signs.
    pub fn minus(&self, other: &DurationItem) -> Result<Self> {
        let months = self.months.checked_sub(other.months);
        let millis = self.millis.checked_sub(other.millis);
        match (months, millis) {
            (Some(months), Some(millis)) => Self::with_shared_sign(months, millis),
            _ => Err(Error::arithmetic("duration subtraction")),
        }
    }

    /// The month and millisecond parts must agree in sign: a mixed-sign
    /// combination has no lexical rendering and therefore no value.
    fn with_shared_sign(months: i32, millis: i64) -> Result<Self> {
        if (months > 0 && millis < 0) || (months < 0 && millis > 0) {
            return Err(Error::arithmetic("mixed-sign duration"));
        }
        Ok(Self { months, millis })
    }

    /// Canonical minimal lexical form
    pub fn serialize(&self) -> String {
        serialize_duration(self.months, self.millis)
    }
}

impl fmt::Display for DayTimeDurationItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.serialize())
    }
}

impl fmt::Display for YearMonthDurationItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.serialize())
    }
}

impl fmt::Display for DurationItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.serialize())
    }
}

/// Parse the standardized duration grammar into month and millisecond
/// parts. At least one component is required; designators must appear in
/// order, each at most once.
fn parse_duration_lexical(lexical: &str, target: &str) -> Result<(i32, i64)> {
    let err = || Error::parse(lexical, target);

    let (negative, rest) = match lexical.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, lexical),
    };
    let rest = rest.strip_prefix('P').ok_or_else(err)?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) if !time.is_empty() => (date, Some(time)),
        Some(_) => return Err(err()),
        None => (rest, None),
    };

    let mut months: i64 = 0;
    let mut millis: i64 = 0;
    let mut seen_any = false;

    // Well-formed lexical input can still exceed the representable
    // range, so every scale and accumulate step is checked.
    let add_scaled = |total: i64, field: Field, scale: i64| {
        field
            .whole()
            .and_then(|value| value.checked_mul(scale))
            .and_then(|scaled| total.checked_add(scaled))
            .ok_or_else(err)
    };

    let mut fields = parse_fields(date_part, &['Y', 'M', 'D']).ok_or_else(err)?;
    if let Some(years) = fields[0].take() {
        months = add_scaled(months, years, 12)?;
        seen_any = true;
    }
    if let Some(m) = fields[1].take() {
        months = add_scaled(months, m, 1)?;
        seen_any = true;
    }
    if let Some(days) = fields[2].take() {
        millis = add_scaled(millis, days, MILLIS_PER_DAY)?;
        seen_any = true;
    }

    if let Some(time) = time_part {
        let mut fields = parse_fields(time, &['H', 'M', 'S']).ok_or_else(err)?;
        if let Some(hours) = fields[0].take() {
            millis = add_scaled(millis, hours, MILLIS_PER_HOUR)?;
            seen_any = true;
        }
        if let Some(minutes) = fields[1].take() {
            millis = add_scaled(millis, minutes, MILLIS_PER_MINUTE)?;
            seen_any = true;
        }
        if let Some(seconds) = fields[2].take() {
            let second_millis = seconds.as_second_millis().ok_or_else(err)?;
            millis = millis.checked_add(second_millis).ok_or_else(err)?;
            seen_any = true;
        }
    }

    if !seen_any {
        return Err(err());
    }
    if negative {
        months = -months;
        millis = -millis;
    }
    let months = i32::try_from(months).map_err(|_| err())?;
    Ok((months, millis))
}

/// One numeric field of a duration literal, possibly fractional
struct Field {
    integral: i64,
    fraction: Option<u16>,
}

impl Field {
    /// The field as a whole number; fractions are only legal on seconds.
    fn whole(&self) -> Option<i64> {
        match self.fraction {
            Some(_) => None,
            None => Some(self.integral),
        }
    }

    fn as_second_millis(&self) -> Option<i64> {
        self.integral
            .checked_mul(MILLIS_PER_SECOND)?
            .checked_add(i64::from(self.fraction.unwrap_or(0)))
    }
}

/// Scan `<digits><designator>` groups against an ordered designator list.
/// Returns one optional field per designator, or `None` on any malformed
/// or out-of-order input.
fn parse_fields(part: &str, designators: &[char; 3]) -> Option<[Option<Field>; 3]> {
    let mut out: [Option<Field>; 3] = [None, None, None];
    let mut slot = 0usize;
    let mut rest = part;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        if number_len == 0 || number_len == rest.len() {
            return None;
        }
        let number = &rest[..number_len];
        let designator = rest[number_len..].chars().next()?;
        rest = &rest[number_len + designator.len_utf8()..];

        let index = designators[slot..].iter().position(|d| *d == designator)? + slot;
        slot = index + 1;

        let (integral_text, fraction) = match number.split_once('.') {
            Some((whole, frac)) => {
                if frac.is_empty() || frac.len() > 9 || frac.chars().any(|c| !c.is_ascii_digit()) {
                    return None;
                }
                // Keep millisecond precision of the fraction.
                let padded = format!("{frac:0<3}");
                let millis: u16 = padded[..3].parse().ok()?;
                (whole, Some(millis))
            }
            None => (number, None),
        };
        let integral: i64 = integral_text.parse().ok()?;
        out[index] = Some(Field { integral, fraction });
    }
    Some(out)
}

/// Render month and millisecond parts in canonical minimal form
fn serialize_duration(months: i32, millis: i64) -> String {
    if months == 0 && millis == 0 {
        return "PT0S".to_string();
    }
    let negative = months < 0 || millis < 0;
    let months = i64::from(months).abs();
    let millis = millis.abs();

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('P');

    let years = months / 12;
    let months = months % 12;
    if years != 0 {
        out.push_str(&format!("{years}Y"));
    }
    if months != 0 {
        out.push_str(&format!("{months}M"));
    }

    let days = millis / MILLIS_PER_DAY;
    let hours = millis % MILLIS_PER_DAY / MILLIS_PER_HOUR;
    let minutes = millis % MILLIS_PER_HOUR / MILLIS_PER_MINUTE;
    let seconds = millis % MILLIS_PER_MINUTE / MILLIS_PER_SECOND;
    let fraction = millis % MILLIS_PER_SECOND;

    if days != 0 {
        out.push_str(&format!("{days}D"));
    }
    if hours != 0 || minutes != 0 || seconds != 0 || fraction != 0 {
        out.push('T');
        if hours != 0 {
            out.push_str(&format!("{hours}H"));
        }
        if minutes != 0 {
            out.push_str(&format!("{minutes}M"));
        }
        if seconds != 0 || fraction != 0 {
            if fraction != 0 {
                let digits = format!("{fraction:03}");
                out.push_str(&format!("{seconds}.{}S", digits.trim_end_matches('0')));
            } else {
                out.push_str(&format!("{seconds}S"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("PT2H", 2 * MILLIS_PER_HOUR)]
    #[case("PT1M", MILLIS_PER_MINUTE)]
    #[case("PT1.5S", 1_500)]
    #[case("P1D", MILLIS_PER_DAY)]
    #[case("P1DT2H3M4S", MILLIS_PER_DAY + 2 * MILLIS_PER_HOUR + 3 * MILLIS_PER_MINUTE + 4_000)]
    #[case("-PT2H", -2 * MILLIS_PER_HOUR)]
    fn day_time_parsing(#[case] lexical: &str, #[case] millis: i64) {
        let duration = DayTimeDurationItem::from_lexical(lexical).unwrap();
        assert_eq!(duration.as_millis(), millis);
    }

    #[rstest]
    #[case("P1Y", 12)]
    #[case("P1Y2M", 14)]
    #[case("P14M", 14)]
    #[case("-P1Y2M", -14)]
    fn year_month_parsing(#[case] lexical: &str, #[case] months: i32) {
        let duration = YearMonthDurationItem::from_lexical(lexical).unwrap();
        assert_eq!(duration.as_months(), months);
    }

    #[test]
    fn general_duration_keeps_both_parts() {
        let duration = DurationItem::from_lexical("P1Y2M3DT4H5M6.789S").unwrap();
        assert_eq!(duration.months(), 14);
        assert_eq!(
            duration.millis(),
            3 * MILLIS_PER_DAY + 4 * MILLIS_PER_HOUR + 5 * MILLIS_PER_MINUTE + 6_789
        );
    }

    #[rstest]
    #[case("")]
    #[case("P")]
    #[case("PT")]
    #[case("2H")]
    #[case("PT2X")]
    #[case("P1M2Y")]
    #[case("PT1.S")]
    #[case("P1.5Y")]
    fn malformed_durations(#[case] lexical: &str) {
        assert!(DurationItem::from_lexical(lexical).is_err(), "{lexical}");
    }

    #[test]
    fn family_restrictions() {
        assert!(DayTimeDurationItem::from_lexical("P1M").is_err());
        assert!(YearMonthDurationItem::from_lexical("P1D").is_err());
        assert!(YearMonthDurationItem::from_lexical("PT1S").is_err());
    }

    #[rstest]
    #[case(0, 0, "PT0S")]
    #[case(14, 0, "P1Y2M")]
    #[case(-14, 0, "-P1Y2M")]
    #[case(0, 2 * MILLIS_PER_HOUR, "PT2H")]
    #[case(0, MILLIS_PER_DAY + 90 * MILLIS_PER_MINUTE, "P1DT1H30M")]
    #[case(0, 1_500, "PT1.5S")]
    #[case(0, 1_050, "PT1.05S")]
    #[case(12, MILLIS_PER_DAY, "P1Y1D")]
    fn canonical_serialization(#[case] months: i32, #[case] millis: i64, #[case] want: &str) {
        assert_eq!(DurationItem::from_parts(months, millis).serialize(), want);
    }

    #[test]
    fn serialization_round_trips() {
        for lexical in ["PT2H", "P1Y2M", "-P3DT4H", "PT0S", "PT1.25S"] {
            let duration = DurationItem::from_lexical(lexical).unwrap();
            let reparsed = DurationItem::from_lexical(&duration.serialize()).unwrap();
            assert_eq!(reparsed, duration);
        }
    }

    #[test]
    fn arithmetic() {
        let a = DayTimeDurationItem::from_lexical("PT2H").unwrap();
        let b = DayTimeDurationItem::from_lexical("PT30M").unwrap();
        assert_eq!(a.plus(&b).unwrap().serialize(), "PT2H30M");
        assert_eq!(a.minus(&b).unwrap().serialize(), "PT1H30M");

        let y = YearMonthDurationItem::from_lexical("P1Y").unwrap();
        let m = YearMonthDurationItem::from_lexical("P2M").unwrap();
        assert_eq!(y.plus(&m).unwrap().serialize(), "P1Y2M");
        assert_eq!(y.minus(&m).unwrap().serialize(), "P10M");
    }

    #[test]
    fn mixed_sign_results_are_rejected() {
        let month = DurationItem::from_lexical("P1M").unwrap();
        let second = DurationItem::from_lexical("PT1S").unwrap();
        let negative_second = DurationItem::from_lexical("-PT1S").unwrap();

        assert_eq!(
            month.minus(&second).unwrap_err(),
            Error::arithmetic("mixed-sign duration")
        );
        assert_eq!(
            month.plus(&negative_second).unwrap_err(),
            Error::arithmetic("mixed-sign duration")
        );

        // Same-sign results stay well defined and round-trip.
        let sum = month.plus(&second).unwrap();
        assert_eq!(sum.serialize(), "P1MT1S");
        assert_eq!(DurationItem::from_lexical(&sum.serialize()).unwrap(), sum);
    }

    #[rstest]
    #[case("P999999999999999999D")]
    #[case("P999999999999999999Y")]
    #[case("PT999999999999999999H")]
    #[case("PT9999999999999999999S")]
    fn oversized_components_fail_to_parse(#[case] lexical: &str) {
        assert_eq!(
            DurationItem::from_lexical(lexical).unwrap_err(),
            Error::parse(lexical, "duration")
        );
    }

    #[test]
    fn arithmetic_overflow_is_an_error() {
        let max = DayTimeDurationItem::from_millis(i64::MAX);
        let one = DayTimeDurationItem::from_millis(1);
        assert!(max.plus(&one).is_err());
        assert!(DayTimeDurationItem::from_millis(i64::MIN).minus(&one).is_err());

        let months = YearMonthDurationItem::from_months(i32::MAX);
        assert!(months.plus(&YearMonthDurationItem::from_months(1)).is_err());
    }
}
