//! Binary transport encoding for temporal items
//!
//! Layout per item: the resolved instant as a little-endian millisecond
//! timestamp, the explicit-zone flag as one byte, then the zone
//! designator (`Z` or `±hh:mm`) as a length-prefixed UTF-8 string. The
//! designator is written even for zone-less items so decoding restores
//! the exact offset the item was resolved against.

use crate::temporal::{DateItem, DateTimeItem, TimeItem};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use jsoniq_diagnostics::{Error, Result};

/// Fixed-size prefix: millis (8) + flag (1) + designator length (2)
const HEADER_LEN: usize = 11;

pub fn encode_time(item: &TimeItem) -> Vec<u8> {
    encode(item.instant(), item.has_explicit_timezone())
}

pub fn decode_time(bytes: &[u8]) -> Result<TimeItem> {
    decode(bytes, "time").map(|(instant, has_timezone)| TimeItem::from_parts(instant, has_timezone))
}

pub fn encode_date(item: &DateItem) -> Vec<u8> {
    encode(item.instant(), item.has_explicit_timezone())
}

pub fn decode_date(bytes: &[u8]) -> Result<DateItem> {
    decode(bytes, "date").map(|(instant, has_timezone)| DateItem::from_parts(instant, has_timezone))
}

pub fn encode_date_time(item: &DateTimeItem) -> Vec<u8> {
    encode(item.instant(), item.has_explicit_timezone())
}

pub fn decode_date_time(bytes: &[u8]) -> Result<DateTimeItem> {
    decode(bytes, "dateTime")
        .map(|(instant, has_timezone)| DateTimeItem::from_parts(instant, has_timezone))
}

fn encode(instant: DateTime<FixedOffset>, has_timezone: bool) -> Vec<u8> {
    let designator = zone_designator(&instant);
    let mut out = Vec::with_capacity(HEADER_LEN + designator.len());
    out.extend_from_slice(&instant.timestamp_millis().to_le_bytes());
    out.push(u8::from(has_timezone));
    out.extend_from_slice(&(designator.len() as u16).to_le_bytes());
    out.extend_from_slice(designator.as_bytes());
    out
}

fn decode(bytes: &[u8], target: &str) -> Result<(DateTime<FixedOffset>, bool)> {
    let err = || Error::parse("<binary>", target);
    if bytes.len() < HEADER_LEN {
        return Err(err());
    }
    let millis = i64::from_le_bytes(bytes[..8].try_into().map_err(|_| err())?);
    let has_timezone = match bytes[8] {
        0 => false,
        1 => true,
        _ => return Err(err()),
    };
    let designator_len = usize::from(u16::from_le_bytes(
        bytes[9..HEADER_LEN].try_into().map_err(|_| err())?,
    ));
    if bytes.len() != HEADER_LEN + designator_len {
        return Err(err());
    }
    let designator = std::str::from_utf8(&bytes[HEADER_LEN..]).map_err(|_| err())?;
    let offset = parse_zone_designator(designator).ok_or_else(err)?;
    let instant = DateTime::from_timestamp_millis(millis)
        .ok_or_else(err)?
        .with_timezone(&offset);
    Ok((instant, has_timezone))
}

fn zone_designator(instant: &DateTime<FixedOffset>) -> String {
    let seconds = instant.offset().local_minus_utc();
    if seconds == 0 {
        "Z".to_string()
    } else {
        let sign = if seconds < 0 { '-' } else { '+' };
        let abs = seconds.abs();
        format!("{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
    }
}

fn parse_zone_designator(designator: &str) -> Option<FixedOffset> {
    if designator == "Z" {
        return Some(Utc.fix());
    }
    let bytes = designator.as_bytes();
    if designator.len() != 6 || !matches!(bytes[0], b'+' | b'-') || bytes[3] != b':' {
        return None;
    }
    let sign = if bytes[0] == b'-' { -1 } else { 1 };
    let hours: i32 = designator[1..3].parse().ok()?;
    let minutes: i32 = designator[4..6].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("10:00:00Z")]
    #[case("10:00:00.25Z")]
    #[case("14:30:00")]
    #[case("23:59:59+05:30")]
    fn time_round_trips(#[case] lexical: &str) {
        let time = TimeItem::from_lexical(lexical).unwrap();
        let decoded = decode_time(&encode_time(&time)).unwrap();
        assert_eq!(decoded, time);
        assert_eq!(decoded.has_explicit_timezone(), time.has_explicit_timezone());
        assert_eq!(decoded.serialize(), lexical);
    }

    #[rstest]
    #[case("2024-02-29")]
    #[case("2024-02-29-08:00")]
    fn date_round_trips(#[case] lexical: &str) {
        let date = DateItem::from_lexical(lexical).unwrap();
        let decoded = decode_date(&encode_date(&date)).unwrap();
        assert_eq!(decoded, date);
        assert_eq!(decoded.serialize(), lexical);
    }

    #[test]
    fn date_time_round_trips() {
        let dt = DateTimeItem::from_lexical("2024-03-01T10:00:00.5+02:00").unwrap();
        let decoded = decode_date_time(&encode_date_time(&dt)).unwrap();
        assert_eq!(decoded, dt);
        assert_eq!(decoded.serialize(), "2024-03-01T10:00:00.5+02:00");
    }

    #[test]
    fn truncated_buffers_fail() {
        let time = TimeItem::from_lexical("10:00:00Z").unwrap();
        let bytes = encode_time(&time);
        for len in 0..bytes.len() {
            assert!(decode_time(&bytes[..len]).is_err(), "length {len}");
        }
    }

    #[test]
    fn corrupt_flag_and_designator_fail() {
        let time = TimeItem::from_lexical("10:00:00Z").unwrap();

        let mut bytes = encode_time(&time);
        bytes[8] = 7;
        assert_eq!(decode_time(&bytes).unwrap_err(), Error::parse("<binary>", "time"));

        let mut bytes = encode_time(&time);
        let last = bytes.len() - 1;
        bytes[last] = b'?';
        assert!(decode_time(&bytes).is_err());
    }
}
