//! Item construction
//!
//! `ItemFactory` is the single entry point for turning lexical text into
//! typed items. Every constructible atomic type dispatches to its
//! family's parser; a failed parse reports the offending literal and the
//! target type, and a non-constructible target (abstract lattice nodes
//! like `atomic`) reports an undefined cast.

use crate::duration::{DayTimeDurationItem, DurationItem, YearMonthDurationItem};
use crate::item::Item;
use crate::temporal::{DateItem, DateTimeItem, TimeItem};
use jsoniq_diagnostics::{Error, Result};
use jsoniq_types::ItemType;
use rust_decimal::Decimal;

/// Builds items from lexical text or native values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemFactory;

impl ItemFactory {
    /// Parse `lexical` as a value of `target`.
    pub fn from_lexical(&self, target: ItemType, lexical: &str) -> Result<Item> {
        let err = || Error::parse(lexical, target.name());
        match target {
            ItemType::String => Ok(Item::String(lexical.to_string())),
            ItemType::AnyUri => Ok(Item::AnyUri(lexical.to_string())),
            ItemType::Integer => lexical
                .parse::<i64>()
                .map(Item::Integer)
                .map_err(|_| err()),
            ItemType::Decimal => lexical
                .parse::<Decimal>()
                .map(Item::Decimal)
                .map_err(|_| err()),
            ItemType::Double => parse_double(lexical).map(Item::Double).ok_or_else(err),
            ItemType::Boolean => match lexical {
                "true" | "1" => Ok(Item::Boolean(true)),
                "false" | "0" => Ok(Item::Boolean(false)),
                _ => Err(err()),
            },
            ItemType::Null => match lexical {
                "null" => Ok(Item::Null),
                _ => Err(err()),
            },
            ItemType::HexBinary => parse_hex(lexical).map(Item::HexBinary).ok_or_else(err),
            ItemType::Base64Binary => parse_base64(lexical)
                .map(Item::Base64Binary)
                .ok_or_else(err),
            ItemType::Date => DateItem::from_lexical(lexical).map(Item::Date),
            ItemType::Time => TimeItem::from_lexical(lexical).map(Item::Time),
            ItemType::DateTime => DateTimeItem::from_lexical(lexical).map(Item::DateTime),
            ItemType::Duration => DurationItem::from_lexical(lexical).map(Item::Duration),
            ItemType::YearMonthDuration => {
                YearMonthDurationItem::from_lexical(lexical).map(Item::YearMonthDuration)
            }
            ItemType::DayTimeDuration => {
                DayTimeDurationItem::from_lexical(lexical).map(Item::DayTimeDuration)
            }
            _ => Err(Error::class_cast("string", target.name())),
        }
    }

    pub fn string(&self, value: impl Into<String>) -> Item {
        Item::String(value.into())
    }

    pub fn integer(&self, value: i64) -> Item {
        Item::Integer(value)
    }

    pub fn decimal(&self, value: Decimal) -> Item {
        Item::Decimal(value)
    }

    pub fn double(&self, value: f64) -> Item {
        Item::Double(value)
    }

    pub fn boolean(&self, value: bool) -> Item {
        Item::Boolean(value)
    }

    pub fn null(&self) -> Item {
        Item::Null
    }

    pub fn any_uri(&self, value: impl Into<String>) -> Item {
        Item::AnyUri(value.into())
    }

    pub fn hex_binary(&self, bytes: Vec<u8>) -> Item {
        Item::HexBinary(bytes)
    }

    pub fn day_time_duration(&self, millis: i64) -> Item {
        Item::DayTimeDuration(DayTimeDurationItem::from_millis(millis))
    }

    pub fn year_month_duration(&self, months: i32) -> Item {
        Item::YearMonthDuration(YearMonthDurationItem::from_months(months))
    }
}

/// Standard lexical doubles: the exact specials `INF`, `-INF`, and `NaN`,
/// plus plain decimal and scientific notation. The looser spellings the
/// stdlib parser accepts (`inf`, `Infinity`) are rejected.
fn parse_double(lexical: &str) -> Option<f64> {
    match lexical {
        "INF" | "+INF" => return Some(f64::INFINITY),
        "-INF" => return Some(f64::NEG_INFINITY),
        "NaN" => return Some(f64::NAN),
        _ => {}
    }
    if lexical
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        lexical.parse::<f64>().ok()
    } else {
        None
    }
}

fn parse_hex(lexical: &str) -> Option<Vec<u8>> {
    if lexical.len() % 2 != 0 {
        return None;
    }
    lexical
        .as_bytes()
        .chunks_exact(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(text, 16).ok()
        })
        .collect()
}

/// Validate a base64 literal and return it with whitespace stripped.
fn parse_base64(lexical: &str) -> Option<String> {
    let stripped: String = lexical.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.len() % 4 != 0 {
        return None;
    }
    let bytes = stripped.as_bytes();
    let padding = bytes.iter().rev().take_while(|b| **b == b'=').count();
    if padding > 2 {
        return None;
    }
    let body = &bytes[..bytes.len() - padding];
    if body
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/'))
    {
        Some(stripped)
    } else {
        None
    }
}
