//! Runtime atomic items
//!
//! `Item` is the closed variant set of atomic values the evaluation layer
//! manipulates. Capability operations (comparison, casting, arithmetic,
//! effective boolean value) are exhaustive matches over the variants, so
//! every family is statically known to be handled.

use crate::duration::{DayTimeDurationItem, DurationItem, YearMonthDurationItem};
use crate::factory::ItemFactory;
use crate::temporal::{DateItem, DateTimeItem, TimeItem};
use jsoniq_diagnostics::{Error, Result};
use jsoniq_types::ItemType;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An atomic (scalar) value.
///
/// Object, array, and function items live in the surrounding engine;
/// here they exist only as lattice nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Item {
    /// Unicode string
    String(String),
    /// Integer
    Integer(i64),
    /// Arbitrary-precision decimal
    Decimal(Decimal),
    /// IEEE 754 double
    Double(f64),
    /// Boolean
    Boolean(bool),
    /// The JSON null scalar
    Null,
    /// URI string
    AnyUri(String),
    /// Binary octets, hex lexical form
    HexBinary(Vec<u8>),
    /// Base64 lexical form, whitespace-stripped
    Base64Binary(String),
    /// Calendar date
    Date(DateItem),
    /// Time of day
    Time(TimeItem),
    /// Date and time of day
    DateTime(DateTimeItem),
    /// General duration
    Duration(DurationItem),
    /// Whole-month duration
    YearMonthDuration(YearMonthDurationItem),
    /// Millisecond duration
    DayTimeDuration(DayTimeDurationItem),
}

impl Item {
    /// The dynamic type of this value
    pub fn item_type(&self) -> ItemType {
        match self {
            Self::String(_) => ItemType::String,
            Self::Integer(_) => ItemType::Integer,
            Self::Decimal(_) => ItemType::Decimal,
            Self::Double(_) => ItemType::Double,
            Self::Boolean(_) => ItemType::Boolean,
            Self::Null => ItemType::Null,
            Self::AnyUri(_) => ItemType::AnyUri,
            Self::HexBinary(_) => ItemType::HexBinary,
            Self::Base64Binary(_) => ItemType::Base64Binary,
            Self::Date(_) => ItemType::Date,
            Self::Time(_) => ItemType::Time,
            Self::DateTime(_) => ItemType::DateTime,
            Self::Duration(_) => ItemType::Duration,
            Self::YearMonthDuration(_) => ItemType::YearMonthDuration,
            Self::DayTimeDuration(_) => ItemType::DayTimeDuration,
        }
    }

    /// The canonical name of this value's type
    pub fn type_name(&self) -> &'static str {
        self.item_type().name()
    }

    /// Check this value against a static item type via the lattice
    pub fn is_type_of(&self, item_type: ItemType) -> bool {
        self.item_type().is_subtype_of(item_type)
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The effective boolean value, where the family defines one:
    /// booleans as themselves, numerics by non-zero, strings and URIs by
    /// non-emptiness, null as false.
    pub fn effective_boolean_value(&self) -> Result<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            Self::Integer(i) => Ok(*i != 0),
            Self::Decimal(d) => Ok(!d.is_zero()),
            Self::Double(d) => Ok(*d != 0.0 && !d.is_nan()),
            Self::String(s) | Self::AnyUri(s) => Ok(!s.is_empty()),
            Self::Null => Ok(false),
            _ => Err(Error::type_mismatch(self.type_name(), "boolean")),
        }
    }

    /// Order two items.
    ///
    /// Same-family values compare by value (temporal families by
    /// instant); numerics compare across their sub-families. A null on
    /// either side answers `Greater`, so nulls sort after everything in
    /// default order-by. Anything else is a type mismatch naming both
    /// types.
    pub fn compare(&self, other: &Item) -> Result<Ordering> {
        match (self, other) {
            (Self::Null, Self::Null) => Ok(Ordering::Equal),
            (_, Self::Null) | (Self::Null, _) => Ok(Ordering::Greater),

            (Self::Double(_), b) if b.item_type().is_numeric() => {
                Ok(self.as_f64().total_cmp(&other.as_f64()))
            }
            (a, Self::Double(_)) if a.item_type().is_numeric() => {
                Ok(self.as_f64().total_cmp(&other.as_f64()))
            }
            (Self::Integer(a), Self::Integer(b)) => Ok(a.cmp(b)),
            (Self::Decimal(a), Self::Decimal(b)) => Ok(a.cmp(b)),
            (Self::Integer(a), Self::Decimal(b)) => Ok(Decimal::from(*a).cmp(b)),
            (Self::Decimal(a), Self::Integer(b)) => Ok(a.cmp(&Decimal::from(*b))),

            (Self::String(a), Self::String(b)) => Ok(a.cmp(b)),
            (Self::AnyUri(a), Self::AnyUri(b)) => Ok(a.cmp(b)),
            (Self::Boolean(a), Self::Boolean(b)) => Ok(a.cmp(b)),

            (Self::Date(a), Self::Date(b)) => Ok(a.cmp(b)),
            (Self::Time(a), Self::Time(b)) => Ok(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Ok(a.cmp(b)),

            (Self::DayTimeDuration(a), Self::DayTimeDuration(b)) => Ok(a.cmp(b)),
            (Self::YearMonthDuration(a), Self::YearMonthDuration(b)) => Ok(a.cmp(b)),

            _ => Err(Error::type_mismatch(self.type_name(), other.type_name())),
        }
    }

    /// Add two items: numeric addition, temporal shifts by durations, and
    /// duration addition within a sub-family. Anything else is a
    /// contract violation the static checker should have caught.
    pub fn add(&self, other: &Item) -> Result<Item> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a
                .checked_add(*b)
                .map(Self::Integer)
                .ok_or_else(|| Error::arithmetic("integer addition")),
            _ if self.item_type().is_numeric() && other.item_type().is_numeric() => {
                if matches!(self, Self::Double(_)) || matches!(other, Self::Double(_)) {
                    Ok(Self::Double(self.as_f64() + other.as_f64()))
                } else {
                    Ok(Self::Decimal(self.as_decimal() + other.as_decimal()))
                }
            }

            (Self::Time(t), Self::DayTimeDuration(d)) => Ok(Self::Time(t.plus_day_time(d))),
            (Self::Date(t), Self::DayTimeDuration(d)) => Ok(Self::Date(t.plus_day_time(d))),
            (Self::DateTime(t), Self::DayTimeDuration(d)) => {
                Ok(Self::DateTime(t.plus_day_time(d)))
            }
            (Self::DateTime(t), Self::YearMonthDuration(d)) => {
                Ok(Self::DateTime(t.plus_months(d.as_months())?))
            }

            (Self::DayTimeDuration(a), Self::DayTimeDuration(b)) => {
                a.plus(b).map(Self::DayTimeDuration)
            }
            (Self::YearMonthDuration(a), Self::YearMonthDuration(b)) => {
                a.plus(b).map(Self::YearMonthDuration)
            }
            (Self::Duration(a), Self::Duration(b)) => a.plus(b).map(Self::Duration),

            _ => Err(Error::class_cast(self.type_name(), other.type_name())),
        }
    }

    /// Subtract `other` from this item. Same-family temporal subtraction
    /// yields the exact day-time duration between the two instants.
    pub fn subtract(&self, other: &Item) -> Result<Item> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a
                .checked_sub(*b)
                .map(Self::Integer)
                .ok_or_else(|| Error::arithmetic("integer subtraction")),
            _ if self.item_type().is_numeric() && other.item_type().is_numeric() => {
                if matches!(self, Self::Double(_)) || matches!(other, Self::Double(_)) {
                    Ok(Self::Double(self.as_f64() - other.as_f64()))
                } else {
                    Ok(Self::Decimal(self.as_decimal() - other.as_decimal()))
                }
            }

            (Self::Time(a), Self::Time(b)) => Ok(Self::DayTimeDuration(a.minus_time(b))),
            (Self::Date(a), Self::Date(b)) => Ok(Self::DayTimeDuration(a.minus_date(b))),
            (Self::DateTime(a), Self::DateTime(b)) => {
                Ok(Self::DayTimeDuration(a.minus_date_time(b)))
            }

            (Self::Time(t), Self::DayTimeDuration(d)) => Ok(Self::Time(t.minus_day_time(d))),
            (Self::Date(t), Self::DayTimeDuration(d)) => Ok(Self::Date(t.minus_day_time(d))),
            (Self::DateTime(t), Self::DayTimeDuration(d)) => {
                Ok(Self::DateTime(t.minus_day_time(d)))
            }
            (Self::DateTime(t), Self::YearMonthDuration(d)) => {
                Ok(Self::DateTime(t.plus_months(-d.as_months())?))
            }

            (Self::DayTimeDuration(a), Self::DayTimeDuration(b)) => {
                a.minus(b).map(Self::DayTimeDuration)
            }
            (Self::YearMonthDuration(a), Self::YearMonthDuration(b)) => {
                a.minus(b).map(Self::YearMonthDuration)
            }
            (Self::Duration(a), Self::Duration(b)) => a.minus(b).map(Self::Duration),

            _ => Err(Error::class_cast(self.type_name(), other.type_name())),
        }
    }

    /// Whether `cast_as` is defined for the target type
    pub fn is_castable_as(&self, target: ItemType) -> bool {
        if target == self.item_type() || target == ItemType::String {
            return true;
        }
        match self {
            Self::String(_) => matches!(
                target,
                ItemType::Integer
                    | ItemType::Decimal
                    | ItemType::Double
                    | ItemType::Boolean
                    | ItemType::AnyUri
                    | ItemType::Date
                    | ItemType::Time
                    | ItemType::DateTime
                    | ItemType::Duration
                    | ItemType::YearMonthDuration
                    | ItemType::DayTimeDuration
                    | ItemType::HexBinary
                    | ItemType::Base64Binary
            ),
            Self::Integer(_) | Self::Decimal(_) | Self::Double(_) => {
                matches!(
                    target,
                    ItemType::Integer | ItemType::Decimal | ItemType::Double | ItemType::Boolean
                )
            }
            Self::Boolean(_) => matches!(
                target,
                ItemType::Integer | ItemType::Decimal | ItemType::Double
            ),
            Self::AnyUri(_) => false,
            Self::Duration(_) => matches!(
                target,
                ItemType::YearMonthDuration | ItemType::DayTimeDuration
            ),
            Self::YearMonthDuration(_) | Self::DayTimeDuration(_) => {
                matches!(target, ItemType::Duration)
            }
            // Temporal items cast only within their own family and to
            // string; binaries and null likewise add nothing.
            _ => false,
        }
    }

    /// Cast to the target type. Must only be invoked after
    /// [`is_castable_as`](Self::is_castable_as) confirms feasibility;
    /// an undefined target answers `ClassCast`.
    pub fn cast_as(&self, target: ItemType) -> Result<Item> {
        if !self.is_castable_as(target) {
            return Err(Error::class_cast(self.type_name(), target.name()));
        }
        if target == self.item_type() {
            return Ok(self.clone());
        }
        if target == ItemType::String {
            return Ok(Self::String(self.serialize()));
        }
        match self {
            Self::String(s) => ItemFactory.from_lexical(target, s),
            Self::Integer(i) => match target {
                ItemType::Decimal => Ok(Self::Decimal(Decimal::from(*i))),
                ItemType::Double => Ok(Self::Double(*i as f64)),
                ItemType::Boolean => Ok(Self::Boolean(*i != 0)),
                _ => Err(Error::class_cast(self.type_name(), target.name())),
            },
            Self::Decimal(d) => match target {
                ItemType::Integer => d
                    .trunc()
                    .to_i64()
                    .map(Self::Integer)
                    .ok_or_else(|| Error::class_cast(self.type_name(), target.name())),
                ItemType::Double => Ok(Self::Double(d.to_f64().unwrap_or(f64::NAN))),
                ItemType::Boolean => Ok(Self::Boolean(!d.is_zero())),
                _ => Err(Error::class_cast(self.type_name(), target.name())),
            },
            Self::Double(d) => match target {
                ItemType::Integer => Ok(Self::Integer(d.trunc() as i64)),
                ItemType::Decimal => Decimal::try_from(*d)
                    .map(Self::Decimal)
                    .map_err(|_| Error::class_cast(self.type_name(), target.name())),
                ItemType::Boolean => Ok(Self::Boolean(*d != 0.0 && !d.is_nan())),
                _ => Err(Error::class_cast(self.type_name(), target.name())),
            },
            Self::Boolean(b) => match target {
                ItemType::Integer => Ok(Self::Integer(i64::from(*b))),
                ItemType::Decimal => Ok(Self::Decimal(Decimal::from(i64::from(*b)))),
                ItemType::Double => Ok(Self::Double(if *b { 1.0 } else { 0.0 })),
                _ => Err(Error::class_cast(self.type_name(), target.name())),
            },
            Self::Duration(d) => match target {
                ItemType::YearMonthDuration => Ok(Self::YearMonthDuration(
                    YearMonthDurationItem::from_months(d.months()),
                )),
                ItemType::DayTimeDuration => Ok(Self::DayTimeDuration(
                    DayTimeDurationItem::from_millis(d.millis()),
                )),
                _ => Err(Error::class_cast(self.type_name(), target.name())),
            },
            Self::YearMonthDuration(d) => Ok(Self::Duration(DurationItem::from_parts(
                d.as_months(),
                0,
            ))),
            Self::DayTimeDuration(d) => {
                Ok(Self::Duration(DurationItem::from_parts(0, d.as_millis())))
            }
            _ => Err(Error::class_cast(self.type_name(), target.name())),
        }
    }

    /// The canonical lexical form: the engine's display and deduplication
    /// key, deterministic and minimal.
    pub fn serialize(&self) -> String {
        match self {
            Self::String(s) | Self::AnyUri(s) | Self::Base64Binary(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Decimal(d) => d.normalize().to_string(),
            Self::Double(d) => {
                if d.is_nan() {
                    "NaN".to_string()
                } else if d.is_infinite() {
                    if *d > 0.0 { "INF" } else { "-INF" }.to_string()
                } else {
                    format!("{d}")
                }
            }
            Self::Boolean(b) => b.to_string(),
            Self::Null => "null".to_string(),
            Self::HexBinary(bytes) => bytes.iter().map(|b| format!("{b:02X}")).collect(),
            Self::Date(d) => d.serialize(),
            Self::Time(t) => t.serialize(),
            Self::DateTime(dt) => dt.serialize(),
            Self::Duration(d) => d.serialize(),
            Self::YearMonthDuration(d) => d.serialize(),
            Self::DayTimeDuration(d) => d.serialize(),
        }
    }

    /// Numeric value as a double; callers guard with `is_numeric`
    fn as_f64(&self) -> f64 {
        match self {
            Self::Integer(i) => *i as f64,
            Self::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
            Self::Double(d) => *d,
            _ => f64::NAN,
        }
    }

    /// Numeric value as a decimal; callers guard against doubles
    fn as_decimal(&self) -> Decimal {
        match self {
            Self::Integer(i) => Decimal::from(*i),
            Self::Decimal(d) => *d,
            _ => Decimal::ZERO,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.serialize())
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            // Reflexive on NaN so Eq holds.
            (Self::Double(a), Self::Double(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::AnyUri(a), Self::AnyUri(b)) => a == b,
            (Self::HexBinary(a), Self::HexBinary(b)) => a == b,
            (Self::Base64Binary(a), Self::Base64Binary(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Duration(a), Self::Duration(b)) => a == b,
            (Self::YearMonthDuration(a), Self::YearMonthDuration(b)) => a == b,
            (Self::DayTimeDuration(a), Self::DayTimeDuration(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::String(s) | Self::AnyUri(s) | Self::Base64Binary(s) => s.hash(state),
            Self::Integer(i) => i.hash(state),
            Self::Decimal(d) => d.hash(state),
            Self::Double(d) => d.to_bits().hash(state),
            Self::Boolean(b) => b.hash(state),
            Self::Null => {}
            Self::HexBinary(bytes) => bytes.hash(state),
            Self::Date(d) => d.hash(state),
            Self::Time(t) => t.hash(state),
            Self::DateTime(dt) => dt.hash(state),
            Self::Duration(d) => d.hash(state),
            Self::YearMonthDuration(d) => d.hash(state),
            Self::DayTimeDuration(d) => d.hash(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn time(lexical: &str) -> Item {
        Item::Time(TimeItem::from_lexical(lexical).unwrap())
    }

    #[test]
    fn dynamic_types() {
        assert_eq!(Item::Integer(1).item_type(), ItemType::Integer);
        assert_eq!(time("10:00:00").item_type(), ItemType::Time);
        assert!(Item::Integer(1).is_type_of(ItemType::Atomic));
        assert!(Item::Integer(1).is_type_of(ItemType::Item));
        assert!(!Item::Integer(1).is_type_of(ItemType::Decimal));
    }

    #[test]
    fn effective_boolean_values() {
        assert!(Item::Boolean(true).effective_boolean_value().unwrap());
        assert!(!Item::Integer(0).effective_boolean_value().unwrap());
        assert!(Item::String("x".into()).effective_boolean_value().unwrap());
        assert!(!Item::Null.effective_boolean_value().unwrap());
        assert!(!Item::Double(f64::NAN).effective_boolean_value().unwrap());
        assert!(time("10:00:00").effective_boolean_value().is_err());
    }

    #[test]
    fn null_sorts_after_everything() {
        assert_eq!(
            time("10:00:00").compare(&Item::Null).unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            Item::Null.compare(&time("10:00:00")).unwrap(),
            Ordering::Greater
        );
        assert_eq!(Item::Null.compare(&Item::Null).unwrap(), Ordering::Equal);
    }

    #[test]
    fn cross_numeric_comparison() {
        let two = Item::Integer(2);
        let two_and_a_half = Item::Double(2.5);
        assert_eq!(two.compare(&two_and_a_half).unwrap(), Ordering::Less);
        assert_eq!(
            Item::Decimal(Decimal::new(25, 1)).compare(&two).unwrap(),
            Ordering::Greater
        );
    }

    #[test]
    fn incompatible_comparison_names_both_types() {
        let err = time("10:00:00").compare(&Item::Integer(3)).unwrap_err();
        assert_eq!(err, Error::type_mismatch("time", "integer"));
    }

    #[test]
    fn temporal_arithmetic_through_items() {
        let start = time("14:30:00");
        let end = time("16:30:00");
        let diff = end.subtract(&start).unwrap();
        assert_eq!(diff, Item::DayTimeDuration(DayTimeDurationItem::from_millis(7_200_000)));
        assert_eq!(start.add(&diff).unwrap(), end);
    }

    #[test]
    fn undefined_arithmetic_is_a_class_cast() {
        let err = time("10:00:00").add(&Item::Integer(1)).unwrap_err();
        assert_eq!(err, Error::class_cast("time", "integer"));
        let err = time("10:00:00")
            .subtract(&Item::String("x".into()))
            .unwrap_err();
        assert_eq!(err, Error::class_cast("time", "string"));
    }

    #[test]
    fn integer_overflow_is_an_error() {
        assert_eq!(
            Item::Integer(i64::MAX).add(&Item::Integer(1)).unwrap_err(),
            Error::arithmetic("integer addition")
        );
        assert_eq!(
            Item::Integer(i64::MIN)
                .subtract(&Item::Integer(1))
                .unwrap_err(),
            Error::arithmetic("integer subtraction")
        );
    }

    #[test]
    fn mixed_sign_duration_subtraction_is_an_error() {
        let month = Item::Duration(DurationItem::from_parts(1, 0));
        let second = Item::Duration(DurationItem::from_parts(0, 1_000));
        assert_eq!(
            month.subtract(&second).unwrap_err(),
            Error::arithmetic("mixed-sign duration")
        );
    }

    #[test]
    fn casting_temporal_items() {
        let item = time("10:00:00.000Z");
        assert!(item.is_castable_as(ItemType::Time));
        assert!(item.is_castable_as(ItemType::String));
        assert!(!item.is_castable_as(ItemType::Integer));

        assert_eq!(item.cast_as(ItemType::Time).unwrap(), item);
        assert_eq!(
            item.cast_as(ItemType::String).unwrap(),
            Item::String("10:00:00Z".into())
        );
        assert_eq!(
            item.cast_as(ItemType::Integer).unwrap_err(),
            Error::class_cast("time", "integer")
        );
    }

    #[test]
    fn casting_numerics_and_strings() {
        assert_eq!(
            Item::Integer(2).cast_as(ItemType::Double).unwrap(),
            Item::Double(2.0)
        );
        assert_eq!(
            Item::String("42".into()).cast_as(ItemType::Integer).unwrap(),
            Item::Integer(42)
        );
        assert_eq!(
            Item::Boolean(true).cast_as(ItemType::Integer).unwrap(),
            Item::Integer(1)
        );
        assert_eq!(
            Item::Duration(DurationItem::from_parts(14, 500))
                .cast_as(ItemType::YearMonthDuration)
                .unwrap(),
            Item::YearMonthDuration(YearMonthDurationItem::from_months(14))
        );
    }

    #[test]
    fn serialization_is_minimal() {
        assert_eq!(Item::Integer(42).serialize(), "42");
        assert_eq!(Item::Decimal(Decimal::new(2500, 3)).serialize(), "2.5");
        assert_eq!(Item::Double(2.5).serialize(), "2.5");
        assert_eq!(Item::Boolean(false).serialize(), "false");
        assert_eq!(Item::Null.serialize(), "null");
        assert_eq!(Item::HexBinary(vec![0xAB, 0x01]).serialize(), "AB01");
        assert_eq!(time("10:00:00.000Z").serialize(), "10:00:00Z");
    }
}
