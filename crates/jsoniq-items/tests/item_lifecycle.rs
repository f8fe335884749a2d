//! Whole-lifecycle exercises: items built from lexical text, checked
//! against declared types, combined arithmetically, cast, serialized,
//! and shipped through the binary encoding.

use jsoniq_diagnostics::Error;
use jsoniq_items::{
    DateTimeItem, Item, ItemFactory, TimeItem, decode_date_time, decode_time, encode_date_time,
    encode_time,
};
use jsoniq_types::{ItemType, create_sequence_type};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::cmp::Ordering;

#[test]
fn declared_type_matching() {
    let declared = create_sequence_type("time?").unwrap();
    let item = ItemFactory.from_lexical(ItemType::Time, "10:00:00Z").unwrap();
    assert!(item.is_type_of(declared.item_type()));
    assert!(!item.is_type_of(ItemType::Date));
}

#[test]
fn schedule_arithmetic() {
    // Shift an appointment by two weeks and a quarter, then measure the
    // distance back to the original.
    let start = ItemFactory
        .from_lexical(ItemType::DateTime, "2024-01-31T09:00:00+01:00")
        .unwrap();
    let two_weeks = ItemFactory
        .from_lexical(ItemType::DayTimeDuration, "P14D")
        .unwrap();
    let quarter = ItemFactory
        .from_lexical(ItemType::YearMonthDuration, "P3M")
        .unwrap();

    let shifted = start.add(&two_weeks).unwrap().add(&quarter).unwrap();
    assert_eq!(shifted.serialize(), "2024-05-14T09:00:00+01:00");

    let distance = shifted.subtract(&start).unwrap();
    assert_eq!(distance.item_type(), ItemType::DayTimeDuration);
    assert_eq!(distance.serialize(), "P104D");
}

#[test]
fn ordering_with_nulls_last() {
    let mut items = vec![
        Item::Null,
        ItemFactory.from_lexical(ItemType::Time, "16:00:00Z").unwrap(),
        ItemFactory.from_lexical(ItemType::Time, "09:30:00Z").unwrap(),
    ];
    items.sort_by(|a, b| a.compare(b).unwrap_or(Ordering::Equal));
    let rendered: Vec<String> = items.iter().map(Item::serialize).collect();
    assert_eq!(rendered, ["09:30:00Z", "16:00:00Z", "null"]);
}

#[rstest]
#[case("10:00:00.000Z", "10:00:00Z")]
#[case("10:00:00.500+00:00", "10:00:00.5Z")]
#[case("14:30:00", "14:30:00")]
fn casting_time_to_string_uses_the_canonical_form(#[case] lexical: &str, #[case] want: &str) {
    let item = ItemFactory.from_lexical(ItemType::Time, lexical).unwrap();
    assert_eq!(item.cast_as(ItemType::String).unwrap(), Item::String(want.into()));
}

#[test]
fn cross_family_casts_are_rejected() {
    let time = ItemFactory.from_lexical(ItemType::Time, "10:00:00Z").unwrap();
    for target in [ItemType::Date, ItemType::DateTime, ItemType::Integer] {
        assert_eq!(
            time.cast_as(target).unwrap_err(),
            Error::class_cast("time", target.name())
        );
    }
}

#[test]
fn binary_encoding_preserves_identity_and_rendering() {
    let time = TimeItem::from_lexical("23:15:00.25-07:00").unwrap();
    let restored = decode_time(&encode_time(&time)).unwrap();
    assert_eq!(restored, time);
    assert_eq!(restored.serialize(), time.serialize());

    // A zone-less item stays zone-less through transport.
    let dt = DateTimeItem::from_lexical("2024-06-01T12:00:00").unwrap();
    let restored = decode_date_time(&encode_date_time(&dt)).unwrap();
    assert!(!restored.has_explicit_timezone());
    assert_eq!(restored.serialize(), "2024-06-01T12:00:00");
}

#[test]
fn deduplication_by_instant() {
    use std::collections::HashSet;

    let mut seen = HashSet::new();
    for lexical in ["12:00:00Z", "14:00:00+02:00", "12:00:00"] {
        seen.insert(ItemFactory.from_lexical(ItemType::Time, lexical).unwrap());
    }
    // All three resolve to the same instant.
    assert_eq!(seen.len(), 1);
}
