//! Public-surface tests: everything here goes through the facade
//! re-exports only, plus property tests over the algebraic laws.

use jsoniq::items::DurationItem;
use jsoniq::types::{Arity, SequenceType};
use jsoniq::{Item, ItemFactory, ItemType, create_sequence_type};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn facade_smoke() {
    let declared = create_sequence_type("time?").unwrap();
    let item = ItemFactory
        .from_lexical(ItemType::Time, "10:00:00.000Z")
        .unwrap();
    assert!(item.is_type_of(declared.item_type()));
    assert_eq!(item.serialize(), "10:00:00Z");
    assert_eq!(item.cast_as(ItemType::String).unwrap(), Item::String("10:00:00Z".into()));
}

fn arities() -> impl Strategy<Value = Arity> {
    prop::sample::select(vec![
        Arity::One,
        Arity::OneOrZero,
        Arity::OneOrMore,
        Arity::ZeroOrMore,
    ])
}

fn item_types() -> impl Strategy<Value = ItemType> {
    prop::sample::select(ItemType::ALL.to_vec())
}

proptest! {
    #[test]
    fn arity_multiplication_is_commutative(a in arities(), b in arities()) {
        prop_assert_eq!(a.multiply_with(b), b.multiply_with(a));
    }

    #[test]
    fn lub_bounds_both_operands(
        a_item in item_types(),
        a_arity in arities(),
        b_item in item_types(),
        b_arity in arities(),
    ) {
        let a = SequenceType::new(a_item, a_arity);
        let b = SequenceType::new(b_item, b_arity);
        let lub = a.least_common_supertype_with(&b);
        prop_assert_eq!(lub, b.least_common_supertype_with(&a));
        prop_assert!(a.is_subtype_of_or_can_be_promoted_to(&lub));
        prop_assert!(b.is_subtype_of_or_can_be_promoted_to(&lub));
    }

    #[test]
    fn subtyping_is_transitive(a in item_types(), b in item_types(), c in item_types()) {
        if a.is_subtype_of(b) && b.is_subtype_of(c) {
            prop_assert!(a.is_subtype_of(c));
        }
    }

    #[test]
    fn duration_serialization_round_trips(
        months in 0i32..120_000,
        millis in 0i64..8_000_000_000,
        negative in any::<bool>(),
    ) {
        let sign = if negative { -1 } else { 1 };
        let duration = DurationItem::from_parts(sign * months, i64::from(sign) * millis);
        let reparsed = DurationItem::from_lexical(&duration.serialize()).unwrap();
        prop_assert_eq!(reparsed, duration);
    }

    #[test]
    fn time_serialization_is_stable(
        hour in 0u32..24,
        minute in 0u32..60,
        second in 0u32..60,
        zone in prop::sample::select(vec!["", "Z", "+05:30", "-08:00"]),
    ) {
        let lexical = format!("{hour:02}:{minute:02}:{second:02}{zone}");
        let item = ItemFactory.from_lexical(ItemType::Time, &lexical).unwrap();
        prop_assert_eq!(item.serialize(), lexical);
    }
}
