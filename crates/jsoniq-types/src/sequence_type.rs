//! The SequenceType algebra
//!
//! A sequence type is either a pair of an item type and an arity, or the
//! distinguished empty sequence `()`, which carries neither. Sequence
//! types come from two places: the named-type registry (a fixed table
//! resolving the declared-type annotation strings handed over by the
//! parser) and the algebraic operations below (promotion, lub), which may
//! build instances that have no surface name.
//!
//! Plain subtyping is deliberately stricter than the arity partial order:
//! a declaration of `integer` means exactly one integer, so `integer` is
//! not a plain subtype of `integer?`. The covariant arity check and the
//! implicit promotions only apply through
//! [`SequenceType::is_subtype_of_or_can_be_promoted_to`].

use crate::{Arity, ItemType};
use jsoniq_diagnostics::{Error, Result, invariant_violation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// A static type for a sequence of items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceType {
    kind: Kind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
enum Kind {
    Empty,
    Of { item_type: ItemType, arity: Arity },
}

impl SequenceType {
    /// The most general sequence type, `item*`
    pub const MOST_GENERAL: SequenceType = SequenceType {
        kind: Kind::Of {
            item_type: ItemType::Item,
            arity: Arity::ZeroOrMore,
        },
    };

    /// The empty sequence type, `()`
    pub const EMPTY: SequenceType = SequenceType { kind: Kind::Empty };

    /// Create a sequence type from an item type and an arity
    pub const fn new(item_type: ItemType, arity: Arity) -> Self {
        Self {
            kind: Kind::Of { item_type, arity },
        }
    }

    /// Create a sequence type of exactly one item
    pub const fn one(item_type: ItemType) -> Self {
        Self::new(item_type, Arity::One)
    }

    /// The empty sequence type, as a constructor
    pub const fn empty_sequence() -> Self {
        Self::EMPTY
    }

    /// Check if this is the empty sequence type
    pub const fn is_empty_sequence(&self) -> bool {
        matches!(self.kind, Kind::Empty)
    }

    /// The item type of this sequence type.
    ///
    /// # Panics
    ///
    /// Panics on the empty sequence type; callers must check
    /// [`is_empty_sequence`](Self::is_empty_sequence) first.
    pub fn item_type(&self) -> ItemType {
        match self.kind {
            Kind::Of { item_type, .. } => item_type,
            Kind::Empty => invariant_violation("empty sequence type has no item type"),
        }
    }

    /// The arity of this sequence type.
    ///
    /// # Panics
    ///
    /// Panics on the empty sequence type; callers must check
    /// [`is_empty_sequence`](Self::is_empty_sequence) first.
    pub fn arity(&self) -> Arity {
        match self.kind {
            Kind::Of { arity, .. } => arity,
            Kind::Empty => invariant_violation("empty sequence type has no arity"),
        }
    }

    /// Plain subtype check.
    ///
    /// The empty sequence is a subtype of anything whose arity admits zero
    /// occurrences. Between non-empty sequence types, the item types must
    /// be in the subtype relation and the arities must be exactly equal.
    pub fn is_subtype_of(&self, other: &SequenceType) -> bool {
        match (self.kind, other.kind) {
            (Kind::Empty, Kind::Empty) => true,
            (Kind::Empty, Kind::Of { arity, .. }) => arity.admits_zero(),
            (Kind::Of { .. }, Kind::Empty) => false,
            (
                Kind::Of { item_type, arity },
                Kind::Of {
                    item_type: other_item,
                    arity: other_arity,
                },
            ) => item_type.is_subtype_of(other_item) && arity == other_arity,
        }
    }

    /// Promotion-aware subtype check, used where implicit widening is
    /// legal (function arguments, declared-type matching).
    ///
    /// Arity is checked covariantly against the arity partial order, and
    /// the item type additionally admits the three named promotions:
    /// string-promotable types to string, numerics to double, and integer
    /// to decimal.
    pub fn is_subtype_of_or_can_be_promoted_to(&self, other: &SequenceType) -> bool {
        match (self.kind, other.kind) {
            (Kind::Empty, Kind::Empty) => true,
            (Kind::Empty, Kind::Of { arity, .. }) => arity.admits_zero(),
            (Kind::Of { .. }, Kind::Empty) => false,
            (
                Kind::Of { item_type, arity },
                Kind::Of {
                    item_type: other_item,
                    arity: other_arity,
                },
            ) => arity.is_subtype_of(other_arity) && can_be_promoted_to(item_type, other_item),
        }
    }

    /// Check whether a value could conform to both sequence types.
    ///
    /// Arities never exclude each other (every pair shares at least the
    /// one-item case or the empty case), so between non-empty types the
    /// question reduces to the item types: they overlap iff one is a
    /// subtype of the other.
    pub fn has_overlap_with(&self, other: &SequenceType) -> bool {
        match (self.kind, other.kind) {
            (Kind::Empty, Kind::Empty) => true,
            (Kind::Empty, Kind::Of { arity, .. }) | (Kind::Of { arity, .. }, Kind::Empty) => {
                arity.admits_zero()
            }
            (
                Kind::Of { item_type, .. },
                Kind::Of {
                    item_type: other_item,
                    ..
                },
            ) => item_type.is_subtype_of(other_item) || other_item.is_subtype_of(item_type),
        }
    }

    /// The least common supertype of two sequence types. Commutative.
    ///
    /// Joining with the empty sequence keeps the other side's item type
    /// and widens its arity one step toward optionality.
    pub fn least_common_supertype_with(&self, other: &SequenceType) -> SequenceType {
        match (self.kind, other.kind) {
            (Kind::Empty, Kind::Empty) => Self::EMPTY,
            (Kind::Empty, Kind::Of { item_type, arity })
            | (Kind::Of { item_type, arity }, Kind::Empty) => {
                Self::new(item_type, widen_toward_optional(arity))
            }
            (
                Kind::Of { item_type, arity },
                Kind::Of {
                    item_type: other_item,
                    arity: other_arity,
                },
            ) => Self::new(
                item_type.find_common_supertype(other_item),
                arity.least_upper_bound(other_arity),
            ),
        }
    }

    /// Allow at least one more item: One becomes OneOrMore and OneOrZero
    /// becomes ZeroOrMore; already-unbounded arities and the empty
    /// sequence are returned unchanged.
    pub fn increment_arity(&self) -> SequenceType {
        match self.kind {
            Kind::Of {
                item_type,
                arity: Arity::One,
            } => Self::new(item_type, Arity::OneOrMore),
            Kind::Of {
                item_type,
                arity: Arity::OneOrZero,
            } => Self::new(item_type, Arity::ZeroOrMore),
            _ => *self,
        }
    }

    /// Whether a value of this type is statically known to have an
    /// effective boolean value.
    ///
    /// The empty sequence is falsy, JSON containers are always truthy,
    /// and single (or optional single) atomics of the boolean, numeric,
    /// string, anyURI, and null families have a defined truthiness.
    pub fn has_effective_boolean_value(&self) -> bool {
        match self.kind {
            Kind::Empty => true,
            Kind::Of { item_type, arity } => {
                if item_type.is_json() {
                    return true;
                }
                if !matches!(arity, Arity::One | Arity::OneOrZero) {
                    return false;
                }
                item_type.is_numeric()
                    || matches!(
                        item_type,
                        ItemType::String | ItemType::AnyUri | ItemType::Null | ItemType::Boolean
                    )
            }
        }
    }
}

impl fmt::Display for SequenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Kind::Empty => write!(f, "()"),
            Kind::Of { item_type, arity } => write!(f, "{}{}", item_type, arity.symbol()),
        }
    }
}

/// Strict subtyping extended with the three implicit promotions.
///
/// This is the only place the promotion rules are consulted; they are
/// never folded into the item type tree itself.
fn can_be_promoted_to(from: ItemType, to: ItemType) -> bool {
    if from.is_subtype_of(to) {
        return true;
    }
    match to {
        ItemType::String => from.can_be_promoted_to_string(),
        ItemType::Double => from.is_numeric(),
        ItemType::Decimal => from == ItemType::Integer,
        _ => false,
    }
}

/// One step toward admitting the empty sequence
fn widen_toward_optional(arity: Arity) -> Arity {
    match arity {
        Arity::One => Arity::OneOrZero,
        Arity::OneOrMore => Arity::ZeroOrMore,
        other => other,
    }
}

/// Item types with surface names usable in declared-type annotations
const REGISTERED_TYPES: [ItemType; 20] = [
    ItemType::Item,
    ItemType::Object,
    ItemType::Array,
    ItemType::Atomic,
    ItemType::String,
    ItemType::Integer,
    ItemType::Decimal,
    ItemType::Double,
    ItemType::Float,
    ItemType::Boolean,
    ItemType::Null,
    ItemType::AnyUri,
    ItemType::HexBinary,
    ItemType::Base64Binary,
    ItemType::Duration,
    ItemType::YearMonthDuration,
    ItemType::DayTimeDuration,
    ItemType::Date,
    ItemType::Time,
    ItemType::DateTime,
];

/// Fixed table from canonical surface names to sequence types, built once
/// at startup and read-only thereafter.
static SEQUENCE_TYPES: LazyLock<HashMap<String, SequenceType>> = LazyLock::new(|| {
    let arities = [
        Arity::One,
        Arity::OneOrZero,
        Arity::OneOrMore,
        Arity::ZeroOrMore,
    ];
    let mut table = HashMap::new();
    for item_type in REGISTERED_TYPES {
        for arity in arities {
            table.insert(
                format!("{}{}", item_type.name(), arity.symbol()),
                SequenceType::new(item_type, arity),
            );
        }
    }
    table
});

/// Resolve a declared-type annotation string (`integer`, `string?`,
/// `item*`, `object+`, ...) to its sequence type.
pub fn create_sequence_type(name: &str) -> Result<SequenceType> {
    SEQUENCE_TYPES
        .get(name)
        .copied()
        .ok_or_else(|| Error::unrecognized_type(name))
}
