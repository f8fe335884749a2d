//! The Arity algebra
//!
//! An arity is a static bound on how many items a sequence may contain.
//! The four values form a small lattice:
//!
//! ```text
//!        ZeroOrMore (*)
//!        /          \
//!   OneOrZero (?)  OneOrMore (+)
//!        \          /
//!           One ()
//! ```
//!
//! `OneOrZero` and `OneOrMore` are incomparable; `ZeroOrMore` is the top
//! element. These are process-wide constants with no fallible operations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cardinality bound on a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arity {
    /// Exactly one item
    One,
    /// Zero or one item (`?`)
    OneOrZero,
    /// One or more items (`+`)
    OneOrMore,
    /// Any number of items (`*`)
    ZeroOrMore,
}

impl Arity {
    /// Check whether this arity is at or below `other` in the partial
    /// order shown in the module docs.
    pub fn is_subtype_of(self, other: Arity) -> bool {
        match (self, other) {
            _ if self == other => true,
            (Self::One, _) => true,
            (_, Self::ZeroOrMore) => true,
            _ => false,
        }
    }

    /// Compose two independently-bounded quantities in sequence, as in
    /// nested iteration: the result is the tightest arity admitting every
    /// combined outcome.
    pub fn multiply_with(self, other: Arity) -> Arity {
        if self == Self::One && other == Self::One {
            Self::One
        } else if self.is_subtype_of(Self::OneOrZero) && other.is_subtype_of(Self::OneOrZero) {
            Self::OneOrZero
        } else if self.is_subtype_of(Self::OneOrMore) && other.is_subtype_of(Self::OneOrMore) {
            Self::OneOrMore
        } else {
            Self::ZeroOrMore
        }
    }

    /// The join of two arities in the partial order
    pub fn least_upper_bound(self, other: Arity) -> Arity {
        if self.is_subtype_of(other) {
            other
        } else if other.is_subtype_of(self) {
            self
        } else {
            // Only OneOrZero vs OneOrMore remains, which joins to the top.
            Self::ZeroOrMore
        }
    }

    /// Whether a sequence of this arity may be empty
    pub fn admits_zero(self) -> bool {
        matches!(self, Self::OneOrZero | Self::ZeroOrMore)
    }

    /// Whether a sequence of this arity may hold more than one item
    pub fn admits_many(self) -> bool {
        matches!(self, Self::OneOrMore | Self::ZeroOrMore)
    }

    /// The suffix used in type annotations
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::One => "",
            Self::OneOrZero => "?",
            Self::OneOrMore => "+",
            Self::ZeroOrMore => "*",
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
