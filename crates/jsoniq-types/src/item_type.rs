//! The ItemType lattice
//!
//! Item types form a single-rooted tree with strict single inheritance:
//!
//! ```text
//! item
//! ├── json-item
//! │   ├── object
//! │   └── array
//! ├── function
//! └── atomic
//!     ├── string, boolean, null, anyURI, hexBinary, base64Binary
//!     ├── integer, decimal, double, float
//!     ├── date, time, dateTime
//!     └── duration
//!         ├── yearMonthDuration
//!         └── dayTimeDuration
//! ```
//!
//! The subtype relation is exactly "is an ancestor of, or equal to" in this
//! tree. The implicit promotions (integer to decimal, numeric to double,
//! anyURI to string) are deliberately NOT part of this relation; they live
//! in the sequence-type algebra and are consulted only from
//! promotion-aware subtype checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// A node in the item type tree.
///
/// The full set of item types is closed and fixed; every variant carries a
/// small integer id (its discriminant) used to index precomputed subtype
/// bitsets, so subtype queries are a single bit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ItemType {
    /// The root type; supertype of every item
    Item = 0,
    /// JSON container items (objects and arrays)
    JsonItem = 1,
    /// JSON object
    Object = 2,
    /// JSON array
    Array = 3,
    /// Function item
    Function = 4,
    /// Atomic (scalar) items
    Atomic = 5,
    /// Unicode string
    String = 6,
    /// Arbitrary-size integer
    Integer = 7,
    /// Arbitrary-precision decimal
    Decimal = 8,
    /// IEEE 754 double
    Double = 9,
    /// IEEE 754 float
    Float = 10,
    /// Boolean
    Boolean = 11,
    /// The JSON null scalar
    Null = 12,
    /// URI string
    AnyUri = 13,
    /// Hex-encoded binary
    HexBinary = 14,
    /// Base64-encoded binary
    Base64Binary = 15,
    /// Duration with both month and sub-month components
    Duration = 16,
    /// Duration counted in whole months
    YearMonthDuration = 17,
    /// Duration counted in milliseconds
    DayTimeDuration = 18,
    /// Calendar date
    Date = 19,
    /// Time of day
    Time = 20,
    /// Date and time of day
    DateTime = 21,
}

/// Number of item types in the tree
const TYPE_COUNT: usize = 22;

/// Every item type, indexed by discriminant
const ALL_TYPES: [ItemType; TYPE_COUNT] = [
    ItemType::Item,
    ItemType::JsonItem,
    ItemType::Object,
    ItemType::Array,
    ItemType::Function,
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

/// Per-type ancestor bitsets: bit `j` of entry `i` is set iff type `i` is
/// a subtype of type `j`. Built once, before any concurrent use.
static SUBTYPE_BITS: LazyLock<[u32; TYPE_COUNT]> = LazyLock::new(|| {
    let mut bits = [0u32; TYPE_COUNT];
    for ty in ALL_TYPES {
        let mut cursor = Some(ty);
        while let Some(t) = cursor {
            bits[ty.id()] |= 1 << t.id();
            cursor = t.parent();
        }
    }
    bits
});

impl ItemType {
    /// All item types in the lattice
    pub const ALL: [ItemType; TYPE_COUNT] = ALL_TYPES;

    /// Small integer id assigned at initialization
    pub const fn id(self) -> usize {
        self as usize
    }

    /// The parent in the inheritance tree; `None` for the root
    pub const fn parent(self) -> Option<ItemType> {
        match self {
            Self::Item => None,
            Self::JsonItem | Self::Function | Self::Atomic => Some(Self::Item),
            Self::Object | Self::Array => Some(Self::JsonItem),
            Self::Duration => Some(Self::Atomic),
            Self::YearMonthDuration | Self::DayTimeDuration => Some(Self::Duration),
            _ => Some(Self::Atomic),
        }
    }

    /// Check whether `other` is on this type's ancestor chain (self
    /// included). Reflexive, antisymmetric, transitive.
    pub fn is_subtype_of(self, other: ItemType) -> bool {
        SUBTYPE_BITS[self.id()] & (1 << other.id()) != 0
    }

    /// The lowest common ancestor of the two types.
    ///
    /// Always defined: the tree is single-rooted, so the walk terminates
    /// at or before `item`, which absorbs everything.
    pub fn find_common_supertype(self, other: ItemType) -> ItemType {
        let mut cursor = other;
        loop {
            if self.is_subtype_of(cursor) {
                return cursor;
            }
            // Root is a supertype of everything, so parent() cannot be
            // exhausted before the loop returns.
            cursor = cursor.parent().unwrap_or(Self::Item);
        }
    }

    // === Classification predicates (derived from tree position) ===

    /// Check if this is an atomic (scalar) type
    pub fn is_atomic(self) -> bool {
        self.is_subtype_of(Self::Atomic)
    }

    /// Check if this is a JSON container type (object or array)
    pub fn is_json(self) -> bool {
        self.is_subtype_of(Self::JsonItem)
    }

    /// Check if this is a numeric type
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Integer | Self::Decimal | Self::Double | Self::Float
        )
    }

    /// Check if this is a temporal type
    pub fn is_temporal(self) -> bool {
        matches!(self, Self::Date | Self::Time | Self::DateTime)
    }

    /// Check if this is a duration type
    pub fn is_duration(self) -> bool {
        self.is_subtype_of(Self::Duration)
    }

    /// Check if this is a binary type
    pub fn is_binary(self) -> bool {
        matches!(self, Self::HexBinary | Self::Base64Binary)
    }

    /// Check if this is a function type
    pub fn is_function(self) -> bool {
        matches!(self, Self::Function)
    }

    /// Types that promote implicitly to string in function-call contexts
    pub fn can_be_promoted_to_string(self) -> bool {
        matches!(self, Self::String | Self::AnyUri)
    }

    // === Names ===

    /// The canonical surface name of this type
    pub const fn name(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::JsonItem => "json-item",
            Self::Object => "object",
            Self::Array => "array",
            Self::Function => "function",
            Self::Atomic => "atomic",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Double => "double",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::AnyUri => "anyURI",
            Self::HexBinary => "hexBinary",
            Self::Base64Binary => "base64Binary",
            Self::Duration => "duration",
            Self::YearMonthDuration => "yearMonthDuration",
            Self::DayTimeDuration => "dayTimeDuration",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "dateTime",
        }
    }

    /// Look up a type by its canonical surface name
    pub fn from_name(name: &str) -> Option<ItemType> {
        ALL_TYPES.into_iter().find(|ty| ty.name() == name)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
