//! JSONiq type system
//!
//! This crate defines the static type lattice of the JSONiq front end:
//! - The ItemType tree (item, json-item, atomic families) with subtype and
//!   least-common-supertype queries
//! - The Arity algebra (cardinality bounds on sequences)
//! - SequenceType, pairing an item type with an arity, with the full
//!   subtype/promotion/overlap/lub algebra and the named-type registry
//!
//! Everything here is an immutable value built once at startup; all
//! queries are pure and safe to share across threads without coordination.

mod arity;
mod item_type;
mod sequence_type;

pub use arity::Arity;
pub use item_type::ItemType;
pub use sequence_type::{SequenceType, create_sequence_type};
