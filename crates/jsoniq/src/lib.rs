//! JSONiq query engine front end
//!
//! This crate bundles the static type system and the runtime atomic item
//! model that the rest of a JSONiq engine builds on:
//! - An item type lattice with subtype and least-upper-bound queries
//! - Sequence types combining an item type with an occurrence arity
//! - Atomic items with lexical construction, comparison, arithmetic,
//!   casting, and canonical serialization
//!
//! # Example
//!
//! ```
//! use jsoniq::{create_sequence_type, ItemFactory, ItemType};
//!
//! let declared = create_sequence_type("time?")?;
//! let item = ItemFactory.from_lexical(ItemType::Time, "10:00:00.000Z")?;
//! assert!(item.is_type_of(declared.item_type()));
//! assert_eq!(item.serialize(), "10:00:00Z");
//! # Ok::<(), jsoniq::Error>(())
//! ```

// Re-export all public APIs from internal crates
pub use jsoniq_diagnostics as diagnostics;
pub use jsoniq_items as items;
pub use jsoniq_types as types;

// Convenience re-exports
pub use jsoniq_diagnostics::{Error, Result};
pub use jsoniq_items::{Item, ItemFactory};
pub use jsoniq_types::{create_sequence_type, Arity, ItemType, SequenceType};
