//! JSONiq atomic item value model
//!
//! Runtime representation of atomic (scalar) values: construction from
//! lexical text, equality and ordering, arithmetic, casting, canonical
//! serialization, and the binary transport encoding. The temporal family
//! (date, time, dateTime) is the most intricate case and is implemented in
//! full; the remaining atomic families follow the same pattern.
//!
//! Items are immutable values: created by the factory from a lexical
//! string or programmatically, then consumed and discarded per evaluation
//! step. They are safe to share across threads.

mod codec;
mod duration;
mod factory;
mod item;
mod temporal;

pub use codec::{
    decode_date, decode_date_time, decode_time, encode_date, encode_date_time, encode_time,
};
pub use duration::{DayTimeDurationItem, DurationItem, YearMonthDurationItem};
pub use factory::ItemFactory;
pub use item::Item;
pub use temporal::{DateItem, DateTimeItem, TimeItem};
