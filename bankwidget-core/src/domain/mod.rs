//! Core domain types
//!
//! Plain data structures with validation logic - no I/O.

mod entity;
mod record;
pub mod result;

pub use entity::{EntityKind, LabeledEntity, Vocabulary};
pub use record::{Currency, Field, Operation, OperationAmount, Record};
