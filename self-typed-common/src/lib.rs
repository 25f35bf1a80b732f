//! # Self-Typed Common
//!
//! Persistent collections whose transforming operations return the concrete
//! type of the receiver.
//!
//! ## Modules
//!
//! - [`collection`]: The self-returning contract ([`PersistentCollection`],
//!   [`PersistentSequence`]) and its `im::Vector` implementation
//! - [`list`]: A structurally shared singly-linked list
//! - [`error`]: The invalid-argument error raised by range extraction
//!
//! ## Design Principles
//!
//! 1. **Persistent**: Operations return new values and never touch the receiver
//! 2. **Self-returning**: `add`, `clear` and `sublist` return `Self`, so chains
//!    keep the concrete type without casts
//! 3. **Shared structure**: New versions reuse the cells of older ones
//! 4. **Iterator-centric**: Elements are exposed through standard iterators

pub mod collection;
pub mod error;
pub mod list;

// Re-export main types for convenience
pub use collection::{PersistentCollection, PersistentSequence};
pub use error::{Error, InvalidRange, Result};
pub use list::PersistentList;
