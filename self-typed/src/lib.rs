//! # Self-Typed
//!
//! Two more applications of the "operation returns `Self`" shape used by the
//! persistent collections in `self_typed_common`:
//!
//! - Lazy chains: memoized deferred computations (`then`, `bind`)
//! - Observable entities: change callbacks that receive the concrete entity

// Modules
pub mod lazy; // Deferred, memoized computations
pub mod observable; // Store-then-notify fields

pub use lazy::{Lazy, LazyCollection, LazyValue, Memo, Thunk};
pub use observable::{Color, Entity, Field, Observable, Observers};
