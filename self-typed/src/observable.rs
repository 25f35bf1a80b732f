//! # Observable Entities
//!
//! Change notification for concrete entity types. Observers are called with
//! `&Self`, the entity's own type, so a callback can read entity-specific
//! fields without downcasting.
//!
//! A type opts in by holding an [`Observers`] list and implementing
//! [`Observable::observers`]. Its observable state lives in [`Field`] slots,
//! written through [`Observable::write`], which stores the new value and then
//! runs every observer in registration order.
//!
//! Like a wire in a circuit simulator, an entity is a single-threaded object:
//! fields use interior mutability, so writes take `&self`, and entities are
//! not `Sync`.
//!
//! ## Example
//!
//! ```
//! use self_typed::observable::{Color, Entity, Observable};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let entity = Entity::new();
//!
//! let log = Rc::clone(&seen);
//! entity.observe(move |e: &Entity| log.borrow_mut().push(e.color()));
//!
//! entity.set_color(Color::Blue);
//! assert_eq!(*seen.borrow(), vec![Color::Blue]);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

type Callback<E> = Rc<dyn Fn(&E)>;

/// The observer list of an entity of type `E`.
///
/// Append-only: callbacks are kept in registration order, duplicates
/// included, and never removed.
pub struct Observers<E> {
    callbacks: RefCell<Vec<Callback<E>>>,
}

impl<E> Observers<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            callbacks: RefCell::new(Vec::new()),
        }
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.borrow().is_empty()
    }

    fn push(&self, callback: Callback<E>) {
        self.callbacks.borrow_mut().push(callback);
    }

    fn snapshot(&self) -> Vec<Callback<E>> {
        self.callbacks.borrow().clone()
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.len())
            .finish()
    }
}

/// An observable field slot.
///
/// Reading is free; writing goes through [`Observable::write`] so that every
/// write notifies.
pub struct Field<V> {
    value: RefCell<V>,
}

impl<V> Field<V> {
    #[must_use]
    pub fn new(initial: V) -> Self {
        Self {
            value: RefCell::new(initial),
        }
    }

    /// Returns a copy of the current value.
    #[must_use]
    pub fn get(&self) -> V
    where
        V: Clone,
    {
        self.value.borrow().clone()
    }

    /// Calls `f` with a reference to the current value.
    ///
    /// # Panics
    ///
    /// The value stays borrowed while `f` runs, so writing this same field
    /// from inside `f` panics with a `RefCell` borrow error. Read the value
    /// out first and write after `with` returns.
    pub fn with<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&self.value.borrow())
    }

    fn replace(&self, value: V) -> V {
        self.value.replace(value)
    }
}

impl<V: Default> Default for Field<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V: fmt::Debug> fmt::Debug for Field<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&*self.value.borrow()).finish()
    }
}

/// An entity that notifies observers, passing itself as its concrete type.
///
/// # Reentrancy
///
/// Observers run after the field borrow is released, so an observer may read
/// any field, register further observers, or write to the entity that
/// notified it. A nested write notifies recursively before the outer
/// notification continues; the observer is responsible for stopping the
/// recursion. Observers registered during a notification are first called
/// on the next one.
pub trait Observable: Sized + 'static {
    /// Returns this entity's observer list.
    fn observers(&self) -> &Observers<Self>;

    /// Registers `callback` to run after every field write.
    fn observe<F>(&self, callback: F)
    where
        F: Fn(&Self) + 'static,
    {
        self.observers().push(Rc::new(callback));
    }

    /// Calls every registered observer, in registration order, with `self`.
    fn notify_observers(&self) {
        let callbacks = self.observers().snapshot();
        trace!(observers = callbacks.len(), "notifying observers");
        for callback in &callbacks {
            callback(self);
        }
    }

    /// Stores `value` in `field`, then notifies. Returns the previous value.
    ///
    /// Observers are notified even if the value did not change.
    fn write<V>(&self, field: &Field<V>, value: V) -> V {
        let previous = field.replace(value);
        self.notify_observers();
        previous
    }

    /// Like [`write`](Observable::write), but skips both the store and the
    /// notification when `value` equals the current value.
    ///
    /// Returns true if observers were notified.
    fn write_if_changed<V: PartialEq>(&self, field: &Field<V>, value: V) -> bool {
        if field.with(|current| *current == value) {
            return false;
        }
        self.write(field, value);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Purple,
    Blue,
}

/// An observable entity with a single `color` field.
#[derive(Debug, Default)]
pub struct Entity {
    color: Field<Color>,
    observers: Observers<Entity>,
}

impl Entity {
    /// Creates an entity with the default color and no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color.get()
    }

    /// Sets the color and notifies every observer.
    pub fn set_color(&self, color: Color) {
        self.write(&self.color, color);
    }
}

impl Observable for Entity {
    fn observers(&self) -> &Observers<Self> {
        &self.observers
    }
}
