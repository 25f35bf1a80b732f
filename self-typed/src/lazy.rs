//! # Lazy Chains
//!
//! Deferred computations that run at most once, with transformations that
//! return the concrete type of the receiver.
//!
//! Construction never evaluates anything. The wrapped computation runs the
//! first time [`Lazy::compute`] is called, and every later call returns the
//! cached result. [`Lazy::then`] builds a *new* instance whose computation
//! forces the current one and applies a function to the result, so a chain
//! of transformations stays unevaluated until its last link is forced.
//!
//! ## Key mappings
//!
//! - `delay` → [`Lazy::from_fn`]
//! - `force` → [`Lazy::compute`]
//! - memoized `delay` → [`Memo`] (computation runs exactly once, even when
//!   several threads force the same instance)
//!
//! ## Example
//!
//! ```
//! use self_typed::lazy::{Lazy, LazyValue};
//!
//! let five = LazyValue::new(|| 5);
//! let six = five.then(|x| x + 1);
//!
//! assert!(!five.is_computed());
//! assert_eq!(*six.compute(), 6);
//! assert_eq!(*five.compute(), 5);
//! ```

use once_cell::sync::Lazy as OnceLazy;
use self_typed_common::{Error, PersistentCollection, PersistentSequence, Result};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A boxed computation producing a `T`.
pub type Thunk<T> = Box<dyn FnOnce() -> T + Send>;

/// The cache cell shared by every [`Lazy`] implementation.
///
/// Clones share the same cell: forcing one forces all of them.
pub struct Memo<T> {
    cell: Arc<OnceLazy<T, Thunk<T>>>,
}

impl<T: 'static> Memo<T> {
    pub fn new(computation: Thunk<T>) -> Self {
        let computation: Thunk<T> = Box::new(move || {
            debug!("forcing deferred computation");
            computation()
        });
        Self {
            cell: Arc::new(OnceLazy::new(computation)),
        }
    }
}

impl<T> Memo<T> {
    /// Runs the computation if it has not run yet and returns the cached value.
    ///
    /// Concurrent callers block until the single evaluation finishes.
    pub fn force(&self) -> &T {
        OnceLazy::force(&self.cell)
    }

    /// Returns the cached value without forcing.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        OnceLazy::get(&self.cell)
    }
}

impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("Memo").field(value).finish(),
            None => f.write_str("Memo(<unforced>)"),
        }
    }
}

/// A memoized deferred computation whose transformations return `Self`.
///
/// Implementors supply the factory [`create`](Lazy::create) and access to
/// their [`Memo`]; everything else is provided.
pub trait Lazy: Clone {
    type Value: Send + Sync + 'static;

    /// Wraps `computation` in a new instance of the implementing type.
    fn create(computation: Thunk<Self::Value>) -> Self;

    /// Returns the cache cell backing this instance.
    fn memo(&self) -> &Memo<Self::Value>;

    /// Creates an instance from a closure without evaluating it.
    fn from_fn<F>(computation: F) -> Self
    where
        F: FnOnce() -> Self::Value + Send + 'static,
    {
        Self::create(Box::new(computation))
    }

    /// Forces the computation once and returns the cached result.
    fn compute(&self) -> &Self::Value {
        self.memo().force()
    }

    /// Returns true once the computation has run.
    fn is_computed(&self) -> bool {
        self.memo().get().is_some()
    }

    /// Returns a new instance computing `f` over this instance's result.
    ///
    /// Neither this call nor the construction of the result forces `self`;
    /// `self` is forced (or its cached value reused) when the returned
    /// instance is computed.
    ///
    /// Forcing an unforced chain recurses once per link, and so does dropping
    /// one, so chain depth is bounded by the stack. Batch work into a single
    /// link (as [`LazyCollection`]'s `add_all` does) rather than building
    /// chains tens of thousands of links deep.
    #[must_use]
    fn then<F>(&self, f: F) -> Self
    where
        Self: Send + 'static,
        F: FnOnce(&Self::Value) -> Self::Value + Send + 'static,
    {
        let source = self.clone();
        Self::from_fn(move || f(source.compute()))
    }

    /// Returns a new instance computing the instance `kleisli` builds from
    /// this instance's result.
    ///
    /// # Example
    ///
    /// ```
    /// use self_typed::lazy::{Lazy, LazyValue};
    ///
    /// let base = LazyValue::new(|| 20);
    /// let doubled = base.bind(|x| {
    ///     let x = *x;
    ///     LazyValue::new(move || x * 2)
    /// });
    /// assert_eq!(*doubled.compute(), 40);
    /// ```
    #[must_use]
    fn bind<F>(&self, kleisli: F) -> Self
    where
        Self: Send + 'static,
        Self::Value: Clone,
        F: FnOnce(&Self::Value) -> Self + Send + 'static,
    {
        let source = self.clone();
        Self::from_fn(move || kleisli(source.compute()).compute().clone())
    }
}

/// The plain [`Lazy`] instantiation.
pub struct LazyValue<T> {
    memo: Memo<T>,
}

impl<T: Send + Sync + 'static> LazyValue<T> {
    pub fn new<F>(computation: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self::from_fn(computation)
    }
}

impl<T: Send + Sync + 'static> Lazy for LazyValue<T> {
    type Value = T;

    fn create(computation: Thunk<T>) -> Self {
        Self {
            memo: Memo::new(computation),
        }
    }

    fn memo(&self) -> &Memo<T> {
        &self.memo
    }
}

impl<T> Clone for LazyValue<T> {
    fn clone(&self) -> Self {
        Self {
            memo: self.memo.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyValue").field("memo", &self.memo).finish()
    }
}

/// A deferred persistent collection.
///
/// `LazyCollection<C>` is itself a [`PersistentCollection`]: `add` and
/// `clear` return new unevaluated instances, while the read side forces the
/// underlying collection.
///
/// # Example
///
/// ```
/// use self_typed::lazy::{Lazy, LazyCollection};
/// use self_typed_common::{PersistentCollection, PersistentList};
///
/// let xs = LazyCollection::new(|| PersistentList::from_values([1, 2]));
/// let ys = xs.add(3).add(4);
/// assert!(!xs.is_computed());
///
/// let values: Vec<i32> = ys.compute().iter().copied().collect();
/// assert_eq!(values, vec![1, 2, 3, 4]);
/// ```
pub struct LazyCollection<C> {
    memo: Memo<C>,
}

impl<C: Send + Sync + 'static> LazyCollection<C> {
    pub fn new<F>(computation: F) -> Self
    where
        F: FnOnce() -> C + Send + 'static,
    {
        Self::from_fn(computation)
    }
}

impl<C: Send + Sync + 'static> Lazy for LazyCollection<C> {
    type Value = C;

    fn create(computation: Thunk<C>) -> Self {
        Self {
            memo: Memo::new(computation),
        }
    }

    fn memo(&self) -> &Memo<C> {
        &self.memo
    }
}

impl<C, T> PersistentCollection<T> for LazyCollection<C>
where
    C: PersistentCollection<T> + Send + Sync + 'static,
    T: Send + 'static,
{
    fn add(&self, value: T) -> Self {
        self.then(move |collection| collection.add(value))
    }

    fn clear(&self) -> Self {
        self.then(|collection| collection.clear())
    }

    /// Defers all of `values` behind a single link instead of one per element.
    fn add_all<I>(&self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let values: Vec<T> = values.into_iter().collect();
        self.then(move |collection| collection.add_all(values))
    }

    fn len(&self) -> usize {
        self.compute().len()
    }

    fn is_empty(&self) -> bool {
        self.compute().is_empty()
    }

    fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.compute().contains(value)
    }
}

impl<C, T> PersistentSequence<T> for LazyCollection<C>
where
    C: PersistentSequence<T> + Send + Sync + 'static,
    T: Send + 'static,
{
    /// The range is checked immediately; the extraction itself is deferred.
    ///
    /// Relies on `C` rejecting exactly the ranges [`Error::check_range`]
    /// rejects (see [`PersistentSequence::sublist`]).
    fn sublist(&self, from: isize, to: isize) -> Result<Self> {
        Error::check_range(from, to)?;
        // the range passed the shared check, so the inner call cannot fail
        Ok(self.then(move |collection| {
            collection
                .sublist(from, to)
                .unwrap_or_else(|_| collection.clear())
        }))
    }
}

impl<C> Clone for LazyCollection<C> {
    fn clone(&self) -> Self {
        Self {
            memo: self.memo.clone(),
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for LazyCollection<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyCollection")
            .field("memo", &self.memo)
            .finish()
    }
}
