//! # Persistent List
//!
//! A structurally shared singly-linked list. Each [`add`] allocates one cell
//! that points at the unchanged receiver, so every older version of a list
//! stays valid and shares its cells with the newer ones.
//!
//! ## Layout
//!
//! Cells are linked youngest-first: the head is the most recently added
//! element and the chain ends at the empty sentinel. Callers always see
//! *insertion* order, so every traversal that exposes elements reverses the
//! physical chain first.
//!
//! ```text
//! xs = [1, 2]        head -> (2) -> (1) -> ()
//! ys = xs.add(3)     head -> (3) --^
//! ```
//!
//! ## Example
//!
//! ```
//! use self_typed_common::{PersistentCollection, PersistentList, PersistentSequence};
//!
//! let xs = PersistentList::new().add(1).add(2).add(3);
//! assert_eq!(xs.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! assert_eq!(xs.len(), 3);
//!
//! let ys = xs.sublist(1, 3).unwrap();
//! assert_eq!(ys.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
//!
//! // xs is untouched by both operations
//! assert_eq!(xs.len(), 3);
//! ```
//!
//! [`add`]: crate::PersistentCollection::add

use crate::collection::{PersistentCollection, PersistentSequence};
use crate::error::{Error, Result};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;
use std::sync::Arc;
use tracing::trace;

/// One element and the (shared) remainder of the list.
struct Cell<T> {
    value: T,
    tail: PersistentList<T>,
}

/// A persistent singly-linked list.
///
/// `Clone` is O(1): it copies a reference to the head cell. The empty list is
/// a `None` head, so every empty list is the same sentinel.
pub struct PersistentList<T> {
    head: Option<Arc<Cell<T>>>,
}

impl<T> PersistentList<T> {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { head: None }
    }

    /// Builds a list by adding each value in order, starting from empty.
    ///
    /// # Example
    ///
    /// ```
    /// use self_typed_common::PersistentList;
    ///
    /// let xs = PersistentList::from_values(["a", "b"]);
    /// assert_eq!(xs.peek(), Some(&"b"));
    /// ```
    #[must_use]
    pub fn from_values<I: IntoIterator<Item = T>>(values: I) -> Self {
        values
            .into_iter()
            .fold(Self::new(), |list, value| list.prepend(value))
    }

    /// Returns true if this is the empty sentinel. O(1).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the number of elements. O(n).
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells().count()
    }

    /// Returns the most recently added element.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.head.as_deref().map(|cell| &cell.value)
    }

    /// Returns true if some element equals `value`, stopping at the first match.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.cells().any(|cell| cell.value == *value)
    }

    /// Returns an iterator over the elements in insertion order.
    ///
    /// The chain is walked when iteration starts; calling `iter` again walks
    /// it again, so the list is never consumed.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            pending: None,
        }
    }

    /// Returns true if both lists start at the same cell (or are both empty).
    ///
    /// Lists that share a head are equal without comparing elements.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    fn prepend(&self, value: T) -> Self {
        Self {
            head: Some(Arc::new(Cell {
                value,
                tail: self.clone(),
            })),
        }
    }

    /// Walks cells in physical (youngest-first) order.
    fn cells(&self) -> Cells<'_, T> {
        Cells {
            next: self.head.as_deref(),
        }
    }

    /// Returns the list left after dropping the `n` most recently added cells.
    fn skip_newest(&self, n: usize) -> &Self {
        let mut list = self;
        for _ in 0..n {
            match list.head.as_deref() {
                Some(cell) => list = &cell.tail,
                None => break,
            }
        }
        list
    }
}

impl<T> PersistentCollection<T> for PersistentList<T> {
    fn add(&self, value: T) -> Self {
        self.prepend(value)
    }

    fn clear(&self) -> Self {
        Self::new()
    }

    fn len(&self) -> usize {
        PersistentList::len(self)
    }

    fn is_empty(&self) -> bool {
        PersistentList::is_empty(self)
    }

    fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        PersistentList::contains(self, value)
    }
}

impl<T: Clone> PersistentSequence<T> for PersistentList<T> {
    fn sublist(&self, from: isize, to: isize) -> Result<Self> {
        let (from, to) = Error::check_range(from, to)?;
        let len = PersistentList::len(self);
        let to = to.min(len);
        if from >= to {
            trace!(from, to, len, "sublist starts past the end");
            return Ok(Self::new());
        }

        // logical [from, to) is physical [len - to, len - from)
        let rest = self.skip_newest(len - to);
        if from == 0 {
            // the remaining chain runs down to the oldest element: share it
            trace!(to, len, "sublist shares tail");
            return Ok(rest.clone());
        }

        let kept: Vec<&T> = rest
            .cells()
            .take(to - from)
            .map(|cell| &cell.value)
            .collect();
        trace!(from, to, len, copied = kept.len(), "sublist copies cells");
        Ok(kept
            .into_iter()
            .rev()
            .fold(Self::new(), |list, value| list.prepend(value.clone())))
    }
}

impl<T> Clone for PersistentList<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
        }
    }
}

impl<T> Default for PersistentList<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Unlink uniquely owned cells one at a time; the default drop would recurse
// once per cell.
impl<T> Drop for PersistentList<T> {
    fn drop(&mut self) {
        let mut head = self.head.take();
        while let Some(cell) = head {
            match Arc::try_unwrap(cell) {
                Ok(mut cell) => head = cell.tail.head.take(),
                Err(_) => break,
            }
        }
    }
}

impl<T: PartialEq> PartialEq for PersistentList<T> {
    fn eq(&self, other: &Self) -> bool {
        let mut ours = self.cells();
        let mut theirs = other.cells();
        loop {
            match (ours.next(), theirs.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) => {
                    if ptr::eq(a, b) {
                        return true;
                    }
                    if a.value != b.value {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

impl<T: Eq> Eq for PersistentList<T> {}

impl<T: Hash> Hash for PersistentList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.cells().count());
        for cell in self.cells() {
            cell.value.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for PersistentList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

impl<'a, T> IntoIterator for &'a PersistentList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

struct Cells<'a, T> {
    next: Option<&'a Cell<T>>,
}

impl<'a, T> Iterator for Cells<'a, T> {
    type Item = &'a Cell<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.next?;
        self.next = cell.tail.head.as_deref();
        Some(cell)
    }
}

/// Iterator over a [`PersistentList`] in insertion order.
///
/// Created by [`PersistentList::iter`]. The first call to `next` collects the
/// chain youngest-first; elements are then handed out from the back of that
/// buffer.
pub struct Iter<'a, T> {
    list: &'a PersistentList<T>,
    pending: Option<Vec<&'a T>>,
}

impl<'a, T> Iter<'a, T> {
    fn pending(&mut self) -> &mut Vec<&'a T> {
        let list = self.list;
        self.pending
            .get_or_insert_with(|| list.cells().map(|cell| &cell.value).collect())
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.pending().pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.pending {
            Some(pending) => pending.len(),
            None => self.list.cells().count(),
        };
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Creates a [`PersistentList`] holding the given values in order.
///
/// # Example
///
/// ```
/// use self_typed_common::plist;
///
/// let xs = plist![1, 2, 3];
/// assert_eq!(xs.len(), 3);
/// assert_eq!(xs.peek(), Some(&3));
/// ```
#[macro_export]
macro_rules! plist {
    () => {
        $crate::PersistentList::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::PersistentList::from_values([$($value),+])
    };
}
