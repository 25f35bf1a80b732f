//! # Self-Returning Collection Contract
//!
//! Traits for persistent collections whose transforming operations return the
//! implementing type itself rather than an abstract supertype.
//!
//! ## Philosophy
//!
//! A persistent collection never changes in place. `add` and `clear` hand back
//! a *new* value, and because the return type is `Self`, chaining keeps the
//! concrete type:
//!
//! ```
//! use self_typed_common::{PersistentCollection, PersistentList};
//!
//! let xs: PersistentList<i32> = PersistentList::new().add(1).add(2);
//! // `add` on a PersistentList is a PersistentList, so list-only methods stay available
//! assert_eq!(xs.peek(), Some(&2));
//! ```
//!
//! Generic code written against the contract gets the same guarantee: a
//! function taking `C: PersistentCollection<T>` and returning `C` hands the
//! caller back exactly what it passed in.
//!
//! ```
//! use self_typed_common::{PersistentCollection, PersistentList};
//!
//! fn with_sentinels<C: PersistentCollection<i32>>(c: &C) -> C {
//!     c.add(i32::MIN).add(i32::MAX)
//! }
//!
//! let xs = with_sentinels(&PersistentList::new());
//! assert_eq!(xs.iter().copied().collect::<Vec<_>>(), vec![i32::MIN, i32::MAX]);
//! ```

use crate::error::Result;

/// A persistent collection of `T` whose transformations return `Self`.
///
/// Implementors must leave the receiver unchanged by every operation.
pub trait PersistentCollection<T>: Clone {
    /// Returns a new collection holding the receiver's elements plus `value`.
    #[must_use]
    fn add(&self, value: T) -> Self;

    /// Returns an empty collection of the same concrete type.
    #[must_use]
    fn clear(&self) -> Self;

    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns true if the collection has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if some element equals `value`.
    fn contains(&self, value: &T) -> bool
    where
        T: PartialEq;

    /// Returns true if every element of `values` is contained.
    ///
    /// Stops at the first element that is missing.
    fn contains_all<'a, I>(&self, values: I) -> bool
    where
        T: PartialEq + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        values.into_iter().all(|value| self.contains(value))
    }

    /// Adds every element of `values`, left to right.
    ///
    /// Equivalent to calling [`add`](Self::add) once per element in order.
    ///
    /// # Example
    ///
    /// ```
    /// use self_typed_common::{PersistentCollection, PersistentList};
    ///
    /// let xs = PersistentList::from_values([1, 2]).add_all([3, 4]);
    /// assert_eq!(xs, PersistentList::from_values([1, 2, 3, 4]));
    /// ```
    #[must_use]
    fn add_all<I>(&self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        values
            .into_iter()
            .fold(self.clone(), |acc, value| acc.add(value))
    }
}

/// An ordered persistent collection that also supports range extraction.
pub trait PersistentSequence<T>: PersistentCollection<T> {
    /// Returns the elements at logical positions `[from, to)` as a new collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// `from < 0` or `to <= from`. An end index beyond the length is clamped.
    ///
    /// Implementations must reject exactly the ranges
    /// [`Error::check_range`](crate::Error::check_range) rejects and accept
    /// every other range; deferred wrappers validate up front with that check.
    fn sublist(&self, from: isize, to: isize) -> Result<Self>;
}

#[cfg(feature = "im")]
mod vector {
    //! The contract for `im::Vector`, an RRB-tree with structural sharing.

    use super::{PersistentCollection, PersistentSequence};
    use crate::error::{Error, Result};
    use im::Vector;

    impl<T: Clone> PersistentCollection<T> for Vector<T> {
        fn add(&self, value: T) -> Self {
            let mut next = self.clone();
            next.push_back(value);
            next
        }

        fn clear(&self) -> Self {
            Vector::new()
        }

        fn len(&self) -> usize {
            Vector::len(self)
        }

        fn contains(&self, value: &T) -> bool
        where
            T: PartialEq,
        {
            self.iter().any(|x| x == value)
        }
    }

    impl<T: Clone> PersistentSequence<T> for Vector<T> {
        fn sublist(&self, from: isize, to: isize) -> Result<Self> {
            let (from, to) = Error::check_range(from, to)?;
            let to = to.min(Vector::len(self));
            if from >= to {
                return Ok(Vector::new());
            }
            Ok(self.clone().slice(from..to))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, InvalidRange};
    use crate::list::PersistentList;
    use pretty_assertions::assert_eq;

    fn materialize<C, T>(c: &C) -> Vec<T>
    where
        for<'a> &'a C: IntoIterator<Item = &'a T>,
        T: Clone,
    {
        c.into_iter().cloned().collect()
    }

    /// Generic helper exercising the contract: result type is the input type.
    fn double_add<T: Clone, C: PersistentCollection<T>>(c: &C, value: T) -> C {
        c.add(value.clone()).add(value)
    }

    #[test]
    fn test_generic_code_keeps_concrete_type() {
        let xs: PersistentList<&str> = double_add(&PersistentList::new(), "x");
        assert_eq!(xs.len(), 2);
        assert_eq!(xs.peek(), Some(&"x"));
    }

    #[test]
    fn test_add_all_matches_repeated_add() {
        let base = PersistentList::from_values([1, 2]);
        let folded = base.add_all(vec![3, 4, 5]);
        let stepwise = base.add(3).add(4).add(5);
        assert_eq!(folded, stepwise);
        assert_eq!(materialize(&folded), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_add_all_empty_is_identity() {
        let base = PersistentList::from_values([7]);
        assert_eq!(base.add_all(std::iter::empty()), base);
    }

    #[test]
    fn test_contains_all_stops_on_missing() {
        let xs = PersistentList::from_values([1, 2, 3]);
        assert!(xs.contains_all(&[3, 1]));
        assert!(!xs.contains_all(&[1, 9, 2]));
        assert!(xs.contains_all(std::iter::empty::<&i32>()));
    }

    #[cfg(feature = "im")]
    #[test]
    fn test_vector_add_and_clear() {
        let v: im::Vector<i32> = im::Vector::new();
        let v2 = v.add(1).add(2);
        assert!(v.is_empty());
        assert_eq!(materialize(&v2), vec![1, 2]);
        assert!(v2.clear().is_empty());
        assert!(v2.contains(&2));
    }

    #[cfg(feature = "im")]
    #[test]
    fn test_vector_sublist() {
        let v = im::Vector::<i32>::new().add_all([1, 2, 3, 4]);
        assert_eq!(materialize(&v.sublist(1, 3).unwrap()), vec![2, 3]);
        assert_eq!(materialize(&v.sublist(2, 10).unwrap()), vec![3, 4]);
        assert!(v.sublist(4, 10).unwrap().is_empty());
        assert_eq!(
            v.sublist(-1, 2).unwrap_err(),
            Error::InvalidArgument {
                from: -1,
                to: 2,
                reason: InvalidRange::NegativeStart
            }
        );
    }

    #[cfg(feature = "im")]
    #[test]
    fn test_list_and_vector_agree() {
        let values = [5, 3, 8, 1, 9];
        let list = PersistentList::new().add_all(values);
        let vector = im::Vector::<i32>::new().add_all(values);
        assert_eq!(
            materialize(&list.sublist(1, 4).unwrap()),
            materialize(&vector.sublist(1, 4).unwrap())
        );
    }
}
