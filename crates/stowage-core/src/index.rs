// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Strongly Typed Indices
//!
//! Every table in the allocation model is addressed by more than one index
//! space at once (`[location][material][size]`). Raw `usize` values make it
//! trivial to swap two of them by accident. `TypedIndex<T>` carries a tag
//! type that fixes the index space at compile time while staying a
//! transparent `usize` at runtime.
//!
//! ```rust
//! use stowage_core::index::{TypedIndex, TypedIndexTag};
//!
//! #[derive(Clone, Copy)]
//! struct DockTag;
//! impl TypedIndexTag for DockTag { const NAME: &'static str = "DockIndex"; }
//!
//! type DockIndex = TypedIndex<DockTag>;
//! let dock = DockIndex::new(2);
//! assert_eq!(dock.get(), 2);
//! assert_eq!(format!("{}", dock), "DockIndex(2)");
//! ```

/// Names an index space for `Debug`/`Display` output.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// A `usize` index bound to the index space `T`.
#[repr(transparent)]
pub struct TypedIndex<T> {
    index: usize,
    _marker: std::marker::PhantomData<T>,
}

// Manual impls: deriving would require the tag itself to implement them.
impl<T> Clone for TypedIndex<T> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedIndex<T> {}

impl<T> PartialEq for TypedIndex<T> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for TypedIndex<T> {}

impl<T> PartialOrd for TypedIndex<T> {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedIndex<T> {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> std::hash::Hash for TypedIndex<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> TypedIndex<T> {
    /// Wraps a raw index.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the raw index.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }

    /// Iterates `TypedIndex::new(0)..TypedIndex::new(len)`.
    ///
    /// ```rust
    /// # use stowage_core::index::{TypedIndex, TypedIndexTag};
    /// # #[derive(Clone, Copy)]
    /// # struct Tag;
    /// # impl TypedIndexTag for Tag { const NAME: &'static str = "Tag"; }
    /// let all: Vec<usize> = TypedIndex::<Tag>::range(3).map(|i| i.get()).collect();
    /// assert_eq!(all, vec![0, 1, 2]);
    /// ```
    #[inline]
    pub fn range(len: usize) -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..len).map(Self::new)
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    fn from(typed_index: TypedIndex<T>) -> Self {
        typed_index.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Clone, Copy, Debug)]
    struct BayTag;

    impl TypedIndexTag for BayTag {
        const NAME: &'static str = "BayIdx";
    }

    type BayIndex = TypedIndex<BayTag>;

    #[test]
    fn test_new_and_get() {
        assert_eq!(BayIndex::new(10).get(), 10);
    }

    #[test]
    fn test_conversions() {
        let idx: BayIndex = 42.into();
        assert_eq!(idx.get(), 42);
        let raw: usize = idx.into();
        assert_eq!(raw, 42);
    }

    #[test]
    fn test_debug_and_display_use_tag_name() {
        let idx = BayIndex::new(7);
        assert_eq!(format!("{}", idx), "BayIdx(7)");
        assert_eq!(format!("{:?}", idx), "BayIdx(7)");
    }

    #[test]
    fn test_ordering_and_hashing_follow_raw_index() {
        assert!(BayIndex::new(1) < BayIndex::new(2));
        assert_eq!(BayIndex::new(3), BayIndex::new(3));

        let set: HashSet<BayIndex> = [1, 2, 2, 3].into_iter().map(BayIndex::new).collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_range_yields_every_index_in_order() {
        let forward: Vec<usize> = BayIndex::range(4).map(|i| i.get()).collect();
        assert_eq!(forward, vec![0, 1, 2, 3]);

        let backward: Vec<usize> = BayIndex::range(3).rev().map(|i| i.get()).collect();
        assert_eq!(backward, vec![2, 1, 0]);
        assert_eq!(BayIndex::range(0).len(), 0);
    }
}
