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

//! Search state for one material.
//!
//! `SearchState` tracks the remaining capacity per size, the size vector
//! chosen at every assigned depth and the running unit count. Sizes are kept
//! in the search's internal (descending) order.
//!
//! The chosen rows double as the undo log: backtracking pops the last row
//! and returns its containers to the pool, so no separate trail is needed.
//! Every mutation is checked; a decrement that would drive a capacity below
//! zero is reported as a `SearchFault` instead of being applied.

use crate::error::SearchFault;
use stowage_core::num::SolverNumeric;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState<T> {
    num_sizes: usize,
    remaining: Vec<T>,
    rows: Vec<T>,
    row_units: Vec<T>,
    current_units: T,
}

impl<T> SearchState<T>
where
    T: SolverNumeric,
{
    /// Creates the root state with the given capacities per size.
    pub fn new(capacities: Vec<T>, num_locations: usize) -> Self {
        let num_sizes = capacities.len();
        Self {
            num_sizes,
            remaining: capacities,
            rows: Vec::with_capacity(num_sizes * num_locations),
            row_units: Vec::with_capacity(num_locations),
            current_units: T::zero(),
        }
    }

    /// Number of locations assigned so far.
    #[inline]
    pub fn depth(&self) -> usize {
        self.row_units.len()
    }

    #[inline]
    pub fn num_sizes(&self) -> usize {
        self.num_sizes
    }

    /// Remaining capacity per size.
    #[inline]
    pub fn remaining(&self) -> &[T] {
        &self.remaining
    }

    /// Units used by the partial assignment.
    #[inline]
    pub fn current_units(&self) -> T {
        self.current_units
    }

    /// The size vector chosen at `depth`.
    #[inline]
    pub fn row(&self, depth: usize) -> &[T] {
        debug_assert!(
            depth < self.depth(),
            "called `SearchState::row` with depth out of bounds: the depth is {} but the index is {}",
            self.depth(),
            depth
        );
        &self.rows[depth * self.num_sizes..(depth + 1) * self.num_sizes]
    }

    /// Assigns `counts` to the next depth, consuming capacity.
    ///
    /// # Errors
    ///
    /// Returns `SearchFault::InvariantViolation` and leaves the state
    /// untouched if any count is negative or exceeds the remaining capacity.
    pub fn apply(&mut self, counts: &[T], units: T) -> Result<(), SearchFault> {
        if counts.len() != self.num_sizes {
            return Err(SearchFault::invariant(format!(
                "size vector of length {} applied to {} sizes",
                counts.len(),
                self.num_sizes
            )));
        }
        for (i, (&count, &left)) in counts.iter().zip(&self.remaining).enumerate() {
            if count < T::zero() || count > left {
                return Err(SearchFault::invariant(format!(
                    "taking {} containers of size slot {} would leave capacity {}",
                    count,
                    i,
                    left - count
                )));
            }
        }
        for (left, &count) in self.remaining.iter_mut().zip(counts) {
            *left = *left - count;
        }
        self.rows.extend_from_slice(counts);
        self.row_units.push(units);
        self.current_units = self.current_units + units;
        Ok(())
    }

    /// Undoes the last assignment. Returns `false` at the root.
    pub fn undo(&mut self) -> bool {
        let Some(units) = self.row_units.pop() else {
            return false;
        };
        let start = self.rows.len() - self.num_sizes;
        for (left, &count) in self.remaining.iter_mut().zip(&self.rows[start..]) {
            *left = *left + count;
        }
        self.rows.truncate(start);
        self.current_units = self.current_units - units;
        true
    }

    /// Total SCU still available: `Σ remaining × size`.
    pub fn remaining_scu(&self, sizes: &[T]) -> T {
        self.remaining
            .iter()
            .zip(sizes)
            .fold(T::zero(), |acc, (&c, &s)| acc + c * s)
    }
}

impl<T> std::fmt::Display for SearchState<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchState(depth: {}, units: {}, remaining: {:?})",
            self.depth(),
            self.current_units,
            self.remaining
        )
    }
}
