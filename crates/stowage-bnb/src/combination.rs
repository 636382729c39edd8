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

//! Per-location combination enumeration.
//!
//! For one demand `d`, sizes `s_1 > s_2 > … > s_k` and remaining capacities
//! `c_1..c_k`, a `CoverCursor` lists every vector `(n_1..n_k)` with
//! `Σ n_i × s_i = d` and `0 ≤ n_i ≤ c_i`, fewest units first.
//!
//! The cursor is resumable. It walks unit buckets `u = ceil(d / s_max), …`
//! and, inside a bucket, runs an explicit depth-first search over the sizes
//! for covers with exactly `u` units, larger sizes taken first. Every call to
//! `advance` does at most `budget` search steps, so the caller regains control
//! (and can consult its monitors) long before a large demand is exhausted.
//! A branch is cut when the remainder exceeds what the not-yet-fixed sizes can
//! cover, or when the units left in the bucket cannot produce the remainder.

use stowage_core::num::{SolverNumeric, ceil_div};

/// What one call to `CoverCursor::advance` produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStep<T> {
    /// The next cover with the given unit count; see `CoverCursor::counts`.
    Candidate(T),
    /// The step budget ran out before the next cover was found.
    Pending,
    /// Every cover not yet produced uses more units than the cap allows.
    Capped,
    /// No cover is left.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    /// Fix the size at `pos`.
    Enter,
    /// Shrink the deepest fixed size that can still shrink.
    Backtrack,
    #[default]
    Done,
}

/// A resumable enumerator of the exact covers of one demand.
///
/// All buffers are reused across `open` calls.
#[derive(Debug, Clone, Default)]
pub struct CoverCursor<T> {
    demand: T,
    target: T,
    last: T,
    smallest: T,
    pos: usize,
    phase: Phase,
    opened: bool,
    yielded: usize,
    capacity: Vec<T>,
    cover: Vec<T>,
    stock: Vec<T>,
    rem: Vec<T>,
    left: Vec<T>,
    floor: Vec<T>,
    work: Vec<T>,
}

impl<T> CoverCursor<T>
where
    T: SolverNumeric,
{
    pub fn new() -> Self {
        Self {
            demand: T::zero(),
            target: T::zero(),
            last: T::zero(),
            smallest: T::zero(),
            pos: 0,
            phase: Phase::Done,
            opened: false,
            yielded: 0,
            capacity: Vec::new(),
            cover: Vec::new(),
            stock: Vec::new(),
            rem: Vec::new(),
            left: Vec::new(),
            floor: Vec::new(),
            work: Vec::new(),
        }
    }

    /// Starts enumerating the covers of `demand`.
    ///
    /// `sizes` must be strictly decreasing and positive, `remaining` holds the
    /// capacity per size in the same order. Both are copied where needed, so
    /// the caller may change its own capacities while the cursor is paused.
    pub fn open(&mut self, demand: T, sizes: &[T], remaining: &[T]) {
        debug_assert_eq!(sizes.len(), remaining.len());
        debug_assert!(
            sizes.windows(2).all(|w| w[0] > w[1]),
            "called `CoverCursor::open` with sizes not strictly decreasing"
        );

        let k = sizes.len();
        self.demand = demand;
        self.opened = true;
        self.yielded = 0;
        self.pos = 0;

        self.capacity.clear();
        self.capacity.extend_from_slice(remaining);
        self.cover.clear();
        self.cover.resize(k + 1, T::zero());
        self.stock.clear();
        self.stock.resize(k + 1, T::zero());
        for i in (0..k).rev() {
            self.cover[i] = self.cover[i + 1] + remaining[i] * sizes[i];
            self.stock[i] = self.stock[i + 1] + remaining[i];
        }
        self.rem.clear();
        self.rem.resize(k + 1, T::zero());
        self.left.clear();
        self.left.resize(k + 1, T::zero());
        self.floor.clear();
        self.floor.resize(k, T::zero());
        self.work.clear();
        self.work.resize(k, T::zero());

        let available = || {
            sizes
                .iter()
                .zip(remaining)
                .filter(|&(_, &c)| c > T::zero())
                .map(|(&s, _)| s)
        };

        if demand.is_zero() {
            self.smallest = T::one();
            self.start_bucket(T::zero(), T::zero());
            return;
        }

        match (available().next(), available().last()) {
            (Some(largest), Some(smallest)) if demand > T::zero() && demand <= self.cover[0] => {
                self.smallest = smallest;
                let first = ceil_div(demand, largest);
                let last = (demand / smallest).min(self.stock[0]);
                self.start_bucket(first, last);
            }
            _ => self.phase = Phase::Done,
        }
    }

    /// Ends the level without producing anything.
    #[inline]
    pub fn close(&mut self) {
        self.opened = false;
        self.yielded = 0;
        self.phase = Phase::Done;
    }

    /// The size vector of the last `CursorStep::Candidate`.
    #[inline]
    pub fn counts(&self) -> &[T] {
        &self.work
    }

    /// Number of candidates produced since `open`.
    #[inline]
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// `true` if the cursor was opened, has finished and never produced a cover.
    #[inline]
    pub fn is_barren(&self) -> bool {
        self.opened && self.yielded == 0 && self.phase == Phase::Done
    }

    /// Searches for the next cover using at most `budget` steps.
    ///
    /// With `unit_cap = Some(u)` the cursor stops with `CursorStep::Capped` as
    /// soon as only covers with more than `u` units remain. The cap may change
    /// between calls.
    pub fn advance(&mut self, sizes: &[T], unit_cap: Option<T>, budget: usize) -> CursorStep<T> {
        let k = sizes.len();
        let mut steps = 0;

        loop {
            if self.phase == Phase::Done {
                return CursorStep::Exhausted;
            }
            if unit_cap.is_some_and(|cap| self.target > cap) {
                self.phase = Phase::Done;
                return CursorStep::Capped;
            }
            if steps >= budget {
                return CursorStep::Pending;
            }
            steps += 1;

            match self.phase {
                Phase::Enter => {
                    let i = self.pos;
                    let rem = self.rem[i];
                    let left = self.left[i];

                    if rem.is_zero() {
                        if left.is_zero() {
                            for j in i..k {
                                self.work[j] = T::zero();
                                self.floor[j] = T::zero();
                            }
                            self.pos = k;
                            self.phase = Phase::Backtrack;
                            self.yielded += 1;
                            return CursorStep::Candidate(self.target);
                        }
                        self.phase = Phase::Backtrack;
                        continue;
                    }

                    if i == k
                        || rem > self.cover[i]
                        || left > self.stock[i]
                        || left > rem / self.smallest
                        || ceil_div(rem, sizes[i]) > left
                    {
                        self.phase = Phase::Backtrack;
                        continue;
                    }

                    // The smaller sizes must absorb both the SCU and the units this size leaves.
                    let size = sizes[i];
                    let tail = self.cover[i + 1];
                    let mut min_n = if rem > tail {
                        ceil_div(rem - tail, size)
                    } else {
                        T::zero()
                    };
                    let surplus = left - self.stock[i + 1];
                    if surplus > min_n {
                        min_n = surplus;
                    }
                    let max_n = (rem / size).min(self.capacity[i]).min(left);
                    if max_n < min_n {
                        self.phase = Phase::Backtrack;
                        continue;
                    }

                    self.floor[i] = min_n;
                    self.fix(i, max_n, size);
                }
                Phase::Backtrack => {
                    if self.pos == 0 {
                        let next = self.target + T::one();
                        let last = self.last;
                        self.start_bucket(next, last);
                        continue;
                    }
                    let i = self.pos - 1;
                    if self.work[i] > self.floor[i] {
                        let n = self.work[i] - T::one();
                        self.fix(i, n, sizes[i]);
                        self.phase = Phase::Enter;
                    } else {
                        self.work[i] = T::zero();
                        self.pos = i;
                    }
                }
                Phase::Done => {}
            }
        }
    }

    #[inline]
    fn fix(&mut self, i: usize, n: T, size: T) {
        self.work[i] = n;
        self.rem[i + 1] = self.rem[i] - n * size;
        self.left[i + 1] = self.left[i] - n;
        self.pos = i + 1;
    }

    fn start_bucket(&mut self, target: T, last: T) {
        self.target = target;
        self.last = last;
        if target > last {
            self.phase = Phase::Done;
            return;
        }
        self.pos = 0;
        self.rem[0] = self.demand;
        self.left[0] = target;
        self.phase = Phase::Enter;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn drain(
        cursor: &mut CoverCursor<IntegerType>,
        sizes: &[IntegerType],
        cap: Option<IntegerType>,
        budget: usize,
    ) -> (Vec<(IntegerType, Vec<IntegerType>)>, CursorStep<IntegerType>) {
        let mut found = Vec::new();
        loop {
            match cursor.advance(sizes, cap, budget) {
                CursorStep::Candidate(units) => found.push((units, cursor.counts().to_vec())),
                CursorStep::Pending => {}
                end => return (found, end),
            }
        }
    }

    fn collect(
        demand: IntegerType,
        sizes: &[IntegerType],
        remaining: &[IntegerType],
        cap: Option<IntegerType>,
    ) -> Vec<(IntegerType, Vec<IntegerType>)> {
        let mut cursor = CoverCursor::new();
        cursor.open(demand, sizes, remaining);
        drain(&mut cursor, sizes, cap, usize::MAX).0
    }

    fn brute_force(
        demand: IntegerType,
        sizes: &[IntegerType],
        remaining: &[IntegerType],
    ) -> Vec<Vec<IntegerType>> {
        fn go(
            i: usize,
            left: IntegerType,
            sizes: &[IntegerType],
            remaining: &[IntegerType],
            prefix: &mut Vec<IntegerType>,
            out: &mut Vec<Vec<IntegerType>>,
        ) {
            if i == sizes.len() {
                if left == 0 {
                    out.push(prefix.clone());
                }
                return;
            }
            for n in 0..=remaining[i] {
                if n * sizes[i] > left {
                    break;
                }
                prefix.push(n);
                go(i + 1, left - n * sizes[i], sizes, remaining, prefix, out);
                prefix.pop();
            }
        }

        let mut out = Vec::new();
        go(0, demand, sizes, remaining, &mut Vec::new(), &mut out);
        out.sort();
        out
    }

    #[test]
    fn test_demand_seven_with_canonical_sizes() {
        let found = collect(7, &[4, 2, 1], &[10, 10, 10], None);
        assert_eq!(found.first(), Some(&(3, vec![1, 1, 1])));
        assert!(found.windows(2).all(|w| w[0].0 <= w[1].0));
        assert_eq!(found.last(), Some(&(7, vec![0, 0, 7])));
        assert_eq!(found.len(), 6, "all 4/2/1 decompositions of 7");
    }

    #[test]
    fn test_larger_sizes_first_within_a_bucket() {
        let found = collect(7, &[4, 2, 1], &[10, 10, 10], None);
        let four_units: Vec<&Vec<IntegerType>> =
            found.iter().filter(|(u, _)| *u == 4).map(|(_, c)| c).collect();
        assert_eq!(four_units, vec![&vec![1, 0, 3], &vec![0, 3, 1]]);
    }

    #[test]
    fn test_respects_remaining_capacity() {
        let found = collect(7, &[4, 2, 1], &[0, 1, 5], None);
        assert_eq!(found, vec![(6, vec![0, 1, 5])]);
        let found = collect(7, &[4, 2, 1], &[1, 0, 2], None);
        assert!(found.is_empty());
    }

    #[test]
    fn test_unit_cap_stops_with_capped() {
        let mut cursor = CoverCursor::<IntegerType>::new();
        cursor.open(7, &[4, 2, 1], &[10, 10, 10]);
        let (found, end) = drain(&mut cursor, &[4, 2, 1], Some(4), usize::MAX);
        assert!(found.iter().all(|(u, _)| *u <= 4));
        assert_eq!(found.len(), 3, "4+2+1, 4+1+1+1, 2+2+2+1");
        assert_eq!(end, CursorStep::Capped);

        cursor.open(7, &[4, 2, 1], &[10, 10, 10]);
        let (found, end) = drain(&mut cursor, &[4, 2, 1], Some(2), usize::MAX);
        assert!(found.is_empty());
        assert_eq!(end, CursorStep::Capped);
    }

    #[test]
    fn test_cap_may_tighten_between_calls() {
        let sizes = [4, 2, 1];
        let mut cursor = CoverCursor::<IntegerType>::new();
        cursor.open(7, &sizes, &[10, 10, 10]);
        assert_eq!(cursor.advance(&sizes, None, usize::MAX), CursorStep::Candidate(3));
        assert_eq!(cursor.advance(&sizes, Some(3), usize::MAX), CursorStep::Capped);
        assert_eq!(cursor.advance(&sizes, None, usize::MAX), CursorStep::Exhausted);
    }

    #[test]
    fn test_zero_demand_yields_single_zero_vector() {
        assert_eq!(collect(0, &[4, 1], &[0, 0], None), vec![(0, vec![0, 0])]);
        assert_eq!(collect(0, &[4, 1], &[3, 3], Some(0)), vec![(0, vec![0, 0])]);
    }

    #[test]
    fn test_unreachable_demand_is_barren() {
        let mut cursor = CoverCursor::<IntegerType>::new();
        cursor.open(5, &[4, 2], &[3, 3]);
        assert_eq!(cursor.advance(&[4, 2], None, usize::MAX), CursorStep::Exhausted);
        assert!(cursor.is_barren());
        assert_eq!(cursor.yielded(), 0);

        cursor.close();
        assert!(!cursor.is_barren());
        assert_eq!(cursor.advance(&[4, 2], None, usize::MAX), CursorStep::Exhausted);
    }

    #[test]
    fn test_matches_brute_force() {
        let cases: [(IntegerType, &[IntegerType], &[IntegerType]); 5] = [
            (12, &[5, 3, 2], &[2, 3, 4]),
            (9, &[4, 3], &[3, 3]),
            (10, &[7, 4, 1], &[1, 2, 3]),
            (11, &[6, 4, 2], &[5, 5, 5]),
            (23, &[8, 5, 3, 1], &[2, 3, 4, 6]),
        ];
        for (demand, sizes, remaining) in cases {
            let collected = collect(demand, sizes, remaining, None);
            assert!(collected.windows(2).all(|w| w[0].0 <= w[1].0));
            let mut found: Vec<Vec<IntegerType>> = collected
                .into_iter()
                .map(|(units, v)| {
                    assert_eq!(units, v.iter().sum::<IntegerType>());
                    v
                })
                .collect();
            found.sort();
            assert_eq!(found, brute_force(demand, sizes, remaining), "demand {}", demand);
        }
    }

    #[test]
    fn test_small_budget_pauses_without_changing_the_sequence() {
        let sizes = [8, 5, 3, 1];
        let remaining = [2, 3, 4, 6];
        let expected = collect(23, &sizes, &remaining, None);

        let mut cursor = CoverCursor::new();
        cursor.open(23, &sizes, &remaining);
        let mut found = Vec::new();
        let mut pauses = 0;
        loop {
            match cursor.advance(&sizes, None, 1) {
                CursorStep::Candidate(units) => found.push((units, cursor.counts().to_vec())),
                CursorStep::Pending => pauses += 1,
                CursorStep::Capped => panic!("no cap was given"),
                CursorStep::Exhausted => break,
            }
        }
        assert_eq!(found, expected);
        assert!(pauses > 0);
    }

    #[test]
    fn test_large_demand_yields_first_cover_quickly() {
        let sizes = [32, 24, 16, 8, 4, 2, 1];
        let mut cursor = CoverCursor::<IntegerType>::new();
        cursor.open(1200, &sizes, &[1000; 7]);
        // 37 × 32 + 16 = 1200.
        assert_eq!(cursor.advance(&sizes, None, 10_000), CursorStep::Candidate(38));
        assert_eq!(cursor.counts(), &[37, 0, 1, 0, 0, 0, 0]);
        assert_eq!(cursor.advance(&sizes, Some(37), 10_000), CursorStep::Capped);
    }

    #[test]
    fn test_cursor_is_reusable() {
        let mut cursor = CoverCursor::<IntegerType>::new();
        cursor.open(8, &[4, 2], &[2, 4]);
        assert_eq!(drain(&mut cursor, &[4, 2], None, usize::MAX).0.len(), 3);
        cursor.open(2, &[4, 2], &[2, 4]);
        let (found, end) = drain(&mut cursor, &[4, 2], None, usize::MAX);
        assert_eq!(found, vec![(1, vec![0, 1])]);
        assert_eq!(end, CursorStep::Exhausted);
    }
}
