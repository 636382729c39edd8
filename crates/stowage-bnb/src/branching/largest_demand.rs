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

use crate::branching::ordering::LocationOrdering;
use stowage_core::num::SolverNumeric;
use stowage_model::{index::LocationIndex, subproblem::MaterialSubproblem};

/// Visits the largest demands first.
///
/// Large demands have the fewest exact covers and consume the most capacity,
/// so placing them early exposes capacity conflicts near the root. Ties keep
/// declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LargestDemandFirst;

impl LargestDemandFirst {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> LocationOrdering<T> for LargestDemandFirst
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "LargestDemandFirst"
    }

    fn order(&self, subproblem: &MaterialSubproblem<T>) -> Vec<LocationIndex> {
        let mut order: Vec<LocationIndex> =
            LocationIndex::range(subproblem.num_locations()).collect();
        order.sort_by(|a, b| subproblem.demand(*b).cmp(&subproblem.demand(*a)));
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::ordering::is_permutation;

    #[test]
    fn test_largest_demand_first_is_stable() {
        let sp = MaterialSubproblem::<i64>::from_parts(
            "M",
            vec![2, 1],
            vec![1, 5, 3, 5, 0],
            vec![1, 1],
        );
        let order = LargestDemandFirst.order(&sp);
        let raw: Vec<usize> = order.iter().map(|l| l.get()).collect();
        assert_eq!(raw, vec![1, 3, 2, 0, 4]);
        assert!(is_permutation(&order, &sp));
    }
}
