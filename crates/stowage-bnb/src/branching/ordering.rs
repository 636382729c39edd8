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

use stowage_core::num::SolverNumeric;
use stowage_model::{index::LocationIndex, subproblem::MaterialSubproblem};

/// Chooses the order in which the search visits locations.
///
/// Implementations must return a permutation of
/// `0..subproblem.num_locations()`.
pub trait LocationOrdering<T>
where
    T: SolverNumeric,
{
    /// Returns the name of the ordering.
    fn name(&self) -> &str;

    /// Returns the visiting order for `subproblem`.
    fn order(&self, subproblem: &MaterialSubproblem<T>) -> Vec<LocationIndex>;
}

impl<T> std::fmt::Debug for dyn LocationOrdering<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LocationOrdering({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn LocationOrdering<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LocationOrdering({})", self.name())
    }
}

/// Returns `true` if `order` visits every location of `subproblem` exactly once.
pub fn is_permutation<T>(order: &[LocationIndex], subproblem: &MaterialSubproblem<T>) -> bool
where
    T: SolverNumeric,
{
    let n = subproblem.num_locations();
    if order.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for location_index in order {
        let i = location_index.get();
        if i >= n || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}
