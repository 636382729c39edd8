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

/// Visits locations in model declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclaredOrder;

impl DeclaredOrder {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> LocationOrdering<T> for DeclaredOrder
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "DeclaredOrder"
    }

    fn order(&self, subproblem: &MaterialSubproblem<T>) -> Vec<LocationIndex> {
        LocationIndex::range(subproblem.num_locations()).collect()
    }
}
