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

use thiserror::Error;

/// An internal inconsistency detected during search.
///
/// A fault means the engine itself is broken, not that the input is bad:
/// the affected subproblem is abandoned instead of returning an allocation
/// that might violate exact cover or capacity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchFault {
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl SearchFault {
    #[inline]
    pub(crate) fn invariant<S>(detail: S) -> Self
    where
        S: Into<String>,
    {
        SearchFault::InvariantViolation(detail.into())
    }
}
