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

use stowage_bnb::error::SearchFault;
use stowage_model::allocation::AllocationViolation;
use thiserror::Error;

/// An invalid `SolverConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverConfigError {
    #[error("node limit must be at least 1")]
    ZeroNodeLimit,

    #[error("time limit must be at least 1 ms")]
    ZeroTimeLimit,

    #[error("sieve limit must be at least 1")]
    ZeroSieveLimit,

    #[error("sieve limit {0} exceeds the addressable range")]
    SieveLimitTooLarge(u64),
}

/// Per-material outcomes that cannot be merged into a report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("expected one outcome per material ({expected}), got {found}")]
    OutcomeCountMismatch { expected: usize, found: usize },

    #[error("assembled allocation failed verification")]
    Verification(#[from] AllocationViolation),
}

/// A solve that could not produce a report.
///
/// Infeasible and inconclusive materials are not errors; they are reported
/// through `AllocationReport::status`.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("search for material `{material}` aborted")]
    Fault {
        material: String,
        #[source]
        source: SearchFault,
    },

    #[error("worker for material `{material}` panicked")]
    WorkerPanicked { material: String },

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Configuration(#[from] SolverConfigError),
}
