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

//! # Stowage Solver
//!
//! High-level orchestration for exact container allocation. This crate
//! decomposes a model by material, runs one branch-and-bound search per
//! material, and merges the outcomes into a single report.
//!
//! ## Modules
//!
//! - `config`: serde-enabled `SolverConfig` (budgets, ordering, parallelism).
//! - `solver`: `SolverBuilder` and `AllocationSolver`, the per-material
//!   worker orchestration.
//! - `report`: `AllocationReport` with verdict, allocation table, utilization
//!   and capacity analysis.
//! - `error`: `SolveError`, `ReportError` and `SolverConfigError`.
//!
//! Materials share no constraint, so solving them independently and merging
//! the results is exact. See `solver` for a usage example.

pub mod config;
pub mod error;
pub mod report;
pub mod solver;
