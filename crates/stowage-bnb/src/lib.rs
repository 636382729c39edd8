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

//! Stowage-BnB: branch-and-bound for exact container allocation
//!
//! Solves one material at a time: given the demands of every location, the
//! container sizes and the shared pool of containers per size, find
//! per-location size vectors that cover every demand exactly, never exceed
//! the pool, and use as few containers as possible.
//!
//! Core flow
//! - Decompose a `stowage_model::Model<T>` into `MaterialSubproblem`s.
//! - Choose a `branching::ordering::LocationOrdering` (which location is
//!   decided at which depth).
//! - Optionally compose monitors (node limit, time limit, interrupt, logging).
//! - Run `bnb::BnbSolver::solve` and inspect the `BnbSolverOutcome`.
//!
//! Design highlights
//! - Rejection first: `precheck` proves infeasibility for unrepresentable
//!   demands and insufficient pools without exploring a node.
//! - Admissible bounds: the minimum containers per demand with an unlimited
//!   pool bound the cost of every unassigned location.
//! - Lazy candidates: every depth owns a resumable cursor that yields exact
//!   covers cheapest first in bounded chunks, so budgets hold even for huge
//!   demands; the state is restored from its own row log on backtrack.
//! - Honest outcomes: an aborted search is `Inconclusive`, never `Optimal`
//!   or `Infeasible`; broken invariants surface as `SearchFault`.

pub mod bnb;
pub mod branching;
pub mod combination;
pub mod error;
pub mod monitor;
pub mod precheck;
pub mod result;
mod stack;
pub mod state;
pub mod stats;
