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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait, `PruneReason` and `SearchCommand`.
//! Callbacks track the solver lifecycle, and a monitor can stop the search
//! by returning `SearchCommand::Terminate` from `search_command`, which the
//! solver consults once per step.
//!
//! Lifecycle
//! - enter → step → {prune | candidates/descend/backtrack} → solution → exit
//! - `BnbSolverStatistics` is provided to every callback for telemetry.
//!
//! Only `name`, `on_enter_search` and `on_exit_search` are required; every
//! other callback defaults to doing nothing.

use crate::{state::SearchState, stats::BnbSolverStatistics};
use stowage_core::num::SolverNumeric;
use stowage_model::subproblem::MaterialSubproblem;

/// Command returned by a monitor to control the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCommand {
    /// Keep searching.
    Continue,
    /// Stop the search; the string is reported as the abort reason.
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate({})", reason),
        }
    }
}

/// Reasons for pruning a search state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// The remaining capacity cannot cover the next location.
    Infeasible,
    /// The subtree cannot beat the incumbent.
    BoundDominated,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::Infeasible => write!(f, "Infeasible"),
            PruneReason::BoundDominated => write!(f, "BoundDominated"),
        }
    }
}

/// Trait for monitoring and controlling the search process of the solver.
pub trait TreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;

    /// Called when the search starts.
    fn on_enter_search(
        &mut self,
        subproblem: &MaterialSubproblem<T>,
        statistics: &BnbSolverStatistics,
    );

    /// Called when the search ends.
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics);

    /// Called once per step to determine the next action of the search.
    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        SearchCommand::Continue
    }

    /// Called at each step of the search.
    fn on_step(&mut self, _state: &SearchState<T>, _statistics: &BnbSolverStatistics) {}

    /// Called when the lower bound of a node is computed.
    /// `lower_bound` bounds the whole subtree, `estimated_remaining`
    /// the units still needed for the unassigned locations.
    fn on_lower_bound_computed(
        &mut self,
        _state: &SearchState<T>,
        _lower_bound: T,
        _estimated_remaining: T,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    /// Called when a search state or candidate is pruned.
    fn on_prune(
        &mut self,
        _state: &SearchState<T>,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    /// Called when the cursor of the current location yields its next
    /// candidate, before the candidate is applied.
    fn on_candidate_generated(
        &mut self,
        _state: &SearchState<T>,
        _units: T,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    /// Called after descending into a child; `units` is the size of the
    /// applied candidate.
    fn on_descend(&mut self, _state: &SearchState<T>, _units: T, _statistics: &BnbSolverStatistics) {}

    /// Called when backtracking to a parent state.
    fn on_backtrack(&mut self, _state: &SearchState<T>, _statistics: &BnbSolverStatistics) {}

    /// Called when a new, strictly better complete assignment is found.
    fn on_solution_found(&mut self, _total_units: T, _statistics: &BnbSolverStatistics) {}
}

impl<T> std::fmt::Debug for dyn TreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn TreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<T, M> TreeSearchMonitor<T> for &mut M
where
    T: SolverNumeric,
    M: TreeSearchMonitor<T> + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_enter_search(
        &mut self,
        subproblem: &MaterialSubproblem<T>,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_enter_search(subproblem, statistics);
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        (**self).on_exit_search(statistics);
    }

    fn search_command(
        &mut self,
        state: &SearchState<T>,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        (**self).search_command(state, statistics)
    }

    fn on_step(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        (**self).on_step(state, statistics);
    }

    fn on_lower_bound_computed(
        &mut self,
        state: &SearchState<T>,
        lower_bound: T,
        estimated_remaining: T,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_lower_bound_computed(state, lower_bound, estimated_remaining, statistics);
    }

    fn on_prune(
        &mut self,
        state: &SearchState<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_prune(state, reason, statistics);
    }

    fn on_candidate_generated(
        &mut self,
        state: &SearchState<T>,
        units: T,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_candidate_generated(state, units, statistics);
    }

    fn on_descend(&mut self, state: &SearchState<T>, units: T, statistics: &BnbSolverStatistics) {
        (**self).on_descend(state, units, statistics);
    }

    fn on_backtrack(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        (**self).on_backtrack(state, statistics);
    }

    fn on_solution_found(&mut self, total_units: T, statistics: &BnbSolverStatistics) {
        (**self).on_solution_found(total_units, statistics);
    }
}
