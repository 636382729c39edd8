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

//! Branch-and-bound solver for one material.
//!
//! The solver assigns one location per depth, in an order fixed up front by
//! a `LocationOrdering`. At every depth the candidates are the exact covers of
//! that location's demand that fit into the remaining pool. They are produced
//! lazily, cheapest first, by a resumable `CoverCursor` kept on the stack for
//! that depth; one step of the search loop advances the cursor by a bounded
//! amount of work, so monitors are consulted regularly even while a large
//! demand is being enumerated. A candidate is discarded when the units spent
//! so far, plus its own units, plus the admissible lower bound of the
//! unassigned locations reach the incumbent. Because a cursor yields in
//! ascending unit order, the first such failure closes the whole level.
//!
//! Before the tree is touched the pre-checks in `precheck` reject demands
//! that no combination of sizes can represent and pools whose total SCU is
//! below the total demand; both outcomes are proofs of infeasibility and
//! explore no nodes.
//!
//! The incumbent is only replaced by a strictly smaller unit count, and every
//! incumbent is verified for exact cover and capacity before it is stored. A
//! failed verification is a `SearchFault`, never a returned plan. When a
//! monitor terminates the search, the outcome is `Inconclusive`, whatever the
//! incumbent at that point.

use crate::{
    branching::ordering::{LocationOrdering, is_permutation},
    combination::CursorStep,
    error::SearchFault,
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    precheck::{self, DEFAULT_SIEVE_LIMIT, LowerBounds},
    result::{BnbSolverOutcome, InfeasibilityCause, MaterialPlan},
    stack::SearchStack,
    state::SearchState,
    stats::BnbSolverStatistics,
};
use stowage_core::num::SolverNumeric;
use stowage_model::{
    index::{LocationIndex, SizeIndex},
    subproblem::MaterialSubproblem,
};
use tracing::{debug, trace};

/// Enumeration steps a cursor may take within one search step.
const ENUMERATION_STEP_BUDGET: usize = 256;

/// A reusable branch-and-bound engine.
///
/// Holds the decision stack and its per-depth cursors so that repeated solves
/// do not reallocate.
#[derive(Clone, Debug)]
pub struct BnbSolver<T>
where
    T: SolverNumeric,
{
    stack: SearchStack<T>,
    sieve_limit: usize,
}

impl<T> Default for BnbSolver<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BnbSolver<T>
where
    T: SolverNumeric,
{
    /// Creates a solver with the default sieve limit.
    #[inline]
    pub fn new() -> Self {
        Self::with_sieve_limit(DEFAULT_SIEVE_LIMIT)
    }

    /// Creates a solver that builds the exact representability table only for
    /// demands up to `sieve_limit`.
    #[inline]
    pub fn with_sieve_limit(sieve_limit: usize) -> Self {
        Self {
            stack: SearchStack::new(),
            sieve_limit,
        }
    }

    #[inline]
    pub fn sieve_limit(&self) -> usize {
        self.sieve_limit
    }

    /// Solves one material subproblem.
    ///
    /// # Errors
    ///
    /// Returns a `SearchFault` if an internal invariant breaks: the ordering
    /// is not a permutation of the locations, a capacity would become negative,
    /// or an incumbent fails verification.
    pub fn solve<O, S>(
        &mut self,
        subproblem: &MaterialSubproblem<T>,
        ordering: &O,
        mut monitor: S,
    ) -> Result<BnbSolverOutcome<T>, SearchFault>
    where
        O: LocationOrdering<T> + ?Sized,
        S: TreeSearchMonitor<T>,
    {
        let order = ordering.order(subproblem);
        if !is_permutation(&order, subproblem) {
            return Err(SearchFault::invariant(format!(
                "location ordering `{}` did not return a permutation of {} locations",
                ordering.name(),
                subproblem.num_locations()
            )));
        }

        let session = BnbSolverSearchSession::new(
            &mut self.stack,
            self.sieve_limit,
            subproblem,
            order,
            &mut monitor,
        );
        let outcome = session.run();
        self.reset();
        outcome
    }

    /// Clears the stack, keeping its allocations.
    #[inline]
    fn reset(&mut self) {
        self.stack.reset();
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionEnd<T> {
    OptimalityProven,
    InfeasibilityProven(InfeasibilityCause<T>),
    Aborted(String),
}

/// A search session for one subproblem.
/// This struct encapsulates the state and logic
/// of a single search run.
struct BnbSolverSearchSession<'a, T, S>
where
    T: SolverNumeric,
{
    stack: &'a mut SearchStack<T>,
    sieve_limit: usize,
    subproblem: &'a MaterialSubproblem<T>,
    monitor: &'a mut S,
    order: Vec<LocationIndex>,
    size_order: Vec<SizeIndex>,
    sorted_sizes: Vec<T>,
    demands: Vec<T>,
    demand_suffix: Vec<T>,
    bound_suffix: Vec<T>,
    state: SearchState<T>,
    best_units: Option<T>,
    best_plan: Option<MaterialPlan<T>>,
    stats: BnbSolverStatistics,
    start_time: std::time::Instant,
}

impl<'a, T, S> std::fmt::Debug for BnbSolverSearchSession<'a, T, S>
where
    T: SolverNumeric,
    S: TreeSearchMonitor<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("material", &self.subproblem.material_name())
            .field("state", &self.state)
            .field("best_units", &self.best_units)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, T, S> BnbSolverSearchSession<'a, T, S>
where
    T: SolverNumeric,
    S: TreeSearchMonitor<T>,
{
    #[inline]
    fn new(
        stack: &'a mut SearchStack<T>,
        sieve_limit: usize,
        subproblem: &'a MaterialSubproblem<T>,
        order: Vec<LocationIndex>,
        monitor: &'a mut S,
    ) -> Self {
        let mut size_order: Vec<SizeIndex> = SizeIndex::range(subproblem.num_sizes()).collect();
        size_order.sort_by(|a, b| subproblem.size_value(*b).cmp(&subproblem.size_value(*a)));
        let sorted_sizes: Vec<T> = size_order.iter().map(|&s| subproblem.size_value(s)).collect();
        let capacities: Vec<T> = size_order
            .iter()
            .map(|&s| subproblem.availability(s))
            .collect();

        let demands: Vec<T> = order.iter().map(|&l| subproblem.demand(l)).collect();
        let mut demand_suffix = vec![T::zero(); demands.len() + 1];
        for depth in (0..demands.len()).rev() {
            demand_suffix[depth] = demand_suffix[depth + 1] + demands[depth];
        }

        let state = SearchState::new(capacities, order.len());

        Self {
            stack,
            sieve_limit,
            subproblem,
            monitor,
            order,
            size_order,
            sorted_sizes,
            demands,
            demand_suffix,
            bound_suffix: Vec::new(),
            state,
            best_units: None,
            best_plan: None,
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    #[inline]
    fn num_locations(&self) -> usize {
        self.order.len()
    }

    /// Run the search session.
    fn run(mut self) -> Result<BnbSolverOutcome<T>, SearchFault> {
        self.monitor.on_enter_search(self.subproblem, &self.stats);
        let end = self.search();
        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        let end = end?;
        self.finalize_result(end)
    }

    fn search(&mut self) -> Result<SessionEnd<T>, SearchFault> {
        let bounds = match precheck::run_prechecks(self.subproblem, self.sieve_limit) {
            Ok(bounds) => bounds,
            Err(cause) => {
                debug!(
                    material = self.subproblem.material_name(),
                    cause = %cause,
                    "rejected before search"
                );
                return Ok(SessionEnd::InfeasibilityProven(cause));
            }
        };

        self.initialize(&bounds)?;

        loop {
            self.monitor.on_step(&self.state, &self.stats);
            self.stats.on_step();

            if let SearchCommand::Terminate(reason) =
                self.monitor.search_command(&self.state, &self.stats)
            {
                return Ok(SessionEnd::Aborted(reason));
            }

            if !self.process_next_candidate()? {
                if self.stack.depth() <= 1 {
                    return Ok(if self.best_plan.is_some() {
                        SessionEnd::OptimalityProven
                    } else {
                        SessionEnd::InfeasibilityProven(InfeasibilityCause::SearchExhausted)
                    });
                }
                self.backtrack_step()?;
            }
        }
    }

    /// Finalize the solver result based on the best plan found
    /// and the way the session ended.
    fn finalize_result(self, end: SessionEnd<T>) -> Result<BnbSolverOutcome<T>, SearchFault> {
        match end {
            SessionEnd::OptimalityProven => match self.best_plan {
                Some(plan) => Ok(BnbSolverOutcome::optimal(plan, self.stats)),
                None => Err(SearchFault::invariant(
                    "optimality proven without an incumbent",
                )),
            },
            SessionEnd::InfeasibilityProven(cause) => {
                Ok(BnbSolverOutcome::infeasible(cause, self.stats))
            }
            SessionEnd::Aborted(reason) => Ok(BnbSolverOutcome::inconclusive(
                self.best_plan,
                reason,
                self.stats,
            )),
        }
    }

    /// Sets up bounds and the root frame, and opens the cursor of the first
    /// location.
    fn initialize(&mut self, bounds: &LowerBounds<T>) -> Result<(), SearchFault> {
        self.bound_suffix = bounds.suffix_sums(&self.order);
        self.stats
            .set_root_lower_bound(self.bound_suffix[0].to_u64().unwrap_or(0));

        self.stack.reset_for(self.num_locations());
        self.stack.push_frame();

        if self.num_locations() == 0 {
            return self.handle_complete_solution();
        }
        self.expand();
        Ok(())
    }

    fn backtrack_step(&mut self) -> Result<(), SearchFault> {
        self.stats.on_backtrack();
        if !self.state.undo() {
            return Err(SearchFault::invariant(
                "backtracked past the root of the search state",
            ));
        }
        self.stack.pop_frame();
        self.monitor.on_backtrack(&self.state, &self.stats);
        Ok(())
    }

    /// Largest unit count the location at `depth` may take and still beat the
    /// incumbent.
    #[inline]
    fn unit_cap(&self, depth: usize) -> Option<T> {
        if depth >= self.num_locations() {
            return None;
        }
        self.best_units.map(|best| {
            best - self.state.current_units() - self.bound_suffix[depth + 1] - T::one()
        })
    }

    /// Advances the cursor of the current level and descends into the
    /// candidate it yields. Returns `false` once the level is closed.
    fn process_next_candidate(&mut self) -> Result<bool, SearchFault> {
        let unit_cap = self.unit_cap(self.state.depth());
        let Some(cursor) = self.stack.current_mut() else {
            return Ok(false);
        };

        let units = match cursor.advance(&self.sorted_sizes, unit_cap, ENUMERATION_STEP_BUDGET) {
            CursorStep::Candidate(units) => units,
            CursorStep::Pending => return Ok(true),
            CursorStep::Capped => {
                self.stats.on_pruning_bound(1);
                self.monitor
                    .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
                return Ok(false);
            }
            CursorStep::Exhausted => {
                if cursor.is_barren() {
                    self.stats.on_pruning_infeasible();
                    self.monitor
                        .on_prune(&self.state, PruneReason::Infeasible, &self.stats);
                }
                return Ok(false);
            }
        };

        self.stats.on_candidates_generated(1);
        self.monitor
            .on_candidate_generated(&self.state, units, &self.stats);

        self.state.apply(cursor.counts(), units)?;
        self.stack.push_frame();

        self.stats.on_node_explored();
        self.stats.on_depth_update(self.state.depth() as u64);
        self.monitor.on_descend(&self.state, units, &self.stats);

        if self.state.depth() == self.num_locations() {
            self.handle_complete_solution()?;
        } else {
            self.expand();
        }
        Ok(true)
    }

    /// Opens the cursor of the location at the current depth, unless the
    /// remaining pool cannot cover the remaining demand.
    fn expand(&mut self) {
        let depth = self.state.depth();
        let current = self.state.current_units();

        if self.state.remaining_scu(&self.sorted_sizes) < self.demand_suffix[depth] {
            self.stats.on_pruning_infeasible();
            self.monitor
                .on_prune(&self.state, PruneReason::Infeasible, &self.stats);
            return;
        }

        let estimated_remaining = self.bound_suffix[depth];
        self.monitor.on_lower_bound_computed(
            &self.state,
            current + estimated_remaining,
            estimated_remaining,
            &self.stats,
        );

        if let Some(cursor) = self.stack.current_mut() {
            cursor.open(
                self.demands[depth],
                &self.sorted_sizes,
                self.state.remaining(),
            );
        }
    }

    /// Records the complete assignment at the current leaf if it is strictly
    /// better than the incumbent.
    fn handle_complete_solution(&mut self) -> Result<(), SearchFault> {
        let units = self.state.current_units();
        if self.best_units.is_some_and(|best| units >= best) {
            self.stats.on_pruning_bound(1);
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return Ok(());
        }

        let plan = self.build_plan();
        plan.check(
            self.subproblem.sizes(),
            self.subproblem.demands(),
            self.subproblem.availabilities(),
        )
        .map_err(|detail| {
            SearchFault::invariant(format!(
                "incumbent for `{}` failed verification: {}",
                self.subproblem.material_name(),
                detail
            ))
        })?;

        trace!(
            material = self.subproblem.material_name(),
            units = %units,
            nodes = self.stats.nodes_explored,
            "improved incumbent"
        );

        self.best_units = Some(units);
        self.best_plan = Some(plan);
        self.stats.on_solution_found();
        self.monitor.on_solution_found(units, &self.stats);
        Ok(())
    }

    /// Maps the rows of the current state back to model order.
    fn build_plan(&self) -> MaterialPlan<T> {
        let num_sizes = self.sorted_sizes.len();
        let mut counts = vec![T::zero(); self.subproblem.num_locations() * num_sizes];
        for (depth, location_index) in self.order.iter().enumerate() {
            let row = self.state.row(depth);
            for (slot, size_index) in self.size_order.iter().enumerate() {
                counts[location_index.get() * num_sizes + size_index.get()] = row[slot];
            }
        }
        MaterialPlan::new(
            self.subproblem.material_index(),
            self.subproblem.num_locations(),
            num_sizes,
            counts,
        )
    }
}
