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

use std::time::Duration;

/// Statistics collected during one subproblem search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BnbSolverStatistics {
    /// Iterations of the main search loop.
    pub steps: u64,
    /// Total nodes visited (one per applied candidate).
    pub nodes_explored: u64,
    /// Total frames popped.
    pub backtracks: u64,
    /// Total candidate combinations enumerated over all locations.
    pub candidates_generated: u64,
    /// The deepest level reached in the tree.
    pub max_depth: u64,
    /// Locations whose demand cannot be covered by the remaining capacity.
    pub prunings_infeasible: u64,
    /// Candidates discarded because they cannot beat the incumbent.
    pub prunings_bound: u64,
    /// Strictly improving complete assignments found.
    pub solutions_found: u64,
    /// Admissible lower bound on the unit count at the root.
    pub root_lower_bound: u64,
    /// Total time spent in the solver.
    pub time_total: Duration,
}

impl BnbSolverStatistics {
    #[inline]
    pub fn on_step(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    #[inline]
    pub fn on_candidates_generated(&mut self, count: usize) {
        self.candidates_generated = self.candidates_generated.saturating_add(count as u64);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    /// Records `count` levels or leaves cut off by the incumbent bound.
    #[inline]
    pub fn on_pruning_bound(&mut self, count: usize) {
        self.prunings_bound = self.prunings_bound.saturating_add(count as u64);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn set_root_lower_bound(&mut self, bound: u64) {
        self.root_lower_bound = bound;
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for BnbSolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Stowage-BnB Solver Statistics:")?;
        writeln!(f, "  Steps:                 {}", self.steps)?;
        writeln!(f, "  Nodes explored:        {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks:            {}", self.backtracks)?;
        writeln!(f, "  Max depth reached:     {}", self.max_depth)?;
        writeln!(f, "  Candidates generated:  {}", self.candidates_generated)?;
        writeln!(f, "  Prunings (infeasible): {}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound):      {}", self.prunings_bound)?;
        writeln!(f, "  Solutions found:       {}", self.solutions_found)?;
        writeln!(f, "  Root lower bound:      {}", self.root_lower_bound)?;
        writeln!(f, "  Total time:            {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_increment_and_saturate() {
        let mut stats = BnbSolverStatistics::default();
        stats.on_step();
        stats.on_node_explored();
        stats.on_node_explored();
        stats.on_candidates_generated(5);
        stats.on_pruning_bound(3);
        stats.on_depth_update(4);
        stats.on_depth_update(2);
        assert_eq!(stats.steps, 1);
        assert_eq!(stats.nodes_explored, 2);
        assert_eq!(stats.candidates_generated, 5);
        assert_eq!(stats.prunings_bound, 3);
        assert_eq!(stats.max_depth, 4);

        stats.backtracks = u64::MAX;
        stats.on_backtrack();
        assert_eq!(stats.backtracks, u64::MAX);
    }

    #[test]
    fn test_display_lists_counters() {
        let stats = BnbSolverStatistics::default();
        let text = stats.to_string();
        assert!(text.contains("Nodes explored:"));
        assert!(text.contains("Prunings (bound):"));
    }
}
