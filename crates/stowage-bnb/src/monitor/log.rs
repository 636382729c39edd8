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

use crate::{
    monitor::tree_search_monitor::TreeSearchMonitor, state::SearchState,
    stats::BnbSolverStatistics,
};
use std::time::{Duration, Instant};
use stowage_core::num::SolverNumeric;
use stowage_model::subproblem::MaterialSubproblem;
use tracing::info;

/// Emits periodic progress events through `tracing`.
///
/// The clock is read only when `nodes_explored & clock_check_mask == 0`, and a
/// line is emitted at most once per `log_interval`.
#[derive(Debug, Clone)]
pub struct LogMonitor<T> {
    material: String,
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_units: Option<T>,
}

impl<T> LogMonitor<T>
where
    T: SolverNumeric,
{
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            material: String::new(),
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            best_units: None,
        }
    }

    #[inline(always)]
    fn log_line(&mut self, state: &SearchState<T>, stats: &BnbSolverStatistics) {
        let now = Instant::now();
        let best = match self.best_units {
            Some(units) => units.to_string(),
            None => "Inf".to_string(),
        };
        info!(
            material = %self.material,
            elapsed_secs = now.duration_since(self.start_time).as_secs_f64(),
            nodes = stats.nodes_explored,
            depth = state.depth(),
            best = %best,
            current = %state.current_units(),
            backtracks = stats.backtracks,
            pruned = stats.prunings_bound,
            "search progress"
        );
        self.last_log_time = now;
    }
}

impl<T> Default for LogMonitor<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl<T> std::fmt::Display for LogMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for LogMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(
        &mut self,
        subproblem: &MaterialSubproblem<T>,
        _statistics: &BnbSolverStatistics,
    ) {
        self.material = subproblem.material_name().to_string();
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_units = None;
        info!(
            material = %self.material,
            locations = subproblem.num_locations(),
            sizes = subproblem.num_sizes(),
            "search started"
        );
    }

    fn on_descend(&mut self, state: &SearchState<T>, _units: T, stats: &BnbSolverStatistics) {
        if (stats.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(state, stats);
        }
    }

    fn on_solution_found(&mut self, total_units: T, _stats: &BnbSolverStatistics) {
        self.best_units = Some(total_units);
    }

    fn on_exit_search(&mut self, stats: &BnbSolverStatistics) {
        info!(
            material = %self.material,
            nodes = stats.nodes_explored,
            solutions = stats.solutions_found,
            elapsed = ?stats.time_total,
            "search finished"
        );
    }
}
