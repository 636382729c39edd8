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

//! # Per-Material Orchestration
//!
//! Splits a `Model` into independent material subproblems, solves each with
//! its own `BnbSolver`, and merges the outcomes into an `AllocationReport`.
//!
//! ## Highlights
//!
//! - Parallel execution:
//!   - One worker per material through `std::thread::scope`, or a plain loop
//!     when configured as sequential.
//!   - Workers share nothing mutable. Each builds its own
//!     `CompositeTreeSearchMonitor` with interrupt, node-limit, time-limit and
//!     optional progress monitors.
//! - Error handling:
//!   - Every worker is joined before any error is reported; the first error
//!     in material order wins.
//!   - A search fault or a worker panic fails the whole solve. Infeasible and
//!     inconclusive materials do not; they show up in the report status.
//! - Builder pattern:
//!   - `SolverBuilder` offers fluent setters and `from_config`.
//!
//! ## Usage
//!
//! ```rust
//! use stowage_model::model::ModelBuilder;
//! use stowage_solver::{report::ReportStatus, solver::SolverBuilder};
//!
//! let mut builder = ModelBuilder::<i64>::new();
//! builder
//!     .add_location("Hangar")
//!     .add_material("Copper")
//!     .add_sizes([1, 2, 4])
//!     .set_demand("Hangar", "Copper", 7)
//!     .set_availability("Copper", 1, 10)
//!     .set_availability("Copper", 2, 10)
//!     .set_availability("Copper", 4, 10);
//! let model = builder.build().unwrap();
//!
//! let solver = SolverBuilder::new().with_node_limit(100_000).build();
//! let report = solver.solve(&model).unwrap();
//! assert_eq!(report.status(), ReportStatus::Solved);
//! assert_eq!(report.total_units(), Some(3));
//! ```

use crate::{
    config::{LocationOrder, SolverConfig},
    error::SolveError,
    report::AllocationReport,
};
use std::{sync::atomic::AtomicBool, time::Duration};
use stowage_bnb::{
    bnb::BnbSolver,
    branching::{
        declared::DeclaredOrder, largest_demand::LargestDemandFirst, ordering::LocationOrdering,
    },
    error::SearchFault,
    monitor::{
        composite::CompositeTreeSearchMonitor, interrupt::InterruptMonitor, log::LogMonitor,
        node_limit::NodeLimitMonitor, time::TimeLimitMonitor,
    },
    result::BnbSolverOutcome,
};
use stowage_core::num::SolverNumeric;
use stowage_model::{model::Model, subproblem::MaterialSubproblem};
use tracing::{debug, info, warn};

/// What came back from one worker.
enum MaterialRun<T>
where
    T: SolverNumeric,
{
    Finished(Result<BnbSolverOutcome<T>, SearchFault>),
    Panicked,
}

/// Solves every material of a model under one configuration.
#[derive(Debug, Clone)]
pub struct AllocationSolver<'a> {
    config: SolverConfig,
    interrupt: Option<&'a AtomicBool>,
}

impl<'a> AllocationSolver<'a> {
    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    #[inline]
    pub fn has_interrupt(&self) -> bool {
        self.interrupt.is_some()
    }

    /// Solves `model`.
    ///
    /// # Errors
    ///
    /// - `SolveError::Configuration` if the configuration is invalid.
    /// - `SolveError::Fault` if a search detected a broken invariant.
    /// - `SolveError::WorkerPanicked` if a worker thread panicked.
    /// - `SolveError::Report` if the merged allocation does not verify.
    pub fn solve<T>(&self, model: &Model<T>) -> Result<AllocationReport<T>, SolveError>
    where
        T: SolverNumeric,
    {
        self.config.validate()?;
        let sieve_limit = self.config.sieve_limit_usize()?;
        let start_time = std::time::Instant::now();

        info!(
            materials = model.num_materials(),
            locations = model.num_locations(),
            sizes = model.num_sizes(),
            parallel = self.config.parallel,
            location_order = %self.config.location_order,
            "solving allocation"
        );

        let subproblems = model.decompose();
        let runs = if self.config.parallel && subproblems.len() > 1 {
            self.run_parallel(&subproblems, sieve_limit)
        } else {
            self.run_sequential(&subproblems, sieve_limit)
        };

        let mut outcomes = Vec::with_capacity(runs.len());
        for (subproblem, run) in subproblems.iter().zip(runs) {
            let material = subproblem.material_name();
            let outcome = match run {
                MaterialRun::Finished(Ok(outcome)) => outcome,
                MaterialRun::Finished(Err(source)) => {
                    return Err(SolveError::Fault {
                        material: material.to_string(),
                        source,
                    });
                }
                MaterialRun::Panicked => {
                    return Err(SolveError::WorkerPanicked {
                        material: material.to_string(),
                    });
                }
            };

            let stats = outcome.statistics();
            debug!(
                material,
                result = %outcome.result(),
                nodes = stats.nodes_explored,
                backtracks = stats.backtracks,
                prunings_bound = stats.prunings_bound,
                prunings_infeasible = stats.prunings_infeasible,
                time_ms = stats.time_total.as_millis() as u64,
                "material finished"
            );
            if outcome.result().is_inconclusive() {
                warn!(
                    material,
                    reason = %outcome.termination_reason(),
                    "search inconclusive"
                );
            }
            outcomes.push(outcome);
        }

        let report = AllocationReport::aggregate(model, outcomes, start_time.elapsed())?;
        info!(
            status = %report.status(),
            elapsed_ms = report.solve_duration().as_millis() as u64,
            "allocation finished"
        );
        Ok(report)
    }

    fn run_parallel<T>(
        &self,
        subproblems: &[MaterialSubproblem<T>],
        sieve_limit: usize,
    ) -> Vec<MaterialRun<T>>
    where
        T: SolverNumeric,
    {
        let config = &self.config;
        let interrupt = self.interrupt;

        std::thread::scope(|scope| {
            let handles: Vec<_> = subproblems
                .iter()
                .map(|subproblem| {
                    scope.spawn(move || solve_material(subproblem, config, interrupt, sieve_limit))
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => MaterialRun::Finished(result),
                    Err(_) => MaterialRun::Panicked,
                })
                .collect()
        })
    }

    fn run_sequential<T>(
        &self,
        subproblems: &[MaterialSubproblem<T>],
        sieve_limit: usize,
    ) -> Vec<MaterialRun<T>>
    where
        T: SolverNumeric,
    {
        subproblems
            .iter()
            .map(|subproblem| {
                MaterialRun::Finished(solve_material(
                    subproblem,
                    &self.config,
                    self.interrupt,
                    sieve_limit,
                ))
            })
            .collect()
    }
}

/// Runs one subproblem with the monitors the configuration asks for.
fn solve_material<T>(
    subproblem: &MaterialSubproblem<T>,
    config: &SolverConfig,
    interrupt: Option<&AtomicBool>,
    sieve_limit: usize,
) -> Result<BnbSolverOutcome<T>, SearchFault>
where
    T: SolverNumeric,
{
    let mut monitor: CompositeTreeSearchMonitor<'_, T> = CompositeTreeSearchMonitor::new();
    if let Some(flag) = interrupt {
        monitor.add_monitor(InterruptMonitor::new(flag));
    }
    if let Some(limit) = config.node_limit {
        monitor.add_monitor(NodeLimitMonitor::new(limit));
    }
    if let Some(limit) = config.time_limit() {
        monitor.add_monitor(TimeLimitMonitor::new(limit));
    }
    if config.log_progress {
        monitor.add_monitor(LogMonitor::default());
    }

    let ordering: &dyn LocationOrdering<T> = match config.location_order {
        LocationOrder::Declared => &DeclaredOrder,
        LocationOrder::LargestDemandFirst => &LargestDemandFirst,
    };

    BnbSolver::with_sieve_limit(sieve_limit).solve(subproblem, ordering, monitor)
}

/// Fluent construction of an `AllocationSolver`.
#[derive(Debug, Clone, Default)]
pub struct SolverBuilder<'a> {
    config: SolverConfig,
    interrupt: Option<&'a AtomicBool>,
}

impl<'a> SolverBuilder<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            config: SolverConfig::default(),
            interrupt: None,
        }
    }

    /// Starts from an existing configuration. Validation happens at solve time.
    #[inline]
    pub fn from_config(config: SolverConfig) -> Self {
        Self {
            config,
            interrupt: None,
        }
    }

    #[inline]
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.config.node_limit = Some(limit);
        self
    }

    /// Sets the per-material time limit, rounded up to whole milliseconds.
    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        let millis = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
        let millis = if millis == 0 && !limit.is_zero() {
            1
        } else {
            millis
        };
        self.config.time_limit_ms = Some(millis);
        self
    }

    #[inline]
    pub fn with_location_order(mut self, order: LocationOrder) -> Self {
        self.config.location_order = order;
        self
    }

    #[inline]
    pub fn with_sieve_limit(mut self, limit: u64) -> Self {
        self.config.sieve_limit = limit;
        self
    }

    #[inline]
    pub fn with_progress_logging(mut self) -> Self {
        self.config.log_progress = true;
        self
    }

    /// Stops every search cooperatively once `flag` is set.
    #[inline]
    pub fn with_interrupt(mut self, flag: &'a AtomicBool) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Solves materials one after another on the calling thread.
    #[inline]
    pub fn sequential(mut self) -> Self {
        self.config.parallel = false;
        self
    }

    #[inline]
    pub fn build(self) -> AllocationSolver<'a> {
        AllocationSolver {
            config: self.config,
            interrupt: self.interrupt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::SolverConfigError, report::ReportStatus};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use stowage_bnb::result::InfeasibilityCause;
    use stowage_model::{
        index::{LocationIndex, MaterialIndex},
        model::ModelBuilder,
    };

    type IntegerType = i64;

    fn single_material_model(
        sizes: &[IntegerType],
        demands: &[IntegerType],
        availabilities: &[IntegerType],
    ) -> Model<IntegerType> {
        let mut builder = ModelBuilder::<IntegerType>::new();
        builder.add_material("M").add_sizes(sizes.iter().copied());
        for (i, &demand) in demands.iter().enumerate() {
            let name = format!("L{}", i);
            builder.add_location(name.as_str());
            builder.set_demand(name, "M", demand);
        }
        for (&size, &count) in sizes.iter().zip(availabilities) {
            builder.set_availability("M", size, count);
        }
        builder.build().unwrap()
    }

    fn random_model(rng: &mut ChaCha8Rng) -> Model<IntegerType> {
        let pool: [IntegerType; 5] = [1, 2, 3, 4, 6];
        let mut builder = ModelBuilder::<IntegerType>::new();
        let num_sizes = rng.random_range(1..=3);
        let mut sizes = Vec::new();
        while sizes.len() < num_sizes {
            let s = pool[rng.random_range(0..pool.len())];
            if !sizes.contains(&s) {
                sizes.push(s);
            }
        }
        builder.add_sizes(sizes.iter().copied());

        let num_locations = rng.random_range(1..=3);
        let num_materials = rng.random_range(1..=3);
        for l in 0..num_locations {
            builder.add_location(format!("L{}", l));
        }
        for m in 0..num_materials {
            let material = format!("M{}", m);
            builder.add_material(material.as_str());
            for l in 0..num_locations {
                builder.set_demand(format!("L{}", l), material.as_str(), rng.random_range(0..=10));
            }
            for &size in &sizes {
                builder.set_availability(material.as_str(), size, rng.random_range(0..=5));
            }
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_single_material_optimum() {
        let model = single_material_model(&[1, 2, 4], &[7], &[10, 10, 10]);
        let report = SolverBuilder::new().build().solve(&model).unwrap();
        assert_eq!(report.status(), ReportStatus::Solved);
        assert_eq!(report.total_units(), Some(3));
        let allocation = report.allocation().unwrap();
        assert_eq!(
            allocation.row(LocationIndex::new(0), MaterialIndex::new(0)),
            &[1, 1, 1]
        );
    }

    #[test]
    fn test_shared_pool_conflict_is_infeasible() {
        let model = single_material_model(&[1, 4], &[5, 3], &[3, 2]);
        let report = SolverBuilder::new().build().solve(&model).unwrap();
        assert_eq!(report.status(), ReportStatus::Infeasible);
        assert!(report.allocation().is_none());
        assert_eq!(
            report.infeasible_materials()[0].cause,
            InfeasibilityCause::SearchExhausted
        );
        // The totals alone look sufficient.
        assert!(report.capacity_analysis()[0].is_sufficient());
    }

    #[test]
    fn test_global_insufficiency_reports_negative_difference() {
        let model = single_material_model(&[1, 4], &[10, 10], &[2, 3]);
        let report = SolverBuilder::new().build().solve(&model).unwrap();
        assert_eq!(report.status(), ReportStatus::Infeasible);
        assert_eq!(report.capacity_analysis()[0].difference, -6);
        assert_eq!(report.statistics(MaterialIndex::new(0)).nodes_explored, 0);
        assert!(report.to_string().contains("INSUFFICIENT"));
    }

    #[test]
    fn test_one_infeasible_material_hides_whole_allocation() {
        let mut builder = ModelBuilder::<IntegerType>::new();
        builder
            .add_locations(["Port", "Hub"])
            .add_materials(["Gold", "Lead"])
            .add_sizes([2, 8])
            .set_demand("Port", "Gold", 10)
            .set_demand("Hub", "Gold", 8)
            .set_demand("Port", "Lead", 3)
            .set_availability("Gold", 2, 5)
            .set_availability("Gold", 8, 1)
            .set_availability("Lead", 2, 10);
        let model = builder.build().unwrap();

        for solver in [
            SolverBuilder::new().build(),
            SolverBuilder::new().sequential().build(),
        ] {
            let report = solver.solve(&model).unwrap();
            assert_eq!(report.status(), ReportStatus::Infeasible);
            assert!(report.allocation().is_none());
            assert!(report.total_units().is_none());
            assert_eq!(report.infeasible_materials().len(), 1);
            assert_eq!(report.material_name(report.infeasible_materials()[0].material_index), "Lead");
        }
    }

    #[test]
    fn test_zero_demand_location_gets_zero_row() {
        let model = single_material_model(&[1, 2, 4], &[0, 6], &[1, 1, 1]);
        let report = SolverBuilder::new().build().solve(&model).unwrap();
        let allocation = report.allocation().unwrap();
        assert_eq!(
            allocation.row(LocationIndex::new(0), MaterialIndex::new(0)),
            &[0, 0, 0]
        );
        assert_eq!(report.total_units(), Some(2));
    }

    #[test]
    fn test_node_limit_gives_inconclusive() {
        let model = single_material_model(&[1, 2, 4], &[7, 6, 5], &[10, 10, 10]);
        let report = SolverBuilder::new()
            .with_node_limit(1)
            .build()
            .solve(&model)
            .unwrap();
        assert_eq!(report.status(), ReportStatus::Inconclusive);
        assert!(report.allocation().is_none());
        assert!(report.inconclusive_materials()[0].reason.contains("node limit"));
    }

    #[test]
    fn test_time_limit_holds_for_large_demands() {
        let model = single_material_model(
            &[32, 24, 16, 8, 4, 2, 1],
            &[1200, 400],
            &[1000, 1000, 1000, 1000, 1000, 1000, 1000],
        );
        let limit = Duration::from_millis(100);
        let started = std::time::Instant::now();
        let report = SolverBuilder::new()
            .with_time_limit(limit)
            .build()
            .solve(&model)
            .unwrap();
        assert!(started.elapsed() < limit * 20);
        assert_eq!(report.status(), ReportStatus::Solved);
        assert_eq!(report.total_units(), Some(38 + 13));
    }

    #[test]
    fn test_raised_interrupt_gives_inconclusive() {
        let flag = AtomicBool::new(true);
        let model = single_material_model(&[1, 2], &[3, 3], &[10, 10]);
        let report = SolverBuilder::new()
            .with_interrupt(&flag)
            .build()
            .solve(&model)
            .unwrap();
        assert_eq!(report.status(), ReportStatus::Inconclusive);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let model = single_material_model(&[1], &[1], &[1]);
        let err = SolverBuilder::new()
            .with_sieve_limit(0)
            .build()
            .solve(&model)
            .unwrap_err();
        assert!(matches!(
            err,
            SolveError::Configuration(SolverConfigError::ZeroSieveLimit)
        ));
    }

    #[test]
    fn test_from_json_config() {
        let config: SolverConfig = serde_json::from_str(
            r#"{"parallel": false, "location_order": "largest_demand_first", "node_limit": 100000}"#,
        )
        .unwrap();
        let solver = SolverBuilder::from_config(config).build();
        assert!(!solver.config().parallel);

        let model = single_material_model(&[5, 3, 1], &[9, 7, 4], &[2, 3, 6]);
        let report = solver.solve(&model).unwrap();
        let reference = SolverBuilder::new().build().solve(&model).unwrap();
        assert_eq!(report.status(), reference.status());
        assert_eq!(report.total_units(), reference.total_units());
    }

    #[test]
    fn test_sub_millisecond_time_limit_rounds_up() {
        let solver = SolverBuilder::new()
            .with_time_limit(Duration::from_micros(10))
            .build();
        assert_eq!(solver.config().time_limit_ms, Some(1));
    }

    #[test]
    fn test_decomposition_equivalence_and_idempotence() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..60 {
            let model = random_model(&mut rng);
            let parallel = SolverBuilder::new().build().solve(&model).unwrap();
            let sequential = SolverBuilder::new().sequential().build().solve(&model).unwrap();
            assert_eq!(parallel.status(), sequential.status());
            assert_eq!(parallel.allocation(), sequential.allocation());

            if let Some(allocation) = parallel.allocation() {
                assert_eq!(allocation.verify(&model), Ok(()));
            }

            // Each material solved in a model of its own must agree.
            for material_index in MaterialIndex::range(model.num_materials()) {
                let material = model.material_name(material_index);
                let mut builder = ModelBuilder::<IntegerType>::new();
                builder
                    .add_locations(model.location_names().iter().cloned())
                    .add_material(material)
                    .add_sizes(model.sizes().iter().copied());
                for location_index in LocationIndex::range(model.num_locations()) {
                    builder.set_demand(
                        model.location_name(location_index),
                        material,
                        model.demand(location_index, material_index),
                    );
                }
                for (size_index, &size) in model.sizes().iter().enumerate() {
                    builder.set_availability(
                        material,
                        size,
                        model.material_availabilities(material_index)[size_index],
                    );
                }
                let alone = SolverBuilder::new()
                    .build()
                    .solve(&builder.build().unwrap())
                    .unwrap();

                let joint_failed = parallel
                    .infeasible_materials()
                    .iter()
                    .any(|entry| entry.material_index == material_index);
                assert_eq!(joint_failed, alone.status() == ReportStatus::Infeasible);
                if parallel.is_solved() {
                    assert_eq!(
                        parallel.material_units(material_index),
                        alone.total_units()
                    );
                }
            }
        }
    }
}
