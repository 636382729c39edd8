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

//! Aggregation of per-material outcomes into one report.
//!
//! The report status is the worst status across materials, with
//! `Infeasible` above `Inconclusive` above `Solved`. An allocation table is
//! only exposed when every material was solved to proven optimality; in every
//! other case the report carries the capacity analysis and the list of
//! materials that failed, and nothing that could be mistaken for a plan.

use crate::error::ReportError;
use std::time::Duration;
use stowage_bnb::{
    result::{BnbSolverOutcome, InfeasibilityCause, MaterialPlan, SolverResult, TerminationReason},
    stats::BnbSolverStatistics,
};
use stowage_core::num::SolverNumeric;
use stowage_model::{
    allocation::Allocation,
    index::{LocationIndex, MaterialIndex, SizeIndex},
    model::Model,
};
use tracing::warn;

/// The overall verdict of a solve. Ordered by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReportStatus {
    Solved,
    Inconclusive,
    Infeasible,
}

impl ReportStatus {
    fn of<T>(result: &SolverResult<T>) -> Self
    where
        T: SolverNumeric,
    {
        match result {
            SolverResult::Optimal(_) => ReportStatus::Solved,
            SolverResult::Inconclusive { .. } => ReportStatus::Inconclusive,
            SolverResult::Infeasible(_) => ReportStatus::Infeasible,
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Solved => write!(f, "solved"),
            ReportStatus::Inconclusive => write!(f, "inconclusive"),
            ReportStatus::Infeasible => write!(f, "infeasible"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UtilizationFlag {
    /// Every available container is used.
    Full,
    /// Containers exist but none is used.
    Unused,
    Partial,
    /// No containers of this size exist for the material.
    Unavailable,
}

impl std::fmt::Display for UtilizationFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UtilizationFlag::Full => write!(f, "FULL"),
            UtilizationFlag::Unused => write!(f, "UNUSED"),
            UtilizationFlag::Partial => write!(f, "PARTIAL"),
            UtilizationFlag::Unavailable => write!(f, "UNAVAILABLE"),
        }
    }
}

/// Pool usage of one (material, size) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeUtilization<T> {
    pub material_index: MaterialIndex,
    pub size_index: SizeIndex,
    pub size: T,
    pub available: T,
    pub used: T,
    pub remaining: T,
    /// `used / available` in percent, `0.0` when nothing is available.
    pub percentage: f64,
    pub flag: UtilizationFlag,
}

impl<T> SizeUtilization<T>
where
    T: SolverNumeric,
{
    fn new(
        material_index: MaterialIndex,
        size_index: SizeIndex,
        size: T,
        available: T,
        used: T,
    ) -> Self {
        let flag = if available.is_zero() {
            UtilizationFlag::Unavailable
        } else if used == available {
            UtilizationFlag::Full
        } else if used.is_zero() {
            UtilizationFlag::Unused
        } else {
            UtilizationFlag::Partial
        };
        let percentage = match (used.to_f64(), available.to_f64()) {
            (Some(u), Some(a)) if a > 0.0 => u / a * 100.0,
            _ => 0.0,
        };
        Self {
            material_index,
            size_index,
            size,
            available,
            used,
            remaining: available - used,
            percentage,
            flag,
        }
    }
}

/// Containers used by one material, summed over all locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialUsage<T> {
    pub material_index: MaterialIndex,
    /// Indexed by `SizeIndex`.
    pub units_per_size: Vec<T>,
    pub total_units: T,
    pub total_scu: T,
}

/// Required against available SCU for one material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityAnalysis<T> {
    pub material_index: MaterialIndex,
    pub required: T,
    pub available: T,
    /// `available - required`; negative when the pool is too small.
    pub difference: T,
}

impl<T> CapacityAnalysis<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn is_sufficient(&self) -> bool {
        self.difference >= T::zero()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfeasibleMaterial<T> {
    pub material_index: MaterialIndex,
    pub cause: InfeasibilityCause<T>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InconclusiveMaterial<T> {
    pub material_index: MaterialIndex,
    pub reason: String,
    /// Units of the incumbent at abort time. Not a proven optimum.
    pub best_known_units: Option<T>,
}

/// Input conditions worth flagging that do not change the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputWarning {
    AllDemandZero,
    NoContainersAvailable,
}

impl std::fmt::Display for InputWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputWarning::AllDemandZero => write!(f, "every demand is zero"),
            InputWarning::NoContainersAvailable => {
                write!(f, "no containers are available for any material")
            }
        }
    }
}

/// The combined result of solving every material of a model.
#[derive(Debug, Clone)]
pub struct AllocationReport<T: SolverNumeric> {
    status: ReportStatus,
    location_names: Vec<String>,
    material_names: Vec<String>,
    sizes: Vec<T>,
    allocation: Option<Allocation<T>>,
    material_usage: Vec<MaterialUsage<T>>,
    utilization: Vec<SizeUtilization<T>>,
    capacity_analysis: Vec<CapacityAnalysis<T>>,
    infeasible: Vec<InfeasibleMaterial<T>>,
    inconclusive: Vec<InconclusiveMaterial<T>>,
    warnings: Vec<InputWarning>,
    statistics: Vec<BnbSolverStatistics>,
    solve_duration: Duration,
}

impl<T> AllocationReport<T>
where
    T: SolverNumeric,
{
    /// Merges one outcome per material, given in material order.
    ///
    /// # Errors
    ///
    /// Returns `OutcomeCountMismatch` if the number of outcomes differs from
    /// the number of materials, or `Verification` with the first violation
    /// found when the assembled allocation is checked against `model`.
    pub fn aggregate(
        model: &Model<T>,
        outcomes: Vec<BnbSolverOutcome<T>>,
        solve_duration: Duration,
    ) -> Result<Self, ReportError> {
        let num_materials = model.num_materials();
        if outcomes.len() != num_materials {
            return Err(ReportError::OutcomeCountMismatch {
                expected: num_materials,
                found: outcomes.len(),
            });
        }

        let mut status = ReportStatus::Solved;
        let mut plans: Vec<Option<MaterialPlan<T>>> = Vec::with_capacity(num_materials);
        let mut infeasible = Vec::new();
        let mut inconclusive = Vec::new();
        let mut statistics = Vec::with_capacity(num_materials);

        for (material_index, outcome) in MaterialIndex::range(num_materials).zip(outcomes) {
            status = status.max(ReportStatus::of(outcome.result()));
            statistics.push(outcome.statistics().clone());
            let reason = match outcome.termination_reason() {
                TerminationReason::Aborted(reason) => reason.clone(),
                other => other.to_string(),
            };

            match outcome.into_result() {
                SolverResult::Optimal(plan) => plans.push(Some(plan)),
                SolverResult::Infeasible(cause) => {
                    infeasible.push(InfeasibleMaterial {
                        material_index,
                        cause,
                    });
                    plans.push(None);
                }
                SolverResult::Inconclusive { best_known } => {
                    inconclusive.push(InconclusiveMaterial {
                        material_index,
                        reason,
                        best_known_units: best_known.map(|plan| plan.total_units()),
                    });
                    plans.push(None);
                }
            }
        }

        let capacity_analysis = MaterialIndex::range(num_materials)
            .map(|material_index| {
                let required = model.total_demand(material_index);
                let available = model.total_capacity(material_index);
                CapacityAnalysis {
                    material_index,
                    required,
                    available,
                    difference: available - required,
                }
            })
            .collect();

        let mut report = Self {
            status,
            location_names: model.location_names().to_vec(),
            material_names: model.material_names().to_vec(),
            sizes: model.sizes().to_vec(),
            allocation: None,
            material_usage: Vec::new(),
            utilization: Vec::new(),
            capacity_analysis,
            infeasible,
            inconclusive,
            warnings: input_warnings(model),
            statistics,
            solve_duration,
        };

        if status == ReportStatus::Solved {
            let allocation = Allocation::from_fn(
                model.num_locations(),
                num_materials,
                model.num_sizes(),
                |l, m, s| {
                    plans[m.get()]
                        .as_ref()
                        .map_or_else(T::zero, |plan| plan.count(l, s))
                },
            );
            allocation.verify(model)?;
            report.fill_usage(model, &allocation);
            report.allocation = Some(allocation);
        }

        Ok(report)
    }

    fn fill_usage(&mut self, model: &Model<T>, allocation: &Allocation<T>) {
        for material_index in MaterialIndex::range(model.num_materials()) {
            let mut units_per_size = Vec::with_capacity(model.num_sizes());
            let mut total_units = T::zero();
            let mut total_scu = T::zero();
            for size_index in SizeIndex::range(model.num_sizes()) {
                let used = allocation.used(material_index, size_index);
                let size = model.size_value(size_index);
                units_per_size.push(used);
                total_units = total_units + used;
                total_scu = total_scu + used * size;
                self.utilization.push(SizeUtilization::new(
                    material_index,
                    size_index,
                    size,
                    model.availability(material_index, size_index),
                    used,
                ));
            }
            self.material_usage.push(MaterialUsage {
                material_index,
                units_per_size,
                total_units,
                total_scu,
            });
        }
    }

    #[inline]
    pub fn status(&self) -> ReportStatus {
        self.status
    }

    #[inline]
    pub fn is_solved(&self) -> bool {
        self.status == ReportStatus::Solved
    }

    /// The full allocation table, only when every material is solved.
    #[inline]
    pub fn allocation(&self) -> Option<&Allocation<T>> {
        self.allocation.as_ref()
    }

    /// Total containers over all materials, only when solved.
    #[inline]
    pub fn total_units(&self) -> Option<T> {
        self.allocation.as_ref().map(|a| a.total_units())
    }

    /// Containers used by one material, only when solved.
    #[inline]
    pub fn material_units(&self, material_index: MaterialIndex) -> Option<T> {
        self.material_usage
            .get(material_index.get())
            .map(|usage| usage.total_units)
    }

    /// Per-material usage, empty unless solved.
    #[inline]
    pub fn material_usage(&self) -> &[MaterialUsage<T>] {
        &self.material_usage
    }

    /// Per (material, size) utilization in `[material][size]` order, empty
    /// unless solved.
    #[inline]
    pub fn utilization(&self) -> &[SizeUtilization<T>] {
        &self.utilization
    }

    #[inline]
    pub fn capacity_analysis(&self) -> &[CapacityAnalysis<T>] {
        &self.capacity_analysis
    }

    #[inline]
    pub fn infeasible_materials(&self) -> &[InfeasibleMaterial<T>] {
        &self.infeasible
    }

    #[inline]
    pub fn inconclusive_materials(&self) -> &[InconclusiveMaterial<T>] {
        &self.inconclusive
    }

    #[inline]
    pub fn warnings(&self) -> &[InputWarning] {
        &self.warnings
    }

    /// Search statistics of one material.
    #[inline]
    pub fn statistics(&self, material_index: MaterialIndex) -> &BnbSolverStatistics {
        &self.statistics[material_index.get()]
    }

    #[inline]
    pub fn solve_duration(&self) -> Duration {
        self.solve_duration
    }

    #[inline]
    pub fn material_name(&self, material_index: MaterialIndex) -> &str {
        &self.material_names[material_index.get()]
    }

    fn describe_cause(&self, cause: &InfeasibilityCause<T>) -> String {
        match cause {
            InfeasibilityCause::Unrepresentable {
                location_index,
                demand,
            } => format!(
                "demand of {} SCU at `{}` cannot be built from the available sizes",
                demand,
                self.location_names
                    .get(location_index.get())
                    .map_or("?", String::as_str)
            ),
            other => other.to_string(),
        }
    }

    fn name_width(&self) -> usize {
        self.location_names
            .iter()
            .chain(&self.material_names)
            .map(|name| name.chars().count())
            .chain(std::iter::once("Location".len()))
            .max()
            .unwrap_or(0)
            + 2
    }

    fn fmt_solved(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(allocation) = &self.allocation else {
            return Ok(());
        };
        let w = self.name_width();

        writeln!(f, "OPTIMAL ALLOCATION FOUND")?;
        writeln!(f, "{}", "=".repeat(60))?;
        write!(f, "{:<w$}{:<w$}", "Location", "Material")?;
        for size in &self.sizes {
            write!(f, "{:<10}", format!("{}×SCU", size))?;
        }
        writeln!(f, "Total SCU")?;

        for l in LocationIndex::range(self.location_names.len()) {
            for m in MaterialIndex::range(self.material_names.len()) {
                write!(
                    f,
                    "{:<w$}{:<w$}",
                    self.location_names[l.get()],
                    self.material_names[m.get()]
                )?;
                for count in allocation.row(l, m) {
                    write!(f, "{:<10}", count_cell(*count))?;
                }
                writeln!(f, "{} SCU", allocation.covered(&self.sizes, l, m))?;
            }
        }

        writeln!(f)?;
        writeln!(f, "CONTAINER USAGE SUMMARY:")?;
        write!(f, "{:<w$}", "Material")?;
        for size in &self.sizes {
            write!(f, "{:<10}", format!("{}×SCU", size))?;
        }
        writeln!(f, "Total Containers")?;
        for usage in self.material_usage.iter().filter(|u| !u.total_units.is_zero()) {
            write!(f, "{:<w$}", self.material_name(usage.material_index))?;
            for count in &usage.units_per_size {
                write!(f, "{:<10}", count_cell(*count))?;
            }
            writeln!(f, "{}×", usage.total_units)?;
        }

        writeln!(f)?;
        writeln!(f, "SUMMARY:")?;
        writeln!(f, "  Total containers allocated: {}", allocation.total_units())?;
        writeln!(f, "  Optimization status: OPTIMAL")?;

        writeln!(f)?;
        writeln!(f, "CONTAINER UTILIZATION:")?;
        writeln!(
            f,
            "{:<w$}{:<10}{:<11}{:<8}{:<11}Usage %",
            "Material", "Size", "Available", "Used", "Remaining"
        )?;
        for row in self
            .utilization
            .iter()
            .filter(|u| u.flag != UtilizationFlag::Unavailable)
        {
            let usage = match row.flag {
                UtilizationFlag::Full | UtilizationFlag::Unused => {
                    format!("{:.0}% ({})", row.percentage, row.flag)
                }
                _ => format!("{:.0}%", row.percentage),
            };
            writeln!(
                f,
                "{:<w$}{:<10}{:<11}{:<8}{:<11}{}",
                self.material_name(row.material_index),
                format!("{}×SCU", row.size),
                format!("{}×", row.available),
                format!("{}×", row.used),
                format!("{}×", row.remaining),
                usage
            )?;
        }
        Ok(())
    }

    fn fmt_capacity_analysis(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let w = self.name_width();
        writeln!(f, "CAPACITY ANALYSIS:")?;
        writeln!(
            f,
            "{:<w$}{:<14}{:<14}{:<14}Status",
            "Material", "Required", "Available", "Difference"
        )?;
        for row in &self.capacity_analysis {
            let (difference, verdict) = if row.is_sufficient() {
                (format!("+{} SCU", row.difference), "SUFFICIENT")
            } else {
                (format!("{} SCU", row.difference), "INSUFFICIENT")
            };
            writeln!(
                f,
                "{:<w$}{:<14}{:<14}{:<14}{}",
                self.material_name(row.material_index),
                format!("{} SCU", row.required),
                format!("{} SCU", row.available),
                difference,
                verdict
            )?;
        }
        Ok(())
    }

    fn fmt_infeasible(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "NO FEASIBLE SOLUTION FOUND")?;
        writeln!(f, "{}", "=".repeat(40))?;
        writeln!(f, "Infeasible materials:")?;
        for entry in &self.infeasible {
            writeln!(
                f,
                "  {}: {}",
                self.material_name(entry.material_index),
                self.describe_cause(&entry.cause)
            )?;
        }
        if !self.inconclusive.is_empty() {
            self.fmt_inconclusive_list(f)?;
        }
        writeln!(f)?;
        self.fmt_capacity_analysis(f)
    }

    fn fmt_inconclusive_list(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Inconclusive materials:")?;
        for entry in &self.inconclusive {
            write!(
                f,
                "  {}: {}",
                self.material_name(entry.material_index),
                entry.reason
            )?;
            match entry.best_known_units {
                Some(units) => writeln!(f, " (best known: {} containers, not proven)", units)?,
                None => writeln!(f)?,
            }
        }
        Ok(())
    }

    fn fmt_inconclusive(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SEARCH INCONCLUSIVE")?;
        writeln!(f, "{}", "=".repeat(40))?;
        self.fmt_inconclusive_list(f)?;
        writeln!(f)?;
        self.fmt_capacity_analysis(f)
    }
}

impl<T> std::fmt::Display for AllocationReport<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for warning in &self.warnings {
            writeln!(f, "Warning: {}", warning)?;
        }
        match self.status {
            ReportStatus::Solved => self.fmt_solved(f),
            ReportStatus::Infeasible => self.fmt_infeasible(f),
            ReportStatus::Inconclusive => self.fmt_inconclusive(f),
        }
    }
}

fn count_cell<T>(count: T) -> String
where
    T: SolverNumeric,
{
    if count.is_zero() {
        "-".to_string()
    } else {
        format!("{}×", count)
    }
}

fn input_warnings<T>(model: &Model<T>) -> Vec<InputWarning>
where
    T: SolverNumeric,
{
    let mut warnings = Vec::new();
    let materials = || MaterialIndex::range(model.num_materials());

    if materials().all(|m| model.total_demand(m).is_zero()) {
        warn!("every demand is zero");
        warnings.push(InputWarning::AllDemandZero);
    }
    if materials().all(|m| model.material_availabilities(m).iter().all(|c| c.is_zero())) {
        warn!("no containers are available for any material");
        warnings.push(InputWarning::NoContainersAvailable);
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_model::{allocation::AllocationViolation, model::ModelBuilder};

    type IntegerType = i64;

    fn build_model() -> Model<IntegerType> {
        let mut builder = ModelBuilder::<IntegerType>::new();
        builder
            .add_locations(["North", "South"])
            .add_materials(["Copper", "Iron"])
            .add_sizes([1, 2, 4]);
        builder
            .set_demand("North", "Copper", 7)
            .set_demand("South", "Copper", 4)
            .set_demand("North", "Iron", 2);
        builder
            .set_availability("Copper", 1, 2)
            .set_availability("Copper", 2, 1)
            .set_availability("Copper", 4, 2)
            .set_availability("Iron", 2, 1)
            .set_availability("Iron", 4, 3);
        builder.build().unwrap()
    }

    fn plan(material: usize, counts: Vec<IntegerType>) -> MaterialPlan<IntegerType> {
        MaterialPlan::new(MaterialIndex::new(material), 2, 3, counts)
    }

    fn solved_outcomes() -> Vec<BnbSolverOutcome<IntegerType>> {
        vec![
            BnbSolverOutcome::optimal(
                plan(0, vec![1, 1, 1, 0, 0, 1]),
                BnbSolverStatistics::default(),
            ),
            BnbSolverOutcome::optimal(
                plan(1, vec![0, 1, 0, 0, 0, 0]),
                BnbSolverStatistics::default(),
            ),
        ]
    }

    #[test]
    fn test_solved_report_exposes_allocation_and_utilization() {
        let model = build_model();
        let report =
            AllocationReport::aggregate(&model, solved_outcomes(), Duration::ZERO).unwrap();

        assert_eq!(report.status(), ReportStatus::Solved);
        assert_eq!(report.total_units(), Some(5));
        assert_eq!(report.material_units(MaterialIndex::new(0)), Some(4));
        assert_eq!(report.material_units(MaterialIndex::new(1)), Some(1));
        assert!(report.warnings().is_empty());

        let copper = &report.material_usage()[0];
        assert_eq!(copper.units_per_size, vec![1, 1, 2]);
        assert_eq!(copper.total_scu, 11);

        let flags: Vec<UtilizationFlag> = report.utilization().iter().map(|u| u.flag).collect();
        assert_eq!(
            flags,
            vec![
                UtilizationFlag::Partial,
                UtilizationFlag::Full,
                UtilizationFlag::Full,
                UtilizationFlag::Unavailable,
                UtilizationFlag::Full,
                UtilizationFlag::Unused,
            ]
        );
        assert_eq!(report.utilization()[0].percentage, 50.0);
        assert_eq!(report.utilization()[0].remaining, 1);
        assert_eq!(report.utilization()[3].percentage, 0.0);

        let text = report.to_string();
        assert!(text.starts_with("OPTIMAL ALLOCATION FOUND"));
        assert!(text.contains("Total containers allocated: 5"));
        assert!(text.contains("100% (FULL)"));
        assert!(text.contains("0% (UNUSED)"));
    }

    #[test]
    fn test_infeasible_takes_precedence_and_hides_allocation() {
        let model = build_model();
        let outcomes = vec![
            BnbSolverOutcome::inconclusive(
                Some(plan(0, vec![1, 1, 1, 0, 0, 1])),
                "node limit of 10 reached",
                BnbSolverStatistics::default(),
            ),
            BnbSolverOutcome::infeasible(
                InfeasibilityCause::SearchExhausted,
                BnbSolverStatistics::default(),
            ),
        ];
        let report = AllocationReport::aggregate(&model, outcomes, Duration::ZERO).unwrap();

        assert_eq!(report.status(), ReportStatus::Infeasible);
        assert!(report.allocation().is_none());
        assert!(report.total_units().is_none());
        assert!(report.utilization().is_empty());
        assert_eq!(report.infeasible_materials().len(), 1);
        assert_eq!(
            report.infeasible_materials()[0].material_index,
            MaterialIndex::new(1)
        );
        assert_eq!(
            report.inconclusive_materials()[0],
            InconclusiveMaterial {
                material_index: MaterialIndex::new(0),
                reason: "node limit of 10 reached".to_string(),
                best_known_units: Some(4),
            }
        );

        let text = report.to_string();
        assert!(text.starts_with("NO FEASIBLE SOLUTION FOUND"));
        assert!(text.contains("CAPACITY ANALYSIS:"));
        assert!(text.contains("not proven"));
    }

    #[test]
    fn test_inconclusive_beats_solved() {
        let model = build_model();
        let mut outcomes = solved_outcomes();
        outcomes[1] =
            BnbSolverOutcome::inconclusive(None, "time limit exceeded", BnbSolverStatistics::default());
        let report = AllocationReport::aggregate(&model, outcomes, Duration::ZERO).unwrap();
        assert_eq!(report.status(), ReportStatus::Inconclusive);
        assert!(report.allocation().is_none());
        assert!(report.to_string().starts_with("SEARCH INCONCLUSIVE"));
    }

    #[test]
    fn test_capacity_analysis_signs() {
        let mut builder = ModelBuilder::<IntegerType>::new();
        builder
            .add_location("Dock")
            .add_materials(["Cobalt", "Tin"])
            .add_sizes([1, 4])
            .set_demand("Dock", "Cobalt", 10)
            .set_demand("Dock", "Tin", 3)
            .set_availability("Cobalt", 4, 1)
            .set_availability("Tin", 1, 5);
        let model = builder.build().unwrap();

        let outcomes = vec![
            BnbSolverOutcome::infeasible(
                InfeasibilityCause::InsufficientCapacity {
                    required: 10,
                    available: 4,
                },
                BnbSolverStatistics::default(),
            ),
            BnbSolverOutcome::optimal(
                MaterialPlan::new(MaterialIndex::new(1), 1, 2, vec![3, 0]),
                BnbSolverStatistics::default(),
            ),
        ];
        let report = AllocationReport::aggregate(&model, outcomes, Duration::ZERO).unwrap();
        let analysis = report.capacity_analysis();
        assert_eq!(analysis[0].difference, -6);
        assert!(!analysis[0].is_sufficient());
        assert_eq!(analysis[1].difference, 2);
        assert!(analysis[1].is_sufficient());

        let text = report.to_string();
        assert!(text.contains("-6 SCU"));
        assert!(text.contains("+2 SCU"));
        assert!(text.contains("INSUFFICIENT"));
        assert!(text.contains("required 10 SCU exceeds available 4 SCU"));
    }

    #[test]
    fn test_unrepresentable_cause_names_location() {
        let model = build_model();
        let outcomes = vec![
            BnbSolverOutcome::infeasible(
                InfeasibilityCause::Unrepresentable {
                    location_index: LocationIndex::new(1),
                    demand: 3,
                },
                BnbSolverStatistics::default(),
            ),
            solved_outcomes().remove(1),
        ];
        let report = AllocationReport::aggregate(&model, outcomes, Duration::ZERO).unwrap();
        assert!(report.to_string().contains("at `South`"));
    }

    #[test]
    fn test_wrong_outcome_count_is_rejected() {
        let model = build_model();
        let mut outcomes = solved_outcomes();
        outcomes.pop();
        assert!(matches!(
            AllocationReport::aggregate(&model, outcomes, Duration::ZERO),
            Err(ReportError::OutcomeCountMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_plan_violating_demand_fails_verification() {
        let model = build_model();
        let mut outcomes = solved_outcomes();
        outcomes[1] = BnbSolverOutcome::optimal(
            plan(1, vec![0, 0, 1, 0, 0, 0]),
            BnbSolverStatistics::default(),
        );
        assert!(matches!(
            AllocationReport::aggregate(&model, outcomes, Duration::ZERO),
            Err(ReportError::Verification(
                AllocationViolation::DemandMismatch { .. }
            ))
        ));
    }

    #[test]
    fn test_zero_input_warnings() {
        let mut builder = ModelBuilder::<IntegerType>::new();
        builder.add_location("Dock").add_material("Tin").add_size(2);
        let model = builder.build().unwrap();
        let outcomes = vec![BnbSolverOutcome::optimal(
            MaterialPlan::new(MaterialIndex::new(0), 1, 1, vec![0]),
            BnbSolverStatistics::default(),
        )];
        let report = AllocationReport::aggregate(&model, outcomes, Duration::ZERO).unwrap();
        assert_eq!(
            report.warnings(),
            &[InputWarning::AllDemandZero, InputWarning::NoContainersAvailable]
        );
        assert!(report.is_solved());
        assert!(report.to_string().starts_with("Warning: every demand is zero"));
    }
}
