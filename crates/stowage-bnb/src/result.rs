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

//! Outcomes of a single-material search.
//!
//! `SolverResult` separates the three terminal statuses a subproblem can
//! reach. `Inconclusive` is never a proof: a plan attached to it is a
//! diagnostic snapshot of the incumbent at abort time and must not be
//! treated as an optimum.

use crate::stats::BnbSolverStatistics;
use stowage_core::num::SolverNumeric;
use stowage_model::index::{LocationIndex, MaterialIndex, SizeIndex};

/// The container counts chosen for one material, stored flat as
/// `[location][size]` in model order.
#[derive(Clone, PartialEq, Eq)]
pub struct MaterialPlan<T> {
    material_index: MaterialIndex,
    num_locations: usize,
    num_sizes: usize,
    counts: Vec<T>,
    total_units: T,
}

impl<T> MaterialPlan<T>
where
    T: SolverNumeric,
{
    /// Creates a plan from a flat `[location][size]` count table.
    pub fn new(
        material_index: MaterialIndex,
        num_locations: usize,
        num_sizes: usize,
        counts: Vec<T>,
    ) -> Self {
        debug_assert_eq!(
            counts.len(),
            num_locations * num_sizes,
            "called `MaterialPlan::new` with a count table of the wrong length"
        );
        let total_units = counts.iter().fold(T::zero(), |acc, &c| acc + c);
        Self {
            material_index,
            num_locations,
            num_sizes,
            counts,
            total_units,
        }
    }

    #[inline]
    pub fn material_index(&self) -> MaterialIndex {
        self.material_index
    }

    #[inline]
    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    #[inline]
    pub fn num_sizes(&self) -> usize {
        self.num_sizes
    }

    #[inline]
    pub fn count(&self, location_index: LocationIndex, size_index: SizeIndex) -> T {
        debug_assert!(location_index.get() < self.num_locations);
        debug_assert!(size_index.get() < self.num_sizes);
        self.counts[location_index.get() * self.num_sizes + size_index.get()]
    }

    /// The size vector assigned to one location.
    #[inline]
    pub fn row(&self, location_index: LocationIndex) -> &[T] {
        let start = location_index.get() * self.num_sizes;
        &self.counts[start..start + self.num_sizes]
    }

    /// Containers of one size used over all locations.
    pub fn used(&self, size_index: SizeIndex) -> T {
        LocationIndex::range(self.num_locations)
            .fold(T::zero(), |acc, l| acc + self.count(l, size_index))
    }

    /// Total number of containers in the plan.
    #[inline]
    pub fn total_units(&self) -> T {
        self.total_units
    }

    /// Checks exact cover and capacity against the given sizes, demands and
    /// availabilities (all in model order). Returns a description of the first
    /// violation.
    pub fn check(&self, sizes: &[T], demands: &[T], availabilities: &[T]) -> Result<(), String> {
        if sizes.len() != self.num_sizes
            || availabilities.len() != self.num_sizes
            || demands.len() != self.num_locations
        {
            return Err(format!(
                "plan shape {} x {} does not match the subproblem",
                self.num_locations, self.num_sizes
            ));
        }
        for l in LocationIndex::range(self.num_locations) {
            let row = self.row(l);
            if let Some(negative) = row.iter().find(|c| **c < T::zero()) {
                return Err(format!("negative count {} at {}", negative, l));
            }
            let covered = row
                .iter()
                .zip(sizes)
                .fold(T::zero(), |acc, (&c, &s)| acc + c * s);
            if covered != demands[l.get()] {
                return Err(format!(
                    "{} covers {} SCU instead of {}",
                    l,
                    covered,
                    demands[l.get()]
                ));
            }
        }
        for s in SizeIndex::range(self.num_sizes) {
            let used = self.used(s);
            if used > availabilities[s.get()] {
                return Err(format!(
                    "{} uses {} containers of {} available",
                    s,
                    used,
                    availabilities[s.get()]
                ));
            }
        }
        Ok(())
    }
}

impl<T> std::fmt::Debug for MaterialPlan<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterialPlan")
            .field("material_index", &self.material_index)
            .field("total_units", &self.total_units)
            .field("counts", &self.counts)
            .finish()
    }
}

impl<T> std::fmt::Display for MaterialPlan<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MaterialPlan({}, units: {})",
            self.material_index, self.total_units
        )
    }
}

/// Why a subproblem has no feasible allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfeasibilityCause<T> {
    /// No combination of the available container sizes sums to the demand of
    /// this location, regardless of quantity.
    Unrepresentable {
        location_index: LocationIndex,
        demand: T,
    },
    /// Total demand exceeds the total SCU of the pool.
    InsufficientCapacity { required: T, available: T },
    /// Every branch of the search was exhausted without an exact cover that
    /// respects the pool.
    SearchExhausted,
}

impl<T> std::fmt::Display for InfeasibilityCause<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InfeasibilityCause::Unrepresentable {
                location_index,
                demand,
            } => write!(
                f,
                "demand {} at {} is not a combination of the available sizes",
                demand, location_index
            ),
            InfeasibilityCause::InsufficientCapacity {
                required,
                available,
            } => write!(
                f,
                "required {} SCU exceeds available {} SCU",
                required, available
            ),
            InfeasibilityCause::SearchExhausted => {
                write!(f, "no allocation fits the available containers")
            }
        }
    }
}

/// The terminal status of one subproblem search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult<T>
where
    T: SolverNumeric,
{
    /// A proven minimum-unit allocation.
    Optimal(MaterialPlan<T>),
    /// A proof that no allocation exists.
    Infeasible(InfeasibilityCause<T>),
    /// The budget ran out before a proof was reached.
    Inconclusive { best_known: Option<MaterialPlan<T>> },
}

impl<T> SolverResult<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolverResult::Optimal(_))
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self, SolverResult::Infeasible(_))
    }

    #[inline]
    pub fn is_inconclusive(&self) -> bool {
        matches!(self, SolverResult::Inconclusive { .. })
    }

    /// Returns the plan only if optimality was proven.
    #[inline]
    pub fn optimal_plan(&self) -> Option<&MaterialPlan<T>> {
        match self {
            SolverResult::Optimal(plan) => Some(plan),
            _ => None,
        }
    }

    /// Returns the optimal plan.
    ///
    /// # Panics
    ///
    /// Panics if the result is not `Optimal`.
    #[inline]
    pub fn unwrap_optimal(self) -> MaterialPlan<T> {
        match self {
            SolverResult::Optimal(plan) => plan,
            other => panic!(
                "called `SolverResult::unwrap_optimal()` on a non-optimal result: {}",
                other
            ),
        }
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Optimal(plan) => write!(f, "Optimal(units: {})", plan.total_units()),
            SolverResult::Infeasible(cause) => write!(f, "Infeasible({})", cause),
            SolverResult::Inconclusive { best_known } => match best_known {
                Some(plan) => write!(f, "Inconclusive(best known units: {})", plan.total_units()),
                None => write!(f, "Inconclusive"),
            },
        }
    }
}

/// Why the search stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    OptimalityProven,
    InfeasibilityProven,
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "OptimalityProven"),
            TerminationReason::InfeasibilityProven => write!(f, "InfeasibilityProven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted({})", reason),
        }
    }
}

/// Result of the solver after termination.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome<T>
where
    T: SolverNumeric,
{
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: BnbSolverStatistics,
}

impl<T> BnbSolverOutcome<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn optimal(plan: MaterialPlan<T>, statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Optimal(plan),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    #[inline]
    pub fn infeasible(cause: InfeasibilityCause<T>, statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Infeasible(cause),
            termination_reason: TerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    /// A budget or cancellation abort. `best_known` is kept for diagnostics only.
    #[inline]
    pub fn inconclusive<R>(
        best_known: Option<MaterialPlan<T>>,
        reason: R,
        statistics: BnbSolverStatistics,
    ) -> Self
    where
        R: Into<String>,
    {
        Self {
            result: SolverResult::Inconclusive { best_known },
            termination_reason: TerminationReason::Aborted(reason.into()),
            statistics,
        }
    }

    /// Returns the solver result.
    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    /// Consumes the outcome and returns the solver result.
    #[inline]
    pub fn into_result(self) -> SolverResult<T> {
        self.result
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns the solver statistics.
    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }
}

impl<T> std::fmt::Display for BnbSolverOutcome<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BnbSolverOutcome(result: {}, reason: {})",
            self.result, self.termination_reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn plan() -> MaterialPlan<IntegerType> {
        // Sizes [1, 4]; L0 gets 1x1 + 1x4, L1 gets 3x1.
        MaterialPlan::new(MaterialIndex::new(0), 2, 2, vec![1, 1, 3, 0])
    }

    #[test]
    fn test_plan_accessors() {
        let plan = plan();
        assert_eq!(plan.total_units(), 5);
        assert_eq!(plan.row(LocationIndex::new(1)), &[3, 0]);
        assert_eq!(plan.used(SizeIndex::new(0)), 4);
        assert_eq!(plan.count(LocationIndex::new(0), SizeIndex::new(1)), 1);
    }

    #[test]
    fn test_plan_check() {
        let plan = plan();
        assert_eq!(plan.check(&[1, 4], &[5, 3], &[4, 1]), Ok(()));
        assert!(plan.check(&[1, 4], &[5, 4], &[4, 1]).is_err());
        assert!(plan.check(&[1, 4], &[5, 3], &[3, 1]).is_err());
        assert!(plan.check(&[1, 4, 8], &[5, 3], &[4, 1]).is_err());
    }

    #[test]
    fn test_inconclusive_is_not_optimal() {
        let outcome = BnbSolverOutcome::inconclusive(
            Some(plan()),
            "node limit reached",
            BnbSolverStatistics::default(),
        );
        assert!(outcome.result().is_inconclusive());
        assert!(outcome.result().optimal_plan().is_none());
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::Aborted("node limit reached".to_string())
        );
    }

    #[test]
    fn test_infeasible_outcome() {
        let outcome = BnbSolverOutcome::<IntegerType>::infeasible(
            InfeasibilityCause::InsufficientCapacity {
                required: 10,
                available: 4,
            },
            BnbSolverStatistics::default(),
        );
        assert!(outcome.result().is_infeasible());
        assert_eq!(
            outcome.result().to_string(),
            "Infeasible(required 10 SCU exceeds available 4 SCU)"
        );
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::InfeasibilityProven
        );
    }

    #[test]
    #[should_panic(expected = "non-optimal result")]
    fn test_unwrap_optimal_panics_on_infeasible() {
        let result =
            SolverResult::<IntegerType>::Infeasible(InfeasibilityCause::SearchExhausted);
        let _ = result.unwrap_optimal();
    }
}
