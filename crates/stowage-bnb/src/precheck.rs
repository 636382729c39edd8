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

//! Fast rejection and admissible bounds, computed once before search.
//!
//! Two checks run before the tree is touched:
//! - **Representability**: every location's demand must be a non-negative
//!   integer combination of the sizes that have any availability at all,
//!   ignoring how many units exist. An unbounded coin-change table up to the
//!   largest demand answers this exactly and also yields the minimum number
//!   of containers per demand, which is an admissible lower bound for that
//!   location. Past the sieve limit the table is replaced by the gcd
//!   necessary condition and a `ceil(d / s_max)` bound.
//! - **Global capacity**: `Σ demand ≤ Σ availability × size`.

use crate::result::InfeasibilityCause;
use stowage_core::num::{SolverNumeric, ceil_div, gcd};
use stowage_model::{index::LocationIndex, subproblem::MaterialSubproblem};

/// Largest demand for which the exact coin-change table is built.
pub const DEFAULT_SIEVE_LIMIT: usize = 1 << 20;

/// Minimum number of containers needed to represent each amount in
/// `0..=max_amount` with unlimited containers of `sizes`, `None` where the
/// amount is unreachable.
///
/// ```rust
/// # use stowage_bnb::precheck::min_units_table;
/// let table = min_units_table(&[4i64, 2], 7);
/// assert_eq!(table[6], Some(2));
/// assert_eq!(table[7], None);
/// ```
pub fn min_units_table<T>(sizes: &[T], max_amount: usize) -> Vec<Option<T>>
where
    T: SolverNumeric,
{
    let steps: Vec<usize> = sizes
        .iter()
        .filter_map(|s| s.to_usize())
        .filter(|&s| s > 0 && s <= max_amount)
        .collect();

    let mut table: Vec<Option<T>> = vec![None; max_amount + 1];
    table[0] = Some(T::zero());
    for amount in 1..=max_amount {
        let mut best: Option<T> = None;
        for &step in &steps {
            if step > amount {
                continue;
            }
            if let Some(prev) = table[amount - step] {
                let candidate = prev + T::one();
                if best.is_none_or(|b| candidate < b) {
                    best = Some(candidate);
                }
            }
        }
        table[amount] = best;
    }
    table
}

/// How a demand was certified as representable.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Representability<T> {
    Table(Vec<Option<T>>),
    Gcd { divisor: T, largest: T },
}

impl<T> Representability<T>
where
    T: SolverNumeric,
{
    fn build(usable_sizes: &[T], max_demand: T, sieve_limit: usize) -> Self {
        match max_demand.to_usize() {
            Some(max) if max <= sieve_limit => Self::Table(min_units_table(usable_sizes, max)),
            _ => Self::Gcd {
                divisor: usable_sizes
                    .iter()
                    .fold(T::zero(), |acc, &s| gcd(acc, s)),
                largest: usable_sizes.iter().copied().max().unwrap_or_else(T::zero),
            },
        }
    }

    /// Minimum number of units for `demand`, `None` if it is provably
    /// unrepresentable.
    fn min_units(&self, demand: T) -> Option<T> {
        if demand.is_zero() {
            return Some(T::zero());
        }
        match self {
            Self::Table(table) => demand.to_usize().and_then(|d| table.get(d).copied().flatten()),
            Self::Gcd { divisor, largest } => {
                if divisor.is_zero() || !(demand % *divisor).is_zero() {
                    None
                } else {
                    Some(ceil_div(demand, *largest))
                }
            }
        }
    }
}

/// Per-location admissible lower bounds on the number of containers,
/// indexed in model location order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowerBounds<T> {
    per_location: Vec<T>,
}

impl<T> LowerBounds<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn get(&self, location_index: LocationIndex) -> T {
        self.per_location[location_index.get()]
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.per_location
    }

    /// Sum over all locations: a lower bound for the whole subproblem.
    pub fn total(&self) -> T {
        self.per_location.iter().fold(T::zero(), |acc, &b| acc + b)
    }

    /// Suffix sums over the locations visited in `order`: entry `d` bounds
    /// the units still needed once the first `d` locations are assigned.
    /// The returned vector has `order.len() + 1` entries, the last being zero.
    pub fn suffix_sums(&self, order: &[LocationIndex]) -> Vec<T> {
        let mut sums = vec![T::zero(); order.len() + 1];
        for depth in (0..order.len()).rev() {
            sums[depth] = sums[depth + 1] + self.get(order[depth]);
        }
        sums
    }
}

/// Checks that every demand can be written with the usable sizes and
/// returns the per-location minimum unit counts.
pub fn check_representability<T>(
    subproblem: &MaterialSubproblem<T>,
    sieve_limit: usize,
) -> Result<LowerBounds<T>, InfeasibilityCause<T>>
where
    T: SolverNumeric,
{
    let usable_sizes: Vec<T> = subproblem
        .sizes()
        .iter()
        .zip(subproblem.availabilities())
        .filter(|(_, c)| **c > T::zero())
        .map(|(&s, _)| s)
        .collect();

    let representability =
        Representability::build(&usable_sizes, subproblem.max_demand(), sieve_limit);

    let mut per_location = Vec::with_capacity(subproblem.num_locations());
    for location_index in LocationIndex::range(subproblem.num_locations()) {
        let demand = subproblem.demand(location_index);
        match representability.min_units(demand) {
            Some(units) => per_location.push(units),
            None => {
                return Err(InfeasibilityCause::Unrepresentable {
                    location_index,
                    demand,
                });
            }
        }
    }
    Ok(LowerBounds { per_location })
}

/// Checks `Σ demand ≤ Σ availability × size`.
pub fn check_capacity<T>(subproblem: &MaterialSubproblem<T>) -> Result<(), InfeasibilityCause<T>>
where
    T: SolverNumeric,
{
    let required = subproblem.total_demand();
    let available = subproblem.total_capacity();
    if required > available {
        return Err(InfeasibilityCause::InsufficientCapacity {
            required,
            available,
        });
    }
    Ok(())
}

/// Runs both pre-checks in order and returns the lower bounds on success.
pub fn run_prechecks<T>(
    subproblem: &MaterialSubproblem<T>,
    sieve_limit: usize,
) -> Result<LowerBounds<T>, InfeasibilityCause<T>>
where
    T: SolverNumeric,
{
    let bounds = check_representability(subproblem, sieve_limit)?;
    check_capacity(subproblem)?;
    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn subproblem(
        sizes: Vec<IntegerType>,
        demands: Vec<IntegerType>,
        availabilities: Vec<IntegerType>,
    ) -> MaterialSubproblem<IntegerType> {
        MaterialSubproblem::from_parts("M", sizes, demands, availabilities)
    }

    #[test]
    fn test_min_units_table_matches_greedy_on_canonical_sizes() {
        let table = min_units_table(&[1i64, 2, 4], 9);
        let expected = [0, 1, 1, 2, 1, 2, 2, 3, 2, 3];
        for (amount, units) in expected.iter().enumerate() {
            assert_eq!(table[amount], Some(*units), "amount {}", amount);
        }
    }

    #[test]
    fn test_min_units_table_non_canonical_sizes() {
        // Greedy would pick 4 + 1 + 1; the optimum is 3 + 3.
        let table = min_units_table(&[4i64, 3, 1], 6);
        assert_eq!(table[6], Some(2));
        let table = min_units_table(&[5i64, 3], 7);
        assert_eq!(table[7], None);
        assert_eq!(table[6], Some(2));
    }

    #[test]
    fn test_representability_ignores_unavailable_sizes() {
        let sp = subproblem(vec![4, 1], vec![3], vec![5, 0]);
        assert_eq!(
            check_representability(&sp, DEFAULT_SIEVE_LIMIT),
            Err(InfeasibilityCause::Unrepresentable {
                location_index: LocationIndex::new(0),
                demand: 3
            })
        );
    }

    #[test]
    fn test_representability_bounds() {
        let sp = subproblem(vec![1, 2, 4], vec![7, 0, 8], vec![10, 10, 10]);
        let bounds = check_representability(&sp, DEFAULT_SIEVE_LIMIT).unwrap();
        assert_eq!(bounds.as_slice(), &[3, 0, 2]);
        assert_eq!(bounds.total(), 5);

        let order = [LocationIndex::new(2), LocationIndex::new(0), LocationIndex::new(1)];
        assert_eq!(bounds.suffix_sums(&order), vec![5, 3, 0, 0]);
    }

    #[test]
    fn test_gcd_fallback_above_sieve_limit() {
        let sp = subproblem(vec![4, 6], vec![20, 30], vec![100, 100]);
        let bounds = check_representability(&sp, 8).unwrap();
        assert_eq!(bounds.as_slice(), &[4, 5]);

        let sp = subproblem(vec![4, 6], vec![21], vec![100, 100]);
        assert!(matches!(
            check_representability(&sp, 8),
            Err(InfeasibilityCause::Unrepresentable { demand: 21, .. })
        ));
    }

    #[test]
    fn test_no_available_size_rejects_positive_demand() {
        let sp = subproblem(vec![1, 2], vec![0, 1], vec![0, 0]);
        assert!(matches!(
            check_representability(&sp, DEFAULT_SIEVE_LIMIT),
            Err(InfeasibilityCause::Unrepresentable { demand: 1, .. })
        ));
        let sp = subproblem(vec![1, 2], vec![0, 0], vec![0, 0]);
        assert!(run_prechecks(&sp, DEFAULT_SIEVE_LIMIT).is_ok());
    }

    #[test]
    fn test_capacity_check() {
        let sp = subproblem(vec![1, 4], vec![10, 10], vec![2, 3]);
        assert_eq!(
            check_capacity(&sp),
            Err(InfeasibilityCause::InsufficientCapacity {
                required: 20,
                available: 14
            })
        );
        let sp = subproblem(vec![1, 4], vec![10, 4], vec![2, 3]);
        assert_eq!(check_capacity(&sp), Ok(()));
    }
}
