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
    index::{LocationIndex, MaterialIndex, SizeIndex},
    model::Model,
};
use stowage_core::num::SolverNumeric;
use thiserror::Error;

/// A constraint an `Allocation` fails to satisfy against a `Model`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationViolation {
    #[error(
        "allocation shape ({locations} x {materials} x {sizes}) does not match the model"
    )]
    ShapeMismatch {
        locations: usize,
        materials: usize,
        sizes: usize,
    },

    #[error("negative count {count} of size {size} for `{material}` at `{location}`")]
    NegativeCount {
        location: String,
        material: String,
        size: String,
        count: String,
    },

    #[error("`{material}` at `{location}` receives {covered} SCU but demands {demand}")]
    DemandMismatch {
        location: String,
        material: String,
        demand: String,
        covered: String,
    },

    #[error("`{material}` uses {used} containers of size {size} but only {available} exist")]
    CapacityExceeded {
        material: String,
        size: String,
        used: String,
        available: String,
    },
}

/// The number of containers of each size assigned to each (location, material)
/// pair, stored flat as `[location][material][size]`.
///
/// An `Allocation` is produced once and never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct Allocation<T> {
    num_locations: usize,
    num_materials: usize,
    num_sizes: usize,
    counts: Vec<T>,
}

impl<T> Allocation<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn flatten_index(
        &self,
        location_index: LocationIndex,
        material_index: MaterialIndex,
        size_index: SizeIndex,
    ) -> usize {
        (location_index.get() * self.num_materials + material_index.get()) * self.num_sizes
            + size_index.get()
    }

    /// Builds an allocation by evaluating `f` for every cell.
    pub fn from_fn<F>(num_locations: usize, num_materials: usize, num_sizes: usize, mut f: F) -> Self
    where
        F: FnMut(LocationIndex, MaterialIndex, SizeIndex) -> T,
    {
        let mut counts = Vec::with_capacity(num_locations * num_materials * num_sizes);
        for l in LocationIndex::range(num_locations) {
            for m in MaterialIndex::range(num_materials) {
                for s in SizeIndex::range(num_sizes) {
                    counts.push(f(l, m, s));
                }
            }
        }
        Self {
            num_locations,
            num_materials,
            num_sizes,
            counts,
        }
    }

    /// An all-zero allocation shaped like `model`.
    pub fn zeros(model: &Model<T>) -> Self {
        Self::from_fn(
            model.num_locations(),
            model.num_materials(),
            model.num_sizes(),
            |_, _, _| T::zero(),
        )
    }

    #[inline]
    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    #[inline]
    pub fn num_materials(&self) -> usize {
        self.num_materials
    }

    #[inline]
    pub fn num_sizes(&self) -> usize {
        self.num_sizes
    }

    /// Returns the number of containers of `size_index` assigned to
    /// `material_index` at `location_index`.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    #[inline]
    pub fn count(
        &self,
        location_index: LocationIndex,
        material_index: MaterialIndex,
        size_index: SizeIndex,
    ) -> T {
        debug_assert!(location_index.get() < self.num_locations);
        debug_assert!(material_index.get() < self.num_materials);
        debug_assert!(size_index.get() < self.num_sizes);
        self.counts[self.flatten_index(location_index, material_index, size_index)]
    }

    /// The size vector assigned to one (location, material) pair.
    #[inline]
    pub fn row(&self, location_index: LocationIndex, material_index: MaterialIndex) -> &[T] {
        let start = self.flatten_index(location_index, material_index, SizeIndex::new(0));
        &self.counts[start..start + self.num_sizes]
    }

    /// Total number of containers over every cell.
    pub fn total_units(&self) -> T {
        self.counts.iter().fold(T::zero(), |acc, &c| acc + c)
    }

    /// Total number of containers assigned for one material.
    pub fn units_for_material(&self, material_index: MaterialIndex) -> T {
        LocationIndex::range(self.num_locations)
            .flat_map(|l| self.row(l, material_index).iter().copied())
            .fold(T::zero(), |acc, c| acc + c)
    }

    /// Containers of one (material, size) used over all locations.
    pub fn used(&self, material_index: MaterialIndex, size_index: SizeIndex) -> T {
        LocationIndex::range(self.num_locations)
            .fold(T::zero(), |acc, l| acc + self.count(l, material_index, size_index))
    }

    /// SCU delivered to one (location, material) pair: `Σ count × size`.
    pub fn covered(
        &self,
        sizes: &[T],
        location_index: LocationIndex,
        material_index: MaterialIndex,
    ) -> T {
        self.row(location_index, material_index)
            .iter()
            .zip(sizes)
            .fold(T::zero(), |acc, (&c, &s)| acc + c * s)
    }

    /// Checks exact cover and capacity against `model`.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn verify(&self, model: &Model<T>) -> Result<(), AllocationViolation> {
        if self.num_locations != model.num_locations()
            || self.num_materials != model.num_materials()
            || self.num_sizes != model.num_sizes()
        {
            return Err(AllocationViolation::ShapeMismatch {
                locations: self.num_locations,
                materials: self.num_materials,
                sizes: self.num_sizes,
            });
        }

        for l in LocationIndex::range(self.num_locations) {
            for m in MaterialIndex::range(self.num_materials) {
                for s in SizeIndex::range(self.num_sizes) {
                    let count = self.count(l, m, s);
                    if count < T::zero() {
                        return Err(AllocationViolation::NegativeCount {
                            location: model.location_name(l).to_string(),
                            material: model.material_name(m).to_string(),
                            size: model.size_value(s).to_string(),
                            count: count.to_string(),
                        });
                    }
                }
                let covered = self.covered(model.sizes(), l, m);
                let demand = model.demand(l, m);
                if covered != demand {
                    return Err(AllocationViolation::DemandMismatch {
                        location: model.location_name(l).to_string(),
                        material: model.material_name(m).to_string(),
                        demand: demand.to_string(),
                        covered: covered.to_string(),
                    });
                }
            }
        }

        for m in MaterialIndex::range(self.num_materials) {
            for s in SizeIndex::range(self.num_sizes) {
                let used = self.used(m, s);
                let available = model.availability(m, s);
                if used > available {
                    return Err(AllocationViolation::CapacityExceeded {
                        material: model.material_name(m).to_string(),
                        size: model.size_value(s).to_string(),
                        used: used.to_string(),
                        available: available.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl<T> std::fmt::Debug for Allocation<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for l in LocationIndex::range(self.num_locations) {
            for m in MaterialIndex::range(self.num_materials) {
                list.entry(&(l.get(), m.get(), self.row(l, m)));
            }
        }
        list.finish()
    }
}

impl<T> std::fmt::Display for Allocation<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Allocation(locations: {}, materials: {}, sizes: {}, units: {})",
            self.num_locations,
            self.num_materials,
            self.num_sizes,
            self.total_units()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelBuilder;

    type IntegerType = i64;

    fn build_model() -> Model<IntegerType> {
        let mut builder = ModelBuilder::new();
        builder
            .add_locations(["A", "B"])
            .add_material("Ore")
            .add_sizes([4, 2, 1])
            .set_demand("A", "Ore", 7)
            .set_demand("B", "Ore", 4)
            .set_availability("Ore", 4, 2)
            .set_availability("Ore", 2, 1)
            .set_availability("Ore", 1, 1);
        builder.build().unwrap()
    }

    fn allocation_from_rows(rows: [[IntegerType; 3]; 2]) -> Allocation<IntegerType> {
        Allocation::from_fn(2, 1, 3, |l, _, s| rows[l.get()][s.get()])
    }

    #[test]
    fn test_accessors() {
        let alloc = allocation_from_rows([[1, 1, 1], [1, 0, 0]]);
        let ore = MaterialIndex::new(0);
        assert_eq!(alloc.count(LocationIndex::new(0), ore, SizeIndex::new(2)), 1);
        assert_eq!(alloc.row(LocationIndex::new(1), ore), &[1, 0, 0]);
        assert_eq!(alloc.total_units(), 4);
        assert_eq!(alloc.units_for_material(ore), 4);
        assert_eq!(alloc.used(ore, SizeIndex::new(0)), 2);
        assert_eq!(alloc.covered(&[4, 2, 1], LocationIndex::new(0), ore), 7);
        assert_eq!(
            alloc.to_string(),
            "Allocation(locations: 2, materials: 1, sizes: 3, units: 4)"
        );
    }

    #[test]
    fn test_verify_accepts_valid_allocation() {
        let model = build_model();
        let alloc = allocation_from_rows([[1, 1, 1], [1, 0, 0]]);
        assert_eq!(alloc.verify(&model), Ok(()));
    }

    #[test]
    fn test_verify_rejects_wrong_cover() {
        let model = build_model();
        let alloc = allocation_from_rows([[1, 1, 0], [1, 0, 0]]);
        assert!(matches!(
            alloc.verify(&model),
            Err(AllocationViolation::DemandMismatch { location, covered, .. })
                if location == "A" && covered == "6"
        ));
    }

    #[test]
    fn test_verify_rejects_over_capacity() {
        let model = build_model();
        // Three 2-SCU containers in use, one in the pool.
        let alloc = allocation_from_rows([[1, 1, 1], [0, 2, 0]]);
        assert!(matches!(
            alloc.verify(&model),
            Err(AllocationViolation::CapacityExceeded { size, used, available, .. })
                if size == "2" && used == "3" && available == "1"
        ));
    }

    #[test]
    fn test_verify_rejects_negative_and_shape() {
        let model = build_model();
        let alloc = allocation_from_rows([[2, 0, -1], [1, 0, 0]]);
        assert!(matches!(
            alloc.verify(&model),
            Err(AllocationViolation::NegativeCount { .. })
        ));

        let alloc = Allocation::<IntegerType>::from_fn(1, 1, 3, |_, _, _| 0);
        assert!(matches!(
            alloc.verify(&model),
            Err(AllocationViolation::ShapeMismatch { locations: 1, .. })
        ));
    }

    #[test]
    fn test_zeros() {
        let model = build_model();
        let alloc = Allocation::zeros(&model);
        assert_eq!(alloc.total_units(), 0);
        assert_eq!(alloc.num_sizes(), 3);
        assert!(alloc.verify(&model).is_err());
    }
}
