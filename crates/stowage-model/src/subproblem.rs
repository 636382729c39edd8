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

//! Per-material decomposition.
//!
//! No constraint links two materials: demand is per (location, material) and
//! capacity is per (material, size). The allocation problem therefore splits
//! into one independent `MaterialSubproblem` per material, and the union of
//! the per-material optima is a global optimum.

use crate::{
    index::{LocationIndex, MaterialIndex, SizeIndex},
    model::Model,
};
use stowage_core::num::SolverNumeric;

/// The slice of a `Model` that concerns a single material.
///
/// Owns its data so it can be moved into a worker thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialSubproblem<T> {
    material_index: MaterialIndex,
    material_name: String,
    location_names: Vec<String>,
    sizes: Vec<T>,
    demands: Vec<T>,
    availabilities: Vec<T>,
}

impl<T> MaterialSubproblem<T>
where
    T: SolverNumeric,
{
    /// Extracts the subproblem of one material.
    ///
    /// # Panics
    ///
    /// Panics if `material_index` is not in `0..model.num_materials()`.
    pub fn from_model(model: &Model<T>, material_index: MaterialIndex) -> Self {
        Self {
            material_index,
            material_name: model.material_name(material_index).to_string(),
            location_names: model.location_names().to_vec(),
            sizes: model.sizes().to_vec(),
            demands: model.material_demands(material_index),
            availabilities: model.material_availabilities(material_index).to_vec(),
        }
    }

    /// Builds a standalone subproblem from raw parts.
    ///
    /// Intended for the search engine's tests and benchmarks; the caller
    /// guarantees the invariants `ModelBuilder::build` would otherwise enforce
    /// (positive distinct sizes, non-negative values, matching lengths).
    pub fn from_parts<S>(material_name: S, sizes: Vec<T>, demands: Vec<T>, availabilities: Vec<T>) -> Self
    where
        S: Into<String>,
    {
        debug_assert_eq!(
            sizes.len(),
            availabilities.len(),
            "called `MaterialSubproblem::from_parts` with mismatched sizes and availabilities"
        );
        let location_names = (0..demands.len()).map(|i| format!("L{}", i)).collect();
        Self {
            material_index: MaterialIndex::new(0),
            material_name: material_name.into(),
            location_names,
            sizes,
            demands,
            availabilities,
        }
    }

    #[inline]
    pub fn material_index(&self) -> MaterialIndex {
        self.material_index
    }

    #[inline]
    pub fn material_name(&self) -> &str {
        &self.material_name
    }

    #[inline]
    pub fn num_locations(&self) -> usize {
        self.demands.len()
    }

    #[inline]
    pub fn num_sizes(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    pub fn location_name(&self, location_index: LocationIndex) -> &str {
        &self.location_names[location_index.get()]
    }

    /// Container sizes in model order.
    #[inline]
    pub fn sizes(&self) -> &[T] {
        &self.sizes
    }

    /// Demand per location in model order.
    #[inline]
    pub fn demands(&self) -> &[T] {
        &self.demands
    }

    /// Availability per size in model order.
    #[inline]
    pub fn availabilities(&self) -> &[T] {
        &self.availabilities
    }

    #[inline]
    pub fn demand(&self, location_index: LocationIndex) -> T {
        self.demands[location_index.get()]
    }

    #[inline]
    pub fn availability(&self, size_index: SizeIndex) -> T {
        self.availabilities[size_index.get()]
    }

    #[inline]
    pub fn size_value(&self, size_index: SizeIndex) -> T {
        self.sizes[size_index.get()]
    }

    /// `Σ demand` over all locations.
    pub fn total_demand(&self) -> T {
        self.demands.iter().fold(T::zero(), |acc, &d| acc + d)
    }

    /// `Σ availability × size` over all sizes.
    pub fn total_capacity(&self) -> T {
        self.availabilities
            .iter()
            .zip(&self.sizes)
            .fold(T::zero(), |acc, (&c, &s)| acc + c * s)
    }

    /// Largest single demand, zero when every demand is zero.
    pub fn max_demand(&self) -> T {
        self.demands.iter().copied().max().unwrap_or_else(T::zero)
    }

    /// Returns `true` if every location demands nothing of this material.
    pub fn is_trivial(&self) -> bool {
        self.demands.iter().all(|d| d.is_zero())
    }
}

impl<T> std::fmt::Display for MaterialSubproblem<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MaterialSubproblem({}, locations: {}, sizes: {})",
            self.material_name,
            self.num_locations(),
            self.num_sizes()
        )
    }
}

impl<T> Model<T>
where
    T: SolverNumeric,
{
    /// Splits the model into one subproblem per material, in material order.
    pub fn decompose(&self) -> Vec<MaterialSubproblem<T>> {
        MaterialIndex::range(self.num_materials())
            .map(|m| MaterialSubproblem::from_model(self, m))
            .collect()
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
            .add_materials(["Copper", "Gold"])
            .add_sizes([1, 4])
            .set_demand("A", "Copper", 5)
            .set_demand("B", "Copper", 3)
            .set_demand("B", "Gold", 8)
            .set_availability("Copper", 1, 3)
            .set_availability("Copper", 4, 2)
            .set_availability("Gold", 4, 2);
        builder.build().unwrap()
    }

    #[test]
    fn test_decompose_yields_one_subproblem_per_material() {
        let model = build_model();
        let subproblems = model.decompose();
        assert_eq!(subproblems.len(), 2);

        let copper = &subproblems[0];
        assert_eq!(copper.material_index(), MaterialIndex::new(0));
        assert_eq!(copper.material_name(), "Copper");
        assert_eq!(copper.sizes(), &[1, 4]);
        assert_eq!(copper.demands(), &[5, 3]);
        assert_eq!(copper.availabilities(), &[3, 2]);
        assert_eq!(copper.total_demand(), 8);
        assert_eq!(copper.total_capacity(), 11);
        assert_eq!(copper.max_demand(), 5);
        assert_eq!(copper.location_name(LocationIndex::new(1)), "B");

        let gold = &subproblems[1];
        assert_eq!(gold.material_index(), MaterialIndex::new(1));
        assert_eq!(gold.demands(), &[0, 8]);
        assert_eq!(gold.availabilities(), &[0, 2]);
        assert!(!gold.is_trivial());
    }

    #[test]
    fn test_from_model_matches_decompose() {
        let model = build_model();
        let gold = MaterialSubproblem::from_model(&model, MaterialIndex::new(1));
        assert_eq!(gold, model.decompose()[1]);
    }

    #[test]
    fn test_from_parts() {
        let sp = MaterialSubproblem::<IntegerType>::from_parts("X", vec![4, 2, 1], vec![0, 0], vec![1, 1, 1]);
        assert!(sp.is_trivial());
        assert_eq!(sp.max_demand(), 0);
        assert_eq!(sp.total_capacity(), 7);
        assert_eq!(sp.location_name(LocationIndex::new(1)), "L1");
        assert_eq!(sp.to_string(), "MaterialSubproblem(X, locations: 2, sizes: 3)");
    }

    #[test]
    fn test_subproblem_is_send() {
        fn assert_send<S: Send>() {}
        assert_send::<MaterialSubproblem<IntegerType>>();
    }
}
