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
    error::{Axis, ConfigurationError},
    index::{LocationIndex, MaterialIndex, SizeIndex},
};
use rustc_hash::FxHashMap;
use stowage_core::num::{SolverNumeric, checked_dot, checked_sum};

#[inline(always)]
fn flatten_demand_index(
    num_materials: usize,
    location_index: LocationIndex,
    material_index: MaterialIndex,
) -> usize {
    location_index.get() * num_materials + material_index.get()
}

#[inline(always)]
fn flatten_availability_index(
    num_sizes: usize,
    material_index: MaterialIndex,
    size_index: SizeIndex,
) -> usize {
    material_index.get() * num_sizes + size_index.get()
}

/// The immutable, validated allocation problem.
///
/// Holds the declared locations, materials and container sizes (in
/// declaration order) together with the flattened demand table
/// `[location][material]` and availability table `[material][size]`.
/// Entries never set on the builder are zero.
///
/// Construction goes through `ModelBuilder::build`, which guarantees:
/// - every axis is non-empty and free of duplicates,
/// - every size is strictly positive,
/// - every demand and availability is non-negative,
/// - per material, `Σ demand` and `Σ availability × size` fit into `T`.
#[derive(Clone)]
pub struct Model<T> {
    location_names: Vec<String>,
    material_names: Vec<String>,
    sizes: Vec<T>,
    location_lookup: FxHashMap<String, LocationIndex>,
    material_lookup: FxHashMap<String, MaterialIndex>,
    size_lookup: FxHashMap<T, SizeIndex>,
    demands: Vec<T>,
    availabilities: Vec<T>,
}

impl<T> Model<T>
where
    T: SolverNumeric,
{
    /// Returns the number of locations.
    #[inline]
    pub fn num_locations(&self) -> usize {
        self.location_names.len()
    }

    /// Returns the number of materials.
    #[inline]
    pub fn num_materials(&self) -> usize {
        self.material_names.len()
    }

    /// Returns the number of container sizes.
    #[inline]
    pub fn num_sizes(&self) -> usize {
        self.sizes.len()
    }

    /// Returns all location names in declaration order.
    #[inline]
    pub fn location_names(&self) -> &[String] {
        &self.location_names
    }

    /// Returns all material names in declaration order.
    #[inline]
    pub fn material_names(&self) -> &[String] {
        &self.material_names
    }

    /// Returns all container sizes in declaration order.
    #[inline]
    pub fn sizes(&self) -> &[T] {
        &self.sizes
    }

    /// Returns the name of a location.
    ///
    /// # Panics
    ///
    /// Panics if `location_index` is not in `0..num_locations()`.
    #[inline]
    pub fn location_name(&self, location_index: LocationIndex) -> &str {
        let index = location_index.get();
        debug_assert!(
            index < self.num_locations(),
            "called `Model::location_name` with location index out of bounds: the len is {} but the index is {}",
            self.num_locations(),
            index
        );
        &self.location_names[index]
    }

    /// Returns the name of a material.
    ///
    /// # Panics
    ///
    /// Panics if `material_index` is not in `0..num_materials()`.
    #[inline]
    pub fn material_name(&self, material_index: MaterialIndex) -> &str {
        let index = material_index.get();
        debug_assert!(
            index < self.num_materials(),
            "called `Model::material_name` with material index out of bounds: the len is {} but the index is {}",
            self.num_materials(),
            index
        );
        &self.material_names[index]
    }

    /// Returns the SCU value of a container size.
    ///
    /// # Panics
    ///
    /// Panics if `size_index` is not in `0..num_sizes()`.
    #[inline]
    pub fn size_value(&self, size_index: SizeIndex) -> T {
        let index = size_index.get();
        debug_assert!(
            index < self.num_sizes(),
            "called `Model::size_value` with size index out of bounds: the len is {} but the index is {}",
            self.num_sizes(),
            index
        );
        self.sizes[index]
    }

    /// Looks up a location by name.
    #[inline]
    pub fn location_index(&self, name: &str) -> Option<LocationIndex> {
        self.location_lookup.get(name).copied()
    }

    /// Looks up a material by name.
    #[inline]
    pub fn material_index(&self, name: &str) -> Option<MaterialIndex> {
        self.material_lookup.get(name).copied()
    }

    /// Looks up a container size by its SCU value.
    #[inline]
    pub fn size_index(&self, size: T) -> Option<SizeIndex> {
        self.size_lookup.get(&size).copied()
    }

    /// Returns the exact demand of `material_index` at `location_index`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn demand(&self, location_index: LocationIndex, material_index: MaterialIndex) -> T {
        debug_assert!(
            location_index.get() < self.num_locations(),
            "called `Model::demand` with location index out of bounds: the len is {} but the index is {}",
            self.num_locations(),
            location_index.get()
        );
        debug_assert!(
            material_index.get() < self.num_materials(),
            "called `Model::demand` with material index out of bounds: the len is {} but the index is {}",
            self.num_materials(),
            material_index.get()
        );
        self.demands[flatten_demand_index(
            self.num_materials(),
            location_index,
            material_index,
        )]
    }

    /// Returns the number of containers of `size_index` available for `material_index`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn availability(&self, material_index: MaterialIndex, size_index: SizeIndex) -> T {
        debug_assert!(
            material_index.get() < self.num_materials(),
            "called `Model::availability` with material index out of bounds: the len is {} but the index is {}",
            self.num_materials(),
            material_index.get()
        );
        debug_assert!(
            size_index.get() < self.num_sizes(),
            "called `Model::availability` with size index out of bounds: the len is {} but the index is {}",
            self.num_sizes(),
            size_index.get()
        );
        self.availabilities[flatten_availability_index(
            self.num_sizes(),
            material_index,
            size_index,
        )]
    }

    /// Returns the demand of every location for one material, in location order.
    pub fn material_demands(&self, material_index: MaterialIndex) -> Vec<T> {
        LocationIndex::range(self.num_locations())
            .map(|l| self.demand(l, material_index))
            .collect()
    }

    /// Returns the availability of every size for one material, in size order.
    #[inline]
    pub fn material_availabilities(&self, material_index: MaterialIndex) -> &[T] {
        let start = flatten_availability_index(self.num_sizes(), material_index, SizeIndex::new(0));
        &self.availabilities[start..start + self.num_sizes()]
    }

    /// Total SCU demanded for one material across all locations.
    #[inline]
    pub fn total_demand(&self, material_index: MaterialIndex) -> T {
        LocationIndex::range(self.num_locations())
            .fold(T::zero(), |acc, l| acc + self.demand(l, material_index))
    }

    /// Total SCU the pool can supply for one material: `Σ availability × size`.
    #[inline]
    pub fn total_capacity(&self, material_index: MaterialIndex) -> T {
        self.material_availabilities(material_index)
            .iter()
            .zip(&self.sizes)
            .fold(T::zero(), |acc, (&count, &size)| acc + count * size)
    }

    /// Total SCU demanded over all materials and locations, `None` on overflow.
    pub fn grand_total_demand(&self) -> Option<T> {
        checked_sum(self.demands.iter().copied())
    }

    /// Total number of containers in the pool over all materials and sizes,
    /// `None` on overflow.
    pub fn grand_total_containers(&self) -> Option<T> {
        checked_sum(self.availabilities.iter().copied())
    }
}

impl<T> std::fmt::Debug for Model<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("locations", &self.location_names)
            .field("materials", &self.material_names)
            .field("sizes", &self.sizes)
            .field("demands", &self.demands)
            .field("availabilities", &self.availabilities)
            .finish()
    }
}

impl<T> std::fmt::Display for Model<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Model(locations: {}, materials: {}, sizes: {})",
            self.num_locations(),
            self.num_materials(),
            self.num_sizes()
        )
    }
}

/// Collects a problem definition and validates it into a `Model`.
///
/// Locations, materials and sizes keep their declaration order; that order
/// defines the typed indices of the resulting model. Table entries are keyed
/// by name (and by SCU value for sizes) and are only resolved in `build`, so
/// that every inconsistency surfaces as a single `ConfigurationError`.
/// Setting the same key twice keeps the last value.
///
/// # Examples
///
/// ```rust
/// # use stowage_model::model::ModelBuilder;
/// let mut builder = ModelBuilder::<i64>::new();
/// builder
///     .add_location("Sakura Sun")
///     .add_material("Titanium")
///     .add_sizes([1, 2, 4])
///     .set_demand("Sakura Sun", "Titanium", 7)
///     .set_availability("Titanium", 4, 10);
///
/// let model = builder.build().unwrap();
/// assert_eq!(model.num_sizes(), 3);
/// assert_eq!(model.total_capacity(model.material_index("Titanium").unwrap()), 40);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ModelBuilder<T> {
    locations: Vec<String>,
    materials: Vec<String>,
    sizes: Vec<T>,
    demands: Vec<(String, String, T)>,
    availabilities: Vec<(String, T, T)>,
}

impl<T> ModelBuilder<T>
where
    T: SolverNumeric,
{
    /// Creates an empty builder. An empty builder does not build; every axis
    /// needs at least one entry.
    pub fn new() -> Self {
        Self {
            locations: Vec::new(),
            materials: Vec::new(),
            sizes: Vec::new(),
            demands: Vec::new(),
            availabilities: Vec::new(),
        }
    }

    /// Returns the number of declared locations.
    #[inline]
    pub fn num_locations(&self) -> usize {
        self.locations.len()
    }

    /// Returns the number of declared materials.
    #[inline]
    pub fn num_materials(&self) -> usize {
        self.materials.len()
    }

    /// Returns the number of declared container sizes.
    #[inline]
    pub fn num_sizes(&self) -> usize {
        self.sizes.len()
    }

    /// Declares a location.
    #[inline]
    pub fn add_location<S>(&mut self, name: S) -> &mut Self
    where
        S: Into<String>,
    {
        self.locations.push(name.into());
        self
    }

    /// Declares several locations.
    pub fn add_locations<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locations.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declares a material.
    #[inline]
    pub fn add_material<S>(&mut self, name: S) -> &mut Self
    where
        S: Into<String>,
    {
        self.materials.push(name.into());
        self
    }

    /// Declares several materials.
    pub fn add_materials<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.materials.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declares a container size (in SCU).
    #[inline]
    pub fn add_size(&mut self, size: T) -> &mut Self {
        self.sizes.push(size);
        self
    }

    /// Declares several container sizes.
    pub fn add_sizes<I>(&mut self, sizes: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
    {
        self.sizes.extend(sizes);
        self
    }

    /// Sets the exact SCU demand of `material` at `location`.
    pub fn set_demand<L, M>(&mut self, location: L, material: M, demand: T) -> &mut Self
    where
        L: Into<String>,
        M: Into<String>,
    {
        self.demands
            .push((location.into(), material.into(), demand));
        self
    }

    /// Sets the number of containers of `size` available for `material`.
    pub fn set_availability<M>(&mut self, material: M, size: T, count: T) -> &mut Self
    where
        M: Into<String>,
    {
        self.availabilities.push((material.into(), size, count));
        self
    }

    /// Validates the definition and builds the immutable `Model`.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigurationError` found, checking in this order:
    /// empty axes, duplicates and non-positive sizes, demand entries,
    /// availability entries, arithmetic overflow of per-material totals.
    pub fn build(self) -> Result<Model<T>, ConfigurationError> {
        if self.locations.is_empty() {
            return Err(ConfigurationError::EmptyAxis(Axis::Location));
        }
        if self.materials.is_empty() {
            return Err(ConfigurationError::EmptyAxis(Axis::Material));
        }
        if self.sizes.is_empty() {
            return Err(ConfigurationError::EmptyAxis(Axis::Size));
        }

        let mut location_lookup = FxHashMap::default();
        for (i, name) in self.locations.iter().enumerate() {
            if location_lookup
                .insert(name.clone(), LocationIndex::new(i))
                .is_some()
            {
                return Err(ConfigurationError::DuplicateLocation {
                    location: name.clone(),
                });
            }
        }

        let mut material_lookup = FxHashMap::default();
        for (i, name) in self.materials.iter().enumerate() {
            if material_lookup
                .insert(name.clone(), MaterialIndex::new(i))
                .is_some()
            {
                return Err(ConfigurationError::DuplicateMaterial {
                    material: name.clone(),
                });
            }
        }

        let mut size_lookup = FxHashMap::default();
        for (i, &size) in self.sizes.iter().enumerate() {
            if size <= T::zero() {
                return Err(ConfigurationError::NonPositiveSize {
                    size: size.to_string(),
                });
            }
            if size_lookup.insert(size, SizeIndex::new(i)).is_some() {
                return Err(ConfigurationError::DuplicateSize {
                    size: size.to_string(),
                });
            }
        }

        let num_materials = self.materials.len();
        let num_sizes = self.sizes.len();

        let mut demands = vec![T::zero(); self.locations.len() * num_materials];
        for (location, material, demand) in &self.demands {
            let location_index = *location_lookup.get(location.as_str()).ok_or_else(|| {
                ConfigurationError::UnknownLocation {
                    location: location.clone(),
                }
            })?;
            let material_index = *material_lookup.get(material.as_str()).ok_or_else(|| {
                ConfigurationError::UnknownMaterial {
                    material: material.clone(),
                }
            })?;
            if *demand < T::zero() {
                return Err(ConfigurationError::NegativeDemand {
                    location: location.clone(),
                    material: material.clone(),
                    demand: demand.to_string(),
                });
            }
            demands[flatten_demand_index(num_materials, location_index, material_index)] = *demand;
        }

        let mut availabilities = vec![T::zero(); num_materials * num_sizes];
        for (material, size, count) in &self.availabilities {
            let material_index = *material_lookup.get(material.as_str()).ok_or_else(|| {
                ConfigurationError::UnknownMaterial {
                    material: material.clone(),
                }
            })?;
            let size_index =
                *size_lookup
                    .get(size)
                    .ok_or_else(|| ConfigurationError::UnknownSize {
                        material: material.clone(),
                        size: size.to_string(),
                    })?;
            if *count < T::zero() {
                return Err(ConfigurationError::NegativeAvailability {
                    material: material.clone(),
                    size: size.to_string(),
                    count: count.to_string(),
                });
            }
            availabilities[flatten_availability_index(num_sizes, material_index, size_index)] =
                *count;
        }

        // Downstream code sums these totals with plain arithmetic.
        for (m, material) in self.materials.iter().enumerate() {
            let material_demands = (0..self.locations.len())
                .map(|l| demands[l * num_materials + m]);
            let material_availabilities = &availabilities[m * num_sizes..(m + 1) * num_sizes];
            let demand_ok = checked_sum(material_demands).is_some();
            let capacity_ok = checked_dot(material_availabilities, &self.sizes).is_some();
            let count_ok = checked_sum(material_availabilities.iter().copied()).is_some();
            if !(demand_ok && capacity_ok && count_ok) {
                return Err(ConfigurationError::Overflow {
                    material: material.clone(),
                });
            }
        }

        Ok(Model {
            location_names: self.locations,
            material_names: self.materials,
            sizes: self.sizes,
            location_lookup,
            material_lookup,
            size_lookup,
            demands,
            availabilities,
        })
    }
}

impl<T> std::fmt::Display for ModelBuilder<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ModelBuilder(locations: {}, materials: {}, sizes: {})",
            self.num_locations(),
            self.num_materials(),
            self.num_sizes()
        )
    }
}
