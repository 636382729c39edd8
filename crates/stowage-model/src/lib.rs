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

//! # Stowage Model
//!
//! **The domain model of the container allocation problem.**
//!
//! A problem instance consists of locations (demand sinks), materials
//! (independent resource categories) and container sizes (positive SCU
//! denominations shared by every material). Each (location, material) pair
//! demands an exact amount of SCU, and each (material, size) pair has a
//! finite number of containers in a shared pool.
//!
//! ## Architecture
//!
//! * **`index`**: typed indices (`LocationIndex`, `MaterialIndex`, `SizeIndex`).
//! * **`model`**: the mutable `ModelBuilder` and the validated, immutable `Model`.
//! * **`error`**: `ConfigurationError`, raised before any search happens.
//! * **`subproblem`**: the per-material decomposition consumed by the search engine.
//! * **`allocation`**: the immutable `[location][material][size]` result table
//!   with exact-cover and capacity verification.
//!
//! ## Design Philosophy
//!
//! 1. **Fail fast**: `ModelBuilder::build` rejects every malformed instance, so the
//!    search never sees an empty axis, an unknown key or a negative value.
//! 2. **Flat tables**: demand, availability and allocation are stored as flattened
//!    vectors indexed by typed indices.
//! 3. **Independence**: no data is shared between materials once decomposed.

pub mod allocation;
pub mod error;
pub mod index;
pub mod model;
pub mod subproblem;
