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

use stowage_core::index::{TypedIndex, TypedIndexTag};

/// A tag type for location indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct LocationIndexTag;

impl TypedIndexTag for LocationIndexTag {
    const NAME: &'static str = "LocationIndex";
}

/// A typed index for locations.
pub type LocationIndex = TypedIndex<LocationIndexTag>;

/// A tag type for material indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct MaterialIndexTag;

impl TypedIndexTag for MaterialIndexTag {
    const NAME: &'static str = "MaterialIndex";
}

/// A typed index for materials.
pub type MaterialIndex = TypedIndex<MaterialIndexTag>;

/// A tag type for container size indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SizeIndexTag;

impl TypedIndexTag for SizeIndexTag {
    const NAME: &'static str = "SizeIndex";
}

/// A typed index for container sizes, in model declaration order.
pub type SizeIndex = TypedIndex<SizeIndexTag>;
