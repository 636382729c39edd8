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

use thiserror::Error;

/// The axis of the problem that an `EmptyAxis` error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Location,
    Material,
    Size,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Location => write!(f, "location"),
            Axis::Material => write!(f, "material"),
            Axis::Size => write!(f, "container size"),
        }
    }
}

/// A malformed or incomplete problem definition.
///
/// Raised by `ModelBuilder::build` before any search is attempted. Numeric
/// values are carried in their rendered form so that the error type does not
/// depend on the integer type of the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("the model must declare at least one {0}")]
    EmptyAxis(Axis),

    #[error("location `{location}` is declared more than once")]
    DuplicateLocation { location: String },

    #[error("material `{material}` is declared more than once")]
    DuplicateMaterial { material: String },

    #[error("container size {size} is declared more than once")]
    DuplicateSize { size: String },

    #[error("container size {size} must be strictly positive")]
    NonPositiveSize { size: String },

    #[error("demand references undeclared location `{location}`")]
    UnknownLocation { location: String },

    #[error("table entry references undeclared material `{material}`")]
    UnknownMaterial { material: String },

    #[error("availability of `{material}` references undeclared container size {size}")]
    UnknownSize { material: String, size: String },

    #[error("demand of `{material}` at `{location}` is negative ({demand})")]
    NegativeDemand {
        location: String,
        material: String,
        demand: String,
    },

    #[error("availability of `{material}` in size {size} is negative ({count})")]
    NegativeAvailability {
        material: String,
        size: String,
        count: String,
    },

    #[error("total demand or total capacity of `{material}` overflows the numeric type")]
    Overflow { material: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_entity() {
        let err = ConfigurationError::EmptyAxis(Axis::Size);
        assert_eq!(
            err.to_string(),
            "the model must declare at least one container size"
        );

        let err = ConfigurationError::UnknownSize {
            material: "Titanium".to_string(),
            size: "8".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "availability of `Titanium` references undeclared container size 8"
        );

        let err = ConfigurationError::NegativeDemand {
            location: "NB Int".to_string(),
            material: "Carbon".to_string(),
            demand: "-3".to_string(),
        };
        assert!(err.to_string().contains("(-3)"));
    }
}
