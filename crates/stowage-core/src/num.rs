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

//! # Solver Numerics
//!
//! `SolverNumeric` collects the integer capabilities the allocation model and
//! search require into a single bound: a signed primitive integer that can be
//! shared across worker threads. Signedness is deliberate; capacity analysis
//! reports signed differences and negative inputs must be representable so
//! that they can be rejected with a precise error.
//!
//! The helpers below never panic on overflow. They return `None` instead so
//! that callers can turn the condition into a configuration error.
//!
//! Note: `i128` is accepted but noticeably slower in the search loop.

use num_traits::{FromPrimitive, PrimInt, Signed};
use std::hash::Hash;

/// A trait alias for the integer types used as demands, sizes, availabilities
/// and allocation counts. Typically `i32` or `i64`.
pub trait SolverNumeric:
    PrimInt
    + Signed
    + FromPrimitive
    + std::fmt::Debug
    + std::fmt::Display
    + Hash
    + Send
    + Sync
    + 'static
{
}

impl<T> SolverNumeric for T where
    T: PrimInt
        + Signed
        + FromPrimitive
        + std::fmt::Debug
        + std::fmt::Display
        + Hash
        + Send
        + Sync
        + 'static
{
}

/// Greatest common divisor of two non-negative integers.
/// `gcd(0, 0)` is `0`.
///
/// ```rust
/// # use stowage_core::num::gcd;
/// assert_eq!(gcd(12i64, 18), 6);
/// assert_eq!(gcd(0i64, 5), 5);
/// ```
#[inline]
pub fn gcd<T>(a: T, b: T) -> T
where
    T: PrimInt,
{
    let (mut a, mut b) = (a, b);
    while !b.is_zero() {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// `ceil(numerator / denominator)` for a non-negative numerator and a
/// strictly positive denominator.
///
/// ```rust
/// # use stowage_core::num::ceil_div;
/// assert_eq!(ceil_div(7i64, 4), 2);
/// assert_eq!(ceil_div(8i64, 4), 2);
/// assert_eq!(ceil_div(0i64, 4), 0);
/// ```
#[inline]
pub fn ceil_div<T>(numerator: T, denominator: T) -> T
where
    T: PrimInt,
{
    debug_assert!(
        denominator > T::zero(),
        "called `ceil_div` with a non-positive denominator"
    );
    let quotient = numerator / denominator;
    if (numerator % denominator).is_zero() {
        quotient
    } else {
        quotient + T::one()
    }
}

/// Sums the values, returning `None` on overflow.
///
/// ```rust
/// # use stowage_core::num::checked_sum;
/// assert_eq!(checked_sum([1i8, 2, 3]), Some(6));
/// assert_eq!(checked_sum([100i8, 100]), None);
/// ```
#[inline]
pub fn checked_sum<T, I>(values: I) -> Option<T>
where
    T: PrimInt,
    I: IntoIterator<Item = T>,
{
    values
        .into_iter()
        .try_fold(T::zero(), |acc, v| acc.checked_add(&v))
}

/// `Σ a_i × b_i`, returning `None` on overflow. Extra elements of the longer
/// input are ignored.
///
/// ```rust
/// # use stowage_core::num::checked_dot;
/// assert_eq!(checked_dot(&[2i64, 3], &[4, 1]), Some(11));
/// assert_eq!(checked_dot(&[i64::MAX], &[2]), None);
/// ```
#[inline]
pub fn checked_dot<T>(a: &[T], b: &[T]) -> Option<T>
where
    T: PrimInt,
{
    a.iter().zip(b).try_fold(T::zero(), |acc, (x, y)| {
        x.checked_mul(y).and_then(|p| acc.checked_add(&p))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_solver_numeric<T: SolverNumeric>() {}

    #[test]
    fn test_signed_primitives_are_solver_numeric() {
        assert_solver_numeric::<i8>();
        assert_solver_numeric::<i16>();
        assert_solver_numeric::<i32>();
        assert_solver_numeric::<i64>();
        assert_solver_numeric::<isize>();
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(0i64, 0), 0);
        assert_eq!(gcd(7i64, 0), 7);
        assert_eq!(gcd(4i64, 6), 2);
        assert_eq!(gcd(17i64, 5), 1);
        assert_eq!(gcd(32i32, 8), 8);
    }

    #[test]
    fn test_ceil_div_rounds_up_only_with_remainder() {
        assert_eq!(ceil_div(1i64, 1), 1);
        assert_eq!(ceil_div(9i64, 4), 3);
        assert_eq!(ceil_div(12i64, 4), 3);
        assert_eq!(ceil_div(13i32, 32), 1);
    }

    #[test]
    fn test_checked_sum_detects_overflow() {
        assert_eq!(checked_sum(Vec::<i64>::new()), Some(0));
        assert_eq!(checked_sum([i64::MAX, 0]), Some(i64::MAX));
        assert_eq!(checked_sum([i64::MAX, 1]), None);
    }

    #[test]
    fn test_checked_dot() {
        assert_eq!(checked_dot::<i64>(&[], &[]), Some(0));
        assert_eq!(checked_dot(&[10i64, 12, 5], &[1, 2, 4]), Some(54));
        assert_eq!(checked_dot(&[1i64, 2, 3], &[1]), Some(1));
        assert_eq!(checked_dot(&[i32::MAX, 1], &[1, 1]), None);
    }
}
