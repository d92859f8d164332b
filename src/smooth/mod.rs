//! Smooth interpolation of an N-dimensional neighborhood supplied by a generator.
//!
//! Each axis has its own smoothness order `S`, which sets both the width of
//! the neighborhood read along that axis (`2S` samples at integer offsets
//! `1 - S..=S`) and the continuity of the result (`C^(S - 1)`) as the
//! observation point moves from one unit cell to the next.
//!
//! Samples are not stored; a generator is called with one integer offset per
//! axis and returns the sample there. The position `x` along each axis is
//! measured from offset 0 in units of the grid spacing, so `[0, 1]` is the
//! cell between offsets 0 and 1. Any other position extrapolates the same
//! polynomial.
//!
//! The interpolant is the tensor product of the one-dimensional bases in
//! [`crate::basis`], which allows the neighborhood to be reduced one axis at a
//! time. The weights for each axis are evaluated once per call, after which
//! each level of the recursion is an inner product:
//!
//! ```text
//! Result([S1], sampler, [x1])         = sum_k sampler(k + 1 - S1) * w1[k]
//! Result([S1, ..], sampler, [x1, ..]) = sum_k Result([S2, ..], sampler(k + 1 - S1, ..), [x2, ..]) * w1[k]
//! ```
//!
//! Operation Complexity
//! * O(sum S_i^2) to evaluate the weights
//! * O(prod 2 S_i) generator calls and multiply-adds; the generator is called
//!   exactly once per sample in the footprint
//!
//! Memory Complexity
//! * One `[T; MAX_WIDTH]` row of weights per axis and one per level of
//!   recursion, all on the stack. No allocation.
//!
//! ```rust
//! use smoothn::smooth::{Fixed2, interpolate};
//!
//! // Samples of some field around the cell of interest
//! let field = |i: isize, j: isize| (i * i + 3 * j) as f64;
//!
//! // Orders chosen at runtime
//! let a = interpolate(&[2, 3], |loc: &[isize]| field(loc[0], loc[1]), &[0.25_f64, 0.5]).unwrap();
//!
//! // Orders chosen at compile time
//! let b = Fixed2::<2, 3>::interp_one(|[i, j]| field(i, j), [0.25_f64, 0.5]).unwrap();
//!
//! assert_eq!(a, b);
//! assert!((a - (0.25 * 0.25 + 3.0 * 0.5)).abs() < 1e-12);
//! ```
use crate::basis::{MAX_WIDTH, dot};
use num_traits::Float;

pub mod fixed;
pub mod recursive;

pub use fixed::{Fixed1, Fixed2, Fixed3, Fixed4};
pub use recursive::SmoothRecursive;

/// Evaluate a smooth interpolation in up to 8 dimensions, with the
/// smoothness order of each axis given in `orders`.
///
/// `sampler` receives one offset per axis, each in `1 - S..=S` for that axis, and is
/// called exactly `prod(2 * S)` times.
///
/// This is a convenience function; for more than 8 dimensions, or to validate
/// the orders once and evaluate many times, use [`SmoothRecursive`] directly.
///
/// # Errors
/// * If there are no dimensions, or more than 8
/// * If any order is outside `1..=10`
/// * If `x` does not have one entry per order
///
/// All of these are detected before the generator is called.
pub fn interpolate<T, R, G>(orders: &[usize], sampler: G, x: &[T]) -> Result<T, &'static str>
where
    T: Float,
    R: Into<T>,
    G: FnMut(&[isize]) -> R,
{
    // Using the specialized version for each size keeps
    // intermediate storage as small as the problem
    match orders.len() {
        1 => SmoothRecursive::<1>::new(orders)?.interp_one(sampler, x),
        2 => SmoothRecursive::<2>::new(orders)?.interp_one(sampler, x),
        3 => SmoothRecursive::<3>::new(orders)?.interp_one(sampler, x),
        4 => SmoothRecursive::<4>::new(orders)?.interp_one(sampler, x),
        5 => SmoothRecursive::<5>::new(orders)?.interp_one(sampler, x),
        6 => SmoothRecursive::<6>::new(orders)?.interp_one(sampler, x),
        7 => SmoothRecursive::<7>::new(orders)?.interp_one(sampler, x),
        8 => SmoothRecursive::<8>::new(orders)?.interp_one(sampler, x),
        0 => Err("Dimension mismatch"),
        _ => Err(
            "Dimension exceeds maximum (8). Use interpolator struct directly for higher dimensions.",
        ),
    }
}

/// Recursive reduction of the neighborhood, one axis per level.
///
/// `loc` holds the offsets bound so far; entries at and beyond `dim` are
/// overwritten on the way down. `weights[i]` holds the populated weights of
/// axis `i`.
#[inline]
pub(crate) fn populate<T, R, G, const M: usize>(
    dim: usize,
    orders: &[usize],
    weights: &[[T; MAX_WIDTH]],
    loc: &mut [isize; M],
    sampler: &mut G,
) -> T
where
    T: Float,
    R: Into<T>,
    G: FnMut(&[isize; M]) -> R,
{
    // At a leaf, take the sample
    if dim == orders.len() {
        return sampler(&*loc).into();
    }

    // Otherwise collapse the remaining axes at each offset along this one
    let order = orders[dim];
    let width = 2 * order;
    let first = 1 - order as isize;

    let mut vals = [T::zero(); MAX_WIDTH];
    for k in 0..width {
        loc[dim] = first + k as isize;
        vals[k] = populate(dim + 1, orders, weights, loc, sampler);
    }

    dot(&vals[..width], &weights[dim][..width])
}
