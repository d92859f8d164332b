//! Smooth interpolator with per-axis orders chosen at runtime.
//!
//! ```rust
//! use smoothn::smooth::SmoothRecursive;
//!
//! // Cubic (C1) along the first axis, quintic (C2) along the second
//! let interpolator = SmoothRecursive::<2>::new(&[2, 3]).unwrap();
//! assert_eq!(interpolator.footprint(), 4 * 6);
//!
//! // A field that is quadratic along the first axis and linear along the second
//! let sampler = |loc: &[isize]| {
//!     let (i, j) = (loc[0] as f64, loc[1] as f64);
//!     i * i - 2.0 * j
//! };
//!
//! let v = interpolator.interp_one(sampler, &[0.5_f64, 0.25]).unwrap();
//! assert!((v - (0.25 - 0.5)).abs() < 1e-12);
//! ```
use super::populate;
use crate::basis::{BasisMatrix, MAX_WIDTH, basis_matrix};
use num_traits::Float;

/// An arbitrary-dimensional smooth interpolator / extrapolator over a
/// generator-supplied neighborhood.
///
/// Construction validates the orders and binds the basis matrix of each
/// axis; evaluation cannot fail on configuration after that, apart from
/// being handed the wrong number of coordinates.
///
/// Operation Complexity
/// * O(sum S_i^2) + O(prod 2 S_i) per evaluation
///
/// Memory Complexity
/// * Peak stack usage is O(MAXDIMS * MAX_WIDTH).
/// * While evaluation is recursive, the recursion has constant
///   max depth of MAXDIMS, which provides a guarantee on peak
///   memory usage.
#[derive(Clone, Copy, Debug)]
pub struct SmoothRecursive<const MAXDIMS: usize> {
    /// Number of dimensions
    ndims: usize,

    /// Smoothness order of each dimension
    orders: [usize; MAXDIMS],

    /// Basis matrix of each dimension
    bases: [&'static BasisMatrix; MAXDIMS],
}

impl<const MAXDIMS: usize> SmoothRecursive<MAXDIMS> {
    /// Build a new interpolator, using O(MAXDIMS) calculations and storage.
    ///
    /// # Errors
    /// * If there are no dimensions, or more than MAXDIMS
    /// * If any order is outside `1..=10`
    pub fn new(orders: &[usize]) -> Result<Self, &'static str> {
        // Check dimensions
        let ndims = orders.len();
        if !(ndims > 0 && ndims <= MAXDIMS) {
            return Err("Dimension mismatch");
        }

        // Look up every basis before committing to anything
        let mut bases = [basis_matrix(orders[0])?; MAXDIMS];
        for i in 0..ndims {
            bases[i] = basis_matrix(orders[i])?;
        }

        let mut orders_local = [0_usize; MAXDIMS];
        orders_local[..ndims].copy_from_slice(orders);

        Ok(Self {
            ndims,
            orders: orders_local,
            bases,
        })
    }

    /// Number of dimensions
    #[inline]
    pub fn ndims(&self) -> usize {
        self.ndims
    }

    /// Smoothness order of each dimension
    #[inline]
    pub fn orders(&self) -> &[usize] {
        &self.orders[..self.ndims]
    }

    /// Number of samples read per evaluation, `prod(2 * S)`
    pub fn footprint(&self) -> usize {
        self.orders().iter().map(|&s| 2 * s).product()
    }

    /// Interpolate at a list of observation points, all sharing one generator.
    ///
    /// # Errors
    ///   * If the dimensionality of the points does not match the interpolator
    ///   * If the number of points does not match the size of `out`
    pub fn interp<T, R, G>(&self, mut sampler: G, x: &[&[T]], out: &mut [T]) -> Result<(), &'static str>
    where
        T: Float,
        R: Into<T>,
        G: FnMut(&[isize]) -> R,
    {
        let n = out.len();
        let ndims = self.ndims;
        // Make sure there are enough coordinate inputs for each dimension
        if x.len() != ndims {
            return Err("Dimension mismatch");
        }
        // Make sure the size of inputs and output match
        let size_matches = x.iter().all(|&xx| xx.len() == n);
        if !size_matches {
            return Err("Dimension mismatch");
        }

        let tmp = &mut [T::zero(); MAXDIMS][..ndims];
        for i in 0..n {
            (0..ndims).for_each(|j| tmp[j] = x[j][i]);
            out[i] = self.interp_one(&mut sampler, tmp)?;
        }

        Ok(())
    }

    /// Interpolate the value at a point,
    /// using fixed-size intermediate storage and no allocation.
    ///
    /// `sampler` receives one offset per dimension and is called
    /// exactly [`footprint`](Self::footprint) times.
    ///
    /// # Errors
    ///   * If the dimensionality of the point does not match the interpolator
    ///   * If a basis coefficient is not representable in `T`
    pub fn interp_one<T, R, G>(&self, mut sampler: G, x: &[T]) -> Result<T, &'static str>
    where
        T: Float,
        R: Into<T>,
        G: FnMut(&[isize]) -> R,
    {
        // Check sizes
        let ndims = self.ndims;
        if x.len() != ndims {
            return Err("Dimension mismatch");
        }

        // Evaluate each axis' weights once, up front; after this point,
        // nothing can fail
        let mut weights = [[T::zero(); MAX_WIDTH]; MAXDIMS];
        for i in 0..ndims {
            weights[i] = self.bases[i].weights(x[i])?;
        }

        let mut loc = [0_isize; MAXDIMS];
        let mut leaf = |loc: &[isize; MAXDIMS]| sampler(&loc[..ndims]);
        let interped = populate(0, self.orders(), &weights[..ndims], &mut loc, &mut leaf);

        Ok(interped)
    }
}
