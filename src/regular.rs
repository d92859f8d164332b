//! An arbitrary-dimensional smooth interpolator / extrapolator on a regular grid.
//!
//! ```rust
//! use smoothn::regular;
//!
//! // Define a grid
//! let x = [1.0_f64, 2.0, 3.0, 4.0, 5.0];
//! let y = [0.0_f64, 1.0, 2.0, 3.0];
//!
//! // Grid input for regular grid method
//! let dims = [x.len(), y.len()];
//! let starts = [x[0], y[0]];
//! let steps = [x[1] - x[0], y[1] - y[0]];
//!
//! // Values at grid points
//! let z = [2.0; 20];
//!
//! // Smoothness order per axis: C1 along x, C2 along y
//! let orders = [2, 3];
//!
//! // Observation points to interpolate/extrapolate
//! let xobs = [0.0_f64, 5.0];
//! let yobs = [-1.0, 3.0];
//! let obs = [&xobs[..], &yobs[..]];
//!
//! // Storage for output
//! let mut out = [0.0; 2];
//!
//! // Do interpolation
//! regular::interpn(&dims, &starts, &steps, &z, &orders, &obs, &mut out).unwrap();
//! assert!(out.iter().all(|&v| (v - 2.0).abs() < 1e-12));
//! ```
use crate::smooth::SmoothRecursive;
use num_traits::{Float, NumCast};

/// Smooth interpolation of C-ordered grid values in 1 to 8 dimensions,
/// with `orders[i]` the smoothness order along axis `i`.
///
/// Builds a [`SmoothRegular`] sized to the grid and evaluates every
/// observation point with it. Setup only validates inputs and looks up one
/// static basis matrix per axis, so calling this per point costs little next
/// to the `prod(2 S_i)` samples read for each evaluation. Grids of more than
/// 8 dimensions need the struct.
///
/// # Errors
/// * Any error from [`SmoothRegular::new`] or [`SmoothRegular::interp`]
pub fn interpn<T: Float>(
    dims: &[usize],
    starts: &[T],
    steps: &[T],
    vals: &[T],
    orders: &[usize],
    obs: &[&[T]],
    out: &mut [T],
) -> Result<(), &'static str> {
    // Expanding out and using the specialized version for each size
    // keeps intermediate storage as small as the problem
    let ndims = dims.len();
    match ndims {
        1 => SmoothRegular::<'_, T, 1>::new(dims, starts, steps, vals, orders)?.interp(obs, out),
        2 => SmoothRegular::<'_, T, 2>::new(dims, starts, steps, vals, orders)?.interp(obs, out),
        3 => SmoothRegular::<'_, T, 3>::new(dims, starts, steps, vals, orders)?.interp(obs, out),
        4 => SmoothRegular::<'_, T, 4>::new(dims, starts, steps, vals, orders)?.interp(obs, out),
        5 => SmoothRegular::<'_, T, 5>::new(dims, starts, steps, vals, orders)?.interp(obs, out),
        6 => SmoothRegular::<'_, T, 6>::new(dims, starts, steps, vals, orders)?.interp(obs, out),
        7 => SmoothRegular::<'_, T, 7>::new(dims, starts, steps, vals, orders)?.interp(obs, out),
        8 => SmoothRegular::<'_, T, 8>::new(dims, starts, steps, vals, orders)?.interp(obs, out),
        0 => Err("Dimension mismatch"),
        _ => Err(
            "Dimension exceeds maximum (8). Use interpolator struct directly for higher dimensions.",
        ),
    }
}

/// Like [`interpn`], returning the values in a new `Vec`
/// with one entry per observation point.
#[cfg(feature = "std")]
pub fn interpn_alloc<T: Float>(
    dims: &[usize],
    starts: &[T],
    steps: &[T],
    vals: &[T],
    orders: &[usize],
    obs: &[&[T]],
) -> Result<Vec<T>, &'static str> {
    let n = obs.first().map_or(0, |x| x.len());
    let mut out = vec![T::zero(); n];
    interpn(dims, starts, steps, vals, orders, obs, &mut out)?;
    Ok(out)
}

/// Flag the axes along which some observation point is outside the grid
/// by at least `atol`.
///
/// Points there are still evaluated, by continuing the edge cell's
/// polynomial; this reports where that happens. `out[i]` is `true` when any
/// coordinate along axis `i` lies outside `[start, start + step * (n - 1)]`.
///
/// # Errors
/// * If `obs`, `starts`, `steps` or `out` do not have one entry per axis
pub fn check_bounds<T: Float>(
    dims: &[usize],
    starts: &[T],
    steps: &[T],
    obs: &[&[T]],
    atol: T,
    out: &mut [bool],
) -> Result<(), &'static str> {
    let n = dims.len();
    if !(obs.len() == n && out.len() == n && starts.len() == n && steps.len() == n) {
        return Err("Dimension mismatch");
    }

    for i in 0..n {
        // An unrepresentable grid extent can't contain anything,
        // so it is flagged like any other violation
        out[i] = match <T as NumCast>::from(dims[i].saturating_sub(1)) {
            Some(last_index) => {
                let first = starts[i];
                let last = starts[i] + steps[i] * last_index;
                let lo = first.min(last);
                let hi = first.max(last);
                obs[i].iter().any(|&x| (x - lo) <= -atol || (x - hi) >= atol)
            }
            None => true,
        };
    }
    Ok(())
}

/// An arbitrary-dimensional smooth interpolator / extrapolator on a regular grid.
///
/// Each observation point is located in the unit cell of the grid that
/// contains it, and the neighborhood of that cell is interpolated with the
/// smoothness order of each axis, exactly as [`SmoothRecursive`] does for a
/// sampler closure.
///
/// Near the edges of the grid, a cell's neighborhood reaches past the last
/// grid point; those samples repeat the edge value. This lowers the order of
/// the interpolant in the outermost `S - 1` cells of an axis, but it stays
/// continuous.
///
/// Outside the grid, the polynomial of the first or last cell is continued.
///
/// Values are C-ordered: the last axis varies fastest, so the value at
/// index `(i, j)` of an `n x m` grid is `vals[i * m + j]`.
///
/// Each evaluation costs one cell lookup per axis plus one evaluation of the
/// neighborhood engine, `prod(2 S_i)` samples, inside or outside the grid
/// alike. Storage is the engine's fixed stack buffers.
pub struct SmoothRegular<'a, T: Float, const MAXDIMS: usize> {
    ndims: usize,

    /// Number of grid points along each axis, `ndims` used
    dims: [usize; MAXDIMS],

    /// Coordinate of grid index 0 along each axis
    starts: [T; MAXDIMS],

    /// Grid spacing along each axis, which is one unit of the local cell coordinate
    steps: [T; MAXDIMS],

    /// C-ordered samples, `prod(dims)` entries
    vals: &'a [T],

    /// Per-axis orders and their basis matrices
    engine: SmoothRecursive<MAXDIMS>,
}

impl<'a, T: Float, const MAXDIMS: usize> SmoothRegular<'a, T, MAXDIMS> {
    /// Bind a C-ordered grid of samples to one smoothness order per axis.
    ///
    /// Each axis needs at least one cell, so at least 2 grid points; the
    /// neighborhood of an order may be wider than the grid, in which case the
    /// edge samples are repeated.
    ///
    /// # Errors
    /// * If any input dimensions do not match
    /// * If any dimensions have size < 2
    /// * If any step sizes have zero or negative magnitude
    /// * If any order is outside `1..=10`
    pub fn new(
        dims: &[usize],
        starts: &[T],
        steps: &[T],
        vals: &'a [T],
        orders: &[usize],
    ) -> Result<Self, &'static str> {
        // Check dimensions
        let ndims = dims.len();
        let nvals: usize = dims.iter().product();
        if !(starts.len() == ndims
            && steps.len() == ndims
            && orders.len() == ndims
            && vals.len() == nvals
            && ndims > 0
            && ndims <= MAXDIMS)
        {
            return Err("Dimension mismatch");
        }
        // Make sure all dimensions have at least one cell
        let degenerate = dims.iter().any(|&x| x < 2);
        if degenerate {
            return Err("All grids must have at least two entries");
        }
        // Check if any dimensions have zero or negative step size
        let steps_are_positive = steps.iter().all(|&x| x > T::zero());
        if !steps_are_positive {
            return Err("All grids must be monotonically increasing");
        }

        let engine = SmoothRecursive::new(orders)?;

        let mut steps_local = [T::zero(); MAXDIMS];
        let mut starts_local = [T::zero(); MAXDIMS];
        let mut dims_local = [0_usize; MAXDIMS];
        steps_local[..ndims].copy_from_slice(steps);
        starts_local[..ndims].copy_from_slice(starts);
        dims_local[..ndims].copy_from_slice(dims);

        Ok(Self {
            ndims,
            dims: dims_local,
            starts: starts_local,
            steps: steps_local,
            vals,
            engine,
        })
    }

    /// Evaluate at the points `(x[0][i], x[1][i], ...)`, writing `out[i]`.
    ///
    /// # Errors
    ///   * If `x` does not have one coordinate slice per axis
    ///   * If any coordinate slice is not the same length as `out`
    pub fn interp(&self, x: &[&[T]], out: &mut [T]) -> Result<(), &'static str> {
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
            out[i] = self.interp_one(tmp)?;
        }

        Ok(())
    }

    /// Evaluate at one point, without allocating.
    ///
    /// The point is converted to a cell index and a local coordinate per axis,
    /// and the cell's neighborhood is read from the grid through a sampler
    /// closure.
    ///
    /// # Errors
    ///   * If `x` does not have one coordinate per axis
    ///   * If a cell index or coordinate is not representable
    pub fn interp_one(&self, x: &[T]) -> Result<T, &'static str> {
        // Check sizes
        let ndims = self.ndims;
        if x.len() != ndims {
            return Err("Dimension mismatch");
        }

        let mut origin = [0_usize; MAXDIMS]; // Index of the lower corner of the cell
        let mut dts = [T::zero(); MAXDIMS]; // Normalized coordinate within the cell
        let mut dimprod = [1_usize; MAXDIMS];

        // C-order stride of each axis
        let mut acc = 1;
        for i in (0..ndims).rev() {
            dimprod[i] = acc;
            acc *= self.dims[i];
        }

        for i in 0..ndims {
            origin[i] = self.get_loc(x[i], i)?;
            let corner = self.starts[i]
                + self.steps[i]
                    * <T as NumCast>::from(origin[i]).ok_or("Unrepresentable coordinate value")?;
            dts[i] = (x[i] - corner) / self.steps[i];
        }

        // Neighborhood offsets are relative to the lower corner,
        // with samples past the edge repeating the edge value
        let dims = &self.dims;
        let vals = self.vals;
        let sampler = |offsets: &[isize]| {
            let mut index = 0;
            for j in 0..ndims {
                let last = dims[j] - 1;
                let loc = (origin[j] as isize + offsets[j]).clamp(0, last as isize) as usize;
                index += loc * dimprod[j];
            }
            vals[index]
        };

        self.engine.interp_one(sampler, &dts[..ndims])
    }

    /// Get the index of the lower corner of the cell containing `v`,
    /// saturating to the first or last cell outside the grid.
    #[inline]
    fn get_loc(&self, v: T, dim: usize) -> Result<usize, &'static str> {
        let floc = ((v - self.starts[dim]) / self.steps[dim]).floor(); // float loc
        let iloc = <isize as NumCast>::from(floc).ok_or("Unrepresentable coordinate value")?;

        let dimmax = self.dims[dim] as isize - 2; // maximum index for lower corner
        Ok(iloc.clamp(0, dimmax) as usize)
    }
}
