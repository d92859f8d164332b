//! Convenience methods for constructing grids and observation points in a way
//! that echoes, but does not exactly match, methods common in scripting languages.
use itertools::Itertools;
use num_traits::Float;

/// Generates evenly spaced values from start to stop,
/// including the endpoint.
///
/// A single point is placed at `start`.
pub fn linspace<T>(start: T, stop: T, n: usize) -> Vec<T>
where
    T: Float,
{
    let to_t = |i: usize| T::from(i).unwrap_or_else(T::nan);
    let dx = if n > 1 {
        (stop - start) / to_t(n - 1)
    } else {
        T::zero()
    };
    (0..n).map(|i| start + to_t(i) * dx).collect()
}

/// Generates a meshgrid in C ordering (x0, y0, z0, x0, y0, z1, ..., x0, yn, zn),
/// one point per entry.
pub fn meshgrid<T>(x: &[&[T]]) -> Vec<Vec<T>>
where
    T: Float,
{
    x.iter()
        .map(|axis| axis.iter().copied())
        .multi_cartesian_product()
        .collect()
}

/// Split a list of points into one list of coordinates per dimension,
/// the layout taken by the `interp` methods.
pub fn transpose<T>(points: &[Vec<T>]) -> Vec<Vec<T>>
where
    T: Float,
{
    let ndims = points.first().map_or(0, |p| p.len());
    (0..ndims)
        .map(|i| points.iter().map(|p| p[i]).collect())
        .collect()
}
