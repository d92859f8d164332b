//! N-dimensional interpolation/extrapolation with a smoothness order chosen per axis,
//! no-std and no-alloc compatible.
//!
//! Values are read from a caller-supplied generator over integer offsets rather than
//! from a stored array, so the same interpolator works on grids, procedural fields,
//! or anything else that can answer "what is the value at this lattice point".
//!
//! # Smoothness Orders
//! An axis with order `S` reads `2S` samples around the cell containing the point and
//! evaluates a polynomial of degree `2S - 1`. Adjacent cells agree in value and in the
//! first `S - 1` derivatives, and polynomials of degree up to `2S - 2` are reproduced
//! exactly. Order 1 is multilinear interpolation and order 2 is Catmull-Rom.
//!
//! # Performance Scalings
//! Each evaluation reads the full tensor-product neighborhood, `prod(2 S_i)` samples,
//! which is the floor for a separable method of these orders. Per-axis weights are
//! computed once per evaluation, so the remaining cost is one multiply-add per sample
//! per level of the recursion.
//!
//! | Method                        | RAM                   | Interp. / Extrap. Cost             |
//! |-------------------------------|-----------------------|------------------------------------|
//! | smooth::SmoothRecursive       | O(ndims * MAX_WIDTH)  | O(sum S_i^2) + O(prod 2 S_i)       |
//! | smooth::Fixed1..Fixed4        | O(ndims * MAX_WIDTH)  | O(sum S_i^2) + O(prod 2 S_i)       |
//! | regular::SmoothRegular        | O(ndims * MAX_WIDTH)  | O(sum S_i^2) + O(prod 2 S_i)       |
//!
//! # Example: Generator
//! ```rust
//! use smoothn::{Fixed2, interpolate};
//!
//! // Any function of the lattice offsets around the point
//! let field = |i: isize, j: isize| ((i * 7 + j * 3) % 5) as f64;
//!
//! // Orders chosen at runtime
//! let a = interpolate(&[2, 3], |loc: &[isize]| field(loc[0], loc[1]), &[0.3_f64, 0.6]).unwrap();
//!
//! // Orders chosen at compile time
//! let b = Fixed2::<2, 3>::interp_one(|[i, j]: [isize; 2]| field(i, j), [0.3_f64, 0.6]).unwrap();
//!
//! assert_eq!(a, b);
//! ```
//!
//! # Example: Regular Grid
//! ```rust
//! use smoothn::regular;
//!
//! // Define a grid
//! let x = [1.0_f64, 2.0, 3.0, 4.0];
//! let y = [0.0_f64, 1.0, 2.0, 3.0];
//!
//! // Grid input for regular grid method
//! let dims = [x.len(), y.len()];
//! let starts = [x[0], y[0]];
//! let steps = [x[1] - x[0], y[1] - y[0]];
//!
//! // Values at grid points
//! let z = [2.0; 16];
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
//! regular::interpn(&dims, &starts, &steps, &z, &[2, 2], &obs, &mut out).unwrap();
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
// These "needless" range loops are a significant speedup
#![allow(clippy::needless_range_loop)]

pub mod basis;
pub use basis::{BasisMatrix, MAX_ORDER, Rational, basis_matrix};

pub mod smooth;
pub use smooth::{Fixed1, Fixed2, Fixed3, Fixed4, SmoothRecursive, interpolate};

pub mod regular;
pub use regular::SmoothRegular;

#[cfg(feature = "std")]
pub mod utils;

#[cfg(all(test, feature = "std"))]
pub(crate) mod testing;
