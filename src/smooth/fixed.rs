//! Smooth interpolators with per-axis orders fixed at compile time.
//!
//! An order outside `1..=10` fails to compile, as does a generator that
//! takes the wrong number of offsets:
//!
//! ```rust,compile_fail
//! use smoothn::smooth::Fixed1;
//! let _ = Fixed1::<11>::interp_one(|[i]| i as f64, [0.5_f64]);
//! ```
//!
//! ```rust,compile_fail
//! use smoothn::smooth::Fixed1;
//! let _ = Fixed1::<0>::interp_one(|[i]| i as f64, [0.5_f64]);
//! ```
//!
//! ```rust,compile_fail
//! use smoothn::smooth::Fixed2;
//! let _ = Fixed2::<2, 2>::interp_one(|[i]| i as f64, [0.5_f64, 0.5]);
//! ```
//!
//! ```rust
//! use smoothn::smooth::Fixed3;
//!
//! type Interp = Fixed3<1, 2, 10>;
//! assert_eq!(Interp::FOOTPRINT, 2 * 4 * 20);
//!
//! let v = Interp::interp_one(|[i, j, k]| (i + j + k) as f64, [0.5_f64, 0.5, 0.5]).unwrap();
//! assert!((v - 1.5).abs() < 1e-9);
//! ```
use super::populate;
use crate::basis::{MAX_WIDTH, basis_matrix, is_valid_order};
use num_traits::Float;

macro_rules! fixed_order_interpolator {
    ($(#[$meta:meta])* $name:ident, $ndims:literal, $($order:ident),+) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name<$(const $order: usize),+>;

        impl<$(const $order: usize),+> $name<$($order),+> {
            /// Smoothness order of each dimension
            pub const ORDERS: [usize; $ndims] = [$($order),+];

            /// Number of samples read per evaluation
            pub const FOOTPRINT: usize = 1 $(* (2 * $order))+;

            /// Interpolate the value at a point,
            /// using fixed-size intermediate storage and no allocation.
            ///
            /// `sampler` receives one offset per dimension and is called
            /// exactly `FOOTPRINT` times.
            ///
            /// # Errors
            ///   * If a basis coefficient is not representable in `T`
            #[inline]
            pub fn interp_one<T, R>(
                mut sampler: impl FnMut([isize; $ndims]) -> R,
                x: [T; $ndims],
            ) -> Result<T, &'static str>
            where
                T: Float,
                R: Into<T>,
            {
                const {
                    $(assert!(is_valid_order($order), "Smoothness order must be between 1 and 10");)+
                }

                let mut weights = [[T::zero(); MAX_WIDTH]; $ndims];
                for i in 0..$ndims {
                    weights[i] = basis_matrix(Self::ORDERS[i])?.weights(x[i])?;
                }

                let mut loc = [0_isize; $ndims];
                let mut leaf = |loc: &[isize; $ndims]| sampler(*loc);
                let interped = populate(0, &Self::ORDERS, &weights, &mut loc, &mut leaf);

                Ok(interped)
            }
        }
    };
}

fixed_order_interpolator!(
    /// One-dimensional interpolator with compile-time order.
    Fixed1, 1, S1
);
fixed_order_interpolator!(
    /// Two-dimensional interpolator with compile-time orders.
    Fixed2, 2, S1, S2
);
fixed_order_interpolator!(
    /// Three-dimensional interpolator with compile-time orders.
    Fixed3, 3, S1, S2, S3
);
fixed_order_interpolator!(
    /// Four-dimensional interpolator with compile-time orders.
    Fixed4, 4, S1, S2, S3, S4
);

#[cfg(test)]
mod test {
    use super::*;
    use crate::smooth::interpolate;
    use crate::testing::{randn, rng_fixed_seed};
    use crate::utils::linspace;

    #[test]
    fn test_linear() {
        let v = Fixed1::<1>::interp_one(|[i]| [2.0_f64, 6.0][i as usize], [0.25]).unwrap();
        assert_eq!(v, 3.0);
    }

    /// Same arithmetic as the runtime-order interpolator, so results are bit-identical
    #[test]
    fn test_matches_runtime_orders() {
        let rng = &mut rng_fixed_seed();
        let samples = randn::<f64>(rng, 8 * 8 * 8 * 8);
        let at = |loc: [isize; 4]| {
            let mut i = 0;
            for &v in loc.iter() {
                i = i * 8 + (v + 3) as usize;
            }
            samples[i]
        };
        let x = [0.3_f64, 1.2, -0.1, 0.5];

        let a = Fixed4::<4, 1, 3, 2>::interp_one(at, x).unwrap();
        let b = interpolate(
            &[4, 1, 3, 2],
            |loc: &[isize]| at([loc[0], loc[1], loc[2], loc[3]]),
            &x,
        )
        .unwrap();
        assert_eq!(a.to_bits(), b.to_bits());

        let a = Fixed2::<3, 2>::interp_one(|[i, j]| at([i, j, 0, 0]), [x[0], x[1]]).unwrap();
        let b = interpolate(&[3, 2], |loc: &[isize]| at([loc[0], loc[1], 0, 0]), &x[..2]).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_constants() {
        assert_eq!(Fixed1::<3>::ORDERS, [3]);
        assert_eq!(Fixed2::<1, 10>::FOOTPRINT, 40);
        assert_eq!(Fixed4::<1, 1, 1, 1>::FOOTPRINT, 16);

        let mut calls = 0;
        Fixed3::<2, 3, 1>::interp_one(
            |_| {
                calls += 1;
                0.0_f64
            },
            [0.5, 0.5, 0.5],
        )
        .unwrap();
        assert_eq!(calls, Fixed3::<2, 3, 1>::FOOTPRINT);
    }

    /// First derivative is continuous across the cell boundary: the polynomial on [0, 1]
    /// and the polynomial on [1, 2] (from the neighborhood shifted by one) have
    /// the same value and slope at x = 1
    #[test]
    fn test_slope_continuity() {
        let rng = &mut rng_fixed_seed();
        let samples = randn::<f64>(rng, 24);
        let at = |i: isize| samples[(i + 11) as usize];
        let h = 1e-5;

        macro_rules! check_order {
            ($s:literal) => {
                let left = |x: f64| Fixed1::<$s>::interp_one(|[i]| at(i), [x]).unwrap();
                let right = |x: f64| Fixed1::<$s>::interp_one(|[i]| at(i + 1), [x]).unwrap();

                assert!((left(1.0) - right(0.0)).abs() < 1e-6, "order {}", $s);

                let slope_left = (left(1.0 + h) - left(1.0 - h)) / (2.0 * h);
                let slope_right = (right(h) - right(-h)) / (2.0 * h);
                assert!((slope_left - slope_right).abs() < 1e-4, "order {}", $s);
            };
        }

        check_order!(2);
        check_order!(3);
        check_order!(4);
        check_order!(6);
    }

    /// With order 1 there is a kink at the cell boundary
    #[test]
    fn test_linear_has_kink() {
        let at = |i: isize| [0.0_f64, 0.0, 1.0, 0.0, 0.0][(i + 2) as usize];
        let h = 1e-4;
        let left = |x: f64| Fixed1::<1>::interp_one(|[i]| at(i), [x]).unwrap();
        let right = |x: f64| Fixed1::<1>::interp_one(|[i]| at(i + 1), [x]).unwrap();
        let slope_left = (left(1.0) - left(1.0 - h)) / h;
        let slope_right = (right(h) - right(0.0)) / h;
        assert!((slope_left - slope_right).abs() > 0.5);
    }

    /// Extrapolation along one axis while interpolating along the others
    #[test]
    fn test_mixed_extrapolation() {
        let f = |i: f64, j: f64| 0.5 * i * i - i * j + 2.0 * j;
        for x in linspace(-2.0_f64, 3.0, 11) {
            let v = Fixed2::<2, 2>::interp_one(|[i, j]| f(i as f64, j as f64), [x, 0.4]).unwrap();
            assert!((v - f(x, 0.4)).abs() < 1e-10);
        }
    }
}
