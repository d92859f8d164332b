//! Basis matrices for one-dimensional interpolation with a chosen smoothness order.
//!
//! For smoothness order `S`, a neighborhood of `2S` samples at integer offsets
//! `1 - S..=S` determines a polynomial of degree `2S - 1` on the unit interval
//! between offsets 0 and 1:
//!
//! ```text
//! value(x) = V^T * M(S) * [1, x, x^2, ..., x^(2S - 1)]
//! ```
//!
//! The polynomial passes through the samples at offsets 0 and 1, and its
//! derivatives up to order `S - 1` at both ends are the derivatives of the
//! centered Lagrange polynomial through the `2S - 1` samples around each end.
//! Shifting the neighborhood by one sample gives the polynomial on the next
//! interval, and the two agree in value and in their first `S - 1` derivatives
//! where they meet. The result is a piecewise polynomial in `C^(S - 1)` which
//! reproduces any polynomial of degree up to `2S - 2` exactly.
//!
//! | Order | Width | Continuity | Equivalent                    |
//! |-------|-------|------------|-------------------------------|
//! | 1     | 2     | C0         | Linear                        |
//! | 2     | 4     | C1         | Catmull-Rom / central Hermite |
//! | 3     | 6     | C2         | Quintic Hermite               |
//! | S     | 2S    | C(S-1)     |                               |
//!
//! The matrices are derived in exact rational arithmetic during const
//! evaluation and stored in a `static` table, so lookup needs no
//! initialization, no synchronization, and no allocation.
//!
//! ```rust
//! use smoothn::basis::basis_matrix;
//!
//! let m = basis_matrix(1).unwrap();
//! assert_eq!(m.eval(&[2.0_f64, 6.0], 0.25).unwrap(), 3.0);
//! ```
use num_traits::{Float, NumCast};

mod derive;
use derive::derive_basis;

/// Highest supported smoothness order.
///
/// At order 11 the reduced coefficients no longer fit in 64 bits.
pub const MAX_ORDER: usize = 10;

/// Neighborhood width at the highest supported order,
/// used to size fixed intermediate storage.
pub const MAX_WIDTH: usize = 2 * MAX_ORDER;

/// Whether `order` has a basis matrix.
#[inline]
pub const fn is_valid_order(order: usize) -> bool {
    order >= 1 && order <= MAX_ORDER
}

/// Get the basis matrix for a smoothness order.
///
/// The same `'static` matrix is returned on every call.
///
/// # Errors
/// * If `order` is zero or larger than [`MAX_ORDER`]
#[inline]
pub fn basis_matrix(order: usize) -> Result<&'static BasisMatrix, &'static str> {
    if !is_valid_order(order) {
        return Err("Smoothness order must be between 1 and 10");
    }
    Ok(&BASIS[order - 1])
}

/// Exact basis coefficient, reduced, with a positive denominator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    num: i64,
    den: i64,
}

impl Rational {
    pub const ZERO: Self = Self { num: 0, den: 1 };

    pub(crate) const fn from_reduced(num: i64, den: i64) -> Self {
        Self { num, den }
    }

    pub const fn numer(&self) -> i64 {
        self.num
    }

    pub const fn denom(&self) -> i64 {
        self.den
    }

    /// Nearest `f64`, ties to even.
    ///
    /// The quotient is formed by integer long division and rounded once, so
    /// numerators and denominators above 2^53 are handled exactly.
    pub const fn to_f64(&self) -> f64 {
        if self.num == 0 {
            return 0.0;
        }
        let negative = self.num < 0;
        let n = self.num.unsigned_abs() as u128;
        let d = self.den.unsigned_abs() as u128;

        // Scale so that the quotient lands in [2^54, 2^56)
        let ln = (128 - n.leading_zeros()) as i32;
        let ld = (128 - d.leading_zeros()) as i32;
        let mut shift = 55 - ln + ld;
        let (n, d) = if shift >= 0 {
            (n << shift, d)
        } else {
            (n, d << -shift)
        };
        let mut q = n / d;
        let mut sticky = n % d != 0;
        if q >= 1 << 55 {
            sticky |= q & 1 != 0;
            q >>= 1;
            shift -= 1;
        }

        // 53 bits of mantissa, then a round bit, then everything else
        let mut mant = q >> 2;
        let half = q & 2 != 0;
        let rest = q & 1 != 0 || sticky;
        let mut exp = 2 - shift;
        if half && (rest || mant & 1 == 1) {
            mant += 1;
            if mant == 1 << 53 {
                mant >>= 1;
                exp += 1;
            }
        }

        let biased = (exp + 52 + 1023) as u64;
        let bits = ((negative as u64) << 63) | (biased << 52) | (mant as u64 & ((1 << 52) - 1));
        f64::from_bits(bits)
    }
}

/// Interpolation basis for one smoothness order.
///
/// Rows are indexed by neighborhood sample (offset `k + 1 - S` at row `k`),
/// columns by power of `x`.
#[derive(Debug)]
pub struct BasisMatrix {
    /// Smoothness order
    order: usize,

    /// Exact coefficients, `width() x width()` used
    exact: [[Rational; MAX_WIDTH]; MAX_WIDTH],

    /// Coefficients rounded to `f64`, `width() x width()` used
    coefficients: [[f64; MAX_WIDTH]; MAX_WIDTH],
}

impl BasisMatrix {
    /// Smoothness order `S`.
    #[inline]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Number of neighborhood samples, `2S`.
    #[inline]
    pub const fn width(&self) -> usize {
        2 * self.order
    }

    /// Exact coefficient for neighborhood row `row` and power `col`,
    /// or `None` outside the matrix.
    pub const fn exact(&self, row: usize, col: usize) -> Option<Rational> {
        if row < self.width() && col < self.width() {
            Some(self.exact[row][col])
        } else {
            None
        }
    }

    /// Rounded coefficient for neighborhood row `row` and power `col`,
    /// or `None` outside the matrix.
    pub const fn coefficient(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.width() && col < self.width() {
            Some(self.coefficients[row][col])
        } else {
            None
        }
    }

    /// Weight of each neighborhood sample at position `x`,
    /// `M * [1, x, ..., x^(2S - 1)]`, with `width()` entries populated.
    ///
    /// Each row is evaluated by Horner's method, so this is O(S^2) and
    /// reproduces the sample at offset 0 exactly when `x == 0`.
    ///
    /// # Errors
    /// * If a coefficient is not representable in `T`
    #[inline]
    pub fn weights<T: Float>(&self, x: T) -> Result<[T; MAX_WIDTH], &'static str> {
        let width = self.width();
        let mut out = [T::zero(); MAX_WIDTH];
        for k in 0..width {
            let row = &self.coefficients[k];
            let mut acc = T::zero();
            for p in (0..width).rev() {
                let c = <T as NumCast>::from(row[p]).ok_or("Unrepresentable basis coefficient")?;
                acc = acc * x + c;
            }
            out[k] = acc;
        }
        Ok(out)
    }

    /// Interpolate a single neighborhood at position `x`.
    ///
    /// `vals[k]` is the sample at offset `k + 1 - S`. Positions outside `[0, 1]`
    /// extrapolate the same polynomial.
    ///
    /// # Errors
    /// * If `vals` does not have exactly `width()` entries
    /// * If a coefficient is not representable in `T`
    pub fn eval<T: Float>(&self, vals: &[T], x: T) -> Result<T, &'static str> {
        let width = self.width();
        if vals.len() != width {
            return Err("Dimension mismatch");
        }
        let w = self.weights(x)?;
        Ok(dot(&vals[..width], &w[..width]))
    }
}

/// Inner product of a neighborhood with its weights
#[inline]
pub(crate) fn dot<T: Float>(vals: &[T], weights: &[T]) -> T {
    let mut acc = T::zero();
    for k in 0..vals.len() {
        acc = acc + vals[k] * weights[k];
    }
    acc
}

// Each order is its own const item so that each derivation is evaluated
// separately; the larger orders take a few million const-eval steps.
#[allow(long_running_const_eval)]
const BASIS_1: BasisMatrix = derive_basis(1);
#[allow(long_running_const_eval)]
const BASIS_2: BasisMatrix = derive_basis(2);
#[allow(long_running_const_eval)]
const BASIS_3: BasisMatrix = derive_basis(3);
#[allow(long_running_const_eval)]
const BASIS_4: BasisMatrix = derive_basis(4);
#[allow(long_running_const_eval)]
const BASIS_5: BasisMatrix = derive_basis(5);
#[allow(long_running_const_eval)]
const BASIS_6: BasisMatrix = derive_basis(6);
#[allow(long_running_const_eval)]
const BASIS_7: BasisMatrix = derive_basis(7);
#[allow(long_running_const_eval)]
const BASIS_8: BasisMatrix = derive_basis(8);
#[allow(long_running_const_eval)]
const BASIS_9: BasisMatrix = derive_basis(9);
#[allow(long_running_const_eval)]
const BASIS_10: BasisMatrix = derive_basis(10);

/// Basis matrices for orders `1..=MAX_ORDER`, at index `order - 1`
static BASIS: [BasisMatrix; MAX_ORDER] = [
    BASIS_1, BASIS_2, BASIS_3, BASIS_4, BASIS_5, BASIS_6, BASIS_7, BASIS_8, BASIS_9, BASIS_10,
];

#[cfg(test)]
mod test {
    use super::derive::{Wide, falling};
    use super::*;
    use crate::testing::{polyval, randn, rng_fixed_seed};
    use crate::utils::linspace;

    fn wide(m: &BasisMatrix, row: usize, col: usize) -> Wide {
        Wide::from_rational(m.exact(row, col).unwrap())
    }

    /// Order 1 is plain linear interpolation
    #[test]
    fn test_linear_matrix() {
        let m = basis_matrix(1).unwrap();
        assert_eq!(m.width(), 2);
        let expected = [[1, -1], [0, 1]];
        for k in 0..2 {
            for p in 0..2 {
                let r = m.exact(k, p).unwrap();
                assert_eq!((r.numer(), r.denom()), (expected[k][p], 1));
            }
        }

        assert_eq!(m.eval(&[2.0_f64, 6.0], 0.25).unwrap(), 3.0);
        assert_eq!(m.eval(&[2.0_f32, 6.0], 0.25).unwrap(), 3.0);
    }

    /// Order 2 uses central-difference slopes, which is the Catmull-Rom spline
    #[test]
    fn test_catmull_rom_matrix() {
        let m = basis_matrix(2).unwrap();
        let expected = [
            [(0, 1), (-1, 2), (1, 1), (-1, 2)],
            [(1, 1), (0, 1), (-5, 2), (3, 2)],
            [(0, 1), (1, 2), (2, 1), (-3, 2)],
            [(0, 1), (0, 1), (-1, 2), (1, 2)],
        ];
        for k in 0..4 {
            for p in 0..4 {
                let r = m.exact(k, p).unwrap();
                assert_eq!((r.numer(), r.denom()), expected[k][p]);
                assert_eq!(m.coefficient(k, p).unwrap(), r.to_f64());
            }
        }
    }

    /// Value at x=0 is the sample at offset 0 and value at x=1 is the sample at offset 1,
    /// checked exactly on the rational coefficients
    #[test]
    fn test_endpoint_reproduction_exact() {
        for order in 1..=MAX_ORDER {
            let m = basis_matrix(order).unwrap();
            let width = m.width();
            for k in 0..width {
                let at_zero = wide(m, k, 0);
                let at_one = (0..width).fold(Wide::ZERO, |acc, p| acc.plus(wide(m, k, p)));

                let expect_zero = Wide::int((k == order - 1) as i128);
                let expect_one = Wide::int((k == order) as i128);
                assert_eq!(at_zero, expect_zero, "order {order} row {k}");
                assert_eq!(at_one, expect_one, "order {order} row {k}");
            }
        }
    }

    /// The j-th derivative at x=1 of the polynomial for samples u[0..2S]
    /// must equal the j-th derivative at x=0 of the polynomial for samples u[1..2S+1],
    /// for every j < S and every choice of samples.
    ///
    /// Checked exactly, one sample at a time.
    #[test]
    fn test_derivative_continuity_exact() {
        for order in 1..=MAX_ORDER {
            let m = basis_matrix(order).unwrap();
            let width = m.width();
            for j in 0..order {
                let jfact = Wide::int(falling(j, j));
                // Sample u[i] appears in row i of the left interval
                // and row i - 1 of the right interval
                for i in 0..=width {
                    let left = if i < width {
                        (0..width).fold(Wide::ZERO, |acc, p| {
                            acc.plus(wide(m, i, p).times(Wide::int(falling(p, j))))
                        })
                    } else {
                        Wide::ZERO
                    };
                    let right = if i >= 1 {
                        wide(m, i - 1, j).times(jfact)
                    } else {
                        Wide::ZERO
                    };
                    assert_eq!(left, right, "order {order} derivative {j} sample {i}");
                }
            }
        }
    }

    /// Coefficients fit comfortably in 64 bits all the way to the highest order
    #[test]
    fn test_table_contents() {
        for order in 1..=MAX_ORDER {
            let m = basis_matrix(order).unwrap();
            assert_eq!(m.order(), order);
            assert_eq!(m.width(), 2 * order);
            assert!(m.exact(m.width(), 0).is_none());
            assert!(m.coefficient(0, m.width()).is_none());
            for k in 0..m.width() {
                for p in 0..m.width() {
                    let r = m.exact(k, p).unwrap();
                    assert!(r.denom() > 0);
                    assert!(m.coefficient(k, p).unwrap().is_finite());
                }
            }
        }
    }

    #[test]
    fn test_order_bounds() {
        assert!(basis_matrix(0).is_err());
        assert!(basis_matrix(MAX_ORDER + 1).is_err());
        assert!(basis_matrix(usize::MAX).is_err());
        assert_eq!(basis_matrix(MAX_ORDER).unwrap().width(), 20);

        // Same object every time
        let a = basis_matrix(4).unwrap();
        let b = basis_matrix(4).unwrap();
        assert!(core::ptr::eq(a, b));
    }

    #[test]
    fn test_eval_length_mismatch() {
        let m = basis_matrix(3).unwrap();
        assert!(m.eval(&[1.0_f64; 5], 0.5).is_err());
        assert!(m.eval(&[1.0_f64; 7], 0.5).is_err());
        assert!(m.eval(&[1.0_f64; 6], 0.5).is_ok());
    }

    /// Endpoints are reproduced under floating-point evaluation:
    /// exactly at x=0 and to within rounding at x=1
    #[test]
    fn test_endpoint_reproduction_f64() {
        let rng = &mut rng_fixed_seed();
        for order in 1..=MAX_ORDER {
            let m = basis_matrix(order).unwrap();
            let vals = randn::<f64>(rng, m.width());

            assert_eq!(m.eval(&vals, 0.0).unwrap(), vals[order - 1]);
            let err = (m.eval(&vals, 1.0).unwrap() - vals[order]).abs();
            assert!(err < 1e-9, "order {order} err {err}");
        }
    }

    /// Samples of a polynomial of degree 2S - 2 are reproduced exactly,
    /// both inside the unit interval and under extrapolation
    #[test]
    fn test_polynomial_reproduction() {
        let rng = &mut rng_fixed_seed();
        let xs = linspace(-1.0_f64, 2.0, 13);
        for order in 1..=MAX_ORDER {
            let m = basis_matrix(order).unwrap();
            let coeffs = randn::<f64>(rng, 2 * order - 1);
            let vals: Vec<f64> = (0..m.width())
                .map(|k| polyval(&coeffs, (k as f64) + 1.0 - (order as f64)))
                .collect();
            let scale = vals.iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));

            for &x in xs.iter() {
                let err = (m.eval(&vals, x).unwrap() - polyval(&coeffs, x)).abs();
                assert!(err < 1e-9 * scale, "order {order} x {x} err {err}");
            }
        }
    }

    /// Conversion of exact coefficients rounds once, to nearest with ties to even
    #[test]
    fn test_rational_to_f64() {
        // Both parts exact in f64, where IEEE division is correctly rounded
        for (num, den) in [(1, 3), (-5, 2), (7, 1), (2, 7), (-1, 9_007_199_254_740_991)] {
            let r = Rational::from_reduced(num, den);
            assert_eq!(r.to_f64(), num as f64 / den as f64, "{num}/{den}");
        }

        // Integer conversion with `as` is correctly rounded, including ties
        for num in [
            (1_i64 << 53) + 1,
            (1_i64 << 53) + 3,
            (1_i64 << 60) + 1,
            -((1_i64 << 60) + 129),
            i64::MAX,
        ] {
            assert_eq!(Rational::from_reduced(num, 1).to_f64(), num as f64, "{num}");
        }

        // Dividing the rounded parts lands one ulp off here; the single rounding does not
        let r = Rational::from_reduced(9_007_199_254_740_993, 7);
        assert_ne!(r.to_f64(), 9_007_199_254_740_993_i64 as f64 / 7.0);
        assert_eq!(r.to_f64(), 1_286_742_750_677_284.8);
        assert_eq!(Rational::ZERO.to_f64(), 0.0);
    }

    /// Weights are a partition of unity, so constants are reproduced at every order
    #[test]
    fn test_partition_of_unity() {
        for order in 1..=MAX_ORDER {
            let m = basis_matrix(order).unwrap();
            for x in [0.0_f64, 0.125, 0.5, 0.9, 1.0] {
                let w = m.weights(x).unwrap();
                let total: f64 = w[..m.width()].iter().sum();
                assert!((total - 1.0).abs() < 1e-6, "order {order} x {x}");
                assert!(w[m.width()..].iter().all(|&v| v == 0.0));
            }
        }
    }
}
