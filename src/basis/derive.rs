//! Exact derivation of the basis matrices.
//!
//! Everything here runs during const evaluation, so the table that reaches
//! the binary is plain data and no derivation work is done at runtime.
//!
//! For smoothness order `S`, the interpolant on the unit interval is the
//! degree `2S - 1` polynomial whose value and first `S - 1` derivatives at
//! `x = 0` and `x = 1` match estimates taken from the neighborhood samples.
//! The estimate of each derivative at a grid node is the corresponding
//! derivative of the Lagrange polynomial through the `2S - 1` samples
//! centered on that node. A node's estimates do not depend on which of its two
//! adjacent intervals is being evaluated, so neighboring intervals agree on
//! value and derivatives up to order `S - 1` where they meet.
use super::{BasisMatrix, MAX_WIDTH, Rational};

/// Rational with room for intermediate products.
///
/// Always reduced with a positive denominator, so derived equality is
/// numeric equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Wide {
    num: i128,
    den: i128,
}

impl Wide {
    pub(super) const ZERO: Self = Self { num: 0, den: 1 };

    pub(super) const fn new(num: i128, den: i128) -> Self {
        if den == 0 {
            panic!("Zero denominator in basis derivation");
        }
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        let g = gcd(num, den);
        Self {
            num: num / g,
            den: den / g,
        }
    }

    pub(super) const fn int(v: i128) -> Self {
        Self { num: v, den: 1 }
    }

    #[cfg(test)]
    pub(super) const fn from_rational(r: Rational) -> Self {
        Self::new(r.numer() as i128, r.denom() as i128)
    }

    pub(super) const fn is_zero(self) -> bool {
        self.num == 0
    }

    pub(super) const fn plus(self, rhs: Self) -> Self {
        let g = gcd(self.den, rhs.den);
        let lhs_scale = rhs.den / g;
        let rhs_scale = self.den / g;
        Self::new(
            checked_add(checked_mul(self.num, lhs_scale), checked_mul(rhs.num, rhs_scale)),
            checked_mul(self.den, lhs_scale),
        )
    }

    pub(super) const fn minus(self, rhs: Self) -> Self {
        self.plus(Self {
            num: -rhs.num,
            den: rhs.den,
        })
    }

    pub(super) const fn times(self, rhs: Self) -> Self {
        // Cross-cancel before multiplying to keep magnitudes down
        let g1 = gcd(self.num, rhs.den);
        let g2 = gcd(rhs.num, self.den);
        Self::new(
            checked_mul(self.num / g1, rhs.num / g2),
            checked_mul(self.den / g2, rhs.den / g1),
        )
    }

    pub(super) const fn over(self, rhs: Self) -> Self {
        self.times(Self::new(rhs.den, rhs.num))
    }

    /// Narrow to the `i64` storage of the table.
    const fn narrow(self) -> Rational {
        let limit = i64::MAX as i128;
        if self.num > limit || self.num < -limit || self.den > limit {
            panic!("Basis coefficient does not fit in 64 bits");
        }
        Rational::from_reduced(self.num as i64, self.den as i64)
    }
}

/// Greatest common divisor, never zero for a nonzero argument.
const fn gcd(a: i128, b: i128) -> i128 {
    let mut a = a.unsigned_abs();
    let mut b = b.unsigned_abs();
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    if a == 0 { 1 } else { a as i128 }
}

const fn checked_mul(a: i128, b: i128) -> i128 {
    match a.checked_mul(b) {
        Some(v) => v,
        None => panic!("Basis derivation overflowed"),
    }
}

const fn checked_add(a: i128, b: i128) -> i128 {
    match a.checked_add(b) {
        Some(v) => v,
        None => panic!("Basis derivation overflowed"),
    }
}

/// p * (p - 1) * ... * (p - j + 1), which is zero for 0 <= p < j
pub(super) const fn falling(p: usize, j: usize) -> i128 {
    let mut acc: i128 = 1;
    let mut i = 0;
    while i < j {
        acc *= p as i128 - i as i128;
        i += 1;
    }
    acc
}

/// Taylor coefficients at zero of the Lagrange basis polynomials on the
/// integer stencil `-(order - 1)..=(order - 1)`.
///
/// Entry `[j][s]` is the coefficient of `x^j` in the basis polynomial that is
/// one at stencil point `s` (offset `s - (order - 1)`) and zero elsewhere,
/// for `j < order`.
const fn lagrange_taylor(order: usize) -> [[Wide; MAX_WIDTH]; MAX_WIDTH] {
    let half = order as i128 - 1;
    let npts = 2 * order - 1;
    let mut out = [[Wide::ZERO; MAX_WIDTH]; MAX_WIDTH];

    let mut s = 0;
    while s < npts {
        let node = s as i128 - half;

        // Numerator polynomial prod_{t != s} (x - node_t), lowest power first
        let mut poly = [0_i128; MAX_WIDTH];
        poly[0] = 1;
        let mut len = 1;
        let mut den: i128 = 1;

        let mut t = 0;
        while t < npts {
            if t != s {
                let other = t as i128 - half;
                let mut next = [0_i128; MAX_WIDTH];
                let mut i = 0;
                while i < len {
                    next[i + 1] += poly[i];
                    next[i] -= other * poly[i];
                    i += 1;
                }
                poly = next;
                len += 1;
                den = checked_mul(den, node - other);
            }
            t += 1;
        }

        let mut j = 0;
        while j < order {
            out[j][s] = Wide::new(poly[j], den);
            j += 1;
        }
        s += 1;
    }

    out
}

/// Inverse of the `order x order` matrix `B[j][q] = falling(order + q, j)`,
/// which maps the high polynomial coefficients to derivatives at `x = 1`.
const fn endpoint_inverse(order: usize) -> [[Wide; MAX_WIDTH]; MAX_WIDTH] {
    // Augmented [B | I], reduced in place by Gauss-Jordan elimination
    let mut aug = [[Wide::ZERO; MAX_WIDTH]; MAX_WIDTH];
    let mut j = 0;
    while j < order {
        let mut q = 0;
        while q < order {
            aug[j][q] = Wide::int(falling(order + q, j));
            q += 1;
        }
        aug[j][order + j] = Wide::int(1);
        j += 1;
    }

    let ncols = 2 * order;
    let mut c = 0;
    while c < order {
        let mut piv = c;
        while aug[piv][c].is_zero() {
            piv += 1;
            if piv == order {
                panic!("Singular endpoint system");
            }
        }
        if piv != c {
            let tmp = aug[c];
            aug[c] = aug[piv];
            aug[piv] = tmp;
        }

        let pivot = aug[c][c];
        let mut k = 0;
        while k < ncols {
            aug[c][k] = aug[c][k].over(pivot);
            k += 1;
        }

        let mut r = 0;
        while r < order {
            if r != c && !aug[r][c].is_zero() {
                let factor = aug[r][c];
                let mut k = 0;
                while k < ncols {
                    aug[r][k] = aug[r][k].minus(factor.times(aug[c][k]));
                    k += 1;
                }
            }
            r += 1;
        }
        c += 1;
    }

    let mut inv = [[Wide::ZERO; MAX_WIDTH]; MAX_WIDTH];
    let mut q = 0;
    while q < order {
        let mut j = 0;
        while j < order {
            inv[q][j] = aug[q][order + j];
            j += 1;
        }
        q += 1;
    }
    inv
}

/// Derive the basis matrix for one smoothness order.
///
/// Panics (at compile time, when used to build the table) for orders that
/// are zero, too wide for the fixed storage, or whose coefficients do not fit
/// in 64 bits.
pub(super) const fn derive_basis(order: usize) -> BasisMatrix {
    if order == 0 || 2 * order > MAX_WIDTH {
        panic!("Smoothness order out of range");
    }
    let width = 2 * order;
    let taylor = lagrange_taylor(order);
    let inv = endpoint_inverse(order);

    let mut m = [[Wide::ZERO; MAX_WIDTH]; MAX_WIDTH];

    // Low coefficients come straight from the estimates at x = 0,
    // which read sample rows 0..2S-1.
    let mut k = 0;
    while k + 1 < width {
        let mut p = 0;
        while p < order {
            m[k][p] = taylor[p][k];
            p += 1;
        }
        k += 1;
    }

    // High coefficients match the estimates at x = 1, which read sample rows 1..2S,
    // after removing what the low coefficients already contribute there.
    let mut k = 0;
    while k < width {
        let mut rhs = [Wide::ZERO; MAX_WIDTH];
        let mut j = 0;
        while j < order {
            let mut acc = if k >= 1 {
                taylor[j][k - 1].times(Wide::int(falling(j, j)))
            } else {
                Wide::ZERO
            };
            let mut p = 0;
            while p < order {
                acc = acc.minus(Wide::int(falling(p, j)).times(m[k][p]));
                p += 1;
            }
            rhs[j] = acc;
            j += 1;
        }

        let mut q = 0;
        while q < order {
            let mut acc = Wide::ZERO;
            let mut j = 0;
            while j < order {
                acc = acc.plus(inv[q][j].times(rhs[j]));
                j += 1;
            }
            m[k][order + q] = acc;
            q += 1;
        }
        k += 1;
    }

    let mut exact = [[Rational::ZERO; MAX_WIDTH]; MAX_WIDTH];
    let mut coefficients = [[0.0_f64; MAX_WIDTH]; MAX_WIDTH];
    let mut k = 0;
    while k < width {
        let mut p = 0;
        while p < width {
            let r = m[k][p].narrow();
            exact[k][p] = r;
            coefficients[k][p] = r.to_f64();
            p += 1;
        }
        k += 1;
    }

    BasisMatrix {
        order,
        exact,
        coefficients,
    }
}
