//! Elementary conformal maps and square-root branch selection.
//!
//! Every square root of a complex expression in this crate goes through
//! [`principal_branch_sqrt`], which names the half-plane the result must lie
//! in. Library defaults differ in how they treat the cut and signed zeros, and
//! a silently flipped branch tears the Loewner trace apart.
//!
//! | Map                         | Domain → image                 |
//! |-----------------------------|--------------------------------|
//! | `cayley_to_upper`           | unit disk → upper half-plane   |
//! | `cayley_from_upper`         | upper half-plane → unit disk   |
//! | `moebius_unit_disk`         | unit disk → unit disk          |
//! | `moebius_upper_half_plane`  | upper half-plane → itself      |

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::error::{SleError, SleResult};

/// Half-plane a square root is required to land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfPlane {
    /// `Re(√c) ≥ 0`, cut along the negative real axis. A signed zero
    /// imaginary part is read as `+0`, so negative reals map to `+i√|c|`.
    Right,
    /// `Im(√c) ≥ 0`, cut along the positive real axis. Positive reals map to
    /// `−√c`.
    Upper,
}

/// Square root of `c` on the branch lying in `half_plane`.
pub fn principal_branch_sqrt(c: Complex64, half_plane: HalfPlane) -> Complex64 {
    // `-0.0 + 0.0` is `+0.0`: both zeros on the cut pick the upper side
    let root = Complex64::new(c.re, c.im + 0.0).sqrt();
    match half_plane {
        HalfPlane::Right => root,
        HalfPlane::Upper => {
            if root.im > 0.0 {
                root
            } else {
                -root
            }
        }
    }
}

/// Principal square root with non-negative imaginary part.
pub fn principal_sqrt(x: Complex64) -> Complex64 {
    principal_branch_sqrt(x, HalfPlane::Upper)
}

/// Cayley map from the unit disk onto the upper half-plane.
pub fn cayley_to_upper(z: Complex64) -> Complex64 {
    Complex64::i() * (1.0 + z) / (1.0 - z)
}

/// Cayley map from the upper half-plane onto the unit disk.
pub fn cayley_from_upper(z: Complex64) -> Complex64 {
    (z - Complex64::i()) / (z + Complex64::i())
}

/// Möbius transformation `(a·z − b) / (c·z + d)` with real coefficients.
///
/// Fails when `a·b − c·d = 0`.
pub fn moebius_transformation(
    z: Complex64,
    a: f64,
    b: f64,
    c: f64,
    d: f64,
) -> SleResult<Complex64> {
    if a * b - c * d == 0.0 {
        return Err(SleError::InvalidParameter(
            "a proper Moebius transformation needs a*b - c*d != 0".to_string(),
        ));
    }
    Ok((a * z - b) / (c * z + d))
}

/// Automorphism of the unit disk sending `a` to the origin, followed by a
/// rotation through `theta·π` radians.
pub fn moebius_unit_disk(z: Complex64, theta: f64, a: Complex64) -> Complex64 {
    Complex64::from_polar(1.0, theta * PI) * (z - a) / (1.0 - a.conj() * z)
}

/// Möbius automorphism of the upper half-plane.
///
/// Fails unless `a·b − c·d > 0`.
pub fn moebius_upper_half_plane(
    z: Complex64,
    a: f64,
    b: f64,
    c: f64,
    d: f64,
) -> SleResult<Complex64> {
    if !(a * b - c * d > 0.0) {
        return Err(SleError::InvalidParameter(
            "a Moebius transformation of the upper half-plane needs a*b - c*d > 0".to_string(),
        ));
    }
    Ok((a * z - b) / (c * z + d))
}
