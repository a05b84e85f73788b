use crate::SwError;

/// Floating point type used throughout system
pub type Real = f64;

/// A full turn in radians.
pub const TAU: Real = std::f64::consts::TAU;

/// Angles closer than this are treated as coincident.
pub const ANGLE_EPSILON: Real = 1e-12;

/// Reject NaN and infinities in a configured quantity named `what`.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, SwError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SwError::NonFinite { what, value: v })
    }
}

/// Weight used for slice sizing: only finite, strictly positive costs count.
#[inline]
pub fn positive_weight(v: Real) -> Real {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: Real, b: Real, t: Real) -> Real {
    a + (b - a) * t
}
