//! CGMath extension traits.

use cgmath::{InnerSpace, Vector2};

/// 2D vector extensions.
pub trait Vector2Ext {
    /// Rotates by 90° counter-clockwise (in a y-up frame).
    fn perp(self) -> Self;

    /// Normalizes, returning zero for zero-length (or non-finite) vectors instead of NaN.
    fn normalize_or_zero(self) -> Self;

    /// Whether `self` points to the left of (counter-clockwise from) `other`.
    fn is_left_of(self, other: Self) -> bool;

    /// Whether both components are finite.
    fn is_finite(self) -> bool;

    /// Distance to another point.
    fn distance_to(self, other: Self) -> f32;
}

impl Vector2Ext for Vector2<f32> {
    fn perp(self) -> Vector2<f32> {
        Vector2::new(-self.y, self.x)
    }

    fn normalize_or_zero(self) -> Vector2<f32> {
        let len = self.magnitude();
        if len > 0. && len.is_finite() {
            self / len
        } else {
            Vector2::new(0., 0.)
        }
    }

    fn is_left_of(self, other: Vector2<f32>) -> bool {
        other.perp_dot(self) > 0.
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    fn distance_to(self, other: Vector2<f32>) -> f32 {
        (other - self).magnitude()
    }
}

#[test]
fn left_of() {
    let x = Vector2::new(1., 0.);
    let y = Vector2::new(0., 1.);
    assert!(y.is_left_of(x));
    assert!(!x.is_left_of(y));
    assert_eq!(x.perp(), y);
    assert_eq!(Vector2::new(0., 0.).normalize_or_zero(), Vector2::new(0., 0.));
}
