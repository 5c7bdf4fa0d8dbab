//! 2D affine transforms.

use cgmath::{Matrix3, Matrix4, SquareMatrix, Vector2, Vector3};

/// A 2D affine transform stored as a 3×3 matrix acting on column vectors `(x, y, 1)`.
///
/// In the usual `(a, b, c, d, e, f)` notation the matrix is
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(pub Matrix3<f32>);

impl Transform {
    pub fn identity() -> Transform {
        Transform(Matrix3::identity())
    }

    /// Creates a transform from its six affine components.
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Transform {
        Transform(Matrix3::new(a, b, 0., c, d, 0., e, f, 1.))
    }

    pub fn from_translation(x: f32, y: f32) -> Transform {
        Transform::new(1., 0., 0., 1., x, y)
    }

    pub fn from_scale(x: f32, y: f32) -> Transform {
        Transform::new(x, 0., 0., y, 0., 0.)
    }

    /// Counter-clockwise rotation (in a y-up frame) by the given angle in radians.
    pub fn from_rotation(angle: f32) -> Transform {
        let (sin, cos) = angle.sin_cos();
        Transform::new(cos, sin, -sin, cos, 0., 0.)
    }

    /// Returns the six affine components `(a, b, c, d, e, f)`.
    pub fn components(&self) -> [f32; 6] {
        let m = &self.0;
        [m.x.x, m.x.y, m.y.x, m.y.y, m.z.x, m.z.y]
    }

    /// Returns a transform that applies `self` first and then `other`.
    pub fn then(&self, other: &Transform) -> Transform {
        Transform(other.0 * self.0)
    }

    pub fn transform_point(&self, point: Vector2<f32>) -> Vector2<f32> {
        let p = self.0 * Vector3::new(point.x, point.y, 1.);
        Vector2::new(p.x, p.y)
    }

    /// Per-axis scale factors: how far the transform stretches the local x and y axes, i.e. the
    /// lengths of the two columns `(a, b)` and `(c, d)` of the linear part.
    pub fn axis_scale(&self) -> Vector2<f32> {
        let [a, b, c, d, _, _] = self.components();
        Vector2::new((a * a + b * b).sqrt(), (c * c + d * d).sqrt())
    }

    /// Embeds this transform in a 4×4 matrix: the linear part goes into the XY block and the
    /// translation into the last column (the last row in memory order), leaving Z untouched.
    pub fn to_matrix4(&self) -> Matrix4<f32> {
        let [a, b, c, d, e, f] = self.components();
        Matrix4::new(
            a, b, 0., 0., //
            c, d, 0., 0., //
            0., 0., 1., 0., //
            e, f, 0., 1.,
        )
    }
}

impl Default for Transform {
    fn default() -> Transform {
        Transform::identity()
    }
}

#[test]
fn composition_order() {
    let t = Transform::from_translation(10., 0.).then(&Transform::from_scale(2., 3.));
    let p = t.transform_point(Vector2::new(1., 1.));
    assert_eq!(p, Vector2::new(22., 3.));

    let t = Transform::from_scale(2., 3.).then(&Transform::from_translation(10., 0.));
    let p = t.transform_point(Vector2::new(1., 1.));
    assert_eq!(p, Vector2::new(12., 3.));
}

#[test]
fn axis_scale_follows_local_axes() {
    use std::f32::consts::FRAC_PI_2;

    // a rotation applied afterwards doesn't change how much each local axis is stretched
    let t = Transform::from_scale(2., 5.).then(&Transform::from_rotation(FRAC_PI_2));
    let scale = t.axis_scale();
    assert!((scale.x - 2.).abs() < 1e-5);
    assert!((scale.y - 5.).abs() < 1e-5);

    // rotating first sends local x onto the screen y axis
    let t = Transform::from_rotation(FRAC_PI_2).then(&Transform::from_scale(2., 5.));
    let scale = t.axis_scale();
    assert!((scale.x - 5.).abs() < 1e-5);
    assert!((scale.y - 2.).abs() < 1e-5);
}

#[test]
fn matrix4_embedding() {
    let m = Transform::new(1., 2., 3., 4., 5., 6.).to_matrix4();
    let cols: [[f32; 4]; 4] = m.into();
    assert_eq!(
        cols,
        [
            [1., 2., 0., 0.],
            [3., 4., 0., 0.],
            [0., 0., 1., 0.],
            [5., 6., 0., 1.]
        ]
    );
}
