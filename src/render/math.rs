//! Geometry helpers shared by the fill and stroke builders.
//!
//! All angles and orientations assume a y-up frame: a positive cross product means a
//! counter-clockwise turn. With a y-down output the visual sense flips, but every builder only
//! relies on the sign being consistent.

use crate::data::cgmath_ext::Vector2Ext;
use cgmath::{InnerSpace, Vector2};
use std::f32::consts::{FRAC_PI_2, PI};

/// Outcome of intersecting two line segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineIntersection {
    /// The segments are parallel and lie on different lines.
    Parallel,

    /// The segments lie on the same line.
    Coincident,

    /// The supporting lines cross outside of at least one segment.
    NotIntersecting,

    /// The segments cross at the given point.
    Intersecting(Vector2<f32>),
}

fn is_degenerate_denominator(denom: f32, a: Vector2<f32>, b: Vector2<f32>) -> bool {
    denom.abs() <= 1e-6 * a.magnitude() * b.magnitude() || !denom.is_finite()
}

/// Intersects segments `a0`–`a1` and `b0`–`b1` using the determinant formula.
pub fn intersect_segments(
    a0: Vector2<f32>,
    a1: Vector2<f32>,
    b0: Vector2<f32>,
    b1: Vector2<f32>,
) -> LineIntersection {
    let da = a1 - a0;
    let db = b1 - b0;
    let diff = b0 - a0;
    let denom = da.perp_dot(db);
    let num_a = diff.perp_dot(db);
    let num_b = diff.perp_dot(da);

    if is_degenerate_denominator(denom, da, db) {
        if is_degenerate_denominator(num_b, diff, da) {
            return LineIntersection::Coincident;
        }
        return LineIntersection::Parallel;
    }

    let ua = num_a / denom;
    let ub = num_b / denom;
    if ua >= 0. && ua <= 1. && ub >= 0. && ub <= 1. {
        LineIntersection::Intersecting(a0 + da * ua)
    } else {
        LineIntersection::NotIntersecting
    }
}

/// Intersects the infinite line through `p` along `d` with the one through `q` along `e`.
///
/// Returns `None` for (near-)parallel lines.
pub fn intersect_lines(
    p: Vector2<f32>,
    d: Vector2<f32>,
    q: Vector2<f32>,
    e: Vector2<f32>,
) -> Option<Vector2<f32>> {
    let denom = d.perp_dot(e);
    if is_degenerate_denominator(denom, d, e) {
        return None;
    }
    let t = (q - p).perp_dot(e) / denom;
    let point = p + d * t;
    if point.is_finite() {
        Some(point)
    } else {
        None
    }
}

/// Orientation of three consecutive points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
    Collinear,
}

/// Orientation of the turn `a` → `b` → `c`, from the sign of the 2D cross product.
pub fn winding(a: Vector2<f32>, b: Vector2<f32>, c: Vector2<f32>) -> Winding {
    let cross = (b - a).perp_dot(c - b);
    if cross > 0. {
        Winding::CounterClockwise
    } else if cross < 0. {
        Winding::Clockwise
    } else {
        Winding::Collinear
    }
}

/// Signed area of a closed polygon; positive when counter-clockwise.
pub fn signed_area(points: &[Vector2<f32>]) -> f32 {
    let mut area = 0.;
    if let Some(&last) = points.last() {
        let mut prev = last;
        for &p in points {
            area += prev.perp_dot(p);
            prev = p;
        }
    }
    area / 2.
}

/// Whether a closed polygon is convex and simple, i.e. safe to fill with a single fan.
///
/// Collinear vertices are allowed. Star polygons turn consistently but wind more than once, so
/// the total turning angle is checked as well.
pub fn is_convex(points: &[Vector2<f32>]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }

    let mut sign = 0.;
    let mut turning = 0.;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let d_in = b - a;
        let d_out = c - b;
        if d_in.magnitude2() == 0. || d_out.magnitude2() == 0. {
            continue;
        }

        let cross = d_in.perp_dot(d_out);
        if cross != 0. {
            if sign == 0. {
                sign = cross.signum();
            } else if sign != cross.signum() {
                return false;
            }
        } else if d_in.dot(d_out) < 0. {
            // doubles back on itself
            return false;
        }
        turning += cross.atan2(d_in.dot(d_out));
    }

    sign != 0. && (turning.abs() - 2. * PI).abs() < 1e-2
}

/// Drops consecutive duplicate points, and for closed paths a last point equal to the first.
pub fn dedup_points(points: &[Vector2<f32>], closed: bool) -> Vec<Vector2<f32>> {
    let mut out: Vec<Vector2<f32>> = Vec::with_capacity(points.len());
    for &p in points {
        if !p.is_finite() {
            continue;
        }
        if out.last().map_or(true, |last| (p - *last).magnitude2() > 1e-12) {
            out.push(p);
        }
    }
    if closed && out.len() > 1 && (out[0] - out[out.len() - 1]).magnitude2() <= 1e-12 {
        out.pop();
    }
    out
}

/// Per-axis output scale of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    pub x: f32,
    pub y: f32,
}

impl AxisScale {
    pub fn new(x: f32, y: f32) -> AxisScale {
        AxisScale {
            x: x.abs(),
            y: y.abs(),
        }
    }

    pub fn max(&self) -> f32 {
        self.x.max(self.y)
    }

    /// Whether both factors are usable for tessellation.
    pub fn is_valid(&self) -> bool {
        self.x > 0. && self.y > 0. && self.x.is_finite() && self.y.is_finite()
    }

    /// Output length of a unit local vector pointing along `dir`.
    ///
    /// Interpolates between the x and y scale by the direction's angle to each axis:
    /// `(2/π)·(sx·angle_to_y + sy·angle_to_x)`.
    pub fn length_scale(&self, dir: Vector2<f32>) -> f32 {
        let angle_to_x = dir.y.abs().atan2(dir.x.abs());
        let angle_to_y = FRAC_PI_2 - angle_to_x;
        (2. / PI) * (self.x * angle_to_y + self.y * angle_to_x)
    }

    /// Factor applied to a local offset along `dir` so that it covers the same output distance
    /// as it would along the most-scaled axis.
    pub fn correction(&self, dir: Vector2<f32>) -> f32 {
        let length_scale = self.length_scale(dir);
        if length_scale > 0. {
            self.max() / length_scale
        } else {
            1.
        }
    }

    /// Converts a distance in output pixels along `dir` to local units.
    pub fn to_local(&self, dir: Vector2<f32>, pixels: f32) -> f32 {
        let length_scale = self.length_scale(dir);
        if length_scale > 0. {
            pixels / length_scale
        } else {
            0.
        }
    }
}

impl From<Vector2<f32>> for AxisScale {
    fn from(v: Vector2<f32>) -> AxisScale {
        AxisScale::new(v.x, v.y)
    }
}

/// Anti-aliasing offsets along a unit `normal` for an edge at local distance `edge` from the
/// path: the solid core distance (never negative) and the transparent fade distance.
pub fn aa_offsets(
    normal: Vector2<f32>,
    edge: f32,
    scale: &AxisScale,
    core_px: f32,
    fade_px: f32,
) -> (f32, f32) {
    let core = (edge + scale.to_local(normal, core_px)).max(0.);
    let fade = edge + scale.to_local(normal, fade_px);
    (core, fade)
}

/// Point on the miter of two offset lines, or `None` if they do not meet.
///
/// `p` is the shared vertex; the first line runs along `d_in` offset by `off_in`, the second
/// along `d_out` offset by `off_out`.
pub fn offset_corner(
    p: Vector2<f32>,
    d_in: Vector2<f32>,
    off_in: Vector2<f32>,
    d_out: Vector2<f32>,
    off_out: Vector2<f32>,
) -> Option<Vector2<f32>> {
    intersect_lines(p + off_in, d_in, p + off_out, d_out)
}

/// Merges two fade offsets at a corner into one point.
///
/// If the incoming and outgoing fade lines meet, returns their intersection; otherwise falls
/// back to the averaged offset.
pub fn merged_fade_point(
    p: Vector2<f32>,
    d_in: Vector2<f32>,
    off_in: Vector2<f32>,
    d_out: Vector2<f32>,
    off_out: Vector2<f32>,
) -> Vector2<f32> {
    offset_corner(p, d_in, off_in, d_out, off_out).unwrap_or_else(|| {
        let avg = (off_in + off_out) / 2.;
        p + avg.normalize_or_zero() * off_in.magnitude().max(off_out.magnitude())
    })
}
