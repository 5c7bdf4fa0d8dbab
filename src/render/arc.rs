//! Arc tessellation.
//!
//! Arcs are approximated by chords of roughly constant output length. Successive points are
//! produced by rotating the previous offset with the tangential/radial factor method instead of
//! calling `sin`/`cos` per point, which accumulates a little error over long arcs.

use crate::data::cgmath_ext::Vector2Ext;
use crate::render::TessOptions;
use cgmath::Vector2;
use std::f32::consts::PI;

/// Smallest angle step, bounding the point count of huge radii.
const MIN_STEP: f32 = 2. * PI / 4096.;

/// Angle subtended by one chord on an arc of the given local radius.
///
/// `θ = acos(1 - segment_length / radius)` where the segment length is the configured output
/// length divided by `max_scale`.
pub fn arc_step(radius: f32, max_scale: f32, options: &TessOptions) -> f32 {
    let segment_length = options.arc_segment_length / max_scale;
    let cos = (1. - segment_length / radius).max(-1.).min(1.);
    cos.acos().max(MIN_STEP)
}

/// Number of chords used for an arc spanning `angle` radians (sign ignored).
///
/// Zero for empty arcs and non-positive radii.
pub fn segment_count(radius: f32, angle: f32, max_scale: f32, options: &TessOptions) -> usize {
    let angle = angle.abs();
    if !(radius > 0.) || !(angle > 0.) || !(max_scale > 0.) {
        return 0;
    }
    let step = arc_step(radius, max_scale, options);
    ((angle / step).ceil() as usize).max(1)
}

/// Rotates `v` by the angle whose tangent and cosine are given.
fn rotate(v: Vector2<f32>, tangent: f32, radial: f32) -> Vector2<f32> {
    (v + v.perp() * tangent) * radial
}

/// Unit directions along an arc starting at `start` (a unit vector) and sweeping `angle`
/// radians, counter-clockwise for positive angles. Both ends are included; the last direction is
/// exact.
pub fn arc_directions(
    start: Vector2<f32>,
    angle: f32,
    radius: f32,
    max_scale: f32,
    options: &TessOptions,
) -> Vec<Vector2<f32>> {
    let count = segment_count(radius, angle, max_scale, options);
    let mut dirs = Vec::with_capacity(count + 1);
    dirs.push(start);
    if count == 0 {
        return dirs;
    }

    let step = angle / count as f32;
    let (tangent, radial) = (step.tan(), step.cos());
    let mut dir = start;
    for _ in 1..count {
        dir = rotate(dir, tangent, radial);
        dirs.push(dir);
    }

    let (sin, cos) = angle.sin_cos();
    dirs.push(Vector2::new(
        start.x * cos - start.y * sin,
        start.x * sin + start.y * cos,
    ));
    dirs
}

/// Points of a full circle, starting at angle 0 and going counter-clockwise, without repeating
/// the first point.
pub fn circle_points(
    center: Vector2<f32>,
    radius: f32,
    max_scale: f32,
    options: &TessOptions,
) -> Vec<Vector2<f32>> {
    let count = segment_count(radius, 2. * PI, max_scale, options);
    if count == 0 {
        return Vec::new();
    }
    let count = count.max(options.min_circle_points).max(3);

    let step = 2. * PI / count as f32;
    let (tangent, radial) = (step.tan(), step.cos());
    let mut offset = Vector2::new(radius, 0.);
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        points.push(center + offset);
        offset = rotate(offset, tangent, radial);
    }
    points
}
