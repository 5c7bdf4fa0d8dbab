//! Fill tessellation.
//!
//! Convex outlines are filled with a triangle fan anchored at the first point. Anything else
//! (concave or self-intersecting outlines) is drawn with stencil coverage: the same fan is
//! rendered into a coverage buffer resolved by the fill rule, and a single quad covering the
//! bounding box then paints the covered pixels.

use crate::data::cgmath_ext::Vector2Ext;
use crate::data::{Color, FillRule};
use crate::render::math::{self, AxisScale};
use crate::render::{GeometryBuffer, TessOptions};
use cgmath::{InnerSpace, Vector2};

/// Number of vertices of the covering quad appended after stencil coverage.
pub const COVER_VERTEX_COUNT: usize = 6;

/// Fills a convex outline with the fan `(p0, pi, pi+1)`. Returns the number of triangles.
pub fn fill_fan<B: GeometryBuffer>(out: &mut B, points: &[Vector2<f32>], color: Color) -> usize {
    if points.len() < 3 {
        return 0;
    }
    let p0 = points[0];
    for i in 1..points.len() - 1 {
        out.push_triangle((p0, color), (points[i], color), (points[i + 1], color));
    }
    points.len() - 2
}

/// Axis-aligned bounds of a point list.
pub fn bounds(points: &[Vector2<f32>]) -> Option<(Vector2<f32>, Vector2<f32>)> {
    let first = *points.first()?;
    Some(points.iter().fold((first, first), |(min, max), p| {
        (
            Vector2::new(min.x.min(p.x), min.y.min(p.y)),
            Vector2::new(max.x.max(p.x), max.y.max(p.y)),
        )
    }))
}

/// Fills an arbitrary outline using stencil coverage.
///
/// Switches `out` to stencil mode, appends the coverage fan and then the covering quad. Returns
/// the number of triangles, including the quad.
pub fn fill_stencil<B: GeometryBuffer>(
    out: &mut B,
    points: &[Vector2<f32>],
    rule: FillRule,
    color: Color,
) -> usize {
    let (min, max) = match bounds(points) {
        Some(bounds) if points.len() >= 3 => bounds,
        _ => return 0,
    };

    out.set_stencil(rule, COVER_VERTEX_COUNT);
    let coverage = fill_fan(out, points, color);

    let tl = min;
    let tr = Vector2::new(max.x, min.y);
    let br = max;
    let bl = Vector2::new(min.x, max.y);
    out.push_triangle((tl, color), (tr, color), (br, color));
    out.push_triangle((tl, color), (br, color), (bl, color));
    coverage + 2
}

/// Appends an alpha-faded border around a closed outline and returns the solid ring it fades
/// from, along with the number of triangles.
///
/// The border fades to transparent half an output pixel outside of the outline. With `inset`, it
/// also starts half a pixel inside, and the returned ring is the outline shrunk by that much; the
/// caller fills that ring instead of the outline so the two don't overlap. Without `inset`, the
/// ring is the outline itself.
///
/// Corners use the merged (miter-style) point of their two edges, blunted to the averaged normal
/// when sharper than the fringe miter limit.
pub fn fill_fringe<B: GeometryBuffer>(
    out: &mut B,
    points: &[Vector2<f32>],
    color: Color,
    scale: &AxisScale,
    options: &TessOptions,
    inset: bool,
) -> (Vec<Vector2<f32>>, usize) {
    let points = math::dedup_points(points, true);
    let n = points.len();
    if n < 3 {
        return (points, 0);
    }

    // outward is to the right of counter-clockwise outlines
    let outward_sign = if math::signed_area(&points) >= 0. {
        -1.
    } else {
        1.
    };
    let core_px = if inset { options.aa_core_offset } else { 0. };

    let mut dirs = Vec::with_capacity(n);
    let mut core_offsets = Vec::with_capacity(n);
    let mut fade_offsets = Vec::with_capacity(n);
    for i in 0..n {
        let dir = (points[(i + 1) % n] - points[i]).normalize_or_zero();
        let normal = dir.perp() * outward_sign;
        dirs.push(dir);
        core_offsets.push(normal * scale.to_local(normal, core_px));
        fade_offsets.push(normal * scale.to_local(normal, options.aa_fade_offset));
    }

    let cores = offset_ring(&points, &dirs, &core_offsets, options.fringe_miter_limit);
    let fades = offset_ring(&points, &dirs, &fade_offsets, options.fringe_miter_limit);

    let clear = color.transparent();
    for i in 0..n {
        let j = (i + 1) % n;
        out.push_triangle((cores[i], color), (fades[i], clear), (fades[j], clear));
        out.push_triangle((cores[i], color), (fades[j], clear), (cores[j], color));
    }
    (cores, 2 * n)
}

/// Offsets every vertex of a closed outline by the offsets of its two adjacent edges.
fn offset_ring(
    points: &[Vector2<f32>],
    dirs: &[Vector2<f32>],
    offsets: &[Vector2<f32>],
    miter_limit: f32,
) -> Vec<Vector2<f32>> {
    let n = points.len();
    (0..n)
        .map(|i| {
            let p = points[i];
            let prev = (i + n - 1) % n;
            let (off_in, off_out) = (offsets[prev], offsets[i]);
            let reach = off_in.magnitude().max(off_out.magnitude());
            let merged = math::merged_fade_point(p, dirs[prev], off_in, dirs[i], off_out);
            if merged.distance_to(p) <= miter_limit * reach {
                merged
            } else {
                p + (off_in + off_out).normalize_or_zero() * reach
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::VertexBuffer;

    fn square() -> Vec<Vector2<f32>> {
        vec![
            Vector2::new(0., 0.),
            Vector2::new(10., 0.),
            Vector2::new(10., 10.),
            Vector2::new(0., 10.),
        ]
    }

    #[test]
    fn fan_triangle_count() {
        let mut buf = VertexBuffer::new();
        assert_eq!(fill_fan(&mut buf, &square(), Color::BLACK), 2);
        assert_eq!(buf.vertices.len(), 6);
        assert_eq!(buf.vertices[0].xy(), Vector2::new(0., 0.));
        assert_eq!(buf.vertices[3].xy(), Vector2::new(0., 0.));

        let mut buf = VertexBuffer::new();
        assert_eq!(fill_fan(&mut buf, &square()[..2], Color::BLACK), 0);
        assert!(buf.vertices.is_empty());
    }

    #[test]
    fn stencil_fill_ends_with_cover_quad() {
        let bowtie = vec![
            Vector2::new(0., 0.),
            Vector2::new(10., 10.),
            Vector2::new(10., 0.),
            Vector2::new(0., 10.),
        ];
        let mut buf = VertexBuffer::new();
        let tris = fill_stencil(&mut buf, &bowtie, FillRule::EvenOdd, Color::WHITE);
        assert_eq!(tris, 4);
        assert_eq!(buf.stencil.map(|s| s.rule), Some(FillRule::EvenOdd));
        assert_eq!(buf.coverage_vertices().len(), 6);

        let (min, max) = bounds(&bowtie).unwrap();
        for v in buf.cover_vertices() {
            let p = v.xy();
            assert!(p.x == min.x || p.x == max.x);
            assert!(p.y == min.y || p.y == max.y);
        }
    }

    #[test]
    fn fringe_straddles_the_outline() {
        let scale = AxisScale::new(1., 1.);
        let opts = TessOptions::default();
        let mut pts = square();
        for _ in 0..2 {
            let mut buf = VertexBuffer::new();
            let (ring, tris) = fill_fringe(&mut buf, &pts, Color::BLACK, &scale, &opts, true);
            assert_eq!(tris, 8);
            for p in &ring {
                assert!((p.x - 0.5).abs() < 1e-5 || (p.x - 9.5).abs() < 1e-5);
                assert!((p.y - 0.5).abs() < 1e-5 || (p.y - 9.5).abs() < 1e-5);
            }
            for v in &buf.vertices {
                let p = v.xy();
                if v.color.a == 0. {
                    // corners are mitered: 0.5 out on both axes
                    assert!(p.x < 0. || p.x > 10. || p.y < 0. || p.y > 10.);
                    assert!(p.x >= -0.51 && p.x <= 10.51 && p.y >= -0.51 && p.y <= 10.51);
                } else {
                    assert!(p.x >= 0.49 && p.x <= 9.51 && p.y >= 0.49 && p.y <= 9.51);
                }
            }
            // the other winding must produce the same fringe
            pts.reverse();
        }
    }

    #[test]
    fn fringe_without_inset_starts_at_the_outline() {
        let scale = AxisScale::new(2., 2.);
        let opts = TessOptions::default();
        let mut buf = VertexBuffer::new();
        let (ring, tris) = fill_fringe(&mut buf, &square(), Color::BLACK, &scale, &opts, false);
        assert_eq!(tris, 8);
        assert_eq!(ring, square());
        for v in buf.vertices.iter().filter(|v| v.color.a > 0.) {
            assert!(square().contains(&v.xy()));
        }
    }
}
