//! Stroke tessellator.
//!
//! A stroke is built by walking its point list once. Every vertex yields either a linecap (open
//! path ends) or a linejoin, each returning the [`EdgePair`] where the straight stroke body
//! starts or ends; consecutive edge pairs are then bridged with [`StrokeBuilder::connect`]. The
//! only state carried along the walk is the previous edge pair.
//!
//! With anti-aliasing enabled every edge point has two positions: a solid core slightly inside
//! the nominal edge and a transparent fade point slightly outside it. The band in between is
//! filled with quads fading from the stroke color to transparent.
//!
//! ```text
//!   left   L0 ---------- L1            left/right are relative to the
//!          |  \          |             walking direction
//!   --->   |    \        |
//!          |      \      |
//!   right  R0 ---------- R1
//!        previous      next
//!        edge pair     edge pair
//! ```

use crate::data::cgmath_ext::Vector2Ext;
use crate::data::{Color, LineCap, LineJoin, PaintStyle};
use crate::render::math::{self, AxisScale, LineIntersection, Winding};
use crate::render::{arc, GeometryBuffer, TessOptions};
use cgmath::{InnerSpace, Vector2};
use std::f32::consts::PI;

/// A point on one side of the stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePoint {
    /// Solid edge position.
    pub core: Vector2<f32>,

    /// Transparent twin further outward, when anti-aliasing.
    pub fade: Option<Vector2<f32>>,
}

/// The two sides of the stroke across one path position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePair {
    pub left: EdgePoint,
    pub right: EdgePoint,
}

/// Edge pairs produced by a linejoin: where the incoming body ends and where the outgoing body
/// starts. They are equal for miters and straight joins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinEdges {
    pub incoming: EdgePair,
    pub outgoing: EdgePair,
}

/// Which end of an open path a cap terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapPosition {
    Start,
    End,
}

/// Stroke parameters resolved from a paint style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub half_width: f32,
    pub linecap: LineCap,
    pub linejoin: LineJoin,
    pub miter_limit: f32,
    pub color: Color,
}

impl StrokeStyle {
    /// Returns `None` if the paint has no visible stroke.
    pub fn from_paint(paint: &PaintStyle) -> Option<StrokeStyle> {
        let color = paint.stroke_color()?;
        Some(StrokeStyle {
            half_width: paint.half_width(),
            linecap: paint.linecap,
            linejoin: paint.linejoin,
            miter_limit: paint.miter_limit,
            color,
        })
    }
}

/// Counts of what a stroke produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrokeSummary {
    pub caps: usize,
    pub joins: usize,
    /// Miter joins that exceeded the miter limit and were beveled.
    pub miter_fallbacks: usize,
    /// Chords emitted for round joins and caps.
    pub arc_segments: usize,
    /// Fade bands collapsed to one triangle because their fade offsets crossed.
    pub fade_merges: usize,
    pub triangles: usize,
}

/// Emits stroke geometry into a buffer.
pub struct StrokeBuilder<'a, B: GeometryBuffer> {
    out: &'a mut B,
    style: StrokeStyle,
    scale: AxisScale,
    anti_aliasing: bool,
    options: &'a TessOptions,
    summary: StrokeSummary,
}

impl<'a, B: GeometryBuffer> StrokeBuilder<'a, B> {
    pub fn new(
        out: &'a mut B,
        style: StrokeStyle,
        scale: AxisScale,
        anti_aliasing: bool,
        options: &'a TessOptions,
    ) -> StrokeBuilder<'a, B> {
        StrokeBuilder {
            out,
            style,
            scale,
            anti_aliasing,
            options,
            summary: StrokeSummary::default(),
        }
    }

    pub fn summary(&self) -> StrokeSummary {
        self.summary
    }

    pub fn finish(self) -> StrokeSummary {
        self.summary
    }

    /// Local distance from the path to the stroke edge along a unit normal.
    fn edge_distance(&self, normal: Vector2<f32>) -> f32 {
        self.style.half_width * self.scale.correction(normal)
    }

    /// Core and (optional) fade distances along a unit normal.
    fn rim(&self, normal: Vector2<f32>) -> (f32, Option<f32>) {
        let edge = self.edge_distance(normal);
        if self.anti_aliasing {
            let (core, fade) = math::aa_offsets(
                normal,
                edge,
                &self.scale,
                self.options.aa_core_offset,
                self.options.aa_fade_offset,
            );
            (core, Some(fade))
        } else {
            (edge, None)
        }
    }

    /// The edge point at `p` on the side `normal` points to.
    fn side_point(&self, p: Vector2<f32>, normal: Vector2<f32>) -> EdgePoint {
        let (core, fade) = self.rim(normal);
        EdgePoint {
            core: p + normal * core,
            fade: fade.map(|fade| p + normal * fade),
        }
    }

    /// A straight edge across `p`; `normal` points to the left side.
    fn straight_edge(&self, p: Vector2<f32>, normal: Vector2<f32>) -> EdgePair {
        EdgePair {
            left: self.side_point(p, normal),
            right: self.side_point(p, -normal),
        }
    }

    /// Single edge point where the offset lines of two segments meet on one side.
    ///
    /// `n_in` and `n_out` are the unit normals pointing to that side. Fade twins are merged
    /// into one miter-style point.
    fn corner_point(
        &self,
        p: Vector2<f32>,
        d_in: Vector2<f32>,
        n_in: Vector2<f32>,
        d_out: Vector2<f32>,
        n_out: Vector2<f32>,
    ) -> Option<EdgePoint> {
        let (core_in, fade_in) = self.rim(n_in);
        let (core_out, fade_out) = self.rim(n_out);
        let core = math::offset_corner(p, d_in, n_in * core_in, d_out, n_out * core_out)?;
        let fade = match (fade_in, fade_out) {
            (Some(fade_in), Some(fade_out)) => Some(math::merged_fade_point(
                p,
                d_in,
                n_in * fade_in,
                d_out,
                n_out * fade_out,
            )),
            _ => None,
        };
        Some(EdgePoint { core, fade })
    }

    fn triangle(&mut self, a: (Vector2<f32>, Color), b: (Vector2<f32>, Color), c: (Vector2<f32>, Color)) {
        self.out.push_triangle(a, b, c);
        self.summary.triangles += 1;
    }

    /// Fade band between two edge points on the same side.
    ///
    /// If the two fade offsets converge far enough to cross, the band collapses to a single
    /// triangle through their crossing point.
    fn fade_band(&mut self, a: EdgePoint, b: EdgePoint, converging: bool) {
        let (fade_a, fade_b) = match (a.fade, b.fade) {
            (Some(fade_a), Some(fade_b)) => (fade_a, fade_b),
            _ => return,
        };
        let solid = self.style.color;
        let clear = solid.transparent();

        if converging {
            if let LineIntersection::Intersecting(merged) =
                math::intersect_segments(a.core, fade_a, b.core, fade_b)
            {
                self.summary.fade_merges += 1;
                self.triangle((a.core, solid), (merged, clear), (b.core, solid));
                return;
            }
        }

        self.triangle((a.core, solid), (fade_a, clear), (fade_b, clear));
        self.triangle((a.core, solid), (fade_b, clear), (b.core, solid));
    }

    /// Fans solid triangles from `pivot` over a chain of edge points, with fade bands along the
    /// chain.
    fn fan(&mut self, pivot: Vector2<f32>, chain: &[EdgePoint]) {
        let solid = self.style.color;
        for pair in chain.windows(2) {
            self.triangle((pivot, solid), (pair[0].core, solid), (pair[1].core, solid));
            self.fade_band(pair[0], pair[1], false);
        }
    }

    /// Edge points along an arc around `center`, from `start` sweeping `sweep` radians.
    fn arc_chain(&mut self, center: Vector2<f32>, start: Vector2<f32>, sweep: f32) -> Vec<EdgePoint> {
        let radius = self.edge_distance(start);
        let dirs = arc::arc_directions(start, sweep, radius, self.scale.max(), self.options);
        self.summary.arc_segments += dirs.len().saturating_sub(1);
        dirs.into_iter()
            .map(|dir| self.side_point(center, dir))
            .collect()
    }

    /// Bridges two consecutive edge pairs with the stroke body.
    pub fn connect(&mut self, a: &EdgePair, b: &EdgePair) {
        let solid = self.style.color;
        self.triangle((a.left.core, solid), (a.right.core, solid), (b.right.core, solid));
        self.triangle((a.left.core, solid), (b.right.core, solid), (b.left.core, solid));

        let offset = |p: EdgePoint| p.fade.map(|fade| fade - p.core);
        if let (Some(ua), Some(ub)) = (offset(a.left), offset(b.left)) {
            self.fade_band(a.left, b.left, ub.is_left_of(ua));
        }
        if let (Some(ua), Some(ub)) = (offset(a.right), offset(b.right)) {
            self.fade_band(a.right, b.right, ua.is_left_of(ub));
        }
    }

    /// Terminates an open path at `p`. `dir` is the unit path direction at that end.
    ///
    /// Returns the edge pair the stroke body attaches to.
    pub fn cap(&mut self, p: Vector2<f32>, dir: Vector2<f32>, position: CapPosition) -> EdgePair {
        self.summary.caps += 1;
        let normal = dir.perp();
        let outward = match position {
            CapPosition::Start => -dir,
            CapPosition::End => dir,
        };

        if self.style.linecap == LineCap::Round {
            let edge = self.straight_edge(p, normal);
            // start caps sweep from left to right around the back, end caps from right to left
            // around the front
            let (from, to, start) = match position {
                CapPosition::Start => (edge.left, edge.right, normal),
                CapPosition::End => (edge.right, edge.left, -normal),
            };
            let mut chain = self.arc_chain(p, start, PI);
            let last = chain.len() - 1;
            chain[0] = from;
            chain[last] = to;
            self.fan(p, &chain);
            return edge;
        }

        let base = match self.style.linecap {
            LineCap::Square => p + outward * self.edge_distance(outward),
            _ => p,
        };

        if !self.anti_aliasing {
            return self.straight_edge(base, normal);
        }

        let inset = self.scale.to_local(outward, -self.options.aa_core_offset).max(0.);
        let reach = self.scale.to_local(outward, self.options.aa_fade_offset);
        let edge = self.straight_edge(base - outward * inset, normal);
        if let (Some(left_fade), Some(right_fade)) = (edge.left.fade, edge.right.fade) {
            let shift = outward * (inset + reach);
            let (left_corner, right_corner) = (left_fade + shift, right_fade + shift);
            let solid = self.style.color;
            let clear = solid.transparent();
            self.triangle((edge.left.core, solid), (edge.right.core, solid), (right_corner, clear));
            self.triangle((edge.left.core, solid), (right_corner, clear), (left_corner, clear));
            self.triangle((edge.left.core, solid), (left_corner, clear), (left_fade, clear));
            self.triangle((edge.right.core, solid), (right_fade, clear), (right_corner, clear));
        }
        edge
    }

    /// Joins the segments `prev`→`cur` and `cur`→`next`.
    pub fn join(&mut self, prev: Vector2<f32>, cur: Vector2<f32>, next: Vector2<f32>) -> JoinEdges {
        self.summary.joins += 1;
        let d_in = (cur - prev).normalize_or_zero();
        let d_out = (next - cur).normalize_or_zero();

        if d_in.dot(d_out) > self.options.parallel_threshold {
            let dir = (d_in + d_out).normalize_or_zero();
            let edge = self.straight_edge(cur, dir.perp());
            return JoinEdges {
                incoming: edge,
                outgoing: edge,
            };
        }

        // the inner side is the one the path turns towards; a full reversal counts as a left
        // turn
        let inner_sign = match math::winding(prev, cur, next) {
            Winding::Clockwise => -1.,
            _ => 1.,
        };
        let n_in = d_in.perp() * inner_sign;
        let n_out = d_out.perp() * inner_sign;
        let a = n_in * self.edge_distance(n_in);
        let b = n_out * self.edge_distance(n_out);

        let mut linejoin = self.style.linejoin;
        let mut miter_tip = None;
        if linejoin == LineJoin::Miter {
            let limit = self.style.miter_limit * a.magnitude().max(b.magnitude());
            match math::offset_corner(cur, d_in, a, d_out, b) {
                Some(inner) if inner.distance_to(cur) <= limit => {
                    miter_tip = Some(cur + (cur - inner));
                }
                _ => {
                    self.summary.miter_fallbacks += 1;
                    linejoin = LineJoin::Bevel;
                }
            }
        }

        let inner_corner = match math::intersect_segments(prev + a, cur + a, cur + b, next + b) {
            LineIntersection::Intersecting(_) => self.corner_point(cur, d_in, n_in, d_out, n_out),
            _ => None,
        };
        let (inner_in, inner_out) = match inner_corner {
            Some(corner) => (corner, corner),
            None => (self.side_point(cur, n_in), self.side_point(cur, n_out)),
        };
        let pivot = inner_corner.map_or(cur, |corner| corner.core);

        let (on_in, on_out) = (-n_in, -n_out);
        let mut outer_in = self.side_point(cur, on_in);
        let mut outer_out = self.side_point(cur, on_out);

        match (linejoin, miter_tip) {
            (LineJoin::Miter, Some(tip)) => {
                let tip = match self.corner_point(cur, d_in, on_in, d_out, on_out) {
                    Some(corner) if self.anti_aliasing => corner,
                    _ => EdgePoint {
                        core: tip,
                        fade: None,
                    },
                };
                if inner_corner.is_some() {
                    outer_in = tip;
                    outer_out = tip;
                } else {
                    self.fan(pivot, &[outer_in, tip, outer_out]);
                }
            }
            (LineJoin::Round, _) => {
                let cross = on_in.perp_dot(on_out);
                let sweep = inner_sign * cross.abs().atan2(on_in.dot(on_out));
                let mut chain = self.arc_chain(cur, on_in, sweep);
                let last = chain.len() - 1;
                chain[0] = outer_in;
                chain[last] = outer_out;
                self.fan(pivot, &chain);
            }
            _ => self.fan(pivot, &[outer_in, outer_out]),
        }

        let pair = |inner: EdgePoint, outer: EdgePoint| {
            if inner_sign > 0. {
                EdgePair {
                    left: inner,
                    right: outer,
                }
            } else {
                EdgePair {
                    left: outer,
                    right: inner,
                }
            }
        };

        JoinEdges {
            incoming: pair(inner_in, outer_in),
            outgoing: pair(inner_out, outer_out),
        }
    }
}

/// Strokes a point list.
///
/// Closed paths get a join at every vertex (wrapping around) and no caps; open paths get a cap
/// at each end and a join at every interior vertex. Fewer than two distinct points produce
/// nothing.
pub fn stroke_path<B: GeometryBuffer>(
    out: &mut B,
    points: &[Vector2<f32>],
    closed: bool,
    style: StrokeStyle,
    scale: AxisScale,
    anti_aliasing: bool,
    options: &TessOptions,
) -> StrokeSummary {
    let points = math::dedup_points(points, closed);
    let n = points.len();
    if n < 2 || !(style.half_width > 0.) {
        return StrokeSummary::default();
    }

    let mut builder = StrokeBuilder::new(out, style, scale, anti_aliasing, options);

    if closed && n > 2 {
        let first = builder.join(points[n - 1], points[0], points[1]);
        let mut last = first.outgoing;
        for i in 1..n {
            let join = builder.join(points[i - 1], points[i], points[(i + 1) % n]);
            builder.connect(&last, &join.incoming);
            last = join.outgoing;
        }
        builder.connect(&last, &first.incoming);
    } else {
        let start_dir = (points[1] - points[0]).normalize_or_zero();
        let mut last = builder.cap(points[0], start_dir, CapPosition::Start);
        for i in 1..n - 1 {
            let join = builder.join(points[i - 1], points[i], points[i + 1]);
            builder.connect(&last, &join.incoming);
            last = join.outgoing;
        }
        let end_dir = (points[n - 1] - points[n - 2]).normalize_or_zero();
        let end = builder.cap(points[n - 1], end_dir, CapPosition::End);
        builder.connect(&last, &end);
    }

    builder.finish()
}
