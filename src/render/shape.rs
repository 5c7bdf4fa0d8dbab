//! Shape dispatch.
//!
//! Turns a [`Shape`] into geometry buffers: its outline is built in shape-local coordinates, the
//! fill and stroke builders append triangles, and every buffer gets the combined shape
//! transform. Fills that are not convex get a buffer of their own, drawn with stencil coverage
//! before the main buffer.

use crate::data::{Document, Outline, Shape, ShapeKind, Transform};
use crate::render::math::{self, AxisScale};
use crate::render::stroke_tess::{self, StrokeStyle};
use crate::render::{arc, fill, GeometryBuffer, GeometryFactory, RenderSettings, TessOptions};
use cgmath::Vector2;
use failure::Error;
use fnv::{FnvHashMap, FnvHashSet};
use std::f32::consts::{FRAC_PI_2, PI};
use std::hash::Hash;

impl ShapeKind {
    /// Translation from shape-local coordinates to the shape's own coordinate system.
    ///
    /// Circles and ellipses are built around their center, rectangles from their corner.
    pub fn placement(&self) -> Transform {
        match *self {
            ShapeKind::Rect { x, y, .. } => Transform::from_translation(x, y),
            ShapeKind::Circle { cx, cy, .. } | ShapeKind::Ellipse { cx, cy, .. } => {
                Transform::from_translation(cx, cy)
            }
            _ => Transform::identity(),
        }
    }

    /// Builds the outline in placement-local coordinates, with curves tessellated for the given
    /// output scale.
    pub fn outline(&self, max_scale: f32, options: &TessOptions) -> Outline {
        match self {
            ShapeKind::Rect {
                width,
                height,
                rx,
                ry,
                ..
            } => rect_outline(*width, *height, *rx, *ry, max_scale, options),
            ShapeKind::Circle { r, .. } => Outline {
                points: arc::circle_points(Vector2::new(0., 0.), *r, max_scale, options),
                closed: true,
                fillable: true,
            },
            ShapeKind::Ellipse { rx, ry, .. } => ellipse_outline(*rx, *ry, max_scale, options),
            ShapeKind::Line { x1, y1, x2, y2 } => Outline {
                points: vec![Vector2::new(*x1, *y1), Vector2::new(*x2, *y2)],
                closed: false,
                fillable: false,
            },
            ShapeKind::Polyline(points) => Outline {
                points: points.clone(),
                closed: false,
                fillable: true,
            },
            ShapeKind::Polygon(points) => Outline {
                points: points.clone(),
                closed: true,
                fillable: true,
            },
        }
    }
}

fn rect_outline(
    width: f32,
    height: f32,
    rx: f32,
    ry: f32,
    max_scale: f32,
    options: &TessOptions,
) -> Outline {
    if !(width > 0.) || !(height > 0.) {
        return Outline::empty();
    }

    // a single given radius applies to both axes
    let (rx, ry) = match (rx > 0., ry > 0.) {
        (true, false) => (rx, rx),
        (false, true) => (ry, ry),
        _ => (rx, ry),
    };
    let rx = rx.max(0.).min(width / 2.);
    let ry = ry.max(0.).min(height / 2.);

    if !(rx > 0.) || !(ry > 0.) {
        return Outline {
            points: vec![
                Vector2::new(0., 0.),
                Vector2::new(width, 0.),
                Vector2::new(width, height),
                Vector2::new(0., height),
            ],
            closed: true,
            fillable: true,
        };
    }

    let corners = [
        (Vector2::new(width - rx, ry), -FRAC_PI_2),
        (Vector2::new(width - rx, height - ry), 0.),
        (Vector2::new(rx, height - ry), FRAC_PI_2),
        (Vector2::new(rx, ry), PI),
    ];
    let radius = rx.max(ry);
    let mut points = Vec::new();
    for &(center, start) in &corners {
        let (sin, cos) = f32::sin_cos(start);
        let dirs = arc::arc_directions(Vector2::new(cos, sin), FRAC_PI_2, radius, max_scale, options);
        points.extend(
            dirs.into_iter()
                .map(|dir| center + Vector2::new(dir.x * rx, dir.y * ry)),
        );
    }

    Outline {
        points: math::dedup_points(&points, true),
        closed: true,
        fillable: true,
    }
}

fn ellipse_outline(rx: f32, ry: f32, max_scale: f32, options: &TessOptions) -> Outline {
    if !(rx > 0.) || !(ry > 0.) {
        return Outline::empty();
    }
    let radius = rx.max(ry);
    let points = arc::circle_points(Vector2::new(0., 0.), radius, max_scale, options)
        .into_iter()
        .map(|p| Vector2::new(p.x * rx / radius, p.y * ry / radius))
        .collect();
    Outline {
        points,
        closed: true,
        fillable: true,
    }
}

/// Tessellates shapes into geometry buffers.
#[derive(Debug, Clone, Default)]
pub struct Tessellator {
    options: TessOptions,
}

impl Tessellator {
    pub fn new() -> Tessellator {
        Tessellator::default()
    }

    pub fn with_options(options: TessOptions) -> Tessellator {
        Tessellator { options }
    }

    pub fn options(&self) -> &TessOptions {
        &self.options
    }

    fn configure<B: GeometryBuffer>(buffer: &mut B, transform: &Transform, settings: &RenderSettings) {
        buffer.set_clip(settings.clip);
        buffer.set_scale(settings.scale);
        buffer.set_transform(transform.to_matrix4());
        buffer.set_alpha(settings.alpha);
    }

    /// Tessellates a single shape.
    ///
    /// Returns the buffers to draw in order: a stencil fill buffer if the fill needed one, then
    /// the buffer holding direct fill, fill fringe and stroke. Shapes that draw nothing return
    /// no buffers.
    pub fn tessellate<F: GeometryFactory>(
        &self,
        shape: &Shape,
        settings: &RenderSettings,
        factory: &mut F,
    ) -> Result<Vec<F::Buffer>, Error> {
        let transform = shape.kind.placement().then(&shape.transform);
        let axis_scale = transform.axis_scale();
        let scale = AxisScale::new(
            axis_scale.x * settings.scale.x,
            axis_scale.y * settings.scale.y,
        );
        if !scale.is_valid() {
            debug!(target: "stipple", "Skipping shape with degenerate scale {:?}", scale);
            return Ok(Vec::new());
        }

        let outline = shape.kind.outline(scale.max(), &self.options);
        let fill_points = math::dedup_points(&outline.points, true);
        let fill_color = match shape.paint.fill_color() {
            Some(color) if outline.fillable && fill_points.len() >= 3 => Some(color),
            _ => None,
        };
        let stroke_style = match StrokeStyle::from_paint(&shape.paint) {
            Some(style) if math::dedup_points(&outline.points, outline.closed).len() >= 2 => {
                Some(style)
            }
            _ => None,
        };
        if fill_color.is_none() && stroke_style.is_none() {
            debug!(
                target: "stipple",
                "Nothing to draw for shape with {} points",
                outline.points.len()
            );
            return Ok(Vec::new());
        }

        let convex_fill = fill_color.is_some() && math::is_convex(&fill_points);
        let mut buffers = Vec::with_capacity(2);

        if let Some(color) = fill_color {
            if !convex_fill {
                debug!(
                    target: "stipple",
                    "Using stencil fill for non-convex outline with {} points",
                    fill_points.len()
                );
                let mut stencil = factory.create_buffer()?;
                Tessellator::configure(&mut stencil, &transform, settings);
                fill::fill_stencil(&mut stencil, &fill_points, shape.paint.fill_rule, color);
                buffers.push(stencil);
            }
        }

        // a stencil-only fill without fringe or stroke needs nothing else
        let fringe = fill_color.is_some() && settings.anti_aliasing;
        if !convex_fill && !fringe && stroke_style.is_none() {
            trace!(
                target: "stipple",
                "Tessellated shape: {} points, stencil fill only",
                outline.points.len()
            );
            return Ok(buffers);
        }

        let mut main = factory.create_buffer()?;
        Tessellator::configure(&mut main, &transform, settings);
        let mut main_triangles = 0;

        if let Some(color) = fill_color {
            let mut ring = fill_points;
            if settings.anti_aliasing {
                let (core, triangles) =
                    fill::fill_fringe(&mut main, &ring, color, &scale, &self.options, convex_fill);
                main_triangles += triangles;
                ring = core;
            }
            if convex_fill {
                main_triangles += fill::fill_fan(&mut main, &ring, color);
            }
        }

        if let Some(style) = stroke_style {
            let summary = stroke_tess::stroke_path(
                &mut main,
                &outline.points,
                outline.closed,
                style,
                scale,
                settings.anti_aliasing,
                &self.options,
            );
            trace!(target: "stipple", "Stroked {} points: {:?}", outline.points.len(), summary);
            main_triangles += summary.triangles;
        }

        trace!(
            target: "stipple",
            "Tessellated shape: {} points, {} direct triangles, {} buffers",
            outline.points.len(),
            main_triangles,
            buffers.len() + 1
        );
        buffers.push(main);
        Ok(buffers)
    }

    /// Tessellates every shape of a document, in paint order.
    pub fn tessellate_document<F: GeometryFactory>(
        &self,
        document: &Document,
        settings: &RenderSettings,
        factory: &mut F,
    ) -> Result<Vec<F::Buffer>, Error> {
        let mut buffers = Vec::new();
        for shape in &document.shapes {
            buffers.append(&mut self.tessellate(shape, settings, factory)?);
        }
        Ok(buffers)
    }
}

#[derive(Debug, Fail)]
#[fail(display = "shape does not exist in cache")]
pub struct NoShapeError;

struct Cached<B> {
    shape: Shape,
    settings: RenderSettings,
    buffers: Vec<B>,
}

/// Cached tessellations of [`Shape`]s.
pub struct ShapeCache<ID: Copy + Hash + Eq, F: GeometryFactory> {
    tessellator: Tessellator,
    factory: F,
    cache: FnvHashMap<ID, Cached<F::Buffer>>,
    used_ids: FnvHashSet<ID>,
}

impl<ID: Copy + Hash + Eq, F: GeometryFactory> ShapeCache<ID, F> {
    /// Creates a shape cache that allocates buffers from the given factory.
    pub fn new(factory: F) -> ShapeCache<ID, F> {
        ShapeCache::with_tessellator(Tessellator::new(), factory)
    }

    pub fn with_tessellator(tessellator: Tessellator, factory: F) -> ShapeCache<ID, F> {
        ShapeCache {
            tessellator,
            factory,
            cache: FnvHashMap::default(),
            used_ids: FnvHashSet::default(),
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn contains(&self, id: ID) -> bool {
        self.cache.contains_key(&id)
    }

    /// Tessellates the shape unless an identical tessellation is cached under this ID.
    ///
    /// Returns whether the shape was (re-)tessellated.
    pub fn update(&mut self, id: ID, shape: &Shape, settings: &RenderSettings) -> Result<bool, Error> {
        if let Some(cached) = self.cache.get(&id) {
            if cached.shape == *shape && cached.settings == *settings {
                return Ok(false);
            }
            debug!(target: "stipple", "Shape changed, re-tessellating");
        }

        let buffers = self.tessellator.tessellate(shape, settings, &mut self.factory)?;
        self.cache.insert(
            id,
            Cached {
                shape: shape.clone(),
                settings: *settings,
                buffers,
            },
        );
        Ok(true)
    }

    /// Returns the cached buffers of a shape.
    pub fn get(&self, id: ID) -> Result<&[F::Buffer], Error> {
        match self.cache.get(&id) {
            Some(cached) => Ok(&cached.buffers),
            None => Err(NoShapeError.into()),
        }
    }

    /// Returns the buffers to draw for a shape, tessellating it if needed.
    ///
    /// Note that this will add the shape to the cache (with the given ID) and mark it as used.
    pub fn draw(&mut self, id: ID, shape: &Shape, settings: &RenderSettings) -> Result<&[F::Buffer], Error> {
        self.used_ids.insert(id);
        self.update(id, shape, settings)?;
        self.get(id)
    }

    /// Frees all buffers that weren’t drawn since the last call to `drop_unused`.
    pub fn drop_unused(&mut self) {
        let used_ids = &self.used_ids;
        self.cache.retain(|id, _| used_ids.contains(id));
        self.used_ids.clear();
    }
}
