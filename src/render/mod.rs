//! Tessellation.

pub mod arc;
pub mod fill;
mod geometry;
pub mod math;
mod shape;
pub mod stroke_tess;

pub use self::geometry::*;
pub use self::shape::*;

use crate::data::Document;
use cgmath::Vector2;

/// A clip rectangle in output pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Per-call rendering settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Output scale per axis; may be non-uniform.
    pub scale: Vector2<f32>,

    /// Optional clip rectangle handed to every geometry buffer.
    pub clip: Option<ClipRect>,

    /// Whether edges get alpha-faded twins.
    pub anti_aliasing: bool,

    /// Alpha multiplier handed to every geometry buffer.
    pub alpha: f32,
}

impl Default for RenderSettings {
    fn default() -> RenderSettings {
        RenderSettings {
            scale: Vector2::new(1., 1.),
            clip: None,
            anti_aliasing: false,
            alpha: 1.,
        }
    }
}

impl RenderSettings {
    /// Settings that stretch the document over a `width`×`height` viewport and clip to it.
    ///
    /// Documents without a size are left unscaled.
    pub fn fit(document: &Document, width: f32, height: f32) -> RenderSettings {
        let ratio = |target: f32, size: f32| if size > 0. { target / size } else { 1. };
        RenderSettings {
            scale: Vector2::new(
                ratio(width, document.width),
                ratio(height, document.height),
            ),
            clip: Some(ClipRect {
                x: 0.,
                y: 0.,
                width,
                height,
            }),
            ..RenderSettings::default()
        }
    }

    pub fn with_anti_aliasing(mut self, anti_aliasing: bool) -> RenderSettings {
        self.anti_aliasing = anti_aliasing;
        self
    }

    pub fn with_scale(mut self, x: f32, y: f32) -> RenderSettings {
        self.scale = Vector2::new(x, y);
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> RenderSettings {
        self.alpha = alpha.max(0.).min(1.);
        self
    }
}

/// Tunable tessellation constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessOptions {
    /// Target length of an arc segment, in output pixels.
    pub arc_segment_length: f32,

    /// Offset of anti-aliasing core points along the outward normal, in output pixels.
    pub aa_core_offset: f32,

    /// Offset of anti-aliasing fade points along the outward normal, in output pixels.
    pub aa_fade_offset: f32,

    /// Joins whose direction cosine exceeds this are treated as straight.
    pub parallel_threshold: f32,

    /// Lower bound on the number of points of a circle or ellipse.
    pub min_circle_points: usize,

    /// Longest fill fringe corner, in fade widths, before it is blunted.
    pub fringe_miter_limit: f32,
}

impl Default for TessOptions {
    fn default() -> TessOptions {
        TessOptions {
            arc_segment_length: 0.8,
            aa_core_offset: -0.5,
            aa_fade_offset: 0.5,
            parallel_threshold: 0.9999,
            min_circle_points: 8,
            fringe_miter_limit: 4.,
        }
    }
}

#[test]
fn fit_to_viewport() {
    let doc = Document::new(100., 50.);
    let settings = RenderSettings::fit(&doc, 200., 200.);
    assert_eq!(settings.scale, Vector2::new(2., 4.));
    assert_eq!(settings.clip.map(|c| c.width), Some(200.));

    let empty = Document::new(0., 0.);
    assert_eq!(
        RenderSettings::fit(&empty, 10., 10.).scale,
        Vector2::new(1., 1.)
    );
}
