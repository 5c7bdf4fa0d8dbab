//! Fill and stroke paint descriptions.

use crate::data::{Color, Rgb};

/// Stroke width substituted for invalid (negative or non-finite) widths.
const DEFAULT_STROKE_WIDTH: f32 = 1.;

/// Paint for a fill or a stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    /// Nothing is drawn.
    None,

    /// A solid color.
    Color(Rgb),
}

impl Paint {
    /// Returns the paint color, if any.
    pub fn color(&self) -> Option<Rgb> {
        match self {
            Paint::None => None,
            Paint::Color(c) => Some(*c),
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Paint::None
    }
}

/// Rule deciding which regions of a self-overlapping outline are inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

/// Shape of an open stroke's ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineCap {
    /// Flat end through the endpoint.
    Butt,

    /// Half circle around the endpoint.
    Round,

    /// Flat end pushed outward by half the stroke width.
    Square,
}

/// Geometry connecting two stroke segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineJoin {
    /// Sharp corner; falls back to bevel past the miter limit.
    Miter,

    /// Arc around the vertex.
    Round,

    /// Straight cut between the outer corners.
    Bevel,
}

/// Paint errors.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum PaintError {
    /// A dash length was negative.
    #[fail(display = "negative dash length: {}", _0)]
    NegativeDash(f32),

    /// A dash length was NaN or infinite.
    #[fail(display = "dash length is not finite")]
    NonFiniteDash,
}

/// A validated dash pattern.
///
/// Always of even length; an empty array means a solid stroke. The pattern is carried along for
/// renderers that want it, but the stroke tessellator draws every stroke solid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashArray(Vec<f32>);

impl DashArray {
    /// A solid stroke.
    pub fn solid() -> DashArray {
        DashArray(Vec::new())
    }

    /// Validates and normalizes a dash pattern.
    ///
    /// Odd-length patterns are repeated once to make them even; an all-zero pattern becomes
    /// solid.
    pub fn new(lengths: Vec<f32>) -> Result<DashArray, PaintError> {
        for &len in &lengths {
            if !len.is_finite() {
                return Err(PaintError::NonFiniteDash);
            }
            if len < 0. {
                return Err(PaintError::NegativeDash(len));
            }
        }

        if lengths.iter().all(|len| *len == 0.) {
            return Ok(DashArray::solid());
        }

        let mut lengths = lengths;
        if lengths.len() % 2 == 1 {
            let copy = lengths.clone();
            lengths.extend(copy);
        }
        Ok(DashArray(lengths))
    }

    pub fn lengths(&self) -> &[f32] {
        &self.0
    }

    pub fn is_solid(&self) -> bool {
        self.0.is_empty()
    }

    /// Total length of one dash period.
    pub fn period(&self) -> f32 {
        self.0.iter().sum()
    }
}

/// Paint style of a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintStyle {
    pub fill: Paint,
    pub fill_opacity: f32,
    pub fill_rule: FillRule,
    pub stroke: Paint,
    pub stroke_opacity: f32,
    /// Full stroke width; 0 disables the stroke.
    pub stroke_width: f32,
    pub linecap: LineCap,
    pub linejoin: LineJoin,
    /// Ratio of miter length to stroke width, at least 1.
    pub miter_limit: f32,
    pub dash_array: DashArray,
    pub dash_offset: f32,
}

impl Default for PaintStyle {
    fn default() -> PaintStyle {
        PaintStyle {
            fill: Paint::Color(Rgb::BLACK),
            fill_opacity: 1.,
            fill_rule: FillRule::NonZero,
            stroke: Paint::None,
            stroke_opacity: 1.,
            stroke_width: DEFAULT_STROKE_WIDTH,
            linecap: LineCap::Butt,
            linejoin: LineJoin::Miter,
            miter_limit: 4.,
            dash_array: DashArray::solid(),
            dash_offset: 0.,
        }
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        1.
    } else {
        value.max(0.).min(1.)
    }
}

impl PaintStyle {
    pub fn with_fill(mut self, fill: Paint) -> PaintStyle {
        self.fill = fill;
        self
    }

    pub fn with_fill_opacity(mut self, opacity: f32) -> PaintStyle {
        self.fill_opacity = clamp_unit(opacity);
        self
    }

    pub fn with_fill_rule(mut self, rule: FillRule) -> PaintStyle {
        self.fill_rule = rule;
        self
    }

    pub fn with_stroke(mut self, stroke: Paint) -> PaintStyle {
        self.stroke = stroke;
        self
    }

    pub fn with_stroke_opacity(mut self, opacity: f32) -> PaintStyle {
        self.stroke_opacity = clamp_unit(opacity);
        self
    }

    /// Sets the stroke width. Negative or non-finite widths are replaced by the default width.
    pub fn with_stroke_width(mut self, width: f32) -> PaintStyle {
        self.stroke_width = if width.is_finite() && width >= 0. {
            width
        } else {
            warn!(
                target: "stipple",
                "Invalid stroke width {}, using {}", width, DEFAULT_STROKE_WIDTH
            );
            DEFAULT_STROKE_WIDTH
        };
        self
    }

    pub fn with_linecap(mut self, cap: LineCap) -> PaintStyle {
        self.linecap = cap;
        self
    }

    pub fn with_linejoin(mut self, join: LineJoin) -> PaintStyle {
        self.linejoin = join;
        self
    }

    /// Sets the miter limit, clamped to at least 1.
    pub fn with_miter_limit(mut self, limit: f32) -> PaintStyle {
        self.miter_limit = if limit.is_nan() { 1. } else { limit.max(1.) };
        self
    }

    /// Sets the dash pattern. Invalid patterns make the stroke solid.
    pub fn with_dash_array(mut self, lengths: Vec<f32>) -> PaintStyle {
        self.dash_array = match DashArray::new(lengths) {
            Ok(dashes) => dashes,
            Err(err) => {
                warn!(target: "stipple", "Ignoring dash array: {}", err);
                DashArray::solid()
            }
        };
        self
    }

    pub fn with_dash_offset(mut self, offset: f32) -> PaintStyle {
        self.dash_offset = if offset.is_finite() { offset } else { 0. };
        self
    }

    /// Fill color with fill opacity applied, if there is a fill.
    pub fn fill_color(&self) -> Option<Color> {
        self.fill
            .color()
            .map(|rgb| rgb.with_opacity(self.fill_opacity))
    }

    /// Stroke color with stroke opacity applied, if the stroke is visible at all.
    pub fn stroke_color(&self) -> Option<Color> {
        if self.stroke_width <= 0. {
            return None;
        }
        self.stroke
            .color()
            .map(|rgb| rgb.with_opacity(self.stroke_opacity))
    }

    /// Half the stroke width.
    pub fn half_width(&self) -> f32 {
        self.stroke_width / 2.
    }
}
