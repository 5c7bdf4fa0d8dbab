use crate::data::{PaintStyle, Transform};
use cgmath::Vector2;

/// Geometric parameters of a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Axis-aligned rectangle with optional elliptical corner radii.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rx: f32,
        ry: f32,
    },

    Circle { cx: f32, cy: f32, r: f32 },

    Ellipse { cx: f32, cy: f32, rx: f32, ry: f32 },

    /// A single line segment. Lines are never filled.
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },

    /// An open point list.
    Polyline(Vec<Vector2<f32>>),

    /// A closed point list.
    Polygon(Vec<Vector2<f32>>),
}

/// The point list a shape is filled and stroked along, in shape-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub points: Vec<Vector2<f32>>,

    /// Whether the last point connects back to the first.
    pub closed: bool,

    /// Whether the outline may be filled at all.
    pub fillable: bool,
}

impl Outline {
    pub fn empty() -> Outline {
        Outline {
            points: Vec::new(),
            closed: true,
            fillable: false,
        }
    }
}

/// A 2D shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub paint: PaintStyle,
    pub transform: Transform,
}

impl Shape {
    /// Creates a shape with the default paint style and no transform.
    pub fn new(kind: ShapeKind) -> Shape {
        Shape {
            kind,
            paint: PaintStyle::default(),
            transform: Transform::identity(),
        }
    }

    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Shape {
        Shape::new(ShapeKind::Rect {
            x,
            y,
            width,
            height,
            rx: 0.,
            ry: 0.,
        })
    }

    pub fn rounded_rect(x: f32, y: f32, width: f32, height: f32, rx: f32, ry: f32) -> Shape {
        Shape::new(ShapeKind::Rect {
            x,
            y,
            width,
            height,
            rx,
            ry,
        })
    }

    pub fn circle(cx: f32, cy: f32, r: f32) -> Shape {
        Shape::new(ShapeKind::Circle { cx, cy, r })
    }

    pub fn ellipse(cx: f32, cy: f32, rx: f32, ry: f32) -> Shape {
        Shape::new(ShapeKind::Ellipse { cx, cy, rx, ry })
    }

    pub fn line(x1: f32, y1: f32, x2: f32, y2: f32) -> Shape {
        Shape::new(ShapeKind::Line { x1, y1, x2, y2 })
    }

    pub fn polyline<P: Into<Vector2<f32>>, I: IntoIterator<Item = P>>(points: I) -> Shape {
        Shape::new(ShapeKind::Polyline(
            points.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn polygon<P: Into<Vector2<f32>>, I: IntoIterator<Item = P>>(points: I) -> Shape {
        Shape::new(ShapeKind::Polygon(
            points.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn with_paint(mut self, paint: PaintStyle) -> Shape {
        self.paint = paint;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Shape {
        self.transform = transform;
        self
    }
}
