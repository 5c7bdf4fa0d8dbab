use crate::data::Shape;

/// A parsed vector document: its pixel size and shapes in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub width: f32,
    pub height: f32,
    pub shapes: Vec<Shape>,
}

impl Document {
    /// Creates an empty document.
    pub fn new(width: f32, height: f32) -> Document {
        Document {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn with_shape(mut self, shape: Shape) -> Document {
        self.push(shape);
        self
    }
}
