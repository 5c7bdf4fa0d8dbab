//! Geometry sinks.
//!
//! The tessellator never owns GPU resources. It asks a [`GeometryFactory`] for buffers and
//! appends flat triangle lists (three vertices per triangle, no shared indices) to them.

use crate::data::{Color, FillRule};
use crate::render::ClipRect;
use cgmath::{Matrix4, SquareMatrix, Vector2, Vector3};
use failure::Error;

/// Z coordinate of the drawing plane.
pub const DRAW_PLANE_Z: f32 = 0.;

/// A positioned, colored vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColouredVertex {
    pub position: Vector3<f32>,
    pub color: Color,
}

impl ColouredVertex {
    pub fn new(position: Vector2<f32>, color: Color) -> ColouredVertex {
        ColouredVertex {
            position: position.extend(DRAW_PLANE_Z),
            color,
        }
    }

    /// Position in the drawing plane.
    pub fn xy(&self) -> Vector2<f32> {
        self.position.truncate()
    }
}

/// Stencil-coverage state of a buffer.
///
/// All vertices except the last `cover_vertex_count` only contribute coverage, resolved with
/// `rule`; the trailing vertices are drawn where coverage is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilMode {
    pub rule: FillRule,
    pub cover_vertex_count: usize,
}

/// A colored triangle list owned by the renderer.
pub trait GeometryBuffer {
    fn set_clip(&mut self, clip: Option<ClipRect>);

    /// Sets the 2D output scale.
    fn set_scale(&mut self, scale: Vector2<f32>);

    /// Sets the model transform.
    fn set_transform(&mut self, transform: Matrix4<f32>);

    /// Sets the alpha multiplier.
    fn set_alpha(&mut self, alpha: f32);

    /// Switches the buffer to stencil-coverage mode.
    fn set_stencil(&mut self, rule: FillRule, cover_vertex_count: usize);

    fn push_vertex(&mut self, vertex: ColouredVertex);

    /// Appends one triangle.
    fn push_triangle(
        &mut self,
        a: (Vector2<f32>, Color),
        b: (Vector2<f32>, Color),
        c: (Vector2<f32>, Color),
    ) {
        self.push_vertex(ColouredVertex::new(a.0, a.1));
        self.push_vertex(ColouredVertex::new(b.0, b.1));
        self.push_vertex(ColouredVertex::new(c.0, c.1));
    }
}

/// Creates geometry buffers.
pub trait GeometryFactory {
    type Buffer: GeometryBuffer;

    fn create_buffer(&mut self) -> Result<Self::Buffer, Error>;
}

/// An in-memory geometry buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBuffer {
    pub vertices: Vec<ColouredVertex>,
    pub clip: Option<ClipRect>,
    pub scale: Vector2<f32>,
    pub transform: Matrix4<f32>,
    pub alpha: f32,
    pub stencil: Option<StencilMode>,
}

impl VertexBuffer {
    pub fn new() -> VertexBuffer {
        VertexBuffer {
            vertices: Vec::new(),
            clip: None,
            scale: Vector2::new(1., 1.),
            transform: Matrix4::identity(),
            alpha: 1.,
            stencil: None,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Vertices that are drawn directly: all of them, or only the cover quad in stencil mode.
    pub fn cover_vertices(&self) -> &[ColouredVertex] {
        match self.stencil {
            Some(stencil) => {
                let start = self.vertices.len().saturating_sub(stencil.cover_vertex_count);
                &self.vertices[start..]
            }
            None => &self.vertices,
        }
    }

    /// Vertices that only contribute stencil coverage.
    pub fn coverage_vertices(&self) -> &[ColouredVertex] {
        let cover = self.cover_vertices().len();
        &self.vertices[..self.vertices.len() - cover]
    }
}

impl Default for VertexBuffer {
    fn default() -> VertexBuffer {
        VertexBuffer::new()
    }
}

impl GeometryBuffer for VertexBuffer {
    fn set_clip(&mut self, clip: Option<ClipRect>) {
        self.clip = clip;
    }

    fn set_scale(&mut self, scale: Vector2<f32>) {
        self.scale = scale;
    }

    fn set_transform(&mut self, transform: Matrix4<f32>) {
        self.transform = transform;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    fn set_stencil(&mut self, rule: FillRule, cover_vertex_count: usize) {
        self.stencil = Some(StencilMode {
            rule,
            cover_vertex_count,
        });
    }

    fn push_vertex(&mut self, vertex: ColouredVertex) {
        self.vertices.push(vertex);
    }
}

/// Creates [`VertexBuffer`]s.
#[derive(Debug, Clone, Default)]
pub struct VertexBufferFactory {
    /// Number of buffers created so far.
    pub created: usize,
}

impl GeometryFactory for VertexBufferFactory {
    type Buffer = VertexBuffer;

    fn create_buffer(&mut self) -> Result<VertexBuffer, Error> {
        self.created += 1;
        Ok(VertexBuffer::new())
    }
}

#[test]
fn stencil_split() {
    let mut buf = VertexBuffer::new();
    let p = Vector2::new(0., 0.);
    for _ in 0..3 {
        buf.push_triangle((p, Color::BLACK), (p, Color::BLACK), (p, Color::BLACK));
    }
    assert_eq!(buf.cover_vertices().len(), 9);

    buf.set_stencil(FillRule::EvenOdd, 6);
    assert_eq!(buf.coverage_vertices().len(), 3);
    assert_eq!(buf.cover_vertices().len(), 6);
    assert_eq!(buf.triangle_count(), 3);
}
