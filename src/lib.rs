//! Tessellation of basic vector shapes into triangle lists.
//!
//! Rectangles, circles, ellipses, lines, polylines and polygons are turned into colored
//! triangles (fill and stroke, with optional edge fading for anti-aliasing) and appended to
//! geometry buffers provided by the caller's renderer.

#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate log;

pub mod data;
pub mod render;
