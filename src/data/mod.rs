//! Data types and definitions.

pub mod cgmath_ext;
mod color;
mod document;
mod paint;
mod shape;
mod transform;

pub use self::color::*;
pub use self::document::*;
pub use self::paint::*;
pub use self::shape::*;
pub use self::transform::*;
