//! # iconrelief algorithms
//!
//! Geometry pipeline that turns flattened SVG paths into a solid icon:
//! shape construction with hole detection, cap triangulation, linear
//! extrusion, and bounding-box normalization.

pub mod shapes;
pub mod triangulation;
pub mod extrude;
pub mod normalize;
pub mod pipeline;

// Re-export commonly used items
pub use shapes::*;
pub use triangulation::*;
pub use extrude::*;
pub use normalize::*;
pub use pipeline::*;
