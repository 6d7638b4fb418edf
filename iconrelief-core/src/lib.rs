//! Core data structures and traits for iconrelief
//!
//! This crate provides the shared vocabulary of the workspace: colors,
//! triangle meshes, bounding boxes, transforms, and the small scene graph
//! that holds the extruded icon and its lights.

pub mod point;
pub mod color;
pub mod bounds;
pub mod mesh;
pub mod scene;
pub mod traits;
pub mod transform;
pub mod error;

pub use point::*;
pub use color::*;
pub use bounds::*;
pub use mesh::*;
pub use scene::*;
pub use traits::*;
pub use transform::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector2, Vector3};
