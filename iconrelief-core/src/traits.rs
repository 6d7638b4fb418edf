//! Core traits for iconrelief

use crate::{bounds::Aabb, mesh::TriangleMesh, point::*, scene::MeshGroup, transform::Transform3D};

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> Aabb;

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        self.bounding_box().center()
    }
}

/// Trait for objects that can be transformed
pub trait Transformable {
    /// Apply a transformation to the object
    fn transform(&mut self, transform: &Transform3D);
}

impl Drawable for TriangleMesh {
    fn bounding_box(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }
}

impl Drawable for MeshGroup {
    /// World-space box, the equivalent of measuring the whole object tree
    fn bounding_box(&self) -> Aabb {
        self.world_bounding_box()
    }
}

impl Transformable for TriangleMesh {
    fn transform(&mut self, transform: &Transform3D) {
        for vertex in &mut self.vertices {
            *vertex = transform.transform_point(vertex);
        }

        if let Some(normals) = self.normals.as_mut() {
            let normal_matrix = transform.normal_matrix();
            for normal in normals.iter_mut() {
                *normal = (normal_matrix * *normal)
                    .try_normalize(f32::EPSILON)
                    .unwrap_or(*normal);
            }
        }
    }
}
