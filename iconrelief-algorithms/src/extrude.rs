//! Linear extrusion of planar shapes into solid meshes

use iconrelief_core::{Error, Point2f, Point3f, Result, TriangleMesh, Vector2f, Vector3f};
use serde::{Deserialize, Serialize};

use crate::shapes::Shape;
use crate::triangulation::triangulate_shape;

/// Extrusion parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtrudeOptions {
    /// Thickness along +Z
    pub depth: f32,
    /// Number of bands the side walls are split into
    pub steps: usize,
}

impl Default for ExtrudeOptions {
    fn default() -> Self {
        Self { depth: 20.0, steps: 1 }
    }
}

impl ExtrudeOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.depth.is_finite() && self.depth > 0.0) {
            return Err(Error::Config(format!("extrusion depth must be positive, got {}", self.depth)));
        }
        if self.steps == 0 {
            return Err(Error::Config("extrusion steps must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Sweep `shape` from `z = 0` to `z = depth`.
///
/// Caps and walls do not share vertices so every face keeps a flat normal.
pub fn extrude_shape(shape: &Shape, options: &ExtrudeOptions) -> Result<TriangleMesh> {
    options.validate()?;
    let cap = triangulate_shape(shape)?;
    let depth = options.depth;

    let mut mesh = TriangleMesh::new();

    // Back cap, facing -Z
    let back: Vec<usize> = cap
        .points
        .iter()
        .map(|p| mesh.add_vertex_with_normal(Point3f::new(p.x, p.y, 0.0), -Vector3f::z()))
        .collect();
    for t in &cap.triangles {
        mesh.add_face([back[t[0]], back[t[2]], back[t[1]]]);
    }

    // Front cap, facing +Z
    let front: Vec<usize> = cap
        .points
        .iter()
        .map(|p| mesh.add_vertex_with_normal(Point3f::new(p.x, p.y, depth), Vector3f::z()))
        .collect();
    for t in &cap.triangles {
        mesh.add_face([front[t[0]], front[t[1]], front[t[2]]]);
    }

    add_side_walls(&mut mesh, &shape.boundary_edges(), depth, options.steps);

    Ok(mesh)
}

/// Walls along boundary edges whose filled side is on the left
fn add_side_walls(mesh: &mut TriangleMesh, edges: &[(Point2f, Point2f)], depth: f32, steps: usize) {
    for &(a, b) in edges {
        let edge: Vector2f = b - a;

        // Right-hand side of the edge faces away from the filled region.
        let Some(normal) = Vector3f::new(edge.y, -edge.x, 0.0).try_normalize(f32::EPSILON) else {
            continue;
        };

        for step in 0..steps {
            let z0 = depth * step as f32 / steps as f32;
            let z1 = depth * (step + 1) as f32 / steps as f32;

            let a0 = mesh.add_vertex_with_normal(Point3f::new(a.x, a.y, z0), normal);
            let b0 = mesh.add_vertex_with_normal(Point3f::new(b.x, b.y, z0), normal);
            let b1 = mesh.add_vertex_with_normal(Point3f::new(b.x, b.y, z1), normal);
            let a1 = mesh.add_vertex_with_normal(Point3f::new(a.x, a.y, z1), normal);

            mesh.add_face([a0, b0, b1]);
            mesh.add_face([a0, b1, a1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use iconrelief_core::Drawable;
    use iconrelief_io::FillRule;

    fn square(size: f32) -> Shape {
        Shape::new(
            vec![
                Point2f::new(0.0, 0.0),
                Point2f::new(size, 0.0),
                Point2f::new(size, size),
                Point2f::new(0.0, size),
            ],
            vec![],
        )
    }

    #[test]
    fn test_default_options() {
        let options = ExtrudeOptions::default();
        assert_relative_eq!(options.depth, 20.0);
        assert_eq!(options.steps, 1);
    }

    #[test]
    fn test_box_from_square() {
        let mesh = extrude_shape(&square(10.0), &ExtrudeOptions::default()).unwrap();

        // 2 caps x 2 triangles + 4 walls x 2 triangles
        assert_eq!(mesh.face_count(), 12);
        let bbox = mesh.bounding_box();
        assert_relative_eq!(bbox.min, Point3f::new(0.0, 0.0, 0.0));
        assert_relative_eq!(bbox.max, Point3f::new(10.0, 10.0, 20.0));
        assert_relative_eq!(mesh.surface_area(), 2.0 * 100.0 + 4.0 * 10.0 * 20.0, epsilon = 1e-2);
    }

    #[test]
    fn test_winding_matches_stored_normals() {
        let mesh = extrude_shape(&square(3.0), &ExtrudeOptions { depth: 2.0, steps: 2 }).unwrap();
        let normals = mesh.normals.as_ref().unwrap();

        for (face, face_normal) in mesh.faces.iter().zip(mesh.calculate_face_normals()) {
            let stored = normals[face[0]];
            assert_relative_eq!(face_normal, stored, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_steps_split_walls() {
        let mesh = extrude_shape(&square(1.0), &ExtrudeOptions { depth: 1.0, steps: 3 }).unwrap();
        assert_eq!(mesh.face_count(), 4 + 4 * 3 * 2);
    }

    #[test]
    fn test_invalid_depth_is_rejected() {
        let result = extrude_shape(&square(1.0), &ExtrudeOptions { depth: 0.0, steps: 1 });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_crossing_squares_get_walls_on_union_outline_only() {
        let corner = |x: f32, y: f32| {
            vec![
                Point2f::new(x, y),
                Point2f::new(x + 10.0, y),
                Point2f::new(x + 10.0, y + 10.0),
                Point2f::new(x, y + 10.0),
            ]
        };
        let shape = Shape::with_crossings(vec![corner(0.0, 0.0), corner(5.0, 5.0)], FillRule::NonZero);
        let mesh = extrude_shape(&shape, &ExtrudeOptions { depth: 2.0, steps: 1 }).unwrap();

        assert_relative_eq!(mesh.surface_area(), 2.0 * 175.0 + 60.0 * 2.0, epsilon = 1e-2);

        let normals = mesh.normals.as_ref().unwrap();
        for (face, face_normal) in mesh.faces.iter().zip(mesh.calculate_face_normals()) {
            assert_relative_eq!(face_normal, normals[face[0]], epsilon = 1e-5);
        }
    }
}
