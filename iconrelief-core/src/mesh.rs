//! Triangle mesh geometry

use crate::point::*;
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices, faces and optional per-vertex normals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3f>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            normals: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Add a vertex with its normal, returning its index
    pub fn add_vertex_with_normal(&mut self, vertex: Point3f, normal: Vector3f) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        self.normals.get_or_insert_with(Vec::new).push(normal);
        index
    }

    pub fn add_face(&mut self, face: [usize; 3]) {
        self.faces.push(face);
    }

    /// Calculate face normals.
    ///
    /// Degenerate faces get a zero normal instead of NaN.
    pub fn calculate_face_normals(&self) -> Vec<Vector3f> {
        self.faces
            .iter()
            .map(|face| {
                let v0 = self.vertices[face[0]];
                let v1 = self.vertices[face[1]];
                let v2 = self.vertices[face[2]];

                (v1 - v0)
                    .cross(&(v2 - v0))
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vector3f::zeros)
            })
            .collect()
    }

    /// Set vertex normals; ignored when the count does not match
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) {
        if normals.len() == self.vertices.len() {
            self.normals = Some(normals);
        }
    }

    /// Sum of the areas of all faces
    pub fn surface_area(&self) -> f32 {
        self.faces
            .iter()
            .map(|face| {
                let v0 = self.vertices[face[0]];
                let v1 = self.vertices[face[1]];
                let v2 = self.vertices[face[2]];
                (v1 - v0).cross(&(v2 - v0)).norm() * 0.5
            })
            .sum()
    }

    /// Faces as a flat `u32` index list for GPU upload
    pub fn indices_u32(&self) -> Vec<u32> {
        self.faces
            .iter()
            .flat_map(|f| [f[0] as u32, f[1] as u32, f[2] as u32])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn right_triangle() -> TriangleMesh {
        TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(2.0, 0.0, 0.0),
                Point3f::new(0.0, 2.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn test_face_normal_and_area() {
        let mesh = right_triangle();
        let normals = mesh.calculate_face_normals();

        assert_eq!(normals.len(), 1);
        assert_relative_eq!(normals[0], Vector3f::new(0.0, 0.0, 1.0));
        assert_relative_eq!(mesh.surface_area(), 2.0);
        assert_eq!(mesh.indices_u32(), vec![0, 1, 2]);
    }

    #[test]
    fn test_degenerate_face_normal_is_zero() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![Point3f::origin(), Point3f::new(1.0, 0.0, 0.0), Point3f::new(2.0, 0.0, 0.0)],
            vec![[0, 1, 2]],
        );
        assert_eq!(mesh.calculate_face_normals()[0], Vector3f::zeros());
    }

    #[test]
    fn test_set_normals_requires_matching_count() {
        let mut mesh = right_triangle();
        mesh.set_normals(vec![Vector3f::z()]);
        assert!(mesh.normals.is_none());

        mesh.set_normals(vec![Vector3f::z(); 3]);
        assert_eq!(mesh.normals.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_add_vertex_with_normal() {
        let mut mesh = TriangleMesh::new();
        assert!(mesh.is_empty());

        let a = mesh.add_vertex_with_normal(Point3f::origin(), Vector3f::z());
        let b = mesh.add_vertex_with_normal(Point3f::new(1.0, 0.0, 0.0), Vector3f::z());
        let c = mesh.add_vertex_with_normal(Point3f::new(0.0, 1.0, 0.0), Vector3f::z());
        mesh.add_face([a, b, c]);

        assert!(!mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
    }
}
