//! Cap triangulation using a constrained Delaunay triangulation

use iconrelief_core::{signed_area, Error, Point2f, Result};
use spade::handles::FixedVertexHandle;
use spade::{ConstrainedDelaunayTriangulation, Point2 as SpadePoint, Triangulation};
use tracing::warn;

use crate::shapes::Shape;

/// Triangulated cap of a shape
#[derive(Debug, Clone, Default)]
pub struct ShapeTriangulation {
    pub points: Vec<Point2f>,
    /// Counter-clockwise triangles indexing into `points`
    pub triangles: Vec<[usize; 3]>,
}

impl ShapeTriangulation {
    /// Total area covered by the triangles
    pub fn area(&self) -> f32 {
        self.triangles
            .iter()
            .map(|t| signed_area(&[self.points[t[0]], self.points[t[1]], self.points[t[2]]]))
            .sum()
    }
}

/// Triangulate the filled region of a shape.
///
/// Every ring edge becomes a constraint, split where rings cross. Triangles
/// of the convex hull whose barycenter is not covered under the shape's fill
/// rule are discarded.
pub fn triangulate_shape(shape: &Shape) -> Result<ShapeTriangulation> {
    let mut cdt: ConstrainedDelaunayTriangulation<SpadePoint<f64>> = ConstrainedDelaunayTriangulation::new();

    for (a, b) in shape.constraint_edges() {
        let from = insert_vertex(&mut cdt, a)?;
        let to = insert_vertex(&mut cdt, b)?;
        if from == to {
            continue;
        }
        if cdt.can_add_constraint(from, to) {
            cdt.add_constraint(from, to);
        } else {
            warn!("skipping overlapping edge in shape outline");
        }
    }

    let points: Vec<Point2f> = cdt
        .vertices()
        .map(|v| {
            let p = v.position();
            Point2f::new(p.x as f32, p.y as f32)
        })
        .collect();

    let mut triangles = Vec::new();
    for face in cdt.inner_faces() {
        let [a, b, c] = face.vertices().map(|v| v.fix().index());
        let centroid = Point2f::from((points[a].coords + points[b].coords + points[c].coords) / 3.0);
        if !shape.contains(&centroid) {
            continue;
        }

        let area = signed_area(&[points[a], points[b], points[c]]);
        if area > 0.0 {
            triangles.push([a, b, c]);
        } else if area < 0.0 {
            triangles.push([a, c, b]);
        }
    }

    if triangles.is_empty() {
        return Err(Error::Geometry("Shape produced no triangles".to_string()));
    }

    Ok(ShapeTriangulation { points, triangles })
}

fn insert_vertex(
    cdt: &mut ConstrainedDelaunayTriangulation<SpadePoint<f64>>,
    p: Point2f,
) -> Result<FixedVertexHandle> {
    cdt.insert(SpadePoint::new(p.x as f64, p.y as f64))
        .map_err(|e| Error::Geometry(format!("Failed to insert vertex ({}, {}): {:?}", p.x, p.y, e)))
}
