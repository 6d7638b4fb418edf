//! Point and vector aliases used across the workspace

use nalgebra::{Point2, Point3, Vector2, Vector3};

/// A 2D point in the shape plane
pub type Point2f = Point2<f32>;

/// A 2D vector in the shape plane
pub type Vector2f = Vector2<f32>;

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise rings in a Y-up plane.
pub fn signed_area(ring: &[Point2f]) -> f32 {
    if ring.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        area += a.x * b.y - b.x * a.y;
    }
    area * 0.5
}

/// Even-odd point-in-polygon test against a single closed ring
pub fn point_in_ring(point: &Point2f, ring: &[Point2f]) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut j = n - 1;
    for i in 0..n {
        let pi = ring[i];
        let pj = ring[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Winding number of a closed ring around `point`.
///
/// Counter-clockwise rings count +1 per turn, clockwise rings -1.
pub fn winding_number(point: &Point2f, ring: &[Point2f]) -> i32 {
    let n = ring.len();
    if n < 3 {
        return 0;
    }

    let mut winding = 0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let side = (b.x - a.x) * (point.y - a.y) - (point.x - a.x) * (b.y - a.y);
        if a.y <= point.y {
            if b.y > point.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= point.y && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Vec<Point2f> {
        vec![
            Point2f::new(0.0, 0.0),
            Point2f::new(1.0, 0.0),
            Point2f::new(1.0, 1.0),
            Point2f::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_signed_area_orientation() {
        let ccw = unit_square();
        let mut cw = ccw.clone();
        cw.reverse();

        assert_relative_eq!(signed_area(&ccw), 1.0);
        assert_relative_eq!(signed_area(&cw), -1.0);
        assert_eq!(signed_area(&ccw[..2]), 0.0);
    }

    #[test]
    fn test_point_in_ring() {
        let square = unit_square();
        assert!(point_in_ring(&Point2f::new(0.5, 0.5), &square));
        assert!(!point_in_ring(&Point2f::new(1.5, 0.5), &square));
        assert!(!point_in_ring(&Point2f::new(-0.1, 0.9), &square));
    }

    #[test]
    fn test_winding_number_follows_orientation() {
        let ccw = unit_square();
        let mut cw = ccw.clone();
        cw.reverse();
        let inside = Point2f::new(0.5, 0.5);

        assert_eq!(winding_number(&inside, &ccw), 1);
        assert_eq!(winding_number(&inside, &cw), -1);
        assert_eq!(winding_number(&Point2f::new(2.0, 0.5), &ccw), 0);
    }

    #[test]
    fn test_winding_number_counts_double_loops() {
        // Square traced twice
        let mut twice = unit_square();
        twice.extend(unit_square());
        assert_eq!(winding_number(&Point2f::new(0.5, 0.5), &twice), 2);
        assert!(!point_in_ring(&Point2f::new(0.5, 0.5), &twice));
    }
}
