//! Planar shape construction from flattened SVG paths
//!
//! A path is a set of closed rings. Which rings bound filled regions and which
//! cut holes depends on nesting and on the path's fill rule; this module
//! resolves that into independent [`Shape`]s (one outer ring plus its holes).

use iconrelief_core::{point_in_ring, signed_area, winding_number, Point2f, Vector2f};
use iconrelief_io::{FillRule, SvgPath};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rings with an absolute area below this are dropped as degenerate
const MIN_RING_AREA: f32 = 1e-6;

/// Segment parameters closer than this to 0 or 1 count as endpoint hits
const PARAM_EPSILON: f32 = 1e-5;

/// Options for turning SVG paths into shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeOptions {
    /// Negate Y so that SVG's downward Y axis renders upright in a Y-up world.
    /// On by default; the icon would otherwise appear upside down.
    pub flip_y: bool,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self { flip_y: true }
    }
}

/// A filled planar region bounded by closed rings.
///
/// Simple shapes (built with [`Shape::new`]) have a counter-clockwise outer
/// ring and clockwise holes, none of which cross. When rings of a path cross
/// each other or themselves, the path becomes a single shape built with
/// [`Shape::with_crossings`]: the rings keep their winding, `outer` is the
/// largest of them and coverage follows `fill_rule`.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub outer: Vec<Point2f>,
    pub holes: Vec<Vec<Point2f>>,
    pub fill_rule: FillRule,
    crossing: bool,
}

impl Shape {
    /// Build a simple shape, fixing ring orientation as needed
    pub fn new(mut outer: Vec<Point2f>, holes: Vec<Vec<Point2f>>) -> Self {
        if signed_area(&outer) < 0.0 {
            outer.reverse();
        }
        let holes = holes
            .into_iter()
            .map(|mut hole| {
                if signed_area(&hole) > 0.0 {
                    hole.reverse();
                }
                hole
            })
            .collect();

        Self {
            outer,
            holes,
            fill_rule: FillRule::NonZero,
            crossing: false,
        }
    }

    /// Build a shape from rings that may cross; winding is kept as given
    pub fn with_crossings(mut rings: Vec<Vec<Point2f>>, fill_rule: FillRule) -> Self {
        let largest = rings
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| signed_area(a).abs().total_cmp(&signed_area(b).abs()))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let outer = if rings.is_empty() { Vec::new() } else { rings.swap_remove(largest) };

        Self {
            outer,
            holes: rings,
            fill_rule,
            crossing: true,
        }
    }

    /// Whether rings of this shape cross each other or themselves
    pub fn has_crossings(&self) -> bool {
        self.crossing
    }

    /// Net signed area of the rings: outer minus holes for simple shapes.
    ///
    /// Overlapping regions of crossing rings are counted once per winding.
    pub fn area(&self) -> f32 {
        signed_area(&self.outer) + self.holes.iter().map(|h| signed_area(h)).sum::<f32>()
    }

    /// Sum of the rings' winding numbers around `point`
    pub fn winding_number(&self, point: &Point2f) -> i32 {
        self.rings().map(|ring| winding_number(point, ring)).sum()
    }

    /// Inside test under the shape's fill rule
    pub fn contains(&self, point: &Point2f) -> bool {
        let winding = self.winding_number(point);
        match self.fill_rule {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }

    /// Outer ring followed by every hole
    pub fn rings(&self) -> impl Iterator<Item = &Vec<Point2f>> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    /// Ring edges split wherever rings cross or touch, for use as triangulation constraints
    pub fn constraint_edges(&self) -> Vec<(Point2f, Point2f)> {
        let rings: Vec<&[Point2f]> = self.rings().map(Vec::as_slice).collect();
        if self.crossing {
            split_at_crossings(&rings)
        } else {
            rings.iter().flat_map(|ring| ring_edges(ring)).collect()
        }
    }

    /// Directed boundary edges with the filled side on the left.
    ///
    /// Edges with the same coverage on both sides (inside a nonzero overlap,
    /// for example) are not part of the boundary and are left out.
    pub fn boundary_edges(&self) -> Vec<(Point2f, Point2f)> {
        if !self.crossing {
            return self.constraint_edges();
        }

        self.constraint_edges()
            .into_iter()
            .filter_map(|(a, b)| {
                let edge: Vector2f = b - a;
                let length = edge.norm();
                if length <= f32::EPSILON {
                    return None;
                }
                let left = Vector2f::new(-edge.y, edge.x) * 1e-4;
                let mid = a + edge * 0.5;
                match (self.contains(&(mid + left)), self.contains(&(mid - left))) {
                    (true, false) => Some((a, b)),
                    (false, true) => Some((b, a)),
                    _ => None,
                }
            })
            .collect()
    }
}

struct Ring {
    points: Vec<Point2f>,
    area: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Role {
    Solid,
    Hole,
    Redundant,
}

/// Convert one SVG path into filled shapes.
///
/// Open subpaths are treated as implicitly closed, as SVG filling does.
/// Paths whose rings cross become one shape carrying the path's fill rule;
/// otherwise rings are nested into independent outer/hole shapes.
pub fn create_shapes(path: &SvgPath, options: &ShapeOptions) -> Vec<Shape> {
    let rings: Vec<Ring> = path
        .subpaths
        .iter()
        .filter_map(|subpath| {
            let points: Vec<Point2f> = subpath
                .points
                .iter()
                .map(|p| if options.flip_y { Point2f::new(p.x, -p.y) } else { *p })
                .collect();
            let area = signed_area(&points);
            (points.len() >= 3 && area.abs() >= MIN_RING_AREA).then_some(Ring { points, area })
        })
        .collect();

    if rings.is_empty() {
        return Vec::new();
    }

    if rings_cross(&rings) {
        debug!(path = %path.id, rings = rings.len(), "path outlines cross, keeping one shape");
        let rings = rings.into_iter().map(|r| r.points).collect();
        return vec![Shape::with_crossings(rings, path.style.fill_rule)];
    }

    // containers[i] lists every ring that contains ring i
    let containers: Vec<Vec<usize>> = (0..rings.len())
        .map(|i| {
            (0..rings.len())
                .filter(|&j| j != i && ring_contains(&rings[j], &rings[i]))
                .collect()
        })
        .collect();

    let roles: Vec<Role> = (0..rings.len())
        .map(|i| classify(i, &rings, &containers[i], path.style.fill_rule))
        .collect();

    let mut outers: Vec<usize> = Vec::new();
    let mut holes_of: Vec<Vec<usize>> = vec![Vec::new(); rings.len()];

    for i in 0..rings.len() {
        match roles[i] {
            Role::Solid => outers.push(i),
            Role::Hole => {
                let parent = containers[i]
                    .iter()
                    .copied()
                    .filter(|&j| roles[j] == Role::Solid)
                    .min_by(|&a, &b| rings[a].area.abs().total_cmp(&rings[b].area.abs()));
                match parent {
                    Some(parent) => holes_of[parent].push(i),
                    None => debug!(path = %path.id, ring = i, "hole without enclosing ring dropped"),
                }
            }
            Role::Redundant => debug!(path = %path.id, ring = i, "ring does not change coverage"),
        }
    }

    outers
        .into_iter()
        .map(|i| {
            let holes = holes_of[i].iter().map(|&h| rings[h].points.clone()).collect();
            Shape::new(rings[i].points.clone(), holes)
        })
        .collect()
}

/// Whether `inner` lies inside `outer`. Rings must not cross.
///
/// Vertices shared with `outer` are ignored; every other vertex has to be inside.
fn ring_contains(outer: &Ring, inner: &Ring) -> bool {
    if inner.area.abs() > outer.area.abs() {
        return false;
    }
    let mut free = inner.points.iter().filter(|p| !outer.points.contains(*p)).peekable();
    free.peek().is_some() && free.all(|p| point_in_ring(p, &outer.points))
}

fn classify(index: usize, rings: &[Ring], containers: &[usize], rule: FillRule) -> Role {
    match rule {
        FillRule::EvenOdd => {
            if containers.len() % 2 == 0 {
                Role::Solid
            } else {
                Role::Hole
            }
        }
        FillRule::NonZero => {
            let winding = |r: &Ring| if r.area > 0.0 { 1 } else { -1 };
            let outside: i32 = containers.iter().map(|&j| winding(&rings[j])).sum();
            let inside = outside + winding(&rings[index]);
            match (outside == 0, inside == 0) {
                (true, false) => Role::Solid,
                (false, true) => Role::Hole,
                _ => Role::Redundant,
            }
        }
    }
}

fn ring_edges(ring: &[Point2f]) -> impl Iterator<Item = (Point2f, Point2f)> + '_ {
    (0..ring.len())
        .map(move |i| (ring[i], ring[(i + 1) % ring.len()]))
        .filter(|(a, b)| a != b)
}

/// Intersection of segments `p` and `q` as (parameter on p, parameter on q, point).
///
/// Parallel segments report nothing. The point snaps to an endpoint when the
/// hit lies on one, so both segments split at bit-identical coordinates.
fn segment_intersection(p: (Point2f, Point2f), q: (Point2f, Point2f)) -> Option<(f32, f32, Point2f)> {
    let r = p.1 - p.0;
    let s = q.1 - q.0;
    let denom = r.perp(&s);
    if denom.abs() <= f32::EPSILON * r.norm() * s.norm() {
        return None;
    }

    let offset = q.0 - p.0;
    let t = offset.perp(&s) / denom;
    let u = offset.perp(&r) / denom;
    let range = -PARAM_EPSILON..=1.0 + PARAM_EPSILON;
    if !range.contains(&t) || !range.contains(&u) {
        return None;
    }

    let point = if u <= PARAM_EPSILON {
        q.0
    } else if u >= 1.0 - PARAM_EPSILON {
        q.1
    } else if t <= PARAM_EPSILON {
        p.0
    } else if t >= 1.0 - PARAM_EPSILON {
        p.1
    } else {
        p.0 + r * t
    };
    Some((t.clamp(0.0, 1.0), u.clamp(0.0, 1.0), point))
}

fn is_interior(t: f32) -> bool {
    t > PARAM_EPSILON && t < 1.0 - PARAM_EPSILON
}

/// Whether any two ring edges cross at interior points, within a ring or between rings
fn rings_cross(rings: &[Ring]) -> bool {
    let edges: Vec<(Point2f, Point2f)> = rings.iter().flat_map(|r| ring_edges(&r.points)).collect();
    (0..edges.len()).any(|i| {
        (i + 1..edges.len()).any(|j| {
            segment_intersection(edges[i], edges[j]).is_some_and(|(t, u, _)| is_interior(t) && is_interior(u))
        })
    })
}

/// Split every ring edge at the points where it meets another edge
fn split_at_crossings(rings: &[&[Point2f]]) -> Vec<(Point2f, Point2f)> {
    let edges: Vec<(Point2f, Point2f)> = rings.iter().flat_map(|ring| ring_edges(ring)).collect();
    let mut cuts: Vec<Vec<(f32, Point2f)>> = vec![Vec::new(); edges.len()];

    for i in 0..edges.len() {
        for j in i + 1..edges.len() {
            if let Some((t, u, point)) = segment_intersection(edges[i], edges[j]) {
                if is_interior(t) {
                    cuts[i].push((t, point));
                }
                if is_interior(u) {
                    cuts[j].push((u, point));
                }
            }
        }
    }

    let mut segments = Vec::with_capacity(edges.len());
    for ((start, end), mut cut) in edges.into_iter().zip(cuts) {
        cut.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut from = start;
        for (_, point) in cut {
            if point != from && point != end {
                segments.push((from, point));
                from = point;
            }
        }
        segments.push((from, end));
    }
    segments
}
