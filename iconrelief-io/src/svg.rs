//! SVG loading
//!
//! Parsing is delegated to `usvg`, which resolves CSS and `style` attributes,
//! `<use>` references, basic shapes and nested transforms into a tree of
//! absolute-positioned paths. This module walks that tree and flattens every
//! path into polylines ready for shape construction.

use std::path::Path;

use iconrelief_core::{Color, Error, Point2f, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use usvg::tiny_skia_path::{PathSegment, Point};

/// How overlapping subpaths of one path decide what is inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// Presentation attributes of a path that matter for extrusion
#[derive(Debug, Clone, PartialEq)]
pub struct PathStyle {
    /// Solid fill color; `None` for `fill="none"` and non-color paints
    pub fill: Option<Color>,
    pub fill_rule: FillRule,
    pub fill_opacity: f32,
    pub stroked: bool,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            fill: None,
            fill_rule: FillRule::NonZero,
            fill_opacity: 1.0,
            stroked: false,
        }
    }
}

/// A flattened subpath in document coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    pub points: Vec<Point2f>,
    pub closed: bool,
}

/// One `<path>` (or basic shape) of the document
#[derive(Debug, Clone)]
pub struct SvgPath {
    pub id: String,
    pub style: PathStyle,
    pub subpaths: Vec<Subpath>,
}

/// Parsed document: its size and every drawable path in paint order
#[derive(Debug, Clone)]
pub struct SvgDocument {
    pub width: f32,
    pub height: f32,
    pub paths: Vec<SvgPath>,
}

impl SvgDocument {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Options controlling SVG flattening
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgLoadOptions {
    /// Number of line segments each Bézier curve is divided into
    pub curve_segments: usize,
}

impl Default for SvgLoadOptions {
    fn default() -> Self {
        Self { curve_segments: 12 }
    }
}

/// Loads SVG files into flattened [`SvgDocument`]s
#[derive(Debug, Clone, Default)]
pub struct SvgLoader {
    options: SvgLoadOptions,
}

impl SvgLoader {
    pub fn new(options: SvgLoadOptions) -> Self {
        Self { options }
    }

    /// Read and parse an SVG (or gzip-compressed SVGZ) file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<SvgDocument> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        debug!(path = %path.display(), bytes = data.len(), "read svg");
        self.parse(&data)
    }

    /// Parse SVG data already in memory
    pub fn parse(&self, data: &[u8]) -> Result<SvgDocument> {
        let tree = usvg::Tree::from_data(data, &usvg::Options::default())
            .map_err(|e| Error::Svg(e.to_string()))?;

        let mut paths = Vec::new();
        self.collect_group(tree.root(), &mut paths);

        let size = tree.size();
        Ok(SvgDocument {
            width: size.width(),
            height: size.height(),
            paths,
        })
    }

    fn collect_group(&self, group: &usvg::Group, out: &mut Vec<SvgPath>) {
        for node in group.children() {
            match node {
                usvg::Node::Group(child) => self.collect_group(child, out),
                usvg::Node::Path(path) => {
                    if !path.is_visible() {
                        debug!(id = path.id(), "skipping hidden path");
                        continue;
                    }
                    out.push(self.convert_path(path));
                }
                usvg::Node::Text(text) => self.collect_group(text.flattened(), out),
                usvg::Node::Image(image) => {
                    warn!(id = image.id(), "raster images cannot be extruded, skipping");
                }
            }
        }
    }

    fn convert_path(&self, path: &usvg::Path) -> SvgPath {
        let style = match path.fill() {
            Some(fill) => PathStyle {
                fill: match fill.paint() {
                    usvg::Paint::Color(c) => Some(Color::from_srgb8(c.red, c.green, c.blue)),
                    _ => None,
                },
                fill_rule: match fill.rule() {
                    usvg::FillRule::NonZero => FillRule::NonZero,
                    usvg::FillRule::EvenOdd => FillRule::EvenOdd,
                },
                fill_opacity: fill.opacity().get(),
                stroked: path.stroke().is_some(),
            },
            None => PathStyle {
                stroked: path.stroke().is_some(),
                ..PathStyle::default()
            },
        };

        let transform = path.abs_transform();
        let map = |p: Point| -> Point2f {
            Point2f::new(
                transform.sx * p.x + transform.kx * p.y + transform.tx,
                transform.ky * p.x + transform.sy * p.y + transform.ty,
            )
        };

        let subpaths = flatten_segments(path.data().segments(), self.options.curve_segments, map);

        SvgPath {
            id: path.id().to_string(),
            style,
            subpaths,
        }
    }
}

/// Flatten path segments into polylines, mapping every emitted point
fn flatten_segments<I, F>(segments: I, curve_segments: usize, map: F) -> Vec<Subpath>
where
    I: IntoIterator<Item = PathSegment>,
    F: Fn(Point) -> Point2f,
{
    let divisions = curve_segments.max(1);
    let mut subpaths = Vec::new();
    let mut current: Vec<Point2f> = Vec::new();
    let mut start = Point::zero();
    let mut last = Point::zero();

    for segment in segments {
        match segment {
            PathSegment::MoveTo(p) => {
                finish_subpath(&mut subpaths, &mut current, false);
                push_point(&mut current, map(p));
                start = p;
                last = p;
            }
            PathSegment::LineTo(p) => {
                ensure_started(&mut current, &map, last);
                push_point(&mut current, map(p));
                last = p;
            }
            PathSegment::QuadTo(c, p) => {
                ensure_started(&mut current, &map, last);
                for i in 1..=divisions {
                    let t = i as f32 / divisions as f32;
                    let mt = 1.0 - t;
                    let x = mt * mt * last.x + 2.0 * mt * t * c.x + t * t * p.x;
                    let y = mt * mt * last.y + 2.0 * mt * t * c.y + t * t * p.y;
                    push_point(&mut current, map(Point::from_xy(x, y)));
                }
                last = p;
            }
            PathSegment::CubicTo(c1, c2, p) => {
                ensure_started(&mut current, &map, last);
                for i in 1..=divisions {
                    let t = i as f32 / divisions as f32;
                    let mt = 1.0 - t;
                    let a = mt * mt * mt;
                    let b = 3.0 * mt * mt * t;
                    let c = 3.0 * mt * t * t;
                    let d = t * t * t;
                    let x = a * last.x + b * c1.x + c * c2.x + d * p.x;
                    let y = a * last.y + b * c1.y + c * c2.y + d * p.y;
                    push_point(&mut current, map(Point::from_xy(x, y)));
                }
                last = p;
            }
            PathSegment::Close => {
                finish_subpath(&mut subpaths, &mut current, true);
                last = start;
            }
        }
    }
    finish_subpath(&mut subpaths, &mut current, false);

    subpaths
}

fn ensure_started<F: Fn(Point) -> Point2f>(current: &mut Vec<Point2f>, map: &F, last: Point) {
    if current.is_empty() {
        current.push(map(last));
    }
}

fn push_point(current: &mut Vec<Point2f>, point: Point2f) {
    if current.last() != Some(&point) {
        current.push(point);
    }
}

fn finish_subpath(subpaths: &mut Vec<Subpath>, current: &mut Vec<Point2f>, closed: bool) {
    let mut points = std::mem::take(current);
    if closed && points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() >= 2 {
        subpaths.push(Subpath { points, closed });
    }
}
