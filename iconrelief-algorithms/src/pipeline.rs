//! End-to-end icon building: paths → shapes → extruded meshes → fitted group

use std::path::Path;

use iconrelief_core::{Color, Error, MeshGroup, Result, StandardMaterial};
use iconrelief_io::{read_svg, SvgDocument, SvgLoadOptions};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::extrude::{extrude_shape, ExtrudeOptions};
use crate::normalize::{fit_to_target, FitOptions, Normalization};
use crate::shapes::{create_shapes, ShapeOptions};

/// Surface parameters shared by every material of the icon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialOptions {
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for MaterialOptions {
    fn default() -> Self {
        let material = StandardMaterial::default();
        Self {
            metalness: material.metalness,
            roughness: material.roughness,
        }
    }
}

/// Options for [`build_icon`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    pub shapes: ShapeOptions,
    pub extrude: ExtrudeOptions,
    pub fit: FitOptions,
    pub material: MaterialOptions,
}

impl BuildOptions {
    pub fn validate(&self) -> Result<()> {
        self.extrude.validate()?;
        self.fit.validate()?;
        for (name, value) in [("metalness", self.material.metalness), ("roughness", self.material.roughness)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!("{name} must be within [0, 1], got {value}")));
            }
        }
        Ok(())
    }
}

/// Counters describing what [`build_icon`] produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildReport {
    pub paths: usize,
    pub skipped_paths: usize,
    pub shapes: usize,
    pub skipped_shapes: usize,
    pub meshes: usize,
    pub triangles: usize,
    pub normalization: Normalization,
}

/// Extrude every path of `document` into one normalized group.
///
/// Each path contributes one material (its fill color, white when the path
/// has no solid fill) and one sub-mesh per shape. Paths whose fill opacity
/// is zero are skipped.
pub fn build_icon(document: &SvgDocument, options: &BuildOptions) -> Result<(MeshGroup, BuildReport)> {
    options.validate()?;

    let mut group = MeshGroup::new("icon");
    let mut skipped_paths = 0;
    let mut shape_count = 0;
    let mut skipped_shapes = 0;

    debug!(
        width = document.width,
        height = document.height,
        paths = document.paths.len(),
        "building icon"
    );

    for path in &document.paths {
        if path.style.fill_opacity <= 0.0 {
            debug!(path = %path.id, "path fill is fully transparent");
            skipped_paths += 1;
            continue;
        }

        let shapes = create_shapes(path, &options.shapes);
        if shapes.is_empty() {
            debug!(path = %path.id, "path has no fillable area");
            skipped_paths += 1;
            continue;
        }

        let color = match path.style.fill {
            Some(color) => color,
            None => {
                if path.style.stroked {
                    debug!(path = %path.id, "stroke-only outline filled with the default color");
                }
                Color::WHITE
            }
        };
        let material = group.add_material(StandardMaterial {
            color,
            metalness: options.material.metalness,
            roughness: options.material.roughness,
            ..StandardMaterial::default()
        });

        for shape in &shapes {
            shape_count += 1;
            match extrude_shape(shape, &options.extrude) {
                Ok(mesh) if !mesh.is_empty() => group.add_mesh(mesh, material),
                Ok(_) => skipped_shapes += 1,
                Err(e) => {
                    warn!(path = %path.id, error = %e, "failed to extrude shape");
                    skipped_shapes += 1;
                }
            }
        }
        debug!(path = %path.id, shapes = shapes.len(), "extruded path");
    }

    if group.meshes.is_empty() {
        return Err(Error::Geometry("SVG contains no extrudable geometry".to_string()));
    }

    let normalization = fit_to_target(&mut group, &options.fit)?;

    let report = BuildReport {
        paths: document.paths.len(),
        skipped_paths,
        shapes: shape_count,
        skipped_shapes,
        meshes: group.meshes.len(),
        triangles: group.triangle_count(),
        normalization,
    };
    info!(
        width = document.width,
        height = document.height,
        meshes = report.meshes,
        triangles = report.triangles,
        scale = normalization.scale,
        "built icon"
    );

    Ok((group, report))
}

/// Read an SVG from disk and build the icon group
pub fn load_icon<P: AsRef<Path>>(
    path: P,
    svg_options: SvgLoadOptions,
    options: &BuildOptions,
) -> Result<(MeshGroup, BuildReport)> {
    let document = read_svg(path, svg_options)?;
    build_icon(&document, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iconrelief_core::Point2f;
    use iconrelief_io::{PathStyle, SvgLoader, SvgPath, Subpath};

    #[test]
    fn test_default_options_are_valid() {
        assert!(BuildOptions::default().validate().is_ok());
    }

    #[test]
    fn test_bad_material_is_rejected() {
        let mut options = BuildOptions::default();
        options.material.roughness = 1.5;
        assert!(matches!(options.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_one_material_per_path() {
        let document = SvgLoader::default()
            .parse(
                br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
                    <rect width="8" height="8" fill="#ff0000"/>
                    <rect x="10" width="8" height="8" fill="#0000ff"/>
                </svg>"##,
            )
            .unwrap();

        let (group, report) = build_icon(&document, &BuildOptions::default()).unwrap();
        assert_eq!(group.materials.len(), 2);
        assert_eq!(report.meshes, 2);
        assert_eq!(report.skipped_paths, 0);
        assert_eq!(group.materials[0].color, Color::new(1.0, 0.0, 0.0));
        assert_eq!(group.materials[1].color, Color::new(0.0, 0.0, 1.0));
    }

    fn square_path(id: &str, x: f32, fill: Color, fill_opacity: f32) -> SvgPath {
        SvgPath {
            id: id.to_string(),
            style: PathStyle {
                fill: Some(fill),
                fill_opacity,
                ..PathStyle::default()
            },
            subpaths: vec![Subpath {
                points: vec![
                    Point2f::new(x, 0.0),
                    Point2f::new(x + 8.0, 0.0),
                    Point2f::new(x + 8.0, 8.0),
                    Point2f::new(x, 8.0),
                ],
                closed: true,
            }],
        }
    }

    #[test]
    fn test_transparent_paths_are_skipped() {
        let document = SvgDocument {
            width: 20.0,
            height: 10.0,
            paths: vec![
                square_path("hidden", 0.0, Color::new(1.0, 0.0, 0.0), 0.0),
                square_path("faint", 10.0, Color::new(0.0, 0.0, 1.0), 0.5),
            ],
        };

        let (group, report) = build_icon(&document, &BuildOptions::default()).unwrap();
        assert_eq!(report.paths, 2);
        assert_eq!(report.skipped_paths, 1);
        assert_eq!(group.materials.len(), 1);
        assert_eq!(group.materials[0].color, Color::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_only_transparent_paths_is_an_error() {
        let document = SvgDocument {
            width: 10.0,
            height: 10.0,
            paths: vec![square_path("hidden", 0.0, Color::WHITE, 0.0)],
        };
        assert!(matches!(build_icon(&document, &BuildOptions::default()), Err(Error::Geometry(_))));
    }

    #[test]
    fn test_closed_stroke_only_outline_is_filled_white() {
        let document = SvgLoader::default()
            .parse(
                br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
                    <rect width="8" height="8" fill="none" stroke="#00ff00"/>
                </svg>"##,
            )
            .unwrap();
        assert!(document.paths[0].style.stroked);

        let (group, report) = build_icon(&document, &BuildOptions::default()).unwrap();
        assert_eq!(report.meshes, 1);
        assert_eq!(group.materials[0].color, Color::WHITE);
    }
}
