//! Integration tests for iconrelief-algorithms
//!
//! These tests run real SVG markup through the whole pipeline and check the
//! geometric guarantees of the resulting icon group.

use approx::assert_relative_eq;
use iconrelief_algorithms::*;
use iconrelief_core::{Color, Drawable, Point3f, Transformable};
use iconrelief_io::{SvgLoadOptions, SvgLoader};

/// Square badge with a square window cut out (even-odd) and a blue dot
const BADGE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64" width="64" height="64">
    <path fill="#ff8800" fill-rule="evenodd" d="M0 0 H64 V64 H0 Z M16 16 H48 V48 H16 Z"/>
    <circle cx="32" cy="32" r="8" fill="#0000ff"/>
</svg>"##;

fn build(svg: &str, options: &BuildOptions) -> (iconrelief_core::MeshGroup, BuildReport) {
    let document = SvgLoader::new(SvgLoadOptions::default()).parse(svg.as_bytes()).unwrap();
    build_icon(&document, options).unwrap()
}

#[test]
fn test_badge_fits_target_box() {
    let (group, report) = build(BADGE_SVG, &BuildOptions::default());

    assert_eq!(report.paths, 2);
    assert_eq!(report.meshes, 2);
    assert!(report.triangles > 0);

    let world = group.bounding_box();
    assert_relative_eq!(world.max_dimension(), 800.0, epsilon = 1e-2);
    assert!(world.size().z <= 800.0);
    assert_relative_eq!(world.center(), Point3f::new(150.0, 150.0, 0.0), epsilon = 1e-2);
}

#[test]
fn test_scale_uses_largest_dimension() {
    let (_, report) = build(BADGE_SVG, &BuildOptions::default());

    // 64 units wide, 20 deep: width dominates.
    assert_relative_eq!(report.normalization.scale, 800.0 / 64.0, epsilon = 1e-4);
}

#[test]
fn test_extrusion_spans_depth_in_local_space() {
    let options = BuildOptions {
        extrude: ExtrudeOptions { depth: 5.0, steps: 1 },
        ..BuildOptions::default()
    };
    let (group, _) = build(BADGE_SVG, &options);

    let local = group.local_bounding_box();
    assert_relative_eq!(local.min.z, 0.0);
    assert_relative_eq!(local.max.z, 5.0);
}

/// Area of the faces lying entirely in the plane `z`
fn cap_area(mesh: &iconrelief_core::TriangleMesh, z: f32) -> f32 {
    mesh.faces
        .iter()
        .filter(|f| f.iter().all(|&i| mesh.vertices[i].z == z))
        .map(|f| {
            let a = mesh.vertices[f[0]];
            let b = mesh.vertices[f[1]];
            let c = mesh.vertices[f[2]];
            (b - a).cross(&(c - a)).norm() * 0.5
        })
        .sum()
}

/// Local-space cap areas summed over every mesh of the group
fn total_cap_areas(group: &iconrelief_core::MeshGroup, depth: f32) -> (f32, f32) {
    group.meshes.iter().fold((0.0, 0.0), |(back, front), mesh| {
        (back + cap_area(&mesh.geometry, 0.0), front + cap_area(&mesh.geometry, depth))
    })
}

fn unflipped() -> BuildOptions {
    BuildOptions {
        shapes: ShapeOptions { flip_y: false },
        ..BuildOptions::default()
    }
}

#[test]
fn test_window_stays_open() {
    let (group, _) = build(BADGE_SVG, &unflipped());

    // Both caps of the frame cover 64^2 - 32^2 in document units.
    let frame = &group.meshes[0].geometry;
    assert_relative_eq!(cap_area(frame, 20.0), 64.0 * 64.0 - 32.0 * 32.0, epsilon = 0.5);
    assert_relative_eq!(cap_area(frame, 0.0), 64.0 * 64.0 - 32.0 * 32.0, epsilon = 0.5);
}

#[test]
fn test_crossing_subpaths_follow_fill_rule() {
    let svg = |rule: &str| {
        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="15" height="15">
                <path fill="#ffffff" fill-rule="{rule}" d="M0 0 H10 V10 H0 Z M5 5 H15 V15 H5 Z"/>
            </svg>"##
        )
    };

    let (group, report) = build(&svg("nonzero"), &unflipped());
    assert_eq!(report.shapes, 1);
    let (back, front) = total_cap_areas(&group, 20.0);
    assert_relative_eq!(front, 175.0, epsilon = 0.1);
    assert_relative_eq!(back, 175.0, epsilon = 0.1);

    let (group, _) = build(&svg("evenodd"), &unflipped());
    let (back, front) = total_cap_areas(&group, 20.0);
    assert_relative_eq!(front, 150.0, epsilon = 0.1);
    assert_relative_eq!(back, 150.0, epsilon = 0.1);
}

#[test]
fn test_self_intersecting_star_fills_center_under_nonzero() {
    let svg = |rule: &str| {
        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20">
                <polygon fill="#ffcc00" fill-rule="{rule}" points="10,0 15.878,18.090 0.489,6.910 19.511,6.910 4.122,18.090"/>
            </svg>"##
        )
    };

    let (nonzero, _) = build(&svg("nonzero"), &unflipped());
    let (evenodd, _) = build(&svg("evenodd"), &unflipped());
    let (nonzero_back, nonzero_front) = total_cap_areas(&nonzero, 20.0);
    let (evenodd_back, evenodd_front) = total_cap_areas(&evenodd, 20.0);

    // Only the inner pentagon differs; its circumradius is 10 * 0.381966.
    let pentagon = 2.5 * (10.0f32 * 0.381966).powi(2) * 72f32.to_radians().sin();
    assert_relative_eq!(nonzero_front - evenodd_front, pentagon, epsilon = 0.1);
    assert_relative_eq!(nonzero_back, nonzero_front, epsilon = 1e-3);
    assert_relative_eq!(evenodd_back, evenodd_front, epsilon = 1e-3);
}

#[test]
fn test_fill_colors_and_white_default() {
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20">
        <defs>
            <linearGradient id="g"><stop offset="0" stop-color="#000"/><stop offset="1" stop-color="#fff"/></linearGradient>
        </defs>
        <rect width="10" height="10" fill="#00ff00"/>
        <rect x="20" width="10" height="10" fill="url(#g)"/>
    </svg>"##;
    let (group, _) = build(svg, &BuildOptions::default());

    assert_eq!(group.materials[0].color, Color::new(0.0, 1.0, 0.0));
    assert_eq!(group.materials[1].color, Color::WHITE);
    assert!(group.materials.iter().all(|m| m.side == iconrelief_core::Side::Double));
}

#[test]
fn test_flip_y_keeps_icon_upright() {
    // A tall bar at the top of the document must end up above a bar at the bottom.
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="100">
        <rect width="10" height="10" fill="#ff0000"/>
        <rect y="90" width="10" height="10" fill="#0000ff"/>
    </svg>"##;
    let (group, _) = build(svg, &BuildOptions::default());

    let top = group.meshes[0].geometry.center();
    let bottom = group.meshes[1].geometry.center();
    assert!(top.y > bottom.y);
}

#[test]
fn test_document_without_fillable_area_is_an_error() {
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
        <path fill="none" stroke="#000" d="M0 0 L10 10"/>
    </svg>"##;
    let document = SvgLoader::default().parse(svg.as_bytes()).unwrap();

    let result = build_icon(&document, &BuildOptions::default());
    assert!(result.is_err());
}

#[test]
fn test_meshes_can_be_baked_into_world_space() {
    let (group, _) = build(BADGE_SVG, &BuildOptions::default());
    let world = group.world_transform();

    let mut baked = (*group.meshes[0].geometry).clone();
    baked.transform(&world);
    let bbox = baked.bounding_box();

    assert_relative_eq!(bbox.max_dimension(), 800.0, epsilon = 1e-2);
}
