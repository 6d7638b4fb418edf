//! In-memory scene graph: the extruded icon group, its materials and the lights

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Aabb, Color, Point3f, Transform3D, TriangleMesh, Vector3f};

/// Which faces of a mesh are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Front,
    Back,
    Double,
}

/// Physically based surface description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardMaterial {
    pub color: Color,
    pub metalness: f32,
    pub roughness: f32,
    pub side: Side,
    pub depth_write: bool,
}

impl StandardMaterial {
    /// Material with the given base color and default surface parameters
    pub fn with_color(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            metalness: 0.2,
            roughness: 0.7,
            side: Side::Double,
            depth_write: true,
        }
    }
}

/// One geometry + material pair inside a [`MeshGroup`]
#[derive(Debug, Clone)]
pub struct IconMesh {
    pub geometry: Arc<TriangleMesh>,
    /// Index into [`MeshGroup::materials`]
    pub material: usize,
}

/// Group node holding every sub-mesh of the extruded icon.
///
/// Sub-mesh vertices live in the group's local space; the world matrix is
/// `T(position) * S(scale)`.
#[derive(Debug, Clone)]
pub struct MeshGroup {
    pub name: String,
    pub materials: Vec<StandardMaterial>,
    pub meshes: Vec<IconMesh>,
    pub position: Vector3f,
    pub scale: Vector3f,
}

impl MeshGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            materials: Vec::new(),
            meshes: Vec::new(),
            position: Vector3f::zeros(),
            scale: Vector3f::new(1.0, 1.0, 1.0),
        }
    }

    /// Register a material and return its index
    pub fn add_material(&mut self, material: StandardMaterial) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Add a sub-mesh that uses the material at `material`
    pub fn add_mesh(&mut self, geometry: TriangleMesh, material: usize) {
        self.meshes.push(IconMesh {
            geometry: Arc::new(geometry),
            material,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.iter().all(|m| m.geometry.is_empty())
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.geometry.face_count()).sum()
    }

    pub fn world_transform(&self) -> Transform3D {
        Transform3D::from_translation_scale(self.position, self.scale)
    }

    /// Bounding box of the untransformed sub-mesh vertices
    pub fn local_bounding_box(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for mesh in &self.meshes {
            aabb.union(&Aabb::from_points(&mesh.geometry.vertices));
        }
        aabb
    }

    /// Bounding box in world space, over every vertex
    pub fn world_bounding_box(&self) -> Aabb {
        let world = self.world_transform();
        let mut aabb = Aabb::empty();
        for mesh in &self.meshes {
            for vertex in &mesh.geometry.vertices {
                aabb.expand_by_point(&world.transform_point(vertex));
            }
        }
        aabb
    }

    /// Material of a sub-mesh, the default material for dangling indices
    pub fn material_of(&self, mesh: &IconMesh) -> StandardMaterial {
        self.materials.get(mesh.material).copied().unwrap_or_default()
    }
}

/// Light sources supported by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    /// Parallel light shining from `position` toward `target`
    Directional {
        color: Color,
        intensity: f32,
        position: Point3f,
        target: Point3f,
    },
}

impl Light {
    /// Unit vector pointing from the lit surface toward the light
    pub fn direction_to_light(&self) -> Option<Vector3f> {
        match self {
            Light::Ambient { .. } => None,
            Light::Directional { position, target, .. } => (position - target).try_normalize(f32::EPSILON),
        }
    }
}

/// Everything the renderer draws: background, lights and at most one icon
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color,
    pub lights: Vec<Light>,
    pub icon: Option<MeshGroup>,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            lights: Vec::new(),
            icon: None,
        }
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Attach the icon group; a second call replaces the first icon
    pub fn set_icon(&mut self, group: MeshGroup) {
        self.icon = Some(group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> TriangleMesh {
        TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 1.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn test_default_material_matches_icon_look() {
        let material = StandardMaterial::default();
        assert_eq!(material.color, Color::WHITE);
        assert_eq!(material.side, Side::Double);
        assert_relative_eq!(material.metalness, 0.2);
        assert_relative_eq!(material.roughness, 0.7);
        assert!(material.depth_write);
    }

    #[test]
    fn test_group_bounding_boxes() {
        let mut group = MeshGroup::new("icon");
        let red = group.add_material(StandardMaterial::with_color(Color::new(1.0, 0.0, 0.0)));
        group.add_mesh(unit_triangle(), red);

        let local = group.local_bounding_box();
        assert_eq!(local.max, Point3f::new(1.0, 1.0, 1.0));

        group.scale = Vector3f::new(2.0, 2.0, 2.0);
        group.position = Vector3f::new(10.0, 0.0, 0.0);
        let world = group.world_bounding_box();
        assert_relative_eq!(world.min, Point3f::new(10.0, 0.0, 0.0));
        assert_relative_eq!(world.max, Point3f::new(12.0, 2.0, 2.0));
        assert_eq!(group.triangle_count(), 1);
        assert_eq!(group.material_of(&group.meshes[0]).color, Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_directional_light_direction() {
        let light = Light::Directional {
            color: Color::WHITE,
            intensity: 0.8,
            position: Point3f::new(0.0, 0.0, 1000.0),
            target: Point3f::origin(),
        };
        assert_relative_eq!(light.direction_to_light().unwrap(), Vector3f::z());

        let ambient = Light::Ambient { color: Color::WHITE, intensity: 1.0 };
        assert!(ambient.direction_to_light().is_none());
    }

    #[test]
    fn test_scene_holds_single_icon() {
        let mut scene = Scene::new(Color::from_hex(0x0e0e0e));
        assert!(scene.icon.is_none());

        scene.set_icon(MeshGroup::new("first"));
        scene.set_icon(MeshGroup::new("second"));
        assert_eq!(scene.icon.as_ref().map(|g| g.name.as_str()), Some("second"));
    }
}
