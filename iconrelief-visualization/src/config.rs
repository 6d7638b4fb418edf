//! Viewer configuration

use std::path::{Path, PathBuf};

use iconrelief_algorithms::BuildOptions;
use iconrelief_core::{Color, Error, Light, Point3f, Result};
use iconrelief_io::SvgLoadOptions;
use serde::{Deserialize, Serialize};

use crate::camera::PerspectiveCamera;

/// Window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner width in logical pixels
    pub width: u32,
    /// Initial inner height in logical pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "iconrelief".to_string(),
            width: 1280,
            height: 800,
        }
    }
}

/// Perspective camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 1.0,
            far: 5000.0,
            position: [0.0, 0.0, 1500.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Orbit control settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    /// `None` leaves the dolly distance unbounded
    pub max_distance: Option<f32>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: None,
        }
    }
}

/// Light settings; both lights are white
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    pub ambient_intensity: f32,
    pub directional_intensity: f32,
    /// The directional light shines from here toward the origin
    pub directional_position: [f32; 3],
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: 1.0,
            directional_intensity: 0.8,
            directional_position: [0.0, 0.0, 1000.0],
        }
    }
}

/// Everything the viewer needs to start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub svg_path: PathBuf,
    pub window: WindowConfig,
    /// CSS-style hex color
    pub background: String,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub lights: LightsConfig,
    pub svg: SvgLoadOptions,
    pub build: BuildOptions,
    pub multisampling: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            svg_path: PathBuf::from("favicon.svg"),
            window: WindowConfig::default(),
            background: "#0e0e0e".to_string(),
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
            lights: LightsConfig::default(),
            svg: SvgLoadOptions::default(),
            build: BuildOptions::default(),
            multisampling: true,
        }
    }
}

impl ViewerConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid config: {}", e)))
    }

    /// Read a JSON config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Check every value the viewer relies on before any window is opened
    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(Error::Config(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        self.background_color()?;

        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(Error::Config(format!("camera fov must be within (0, 180), got {}", camera.fov_degrees)));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(Error::Config(format!(
                "camera clip planes must satisfy 0 < near < far, got near {} far {}",
                camera.near, camera.far
            )));
        }
        if camera.position == camera.target {
            return Err(Error::Config("camera position and target must differ".to_string()));
        }

        let controls = &self.controls;
        if !(controls.damping_factor > 0.0 && controls.damping_factor <= 1.0) {
            return Err(Error::Config(format!(
                "damping factor must be within (0, 1], got {}",
                controls.damping_factor
            )));
        }
        let max_distance = controls.max_distance.unwrap_or(f32::INFINITY);
        if !(controls.min_distance >= 0.0 && controls.min_distance <= max_distance) {
            return Err(Error::Config(format!(
                "distance limits must satisfy 0 <= min <= max, got min {} max {}",
                controls.min_distance, max_distance
            )));
        }

        if self.svg.curve_segments == 0 {
            return Err(Error::Config("curve segments must be at least 1".to_string()));
        }

        self.build.validate()
    }

    /// Background as a linear color
    pub fn background_color(&self) -> Result<Color> {
        Color::parse(&self.background)
            .map_err(|e| Error::Config(format!("invalid background color: {}", e)))
    }

    /// Camera at the configured pose with the given aspect ratio
    pub fn create_camera(&self, aspect_ratio: f32) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(self.camera.fov_degrees, aspect_ratio, self.camera.near, self.camera.far);
        camera.position = Point3f::from(self.camera.position);
        camera.target = Point3f::from(self.camera.target);
        camera
    }

    /// White ambient light plus one white directional light aimed at the origin
    pub fn scene_lights(&self) -> Vec<Light> {
        vec![
            Light::Ambient {
                color: Color::WHITE,
                intensity: self.lights.ambient_intensity,
            },
            Light::Directional {
                color: Color::WHITE,
                intensity: self.lights.directional_intensity,
                position: Point3f::from(self.lights.directional_position),
                target: Point3f::origin(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.svg_path, PathBuf::from("favicon.svg"));
        assert_relative_eq!(config.build.extrude.depth, 20.0);
        assert_relative_eq!(config.build.fit.target_size, 800.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json_str(
            r#"{ "svg_path": "logo.svg", "build": { "extrude": { "depth": 5 } }, "controls": { "enable_damping": false } }"#,
        )
        .unwrap();

        assert_eq!(config.svg_path, PathBuf::from("logo.svg"));
        assert_relative_eq!(config.build.extrude.depth, 5.0);
        assert_eq!(config.build.extrude.steps, 1);
        assert!(!config.controls.enable_damping);
        assert_relative_eq!(config.controls.damping_factor, 0.05);
        assert_eq!(config.window.width, 1280);
    }

    #[test]
    fn test_json_round_trip() {
        let config = ViewerConfig::default();
        let json = config.to_json_string().unwrap();
        assert_eq!(ViewerConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let result = ViewerConfig::from_json_str("{ \"window\": 3 }");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = ViewerConfig::default();
        config.background = "dark".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = ViewerConfig::default();
        config.window.height = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = ViewerConfig::default();
        config.controls.damping_factor = 0.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = ViewerConfig::default();
        config.build.extrude.depth = -1.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = ViewerConfig::default();
        config.build.fit.target_size = 0.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_scene_lights() {
        let lights = ViewerConfig::default().scene_lights();
        assert_eq!(lights.len(), 2);

        let direction = lights[1].direction_to_light().unwrap();
        assert_relative_eq!(direction.z, 1.0);
        assert!(lights[0].direction_to_light().is_none());
    }

    #[test]
    fn test_create_camera() {
        let camera = ViewerConfig::default().create_camera(2.0);
        assert_relative_eq!(camera.fov, 75f32.to_radians());
        assert_relative_eq!(camera.position.z, 1500.0);
        assert_relative_eq!(camera.aspect_ratio, 2.0);
    }
}
