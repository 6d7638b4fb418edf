//! Orbit camera controls
//!
//! Rotation and panning accumulate as pending deltas from pointer input and
//! are applied to the camera by [`OrbitControls::update`], once per frame.
//! With damping enabled only a fraction of the pending delta is applied per
//! update, so the camera glides to rest over several frames.

use std::f32::consts::PI;

use nalgebra::{Point3, Vector3};

use crate::camera::PerspectiveCamera;
use crate::config::ControlsConfig;

/// Keeps the polar angle away from the poles, where the view direction is parallel to `up`
const POLAR_EPSILON: f32 = 1e-6;
const CHANGE_EPSILON: f32 = 1e-6;
const ZOOM_BASE: f32 = 0.95;

/// What a pointer drag currently does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAction {
    None,
    Rotate,
    Pan,
}

/// Spherical coordinates around the Y axis: `theta` is the azimuth measured
/// from +Z toward +X, `phi` the polar angle from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(offset: &Vector3<f32>) -> Self {
        let radius = offset.norm();
        if radius == 0.0 {
            return Self { radius, theta: 0.0, phi: 0.0 };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vector3<f32> {
        let sin_phi = self.phi.sin();
        Vector3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }

    fn make_safe(&mut self) {
        self.phi = self.phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
    }
}

/// Orbit, pan and dolly a [`PerspectiveCamera`] around its target
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    drag: DragAction,
    last_cursor: Option<(f64, f64)>,

    spherical_delta: Spherical,
    pan_offset: Vector3<f32>,
    scale: f32,

    initial_position: Point3<f32>,
    initial_target: Point3<f32>,
}

impl OrbitControls {
    /// Create controls for `camera`, remembering its current pose for [`reset`](Self::reset)
    pub fn new(camera: &PerspectiveCamera, config: &ControlsConfig) -> Self {
        Self {
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            pan_speed: config.pan_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance.unwrap_or(f32::INFINITY),
            drag: DragAction::None,
            last_cursor: None,
            spherical_delta: Spherical { radius: 0.0, theta: 0.0, phi: 0.0 },
            pan_offset: Vector3::zeros(),
            scale: 1.0,
            initial_position: camera.position,
            initial_target: camera.target,
        }
    }

    pub fn drag_action(&self) -> DragAction {
        self.drag
    }

    /// Start a drag; the next cursor move only records the anchor position
    pub fn begin_drag(&mut self, action: DragAction) {
        self.drag = action;
        self.last_cursor = None;
    }

    pub fn end_drag(&mut self) {
        self.drag = DragAction::None;
        self.last_cursor = None;
    }

    /// Feed a cursor position in physical pixels
    pub fn pointer_moved(&mut self, x: f64, y: f64, camera: &PerspectiveCamera, viewport_height: u32) {
        let previous = self.last_cursor.replace((x, y));
        let Some((last_x, last_y)) = previous else {
            return;
        };
        if viewport_height == 0 {
            return;
        }

        let dx = (x - last_x) as f32;
        let dy = (y - last_y) as f32;
        let height = viewport_height as f32;

        match self.drag {
            DragAction::Rotate => {
                self.rotate_left(2.0 * PI * dx / height * self.rotate_speed);
                self.rotate_up(2.0 * PI * dy / height * self.rotate_speed);
            }
            DragAction::Pan => self.pan(dx * self.pan_speed, dy * self.pan_speed, camera, height),
            DragAction::None => {}
        }
    }

    /// Mouse wheel input; positive notches move toward the target
    pub fn wheel(&mut self, notches: f32) {
        let zoom_scale = ZOOM_BASE.powf(self.zoom_speed);
        if notches > 0.0 {
            self.dolly_in(zoom_scale.powf(notches));
        } else if notches < 0.0 {
            self.dolly_out(zoom_scale.powf(-notches));
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// Pan by a pixel delta; the world distance scales with the distance to the target
    pub fn pan(&mut self, dx: f32, dy: f32, camera: &PerspectiveCamera, viewport_height: f32) {
        let offset = camera.position - camera.target;
        let target_distance = offset.norm() * (camera.fov / 2.0).tan();

        let forward = camera.forward();
        let right = forward
            .cross(&camera.up)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::x);
        let screen_up = right.cross(&forward);

        self.pan_offset -= right * (2.0 * dx * target_distance / viewport_height);
        self.pan_offset += screen_up * (2.0 * dy * target_distance / viewport_height);
    }

    pub fn dolly_in(&mut self, dolly_scale: f32) {
        self.scale *= dolly_scale;
    }

    pub fn dolly_out(&mut self, dolly_scale: f32) {
        self.scale /= dolly_scale;
    }

    /// Apply pending input to `camera`. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let old_position = camera.position;
        let old_target = camera.target;

        let mut spherical = Spherical::from_offset(&(camera.position - camera.target));

        let step = if self.enable_damping { self.damping_factor } else { 1.0 };
        spherical.theta += self.spherical_delta.theta * step;
        spherical.phi += self.spherical_delta.phi * step;
        spherical.make_safe();

        camera.target += self.pan_offset * step;

        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);
        camera.position = camera.target + spherical.to_offset();

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.spherical_delta.theta *= decay;
            self.spherical_delta.phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.spherical_delta.theta = 0.0;
            self.spherical_delta.phi = 0.0;
            self.pan_offset = Vector3::zeros();
        }
        self.scale = 1.0;

        (camera.position - old_position).norm_squared() > CHANGE_EPSILON
            || (camera.target - old_target).norm_squared() > CHANGE_EPSILON
    }

    /// Restore the pose the controls were created with and drop pending input
    pub fn reset(&mut self, camera: &mut PerspectiveCamera) {
        camera.position = self.initial_position;
        camera.target = self.initial_target;

        self.spherical_delta = Spherical { radius: 0.0, theta: 0.0, phi: 0.0 };
        self.pan_offset = Vector3::zeros();
        self.scale = 1.0;
        self.end_drag();
    }
}
