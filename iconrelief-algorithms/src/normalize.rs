//! Centering and uniform scale-to-fit of the icon group

use iconrelief_core::{Aabb, Error, MeshGroup, Result, Vector3f};
use serde::{Deserialize, Serialize};

/// Target placement of the normalized icon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Largest dimension of the icon after scaling
    pub target_size: f32,
    /// World position of the icon's bounding-box center
    pub target_center: [f32; 3],
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            target_size: 800.0,
            target_center: [150.0, 150.0, 0.0],
        }
    }
}

impl FitOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.target_size.is_finite() && self.target_size > 0.0) {
            return Err(Error::Config(format!("target size must be positive, got {}", self.target_size)));
        }
        if self.target_center.iter().any(|c| !c.is_finite()) {
            return Err(Error::Config("target center must be finite".to_string()));
        }
        Ok(())
    }
}

/// Result of fitting a bounding box to the target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    /// Bounding box before normalization
    pub bounds: Aabb,
    /// Uniform scale factor
    pub scale: f32,
    /// Translation applied after scaling
    pub offset: Vector3f,
}

/// Compute the scale and offset that map `bounds` onto the target.
///
/// A zero-extent box keeps scale 1 and is only moved.
pub fn compute_fit(bounds: &Aabb, options: &FitOptions) -> Result<Normalization> {
    options.validate()?;
    if bounds.is_empty() {
        return Err(Error::Geometry("Cannot fit an empty bounding box".to_string()));
    }

    let max_dimension = bounds.max_dimension();
    let scale = if max_dimension > f32::EPSILON {
        options.target_size / max_dimension
    } else {
        1.0
    };

    let target = Vector3f::from(options.target_center);
    let offset = target - bounds.center().coords * scale;

    Ok(Normalization {
        bounds: *bounds,
        scale,
        offset,
    })
}

/// Center and scale `group` in place so it fits the target
pub fn fit_to_target(group: &mut MeshGroup, options: &FitOptions) -> Result<Normalization> {
    let normalization = compute_fit(&group.local_bounding_box(), options)?;

    group.scale = Vector3f::repeat(normalization.scale);
    group.position = normalization.offset;

    Ok(normalization)
}
