//! Visualization for extruded icons
//!
//! This crate provides the interactive viewer built on wgpu and winit:
//! - Perspective camera
//! - Orbit controls with damping
//! - Viewer configuration (JSON)
//! - Window event loop with background SVG loading

pub mod camera;
pub mod config;
pub mod controls;
pub mod viewer;

pub use camera::*;
pub use config::*;
pub use controls::*;
pub use viewer::*;

use iconrelief_core::Result;

/// Open a window showing the SVG at `path` with default settings
pub fn show_svg<P: Into<std::path::PathBuf>>(path: P) -> Result<()> {
    let config = ViewerConfig {
        svg_path: path.into(),
        ..ViewerConfig::default()
    };
    Viewer::new(config)?.run()
}
