//! # iconrelief
//!
//! Turn a flat SVG icon into a solid 3D relief and inspect it in a window.
//!
//! This is the umbrella crate that provides convenient access to all iconrelief
//! functionality. You can use this crate to get everything in one place, or use
//! individual crates for more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Colors, triangle meshes, bounding boxes, transforms and the scene graph
//! - **I/O**: SVG parsing and curve flattening
//! - **Algorithms**: Shapes with holes, cap triangulation, extrusion and fit-to-box
//! - **GPU**: wgpu mesh renderer
//! - **Visualization**: Orbit viewer with background loading
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use iconrelief::prelude::*;
//!
//! let (group, report) = load_icon("favicon.svg", SvgLoadOptions::default(), &BuildOptions::default())?;
//! println!("{} meshes, {} triangles", report.meshes, report.triangles);
//! assert_eq!(group.meshes.len(), report.meshes);
//! # Ok::<(), iconrelief::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables everything below
//! - `io`: SVG input
//! - `algorithms`: Icon building pipeline (implies `io`)
//! - `gpu`: Mesh rendering
//! - `visualization`: Interactive viewer and the `iconrelief` binary
//! - `all`: Enables all features

// Re-export core functionality
pub use iconrelief_core::*;

// Re-export sub-crates
#[cfg(feature = "algorithms")]
pub use iconrelief_algorithms as algorithms;

#[cfg(feature = "gpu")]
pub use iconrelief_gpu as gpu;

#[cfg(feature = "io")]
pub use iconrelief_io as io;

#[cfg(feature = "visualization")]
pub use iconrelief_visualization as visualization;

/// Convenient imports for common use cases
pub mod prelude {
    pub use iconrelief_core::*;

    #[cfg(feature = "algorithms")]
    pub use iconrelief_algorithms::*;

    #[cfg(feature = "io")]
    pub use iconrelief_io::*;

    #[cfg(feature = "visualization")]
    pub use iconrelief_visualization::{OrbitControls, PerspectiveCamera, Viewer, ViewerConfig};
}
