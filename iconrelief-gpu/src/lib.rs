//! # iconrelief GPU
//!
//! wgpu rendering for extruded icon meshes.
//!
//! [`MeshRenderer`] owns the window surface, standard metalness/roughness
//! pipelines keyed by material side and depth writes, and the GPU copies of
//! an icon's sub-meshes.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use iconrelief_gpu::{MeshRenderConfig, MeshRenderer};
//! use iconrelief_core::MeshGroup;
//!
//! async fn example(window: &winit::window::Window, group: &MeshGroup) -> iconrelief_core::Result<()> {
//!     let mut renderer = MeshRenderer::new(window, MeshRenderConfig::default()).await?;
//!     renderer.upload_group(group);
//!     renderer.render(renderer.config.background_color)?;
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod mesh;

// Re-export commonly used items
pub use device::GpuContext;
pub use mesh::{
    mesh_to_gpu_buffers, CameraUniform, GpuMesh, LightsUniform, MeshRenderConfig, MeshRenderer, MeshVertex,
    ModelUniform, PipelineKey, MAX_DIRECTIONAL_LIGHTS,
};
