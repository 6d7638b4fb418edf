//! GPU mesh rendering with standard (metalness/roughness) shading

use std::collections::HashMap;

use iconrelief_core::{Color, Error, Light, MeshGroup, Result, Side, StandardMaterial, Transform3D, TriangleMesh};
use crate::GpuContext;
use nalgebra::{Matrix4, Point3};
use bytemuck::{Pod, Zeroable};
use tracing::{debug, warn};
use winit::window::Window;

/// Most directional lights the shader evaluates
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Vertex data for mesh rendering
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Camera uniform data
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub fn new(view: &Matrix4<f32>, projection: &Matrix4<f32>, eye: &Point3<f32>) -> Self {
        Self {
            view_proj: (projection * view).into(),
            eye: [eye.x, eye.y, eye.z, 1.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct DirectionalLightUniform {
    pub direction: [f32; 4],
    pub color: [f32; 4],
}

/// Lighting uniform: summed ambient term plus up to four directional lights
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightsUniform {
    pub ambient: [f32; 4],
    pub directional: [DirectionalLightUniform; MAX_DIRECTIONAL_LIGHTS],
    pub count: [u32; 4],
}

impl LightsUniform {
    /// Pack scene lights; ambient lights add up, extra directional lights are dropped
    pub fn from_lights(lights: &[Light]) -> Self {
        let mut uniform = Self::zeroed();
        let mut count = 0;

        for light in lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    let c = color.scaled(intensity);
                    uniform.ambient[0] += c.r;
                    uniform.ambient[1] += c.g;
                    uniform.ambient[2] += c.b;
                }
                Light::Directional { color, intensity, .. } => {
                    let Some(direction) = light.direction_to_light() else {
                        warn!("directional light has coincident position and target, ignoring");
                        continue;
                    };
                    if count == MAX_DIRECTIONAL_LIGHTS {
                        warn!("more than {} directional lights, ignoring the rest", MAX_DIRECTIONAL_LIGHTS);
                        break;
                    }
                    let c = color.scaled(intensity);
                    uniform.directional[count] = DirectionalLightUniform {
                        direction: [direction.x, direction.y, direction.z, 0.0],
                        color: [c.r, c.g, c.b, 1.0],
                    };
                    count += 1;
                }
            }
        }

        uniform.count[0] = count as u32;
        uniform
    }
}

/// Per-mesh uniform: transforms and material
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub params: [f32; 4],
}

impl ModelUniform {
    pub fn new(transform: &Transform3D, material: &StandardMaterial) -> Self {
        let normal = transform.normal_matrix().to_homogeneous();
        Self {
            model: transform.matrix.into(),
            normal: normal.into(),
            color: [material.color.r, material.color.g, material.color.b, 1.0],
            params: [material.metalness, material.roughness, 0.0, 0.0],
        }
    }
}

/// Mesh rendering configuration
#[derive(Debug, Clone)]
pub struct MeshRenderConfig {
    pub background_color: Color,
    pub enable_depth_test: bool,
    pub enable_multisampling: bool,
}

impl Default for MeshRenderConfig {
    fn default() -> Self {
        Self {
            background_color: Color::from_hex(0x0e0e0e),
            enable_depth_test: true,
            enable_multisampling: true,
        }
    }
}

impl MeshRenderConfig {
    fn sample_count(&self) -> u32 {
        if self.enable_multisampling { 4 } else { 1 }
    }
}

/// Convert a triangle mesh into interleaved GPU vertices and indices.
///
/// Meshes without normals get flat face normals by splitting vertices.
pub fn mesh_to_gpu_buffers(mesh: &TriangleMesh) -> (Vec<MeshVertex>, Vec<u32>) {
    match mesh.normals.as_ref() {
        Some(normals) if normals.len() == mesh.vertices.len() => {
            let vertices = mesh
                .vertices
                .iter()
                .zip(normals)
                .map(|(p, n)| MeshVertex {
                    position: [p.x, p.y, p.z],
                    normal: [n.x, n.y, n.z],
                })
                .collect();
            (vertices, mesh.indices_u32())
        }
        _ => {
            let face_normals = mesh.calculate_face_normals();
            let mut vertices = Vec::with_capacity(mesh.faces.len() * 3);
            for (face, n) in mesh.faces.iter().zip(face_normals) {
                for &i in face {
                    let p = mesh.vertices[i];
                    vertices.push(MeshVertex {
                        position: [p.x, p.y, p.z],
                        normal: [n.x, n.y, n.z],
                    });
                }
            }
            let indices = (0..vertices.len() as u32).collect();
            (vertices, indices)
        }
    }
}

/// Render state a material needs from its pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub side: Side,
    pub depth_write: bool,
}

impl PipelineKey {
    pub fn from_material(material: &StandardMaterial) -> Self {
        Self {
            side: material.side,
            depth_write: material.depth_write,
        }
    }

    /// Faces to discard; double-sided materials keep both
    pub fn cull_mode(&self) -> Option<wgpu::Face> {
        match self.side {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Double => None,
        }
    }
}

/// A sub-mesh resident on the GPU
pub struct GpuMesh {
    pub pipeline_key: PipelineKey,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

/// Window-bound mesh renderer
pub struct MeshRenderer<'window> {
    pub gpu_context: GpuContext,
    pub surface: wgpu::Surface<'window>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    pub camera_buffer: wgpu::Buffer,
    pub lights_buffer: wgpu::Buffer,
    pub frame_bind_group: wgpu::BindGroup,
    pub mesh_bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    shader: wgpu::ShaderModule,
    pub meshes: Vec<GpuMesh>,
    pub config: MeshRenderConfig,
    depth_view: Option<wgpu::TextureView>,
    msaa_view: Option<wgpu::TextureView>,
}

impl<'window> MeshRenderer<'window> {
    /// Create a new mesh renderer drawing into `window`
    pub async fn new(window: &'window Window, config: MeshRenderConfig) -> Result<Self> {
        let (gpu_context, surface) = GpuContext::for_window(window).await?;

        let surface_caps = surface.get_capabilities(&gpu_context.adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| Error::Gpu("Surface reports no supported formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu_context.device, &surface_config);

        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let frame_layout = gpu_context.create_bind_group_layout("frame_bind_group_layout", &[uniform_entry(0), uniform_entry(1)]);
        let mesh_bind_group_layout = gpu_context.create_bind_group_layout("mesh_bind_group_layout", &[uniform_entry(0)]);

        let camera_uniform = CameraUniform::new(&Matrix4::identity(), &Matrix4::identity(), &Point3::origin());
        let camera_buffer = gpu_context.create_uniform_buffer("Camera Buffer", &camera_uniform);
        let lights_buffer = gpu_context.create_uniform_buffer("Lights Buffer", &LightsUniform::from_lights(&[]));

        let frame_bind_group = gpu_context.create_bind_group(
            "frame_bind_group",
            &frame_layout,
            &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        );

        let shader = gpu_context.create_shader_module("Standard Mesh Shader", include_str!("shaders/mesh_standard.wgsl"));
        let pipeline_layout = gpu_context.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Render Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &mesh_bind_group_layout],
            push_constant_ranges: &[],
        });

        let mut renderer = Self {
            gpu_context,
            surface,
            surface_config,
            pipelines: HashMap::new(),
            camera_buffer,
            lights_buffer,
            frame_bind_group,
            mesh_bind_group_layout,
            pipeline_layout,
            shader,
            meshes: Vec::new(),
            config,
            depth_view: None,
            msaa_view: None,
        };
        renderer.create_attachments();

        Ok(renderer)
    }

    /// Create the pipeline for one combination of face culling and depth writes
    fn create_render_pipeline(&self, key: PipelineKey) -> wgpu::RenderPipeline {
        let shader = &self.shader;
        let config = &self.config;

        self.gpu_context.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Render Pipeline"),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: "vs_main",
                buffers: &[MeshVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: key.cull_mode(),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: if config.enable_depth_test {
                Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: key.depth_write,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                })
            } else {
                None
            },
            multisample: wgpu::MultisampleState {
                count: config.sample_count(),
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        })
    }

    /// (Re)create depth and MSAA attachments for the current surface size
    fn create_attachments(&mut self) {
        let size = wgpu::Extent3d {
            width: self.surface_config.width,
            height: self.surface_config.height,
            depth_or_array_layers: 1,
        };
        let sample_count = self.config.sample_count();
        let device = &self.gpu_context.device;

        self.depth_view = self.config.enable_depth_test.then(|| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some("Depth Texture"),
                    size,
                    mip_level_count: 1,
                    sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format: DEPTH_FORMAT,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        });

        self.msaa_view = self.config.enable_multisampling.then(|| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some("MSAA Texture"),
                    size,
                    mip_level_count: 1,
                    sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format: self.surface_config.format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        });
    }

    /// Upload every sub-mesh of `group`, replacing anything uploaded before
    pub fn upload_group(&mut self, group: &MeshGroup) {
        let transform = group.world_transform();
        self.meshes.clear();

        for (index, mesh) in group.meshes.iter().enumerate() {
            if mesh.geometry.is_empty() {
                continue;
            }
            let (vertices, indices) = mesh_to_gpu_buffers(&mesh.geometry);
            let material = group.material_of(mesh);
            let uniform = ModelUniform::new(&transform, &material);
            let pipeline_key = PipelineKey::from_material(&material);
            if !self.pipelines.contains_key(&pipeline_key) {
                debug!(?pipeline_key, "creating mesh pipeline");
                let pipeline = self.create_render_pipeline(pipeline_key);
                self.pipelines.insert(pipeline_key, pipeline);
            }

            let vertex_buffer = self.gpu_context.create_buffer_init("Mesh Vertex Buffer", &vertices, wgpu::BufferUsages::VERTEX);
            let index_buffer = self.gpu_context.create_buffer_init("Mesh Index Buffer", &indices, wgpu::BufferUsages::INDEX);
            let uniform_buffer = self.gpu_context.create_uniform_buffer("Mesh Uniform Buffer", &uniform);
            let bind_group = self.gpu_context.create_bind_group(
                "mesh_bind_group",
                &self.mesh_bind_group_layout,
                &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            );

            debug!(mesh = index, vertices = vertices.len(), indices = indices.len(), "uploaded mesh");
            self.meshes.push(GpuMesh {
                pipeline_key,
                vertex_buffer,
                index_buffer,
                index_count: indices.len() as u32,
                uniform_buffer,
                bind_group,
            });
        }
    }

    /// Update camera matrices and position
    pub fn update_camera(&self, view_matrix: &Matrix4<f32>, proj_matrix: &Matrix4<f32>, eye: &Point3<f32>) {
        let uniform = CameraUniform::new(view_matrix, proj_matrix, eye);
        self.gpu_context
            .queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Update lighting
    pub fn update_lights(&self, lights: &[Light]) {
        let uniform = LightsUniform::from_lights(lights);
        self.gpu_context
            .queue
            .write_buffer(&self.lights_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Resize renderer; zero-sized requests (minimized windows) are ignored
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.gpu_context.device, &self.surface_config);
            self.create_attachments();
        }
    }

    /// Render all uploaded meshes over `background` and present the frame
    pub fn render(&mut self, background: Color) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                debug!("surface lost or outdated, reconfiguring");
                self.surface.configure(&self.gpu_context.device, &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(Error::Gpu(format!("Failed to get surface texture: {:?}", e))),
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.gpu_context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Mesh Render Encoder"),
        });

        // Determine render target
        let (color_attachment, resolve_target) = if let Some(ref msaa_view) = self.msaa_view {
            (msaa_view, Some(&view))
        } else {
            (&view, None)
        };

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mesh Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_attachment,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: background.r as f64,
                            g: background.g as f64,
                            b: background.b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: self.depth_view.as_ref().map(|depth_view| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view: depth_view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            let mut bound: Option<PipelineKey> = None;
            for mesh in &self.meshes {
                let Some(pipeline) = self.pipelines.get(&mesh.pipeline_key) else {
                    continue;
                };
                if bound != Some(mesh.pipeline_key) {
                    render_pass.set_pipeline(pipeline);
                    bound = Some(mesh.pipeline_key);
                }
                render_pass.set_bind_group(1, &mesh.bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.gpu_context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
