use bytemuck::{Pod, Zeroable};
use cgmath::{Matrix, Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use super::camera::Viewport;
use super::frame::{
    BACKGROUND_QUAD, BACKGROUND_QUAD_INDICES, BackgroundPass, FrameTarget, MeshPass, MeshVertex,
    QuadVertex,
};
use super::scene::BackgroundImage;

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[rustfmt::skip]
const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct BackgroundUniforms {
    projection: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct MeshUniforms {
    projection: [[f32; 4]; 4],
    model_view: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    lights: [[f32; 4]; 2],
    material: [f32; 4],
}

/// `wgpu` implementation of [`FrameTarget`] that renders into an offscreen
/// RGBA8 texture for the shell to display.
pub struct GpuRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    target: RenderTarget,
    target_revision: u64,
    background: BackgroundResources,
    background_texture: Option<BackgroundTexture>,
    mesh: MeshResources,
    mesh_buffer: Option<MeshBuffer>,
    frame: PendingFrame,
}

struct RenderTarget {
    size: [u32; 2],
    view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
}

struct BackgroundResources {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniforms: wgpu::Buffer,
    sampler: wgpu::Sampler,
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
}

struct BackgroundTexture {
    bind_group: wgpu::BindGroup,
}

struct MeshResources {
    pipeline: wgpu::RenderPipeline,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct MeshBuffer {
    vertices: wgpu::Buffer,
    vertex_count: u32,
}

#[derive(Default)]
struct PendingFrame {
    clear: [f32; 4],
    draw_background: bool,
    draw_mesh: Option<u32>,
}

impl GpuRenderer {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        let target = RenderTarget::new(&device, [1, 1]);
        let background = BackgroundResources::new(&device);
        let mesh = MeshResources::new(&device);
        Self {
            device,
            queue,
            target,
            target_revision: 0,
            background,
            background_texture: None,
            mesh,
            mesh_buffer: None,
            frame: PendingFrame::default(),
        }
    }

    pub fn target_view(&self) -> &wgpu::TextureView {
        &self.target.view
    }

    /// Changes whenever the target texture is recreated.
    pub fn target_revision(&self) -> u64 {
        self.target_revision
    }

    fn ensure_target(&mut self, size: [u32; 2]) {
        if self.target.size != size {
            self.target = RenderTarget::new(&self.device, size);
            self.target_revision = self.target_revision.wrapping_add(1);
        }
    }
}

impl FrameTarget for GpuRenderer {
    fn begin_frame(&mut self, viewport: Viewport, clear: [f32; 4]) {
        self.ensure_target([viewport.width, viewport.height]);
        self.frame = PendingFrame {
            clear,
            ..PendingFrame::default()
        };
    }

    fn upload_background(&mut self, image: &BackgroundImage) {
        self.background_texture = None;
        let max = self.device.limits().max_texture_dimension_2d;
        if image.width() > max || image.height() > max {
            tracing::warn!(
                width = image.width(),
                height = image.height(),
                max,
                "background image exceeds the GPU texture limit"
            );
            return;
        }
        self.background_texture = Some(BackgroundTexture::new(
            &self.device,
            &self.queue,
            &self.background,
            image,
        ));
    }

    fn draw_background(&mut self, pass: &BackgroundPass) {
        if self.background_texture.is_none() {
            return;
        }
        let uniforms = BackgroundUniforms {
            projection: (OPENGL_TO_WGPU_MATRIX * pass.projection).into(),
        };
        self.queue
            .write_buffer(&self.background.uniforms, 0, bytemuck::bytes_of(&uniforms));
        self.frame.draw_background = true;
    }

    fn upload_mesh(&mut self, vertices: &[MeshVertex]) {
        self.mesh_buffer = if vertices.is_empty() {
            None
        } else {
            let buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("posekit_mesh_vertices"),
                    contents: bytemuck::cast_slice(vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
            Some(MeshBuffer {
                vertices: buffer,
                vertex_count: vertices.len() as u32,
            })
        };
    }

    fn draw_mesh(&mut self, pass: &MeshPass) {
        let Some(buffer) = &self.mesh_buffer else {
            return;
        };
        let normal_matrix = pass
            .model_view
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or(pass.model_view);
        let [l0, l1] = pass.lights;
        let uniforms = MeshUniforms {
            projection: (OPENGL_TO_WGPU_MATRIX * pass.projection).into(),
            model_view: pass.model_view.into(),
            normal_matrix: normal_matrix.into(),
            lights: [[l0[0], l0[1], l0[2], 1.0], [l1[0], l1[1], l1[2], 1.0]],
            material: [pass.color[0], pass.color[1], pass.color[2], pass.ambient],
        };
        self.queue
            .write_buffer(&self.mesh.uniforms, 0, bytemuck::bytes_of(&uniforms));
        self.frame.draw_mesh = Some(pass.vertex_count.min(buffer.vertex_count));
    }

    fn end_frame(&mut self) {
        let frame = std::mem::take(&mut self.frame);
        let [r, g, b, a] = frame.clear;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("posekit_frame"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("posekit_frame_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target.view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if frame.draw_background {
                if let Some(texture) = &self.background_texture {
                    rpass.set_pipeline(&self.background.pipeline);
                    rpass.set_bind_group(0, &texture.bind_group, &[]);
                    rpass.set_vertex_buffer(0, self.background.vertices.slice(..));
                    rpass.set_index_buffer(
                        self.background.indices.slice(..),
                        wgpu::IndexFormat::Uint16,
                    );
                    rpass.draw_indexed(0..BACKGROUND_QUAD_INDICES.len() as u32, 0, 0..1);
                }
            }

            if let (Some(count), Some(buffer)) = (frame.draw_mesh, &self.mesh_buffer) {
                rpass.set_pipeline(&self.mesh.pipeline);
                rpass.set_bind_group(0, &self.mesh.bind_group, &[]);
                rpass.set_vertex_buffer(0, buffer.vertices.slice(..));
                rpass.draw(0..count, 0..1);
            }
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl RenderTarget {
    fn new(device: &wgpu::Device, size: [u32; 2]) -> Self {
        let extent = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("posekit_frame_color"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("posekit_frame_depth"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        Self {
            size,
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            depth_view: depth.create_view(&wgpu::TextureViewDescriptor::default()),
        }
    }
}

impl BackgroundResources {
    fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("posekit_background_shader"),
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(include_str!(
                "shaders/background.wgsl"
            ))),
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("posekit_background_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("posekit_background_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("posekit_background_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[quad_vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: COLOR_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        let uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("posekit_background_uniforms"),
            contents: bytemuck::bytes_of(&BackgroundUniforms {
                projection: Matrix4::<f32>::identity().into(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("posekit_background_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("posekit_background_quad"),
            contents: bytemuck::cast_slice(&BACKGROUND_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("posekit_background_quad_indices"),
            contents: bytemuck::cast_slice(&BACKGROUND_QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            pipeline,
            bind_group_layout,
            uniforms,
            sampler,
            vertices,
            indices,
        }
    }
}

impl BackgroundTexture {
    fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        resources: &BackgroundResources,
        image: &BackgroundImage,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width(),
            height: image.height(),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("posekit_background_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.row_bytes() as u32),
                rows_per_image: Some(image.height()),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("posekit_background_bind_group"),
            layout: &resources.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: resources.uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&resources.sampler),
                },
            ],
        });
        Self { bind_group }
    }
}

impl MeshResources {
    fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("posekit_mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(include_str!(
                "shaders/mesh.wgsl"
            ))),
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("posekit_mesh_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("posekit_mesh_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("posekit_mesh_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[mesh_vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: COLOR_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        let uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("posekit_mesh_uniforms"),
            contents: bytemuck::bytes_of(&MeshUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("posekit_mesh_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });
        Self {
            pipeline,
            uniforms,
            bind_group,
        }
    }
}

fn quad_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

fn mesh_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}
