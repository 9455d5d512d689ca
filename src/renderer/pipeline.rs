//! wgpu render pipeline setup and draw command playback

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use super::frame::{DrawCommand, MeshId, projection};
use super::shader::{ShaderProgram, ShaderSources};
use super::shapes::MeshSet;
use super::vertex::Vertex;
use crate::error::{SetupError, SetupResult};
use crate::settings::Settings;
use crate::sim::GameState;

/// Draw slots allocated up front; grows on demand
const INITIAL_DRAW_CAPACITY: usize = 64;

const MAT4_SIZE: u64 = std::mem::size_of::<[f32; 16]>() as u64;
const COLOR_SIZE: u64 = std::mem::size_of::<[f32; 4]>() as u64;

/// A static vertex buffer
struct GpuMesh {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

/// Per-draw `mvp` and `diffuse` uniforms, one aligned slot per draw
struct DrawUniforms {
    mvp_buffer: wgpu::Buffer,
    diffuse_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// Draw slots the buffers hold
    capacity: usize,
    /// Byte distance between slots (dynamic offset alignment)
    stride: u64,
    mvp_scratch: Vec<u8>,
    diffuse_scratch: Vec<u8>,
}

impl DrawUniforms {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, capacity: usize) -> Self {
        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let stride = MAT4_SIZE.div_ceil(alignment) * alignment;

        let mvp_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mvp"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let diffuse_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("diffuse"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &mvp_buffer,
                        offset: 0,
                        size: wgpu::BufferSize::new(MAT4_SIZE),
                    }),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &diffuse_buffer,
                        offset: 0,
                        size: wgpu::BufferSize::new(COLOR_SIZE),
                    }),
                },
            ],
        });

        Self {
            mvp_buffer,
            diffuse_buffer,
            bind_group,
            capacity,
            stride,
            mvp_scratch: Vec::new(),
            diffuse_scratch: Vec::new(),
        }
    }

    /// Pack every command's transform and color into its slot and upload
    fn upload(&mut self, queue: &wgpu::Queue, commands: &[DrawCommand]) {
        let stride = self.stride as usize;
        self.mvp_scratch.clear();
        self.mvp_scratch.resize(stride * commands.len(), 0);
        self.diffuse_scratch.clear();
        self.diffuse_scratch.resize(stride * commands.len(), 0);

        for (i, command) in commands.iter().enumerate() {
            let at = i * stride;
            let mvp = command.transform.to_cols_array();
            let color = command.color.extend(1.0).to_array();
            self.mvp_scratch[at..at + MAT4_SIZE as usize].copy_from_slice(bytemuck::cast_slice(&mvp));
            self.diffuse_scratch[at..at + COLOR_SIZE as usize]
                .copy_from_slice(bytemuck::cast_slice(&color));
        }

        queue.write_buffer(&self.mvp_buffer, 0, &self.mvp_scratch);
        queue.write_buffer(&self.diffuse_buffer, 0, &self.diffuse_scratch);
    }

    fn offset(&self, slot: usize) -> wgpu::DynamicOffset {
        (slot as u64 * self.stride) as wgpu::DynamicOffset
    }
}

/// Main render state
pub struct GpuRenderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    meshes: Vec<GpuMesh>,
    ortho_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draws: DrawUniforms,
    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl GpuRenderer {
    /// Create the GPU context, compile the shader program and upload meshes.
    /// Any failure here is fatal.
    pub async fn new(
        window: Arc<Window>,
        settings: &Settings,
        state: &GameState,
    ) -> SetupResult<Self> {
        let sources = ShaderSources::load(settings)?;
        let program = ShaderProgram::create(&sources)?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::from_env().unwrap_or_default(),
            ..Default::default()
        });

        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let info = adapter.get_info();
        log::info!("Renderer: {} ({:?})", info.name, info.backend);
        log::info!("Driver: {} {}", info.driver, info.driver_info);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("brickout-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .ok_or(SetupError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(SetupError::UnsupportedSurface)?;

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: if settings.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("brickout_shader"),
            source: wgpu::ShaderSource::Wgsl(program.source.as_str().into()),
        });

        // Group 0: projection, set once
        let ortho_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ortho_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: program.ortho.binding,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(MAT4_SIZE),
                },
                count: None,
            }],
        });

        // Group 1: per-draw transform and color
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: program.mvp.binding,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(MAT4_SIZE),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: program.diffuse.binding,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(COLOR_SIZE),
                    },
                    count: None,
                },
            ],
        });

        let ortho = projection(state.field).to_cols_array();
        let ortho_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ortho"),
            contents: bytemuck::cast_slice(&ortho),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let ortho_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ortho_bind_group"),
            layout: &ortho_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: program.ortho.binding,
                resource: ortho_buffer.as_entire_binding(),
            }],
        });

        let draws = DrawUniforms::new(&device, &draw_layout, INITIAL_DRAW_CAPACITY);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&ortho_layout, &draw_layout],
            immediate_size: 0,
        });

        let attributes = Vertex::attributes(program.coord2d);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(super::shader::VERTEX_ENTRY),
                buffers: &[Vertex::desc(&attributes)],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(super::shader::FRAGMENT_ENTRY),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let meshes = MeshSet::for_state(state)
            .iter()
            .map(|(id, vertices)| GpuMesh {
                buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(mesh_label(id)),
                    contents: bytemuck::cast_slice(vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                vertex_count: vertices.len() as u32,
            })
            .collect();

        log::info!("Renderer ready ({}x{})", width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            meshes,
            ortho_bind_group,
            draw_layout,
            draws,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size (after Lost/Outdated)
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Upload per-draw uniforms and issue one draw call per command
    pub fn render(&mut self, commands: &[DrawCommand]) -> Result<(), wgpu::SurfaceError> {
        if commands.len() > self.draws.capacity {
            let capacity = commands.len().next_power_of_two();
            log::debug!("Growing draw uniform capacity to {}", capacity);
            self.draws = DrawUniforms::new(&self.device, &self.draw_layout, capacity);
        }
        self.draws.upload(&self.queue, commands);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.ortho_bind_group, &[]);

            for (slot, command) in commands.iter().enumerate() {
                let mesh = &self.meshes[command.mesh.index()];
                let offset = self.draws.offset(slot);
                render_pass.set_bind_group(1, &self.draws.bind_group, &[offset, offset]);
                render_pass.set_vertex_buffer(0, mesh.buffer.slice(..));
                render_pass.draw(0..command.vertex_count.min(mesh.vertex_count), 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn mesh_label(id: MeshId) -> &'static str {
    match id {
        MeshId::Ball => "ball_vertices",
        MeshId::Paddle => "paddle_vertices",
        MeshId::Brick => "brick_vertices",
    }
}
