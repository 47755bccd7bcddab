//! wgpu renderer for active bursts.
//!
//! The renderer is a collaborator of the simulation core: it receives a
//! burst's buffers on registration, re-uploads them when the core marks
//! them dirty, and drops its GPU-side resources on retirement. It never
//! reads or writes simulation state.

mod camera;
#[cfg(feature = "egui")]
mod egui_integration;

use std::collections::HashMap;
use std::sync::Arc;

use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::window::Window;

pub use camera::Camera;
#[cfg(feature = "egui")]
pub use egui_integration::{EguiFrameOutput, EguiIntegration};

use crate::burst::{Burst, BurstId, ParticleBuffers};
use crate::error::GpuError;
use crate::params::DisplayParams;
use crate::shader::{ParticleInstance, Uniforms, SHADER_SOURCE};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.02,
    a: 1.0,
};

/// GPU-side footprint of one registered burst.
struct BurstGpu {
    buffer: wgpu::Buffer,
    count: u32,
}

/// All GPU state: device, pipeline, per-burst vertex buffers, camera.
pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    depth_texture: wgpu::TextureView,
    bursts: HashMap<BurstId, BurstGpu>,
    // Reused scratch for instance packing, so steady-state frames do not
    // allocate.
    staging: Vec<ParticleInstance>,
    pub camera: Camera,
    #[cfg(feature = "egui")]
    pub egui: EguiIntegration,
    #[cfg(feature = "egui")]
    ui_frame: Option<EguiFrameOutput>,
}

impl GpuState {
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                particle_size: 0.0,
                time: 0.0,
                delta_time: 0.0,
                _padding: 0.0,
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Render Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<ParticleInstance>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                        wgpu::VertexAttribute {
                            offset: 16,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    // Additive blending: overlapping sprites brighten
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                    }),
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
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                // Sprites are translucent: test against the scene but
                // never occlude each other
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        #[cfg(feature = "egui")]
        let egui = EguiIntegration::new(&device, config.format, &window);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            uniform_buffer,
            uniform_bind_group,
            depth_texture,
            bursts: HashMap::new(),
            staging: Vec::new(),
            camera: Camera::new(),
            #[cfg(feature = "egui")]
            egui,
            #[cfg(feature = "egui")]
            ui_frame: None,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    /// Register a freshly spawned burst and upload its initial buffers.
    pub fn add_burst(&mut self, burst: &mut Burst) {
        pack_instances(&mut self.staging, burst.buffers());

        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Burst Instance Buffer"),
                contents: bytemuck::cast_slice(&self.staging),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });

        self.bursts.insert(
            burst.id(),
            BurstGpu {
                buffer,
                count: burst.buffers().len() as u32,
            },
        );
        burst.buffers_mut().clear_dirty();
    }

    /// Drop the GPU-side resources of a retired burst.
    ///
    /// Safe to call for ids that were never registered or are already gone.
    pub fn remove_burst(&mut self, id: BurstId) {
        self.bursts.remove(&id);
    }

    /// Re-upload a burst's instance data if the core marked it dirty.
    pub fn sync_burst(&mut self, burst: &mut Burst) {
        if !burst.buffers().dirty() {
            return;
        }
        let Some(gpu) = self.bursts.get(&burst.id()) else {
            return;
        };

        pack_instances(&mut self.staging, burst.buffers());
        self.queue
            .write_buffer(&gpu.buffer, 0, bytemuck::cast_slice(&self.staging));
        burst.buffers_mut().clear_dirty();
    }

    /// Stash the panel's paint data for this frame's render.
    #[cfg(feature = "egui")]
    pub fn set_ui_frame(&mut self, frame: EguiFrameOutput) {
        self.ui_frame = Some(frame);
    }

    fn update_uniforms(&mut self, params: &DisplayParams, elapsed: f32, delta: f32) {
        let aspect = self.config.width as f32 / self.config.height as f32;
        let view = self.camera.view_matrix();
        let proj = Mat4::perspective_rh(75.0_f32.to_radians(), aspect, 0.1, 1000.0);

        let uniforms = Uniforms {
            view_proj: (proj * view).to_cols_array_2d(),
            particle_size: params.particle_size,
            time: elapsed,
            delta_time: delta,
            _padding: 0.0,
        };

        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    /// Draw all registered bursts (and the panel, when enabled).
    pub fn render(
        &mut self,
        params: &DisplayParams,
        elapsed: f32,
        delta: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        self.update_uniforms(params, elapsed, delta);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        #[cfg(feature = "egui")]
        let ui_frame = self.ui_frame.take();
        #[cfg(feature = "egui")]
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: ui_frame.as_ref().map_or(1.0, |f| f.pixels_per_point),
        };
        #[cfg(feature = "egui")]
        if let Some(frame) = &ui_frame {
            self.egui.prepare(
                &self.device,
                &self.queue,
                &mut encoder,
                frame,
                &screen_descriptor,
            );
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Burst Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            for burst in self.bursts.values() {
                render_pass.set_vertex_buffer(0, burst.buffer.slice(..));
                render_pass.draw(0..6, 0..burst.count);
            }
        }

        #[cfg(feature = "egui")]
        if let Some(frame) = &ui_frame {
            let mut ui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Panel Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.egui
                .renderer()
                .render(&mut ui_pass, &frame.paint_jobs, &screen_descriptor);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        #[cfg(feature = "egui")]
        if let Some(frame) = &ui_frame {
            self.egui.cleanup(frame);
        }

        Ok(())
    }
}

/// Interleave a burst's position and color streams into instance layout.
fn pack_instances(staging: &mut Vec<ParticleInstance>, buffers: &ParticleBuffers) {
    staging.clear();
    staging.extend(
        buffers
            .positions()
            .iter()
            .zip(buffers.colors())
            .map(|(position, color)| ParticleInstance::new(*position, *color)),
    );
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
