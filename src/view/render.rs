use wgpu::*;
use wgpu::util::DeviceExt;

use crate::model::{Camera2D, Transform2D};
use crate::utils::{create_sprite_quad, MeshBuffer, Vertex};
use crate::view::texture::SpriteTexture;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteUniform {
    pub model: [[f32; 4]; 4],
}

/// GPU state for drawing one textured sprite
pub struct SpriteResources {
    pub pipeline: RenderPipeline,
    pub bind_group: BindGroup,
    pub camera_buffer: Buffer,
    pub sprite_buffer: Buffer,
    pub quad: MeshBuffer,
    pub texture: SpriteTexture,
}

fn uniform_entry(binding: u32) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::VERTEX,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

pub fn create_sprite_resources(
    device: &Device,
    format: TextureFormat,
    texture: SpriteTexture,
) -> SpriteResources {
    let camera_buffer = device.create_buffer_init(&util::BufferInitDescriptor {
        label: Some("camera_buffer"),
        contents: bytemuck::bytes_of(&CameraUniform { view_proj: glam::Mat4::IDENTITY.to_cols_array_2d() }),
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
    });
    let sprite_buffer = device.create_buffer_init(&util::BufferInitDescriptor {
        label: Some("sprite_buffer"),
        contents: bytemuck::bytes_of(&SpriteUniform { model: glam::Mat4::IDENTITY.to_cols_array_2d() }),
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
    });

    let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("sprite_bgl"),
        entries: &[
            uniform_entry(0),
            uniform_entry(1),
            BindGroupLayoutEntry {
                binding: 2,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: true },
                    view_dimension: TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 3,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Sampler(SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });

    let bind_group = device.create_bind_group(&BindGroupDescriptor {
        label: Some("sprite_bind_group"),
        layout: &bind_group_layout,
        entries: &[
            BindGroupEntry { binding: 0, resource: camera_buffer.as_entire_binding() },
            BindGroupEntry { binding: 1, resource: sprite_buffer.as_entire_binding() },
            BindGroupEntry { binding: 2, resource: BindingResource::TextureView(&texture.view) },
            BindGroupEntry { binding: 3, resource: BindingResource::Sampler(&texture.sampler) },
        ],
    });

    let shader = device.create_shader_module(ShaderModuleDescriptor {
        label: Some("sprite_shader"),
        source: ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: Some("sprite_pipeline_layout"),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some("sprite_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as BufferAddress,
                step_mode: VertexStepMode::Vertex,
                attributes: &[
                    VertexAttribute { offset: 0, shader_location: 0, format: VertexFormat::Float32x2 },
                    VertexAttribute { offset: 8, shader_location: 1, format: VertexFormat::Float32x2 },
                ],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState { format, blend: Some(BlendState::ALPHA_BLENDING), write_mask: ColorWrites::ALL })],
            compilation_options: Default::default(),
        }),
        primitive: PrimitiveState {
            topology: PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    });

    SpriteResources {
        pipeline,
        bind_group,
        camera_buffer,
        sprite_buffer,
        quad: create_sprite_quad().upload(device),
        texture,
    }
}

///////////////////////////////////////////////////////////////////////////////

/// Consolidated render state shared by the native and web shells
pub struct RenderState {
    pub format: TextureFormat,
    pub alpha_mode: CompositeAlphaMode,
    pub width: u32,
    pub height: u32,

    pub sprite: SpriteResources,

    // UI
    pub egui_renderer: egui_wgpu::Renderer,
    pub egui_primitives: Option<Vec<egui::ClippedPrimitive>>,
    pub egui_textures: Option<egui::TexturesDelta>,
    pub egui_dpr: f32,
}

impl RenderState {
    pub fn new(device: &Device, config: &SurfaceConfiguration, sprite: SpriteResources) -> Self {
        Self {
            format: config.format,
            alpha_mode: config.alpha_mode,
            width: config.width,
            height: config.height,
            sprite,
            egui_renderer: egui_wgpu::Renderer::new(device, config.format, egui_wgpu::RendererOptions::default()),
            egui_primitives: None,
            egui_textures: None,
            egui_dpr: 1.0,
        }
    }

    fn surface_config(&self) -> SurfaceConfiguration {
        SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: self.format,
            width: self.width,
            height: self.height,
            present_mode: PresentMode::Fifo,
            alpha_mode: self.alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    pub fn resize(&mut self, device: &Device, surface: &Surface, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        surface.configure(device, &self.surface_config());
    }

    pub fn write_uniforms(&self, queue: &Queue, camera: &Camera2D, transform: &Transform2D) {
        let cam = CameraUniform { view_proj: camera.view_proj().to_cols_array_2d() };
        queue.write_buffer(&self.sprite.camera_buffer, 0, bytemuck::bytes_of(&cam));
        let sprite = SpriteUniform { model: transform.model_matrix().to_cols_array_2d() };
        queue.write_buffer(&self.sprite.sprite_buffer, 0, bytemuck::bytes_of(&sprite));
    }

    /// Hand over this frame's tessellated UI
    pub fn set_ui(&mut self, primitives: Vec<egui::ClippedPrimitive>, textures: egui::TexturesDelta, dpr: f32) {
        self.egui_primitives = Some(primitives);
        self.egui_textures = Some(textures);
        self.egui_dpr = dpr;
    }

    pub fn draw_frame(&mut self, device: &Device, queue: &Queue, surface: &Surface, clear: Color) {
        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                surface.configure(device, &self.surface_config());
                match surface.get_current_texture() {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::warn!("no frame after reconfigure: {e}");
                        return;
                    }
                }
            }
            Err(e) => {
                tracing::warn!("skipping frame: {e}");
                return;
            }
        };

        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        {
            let mut rp = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("sprite_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(clear),
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let sprite = &self.sprite;
            rp.set_pipeline(&sprite.pipeline);
            rp.set_bind_group(0, &sprite.bind_group, &[]);
            rp.set_vertex_buffer(0, sprite.quad.vertex_buffer.slice(..));
            rp.set_index_buffer(sprite.quad.index_buffer.slice(..), IndexFormat::Uint32);
            rp.draw_indexed(0..sprite.quad.index_count, 0, 0..1);
        }

        if let (Some(primitives), Some(textures)) = (self.egui_primitives.take(), self.egui_textures.take()) {
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.width, self.height],
                pixels_per_point: self.egui_dpr,
            };

            for (id, image_delta) in &textures.set {
                self.egui_renderer.update_texture(device, queue, *id, image_delta);
            }
            self.egui_renderer
                .update_buffers(device, queue, &mut encoder, &primitives, &screen_descriptor);

            {
                let egui_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                    label: Some("egui_render_pass"),
                    color_attachments: &[Some(RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: Operations {
                            load: LoadOp::Load,
                            store: StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

                self.egui_renderer
                    .render(&mut egui_pass.forget_lifetime(), &primitives, &screen_descriptor);
            }

            for id in &textures.free {
                self.egui_renderer.free_texture(id);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}
