use std::borrow::Cow;
use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};

use crate::device::{BackgroundImage, create_nearest_sampler};
use crate::render::{RenderCtx, RenderTarget};
use crate::ripple::{
    ExportBlock, LifetimeUniform, RIPPLE_RECORD_SIZE, RIPPLE_SET_HEADER_SIZE, RIPPLE_SET_MIN_SIZE,
};

/// Records the ripple set buffer holds before its first growth.
pub const INITIAL_RIPPLE_CAPACITY: usize = 16;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ResolutionUniform {
    size: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

/// Full-screen pass that distorts the background with the live ripples.
///
/// Group 0 holds three consecutive slots starting at `first_binding`:
/// resolution, ripple set (`count` + records), lifetime. Group 1 holds the
/// background texture and its sampler.
///
/// GPU resources are created on first use and rebuilt when the surface format
/// changes. The ripple set buffer grows to the next power of two when the
/// survivor count exceeds it.
pub struct RipplePass {
    first_binding: u32,
    background: BackgroundImage,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    params_layout: Option<wgpu::BindGroupLayout>,
    params_bind_group: Option<wgpu::BindGroup>,
    resolution_ubo: Option<wgpu::Buffer>,
    lifetime_ubo: Option<wgpu::Buffer>,
    ripple_set: Option<wgpu::Buffer>,
    ripple_capacity: usize,

    texture_layout: Option<wgpu::BindGroupLayout>,
    texture_bind_group: Option<wgpu::BindGroup>,
    background_view: Option<wgpu::TextureView>,

    staging: Vec<u8>,
}

impl RipplePass {
    pub fn new(first_binding: u32, background: BackgroundImage) -> Self {
        Self {
            first_binding,
            background,
            pipeline_format: None,
            pipeline: None,
            params_layout: None,
            params_bind_group: None,
            resolution_ubo: None,
            lifetime_ubo: None,
            ripple_set: None,
            ripple_capacity: 0,
            texture_layout: None,
            texture_bind_group: None,
            background_view: None,
            staging: Vec::new(),
        }
    }

    /// First slot after the ones this pass occupies.
    #[inline]
    pub fn next_binding(&self) -> u32 {
        self.first_binding + 3
    }

    /// Uploads `block` and draws the full-screen triangle over `target`.
    ///
    /// Loads the existing target contents; the caller clears first.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        block: &ExportBlock<'_>,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_texture(ctx);
        self.ensure_uniforms(ctx);
        self.ensure_ripple_capacity(ctx, block.records().len());
        self.ensure_params_bind_group(ctx);

        self.write_export(ctx, block);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(params) = self.params_bind_group.as_ref() else { return };
        let Some(texture) = self.texture_bind_group.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ripple pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, params, &[]);
        rpass.set_bind_group(1, texture, &[]);
        rpass.draw(0..3, 0..1);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn write_export(&mut self, ctx: &RenderCtx<'_>, block: &ExportBlock<'_>) {
        let (Some(resolution_ubo), Some(lifetime_ubo), Some(ripple_set)) = (
            self.resolution_ubo.as_ref(),
            self.lifetime_ubo.as_ref(),
            self.ripple_set.as_ref(),
        ) else {
            return;
        };

        let resolution = ResolutionUniform {
            size: ctx.resolution,
            _pad: [0.0; 2],
        };
        ctx.queue
            .write_buffer(resolution_ubo, 0, bytemuck::bytes_of(&resolution));

        self.staging.clear();
        block.write_ripple_set(&mut self.staging);
        ctx.queue.write_buffer(ripple_set, 0, &self.staging);

        ctx.queue
            .write_buffer(lifetime_ubo, 0, bytemuck::bytes_of(&block.lifetime_uniform()));
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ripple shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Owned(shader_source(self.first_binding))),
        });

        let params_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("ripple params bgl"),
                entries: &params_layout_entries(self.first_binding),
            });

        let texture_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("ripple texture bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("ripple pipeline layout"),
                bind_group_layouts: &[&params_layout, &texture_layout],
                immediate_size: 0,
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("ripple pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
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

        log::debug!(
            "ripple pipeline built for {:?}, bindings {}..{}",
            ctx.surface_format,
            self.first_binding,
            self.next_binding()
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.params_layout = Some(params_layout);
        self.texture_layout = Some(texture_layout);
        self.params_bind_group = None;
        self.texture_bind_group = None;
    }

    fn ensure_texture(&mut self, ctx: &RenderCtx<'_>) {
        if self.texture_bind_group.is_some() {
            return;
        }
        let Some(layout) = self.texture_layout.as_ref() else { return };

        let view = match self.background_view.take() {
            Some(v) => v,
            None => self.background.upload(ctx.device, ctx.queue),
        };
        let sampler = create_nearest_sampler(ctx.device);

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ripple texture bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        self.background_view = Some(view);
        self.texture_bind_group = Some(bind_group);
    }

    fn ensure_uniforms(&mut self, ctx: &RenderCtx<'_>) {
        if self.resolution_ubo.is_none() {
            self.resolution_ubo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("ripple resolution ubo"),
                size: std::mem::size_of::<ResolutionUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.params_bind_group = None;
        }

        if self.lifetime_ubo.is_none() {
            self.lifetime_ubo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("ripple lifetime ubo"),
                size: std::mem::size_of::<LifetimeUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.params_bind_group = None;
        }
    }

    fn ensure_ripple_capacity(&mut self, ctx: &RenderCtx<'_>, needed: usize) {
        if self.ripple_set.is_some() && needed <= self.ripple_capacity {
            return;
        }

        let capacity = grown_capacity(self.ripple_capacity, needed);
        log::debug!(
            "ripple set buffer: {} -> {} records",
            self.ripple_capacity,
            capacity
        );

        self.ripple_set = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ripple set"),
            size: ripple_set_buffer_size(capacity),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.ripple_capacity = capacity;
        self.params_bind_group = None;
    }

    fn ensure_params_bind_group(&mut self, ctx: &RenderCtx<'_>) {
        if self.params_bind_group.is_some() {
            return;
        }
        let (Some(layout), Some(resolution_ubo), Some(ripple_set), Some(lifetime_ubo)) = (
            self.params_layout.as_ref(),
            self.resolution_ubo.as_ref(),
            self.ripple_set.as_ref(),
            self.lifetime_ubo.as_ref(),
        ) else {
            return;
        };

        let [resolution, ripples, lifetime] = binding_slots(self.first_binding);

        self.params_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ripple params bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: resolution,
                    resource: resolution_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: ripples,
                    resource: ripple_set.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: lifetime,
                    resource: lifetime_ubo.as_entire_binding(),
                },
            ],
        }));
    }
}

/// Slot numbers for resolution, ripple set and lifetime.
fn binding_slots(first_binding: u32) -> [u32; 3] {
    [first_binding, first_binding + 1, first_binding + 2]
}

/// Shader source with the group 0 slot numbers filled in.
fn shader_source(first_binding: u32) -> String {
    let [resolution, ripples, lifetime] = binding_slots(first_binding);
    include_str!("shaders/ripple.wgsl")
        .replace("$RESOLUTION_BINDING", &resolution.to_string())
        .replace("$RIPPLE_SET_BINDING", &ripples.to_string())
        .replace("$LIFETIME_BINDING", &lifetime.to_string())
}

fn params_layout_entries(first_binding: u32) -> [wgpu::BindGroupLayoutEntry; 3] {
    let [resolution, ripples, lifetime] = binding_slots(first_binding);

    let uniform = |binding: u32, size: u64| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(size),
        },
        count: None,
    };

    [
        uniform(resolution, std::mem::size_of::<ResolutionUniform>() as u64),
        wgpu::BindGroupLayoutEntry {
            binding: ripples,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(RIPPLE_SET_MIN_SIZE),
            },
            count: None,
        },
        uniform(lifetime, std::mem::size_of::<LifetimeUniform>() as u64),
    ]
}

/// Capacity to allocate so that `needed` records fit. Never shrinks.
fn grown_capacity(current: usize, needed: usize) -> usize {
    let needed = needed.max(1);
    if needed <= current {
        return current;
    }
    needed.next_power_of_two().max(INITIAL_RIPPLE_CAPACITY)
}

fn ripple_set_buffer_size(capacity: usize) -> u64 {
    RIPPLE_SET_HEADER_SIZE + RIPPLE_RECORD_SIZE * capacity.max(1) as u64
}
