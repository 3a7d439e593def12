//! wgpu implementation of the host renderer seams

use std::mem;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};
use imbridge_core::{bridge_warn_rate_limited, LogCategory, Rect};
use wgpu::{
    BindGroup, BindGroupLayout, Buffer, BufferAddress, BufferUsages, CommandEncoderDescriptor,
    Device, Extent3d, Queue, RenderPipeline, Sampler, TextureFormat, TextureView,
    VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode,
};

use super::{GpuTexture, Render2D, TextureBackend, TextureDesc, TextureUpload, TriangleMesh};

/// Vertex as uploaded to the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [u8; 4],
}

impl GpuVertex {
    pub fn desc() -> VertexBufferLayout<'static> {
        const ATTRIBUTES: [VertexAttribute; 3] = [
            VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: VertexFormat::Float32x2,
            },
            VertexAttribute {
                offset: mem::size_of::<[f32; 2]>() as BufferAddress,
                shader_location: 1,
                format: VertexFormat::Float32x2,
            },
            VertexAttribute {
                offset: mem::size_of::<[f32; 4]>() as BufferAddress,
                shader_location: 2,
                format: VertexFormat::Unorm8x4,
            },
        ];
        VertexBufferLayout {
            array_stride: mem::size_of::<GpuVertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// RGBA8 texture plus the bind group that samples it
#[derive(Debug)]
pub struct WgpuTexture {
    texture: Option<wgpu::Texture>,
    bind_group: Option<Arc<BindGroup>>,
    width: u32,
    height: u32,
}

impl WgpuTexture {
    pub fn texture(&self) -> Option<&wgpu::Texture> {
        self.texture.as_ref()
    }
}

impl GpuTexture for WgpuTexture {
    fn is_allocated(&self) -> bool {
        self.texture.is_some()
    }

    fn release_gpu(&mut self) {
        self.bind_group = None;
        if let Some(texture) = self.texture.take() {
            texture.destroy();
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Render target for one batch
#[derive(Debug)]
pub struct WgpuTarget {
    pub view: TextureView,
    /// Size in framebuffer pixels
    pub width: u32,
    pub height: u32,
    /// Display coordinate of the target's top-left corner
    pub origin: Vec2,
    /// Framebuffer pixels per display unit
    pub scale: f32,
}

struct DrawBatch {
    index_start: u32,
    index_count: u32,
    base_vertex: i32,
    scissor: Option<[u32; 4]>,
    bind_group: Arc<BindGroup>,
}

/// Renders GUI geometry into a caller-supplied texture view.
///
/// Draws are accumulated between `begin` and `end`, then uploaded and encoded
/// into a single render pass that loads the existing target contents.
pub struct WgpuBackend {
    device: Arc<Device>,
    queue: Arc<Queue>,
    pipeline: RenderPipeline,
    texture_layout: BindGroupLayout,
    uniform_bind_group: BindGroup,
    uniform_buffer: Buffer,
    sampler: Sampler,

    vertex_buffer: Option<Buffer>,
    index_buffer: Option<Buffer>,

    // Cache for reuse
    vertices: Vec<GpuVertex>,
    indices: Vec<u16>,
    batches: Vec<DrawBatch>,
    scissor_stack: Vec<[u32; 4]>,
    target: Option<WgpuTarget>,
}

impl WgpuBackend {
    pub fn new(device: Arc<Device>, queue: Arc<Queue>, target_format: TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("GUI Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/gui.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("GUI Uniform Buffer"),
            size: mem::size_of::<[[f32; 4]; 4]>() as BufferAddress,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("GUI Uniform Layout"),
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
            label: Some("GUI Uniform Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("GUI Texture Layout"),
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

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("GUI Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("GUI Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("GUI Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[GpuVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        tracing::debug!("GUI pipeline created for {:?}", target_format);

        Self {
            device,
            queue,
            pipeline,
            texture_layout,
            uniform_bind_group,
            uniform_buffer,
            sampler,
            vertex_buffer: None,
            index_buffer: None,
            vertices: Vec::with_capacity(1024),
            indices: Vec::with_capacity(1536),
            batches: Vec::new(),
            scissor_stack: Vec::new(),
            target: None,
        }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Grow `buffer` to hold `needed` bytes, rounding up to a power of two
    fn ensure_buffer(
        device: &Device,
        buffer: &mut Option<Buffer>,
        needed: BufferAddress,
        usage: BufferUsages,
        label: &str,
    ) {
        let fits = buffer.as_ref().is_some_and(|b| b.size() >= needed);
        if !fits {
            *buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: needed.next_power_of_two().max(wgpu::COPY_BUFFER_ALIGNMENT),
                usage: usage | BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }
    }

    fn clamp_scissor(rect: Rect, target: &WgpuTarget) -> [u32; 4] {
        let min_x = rect.x.round().clamp(0.0, target.width as f32) as u32;
        let min_y = rect.y.round().clamp(0.0, target.height as f32) as u32;
        let max_x = (rect.x + rect.width).round().clamp(0.0, target.width as f32) as u32;
        let max_y = (rect.y + rect.height).round().clamp(0.0, target.height as f32) as u32;
        [min_x, min_y, max_x.saturating_sub(min_x), max_y.saturating_sub(min_y)]
    }
}

impl TextureBackend for WgpuBackend {
    type Texture = WgpuTexture;

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<WgpuTexture> {
        let max = self.device.limits().max_texture_dimension_2d;
        if desc.width == 0 || desc.height == 0 || desc.width > max || desc.height > max {
            bail!(
                "texture '{}' size {}x{} outside 1..={}",
                desc.label,
                desc.width,
                desc.height,
                max
            );
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&desc.label),
            size: Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&desc.label),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        Ok(WgpuTexture {
            texture: Some(texture),
            bind_group: Some(Arc::new(bind_group)),
            width: desc.width,
            height: desc.height,
        })
    }

    fn update_texture(&mut self, texture: &WgpuTexture, upload: TextureUpload<'_>) -> Result<()> {
        let gpu_texture = texture
            .texture
            .as_ref()
            .ok_or_else(|| anyhow!("texture was released"))?;
        if !upload.region.fits_within(texture.width, texture.height) {
            bail!("region {:?} outside {}x{} texture", upload.region, texture.width, texture.height);
        }
        if upload.offset + upload.required_len() > upload.data.len() {
            bail!("upload overruns its {} byte source", upload.data.len());
        }
        if upload.region.is_empty() {
            return Ok(());
        }

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: gpu_texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: upload.region.x,
                    y: upload.region.y,
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            upload.data,
            wgpu::ImageDataLayout {
                offset: upload.offset as u64,
                bytes_per_row: Some(upload.row_pitch),
                rows_per_image: Some(upload.slice_pitch / upload.row_pitch.max(1)),
            },
            Extent3d {
                width: upload.region.width,
                height: upload.region.height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }
}

impl Render2D for WgpuBackend {
    type Target = WgpuTarget;

    fn begin(&mut self, target: WgpuTarget) -> Result<()> {
        if self.target.is_some() {
            bail!("batch already open");
        }

        self.vertices.clear();
        self.indices.clear();
        self.batches.clear();
        self.scissor_stack.clear();

        let scale = if target.scale > 0.0 { target.scale } else { 1.0 };
        let logical_width = target.width as f32 / scale;
        let logical_height = target.height as f32 / scale;
        let projection = Mat4::orthographic_rh(
            target.origin.x,
            target.origin.x + logical_width,
            target.origin.y + logical_height,
            target.origin.y,
            -1.0,
            1.0,
        );
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&projection.to_cols_array_2d()),
        );

        self.target = Some(target);
        Ok(())
    }

    fn push_clip(&mut self, rect: Rect) {
        let Some(target) = self.target.as_ref() else {
            return;
        };
        let mut scissor = Self::clamp_scissor(rect, target);
        if let Some(parent) = self.scissor_stack.last() {
            let ix = scissor[0].max(parent[0]);
            let iy = scissor[1].max(parent[1]);
            let iw = (scissor[0] + scissor[2]).min(parent[0] + parent[2]).saturating_sub(ix);
            let ih = (scissor[1] + scissor[3]).min(parent[1] + parent[3]).saturating_sub(iy);
            scissor = [ix, iy, iw, ih];
        }
        self.scissor_stack.push(scissor);
    }

    fn pop_clip(&mut self) {
        self.scissor_stack.pop();
    }

    fn draw_textured_triangles(&mut self, texture: &WgpuTexture, mesh: TriangleMesh<'_>) {
        let Some(bind_group) = texture.bind_group.as_ref() else {
            bridge_warn_rate_limited!(LogCategory::Renderer, "draw with released texture skipped");
            return;
        };
        if mesh.triangle_count() == 0 {
            return;
        }
        self.vertices.reserve(mesh.vertex_count());

        let base_vertex = self.vertices.len() as i32;
        let index_start = self.indices.len() as u32;

        self.vertices.extend(
            mesh.positions
                .iter()
                .zip(mesh.uvs)
                .zip(mesh.colors)
                .map(|((pos, uv), col)| GpuVertex {
                    position: pos.to_array(),
                    uv: uv.to_array(),
                    color: [col.r, col.g, col.b, col.a],
                }),
        );
        self.indices.extend_from_slice(mesh.indices);

        self.batches.push(DrawBatch {
            index_start,
            index_count: mesh.indices.len() as u32,
            base_vertex,
            scissor: self.scissor_stack.last().copied(),
            bind_group: Arc::clone(bind_group),
        });
    }

    fn end(&mut self) -> Result<()> {
        let target = self
            .target
            .take()
            .ok_or_else(|| anyhow!("no batch open"))?;

        if self.batches.is_empty() {
            return Ok(());
        }

        // write_buffer needs 4-byte multiples
        if self.indices.len() % 2 == 1 {
            self.indices.push(0);
        }

        let vertex_bytes: &[u8] = bytemuck::cast_slice(&self.vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(&self.indices);
        Self::ensure_buffer(
            &self.device,
            &mut self.vertex_buffer,
            vertex_bytes.len() as BufferAddress,
            BufferUsages::VERTEX,
            "GUI Vertex Buffer",
        );
        Self::ensure_buffer(
            &self.device,
            &mut self.index_buffer,
            index_bytes.len() as BufferAddress,
            BufferUsages::INDEX,
            "GUI Index Buffer",
        );
        let (Some(vertex_buffer), Some(index_buffer)) =
            (self.vertex_buffer.as_ref(), self.index_buffer.as_ref())
        else {
            bail!("GUI buffers unavailable");
        };
        self.queue.write_buffer(vertex_buffer, 0, vertex_bytes);
        self.queue.write_buffer(index_buffer, 0, index_bytes);

        let mut encoder = self.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("GUI Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GUI Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            for batch in &self.batches {
                match batch.scissor {
                    Some([_, _, 0, _]) | Some([_, _, _, 0]) => continue,
                    Some([x, y, w, h]) => render_pass.set_scissor_rect(x, y, w, h),
                    None => render_pass.set_scissor_rect(0, 0, target.width, target.height),
                }
                render_pass.set_bind_group(1, &batch.bind_group, &[]);
                render_pass.draw_indexed(
                    batch.index_start..batch.index_start + batch.index_count,
                    batch.base_vertex,
                    0..1,
                );
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}
