use crate::GpuError;
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use museum_assets::{AssetStore, MeshData, TextureData};
use museum_common::{MeshId, TextureId};
use museum_render::{FramePlan, TextureBinding};
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.4,
    a: 0.0,
};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct FrameUniform {
    mvp: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    light_position: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct MaterialUniform {
    color: [f32; 4],
    use_texture: u32,
    _pad: [u32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    uv: [f32; 2],
    normal: [f32; 3],
}

fn interleave(mesh: &MeshData) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .enumerate()
        .map(|(i, p)| Vertex {
            position: p.to_array(),
            uv: mesh.uvs.get(i).map(|uv| uv.to_array()).unwrap_or_default(),
            normal: mesh.normals.get(i).map(|n| n.to_array()).unwrap_or_default(),
        })
        .collect()
}

fn aligned_stride(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

struct GpuTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Draws frame plans for one loaded scene.
pub struct MuseumRenderer {
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    material_buffer: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
    material_stride: u64,
    material_capacity: usize,
    meshes: BTreeMap<MeshId, GpuMesh>,
    textures: BTreeMap<TextureId, GpuTexture>,
    placeholder: GpuTexture,
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
    sample_count: u32,
    surface_format: wgpu::TextureFormat,
}

impl MuseumRenderer {
    /// Build the pipeline and upload every mesh and texture in `assets`.
    ///
    /// `max_draws` sizes the per-draw material buffer.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
        assets: &AssetStore,
        max_draws: usize,
    ) -> Self {
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniform_buffer"),
            contents: bytemuck::bytes_of(&FrameUniform {
                mvp: Mat4::IDENTITY.to_cols_array_2d(),
                view: Mat4::IDENTITY.to_cols_array_2d(),
                model: Mat4::IDENTITY.to_cols_array_2d(),
                light_position: [0.0; 4],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
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

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        // One material slot per draw, addressed with a dynamic offset.
        let material_size = std::mem::size_of::<MaterialUniform>() as u64;
        let material_stride = aligned_stride(
            material_size,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let material_capacity = max_draws.max(1);
        let material_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("material_uniform_buffer"),
            size: material_stride * material_capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(material_size),
                },
                count: None,
            }],
        });

        let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material_bind_group"),
            layout: &material_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &material_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(material_size),
                }),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
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
            label: Some("diffuse_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &material_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("standard_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::STANDARD_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x2,
                        2 => Float32x3,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        });

        let meshes = assets
            .meshes()
            .map(|(id, mesh)| {
                let vertices = interleave(&mesh.data);
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{}_vertex_buffer", mesh.name)),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                (
                    id,
                    GpuMesh {
                        vertex_buffer,
                        vertex_count: vertices.len() as u32,
                    },
                )
            })
            .collect();

        let textures = assets
            .textures()
            .map(|(id, data)| {
                let label = id.to_string();
                let texture = upload_texture(device, queue, &texture_layout, &sampler, data, &label);
                (id, texture)
            })
            .collect();

        let placeholder = upload_texture(
            device,
            queue,
            &texture_layout,
            &sampler,
            &TextureData::placeholder(),
            "placeholder",
        );

        let depth_view = create_depth_texture(device, width, height, sample_count);
        let msaa_view = create_msaa_texture(device, surface_format, width, height, sample_count);

        tracing::debug!(
            "uploaded {} meshes, {} textures, {} material slots",
            assets.mesh_count(),
            assets.texture_count(),
            material_capacity
        );

        Self {
            pipeline,
            frame_buffer,
            frame_bind_group,
            material_buffer,
            material_bind_group,
            material_stride,
            material_capacity,
            meshes,
            textures,
            placeholder,
            depth_view,
            msaa_view,
            sample_count,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_view = create_depth_texture(device, width, height, self.sample_count);
        self.msaa_view =
            create_msaa_texture(device, self.surface_format, width, height, self.sample_count);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame: clear, then one draw per plan entry in order.
    ///
    /// Every mesh and texture the plan names is checked before any command is
    /// recorded, so a failed call submits nothing.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        plan: &FramePlan,
    ) -> Result<(), GpuError> {
        if plan.draws.len() > self.material_capacity {
            return Err(GpuError::TooManyDraws {
                draws: plan.draws.len(),
                capacity: self.material_capacity,
            });
        }

        let mut resolved = Vec::with_capacity(plan.draws.len());
        for draw in &plan.draws {
            let mesh = self
                .meshes
                .get(&draw.mesh)
                .ok_or(GpuError::MissingMesh(draw.mesh))?;
            let texture = match draw.texture {
                TextureBinding::Placeholder => &self.placeholder,
                TextureBinding::Texture(id) => {
                    self.textures.get(&id).ok_or(GpuError::MissingTexture(id))?
                }
            };
            resolved.push((draw, mesh, texture));
        }

        let u = &plan.uniforms;
        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniform {
                mvp: u.mvp.to_cols_array_2d(),
                view: u.view.to_cols_array_2d(),
                model: u.model.to_cols_array_2d(),
                light_position: u.light_position.extend(1.0).to_array(),
            }),
        );

        let mut materials = vec![0u8; (self.material_stride as usize) * plan.draws.len()];
        for (slot, draw) in plan.draws.iter().enumerate() {
            let material = MaterialUniform {
                color: draw.color.to_rgba(),
                use_texture: draw.texture.is_textured() as u32,
                _pad: [0; 3],
            };
            let start = slot * self.material_stride as usize;
            let bytes = bytemuck::bytes_of(&material);
            materials[start..start + bytes.len()].copy_from_slice(bytes);
        }
        if !materials.is_empty() {
            queue.write_buffer(&self.material_buffer, 0, &materials);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let (view, resolve_target) = match &self.msaa_view {
                Some(msaa) => (msaa, Some(target)),
                None => (target, None),
            };
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for (slot, (draw, mesh, texture)) in resolved.iter().enumerate() {
                let offset = (slot as u64 * self.material_stride) as u32;
                pass.set_bind_group(1, &self.material_bind_group, &[offset]);
                pass.set_bind_group(2, &texture.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.draw(0..draw.vertex_count.min(mesh.vertex_count), 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Release GPU resources: vertex buffers, uniform buffers, then textures.
    /// The pipeline and bind groups are dropped with `self`.
    pub fn release(self) {
        for mesh in self.meshes.values() {
            mesh.vertex_buffer.destroy();
        }
        self.frame_buffer.destroy();
        self.material_buffer.destroy();
        for texture in self.textures.values() {
            texture.texture.destroy();
        }
        self.placeholder.texture.destroy();
        tracing::debug!(
            "released {} meshes and {} textures",
            self.meshes.len(),
            self.textures.len()
        );
    }
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    data: &TextureData,
    label: &str,
) -> GpuTexture {
    let size = wgpu::Extent3d {
        width: data.width.max(1),
        height: data.height.max(1),
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TEXTURE_FORMAT,
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
        &data.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(data.bytes_per_row()),
            rows_per_image: Some(data.height),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    GpuTexture {
        texture,
        bind_group,
    }
}

fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    sample_count: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

fn create_msaa_texture(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    sample_count: u32,
) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("msaa_color_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(texture.create_view(&Default::default()))
}
