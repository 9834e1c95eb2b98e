use anyhow::{anyhow, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::assets::ImageData;
use crate::coords::Mat3;

use super::texture::QuadTexture;
use super::{RenderCtx, RenderTarget};

/// Interleaved vertex: 2D position followed by texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    pos: [f32; 2],
    uv: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2  // uv
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Two triangles covering the square [-0.5, 0.5]², UV spanning [0, 1]².
///
/// wgpu texture origin is top-left, so the top-left corner carries UV (0, 0)
/// and the decoded image is sampled unflipped. Rotation happens in the vertex
/// stage; these vertices are never mutated.
const QUAD_VERTICES: [QuadVertex; 6] = [
    QuadVertex { pos: [-0.5, -0.5], uv: [0.0, 1.0] },
    QuadVertex { pos: [ 0.5, -0.5], uv: [1.0, 1.0] },
    QuadVertex { pos: [ 0.5,  0.5], uv: [1.0, 0.0] },
    QuadVertex { pos: [-0.5, -0.5], uv: [0.0, 1.0] },
    QuadVertex { pos: [ 0.5,  0.5], uv: [1.0, 0.0] },
    QuadVertex { pos: [-0.5,  0.5], uv: [0.0, 0.0] },
];

/// Rotation uniform: a WGSL `mat3x3<f32>`, three 16-byte-aligned columns.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TransformUniform {
    columns: [[f32; 4]; 3],
}

impl From<Mat3> for TransformUniform {
    /// Transposes the row-major [`Mat3`] into the padded column layout the
    /// shader expects.
    fn from(m: Mat3) -> Self {
        let r = m.rows;
        Self {
            columns: [
                [r[0][0], r[1][0], r[2][0], 0.0],
                [r[0][1], r[1][1], r[2][1], 0.0],
                [r[0][2], r[1][2], r[2][2], 0.0],
            ],
        }
    }
}

/// Renderer for the single rotating textured quad.
///
/// Everything is created up front in [`QuadRenderer::new`]: shader module,
/// pipeline, vertex buffer, texture, transform uniform, bind group. Shader
/// and attribute-binding mismatches therefore surface at setup, not as
/// corrupted frames.
pub struct QuadRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    transform_ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl QuadRenderer {
    /// Builds the pipeline, uploads geometry and texture, and wires bindings.
    ///
    /// Runs inside a wgpu validation error scope so shader-compile and
    /// pipeline diagnostics come back as an `Err` carrying the driver log
    /// instead of a panic on the next device poll.
    pub fn new(ctx: &RenderCtx<'_>, image: &ImageData) -> Result<Self> {
        let error_scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cratespin quad shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("cratespin quad bgl"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: Some(
                                    std::num::NonZeroU64::new(
                                        std::mem::size_of::<TransformUniform>() as u64,
                                    )
                                    .unwrap(),
                                ),
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
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

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("cratespin quad pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("cratespin quad pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[QuadVertex::layout()],
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

        let texture = QuadTexture::upload(ctx, image);

        let vertex_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("cratespin quad vbo"),
                contents: bytemuck::cast_slice(&QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let transform_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cratespin quad transform ubo"),
            size: std::mem::size_of::<TransformUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cratespin quad bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: transform_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        if let Some(err) = pollster::block_on(error_scope.pop()) {
            return Err(anyhow!("quad pipeline validation failed: {err}"));
        }

        // The bind group keeps the texture view and sampler alive; the
        // QuadTexture wrapper itself is no longer needed.
        Ok(Self {
            pipeline,
            vertex_buffer,
            transform_ubo,
            bind_group,
        })
    }

    /// Writes the rotation transform used by subsequent draws.
    pub fn set_transform(&self, ctx: &RenderCtx<'_>, transform: Mat3) {
        let uniform = TransformUniform::from(transform);
        ctx.queue
            .write_buffer(&self.transform_ubo, 0, bytemuck::bytes_of(&uniform));
    }

    /// Records the quad draw call into `target`.
    ///
    /// Assumes the target was already cleared; the pass loads the existing
    /// contents.
    pub fn draw(&self, target: &mut RenderTarget<'_>) {
        let mut rpass = target
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cratespin quad pass"),
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

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn quad_is_six_vertices_on_the_square_corners() {
        assert_eq!(QUAD_VERTICES.len(), 6);
        for v in &QUAD_VERTICES {
            assert!(v.pos[0] == -0.5 || v.pos[0] == 0.5);
            assert!(v.pos[1] == -0.5 || v.pos[1] == 0.5);
        }
    }

    #[test]
    fn quad_covers_all_four_corners() {
        for corner in [[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]] {
            assert!(
                QUAD_VERTICES.iter().any(|v| v.pos == corner),
                "corner {corner:?} missing"
            );
        }
    }

    #[test]
    fn both_triangles_wind_counter_clockwise() {
        for tri in QUAD_VERTICES.chunks(3) {
            let [a, b, c] = [tri[0].pos, tri[1].pos, tri[2].pos];
            let signed_area =
                (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            assert!(signed_area > 0.0);
        }
    }

    #[test]
    fn uv_maps_the_square_onto_the_unit_range_unflipped() {
        for v in &QUAD_VERTICES {
            assert_eq!(v.uv[0], v.pos[0] + 0.5);
            assert_eq!(v.uv[1], 0.5 - v.pos[1]);
        }
    }

    // ── uniform marshalling ───────────────────────────────────────────────

    #[test]
    fn transform_uniform_transposes_rows_into_padded_columns() {
        let m = Mat3 {
            rows: [
                [1.0, 2.0, 3.0],
                [4.0, 5.0, 6.0],
                [7.0, 8.0, 9.0],
            ],
        };
        let u = TransformUniform::from(m);
        assert_eq!(u.columns[0], [1.0, 4.0, 7.0, 0.0]);
        assert_eq!(u.columns[1], [2.0, 5.0, 8.0, 0.0]);
        assert_eq!(u.columns[2], [3.0, 6.0, 9.0, 0.0]);
    }

    #[test]
    fn transform_uniform_matches_wgsl_mat3_stride() {
        assert_eq!(std::mem::size_of::<TransformUniform>(), 48);
    }
}
