use std::collections::HashMap;

use bytemuck::Zeroable;
use id_arena::{Arena, Id};
use wgpu::{
    DepthBiasState, MultisampleState, PipelineCompilationOptions, RenderPassDescriptor,
    ShaderSource, StencilState,
};

use crate::{
    rendering::{
        global_uniform::{GlobalUniform, GlobalUniformState},
        instance::{Instance, InstanceBuffer},
        mesh::{RenderMesh, VERTEX_LAYOUT},
        texture::{DepthTexture, Texture},
    },
    scene::{Frame, MeshKind, TextureKind},
};

pub type RenderMeshId = Id<RenderMesh>;

const SCENE_SHADER: &str = include_str!("../shaders/scene.wgsl");

pub struct ScenePassTextureViews<'a> {
    pub color: &'a wgpu::TextureView,
    pub depth: &'a wgpu::TextureView,
}

/// Draws a [`Frame`]'s draw calls, in order, with one lit and textured
/// pipeline.
pub struct ScenePass {
    pipeline: wgpu::RenderPipeline,
    globals: GlobalUniform,
    instances: InstanceBuffer,
    texture_bind_groups: [wgpu::BindGroup; TextureKind::COUNT],
    untextured_bind_group: wgpu::BindGroup,
    meshes: Arena<RenderMesh>,
    mesh_ids: HashMap<MeshKind, RenderMeshId>,
}

impl ScenePass {
    pub fn create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        textures: [Texture; TextureKind::COUNT],
    ) -> Self {
        let globals = GlobalUniform::new(device, GlobalUniformState::zeroed());

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Texture bind group layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
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

        let bind_texture = |texture: &Texture, label: &str| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &texture_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&texture.sampler),
                    },
                ],
            })
        };

        let texture_bind_groups = TextureKind::ALL
            .map(|kind| bind_texture(&textures[kind.index()], kind.file_name()));
        let untextured_bind_group =
            bind_texture(&Texture::white(device, queue), "Untextured bind group");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene pipeline layout"),
            bind_group_layouts: &[&globals.bind_group_layout, &texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene shader"),
            source: ShaderSource::Wgsl(SCENE_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene render pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[VERTEX_LAYOUT, Instance::descriptor()],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthTexture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            globals,
            instances: InstanceBuffer::new(device),
            texture_bind_groups,
            untextured_bind_group,
            meshes: Arena::new(),
            mesh_ids: HashMap::new(),
        }
    }

    pub fn add_mesh(&mut self, kind: MeshKind, mesh: RenderMesh) {
        let id = self.meshes.alloc(mesh);
        self.mesh_ids.insert(kind, id);
    }

    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        frame: &Frame,
        texture_views: &ScenePassTextureViews,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        self.globals
            .update(queue, GlobalUniformState::new(&frame.camera, &frame.lights));

        let instances: Vec<Instance> = frame.draws.iter().map(Instance::from).collect();
        self.instances.write(device, queue, &instances);

        let [r, g, b, a] = frame.clear_color;
        let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: texture_views.color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: texture_views.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.globals.bind_group, &[]);
        self.instances.bind(&mut render_pass);

        for (index, draw) in frame.draws.iter().enumerate() {
            let Some(mesh) = self
                .mesh_ids
                .get(&draw.mesh)
                .and_then(|id| self.meshes.get(*id))
            else {
                continue;
            };

            let bind_group = match draw.texture {
                Some(texture) => &self.texture_bind_groups[texture.index()],
                None => &self.untextured_bind_group,
            };

            let instance = index as u32;
            render_pass.set_bind_group(1, bind_group, &[]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.num_indices, 0, instance..instance + 1);
        }
    }
}
