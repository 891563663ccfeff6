use std::{f32::consts::TAU, mem::offset_of, path::Path};

use anyhow::Context;
use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec2, Vec3};
use itertools::izip;
use wgpu::util::DeviceExt;

use crate::scene::MeshKind;

const CYLINDER_SEGMENTS: u32 = 24;
const SPHERE_STACKS: u32 = 16;
const SPHERE_SLICES: u32 = 24;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
    pub color: Vec3,
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3, tex_coords: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coords,
            color: Vec3::ONE,
        }
    }
}

pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn procedural(kind: MeshKind) -> Option<Mesh> {
        match kind {
            MeshKind::Quad => Some(Self::quad()),
            MeshKind::Cube => Some(Self::cube()),
            MeshKind::Cylinder => Some(Self::cylinder(CYLINDER_SEGMENTS)),
            MeshKind::Sphere => Some(Self::sphere(SPHERE_STACKS, SPHERE_SLICES)),
            MeshKind::Truck => None,
        }
    }

    fn quad() -> Mesh {
        let mut mesh = Mesh::new("Quad");
        mesh.push_face(
            Vec3::new(0.5, 0.0, 0.5),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.5),
            Vec3::Y,
        );
        mesh
    }

    fn cube() -> Mesh {
        let mut mesh = Mesh::new("Cube");
        for normal in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z] {
            let u = if normal.y.abs() > 0.5 { Vec3::X } else { Vec3::Y };
            let v = normal.cross(u);
            mesh.push_face(normal, u, v, normal);
        }
        mesh
    }

    fn cylinder(segments: u32) -> Mesh {
        let mut mesh = Mesh::new("Cylinder");

        for i in 0..=segments {
            let t = i as f32 / segments as f32;
            let (sin, cos) = (t * TAU).sin_cos();
            let normal = Vec3::new(cos, sin, 0.0);
            mesh.vertices.push(Vertex::new(normal, normal, Vec2::new(t, 0.0)));
            mesh.vertices.push(Vertex::new(
                normal + Vec3::Z,
                normal,
                Vec2::new(t, 1.0),
            ));
        }

        for i in 0..segments {
            let bottom = i * 2;
            let (top, next_bottom, next_top) = (bottom + 1, bottom + 2, bottom + 3);
            mesh.push_triangle(bottom, next_bottom, top);
            mesh.push_triangle(top, next_bottom, next_top);
        }

        mesh
    }

    fn sphere(stacks: u32, slices: u32) -> Mesh {
        let mut mesh = Mesh::new("Sphere");

        for stack in 0..=stacks {
            let v = stack as f32 / stacks as f32;
            let (ring_radius, y) = (v * std::f32::consts::PI).sin_cos();
            for slice in 0..=slices {
                let u = slice as f32 / slices as f32;
                let (sin, cos) = (u * TAU).sin_cos();
                let normal = Vec3::new(ring_radius * cos, y, ring_radius * sin);
                mesh.vertices.push(Vertex::new(normal, normal, Vec2::new(u, v)));
            }
        }

        let row = slices + 1;
        for stack in 0..stacks {
            for slice in 0..slices {
                let a = stack * row + slice;
                let b = a + row;
                if stack != 0 {
                    mesh.push_triangle(a, b, a + 1);
                }
                if stack != stacks - 1 {
                    mesh.push_triangle(a + 1, b, b + 1);
                }
            }
        }

        mesh
    }

    /// Adds a rectangle centered on `center` spanning `u` and `v` either way.
    fn push_face(&mut self, center: Vec3, u: Vec3, v: Vec3, normal: Vec3) {
        let first = self.vertices.len() as u32;
        let corners = [
            (-1.0, -1.0, Vec2::new(0.0, 0.0)),
            (-1.0, 1.0, Vec2::new(0.0, 1.0)),
            (1.0, 1.0, Vec2::new(1.0, 1.0)),
            (1.0, -1.0, Vec2::new(1.0, 0.0)),
        ];

        for (su, sv, uv) in corners {
            self.vertices
                .push(Vertex::new(center + u * su + v * sv, normal, uv));
        }

        self.push_triangle(first, first + 1, first + 2);
        self.push_triangle(first, first + 2, first + 3);
    }

    /// Winds the triangle counter-clockwise as seen from the side its
    /// vertex normals point to.
    fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        let [pa, pb, pc] = [a, b, c].map(|i| self.vertices[i as usize].position);
        let outward = [a, b, c]
            .map(|i| self.vertices[i as usize].normal)
            .into_iter()
            .sum::<Vec3>();

        if (pb - pa).cross(pc - pa).dot(outward) >= 0.0 {
            self.indices.extend([a, b, c]);
        } else {
            self.indices.extend([a, c, b]);
        }
    }

    /// Flattens every mesh in the file's default scene into one mesh, baking
    /// node transforms and material base colors into the vertices.
    pub fn from_gltf(path: &Path) -> anyhow::Result<Mesh> {
        let (document, buffers, _images) = gltf::import(path)
            .with_context(|| format!("Failed to import {}", path.display()))?;

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .context("No scenes in gltf")?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Model".to_string());
        let mut mesh = Mesh::new(name);

        for node in scene.nodes() {
            mesh.append_gltf_node(&node, Mat4::IDENTITY, &buffers)?;
        }

        if mesh.indices.is_empty() {
            return Err(anyhow::anyhow!("Model without triangles: {}", path.display()));
        }

        Ok(mesh)
    }

    fn append_gltf_node(
        &mut self,
        node: &gltf::Node,
        parent: Mat4,
        buffers: &[gltf::buffer::Data],
    ) -> anyhow::Result<()> {
        let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
        let normal_matrix = Mat3::from_mat4(world).inverse().transpose();

        if let Some(gltf_mesh) = node.mesh() {
            for primitive in gltf_mesh.primitives() {
                if primitive.mode() != gltf::mesh::Mode::Triangles {
                    log::warn!(
                        "Skipping primitive {} of {:?}: unsupported mode {:?}",
                        primitive.index(),
                        gltf_mesh.name(),
                        primitive.mode()
                    );
                    continue;
                }

                let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
                let positions: Vec<Vec3> = reader
                    .read_positions()
                    .context("Primitive without positions")?
                    .map(Vec3::from)
                    .collect();
                let normals: Vec<Vec3> = match reader.read_normals() {
                    Some(normals) => normals.map(Vec3::from).collect(),
                    None => vec![Vec3::Y; positions.len()],
                };
                let tex_coords: Vec<Vec2> = match reader.read_tex_coords(0) {
                    Some(tex_coords) => tex_coords.into_f32().map(Vec2::from).collect(),
                    None => vec![Vec2::ZERO; positions.len()],
                };
                let [red, green, blue, _alpha] = primitive
                    .material()
                    .pbr_metallic_roughness()
                    .base_color_factor();
                let color = Vec3::new(red, green, blue);

                let first = self.vertices.len() as u32;
                self.vertices.extend(izip!(positions, normals, tex_coords).map(
                    |(position, normal, tex_coords)| Vertex {
                        position: world.transform_point3(position),
                        normal: (normal_matrix * normal).normalize_or_zero(),
                        tex_coords,
                        color,
                    },
                ));

                let added = self.vertices.len() as u32 - first;
                match reader.read_indices() {
                    Some(indices) => self
                        .indices
                        .extend(indices.into_u32().map(|index| first + index)),
                    None => self.indices.extend(first..first + added),
                }
            }
        }

        for child in node.children() {
            self.append_gltf_node(&child, world, buffers)?;
        }

        Ok(())
    }
}

pub struct RenderMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl RenderMesh {
    pub fn from_mesh(device: &wgpu::Device, mesh: &Mesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Vertex buffer ({})", mesh.name)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Index buffer ({})", mesh.name)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: mesh.indices.len() as u32,
        }
    }
}

pub const VERTEX_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, position) as wgpu::BufferAddress,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, normal) as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, tex_coords) as wgpu::BufferAddress,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x2,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, color) as wgpu::BufferAddress,
            shader_location: 3,
            format: wgpu::VertexFormat::Float32x3,
        },
    ],
};
