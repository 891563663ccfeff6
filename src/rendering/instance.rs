use std::mem::size_of;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::BufferUsages;

use crate::scene::DrawCall;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Instance {
    pub model: Mat4,
    pub color: Vec4,
    /// Columns of the 2x2 texture coordinate matrix, packed as (x.x, x.y, y.x, y.y).
    pub uv_axes: Vec4,
    pub uv_offset: Vec4,
}

impl From<&DrawCall> for Instance {
    fn from(draw: &DrawCall) -> Self {
        let uv = draw.uv_transform;
        Self {
            model: draw.model,
            color: draw.color.extend(1.0),
            uv_axes: Vec4::new(
                uv.matrix2.x_axis.x,
                uv.matrix2.x_axis.y,
                uv.matrix2.y_axis.x,
                uv.matrix2.y_axis.y,
            ),
            uv_offset: uv.translation.extend(0.0).extend(0.0),
        }
    }
}

impl Instance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4,
        9 => Float32x4,
        10 => Float32x4,
        11 => Float32x4
    ];

    pub fn descriptor() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-draw data for one frame, in draw order. Grows when a frame has more
/// draws than it can hold.
pub struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
}

impl InstanceBuffer {
    const INITIAL_CAPACITY: u64 = 64;

    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            buffer: Self::create(device, Self::INITIAL_CAPACITY),
            capacity: Self::INITIAL_CAPACITY,
        }
    }

    fn create(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance buffer"),
            size: size_of::<Instance>() as u64 * capacity,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[Instance]) {
        let needed = instances.len() as u64;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            self.buffer = Self::create(device, self.capacity);
            log::debug!("Instance buffer grown to {} entries", self.capacity);
        }

        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(instances));
    }

    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(1, self.buffer.slice(..));
    }
}
