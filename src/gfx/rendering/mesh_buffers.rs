//! GPU vertex and index buffers for the shape meshes

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::gfx::geometry::{generate_mesh, GeometryData, MeshKind};

pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    pub fn from_geometry(device: &wgpu::Device, label: &str, geometry: &GeometryData) -> Self {
        let vertices = geometry.to_vertices();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
        }
    }
}

/// Uploaded meshes by kind; each kind is uploaded at most once
#[derive(Default)]
pub struct MeshBuffers {
    meshes: HashMap<MeshKind, GpuMesh>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates and uploads `kind` unless it is already resident
    pub fn upload(&mut self, device: &wgpu::Device, kind: MeshKind) {
        if self.meshes.contains_key(&kind) {
            return;
        }
        let geometry = generate_mesh(kind);
        log::debug!(
            "Uploading {} mesh: {} vertices, {} triangles",
            kind.name(),
            geometry.vertex_count(),
            geometry.triangle_count()
        );
        self.meshes
            .insert(kind, GpuMesh::from_geometry(device, kind.name(), &geometry));
    }

    pub fn get(&self, kind: MeshKind) -> Option<&GpuMesh> {
        self.meshes.get(&kind)
    }
}

pub trait DrawMesh<'a> {
    fn draw_mesh(&mut self, mesh: &'a GpuMesh);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b GpuMesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}
