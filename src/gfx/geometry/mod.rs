//! # Procedural Shape Meshes
//!
//! The scene is built from five primitive meshes, generated procedurally so no
//! model files are needed. Each mesh kind is loaded once and drawn any number of
//! times with different transforms.
//!
//! ## Usage
//!
//! ```rust
//! use porchlight::gfx::geometry::{MeshKind, generate_mesh};
//!
//! let column = generate_mesh(MeshKind::TaperedCylinder);
//! assert!(column.triangle_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// The primitive meshes the scene can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Plane,
    Box,
    TaperedCylinder,
    Prism,
    Pyramid3,
}

impl MeshKind {
    pub const ALL: [MeshKind; 5] = [
        MeshKind::Plane,
        MeshKind::Box,
        MeshKind::TaperedCylinder,
        MeshKind::Prism,
        MeshKind::Pyramid3,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MeshKind::Plane => "plane",
            MeshKind::Box => "box",
            MeshKind::TaperedCylinder => "tapered cylinder",
            MeshKind::Prism => "prism",
            MeshKind::Pyramid3 => "pyramid3",
        }
    }
}

/// Generates the geometry for a mesh kind
pub fn generate_mesh(kind: MeshKind) -> GeometryData {
    match kind {
        MeshKind::Plane => generate_plane(),
        MeshKind::Box => generate_box(),
        MeshKind::TaperedCylinder => generate_tapered_cylinder(TAPERED_CYLINDER_SEGMENTS),
        MeshKind::Prism => generate_prism(),
        MeshKind::Pyramid3 => generate_pyramid3(),
    }
}

/// Loads and draws shape meshes
///
/// Loading uploads a mesh once; drawing issues it with whatever shader state is
/// current at the time of the call.
pub trait ShapeMeshes {
    fn load_mesh(&mut self, kind: MeshKind);
    fn draw_mesh(&mut self, kind: MeshKind);

    fn load_plane_mesh(&mut self) {
        self.load_mesh(MeshKind::Plane);
    }

    fn load_box_mesh(&mut self) {
        self.load_mesh(MeshKind::Box);
    }

    fn load_tapered_cylinder_mesh(&mut self) {
        self.load_mesh(MeshKind::TaperedCylinder);
    }

    fn load_prism_mesh(&mut self) {
        self.load_mesh(MeshKind::Prism);
    }

    fn load_pyramid3_mesh(&mut self) {
        self.load_mesh(MeshKind::Pyramid3);
    }

    fn draw_plane_mesh(&mut self) {
        self.draw_mesh(MeshKind::Plane);
    }

    fn draw_box_mesh(&mut self) {
        self.draw_mesh(MeshKind::Box);
    }

    fn draw_tapered_cylinder_mesh(&mut self) {
        self.draw_mesh(MeshKind::TaperedCylinder);
    }

    fn draw_prism_mesh(&mut self) {
        self.draw_mesh(MeshKind::Prism);
    }

    fn draw_pyramid3_mesh(&mut self) {
        self.draw_mesh(MeshKind::Pyramid3);
    }
}

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends one vertex and returns its index
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        self.vertices.push(position);
        self.normals.push(normal);
        self.tex_coords.push(uv);
        (self.vertices.len() - 1) as u32
    }

    /// Interleaves the attribute streams into the renderer's vertex format
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }
}
