//! # Primitive Shape Generation
//!
//! Generates the five shapes the scene is assembled from. All shapes are Y-up,
//! roughly unit sized, and carry outward normals and texture coordinates.

use super::GeometryData;
use cgmath::{InnerSpace, Vector3};
use std::f32::consts::PI;

/// Side resolution of the tapered cylinder
pub const TAPERED_CYLINDER_SEGMENTS: u32 = 36;

/// Top radius of the tapered cylinder relative to its unit bottom radius
pub const TAPER_RATIO: f32 = 0.5;

/// Appends a flat polygon facing `outward`
///
/// The polygon is fanned from its first corner. Winding is flipped where needed
/// so every triangle is counter-clockwise when seen from the outward side.
fn push_face(data: &mut GeometryData, corners: &[[f32; 3]], uvs: &[[f32; 2]], outward: [f32; 3]) {
    let normal = Vector3::from(outward).normalize();
    let first = data.vertices.len() as u32;
    for (corner, uv) in corners.iter().zip(uvs) {
        data.push_vertex(*corner, normal.into(), *uv);
    }

    for i in 1..corners.len() - 1 {
        let a = Vector3::from(corners[0]);
        let b = Vector3::from(corners[i]);
        let c = Vector3::from(corners[i + 1]);
        let (j, k) = if (b - a).cross(c - a).dot(normal) >= 0.0 {
            (i, i + 1)
        } else {
            (i + 1, i)
        };
        data.indices.extend([first, first + j as u32, first + k as u32]);
    }
}

/// Generate a 2x2 plane in the XZ plane with its normal pointing up (+Y)
pub fn generate_plane() -> GeometryData {
    let mut data = GeometryData::new();

    data.push_vertex([-1.0, 0.0, -1.0], [0.0, 1.0, 0.0], [0.0, 1.0]);
    data.push_vertex([1.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 1.0]);
    data.push_vertex([1.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0]);
    data.push_vertex([-1.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0]);

    data.indices = vec![3, 2, 1, 3, 1, 0];
    data
}

/// Generate a unit box centered at the origin
///
/// Returns a box with vertices from -0.5 to 0.5 on all axes.
/// Each face has its own four vertices so normals stay flat and UVs span 0 to 1.
pub fn generate_box() -> GeometryData {
    let mut data = GeometryData::new();
    let face_uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    #[rustfmt::skip]
    let faces: [([[f32; 3]; 4], [f32; 3]); 6] = [
        // Front (+Z)
        ([[-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5]], [0.0, 0.0, 1.0]),
        // Back (-Z)
        ([[ 0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5]], [0.0, 0.0, -1.0]),
        // Left (-X)
        ([[-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5]], [-1.0, 0.0, 0.0]),
        // Right (+X)
        ([[ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5]], [1.0, 0.0, 0.0]),
        // Top (+Y)
        ([[-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5]], [0.0, 1.0, 0.0]),
        // Bottom (-Y)
        ([[-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5]], [0.0, -1.0, 0.0]),
    ];

    for (corners, normal) in faces.iter() {
        push_face(&mut data, corners, &face_uvs, *normal);
    }

    data
}

/// Generate a tapered cylinder standing on the origin
///
/// # Arguments
/// * `segments` - Number of circular segments (at least 3)
///
/// The base is a unit-radius disc at y = 0 and the top a disc of radius
/// [`TAPER_RATIO`] at y = 1. Side normals lean upward to follow the taper.
pub fn generate_tapered_cylinder(segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let bottom_radius = 1.0;
    let top_radius = TAPER_RATIO;
    let height = 1.0;
    let slope = (bottom_radius - top_radius) / height;

    // Side ring, duplicated at the seam so U runs 0 to 1
    let side_start = data.vertices.len() as u32;
    for i in 0..=segs {
        let u = i as f32 / segs as f32;
        let angle = u * 2.0 * PI;
        let (sin_a, cos_a) = angle.sin_cos();
        let normal: [f32; 3] = Vector3::new(cos_a, slope, sin_a).normalize().into();

        data.push_vertex([bottom_radius * cos_a, 0.0, bottom_radius * sin_a], normal, [u, 0.0]);
        data.push_vertex([top_radius * cos_a, height, top_radius * sin_a], normal, [u, 1.0]);
    }

    for i in 0..segs {
        let bottom = side_start + i * 2;
        let top = bottom + 1;
        let bottom_next = bottom + 2;
        let top_next = bottom + 3;

        data.indices.extend([bottom, top, bottom_next]);
        data.indices.extend([top, top_next, bottom_next]);
    }

    // Caps get their own vertices so their normals stay flat
    for (y, radius, normal) in [
        (0.0, bottom_radius, [0.0, -1.0, 0.0]),
        (height, top_radius, [0.0, 1.0, 0.0]),
    ] {
        let center = data.push_vertex([0.0, y, 0.0], normal, [0.5, 0.5]);
        for i in 0..segs {
            let angle = i as f32 * 2.0 * PI / segs as f32;
            let (sin_a, cos_a) = angle.sin_cos();
            data.push_vertex(
                [radius * cos_a, y, radius * sin_a],
                normal,
                [0.5 + 0.5 * cos_a, 0.5 + 0.5 * sin_a],
            );
        }

        for i in 0..segs {
            let current = center + 1 + i;
            let next = center + 1 + (i + 1) % segs;
            if normal[1] < 0.0 {
                data.indices.extend([center, current, next]);
            } else {
                data.indices.extend([center, next, current]);
            }
        }
    }

    data
}

/// Generate a triangular prism
///
/// The triangle lies in the XZ plane with corners (-0.5, -0.5), (0.5, -0.5) and
/// (0, 0.5), extruded along Y from -0.5 to 0.5. Rotating it 270 degrees about X
/// stands the triangle upright as a gable end.
pub fn generate_prism() -> GeometryData {
    let mut data = GeometryData::new();

    let corner_xz = [[-0.5, -0.5], [0.5, -0.5], [0.0, 0.5]];
    let end_uvs = [[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]];
    let side_uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    for y in [-0.5f32, 0.5] {
        let corners = corner_xz.map(|[x, z]| [x, y, z]);
        push_face(&mut data, &corners, &end_uvs, [0.0, y.signum(), 0.0]);
    }

    for i in 0..3 {
        let [x0, z0] = corner_xz[i];
        let [x1, z1] = corner_xz[(i + 1) % 3];
        // Outward normal of a counter-clockwise edge in XZ
        let (dx, dz) = (x1 - x0, z1 - z0);
        let outward = [-dz, 0.0, dx];
        let outward = if outward[0] * (x0 + x1) + outward[2] * (z0 + z1 + 1.0 / 3.0) >= 0.0 {
            outward
        } else {
            [dz, 0.0, -dx]
        };

        let corners = [
            [x0, -0.5, z0],
            [x1, -0.5, z1],
            [x1, 0.5, z1],
            [x0, 0.5, z0],
        ];
        push_face(&mut data, &corners, &side_uvs, outward);
    }

    data
}

/// Generate a three-sided pyramid
///
/// The triangular base sits at y = -0.5 and the apex at (0, 0.5, 0).
pub fn generate_pyramid3() -> GeometryData {
    let mut data = GeometryData::new();

    let base = [[-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.0, -0.5, -0.5]];
    let apex = [0.0, 0.5, 0.0];
    let centroid = Vector3::new(0.0, -0.25, 0.125);

    push_face(
        &mut data,
        &base,
        &[[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]],
        [0.0, -1.0, 0.0],
    );

    for i in 0..3 {
        let a = Vector3::from(base[i]);
        let b = Vector3::from(base[(i + 1) % 3]);
        let c = Vector3::from(apex);
        let mut normal = (b - a).cross(c - a).normalize();
        if normal.dot((a + b + c) / 3.0 - centroid) < 0.0 {
            normal = -normal;
        }
        push_face(
            &mut data,
            &[base[i], base[(i + 1) % 3], apex],
            &[[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]],
            normal.into(),
        );
    }

    data
}
