//! Model matrix composition
//!
//! Every drawn mesh is placed with a scale, three Euler angles in degrees and a
//! position. The composed matrix is `T * Rz * Ry * Rx * S`, so scaling happens
//! first, then rotation about X, Y and Z in that order, then translation.

use cgmath::{Deg, Matrix, Matrix4, SquareMatrix, Vector3};

/// Builds a model matrix from scale, XYZ rotation in degrees and position
pub fn compose_model_matrix(
    scale: Vector3<f32>,
    x_rotation_degrees: f32,
    y_rotation_degrees: f32,
    z_rotation_degrees: f32,
    position: Vector3<f32>,
) -> Matrix4<f32> {
    let scale = Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z);
    let rotation_x = Matrix4::from_angle_x(Deg(x_rotation_degrees));
    let rotation_y = Matrix4::from_angle_y(Deg(y_rotation_degrees));
    let rotation_z = Matrix4::from_angle_z(Deg(z_rotation_degrees));
    let translation = Matrix4::from_translation(position);

    translation * rotation_z * rotation_y * rotation_x * scale
}

/// Inverse-transpose of the model matrix, for transforming normals
///
/// Returns the identity for singular matrices (a zero scale axis).
pub fn normal_matrix(model: Matrix4<f32>) -> Matrix4<f32> {
    model
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or_else(Matrix4::identity)
}

/// Scale, rotation and position of one placed mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: [f32; 3],
    /// Rotation about X, Y and Z in degrees
    pub rotation_degrees: [f32; 3],
    pub position: [f32; 3],
}

impl Placement {
    pub const fn new(scale: [f32; 3], rotation_degrees: [f32; 3], position: [f32; 3]) -> Self {
        Self {
            scale,
            rotation_degrees,
            position,
        }
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        compose_model_matrix(
            self.scale.into(),
            self.rotation_degrees[0],
            self.rotation_degrees[1],
            self.rotation_degrees[2],
            self.position.into(),
        )
    }
}
