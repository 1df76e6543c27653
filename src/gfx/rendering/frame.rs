//! CPU-side shader state and recorded draws
//!
//! [`FrameRecorder`] is the wgpu backend's implementation of [`ShaderUniforms`] and
//! [`ShapeMeshes`]. Uniform writes update a mirror of the shader's uniform blocks;
//! every draw snapshots the per-object block into a [`DrawCommand`]. The render
//! engine later uploads the snapshots and replays the draws in order.

use cgmath::Matrix4;

use crate::gfx::{
    geometry::{MeshKind, ShapeMeshes},
    resources::{
        lighting::GlobalUniform,
        material::MaterialUniform,
    },
    shader::{MaterialField, ShaderUniforms, UniformTarget, UniformValue},
    transform::normal_matrix,
};

/// Per-draw uniform block. MUST match `Object` in phong.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub uv_scale: [f32; 2],
    pub use_texture: u32,
    pub texture_slot: i32,
    pub material: MaterialUniform,
}

impl Default for ObjectUniform {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::from_scale(1.0f32).into();
        Self {
            model: identity,
            normal: identity,
            color: [1.0, 1.0, 1.0, 1.0],
            uv_scale: [1.0, 1.0],
            use_texture: 0,
            texture_slot: 0,
            material: MaterialUniform::default(),
        }
    }
}

impl ObjectUniform {
    pub fn uses_texture(&self) -> bool {
        self.use_texture != 0
    }

    fn set_material_field(&mut self, field: MaterialField, value: &UniformValue) {
        let material = &mut self.material;
        match field {
            MaterialField::AmbientColor => {
                if let Some([r, g, b]) = value.as_vec3() {
                    material.ambient = [r, g, b, material.ambient[3]];
                }
            }
            MaterialField::AmbientStrength => {
                if let Some(strength) = value.as_float() {
                    material.ambient[3] = strength;
                }
            }
            MaterialField::DiffuseColor => {
                if let Some([r, g, b]) = value.as_vec3() {
                    material.diffuse = [r, g, b, material.diffuse[3]];
                }
            }
            MaterialField::SpecularColor => {
                if let Some([r, g, b]) = value.as_vec3() {
                    material.specular = [r, g, b, 0.0];
                }
            }
            MaterialField::Shininess => {
                if let Some(shininess) = value.as_float() {
                    material.diffuse[3] = shininess;
                }
            }
        }
    }
}

/// One recorded draw
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshKind,
    pub object: ObjectUniform,
}

impl DrawCommand {
    /// Texture slot to bind, if the draw samples a texture
    pub fn texture_slot(&self) -> Option<usize> {
        if self.object.uses_texture() && self.object.texture_slot >= 0 {
            Some(self.object.texture_slot as usize)
        } else {
            None
        }
    }
}

/// Records shader state and draws for one frame
#[derive(Debug, Default)]
pub struct FrameRecorder {
    object: ObjectUniform,
    globals: GlobalUniform,
    loaded_meshes: Vec<MeshKind>,
    pending_uploads: Vec<MeshKind>,
    draws: Vec<DrawCommand>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the recorded draws; uniform state carries over like a bound shader's
    pub fn begin_frame(&mut self) {
        self.draws.clear();
    }

    pub fn draws(&self) -> &[DrawCommand] {
        &self.draws
    }

    pub fn globals(&self) -> &GlobalUniform {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut GlobalUniform {
        &mut self.globals
    }

    /// Current per-object state, as the next draw would snapshot it
    pub fn object(&self) -> &ObjectUniform {
        &self.object
    }

    pub fn is_loaded(&self, kind: MeshKind) -> bool {
        self.loaded_meshes.contains(&kind)
    }

    /// Meshes loaded since the last call, which still need GPU buffers
    pub fn take_pending_uploads(&mut self) -> Vec<MeshKind> {
        std::mem::take(&mut self.pending_uploads)
    }
}

impl ShaderUniforms for FrameRecorder {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        let Some(target) = UniformTarget::parse(name) else {
            log::debug!("Ignoring unknown uniform '{}'", name);
            return;
        };

        match (target, value) {
            (UniformTarget::Model, UniformValue::Mat4(model)) => {
                self.object.model = model;
                self.object.normal = normal_matrix(Matrix4::from(model)).into();
            }
            (UniformTarget::ObjectColor, UniformValue::Vec4(color)) => {
                self.object.color = color;
            }
            (
                UniformTarget::ObjectTexture,
                UniformValue::Sampler2D(slot) | UniformValue::Int(slot),
            ) => {
                self.object.texture_slot = slot;
            }
            (UniformTarget::UseTexture, value) => {
                if let Some(flag) = value.as_flag() {
                    self.object.use_texture = flag as u32;
                }
            }
            (UniformTarget::UseLighting, value) => {
                if let Some(flag) = value.as_flag() {
                    self.globals.set_lighting_enabled(flag);
                }
            }
            (UniformTarget::UvScale, UniformValue::Vec2(scale)) => {
                self.object.uv_scale = scale;
            }
            (UniformTarget::Material(field), value) => {
                self.object.set_material_field(field, &value);
            }
            (UniformTarget::Light(index, field), value) => {
                self.globals.lights[index].set_field(field, &value);
            }
            (target, value) => {
                log::warn!("Uniform '{}' ({:?}) cannot take {:?}", name, target, value);
            }
        }
    }
}

impl ShapeMeshes for FrameRecorder {
    fn load_mesh(&mut self, kind: MeshKind) {
        if !self.is_loaded(kind) {
            self.loaded_meshes.push(kind);
            self.pending_uploads.push(kind);
        }
    }

    fn draw_mesh(&mut self, kind: MeshKind) {
        if !self.is_loaded(kind) {
            log::warn!("Drawing {} mesh before it was loaded, skipped", kind.name());
            return;
        }
        self.draws.push(DrawCommand {
            mesh: kind,
            object: self.object,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::lighting::{scene_lights, upload_lights};
    use crate::gfx::resources::material::ObjectMaterial;

    #[test]
    fn object_uniform_matches_wgsl_layout() {
        // mat4 + mat4 + vec4 + vec2/u32/i32 + 3 * vec4
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 208);
        assert_eq!(std::mem::offset_of!(ObjectUniform, material), 160);
    }

    #[test]
    fn draws_snapshot_state_at_call_time() {
        let mut frame = FrameRecorder::new();
        frame.load_box_mesh();
        frame.load_plane_mesh();

        frame.set_vec4_value("objectColor", [1.0, 0.0, 0.0, 1.0]);
        frame.draw_box_mesh();
        frame.set_vec4_value("objectColor", [0.0, 0.0, 1.0, 1.0]);
        frame.draw_plane_mesh();

        let draws = frame.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].mesh, MeshKind::Box);
        assert_eq!(draws[0].object.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(draws[1].object.color, [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn unloaded_meshes_are_not_drawn() {
        let mut frame = FrameRecorder::new();
        frame.draw_prism_mesh();
        assert!(frame.draws().is_empty());
    }

    #[test]
    fn pending_uploads_are_reported_once() {
        let mut frame = FrameRecorder::new();
        frame.load_box_mesh();
        frame.load_box_mesh();
        frame.load_prism_mesh();

        assert_eq!(frame.take_pending_uploads(), vec![MeshKind::Box, MeshKind::Prism]);
        assert!(frame.take_pending_uploads().is_empty());
        assert!(frame.is_loaded(MeshKind::Prism));
    }

    #[test]
    fn texture_slot_only_when_texturing() {
        let mut frame = FrameRecorder::new();
        frame.load_plane_mesh();

        frame.set_bool_value("bUseTexture", true);
        frame.set_sampler2d_value("objectTexture", 3);
        frame.draw_plane_mesh();
        frame.set_bool_value("bUseTexture", false);
        frame.draw_plane_mesh();

        assert_eq!(frame.draws()[0].texture_slot(), Some(3));
        assert_eq!(frame.draws()[1].texture_slot(), None);
    }

    #[test]
    fn material_fields_pack_into_uniform() {
        let mut frame = FrameRecorder::new();
        ObjectMaterial::metal().upload(&mut frame);

        let material = frame.object().material;
        assert_eq!(material, MaterialUniform::from(&ObjectMaterial::metal()));
    }

    #[test]
    fn model_write_updates_normal_matrix() {
        let mut frame = FrameRecorder::new();
        frame.set_mat4_value("model", Matrix4::from_nonuniform_scale(2.0, 4.0, 1.0));

        let normal = frame.object().normal;
        assert_eq!(normal[0][0], 0.5);
        assert_eq!(normal[1][1], 0.25);
        assert_eq!(normal[2][2], 1.0);
    }

    #[test]
    fn lights_land_in_globals() {
        let mut frame = FrameRecorder::new();
        upload_lights(&mut frame, &scene_lights());

        let globals = frame.globals();
        assert!(globals.lighting_enabled());
        assert!(globals.lights.iter().all(|light| light.is_enabled()));
        assert_eq!(globals.lights[2].params[0], 16.0);
        assert_eq!(globals.lights[1].position, [7.0, -6.0, 1.0, 1.0]);
    }

    #[test]
    fn mismatched_value_types_are_ignored() {
        let mut frame = FrameRecorder::new();
        frame.set_float_value("objectColor", 0.5);
        frame.set_vec3_value("notAUniform", [0.0; 3]);
        assert_eq!(frame.object(), &ObjectUniform::default());
    }
}
