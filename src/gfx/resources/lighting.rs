//! Static light sources and the global uniform block
//!
//! The scene is lit by four fixed point lights. Light data and camera matrices are
//! shared by every draw and live in one uniform buffer bound to group 0.

use crate::{
    gfx::{
        camera::camera_utils::CameraUniform,
        shader::{light_uniform_name, LightField, ShaderUniforms, USE_LIGHTING_NAME},
    },
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// Number of light slots declared by the shader
pub const MAX_LIGHTS: usize = 4;

/// A point light with Phong colour terms
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightSource {
    pub position: [f32; 3],
    pub ambient_color: [f32; 3],
    pub diffuse_color: [f32; 3],
    pub specular_color: [f32; 3],
    /// Specular exponent contributed by the light
    pub focal_strength: f32,
    pub specular_intensity: f32,
}

impl LightSource {
    /// A warm white light at `position` with the scene's colour terms
    pub const fn warm(position: [f32; 3], focal_strength: f32) -> Self {
        Self {
            position,
            ambient_color: [0.8, 0.8, 0.7],
            diffuse_color: [1.0, 0.95, 0.85],
            specular_color: [1.0, 1.0, 1.0],
            focal_strength,
            specular_intensity: 0.7,
        }
    }

    /// Uploads every field of this light into `lightSources[index]`
    pub fn upload(&self, index: usize, shader: &mut impl ShaderUniforms) {
        shader.set_vec3_value(&light_uniform_name(index, "position"), self.position);
        shader.set_vec3_value(&light_uniform_name(index, "ambientColor"), self.ambient_color);
        shader.set_vec3_value(&light_uniform_name(index, "diffuseColor"), self.diffuse_color);
        shader.set_vec3_value(&light_uniform_name(index, "specularColor"), self.specular_color);
        shader.set_float_value(&light_uniform_name(index, "focalStrength"), self.focal_strength);
        shader.set_float_value(
            &light_uniform_name(index, "specularIntensity"),
            self.specular_intensity,
        );
    }
}

/// The four lights placed around the house
///
/// The camera sits at (0, 5, 12); none of these positions are blocked by it.
pub fn scene_lights() -> [LightSource; MAX_LIGHTS] {
    [
        LightSource::warm([-7.0, 7.0, 10.0], 32.0),
        LightSource::warm([7.0, -6.0, 1.0], 32.0),
        LightSource::warm([7.0, 7.0, 5.0], 16.0),
        LightSource::warm([-7.0, -6.0, 1.0], 32.0),
    ]
}

/// Enables lighting and uploads `lights` into consecutive light slots
pub fn upload_lights(shader: &mut impl ShaderUniforms, lights: &[LightSource]) {
    shader.set_bool_value(USE_LIGHTING_NAME, true);
    for (index, light) in lights.iter().take(MAX_LIGHTS).enumerate() {
        light.upload(index, shader);
    }
}

/// GPU layout of one light. MUST match `Light` in phong.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
    pub ambient_color: [f32; 4],
    pub diffuse_color: [f32; 4],
    pub specular_color: [f32; 4],
    /// x = focal strength, y = specular intensity, z = 1.0 when the slot is in use
    pub params: [f32; 4],
}

impl LightUniform {
    pub fn set_field(&mut self, field: LightField, value: &crate::gfx::shader::UniformValue) {
        let vec3 = |v: [f32; 3]| [v[0], v[1], v[2], 0.0];
        match field {
            LightField::Position => {
                if let Some(v) = value.as_vec3() {
                    self.position = [v[0], v[1], v[2], 1.0];
                }
            }
            LightField::AmbientColor => {
                if let Some(v) = value.as_vec3() {
                    self.ambient_color = vec3(v);
                }
            }
            LightField::DiffuseColor => {
                if let Some(v) = value.as_vec3() {
                    self.diffuse_color = vec3(v);
                }
            }
            LightField::SpecularColor => {
                if let Some(v) = value.as_vec3() {
                    self.specular_color = vec3(v);
                }
            }
            LightField::FocalStrength => {
                if let Some(f) = value.as_float() {
                    self.params[0] = f;
                }
            }
            LightField::SpecularIntensity => {
                if let Some(f) = value.as_float() {
                    self.params[1] = f;
                }
            }
        }
        self.params[2] = 1.0;
    }

    pub fn is_enabled(&self) -> bool {
        self.params[2] > 0.0
    }
}

/// Global uniform buffer content. MUST match `Globals` in phong.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    pub lights: [LightUniform; MAX_LIGHTS],
    /// x = lighting enabled (0/1)
    pub flags: [u32; 4],
}

impl Default for GlobalUniform {
    fn default() -> Self {
        let camera = CameraUniform::default();
        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            lights: [LightUniform::default(); MAX_LIGHTS],
            flags: [0; 4],
        }
    }
}

impl GlobalUniform {
    pub fn set_camera(&mut self, camera: CameraUniform) {
        self.view_position = camera.view_position;
        self.view_proj = camera.view_proj;
    }

    pub fn set_lighting_enabled(&mut self, enabled: bool) {
        self.flags[0] = enabled as u32;
    }

    pub fn lighting_enabled(&self) -> bool {
        self.flags[0] != 0
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Bind group layout and bind group for [`GlobalUniform`], bound to slot 0
pub struct GlobalBindings {
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: binding_types::uniform(),
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        Self {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::shader::UniformValue;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(String, UniformValue)>,
    }

    impl ShaderUniforms for Recorder {
        fn set_uniform(&mut self, name: &str, value: UniformValue) {
            self.calls.push((name.to_string(), value));
        }
    }

    #[test]
    fn scene_has_four_lights_with_one_soft_highlight() {
        let lights = scene_lights();
        assert_eq!(lights.len(), MAX_LIGHTS);
        assert_eq!(lights[0].position, [-7.0, 7.0, 10.0]);
        assert_eq!(lights[3].position, [-7.0, -6.0, 1.0]);

        let focal: Vec<f32> = lights.iter().map(|l| l.focal_strength).collect();
        assert_eq!(focal, vec![32.0, 32.0, 16.0, 32.0]);
        assert!(lights.iter().all(|l| l.specular_intensity == 0.7));
        assert!(lights.iter().all(|l| l.diffuse_color == [1.0, 0.95, 0.85]));
    }

    #[test]
    fn upload_enables_lighting_then_writes_every_field() {
        let mut recorder = Recorder::default();
        upload_lights(&mut recorder, &scene_lights());

        assert_eq!(recorder.calls.len(), 1 + MAX_LIGHTS * 6);
        assert_eq!(
            recorder.calls[0],
            ("bUseLighting".to_string(), UniformValue::Bool(true))
        );
        assert_eq!(
            recorder.calls[1],
            (
                "lightSources[0].position".to_string(),
                UniformValue::Vec3([-7.0, 7.0, 10.0])
            )
        );
        assert!(recorder
            .calls
            .contains(&("lightSources[2].focalStrength".to_string(), UniformValue::Float(16.0))));
    }

    #[test]
    fn light_uniform_marks_slot_enabled_on_write() {
        let mut light = LightUniform::default();
        assert!(!light.is_enabled());

        light.set_field(LightField::Position, &UniformValue::Vec3([1.0, 2.0, 3.0]));
        assert!(light.is_enabled());
        assert_eq!(light.position, [1.0, 2.0, 3.0, 1.0]);

        light.set_field(LightField::FocalStrength, &UniformValue::Float(16.0));
        assert_eq!(light.params[0], 16.0);
    }

    #[test]
    fn global_uniform_size_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 80);
        assert_eq!(std::mem::size_of::<GlobalUniform>() % 16, 0);
    }
}
