//! Name-addressed shader uniform interface
//!
//! Scene code talks to the shader through [`ShaderUniforms`], setting values by
//! uniform name (`"model"`, `"objectColor"`, `"lightSources[2].focalStrength"` ...).
//! The wgpu backend resolves names through [`UniformTarget::parse`] into fields of
//! its uniform blocks; tests substitute a recorder.

use cgmath::Matrix4;

use crate::gfx::resources::lighting::MAX_LIGHTS;

pub const MODEL_NAME: &str = "model";
pub const COLOR_VALUE_NAME: &str = "objectColor";
pub const TEXTURE_VALUE_NAME: &str = "objectTexture";
pub const USE_TEXTURE_NAME: &str = "bUseTexture";
pub const USE_LIGHTING_NAME: &str = "bUseLighting";
pub const UV_SCALE_NAME: &str = "UVscale";

/// A value destined for a named uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([[f32; 4]; 4]),
    /// Texture slot index
    Sampler2D(i32),
}

impl UniformValue {
    /// Interprets the value as a boolean flag the way GLSL `int`/`bool` uniforms do
    pub fn as_flag(&self) -> Option<bool> {
        match *self {
            UniformValue::Bool(b) => Some(b),
            UniformValue::Int(i) => Some(i != 0),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match *self {
            UniformValue::Float(f) => Some(f),
            UniformValue::Int(i) => Some(i as f32),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<[f32; 3]> {
        match *self {
            UniformValue::Vec3(v) => Some(v),
            _ => None,
        }
    }
}

/// Setter interface for named shader uniforms
pub trait ShaderUniforms {
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    fn set_bool_value(&mut self, name: &str, value: bool) {
        self.set_uniform(name, UniformValue::Bool(value));
    }

    fn set_int_value(&mut self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    fn set_float_value(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    fn set_vec2_value(&mut self, name: &str, value: [f32; 2]) {
        self.set_uniform(name, UniformValue::Vec2(value));
    }

    fn set_vec3_value(&mut self, name: &str, value: [f32; 3]) {
        self.set_uniform(name, UniformValue::Vec3(value));
    }

    fn set_vec4_value(&mut self, name: &str, value: [f32; 4]) {
        self.set_uniform(name, UniformValue::Vec4(value));
    }

    fn set_mat4_value(&mut self, name: &str, value: Matrix4<f32>) {
        self.set_uniform(name, UniformValue::Mat4(value.into()));
    }

    fn set_sampler2d_value(&mut self, name: &str, slot: i32) {
        self.set_uniform(name, UniformValue::Sampler2D(slot));
    }
}

/// Fields of the `material` uniform struct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialField {
    AmbientColor,
    AmbientStrength,
    DiffuseColor,
    SpecularColor,
    Shininess,
}

/// Fields of one `lightSources[i]` uniform struct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightField {
    Position,
    AmbientColor,
    DiffuseColor,
    SpecularColor,
    FocalStrength,
    SpecularIntensity,
}

/// Where a named uniform lives in the shader interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformTarget {
    Model,
    ObjectColor,
    ObjectTexture,
    UseTexture,
    UseLighting,
    UvScale,
    Material(MaterialField),
    Light(usize, LightField),
}

impl UniformTarget {
    /// Resolves a uniform name, returning `None` for names the shader does not declare
    pub fn parse(name: &str) -> Option<Self> {
        let target = match name {
            MODEL_NAME => Self::Model,
            COLOR_VALUE_NAME => Self::ObjectColor,
            TEXTURE_VALUE_NAME => Self::ObjectTexture,
            USE_TEXTURE_NAME => Self::UseTexture,
            USE_LIGHTING_NAME => Self::UseLighting,
            UV_SCALE_NAME => Self::UvScale,
            _ => {
                if let Some(field) = name.strip_prefix("material.") {
                    return Self::parse_material_field(field).map(Self::Material);
                }
                return Self::parse_light(name);
            }
        };
        Some(target)
    }

    fn parse_material_field(field: &str) -> Option<MaterialField> {
        match field {
            "ambientColor" => Some(MaterialField::AmbientColor),
            "ambientStrength" => Some(MaterialField::AmbientStrength),
            "diffuseColor" => Some(MaterialField::DiffuseColor),
            "specularColor" => Some(MaterialField::SpecularColor),
            "shininess" => Some(MaterialField::Shininess),
            _ => None,
        }
    }

    fn parse_light(name: &str) -> Option<Self> {
        let rest = name.strip_prefix("lightSources[")?;
        let (index, field) = rest.split_once("].")?;
        let index: usize = index.parse().ok()?;
        if index >= MAX_LIGHTS {
            return None;
        }

        let field = match field {
            "position" => LightField::Position,
            "ambientColor" => LightField::AmbientColor,
            "diffuseColor" => LightField::DiffuseColor,
            "specularColor" => LightField::SpecularColor,
            "focalStrength" => LightField::FocalStrength,
            "specularIntensity" => LightField::SpecularIntensity,
            _ => return None,
        };
        Some(Self::Light(index, field))
    }
}

/// Builds the `lightSources[i].field` uniform name
pub fn light_uniform_name(index: usize, field: &str) -> String {
    format!("lightSources[{}].{}", index, field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_uniforms() {
        assert_eq!(UniformTarget::parse("model"), Some(UniformTarget::Model));
        assert_eq!(UniformTarget::parse("objectColor"), Some(UniformTarget::ObjectColor));
        assert_eq!(UniformTarget::parse("UVscale"), Some(UniformTarget::UvScale));
        assert_eq!(UniformTarget::parse("bUseLighting"), Some(UniformTarget::UseLighting));
    }

    #[test]
    fn parses_material_fields() {
        assert_eq!(
            UniformTarget::parse("material.shininess"),
            Some(UniformTarget::Material(MaterialField::Shininess))
        );
        assert_eq!(UniformTarget::parse("material.roughness"), None);
    }

    #[test]
    fn parses_light_fields_within_bounds() {
        assert_eq!(
            UniformTarget::parse(&light_uniform_name(3, "focalStrength")),
            Some(UniformTarget::Light(3, LightField::FocalStrength))
        );
        assert_eq!(UniformTarget::parse("lightSources[4].position"), None);
        assert_eq!(UniformTarget::parse("lightSources[x].position"), None);
        assert_eq!(UniformTarget::parse("lightSources[0]position"), None);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(UniformTarget::parse("view"), None);
        assert_eq!(UniformTarget::parse(""), None);
    }

    #[test]
    fn flags_accept_ints_and_bools() {
        assert_eq!(UniformValue::Int(0).as_flag(), Some(false));
        assert_eq!(UniformValue::Bool(true).as_flag(), Some(true));
        assert_eq!(UniformValue::Float(1.0).as_flag(), None);
    }
}
