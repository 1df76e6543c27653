//! Material presets
//!
//! Materials are plain Phong parameter sets identified by a tag. The scene only
//! defines two of them, so storage is an ordered `Vec` searched linearly.

use crate::gfx::shader::ShaderUniforms;

/// Phong material parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMaterial {
    pub tag: String,
    pub ambient_color: [f32; 3],
    pub ambient_strength: f32,
    pub diffuse_color: [f32; 3],
    pub specular_color: [f32; 3],
    pub shininess: f32,
}

impl ObjectMaterial {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ambient_color: [0.1, 0.1, 0.1],
            ambient_strength: 0.1,
            diffuse_color: [0.3, 0.3, 0.3],
            specular_color: [0.1, 0.1, 0.1],
            shininess: 16.0,
        }
    }

    /// Builder pattern: Set ambient colour and strength
    pub fn with_ambient(mut self, r: f32, g: f32, b: f32, strength: f32) -> Self {
        self.ambient_color = [r, g, b];
        self.ambient_strength = strength;
        self
    }

    /// Builder pattern: Set diffuse colour
    pub fn with_diffuse(mut self, r: f32, g: f32, b: f32) -> Self {
        self.diffuse_color = [r, g, b];
        self
    }

    /// Builder pattern: Set specular colour
    pub fn with_specular(mut self, r: f32, g: f32, b: f32) -> Self {
        self.specular_color = [r, g, b];
        self
    }

    /// Builder pattern: Set specular exponent
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess.max(0.0);
        self
    }

    /// Shiny grey preset used for the ground, backdrop and windows
    pub fn metal() -> Self {
        Self::new("metal")
            .with_ambient(0.3, 0.1, 0.1, 0.1)
            .with_diffuse(0.3, 0.3, 0.3)
            .with_specular(0.5, 0.5, 0.5)
            .with_shininess(64.0)
    }

    /// Dull preset used for walls, columns and roofs
    pub fn wood() -> Self {
        Self::new("wood")
            .with_ambient(0.1, 0.1, 0.1, 0.1)
            .with_diffuse(0.3, 0.3, 0.3)
            .with_specular(0.1, 0.1, 0.1)
            .with_shininess(16.0)
    }

    /// Passes the material values into the `material` uniform struct
    pub fn upload(&self, shader: &mut impl ShaderUniforms) {
        shader.set_vec3_value("material.diffuseColor", self.diffuse_color);
        shader.set_vec3_value("material.specularColor", self.specular_color);
        shader.set_float_value("material.shininess", self.shininess);
        shader.set_vec3_value("material.ambientColor", self.ambient_color);
        shader.set_float_value("material.ambientStrength", self.ambient_strength);
    }
}

/// Ordered list of materials looked up by tag
#[derive(Debug, Default, Clone)]
pub struct MaterialLibrary {
    materials: Vec<ObjectMaterial>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a material; an earlier material with the same tag keeps precedence
    pub fn add_material(&mut self, material: ObjectMaterial) {
        if self.find_material(&material.tag).is_some() {
            log::warn!(
                "Material '{}' already defined, the first definition wins",
                material.tag
            );
        }
        self.materials.push(material);
    }

    pub fn find_material(&self, tag: &str) -> Option<&ObjectMaterial> {
        self.materials.iter().find(|material| material.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectMaterial> {
        self.materials.iter()
    }
}

/// GPU layout of the material block. MUST match `Material` in phong.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// rgb = ambient colour, w = ambient strength
    pub ambient: [f32; 4],
    /// rgb = diffuse colour, w = shininess
    pub diffuse: [f32; 4],
    /// rgb = specular colour
    pub specular: [f32; 4],
}

impl Default for MaterialUniform {
    fn default() -> Self {
        Self::from(&ObjectMaterial::new("default"))
    }
}

impl From<&ObjectMaterial> for MaterialUniform {
    fn from(material: &ObjectMaterial) -> Self {
        let [ar, ag, ab] = material.ambient_color;
        let [dr, dg, db] = material.diffuse_color;
        let [sr, sg, sb] = material.specular_color;
        Self {
            ambient: [ar, ag, ab, material.ambient_strength],
            diffuse: [dr, dg, db, material.shininess],
            specular: [sr, sg, sb, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_carry_expected_values() {
        let metal = ObjectMaterial::metal();
        assert_eq!(metal.ambient_color, [0.3, 0.1, 0.1]);
        assert_eq!(metal.specular_color, [0.5, 0.5, 0.5]);
        assert_eq!(metal.shininess, 64.0);

        let wood = ObjectMaterial::wood();
        assert_eq!(wood.ambient_strength, 0.1);
        assert_eq!(wood.specular_color, [0.1, 0.1, 0.1]);
        assert_eq!(wood.shininess, 16.0);
    }

    #[test]
    fn lookup_is_by_exact_tag() {
        let mut library = MaterialLibrary::new();
        library.add_material(ObjectMaterial::metal());
        library.add_material(ObjectMaterial::wood());

        assert_eq!(library.find_material("wood").map(|m| m.shininess), Some(16.0));
        assert!(library.find_material("Wood").is_none());
        assert!(library.find_material("glass").is_none());
    }

    #[test]
    fn empty_library_finds_nothing() {
        let library = MaterialLibrary::new();
        assert!(library.is_empty());
        assert!(library.find_material("metal").is_none());
    }

    #[test]
    fn first_definition_wins_on_duplicate_tag() {
        let mut library = MaterialLibrary::new();
        library.add_material(ObjectMaterial::new("stone").with_shininess(8.0));
        library.add_material(ObjectMaterial::new("stone").with_shininess(99.0));

        assert_eq!(library.len(), 2);
        assert_eq!(library.find_material("stone").map(|m| m.shininess), Some(8.0));
    }

    #[test]
    fn uniform_packs_strength_and_shininess_into_w() {
        let uniform = MaterialUniform::from(&ObjectMaterial::metal());
        assert_eq!(uniform.ambient, [0.3, 0.1, 0.1, 0.1]);
        assert_eq!(uniform.diffuse, [0.3, 0.3, 0.3, 64.0]);
    }
}
