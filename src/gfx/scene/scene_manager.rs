//! Scene preparation and per-frame scene script
//!
//! [`SceneManager`] owns the texture registry, the material library and the light
//! setup. It talks to the shader through [`ShaderUniforms`] and to meshes through
//! [`ShapeMeshes`], so the whole scene can be replayed against any backend.

use std::path::Path;

use cgmath::Vector3;

use crate::{
    error::Result,
    gfx::{
        geometry::{MeshKind, ShapeMeshes},
        resources::{
            lighting::{scene_lights, upload_lights, LightSource, MAX_LIGHTS},
            material::{MaterialLibrary, ObjectMaterial},
            texture_registry::{TextureLoader, TextureRegistry},
        },
        shader::{
            ShaderUniforms, COLOR_VALUE_NAME, MODEL_NAME, TEXTURE_VALUE_NAME, USE_TEXTURE_NAME,
            UV_SCALE_NAME,
        },
        transform::compose_model_matrix,
    },
};

use super::house::{ScenePiece, HOUSE_SCENE};

/// Texture files loaded by [`SceneManager::prepare_scene`], as (file name, tag)
pub const SCENE_TEXTURES: [(&str, &str); 12] = [
    ("Brick.jpg", "brick"),
    ("Wood Test.jpg", "wood"),
    ("Wall.jpg", "wall"),
    ("Grass.jpg", "grass"),
    ("PatternCement.jpeg", "cement"),
    ("LightTan.jpg", "beam"),
    ("door.jpg", "door"),
    ("outergreen.jpg", "outergreen"),
    ("concrete.jpeg", "concrete"),
    ("roof.jpg", "roof"),
    ("glass.jpg", "window"),
    ("garagedoor.jpg", "garage"),
];

/// Outcome of [`SceneManager::prepare_scene`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedScene {
    pub meshes_loaded: usize,
    pub textures_loaded: usize,
    /// Tags whose image could not be loaded
    pub missing_textures: Vec<String>,
}

pub struct SceneManager<H> {
    textures: TextureRegistry<H>,
    materials: MaterialLibrary,
    lights: [LightSource; MAX_LIGHTS],
}

impl<H> Default for SceneManager<H> {
    fn default() -> Self {
        Self {
            textures: TextureRegistry::new(),
            materials: MaterialLibrary::new(),
            lights: scene_lights(),
        }
    }
}

impl<H> SceneManager<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an image from `path` into a texture tagged `tag`
    ///
    /// Returns the texture slot. Fails when the image cannot be decoded, has an
    /// unsupported channel count, or all slots are taken.
    pub fn create_texture<L>(
        &mut self,
        loader: &mut L,
        path: impl AsRef<Path>,
        tag: &str,
    ) -> Result<usize>
    where
        L: TextureLoader<Handle = H>,
    {
        self.textures.load(loader, path, tag)
    }

    /// Visits every loaded texture with the slot it is bound to
    pub fn bind_textures<F>(&self, bind: F)
    where
        F: FnMut(usize, &H),
    {
        self.textures.bind_textures(bind);
    }

    /// Releases every loaded texture
    pub fn destroy_textures<L>(&mut self, loader: &mut L)
    where
        L: TextureLoader<Handle = H>,
    {
        let count = self.textures.len();
        self.textures.destroy_textures(|handle| loader.release_texture(handle));
        log::debug!("Released {} textures", count);
    }

    /// Texture handle registered under `tag`
    pub fn find_texture_id(&self, tag: &str) -> Option<&H> {
        self.textures.find_texture(tag)
    }

    /// Slot of the texture registered under `tag`
    pub fn find_texture_slot(&self, tag: &str) -> Option<usize> {
        self.textures.find_texture_slot(tag)
    }

    pub fn find_material(&self, tag: &str) -> Option<&ObjectMaterial> {
        self.materials.find_material(tag)
    }

    pub fn textures(&self) -> &TextureRegistry<H> {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    pub fn lights(&self) -> &[LightSource; MAX_LIGHTS] {
        &self.lights
    }

    /// Composes the model matrix and uploads it to `model`
    pub fn set_transformations(
        &self,
        shader: &mut impl ShaderUniforms,
        scale: [f32; 3],
        x_rotation_degrees: f32,
        y_rotation_degrees: f32,
        z_rotation_degrees: f32,
        position: [f32; 3],
    ) {
        let model = compose_model_matrix(
            Vector3::from(scale),
            x_rotation_degrees,
            y_rotation_degrees,
            z_rotation_degrees,
            Vector3::from(position),
        );
        shader.set_mat4_value(MODEL_NAME, model);
    }

    /// Switches to a flat colour
    pub fn set_shader_color(
        &self,
        shader: &mut impl ShaderUniforms,
        r: f32,
        g: f32,
        b: f32,
        a: f32,
    ) {
        shader.set_bool_value(USE_TEXTURE_NAME, false);
        shader.set_vec4_value(COLOR_VALUE_NAME, [r, g, b, a]);
    }

    /// Switches to the texture tagged `tag`
    ///
    /// An unknown tag leaves texturing off, so the last colour set is used instead.
    /// Runs every frame; missing textures are reported once by `prepare_scene`.
    pub fn set_shader_texture(&self, shader: &mut impl ShaderUniforms, tag: &str) {
        match self.find_texture_slot(tag) {
            Some(slot) => {
                shader.set_bool_value(USE_TEXTURE_NAME, true);
                shader.set_sampler2d_value(TEXTURE_VALUE_NAME, slot as i32);
            }
            None => {
                log::debug!("Texture '{}' is not loaded, drawing with colour", tag);
                shader.set_bool_value(USE_TEXTURE_NAME, false);
            }
        }
    }

    pub fn set_texture_uv_scale(&self, shader: &mut impl ShaderUniforms, u: f32, v: f32) {
        shader.set_vec2_value(UV_SCALE_NAME, [u, v]);
    }

    /// Uploads the material tagged `tag`; unknown tags upload nothing
    pub fn set_shader_material(&self, shader: &mut impl ShaderUniforms, tag: &str) {
        match self.find_material(tag) {
            Some(material) => material.upload(shader),
            None => log::debug!("Material '{}' is not defined", tag),
        }
    }

    /// Registers the `metal` and `wood` presets, replacing any earlier definitions
    pub fn define_object_materials(&mut self) {
        self.materials = MaterialLibrary::new();
        self.materials.add_material(ObjectMaterial::metal());
        self.materials.add_material(ObjectMaterial::wood());
    }

    /// Turns lighting on and uploads the four scene lights
    pub fn setup_scene_lights(&self, shader: &mut impl ShaderUniforms) {
        upload_lights(shader, &self.lights);
    }

    /// Loads meshes and textures, defines materials and sets up lights
    ///
    /// Texture files are looked up in `texture_dir`. A texture that fails to load
    /// is logged and skipped; pieces using it fall back to their colour.
    /// Preparing again releases the textures of the previous preparation first.
    pub fn prepare_scene<T, L>(
        &mut self,
        target: &mut T,
        loader: &mut L,
        texture_dir: &Path,
    ) -> PreparedScene
    where
        T: ShaderUniforms + ShapeMeshes,
        L: TextureLoader<Handle = H>,
    {
        if !self.textures.is_empty() {
            log::debug!("Scene prepared again, releasing previous textures");
            self.destroy_textures(loader);
        }

        target.load_plane_mesh();
        target.load_box_mesh();
        target.load_tapered_cylinder_mesh();
        target.load_prism_mesh();
        target.load_pyramid3_mesh();

        let mut prepared = PreparedScene {
            meshes_loaded: MeshKind::ALL.len(),
            ..Default::default()
        };

        for (file_name, tag) in SCENE_TEXTURES {
            match self.create_texture(loader, texture_dir.join(file_name), tag) {
                Ok(_) => prepared.textures_loaded += 1,
                Err(err) => {
                    log::warn!("Could not load texture '{}': {}", tag, err);
                    prepared.missing_textures.push(tag.to_string());
                }
            }
        }

        self.define_object_materials();
        self.setup_scene_lights(target);

        log::info!(
            "Scene prepared: {} meshes, {} of {} textures, {} materials",
            prepared.meshes_loaded,
            prepared.textures_loaded,
            SCENE_TEXTURES.len(),
            self.materials.len()
        );
        prepared
    }

    /// Applies one piece's state and draws its mesh
    pub fn render_piece<T>(&self, target: &mut T, piece: &ScenePiece)
    where
        T: ShaderUniforms + ShapeMeshes,
    {
        let placement = &piece.placement;
        let [x, y, z] = placement.rotation_degrees;
        self.set_transformations(target, placement.scale, x, y, z, placement.position);

        let [r, g, b, a] = piece.color;
        self.set_shader_color(target, r, g, b, a);
        if let Some(tag) = piece.texture {
            self.set_shader_texture(target, tag);
        }
        if let Some([u, v]) = piece.uv_scale {
            self.set_texture_uv_scale(target, u, v);
        }
        if let Some(tag) = piece.material {
            self.set_shader_material(target, tag);
        }

        target.draw_mesh(piece.mesh);
    }

    /// Replays the house scene
    pub fn render_scene<T>(&self, target: &mut T)
    where
        T: ShaderUniforms + ShapeMeshes,
    {
        for piece in HOUSE_SCENE.iter() {
            self.render_piece(target, piece);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;
    use crate::gfx::resources::texture_resource::DecodedImage;
    use crate::gfx::shader::UniformValue;
    use image::{Rgb, RgbImage};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Set(String, UniformValue),
        Load(MeshKind),
        Draw(MeshKind),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn set(&self, name: &str) -> Vec<&UniformValue> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Set(n, v) if n == name => Some(v),
                    _ => None,
                })
                .collect()
        }

        fn draws(&self) -> Vec<MeshKind> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Draw(kind) => Some(*kind),
                    _ => None,
                })
                .collect()
        }
    }

    impl ShaderUniforms for Recorder {
        fn set_uniform(&mut self, name: &str, value: UniformValue) {
            self.calls.push(Call::Set(name.to_string(), value));
        }
    }

    impl ShapeMeshes for Recorder {
        fn load_mesh(&mut self, kind: MeshKind) {
            self.calls.push(Call::Load(kind));
        }

        fn draw_mesh(&mut self, kind: MeshKind) {
            self.calls.push(Call::Draw(kind));
        }
    }

    #[derive(Default)]
    struct IdLoader {
        next: u32,
        released: Vec<u32>,
    }

    impl TextureLoader for IdLoader {
        type Handle = u32;

        fn create_texture(&mut self, _image: &DecodedImage, _tag: &str) -> Result<u32> {
            self.next += 1;
            Ok(self.next)
        }

        fn release_texture(&mut self, handle: u32) {
            self.released.push(handle);
        }
    }

    fn write_textures(dir: &Path, files: &[&str]) {
        for file in files {
            RgbImage::from_pixel(2, 2, Rgb([90, 90, 90]))
                .save(dir.join(file))
                .unwrap();
        }
    }

    fn manager_with(tags: &[&str]) -> SceneManager<u32> {
        let mut manager = SceneManager::new();
        for (i, tag) in tags.iter().enumerate() {
            manager.textures.register(tag, i as u32).unwrap();
        }
        manager.define_object_materials();
        manager
    }

    #[test]
    fn shader_color_disables_texturing() {
        let manager = manager_with(&[]);
        let mut recorder = Recorder::default();
        manager.set_shader_color(&mut recorder, 0.8, 0.5, 0.3, 1.0);

        assert_eq!(
            recorder.calls,
            vec![
                Call::Set("bUseTexture".into(), UniformValue::Bool(false)),
                Call::Set("objectColor".into(), UniformValue::Vec4([0.8, 0.5, 0.3, 1.0])),
            ]
        );
    }

    #[test]
    fn shader_texture_uses_registration_slot() {
        let manager = manager_with(&["brick", "wood", "grass"]);
        let mut recorder = Recorder::default();
        manager.set_shader_texture(&mut recorder, "grass");

        assert_eq!(
            recorder.calls,
            vec![
                Call::Set("bUseTexture".into(), UniformValue::Bool(true)),
                Call::Set("objectTexture".into(), UniformValue::Sampler2D(2)),
            ]
        );
    }

    #[test]
    fn unknown_texture_keeps_colour() {
        let manager = manager_with(&["brick"]);
        let mut recorder = Recorder::default();
        manager.set_shader_texture(&mut recorder, "marble");

        assert_eq!(recorder.set("bUseTexture"), vec![&UniformValue::Bool(false)]);
        assert!(recorder.set("objectTexture").is_empty());
    }

    #[test]
    fn material_uploads_five_fields() {
        let manager = manager_with(&[]);
        let mut recorder = Recorder::default();
        manager.set_shader_material(&mut recorder, "metal");

        assert_eq!(recorder.calls.len(), 5);
        assert_eq!(recorder.set("material.shininess"), vec![&UniformValue::Float(64.0)]);
        assert_eq!(
            recorder.set("material.ambientColor"),
            vec![&UniformValue::Vec3([0.3, 0.1, 0.1])]
        );
    }

    #[test]
    fn unknown_material_uploads_nothing() {
        let manager = manager_with(&[]);
        let mut recorder = Recorder::default();
        manager.set_shader_material(&mut recorder, "glass");
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn transformations_upload_composed_matrix() {
        let manager = manager_with(&[]);
        let mut recorder = Recorder::default();
        manager.set_transformations(
            &mut recorder,
            [2.0, 3.0, 4.0],
            0.0,
            0.0,
            0.0,
            [1.0, 2.0, 3.0],
        );

        let expected: [[f32; 4]; 4] = [
            [2.0, 0.0, 0.0, 0.0],
            [0.0, 3.0, 0.0, 0.0],
            [0.0, 0.0, 4.0, 0.0],
            [1.0, 2.0, 3.0, 1.0],
        ];
        assert_eq!(recorder.set("model"), vec![&UniformValue::Mat4(expected)]);
    }

    #[test]
    fn render_scene_draws_every_piece_in_order() {
        let manager = manager_with(&[
            "brick", "wood", "wall", "grass", "door", "outergreen", "concrete", "roof", "window",
            "garage",
        ]);
        let mut recorder = Recorder::default();
        manager.render_scene(&mut recorder);

        let expected: Vec<MeshKind> = HOUSE_SCENE.iter().map(|piece| piece.mesh).collect();
        assert_eq!(recorder.draws(), expected);
        assert_eq!(recorder.set("model").len(), HOUSE_SCENE.len());
    }

    #[test]
    fn render_piece_follows_state_order() {
        let manager = manager_with(&["grass"]);
        let mut recorder = Recorder::default();
        manager.render_piece(&mut recorder, &HOUSE_SCENE[0]);

        let names: Vec<&str> = recorder
            .calls
            .iter()
            .map(|call| match call {
                Call::Set(name, _) => name.as_str(),
                Call::Draw(_) => "draw",
                Call::Load(_) => "load",
            })
            .collect();
        assert_eq!(
            names,
            vec![
                "model",
                "bUseTexture",
                "objectColor",
                "bUseTexture",
                "objectTexture",
                "UVscale",
                "material.diffuseColor",
                "material.specularColor",
                "material.shininess",
                "material.ambientColor",
                "material.ambientStrength",
                "draw",
            ]
        );
    }

    #[test]
    fn backdrop_is_drawn_with_colour_only() {
        let manager = manager_with(&[]);
        let mut recorder = Recorder::default();
        manager.render_piece(&mut recorder, &HOUSE_SCENE[1]);

        assert_eq!(recorder.set("bUseTexture"), vec![&UniformValue::Bool(false)]);
        assert!(recorder.set("UVscale").is_empty());
        assert_eq!(recorder.draws(), vec![MeshKind::Plane]);
    }

    #[test]
    fn prepare_scene_loads_meshes_textures_and_lights() {
        let dir = tempfile::tempdir().unwrap();
        write_textures(dir.path(), &["Brick.jpg", "Grass.jpg", "glass.jpg"]);

        let mut manager: SceneManager<u32> = SceneManager::new();
        let mut recorder = Recorder::default();
        let mut loader = IdLoader::default();
        let prepared = manager.prepare_scene(&mut recorder, &mut loader, dir.path());

        assert_eq!(prepared.meshes_loaded, 5);
        assert_eq!(prepared.textures_loaded, 3);
        assert_eq!(prepared.missing_textures.len(), 9);
        assert!(prepared.missing_textures.contains(&"wood".to_string()));

        // Slots are assigned in load order, skipping failures
        assert_eq!(manager.find_texture_slot("brick"), Some(0));
        assert_eq!(manager.find_texture_slot("grass"), Some(1));
        assert_eq!(manager.find_texture_slot("window"), Some(2));
        assert_eq!(manager.find_texture_id("window"), Some(&3));

        let loads: Vec<&Call> = recorder
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Load(_)))
            .collect();
        assert_eq!(loads.len(), 5);
        assert_eq!(recorder.calls[4], Call::Load(MeshKind::Pyramid3));

        assert!(manager.find_material("wood").is_some());
        assert_eq!(recorder.set("bUseLighting"), vec![&UniformValue::Bool(true)]);
        assert_eq!(
            recorder.set("lightSources[1].position"),
            vec![&UniformValue::Vec3([7.0, -6.0, 1.0])]
        );
    }

    #[test]
    fn render_scene_without_textures_draws_everything_in_colour() {
        let manager = manager_with(&[]);
        let mut recorder = Recorder::default();
        manager.render_scene(&mut recorder);

        assert_eq!(recorder.draws().len(), 27);
        assert!(recorder
            .set("bUseTexture")
            .iter()
            .all(|value| **value == UniformValue::Bool(false)));
        assert!(recorder.set("objectTexture").is_empty());
    }

    #[test]
    fn preparing_twice_replaces_textures_and_materials() {
        let dir = tempfile::tempdir().unwrap();
        write_textures(dir.path(), &["Brick.jpg", "Grass.jpg", "glass.jpg"]);

        let mut manager: SceneManager<u32> = SceneManager::new();
        let mut recorder = Recorder::default();
        let mut loader = IdLoader::default();
        manager.prepare_scene(&mut recorder, &mut loader, dir.path());
        let prepared = manager.prepare_scene(&mut recorder, &mut loader, dir.path());

        assert_eq!(prepared.textures_loaded, 3);
        assert_eq!(loader.released, vec![1, 2, 3]);
        assert_eq!(manager.textures().len(), 3);
        assert_eq!(manager.find_texture_slot("brick"), Some(0));
        assert_eq!(manager.find_texture_id("brick"), Some(&4));
        assert_eq!(manager.materials().len(), 2);
    }

    #[test]
    fn create_texture_reports_capacity() {
        let dir = tempfile::tempdir().unwrap();
        write_textures(dir.path(), &["a.jpg"]);

        let mut manager: SceneManager<u32> = SceneManager::new();
        let mut loader = IdLoader::default();
        for i in 0..16 {
            manager
                .create_texture(&mut loader, dir.path().join("a.jpg"), &format!("t{}", i))
                .unwrap();
        }

        let err = manager
            .create_texture(&mut loader, dir.path().join("a.jpg"), "overflow")
            .unwrap_err();
        assert!(matches!(err, SceneError::TextureCapacity { .. }));
    }

    #[test]
    fn destroy_textures_releases_all() {
        let mut manager = manager_with(&["brick", "wood"]);
        let mut loader = IdLoader::default();
        manager.destroy_textures(&mut loader);

        assert_eq!(loader.released, vec![0, 1]);
        assert!(manager.find_texture_slot("brick").is_none());

        let mut visited = 0;
        manager.bind_textures(|_, _| visited += 1);
        assert_eq!(visited, 0);
    }
}
