//! # Porchlight Prelude
//!
//! Commonly used types for driving the scene against a custom backend.
//!
//! ```no_run
//! use porchlight::prelude::*;
//!
//! let mut frame = FrameRecorder::new();
//! let scene: SceneManager<TextureResource> = SceneManager::new();
//! frame.load_box_mesh();
//! scene.render_scene(&mut frame);
//! ```

pub use crate::app::SceneViewer;
pub use crate::config::{CameraConfig, SceneConfig};
pub use crate::error::{Result, SceneError};

pub use crate::gfx::camera::{CameraManager, OrbitCamera};
pub use crate::gfx::geometry::{generate_mesh, GeometryData, MeshKind, ShapeMeshes};
pub use crate::gfx::rendering::{DrawCommand, FrameRecorder, RenderEngine};
pub use crate::gfx::resources::{
    LightSource, ObjectMaterial, TextureLoader, TextureRegistry, TextureResource,
};
pub use crate::gfx::scene::{SceneManager, ScenePiece, HOUSE_SCENE};
pub use crate::gfx::shader::{ShaderUniforms, UniformValue};
pub use crate::gfx::transform::Placement;

pub use cgmath::{Matrix4, Vector3};
