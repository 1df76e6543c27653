//! # Scene Module
//!
//! The fixed house scene and the manager that prepares and replays it.
//!
//! - [`SceneManager`] - texture registry, materials, lights and the draw script
//! - [`HOUSE_SCENE`] - the table of placed meshes drawn every frame
//! - [`Vertex3D`] - vertex format shared by all meshes

pub mod house;
pub mod scene_manager;
pub mod vertex;

pub use house::{ScenePiece, HOUSE_SCENE};
pub use scene_manager::{PreparedScene, SceneManager, SCENE_TEXTURES};
pub use vertex::Vertex3D;
