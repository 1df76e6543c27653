// src/lib.rs
//! Porchlight
//!
//! A fixed-scene 3D renderer built on wgpu and winit. It draws a small house
//! diorama from primitive meshes with textures, material presets and static
//! Phong lighting under an orbit camera.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::SceneViewer;
pub use config::{CameraConfig, SceneConfig};
pub use error::{Result, SceneError};

/// Runs the viewer with the default configuration and environment overrides
pub fn run() -> Result<()> {
    SceneViewer::new(SceneConfig::from_env())?.run()
}
