//! # Graphics Module
//!
//! Everything needed to put the house scene on screen.
//!
//! - **Camera** ([`camera`]) - orbit camera and its mouse/keyboard controller
//! - **Geometry** ([`geometry`]) - procedural meshes for the five basic shapes
//! - **Resources** ([`resources`]) - textures, materials and lights
//! - **Scene** ([`scene`]) - the house layout and the manager that draws it
//! - **Rendering** ([`rendering`]) - wgpu pipeline, buffers and frame submission
//!
//! Scene code never touches wgpu directly. It writes named uniforms through
//! [`shader::ShaderUniforms`] and draws through [`geometry::ShapeMeshes`]; the
//! [`rendering::FrameRecorder`] turns those calls into GPU draws.

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod shader;
pub mod transform;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
