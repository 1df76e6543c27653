// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles the render pipeline, GPU mesh buffers and frame submission.

pub mod frame;
pub mod mesh_buffers;
pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use frame::{DrawCommand, FrameRecorder, ObjectUniform};
pub use mesh_buffers::{GpuMesh, MeshBuffers};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
