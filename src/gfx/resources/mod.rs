// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, materials and the light/camera uniform block.

pub mod lighting;
pub mod material;
pub mod texture_registry;
pub mod texture_resource;

// Re-export main types
pub use lighting::{scene_lights, GlobalBindings, GlobalUBO, GlobalUniform, LightSource, MAX_LIGHTS};
pub use material::{MaterialLibrary, MaterialUniform, ObjectMaterial};
pub use texture_registry::{GpuTextureLoader, TextureLoader, TextureRegistry, MAX_TEXTURE_SLOTS};
pub use texture_resource::{DecodedImage, TextureResource};
