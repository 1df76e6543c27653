//! Error types for scene preparation and rendering

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for Porchlight operations
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("could not load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("not implemented to handle image {path} with {channels} channels")]
    UnsupportedChannels { path: PathBuf, channels: u8 },

    #[error("texture '{tag}' does not fit, all {capacity} texture slots are in use")]
    TextureCapacity { tag: String, capacity: usize },

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("window error: {0}")]
    Window(String),
}

/// Result type alias for Porchlight operations
pub type Result<T> = std::result::Result<T, SceneError>;
