//! Runtime configuration for the scene viewer
//!
//! Defaults frame the house from the front porch. A handful of values can be
//! overridden through `PORCHLIGHT_*` environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use cgmath::Vector3;

/// Camera framing used when the viewer starts and when the camera is reset
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub target: Vector3<f32>,
    pub distance: f32,
    /// Elevation above the XZ plane, radians
    pub pitch: f32,
    /// Rotation around the Y axis, radians. Zero looks down -Z.
    pub yaw: f32,
    /// Vertical field of view, degrees
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        // Eye at (0, 5, 12) looking at the origin
        Self {
            target: Vector3::new(0.0, 0.0, 0.0),
            distance: 13.0,
            pitch: 5.0f32.atan2(12.0),
            yaw: 0.0,
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

/// Top-level viewer configuration
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub texture_dir: PathBuf,
    pub clear_color: [f64; 4],
    pub vsync: bool,
    pub camera: CameraConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            title: "Porchlight".to_string(),
            width: 1000,
            height: 800,
            texture_dir: PathBuf::from("textures"),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            vsync: true,
            camera: CameraConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Default configuration with `PORCHLIGHT_*` environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup
    ///
    /// Values that fail to parse are ignored and logged.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("PORCHLIGHT_TEXTURE_DIR") {
            self.texture_dir = PathBuf::from(dir);
        }
        if let Some(width) = parse_override::<u32>(&lookup, "PORCHLIGHT_WIDTH") {
            self.width = width.max(1);
        }
        if let Some(height) = parse_override::<u32>(&lookup, "PORCHLIGHT_HEIGHT") {
            self.height = height.max(1);
        }
        if let Some(vsync) = parse_override::<bool>(&lookup, "PORCHLIGHT_VSYNC") {
            self.vsync = vsync;
        }
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn with_texture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.texture_dir = dir.into();
        self
    }

    pub fn with_clear_color(mut self, color: [f64; 4]) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

fn parse_override<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}
