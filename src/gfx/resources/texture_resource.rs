//! Texture resource management for wgpu
//!
//! Provides image decoding for scene textures and utilities for creating GPU
//! textures, views and samplers, including the depth buffer.

use std::path::{Path, PathBuf};

use image::{imageops::FilterType, RgbaImage};

use crate::error::{Result, SceneError};

/// A decoded, vertically flipped RGBA8 image ready for upload
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Channel count of the source file (3 or 4)
    pub channels: u8,
    pub rgba: RgbaImage,
}

impl DecodedImage {
    /// Decodes an image file
    ///
    /// Images are flipped vertically so that row 0 is the bottom of the picture,
    /// matching the mesh UV convention. Only RGB and RGBA sources are accepted.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| SceneError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let channels = image.color().channel_count();
        if channels != 3 && channels != 4 {
            return Err(SceneError::UnsupportedChannels {
                path: path.to_path_buf(),
                channels,
            });
        }

        let rgba = image.flipv().to_rgba8();
        let (width, height) = rgba.dimensions();

        log::info!(
            "Successfully loaded image: {}, width: {}, height: {}, channels: {}",
            path.display(),
            width,
            height,
            channels
        );

        Ok(Self {
            path: path.to_path_buf(),
            width,
            height,
            channels,
            rgba,
        })
    }

    /// Number of levels in a full mip chain down to 1x1
    pub fn mip_level_count(&self) -> u32 {
        32 - self.width.max(self.height).max(1).leading_zeros()
    }

    /// Builds every mip level, level 0 first
    pub fn mip_chain(&self) -> Vec<RgbaImage> {
        let mut levels = vec![self.rgba.clone()];
        let (mut width, mut height) = (self.width, self.height);

        while width > 1 || height > 1 {
            width = (width / 2).max(1);
            height = (height / 2).max(1);
            let previous = levels.last().unwrap_or(&self.rgba);
            let next = image::imageops::resize(previous, width, height, FilterType::Triangle);
            levels.push(next);
        }

        levels
    }

    /// Copy shrunk to fit `max_dimension` on both sides, or `None` if it already fits
    pub fn downscaled_to(&self, max_dimension: u32) -> Option<Self> {
        if fits_device_limits(self.width, self.height, max_dimension) {
            return None;
        }
        let (width, height) = fit_within_limit(self.width, self.height, max_dimension);
        Some(Self {
            path: self.path.clone(),
            width,
            height,
            channels: self.channels,
            rgba: image::imageops::resize(&self.rgba, width, height, FilterType::Triangle),
        })
    }
}

pub fn fits_device_limits(width: u32, height: u32, max_dimension: u32) -> bool {
    width <= max_dimension && height <= max_dimension
}

/// Largest size within `max_dimension` on both sides that keeps the aspect ratio
pub fn fit_within_limit(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let max_dimension = max_dimension.max(1);
    if fits_device_limits(width, height, max_dimension) {
        return (width, height);
    }
    let longest = width.max(height) as u64;
    let scale = |side: u32| ((side as u64 * max_dimension as u64) / longest).max(1) as u32;
    (scale(width), scale(height))
}

/// GPU texture resource containing texture, view, and sampler
#[derive(Debug)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the renderer
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Colour textures hold raw texel values; the surface is not sRGB either
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Creates a depth texture matching the surface configuration
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads a decoded image with its full mip chain
    ///
    /// The sampler repeats in U and V and filters linearly, so UV scales above 1
    /// tile the image across the surface.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DecodedImage,
        label: &str,
    ) -> Self {
        let mip_level_count = image.mip_level_count();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, pixels) in image.mip_chain().iter().enumerate() {
            let (width, height) = pixels.dimensions();
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                pixels.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Creates a 1x1 opaque white texture, bound when a draw samples no texture
    pub fn create_placeholder(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let image = DecodedImage {
            path: PathBuf::from("<placeholder>"),
            width: 1,
            height: 1,
            channels: 4,
            rgba: RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255])),
        };
        Self::from_image(device, queue, &image, "Placeholder Texture")
    }

    /// Frees the GPU memory backing this texture
    pub fn destroy(&self) {
        self.texture.destroy();
    }
}
