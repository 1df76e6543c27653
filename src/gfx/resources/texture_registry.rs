//! Tag-addressed texture slots
//!
//! Loaded textures are registered under a string tag and occupy the next free slot.
//! The slot index is what the shader's `objectTexture` sampler receives, so it
//! never changes once assigned. At most [`MAX_TEXTURE_SLOTS`] textures fit.

use std::path::Path;

use crate::error::{Result, SceneError};

use super::texture_resource::{DecodedImage, TextureResource};

/// Number of texture units available to the scene
pub const MAX_TEXTURE_SLOTS: usize = 16;

/// Creates and releases backend texture handles from decoded images
pub trait TextureLoader {
    type Handle;

    fn create_texture(&mut self, image: &DecodedImage, tag: &str) -> Result<Self::Handle>;

    fn release_texture(&mut self, handle: Self::Handle) {
        drop(handle);
    }
}

/// Uploads textures through a wgpu device and queue
pub struct GpuTextureLoader<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
}

impl<'a> GpuTextureLoader<'a> {
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> Self {
        Self { device, queue }
    }
}

impl TextureLoader for GpuTextureLoader<'_> {
    type Handle = TextureResource;

    /// Uploads `image`, shrinking it first when it exceeds the device's texture size limit
    fn create_texture(&mut self, image: &DecodedImage, tag: &str) -> Result<TextureResource> {
        let max_dimension = self.device.limits().max_texture_dimension_2d;
        let fitted = image.downscaled_to(max_dimension);
        if let Some(fitted) = &fitted {
            log::warn!(
                "Texture '{}' is {}x{}, above the device limit of {}; uploading at {}x{}",
                tag,
                image.width,
                image.height,
                max_dimension,
                fitted.width,
                fitted.height
            );
        }

        Ok(TextureResource::from_image(
            self.device,
            self.queue,
            fitted.as_ref().unwrap_or(image),
            &format!("Texture '{}'", tag),
        ))
    }

    fn release_texture(&mut self, handle: TextureResource) {
        handle.destroy();
    }
}

#[derive(Debug)]
struct TextureEntry<H> {
    tag: String,
    handle: H,
}

/// Fixed-capacity list of tagged textures
#[derive(Debug)]
pub struct TextureRegistry<H> {
    entries: Vec<TextureEntry<H>>,
}

impl<H> Default for TextureRegistry<H> {
    fn default() -> Self {
        Self {
            entries: Vec::with_capacity(MAX_TEXTURE_SLOTS),
        }
    }
}

impl<H> TextureRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handle under `tag` and returns its slot
    ///
    /// Duplicate tags are stored, but lookups always resolve to the first one.
    pub fn register(&mut self, tag: &str, handle: H) -> Result<usize> {
        if self.entries.len() >= MAX_TEXTURE_SLOTS {
            return Err(SceneError::TextureCapacity {
                tag: tag.to_string(),
                capacity: MAX_TEXTURE_SLOTS,
            });
        }
        if self.find_texture_slot(tag).is_some() {
            log::warn!("Texture tag '{}' registered twice; lookups keep the first", tag);
        }

        self.entries.push(TextureEntry {
            tag: tag.to_string(),
            handle,
        });
        Ok(self.entries.len() - 1)
    }

    /// Decodes `path`, creates a handle through `loader` and registers it
    pub fn load<L>(&mut self, loader: &mut L, path: impl AsRef<Path>, tag: &str) -> Result<usize>
    where
        L: TextureLoader<Handle = H>,
    {
        if self.is_full() {
            return Err(SceneError::TextureCapacity {
                tag: tag.to_string(),
                capacity: MAX_TEXTURE_SLOTS,
            });
        }

        let image = DecodedImage::load(path)?;
        let handle = loader.create_texture(&image, tag)?;
        self.register(tag, handle)
    }

    pub fn find_texture_slot(&self, tag: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.tag == tag)
    }

    pub fn find_texture(&self, tag: &str) -> Option<&H> {
        self.entries
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| &entry.handle)
    }

    pub fn get(&self, slot: usize) -> Option<&H> {
        self.entries.get(slot).map(|entry| &entry.handle)
    }

    /// Visits every loaded texture with its slot, in slot order
    pub fn bind_textures<F>(&self, mut bind: F)
    where
        F: FnMut(usize, &H),
    {
        for (slot, entry) in self.entries.iter().enumerate() {
            bind(slot, &entry.handle);
        }
    }

    /// Empties the registry, handing every handle back to `release`
    pub fn destroy_textures<F>(&mut self, mut release: F)
    where
        F: FnMut(H),
    {
        for entry in self.entries.drain(..) {
            release(entry.handle);
        }
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.tag.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_TEXTURE_SLOTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// Hands out increasing ids in place of GPU textures
    #[derive(Default)]
    struct CountingLoader {
        next_id: u32,
        released: Vec<u32>,
    }

    impl TextureLoader for CountingLoader {
        type Handle = u32;

        fn create_texture(&mut self, _image: &DecodedImage, _tag: &str) -> Result<u32> {
            self.next_id += 1;
            Ok(self.next_id)
        }

        fn release_texture(&mut self, handle: u32) {
            self.released.push(handle);
        }
    }

    #[test]
    fn slots_follow_registration_order() {
        let mut registry = TextureRegistry::new();
        assert_eq!(registry.register("brick", 10).unwrap(), 0);
        assert_eq!(registry.register("wood", 20).unwrap(), 1);

        assert_eq!(registry.find_texture_slot("wood"), Some(1));
        assert_eq!(registry.find_texture("brick"), Some(&10));
        assert_eq!(registry.find_texture_slot("glass"), None);
        assert_eq!(registry.find_texture("glass"), None);
    }

    #[test]
    fn duplicate_tags_resolve_to_first() {
        let mut registry = TextureRegistry::new();
        registry.register("roof", 1).unwrap();
        registry.register("roof", 2).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find_texture_slot("roof"), Some(0));
        assert_eq!(registry.find_texture("roof"), Some(&1));
    }

    #[test]
    fn seventeenth_texture_is_rejected() {
        let mut registry = TextureRegistry::new();
        for i in 0..MAX_TEXTURE_SLOTS {
            registry.register(&format!("t{}", i), i).unwrap();
        }
        assert!(registry.is_full());

        let err = registry.register("overflow", 99).unwrap_err();
        assert!(matches!(err, SceneError::TextureCapacity { capacity: 16, .. }));
        assert_eq!(registry.len(), MAX_TEXTURE_SLOTS);
        assert_eq!(registry.find_texture_slot("overflow"), None);
    }

    #[test]
    fn bind_visits_in_slot_order() {
        let mut registry = TextureRegistry::new();
        for tag in ["grass", "door", "garage"] {
            registry.register(tag, tag.len()).unwrap();
        }

        let mut visited = Vec::new();
        registry.bind_textures(|slot, handle| visited.push((slot, *handle)));
        assert_eq!(visited, vec![(0, 5), (1, 4), (2, 6)]);
    }

    #[test]
    fn destroy_releases_every_handle_and_empties() {
        let mut registry = TextureRegistry::new();
        registry.register("a", 7u32).unwrap();
        registry.register("b", 8u32).unwrap();

        let mut loader = CountingLoader::default();
        registry.destroy_textures(|handle| loader.release_texture(handle));

        assert_eq!(loader.released, vec![7, 8]);
        assert!(registry.is_empty());
        assert_eq!(registry.find_texture_slot("a"), None);
    }

    #[test]
    fn load_decodes_and_registers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grass.png");
        RgbImage::from_pixel(4, 4, Rgb([0, 200, 0])).save(&path).unwrap();

        let mut loader = CountingLoader::default();
        let mut registry = TextureRegistry::new();
        let slot = registry.load(&mut loader, &path, "grass").unwrap();

        assert_eq!(slot, 0);
        assert_eq!(registry.find_texture("grass"), Some(&1));
    }

    #[test]
    fn failed_load_leaves_registry_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = CountingLoader::default();
        let mut registry: TextureRegistry<u32> = TextureRegistry::new();

        let result = registry.load(&mut loader, dir.path().join("missing.jpg"), "missing");
        assert!(matches!(result, Err(SceneError::ImageLoad { .. })));
        assert!(registry.is_empty());
        assert_eq!(loader.next_id, 0);
    }
}
