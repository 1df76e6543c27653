//! WGPU-based rendering engine
//!
//! Owns the surface, device and every GPU resource of the scene: the Phong
//! pipeline, the depth buffer, mesh buffers, texture slot bind groups and the
//! uniform buffers fed from a [`FrameRecorder`].

use std::sync::Arc;
use wgpu::{Device, TextureFormat};

use crate::{
    config::SceneConfig,
    error::{Result, SceneError},
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{
            lighting::{GlobalBindings, GlobalUBO, GlobalUniform},
            texture_registry::{GpuTextureLoader, MAX_TEXTURE_SLOTS},
            texture_resource::TextureResource,
        },
    },
    wgpu_utils::{binding_types, DynamicUniformBuffer},
};

use super::{
    frame::{FrameRecorder, ObjectUniform},
    mesh_buffers::{DrawMesh, MeshBuffers},
    pipeline_manager::{PipelineConfig, PipelineManager},
};

const PHONG_PIPELINE: &str = "Phong";

/// Draw slots allocated up front for per-object uniforms
const INITIAL_DRAW_CAPACITY: usize = 64;

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    clear_color: wgpu::Color,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,

    object_ubo: DynamicUniformBuffer<ObjectUniform>,
    object_layout: wgpu::BindGroupLayout,
    object_bind_group: wgpu::BindGroup,

    texture_layout: wgpu::BindGroupLayout,
    texture_bind_groups: Vec<Option<wgpu::BindGroup>>,
    placeholder_texture: TextureResource,
    placeholder_bind_group: wgpu::BindGroup,

    meshes: MeshBuffers,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Initializes wgpu, configures the surface from `scene_config` and builds
    /// the Phong pipeline with its bind groups.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        scene_config: &SceneConfig,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| SceneError::Gpu(format!("failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| SceneError::Gpu(format!("no suitable adapter: {}", e)))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| SceneError::Gpu(format!("failed to request device: {}", e)))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| SceneError::Gpu("surface reports no formats".to_string()))?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(scene_config.vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "Surface configured: {}x{} {:?}, {:?}",
            config.width,
            config.height,
            format,
            config.present_mode
        );

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        // Group 0: camera and lights
        let global_ubo = GlobalUBO::new_with_data(&device, &GlobalUniform::default());
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        // Group 1: per-draw object block at a dynamic offset
        let object_ubo = DynamicUniformBuffer::<ObjectUniform>::new(&device, INITIAL_DRAW_CAPACITY);
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: binding_types::dynamic_uniform(std::mem::size_of::<ObjectUniform>() as u64),
                count: None,
            }],
        });
        let object_bind_group = create_object_bind_group(&device, &object_layout, &object_ubo);

        // Group 2: the texture bound to the draw's slot
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: binding_types::texture_2d(),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let placeholder_texture = TextureResource::create_placeholder(&device, &queue);
        let placeholder_bind_group = create_texture_bind_group(
            &device,
            &texture_layout,
            &placeholder_texture,
            "Placeholder",
        );

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("phong", include_str!("phong.wgsl"));
        // Planes are single sided and seen from both sides, so nothing is culled
        pipeline_manager.register_pipeline(
            PHONG_PIPELINE,
            PipelineConfig::default()
                .with_label("PHONG")
                .with_shader("phong")
                .with_cull_mode(None)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_color_format(format)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_layout.clone(),
                    texture_layout.clone(),
                ]),
        );
        pipeline_manager
            .create_all_pipelines()
            .map_err(|errors| SceneError::Gpu(errors.join("; ")))?;

        let [r, g, b, a] = scene_config.clear_color;
        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            clear_color: wgpu::Color { r, g, b, a },
            pipeline_manager,
            global_ubo,
            global_bindings,
            object_ubo,
            object_layout,
            object_bind_group,
            texture_layout,
            texture_bind_groups: (0..MAX_TEXTURE_SLOTS).map(|_| None).collect(),
            placeholder_texture,
            placeholder_bind_group,
            meshes: MeshBuffers::new(),
        })
    }

    /// Texture loader that uploads through this engine's device
    pub fn texture_loader(&self) -> GpuTextureLoader<'_> {
        GpuTextureLoader::new(&self.device, &self.queue)
    }

    /// Makes `texture` the one sampled by draws using `slot`
    pub fn bind_texture(&mut self, slot: usize, texture: &TextureResource) {
        let Some(entry) = self.texture_bind_groups.get_mut(slot) else {
            log::warn!("Texture slot {} is out of range", slot);
            return;
        };
        *entry = Some(create_texture_bind_group(
            &self.device,
            &self.texture_layout,
            texture,
            &format!("Slot {}", slot),
        ));
    }

    /// Drops every slot binding; draws fall back to the placeholder texture
    pub fn clear_texture_bindings(&mut self) {
        self.texture_bind_groups.iter_mut().for_each(|entry| *entry = None);
    }

    /// Renders the draws recorded in `frame`
    ///
    /// Meshes loaded since the last frame are uploaded first. A draw whose texture
    /// slot has no binding samples the placeholder texture.
    pub fn render_frame(&mut self, frame: &mut FrameRecorder, camera: CameraUniform) -> Result<()> {
        for kind in frame.take_pending_uploads() {
            self.meshes.upload(&self.device, kind);
        }

        let mut globals = *frame.globals();
        globals.set_camera(camera);
        self.global_ubo.update_content(&self.queue, globals);

        let objects: Vec<ObjectUniform> = frame.draws().iter().map(|draw| draw.object).collect();
        if self.object_ubo.write(&self.device, &self.queue, &objects) {
            log::debug!("Object buffer grown to {} draws", self.object_ubo.capacity());
            self.object_bind_group =
                create_object_bind_group(&self.device, &self.object_layout, &self.object_ubo);
        }

        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(PHONG_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

                for (index, draw) in frame.draws().iter().enumerate() {
                    let Some(mesh) = self.meshes.get(draw.mesh) else {
                        continue;
                    };
                    let texture_bind_group = draw
                        .texture_slot()
                        .and_then(|slot| self.texture_bind_groups.get(slot))
                        .and_then(Option::as_ref)
                        .unwrap_or(&self.placeholder_bind_group);

                    let object_offset = self.object_ubo.offset(index);
                    render_pass.set_bind_group(1, &self.object_bind_group, &[object_offset]);
                    render_pass.set_bind_group(2, texture_bind_group, &[]);
                    render_pass.draw_mesh(mesh);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        log::trace!("Frame submitted with {} draws", frame.draws().len());
        Ok(())
    }

    /// Resizes the surface and recreates the depth buffer
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Reconfigures the surface with its current size, after it was lost or outdated
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Set VSync (vertical synchronization) state
    pub fn set_vsync(&mut self, enable: bool) {
        self.config.present_mode = present_mode(enable);
        self.surface.configure(&self.device, &self.config);
    }
}

impl Drop for RenderEngine {
    fn drop(&mut self) {
        self.placeholder_texture.destroy();
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

fn create_object_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &DynamicUniformBuffer<ObjectUniform>,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Object Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.binding_resource(),
        }],
    })
}

fn create_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &TextureResource,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{} Texture Bind Group", label)),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vsync_selects_auto_present_modes() {
        assert_eq!(present_mode(true), wgpu::PresentMode::AutoVsync);
        assert_eq!(present_mode(false), wgpu::PresentMode::AutoNoVsync);
    }
}
