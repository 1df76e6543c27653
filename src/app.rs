use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::SceneConfig,
    error::{Result, SceneError},
    gfx::{
        camera::camera_utils::CameraManager,
        rendering::{frame::FrameRecorder, render_engine::RenderEngine},
        resources::texture_resource::TextureResource,
        scene::SceneManager,
    },
};

/// Windowed viewer for the house scene
pub struct SceneViewer {
    event_loop: EventLoop<()>,
    state: ViewerState,
}

struct ViewerState {
    config: SceneConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    camera_manager: CameraManager,
    scene: SceneManager<TextureResource>,
    frame: FrameRecorder,
    startup_error: Option<SceneError>,
}

impl SceneViewer {
    pub fn new(config: SceneConfig) -> Result<Self> {
        let event_loop = EventLoop::new()
            .map_err(|e| SceneError::Window(format!("failed to create event loop: {}", e)))?;
        let camera_manager = CameraManager::from_config(&config.camera, config.aspect_ratio());

        Ok(Self {
            event_loop,
            state: ViewerState {
                config,
                window: None,
                render_engine: None,
                camera_manager,
                scene: SceneManager::new(),
                frame: FrameRecorder::new(),
                startup_error: None,
            },
        })
    }

    /// Runs the event loop until the window is closed
    pub fn run(mut self) -> Result<()> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop
            .run_app(&mut self.state)
            .map_err(|e| SceneError::Window(format!("event loop failed: {}", e)))?;

        match self.state.startup_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl ViewerState {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(self.config.width, self.config.height));
        let window = event_loop
            .create_window(attributes)
            .map_err(|e| SceneError::Window(format!("failed to create window: {}", e)))?;
        let window_handle = Arc::new(window);
        self.window = Some(window_handle.clone());

        let (width, height) = window_handle.inner_size().into();
        let config = &self.config;
        let mut renderer = pollster::block_on(async move {
            RenderEngine::new(window_handle, width, height, config).await
        })?;
        self.camera_manager.camera.resize_projection(width, height);

        let prepared = {
            let mut loader = renderer.texture_loader();
            self.scene
                .prepare_scene(&mut self.frame, &mut loader, &self.config.texture_dir)
        };
        if !prepared.missing_textures.is_empty() {
            log::warn!(
                "Missing textures in {}: {}",
                self.config.texture_dir.display(),
                prepared.missing_textures.join(", ")
            );
        }
        self.scene
            .bind_textures(|slot, texture| renderer.bind_texture(slot, texture));

        self.render_engine = Some(renderer);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        let camera = self.camera_manager.update();
        self.frame.begin_frame();
        self.scene.render_scene(&mut self.frame);

        match render_engine.render_frame(&mut self.frame, camera) {
            Ok(()) => {}
            Err(SceneError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                render_engine.reconfigure();
            }
            Err(SceneError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                log::error!("Out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(err) => log::warn!("Frame skipped: {}", err),
        }
    }

    fn shutdown(&mut self) {
        if let Some(render_engine) = self.render_engine.as_mut() {
            render_engine.clear_texture_bindings();
            let mut loader = render_engine.texture_loader();
            self.scene.destroy_textures(&mut loader);
        }
    }
}

impl ApplicationHandler for ViewerState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            log::error!("Could not start the viewer: {}", err);
            self.startup_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let KeyEvent {
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    state: ElementState::Pressed,
                    ..
                } = event
                {
                    event_loop.exit();
                    return;
                }
                self.camera_manager.process_keyboard_event(&event);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.camera_manager.camera.resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        self.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
        log::info!("Viewer closed");
    }
}
