//! Windowed showcase application
//!
//! Owns the winit event loop. The window, renderer and overlay are created on
//! the first `resumed` call; every redraw advances the [`Stage`], syncs new
//! objects to the GPU and renders the scene with the overlay on top.

use std::{sync::Arc, time::Instant};

use anyhow::{Context, Result};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::{
    assets::{AssetCache, FileAssetProvider},
    config::{ShowcaseConfig, WindowConfig},
    gfx::{
        camera::CameraManager, environment::Environment, rendering::RenderEngine, scene::Scene,
    },
    stage::Stage,
    ui::{annotation_overlay, showcase_panel, UiManager},
};

pub struct ShowcaseApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    window_config: WindowConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    stage: Stage,
    selected_object: Option<usize>,
    started_at: Instant,
    startup_error: Option<anyhow::Error>,
}

impl ShowcaseApp {
    /// Creates the event loop and a stage that loads assets from disk
    pub fn new(config: ShowcaseConfig) -> Result<Self> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;

        let aspect = config.window.width as f32 / config.window.height.max(1) as f32;
        let camera_manager = CameraManager::from_config(&config.camera, aspect);
        let scene = Scene::new(camera_manager, Environment::from(config.environment));

        let cache = AssetCache::new(Arc::new(FileAssetProvider::new()));
        let stage = Stage::new(cache, &config);

        Ok(Self {
            event_loop,
            app_state: AppState {
                window_config: config.window,
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                stage,
                selected_object: None,
                started_at: Instant::now(),
                startup_error: None,
            },
        })
    }

    /// Runs the event loop until the window closes
    pub fn run(mut self) -> Result<()> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop
            .run_app(&mut self.app_state)
            .context("Event loop terminated abnormally")?;

        match self.app_state.startup_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = WindowAttributes::default()
            .with_title(self.window_config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.window_config.width,
                self.window_config.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );

        let (width, height) = window.inner_size().into();
        let renderer = pollster::block_on(RenderEngine::new(window.clone(), width, height))?;

        self.scene
            .camera_manager
            .camera
            .resize_projection(width, height);

        if self.window_config.show_ui {
            self.ui_manager = Some(UiManager::new(
                renderer.device(),
                renderer.queue(),
                renderer.surface_format(),
                &window,
            ));
        }

        self.render_engine = Some(renderer);
        self.window = Some(window);
        self.started_at = Instant::now();
        self.stage.start();
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if matches!(
            event,
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::Escape),
                state: ElementState::Pressed,
                ..
            }
        ) {
            event_loop.exit();
            return;
        }

        let ui_wants_keyboard = self
            .ui_manager
            .as_ref()
            .is_some_and(UiManager::wants_keyboard);
        if !ui_wants_keyboard {
            self.scene.camera_manager.process_keyboard_event(event);
        }
    }

    fn redraw(&mut self) {
        let (Some(render_engine), Some(window)) =
            (self.render_engine.as_mut(), self.window.as_ref())
        else {
            return;
        };

        let elapsed = self.started_at.elapsed().as_secs_f32();
        self.stage.update(&mut self.scene, elapsed);
        self.scene.update();
        self.scene.init_gpu_resources(
            render_engine.device(),
            render_engine.object_bind_group_layout(),
        );
        self.scene.update_all_transforms(render_engine.queue());
        render_engine.update(
            self.scene.camera_manager.camera.uniform,
            &self.scene.environment,
        );

        match self.ui_manager.as_mut() {
            Some(ui_manager) => {
                let (stage, scene, selected) =
                    (&mut self.stage, &mut self.scene, &mut self.selected_object);
                ui_manager.build_frame(window, |ui| {
                    showcase_panel(ui, stage, scene, selected);
                    if let Some(text) = stage.hero_annotation() {
                        annotation_overlay(ui, text);
                    }
                });

                render_engine.render_frame(
                    &self.scene,
                    Some(|device: &wgpu::Device,
                          queue: &wgpu::Queue,
                          encoder: &mut wgpu::CommandEncoder,
                          color_attachment: &wgpu::TextureView| {
                        ui_manager.render(device, queue, encoder, color_attachment);
                    }),
                );
            }
            None => render_engine.render_frame_simple(&self.scene),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init_graphics(event_loop) {
            log::error!("Graphics initialisation failed: {:#}", err);
            self.startup_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Handle UI input first
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            // Keys still reach `handle_key` so Escape always quits
            if ui_manager.handle_window_event(&window, window_id, &event)
                && !matches!(event, WindowEvent::KeyboardInput { .. })
            {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::Focused(false) => self.scene.camera_manager.controller.release_all(),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                log::info!("Window closed, shutting down");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // Check if UI wants to capture input before processing camera events
        if self.ui_manager.as_ref().is_some_and(UiManager::wants_mouse) {
            return;
        }

        self.scene.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::debug!("Showcase ran for {:.1?}", self.started_at.elapsed());
    }
}
