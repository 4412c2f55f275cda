// src/ui/manager.rs
//! ImGui overlay manager
//!
//! Wraps the ImGui context with its winit platform and wgpu renderer. A frame
//! is built with [`UiManager::build_frame`] before the scene pass and drawn
//! with [`UiManager::render`] into the same color target afterwards.

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::{Window, WindowId},
};

const FONT_SIZE: f32 = 18.0;

pub struct UiManager {
    context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    /// Creates the overlay for a window whose surface uses `output_color_format`.
    ///
    /// DPI is locked to 1.0 so panel sizes are in physical pixels.
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: FONT_SIZE,
                ..Default::default()
            }),
        }]);

        // sRGB targets need the sRGB-aware imgui shader or colours wash out
        let mut renderer_config = if output_color_format.is_srgb() {
            RendererConfig::new_srgb()
        } else {
            RendererConfig::new()
        };
        renderer_config.texture_format = output_color_format;
        let renderer = Renderer::new(&mut context, device, queue, renderer_config);

        log::debug!("UI overlay ready ({:?})", output_color_format);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    /// Feeds a window event to ImGui.
    ///
    /// Returns true when the overlay captured the event, in which case camera
    /// controls should ignore it.
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        window_id: WindowId,
        event: &WindowEvent,
    ) -> bool {
        if !matches!(
            event,
            WindowEvent::CursorMoved { .. }
                | WindowEvent::MouseInput { .. }
                | WindowEvent::MouseWheel { .. }
                | WindowEvent::KeyboardInput { .. }
                | WindowEvent::ModifiersChanged(_)
                | WindowEvent::Focused(_)
        ) {
            return false;
        }

        let wrapped: Event<()> = Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        self.platform
            .handle_event(self.context.io_mut(), window, &wrapped);

        self.wants_mouse() || self.wants_keyboard()
    }

    pub fn wants_mouse(&self) -> bool {
        self.context.io().want_capture_mouse
    }

    pub fn wants_keyboard(&self) -> bool {
        self.context.io().want_capture_keyboard
    }

    /// Starts a new ImGui frame and lets `build` lay out the panels
    pub fn build_frame<F>(&mut self, window: &Window, build: F)
    where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(err) = self.platform.prepare_frame(self.context.io_mut(), window) {
            log::warn!("Failed to prepare UI frame: {}", err);
        }

        let ui = self.context.frame();
        build(ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(ui, window);
        }
    }

    /// Draws the last built frame over the scene already in `color_attachment`
    pub fn render(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        color_attachment: &TextureView,
    ) {
        let draw_data = self.context.render();

        // Minimised windows report a zero display size
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("UI Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_attachment,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(err) = self
            .renderer
            .render(draw_data, queue, device, &mut render_pass)
        {
            log::error!("Failed to render UI overlay: {}", err);
        }
    }
}
