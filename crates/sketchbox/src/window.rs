//! Window management via winit.
//!
//! Implements [`winit::application::ApplicationHandler`] to drive the event
//! loop: window creation, input forwarding to egui, resize, and one
//! simulation frame plus one UI frame per redraw.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::app::App;
use crate::config::SandboxConfig;
use crate::editor::EditorState;
use crate::gpu::GpuContext;
use crate::time::FrameLimiter;

const TITLE: &str = "Sketchbox";

/// Open the window and run until it is closed.
pub fn run(config: SandboxConfig) -> Result<(), winit::error::EventLoopError> {
    let event_loop = winit::event_loop::EventLoop::new()?;
    let mut app = WinitApp::new(App::new(config));
    event_loop.run_app(&mut app)
}

/// The application state that winit drives.
struct WinitApp {
    app: App,
    limiter: FrameLimiter,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    editor: Option<EditorState>,
}

impl WinitApp {
    fn new(app: App) -> Self {
        let limiter = FrameLimiter::new(app.config.target_fps);
        Self {
            app,
            limiter,
            window: None,
            gpu: None,
            editor: None,
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(e) = self.app.frame() {
            log::error!("Physics world out of sync: {e}");
            event_loop.exit();
            return;
        }

        let (Some(window), Some(gpu), Some(editor)) = (&self.window, &mut self.gpu, &mut self.editor) else {
            return;
        };

        editor.build_ui(&mut self.app, window);

        match gpu.render_frame(self.app.ui.clear_color, |frame| editor.render_overlay(frame)) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = gpu.surface_size();
                gpu.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory!");
                event_loop.exit();
            }
            Err(e) => {
                log::warn!("Surface error: {:?}", e);
            }
        }

        self.limiter.wait();
        window.request_redraw();
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.app.config.screen_width as f64,
                self.app.config.screen_height as f64,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let gpu = match GpuContext::new(window.clone()) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("{e}");
                event_loop.exit();
                return;
            }
        };
        self.editor = Some(EditorState::new(&gpu, &window));
        self.gpu = Some(gpu);
        log::info!("Window created");

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let (Some(window), Some(editor)) = (&self.window, &mut self.editor) {
            if editor.on_window_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                    && event.state == ElementState::Pressed
                {
                    log::info!("Escape pressed, exiting.");
                    event_loop.exit();
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}
