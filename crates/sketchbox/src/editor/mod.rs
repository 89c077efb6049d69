//! egui front end: Control, Canvas, and Rendering windows.
//!
//! Feature-gated behind `#[cfg(feature = "editor")]`. [`EditorState`] owns the
//! egui context, the winit input bridge, and the wgpu renderer. It is stored
//! in the window loop rather than in [`App`] because `egui_winit::State` is
//! tied to the window.

mod canvas;
mod control;
mod file_dialog;
mod viewport;

use std::sync::Arc;

use crate::app::App;
use crate::gpu::{FrameContext, GpuContext};

pub use viewport::PainterRenderer;

/// egui state plus the prepared paint jobs for the current frame.
pub struct EditorState {
    pub egui_ctx: egui::Context,
    pub egui_winit: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    dialog: file_dialog::FileDialog,
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    frame_ready: bool,
}

impl EditorState {
    pub fn new(gpu: &GpuContext, window: &Arc<winit::window::Window>) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            Some(gpu.device.limits().max_texture_dimension_2d as usize),
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.surface_format(),
            egui_wgpu::RendererOptions::default(),
        );

        Self {
            egui_ctx,
            egui_winit,
            egui_renderer,
            dialog: file_dialog::FileDialog::default(),
            paint_jobs: Vec::new(),
            textures_delta: egui::TexturesDelta::default(),
            frame_ready: false,
        }
    }

    /// Forward a winit event to egui. Returns true if egui consumed it.
    pub fn on_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        self.egui_winit.on_window_event(window, event).consumed
    }

    /// Build all windows for this frame.
    pub fn build_ui(&mut self, app: &mut App, window: &winit::window::Window) {
        let raw_input = self.egui_winit.take_egui_input(window);
        let dialog = &mut self.dialog;

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            control::control_window(ctx, app);
            canvas::canvas_window(ctx, app, dialog);
            viewport::rendering_window(ctx, app);
            dialog.show(ctx, app);
        });

        self.egui_winit
            .handle_platform_output(window, full_output.platform_output);

        self.paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        self.textures_delta = full_output.textures_delta;
        self.frame_ready = true;
    }

    /// Paint the prepared UI on top of the current frame.
    pub fn render_overlay(&mut self, frame: &mut FrameContext<'_>) {
        if !self.frame_ready {
            return;
        }
        self.frame_ready = false;

        let gpu = frame.gpu;
        let (sw, sh) = gpu.surface_size();

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [sw, sh],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        for (id, delta) in &self.textures_delta.set {
            self.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, delta);
        }

        let cmd_buffers = self.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut frame.encoder,
            &self.paint_jobs,
            &screen_descriptor,
        );
        if !cmd_buffers.is_empty() {
            gpu.queue.submit(cmd_buffers);
        }

        {
            let render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui overlay"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer.render(
                &mut render_pass.forget_lifetime(),
                &self.paint_jobs,
                &screen_descriptor,
            );
        }

        for id in &self.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

/// Convert a sandbox color to an egui color.
pub(crate) fn to_color32(c: crate::math::Color) -> egui::Color32 {
    let c = c.clamped();
    egui::Rgba::from_rgba_unmultiplied(c.r, c.g, c.b, c.a).into()
}
