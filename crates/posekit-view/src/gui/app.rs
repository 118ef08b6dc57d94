use anyhow::Result;
use egui_wgpu::winit::Painter;
use egui_wgpu::{RenderState, RendererOptions, WgpuConfiguration, WgpuSetup, WgpuSetupCreateNew};
use egui_winit::State as EguiWinitState;
use posekit_geometry::Point2;
use posekit_io::{load_image, load_obj};
use posekit_view::config::{PowerPreference, ViewerConfig};
use posekit_view::viewer::{
    FrameRenderer, GpuRenderer, InteractionMapper, PointerButtons, SceneStore, TransformState,
    ViewerInput, WHEEL_UNITS_PER_LINE,
};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};

use super::status::{StatusLine, format_pose};

const WINDOW_TITLE: &str = "Pose Annotation Tool";
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

const LOAD_IMAGE_SHORTCUT: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
const LOAD_MODEL_SHORTCUT: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::M);
const EXIT_SHORTCUT: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);

/// Files named on the command line, loaded before the first frame.
#[derive(Default)]
pub struct Preload {
    pub image: Option<PathBuf>,
    pub model: Option<PathBuf>,
}

pub fn run_gui(config: ViewerConfig, preload: Preload) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|err| anyhow::anyhow!(err.to_string()))?;
    let window = event_loop
        .create_window(
            winit::window::Window::default_attributes()
                .with_title(WINDOW_TITLE)
                .with_inner_size(LogicalSize::new(config.window_width, config.window_height)),
        )
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    let window = Arc::new(window);

    let egui_ctx = egui::Context::default();
    let mut painter = create_painter(egui_ctx.clone(), config.power_preference)?;
    pollster::block_on(painter.set_window(egui::ViewportId::ROOT, Some(window.clone())))
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    let render_state = painter
        .render_state()
        .ok_or_else(|| anyhow::anyhow!("wgpu render state not initialized"))?;

    let mut egui_state = EguiWinitState::new(
        egui_ctx.clone(),
        egui::ViewportId::ROOT,
        &event_loop,
        Some(window.scale_factor() as f32),
        window.theme(),
        painter.max_texture_side(),
    );

    let mut app = PoseApp::new(
        render_state.device.clone(),
        render_state.queue.clone(),
        &config,
    );
    if let Some(path) = preload.image {
        app.load_image_from(&path);
    }
    if let Some(path) = preload.model {
        app.load_model_from(&path);
    }

    let clear_color = egui_ctx.style().visuals.window_fill;
    let [r, g, b, a] = clear_color.to_array();
    let clear_color = [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    ];
    let mut next_repaint: Option<Instant> = Some(Instant::now());

    #[allow(deprecated)]
    event_loop
        .run(move |event, event_loop| {
            event_loop.set_control_flow(ControlFlow::Wait);
            match event {
                Event::WindowEvent { event, window_id } if window_id == window.id() => {
                    if matches!(event, WindowEvent::CloseRequested) {
                        event_loop.exit();
                        return;
                    }

                    let response = egui_state.on_window_event(&window, &event);
                    if response.repaint {
                        window.request_redraw();
                    }

                    match event {
                        WindowEvent::Resized(size) => {
                            if let (Some(width), Some(height)) =
                                (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                            {
                                painter.on_window_resized(egui::ViewportId::ROOT, width, height);
                            }
                            window.request_redraw();
                        }
                        WindowEvent::ScaleFactorChanged { .. } => {
                            let size = window.inner_size();
                            if let (Some(width), Some(height)) =
                                (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                            {
                                painter.on_window_resized(egui::ViewportId::ROOT, width, height);
                            }
                            window.request_redraw();
                        }
                        WindowEvent::RedrawRequested => {
                            let raw_input = egui_state.take_egui_input(&window);
                            let full_output = egui_ctx.run(raw_input, |ctx| {
                                app.ui(ctx, &render_state);
                            });

                            egui_state.handle_platform_output(&window, full_output.platform_output);

                            let clipped_primitives = egui_ctx
                                .tessellate(full_output.shapes, full_output.pixels_per_point);
                            let _ = painter.paint_and_update_textures(
                                egui::ViewportId::ROOT,
                                full_output.pixels_per_point,
                                clear_color,
                                &clipped_primitives,
                                &full_output.textures_delta,
                                Vec::new(),
                            );

                            if app.exit_requested {
                                event_loop.exit();
                                return;
                            }

                            next_repaint = full_output
                                .viewport_output
                                .get(&egui::ViewportId::ROOT)
                                .and_then(|output| Instant::now().checked_add(output.repaint_delay));
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    if let Some(deadline) = next_repaint {
                        if deadline <= Instant::now() {
                            next_repaint = None;
                            window.request_redraw();
                        } else {
                            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
                        }
                    }
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;

    Ok(())
}

fn create_painter(ctx: egui::Context, preference: PowerPreference) -> Result<Painter> {
    let mut configuration = WgpuConfiguration::default();
    let power_preference = match preference {
        PowerPreference::High => wgpu::PowerPreference::HighPerformance,
        PowerPreference::Default => wgpu::PowerPreference::default(),
        PowerPreference::Low => wgpu::PowerPreference::LowPower,
    };
    configuration.wgpu_setup = WgpuSetup::CreateNew(WgpuSetupCreateNew {
        power_preference,
        device_descriptor: Arc::new(|adapter| {
            let required_limits =
                wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());
            wgpu::DeviceDescriptor {
                label: Some("posekit-view"),
                required_features: wgpu::Features::empty(),
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::default(),
            }
        }),
        ..Default::default()
    });

    let painter = pollster::block_on(Painter::new(
        ctx,
        configuration,
        false,
        RendererOptions::default(),
    ));
    Ok(painter)
}

struct PoseApp {
    scene: SceneStore,
    pose: TransformState,
    mapper: InteractionMapper,
    frame_renderer: FrameRenderer,
    gpu_renderer: GpuRenderer,
    status: StatusLine,
    exit_requested: bool,
    render_texture_id: Option<egui::TextureId>,
    render_texture_revision: u64,
}

impl PoseApp {
    fn new(device: wgpu::Device, queue: wgpu::Queue, config: &ViewerConfig) -> Self {
        Self {
            scene: SceneStore::default(),
            pose: TransformState::default(),
            mapper: InteractionMapper::default(),
            frame_renderer: FrameRenderer::new(1, 1),
            gpu_renderer: GpuRenderer::new(device, queue),
            status: StatusLine::new(Duration::from_millis(config.status_timeout_ms)),
            exit_requested: false,
            render_texture_id: None,
            render_texture_revision: 0,
        }
    }

    fn ui(&mut self, ctx: &egui::Context, render_state: &RenderState) {
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let load_image = egui::Button::new("Load Image")
                        .shortcut_text(ctx.format_shortcut(&LOAD_IMAGE_SHORTCUT));
                    if ui.add(load_image).clicked() {
                        ui.close();
                        self.pick_image();
                    }
                    let load_model = egui::Button::new("Load 3D Model")
                        .shortcut_text(ctx.format_shortcut(&LOAD_MODEL_SHORTCUT));
                    if ui.add(load_model).clicked() {
                        ui.close();
                        self.pick_model();
                    }
                    ui.separator();
                    let exit = egui::Button::new("Exit")
                        .shortcut_text(ctx.format_shortcut(&EXIT_SHORTCUT));
                    if ui.add(exit).clicked() {
                        ui.close();
                        self.exit_requested = true;
                    }
                });
            });
        });

        let now = Instant::now();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(message) = self.status.current(now) {
                    ui.label(message);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.monospace(format_pose(&self.pose));
                });
            });
        });
        if let Some(remaining) = self.status.remaining(now) {
            ctx.request_repaint_after(remaining);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let available = ui.available_size();
                let (rect, response) = ui.allocate_exact_size(available, egui::Sense::drag());
                self.draw_viewport(ctx, ui, rect, &response, render_state);
            });
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.input_mut(|i| i.consume_shortcut(&LOAD_IMAGE_SHORTCUT)) {
            self.pick_image();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&LOAD_MODEL_SHORTCUT)) {
            self.pick_model();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&EXIT_SHORTCUT)) {
            self.exit_requested = true;
        }
    }

    fn draw_viewport(
        &mut self,
        ctx: &egui::Context,
        ui: &mut egui::Ui,
        rect: egui::Rect,
        response: &egui::Response,
        render_state: &RenderState,
    ) {
        let input = build_input(ctx, rect, response.hovered());
        if self.mapper.handle_input(&mut self.pose, &input) {
            ctx.request_repaint();
        }

        let pixels_per_point = ctx.pixels_per_point();
        let width = (rect.width() * pixels_per_point).round().max(0.0) as u32;
        let height = (rect.height() * pixels_per_point).round().max(0.0) as u32;
        self.frame_renderer.resize(width, height);
        self.frame_renderer
            .render(&mut self.gpu_renderer, &self.scene, &self.pose);
        self.sync_render_texture(render_state);

        if let Some(texture_id) = self.render_texture_id {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter().image(texture_id, rect, uv, egui::Color32::WHITE);
        }
    }

    fn sync_render_texture(&mut self, render_state: &RenderState) {
        let revision = self.gpu_renderer.target_revision();
        if self.render_texture_revision == revision && self.render_texture_id.is_some() {
            return;
        }

        let view = self.gpu_renderer.target_view();
        let mut renderer = render_state.renderer.write();
        let texture_id = if let Some(id) = self.render_texture_id {
            renderer.update_egui_texture_from_wgpu_texture(
                &render_state.device,
                view,
                wgpu::FilterMode::Linear,
                id,
            );
            id
        } else {
            renderer.register_native_texture(&render_state.device, view, wgpu::FilterMode::Linear)
        };
        self.render_texture_id = Some(texture_id);
        self.render_texture_revision = revision;
    }

    fn pick_image(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Load Image")
            .add_filter("Image Files", &IMAGE_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .pick_file();
        if let Some(path) = picked {
            self.load_image_from(&path);
        }
    }

    fn pick_model(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Load 3D Model")
            .add_filter("OBJ Files", &["obj"])
            .add_filter("All Files", &["*"])
            .pick_file();
        if let Some(path) = picked {
            self.load_model_from(&path);
        }
    }

    fn load_image_from(&mut self, path: &Path) {
        match load_image(path) {
            Ok(image) => {
                tracing::info!(
                    path = %path.display(),
                    width = image.width(),
                    height = image.height(),
                    "background image loaded"
                );
                self.scene.set_background(image);
                self.status
                    .show(format!("Loaded image: {}", path.display()));
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %format!("{err:#}"), "image load failed");
                self.status.show(format!("Error loading image: {err:#}"));
            }
        }
    }

    fn load_model_from(&mut self, path: &Path) {
        match load_obj(path) {
            Ok(mesh) => {
                tracing::info!(
                    path = %path.display(),
                    vertices = mesh.vertices.len(),
                    faces = mesh.faces.len(),
                    "model loaded"
                );
                self.scene.set_mesh(mesh);
                self.status
                    .show(format!("Loaded 3D model: {}", path.display()));
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %format!("{err:#}"), "model load failed");
                self.status.show(format!("Error loading 3D model: {err:#}"));
            }
        }
    }
}

/// Collects this frame's pointer activity relative to the viewport's top-left
/// corner. Presses and wheel motion only count over the viewport; moves and
/// releases are tracked everywhere so a drag can leave the viewport.
fn build_input(ctx: &egui::Context, rect: egui::Rect, hovered: bool) -> ViewerInput {
    ctx.input(|i| {
        let pointer = &i.pointer;
        let pointer_pos = pointer
            .interact_pos()
            .map(|pos| Point2::new(pos.x - rect.min.x, pos.y - rect.min.y));
        let scroll_delta = if hovered {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::MouseWheel { unit, delta, .. } => Some(match unit {
                        egui::MouseWheelUnit::Point => delta.y,
                        egui::MouseWheelUnit::Line | egui::MouseWheelUnit::Page => {
                            delta.y * WHEEL_UNITS_PER_LINE
                        }
                    }),
                    _ => None,
                })
                .sum()
        } else {
            0.0
        };

        ViewerInput {
            pointer_pos,
            pointer_moved: pointer.delta() != egui::Vec2::ZERO,
            pressed: hovered && pointer.any_pressed(),
            released: pointer.any_released() && !pointer.any_down(),
            any_down: pointer.any_down(),
            buttons: PointerButtons {
                primary: pointer.button_down(egui::PointerButton::Primary),
                secondary: pointer.button_down(egui::PointerButton::Secondary),
            },
            scroll_delta,
        }
    })
}
