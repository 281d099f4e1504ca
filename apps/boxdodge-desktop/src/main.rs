use anyhow::{Context, Result};
use boxdodge_input::{Action, InputState, KeyBindings};
use boxdodge_kernel::{FrameToken, Session, SessionConfig, SessionState, UiSink};
use boxdodge_render::{RenderView, SceneMirror};
use boxdodge_render_wgpu::BoxRenderer;
use boxdodge_tools::SessionInspector;
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "boxdodge-desktop", about = "Dodge the falling boxes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON session config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON key bindings
    #[arg(short, long)]
    bindings: Option<PathBuf>,
}

/// Which overlay is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Menu {
    Main,
    Instructions,
    Paused,
    GameOver,
    /// Playing, no overlay.
    Hidden,
}

/// Menu state, toggled only by session signals and menu buttons.
struct Menus {
    current: Menu,
}

impl UiSink for Menus {
    fn on_game_over(&mut self) {
        self.current = Menu::GameOver;
    }
    fn on_pause(&mut self) {
        self.current = Menu::Paused;
    }
    fn on_resume(&mut self) {
        self.current = Menu::Hidden;
    }
    fn on_quit(&mut self) {
        self.current = Menu::Main;
    }
}

/// Application state.
struct AppState {
    session: Session,
    scene: SceneMirror,
    input: InputState,
    bindings: KeyBindings,
    menus: Menus,
    token: Option<FrameToken>,
    show_hud: bool,
    exit_requested: bool,
}

impl AppState {
    fn new(config: SessionConfig, bindings: KeyBindings) -> Result<Self> {
        let mut session = Session::new(config)?;
        let mut scene = SceneMirror::new();
        scene.update(&mut session);
        Ok(Self {
            session,
            scene,
            input: InputState::new(),
            bindings,
            menus: Menus {
                current: Menu::Main,
            },
            token: None,
            show_hud: true,
            exit_requested: false,
        })
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed && key == KeyCode::F1 {
            self.show_hud = !self.show_hud;
            return;
        }
        let code = format!("{key:?}");
        let action = self.bindings.handle_key(&self.input, &code, pressed);
        // Pausing happens in the tick; resuming from the keyboard happens here.
        if pressed && action == Some(Action::Pause) && self.session.state() == SessionState::Paused
        {
            self.resume();
        }
    }

    /// Run one frame if the session has one scheduled, then mirror the result.
    fn frame(&mut self) {
        if let Some(token) = self.token {
            self.token = self.session.on_frame(token, &self.input.snapshot());
        }
        self.scene.update(&mut self.session);
        self.session.dispatch_signals(&mut self.menus);
    }

    fn start(&mut self) {
        match self.session.start() {
            Ok(token) => {
                self.token = Some(token);
                self.menus.current = Menu::Hidden;
            }
            Err(e) => tracing::warn!("start: {e}"),
        }
    }

    fn resume(&mut self) {
        if let Ok(token) = self.session.resume() {
            self.token = Some(token);
        }
    }

    fn restart(&mut self) {
        if let Ok(token) = self.session.restart() {
            self.token = Some(token);
        }
    }

    fn quit_to_menu(&mut self) {
        self.session.quit();
        self.token = None;
        self.input.clear();
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if self.show_hud && self.menus.current == Menu::Hidden {
            let summary = SessionInspector::summary(&self.session);
            egui::Area::new(egui::Id::new("hud"))
                .anchor(egui::Align2::LEFT_TOP, [12.0, 12.0])
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new(format!("Frame {}", summary.frame)).heading());
                    ui.label(format!(
                        "Obstacles: {}  Spawn every {}",
                        summary.obstacle_count, summary.spawn_interval
                    ));
                });
        }

        let title = match self.menus.current {
            Menu::Hidden => return,
            Menu::Main => "Box Dodge",
            Menu::Instructions => "How to play",
            Menu::Paused => "Paused",
            Menu::GameOver => "Game Over",
        };

        egui::Window::new(title)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| match self.menus.current {
                Menu::Main => {
                    if ui.button("Start").clicked() {
                        self.start();
                    }
                    if ui.button("Instructions").clicked() {
                        self.menus.current = Menu::Instructions;
                    }
                    if ui.button("Exit").clicked() {
                        self.exit_requested = true;
                    }
                }
                Menu::Instructions => {
                    ui.label("Dodge the red boxes sliding toward you.");
                    for action in Action::ALL {
                        let codes = self.bindings.codes_for(action).join(", ");
                        ui.label(format!("{action}: {codes}"));
                    }
                    if ui.button("Back").clicked() {
                        self.menus.current = Menu::Main;
                    }
                }
                Menu::Paused => {
                    if ui.button("Resume").clicked() {
                        self.resume();
                    }
                    if ui.button("Restart").clicked() {
                        self.restart();
                    }
                    if ui.button("Main menu").clicked() {
                        self.quit_to_menu();
                    }
                }
                Menu::GameOver => {
                    ui.label(format!("You lasted {} frames", self.session.frame()));
                    if ui.button("Play again").clicked() {
                        self.restart();
                    }
                    if ui.button("Main menu").clicked() {
                        self.quit_to_menu();
                    }
                }
                Menu::Hidden => {}
            });
    }
}

/// Surface, device and the two renderers drawing into it.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    boxes: BoxRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Box Dodge")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("boxdodge_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let boxes = BoxRenderer::new(&device, format, config.width, config.height);
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            boxes,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.boxes
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn draw(&mut self, egui_ctx: &EguiContext, state: &mut AppState) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let view = RenderView::from(state.session.camera());
        self.boxes
            .render(&self.device, &self.queue, &target, &state.scene, &view);

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| state.draw_ui(ctx));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);
        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer.render(&mut pass, &paint_jobs, &screen);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        output.present();
    }
}

struct App {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        if gpu.egui_winit.on_window_event(&gpu.window, &event).consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.state.session.quit();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => gpu.resize(size),
            WindowEvent::Focused(false) => self.state.input.clear(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::RedrawRequested => {
                self.state.frame();
                gpu.draw(&self.egui_ctx, &mut self.state);
                if self.state.exit_requested {
                    self.state.session.quit();
                    event_loop.exit();
                    return;
                }
                gpu.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn load_bindings(path: Option<&PathBuf>) -> Result<KeyBindings> {
    let Some(path) = path else {
        return Ok(KeyBindings::default());
    };
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SessionConfig::default(),
    };
    let bindings = load_bindings(cli.bindings.as_ref())?;
    tracing::info!("boxdodge-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App {
        state: AppState::new(config, bindings)?,
        gpu: None,
        egui_ctx: EguiContext::default(),
    };
    event_loop.run_app(&mut app)?;

    Ok(())
}
