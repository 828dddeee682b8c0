//! Main application: window, GPU surface and egui integration.

use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;

use kurbo::{Point, Size};
use pocketcalc_core::{MouseButton, PanelConfig};
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;

use crate::event_handler::EventHandler;
use crate::surface::HostSurface;
use crate::ui::{render_ui, UiState};

/// Environment variable naming a JSON panel config file.
pub const CONFIG_ENV: &str = "POCKETCALC_CONFIG";

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("No suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("Failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("Surface is not supported by the adapter")]
    UnsupportedSurface,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: wgpu::Color,
    pub panel: PanelConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "PocketCalc".to_string(),
            width: 1280,
            height: 800,
            background_color: wgpu::Color {
                r: 0.12,
                g: 0.13,
                b: 0.15,
                a: 1.0,
            },
            panel: PanelConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, with the panel config read from `POCKETCALC_CONFIG` if set.
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_ENV);
        Self {
            panel: load_panel_config(path.as_deref().map(Path::new)),
            ..Self::default()
        }
    }
}

/// Load a panel config, falling back to defaults on any error.
fn load_panel_config(path: Option<&Path>) -> PanelConfig {
    let Some(path) = path else {
        return PanelConfig::default();
    };
    match PanelConfig::load(path) {
        Ok(panel) => {
            log::info!("Loaded panel config from {}", path.display());
            panel
        }
        Err(e) => {
            log::warn!("Ignoring {}: {}", CONFIG_ENV, e);
            PanelConfig::default()
        }
    }
}

/// Log level from a `?log=debug` style query string or hash. Defaults to info.
pub fn log_level_from_query(query: &str) -> log::Level {
    query
        .trim_start_matches(['?', '#'])
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "log")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(log::Level::Info)
}

/// GPU resources tied to the window surface.
struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl GpuState {
    async fn new(window: Arc<Window>) -> Result<Self, AppError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("pocketcalc device"),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            })
            .await?;

        let size = window.inner_size();
        let mut config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or(AppError::UnsupportedSurface)?;
        // egui-wgpu blends in gamma space and expects a non-sRGB target.
        let capabilities = surface.get_capabilities(&adapter);
        if let Some(format) = capabilities.formats.iter().copied().find(|f| !f.is_srgb()) {
            config.format = format;
        }
        config.present_mode = wgpu::PresentMode::AutoVsync;
        surface.configure(&device, &config);

        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            config.format,
            egui_wgpu::RendererOptions::default(),
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }
}

/// Per-window state, created once the GPU is ready.
struct AppState {
    window: Arc<Window>,
    gpu: GpuState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    ui_state: UiState,
    handler: EventHandler,
}

impl AppState {
    fn new(window: Arc<Window>, gpu: GpuState, panel: PanelConfig) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let surface = Rc::new(HostSurface::new());
        let mut state = Self {
            window,
            gpu,
            egui_ctx,
            egui_state,
            ui_state: UiState::new(surface.clone()),
            handler: EventHandler::new(panel, surface),
        };
        let viewport = state.viewport();
        state.handler.open(viewport);
        state
    }

    fn pixels_per_point(&self) -> f64 {
        f64::from(egui_winit::pixels_per_point(&self.egui_ctx, &self.window))
    }

    /// Window size in egui points.
    fn viewport(&self) -> Size {
        let size = self.window.inner_size();
        let ppp = self.pixels_per_point();
        Size::new(f64::from(size.width) / ppp, f64::from(size.height) / ppp)
    }

    fn to_points(&self, position: PhysicalPosition<f64>) -> Point {
        let ppp = self.pixels_per_point();
        Point::new(position.x / ppp, position.y / ppp)
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.gpu.resize(size);
        let viewport = self.viewport();
        self.handler.set_viewport(viewport);
    }

    fn render(&mut self, background: wgpu::Color) {
        let egui_input = self.egui_state.take_egui_input(&self.window);
        let mut action = None;
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            action = render_ui(ctx, &mut self.ui_state, self.handler.calculator());
        });

        self.handler.set_chrome_hovered(self.ui_state.chrome_hovered);
        let mut needs_redraw = false;
        if let Some(action) = action {
            let viewport = self.viewport();
            needs_redraw = self.handler.handle_action(action, viewport);
        }

        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        let egui_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        let surface_texture = match self.gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.surface.configure(&self.gpu.device, &self.gpu.config);
                self.window.request_redraw();
                return;
            }
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let device = &self.gpu.device;
        let queue = &self.gpu.queue;
        let renderer = &mut self.gpu.egui_renderer;

        for (id, image_delta) in &egui_output.textures_delta.set {
            renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui encoder"),
        });
        let user_buffers = renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &egui_primitives,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(background),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static render pass
            let mut render_pass = render_pass.forget_lifetime();
            renderer.render(&mut render_pass, &egui_primitives, &screen_descriptor);
        }

        queue.submit(user_buffers.into_iter().chain(std::iter::once(encoder.finish())));

        for id in &egui_output.textures_delta.free {
            renderer.free_texture(id);
        }
        surface_texture.present();

        // Keep animating while egui asks for an immediate repaint (press feedback).
        let animating = egui_output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .is_some_and(|viewport| viewport.repaint_delay.is_zero());
        if needs_redraw || animating {
            self.window.request_redraw();
        }
    }
}

fn convert_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Main application.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    /// GPU setup finishing asynchronously on the web.
    #[cfg(target_arch = "wasm32")]
    pending: Rc<RefCell<Option<(Arc<Window>, Result<GpuState, AppError>)>>>,
    /// First fatal error; returned from `run`.
    error: Option<AppError>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            #[cfg(target_arch = "wasm32")]
            pending: Rc::new(RefCell::new(None)),
            error: None,
        }
    }

    /// Run the application until the window closes.
    pub async fn run() -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        let app = App::new(AppConfig::from_env());

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            event_loop.run_app(&mut app)?;
            if let Some(e) = app.error.take() {
                return Err(e);
            }
        }

        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{}", error);
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    fn finish_init(&mut self, window: Arc<Window>, gpu: GpuState) {
        log::info!(
            "Surface ready: {}x{} {:?}",
            gpu.config.width,
            gpu.config.height,
            gpu.config.format
        );
        let state = AppState::new(window, gpu, self.config.panel.clone());
        state.window.request_redraw();
        self.state = Some(state);
    }

    #[cfg(target_arch = "wasm32")]
    fn poll_pending(&mut self, event_loop: &ActiveEventLoop) {
        let Some((window, result)) = self.pending.borrow_mut().take() else {
            return;
        };
        match result {
            Ok(gpu) => self.finish_init(window, gpu),
            Err(e) => self.fail(event_loop, e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        #[cfg(not(target_arch = "wasm32"))]
        let attributes = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        #[cfg(target_arch = "wasm32")]
        let attributes = {
            use winit::platform::web::WindowAttributesExtWebSys;
            Window::default_attributes()
                .with_title(&self.config.title)
                .with_append(true)
        };

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        log::info!("Window created");

        #[cfg(not(target_arch = "wasm32"))]
        match pollster::block_on(GpuState::new(window.clone())) {
            Ok(gpu) => self.finish_init(window, gpu),
            Err(e) => self.fail(event_loop, e),
        }

        #[cfg(target_arch = "wasm32")]
        {
            let pending = self.pending.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = GpuState::new(window.clone()).await;
                window.request_redraw();
                *pending.borrow_mut() = Some((window, result));
            });
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        #[cfg(target_arch = "wasm32")]
        self.poll_pending(event_loop);

        let background = self.config.background_color;
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        let mut needs_redraw = egui_response.repaint;

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
                return;
            }
            WindowEvent::Resized(size) => {
                state.resize(size);
                needs_redraw = true;
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = state.window.inner_size();
                state.resize(size);
                needs_redraw = true;
            }
            WindowEvent::RedrawRequested => {
                state.render(background);
                return;
            }
            // Drag moves and releases come from the window, not egui, so the
            // panel keeps following the pointer outside its own bounds.
            WindowEvent::CursorMoved { position, .. } => {
                let point = state.to_points(position);
                needs_redraw |= state.handler.cursor_moved(point);
            }
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                if let Some(button) = convert_button(button) {
                    let pressed = button_state == ElementState::Pressed;
                    needs_redraw |= state.handler.mouse_input(button, pressed);
                }
            }
            WindowEvent::Focused(false) => {
                needs_redraw |= state.handler.cancel();
            }
            _ => {}
        }

        if needs_redraw {
            state.window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.title, "PocketCalc");
        assert_eq!(config.panel, PanelConfig::default());
    }

    #[test]
    fn test_panel_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "width": 400 }}"#).unwrap();

        let panel = load_panel_config(Some(file.path()));
        assert!((panel.width - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bad_panel_config_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert_eq!(load_panel_config(Some(file.path())), PanelConfig::default());
        assert_eq!(load_panel_config(None), PanelConfig::default());
    }

    #[test]
    fn test_log_level_from_query() {
        assert_eq!(log_level_from_query("?log=debug"), log::Level::Debug);
        assert_eq!(log_level_from_query("#log=warn"), log::Level::Warn);
        assert_eq!(log_level_from_query("?room=a&log=TRACE"), log::Level::Trace);
        assert_eq!(log_level_from_query("?log=loud"), log::Level::Info);
        assert_eq!(log_level_from_query("?log"), log::Level::Info);
        assert_eq!(log_level_from_query(""), log::Level::Info);
    }

    #[test]
    fn test_convert_button() {
        assert_eq!(
            convert_button(winit::event::MouseButton::Left),
            Some(MouseButton::Left)
        );
        assert_eq!(convert_button(winit::event::MouseButton::Back), None);
    }
}
