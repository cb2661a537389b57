// Process entry: load configuration, initialize logging, open a window,
// bootstrap the Vulkan context, then pump events until close is requested.
//
// All setup errors surface here. The event loop records them, main reports
// them once, and the process exits non-zero. Success exits zero after the
// context has torn everything down in reverse creation order.

use anyhow::Result;
use vulkan_bootstrap::backend::VulkanContext;
use vulkan_bootstrap::config::Config;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

fn main() -> Result<()> {
    let config = Config::load();
    init_logging();
    log::info!("Starting Vulkan bootstrap");
    log::info!(
        "Window: {}x{} \"{}\"",
        config.window.width,
        config.window.height,
        config.window.title
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.startup_error.take() {
        return Err(err);
    }
    Ok(())
}

fn init_logging() {
    use env_logger::Builder;
    use log::LevelFilter;

    let mut builder = Builder::from_default_env();
    builder.filter_level(LevelFilter::Info);
    builder.init();
}

/// Application state for the winit event loop.
///
/// Field order matters: the Vulkan context must be dropped before the
/// window its surface points at.
struct App {
    config: Config,
    context: Option<VulkanContext>,
    window: Option<Window>,
    startup_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config) -> Self {
        Self {
            config,
            context: None,
            window: None,
            startup_error: None,
        }
    }
}

impl ApplicationHandler for App {
    /// Called when the application is ready to create windows.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        // Fixed-size window; resize handling belongs to the render loop,
        // which does not exist yet.
        let attributes = WindowAttributes::default()
            .with_title(&self.config.window.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ))
            .with_resizable(false);

        let window = match event_loop.create_window(attributes) {
            Ok(w) => w,
            Err(e) => {
                log::error!("Failed to create window: {e}");
                self.startup_error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        match VulkanContext::create(
            &window,
            &self.config.window.title,
            self.config.validation(),
        ) {
            Ok(context) => {
                log::info!(
                    "Vulkan ready (graphics queue family {:?}, diagnostics {})",
                    context.queue_families().graphics_family,
                    if context.diagnostics_active() { "on" } else { "off" }
                );
                self.context = Some(context);
            }
            Err(e) => {
                log::error!("Vulkan setup failed: {e}");
                self.startup_error = Some(e.into());
                event_loop.exit();
                return;
            }
        }

        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CloseRequested = event {
            log::info!("Close requested, shutting down...");
            event_loop.exit();
        }
    }
}
