//! Window and OpenGL context bootstrap.
//!
//! One winit window with a glutin 3.3 core-profile context made current on
//! its surface, and a [`glow`] function table loaded from that context.

use std::num::NonZeroU32;
use std::sync::Arc;

use glow::HasContext;
use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version,
};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use raw_window_handle::HasWindowHandle;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::config::WindowConfig;
use crate::debug;
use crate::error::{Error, Result};
use crate::types::SurfaceSize;

/// A window with a current GL context.
///
/// Fields drop in declaration order: the GL function table first, then the
/// surface and context, and the window last.
pub struct WindowContext {
    gl: Arc<glow::Context>,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
}

impl WindowContext {
    /// Create the window, a 3.3 core context and its surface, make the
    /// context current and load GL.
    ///
    /// Also installs the debug message callback (when available), applies
    /// the swap interval, and sets the clear color.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Window`] if the window or display cannot be created
    /// and [`Error::Context`] if the context or surface cannot be created
    /// or made current.
    ///
    /// # Panics
    ///
    /// Panics if the display reports no framebuffer configuration matching
    /// the RGBA8/D24S8 template.
    pub fn new(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self> {
        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height));

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_depth_size(24)
            .with_stencil_size(8);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes.clone()))
            .build(event_loop, template, pick_config)
            .map_err(|err| Error::Window(err.to_string()))?;

        let raw_window_handle = window
            .as_ref()
            .and_then(|window| window.window_handle().ok())
            .map(|handle| handle.as_raw());

        let gl_display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .with_debug(config.debug_context)
            .build(raw_window_handle);

        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|err| Error::Context(err.to_string()))?;

        let window = match window {
            Some(window) => window,
            None => glutin_winit::finalize_window(event_loop, attributes, &gl_config)
                .map_err(|err| Error::Window(err.to_string()))?,
        };

        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .map_err(|err| Error::Window(err.to_string()))?;
        let gl_surface =
            unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
                .map_err(|err| Error::Context(err.to_string()))?;

        let gl_context = not_current
            .make_current(&gl_surface)
            .map_err(|err| Error::Context(err.to_string()))?;

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(err) = gl_surface.set_swap_interval(&gl_context, interval) {
            log::warn!("failed to set swap interval: {err}");
        }

        let mut gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| gl_display.get_proc_address(symbol))
        };

        let version = gl.version();
        log::info!(
            "Loaded OpenGL {}.{} ({})",
            version.major,
            version.minor,
            version.vendor_info
        );

        let [r, g, b, a] = config.clear_color;
        unsafe {
            if config.debug_context {
                debug::install_debug_callback(&mut gl);
            }
            gl.clear_color(r, g, b, a);
        }

        Ok(Self {
            gl: Arc::new(gl),
            gl_surface,
            gl_context,
            window,
        })
    }

    /// The GL function table for the current context.
    #[must_use]
    pub fn gl(&self) -> &Arc<glow::Context> {
        &self.gl
    }

    /// The underlying winit window.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Current inner size in physical pixels.
    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        self.window.inner_size().into()
    }

    /// Resize the drawable. Required on platforms (Wayland, EGL) where the
    /// surface does not track the window by itself; a no-op elsewhere.
    pub fn resize_surface(&self, size: SurfaceSize) {
        if let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        {
            self.gl_surface.resize(&self.gl_context, width, height);
        }
    }

    /// Present the back buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Context`] if the swap fails (for example after a
    /// context loss).
    pub fn swap_buffers(&self) -> Result<()> {
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .map_err(|err| Error::Context(err.to_string()))
    }
}

/// Prefer a hardware-accelerated configuration, otherwise take the first
/// one offered.
fn pick_config(mut configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    let first = configs
        .next()
        .expect("display offered no matching framebuffer configuration");
    if first.hardware_accelerated() {
        return first;
    }
    configs
        .find(GlConfig::hardware_accelerated)
        .unwrap_or(first)
}
