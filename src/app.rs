//! The render loop shared by both demo programs.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::config::WindowConfig;
use crate::error::{Error, Result};
use crate::types::{SurfaceSize, WindowState};
use crate::window::WindowContext;

/// A demo program driven by [`run`].
///
/// All methods are called with the demo's GL context current.
pub trait Demo: Sized {
    /// Name used in log output.
    const NAME: &'static str;

    /// Compile programs and allocate GL objects for a window of `size`.
    ///
    /// # Safety
    ///
    /// The `gl` context must be current. [`destroy`](Self::destroy) is called
    /// before the context is dropped.
    ///
    /// # Errors
    ///
    /// Any setup failure, after deleting the GL objects created so far;
    /// [`run`] reports it and stops the event loop.
    unsafe fn new(gl: Arc<glow::Context>, size: SurfaceSize) -> Result<Self>;

    /// Apply a new window size to the viewport and any size-dependent
    /// render targets. `size` is never empty.
    ///
    /// # Safety
    ///
    /// Requires the context passed to [`new`](Self::new) to be current.
    unsafe fn resize(&mut self, size: SurfaceSize);

    /// Draw one frame into the default framebuffer.
    ///
    /// # Safety
    ///
    /// Requires the context passed to [`new`](Self::new) to be current.
    unsafe fn render(&mut self);

    /// Delete every GL object the demo owns.
    ///
    /// # Safety
    ///
    /// Called exactly once, with the context passed to [`new`](Self::new)
    /// still current.
    unsafe fn destroy(&self);
}

/// Open a window, run `D` until the window is closed, and tear down.
///
/// # Errors
///
/// Returns the first window, context or demo setup error, a buffer swap
/// failure, or an event loop error.
pub fn run<D: Demo>(config: WindowConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::<D> {
        config,
        running: None,
        error: None,
    };
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Everything that exists once the window is up.
struct Running<D> {
    /// Dropped before `window` so GL objects never outlive their context.
    demo: D,
    window_state: WindowState,
    window: WindowContext,
}

impl<D: Demo> Running<D> {
    fn start(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self> {
        let window = WindowContext::new(event_loop, config)?;
        let size = window.size();
        let demo = unsafe { D::new(Arc::clone(window.gl()), size)? };

        log::info!("{} running at {}x{}", D::NAME, size.width, size.height);

        Ok(Self {
            demo,
            window_state: WindowState::new(size),
            window,
        })
    }

    fn frame(&mut self) -> Result<()> {
        if let Some(size) = self.window_state.take_resize() {
            log::debug!("applying resize to {}x{}", size.width, size.height);
            self.window.resize_surface(size);
            unsafe { self.demo.resize(size) };
        }

        unsafe { self.demo.render() };
        self.window.swap_buffers()
    }

    fn shutdown(self) {
        unsafe { self.demo.destroy() };
        log::info!("{} shut down", D::NAME);
    }
}

struct App<D> {
    config: WindowConfig,
    running: Option<Running<D>>,
    error: Option<Error>,
}

impl<D: Demo> App<D> {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Error) {
        log::error!("{err}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }
}

impl<D: Demo> ApplicationHandler for App<D> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() || self.error.is_some() {
            return;
        }
        match Running::start(event_loop, &self.config) {
            Ok(running) => self.running = Some(running),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                running.window_state.record_resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = running.frame() {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.window().request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = self.running.take() {
            running.shutdown();
        }
    }
}
