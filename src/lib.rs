//! A small OpenGL 3.3 core-profile sandbox built on [glow], [glutin] and
//! [winit].
//!
//! Two demo programs share this library:
//!
//! - `hello_world` draws two overlapping, vertex-colored triangles straight
//!   into the window with depth testing.
//! - `postprocessing` draws the same triangles into an offscreen
//!   framebuffer (RGBA8 color texture plus a depth/stencil renderbuffer)
//!   and then presents that texture through a full-screen grayscale pass.
//!
//! Window resizes are recorded by the event handler and applied once per
//! frame by the render loop, which resizes the viewport and reallocates the
//! offscreen attachments.
//!
//! # Safety
//!
//! Everything that touches GL is `unsafe` and expects the context created
//! by [`window::WindowContext`] to be current. The render loop in [`app`]
//! upholds that for the [`app::Demo`] implementations.
//!
//! [glow]: https://docs.rs/glow
//! [glutin]: https://docs.rs/glutin
//! [winit]: https://docs.rs/winit

pub mod app;
pub mod config;
pub mod debug;
pub mod demo;
pub mod error;
pub mod logging;
pub mod mesh;
pub mod shaders;
pub mod target;
pub mod types;
pub mod window;

pub use error::{Error, Result};
