//! The two demo programs.

mod grayscale;
mod hello;

pub use grayscale::GrayscalePostProcess;
pub use hello::HelloTriangles;
