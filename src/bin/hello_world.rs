//! Two overlapping triangles rendered directly to the window.

use std::process::ExitCode;

use glsandbox::app;
use glsandbox::config::WindowConfig;
use glsandbox::demo::HelloTriangles;
use glsandbox::logging::{init_logging, LoggingConfig};

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match app::run::<HelloTriangles>(WindowConfig::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("hello_world failed: {err}");
            ExitCode::from(2)
        }
    }
}
