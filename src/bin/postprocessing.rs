//! The hello-world triangles rendered offscreen and presented in grayscale.

use std::process::ExitCode;

use glsandbox::app;
use glsandbox::config::WindowConfig;
use glsandbox::demo::GrayscalePostProcess;
use glsandbox::logging::{init_logging, LoggingConfig};

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    let config = WindowConfig::default().with_title("glsandbox: postprocessing");
    match app::run::<GrayscalePostProcess>(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("postprocessing failed: {err}");
            ExitCode::from(2)
        }
    }
}
