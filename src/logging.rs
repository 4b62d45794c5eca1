//! Logger setup for the `hello_world` and `postprocessing` binaries.
//!
//! Output goes through [`log`] with [`env_logger`] behind it. The crate logs
//! under its own name (`glsandbox`), including `gl_call!` errors; driver
//! messages from the debug callback use the separate
//! [`GL_DEBUG_TARGET`](crate::debug::GL_DEBUG_TARGET), so a noisy driver can
//! be quieted with e.g. `RUST_LOG=glsandbox=debug,gl_debug=warn`.

use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` sets one.
pub const DEFAULT_FILTER: &str = "info";

/// Logger configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter directives (e.g. `"info"`,
    /// `"glsandbox=debug,gl_debug=warn"`). Overrides `RUST_LOG` when set.
    pub env_filter: Option<String>,
    /// Whether to color the output.
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initialize the global logger once; later calls are ignored.
///
/// Filter precedence: `config.env_filter`, then `RUST_LOG`, then
/// [`DEFAULT_FILTER`].
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok());

        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .init();

        log::debug!("logging initialized with filter `{filter}`");
    });
}

fn resolve_filter(explicit: Option<String>, from_env: Option<String>) -> String {
    explicit
        .or(from_env)
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let filter = resolve_filter(Some("gl_debug=warn".into()), Some("trace".into()));
        assert_eq!(filter, "gl_debug=warn");
    }

    #[test]
    fn env_filter_used_when_unset() {
        assert_eq!(resolve_filter(None, Some("debug".into())), "debug");
    }

    #[test]
    fn falls_back_to_info() {
        assert_eq!(resolve_filter(None, None), DEFAULT_FILTER);
    }
}
