//! Window and context settings.

/// Settings for the demo window and its GL context.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
    /// Wait for vertical blank on swap (swap interval 1).
    pub vsync: bool,
    /// Request a debug context so driver messages reach the log.
    pub debug_context: bool,
    /// Color the default framebuffer is cleared to.
    pub clear_color: [f32; 4],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "glsandbox".to_string(),
            width: 800,
            height: 600,
            vsync: true,
            debug_context: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl WindowConfig {
    /// Replace the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Replace the initial inner size.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = WindowConfig::default();
        assert_eq!(config.title, "glsandbox");
        assert_eq!((config.width, config.height), (800, 600));
        assert!(config.vsync);
        assert!(config.debug_context);
        assert_eq!(config.clear_color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn builder_overrides() {
        let config = WindowConfig::default()
            .with_title("postprocessing")
            .with_size(1280, 720);
        assert_eq!(config.title, "postprocessing");
        assert_eq!((config.width, config.height), (1280, 720));
        assert!(config.vsync);
    }
}
