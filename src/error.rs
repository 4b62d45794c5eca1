//! Error type shared by the window bootstrap and both demos.

use thiserror::Error;

/// Errors raised while bringing up the window, the GL context, or the GL
/// objects a demo needs.
#[derive(Debug, Error)]
pub enum Error {
    /// The window or the native display could not be created.
    #[error("failed to create window: {0}")]
    Window(String),

    /// The GL context or its window surface could not be created or made
    /// current.
    #[error("failed to initialize OpenGL context: {0}")]
    Context(String),

    /// A shader stage failed to compile.
    #[error("{stage} shader compilation failed:\n{log}")]
    ShaderCompile {
        /// `Vertex` or `Fragment`.
        stage: &'static str,
        /// Driver info log.
        log: String,
    },

    /// The program link step failed.
    #[error("program link step failed:\n{0}")]
    ProgramLink(String),

    /// A GL object could not be created.
    #[error("failed to create GL object: {0}")]
    Resource(String),

    /// `glCheckFramebufferStatus` did not report `FRAMEBUFFER_COMPLETE`.
    #[error("framebuffer incomplete: status {0:#06x}")]
    FramebufferIncomplete(u32),

    /// The winit event loop failed to start or terminated with an error.
    #[error(transparent)]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Pass `result` through, running `cleanup` first if it is an error.
///
/// Used while creating several GL objects in a row so a late failure
/// deletes the ones already created.
pub(crate) fn cleanup_on_err<T>(result: Result<T>, cleanup: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        cleanup();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_compile_message_names_stage() {
        let err = Error::ShaderCompile {
            stage: "Fragment",
            log: "0:3(1): error: syntax error".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Fragment shader compilation failed"));
        assert!(msg.ends_with("syntax error"));
    }

    #[test]
    fn cleanup_skipped_on_success() {
        let mut cleaned = false;
        let result = cleanup_on_err(Ok(3), || cleaned = true);
        assert!(matches!(result, Ok(3)));
        assert!(!cleaned);
    }

    #[test]
    fn cleanup_runs_on_failure() {
        let mut cleaned = false;
        let result = cleanup_on_err::<u32>(Err(Error::Resource("out of names".into())), || {
            cleaned = true;
        });
        assert!(matches!(result, Err(Error::Resource(ref msg)) if msg == "out of names"));
        assert!(cleaned);
    }

    #[test]
    fn framebuffer_status_is_hex() {
        let err = Error::FramebufferIncomplete(glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT);
        assert_eq!(err.to_string(), "framebuffer incomplete: status 0x8cd6");
    }
}
