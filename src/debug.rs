//! GL error polling and `KHR_debug` message logging.

use glow::HasContext;
use log::Level;

/// Log target of driver messages from the debug callback, so they can be
/// filtered apart from the crate's own output.
pub const GL_DEBUG_TARGET: &str = "gl_debug";

/// Run a GL call with error polling around it.
///
/// Pending errors are drained before the call so that anything logged
/// afterwards was raised by `$call` itself. Evaluates to the call's value.
///
/// Must be used inside an `unsafe` block with the context current.
#[macro_export]
macro_rules! gl_call {
    ($gl:expr, $call:expr) => {{
        $crate::debug::clear_errors($gl);
        let value = $call;
        let _ = $crate::debug::log_errors($gl, stringify!($call));
        value
    }};
}

/// Discard every pending `glGetError` code.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
pub unsafe fn clear_errors(gl: &glow::Context) {
    while unsafe { gl.get_error() } != glow::NO_ERROR {}
}

/// Drain and log every pending `glGetError` code, returning how many there
/// were.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
#[must_use]
pub unsafe fn log_errors(gl: &glow::Context, call: &str) -> usize {
    let mut count = 0;
    loop {
        let code = unsafe { gl.get_error() };
        if code == glow::NO_ERROR {
            return count;
        }
        log::error!("GL_ERROR: {} in `{call}`", error_name(code));
        count += 1;
    }
}

/// Symbolic name of a `glGetError` code.
#[must_use]
pub fn error_name(code: u32) -> String {
    let name = match code {
        glow::NO_ERROR => "GL_NO_ERROR",
        glow::INVALID_ENUM => "GL_INVALID_ENUM",
        glow::INVALID_VALUE => "GL_INVALID_VALUE",
        glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
        glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        glow::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        glow::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        _ => return format!("{code:#06x}"),
    };
    name.to_string()
}

/// Log level for a debug message.
///
/// Anything typed `DEBUG_TYPE_ERROR` is an error regardless of severity.
#[must_use]
pub fn debug_level(message_type: u32, severity: u32) -> Level {
    if message_type == glow::DEBUG_TYPE_ERROR {
        return Level::Error;
    }
    match severity {
        glow::DEBUG_SEVERITY_HIGH => Level::Error,
        glow::DEBUG_SEVERITY_MEDIUM => Level::Warn,
        glow::DEBUG_SEVERITY_LOW => Level::Info,
        _ => Level::Debug,
    }
}

/// Enable synchronous debug output and route driver messages to the logger.
///
/// A plain 3.3 context without `GL_KHR_debug` has no debug output; that is
/// logged and otherwise ignored.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
pub unsafe fn install_debug_callback(gl: &mut glow::Context) {
    if !gl.supports_debug() {
        log::debug!("GL debug output unavailable; relying on glGetError polling");
        return;
    }

    unsafe {
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(|_source, message_type, id, severity, message| {
            let prefix = if message_type == glow::DEBUG_TYPE_ERROR {
                "GL_ERROR "
            } else {
                ""
            };
            log::log!(
                target: GL_DEBUG_TARGET,
                debug_level(message_type, severity),
                "GL_DEBUG: {prefix}[{id}] {message}"
            );
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_target_is_filterable() {
        assert_eq!(GL_DEBUG_TARGET, "gl_debug");
        assert!(!GL_DEBUG_TARGET.contains(['=', ',']));
    }

    #[test]
    fn known_error_names() {
        assert_eq!(error_name(glow::INVALID_ENUM), "GL_INVALID_ENUM");
        assert_eq!(error_name(glow::INVALID_OPERATION), "GL_INVALID_OPERATION");
        assert_eq!(
            error_name(glow::INVALID_FRAMEBUFFER_OPERATION),
            "GL_INVALID_FRAMEBUFFER_OPERATION"
        );
    }

    #[test]
    fn unknown_error_is_hex() {
        assert_eq!(error_name(0xdead), "0xdead");
        assert_eq!(error_name(0x12), "0x0012");
    }

    #[test]
    fn error_type_overrides_severity() {
        assert_eq!(
            debug_level(glow::DEBUG_TYPE_ERROR, glow::DEBUG_SEVERITY_NOTIFICATION),
            Level::Error
        );
    }

    #[test]
    fn severity_mapping() {
        let other = glow::DEBUG_TYPE_OTHER;
        assert_eq!(debug_level(other, glow::DEBUG_SEVERITY_HIGH), Level::Error);
        assert_eq!(debug_level(other, glow::DEBUG_SEVERITY_MEDIUM), Level::Warn);
        assert_eq!(debug_level(other, glow::DEBUG_SEVERITY_LOW), Level::Info);
        assert_eq!(
            debug_level(other, glow::DEBUG_SEVERITY_NOTIFICATION),
            Level::Debug
        );
    }
}
