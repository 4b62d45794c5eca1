//! GLSL shader sources and compilation helpers.
//!
//! All shaders target GLSL 3.30 core, matching the 3.3 core-profile context
//! the window bootstrap requests. Attribute locations follow the
//! [`Vertex`](crate::types::Vertex) layout.

use glow::HasContext;

use crate::error::{Error, Result};

/// Vertex shader shared by the direct and offscreen triangle passes.
///
/// Positions are already in clip space; color and texture coordinates are
/// forwarded unchanged.
pub const QUAD_VERTEX_SRC: &str = r"#version 330 core

layout (location = 0) in vec3 pos;
layout (location = 1) in vec4 color;
layout (location = 2) in vec2 texCoord;

out vec4 fColor;
out vec2 fTexCoord;

void main() {
    gl_Position = vec4(pos.xyz, 1.0);
    fColor = color;
    fTexCoord = texCoord;
}
";

/// Fragment shader for the triangle passes.
///
/// # Uniforms
///
/// | Name        | Type        | Description                                 |
/// |-------------|-------------|---------------------------------------------|
/// | `tex`       | `sampler2D` | Texture sampled when `enableTex` is set     |
/// | `enableTex` | `bool`      | Sample `tex` instead of the vertex color    |
pub const QUAD_FRAGMENT_SRC: &str = r"#version 330 core

in vec4 fColor;
in vec2 fTexCoord;

uniform sampler2D tex;
uniform bool enableTex;

out vec4 FragColor;

void main() {
    FragColor = fColor;
    if (enableTex) {
        FragColor = texture(tex, fTexCoord);
    }
}
";

/// Vertex shader for the full-screen post-processing quad. Only the
/// position and texture coordinate attributes are consumed.
pub const GRAYSCALE_VERTEX_SRC: &str = r"#version 330 core

layout (location = 0) in vec3 pos;
layout (location = 2) in vec2 texCoord;

out vec2 fTexCoord;

void main() {
    gl_Position = vec4(pos.xyz, 1.0);
    fTexCoord = texCoord;
}
";

/// Fragment shader converting the offscreen color texture to grayscale
/// using Rec. 709 luma weights. Output alpha is always 1.
///
/// # Uniforms
///
/// | Name  | Type        | Description                        |
/// |-------|-------------|------------------------------------|
/// | `tex` | `sampler2D` | Offscreen color attachment (unit 0) |
pub const GRAYSCALE_FRAGMENT_SRC: &str = r"#version 330 core

in vec2 fTexCoord;

uniform sampler2D tex;

out vec4 FragColor;

void main() {
    vec4 fColor = texture(tex, fTexCoord);
    float average = 0.2126 * fColor.r + 0.7152 * fColor.g + 0.0722 * fColor.b;
    FragColor = vec4(average, average, average, 1.0);
}
";

/// Compile a shader program from vertex and fragment source strings.
///
/// Both stages are compiled before either failure is reported, so a broken
/// program logs every stage's info log. The compiled shader objects are
/// detached and deleted after successful linking, so only the program
/// handle needs to be cleaned up by the caller.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
///
/// # Errors
///
/// Returns [`Error::ShaderCompile`] for the first stage that failed to
/// compile, [`Error::ProgramLink`] if linking failed, or
/// [`Error::Resource`] if the driver refused to create a shader or program
/// object.
pub unsafe fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program> {
    let vs = unsafe { compile_shader(gl, glow::VERTEX_SHADER, vertex_src) };
    let fs = unsafe { compile_shader(gl, glow::FRAGMENT_SHADER, fragment_src) };

    let (vs, fs) = match resolve_stages(vs, fs) {
        StageOutcome::Compiled(vs, fs) => (vs, fs),
        StageOutcome::Failed {
            returned,
            logged,
            compiled,
        } => {
            if let Some(shader) = compiled {
                unsafe { gl.delete_shader(shader) };
            }
            // The caller reports the returned error; surface this one here.
            if let Some(err) = logged {
                log::error!("{err}");
            }
            return Err(returned);
        }
    };

    let program = match unsafe { gl.create_program() } {
        Ok(program) => program,
        Err(err) => {
            unsafe {
                gl.delete_shader(vs);
                gl.delete_shader(fs);
            }
            return Err(Error::Resource(format!("glCreateProgram: {err}")));
        }
    };

    unsafe {
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            return Err(Error::ProgramLink(log));
        }

        gl.detach_shader(program, vs);
        gl.detach_shader(program, fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);
    }

    Ok(program)
}

/// Result of compiling the vertex and fragment stages of one program.
#[derive(Debug)]
enum StageOutcome<S> {
    /// Both stages compiled: `(vertex, fragment)`.
    Compiled(S, S),
    /// At least one stage failed.
    Failed {
        /// Vertex error if the vertex stage failed, else the fragment error.
        returned: Error,
        /// Fragment error when both stages failed.
        logged: Option<Error>,
        /// The stage that did compile and now has to be deleted.
        compiled: Option<S>,
    },
}

/// Decide what to return, log and delete after compiling both stages.
fn resolve_stages<S>(vertex: Result<S>, fragment: Result<S>) -> StageOutcome<S> {
    match (vertex, fragment) {
        (Ok(vs), Ok(fs)) => StageOutcome::Compiled(vs, fs),
        (Err(returned), Err(logged)) => StageOutcome::Failed {
            returned,
            logged: Some(logged),
            compiled: None,
        },
        (Err(returned), Ok(compiled)) | (Ok(compiled), Err(returned)) => StageOutcome::Failed {
            returned,
            logged: None,
            compiled: Some(compiled),
        },
    }
}

/// Human-readable stage name used in compile errors.
#[must_use]
fn stage_name(shader_type: u32) -> &'static str {
    match shader_type {
        glow::VERTEX_SHADER => "Vertex",
        glow::FRAGMENT_SHADER => "Fragment",
        _ => "",
    }
}

/// Compile a single shader stage (vertex or fragment) from source.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
unsafe fn compile_shader(gl: &glow::Context, shader_type: u32, source: &str) -> Result<glow::Shader> {
    unsafe {
        let shader = gl
            .create_shader(shader_type)
            .map_err(|err| Error::Resource(format!("glCreateShader: {err}")))?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(Error::ShaderCompile {
                stage: stage_name(shader_type),
                log,
            });
        }

        Ok(shader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [&str; 4] = [
        QUAD_VERTEX_SRC,
        QUAD_FRAGMENT_SRC,
        GRAYSCALE_VERTEX_SRC,
        GRAYSCALE_FRAGMENT_SRC,
    ];

    #[test]
    fn sources_target_330_core() {
        for src in ALL {
            assert!(src.starts_with("#version 330 core\n"), "{src}");
        }
    }

    #[test]
    fn attribute_locations_match_vertex_layout() {
        assert!(QUAD_VERTEX_SRC.contains("layout (location = 0) in vec3 pos;"));
        assert!(QUAD_VERTEX_SRC.contains("layout (location = 1) in vec4 color;"));
        assert!(QUAD_VERTEX_SRC.contains("layout (location = 2) in vec2 texCoord;"));
        assert!(GRAYSCALE_VERTEX_SRC.contains("layout (location = 0) in vec3 pos;"));
        assert!(GRAYSCALE_VERTEX_SRC.contains("layout (location = 2) in vec2 texCoord;"));
        assert!(!GRAYSCALE_VERTEX_SRC.contains("location = 1"));
    }

    #[test]
    fn grayscale_uses_rec709_weights() {
        assert!(GRAYSCALE_FRAGMENT_SRC
            .contains("0.2126 * fColor.r + 0.7152 * fColor.g + 0.0722 * fColor.b"));
        let weights: f64 = 0.2126 + 0.7152 + 0.0722;
        assert!((weights - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fragment_uniforms_are_declared() {
        assert!(QUAD_FRAGMENT_SRC.contains("uniform sampler2D tex;"));
        assert!(QUAD_FRAGMENT_SRC.contains("uniform bool enableTex;"));
        assert!(GRAYSCALE_FRAGMENT_SRC.contains("uniform sampler2D tex;"));
    }

    fn compile_error(stage: &'static str) -> Error {
        Error::ShaderCompile {
            stage,
            log: format!("{stage} log"),
        }
    }

    #[test]
    fn both_stages_compiled() {
        let outcome = resolve_stages::<u32>(Ok(1), Ok(2));
        assert!(matches!(outcome, StageOutcome::Compiled(1, 2)));
    }

    #[test]
    fn vertex_error_returned_fragment_error_logged() {
        let outcome =
            resolve_stages::<u32>(Err(compile_error("Vertex")), Err(compile_error("Fragment")));
        match outcome {
            StageOutcome::Failed {
                returned: Error::ShaderCompile { stage: "Vertex", .. },
                logged: Some(Error::ShaderCompile { stage: "Fragment", .. }),
                compiled: None,
            } => {}
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn failed_fragment_deletes_compiled_vertex() {
        let outcome = resolve_stages::<u32>(Ok(7), Err(compile_error("Fragment")));
        match outcome {
            StageOutcome::Failed {
                returned: Error::ShaderCompile { stage: "Fragment", .. },
                logged: None,
                compiled: Some(7),
            } => {}
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn failed_vertex_deletes_compiled_fragment() {
        let outcome = resolve_stages::<u32>(Err(compile_error("Vertex")), Ok(9));
        match outcome {
            StageOutcome::Failed {
                returned: Error::ShaderCompile { stage: "Vertex", .. },
                logged: None,
                compiled: Some(9),
            } => {}
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn stage_names() {
        assert_eq!(stage_name(glow::VERTEX_SHADER), "Vertex");
        assert_eq!(stage_name(glow::FRAGMENT_SHADER), "Fragment");
        assert_eq!(stage_name(glow::GEOMETRY_SHADER), "");
    }
}
