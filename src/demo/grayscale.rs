//! The triangles rendered offscreen, then shown through a grayscale pass.
//!
//! Pass 1 draws into an [`OffscreenTarget`] with depth testing. Pass 2 binds
//! the default framebuffer and draws a full-screen quad sampling the
//! target's color texture on unit 0.

use std::sync::Arc;

use glow::HasContext;

use crate::app::Demo;
use crate::error::{cleanup_on_err, Result};
use crate::gl_call;
use crate::mesh::DynamicMesh;
use crate::shaders;
use crate::target::OffscreenTarget;
use crate::types::{
    SurfaceSize, QUAD_INDICES, QUAD_VERTICES, TRIANGLE_INDICES, TRIANGLE_VERTICES,
};

/// Texture unit the offscreen color attachment is bound to.
const POST_PROCESS_UNIT: u32 = 0;

/// Offscreen scene pass followed by a grayscale full-screen pass.
pub struct GrayscalePostProcess {
    gl: Arc<glow::Context>,
    scene_program: glow::Program,
    /// `enableTex` in the scene program.
    scene_enable_tex: Option<glow::UniformLocation>,
    grayscale_program: glow::Program,
    /// `tex` in the grayscale program.
    grayscale_tex: Option<glow::UniformLocation>,
    /// Shared by both passes; re-uploaded before each draw.
    mesh: DynamicMesh,
    target: OffscreenTarget,
}

impl Demo for GrayscalePostProcess {
    const NAME: &'static str = "postprocessing";

    unsafe fn new(gl: Arc<glow::Context>, size: SurfaceSize) -> Result<Self> {
        let scene_program = unsafe {
            shaders::compile_program(&gl, shaders::QUAD_VERTEX_SRC, shaders::QUAD_FRAGMENT_SRC)?
        };
        let grayscale_program = unsafe {
            cleanup_on_err(
                shaders::compile_program(
                    &gl,
                    shaders::GRAYSCALE_VERTEX_SRC,
                    shaders::GRAYSCALE_FRAGMENT_SRC,
                ),
                || gl.delete_program(scene_program),
            )?
        };
        let delete_programs = || unsafe {
            gl.delete_program(scene_program);
            gl.delete_program(grayscale_program);
        };

        let (scene_enable_tex, grayscale_tex) = unsafe {
            (
                gl.get_uniform_location(scene_program, "enableTex"),
                gl.get_uniform_location(grayscale_program, "tex"),
            )
        };
        if grayscale_tex.is_none() {
            log::warn!("grayscale program has no active `tex` uniform");
        }

        let mesh = cleanup_on_err(unsafe { DynamicMesh::new(Arc::clone(&gl)) }, delete_programs)?;
        let target = cleanup_on_err(
            unsafe { OffscreenTarget::new(Arc::clone(&gl), size) },
            || unsafe {
                mesh.destroy();
                delete_programs();
            },
        )?;

        Ok(Self {
            gl,
            scene_program,
            scene_enable_tex,
            grayscale_program,
            grayscale_tex,
            mesh,
            target,
        })
    }

    unsafe fn resize(&mut self, size: SurfaceSize) {
        let gl = &self.gl;
        unsafe {
            gl_call!(gl, gl.viewport(0, 0, size.gl_width(), size.gl_height()));
            self.target.resize(size);
        }
    }

    unsafe fn render(&mut self) {
        let gl = &self.gl;

        unsafe {
            self.mesh.bind();

            // Pass 1: scene into the offscreen target.
            self.target.bind();
            gl_call!(gl, gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT));
            gl_call!(gl, gl.enable(glow::DEPTH_TEST));

            self.mesh.upload(&TRIANGLE_VERTICES, &TRIANGLE_INDICES);
            gl_call!(gl, gl.use_program(Some(self.scene_program)));
            gl_call!(gl, gl.uniform_1_i32(self.scene_enable_tex.as_ref(), 0));
            self.mesh.draw();

            // Pass 2: grayscale quad into the default framebuffer.
            self.target.unbind();
            gl_call!(gl, gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT));
            gl_call!(gl, gl.active_texture(glow::TEXTURE0 + POST_PROCESS_UNIT));
            gl_call!(
                gl,
                gl.bind_texture(glow::TEXTURE_2D, Some(self.target.color_texture()))
            );
            gl_call!(gl, gl.disable(glow::DEPTH_TEST));

            self.mesh.upload(&QUAD_VERTICES, &QUAD_INDICES);
            gl_call!(gl, gl.use_program(Some(self.grayscale_program)));
            #[allow(clippy::cast_possible_wrap)]
            let unit = POST_PROCESS_UNIT as i32;
            gl_call!(gl, gl.uniform_1_i32(self.grayscale_tex.as_ref(), unit));
            self.mesh.draw();

            gl.bind_texture(glow::TEXTURE_2D, None);
        }
    }

    unsafe fn destroy(&self) {
        unsafe {
            self.target.destroy();
            self.mesh.destroy();
            self.gl.delete_program(self.scene_program);
            self.gl.delete_program(self.grayscale_program);
        }
    }
}
