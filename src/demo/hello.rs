//! Two vertex-colored triangles drawn straight to the window.

use std::sync::Arc;

use glow::HasContext;

use crate::app::Demo;
use crate::error::{cleanup_on_err, Result};
use crate::gl_call;
use crate::mesh::DynamicMesh;
use crate::shaders;
use crate::types::{SurfaceSize, TRIANGLE_INDICES, TRIANGLE_VERTICES};

/// Overlapping triangles with depth testing, rendered to the default
/// framebuffer.
pub struct HelloTriangles {
    gl: Arc<glow::Context>,
    program: glow::Program,
    /// `enableTex`; `None` if the driver optimized it away.
    enable_tex: Option<glow::UniformLocation>,
    mesh: DynamicMesh,
}

impl Demo for HelloTriangles {
    const NAME: &'static str = "hello_world";

    unsafe fn new(gl: Arc<glow::Context>, _size: SurfaceSize) -> Result<Self> {
        let program = unsafe {
            shaders::compile_program(&gl, shaders::QUAD_VERTEX_SRC, shaders::QUAD_FRAGMENT_SRC)?
        };
        let enable_tex = unsafe { gl.get_uniform_location(program, "enableTex") };
        let mesh = unsafe {
            cleanup_on_err(DynamicMesh::new(Arc::clone(&gl)), || gl.delete_program(program))?
        };

        Ok(Self {
            gl,
            program,
            enable_tex,
            mesh,
        })
    }

    unsafe fn resize(&mut self, size: SurfaceSize) {
        let gl = &self.gl;
        unsafe { gl_call!(gl, gl.viewport(0, 0, size.gl_width(), size.gl_height())) };
    }

    unsafe fn render(&mut self) {
        let gl = &self.gl;

        unsafe {
            gl_call!(gl, gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT));
            gl_call!(gl, gl.enable(glow::DEPTH_TEST));

            self.mesh.bind();
            self.mesh.upload(&TRIANGLE_VERTICES, &TRIANGLE_INDICES);

            gl_call!(gl, gl.use_program(Some(self.program)));
            gl_call!(gl, gl.uniform_1_i32(self.enable_tex.as_ref(), 0));
            self.mesh.draw();
        }
    }

    unsafe fn destroy(&self) {
        unsafe {
            self.mesh.destroy();
            self.gl.delete_program(self.program);
        }
    }
}
