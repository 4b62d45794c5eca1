//! A vertex array with one dynamic vertex buffer and one dynamic index
//! buffer, re-specified from CPU data every frame.

use std::mem::{offset_of, size_of};
use std::sync::Arc;

use glow::HasContext;

use crate::error::{cleanup_on_err, Error, Result};
use crate::gl_call;
use crate::types::Vertex;

/// VAO + VBO + IBO configured for the [`Vertex`] layout.
pub struct DynamicMesh {
    gl: Arc<glow::Context>,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    /// Number of indices in the last upload.
    index_count: i32,
}

impl DynamicMesh {
    /// Create the buffers and record the attribute layout in the VAO.
    ///
    /// Both buffers start with room for a single element; [`upload`]
    /// re-specifies them at the right size.
    ///
    /// # Safety
    ///
    /// The `gl` context must be current. [`destroy`](Self::destroy) must be
    /// called before the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resource`] if any GL object cannot be created; the
    /// objects created before the failure are deleted.
    ///
    /// [`upload`]: Self::upload
    pub unsafe fn new(gl: Arc<glow::Context>) -> Result<Self> {
        let (vao, vbo, ibo) = unsafe {
            let vao = gl.create_vertex_array().map_err(Error::Resource)?;
            let vbo = cleanup_on_err(gl.create_buffer().map_err(Error::Resource), || {
                gl.delete_vertex_array(vao);
            })?;
            let ibo = cleanup_on_err(gl.create_buffer().map_err(Error::Resource), || {
                gl.delete_vertex_array(vao);
                gl.delete_buffer(vbo);
            })?;
            (vao, vbo, ibo)
        };

        // Vertex is 36 bytes; offsets and stride fit in i32.
        #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let stride = size_of::<Vertex>() as i32;
        #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let index_size = size_of::<u32>() as i32;
        #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let attributes = [
            (0, 3, offset_of!(Vertex, position) as i32),
            (1, 4, offset_of!(Vertex, color) as i32),
            (2, 2, offset_of!(Vertex, tex_coord) as i32),
        ];

        unsafe {
            gl_call!(&gl, gl.bind_vertex_array(Some(vao)));
            gl_call!(&gl, gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo)));
            gl_call!(
                &gl,
                gl.buffer_data_size(glow::ARRAY_BUFFER, stride, glow::DYNAMIC_DRAW)
            );

            for (location, components, offset) in attributes {
                gl_call!(&gl, gl.enable_vertex_attrib_array(location));
                gl_call!(
                    &gl,
                    gl.vertex_attrib_pointer_f32(
                        location,
                        components,
                        glow::FLOAT,
                        false,
                        stride,
                        offset
                    )
                );
            }

            // The element buffer binding is VAO state.
            gl_call!(&gl, gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo)));
            gl_call!(
                &gl,
                gl.buffer_data_size(glow::ELEMENT_ARRAY_BUFFER, index_size, glow::DYNAMIC_DRAW)
            );
            gl.bind_vertex_array(None);
        }

        Ok(Self {
            gl,
            vao,
            vbo,
            ibo,
            index_count: 0,
        })
    }

    /// Bind the vertex array for subsequent uploads and draws.
    ///
    /// # Safety
    ///
    /// Requires the context passed to [`new`](Self::new) to be current.
    pub unsafe fn bind(&self) {
        unsafe { self.gl.bind_vertex_array(Some(self.vao)) };
    }

    /// Re-specify both buffers from the given geometry.
    ///
    /// # Safety
    ///
    /// Requires the context passed to [`new`](Self::new) to be current and
    /// the mesh to be [bound](Self::bind).
    ///
    /// # Panics
    ///
    /// Panics if the index count exceeds `i32::MAX`.
    pub unsafe fn upload(&mut self, vertices: &[Vertex], indices: &[u32]) {
        let gl = &self.gl;

        unsafe {
            gl_call!(gl, gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo)));
            gl_call!(
                gl,
                gl.buffer_data_u8_slice(
                    glow::ARRAY_BUFFER,
                    bytemuck::cast_slice(vertices),
                    glow::DYNAMIC_DRAW,
                )
            );
            gl_call!(gl, gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.ibo)));
            gl_call!(
                gl,
                gl.buffer_data_u8_slice(
                    glow::ELEMENT_ARRAY_BUFFER,
                    bytemuck::cast_slice(indices),
                    glow::DYNAMIC_DRAW,
                )
            );
        }

        self.index_count = i32::try_from(indices.len()).expect("index count exceeds i32::MAX");
    }

    /// Draw the last uploaded geometry as indexed triangles.
    ///
    /// # Safety
    ///
    /// Requires the context passed to [`new`](Self::new) to be current, the
    /// mesh to be [bound](Self::bind) and a program in use.
    pub unsafe fn draw(&self) {
        let gl = &self.gl;
        unsafe {
            gl_call!(
                gl,
                gl.draw_elements(glow::TRIANGLES, self.index_count, glow::UNSIGNED_INT, 0)
            );
        }
    }

    /// Delete the GL objects.
    ///
    /// # Safety
    ///
    /// Must be called with the same GL context that was used to create the
    /// mesh, and must be called exactly once.
    pub unsafe fn destroy(&self) {
        let gl = &self.gl;
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
            gl.delete_buffer(self.ibo);
        }
    }
}

