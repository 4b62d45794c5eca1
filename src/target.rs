//! Offscreen render target sized to the window.
//!
//! The color attachment is a plain RGBA8 texture so a later pass can sample
//! it; depth and stencil live in a renderbuffer that is never read back.
//! On resize only the storage is re-specified: the GL names, and therefore
//! the framebuffer attachments, stay the same.

use std::sync::Arc;

use glow::{HasContext, PixelUnpackData};

use crate::error::{cleanup_on_err, Error, Result};
use crate::gl_call;
use crate::types::SurfaceSize;

/// GL internal format for RGBA8 textures, pre-cast to the `i32` that
/// `tex_image_2d` expects.
#[expect(clippy::cast_possible_wrap)]
const RGBA8_INTERNAL_FORMAT: i32 = glow::RGBA8 as i32;

/// Framebuffer with a sampled color texture and a depth/stencil
/// renderbuffer.
pub struct OffscreenTarget {
    gl: Arc<glow::Context>,
    fbo: glow::Framebuffer,
    /// Color attachment, sampled by the post-processing pass.
    color_texture: glow::Texture,
    /// `DEPTH24_STENCIL8` attachment.
    depth_rbo: glow::Renderbuffer,
    size: SurfaceSize,
}

impl OffscreenTarget {
    /// Allocate the attachments at `size` (at least 1x1), attach them, and
    /// verify the framebuffer is complete. Leaves the default framebuffer
    /// bound.
    ///
    /// # Safety
    ///
    /// The `gl` context must be current. [`destroy`](Self::destroy) must be
    /// called before the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resource`] if a GL object cannot be created, or
    /// [`Error::FramebufferIncomplete`] with the reported status if the
    /// driver rejects the attachment combination. Nothing is left allocated
    /// on either error.
    pub unsafe fn new(gl: Arc<glow::Context>, size: SurfaceSize) -> Result<Self> {
        // A window created minimized has nothing to size against yet.
        let size = size.clamped();
        let (fbo, color_texture, depth_rbo) = unsafe {
            let color_texture = gl.create_texture().map_err(Error::Resource)?;
            let depth_rbo = cleanup_on_err(gl.create_renderbuffer().map_err(Error::Resource), || {
                gl.delete_texture(color_texture);
            })?;
            let fbo = cleanup_on_err(gl.create_framebuffer().map_err(Error::Resource), || {
                gl.delete_texture(color_texture);
                gl.delete_renderbuffer(depth_rbo);
            })?;
            (fbo, color_texture, depth_rbo)
        };

        let target = Self {
            gl,
            fbo,
            color_texture,
            depth_rbo,
            size,
        };

        unsafe {
            target.allocate_storage(size);

            let gl = &target.gl;
            // GL constant values are small enough that the cast is always safe.
            #[expect(clippy::cast_possible_wrap)]
            {
                gl.bind_texture(glow::TEXTURE_2D, Some(color_texture));
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_MIN_FILTER,
                    glow::NEAREST as i32,
                );
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_MAG_FILTER,
                    glow::NEAREST as i32,
                );
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_WRAP_S,
                    glow::CLAMP_TO_EDGE as i32,
                );
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_WRAP_T,
                    glow::CLAMP_TO_EDGE as i32,
                );
                gl.bind_texture(glow::TEXTURE_2D, None);
            }

            gl_call!(gl, gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo)));
            gl_call!(
                gl,
                gl.framebuffer_texture_2d(
                    glow::FRAMEBUFFER,
                    glow::COLOR_ATTACHMENT0,
                    glow::TEXTURE_2D,
                    Some(color_texture),
                    0,
                )
            );
            gl_call!(
                gl,
                gl.framebuffer_renderbuffer(
                    glow::FRAMEBUFFER,
                    glow::DEPTH_STENCIL_ATTACHMENT,
                    glow::RENDERBUFFER,
                    Some(depth_rbo),
                )
            );

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);

            if status != glow::FRAMEBUFFER_COMPLETE {
                target.destroy();
                return Err(Error::FramebufferIncomplete(status));
            }
        }

        log::debug!(
            "offscreen target allocated at {}x{}",
            size.width,
            size.height
        );

        Ok(target)
    }

    /// Re-specify attachment storage for a new window size.
    ///
    /// Does nothing when the size is unchanged or empty.
    ///
    /// # Safety
    ///
    /// Requires the context passed to [`new`](Self::new) to be current.
    pub unsafe fn resize(&mut self, size: SurfaceSize) {
        let Some(size) = self.size().reallocation_for(size) else {
            return;
        };

        unsafe { self.allocate_storage(size) };
        self.size = size;

        log::debug!("offscreen target resized to {}x{}", size.width, size.height);
    }

    /// (Re)allocate color texture and depth/stencil renderbuffer storage.
    /// Restores the texture and renderbuffer bindings to none.
    unsafe fn allocate_storage(&self, size: SurfaceSize) {
        let gl = &self.gl;
        let w = size.gl_width();
        let h = size.gl_height();

        unsafe {
            gl_call!(gl, gl.bind_texture(glow::TEXTURE_2D, Some(self.color_texture)));
            gl_call!(
                gl,
                gl.tex_image_2d(
                    glow::TEXTURE_2D,
                    0,
                    RGBA8_INTERNAL_FORMAT,
                    w,
                    h,
                    0,
                    glow::RGBA,
                    glow::UNSIGNED_BYTE,
                    PixelUnpackData::Slice(None),
                )
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            gl_call!(gl, gl.bind_renderbuffer(glow::RENDERBUFFER, Some(self.depth_rbo)));
            gl_call!(
                gl,
                gl.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH24_STENCIL8, w, h)
            );
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);
        }
    }

    /// Direct subsequent draws into this target.
    ///
    /// # Safety
    ///
    /// Requires the context passed to [`new`](Self::new) to be current.
    pub unsafe fn bind(&self) {
        let gl = &self.gl;
        unsafe { gl_call!(gl, gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo))) };
    }

    /// Direct subsequent draws back into the default framebuffer.
    ///
    /// # Safety
    ///
    /// Requires the context passed to [`new`](Self::new) to be current.
    pub unsafe fn unbind(&self) {
        let gl = &self.gl;
        unsafe { gl_call!(gl, gl.bind_framebuffer(glow::FRAMEBUFFER, None)) };
    }

    /// The color attachment, for sampling in a later pass.
    #[must_use]
    pub fn color_texture(&self) -> glow::Texture {
        self.color_texture
    }

    /// Current attachment size.
    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Clean up all GL resources owned by this target.
    ///
    /// # Safety
    ///
    /// Must be called with the same GL context that was used to create the
    /// target, and must be called exactly once.
    pub unsafe fn destroy(&self) {
        let gl = &self.gl;
        unsafe {
            gl.delete_framebuffer(self.fbo);
            gl.delete_texture(self.color_texture);
            gl.delete_renderbuffer(self.depth_rbo);
        }
    }
}
