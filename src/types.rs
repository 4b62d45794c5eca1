//! Plain data shared by the demos: the vertex format, the window size
//! bookkeeping, and the hardcoded geometry.

use bytemuck::{Pod, Zeroable};

/// A vertex as laid out in the dynamic vertex buffer.
///
/// | Location | Field       | Components | Byte offset |
/// |----------|-------------|------------|-------------|
/// | `0`      | `position`  | 3 × `f32`  | 0           |
/// | `1`      | `color`     | 4 × `f32`  | 12          |
/// | `2`      | `tex_coord` | 2 × `f32`  | 28          |
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// Clip-space position.
    pub position: [f32; 3],
    /// Linear RGBA.
    pub color: [f32; 4],
    /// Texture coordinate, origin bottom-left.
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// A vertex without texture coordinates.
    #[must_use]
    pub const fn colored(position: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            position,
            color,
            tex_coord: [0.0, 0.0],
        }
    }
}

/// Window or render-target size in physical pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// A size of `width` x `height` pixels.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A minimized window reports a zero dimension; nothing can be
    /// allocated at that size.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// This size with each dimension raised to at least one pixel.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(self.width.max(1), self.height.max(1))
    }

    /// The size storage must be reallocated to when a target currently
    /// sized `self` is asked for `requested`.
    ///
    /// `None` when nothing changes or `requested` is empty: the current
    /// allocation stays valid until the window is restored.
    #[must_use]
    pub fn reallocation_for(self, requested: SurfaceSize) -> Option<SurfaceSize> {
        if requested == self || requested.is_empty() {
            None
        } else {
            Some(requested)
        }
    }

    /// Width as the `i32` GL entry points expect.
    #[must_use]
    pub fn gl_width(self) -> i32 {
        gl_size(self.width)
    }

    /// Height as the `i32` GL entry points expect.
    #[must_use]
    pub fn gl_height(self) -> i32 {
        gl_size(self.height)
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for SurfaceSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

/// Convert a `u32` to `i32` for GL API calls.
///
/// # Panics
///
/// Panics if `value > i32::MAX`. In practice, this is unreachable for
/// window dimensions and buffer element counts.
#[must_use]
pub fn gl_size(value: u32) -> i32 {
    i32::try_from(value).expect("dimension exceeds i32::MAX")
}

/// Size bookkeeping written by the resize handler and polled once per frame
/// by the render loop.
#[derive(Debug, Default)]
pub struct WindowState {
    size: SurfaceSize,
    should_resize: bool,
}

impl WindowState {
    /// State for a window created at `size`, with no resize pending.
    #[must_use]
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            should_resize: false,
        }
    }

    /// Last size reported by the window system.
    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Whether a resize is waiting to be applied.
    #[must_use]
    pub fn resize_pending(&self) -> bool {
        self.should_resize
    }

    /// Store a new size and mark it pending.
    pub fn record_resize(&mut self, width: u32, height: u32) {
        self.size = SurfaceSize::new(width, height);
        self.should_resize = true;
    }

    /// Take the pending size, if any.
    ///
    /// An empty size stays pending until the window is restored.
    pub fn take_resize(&mut self) -> Option<SurfaceSize> {
        if !self.should_resize || self.size.is_empty() {
            return None;
        }
        self.should_resize = false;
        Some(self.size)
    }
}

/// Two overlapping RGB triangles. The second has the smaller NDC depth, so
/// it wins the depth test where they overlap.
pub const TRIANGLE_VERTICES: [Vertex; 6] = [
    Vertex::colored([0.0, 0.5, 0.0], [1.0, 0.0, 0.0, 1.0]),
    Vertex::colored([0.5, -0.5, 0.0], [0.0, 1.0, 0.0, 1.0]),
    Vertex::colored([-0.5, -0.5, 0.0], [0.0, 0.0, 1.0, 1.0]),
    Vertex::colored([0.5, 0.5, -0.1], [1.0, 0.0, 0.0, 1.0]),
    Vertex::colored([1.0, -0.5, -0.1], [0.0, 1.0, 0.0, 1.0]),
    Vertex::colored([0.0, -0.5, -0.1], [0.0, 0.0, 1.0, 1.0]),
];

/// Index list for [`TRIANGLE_VERTICES`], one triangle per three indices.
pub const TRIANGLE_INDICES: [u32; 6] = [0, 1, 2, 3, 4, 5];

/// Full-screen quad in NDC, texture coordinates with the origin bottom-left.
pub const QUAD_VERTICES: [Vertex; 4] = [
    Vertex {
        position: [-1.0, 1.0, 0.0],
        color: [0.0, 0.0, 0.0, 1.0],
        tex_coord: [0.0, 1.0],
    },
    Vertex {
        position: [1.0, 1.0, 0.0],
        color: [0.0, 0.0, 0.0, 1.0],
        tex_coord: [1.0, 1.0],
    },
    Vertex {
        position: [1.0, -1.0, 0.0],
        color: [0.0, 0.0, 0.0, 1.0],
        tex_coord: [1.0, 0.0],
    },
    Vertex {
        position: [-1.0, -1.0, 0.0],
        color: [0.0, 0.0, 0.0, 1.0],
        tex_coord: [0.0, 0.0],
    },
];

/// Two triangles covering [`QUAD_VERTICES`].
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn vertex_layout_matches_attribute_table() {
        assert_eq!(size_of::<Vertex>(), 36);
        assert_eq!(offset_of!(Vertex, position), 0);
        assert_eq!(offset_of!(Vertex, color), 12);
        assert_eq!(offset_of!(Vertex, tex_coord), 28);
    }

    #[test]
    fn vertices_cast_to_bytes() {
        let bytes: &[u8] = bytemuck::cast_slice(&TRIANGLE_VERTICES);
        assert_eq!(bytes.len(), 6 * 36);
        let indices: &[u8] = bytemuck::cast_slice(&QUAD_INDICES);
        assert_eq!(indices.len(), 24);
    }

    #[test]
    fn indices_stay_in_bounds() {
        assert!(TRIANGLE_INDICES
            .iter()
            .all(|&i| (i as usize) < TRIANGLE_VERTICES.len()));
        assert!(QUAD_INDICES
            .iter()
            .all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }

    #[test]
    fn quad_covers_clip_space() {
        for v in &QUAD_VERTICES {
            assert!((v.position[0].abs() - 1.0).abs() < f32::EPSILON);
            assert!((v.position[1].abs() - 1.0).abs() < f32::EPSILON);
            // texcoord follows position: NDC -1 maps to 0, +1 maps to 1
            assert!((v.tex_coord[0] - (v.position[0] + 1.0) / 2.0).abs() < f32::EPSILON);
            assert!((v.tex_coord[1] - (v.position[1] + 1.0) / 2.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn second_triangle_is_nearer() {
        let (first, second) = TRIANGLE_VERTICES.split_at(3);
        let max_second = second.iter().map(|v| v.position[2]).fold(f32::MIN, f32::max);
        let min_first = first.iter().map(|v| v.position[2]).fold(f32::MAX, f32::min);
        assert!(max_second < min_first);
    }

    #[test]
    fn empty_sizes() {
        assert!(SurfaceSize::new(0, 600).is_empty());
        assert!(SurfaceSize::new(800, 0).is_empty());
        assert!(!SurfaceSize::new(800, 600).is_empty());
        assert_eq!(SurfaceSize::new(800, 600).gl_height(), 600);
        assert_eq!(SurfaceSize::new(0, 600).clamped(), SurfaceSize::new(1, 600));
        assert_eq!(SurfaceSize::new(800, 600).clamped(), SurfaceSize::new(800, 600));
    }

    #[test]
    fn same_size_needs_no_reallocation() {
        let current = SurfaceSize::new(800, 600);
        assert_eq!(current.reallocation_for(SurfaceSize::new(800, 600)), None);
    }

    #[test]
    fn empty_size_keeps_current_allocation() {
        let current = SurfaceSize::new(800, 600);
        assert_eq!(current.reallocation_for(SurfaceSize::new(0, 0)), None);
        assert_eq!(current.reallocation_for(SurfaceSize::new(0, 600)), None);
        assert_eq!(current.reallocation_for(SurfaceSize::new(800, 0)), None);
    }

    #[test]
    fn new_size_is_reallocated() {
        let current = SurfaceSize::new(800, 600);
        assert_eq!(
            current.reallocation_for(SurfaceSize::new(1024, 768)),
            Some(SurfaceSize::new(1024, 768))
        );
        // a target clamped up from a minimized window grows on restore
        let clamped = SurfaceSize::new(0, 0).clamped();
        assert_eq!(clamped, SurfaceSize::new(1, 1));
        assert_eq!(
            clamped.reallocation_for(SurfaceSize::new(800, 600)),
            Some(SurfaceSize::new(800, 600))
        );
    }

    #[test]
    fn resize_is_taken_once() {
        let mut state = WindowState::new(SurfaceSize::new(800, 600));
        assert_eq!(state.take_resize(), None);

        state.record_resize(1024, 768);
        assert!(state.resize_pending());
        assert_eq!(state.take_resize(), Some(SurfaceSize::new(1024, 768)));
        assert_eq!(state.take_resize(), None);
        assert_eq!(state.size(), SurfaceSize::new(1024, 768));
    }

    #[test]
    fn latest_resize_wins() {
        let mut state = WindowState::new(SurfaceSize::new(800, 600));
        state.record_resize(640, 480);
        state.record_resize(1280, 720);
        assert_eq!(state.take_resize(), Some(SurfaceSize::new(1280, 720)));
    }

    #[test]
    fn minimized_resize_stays_pending() {
        let mut state = WindowState::new(SurfaceSize::new(800, 600));
        state.record_resize(0, 0);
        assert_eq!(state.take_resize(), None);
        assert!(state.resize_pending());

        state.record_resize(800, 600);
        assert_eq!(state.take_resize(), Some(SurfaceSize::new(800, 600)));
        assert!(!state.resize_pending());
    }

    #[test]
    fn size_from_winit() {
        let size: SurfaceSize = winit::dpi::PhysicalSize::new(320u32, 240u32).into();
        assert_eq!(size, SurfaceSize::new(320, 240));
    }
}
