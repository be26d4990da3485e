//! Rendering abstraction layer.
//!
//! *The simulation never touches a pixel buffer directly.*
//! It hands a finished [`RenderPacket`] to a type that implements
//! [`Renderer`], one screen column at a time.
//!
//! * Back-ends plug in without changing game logic.
//! * The blanket impl [`RendererExt`] adds `draw_packet` so call-sites
//!   stay short.

use crate::caster::Column;
use crate::frame::RenderPacket;

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers forward it to their window manager.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Rasterise screen column `x` (ceiling, wall slice, floor).
    fn draw_column(&mut self, x: usize, column: &Column, packet: &RenderPacket);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// `submit(&[Rgba], w, h)` runs exactly once per frame.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_packet` adaptor.
pub trait RendererExt: Renderer {
    /// Draw every column of `packet` at `height` rows; width is the
    /// packet's column count.
    fn draw_packet<F>(&mut self, packet: &RenderPacket, height: usize, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(packet.columns.len(), height);
        for (x, column) in packet.columns.iter().enumerate() {
            self.draw_column(x, column, packet);
        }
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

mod software;
pub use software::Software;
