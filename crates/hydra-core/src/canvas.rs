//! Rendering surface sizing.
//!
//! The surface's pixel resolution is independent from its layout size: the
//! layout always fills the container, so resolution changes never require
//! re-creating the surface.

use std::num::NonZeroU32;

/// Pixel dimensions of a surface. Both sides are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    /// Default size of an HTML canvas, used when the viewport reports nothing.
    pub const FALLBACK: PixelSize = PixelSize {
        width: 300,
        height: 150,
    };

    /// Build a size from a possibly-degenerate viewport measurement.
    /// Non-finite or sub-pixel sides fall back to [`PixelSize::FALLBACK`].
    pub fn from_viewport(width: f64, height: f64) -> Self {
        Self {
            width: side(width).unwrap_or(Self::FALLBACK.width),
            height: side(height).unwrap_or(Self::FALLBACK.height),
        }
    }

    /// Raise any zero side to 1.
    pub fn clamped(self) -> Self {
        Self {
            width: at_least_one(self.width).get(),
            height: at_least_one(self.height).get(),
        }
    }
}

/// `v` as a non-zero pixel count, with 0 raised to 1.
pub fn at_least_one(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v).unwrap_or(NonZeroU32::MIN)
}

fn side(v: f64) -> Option<u32> {
    (v.is_finite() && v >= 1.0).then(|| v.min(u32::MAX as f64) as u32)
}

/// A pixel-addressable target the engine draws into.
///
/// Resizing a surface clears whatever was drawn on it.
pub trait Surface {
    fn set_pixel_width(&mut self, width: u32);
    fn set_pixel_height(&mut self, height: u32);
    /// Make the layout size track the container (`100%` x `100%`).
    fn fill_container(&mut self);
}

/// Owns the surface and its current pixel size.
#[derive(Debug)]
pub struct CanvasManager<S> {
    surface: S,
    size: PixelSize,
}

impl<S: Surface> CanvasManager<S> {
    /// Take ownership of `surface` and apply `size`. Zero sides become 1.
    pub fn new(mut surface: S, size: PixelSize) -> Self {
        let size = size.clamped();
        surface.set_pixel_width(size.width);
        surface.set_pixel_height(size.height);
        surface.fill_container();
        Self { surface, size }
    }

    /// Set the pixel width. Clears the surface.
    pub fn set_width(&mut self, width: NonZeroU32) {
        self.size.width = width.get();
        self.surface.set_pixel_width(width.get());
        log::debug!("surface width -> {width}px");
    }

    /// Set the pixel height. Clears the surface.
    pub fn set_height(&mut self, height: NonZeroU32) {
        self.size.height = height.get();
        self.surface.set_pixel_height(height.get());
        log::debug!("surface height -> {height}px");
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
