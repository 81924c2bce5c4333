//! In-RAM framebuffer with per-pixel change detection.
//!
//! The bar stack is drawn into this buffer first. Afterwards only the
//! rectangle that contains changed pixels is copied to the real display, in a
//! single `fill_contiguous` call.

use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use crate::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

const WIDTH: usize = DISPLAY_WIDTH_PX as usize;
const HEIGHT: usize = DISPLAY_HEIGHT_PX as usize;

/// Total number of pixels in the framebuffer (144 x 168 = 24,192).
const PIXEL_COUNT: usize = WIDTH * HEIGHT;

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }
}

/// Screen-sized `DrawTarget<Color = Rgb565>` backed by a fixed array.
///
/// Drawing outside the screen is clipped silently, which is what lets the
/// renderer hand over off-scale bar widths unchanged.
pub struct FrameBuffer {
    pixels: [Rgb565; PIXEL_COUNT],
    dirty: Option<DirtyRect>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// A framebuffer filled with black pixels.
    pub const fn new() -> Self {
        Self {
            pixels: [Rgb565::BLACK; PIXEL_COUNT],
            dirty: None,
        }
    }

    /// Color at `(x, y)`, or `None` outside the screen.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        let x = usize::try_from(x).ok().filter(|&x| x < WIDTH)?;
        let y = usize::try_from(y).ok().filter(|&y| y < HEIGHT)?;
        Some(self.pixels[y * WIDTH + x])
    }

    /// Whether anything changed since the last flush.
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * WIDTH + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Copy the changed region to `display`, then reset the dirty state.
    ///
    /// If nothing changed, this is a no-op.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let width = rect.max_x - rect.min_x + 1;
        let height = rect.max_y - rect.min_y + 1;

        debug!(
            "Flushing {}x{} dirty region at ({}, {})",
            width, height, rect.min_x, rect.min_y
        );

        let area = Rectangle::new(
            Point::new(rect.min_x as i32, rect.min_y as i32),
            Size::new(width as u32, height as u32),
        );

        let pixels = &self.pixels;
        let pixel_iter = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row_start = y * WIDTH + rect.min_x;
            pixels[row_start..row_start + width].iter().copied()
        });

        display.fill_contiguous(&area, pixel_iter)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let (Ok(x), Ok(y)) = (usize::try_from(coord.x), usize::try_from(coord.y))
                && x < WIDTH
                && y < HEIGHT
            {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let visible = area.intersection(&self.bounding_box());
        let Some(bottom_right) = visible.bottom_right() else {
            return Ok(());
        };

        for y in visible.top_left.y..=bottom_right.y {
            for x in visible.top_left.x..=bottom_right.x {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}
