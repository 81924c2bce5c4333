//! Vertical layout of the bar stack
//!
//! All enabled bars share one height, chosen so that the bars plus a fixed
//! gap above, between and below them exactly fill the screen height.

use crate::error::LayoutError;

/// Vertical gap around each bar, in pixels.
pub const BAR_SPACING_PX: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    bar_height: f32,
    bar_count: usize,
}

impl Layout {
    /// Lay out `bar_count` bars on a screen `screen_height` pixels tall.
    pub fn compute(bar_count: usize, screen_height: u32) -> Result<Self, LayoutError> {
        if bar_count == 0 {
            return Err(LayoutError::NoBarsEnabled);
        }
        let count = bar_count as f32;
        let bar_height = (screen_height as f32 - (count + 1.0) * BAR_SPACING_PX) / count;
        Ok(Self {
            bar_height,
            bar_count,
        })
    }

    pub fn bar_height(&self) -> f32 {
        self.bar_height
    }

    pub fn bar_count(&self) -> usize {
        self.bar_count
    }

    /// Top edge of each bar, in stacking order.
    pub fn offsets(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.bar_count).scan(0.0_f32, move |next_top, _| {
            let top = *next_top + BAR_SPACING_PX;
            *next_top = top + self.bar_height;
            Some(top)
        })
    }
}
