//! User settings
//!
//! Settings are read-only to the engine. They change only when a settings
//! message arrives, after which the reconciler re-derives everything that
//! depends on them.

use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use enumset::EnumSet;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, BarKind};

/// 24-bit `0xRRGGBB` color, as exchanged with the companion app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexColor(u32);

impl HexColor {
    pub const BLACK: Self = Self::new(0x00_00_00);
    pub const WHITE: Self = Self::new(0xFF_FF_FF);

    /// Create a color, ignoring bits above the low 24.
    pub const fn new(rgb: u32) -> Self {
        Self(rgb & 0xFF_FF_FF)
    }

    pub const fn rgb(self) -> u32 {
        self.0
    }

    /// Convert to the display's native 16-bit color.
    pub fn to_rgb565(self) -> Rgb565 {
        let [_, r, g, b] = self.0.to_be_bytes();
        Rgb888::new(r, g, b).into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
}

/// How a bar's filled portion is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarStyle {
    Solid,
    Outline,
}

/// All user-configurable settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub background_color: HexColor,
    pub text_color: HexColor,
    pub text_outline_color: HexColor,
    pub bar_colors: [HexColor; BarKind::COUNT],
    pub show_bar: EnumSet<BarKind>,
    pub temperature_scale: TemperatureScale,
    /// Lower display bound, in `temperature_scale` units.
    pub temperature_min: i32,
    /// Upper display bound, in `temperature_scale` units.
    pub temperature_max: i32,
    pub bar_style: BarStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            background_color: HexColor::BLACK,
            text_color: HexColor::WHITE,
            text_outline_color: HexColor::BLACK,
            bar_colors: BarKind::ALL.map(BarKind::default_color),
            show_bar: catalog::default_visible(),
            temperature_scale: TemperatureScale::Fahrenheit,
            temperature_min: 32,
            temperature_max: 100,
            bar_style: BarStyle::Solid,
        }
    }
}

impl Settings {
    pub fn is_shown(&self, kind: BarKind) -> bool {
        self.show_bar.contains(kind)
    }

    pub fn set_shown(&mut self, kind: BarKind, shown: bool) {
        if shown {
            self.show_bar.insert(kind);
        } else {
            self.show_bar.remove(kind);
        }
    }

    /// Number of bars that will be drawn.
    pub fn enabled_count(&self) -> usize {
        self.show_bar.len()
    }

    /// Enabled bars in catalog order.
    pub fn enabled_bars(&self) -> impl Iterator<Item = BarKind> {
        self.show_bar.iter()
    }

    pub fn bar_color(&self, kind: BarKind) -> HexColor {
        self.bar_colors[kind.index()]
    }

    /// Whether the combined bar that supersedes `kind` is shown.
    pub fn is_superseded(&self, kind: BarKind) -> bool {
        kind.combined_with()
            .is_some_and(|combined| self.is_shown(combined))
    }
}
