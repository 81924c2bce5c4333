//! Drawing the bar stack
//!
//! Rendering is a stateless pass over the enabled bars in catalog order. Each
//! bar is a rectangle growing from the left edge, rounded on its leading
//! (right) corners, with its label just past the filled edge. Labels are
//! clamped so they always stay fully on screen, whatever the fill width.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, iso_8859_1::FONT_7X13};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    CornerRadiiBuilder, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle,
    StrokeAlignment,
};
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text};

use crate::DISPLAY_WIDTH_PX;
use crate::catalog::BarKind;
use crate::layout::Layout;
use crate::settings::{BarStyle, Settings};
use crate::state::{BarState, BarTable};

/// Radius of the rounded leading corners.
pub const CORNER_RADIUS_PX: u32 = 4;

/// Gap between the filled edge and the label.
pub const LABEL_HORIZ_SPACING_PX: i32 = 1;

/// Width of the outline drawn around label glyphs.
pub const LABEL_OUTLINE_PX: i32 = 1;

/// Border width of outline-style bars.
pub const OUTLINE_STROKE_PX: u32 = 2;

/// Label font. ISO 8859-1 so the degree sign renders.
pub const LABEL_FONT: &MonoFont<'static> = &FONT_7X13;

const SCREEN_WIDTH: i32 = DISPLAY_WIDTH_PX as i32;

/// Filled width in pixels for `progress`, truncated toward zero.
///
/// Not clamped: off-scale progress yields widths outside `0..=SCREEN_WIDTH`.
pub fn filled_width(progress: f32) -> i32 {
    (DISPLAY_WIDTH_PX as f32 * progress) as i32
}

/// Round half away from zero to whole pixels.
pub fn round_px(value: f32) -> i32 {
    libm::roundf(value) as i32
}

/// Left edge of a label `label_width` pixels wide after a fill of
/// `filled_width` pixels.
///
/// The label and its outline stay on screen:
/// `LABEL_OUTLINE_PX..=SCREEN_WIDTH - label_width - LABEL_OUTLINE_PX`.
pub fn label_x(filled_width: i32, label_width: i32) -> i32 {
    filled_width
        .saturating_add(LABEL_HORIZ_SPACING_PX)
        .min(SCREEN_WIDTH - label_width - LABEL_OUTLINE_PX)
        .max(LABEL_OUTLINE_PX)
}

/// Rendered width of `text` in the label font.
pub fn label_width(text: &str) -> i32 {
    let style = MonoTextStyle::new(LABEL_FONT, Rgb565::WHITE);
    style
        .measure_string(text, Point::zero(), Baseline::Top)
        .bounding_box
        .size
        .width as i32
}

/// Draw `text` with its top-left corner at `position`, surrounded by a
/// [`LABEL_OUTLINE_PX`] outline.
pub fn draw_outlined_text<D>(
    target: &mut D,
    text: &str,
    position: Point,
    color: Rgb565,
    outline_color: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let outline_style = MonoTextStyle::new(LABEL_FONT, outline_color);
    for dy in -LABEL_OUTLINE_PX..=LABEL_OUTLINE_PX {
        for dx in -LABEL_OUTLINE_PX..=LABEL_OUTLINE_PX {
            if dx != 0 || dy != 0 {
                let offset = Point::new(dx, dy);
                Text::with_baseline(text, position + offset, outline_style, Baseline::Top)
                    .draw(target)?;
            }
        }
    }
    let style = MonoTextStyle::new(LABEL_FONT, color);
    Text::with_baseline(text, position, style, Baseline::Top).draw(target)?;
    Ok(())
}

/// Everything needed to draw one frame.
pub struct BarsView<'a> {
    pub settings: &'a Settings,
    pub table: &'a BarTable,
    pub layout: &'a Layout,
}

impl<'a> BarsView<'a> {
    pub fn new(settings: &'a Settings, table: &'a BarTable, layout: &'a Layout) -> Self {
        Self {
            settings,
            table,
            layout,
        }
    }

    fn bar_style(&self, kind: BarKind) -> PrimitiveStyle<Rgb565> {
        let color = self.settings.bar_color(kind).to_rgb565();
        match self.settings.bar_style {
            BarStyle::Solid => PrimitiveStyle::with_fill(color),
            BarStyle::Outline => PrimitiveStyleBuilder::new()
                .stroke_color(color)
                .stroke_width(OUTLINE_STROKE_PX)
                .stroke_alignment(StrokeAlignment::Inside)
                .build(),
        }
    }

    fn draw_bar<D>(
        &self,
        target: &mut D,
        kind: BarKind,
        bar: &BarState,
        top: i32,
        height: i32,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let width = filled_width(bar.progress);
        if width > 0 && height > 0 {
            let area = Rectangle::new(
                Point::new(0, top),
                Size::new(width as u32, height as u32),
            );
            let corners = CornerRadiiBuilder::new()
                .right(Size::new_equal(CORNER_RADIUS_PX))
                .build();
            RoundedRectangle::new(area, corners)
                .into_styled(self.bar_style(kind))
                .draw(target)?;
        }

        let label = bar.label.as_str();
        if label.is_empty() {
            return Ok(());
        }
        let text_height = LABEL_FONT.character_size.height as i32;
        let position = Point::new(
            label_x(width, label_width(label)),
            top + (height - text_height) / 2,
        );
        draw_outlined_text(
            target,
            label,
            position,
            self.settings.text_color.to_rgb565(),
            self.settings.text_outline_color.to_rgb565(),
        )
    }
}

impl Drawable for BarsView<'_> {
    type Color = Rgb565;
    type Output = ();

    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        target.clear(self.settings.background_color.to_rgb565())?;

        let height = round_px(self.layout.bar_height());
        for (kind, top) in self.settings.enabled_bars().zip(self.layout.offsets()) {
            self.draw_bar(target, kind, &self.table[kind], round_px(top), height)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DISPLAY_HEIGHT_PX;
    use crate::framebuffer::FrameBuffer;
    use crate::settings::HexColor;
    use enumset::EnumSet;

    /// Settings showing only the battery bar: one bar, 152px tall at y = 8.
    fn battery_only() -> Settings {
        Settings {
            show_bar: EnumSet::only(BarKind::Battery),
            ..Settings::default()
        }
    }

    fn render(settings: &Settings, table: &BarTable) -> FrameBuffer {
        let layout = Layout::compute(settings.enabled_count(), DISPLAY_HEIGHT_PX).unwrap();
        let mut fb = FrameBuffer::new();
        BarsView::new(settings, table, &layout).draw(&mut fb).unwrap();
        fb
    }

    fn table_with_battery(progress: f32, label: &str) -> BarTable {
        let mut table = BarTable::new();
        table[BarKind::Battery].set(progress, format_args!("{}", label));
        table
    }

    fn count_pixels(fb: &FrameBuffer, color: Rgb565) -> usize {
        let mut count = 0;
        for y in 0..DISPLAY_HEIGHT_PX as i32 {
            for x in 0..SCREEN_WIDTH {
                if fb.pixel(x, y) == Some(color) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_label_stays_on_screen() {
        for width in [-500, -1, 0, 1, 72, 100, 143, 144, 200, 10_000, i32::MAX] {
            for label in [0, 7, 21, 49] {
                let x = label_x(width, label);
                assert!(x - LABEL_OUTLINE_PX >= 0, "width {width} label {label}");
                assert!(
                    x + label + LABEL_OUTLINE_PX <= SCREEN_WIDTH,
                    "width {width} label {label}"
                );
            }
        }
        assert_eq!(label_x(72, 21), 73);
        assert_eq!(label_x(216, 21), 122);
        assert_eq!(label_x(-20, 21), 1);
    }

    #[test]
    fn test_filled_width_truncates() {
        assert_eq!(filled_width(0.5), 72);
        assert_eq!(filled_width(0.999), 143);
        assert_eq!(filled_width(1.25), 180);
        assert_eq!(filled_width(-0.1), -14);
    }

    #[test]
    fn test_label_width_in_font_cells() {
        assert_eq!(label_width("50%"), 21);
        assert_eq!(label_width("68\u{00B0}F"), 28);
    }

    #[test]
    fn test_half_full_bar() {
        let fb = render(&battery_only(), &table_with_battery(0.5, "50%"));

        // Filled region, square on the left.
        assert_eq!(fb.pixel(0, 8), Some(Rgb565::RED));
        assert_eq!(fb.pixel(10, 30), Some(Rgb565::RED));
        assert_eq!(fb.pixel(71, 30), Some(Rgb565::RED));
        // Rounded on the right.
        assert_eq!(fb.pixel(71, 8), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(71, 159), Some(Rgb565::BLACK));
        // Nothing past the filled edge or in the gaps.
        assert_eq!(fb.pixel(72, 30), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(10, 7), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(10, 160), Some(Rgb565::BLACK));
        // The white label sits right of the bar.
        assert!(count_pixels(&fb, Rgb565::WHITE) > 0);
        for y in 0..DISPLAY_HEIGHT_PX as i32 {
            for x in 0..73 {
                assert_ne!(fb.pixel(x, y), Some(Rgb565::WHITE), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_empty_bar_draws_only_the_label() {
        let fb = render(&battery_only(), &table_with_battery(0.0, "0%"));
        assert_eq!(count_pixels(&fb, Rgb565::RED), 0);
        assert!(count_pixels(&fb, Rgb565::WHITE) > 0);
    }

    #[test]
    fn test_off_scale_bar_is_clipped() {
        let fb = render(&battery_only(), &table_with_battery(3.0, "300%"));
        assert_eq!(fb.pixel(143, 30), Some(Rgb565::RED));

        let fb = render(&battery_only(), &table_with_battery(-2.0, "-200%"));
        assert_eq!(count_pixels(&fb, Rgb565::RED), 0);
        assert!(count_pixels(&fb, Rgb565::WHITE) > 0);
    }

    #[test]
    fn test_outline_style() {
        let settings = Settings {
            bar_style: BarStyle::Outline,
            ..battery_only()
        };
        let fb = render(&settings, &table_with_battery(0.5, ""));
        assert_eq!(fb.pixel(0, 80), Some(Rgb565::RED));
        assert_eq!(fb.pixel(1, 80), Some(Rgb565::RED));
        assert_eq!(fb.pixel(30, 8), Some(Rgb565::RED));
        assert_eq!(fb.pixel(30, 80), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_background_color() {
        let settings = Settings {
            background_color: HexColor::new(0x00_00_FF),
            ..battery_only()
        };
        let fb = render(&settings, &table_with_battery(0.5, "50%"));
        assert_eq!(fb.pixel(100, 2), Some(Rgb565::BLUE));
        assert_eq!(fb.pixel(10, 30), Some(Rgb565::RED));
    }

    #[test]
    fn test_bars_stack_in_catalog_order() {
        let settings = Settings {
            show_bar: BarKind::Seconds | BarKind::Battery,
            ..Settings::default()
        };
        let mut table = BarTable::new();
        table[BarKind::Seconds].progress = 1.0;
        table[BarKind::Battery].progress = 1.0;
        let fb = render(&settings, &table);

        // Two bars of 72px: seconds at y = 8, battery at y = 88.
        let seconds = HexColor::new(0x00_AA_FF).to_rgb565();
        assert_eq!(fb.pixel(20, 40), Some(seconds));
        assert_eq!(fb.pixel(20, 84), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(20, 120), Some(Rgb565::RED));
    }
}
