//! Touch controls: buttons, sliders, checkbox, stepper.
//!
//! Drawing and hit testing share the same rectangles so the visible control is
//! exactly the touchable one.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use crate::colors::{Palette, blend};
use crate::styles::{BODY_FONT, CENTERED};

/// Outlined button with a centered label.
pub fn draw_button<D>(
    display: &mut D,
    area: Rectangle,
    label: &str,
    color: Rgb565,
    palette: &Palette,
) where
    D: DrawTarget<Color = Rgb565>,
{
    area.into_styled(PrimitiveStyle::with_fill(blend(color, palette.background_dark, 0.2)))
        .draw(display)
        .ok();
    area.into_styled(PrimitiveStyle::with_stroke(color, 2))
        .draw(display)
        .ok();
    Text::with_text_style(label, area.center(), MonoTextStyle::new(BODY_FONT, color), CENTERED)
        .draw(display)
        .ok();
}

/// Horizontal slider: track outline, filled part, knob.
pub fn draw_slider<D>(
    display: &mut D,
    area: Rectangle,
    percent: u8,
    color: Rgb565,
    palette: &Palette,
) where
    D: DrawTarget<Color = Rgb565>,
{
    area.into_styled(PrimitiveStyle::with_fill(palette.background_dark))
        .draw(display)
        .ok();
    area.into_styled(PrimitiveStyle::with_stroke(palette.dim, 1))
        .draw(display)
        .ok();

    let inner_w = area.size.width.saturating_sub(4);
    let filled = inner_w * u32::from(percent.min(100)) / 100;
    if filled > 0 {
        Rectangle::new(area.top_left + Point::new(2, 2), Size::new(filled, area.size.height.saturating_sub(4)))
            .into_styled(PrimitiveStyle::with_fill(blend(color, palette.background_dark, 0.6)))
            .draw(display)
            .ok();
    }

    let knob_x = area.top_left.x + 2 + filled as i32;
    Line::new(
        Point::new(knob_x, area.top_left.y - 2),
        Point::new(knob_x, area.top_left.y + area.size.height as i32 + 1),
    )
    .into_styled(PrimitiveStyle::with_stroke(color, 3))
    .draw(display)
    .ok();
}

/// Slider value (0-100) for a touch at `x`, clamped to the track.
pub fn slider_value_at(
    area: Rectangle,
    x: i32,
) -> i32 {
    let w = area.size.width.max(1) as i32;
    let rel = (x - area.top_left.x).clamp(0, w);
    rel * 100 / w
}

/// Square checkbox; a filled inner square when checked.
pub fn draw_checkbox<D>(
    display: &mut D,
    area: Rectangle,
    checked: bool,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    area.into_styled(PrimitiveStyle::with_stroke(color, 2))
        .draw(display)
        .ok();
    if checked {
        area.offset(-4)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(display)
            .ok();
    }
}

/// Outlined box with a centered value label.
pub fn draw_value_box<D>(
    display: &mut D,
    area: Rectangle,
    label: &str,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    area.into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(display)
        .ok();
    Text::with_text_style(label, area.center(), MonoTextStyle::new(BODY_FONT, color), CENTERED)
        .draw(display)
        .ok();
}

/// Hit test with a few pixels of slack around the control.
#[inline]
pub fn hit(
    area: Rectangle,
    x: i32,
    y: i32,
    slack: u32,
) -> bool {
    area.offset(slack as i32).contains(Point::new(x, y))
}
