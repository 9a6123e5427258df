//! Neon drawing primitives shared across views.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Text, TextStyle};

use crate::animations::glow::GlowPlan;
use crate::colors::{Palette, blend, rgb, scale};

/// Glitch channel split: red copy shifted left, blue copy shifted right.
const SPLIT_RED: Rgb565 = rgb(255, 0, 60);
const SPLIT_BLUE: Rgb565 = rgb(0, 80, 255);
const SPLIT_DX: i32 = 2;

/// Draw text with the simple neon treatment.
///
/// `glitch` is the burst offset, `None` outside a burst. During a burst red
/// and blue copies are drawn either side of the glitched position, even when
/// the offset happens to be `(0, 0)`. A 1 px shadow copy and the main copy
/// follow.
#[allow(clippy::too_many_arguments)]
pub fn draw_neon_text<D>(
    display: &mut D,
    text: &str,
    position: Point,
    font: &MonoFont<'_>,
    color: Rgb565,
    shadow: Rgb565,
    glitch: Option<(i32, i32)>,
    text_style: TextStyle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let (dx, dy) = glitch.unwrap_or((0, 0));
    let pos = position + Point::new(dx, dy);

    if glitch.is_some() {
        Text::with_text_style(text, pos - Point::new(SPLIT_DX, 0), MonoTextStyle::new(font, SPLIT_RED), text_style)
            .draw(display)
            .ok();
        Text::with_text_style(text, pos + Point::new(SPLIT_DX, 0), MonoTextStyle::new(font, SPLIT_BLUE), text_style)
            .draw(display)
            .ok();
    }

    Text::with_text_style(text, pos + Point::new(1, 1), MonoTextStyle::new(font, shadow), text_style)
        .draw(display)
        .ok();
    Text::with_text_style(text, pos, MonoTextStyle::new(font, color), text_style)
        .draw(display)
        .ok();
}

/// Draw text with a multi-layer glow halo, then the bright foreground copy.
///
/// Layers are drawn outermost first so inner (stronger) layers land on top.
/// Each layer is four copies offset by the layer radius.
#[allow(clippy::too_many_arguments)]
pub fn draw_glow_text<D>(
    display: &mut D,
    text: &str,
    position: Point,
    font: &MonoFont<'_>,
    plan: &GlowPlan,
    glow: Rgb565,
    foreground: Rgb565,
    background: Rgb565,
    text_style: TextStyle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let mut alphas = [0.0f32; 16];
    for (slot, a) in alphas.iter_mut().zip(plan.layer_alphas()) {
        *slot = a;
    }

    for index in (0..plan.layers.min(16)).rev() {
        let r = GlowPlan::layer_radius(index);
        let color = blend(glow, background, alphas[index as usize]);
        let style = MonoTextStyle::new(font, color);
        for (dx, dy) in [(-r, 0), (r, 0), (0, -r), (0, r)] {
            Text::with_text_style(text, position + Point::new(dx, dy), style, text_style)
                .draw(display)
                .ok();
        }
    }

    let fg = scale(foreground, plan.brightness + 0.1);
    Text::with_text_style(text, position, MonoTextStyle::new(font, fg), text_style)
        .draw(display)
        .ok();
}

/// Horizontal neon line: dim outer strokes around a bright core.
pub fn draw_neon_hline<D>(
    display: &mut D,
    x0: i32,
    x1: i32,
    y: i32,
    color: Rgb565,
    background: Rgb565,
    level: f32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let halo = PrimitiveStyle::with_stroke(blend(color, background, 0.35 * level), 1);
    let core = PrimitiveStyle::with_stroke(scale(color, level), 1);
    Line::new(Point::new(x0, y - 1), Point::new(x1, y - 1))
        .into_styled(halo)
        .draw(display)
        .ok();
    Line::new(Point::new(x0, y + 1), Point::new(x1, y + 1))
        .into_styled(halo)
        .draw(display)
        .ok();
    Line::new(Point::new(x0, y), Point::new(x1, y))
        .into_styled(core)
        .draw(display)
        .ok();
}

/// L-shaped brackets in the four corners of `area`.
pub fn draw_corner_brackets<D>(
    display: &mut D,
    area: Rectangle,
    size: i32,
    thickness: u32,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let style = PrimitiveStyle::with_stroke(color, thickness);
    let tl = area.top_left;
    let br = tl + Point::new(area.size.width as i32 - 1, area.size.height as i32 - 1);
    let corners = [
        (tl, 1, 1),
        (Point::new(br.x, tl.y), -1, 1),
        (Point::new(tl.x, br.y), 1, -1),
        (br, -1, -1),
    ];
    for (c, sx, sy) in corners {
        Line::new(c, c + Point::new(sx * size, 0))
            .into_styled(style)
            .draw(display)
            .ok();
        Line::new(c, c + Point::new(0, sy * size))
            .into_styled(style)
            .draw(display)
            .ok();
    }
}

/// Two nested rectangle outlines, `inset` pixels apart.
pub fn draw_double_frame<D>(
    display: &mut D,
    area: Rectangle,
    inset: u32,
    outer: Rgb565,
    inner: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    area.into_styled(PrimitiveStyle::with_stroke(outer, 1))
        .draw(display)
        .ok();
    area.offset(-(inset as i32))
        .into_styled(PrimitiveStyle::with_stroke(inner, 1))
        .draw(display)
        .ok();
}

/// Title with a neon drop copy, as used at the top of the static views.
pub fn draw_view_title<D>(
    display: &mut D,
    title: &str,
    center_x: i32,
    y: i32,
    font: &MonoFont<'_>,
    palette: &Palette,
    text_style: TextStyle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Text::with_text_style(title, Point::new(center_x + 1, y + 1), MonoTextStyle::new(font, palette.pink), text_style)
        .draw(display)
        .ok();
    Text::with_text_style(title, Point::new(center_x, y), MonoTextStyle::new(font, rgb(255, 150, 230)), text_style)
        .draw(display)
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::{CENTERED, HEADER_FONT};
    use crate::testing::TestSink;

    #[test]
    fn test_neon_text_draws_extra_copies_when_glitched() {
        let p = Palette::neon();
        let mut calm = TestSink::new();
        draw_neon_text(&mut calm, "G2S", Point::new(120, 20), HEADER_FONT, p.cyan, p.shadow, None, CENTERED);
        let mut glitched = TestSink::new();
        draw_neon_text(&mut glitched, "G2S", Point::new(120, 20), HEADER_FONT, p.cyan, p.shadow, Some((2, 1)), CENTERED);
        assert!(glitched.pixels_drawn() > calm.pixels_drawn(), "channel split adds two copies");
    }

    #[test]
    fn test_channel_split_kept_for_zero_burst_offset() {
        let p = Palette::neon();
        let mut calm = TestSink::new();
        draw_neon_text(&mut calm, "G2S", Point::new(120, 20), HEADER_FONT, p.cyan, p.shadow, None, CENTERED);
        let mut burst = TestSink::new();
        draw_neon_text(&mut burst, "G2S", Point::new(120, 20), HEADER_FONT, p.cyan, p.shadow, Some((0, 0)), CENTERED);
        assert!(burst.pixels_drawn() > calm.pixels_drawn(), "split is tied to the burst, not the offset");
    }

    #[test]
    fn test_glow_layers_scale_draw_work() {
        let p = Palette::neon();
        let mut bright = TestSink::new();
        draw_glow_text(
            &mut bright,
            "Yann",
            Point::new(120, 110),
            HEADER_FONT,
            &GlowPlan::for_intensity(1.0),
            p.glow,
            p.white,
            p.background,
            CENTERED,
        );
        let mut dim = TestSink::new();
        draw_glow_text(
            &mut dim,
            "Yann",
            Point::new(120, 110),
            HEADER_FONT,
            &GlowPlan::for_intensity(0.1),
            p.glow,
            p.white,
            p.background,
            CENTERED,
        );
        assert!(bright.pixels_drawn() > dim.pixels_drawn());
    }

    #[test]
    fn test_corner_brackets_stay_inside_area() {
        let mut sink = TestSink::new();
        let area = Rectangle::new(Point::new(10, 10), Size::new(100, 50));
        draw_corner_brackets(&mut sink, area, 15, 1, Palette::neon().cyan);
        assert!(sink.pixels_drawn() > 0);
        assert!(sink.bounding_box_drawn().is_some_and(|b| area.contains(b.top_left)));
    }
}
