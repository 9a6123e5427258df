//! Settings screen: two brightness sliders, awake timeout stepper, rotation
//! checkbox.
//!
//! The view only edits [`Settings`] through the context. Applying the change
//! (backlight, rotation) and persisting it is the display manager's job, which
//! compares the settings before and after each call.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use heapless::String;
use rand::RngCore;

use super::{RedrawFlags, View, ViewContext};
use crate::colors::{Palette, blend};
use crate::config::Settings;
use crate::event_log::push_u32;
use crate::styles::{BODY_FONT, CENTERED, HEADER_FONT, LEFT_MIDDLE, SMALL_FONT};
use crate::widgets::{draw_button, draw_checkbox, draw_slider, draw_value_box, draw_view_title, hit, slider_value_at};

// =============================================================================
// Layout
// =============================================================================

const ACTIVE_SLIDER: Rectangle = Rectangle::new(Point::new(20, 50), Size::new(160, 18));
const SLEEP_SLIDER: Rectangle = Rectangle::new(Point::new(20, 90), Size::new(160, 18));
const STEP_DOWN: Rectangle = Rectangle::new(Point::new(20, 150), Size::new(28, 28));
const STEP_VALUE: Rectangle = Rectangle::new(Point::new(54, 150), Size::new(55, 28));
const STEP_UP: Rectangle = Rectangle::new(Point::new(115, 150), Size::new(28, 28));
const ROTATION_BOX: Rectangle = Rectangle::new(Point::new(20, 230), Size::new(20, 20));

/// Extra touch margin around the controls.
const TOUCH_SLACK: u32 = 4;
/// Vertical margin that keeps a drag on a slider while scrubbing.
const DRAG_SLACK: u32 = 10;

/// The active backlight never goes fully dark from the slider.
const MIN_ACTIVE_BRIGHTNESS: i32 = 1;

pub struct SettingsView {
    palette: Palette,
    flags: RedrawFlags,
}

impl SettingsView {
    pub const fn new(palette: Palette) -> Self {
        Self {
            palette,
            flags: RedrawFlags::static_view(),
        }
    }

    /// Apply a slider position. Returns `true` when `(x, y)` is on a slider.
    fn scrub<R: RngCore>(
        &mut self,
        x: i32,
        y: i32,
        slack: u32,
        ctx: &mut ViewContext<'_, R>,
    ) -> bool {
        if hit(ACTIVE_SLIDER, x, y, slack) {
            let v = slider_value_at(ACTIVE_SLIDER, x).max(MIN_ACTIVE_BRIGHTNESS);
            if i32::from(ctx.settings.active_brightness()) != v {
                ctx.settings.set_active_brightness(v);
                self.flags.invalidate();
            }
            return true;
        }
        if hit(SLEEP_SLIDER, x, y, slack) {
            let v = slider_value_at(SLEEP_SLIDER, x);
            if i32::from(ctx.settings.sleep_brightness()) != v {
                ctx.settings.set_sleep_brightness(v);
                self.flags.invalidate();
            }
            return true;
        }
        false
    }

    fn draw_label<D>(
        &self,
        display: &mut D,
        text: &str,
        at: Point,
        color: Rgb565,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        Text::with_text_style(text, at, MonoTextStyle::new(SMALL_FONT, color), LEFT_MIDDLE)
            .draw(display)
            .ok();
    }

    fn draw_percent<D>(
        &self,
        display: &mut D,
        slider: Rectangle,
        value: u8,
        color: Rgb565,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let mut text: String<8> = String::new();
        push_u32(&mut text, u32::from(value));
        text.push('%').ok();
        let at = Point::new(slider.top_left.x + slider.size.width as i32 + 8, slider.center().y);
        Text::with_text_style(&text, at, MonoTextStyle::new(BODY_FONT, color), LEFT_MIDDLE)
            .draw(display)
            .ok();
    }

    fn draw_controls<D>(
        &self,
        display: &mut D,
        settings: &Settings,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let p = &self.palette;
        let label = p.pink;

        self.draw_label(display, "Luminosite", ACTIVE_SLIDER.top_left - Point::new(0, 9), label);
        draw_slider(display, ACTIVE_SLIDER, settings.active_brightness(), p.cyan, p);
        self.draw_percent(display, ACTIVE_SLIDER, settings.active_brightness(), p.cyan);

        self.draw_label(display, "Lum. veille", SLEEP_SLIDER.top_left - Point::new(0, 9), label);
        draw_slider(display, SLEEP_SLIDER, settings.sleep_brightness(), p.magenta, p);
        self.draw_percent(display, SLEEP_SLIDER, settings.sleep_brightness(), p.magenta);

        self.draw_label(display, "Veille auto.", STEP_DOWN.top_left - Point::new(0, 10), label);
        draw_button(display, STEP_DOWN, "-", p.magenta, p);
        let mut minutes: String<8> = String::new();
        push_u32(&mut minutes, settings.stepper_minutes());
        minutes.push_str(" min").ok();
        draw_value_box(display, STEP_VALUE, &minutes, p.white);
        draw_button(display, STEP_UP, "+", p.magenta, p);

        draw_checkbox(display, ROTATION_BOX, settings.display_rotated(), p.cyan);
        self.draw_label(
            display,
            "Tourner l'ecran 180",
            Point::new(ROTATION_BOX.top_left.x + ROTATION_BOX.size.width as i32 + 8, ROTATION_BOX.center().y),
            p.cyan,
        );
    }
}

impl View for SettingsView {
    fn render<D, R>(
        &mut self,
        display: &mut D,
        ctx: &mut ViewContext<'_, R>,
    ) where
        D: DrawTarget<Color = Rgb565> + OriginDimensions,
        R: RngCore,
    {
        let p = &self.palette;
        let size = display.size();
        let cx = (size.width / 2) as i32;
        display.clear(p.background).ok();

        draw_view_title(display, "REGLAGES", cx, 14, HEADER_FONT, p, CENTERED);
        Line::new(Point::new(12, 30), Point::new(size.width as i32 - 13, 30))
            .into_styled(PrimitiveStyle::with_stroke(blend(p.violet, p.background, 0.6), 1))
            .draw(display)
            .ok();

        self.draw_controls(display, ctx.settings);

        Text::with_text_style(
            "Touchez ailleurs pour revenir",
            Point::new(cx, size.height as i32 - 16),
            MonoTextStyle::new(SMALL_FONT, p.dim),
            CENTERED,
        )
        .draw(display)
        .ok();
    }

    fn flags(&self) -> &RedrawFlags { &self.flags }

    fn flags_mut(&mut self) -> &mut RedrawFlags { &mut self.flags }

    /// Taps outside every control are not consumed, which returns to the
    /// previous view.
    fn handle_touch<R: RngCore>(
        &mut self,
        x: i32,
        y: i32,
        ctx: &mut ViewContext<'_, R>,
    ) -> bool {
        if hit(ROTATION_BOX, x, y, TOUCH_SLACK) {
            ctx.settings.toggle_rotation();
            self.flags.invalidate();
            return true;
        }
        if self.scrub(x, y, TOUCH_SLACK, ctx) {
            return true;
        }
        for (button, up) in [(STEP_DOWN, false), (STEP_UP, true)] {
            if hit(button, x, y, TOUCH_SLACK) {
                ctx.settings.step_awake_timeout(up);
                self.flags.invalidate();
                return true;
            }
        }
        false
    }

    fn handle_drag<R: RngCore>(
        &mut self,
        x: i32,
        y: i32,
        ctx: &mut ViewContext<'_, R>,
    ) -> bool {
        self.scrub(x, y, DRAG_SLACK, ctx)
    }

    fn name(&self) -> &'static str { "Settings" }
}
