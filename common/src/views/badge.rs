//! Neon name badge.
//!
//! Layers, back to front:
//! background and scrolling scanlines, ambient particles, corner triangles and
//! pulsing side rails, double border, corner brackets, the header counter,
//! the glowing name, separator, team/city/role lines and the chip drawing.
//!
//! The badge is the only writer of the animation fields in [`AppState`]; it
//! steps them once per rendered frame before drawing.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle, Triangle};
use heapless::String;
use rand::RngCore;

use super::{RedrawFlags, View, ViewContext};
use crate::animations::glow::GlowPlan;
use crate::animations::pulses::SCANLINE_SPACING;
use crate::animations::{self, sin};
use crate::colors::{Palette, blend, tinted};
use crate::event_log::push_u32;
use crate::state::AppState;
use crate::styles::{CENTERED, DETAIL_FONT, HEADER_FONT, NAME_FONT};
use crate::widgets::{draw_corner_brackets, draw_double_frame, draw_glow_text, draw_neon_hline, draw_neon_text};

// =============================================================================
// Layout
// =============================================================================

const HEADER_Y: i32 = 20;
const FIRST_NAME_Y: i32 = 110;
const LAST_NAME_Y: i32 = 145;
const SEPARATOR_Y: i32 = 180;
const TEAM_Y: i32 = 200;
const CITY_Y: i32 = 230;
const ROLE_Y: i32 = 260;

const BORDER_INSET: i32 = 4;
const CORNER_SIZE: i32 = 15;
const CORNER_THICKNESS: u32 = 2;
const TRIANGLE_SIZE: i32 = 22;

/// Chip drawing anchor, measured from the bottom-right corner.
const CHIP_MARGIN_X: i32 = 52;
const CHIP_MARGIN_Y: i32 = 50;

/// Particle tint channel factors.
const PARTICLE_TINT: (f32, f32, f32) = (0.6, 0.8, 1.0);

pub struct BadgeView {
    palette: Palette,
    flags: RedrawFlags,
}

impl BadgeView {
    pub const fn new(palette: Palette) -> Self {
        Self {
            palette,
            flags: RedrawFlags::dynamic(),
        }
    }

    fn draw_background<D>(
        &self,
        display: &mut D,
        state: &AppState,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        display.clear(self.palette.background).ok();

        let style = PrimitiveStyle::with_stroke(self.palette.scanline, 1);
        let w = state.width as i32;
        let mut y = state.pulses.scanline_offset;
        while y < state.height as f32 {
            Line::new(Point::new(0, y as i32), Point::new(w - 1, y as i32))
                .into_styled(style)
                .draw(display)
                .ok();
            y += SCANLINE_SPACING;
        }
    }

    fn draw_particles<D>(
        &self,
        display: &mut D,
        state: &AppState,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let pulse = 0.75 + 0.25 * sin(state.pulses.corner_phase);
        let (r, g, b) = PARTICLE_TINT;
        for p in state.particles.iter().filter(|p| p.active) {
            let color = tinted(p.alpha * pulse * (200.0 / 255.0), r, g, b);
            Rectangle::new(Point::new(p.x as i32, p.y as i32), Size::new(p.size, p.size))
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(display)
                .ok();
        }
    }

    fn draw_geometry<D>(
        &self,
        display: &mut D,
        state: &AppState,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let p = &self.palette;
        let (w, h) = (state.width as i32, state.height as i32);
        let edge = BORDER_INSET + 4;
        let tri = PrimitiveStyle::with_stroke(blend(p.violet, p.background, 0.35), 1);

        let s = TRIANGLE_SIZE;
        let triangles = [
            Triangle::new(Point::new(edge, edge), Point::new(edge + s, edge), Point::new(edge, edge + s)),
            Triangle::new(Point::new(w - 1 - edge, edge), Point::new(w - 1 - edge - s, edge), Point::new(w - 1 - edge, edge + s)),
            Triangle::new(Point::new(edge, h - 1 - edge), Point::new(edge + s, h - 1 - edge), Point::new(edge, h - 1 - edge - s)),
            Triangle::new(
                Point::new(w - 1 - edge, h - 1 - edge),
                Point::new(w - 1 - edge - s, h - 1 - edge),
                Point::new(w - 1 - edge, h - 1 - edge - s),
            ),
        ];
        for t in triangles {
            t.into_styled(tri).draw(display).ok();
        }

        // Side rails grow and shrink with the border pulse
        let rail = (0.5 + 0.5 * sin(state.pulses.border_phase)) * (h as f32 * 0.25);
        let mid = h / 2;
        let rail_style = PrimitiveStyle::with_stroke(blend(p.cyan, p.background, 0.5), 1);
        for x in [edge + 2, w - 3 - edge] {
            Line::new(Point::new(x, mid - rail as i32), Point::new(x, mid + rail as i32))
                .into_styled(rail_style)
                .draw(display)
                .ok();
        }
    }

    fn draw_frame<D>(
        &self,
        display: &mut D,
        state: &AppState,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let p = &self.palette;
        let area = Rectangle::new(
            Point::new(BORDER_INSET, BORDER_INSET),
            Size::new(
                state.width.saturating_sub(2 * BORDER_INSET as u32),
                state.height.saturating_sub(2 * BORDER_INSET as u32),
            ),
        );

        let border_level = 0.55 + 0.45 * sin(state.pulses.border_phase);
        draw_double_frame(
            display,
            area,
            3,
            blend(p.violet, p.background, border_level),
            blend(p.pink, p.background, border_level * 0.6),
        );

        let corner_level = 0.6 + 0.4 * sin(state.pulses.corner_phase);
        draw_corner_brackets(
            display,
            area.offset(-1),
            CORNER_SIZE,
            CORNER_THICKNESS,
            blend(p.cyan, p.background, corner_level),
        );
    }

    fn draw_text<D>(
        &self,
        display: &mut D,
        state: &AppState,
        user: &crate::config::UserInfo,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let p = &self.palette;
        let cx = state.center_x();
        let burst = state.glitch.burst_offset();
        let glitch = state.glitch.offset();
        let intensity = state.flicker.intensity();

        let mut header: String<24> = String::new();
        push_u32(&mut header, state.percent.value());
        header.push_str("% ").ok();
        header.push_str(user.event).ok();
        draw_neon_text(display, &header, Point::new(cx, HEADER_Y), HEADER_FONT, p.yellow, p.shadow, burst, CENTERED);

        let plan = GlowPlan::for_intensity(intensity);
        let glow = blend(p.glow, p.background, 0.85);
        let name_offset = Point::new(glitch.0, glitch.1);
        for (text, y) in [(user.first_name, FIRST_NAME_Y), (user.last_name, LAST_NAME_Y)] {
            draw_glow_text(
                display,
                text,
                Point::new(cx, y) + name_offset,
                NAME_FONT,
                &plan,
                glow,
                p.white,
                p.background,
                CENTERED,
            );
        }

        draw_neon_hline(
            display,
            30 + glitch.0,
            state.width as i32 - 31 + glitch.0,
            SEPARATOR_Y + glitch.1,
            p.cyan,
            p.background,
            intensity,
        );

        for (text, y, color) in [(user.team, TEAM_Y, p.violet), (user.city, CITY_Y, p.cyan), (user.role, ROLE_Y, p.yellow)] {
            draw_neon_text(display, text, Point::new(cx, y), DETAIL_FONT, color, p.shadow, burst, CENTERED);
        }
    }

    fn draw_chip<D>(
        &self,
        display: &mut D,
        state: &AppState,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let alpha = state.chip.alpha();
        if alpha <= 0.0 {
            return;
        }
        let origin = Point::new(state.width as i32 - CHIP_MARGIN_X, state.height as i32 - CHIP_MARGIN_Y);
        let style = PrimitiveStyle::with_stroke(blend(self.palette.cyan, self.palette.background, alpha), 1);
        for (a, b) in state.chip.visible_strokes(origin) {
            Line::new(a, b).into_styled(style).draw(display).ok();
        }
    }
}

impl View for BadgeView {
    fn render<D, R>(
        &mut self,
        display: &mut D,
        ctx: &mut ViewContext<'_, R>,
    ) where
        D: DrawTarget<Color = Rgb565> + OriginDimensions,
        R: RngCore,
    {
        if !self.flags.has_initial_render() {
            ctx.state.percent.reset();
        }
        animations::step(ctx.state, ctx.rng);

        let state = &*ctx.state;
        self.draw_background(display, state);
        self.draw_particles(display, state);
        self.draw_geometry(display, state);
        self.draw_frame(display, state);
        self.draw_text(display, state, ctx.user);
        self.draw_chip(display, state);
    }

    fn flags(&self) -> &RedrawFlags { &self.flags }

    fn flags_mut(&mut self) -> &mut RedrawFlags { &mut self.flags }

    fn name(&self) -> &'static str { "Badge" }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::{Settings, UserInfo};
    use crate::event_log::EventLog;
    use crate::testing::TestSink;

    #[test]
    fn test_render_steps_animations_and_draws() {
        let mut state = AppState::new(240, 320);
        let mut rng = SmallRng::seed_from_u64(3);
        let mut settings = Settings::new();
        let user = UserInfo::demo();
        let mut log = EventLog::new();
        let mut view = BadgeView::new(Palette::neon());
        let mut sink = TestSink::new();

        state.advance(0.5, 0.5, 500);
        let mut ctx = ViewContext {
            state: &mut state,
            rng: &mut rng,
            settings: &mut settings,
            user: &user,
            log: &mut log,
        };
        view.render(&mut sink, &mut ctx);
        view.mark_rendered();

        assert!(state.percent.value() > 0, "counter advances on render");
        assert!(sink.pixels_drawn() > (240 * 320) as usize, "background plus decorations");
        assert_eq!(
            sink.bounding_box_drawn(),
            Some(Rectangle::new(Point::zero(), Size::new(240, 320))),
            "badge covers the whole screen"
        );
    }

    #[test]
    fn test_force_redraw_restarts_counter() {
        let mut state = AppState::new(240, 320);
        let mut rng = SmallRng::seed_from_u64(3);
        let mut settings = Settings::new();
        let user = UserInfo::demo();
        let mut log = EventLog::new();
        let mut view = BadgeView::new(Palette::neon());
        let mut sink = TestSink::new();

        for i in 1..=60u64 {
            state.advance(0.05, i as f32 * 0.05, i * 50);
            let mut ctx = ViewContext {
                state: &mut state,
                rng: &mut rng,
                settings: &mut settings,
                user: &user,
                log: &mut log,
            };
            view.render(&mut sink, &mut ctx);
            view.mark_rendered();
        }
        assert_eq!(state.percent.value(), 100);

        view.force_redraw();
        state.advance(0.05, 3.05, 3_050);
        let mut ctx = ViewContext {
            state: &mut state,
            rng: &mut rng,
            settings: &mut settings,
            user: &user,
            log: &mut log,
        };
        view.render(&mut sink, &mut ctx);
        assert!(state.percent.value() < 20, "counter restarts after force_redraw");
    }

    #[test]
    fn test_badge_does_not_consume_taps() {
        let mut state = AppState::new(240, 320);
        let mut rng = SmallRng::seed_from_u64(0);
        let mut settings = Settings::new();
        let user = UserInfo::demo();
        let mut log = EventLog::new();
        let mut view = BadgeView::new(Palette::neon());
        let mut ctx = ViewContext {
            state: &mut state,
            rng: &mut rng,
            settings: &mut settings,
            user: &user,
            log: &mut log,
        };
        assert!(!view.handle_touch(200, 100, &mut ctx));
    }
}
