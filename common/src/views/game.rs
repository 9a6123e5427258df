//! Crop defense view: drives a [`GameSimulation`] and draws it.

use core::f32::consts::TAU;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::Text;
use heapless::String;
use rand::RngCore;

use super::{RedrawFlags, View, ViewContext};
use crate::animations::{cos, sin};
use crate::colors::{Palette, blend, rgb};
use crate::event_log::push_u32;
use crate::game::{self, Crop, GamePhase, GameSimulation, HUD_HEIGHT, SparkKind, Threat};
use crate::styles::{BODY_FONT, CENTERED, HEADER_FONT, LEFT_MIDDLE, SMALL_FONT};
use crate::widgets::draw_button;

const GRID_STEP: usize = 20;
const CROP_SIZE: f32 = 12.0;
const THREAT_SPRITE: f32 = 16.0;

pub struct GameView {
    palette: Palette,
    game: GameSimulation,
    flags: RedrawFlags,
}

impl GameView {
    pub fn new(
        palette: Palette,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            palette,
            game: GameSimulation::new(width, height),
            flags: RedrawFlags::dynamic(),
        }
    }

    pub fn game(&self) -> &GameSimulation { &self.game }

    fn draw_intro<D>(
        &self,
        display: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let p = &self.palette;
        let (w, h) = (self.game.width(), self.game.height());
        let cx = w as i32 / 2;
        display.clear(p.background).ok();

        Text::with_text_style("CROP DEFENSE", Point::new(cx, 30), MonoTextStyle::new(HEADER_FONT, p.cyan), CENTERED)
            .draw(display)
            .ok();
        Text::with_text_style("Protegez vos cultures!", Point::new(cx, 56), MonoTextStyle::new(SMALL_FONT, p.green), CENTERED)
            .draw(display)
            .ok();
        Text::with_text_style("COMMENT JOUER:", Point::new(cx, 86), MonoTextStyle::new(BODY_FONT, p.white), CENTERED)
            .draw(display)
            .ok();

        let rows = [
            (p.green, "Defendez les 6 cultures"),
            (p.red, "Touchez les menaces: +10"),
            (p.orange, "Soignez les infectees: +5"),
            (p.yellow, "Tenez 30 secondes!"),
        ];
        let text = MonoTextStyle::new(SMALL_FONT, p.white);
        for (i, (color, line)) in rows.iter().enumerate() {
            let y = 116 + i as i32 * 26;
            Circle::with_center(Point::new(22, y), 10)
                .into_styled(PrimitiveStyle::with_fill(*color))
                .draw(display)
                .ok();
            Text::with_text_style(line, Point::new(38, y), text, LEFT_MIDDLE)
                .draw(display)
                .ok();
        }

        draw_button(display, game::play_button(w, h), "JOUER", p.green, p);
    }

    fn draw_field<D>(
        &self,
        display: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let p = &self.palette;
        let (w, h) = (self.game.width() as i32, self.game.height() as i32);
        display.clear(p.background).ok();

        let grid = PrimitiveStyle::with_stroke(rgb(0, 50, 50), 1);
        for y in (HUD_HEIGHT..h).step_by(GRID_STEP) {
            Line::new(Point::new(0, y), Point::new(w - 1, y)).into_styled(grid).draw(display).ok();
        }
        for x in (0..w).step_by(GRID_STEP) {
            Line::new(Point::new(x, HUD_HEIGHT), Point::new(x, h - 1)).into_styled(grid).draw(display).ok();
        }
    }

    fn draw_crop<D>(
        &self,
        display: &mut D,
        crop: &Crop,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let p = &self.palette;
        let center = Point::new(crop.x as i32, crop.y as i32);
        let size = CROP_SIZE * (1.0 + 0.2 * sin(crop.pulse));

        let core = if crop.infected {
            if (crop.pulse * 3.0) as u32 % 2 == 0 { p.red } else { p.orange }
        } else if crop.health > 60.0 {
            p.green
        } else if crop.health > 30.0 {
            p.yellow
        } else {
            p.orange
        };

        for i in 0..8 {
            let angle = i as f32 / 8.0 * TAU + crop.pulse * 0.1;
            let petal = center + Point::new((cos(angle) * size * 0.6) as i32, (sin(angle) * size * 0.6) as i32);
            Circle::with_center(petal, 6)
                .into_styled(outlined(p.yellow, p.orange))
                .draw(display)
                .ok();
        }
        Circle::with_center(center, size as u32)
            .into_styled(outlined(core, p.cyan))
            .draw(display)
            .ok();

        // Health bar
        let bar = Rectangle::new(center + Point::new(-10, size as i32 + 3), Size::new(20, 3));
        bar.into_styled(PrimitiveStyle::with_stroke(p.white, 1)).draw(display).ok();
        let filled = (crop.health.clamp(0.0, 100.0) * 20.0 / 100.0) as u32;
        if filled > 0 {
            Rectangle::new(bar.top_left, Size::new(filled, 3))
                .into_styled(PrimitiveStyle::with_fill(if crop.health > 50.0 { p.green } else { p.red }))
                .draw(display)
                .ok();
        }
    }

    fn draw_threat<D>(
        &self,
        display: &mut D,
        threat: &Threat,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let p = &self.palette;
        let (x, y) = (threat.x as i32, threat.y as i32);
        if y < HUD_HEIGHT - 5 {
            return;
        }
        let s = (THREAT_SPRITE * (1.0 + 0.15 * sin(threat.age * 8.0))) as i32;
        let half = s / 2;

        Rectangle::new(Point::new(x - half, y - half), Size::new(s as u32, s as u32))
            .into_styled(outlined(p.red, p.orange))
            .draw(display)
            .ok();
        for ex in [x - s / 3, x + s / 4] {
            Rectangle::new(Point::new(ex, y - s / 4), Size::new(2, 2))
                .into_styled(PrimitiveStyle::with_fill(p.yellow))
                .draw(display)
                .ok();
        }

        let antenna = PrimitiveStyle::with_stroke(p.orange, 1);
        Line::new(Point::new(x - half, y - half), Point::new(x - half - 2, y - half - 3)).into_styled(antenna).draw(display).ok();
        Line::new(Point::new(x + half, y - half), Point::new(x + half + 2, y - half - 3)).into_styled(antenna).draw(display).ok();

        let legs = PrimitiveStyle::with_stroke(p.red, 1);
        let foot = y + half;
        match threat.kind {
            0 => {
                for (from, to) in [(x - half, x - half - 2), (x, x), (x + half, x + half + 2)] {
                    Line::new(Point::new(from, foot), Point::new(to, foot + 3)).into_styled(legs).draw(display).ok();
                }
            }
            1 => {
                for (from, to) in [(x - s / 3, x - s / 3 - 2), (x + s / 3, x + s / 3 + 2)] {
                    Line::new(Point::new(from, foot), Point::new(to, foot + 2)).into_styled(legs).draw(display).ok();
                }
            }
            _ => {
                Rectangle::new(Point::new(x - s / 4, foot), Size::new((s / 2) as u32, 2))
                    .into_styled(PrimitiveStyle::with_fill(p.red))
                    .draw(display)
                    .ok();
            }
        }
    }

    fn draw_sparks<D>(
        &self,
        display: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let p = &self.palette;
        for spark in self.game.sparks() {
            let color = match spark.kind {
                SparkKind::Hit => p.cyan,
                SparkKind::Heal => p.green,
                SparkKind::Infection => p.red,
            };
            Circle::with_center(Point::new(spark.x as i32, spark.y as i32), 4)
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(display)
                .ok();
        }
    }

    fn draw_hud<D>(
        &self,
        display: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let p = &self.palette;
        let w = self.game.width();
        let cx = w as i32 / 2;

        Text::new("DEFENDER", Point::new(5, 12), MonoTextStyle::new(SMALL_FONT, p.cyan))
            .draw(display)
            .ok();

        let back = game::back_button(w);
        back.into_styled(PrimitiveStyle::with_stroke(p.white, 1)).draw(display).ok();
        let c = back.center();
        let cross = PrimitiveStyle::with_stroke(p.white, 1);
        Line::new(c + Point::new(-4, -4), c + Point::new(4, 4)).into_styled(cross).draw(display).ok();
        Line::new(c + Point::new(4, -4), c + Point::new(-4, 4)).into_styled(cross).draw(display).ok();

        let mut score: String<20> = String::new();
        score.push_str("Score: ").ok();
        push_u32(&mut score, self.game.score());
        Text::new(&score, Point::new(5, 27), MonoTextStyle::new(SMALL_FONT, p.yellow))
            .draw(display)
            .ok();

        let remaining = self.game.remaining_seconds();
        let timer_color = if remaining > 15 {
            p.green
        } else if remaining > 5 {
            p.yellow
        } else {
            p.red
        };
        Text::with_text_style(&clock_text(remaining), Point::new(cx, 24), MonoTextStyle::new(BODY_FONT, timer_color), CENTERED)
            .draw(display)
            .ok();

        Line::new(Point::new(0, 38), Point::new(w as i32 - 1, 38))
            .into_styled(PrimitiveStyle::with_stroke(p.cyan, 1))
            .draw(display)
            .ok();
        Line::new(Point::new(0, 39), Point::new(w as i32 - 1, 39))
            .into_styled(PrimitiveStyle::with_stroke(rgb(0, 150, 150), 1))
            .draw(display)
            .ok();
    }

    fn draw_game_over<D>(
        &self,
        display: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let p = &self.palette;
        let (w, h) = (self.game.width() as i32, self.game.height() as i32);
        let cx = w / 2;
        let panel = Rectangle::with_corners(Point::new(10, 60), Point::new(w - 11, h - 21));
        panel.into_styled(PrimitiveStyle::with_fill(rgb(10, 0, 25))).draw(display).ok();
        panel.into_styled(PrimitiveStyle::with_stroke(p.cyan, 2)).draw(display).ok();

        let (title, subtitle, title_color, sub_color) = if self.game.phase() == GamePhase::Victory {
            ("VICTOIRE!", "30 secondes!", p.green, p.cyan)
        } else {
            ("GAME OVER", "Cultures perdues", p.red, p.orange)
        };
        let lines = [
            (title, 95, HEADER_FONT, title_color),
            (subtitle, 120, SMALL_FONT, sub_color),
            ("Touchez pour rejouer", 210, SMALL_FONT, p.cyan),
        ];
        for (text, y, font, color) in lines {
            Text::with_text_style(text, Point::new(cx, y), MonoTextStyle::new(font, color), CENTERED)
                .draw(display)
                .ok();
        }

        let mut score: String<20> = String::new();
        score.push_str("Score: ").ok();
        push_u32(&mut score, self.game.score());
        Text::with_text_style(&score, Point::new(cx, 150), MonoTextStyle::new(BODY_FONT, p.yellow), CENTERED)
            .draw(display)
            .ok();
        Text::with_text_style("Vos cultures sont sauves", Point::new(cx, 178), MonoTextStyle::new(SMALL_FONT, blend(p.green, p.background, 0.8)), CENTERED)
            .draw(display)
            .ok();
    }
}

/// Filled shape with a 1 px outline.
fn outlined(
    fill: Rgb565,
    stroke: Rgb565,
) -> PrimitiveStyle<Rgb565> {
    PrimitiveStyleBuilder::new()
        .fill_color(fill)
        .stroke_color(stroke)
        .stroke_width(1)
        .build()
}

/// `mm:ss` for a second count.
fn clock_text(seconds: u32) -> String<8> {
    let mut s: String<8> = String::new();
    for value in [seconds / 60, seconds % 60] {
        if !s.is_empty() {
            s.push(':').ok();
        }
        if value < 10 {
            s.push('0').ok();
        }
        push_u32(&mut s, value);
    }
    s
}

impl View for GameView {
    fn render<D, R>(
        &mut self,
        display: &mut D,
        ctx: &mut ViewContext<'_, R>,
    ) where
        D: DrawTarget<Color = Rgb565> + OriginDimensions,
        R: RngCore,
    {
        if self.game.phase() == GamePhase::Intro {
            self.game.resize(ctx.state.width, ctx.state.height);
            self.draw_intro(display);
            return;
        }

        if let Some(phase) = self.game.update(ctx.state.dt, ctx.rng) {
            game::log_phase(ctx.log, phase, self.game.score());
        }

        self.draw_field(display);
        for crop in self.game.crops().filter(|c| c.is_alive()) {
            self.draw_crop(display, crop);
        }
        for threat in self.game.threats() {
            self.draw_threat(display, threat);
        }
        self.draw_sparks(display);
        self.draw_hud(display);

        if matches!(self.game.phase(), GamePhase::Victory | GamePhase::Defeat) {
            self.draw_game_over(display);
        }
    }

    fn flags(&self) -> &RedrawFlags { &self.flags }

    fn flags_mut(&mut self) -> &mut RedrawFlags { &mut self.flags }

    fn handle_touch<R: RngCore>(
        &mut self,
        x: i32,
        y: i32,
        ctx: &mut ViewContext<'_, R>,
    ) -> bool {
        let before = self.game.phase();
        let consumed = self.game.handle_tap(x, y, ctx.rng);
        let after = self.game.phase();
        if after != before {
            game::log_phase(ctx.log, after, self.game.score());
        }
        consumed
    }

    fn name(&self) -> &'static str { "Game" }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::{Settings, UserInfo};
    use crate::event_log::EventLog;
    use crate::state::AppState;
    use crate::testing::TestSink;

    #[test]
    fn test_clock_text() {
        assert_eq!(clock_text(30).as_str(), "00:30");
        assert_eq!(clock_text(0).as_str(), "00:00");
        assert_eq!(clock_text(75).as_str(), "01:15");
    }

    #[test]
    fn test_play_tap_starts_and_logs() {
        let mut state = AppState::new(240, 320);
        let mut rng = SmallRng::seed_from_u64(5);
        let mut settings = Settings::new();
        let user = UserInfo::demo();
        let mut log = EventLog::new();
        let mut view = GameView::new(Palette::neon(), 240, 320);
        let mut sink = TestSink::new();
        let mut ctx = ViewContext {
            state: &mut state,
            rng: &mut rng,
            settings: &mut settings,
            user: &user,
            log: &mut log,
        };

        view.render(&mut sink, &mut ctx);
        assert!(view.handle_touch(120, 275, &mut ctx), "play button consumed");
        assert_eq!(view.game().phase(), GamePhase::Playing);

        ctx.state.advance(1.0 / 30.0, 1.0, 1_000);
        view.render(&mut sink, &mut ctx);
        assert!(log.iter().any(|l| l == "game: start"));
    }

    #[test]
    fn test_back_button_not_consumed() {
        let mut state = AppState::new(240, 320);
        let mut rng = SmallRng::seed_from_u64(6);
        let mut settings = Settings::new();
        let user = UserInfo::demo();
        let mut log = EventLog::new();
        let mut view = GameView::new(Palette::neon(), 240, 320);
        let mut ctx = ViewContext {
            state: &mut state,
            rng: &mut rng,
            settings: &mut settings,
            user: &user,
            log: &mut log,
        };
        assert!(view.handle_touch(120, 275, &mut ctx));
        assert!(!view.handle_touch(225, 15, &mut ctx), "back button lets navigation act");
        assert_eq!(view.game().phase(), GamePhase::Intro);
    }
}
