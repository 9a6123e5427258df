//! Event agenda with a vertical timeline. Static.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle};
use embedded_graphics::text::Text;
use rand::RngCore;

use super::{RedrawFlags, View, ViewContext};
use crate::colors::{Palette, blend};
use crate::styles::{BODY_FONT, CENTERED, HEADER_FONT, LEFT_MIDDLE, SMALL_FONT};
use crate::widgets::{draw_neon_hline, draw_view_title};

const TITLE_Y: i32 = 18;
const RULE_Y: i32 = 41;
const FIRST_ITEM_Y: i32 = 58;
const ITEM_SPACING: i32 = 28;
const TIMELINE_X: i32 = 28;
const MARKER_DIAMETER: u32 = 7;
const TIME_X: i32 = 40;
const TITLE_X: i32 = 84;

/// Agenda category, mapped to a palette color at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AgendaKind {
    Venue,
    Break,
    Talk,
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgendaItem {
    pub time: &'static str,
    pub title: &'static str,
    pub kind: AgendaKind,
}

impl AgendaItem {
    pub const fn new(
        time: &'static str,
        title: &'static str,
        kind: AgendaKind,
    ) -> Self {
        Self { time, title, kind }
    }
}

/// Convention day agenda.
pub const DEFAULT_AGENDA: [AgendaItem; 9] = [
    AgendaItem::new("12h00", "Ouverture Mutualite", AgendaKind::Venue),
    AgendaItem::new("12h00", "Buffet dejeunatoire", AgendaKind::Break),
    AgendaItem::new("14h00", "Entree en salle", AgendaKind::Venue),
    AgendaItem::new("14h30", "Pleniere", AgendaKind::Talk),
    AgendaItem::new("16h30", "Cafe de cloture", AgendaKind::Break),
    AgendaItem::new("17h30", "Quartier libre", AgendaKind::Venue),
    AgendaItem::new("19h00", "Ouverture Mogador", AgendaKind::Venue),
    AgendaItem::new("20h00", "Spectacle musical", AgendaKind::Show),
    AgendaItem::new("21h30", "Cocktail dinatoire", AgendaKind::Break),
];

pub struct ProgramView {
    palette: Palette,
    items: &'static [AgendaItem],
    flags: RedrawFlags,
}

impl ProgramView {
    pub const fn new(
        palette: Palette,
        items: &'static [AgendaItem],
    ) -> Self {
        Self {
            palette,
            items,
            flags: RedrawFlags::static_view(),
        }
    }

    fn kind_color(
        &self,
        kind: AgendaKind,
    ) -> Rgb565 {
        match kind {
            AgendaKind::Venue => self.palette.cyan,
            AgendaKind::Break => self.palette.yellow,
            AgendaKind::Talk => self.palette.orange,
            AgendaKind::Show => self.palette.pink,
        }
    }

    /// Vertical center of item `index`.
    #[inline]
    const fn item_y(index: usize) -> i32 { FIRST_ITEM_Y + index as i32 * ITEM_SPACING }
}

impl View for ProgramView {
    fn render<D, R>(
        &mut self,
        display: &mut D,
        _ctx: &mut ViewContext<'_, R>,
    ) where
        D: DrawTarget<Color = Rgb565> + OriginDimensions,
        R: RngCore,
    {
        let p = &self.palette;
        let size = display.size();
        let cx = (size.width / 2) as i32;
        display.clear(p.background).ok();

        draw_view_title(display, "PROGRAMME", cx, TITLE_Y, HEADER_FONT, p, CENTERED);
        draw_neon_hline(display, 16, size.width as i32 - 17, RULE_Y, p.violet, p.background, 1.0);

        if let Some(last) = self.items.len().checked_sub(1) {
            Line::new(Point::new(TIMELINE_X, Self::item_y(0)), Point::new(TIMELINE_X, Self::item_y(last)))
                .into_styled(PrimitiveStyle::with_stroke(p.timeline, 2))
                .draw(display)
                .ok();
        }

        for (i, item) in self.items.iter().enumerate() {
            let y = Self::item_y(i);
            if y > size.height as i32 {
                break;
            }
            let color = self.kind_color(item.kind);
            let r = (MARKER_DIAMETER / 2) as i32;

            Circle::new(Point::new(TIMELINE_X - r, y - r), MARKER_DIAMETER)
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(display)
                .ok();
            Text::with_text_style(item.time, Point::new(TIME_X, y), MonoTextStyle::new(SMALL_FONT, blend(color, p.background, 0.8)), LEFT_MIDDLE)
                .draw(display)
                .ok();
            Text::with_text_style(item.title, Point::new(TITLE_X, y), MonoTextStyle::new(BODY_FONT, p.white), LEFT_MIDDLE)
                .draw(display)
                .ok();
        }
    }

    fn flags(&self) -> &RedrawFlags { &self.flags }

    fn flags_mut(&mut self) -> &mut RedrawFlags { &mut self.flags }

    fn name(&self) -> &'static str { "Program" }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::{SCREEN_HEIGHT, Settings, UserInfo};
    use crate::event_log::EventLog;
    use crate::state::AppState;
    use crate::testing::TestSink;

    #[test]
    fn test_agenda_fits_portrait_screen() {
        let last = ProgramView::item_y(DEFAULT_AGENDA.len() - 1);
        assert!(last + ITEM_SPACING / 2 < SCREEN_HEIGHT as i32, "last item at {last}");
    }

    #[test]
    fn test_markers_use_category_color() {
        let mut state = AppState::new(240, 320);
        let mut rng = SmallRng::seed_from_u64(0);
        let mut settings = Settings::new();
        let user = UserInfo::demo();
        let mut log = EventLog::new();
        let mut view = ProgramView::new(Palette::neon(), &DEFAULT_AGENDA);
        let mut sink = TestSink::new();
        let mut ctx = ViewContext {
            state: &mut state,
            rng: &mut rng,
            settings: &mut settings,
            user: &user,
            log: &mut log,
        };
        view.render(&mut sink, &mut ctx);

        let p = Palette::neon();
        assert_eq!(sink.pixel(TIMELINE_X, ProgramView::item_y(3)), Some(p.orange), "talk marker");
        assert_eq!(sink.pixel(TIMELINE_X, ProgramView::item_y(7)), Some(p.pink), "show marker");
    }
}
