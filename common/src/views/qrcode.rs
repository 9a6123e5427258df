//! Access badge with the attendee QR code.
//!
//! The QR module matrix is produced outside the core (the encoder is a
//! platform concern) and handed over as a [`QrGrid`]. The view is static: it
//! renders one frame per activation.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use heapless::String;
use rand::RngCore;

use super::{RedrawFlags, View, ViewContext};
use crate::colors::{BLACK, Palette, WHITE, blend};
use crate::styles::{BODY_FONT, CENTERED, HEADER_FONT, SMALL_FONT};
use crate::widgets::{draw_corner_brackets, draw_double_frame, draw_view_title};

/// Largest supported symbol (version 6).
pub const QR_MAX_MODULES: usize = 41;

const TITLE_Y: i32 = 16;
const DATE_Y: i32 = 38;
const QR_TOP: i32 = 54;
/// Space reserved for the symbol, quiet zone excluded.
const QR_AREA: u32 = 150;
const MAX_MODULE_PX: u32 = 5;
const QUIET_MODULES: u32 = 2;

const EVENT_TITLE: &str = "CONVENTION G2S";
const EVENT_DATE: &str = "Mardi 25 Novembre 2025";
const VENUES: [&str; 2] = [">> Maison de la Mutualite", ">> Theatre Mogador"];

// =============================================================================
// Module Grid
// =============================================================================

/// Square QR module matrix, one bit per module, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrGrid {
    size: u8,
    rows: [u64; QR_MAX_MODULES],
}

impl QrGrid {
    /// Build a `size x size` grid from a predicate. `size` is capped at
    /// [`QR_MAX_MODULES`].
    pub fn from_fn<F>(
        size: u8,
        mut dark: F,
    ) -> Self
    where
        F: FnMut(u8, u8) -> bool,
    {
        let size = size.min(QR_MAX_MODULES as u8);
        let mut rows = [0u64; QR_MAX_MODULES];
        for (y, row) in rows.iter_mut().enumerate().take(size as usize) {
            for x in 0..size {
                if dark(x, y as u8) {
                    *row |= 1 << x;
                }
            }
        }
        Self { size, rows }
    }

    #[inline]
    pub const fn size(&self) -> u8 { self.size }

    /// Out-of-range coordinates read as light.
    pub fn is_dark(
        &self,
        x: u8,
        y: u8,
    ) -> bool {
        if x >= self.size || y >= self.size {
            return false;
        }
        self.rows[y as usize] & (1 << x) != 0
    }

    /// Pixel edge of one module when fitted into [`QR_AREA`].
    pub fn module_px(&self) -> u32 {
        if self.size == 0 {
            return MAX_MODULE_PX;
        }
        (QR_AREA / u32::from(self.size)).clamp(1, MAX_MODULE_PX)
    }
}

// =============================================================================
// View
// =============================================================================

pub struct QrCodeView {
    palette: Palette,
    grid: QrGrid,
    flags: RedrawFlags,
}

impl QrCodeView {
    pub const fn new(
        palette: Palette,
        grid: QrGrid,
    ) -> Self {
        Self {
            palette,
            grid,
            flags: RedrawFlags::static_view(),
        }
    }

    /// Draw the symbol with its white quiet zone; returns the bottom edge.
    fn draw_grid<D>(
        &self,
        display: &mut D,
        center_x: i32,
    ) -> i32
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let px = self.grid.module_px();
        let modules = u32::from(self.grid.size());
        let side = (modules + 2 * QUIET_MODULES) * px;
        let left = center_x - side as i32 / 2;
        let quiet = Rectangle::new(Point::new(left, QR_TOP), Size::new(side, side));
        quiet.into_styled(PrimitiveStyle::with_fill(WHITE)).draw(display).ok();

        let origin = quiet.top_left + Point::new((QUIET_MODULES * px) as i32, (QUIET_MODULES * px) as i32);
        let dark = PrimitiveStyle::with_fill(BLACK);
        for y in 0..self.grid.size() {
            for x in 0..self.grid.size() {
                if self.grid.is_dark(x, y) {
                    let at = origin + Point::new(i32::from(x) * px as i32, i32::from(y) * px as i32);
                    Rectangle::new(at, Size::new(px, px))
                        .into_styled(dark)
                        .draw(display)
                        .ok();
                }
            }
        }

        draw_corner_brackets(display, quiet.offset(4), 12, 2, self.palette.cyan);
        QR_TOP + side as i32
    }
}

impl View for QrCodeView {
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

        draw_double_frame(
            display,
            Rectangle::new(Point::new(2, 2), Size::new(size.width.saturating_sub(4), size.height.saturating_sub(4))),
            3,
            p.violet,
            blend(p.pink, p.background, 0.5),
        );

        draw_view_title(display, EVENT_TITLE, cx, TITLE_Y, HEADER_FONT, p, CENTERED);
        Text::with_text_style(EVENT_DATE, Point::new(cx, DATE_Y), MonoTextStyle::new(SMALL_FONT, p.yellow), CENTERED)
            .draw(display)
            .ok();

        let bottom = self.draw_grid(display, cx);

        Text::with_text_style("ACCESS BADGE", Point::new(cx, bottom + 14), MonoTextStyle::new(BODY_FONT, p.cyan), CENTERED)
            .draw(display)
            .ok();

        let mut name: String<40> = String::new();
        for c in ctx.user.first_name.chars().chain(" ".chars()).chain(ctx.user.last_name.chars()) {
            if name.push(c.to_ascii_uppercase()).is_err() {
                break;
            }
        }
        Text::with_text_style(&name, Point::new(cx, bottom + 32), MonoTextStyle::new(BODY_FONT, p.white), CENTERED)
            .draw(display)
            .ok();

        for (i, venue) in VENUES.iter().enumerate() {
            let y = bottom + 52 + i as i32 * 14;
            Text::with_text_style(venue, Point::new(cx, y), MonoTextStyle::new(SMALL_FONT, p.mint), CENTERED)
                .draw(display)
                .ok();
        }
    }

    fn flags(&self) -> &RedrawFlags { &self.flags }

    fn flags_mut(&mut self) -> &mut RedrawFlags { &mut self.flags }

    fn name(&self) -> &'static str { "QrCode" }
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

    fn checker(size: u8) -> QrGrid { QrGrid::from_fn(size, |x, y| (x + y) % 2 == 0) }

    #[test]
    fn test_grid_bits() {
        let g = checker(25);
        assert_eq!(g.size(), 25);
        assert!(g.is_dark(0, 0));
        assert!(!g.is_dark(1, 0));
        assert!(g.is_dark(24, 24));
        assert!(!g.is_dark(25, 0), "outside the symbol is light");
    }

    #[test]
    fn test_grid_size_capped() {
        let g = QrGrid::from_fn(60, |_, _| true);
        assert_eq!(g.size(), QR_MAX_MODULES as u8);
        assert!(g.is_dark(40, 40));
    }

    #[test]
    fn test_module_size_fits_area() {
        assert_eq!(checker(21).module_px(), 5);
        assert_eq!(checker(41).module_px(), 3);
        assert!(checker(41).module_px() * 41 <= QR_AREA);
    }

    #[test]
    fn test_static_view_renders_once() {
        let mut state = AppState::new(240, 320);
        let mut rng = SmallRng::seed_from_u64(0);
        let mut settings = Settings::new();
        let user = UserInfo::demo();
        let mut log = EventLog::new();
        let mut view = QrCodeView::new(Palette::neon(), checker(25));
        let mut sink = TestSink::new();
        let mut ctx = ViewContext {
            state: &mut state,
            rng: &mut rng,
            settings: &mut settings,
            user: &user,
            log: &mut log,
        };

        assert!(view.flags().should_render());
        view.render(&mut sink, &mut ctx);
        view.mark_rendered();
        assert!(!view.flags().should_render(), "static view is skipped after its first frame");

        // Quiet zone corner is white, first module is dark.
        let left = 120 - ((25 + 4) * 5) / 2;
        assert_eq!(sink.pixel(left + 1, QR_TOP + 1), Some(WHITE));
        assert_eq!(sink.pixel(left + 10, QR_TOP + 10), Some(BLACK));
    }
}
