//! View contract and tagged dispatch.
//!
//! A view owns one full screen. The display manager renders the active view
//! only when [`View::needs_redraw`] is set or the view has not produced a
//! frame since its last [`View::force_redraw`]. Static views (agenda, QR code)
//! clear `needs_redraw` after their first frame and are then skipped.
//!
//! Views are stored as [`ViewKind`] values and dispatched with a `match`,
//! which keeps the generic draw target and RNG parameters on the methods.

mod badge;
mod game;
mod plasma;
mod program;
mod qrcode;
mod settings;

pub use badge::BadgeView;
pub use game::GameView;
pub use plasma::PlasmaView;
pub use program::{AgendaItem, AgendaKind, DEFAULT_AGENDA, ProgramView};
pub use qrcode::{QrCodeView, QrGrid};
pub use settings::SettingsView;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions};
use rand::RngCore;

use crate::config::{Settings, UserInfo};
use crate::event_log::EventLog;
use crate::state::AppState;

// =============================================================================
// View Context
// =============================================================================

/// Everything a view may read or write during one call.
pub struct ViewContext<'a, R: RngCore> {
    pub state: &'a mut AppState,
    pub rng: &'a mut R,
    /// Only the settings view writes here; the manager persists changes.
    pub settings: &'a mut Settings,
    pub user: &'a UserInfo,
    pub log: &'a mut EventLog,
}

// =============================================================================
// Redraw Bookkeeping
// =============================================================================

/// `needs_redraw` / `has_initial_render` pair with the construction-time
/// default remembered for [`RedrawFlags::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedrawFlags {
    dynamic: bool,
    needs_redraw: bool,
    has_initial_render: bool,
}

impl RedrawFlags {
    /// Animated view: renders every frame.
    pub const fn dynamic() -> Self {
        Self {
            dynamic: true,
            needs_redraw: true,
            has_initial_render: false,
        }
    }

    /// Static view: renders once, then only after [`Self::invalidate`].
    pub const fn static_view() -> Self {
        Self {
            dynamic: false,
            needs_redraw: false,
            has_initial_render: false,
        }
    }

    #[inline]
    pub const fn needs_redraw(&self) -> bool { self.needs_redraw }

    #[inline]
    pub const fn has_initial_render(&self) -> bool { self.has_initial_render }

    /// Whether the manager should call `render` this frame.
    #[inline]
    pub const fn should_render(&self) -> bool { self.needs_redraw || !self.has_initial_render }

    pub fn mark_rendered(&mut self) {
        self.has_initial_render = true;
        if !self.dynamic {
            self.needs_redraw = false;
        }
    }

    /// Request one more frame from a static view.
    pub fn invalidate(&mut self) { self.needs_redraw = true; }

    /// Back to the construction-time state.
    pub fn reset(&mut self) {
        self.needs_redraw = self.dynamic;
        self.has_initial_render = false;
    }
}

// =============================================================================
// View Trait
// =============================================================================

pub trait View {
    /// Draw exactly one complete frame.
    fn render<D, R>(
        &mut self,
        display: &mut D,
        ctx: &mut ViewContext<'_, R>,
    ) where
        D: DrawTarget<Color = Rgb565> + OriginDimensions,
        R: RngCore;

    fn flags(&self) -> &RedrawFlags;

    fn flags_mut(&mut self) -> &mut RedrawFlags;

    fn needs_redraw(&self) -> bool { self.flags().needs_redraw() }

    fn has_initial_render(&self) -> bool { self.flags().has_initial_render() }

    fn mark_rendered(&mut self) { self.flags_mut().mark_rendered(); }

    /// Restore construction-time redraw state so the next frame is fresh.
    fn force_redraw(&mut self) { self.flags_mut().reset(); }

    /// Tap at `(x, y)`. Returns `true` when consumed; unconsumed taps
    /// navigate between views.
    fn handle_touch<R: RngCore>(
        &mut self,
        _x: i32,
        _y: i32,
        _ctx: &mut ViewContext<'_, R>,
    ) -> bool {
        false
    }

    /// Drag position update. Returns `true` when consumed.
    fn handle_drag<R: RngCore>(
        &mut self,
        _x: i32,
        _y: i32,
        _ctx: &mut ViewContext<'_, R>,
    ) -> bool {
        false
    }

    /// Short name for the event log.
    fn name(&self) -> &'static str;
}

// =============================================================================
// Tagged Dispatch
// =============================================================================

pub enum ViewKind {
    Badge(BadgeView),
    Plasma(PlasmaView),
    QrCode(QrCodeView),
    Program(ProgramView),
    Game(GameView),
    Settings(SettingsView),
}

macro_rules! dispatch {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            ViewKind::Badge($v) => $body,
            ViewKind::Plasma($v) => $body,
            ViewKind::QrCode($v) => $body,
            ViewKind::Program($v) => $body,
            ViewKind::Game($v) => $body,
            ViewKind::Settings($v) => $body,
        }
    };
}

impl View for ViewKind {
    fn render<D, R>(
        &mut self,
        display: &mut D,
        ctx: &mut ViewContext<'_, R>,
    ) where
        D: DrawTarget<Color = Rgb565> + OriginDimensions,
        R: RngCore,
    {
        dispatch!(self, v => v.render(display, ctx));
    }

    fn flags(&self) -> &RedrawFlags { dispatch!(self, v => v.flags()) }

    fn flags_mut(&mut self) -> &mut RedrawFlags { dispatch!(self, v => v.flags_mut()) }

    fn force_redraw(&mut self) { dispatch!(self, v => v.force_redraw()) }

    fn handle_touch<R: RngCore>(
        &mut self,
        x: i32,
        y: i32,
        ctx: &mut ViewContext<'_, R>,
    ) -> bool {
        dispatch!(self, v => v.handle_touch(x, y, ctx))
    }

    fn handle_drag<R: RngCore>(
        &mut self,
        x: i32,
        y: i32,
        ctx: &mut ViewContext<'_, R>,
    ) -> bool {
        dispatch!(self, v => v.handle_drag(x, y, ctx))
    }

    fn name(&self) -> &'static str { dispatch!(self, v => v.name()) }
}

impl From<BadgeView> for ViewKind {
    fn from(v: BadgeView) -> Self { Self::Badge(v) }
}

impl From<PlasmaView> for ViewKind {
    fn from(v: PlasmaView) -> Self { Self::Plasma(v) }
}

impl From<QrCodeView> for ViewKind {
    fn from(v: QrCodeView) -> Self { Self::QrCode(v) }
}

impl From<ProgramView> for ViewKind {
    fn from(v: ProgramView) -> Self { Self::Program(v) }
}

impl From<GameView> for ViewKind {
    fn from(v: GameView) -> Self { Self::Game(v) }
}

impl From<SettingsView> for ViewKind {
    fn from(v: SettingsView) -> Self { Self::Settings(v) }
}
