//! Frame orchestrator.
//!
//! One [`DisplayManager::tick`] per loop iteration. A tick that the frame
//! gate accepts runs, in order:
//!
//! 1. timing: clamped `dt` and elapsed time into [`AppState`]
//! 2. input: sample, route events (wake, rotation, settings, taps, drags)
//! 3. power: inactivity check, backlight and frame rate on sleep
//! 4. render: the active view, only when its redraw flags ask for it
//! 5. present
//!
//! Input always runs before render, so a view switch shows on the same frame.
//! Settings edited by a view are diffed after the call, applied to the sink
//! and persisted through the [`ConfigStore`].

use embedded_graphics::prelude::*;
use rand::RngCore;

use crate::clock::FrameClock;
use crate::config::{ConfigStore, SLEEP_TARGET_FPS, Settings, UserInfo};
use crate::event_log::EventLog;
use crate::input::{InputEvent, InputRouter, InputSource, RawInput};
use crate::power::PowerState;
use crate::registry::{Direction, ViewRegistry};
use crate::sink::FrameSink;
use crate::state::AppState;
use crate::views::{View, ViewContext};

/// Split borrow of the manager so a view and its context can coexist.
macro_rules! with_active_view {
    ($self:ident, |$view:ident, $ctx:ident| $body:expr) => {{
        match $self.registry.active_mut() {
            Some($view) => {
                let mut $ctx = ViewContext {
                    state: &mut $self.state,
                    rng: &mut $self.rng,
                    settings: &mut $self.settings,
                    user: &$self.user,
                    log: &mut $self.log,
                };
                Some($body)
            }
            None => None,
        }
    }};
}

pub struct DisplayManager<R: RngCore, S: ConfigStore> {
    registry: ViewRegistry,
    state: AppState,
    clock: FrameClock,
    power: PowerState,
    input: InputRouter,
    settings: Settings,
    store: S,
    rng: R,
    user: UserInfo,
    log: EventLog,
    target_fps: u32,
    started: bool,
}

impl<R: RngCore, S: ConfigStore> DisplayManager<R, S> {
    /// Settings come from `store`, or defaults when it has none.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: ViewRegistry,
        mut store: S,
        rng: R,
        user: UserInfo,
        width: u32,
        height: u32,
        target_fps: u32,
        now_ms: u64,
    ) -> Self {
        let mut log = EventLog::new();
        let settings = match store.load() {
            Some(s) => s,
            None => {
                log.push("config: defaults");
                Settings::default()
            }
        };
        Self {
            registry,
            state: AppState::new(width, height),
            clock: FrameClock::new(target_fps),
            power: PowerState::new(now_ms),
            input: InputRouter::new(),
            settings,
            store,
            rng,
            user,
            log,
            target_fps,
            started: false,
        }
    }

    #[inline]
    pub const fn settings(&self) -> &Settings { &self.settings }

    #[inline]
    pub const fn log(&self) -> &EventLog { &self.log }

    #[inline]
    pub const fn state(&self) -> &AppState { &self.state }

    #[inline]
    pub const fn is_asleep(&self) -> bool { self.power.is_asleep() }

    #[inline]
    pub const fn clock(&self) -> &FrameClock { &self.clock }

    #[inline]
    pub const fn registry(&self) -> &ViewRegistry { &self.registry }

    pub fn registry_mut(&mut self) -> &mut ViewRegistry { &mut self.registry }

    #[inline]
    pub const fn store(&self) -> &S { &self.store }

    /// Run one loop iteration. Returns `false` when the frame gate said
    /// "not yet"; the caller should yield briefly before polling again.
    pub fn tick<I, F>(
        &mut self,
        now_ms: u64,
        input: &mut I,
        sink: &mut F,
    ) -> bool
    where
        I: InputSource,
        F: FrameSink,
    {
        if !self.started {
            self.start(sink);
        }
        if !self.clock.should_render_frame(now_ms) {
            return false;
        }
        self.state.advance(self.clock.dt(), self.clock.t(), now_ms);

        let raw = RawInput::sample(input);
        let asleep = self.power.is_asleep();
        let events = self.input.process(raw, now_ms, asleep);
        if raw.touch.is_some() && !asleep {
            self.power.note_activity(now_ms);
        }
        for event in events {
            self.handle_event(event, now_ms, sink);
        }

        if let Some(level) = self.power.tick(now_ms, &self.settings) {
            sink.set_backlight(level.hardware_level());
            self.clock.set_target_fps(SLEEP_TARGET_FPS);
            self.log.push("power: sleep");
        }

        let rendered = with_active_view!(self, |view, ctx| {
            if view.flags().should_render() {
                view.render(sink, &mut ctx);
                view.mark_rendered();
                true
            } else {
                false
            }
        });
        if rendered == Some(true) {
            sink.present();
        }
        true
    }

    /// Push the loaded settings to the sink before the first frame.
    fn start<F: FrameSink>(
        &mut self,
        sink: &mut F,
    ) {
        self.started = true;
        sink.set_rotated(self.settings.display_rotated());
        sink.set_backlight(self.power.current_backlight(&self.settings).hardware_level());
        let size = sink.size();
        self.state.resize(size.width, size.height);
        self.log.push("badge: start");
    }

    fn handle_event<F: FrameSink>(
        &mut self,
        event: InputEvent,
        now_ms: u64,
        sink: &mut F,
    ) {
        match event {
            InputEvent::ButtonDown => self.wake(now_ms, sink),
            InputEvent::TouchDown { woke } => {
                if woke {
                    self.wake(now_ms, sink);
                }
            }
            InputEvent::RotationToggle => {
                self.power.note_activity(now_ms);
                let before = self.settings;
                self.settings.toggle_rotation();
                self.apply_settings(before, sink);
            }
            InputEvent::OpenSettings => {
                if let Some(name) = self.registry.open_settings() {
                    self.log.push_fmt(format_args!("view: {name}"));
                }
            }
            InputEvent::Drag { x, y } => {
                let before = self.settings;
                with_active_view!(self, |view, ctx| view.handle_drag(x, y, &mut ctx));
                self.apply_settings(before, sink);
            }
            InputEvent::Tap { x, y } => {
                let before = self.settings;
                let consumed = with_active_view!(self, |view, ctx| view.handle_touch(x, y, &mut ctx));
                self.apply_settings(before, sink);
                if consumed == Some(false) {
                    self.navigate(x);
                }
            }
        }
    }

    /// Unconsumed tap: leave settings, or step left/right by screen half.
    fn navigate(
        &mut self,
        x: i32,
    ) {
        let name = if self.registry.is_settings_active() {
            self.registry.leave_settings()
        } else if x < self.state.center_x() {
            self.registry.navigate(Direction::Previous)
        } else {
            self.registry.navigate(Direction::Next)
        };
        if let Some(name) = name {
            self.log.push_fmt(format_args!("view: {name}"));
        }
    }

    fn wake<F: FrameSink>(
        &mut self,
        now_ms: u64,
        sink: &mut F,
    ) {
        if let Some(level) = self.power.wake(now_ms, &self.settings) {
            sink.set_backlight(level.hardware_level());
            self.clock.set_target_fps(self.target_fps);
            self.log.push("power: wake");
        }
    }

    /// Apply and persist whatever changed since `before`.
    fn apply_settings<F: FrameSink>(
        &mut self,
        before: Settings,
        sink: &mut F,
    ) {
        let now = self.settings;
        if now == before {
            return;
        }

        if let Err(e) = self.store.save(&now) {
            self.log.push_fmt(format_args!("config: {e}"));
        }

        if now.active_brightness() != before.active_brightness() || now.sleep_brightness() != before.sleep_brightness() {
            sink.set_backlight(self.power.current_backlight(&now).hardware_level());
        }
        if now.awake_timeout_minutes() != before.awake_timeout_minutes() {
            self.log.push_with_u32("config: timeout min ", now.stepper_minutes());
        }
        if now.display_rotated() != before.display_rotated() {
            sink.set_rotated(now.display_rotated());
            let size = sink.size();
            self.state.resize(size.width, size.height);
            self.registry.refresh_active();
            self.log.push(if now.display_rotated() { "display: rotated" } else { "display: upright" });
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::colors::Palette;
    use crate::config::DEFAULT_TARGET_FPS;
    use crate::game::GamePhase;
    use crate::registry::ActiveView;
    use crate::testing::{RecordingStore, ScriptedInput, TestSink};
    use crate::views::{BadgeView, DEFAULT_AGENDA, GameView, PlasmaView, ProgramView, SettingsView, ViewKind};

    /// Comfortably above the 30 FPS frame interval.
    const STEP: u64 = 40;

    struct Rig {
        manager: DisplayManager<SmallRng, RecordingStore>,
        input: ScriptedInput,
        sink: TestSink,
        now: u64,
    }

    impl Rig {
        fn new(
            registry: ViewRegistry,
            store: RecordingStore,
        ) -> Self {
            Self {
                manager: DisplayManager::new(
                    registry,
                    store,
                    SmallRng::seed_from_u64(11),
                    UserInfo::demo(),
                    240,
                    320,
                    DEFAULT_TARGET_FPS,
                    0,
                ),
                input: ScriptedInput::default(),
                sink: TestSink::new(),
                now: 0,
            }
        }

        fn step(&mut self) {
            self.now += STEP;
            self.manager.tick(self.now, &mut self.input, &mut self.sink);
        }

        fn run_for(
            &mut self,
            ms: u64,
        ) {
            let end = self.now + ms;
            while self.now < end {
                self.step();
            }
        }

        fn tap(
            &mut self,
            x: i32,
            y: i32,
        ) {
            // Three steps each way so at least one frame lands at 10 FPS.
            self.input.touch = Some(Point::new(x, y));
            for _ in 0..3 {
                self.step();
            }
            self.input.touch = None;
            for _ in 0..3 {
                self.step();
            }
        }

        fn active(&self) -> ActiveView { self.manager.registry().active() }
    }

    fn cycle() -> ViewRegistry {
        let p = Palette::neon();
        let mut r = ViewRegistry::new();
        assert!(r.push(BadgeView::new(p)).is_ok());
        assert!(r.push(PlasmaView::new(p)).is_ok());
        assert!(r.push(ProgramView::new(p, &DEFAULT_AGENDA)).is_ok());
        r.set_settings(SettingsView::new(p));
        r
    }

    fn quick_sleep_store() -> RecordingStore {
        let mut s = Settings::new();
        s.set_awake_timeout_minutes(0.1);
        RecordingStore {
            stored: Some(s),
            ..RecordingStore::default()
        }
    }

    #[test]
    fn test_frame_gate_rejects_early_polls() {
        let mut rig = Rig::new(cycle(), RecordingStore::default());
        assert!(rig.manager.tick(0, &mut rig.input, &mut rig.sink));
        assert!(!rig.manager.tick(10, &mut rig.input, &mut rig.sink), "inside the 33 ms interval");
        assert!(rig.manager.tick(40, &mut rig.input, &mut rig.sink));
    }

    #[test]
    fn test_empty_registry_ticks_without_rendering() {
        let mut rig = Rig::new(ViewRegistry::new(), RecordingStore::default());
        rig.run_for(400);
        assert_eq!(rig.sink.presents, 0);
    }

    #[test]
    fn test_static_view_rendered_once() {
        let p = Palette::neon();
        let mut r = ViewRegistry::new();
        assert!(r.push(ProgramView::new(p, &DEFAULT_AGENDA)).is_ok());
        let mut rig = Rig::new(r, RecordingStore::default());
        rig.run_for(1_000);
        assert_eq!(rig.sink.presents, 1);
    }

    #[test]
    fn test_dynamic_view_rendered_every_frame() {
        let mut rig = Rig::new(cycle(), RecordingStore::default());
        rig.run_for(400);
        assert_eq!(rig.sink.presents, 10);
    }

    #[test]
    fn test_taps_navigate_by_screen_half() {
        let mut rig = Rig::new(cycle(), RecordingStore::default());
        rig.tap(200, 100);
        assert_eq!(rig.active(), ActiveView::Regular(1));
        rig.tap(20, 100);
        assert_eq!(rig.active(), ActiveView::Regular(0));
        rig.tap(20, 100);
        assert_eq!(rig.active(), ActiveView::Regular(2), "wraps backwards");
        assert!(rig.manager.log().iter().any(|l| l == "view: Program"));
    }

    #[test]
    fn test_hold_opens_settings_and_tap_returns_to_previous_view() {
        for x in [10, 230] {
            let mut rig = Rig::new(cycle(), RecordingStore::default());
            rig.tap(200, 100);
            assert_eq!(rig.active(), ActiveView::Regular(1));

            rig.input.touch = Some(Point::new(120, 200));
            rig.run_for(1_200);
            assert!(rig.manager.registry().is_settings_active());
            rig.input.touch = None;
            rig.step();
            assert!(rig.manager.registry().is_settings_active(), "releasing the hold is not a tap");

            rig.tap(x, 300);
            assert_eq!(rig.active(), ActiveView::Regular(1), "tap at x={x} returns to the previous view");
        }
    }

    #[test]
    fn test_sleep_after_timeout_lowers_frame_rate() {
        let mut rig = Rig::new(cycle(), quick_sleep_store());
        rig.run_for(5_000);
        assert!(!rig.manager.is_asleep());
        rig.run_for(1_200);
        assert!(rig.manager.is_asleep());
        assert_eq!(rig.manager.clock().target_fps(), SLEEP_TARGET_FPS);
        assert_eq!(rig.sink.backlight.last(), Some(&crate::power::percent_to_hw(5)));
    }

    #[test]
    fn test_wake_tap_is_not_forwarded() {
        let p = Palette::neon();
        let mut r = ViewRegistry::new();
        assert!(r.push(GameView::new(p, 240, 320)).is_ok());
        assert!(r.push(BadgeView::new(p)).is_ok());
        let mut rig = Rig::new(r, quick_sleep_store());
        rig.run_for(6_500);
        assert!(rig.manager.is_asleep());

        // Play button position
        rig.tap(120, 275);
        assert!(!rig.manager.is_asleep());
        assert_eq!(rig.active(), ActiveView::Regular(0), "no navigation");
        let phase = match rig.manager.registry_mut().active_mut() {
            Some(ViewKind::Game(g)) => Some(g.game().phase()),
            _ => None,
        };
        assert_eq!(phase, Some(GamePhase::Intro), "tap did not reach the game");
        assert_eq!(rig.manager.clock().target_fps(), DEFAULT_TARGET_FPS);
    }

    #[test]
    fn test_long_button_press_toggles_rotation() {
        let mut rig = Rig::new(cycle(), RecordingStore::default());
        rig.input.button = true;
        rig.run_for(2_500);
        rig.input.button = false;
        rig.step();
        assert!(rig.manager.settings().display_rotated());
        assert_eq!(rig.sink.rotations, [false, true], "initial apply, then the toggle");
        assert_eq!(rig.manager.store().saves, 1);
        assert_eq!(rig.manager.store().stored.map(|s| s.display_rotated()), Some(true));
    }

    #[test]
    fn test_short_button_press_keeps_rotation() {
        let mut rig = Rig::new(cycle(), RecordingStore::default());
        rig.input.button = true;
        rig.run_for(1_000);
        rig.input.button = false;
        rig.step();
        assert!(!rig.manager.settings().display_rotated());
        assert_eq!(rig.manager.store().saves, 0);
    }

    #[test]
    fn test_settings_change_applied_and_persisted() {
        let mut rig = Rig::new(cycle(), RecordingStore::default());
        rig.input.touch = Some(Point::new(120, 200));
        rig.run_for(1_200);
        rig.input.touch = None;
        rig.step();

        // Active brightness slider at 50 %
        rig.tap(100, 59);
        assert_eq!(rig.manager.settings().active_brightness(), 50);
        assert_eq!(rig.manager.store().saves, 1);
        assert_eq!(rig.sink.backlight.last(), Some(&crate::power::percent_to_hw(50)));
        assert!(rig.manager.registry().is_settings_active(), "control taps are consumed");
    }

    #[test]
    fn test_failed_save_is_logged_and_setting_kept() {
        let store = RecordingStore {
            fail_writes: true,
            ..RecordingStore::default()
        };
        let mut rig = Rig::new(cycle(), store);
        rig.input.button = true;
        rig.run_for(2_500);
        rig.input.button = false;
        rig.step();
        assert!(rig.manager.settings().display_rotated());
        assert!(rig.manager.log().iter().any(|l| l == "config: store write failed"));
    }
}
