//! Button and touch gesture recognition.
//!
//! Raw levels are sampled once per accepted frame. Two independent trackers
//! turn them into [`InputEvent`]s:
//!
//! - [`ButtonTracker`]: debounced press/release edges. A hold of at least
//!   [`BUTTON_LONG_PRESS_MS`] emits [`InputEvent::RotationToggle`] on release.
//! - [`TouchTracker`]: tap, hold-to-settings and drag, with wake-consumes
//!   semantics (the contact that wakes the badge is never delivered).
//!
//! Duration is measured across frames, so a single noisy touch read cannot
//! reach the one second hold threshold.

use embedded_graphics::prelude::Point;
use heapless::Vec;

use crate::config::{BUTTON_DEBOUNCE_MS, BUTTON_LONG_PRESS_MS, DRAG_THRESHOLD_PX, TOUCH_LONG_PRESS_MS};

/// Maximum events produced by a single sample.
pub const MAX_EVENTS_PER_SAMPLE: usize = 4;

/// Events emitted per sample, in order.
pub type InputEvents = Vec<InputEvent, MAX_EVENTS_PER_SAMPLE>;

// =============================================================================
// Input Source Capability
// =============================================================================

/// Raw input levels, polled once per frame.
pub trait InputSource {
    /// `true` while the physical button is held (already converted from the
    /// active-low pin level).
    fn button_pressed(&mut self) -> bool;

    /// Current contact point, if the panel is being touched.
    fn touch(&mut self) -> Option<Point>;
}

/// One sample of both channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawInput {
    pub button_pressed: bool,
    pub touch: Option<Point>,
}

impl RawInput {
    pub fn sample<I: InputSource>(source: &mut I) -> Self {
        Self {
            button_pressed: source.button_pressed(),
            touch: source.touch(),
        }
    }
}

// =============================================================================
// Events
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Button went down. Counts as user activity.
    ButtonDown,
    /// Button held long enough and released.
    RotationToggle,
    /// First contact of a touch. `woke` is set when the badge was asleep;
    /// such a contact is consumed by the wake and produces nothing else.
    TouchDown { woke: bool },
    /// Contact held past the settings threshold (once per hold).
    OpenSettings,
    /// Contact moved past the drag threshold; reported every frame while held.
    Drag { x: i32, y: i32 },
    /// Short contact released without moving, at its touch-down position.
    Tap { x: i32, y: i32 },
}

// =============================================================================
// Button
// =============================================================================

/// Debounced button edge tracker.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonTracker {
    pressed: bool,
    press_start_ms: u64,
    last_change_ms: Option<u64>,
}

impl ButtonTracker {
    pub const fn new() -> Self {
        Self {
            pressed: false,
            press_start_ms: 0,
            last_change_ms: None,
        }
    }

    #[inline]
    pub const fn is_pressed(&self) -> bool { self.pressed }

    #[inline]
    pub const fn press_start_ms(&self) -> u64 { self.press_start_ms }

    /// Feed the current level. Level changes inside the debounce window are
    /// ignored. Only one press is tracked at a time: a new press cannot start
    /// until the previous one has been released.
    pub fn update(
        &mut self,
        pressed: bool,
        now_ms: u64,
    ) -> Option<InputEvent> {
        if pressed == self.pressed {
            return None;
        }

        if let Some(last) = self.last_change_ms
            && now_ms.saturating_sub(last) < BUTTON_DEBOUNCE_MS
        {
            return None;
        }

        self.pressed = pressed;
        self.last_change_ms = Some(now_ms);

        if pressed {
            self.press_start_ms = now_ms;
            return Some(InputEvent::ButtonDown);
        }

        let held = now_ms.saturating_sub(self.press_start_ms);
        (held >= BUTTON_LONG_PRESS_MS).then_some(InputEvent::RotationToggle)
    }
}

// =============================================================================
// Touch
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct Contact {
    origin: Point,
    down_ms: u64,
    long_press_triggered: bool,
    dragging: bool,
    woke: bool,
}

/// Tap / hold / drag disambiguation for a single-point touch panel.
#[derive(Debug, Clone, Copy, Default)]
pub struct TouchTracker {
    contact: Option<Contact>,
}

impl TouchTracker {
    pub const fn new() -> Self { Self { contact: None } }

    /// Whether a contact is currently held.
    #[inline]
    pub const fn is_touching(&self) -> bool { self.contact.is_some() }

    /// Feed the current contact and push resulting events into `out`.
    pub fn update(
        &mut self,
        touch: Option<Point>,
        now_ms: u64,
        asleep: bool,
        out: &mut InputEvents,
    ) {
        match (touch, self.contact.as_mut()) {
            (Some(p), None) => {
                self.contact = Some(Contact {
                    origin: p,
                    down_ms: now_ms,
                    long_press_triggered: false,
                    dragging: false,
                    woke: asleep,
                });
                out.push(InputEvent::TouchDown { woke: asleep }).ok();
            }
            (Some(p), Some(c)) => {
                if c.woke {
                    return;
                }
                if !c.dragging && !c.long_press_triggered && moved_past_threshold(c.origin, p) {
                    c.dragging = true;
                }
                if c.dragging {
                    out.push(InputEvent::Drag { x: p.x, y: p.y }).ok();
                } else if !c.long_press_triggered && now_ms.saturating_sub(c.down_ms) > TOUCH_LONG_PRESS_MS {
                    c.long_press_triggered = true;
                    out.push(InputEvent::OpenSettings).ok();
                }
            }
            (None, Some(c)) => {
                let held = now_ms.saturating_sub(c.down_ms);
                if !c.woke && !c.dragging && !c.long_press_triggered && held < TOUCH_LONG_PRESS_MS {
                    out.push(InputEvent::Tap {
                        x: c.origin.x,
                        y: c.origin.y,
                    })
                    .ok();
                }
                self.contact = None;
            }
            (None, None) => {}
        }
    }
}

fn moved_past_threshold(
    origin: Point,
    p: Point,
) -> bool {
    (p.x - origin.x).abs() > DRAG_THRESHOLD_PX || (p.y - origin.y).abs() > DRAG_THRESHOLD_PX
}

// =============================================================================
// Router
// =============================================================================

/// Owns both trackers and produces the events for one sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputRouter {
    button: ButtonTracker,
    touch: TouchTracker,
}

impl InputRouter {
    pub const fn new() -> Self {
        Self {
            button: ButtonTracker::new(),
            touch: TouchTracker::new(),
        }
    }

    #[inline]
    pub const fn button(&self) -> &ButtonTracker { &self.button }

    #[inline]
    pub const fn touch(&self) -> &TouchTracker { &self.touch }

    /// Button events first, then touch events.
    pub fn process(
        &mut self,
        raw: RawInput,
        now_ms: u64,
        asleep: bool,
    ) -> InputEvents {
        let mut out = InputEvents::new();
        if let Some(ev) = self.button.update(raw.button_pressed, now_ms) {
            out.push(ev).ok();
        }
        self.touch.update(raw.touch, now_ms, asleep, &mut out);
        out
    }
}

// =============================================================================
// Tests
// =============================================================================
