//! Sleep/wake state and backlight directives.

use crate::config::Settings;

/// Brightness change the frame sink should apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BacklightDirective {
    /// Requested level as a percentage (0-100).
    pub percent: u8,
}

impl BacklightDirective {
    /// Level mapped linearly onto the 0-255 hardware range.
    #[inline]
    pub const fn hardware_level(self) -> u8 { percent_to_hw(self.percent) }
}

/// Map a 0-100 percentage onto the 8-bit backlight range.
#[inline]
pub const fn percent_to_hw(percent: u8) -> u8 {
    let p = if percent > 100 { 100 } else { percent };
    ((p as u32 * 255) / 100) as u8
}

/// Inactivity tracker.
///
/// Sleep is entered by [`PowerState::tick`] once the configured timeout has
/// elapsed since the last activity. Wake happens on the next touch-down edge.
#[derive(Debug, Clone, Copy)]
pub struct PowerState {
    last_activity_ms: u64,
    asleep: bool,
}

impl PowerState {
    pub const fn new(now_ms: u64) -> Self {
        Self {
            last_activity_ms: now_ms,
            asleep: false,
        }
    }

    #[inline]
    pub const fn is_asleep(&self) -> bool { self.asleep }

    #[inline]
    pub const fn last_activity_ms(&self) -> u64 { self.last_activity_ms }

    /// Record user activity (touch held, button edge) without changing mode.
    pub fn note_activity(
        &mut self,
        now_ms: u64,
    ) {
        self.last_activity_ms = now_ms;
    }

    /// Leave sleep mode. Returns the active backlight level when the mode
    /// actually changed.
    pub fn wake(
        &mut self,
        now_ms: u64,
        settings: &Settings,
    ) -> Option<BacklightDirective> {
        self.last_activity_ms = now_ms;
        if !self.asleep {
            return None;
        }
        self.asleep = false;
        Some(BacklightDirective {
            percent: settings.active_brightness(),
        })
    }

    /// Enter sleep once the inactivity timeout has passed.
    pub fn tick(
        &mut self,
        now_ms: u64,
        settings: &Settings,
    ) -> Option<BacklightDirective> {
        if self.asleep {
            return None;
        }
        if now_ms.saturating_sub(self.last_activity_ms) > settings.awake_timeout_ms() {
            self.asleep = true;
            return Some(BacklightDirective {
                percent: settings.sleep_brightness(),
            });
        }
        None
    }

    /// Level for the current mode, used after a settings change.
    pub const fn current_backlight(
        &self,
        settings: &Settings,
    ) -> BacklightDirective {
        let percent = if self.asleep {
            settings.sleep_brightness()
        } else {
            settings.active_brightness()
        };
        BacklightDirective { percent }
    }
}

// =============================================================================
// Tests
// =============================================================================
