//! Configuration: compile-time layout/timing constants and runtime settings.
//!
//! Layout values are `const` so drawing code never recomputes them per frame.
//! Runtime settings ([`Settings`]) are the user-adjustable values persisted by
//! an external key-value store behind the [`ConfigStore`] trait.

use core::fmt;

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (portrait panel).
pub const SCREEN_WIDTH: u32 = 240;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 320;

/// Screen center X coordinate.
pub const CENTER_X: i32 = (SCREEN_WIDTH / 2) as i32;

// =============================================================================
// Timing Configuration
// =============================================================================

/// Default frame rate target for the frame gate.
pub const DEFAULT_TARGET_FPS: u32 = 30;

/// Frame rate used while the badge is asleep.
pub const SLEEP_TARGET_FPS: u32 = 10;

/// Upper bound for any configured frame rate.
pub const MAX_TARGET_FPS: u32 = 120;

/// Largest frame delta (seconds) fed to animation and game updates.
pub const MAX_DT: f32 = 0.1;

/// Button hold time that toggles display rotation.
pub const BUTTON_LONG_PRESS_MS: u64 = 2000;

/// Button debounce window.
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Touch hold time that opens the settings view.
pub const TOUCH_LONG_PRESS_MS: u64 = 1000;

/// Distance (pixels, per axis) a contact may travel before it becomes a drag.
pub const DRAG_THRESHOLD_PX: i32 = 12;

/// Floor for the inactivity timeout, whatever the configured minutes say.
pub const MIN_AWAKE_TIMEOUT_MS: u64 = 6_000;

// =============================================================================
// Settings Limits
// =============================================================================

pub const DEFAULT_ACTIVE_BRIGHTNESS: u8 = 80;
pub const DEFAULT_SLEEP_BRIGHTNESS: u8 = 5;
pub const DEFAULT_AWAKE_TIMEOUT_MINUTES: f32 = 2.0;

/// Smallest storable awake timeout.
pub const MIN_AWAKE_TIMEOUT_MINUTES: f32 = 0.1;

/// Range offered by the settings view stepper.
pub const STEPPER_MIN_MINUTES: u32 = 1;
pub const STEPPER_MAX_MINUTES: u32 = 60;

/// Stepper switches from 1-minute to 5-minute increments at this value.
pub const STEPPER_COARSE_FROM: u32 = 5;

// =============================================================================
// Runtime Settings
// =============================================================================

/// User adjustable settings.
///
/// Every setter clamps into range; nothing here can fail.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    active_brightness: u8,
    sleep_brightness: u8,
    awake_timeout_minutes: f32,
    display_rotated: bool,
}

impl Settings {
    pub const fn new() -> Self {
        Self {
            active_brightness: DEFAULT_ACTIVE_BRIGHTNESS,
            sleep_brightness: DEFAULT_SLEEP_BRIGHTNESS,
            awake_timeout_minutes: DEFAULT_AWAKE_TIMEOUT_MINUTES,
            display_rotated: false,
        }
    }

    #[inline]
    pub const fn active_brightness(&self) -> u8 { self.active_brightness }

    #[inline]
    pub const fn sleep_brightness(&self) -> u8 { self.sleep_brightness }

    #[inline]
    pub const fn awake_timeout_minutes(&self) -> f32 { self.awake_timeout_minutes }

    #[inline]
    pub const fn display_rotated(&self) -> bool { self.display_rotated }

    /// Active backlight percentage, clamped to 0-100.
    pub fn set_active_brightness(
        &mut self,
        percent: i32,
    ) {
        self.active_brightness = percent.clamp(0, 100) as u8;
    }

    /// Sleep backlight percentage, clamped to 0-100.
    pub fn set_sleep_brightness(
        &mut self,
        percent: i32,
    ) {
        self.sleep_brightness = percent.clamp(0, 100) as u8;
    }

    /// Inactivity timeout in minutes. Non-finite or tiny values fall back to
    /// [`MIN_AWAKE_TIMEOUT_MINUTES`].
    pub fn set_awake_timeout_minutes(
        &mut self,
        minutes: f32,
    ) {
        self.awake_timeout_minutes = if minutes.is_finite() {
            minutes.max(MIN_AWAKE_TIMEOUT_MINUTES)
        } else {
            MIN_AWAKE_TIMEOUT_MINUTES
        };
    }

    pub fn set_display_rotated(
        &mut self,
        rotated: bool,
    ) {
        self.display_rotated = rotated;
    }

    pub fn toggle_rotation(&mut self) { self.display_rotated = !self.display_rotated; }

    /// Effective inactivity timeout in milliseconds, never below
    /// [`MIN_AWAKE_TIMEOUT_MS`].
    pub fn awake_timeout_ms(&self) -> u64 {
        let ms = (self.awake_timeout_minutes * 60_000.0) as u64;
        ms.max(MIN_AWAKE_TIMEOUT_MS)
    }

    /// Whole minutes shown by the settings stepper.
    pub fn stepper_minutes(&self) -> u32 {
        ((self.awake_timeout_minutes + 0.5) as u32).clamp(STEPPER_MIN_MINUTES, STEPPER_MAX_MINUTES)
    }

    /// One stepper click: +/-1 below five minutes, +/-5 from five upward
    /// (five steps down to four). Result stays within 1-60.
    pub fn step_awake_timeout(
        &mut self,
        up: bool,
    ) {
        let m = self.stepper_minutes();
        let next = if up {
            if m < STEPPER_COARSE_FROM { m + 1 } else { m + 5 }
        } else if m <= STEPPER_COARSE_FROM {
            m.saturating_sub(1)
        } else {
            m - 5
        };
        self.awake_timeout_minutes = next.clamp(STEPPER_MIN_MINUTES, STEPPER_MAX_MINUTES) as f32;
    }
}

impl Default for Settings {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Persistence Capability
// =============================================================================

/// Failure reported by a [`ConfigStore`] backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Backend could not be opened or is not mounted.
    Unavailable,
    /// Write was rejected or did not complete.
    WriteFailed,
}

impl fmt::Display for StoreError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Unavailable => f.write_str("store unavailable"),
            Self::WriteFailed => f.write_str("store write failed"),
        }
    }
}

/// Durable key-value storage for [`Settings`].
pub trait ConfigStore {
    /// Stored settings, or `None` when nothing was saved yet.
    fn load(&mut self) -> Option<Settings>;

    fn save(
        &mut self,
        settings: &Settings,
    ) -> Result<(), StoreError>;
}

// =============================================================================
// Badge Holder
// =============================================================================

/// Identity printed on the badge and the access view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserInfo {
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub team: &'static str,
    pub city: &'static str,
    pub role: &'static str,
    /// Opaque access token encoded into the QR grid by the caller.
    pub token: &'static str,
    /// Event name shown in the badge header.
    pub event: &'static str,
}

impl UserInfo {
    pub const fn demo() -> Self {
        Self {
            first_name: "Yann",
            last_name: "Sergent",
            team: "open|core",
            city: "Ecully",
            role: "Gardien des Pixels",
            token: "MDyloh2NUAa6",
            event: "G2S",
        }
    }
}

impl Default for UserInfo {
    fn default() -> Self { Self::demo() }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::new();
        assert_eq!(s.active_brightness(), DEFAULT_ACTIVE_BRIGHTNESS);
        assert_eq!(s.sleep_brightness(), DEFAULT_SLEEP_BRIGHTNESS);
        assert!(!s.display_rotated());
    }

    #[test]
    fn test_brightness_setters_clamp() {
        let mut s = Settings::new();
        s.set_active_brightness(250);
        assert_eq!(s.active_brightness(), 100);
        s.set_active_brightness(-4);
        assert_eq!(s.active_brightness(), 0);
        s.set_sleep_brightness(101);
        assert_eq!(s.sleep_brightness(), 100);
    }

    #[test]
    fn test_awake_timeout_minimum() {
        let mut s = Settings::new();
        s.set_awake_timeout_minutes(0.0);
        assert!((s.awake_timeout_minutes() - MIN_AWAKE_TIMEOUT_MINUTES).abs() < f32::EPSILON);
        assert_eq!(s.awake_timeout_ms(), MIN_AWAKE_TIMEOUT_MS, "0.1 min is below the 6 s floor");

        s.set_awake_timeout_minutes(f32::NAN);
        assert!((s.awake_timeout_minutes() - MIN_AWAKE_TIMEOUT_MINUTES).abs() < f32::EPSILON);
    }

    #[test]
    fn test_awake_timeout_ms_conversion() {
        let mut s = Settings::new();
        s.set_awake_timeout_minutes(2.0);
        assert_eq!(s.awake_timeout_ms(), 120_000);
    }

    #[test]
    fn test_stepper_fine_then_coarse() {
        let mut s = Settings::new();
        s.set_awake_timeout_minutes(3.0);
        s.step_awake_timeout(true);
        assert_eq!(s.stepper_minutes(), 4);
        s.step_awake_timeout(true);
        assert_eq!(s.stepper_minutes(), 5);
        s.step_awake_timeout(true);
        assert_eq!(s.stepper_minutes(), 10, "steps of 5 from 5 upward");
        s.step_awake_timeout(false);
        assert_eq!(s.stepper_minutes(), 5);
        s.step_awake_timeout(false);
        assert_eq!(s.stepper_minutes(), 4, "decrement from 5 goes to 4");
    }

    #[test]
    fn test_stepper_bounds() {
        let mut s = Settings::new();
        s.set_awake_timeout_minutes(1.0);
        s.step_awake_timeout(false);
        assert_eq!(s.stepper_minutes(), 1);

        s.set_awake_timeout_minutes(60.0);
        s.step_awake_timeout(true);
        assert_eq!(s.stepper_minutes(), 60);
    }

    #[test]
    fn test_toggle_rotation() {
        let mut s = Settings::new();
        s.toggle_rotation();
        assert!(s.display_rotated());
        s.toggle_rotation();
        assert!(!s.display_rotated());
    }

    #[test]
    fn test_store_error_display() {
        assert_eq!(StoreError::WriteFailed.to_string(), "store write failed");
    }
}
