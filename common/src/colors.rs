//! Color palette for the badge views.
//!
//! All colors are authored as 8-bit RGB triples and packed into `Rgb565` at
//! compile time with [`rgb`]. Views receive a [`Palette`] value when they are
//! constructed instead of reading global color caches.
//!
//! ## Rgb565 Color Format
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! Blending helpers below work directly on the packed channels with
//! fixed-point integer math.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::IntoStorage;

/// Pack an 8-bit RGB triple into `Rgb565`.
#[inline]
pub const fn rgb(
    r: u8,
    g: u8,
    b: u8,
) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

// =============================================================================
// Standard Colors
// =============================================================================

pub const BLACK: Rgb565 = Rgb565::BLACK;
pub const WHITE: Rgb565 = Rgb565::WHITE;

// =============================================================================
// Palette
// =============================================================================

/// Named colors shared by every view.
///
/// Constructed once (usually through [`Palette::neon`]) and copied into each
/// view. `Copy` keeps it cheap to pass around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Badge background (deep indigo).
    pub background: Rgb565,
    /// Game and program background (near black purple).
    pub background_dark: Rgb565,
    /// Scanline tint drawn over the badge background.
    pub scanline: Rgb565,
    pub violet: Rgb565,
    pub cyan: Rgb565,
    pub yellow: Rgb565,
    pub pink: Rgb565,
    pub magenta: Rgb565,
    pub green: Rgb565,
    pub red: Rgb565,
    pub orange: Rgb565,
    pub mint: Rgb565,
    /// Program view timeline color.
    pub timeline: Rgb565,
    /// Base color of the name glow before blending toward the background.
    pub glow: Rgb565,
    /// Drop shadow color used by the simple neon text style.
    pub shadow: Rgb565,
    pub white: Rgb565,
    pub dim: Rgb565,
}

impl Palette {
    /// The badge's neon color scheme.
    pub const fn neon() -> Self {
        Self {
            background: rgb(8, 6, 20),
            background_dark: rgb(5, 0, 15),
            scanline: rgb(12, 8, 30),
            violet: rgb(199, 120, 255),
            cyan: rgb(0, 224, 255),
            yellow: rgb(255, 195, 0),
            pink: rgb(255, 40, 180),
            magenta: rgb(255, 0, 150),
            green: rgb(0, 255, 100),
            red: rgb(255, 40, 40),
            orange: rgb(255, 140, 0),
            mint: rgb(150, 255, 200),
            timeline: rgb(100, 150, 200),
            glow: rgb(255, 60, 200),
            shadow: rgb(255, 0, 150),
            white: WHITE,
            dim: rgb(60, 50, 90),
        }
    }
}

impl Default for Palette {
    fn default() -> Self { Self::neon() }
}

// =============================================================================
// Color Math
// =============================================================================

#[inline]
fn channels(c: Rgb565) -> (i32, i32, i32) {
    let raw = c.into_storage();
    (
        ((raw >> 11) & 0x1F) as i32,
        ((raw >> 5) & 0x3F) as i32,
        (raw & 0x1F) as i32,
    )
}

/// Linear interpolation between two colors, `t` in `0.0..=1.0`.
///
/// `t` is converted to 8-bit fixed point; out of range values are clamped.
pub fn lerp_rgb565(
    from: Rgb565,
    to: Rgb565,
    t: f32,
) -> Rgb565 {
    let t_fixed = (t.clamp(0.0, 1.0) * 256.0) as i32;
    let (fr, fg, fb) = channels(from);
    let (tr, tg, tb) = channels(to);

    let mix = |a: i32, b: i32| a + (((b - a) * t_fixed) >> 8);

    Rgb565::new(
        mix(fr, tr).clamp(0, 31) as u8,
        mix(fg, tg).clamp(0, 63) as u8,
        mix(fb, tb).clamp(0, 31) as u8,
    )
}

/// Alpha-blend `fg` over `bg`. An alpha of 1.0 returns `fg`.
#[inline]
pub fn blend(
    fg: Rgb565,
    bg: Rgb565,
    alpha: f32,
) -> Rgb565 {
    lerp_rgb565(bg, fg, alpha)
}

/// Scale a color toward black by `factor` (1.0 leaves it unchanged).
#[inline]
pub fn scale(
    color: Rgb565,
    factor: f32,
) -> Rgb565 {
    lerp_rgb565(BLACK, color, factor)
}

/// Color from 8-bit channel factors and an overall level in `0.0..=1.0`.
///
/// Used for particles whose tint is a fixed channel ratio scaled by alpha.
pub fn tinted(
    level: f32,
    r: f32,
    g: f32,
    b: f32,
) -> Rgb565 {
    let l = level.clamp(0.0, 1.0) * 255.0;
    rgb((l * r) as u8, (l * g) as u8, (l * b) as u8)
}

// =============================================================================
// Tests
// =============================================================================
