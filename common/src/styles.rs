//! Pre-computed text styles and font references.
//!
//! Alignment styles and fixed-color text styles are `const`, so they live in
//! read-only data and cost nothing per frame. Views whose text color changes
//! every frame (glow layers, flicker) build `MonoTextStyle::new(FONT, color)`
//! from the font references below.

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{FONT_6X10, FONT_7X13, FONT_10X20},
    },
    pixelcolor::Rgb565,
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::{PROFONT_14_POINT, PROFONT_24_POINT};

use crate::colors::WHITE;

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Centered horizontally, vertically centered on the anchor point.
pub const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

/// Left aligned, vertically centered on the anchor point.
pub const LEFT_MIDDLE: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Middle)
    .build();

/// Right aligned, vertically centered on the anchor point.
pub const RIGHT_MIDDLE: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Right)
    .baseline(Baseline::Middle)
    .build();

// =============================================================================
// Font References (for dynamic color styles)
// =============================================================================

/// Small font for hints and secondary labels.
pub const SMALL_FONT: &MonoFont = &FONT_6X10;

/// Body font for agenda lines and settings labels.
pub const BODY_FONT: &MonoFont = &FONT_7X13;

/// Header font (badge header, view titles).
pub const HEADER_FONT: &MonoFont = &FONT_10X20;

/// Secondary badge lines (team, city, role).
pub const DETAIL_FONT: &MonoFont = &PROFONT_14_POINT;

/// Large font for the glowing name.
pub const NAME_FONT: &MonoFont = &PROFONT_24_POINT;

// =============================================================================
// Fixed-Color Text Styles
// =============================================================================

pub const SMALL_STYLE_WHITE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, WHITE);

pub const BODY_STYLE_WHITE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_7X13, WHITE);

pub const HEADER_STYLE_WHITE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_10X20, WHITE);
