//! Placeholder QR module grid.
//!
//! Payload encoding is done outside the badge core. For the desktop preview the
//! token is hashed into data modules around the three finder patterns, which
//! looks like a QR code but does not scan.

use badge_common::views::QrGrid;

/// Version 2 symbol size.
const SIZE: u8 = 25;
const FINDER: u8 = 7;

pub fn placeholder_grid(token: &str) -> QrGrid {
    let seed = fnv1a(token.as_bytes());
    QrGrid::from_fn(SIZE, |x, y| {
        if let Some(dark) = finder_module(x, y) {
            return dark;
        }
        // Timing patterns
        if x == 6 || y == 6 {
            return (x + y) % 2 == 0;
        }
        let h = fnv1a(&[x, y]) ^ seed;
        h.wrapping_mul(0x9E37_79B9) >> 31 == 1
    })
}

/// Finder pattern (plus separator) membership for the three corners.
fn finder_module(
    x: u8,
    y: u8,
) -> Option<bool> {
    let far = SIZE - FINDER;
    let (fx, fy) = match (x, y) {
        (0..=7, 0..=7) => (x, y),
        (_, 0..=7) if x >= far - 1 => (x.wrapping_sub(far), y),
        (0..=7, _) if y >= far - 1 => (x, y.wrapping_sub(far)),
        _ => return None,
    };
    if fx >= FINDER || fy >= FINDER {
        return Some(false);
    }
    let ring = fx.min(fy).min(FINDER - 1 - fx).min(FINDER - 1 - fy);
    Some(ring != 1)
}

fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0x811C_9DC5, |h, &b| (h ^ u32::from(b)).wrapping_mul(0x0100_0193))
}
