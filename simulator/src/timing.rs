//! Timing constants for the simulator loop.
//!
//! These constants use `std::time::Duration` which is not available in `no_std`
//! environments, so they are defined here rather than in the common crate.

use std::time::Duration;

/// Pause after a tick the frame gate rejected, before polling again.
pub const IDLE_POLL: Duration = Duration::from_millis(1);

/// Window pixel scale.
pub const WINDOW_SCALE: u32 = 2;
