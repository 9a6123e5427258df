//! Event log ring buffer.
//!
//! The display manager records notable transitions here (view switches,
//! sleep/wake, rotation, settings writes, game outcomes). The simulator prints
//! new lines to stdout; with the `defmt` feature each line is also emitted
//! through `defmt::info!`.
//!
//! # Usage
//!
//! ```ignore
//! let mut log = EventLog::new();
//! log.push("Wake");
//! log.push_with_u32("Score ", 120);
//!
//! for line in log.iter() {
//!     println!("{}", line);
//! }
//! ```

use core::fmt::{self, Write};

use heapless::{Deque, String};

// =============================================================================
// Event Log Configuration
// =============================================================================

/// Maximum number of lines kept in the ring buffer.
pub const LOG_BUFFER_SIZE: usize = 8;

/// Maximum characters per line.
pub const LOG_LINE_LENGTH: usize = 48;

// =============================================================================
// Event Log Ring Buffer
// =============================================================================

/// Ring buffer of the most recent log lines.
///
/// Old lines are dropped when the buffer is full. A running sequence number
/// lets consumers print only what they have not seen yet.
pub struct EventLog {
    buffer: Deque<String<LOG_LINE_LENGTH>, LOG_BUFFER_SIZE>,
    total: u32,
}

impl EventLog {
    pub const fn new() -> Self {
        Self {
            buffer: Deque::new(),
            total: 0,
        }
    }

    /// Push a line, truncated to [`LOG_LINE_LENGTH`] - 1 characters.
    pub fn push(
        &mut self,
        msg: &str,
    ) {
        let mut line: String<LOG_LINE_LENGTH> = String::new();
        for c in msg.chars().take(LOG_LINE_LENGTH - 1) {
            line.push(c).ok();
        }
        self.push_line(line);
    }

    /// Push `prefix` followed by a decimal value.
    pub fn push_with_u32(
        &mut self,
        prefix: &str,
        value: u32,
    ) {
        let mut line: String<LOG_LINE_LENGTH> = String::new();
        for c in prefix.chars().take(LOG_LINE_LENGTH - 11) {
            line.push(c).ok();
        }
        push_u32(&mut line, value);
        self.push_line(line);
    }

    /// Push a formatted line. Output past the line length is dropped.
    pub fn push_fmt(
        &mut self,
        args: fmt::Arguments<'_>,
    ) {
        let mut line = Truncating(String::new());
        line.write_fmt(args).ok();
        self.push_line(line.0);
    }

    fn push_line(
        &mut self,
        line: String<LOG_LINE_LENGTH>,
    ) {
        #[cfg(feature = "defmt")]
        defmt::info!("{=str}", line.as_str());

        if self.buffer.is_full() {
            self.buffer.pop_front();
        }
        self.buffer.push_back(line).ok();
        self.total = self.total.wrapping_add(1);
    }

    /// Iterate over lines (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &str> { self.buffer.iter().map(heapless::string::StringInner::as_str) }

    /// Lines pushed after the first `seen` lines ever recorded, oldest first.
    ///
    /// Lines that already fell out of the buffer are skipped.
    pub fn since(
        &self,
        seen: u32,
    ) -> impl Iterator<Item = &str> {
        let fresh = self.total.wrapping_sub(seen) as usize;
        let skip = self.buffer.len().saturating_sub(fresh);
        self.iter().skip(skip)
    }

    /// Number of lines ever pushed.
    #[inline]
    pub const fn total(&self) -> u32 { self.total }

    #[inline]
    pub fn len(&self) -> usize { self.buffer.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }
}

impl Default for EventLog {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Line writer that keeps what fits and silently drops the rest.
struct Truncating(String<LOG_LINE_LENGTH>);

impl Write for Truncating {
    fn write_str(
        &mut self,
        s: &str,
    ) -> fmt::Result {
        for c in s.chars() {
            if self.0.len() + c.len_utf8() > LOG_LINE_LENGTH - 1 || self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Push a u32 value to a heapless string (no format! machinery).
pub fn push_u32<const N: usize>(
    s: &mut String<N>,
    mut val: u32,
) {
    if val == 0 {
        s.push('0').ok();
        return;
    }

    let mut digits = [0u8; 10];
    let mut i = 0;
    while val > 0 {
        digits[i] = (val % 10) as u8;
        val /= 10;
        i += 1;
    }

    while i > 0 {
        i -= 1;
        s.push((b'0' + digits[i]) as char).ok();
    }
}

// =============================================================================
// Tests
// =============================================================================
