//! ANSI color decoration and per-host color rotation.
//!
//! Colors are only emitted when stdout is a terminal; callers pass that
//! capability in so the functions here stay pure and testable.
//!
//! # Color Rotation
//!
//! In interleaved mode every host gets its own color so lines stay
//! distinguishable under heavy interleaving. [`ColorCycle`] hands out colors
//! from a fixed 7-entry palette, advancing atomically so concurrent host
//! startups never receive racy assignments.

use std::sync::atomic::{AtomicUsize, Ordering};

/// ANSI color code for white.
pub const WHITE: u8 = 89;
/// ANSI color code for black.
pub const BLACK: u8 = 90;
/// ANSI color code for red.
pub const RED: u8 = 91;
/// ANSI color code for green.
pub const GREEN: u8 = 92;
/// ANSI color code for yellow.
pub const YELLOW: u8 = 93;
/// ANSI color code for blue.
pub const BLUE: u8 = 94;
/// ANSI color code for purple.
pub const PURPLE: u8 = 95;

/// The rotation palette, in assignment order.
pub const PALETTE: [u8; 7] = [WHITE, BLACK, RED, GREEN, YELLOW, BLUE, PURPLE];

/// Wrap `text` in an ANSI color escape.
///
/// Returns `text` unchanged when `enabled` is false, so piped output stays
/// free of escape codes.
///
/// # Examples
///
/// ```
/// use fanrun::color::{colorize, GREEN};
///
/// assert_eq!(colorize("ok", GREEN, true, true), "\x1b[01;92mok\x1b[0m");
/// assert_eq!(colorize("ok", GREEN, true, false), "ok");
/// ```
pub fn colorize(text: &str, code: u8, bold: bool, enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }
    let b = if bold { "01;" } else { "" };
    format!("\x1b[{}{}m{}\x1b[0m", b, code, text)
}

/// Rotating color assignment shared across all workers.
///
/// Each call to [`next`](ColorCycle::next) returns the next palette entry,
/// wrapping after seven. The counter is atomic, so assignment order matches
/// the order in which host streams are opened even under concurrency.
#[derive(Debug, Default)]
pub struct ColorCycle {
    next: AtomicUsize,
}

impl ColorCycle {
    /// Create a cycle starting at the first palette entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next color in the rotation.
    pub fn next(&self) -> u8 {
        let i = self.next.fetch_add(1, Ordering::Relaxed);
        PALETTE[i % PALETTE.len()]
    }
}
