//! Console output constants

/// Moves the cursor to the previous line and clears it, so the progress line
/// is redrawn in place
pub const REDRAW_PREVIOUS_LINE: &str = "\x1b[F\x1b[K";

/// One bar character per this many percent
pub const PERCENT_PER_BAR_CHAR: u64 = 2;

/// Bar character
pub const BAR_CHAR: char = '-';
