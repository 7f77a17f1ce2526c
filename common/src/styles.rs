//! Fonts backing each glyph size on the dashboard.
//!
//! The panel is tiny, so every element uses a monospace font with a fixed cell
//! width. The digit-diff renderer relies on that: column `i` of a two-digit
//! value always starts at `anchor.x + i * cell_width`.

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use profont::{PROFONT_18_POINT, PROFONT_24_POINT};

/// Static labels ("BAT%", "DIS", "MPH") and boot messages.
pub const LABEL_FONT: &MonoFont<'static> = &FONT_6X10;

/// Battery and distance digits (left column).
pub const SMALL_VALUE_FONT: &MonoFont<'static> = &PROFONT_18_POINT;

/// Speed digits (right half).
pub const LARGE_VALUE_FONT: &MonoFont<'static> = &PROFONT_24_POINT;

/// "SAFETY MARGIN" banner and the "Connecting." / "Connected :)" screens.
pub const BANNER_FONT: &MonoFont<'static> = &FONT_10X20;

/// Safety margin percentage shown in the alert layout.
pub const ALERT_VALUE_FONT: &MonoFont<'static> = &PROFONT_24_POINT;
