//! Panel and layout configuration constants.
//!
//! Every element of the dashboard lives at a fixed position; nothing is laid
//! out at runtime. Anchors are the top-left corner of the first glyph cell.
//!
//! ```text
//!  0        50                     160
//!  +--------+-----------------------+
//!  | BAT%   |       MPH             |
//!  |  88    |                       |
//!  |        |        88             |
//!  |  DIS   |                       |
//!  |  88    |                       |
//!  +--------+-----------------------+ 80
//! ```

use embedded_graphics::prelude::Point;

// =============================================================================
// Panel Configuration
// =============================================================================

/// Panel width in pixels (ST7735 mini 160x80, landscape).
pub const SCREEN_WIDTH: u32 = 160;

/// Panel height in pixels.
pub const SCREEN_HEIGHT: u32 = 80;

// =============================================================================
// Static Labels
// =============================================================================

pub const BATTERY_LABEL_POS: Point = Point::new(5, 5);
pub const DISTANCE_LABEL_POS: Point = Point::new(15, 45);
pub const SPEED_LABEL_POS: Point = Point::new(95, 5);

/// Column of the full-height divider between the left and right halves.
pub const DIVIDER_X: i32 = 50;

// =============================================================================
// Metric Anchors
// =============================================================================

pub const BATTERY_ANCHOR: Point = Point::new(8, 18);
pub const SPEED_ANCHOR: Point = Point::new(88, 28);
pub const DISTANCE_ANCHOR: Point = Point::new(8, 56);

// =============================================================================
// Alert Layout
// =============================================================================

/// Top-left of the "SAFETY MARGIN" banner text.
pub const ALERT_BANNER_POS: Point = Point::new(15, 8);

/// Top-left of the first percentage digit; the `%` sign occupies the third cell.
pub const ALERT_PERCENT_ANCHOR: Point = Point::new(56, 38);

// =============================================================================
// Boot Screens
// =============================================================================

/// Status line shown while the link is coming up.
pub const BOOT_STATUS_POS: Point = Point::new(10, 20);

/// Second status line, shown once associated.
pub const BOOT_DONE_POS: Point = Point::new(10, 44);

// Every anchor must leave room for its glyphs inside the panel
const _: () = assert!(DIVIDER_X > 0 && DIVIDER_X < SCREEN_WIDTH as i32);
const _: () = assert!(BATTERY_ANCHOR.x < DIVIDER_X && DISTANCE_ANCHOR.x < DIVIDER_X);
const _: () = assert!(SPEED_ANCHOR.x > DIVIDER_X);
const _: () = assert!(DISTANCE_ANCHOR.y < SCREEN_HEIGHT as i32);
