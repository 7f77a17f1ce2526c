//! Color constants for the mini dashboard.
//!
//! # Rgb565 Color Format
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! This is the native format of the ST7735 160x80 panel, so no conversion
//! happens between these constants and the bus.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors (from RgbColor trait)
// =============================================================================

/// Pure black (0, 0, 0). Screen background in the normal layout.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white (31, 63, 31). Labels, speed, distance and the alert text.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red (31, 0, 0). Alert background and the lowest battery band.
pub const RED: Rgb565 = Rgb565::RED;

/// Pure green (0, 63, 0). Highest battery band.
pub const GREEN: Rgb565 = Rgb565::GREEN;

/// Pure yellow (31, 63, 0). Middle battery band.
pub const YELLOW: Rgb565 = Rgb565::YELLOW;

// =============================================================================
// Custom Colors
// =============================================================================

/// Mid gray for the vertical divider (raw `0x7BEF`).
pub const GRAY: Rgb565 = Rgb565::new(15, 31, 15);

// =============================================================================
// Semantic Roles
// =============================================================================

/// Background of the normal layout; also the erase color for metric digits.
pub const BACKGROUND_COLOR: Rgb565 = BLACK;

/// Foreground for static labels and fixed-color metrics.
pub const TEXT_COLOR: Rgb565 = WHITE;

/// Full-screen fill while in alert mode; also the erase color for the percentage.
pub const ALERT_COLOR: Rgb565 = RED;

/// Divider line color.
pub const DIVIDER_COLOR: Rgb565 = GRAY;

#[cfg(test)]
mod tests {
    use embedded_graphics::prelude::IntoStorage;

    use super::*;

    #[test]
    fn test_gray_matches_panel_raw_value() {
        assert_eq!(GRAY.into_storage(), 0x7BEF);
    }

    #[test]
    fn test_erase_colors_differ_from_text() {
        assert_ne!(BACKGROUND_COLOR, TEXT_COLOR);
        assert_ne!(ALERT_COLOR, TEXT_COLOR);
    }
}
