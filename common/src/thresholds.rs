//! Centralized threshold and conversion constants.
//!
//! All thresholds are compile-time constants with validation assertions, so a
//! misordered band fails the build instead of drawing the wrong color.

use embedded_graphics::pixelcolor::Rgb565;

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::colors::{GREEN, RED, YELLOW};

// =============================================================================
// Safety Margin
// =============================================================================

/// Safety margin (percent) below which the dashboard switches to the alert layout.
pub const SAFETY_THRESHOLD: i32 = 15;

/// Check if a safety margin reading requires the alert layout.
#[inline]
pub const fn is_alert_margin(margin: i32) -> bool { margin < SAFETY_THRESHOLD }

// =============================================================================
// Battery Color Bands
// =============================================================================

/// Battery percentage above which the value is drawn in the top band (GREEN).
pub const BATTERY_HIGH: i32 = 80;

/// Battery percentage above which the value is drawn in the middle band (YELLOW).
/// At or below this value the lowest band (RED) is used.
pub const BATTERY_MID: i32 = 60;

const _: () = assert!(BATTERY_MID < BATTERY_HIGH);

/// Select the battery digit color for a reading.
///
/// Comparisons are strict: 81 is green, 80 and 61 are yellow, 60 is red.
#[inline]
pub const fn battery_color(percent: i32) -> Rgb565 {
    if percent > BATTERY_HIGH {
        GREEN
    } else if percent > BATTERY_MID {
        YELLOW
    } else {
        RED
    }
}

// =============================================================================
// Display Range
// =============================================================================

/// Largest value representable in two digit cells; larger readings saturate.
pub const DISPLAY_MAX: i32 = 99;

/// Value every metric holds at boot so the first real reading differs from it.
pub const STORE_SENTINEL: i32 = 22;

const _: () = assert!(STORE_SENTINEL >= 0 && STORE_SENTINEL <= DISPLAY_MAX);

// =============================================================================
// Unit Conversion
// =============================================================================

/// Kilometres to miles conversion factor.
pub const KM_TO_MILES: f32 = 0.621_371;

/// Convert a raw kilometre reading (km or km/h) to whole miles (mi or mph),
/// rounded to the nearest integer.
#[inline]
pub fn km_to_miles(km: i32) -> i32 { (km as f32 * KM_TO_MILES).round() as i32 }

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::assertions_on_constants)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_threshold_ordering() {
        assert!(BATTERY_MID < BATTERY_HIGH);
    }

    #[test]
    fn test_battery_color_bands() {
        assert_eq!(battery_color(81), GREEN, "81 is above the top threshold");
        assert_eq!(battery_color(80), YELLOW, "80 is not strictly above 80");
        assert_eq!(battery_color(61), YELLOW, "61 is strictly above 60");
        assert_eq!(battery_color(60), RED, "60 is not strictly above 60");
        assert_eq!(battery_color(0), RED);
        assert_eq!(battery_color(99), GREEN);
    }

    #[test]
    fn test_alert_margin_boundary() {
        assert!(is_alert_margin(14));
        assert!(is_alert_margin(0));
        assert!(!is_alert_margin(15), "threshold itself is not an alert");
        assert!(!is_alert_margin(99));
    }

    #[test]
    fn test_km_to_miles_rounding() {
        assert_eq!(km_to_miles(100), 62, "62.14 rounds down");
        assert_eq!(km_to_miles(10), 6, "6.21 rounds down");
        assert_eq!(km_to_miles(50), 31, "31.07 rounds down");
        assert_eq!(km_to_miles(5), 3, "3.11 rounds down");
        assert_eq!(km_to_miles(1), 1, "0.62 rounds up");
        assert_eq!(km_to_miles(0), 0);
    }

    #[test]
    fn test_sentinel_is_displayable() {
        assert!(STORE_SENTINEL <= DISPLAY_MAX);
    }
}
