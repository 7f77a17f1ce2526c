//! Metric identifiers, two-digit formatting and the metric store.
//!
//! The dashboard shows exactly four metrics. Each one is a small integer that
//! is rendered in two fixed-width digit cells, so a change redraws at most two
//! glyphs.

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::Point;

use crate::colors::TEXT_COLOR;
use crate::config::layout::{BATTERY_ANCHOR, DISTANCE_ANCHOR, SPEED_ANCHOR};
use crate::styles::{LARGE_VALUE_FONT, SMALL_VALUE_FONT};
use crate::thresholds::{DISPLAY_MAX, STORE_SENTINEL, battery_color};

// =============================================================================
// Metric
// =============================================================================

/// One of the four telemetry values the dashboard knows about.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Metric {
    /// Battery charge in percent.
    Battery,
    /// Speed; km/h on the wire, mph on screen.
    Speed,
    /// Safety margin in percent. Only visible in the alert layout.
    SafetyMargin,
    /// Remaining distance; km on the wire, miles on screen.
    Distance,
}

impl Metric {
    /// All metrics in wire order.
    pub const ALL: [Self; 4] = [Self::Battery, Self::Speed, Self::SafetyMargin, Self::Distance];

    /// Order in which a payload is applied: the layout decision comes first.
    pub const INGEST_ORDER: [Self; 4] = [Self::SafetyMargin, Self::Battery, Self::Speed, Self::Distance];

    /// Field code used by the telemetry API.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Battery => "vba",
            Self::Speed => "vsp",
            Self::SafetyMargin => "vsmg",
            Self::Distance => "vdi",
        }
    }

    /// Whether the raw reading is in kilometres and must be converted to miles.
    pub const fn is_metric_distance(self) -> bool { matches!(self, Self::Speed | Self::Distance) }

    /// Top-left of the first digit cell in the normal layout.
    ///
    /// The safety margin has no normal-layout position.
    pub const fn anchor(self) -> Option<Point> {
        match self {
            Self::Battery => Some(BATTERY_ANCHOR),
            Self::Speed => Some(SPEED_ANCHOR),
            Self::Distance => Some(DISTANCE_ANCHOR),
            Self::SafetyMargin => None,
        }
    }

    /// Font of the digit cells in the normal layout.
    pub const fn font(self) -> &'static MonoFont<'static> {
        match self {
            Self::Speed => LARGE_VALUE_FONT,
            Self::Battery | Self::Distance | Self::SafetyMargin => SMALL_VALUE_FONT,
        }
    }

    /// Digit color for `value`. Battery follows its threshold bands, the rest are fixed.
    pub const fn color(
        self,
        value: i32,
    ) -> Rgb565 {
        match self {
            Self::Battery => battery_color(value),
            Self::Speed | Self::SafetyMargin | Self::Distance => TEXT_COLOR,
        }
    }
}

// =============================================================================
// Two-Digit Formatting
// =============================================================================

/// A value clamped to `0..=99` and split into its tens and units digits.
///
/// Values below 10 keep a leading zero, so both cells are always occupied.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TwoDigits {
    tens: u8,
    units: u8,
}

impl TwoDigits {
    /// Number of digit cells.
    pub const WIDTH: usize = 2;

    pub const fn new(value: i32) -> Self {
        let clamped = if value < 0 {
            0
        } else if value > DISPLAY_MAX {
            DISPLAY_MAX
        } else {
            value
        };
        Self {
            tens: (clamped / 10) as u8,
            units: (clamped % 10) as u8,
        }
    }

    /// Digit in `column` (0 = tens, 1 = units).
    #[inline]
    pub const fn digit(
        self,
        column: usize,
    ) -> u8 {
        if column == 0 { self.tens } else { self.units }
    }

    /// ASCII glyph for `column`, as a one-character string.
    #[inline]
    pub const fn glyph(
        self,
        column: usize,
    ) -> &'static str {
        const GLYPHS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
        GLYPHS[self.digit(column) as usize]
    }

    /// The clamped value these digits represent.
    #[inline]
    pub const fn value(self) -> i32 { self.tens as i32 * 10 + self.units as i32 }
}

// =============================================================================
// Metric Store
// =============================================================================

/// Last value drawn (or, for the safety margin, last value seen) per metric.
///
/// Owned by the ingestion pipeline, which is the only writer. The render
/// engine receives previous values as explicit `old` arguments and reads the
/// store only when it has to repaint everything after a full-screen clear.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MetricStore {
    battery: i32,
    speed: i32,
    safety_margin: i32,
    distance: i32,
}

impl MetricStore {
    /// Store seeded with the boot sentinel for every metric.
    pub const fn new() -> Self {
        Self {
            battery: STORE_SENTINEL,
            speed: STORE_SENTINEL,
            safety_margin: STORE_SENTINEL,
            distance: STORE_SENTINEL,
        }
    }

    #[inline]
    pub const fn get(
        &self,
        metric: Metric,
    ) -> i32 {
        match metric {
            Metric::Battery => self.battery,
            Metric::Speed => self.speed,
            Metric::SafetyMargin => self.safety_margin,
            Metric::Distance => self.distance,
        }
    }

    #[inline]
    pub fn set(
        &mut self,
        metric: Metric,
        value: i32,
    ) {
        match metric {
            Metric::Battery => self.battery = value,
            Metric::Speed => self.speed = value,
            Metric::SafetyMargin => self.safety_margin = value,
            Metric::Distance => self.distance = value,
        }
    }

    #[inline]
    pub const fn battery(&self) -> i32 { self.battery }

    #[inline]
    pub const fn speed(&self) -> i32 { self.speed }

    #[inline]
    pub const fn safety_margin(&self) -> i32 { self.safety_margin }

    #[inline]
    pub const fn distance(&self) -> i32 { self.distance }

    /// Overwrite the three displayed values without drawing anything.
    ///
    /// The safety margin is not part of the displayed-value cache and is left alone.
    pub fn set_current_values(
        &mut self,
        battery: i32,
        speed: i32,
        distance: i32,
    ) {
        self.battery = battery;
        self.speed = speed;
        self.distance = distance;
    }
}

impl Default for MetricStore {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{GREEN, RED, YELLOW};

    #[test]
    fn test_two_digits_pads_single_digit() {
        let d = TwoDigits::new(7);
        assert_eq!(d.glyph(0), "0");
        assert_eq!(d.glyph(1), "7");
    }

    #[test]
    fn test_two_digits_saturates() {
        assert_eq!(TwoDigits::new(99).value(), 99);
        assert_eq!(TwoDigits::new(100), TwoDigits::new(99));
        assert_eq!(TwoDigits::new(12_345), TwoDigits::new(99));
    }

    #[test]
    fn test_two_digits_clamps_negative() {
        assert_eq!(TwoDigits::new(-5), TwoDigits::new(0));
    }

    #[test]
    fn test_digits_split_tens_and_units() {
        let d = TwoDigits::new(90);
        assert_eq!(d.digit(0), 9);
        assert_eq!(d.digit(1), 0);
        assert_eq!(d.glyph(0), "9");
        assert_eq!(d.value(), 90);
    }

    #[test]
    fn test_store_starts_at_sentinel() {
        let store = MetricStore::new();
        for metric in Metric::ALL {
            assert_eq!(store.get(metric), STORE_SENTINEL);
        }
    }

    #[test]
    fn test_set_current_values_leaves_safety_margin() {
        let mut store = MetricStore::new();
        store.set(Metric::SafetyMargin, 40);
        store.set_current_values(90, 31, 3);
        assert_eq!(store.battery(), 90);
        assert_eq!(store.speed(), 31);
        assert_eq!(store.distance(), 3);
        assert_eq!(store.safety_margin(), 40);
    }

    #[test]
    fn test_metric_codes() {
        let codes: Vec<&str> = Metric::ALL.iter().map(|m| m.code()).collect();
        assert_eq!(codes, vec!["vba", "vsp", "vsmg", "vdi"]);
    }

    #[test]
    fn test_metric_colors() {
        assert_eq!(Metric::Battery.color(90), GREEN);
        assert_eq!(Metric::Battery.color(70), YELLOW);
        assert_eq!(Metric::Battery.color(10), RED);
        assert_eq!(Metric::Speed.color(10), TEXT_COLOR);
        assert_eq!(Metric::Distance.color(90), TEXT_COLOR);
    }

    #[test]
    fn test_only_speed_and_distance_convert() {
        assert!(!Metric::Battery.is_metric_distance());
        assert!(Metric::Speed.is_metric_distance());
        assert!(!Metric::SafetyMargin.is_metric_distance());
        assert!(Metric::Distance.is_metric_distance());
    }
}
