//! Render state machine for minimal display updates.
//!
//! This module provides:
//! - [`DisplayMode`] - Which of the two layouts is on screen
//! - [`Redraw`] - What a single update cost in screen writes
//! - [`RenderEngine`] - Turns (old, new) value pairs into the smallest set of draws
//!
//! # Digit-Diff Redraw
//!
//! Every metric occupies two fixed-width digit cells. On an update the old and
//! new values are split into tens and units; only columns whose digit differs
//! are touched. A touched column is erased by drawing the old glyph in the
//! erase color, then the new glyph is drawn in the value color at the same
//! cell. One update therefore costs at most two cells.
//!
//! # Display Modes
//!
//! | Mode | Entered when | On entry | Updates drawn |
//! |------|--------------|----------|---------------|
//! | Normal | safety margin >= threshold | clear, labels, repaint all three metrics | battery, speed, distance |
//! | Alert | safety margin < threshold | alert fill, banner, percentage | percentage only |
//!
//! Battery, speed and distance are suppressed while the alert layout is up.
//! Leaving alert mode repaints them from the [`MetricStore`], which already
//! holds whatever arrived while they were hidden.

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::Point;
use log::{debug, info};

use crate::colors::{ALERT_COLOR, BACKGROUND_COLOR, TEXT_COLOR};
use crate::config::layout::ALERT_PERCENT_ANCHOR;
use crate::metrics::{Metric, MetricStore, TwoDigits};
use crate::styles::ALERT_VALUE_FONT;
use crate::surface::Surface;
use crate::thresholds::is_alert_margin;
use crate::widgets::{draw_alert_banner, draw_labels, draw_percent_sign};

// =============================================================================
// Display Mode
// =============================================================================

/// Layout currently on screen.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// Battery, speed and distance with their labels.
    #[default]
    Normal,
    /// Full-screen safety margin warning.
    Alert,
}

impl DisplayMode {
    /// Check if the alert layout is on screen.
    #[inline]
    pub const fn is_alert(self) -> bool { matches!(self, Self::Alert) }
}

// =============================================================================
// Redraw Summary
// =============================================================================

/// Screen writes caused by one render call.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Redraw {
    /// Digit cells erased and redrawn.
    pub cells: u8,
    /// Whether the whole screen was filled (layout switch or initialization).
    pub full_screen: bool,
}

impl Redraw {
    /// Nothing was drawn.
    pub const NONE: Self = Self {
        cells: 0,
        full_screen: false,
    };

    #[inline]
    pub const fn is_empty(self) -> bool { self.cells == 0 && !self.full_screen }

    /// Combine two summaries.
    #[inline]
    pub const fn merge(
        self,
        other: Self,
    ) -> Self {
        Self {
            cells: self.cells + other.cells,
            full_screen: self.full_screen || other.full_screen,
        }
    }
}

// =============================================================================
// Digit Fields
// =============================================================================

/// Where and how a two-digit value is drawn.
#[derive(Clone, Copy)]
struct DigitField {
    anchor: Point,
    font: &'static MonoFont<'static>,
    erase: Rgb565,
    color: Rgb565,
}

impl DigitField {
    /// Normal-layout field of `metric` showing `value`.
    fn metric(
        metric: Metric,
        value: i32,
    ) -> Option<Self> {
        metric.anchor().map(|anchor| Self {
            anchor,
            font: metric.font(),
            erase: BACKGROUND_COLOR,
            color: metric.color(value),
        })
    }

    /// Safety margin percentage on the alert background.
    const fn alert_percentage() -> Self {
        Self {
            anchor: ALERT_PERCENT_ANCHOR,
            font: ALERT_VALUE_FONT,
            erase: ALERT_COLOR,
            color: TEXT_COLOR,
        }
    }
}

// =============================================================================
// Render Engine
// =============================================================================

/// Owns the display surface and the alert-mode state.
///
/// The engine keeps no copy of metric values: callers pass the previous value
/// explicitly, and full repaints read the [`MetricStore`] they are given.
pub struct RenderEngine<S> {
    surface: S,
    mode: DisplayMode,
}

impl<S> RenderEngine<S>
where
    S: Surface,
{
    /// Create an engine in normal mode. Nothing is drawn until
    /// [`clear_and_initialize`](Self::clear_and_initialize) is called.
    pub const fn new(surface: S) -> Self {
        Self {
            surface,
            mode: DisplayMode::Normal,
        }
    }

    #[inline]
    pub const fn mode(&self) -> DisplayMode { self.mode }

    #[inline]
    pub const fn surface(&self) -> &S { &self.surface }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S { &mut self.surface }

    pub fn into_surface(self) -> S { self.surface }

    /// Battery digits, colored by threshold band. No-op in alert mode.
    pub fn update_battery(
        &mut self,
        old: i32,
        new: i32,
    ) -> Redraw {
        self.update_metric(Metric::Battery, old, new)
    }

    /// Speed digits. No-op in alert mode.
    pub fn update_speed(
        &mut self,
        old: i32,
        new: i32,
    ) -> Redraw {
        self.update_metric(Metric::Speed, old, new)
    }

    /// Distance digits. No-op in alert mode.
    pub fn update_distance(
        &mut self,
        old: i32,
        new: i32,
    ) -> Redraw {
        self.update_metric(Metric::Distance, old, new)
    }

    /// Drive the mode state machine with a new safety margin reading.
    ///
    /// - Below the threshold: enter alert mode if needed, then show the percentage.
    /// - At or above the threshold while in alert: restore the normal layout,
    ///   repainting every metric from `store`.
    /// - Otherwise nothing is drawn; the margin is invisible in normal mode.
    pub fn update_safety_margin(
        &mut self,
        old: i32,
        new: i32,
        store: &MetricStore,
    ) -> Redraw {
        if is_alert_margin(new) {
            if self.mode.is_alert() {
                let cells = self.draw_digits(DigitField::alert_percentage(), old, new, false);
                return Redraw {
                    cells,
                    full_screen: false,
                };
            }

            info!("safety margin {}% below threshold, entering alert mode", new);
            self.mode = DisplayMode::Alert;
            self.show_full_screen_alert();
            // The fill wiped the cells, so every column is drawn; `old` is only the erase glyph.
            let cells = self.draw_digits(DigitField::alert_percentage(), old, new, true);
            draw_percent_sign(&mut self.surface);
            Redraw {
                cells,
                full_screen: true,
            }
        } else if self.mode.is_alert() {
            info!("safety margin {}% recovered, leaving alert mode", new);
            self.mode = DisplayMode::Normal;
            self.repaint_normal_layout(store)
        } else {
            Redraw::NONE
        }
    }

    /// Clear the screen, draw the labels and repaint every metric from `store`.
    ///
    /// Used once at boot after connectivity is established. Always leaves the
    /// engine in normal mode.
    pub fn clear_and_initialize(
        &mut self,
        store: &MetricStore,
    ) -> Redraw {
        self.mode = DisplayMode::Normal;
        self.repaint_normal_layout(store)
    }

    fn update_metric(
        &mut self,
        metric: Metric,
        old: i32,
        new: i32,
    ) -> Redraw {
        if self.mode.is_alert() {
            debug!("{:?} {} -> {} suppressed in alert mode", metric, old, new);
            return Redraw::NONE;
        }
        let Some(field) = DigitField::metric(metric, new) else {
            return Redraw::NONE;
        };
        Redraw {
            cells: self.draw_digits(field, old, new, false),
            full_screen: false,
        }
    }

    fn repaint_normal_layout(
        &mut self,
        store: &MetricStore,
    ) -> Redraw {
        self.surface.fill_screen(BACKGROUND_COLOR);
        draw_labels(&mut self.surface);

        let mut redraw = Redraw {
            cells: 0,
            full_screen: true,
        };
        for metric in [Metric::Battery, Metric::Speed, Metric::Distance] {
            let value = store.get(metric);
            if let Some(field) = DigitField::metric(metric, value) {
                redraw.cells += self.draw_digits(field, 0, value, true);
            }
        }
        redraw
    }

    fn show_full_screen_alert(&mut self) {
        self.surface.fill_screen(ALERT_COLOR);
        draw_alert_banner(&mut self.surface);
    }

    /// Erase-then-write each column whose digit changed (every column if `force`).
    ///
    /// Returns the number of cells drawn.
    fn draw_digits(
        &mut self,
        field: DigitField,
        old: i32,
        new: i32,
        force: bool,
    ) -> u8 {
        let old = TwoDigits::new(old);
        let new = TwoDigits::new(new);
        let cell_width = self.surface.glyph_size(field.font).width as i32;

        let mut drawn = 0;
        for column in 0..TwoDigits::WIDTH {
            if !force && old.digit(column) == new.digit(column) {
                continue;
            }
            let at = Point::new(field.anchor.x + column as i32 * cell_width, field.anchor.y);
            self.surface.draw_text(old.glyph(column), at, field.font, field.erase);
            self.surface.draw_text(new.glyph(column), at, field.font, field.color);
            drawn += 1;
        }
        drawn
    }
}

// =============================================================================
// Unit Tests (run on host with: cargo test -p minidash-common)
// =============================================================================
