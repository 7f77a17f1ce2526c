//! Alert layout banner.

use embedded_graphics::prelude::Point;

use crate::colors::TEXT_COLOR;
use crate::config::layout::{ALERT_BANNER_POS, ALERT_PERCENT_ANCHOR};
use crate::metrics::TwoDigits;
use crate::styles::{ALERT_VALUE_FONT, BANNER_FONT};
use crate::surface::Surface;

/// Draw the "SAFETY MARGIN" banner on top of the alert fill.
pub fn draw_alert_banner<S>(surface: &mut S)
where
    S: Surface + ?Sized,
{
    surface.draw_text("SAFETY MARGIN", ALERT_BANNER_POS, BANNER_FONT, TEXT_COLOR);
}

/// Draw the `%` sign in the cell right after the two percentage digits.
pub fn draw_percent_sign<S>(surface: &mut S)
where
    S: Surface + ?Sized,
{
    let cell = surface.glyph_size(ALERT_VALUE_FONT).width as i32;
    let pos = Point::new(ALERT_PERCENT_ANCHOR.x + TwoDigits::WIDTH as i32 * cell, ALERT_PERCENT_ANCHOR.y);
    surface.draw_text("%", pos, ALERT_VALUE_FONT, TEXT_COLOR);
}
