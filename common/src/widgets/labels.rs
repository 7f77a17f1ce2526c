//! Normal layout labels and the divider line.

use crate::colors::{DIVIDER_COLOR, TEXT_COLOR};
use crate::config::layout::{
    BATTERY_LABEL_POS,
    DISTANCE_LABEL_POS,
    DIVIDER_X,
    SCREEN_HEIGHT,
    SPEED_LABEL_POS,
};
use crate::styles::LABEL_FONT;
use crate::surface::Surface;

const LABELS: [(&str, embedded_graphics::prelude::Point); 3] = [
    ("BAT%", BATTERY_LABEL_POS),
    ("DIS", DISTANCE_LABEL_POS),
    ("MPH", SPEED_LABEL_POS),
];

/// Draw the three metric tags and the vertical divider.
pub fn draw_labels<S>(surface: &mut S)
where
    S: Surface + ?Sized,
{
    for (text, pos) in LABELS {
        surface.draw_text(text, pos, LABEL_FONT, TEXT_COLOR);
    }
    surface.draw_vline(DIVIDER_X, 0, SCREEN_HEIGHT as i32 - 1, DIVIDER_COLOR);
}
