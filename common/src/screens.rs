//! Boot-time status screens.
//!
//! Shown before the dashboard layout exists, while the link is coming up:
//!
//! 1. "Connecting." on a cleared screen, one dot appended per failed round
//! 2. "Connected :)" on a fresh screen once the link is associated
//!
//! After that the poll loop hands over to
//! [`RenderEngine::clear_and_initialize`](crate::render::RenderEngine::clear_and_initialize).

use heapless::String;

use crate::colors::{BACKGROUND_COLOR, TEXT_COLOR};
use crate::config::layout::{BOOT_DONE_POS, BOOT_STATUS_POS};
use crate::styles::BANNER_FONT;
use crate::surface::Surface;

const CONNECTING: &str = "Connecting.";
const CONNECTED: &str = "Connected :)";

/// Dots stop growing here so the line never runs off the panel.
const MAX_EXTRA_DOTS: usize = 3;

/// Clear the screen and show the connecting message.
pub fn show_connecting<S>(surface: &mut S)
where
    S: Surface + ?Sized,
{
    surface.fill_screen(BACKGROUND_COLOR);
    surface.draw_text(CONNECTING, BOOT_STATUS_POS, BANNER_FONT, TEXT_COLOR);
}

/// Redraw the connecting line with one extra dot per failed round.
pub fn show_connect_progress<S>(
    surface: &mut S,
    failed_rounds: u32,
) where
    S: Surface + ?Sized,
{
    let dots = (failed_rounds as usize).min(MAX_EXTRA_DOTS);
    let mut line: String<16> = String::new();
    let _ = line.push_str(CONNECTING);
    for _ in 0..dots {
        let _ = line.push('.');
    }
    surface.draw_text(&line, BOOT_STATUS_POS, BANNER_FONT, TEXT_COLOR);
}

/// Clear the screen and show the connected message.
pub fn show_connected<S>(surface: &mut S)
where
    S: Surface + ?Sized,
{
    surface.fill_screen(BACKGROUND_COLOR);
    surface.draw_text(CONNECTED, BOOT_DONE_POS, BANNER_FONT, TEXT_COLOR);
}
