//! Headless 160x80 panel.
//!
//! A `SimulatorDisplay` works without SDL2: the dashboard draws into it
//! directly, the preview window shows it as is and snapshots go to PNG.

use std::path::Path;

use anyhow::{Context, Result};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};
use minidash_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub type Panel = SimulatorDisplay<Rgb565>;

/// Panel-sized display, all black.
pub fn new_panel() -> Panel { SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)) }

/// Write the panel to `path` as a PNG, each pixel `scale` times larger.
pub fn save_png(
    panel: &Panel,
    path: &Path,
    scale: u32,
) -> Result<()> {
    let settings = OutputSettingsBuilder::new().scale(scale).build();
    panel
        .to_rgb_output_image(&settings)
        .save_png(path)
        .with_context(|| format!("writing {}", path.display()))
}

/// Number of pixels with exactly `color`.
#[cfg(test)]
pub fn count(
    panel: &Panel,
    color: Rgb565,
) -> usize {
    panel
        .bounding_box()
        .points()
        .filter(|p| panel.get_pixel(*p) == color)
        .count()
}

#[cfg(test)]
mod tests {
    use minidash_common::colors::{BLACK, RED};

    use super::*;

    #[test]
    fn test_new_panel_is_black() {
        let panel = new_panel();
        assert_eq!(panel.size(), Size::new(160, 80));
        assert_eq!(count(&panel, BLACK), 160 * 80);
    }

    #[test]
    fn test_snapshot_is_scaled_png() {
        let mut panel = new_panel();
        panel.clear(RED).ok();
        let path = std::env::temp_dir().join(format!("minidash-snapshot-{}.png", std::process::id()));

        save_png(&panel, &path, 2).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        // IHDR width and height, big-endian
        assert_eq!(&bytes[16..24], &[0, 0, 1, 64, 0, 0, 0, 160]);
    }
}
