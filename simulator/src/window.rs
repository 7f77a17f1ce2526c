//! Live SDL2 preview of the panel.

use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorEvent, Window};

use crate::panel::Panel;

pub struct Preview {
    window: Window,
}

impl Preview {
    pub fn new(scale: u32) -> Self {
        let output_settings = OutputSettingsBuilder::new().scale(scale).build();
        Self {
            window: Window::new("Telemetry Mini Dashboard", &output_settings),
        }
    }

    /// Show `panel`. Returns `false` once the window was closed.
    pub fn present(
        &mut self,
        panel: &Panel,
    ) -> bool {
        self.window.update(panel);
        !self.window.events().any(|ev| matches!(ev, SimulatorEvent::Quit))
    }
}
