//! Desktop host for the telemetry mini dashboard.
//!
//! Wires the core to host collaborators: the default route (or `--gateway`)
//! as the link, a `reqwest` client as the transport, and a headless 160x80
//! simulator display as the panel. With the `window` feature the panel is
//! shown in an SDL2 window after every poll iteration.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod config;
mod http;
mod link;
mod panel;
mod timing;
#[cfg(feature = "window")]
mod window;

use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use minidash_common::{Dashboard, GraphicsSurface, PollLoop, StepOutcome};

use crate::config::Config;
use crate::http::HttpTransport;
use crate::link::HostLink;
use crate::panel::Panel;
use crate::timing::StdDelay;

type HostLoop = PollLoop<HostLink, HttpTransport, GraphicsSurface<Panel>, StdDelay>;

fn screen(poll: &HostLoop) -> &Panel { poll.dashboard().engine().surface().target() }

fn main() -> Result<()> {
    let config = Config::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    config.validate()?;

    info!("minidash simulator v{}", env!("CARGO_PKG_VERSION"));
    debug!("{config:?}");

    let dashboard = Dashboard::new(GraphicsSurface::new(panel::new_panel())).with_port(config.port);
    let mut poll: HostLoop = PollLoop::new(
        HostLink::new(config.gateway),
        HttpTransport::new(config.timeout())?,
        dashboard,
        StdDelay,
    )
    .with_policy(config.retry_policy())
    .with_interval_ms(config.interval_ms);

    #[cfg(feature = "window")]
    let mut preview = config.window.then(|| window::Preview::new(config.scale));

    poll.boot();

    let mut cycle: u32 = 0;
    loop {
        if config.cycles.is_some_and(|limit| cycle >= limit) {
            break;
        }
        let outcome = poll.step();
        cycle += 1;
        match outcome {
            StepOutcome::Fetched(report) if report.any_changed() => {
                let store = poll.dashboard().store();
                info!(
                    "cycle {cycle}: battery {}% speed {} mph margin {}% distance {} mi ({:?})",
                    store.battery(),
                    store.speed(),
                    store.safety_margin(),
                    store.distance(),
                    poll.dashboard().mode()
                );
            }
            other => debug!("cycle {cycle}: {other:?}"),
        }

        #[cfg(feature = "window")]
        if let Some(preview) = preview.as_mut() {
            if !preview.present(screen(&poll)) {
                info!("preview window closed");
                break;
            }
        }

        poll.pause();
    }

    let stats = poll.stats();
    info!(
        "{} cycles: {} fetched, {} transport failures, {} decode failures, {} reconnect attempts, {} give-ups",
        stats.cycles,
        stats.fetches,
        stats.transport_failures,
        stats.decode_failures,
        stats.reconnect_attempts,
        stats.reconnect_give_ups
    );

    if let Some(path) = &config.snapshot {
        panel::save_png(screen(&poll), path, config.scale)?;
        info!("screen saved to {}", path.display());
    }

    Ok(())
}
