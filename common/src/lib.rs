//! Core logic for the 160x80 telemetry mini dashboard.
//!
//! This crate contains everything between the network and the panel that does
//! not depend on a particular board, so it runs on the microcontroller and on
//! the host test harness alike:
//!
//! - [`colors`]: RGB565 color constants for the panel
//! - [`config`]: Layout and network configuration constants
//! - [`thresholds`]: Alert threshold, battery color bands and unit conversion
//! - [`styles`]: Fonts backing each glyph size
//! - [`surface`]: The display collaborator seam and its `embedded-graphics` adapter
//! - [`metrics`]: Metric identifiers, two-digit formatting and the [`MetricStore`]
//! - [`render`]: The render state machine ([`RenderEngine`])
//! - [`widgets`]: Static labels and the alert banner
//! - [`screens`]: Boot-time status screens
//! - [`net`]: Connectivity and HTTP transport collaborator traits
//! - [`ingest`]: Payload decoding and the per-field diff pipeline ([`Dashboard`])
//! - [`poll`]: The fixed-cadence poll loop with bounded reconnects
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` outside of tests and never allocates. Fixed-capacity
//! buffers come from `heapless`, JSON decoding from `serde-json-core`.
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test -p minidash-common
//! ```

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod colors;
pub mod config;
pub mod ingest;
pub mod metrics;
pub mod net;
pub mod poll;
pub mod render;
pub mod screens;
pub mod styles;
pub mod surface;
pub mod thresholds;
pub mod widgets;

// Re-export commonly used items
pub use ingest::{CycleReport, Dashboard, FetchError};
pub use metrics::{Metric, MetricStore, TwoDigits};
pub use net::{Link, LinkError, Transport, TransportError};
pub use poll::{PollLoop, PollStats, RetryPolicy, StepOutcome};
pub use render::{DisplayMode, Redraw, RenderEngine};
pub use surface::{GraphicsSurface, Surface};
