//! Host delay provider.
//!
//! The poll loop waits through `embedded_hal::delay::DelayNs`; on the host that
//! is a plain thread sleep.

use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;

/// Blocking delay backed by `std::thread::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(
        &mut self,
        ns: u32,
    ) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(
        &mut self,
        ms: u32,
    ) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
