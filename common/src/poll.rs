//! Fixed-cadence poll loop with bounded reconnects.
//!
//! One iteration ([`PollLoop::step`]):
//!
//! - Link up: run one fetch cycle through the [`Dashboard`].
//! - Link down: make a bounded round of association attempts with capped
//!   exponential backoff between them. No fetch happens in the same iteration.
//!
//! [`PollLoop::tick`] adds the fixed cadence delay after an iteration and
//! [`PollLoop::run`] repeats it forever. A fetch failure of any kind is logged, counted and forgotten;
//! the next iteration simply tries again.
//!
//! # Boot
//!
//! [`PollLoop::boot`] shows the status screens, keeps making reconnect rounds
//! until the link is associated, then clears the panel and paints the
//! dashboard layout with the stored values.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::network::POLL_INTERVAL_MS;
use crate::ingest::{CycleReport, Dashboard, FetchError};
use crate::net::{Link, Transport};
use crate::screens::{show_connect_progress, show_connected, show_connecting};
use crate::surface::Surface;

/// Pause after "Connected :)" before the dashboard replaces it.
const CONNECTED_PAUSE_MS: u32 = 500;

// =============================================================================
// Retry Policy
// =============================================================================

/// Bounds on one round of reconnect attempts.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    /// Association attempts per round (at least one is always made).
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay_ms: u32,
    /// Upper bound for any single delay.
    pub max_delay_ms: u32,
}

impl RetryPolicy {
    pub const DEFAULT: Self = Self {
        max_attempts: 5,
        base_delay_ms: 500,
        max_delay_ms: 8_000,
    };

    /// Delay after failed attempt number `attempt` (0-based): doubles each
    /// time, capped at `max_delay_ms`.
    pub const fn delay_for(
        &self,
        attempt: u32,
    ) -> u32 {
        let shift = if attempt > 31 { 31 } else { attempt };
        let delay = self.base_delay_ms.saturating_mul(1 << shift);
        if delay > self.max_delay_ms { self.max_delay_ms } else { delay }
    }

    /// Attempts actually made per round.
    #[inline]
    pub const fn attempts(&self) -> u32 { if self.max_attempts == 0 { 1 } else { self.max_attempts } }
}

impl Default for RetryPolicy {
    fn default() -> Self { Self::DEFAULT }
}

// =============================================================================
// Statistics
// =============================================================================

/// Running counters since boot.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollStats {
    /// Iterations of [`PollLoop::step`].
    pub cycles: u32,
    /// Fetch cycles that decoded and applied a payload.
    pub fetches: u32,
    /// Fetch cycles lost to the transport (or to a missing gateway).
    pub transport_failures: u32,
    /// Fetch cycles lost to a malformed body.
    pub decode_failures: u32,
    /// Individual association attempts.
    pub reconnect_attempts: u32,
    /// Reconnect rounds that exhausted their attempts.
    pub reconnect_give_ups: u32,
}

impl PollStats {
    fn record_failure(
        &mut self,
        err: FetchError,
    ) {
        match err {
            FetchError::Decode => self.decode_failures += 1,
            FetchError::NoGateway | FetchError::Transport(_) => self.transport_failures += 1,
        }
    }
}

/// What one iteration did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    /// A payload was fetched and applied.
    Fetched(CycleReport),
    /// The fetch cycle was abandoned; nothing was drawn.
    FetchFailed(FetchError),
    /// The link was down and came back after this many attempts.
    Reconnected(u32),
    /// The link was down and the reconnect round gave up.
    LinkDown,
}

// =============================================================================
// Poll Loop
// =============================================================================

/// Drives the [`Dashboard`] from a [`Link`] and a [`Transport`].
pub struct PollLoop<L, T, S, D> {
    link: L,
    transport: T,
    dashboard: Dashboard<S>,
    delay: D,
    policy: RetryPolicy,
    interval_ms: u32,
    stats: PollStats,
}

impl<L, T, S, D> PollLoop<L, T, S, D>
where
    L: Link,
    T: Transport,
    S: Surface,
    D: DelayNs,
{
    pub fn new(
        link: L,
        transport: T,
        dashboard: Dashboard<S>,
        delay: D,
    ) -> Self {
        Self {
            link,
            transport,
            dashboard,
            delay,
            policy: RetryPolicy::DEFAULT,
            interval_ms: POLL_INTERVAL_MS,
            stats: PollStats::default(),
        }
    }

    #[must_use]
    pub fn with_policy(
        mut self,
        policy: RetryPolicy,
    ) -> Self {
        self.policy = policy;
        self
    }

    /// Override the delay between iterations.
    #[must_use]
    pub fn with_interval_ms(
        mut self,
        interval_ms: u32,
    ) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    #[inline]
    pub const fn stats(&self) -> &PollStats { &self.stats }

    #[inline]
    pub const fn policy(&self) -> &RetryPolicy { &self.policy }

    #[inline]
    pub const fn dashboard(&self) -> &Dashboard<S> { &self.dashboard }

    #[inline]
    pub fn dashboard_mut(&mut self) -> &mut Dashboard<S> { &mut self.dashboard }

    #[inline]
    pub const fn link(&self) -> &L { &self.link }

    #[inline]
    pub fn link_mut(&mut self) -> &mut L { &mut self.link }

    #[inline]
    pub fn transport_mut(&mut self) -> &mut T { &mut self.transport }

    /// Status screens, reconnect rounds until associated, then the dashboard.
    ///
    /// Returns the number of failed rounds before the link came up.
    pub fn boot(&mut self) -> u32 {
        show_connecting(self.dashboard.engine_mut().surface_mut());

        let mut failed_rounds = 0;
        while !self.link.is_connected() {
            if self.reconnect().is_ok() {
                break;
            }
            failed_rounds += 1;
            show_connect_progress(self.dashboard.engine_mut().surface_mut(), failed_rounds);
            self.delay.delay_ms(self.policy.max_delay_ms);
        }

        info!("link up after {} failed rounds, gateway {:?}", failed_rounds, self.link.gateway());
        show_connected(self.dashboard.engine_mut().surface_mut());
        self.delay.delay_ms(CONNECTED_PAUSE_MS);
        self.dashboard.clear_and_initialize();
        failed_rounds
    }

    /// One bounded round of association attempts.
    ///
    /// Returns the number of attempts made, as `Ok` if the link came up.
    pub fn reconnect(&mut self) -> Result<u32, u32> {
        let attempts = self.policy.attempts();
        for attempt in 0..attempts {
            self.stats.reconnect_attempts += 1;
            match self.link.connect() {
                Ok(()) if self.link.is_connected() => {
                    debug!("associated on attempt {}", attempt + 1);
                    return Ok(attempt + 1);
                }
                Ok(()) => warn!("connect returned but link still down"),
                Err(err) => warn!("connect attempt {}/{} failed: {}", attempt + 1, attempts, err),
            }
            if attempt + 1 < attempts {
                self.delay.delay_ms(self.policy.delay_for(attempt));
            }
        }
        self.stats.reconnect_give_ups += 1;
        warn!("giving up after {} attempts, retrying next cycle", attempts);
        Err(attempts)
    }

    /// One iteration: reconnect if the link is down, otherwise fetch.
    pub fn step(&mut self) -> StepOutcome {
        self.stats.cycles += 1;

        if !self.link.is_connected() {
            warn!("link lost, reconnecting");
            return match self.reconnect() {
                Ok(attempts) => StepOutcome::Reconnected(attempts),
                Err(_) => StepOutcome::LinkDown,
            };
        }

        let gateway = self.link.gateway();
        match self.dashboard.fetch_values(&mut self.transport, gateway) {
            Ok(report) => {
                self.stats.fetches += 1;
                StepOutcome::Fetched(report)
            }
            Err(err) => {
                warn!("fetch cycle abandoned: {}", err);
                self.stats.record_failure(err);
                StepOutcome::FetchFailed(err)
            }
        }
    }

    /// Wait out the cadence interval.
    #[inline]
    pub fn pause(&mut self) { self.delay.delay_ms(self.interval_ms); }

    /// One iteration followed by the cadence delay.
    pub fn tick(&mut self) -> StepOutcome {
        let outcome = self.step();
        self.pause();
        outcome
    }

    /// Run `cycles` iterations with the cadence delay after each.
    pub fn run_cycles(
        &mut self,
        cycles: u32,
    ) {
        for _ in 0..cycles {
            self.tick();
        }
    }

    /// Run forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
        }
    }
}

// =============================================================================
// Unit Tests (run on host with: cargo test -p minidash-common)
// =============================================================================
