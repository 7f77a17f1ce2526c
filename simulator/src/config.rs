//! Command-line and environment configuration.
//!
//! Every option can also come from a `MINIDASH_*` environment variable;
//! the command line wins when both are set.

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use minidash_common::RetryPolicy;
use minidash_common::config::{API_PORT, POLL_INTERVAL_MS};

#[derive(Parser, Debug, Clone)]
#[command(name = "minidash-sim")]
#[command(author, version, about = "Poll the telemetry API and render the 160x80 mini dashboard", long_about = None)]
pub struct Config {
    /// Gateway running the telemetry API (default: the host's default route)
    #[arg(short, long, env = "MINIDASH_GATEWAY", value_name = "IPV4")]
    pub gateway: Option<Ipv4Addr>,

    /// API port on the gateway
    #[arg(short, long, env = "MINIDASH_PORT", default_value_t = API_PORT)]
    pub port: u16,

    /// Delay between poll iterations in milliseconds
    #[arg(short, long, env = "MINIDASH_INTERVAL_MS", default_value_t = POLL_INTERVAL_MS)]
    pub interval_ms: u32,

    /// HTTP connect/read timeout in milliseconds
    #[arg(long, env = "MINIDASH_TIMEOUT_MS", default_value_t = 2_000)]
    pub timeout_ms: u64,

    /// Association attempts per reconnect round
    #[arg(long, env = "MINIDASH_RETRY_ATTEMPTS", default_value_t = RetryPolicy::DEFAULT.max_attempts)]
    pub retry_attempts: u32,

    /// First backoff delay between attempts in milliseconds
    #[arg(long, env = "MINIDASH_RETRY_BASE_MS", default_value_t = RetryPolicy::DEFAULT.base_delay_ms)]
    pub retry_base_ms: u32,

    /// Backoff cap in milliseconds
    #[arg(long, env = "MINIDASH_RETRY_MAX_MS", default_value_t = RetryPolicy::DEFAULT.max_delay_ms)]
    pub retry_max_ms: u32,

    /// Stop after this many poll iterations (default: run until interrupted)
    #[arg(short = 'n', long, env = "MINIDASH_CYCLES")]
    pub cycles: Option<u32>,

    /// Write the final screen to this file as a PNG image
    #[arg(long, env = "MINIDASH_SNAPSHOT", value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Show a live preview window (requires the `window` feature)
    #[arg(short, long)]
    pub window: bool,

    /// Pixel scale of the preview window and the snapshot
    #[arg(long, default_value_t = 4)]
    pub scale: u32,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            bail!("--timeout-ms must be greater than zero");
        }
        if self.retry_base_ms > self.retry_max_ms {
            bail!(
                "--retry-base-ms ({}) exceeds --retry-max-ms ({})",
                self.retry_base_ms,
                self.retry_max_ms
            );
        }
        if self.window && !cfg!(feature = "window") {
            bail!("--window needs a build with `--features window`");
        }
        if self.scale == 0 {
            bail!("--scale must be at least 1");
        }
        Ok(())
    }

    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_attempts,
            base_delay_ms: self.retry_base_ms,
            max_delay_ms: self.retry_max_ms,
        }
    }

    pub const fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_ms) }
}
