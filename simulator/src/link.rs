//! Host connectivity: the default gateway stands in for the access point.
//!
//! On the board the gateway is the telemetry hub the dashboard associates
//! with. On a desktop the link is "up" when a default route exists, and the
//! API is expected on that route's gateway unless one is given explicitly.

use std::fs;
use std::io;
use std::net::Ipv4Addr;

use log::{debug, info};
use minidash_common::{Link, LinkError};
use thiserror::Error;

const ROUTE_TABLE: &str = "/proc/net/route";

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("cannot read /proc/net/route: {0}")]
    Read(#[from] io::Error),
    #[error("no default route")]
    NoDefaultRoute,
}

/// Gateway of the first default route in a `/proc/net/route` table.
///
/// Addresses in the table are little-endian hex.
pub fn parse_default_gateway(table: &str) -> Option<Ipv4Addr> {
    table.lines().skip(1).find_map(|line| {
        let mut cols = line.split_whitespace();
        let _iface = cols.next()?;
        let destination = cols.next()?;
        let gateway = cols.next()?;
        if destination != "00000000" {
            return None;
        }
        let raw = u32::from_str_radix(gateway, 16).ok()?;
        (raw != 0).then(|| Ipv4Addr::from(raw.to_le_bytes()))
    })
}

fn default_gateway() -> Result<Ipv4Addr, RouteError> {
    let table = fs::read_to_string(ROUTE_TABLE)?;
    parse_default_gateway(&table).ok_or(RouteError::NoDefaultRoute)
}

/// [`Link`] backed by the host routing table or a fixed gateway.
pub struct HostLink {
    fixed: Option<Ipv4Addr>,
    gateway: Option<Ipv4Addr>,
}

impl HostLink {
    /// With `fixed` set the route table is never consulted.
    pub const fn new(fixed: Option<Ipv4Addr>) -> Self {
        Self {
            fixed,
            gateway: None,
        }
    }

    fn resolve(&self) -> Result<Ipv4Addr, RouteError> {
        match self.fixed {
            Some(addr) => Ok(addr),
            None => default_gateway(),
        }
    }
}

impl Link for HostLink {
    fn connect(&mut self) -> Result<(), LinkError> {
        match self.resolve() {
            Ok(addr) => {
                info!("using gateway {addr}");
                self.gateway = Some(addr);
                Ok(())
            }
            Err(err) => {
                debug!("{err}");
                self.gateway = None;
                Err(LinkError::NoAddress)
            }
        }
    }

    fn is_connected(&mut self) -> bool {
        if self.fixed.is_none() && self.gateway.is_some() {
            // Re-check so a dropped route shows up as a lost link
            self.gateway = default_gateway().ok();
        }
        self.gateway.is_some()
    }

    fn gateway(&self) -> Option<Ipv4Addr> { self.gateway }
}
