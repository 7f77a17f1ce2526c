//! Connectivity and HTTP transport collaborators.
//!
//! The dashboard does not own a network stack. A board (or the simulator)
//! provides a [`Link`] for association state and the gateway address, and a
//! [`Transport`] that performs a blocking GET into a caller-owned buffer.

use core::fmt::{self, Write as _};
use core::net::Ipv4Addr;

use heapless::String;

use crate::config::network::{API_QUERY, URL_CAPACITY};

// =============================================================================
// Errors
// =============================================================================

/// Why a single association attempt failed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// The access point rejected or did not answer the association.
    ConnectFailed,
    /// Associated, but no address/gateway was obtained in time.
    NoAddress,
}

impl fmt::Display for LinkError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::ConnectFailed => f.write_str("association failed"),
            Self::NoAddress => f.write_str("no address assigned"),
        }
    }
}

/// Why a GET did not produce a usable body.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// TCP connection could not be opened.
    Connect,
    /// Server answered with a non-success status code.
    Status(u16),
    /// Read or write failed mid-request, or the response was malformed.
    Io,
    /// The body did not fit the receive buffer.
    Overflow,
    /// The transport's own timeout elapsed.
    Timeout,
}

impl fmt::Display for TransportError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Connect => f.write_str("connection refused or unreachable"),
            Self::Status(code) => write!(f, "HTTP status {code}"),
            Self::Io => f.write_str("I/O error"),
            Self::Overflow => f.write_str("response body too large"),
            Self::Timeout => f.write_str("timed out"),
        }
    }
}

// =============================================================================
// Collaborator Traits
// =============================================================================

/// Network association and address discovery.
pub trait Link {
    /// Make one association attempt. Blocks for at most the link's own timeout.
    fn connect(&mut self) -> Result<(), LinkError>;

    /// Whether the link is currently associated.
    fn is_connected(&mut self) -> bool;

    /// Gateway address of the active connection, if any.
    fn gateway(&self) -> Option<Ipv4Addr>;
}

/// Blocking HTTP GET.
pub trait Transport {
    /// Fetch `url` and copy the response body into `body`.
    ///
    /// Returns the body length. Any non-success status is an error.
    fn get(
        &mut self,
        url: &str,
        body: &mut [u8],
    ) -> Result<usize, TransportError>;
}

// =============================================================================
// Endpoint URL
// =============================================================================

/// Request URL for the telemetry endpoint on `gateway:port`.
pub fn endpoint_url(
    gateway: Ipv4Addr,
    port: u16,
) -> String<URL_CAPACITY> {
    let mut url: String<URL_CAPACITY> = String::new();
    // Capacity is checked at compile time in config::network
    let _ = write!(url, "http://{gateway}:{port}{API_QUERY}");
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::network::API_PORT;

    #[test]
    fn test_endpoint_url() {
        let url = endpoint_url(Ipv4Addr::new(192, 168, 4, 1), API_PORT);
        assert_eq!(
            url.as_str(),
            "http://192.168.4.1:8080/api/values?attrs=0&filter=%28vsp%7Cvba%7Cvsmg%7Cvdi%29"
        );
    }

    #[test]
    fn test_endpoint_url_longest_address_fits() {
        let url = endpoint_url(Ipv4Addr::new(255, 255, 255, 255), u16::MAX);
        assert!(url.ends_with("vdi%29"), "URL must not be truncated: {url}");
    }

    #[test]
    fn test_transport_error_display() {
        let mut s: String<32> = String::new();
        write!(s, "{}", TransportError::Status(404)).unwrap();
        assert_eq!(s.as_str(), "HTTP status 404");
    }
}
