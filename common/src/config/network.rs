//! Network endpoint and polling configuration.

/// TCP port of the telemetry API on the gateway.
pub const API_PORT: u16 = 8080;

/// Path and query selecting the four field codes; parentheses and the pipe are
/// percent-encoded because the filter is a pattern.
pub const API_QUERY: &str = "/api/values?attrs=0&filter=%28vsp%7Cvba%7Cvsmg%7Cvdi%29";

/// Capacity of the rendered request URL.
pub const URL_CAPACITY: usize = 96;

/// Largest response body accepted; anything longer aborts the cycle.
pub const BODY_CAPACITY: usize = 512;

/// Fixed delay between poll iterations.
pub const POLL_INTERVAL_MS: u32 = 200;

// "http://" + "255.255.255.255" + ":65535" + query must fit
const _: () = assert!(7 + 15 + 6 + API_QUERY.len() <= URL_CAPACITY);
