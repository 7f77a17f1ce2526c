//! Application configuration.
//!
//! - `layout`: Panel dimensions and the fixed anchor of every drawn element
//! - `network`: Endpoint port/query, response buffer and poll cadence

pub mod layout;
pub mod network;

// Re-export the most used constants at config level for convenience
pub use layout::{DIVIDER_X, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use network::{API_PORT, API_QUERY, BODY_CAPACITY, POLL_INTERVAL_MS, URL_CAPACITY};
