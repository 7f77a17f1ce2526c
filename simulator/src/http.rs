//! Blocking HTTP transport on `reqwest`.
//!
//! One client is built up front with the connect and total request timeouts;
//! each fetch is a plain GET whose body must fit the caller's buffer.

use std::io::{self, Read};
use std::time::Duration;

use log::{debug, warn};
use minidash_common::{Transport, TransportError};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(u16),
    #[error("body exceeds buffer of {capacity} bytes")]
    Overflow { capacity: usize },
    #[error("reading body failed: {0}")]
    Read(#[from] io::Error),
}

impl From<&HttpError> for TransportError {
    fn from(err: &HttpError) -> Self {
        match err {
            HttpError::Request(err) if err.is_timeout() => Self::Timeout,
            HttpError::Request(err) if err.is_connect() => Self::Connect,
            HttpError::Request(_) => Self::Io,
            HttpError::Status(code) => Self::Status(*code),
            HttpError::Overflow { .. } => Self::Overflow,
            HttpError::Read(err) if err.kind() == io::ErrorKind::TimedOut => Self::Timeout,
            HttpError::Read(_) => Self::Io,
        }
    }
}

/// [`Transport`] for the host network stack.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// `timeout` bounds both the connect and the whole request.
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` and copy the body into `body`; returns the body length.
    pub fn fetch(
        &self,
        url: &str,
        body: &mut [u8],
    ) -> Result<usize, HttpError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()?;

        let status = response.status();
        debug!("GET {url} -> {status}");
        if !status.is_success() {
            return Err(HttpError::Status(status.as_u16()));
        }

        // One byte past the buffer tells an oversized body from one that fits exactly
        let mut received = Vec::with_capacity(body.len());
        response
            .take(body.len() as u64 + 1)
            .read_to_end(&mut received)?;
        if received.len() > body.len() {
            return Err(HttpError::Overflow { capacity: body.len() });
        }

        body[..received.len()].copy_from_slice(&received);
        Ok(received.len())
    }
}

impl Transport for HttpTransport {
    fn get(
        &mut self,
        url: &str,
        body: &mut [u8],
    ) -> Result<usize, TransportError> {
        self.fetch(url, body).map_err(|err| {
            warn!("{err}");
            TransportError::from(&err)
        })
    }
}
