//! # Endpoint
//!
//! Parses the `host:port/service/method` coordinate that identifies the RPC to invoke.
//!
//! The pattern is anchored at the start of the input only, so anything following the
//! method segment is ignored (`localhost:80/Svc/Do/extra` targets `Svc/Do`).
use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

static ENDPOINT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Za-z_]+):([0-9]+)/([0-9A-Za-z_]+)/([0-9A-Za-z_]+)")
        .expect("endpoint pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("Empty endpoint")]
    Empty,
    #[error("Invalid endpoint '{0}'. Expected 'host:port/service/method'")]
    Invalid(String),
    #[error("Invalid port '{0}'. Expected a number between 0 and 65535")]
    InvalidPort(String),
}

/// The coordinates of a single RPC: where to dial and what to call once connected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
    service: String,
    method: String,
}

impl Endpoint {
    /// Parses `raw` into an [`Endpoint`].
    ///
    /// Either all four coordinates are extracted or an error is returned.
    pub fn parse(raw: &str) -> Result<Self, EndpointError> {
        if raw.is_empty() {
            return Err(EndpointError::Empty);
        }

        let captures = ENDPOINT_PATTERN
            .captures(raw)
            .ok_or_else(|| EndpointError::Invalid(raw.to_string()))?;

        let port = captures[2]
            .parse::<u16>()
            .map_err(|_| EndpointError::InvalidPort(captures[2].to_string()))?;

        Ok(Self {
            host: captures[1].to_string(),
            port,
            service: captures[3].to_string(),
            method: captures[4].to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The unqualified service name. The package is taken from the proto file it resolves in.
    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Dial target in the form `host:port`.
    pub fn host_and_port(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}/{}/{}",
            self.host, self.port, self.service, self.method
        )
    }
}
