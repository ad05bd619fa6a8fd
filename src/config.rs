//! Endpoint configuration
//!
//! Describes one management-port address with sensible defaults.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AdminError;

/// Default management port (the data-serving HTTP port is separate)
pub const DEFAULT_ADMIN_PORT: u16 = 6082;

/// Default connect/read timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// One management-port address
///
/// Immutable once a connection has been established against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Hostname or IP address
    pub host: String,

    /// Management port
    pub port: u16,

    /// Connect and read timeout
    pub timeout: Duration,
}

impl Endpoint {
    /// Create an endpoint with the default timeout
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a builder for an endpoint
    pub fn builder(host: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder {
            endpoint: Endpoint::new(host, DEFAULT_ADMIN_PORT),
        }
    }

    /// Socket address string suitable for `TcpStream::connect`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = AdminError;

    /// Parse `"host:port"`; a bare `"host"` gets the default admin port.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AdminError::Config("empty endpoint address".to_string()));
        }
        match s.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    AdminError::Config(format!("invalid port in endpoint `{s}`"))
                })?;
                if host.is_empty() {
                    return Err(AdminError::Config(format!(
                        "missing host in endpoint `{s}`"
                    )));
                }
                Ok(Endpoint::new(host, port))
            }
            None => Ok(Endpoint::new(s, DEFAULT_ADMIN_PORT)),
        }
    }
}

/// Builder for Endpoint
pub struct EndpointBuilder {
    endpoint: Endpoint,
}

impl EndpointBuilder {
    /// Set the management port
    pub fn port(mut self, port: u16) -> Self {
        self.endpoint.port = port;
        self
    }

    /// Set the connect/read timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.endpoint.timeout = timeout;
        self
    }

    pub fn build(self) -> Endpoint {
        self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_port() {
        let ep: Endpoint = "cache1.example.com:6082".parse().unwrap();
        assert_eq!(ep.host, "cache1.example.com");
        assert_eq!(ep.port, 6082);
        assert_eq!(ep.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_parse_bare_host_gets_default_port() {
        let ep: Endpoint = "localhost".parse().unwrap();
        assert_eq!(ep.port, DEFAULT_ADMIN_PORT);
    }

    #[test]
    fn test_parse_bad_port_fails() {
        assert!("cache1:notaport".parse::<Endpoint>().is_err());
        assert!("".parse::<Endpoint>().is_err());
        assert!(":6082".parse::<Endpoint>().is_err());
    }

    #[test]
    fn test_builder() {
        let ep = Endpoint::builder("10.0.0.1")
            .port(9999)
            .timeout(Duration::from_secs(1))
            .build();
        assert_eq!(ep.addr(), "10.0.0.1:9999");
        assert_eq!(ep.timeout, Duration::from_secs(1));
    }
}
