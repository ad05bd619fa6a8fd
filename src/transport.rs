//! Transport layer
//!
//! Blocking TCP transport behind a narrow trait so the frame codec and the
//! auth handshake can be exercised against an in-memory fake.

use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::config::Endpoint;
use crate::error::{AdminError, Result};

/// Narrow I/O surface a [`crate::connection::Connection`] needs
///
/// One implementation wraps a real socket; tests supply in-memory fakes.
pub trait Transport: Send {
    /// Read one newline-terminated line, blocking up to the read deadline.
    /// The terminator (and any preceding `\r`) is stripped. EOF before any
    /// newline is an error: the protocol never ends a stream mid-exchange.
    fn read_line(&mut self) -> Result<String>;

    /// Fill `buf` completely, blocking up to the read deadline
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Write the whole buffer and flush; a single call per command so writes
    /// are never interleaved
    fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Release the underlying socket. Idempotent.
    fn close(&mut self);
}

/// Blocking TCP transport with connect/read deadlines
pub struct TcpTransport {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,

    closed: bool,
}

impl TcpTransport {
    /// Connect to an endpoint, applying its connect and read/write deadlines
    pub fn connect(endpoint: &Endpoint) -> Result<Self> {
        let addr = endpoint.addr();

        // Resolve and connect with the endpoint's deadline
        let mut last_err = None;
        let mut stream = None;
        let addrs = std::net::ToSocketAddrs::to_socket_addrs(&addr).map_err(|e| {
            AdminError::Connect {
                endpoint: addr.clone(),
                reason: e.to_string(),
            }
        })?;
        for sock_addr in addrs {
            match TcpStream::connect_timeout(&sock_addr, endpoint.timeout) {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => last_err = Some(e),
            }
        }
        let stream = stream.ok_or_else(|| AdminError::Connect {
            endpoint: addr.clone(),
            reason: last_err
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no addresses resolved".to_string()),
        })?;

        Self::from_stream(stream, endpoint.timeout)
    }

    /// Wrap an already-connected stream (integration tests use this directly)
    pub fn from_stream(stream: TcpStream, timeout: Duration) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
            closed: false,
        })
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Transport for TcpTransport {
    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .map_err(|e| AdminError::from_io(e, "reading line"))?;
        if n == 0 {
            return Err(AdminError::Protocol(format!(
                "connection closed by {} while reading line",
                self.peer_addr
            )));
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.reader
            .read_exact(buf)
            .map_err(|e| AdminError::from_io(e, "reading body"))
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.writer
            .write_all(buf)
            .and_then(|_| self.writer.flush())
            .map_err(|e| AdminError::from_io(e, "writing command"))
    }

    fn close(&mut self) {
        if !self.closed {
            let _ = self.writer.get_ref().shutdown(std::net::Shutdown::Both);
            self.closed = true;
            tracing::debug!("Closed connection to {}", self.peer_addr);
        }
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        self.close();
    }
}
