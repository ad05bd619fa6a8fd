//! Connection
//!
//! One authenticated session against a single management port. Owns its
//! transport exclusively; never shared across threads. The typed command
//! methods form the façade over the wire protocol.

use std::collections::HashMap;

use crate::auth::respond_to_challenge;
use crate::config::Endpoint;
use crate::error::{AdminError, Result};
use crate::protocol::{
    parse_ban_list, parse_ping, parse_stats, parse_vcl_list, read_reply, write_command, Ban,
    Command, Reply, VclConfig, Verb, STATUS_AUTH, STATUS_OK,
};
use crate::transport::{TcpTransport, Transport};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unauthenticated,
    Authenticated,
    Closed,
}

/// One session against a management port
pub struct Connection {
    transport: Box<dyn Transport>,

    state: ConnectionState,

    /// Endpoint label for logging and error context
    label: String,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("state", &self.state)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Connect to an endpoint and run the opening handshake
    ///
    /// Reads the server banner; on a 107 challenge the shared secret is
    /// required and the challenge response is sent before returning.
    pub fn open(endpoint: &Endpoint, secret: Option<&str>) -> Result<Self> {
        let transport = TcpTransport::connect(endpoint)?;
        Self::from_transport(Box::new(transport), secret, endpoint.to_string())
    }

    /// Run the opening handshake over an already-open transport
    ///
    /// The seam the frame codec and handshake tests use with an in-memory
    /// fake transport.
    pub fn from_transport(
        mut transport: Box<dyn Transport>,
        secret: Option<&str>,
        label: String,
    ) -> Result<Self> {
        let banner = read_reply(transport.as_mut())?;
        match banner.status {
            STATUS_OK => {}
            STATUS_AUTH => {
                let secret = secret.ok_or_else(|| {
                    AdminError::Config(format!(
                        "{label} requires authentication but no secret was supplied"
                    ))
                })?;
                respond_to_challenge(transport.as_mut(), &banner, secret)?;
            }
            status => {
                return Err(AdminError::Protocol(format!(
                    "unexpected banner status {status} from {label}: {}",
                    banner.text()
                )));
            }
        }
        tracing::debug!("Session established with {}", label);
        Ok(Self {
            transport,
            state: ConnectionState::Authenticated,
            label,
        })
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Execute one command and return its reply, requiring status 200
    ///
    /// Framing and timeout errors poison the session: the stream position is
    /// unknown afterwards, so the connection is closed rather than reused. A
    /// clean non-200 reply leaves the session usable and surfaces as
    /// [`AdminError::Command`] with the echoed command text.
    pub fn execute(&mut self, command: &Command) -> Result<Reply> {
        if self.state == ConnectionState::Closed {
            return Err(AdminError::Protocol(format!(
                "connection to {} is closed",
                self.label
            )));
        }

        let reply = match self.exchange(command) {
            Ok(reply) => reply,
            Err(e) => {
                self.close();
                return Err(e);
            }
        };

        if reply.status != STATUS_OK {
            return Err(AdminError::Command {
                status: reply.status,
                command: command.text(),
                body: reply.text(),
            });
        }
        Ok(reply)
    }

    fn exchange(&mut self, command: &Command) -> Result<Reply> {
        write_command(self.transport.as_mut(), command)?;
        read_reply(self.transport.as_mut())
    }

    /// Close the session. Idempotent; the transport is released.
    pub fn close(&mut self) {
        if self.state != ConnectionState::Closed {
            self.transport.close();
            self.state = ConnectionState::Closed;
        }
    }

    // -------------------------------------------------------------------------
    // Service control
    // -------------------------------------------------------------------------

    /// Start the cache process if it is not already running
    pub fn start(&mut self) -> Result<Reply> {
        self.execute(&Command::new(Verb::Start, [] as [&str; 0])?)
    }

    /// Stop the cache process
    pub fn stop(&mut self) -> Result<Reply> {
        self.execute(&Command::new(Verb::Stop, [] as [&str; 0])?)
    }

    /// Send `quit` and close the session
    pub fn quit(&mut self) -> Result<()> {
        let result = self.execute(&Command::new(Verb::Quit, [] as [&str; 0])?);
        self.close();
        result.map(|_| ())
    }

    // -------------------------------------------------------------------------
    // Information
    // -------------------------------------------------------------------------

    /// Ping the cache process; returns the server's epoch and elapsed times
    pub fn ping(&mut self, timestamp: Option<f64>) -> Result<(f64, f64)> {
        let args: Vec<String> = timestamp.map(|t| t.to_string()).into_iter().collect();
        let reply = self.execute(&Command::new(Verb::Ping, args)?)?;
        parse_ping(&reply.text())
    }

    /// Check the status of the cache process; body returned verbatim
    pub fn status(&mut self) -> Result<String> {
        Ok(self.execute(&Command::new(Verb::Status, [] as [&str; 0])?)?.text())
    }

    /// List available commands, or show help for one verb
    pub fn help(&mut self, verb: Option<&str>) -> Result<String> {
        let args: Vec<String> = verb.map(String::from).into_iter().collect();
        Ok(self.execute(&Command::new(Verb::Help, args)?)?.text())
    }

    /// Counter snapshot keyed by normalized metric name
    pub fn stats(&mut self) -> Result<HashMap<String, i64>> {
        let reply = self.execute(&Command::new(Verb::Stats, [] as [&str; 0])?)?;
        parse_stats(&reply.text())
    }

    // -------------------------------------------------------------------------
    // VCL management
    // -------------------------------------------------------------------------

    /// Create a configuration from a file on the server
    pub fn vcl_load(&mut self, name: &str, filename: &str) -> Result<Reply> {
        self.execute(&Command::new(Verb::VclLoad, [name, filename])?)
    }

    /// Create a configuration from inline (quoted) VCL source
    pub fn vcl_inline(&mut self, name: &str, vcl: &str) -> Result<Reply> {
        self.execute(&Command::new(Verb::VclInline, [name, vcl])?)
    }

    /// Display the source of a configuration
    pub fn vcl_show(&mut self, name: &str) -> Result<String> {
        Ok(self.execute(&Command::new(Verb::VclShow, [name])?)?.text())
    }

    /// Switch new requests to the named configuration
    pub fn vcl_use(&mut self, name: &str) -> Result<Reply> {
        self.execute(&Command::new(Verb::VclUse, [name])?)
    }

    /// Discard an unreferenced configuration
    pub fn vcl_discard(&mut self, name: &str) -> Result<Reply> {
        self.execute(&Command::new(Verb::VclDiscard, [name])?)
    }

    /// List configurations; exactly one entry is active
    pub fn vcl_list(&mut self) -> Result<Vec<VclConfig>> {
        let reply = self.execute(&Command::new(Verb::VclList, [] as [&str; 0])?)?;
        parse_vcl_list(&reply.text())
    }

    // -------------------------------------------------------------------------
    // Run-time parameters
    // -------------------------------------------------------------------------

    /// Show one or all run-time parameters; `long` adds explanations
    pub fn param_show(&mut self, param: Option<&str>, long: bool) -> Result<Reply> {
        let mut args = Vec::new();
        if long {
            args.push("-l".to_string());
        }
        if let Some(param) = param {
            args.push(param.to_string());
        }
        self.execute(&Command::new(Verb::ParamShow, args)?)
    }

    /// Set one run-time parameter
    pub fn param_set(&mut self, param: &str, value: &str) -> Result<Reply> {
        self.execute(&Command::new(Verb::ParamSet, [param, value])?)
    }

    // -------------------------------------------------------------------------
    // Invalidation
    // -------------------------------------------------------------------------

    /// Invalidate every document matching a ban expression
    pub fn ban(&mut self, expression: &str) -> Result<Reply> {
        self.execute(&Command::new(Verb::Ban, expression.split_whitespace())?)
    }

    /// Invalidate every document whose URL matches the regex
    pub fn ban_url(&mut self, regex: &str) -> Result<Reply> {
        self.execute(&Command::new(Verb::BanUrl, [regex])?)
    }

    /// List bans still held by the server
    pub fn ban_list(&mut self) -> Result<Vec<Ban>> {
        let reply = self.execute(&Command::new(Verb::BanList, [] as [&str; 0])?)?;
        parse_ban_list(&reply.text())
    }

    /// Invalidate by URL regex on servers speaking the older purge verbs
    pub fn purge_url(&mut self, regex: &str) -> Result<Reply> {
        self.execute(&Command::new(Verb::PurgeUrl, [regex])?)
    }

    /// Invalidate by hash regex on servers speaking the older purge verbs
    pub fn purge_hash(&mut self, regex: &str) -> Result<Reply> {
        self.execute(&Command::new(Verb::PurgeHash, [regex])?)
    }

    /// List pending purges on servers speaking the older purge verbs
    pub fn purge_list(&mut self) -> Result<String> {
        Ok(self.execute(&Command::new(Verb::PurgeList, [] as [&str; 0])?)?.text())
    }

    /// Purge by `<field> <operator> <argument>` triple
    pub fn purge(&mut self, field: &str, operator: &str, argument: &str) -> Result<Reply> {
        self.execute(&Command::new(Verb::Purge, [field, operator, argument])?)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}
