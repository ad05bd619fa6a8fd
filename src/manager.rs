//! Broadcast manager
//!
//! Runs a command batch across an ordered set of management endpoints.
//! Sequential mode collects per-server results in endpoint order; concurrent
//! mode gives every endpoint its own worker thread and returns the join
//! handles so callers choose between fire-and-forget and join-with-results.

use std::thread::JoinHandle;

use crate::config::Endpoint;
use crate::connection::Connection;
use crate::error::{AdminError, Result};
use crate::protocol::{Command, Reply};

/// Outcome of one server's command batch
pub type BatchResult = Result<Vec<Reply>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ManagerState {
    Idle,
    Closed,
}

/// Ordered set of management endpoints with broadcast execution
pub struct Manager {
    endpoints: Vec<Endpoint>,

    /// Shared secret for endpoints requiring the auth handshake
    secret: Option<String>,

    state: ManagerState,
}

impl Manager {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        if endpoints.is_empty() {
            tracing::warn!("No endpoints configured, broadcasts will be empty");
        }
        Self {
            endpoints,
            secret: None,
            state: ManagerState::Idle,
        }
    }

    /// Attach the shared secret used for every endpoint's handshake
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn is_closed(&self) -> bool {
        self.state == ManagerState::Closed
    }

    /// Run a command batch against every endpoint, one at a time
    ///
    /// Results are index-aligned with the endpoint list. A failure on one
    /// endpoint is captured in its slot and never aborts the remaining
    /// endpoints: one unreachable node must not block administration of the
    /// others. Within a slot, the batch stops at the first failing command.
    pub fn run(&mut self, commands: &[Command]) -> Result<Vec<BatchResult>> {
        if self.state == ManagerState::Closed {
            return Err(AdminError::Closed);
        }

        let mut results = Vec::with_capacity(self.endpoints.len());
        for endpoint in &self.endpoints {
            let result = run_batch(endpoint, self.secret.as_deref(), commands);
            if let Err(e) = &result {
                tracing::warn!("Broadcast to {} failed: {}", endpoint, e);
            }
            results.push(result);
        }
        Ok(results)
    }

    /// Run a command batch against every endpoint concurrently
    ///
    /// One worker thread per endpoint, each owning its private connection;
    /// no ordering guarantee across workers. The returned handles are
    /// index-aligned with the endpoint list; dropping them is
    /// fire-and-forget, joining them collects per-server results.
    pub fn run_concurrent(&mut self, commands: &[Command]) -> Result<Vec<JoinHandle<BatchResult>>> {
        if self.state == ManagerState::Closed {
            return Err(AdminError::Closed);
        }

        let handles = self
            .endpoints
            .iter()
            .map(|endpoint| {
                let endpoint = endpoint.clone();
                let secret = self.secret.clone();
                let commands = commands.to_vec();
                std::thread::spawn(move || {
                    let result = run_batch(&endpoint, secret.as_deref(), &commands);
                    if let Err(e) = &result {
                        tracing::warn!("Broadcast to {} failed: {}", endpoint, e);
                    }
                    result
                })
            })
            .collect();
        Ok(handles)
    }

    /// Ask the first endpoint for its command list
    pub fn help(&mut self, verb: Option<&str>) -> Result<String> {
        if self.state == ManagerState::Closed {
            return Err(AdminError::Closed);
        }
        let endpoint = self
            .endpoints
            .first()
            .ok_or_else(|| AdminError::Config("no endpoints configured".to_string()))?;
        let mut connection = Connection::open(endpoint, self.secret.as_deref())?;
        let text = connection.help(verb)?;
        connection.close();
        Ok(text)
    }

    /// Close the manager
    ///
    /// Connections are short-lived per run, so nothing is held open here;
    /// the endpoint set is cleared and every later `run` fails with
    /// [`AdminError::Closed`]. Safe to call more than once.
    pub fn close(&mut self) {
        if self.state != ManagerState::Closed {
            self.endpoints.clear();
            self.state = ManagerState::Closed;
            tracing::debug!("Manager closed");
        }
    }
}

/// Open a connection, run the whole batch on it, close it
fn run_batch(endpoint: &Endpoint, secret: Option<&str>, commands: &[Command]) -> BatchResult {
    let mut connection = Connection::open(endpoint, secret)?;
    let mut replies = Vec::with_capacity(commands.len());
    for command in commands {
        replies.push(connection.execute(command)?);
    }
    connection.close();
    Ok(replies)
}
