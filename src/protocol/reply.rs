//! Reply definitions
//!
//! Represents one framed reply from the management port.

/// Success status
pub const STATUS_OK: u32 = 200;

/// Authentication-required status; the body carries the challenge
pub const STATUS_AUTH: u32 = 107;

/// One framed reply
///
/// The codec guarantees `body.len()` equals the length advertised on the
/// status line; the body may contain any bytes, including newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Status code from the status line
    pub status: u32,

    /// Exact-length body
    pub body: Vec<u8>,
}

impl Reply {
    pub fn new(status: u32, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Authoritative body length in bytes
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// True for a 200 reply
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Body as text; invalid UTF-8 is replaced, never an error, since error
    /// bodies are only used for diagnostics
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
