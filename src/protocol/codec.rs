//! Protocol codec
//!
//! Reads reply frames and serializes commands over a [`Transport`].
//!
//! A reply is a status line `<status> <length>` followed by exactly
//! `length` bytes of body and one trailing newline. The body length is
//! authoritative; the body itself is opaque bytes and may contain
//! newlines, so it is never parsed line-by-line here.

use crate::error::{AdminError, Result};
use crate::protocol::{Command, Reply};
use crate::transport::Transport;

/// Maximum accepted body size (16 MB); a larger advertised length is
/// treated as a corrupted status line
pub const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Read one reply frame
///
/// Skips blank keep-alive lines before the status line, reads exactly the
/// advertised number of body bytes, then drains the trailing newline so the
/// stream is positioned at the next status line.
pub fn read_reply<T: Transport + ?Sized>(transport: &mut T) -> Result<Reply> {
    // The server may emit blank lines between replies
    let header = loop {
        let line = transport.read_line()?;
        if !line.trim().is_empty() {
            break line;
        }
    };

    let (status, length) = parse_status_line(&header)?;

    if length > MAX_BODY_SIZE {
        return Err(AdminError::Protocol(format!(
            "reply body too large: {length} bytes (max {MAX_BODY_SIZE})"
        )));
    }

    let mut body = vec![0u8; length];
    if length > 0 {
        transport.read_exact(&mut body)?;
    }

    // Drain the newline terminating the body
    let mut terminator = [0u8; 1];
    transport.read_exact(&mut terminator)?;
    if terminator[0] != b'\n' {
        return Err(AdminError::Protocol(format!(
            "expected newline after {length}-byte body, got 0x{:02x}",
            terminator[0]
        )));
    }

    tracing::debug!("RECV: {} {}B {:?}", status, length, preview(&body));

    Ok(Reply::new(status, body))
}

/// Parse `<status> <length>` from a status line
fn parse_status_line(line: &str) -> Result<(u32, usize)> {
    let mut fields = line.split_whitespace();
    let status = fields
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| AdminError::Protocol(format!("malformed status line: {line:?}")))?;
    let length = fields
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| AdminError::Protocol(format!("malformed status line: {line:?}")))?;
    if fields.next().is_some() {
        return Err(AdminError::Protocol(format!(
            "trailing data on status line: {line:?}"
        )));
    }
    Ok((status, length))
}

/// Serialize a command and write it as one atomic call
pub fn write_command<T: Transport + ?Sized>(transport: &mut T, command: &Command) -> Result<()> {
    let wire = command.wire();
    tracing::debug!("SENT: {}", wire.trim_end());
    transport.write_all(wire.as_bytes())
}

/// First few body bytes for debug logging
fn preview(body: &[u8]) -> String {
    let end = body.len().min(30);
    String::from_utf8_lossy(&body[..end]).into_owned()
}
