//! Frame codec tests
//!
//! Framing against a pre-scripted in-memory transport: length exactness,
//! blank-line skipping, malformed status lines, command serialization.

mod common;

use common::{frame, FakeTransport};
use vadm::error::AdminError;
use vadm::protocol::{read_reply, write_command, Command, Verb};

// =============================================================================
// Reply Framing
// =============================================================================

#[test]
fn test_read_reply_basic() {
    let (mut fake, _, _) = FakeTransport::new(frame(200, "PONG 1604575303 1.0"));
    let reply = read_reply(&mut fake).unwrap();
    assert_eq!(reply.status, 200);
    assert_eq!(reply.text(), "PONG 1604575303 1.0");
}

#[test]
fn test_read_reply_body_length_is_exact_with_embedded_newlines() {
    let body = "line one\nline two\n\nline four";
    let (mut fake, _, _) = FakeTransport::new(frame(200, body));
    let reply = read_reply(&mut fake).unwrap();
    assert_eq!(reply.len(), body.len());
    assert_eq!(reply.body, body.as_bytes());
}

#[test]
fn test_read_reply_skips_blank_keepalive_lines() {
    let stream = format!("\n\n{}", frame(200, "ok"));
    let (mut fake, _, _) = FakeTransport::new(stream);
    let reply = read_reply(&mut fake).unwrap();
    assert_eq!(reply.status, 200);
    assert_eq!(reply.text(), "ok");
}

#[test]
fn test_read_reply_leaves_stream_clean_for_next_frame() {
    let stream = format!("{}{}", frame(200, "first\nbody"), frame(200, "second"));
    let (mut fake, _, _) = FakeTransport::new(stream);
    assert_eq!(read_reply(&mut fake).unwrap().text(), "first\nbody");
    assert_eq!(read_reply(&mut fake).unwrap().text(), "second");
}

#[test]
fn test_read_reply_empty_body() {
    let (mut fake, _, _) = FakeTransport::new(frame(200, ""));
    let reply = read_reply(&mut fake).unwrap();
    assert!(reply.is_empty());
    assert!(reply.is_ok());
}

#[test]
fn test_read_reply_malformed_status_line() {
    for bad in ["nonsense\n", "200\n", "200 abc\n", "200 12 extra\n"] {
        let (mut fake, _, _) = FakeTransport::new(bad.as_bytes().to_vec());
        let err = read_reply(&mut fake).unwrap_err();
        assert!(matches!(err, AdminError::Protocol(_)), "input {bad:?}: {err}");
    }
}

#[test]
fn test_read_reply_rejects_missing_body_terminator() {
    // Body followed by garbage instead of the trailing newline
    let (mut fake, _, _) = FakeTransport::new(b"200 2\nokX".to_vec());
    let err = read_reply(&mut fake).unwrap_err();
    assert!(matches!(err, AdminError::Protocol(_)));
}

#[test]
fn test_read_reply_truncated_body() {
    let (mut fake, _, _) = FakeTransport::new(b"200 100\nshort\n".to_vec());
    assert!(read_reply(&mut fake).is_err());
}

// =============================================================================
// Command Serialization
// =============================================================================

#[test]
fn test_write_command_single_newline_terminated_write() {
    let (mut fake, written, _) = FakeTransport::new(Vec::new());
    let cmd = Command::new(Verb::ParamSet, ["default_ttl", "120"]).unwrap();
    write_command(&mut fake, &cmd).unwrap();
    assert_eq!(&*written.lock().unwrap(), b"param.set default_ttl 120\n");
}

#[test]
fn test_command_text_used_in_errors_has_no_terminator() {
    let cmd = Command::new(Verb::BanUrl, ["^/img/"]).unwrap();
    assert_eq!(cmd.text(), "ban.url ^/img/");
    assert_eq!(cmd.wire(), "ban.url ^/img/\n");
}
