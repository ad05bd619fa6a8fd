//! Authentication handshake
//!
//! Challenge-response step for management ports protected by a shared
//! secret. The server opens with status 107 and a 32-byte challenge; the
//! client answers with `auth <hex digest>` before any other command is
//! accepted.

use sha2::{Digest, Sha256};

use crate::error::{AdminError, Result};
use crate::protocol::{read_reply, write_command, Command, Reply, Verb, STATUS_OK};
use crate::transport::Transport;

/// Challenge length in bytes at the start of a 107 reply body
pub const CHALLENGE_LEN: usize = 32;

/// Compute the challenge response: `SHA-256(challenge \n secret \n challenge \n)`
/// hex-encoded
pub fn auth_digest(challenge: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(challenge.as_bytes());
    hasher.update(b"\n");
    hasher.update(secret.as_bytes());
    hasher.update(b"\n");
    hasher.update(challenge.as_bytes());
    hasher.update(b"\n");
    hex::encode(hasher.finalize())
}

/// Answer a 107 challenge reply
///
/// Fatal to the connection on any failure: a rejected response or a short
/// challenge means no other command will ever be accepted on this stream.
pub fn respond_to_challenge<T: Transport + ?Sized>(
    transport: &mut T,
    challenge_reply: &Reply,
    secret: &str,
) -> Result<()> {
    if challenge_reply.len() < CHALLENGE_LEN {
        return Err(AdminError::Auth(format!(
            "challenge too short: {} bytes",
            challenge_reply.len()
        )));
    }
    let challenge = std::str::from_utf8(&challenge_reply.body[..CHALLENGE_LEN])
        .map_err(|_| AdminError::Auth("challenge is not valid UTF-8".to_string()))?;

    let digest = auth_digest(challenge, secret);
    let command = Command::new(Verb::Auth, [digest])?;
    write_command(transport, &command)?;

    let reply = read_reply(transport)?;
    if reply.status != STATUS_OK {
        return Err(AdminError::Auth(format!(
            "challenge rejected with status {}: {}",
            reply.status,
            reply.text()
        )));
    }
    Ok(())
}
