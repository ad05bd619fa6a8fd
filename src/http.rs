//! HTTP purge
//!
//! Stateless eviction of one cached object via a `PURGE` request against the
//! cache's data port. Unrelated to the management protocol beyond living in
//! the same toolbox; the URL must point at the cache instance itself, not
//! the admin port.

use std::time::Duration;

use url::Url;

use crate::error::{AdminError, Result};

/// Issue one `PURGE <path>?<query>` request and return the HTTP status
///
/// A non-200 status is logged and returned, not an error: a purge miss is a
/// server-side outcome, not a client failure.
pub fn http_purge_url(raw_url: &str) -> Result<u16> {
    let parsed =
        Url::parse(raw_url).map_err(|e| AdminError::Http(format!("invalid URL {raw_url:?}: {e}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| AdminError::Http(format!("URL {raw_url:?} has no host")))?
        .to_string();

    let agent = ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(10))
        .build();

    let status = match agent.request("PURGE", raw_url).set("Host", &host).call() {
        Ok(response) => response.status(),
        // Non-2xx comes back as a status error carrying the real response
        Err(ureq::Error::Status(code, _)) => code,
        Err(e) => return Err(AdminError::Http(e.to_string())),
    };

    if status != 200 {
        tracing::error!("Purge of {} failed with status {}", raw_url, status);
    }
    Ok(status)
}
