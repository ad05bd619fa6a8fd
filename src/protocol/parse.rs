//! Reply-body parsers
//!
//! Pure functions from reply text to typed results. Each parser owns the
//! grammar of exactly one verb's reply body.

use std::collections::HashMap;

use crate::error::{AdminError, Result};

/// One named configuration from a `vcl.list` reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VclConfig {
    /// Configuration name
    pub name: String,

    /// Number of references held by in-flight requests
    pub ref_count: i64,

    /// True for the configuration currently serving new requests
    pub active: bool,

    /// Status word as reported (`active`, `available`, `discarded`, ...)
    pub status: String,
}

/// One entry from a `ban.list` reply
#[derive(Debug, Clone, PartialEq)]
pub struct Ban {
    /// Server-side address of the ban
    pub address: String,

    /// High-precision entry timestamp
    pub timestamp: f64,

    /// Objects pointing at this ban
    pub refs: i64,

    /// True when the ban is marked gone (duplicate or no longer effective)
    pub gone: bool,

    /// The ban expression itself
    pub expression: String,
}

/// Parse a `ping` body: `PONG <epoch> <elapsed>`
pub fn parse_ping(body: &str) -> Result<(f64, f64)> {
    let mut fields = body.split_whitespace();
    fields.next(); // PONG echo
    let t1 = fields.next().and_then(|s| s.parse::<f64>().ok());
    let t2 = fields.next().and_then(|s| s.parse::<f64>().ok());
    match (t1, t2) {
        (Some(t1), Some(t2)) => Ok((t1, t2)),
        _ => Err(AdminError::Protocol(format!(
            "malformed ping reply: {body:?}"
        ))),
    }
}

/// Parse a `vcl.list` body, one configuration per line
///
/// Line layout: `<status> <refcount> <name>`; the active configuration
/// carries the `active` status word.
pub fn parse_vcl_list(body: &str) -> Result<Vec<VclConfig>> {
    let mut configs = Vec::new();
    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(AdminError::Protocol(format!(
                "malformed vcl.list line: {line:?}"
            )));
        }
        let ref_count = fields[1].parse::<i64>().map_err(|_| {
            AdminError::Protocol(format!("bad reference count in vcl.list line: {line:?}"))
        })?;
        configs.push(VclConfig {
            name: fields[2].to_string(),
            ref_count,
            active: fields[0] == "active",
            status: fields[0].to_string(),
        });
    }
    Ok(configs)
}

/// Parse a `ban.list` body, one ban per line
///
/// Line layout: `<address> <timestamp> <refs>[G] <expression...>`; a `G`
/// suffix on the refs field marks the ban as gone.
pub fn parse_ban_list(body: &str) -> Result<Vec<Ban>> {
    let mut bans = Vec::new();
    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(AdminError::Protocol(format!(
                "malformed ban.list line: {line:?}"
            )));
        }
        let timestamp = fields[1].parse::<f64>().map_err(|_| {
            AdminError::Protocol(format!("bad timestamp in ban.list line: {line:?}"))
        })?;
        let (refs_digits, gone) = match fields[2].strip_suffix('G') {
            Some(digits) => (digits, true),
            None => (fields[2], false),
        };
        let refs = refs_digits.parse::<i64>().map_err(|_| {
            AdminError::Protocol(format!("bad reference count in ban.list line: {line:?}"))
        })?;
        bans.push(Ban {
            address: fields[0].to_string(),
            timestamp,
            refs,
            gone,
            expression: fields[3..].join(" "),
        });
    }
    Ok(bans)
}

/// Parse a `stats` body into a counter map
///
/// Line layout: `<value> <word> <word> ...`; the key is the description
/// words lower-cased and joined with underscores.
pub fn parse_stats(body: &str) -> Result<HashMap<String, i64>> {
    let mut stats = HashMap::new();
    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            return Err(AdminError::Protocol(format!(
                "malformed stats line: {line:?}"
            )));
        }
        let value = fields[0].parse::<i64>().map_err(|_| {
            AdminError::Protocol(format!("bad counter value in stats line: {line:?}"))
        })?;
        let key = fields[1..].join("_").to_lowercase();
        stats.insert(key, value);
    }
    Ok(stats)
}
