//! Protocol Module
//!
//! Defines the management wire protocol.
//!
//! ## Wire Format
//!
//! ### Request Format
//! ```text
//! <verb> [arg ...]\n
//! ```
//!
//! ### Reply Format
//! ```text
//! <status:int> <length:int>\n
//! <length bytes of body, may contain newlines>\n
//! ```
//!
//! ### Status Codes
//! - 200: OK
//! - 107: authentication challenge (first 32 body bytes = challenge)
//! - 4xx/5xx: error, body carries human-readable text

mod command;
mod reply;
mod codec;
mod parse;

pub use command::{Command, Verb};
pub use reply::{Reply, STATUS_AUTH, STATUS_OK};
pub use codec::{read_reply, write_command, MAX_BODY_SIZE};
pub use parse::{parse_ban_list, parse_ping, parse_stats, parse_vcl_list, Ban, VclConfig};
