//! # vadm
//!
//! Client for the line-oriented, length-delimited TCP management protocol of
//! a cache server, with:
//! - Status-line + exact-length body framing
//! - SHA-256 challenge-response authentication
//! - Typed command façade (ping, status, vcl.*, param.*, ban.*, stats, ...)
//! - Sequential and concurrent multi-server broadcast
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Broadcast Manager                         │
//! │           (ordered endpoints, per-server results)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ one connection per endpoint
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Connection                              │
//! │         (auth handshake, typed command façade)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Frame Codec │          │  Transport  │
//!   │ (framing)   │          │ (TCP, trait)│
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! A connection is exclusively owned by the thread that created it and the
//! protocol is not pipelined: reply N is fully consumed before command N+1
//! is written.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod transport;
pub mod protocol;
pub mod auth;
pub mod connection;
pub mod manager;
pub mod http;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{AdminError, Result};
pub use config::Endpoint;
pub use connection::{Connection, ConnectionState};
pub use manager::{BatchResult, Manager};
pub use protocol::{Ban, Command, Reply, VclConfig, Verb};
pub use http::http_purge_url;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of vadm
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
