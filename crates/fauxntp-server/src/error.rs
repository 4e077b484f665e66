// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Custom error types for the fauxntp server.
//!
//! The async server API returns `io::Result<T>`. Internally, errors are
//! constructed as `ServerError` variants and converted to `io::Error`
//! automatically via `From<ServerError> for io::Error`.
//!
//! Callers who want programmatic error matching can downcast via
//! `io::Error::get_ref()`:
//!
//! ```no_run
//! use faux_server::error::ServerError;
//!
//! # fn example(result: std::io::Result<()>) {
//! if let Err(e) = result {
//!     if let Some(srv_err) = e.get_ref()
//!         .and_then(|inner| inner.downcast_ref::<ServerError>())
//!     {
//!         match srv_err {
//!             ServerError::Config(c) => eprintln!("bad configuration: {c}"),
//!             _ => eprintln!("server error: {srv_err}"),
//!         }
//!     }
//! }
//! # }
//! ```

// Re-export proto error types so callers need only one import path.
pub use faux_proto::error::{DomainError, FormatError};

use std::fmt;
use std::io;

/// Errors that can occur while serving virtual time.
#[derive(Debug)]
pub enum ServerError {
    /// The inbound datagram is not a well-formed 48-byte packet.
    Format(FormatError),
    /// A time value cannot be served or encoded.
    Domain(DomainError),
    /// Invalid configuration.
    Config(ConfigError),
}

/// Server configuration errors.
#[derive(Clone, Debug)]
pub enum ConfigError {
    /// Invalid listen address.
    InvalidListenAddress {
        /// The address that was invalid.
        address: String,
        /// Detail about why it is invalid.
        detail: String,
    },
}

// ── Display implementations ─────────────────────────────────────────

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Format(e) => write!(f, "malformed request: {e}"),
            ServerError::Domain(e) => write!(f, "invalid time value: {e}"),
            ServerError::Config(e) => write!(f, "server config error: {e}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidListenAddress { address, detail } => {
                write!(f, "invalid listen address '{address}': {detail}")
            }
        }
    }
}

// ── Error trait implementations ─────────────────────────────────────

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Format(e) => Some(e),
            ServerError::Domain(e) => Some(e),
            ServerError::Config(e) => Some(e),
        }
    }
}

impl std::error::Error for ConfigError {}

// ── From conversions ────────────────────────────────────────────────

impl From<ServerError> for io::Error {
    fn from(err: ServerError) -> io::Error {
        let kind = match &err {
            ServerError::Format(_) => io::ErrorKind::InvalidData,
            ServerError::Domain(_) | ServerError::Config(_) => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}

impl From<FormatError> for ServerError {
    fn from(err: FormatError) -> ServerError {
        ServerError::Format(err)
    }
}

impl From<DomainError> for ServerError {
    fn from(err: DomainError) -> ServerError {
        ServerError::Domain(err)
    }
}

impl From<ConfigError> for ServerError {
    fn from(err: ConfigError) -> ServerError {
        ServerError::Config(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
