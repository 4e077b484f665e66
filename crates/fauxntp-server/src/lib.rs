// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! A deliberately unsynchronized NTP-style responder.
//!
//! The server answers each 48-byte request with the time of a
//! [`VirtualClock`](clock::VirtualClock) that an operator can freeze, resume,
//! jump to an arbitrary instant, or shift by a fixed offset. It is a test
//! fixture for software that consumes NTP time, not a time source.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`clock`] | Shared virtual clock and wall-clock sources. |
//! | [`exchange`] | Turns request bytes plus one clock reading into response bytes. |
//! | [`server`] | UDP server using the Tokio runtime. |
//! | [`error`] | Server error type wrapping protocol and I/O failures. |

#![warn(missing_docs)]

// Re-export protocol types from faux_proto for convenience.
pub use faux_proto::{protocol, unix_time};

/// Default listen address: `[::]` (IPv6 dual-stack, accepts both IPv4 and IPv6).
pub(crate) fn default_listen_addr(port: u16) -> String {
    format!("[::]:{port}")
}

/// Errors returned by the server, clock and exchange handler.
pub mod error;

/// The operator-controlled virtual clock.
///
/// Serves `(frozen instant or wall-clock now) + offset`.
pub mod clock;

/// Request/response exchange logic.
pub mod exchange;

/// UDP server using the Tokio runtime.
pub mod server;
