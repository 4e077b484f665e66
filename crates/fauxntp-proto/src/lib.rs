// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Wire types and timestamp conversion for the fauxntp time responder.
//!
//! This crate provides the 48-byte NTP packet layout used by fauxntp and the
//! conversion between real-valued Unix time and the 64-bit NTP fixed-point
//! timestamp format (RFC 5905 Section 6).

#![warn(missing_docs)]

/// Error types for packet decoding and time-value validation.
pub mod error;

/// NTP packet types and constants.
pub mod protocol;

/// Conversion between Unix time and NTP fixed-point timestamps.
pub mod unix_time;
