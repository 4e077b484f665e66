// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Types and constants for the fixed 48-byte NTP packet served by fauxntp.
//!
//! Provides slice-based [`FromBytes`] and [`ToBytes`] implementations, and [`ReadBytes`] and
//! [`WriteBytes`] implementations which extend the byteorder crate `ReadBytesExt` and
//! `WriteBytesExt` traits with the ability to read and write the packet types from streams.
//!
//! Field documentation is largely derived from IETF RFC 5905.

/// NTP port number.
pub const PORT: u16 = 123;

mod bytes;
mod io;
mod traits;
mod types;

pub use self::traits::*;
pub use self::types::*;
