// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for packet decoding and time-value validation.
//!
//! [`FormatError`] and [`DomainError`] use no heap allocation. Both implement
//! [`std::error::Error`] and can be converted to [`std::io::Error`].

use core::fmt;

/// An inbound buffer that is not a well-formed 48-byte packet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FormatError {
    /// The buffer is too short for the expected data.
    BufferTooShort {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },
    /// The buffer is longer than the fixed packet size.
    ///
    /// fauxntp does not accept extension fields or a MAC trailer.
    TrailingBytes {
        /// Number of bytes expected.
        expected: usize,
        /// Number of bytes received.
        received: usize,
    },
}

/// A time value that cannot be served or encoded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DomainError {
    /// The value is NaN or infinite.
    NonFinite {
        /// The offending value.
        value: f64,
    },
    /// A calendar instant carried a UTC offset other than zero.
    NotUtc {
        /// The offset from UTC, in seconds east.
        offset_seconds: i32,
    },
    /// A calendar instant carried no UTC offset at all.
    MissingUtcOffset,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::BufferTooShort { needed, available } => {
                write!(
                    f,
                    "buffer too short: needed {} bytes, got {}",
                    needed, available
                )
            }
            FormatError::TrailingBytes { expected, received } => {
                write!(
                    f,
                    "packet must be exactly {} bytes, got {}",
                    expected, received
                )
            }
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NonFinite { value } => {
                write!(f, "time value is not finite: {}", value)
            }
            DomainError::NotUtc { offset_seconds } => {
                write!(
                    f,
                    "calendar instant must be in UTC, got offset of {}s",
                    offset_seconds
                )
            }
            DomainError::MissingUtcOffset => {
                write!(f, "calendar instant has no UTC offset")
            }
        }
    }
}

impl DomainError {
    /// Reject NaN and infinities, passing finite values through.
    pub fn check_finite(value: f64) -> Result<f64, DomainError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(DomainError::NonFinite { value })
        }
    }
}

impl From<FormatError> for std::io::Error {
    fn from(err: FormatError) -> std::io::Error {
        let kind = match &err {
            FormatError::BufferTooShort { .. } => std::io::ErrorKind::UnexpectedEof,
            FormatError::TrailingBytes { .. } => std::io::ErrorKind::InvalidData,
        };
        std::io::Error::new(kind, err)
    }
}

impl From<DomainError> for std::io::Error {
    fn from(err: DomainError) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    }
}

impl std::error::Error for FormatError {}

impl std::error::Error for DomainError {}
