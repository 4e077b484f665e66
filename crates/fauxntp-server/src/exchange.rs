// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Request/response exchange.
//!
//! [`handle`] is the whole per-request pipeline: decode the 48-byte request,
//! read the virtual clock once, build the reply and encode it. It is
//! transport-agnostic and may be called concurrently.

use log::{debug, trace};

use crate::clock::VirtualClock;
use crate::error::ServerError;
use crate::protocol::{ConstPackedSizeBytes, Packet, ReferenceIdentifier, Stratum, TimestampFormat};

/// The stratum and reference identifier advertised in every reply.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ServerIdentity {
    /// Stratum level claimed by this server.
    pub stratum: Stratum,
    /// Reference clock identifier.
    pub reference_id: ReferenceIdentifier,
}

impl Default for ServerIdentity {
    fn default() -> Self {
        ServerIdentity {
            stratum: Stratum::PRIMARY,
            reference_id: ReferenceIdentifier::FAUX,
        }
    }
}

/// Build a reply packet for `request` served at time `t`.
///
/// - `origin_timestamp` is the request's `transmit_timestamp`, verbatim
/// - `reference_timestamp`, `receive_timestamp` and `transmit_timestamp` are
///   all `t`
/// - stratum and reference identifier come from `identity`
pub fn build_server_response(
    request: &Packet,
    identity: &ServerIdentity,
    t: TimestampFormat,
) -> Packet {
    Packet {
        stratum: identity.stratum,
        reference_id: identity.reference_id,
        reference_timestamp: t,
        origin_timestamp: request.transmit_timestamp,
        receive_timestamp: t,
        transmit_timestamp: t,
    }
}

/// Answer one request datagram.
///
/// Reads `clock` exactly once. Returns [`ServerError::Format`] if the
/// datagram is not exactly 48 bytes, and [`ServerError::Domain`] if the
/// served time cannot be encoded. Either way no reply should be sent.
pub fn handle(
    request: &[u8],
    clock: &VirtualClock,
    identity: &ServerIdentity,
) -> Result<[u8; Packet::PACKED_SIZE_BYTES], ServerError> {
    let request = Packet::decode(request)?;
    trace!(
        "request: stratum={} transmit={}",
        request.stratum.0, request.transmit_timestamp
    );

    let t = TimestampFormat::from_unix_seconds(clock.now())?;
    let response = build_server_response(&request, identity, t);
    debug!(
        "reply: origin={} transmit={}",
        response.origin_timestamp, response.transmit_timestamp
    );

    Ok(response.encode())
}
