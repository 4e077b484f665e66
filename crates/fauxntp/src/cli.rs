// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Command-line flags.

use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use faux_server::clock::{ClockTarget, VirtualClock};
use faux_server::error::DomainError;
use faux_server::protocol;

/// Serve deliberately wrong time over NTP.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address to listen on
    #[arg(long, default_value = "::")]
    pub host: IpAddr,

    /// UDP port to listen on
    #[arg(short, long, default_value_t = protocol::PORT)]
    pub port: u16,

    /// Start with the clock set to this Unix timestamp or RFC 3339 UTC instant
    #[arg(long, value_name = "UNIX_TS", allow_hyphen_values = true)]
    pub set: Option<ClockTarget>,

    /// Start with the clock offset from real time by this many seconds
    #[arg(
        long,
        value_name = "SECONDS",
        allow_hyphen_values = true,
        conflicts_with = "set"
    )]
    pub offset: Option<f64>,

    /// Start with the clock frozen
    #[arg(long)]
    pub stop: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// The socket address to bind.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Apply the startup clock flags: stop, then set, then offset.
    pub fn apply(&self, clock: &VirtualClock) -> Result<(), DomainError> {
        if self.stop {
            clock.stop();
        }
        if let Some(target) = self.set {
            clock.set(target)?;
        }
        if let Some(offset) = self.offset {
            clock.set_offset(offset)?;
        }
        Ok(())
    }
}
