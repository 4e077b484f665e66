// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! fauxntp UDP server using the Tokio runtime.
//!
//! Every well-formed 48-byte datagram gets exactly one 48-byte reply carrying
//! the current [`VirtualClock`] time. Malformed datagrams are logged and
//! dropped.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> std::io::Result<()> {
//! use std::sync::Arc;
//! use faux_server::clock::VirtualClock;
//! use faux_server::server::FauxNtpServer;
//!
//! let clock = Arc::new(VirtualClock::new());
//! clock.set_offset(-3600.0)?;
//!
//! let server = FauxNtpServer::builder()
//!     .listen("[::]:123")
//!     .clock(clock.clone())
//!     .build()
//!     .await?;
//!
//! server.run().await
//! # }
//! ```

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::clock::VirtualClock;
use crate::error::{ConfigError, ServerError};
use crate::exchange::{self, ServerIdentity};
use crate::protocol;

/// Builder for configuring and creating a [`FauxNtpServer`].
pub struct FauxNtpServerBuilder {
    listen_addr: String,
    identity: ServerIdentity,
    clock: Option<Arc<VirtualClock>>,
}

impl FauxNtpServerBuilder {
    fn new() -> Self {
        FauxNtpServerBuilder {
            listen_addr: crate::default_listen_addr(protocol::PORT),
            identity: ServerIdentity::default(),
            clock: None,
        }
    }

    /// Set the listen address (default: `"[::]:123"`).
    pub fn listen(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = addr.into();
        self
    }

    /// Set the advertised stratum (default: 1).
    pub fn stratum(mut self, stratum: protocol::Stratum) -> Self {
        self.identity.stratum = stratum;
        self
    }

    /// Set the advertised reference identifier (default: `FAUX`).
    pub fn reference_id(mut self, id: protocol::ReferenceIdentifier) -> Self {
        self.identity.reference_id = id;
        self
    }

    /// Serve time from a shared clock instead of a fresh one.
    ///
    /// Keep a clone of the `Arc` to stop, set or offset the clock while the
    /// server runs.
    pub fn clock(mut self, clock: Arc<VirtualClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the server. Binds to the configured listen address.
    pub async fn build(self) -> io::Result<FauxNtpServer> {
        let addr: SocketAddr = self.listen_addr.parse().map_err(|e| {
            ServerError::Config(ConfigError::InvalidListenAddress {
                address: self.listen_addr.clone(),
                detail: format!("{e}"),
            })
        })?;
        let sock = UdpSocket::bind(addr).await?;
        debug!("fauxntp server listening on {}", addr);

        Ok(FauxNtpServer {
            sock,
            identity: self.identity,
            clock: self.clock.unwrap_or_default(),
        })
    }
}

/// A UDP server answering every request with virtual time.
///
/// Created via [`FauxNtpServer::builder()`]. Call [`run()`](FauxNtpServer::run)
/// to start serving requests.
pub struct FauxNtpServer {
    sock: UdpSocket,
    identity: ServerIdentity,
    clock: Arc<VirtualClock>,
}

impl FauxNtpServer {
    /// Create a builder for configuring the server.
    pub fn builder() -> FauxNtpServerBuilder {
        FauxNtpServerBuilder::new()
    }

    /// The clock this server reads.
    pub fn clock(&self) -> &Arc<VirtualClock> {
        &self.clock
    }

    /// The stratum and reference identifier sent in every reply.
    pub fn identity(&self) -> ServerIdentity {
        self.identity
    }

    /// Get the local address the server is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.sock.local_addr()
    }

    /// Run the server, processing incoming requests indefinitely.
    ///
    /// This future runs until an I/O error occurs while receiving. Use
    /// `tokio::select!` or a shutdown signal to stop the server.
    pub async fn run(self) -> io::Result<()> {
        let mut recv_buf = [0u8; 2048];
        info!("serving virtual time on {}", self.local_addr()?);

        loop {
            let (recv_len, src_addr) = self.sock.recv_from(&mut recv_buf).await?;

            match exchange::handle(&recv_buf[..recv_len], &self.clock, &self.identity) {
                Ok(resp_buf) => {
                    if let Err(e) = self.sock.send_to(&resp_buf, src_addr).await {
                        debug!("failed to reply to {}: {}", src_addr, e);
                    }
                }
                Err(e) => {
                    debug!("dropped packet from {}: {}", src_addr, e);
                }
            }
        }
    }
}
