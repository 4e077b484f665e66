// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! `fauxntp`: an NTP-style server that serves whatever time the operator
//! chooses.
//!
//! Run with:
//! ```bash
//! fauxntp --port 1123 --offset -3600
//! RUST_LOG=faux_server=debug fauxntp --host 127.0.0.1 --port 1123 --stop
//! ```

mod cli;
mod console;

use std::io;
use std::sync::Arc;

use clap::Parser;
use faux_server::clock::VirtualClock;
use faux_server::server::FauxNtpServer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // RUST_LOG wins over --log-level. Logs go to stderr so the console owns stdout.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let clock = Arc::new(VirtualClock::new());
    args.apply(&clock)?;

    let server = FauxNtpServer::builder()
        .listen(args.listen_addr().to_string())
        .clock(clock.clone())
        .build()
        .await?;
    let local_addr = server.local_addr()?;
    info!(
        "fauxntp {} listening on {}",
        env!("CARGO_PKG_VERSION"),
        local_addr
    );

    let mut server_task = tokio::spawn(server.run());

    let mut stdout = io::stdout();
    println!("{}", console::banner(local_addr, &clock));
    let console = console::run(console::spawn_stdin_reader(), &mut stdout, &clock);

    tokio::select! {
        result = console => {
            result?;
            info!("console closed, shutting down");
        }
        result = &mut server_task => {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!("server stopped: {}", e);
                    return Err(e.into());
                }
                Err(e) => return Err(e.into()),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted, shutting down");
        }
    }

    server_task.abort();
    Ok(())
}
