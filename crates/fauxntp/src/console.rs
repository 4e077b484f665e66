// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Interactive operator console.
//!
//! Reads one command per line and applies it to the shared clock. Errors are
//! reported and the console keeps going; `quit`, `exit` or end of input stop
//! it.

use std::fmt;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::str::FromStr;

use faux_server::clock::{ClockTarget, TargetParseError, VirtualClock};
use faux_server::error::DomainError;
use tokio::sync::mpsc;
use tracing::debug;

/// Command list printed in the banner and by `help`.
pub const HELP: &str = "\
Commands:
  stop              freeze the served time
  run               resume the clock
  set <TIME>        set the served time (Unix seconds or RFC 3339 UTC instant)
  offset <SECONDS>  serve real time shifted by SECONDS
  now               print the served Unix timestamp
  status            print the clock status
  help              print this list
  quit | exit       stop the server";

/// One console command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Freeze the clock.
    Stop,
    /// Resume the clock.
    Run,
    /// Set the served time.
    Set(ClockTarget),
    /// Offset the served time from real time.
    Offset(f64),
    /// Print the served Unix timestamp.
    Now,
    /// Print the status line.
    Status,
    /// Print the command list.
    Help,
    /// Stop the process.
    Quit,
}

/// A console line that could not be parsed or applied.
#[derive(Clone, Debug, PartialEq)]
pub enum CommandError {
    /// The first word is not a command.
    Unknown(String),
    /// The command needs an argument.
    MissingArgument(&'static str),
    /// The command was given too many arguments.
    UnexpectedArgument(String),
    /// `set` argument is not a usable instant.
    InvalidTarget(TargetParseError),
    /// `offset` argument is not a number.
    InvalidOffset(String),
    /// The clock rejected the value.
    Domain(DomainError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(word) => {
                write!(f, "unknown command '{word}' (try 'help')")
            }
            CommandError::MissingArgument(command) => {
                write!(f, "'{command}' needs an argument")
            }
            CommandError::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument '{arg}'")
            }
            CommandError::InvalidTarget(e) => write!(f, "{e}"),
            CommandError::InvalidOffset(arg) => {
                write!(f, "'{arg}' is not a number of seconds")
            }
            CommandError::Domain(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<DomainError> for CommandError {
    fn from(err: DomainError) -> Self {
        CommandError::Domain(err)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let no_argument = |command: Command| {
            if rest.is_empty() {
                Ok(command)
            } else {
                Err(CommandError::UnexpectedArgument(rest.to_string()))
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "stop" => no_argument(Command::Stop),
            "run" => no_argument(Command::Run),
            "now" => no_argument(Command::Now),
            "status" => no_argument(Command::Status),
            "help" | "?" => no_argument(Command::Help),
            "quit" | "exit" => no_argument(Command::Quit),
            "set" if rest.is_empty() => Err(CommandError::MissingArgument("set")),
            "set" => rest
                .parse()
                .map(Command::Set)
                .map_err(CommandError::InvalidTarget),
            "offset" if rest.is_empty() => Err(CommandError::MissingArgument("offset")),
            "offset" => rest
                .parse()
                .map(Command::Offset)
                .map_err(|_| CommandError::InvalidOffset(rest.to_string())),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

/// What the console does after a command.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    /// Print the text and read the next line.
    Continue(String),
    /// Stop reading.
    Quit,
}

/// Apply `command` to `clock`.
///
/// Mutating commands answer with the new status line.
pub fn execute(command: Command, clock: &VirtualClock) -> Result<Flow, CommandError> {
    debug!("console command: {:?}", command);
    let text = match command {
        Command::Stop => {
            clock.stop();
            clock.status()
        }
        Command::Run => {
            clock.run();
            clock.status()
        }
        Command::Set(target) => {
            clock.set(target)?;
            clock.status()
        }
        Command::Offset(seconds) => {
            clock.set_offset(seconds)?;
            clock.status()
        }
        Command::Now => format!("{:.6}", clock.now()),
        Command::Status => clock.status(),
        Command::Help => HELP.to_string(),
        Command::Quit => return Ok(Flow::Quit),
    };
    Ok(Flow::Continue(text))
}

/// Startup banner: listen address, clock status and command list.
pub fn banner(addr: SocketAddr, clock: &VirtualClock) -> String {
    format!(
        "fauxntp serving on {addr}\n{}\n\n{HELP}",
        clock.status()
    )
}

/// Process console lines until `quit`, `exit` or the sender is dropped.
pub async fn run(
    mut lines: mpsc::UnboundedReceiver<String>,
    out: &mut impl Write,
    clock: &VirtualClock,
) -> io::Result<()> {
    while let Some(line) = lines.recv().await {
        if line.trim().is_empty() {
            continue;
        }
        let result = line
            .parse::<Command>()
            .and_then(|command| execute(command, clock));
        match result {
            Ok(Flow::Continue(text)) => writeln!(out, "{text}")?,
            Ok(Flow::Quit) => break,
            Err(e) => writeln!(out, "error: {e}")?,
        }
        out.flush()?;
    }
    Ok(())
}

/// Forward stdin lines to a channel from a dedicated thread.
///
/// Blocking reads stay off the async runtime. The thread ends at end of input,
/// or on the first line read after the receiver is dropped.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
