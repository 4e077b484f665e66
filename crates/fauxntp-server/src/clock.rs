// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The virtual clock served to clients.
//!
//! A [`VirtualClock`] is either running (it follows a [`WallClock`]) or
//! frozen at the wall-clock instant recorded when [`VirtualClock::stop`] was
//! first called. Either way, an additive offset is applied:
//!
//! ```text
//! served = (frozen_at if frozen else wall_clock_now) + offset
//! ```
//!
//! The `(offset, frozen_at)` pair lives behind a single mutex, so a reader
//! racing a mutator sees either the old pair or the new pair.
//!
//! # Examples
//!
//! ```
//! use faux_server::clock::{ManualWallClock, VirtualClock};
//!
//! let wall = ManualWallClock::new(1_000.0);
//! let clock = VirtualClock::with_wall_clock(wall.clone());
//!
//! clock.set(1_700_000_000.0).unwrap();
//! wall.advance(10.0);
//! assert_eq!(clock.now(), 1_700_000_010.0);
//!
//! clock.stop();
//! wall.advance(60.0);
//! assert_eq!(clock.now(), 1_700_000_010.0);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use tracing::debug;

use crate::error::DomainError;
use crate::unix_time;

/// Glyph shown by [`VirtualClock::status`] while frozen.
pub const PAUSED_GLYPH: &str = "⏸️";

/// Glyph shown by [`VirtualClock::status`] while running.
pub const RUNNING_GLYPH: &str = "▶️";

/// A source of real (wall-clock) time in Unix seconds.
pub trait WallClock: Send + Sync + fmt::Debug {
    /// Current wall-clock time as fractional seconds since the Unix epoch.
    fn unix_seconds(&self) -> f64;
}

/// The host's system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn unix_seconds(&self) -> f64 {
        unix_time::datetime_to_unix_seconds(Utc::now())
    }
}

/// A wall clock that only moves when told to.
///
/// Clones share the same underlying instant, so a test can hand one clone to
/// a [`VirtualClock`] and keep another to advance time.
#[derive(Clone, Debug, Default)]
pub struct ManualWallClock {
    now: Arc<Mutex<f64>>,
}

impl ManualWallClock {
    /// Create a manual clock reading `start` Unix seconds.
    pub fn new(start: f64) -> Self {
        ManualWallClock {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward (or backward, if negative) by `seconds`.
    pub fn advance(&self, seconds: f64) {
        *lock(&self.now) += seconds;
    }

    /// Jump the clock to `unix_seconds`.
    pub fn set(&self, unix_seconds: f64) {
        *lock(&self.now) = unix_seconds;
    }
}

impl WallClock for ManualWallClock {
    fn unix_seconds(&self) -> f64 {
        *lock(&self.now)
    }
}

/// Every guarded value is replaced whole, so a poisoned lock still holds a
/// consistent value.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An instant the clock can be [`set`](VirtualClock::set) to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClockTarget {
    /// Fractional seconds since the Unix epoch.
    Unix(f64),
    /// A calendar instant. Only a zero UTC offset is accepted.
    Calendar(DateTime<FixedOffset>),
}

impl ClockTarget {
    /// Resolve the target to Unix seconds.
    ///
    /// Fails if the value is not finite or the calendar instant is not UTC.
    pub fn unix_seconds(&self) -> Result<f64, DomainError> {
        match *self {
            ClockTarget::Unix(t) => DomainError::check_finite(t),
            ClockTarget::Calendar(dt) => {
                let offset_seconds = dt.offset().local_minus_utc();
                if offset_seconds != 0 {
                    return Err(DomainError::NotUtc { offset_seconds });
                }
                Ok(unix_time::datetime_to_unix_seconds(dt.with_timezone(&Utc)))
            }
        }
    }
}

impl From<f64> for ClockTarget {
    fn from(t: f64) -> Self {
        ClockTarget::Unix(t)
    }
}

impl From<DateTime<Utc>> for ClockTarget {
    fn from(dt: DateTime<Utc>) -> Self {
        ClockTarget::Calendar(dt.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for ClockTarget {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        ClockTarget::Calendar(dt)
    }
}

/// Failure to parse a [`ClockTarget`] from text.
#[derive(Clone, Debug, PartialEq)]
pub enum TargetParseError {
    /// Neither a number nor an RFC 3339 instant.
    Malformed {
        /// The rejected input.
        input: String,
    },
    /// Parsed, but not an acceptable instant.
    Domain(DomainError),
}

impl fmt::Display for TargetParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetParseError::Malformed { input } => write!(
                f,
                "'{input}' is neither a Unix timestamp nor an RFC 3339 instant"
            ),
            TargetParseError::Domain(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for TargetParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TargetParseError::Domain(e) => Some(e),
            TargetParseError::Malformed { .. } => None,
        }
    }
}

impl From<DomainError> for TargetParseError {
    fn from(err: DomainError) -> Self {
        TargetParseError::Domain(err)
    }
}

impl FromStr for ClockTarget {
    type Err = TargetParseError;

    /// Accepts Unix seconds (`1700000000.5`) or an RFC 3339 instant
    /// (`2023-11-14T22:13:20Z`). A date-time without an offset is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(t) = s.parse::<f64>() {
            return Ok(ClockTarget::Unix(DomainError::check_finite(t)?));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            let target = ClockTarget::Calendar(dt);
            target.unix_seconds()?;
            return Ok(target);
        }
        let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok());
        if naive {
            return Err(DomainError::MissingUtcOffset.into());
        }
        Err(TargetParseError::Malformed {
            input: s.to_string(),
        })
    }
}

/// A consistent copy of the clock's mutable state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClockSnapshot {
    /// Seconds added to the base instant.
    pub offset: f64,
    /// Wall-clock instant the clock was frozen at, if frozen.
    pub frozen_at: Option<f64>,
}

impl ClockSnapshot {
    /// Whether the clock is frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen_at.is_some()
    }

    fn base(&self, wall: &dyn WallClock) -> f64 {
        self.frozen_at.unwrap_or_else(|| wall.unix_seconds())
    }
}

/// The operator-controlled clock shared by the server and the console.
///
/// Share it as `Arc<VirtualClock>`; every method takes `&self`.
#[derive(Debug)]
pub struct VirtualClock {
    wall: Box<dyn WallClock>,
    state: Mutex<ClockSnapshot>,
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualClock {
    /// A running clock with zero offset, following the system clock.
    pub fn new() -> Self {
        Self::with_wall_clock(SystemWallClock)
    }

    /// A running clock with zero offset, following `wall`.
    pub fn with_wall_clock(wall: impl WallClock + 'static) -> Self {
        VirtualClock {
            wall: Box::new(wall),
            state: Mutex::new(ClockSnapshot::default()),
        }
    }

    /// Freeze the clock at the current wall-clock instant.
    ///
    /// Calling `stop` on a frozen clock does nothing.
    pub fn stop(&self) {
        let mut state = lock(&self.state);
        if state.frozen_at.is_none() {
            let now = self.wall.unix_seconds();
            state.frozen_at = Some(now);
            debug!("clock frozen at wall time {now:.6}");
        }
    }

    /// Resume following the wall clock. The offset is kept.
    pub fn run(&self) {
        let mut state = lock(&self.state);
        if state.frozen_at.take().is_some() {
            debug!("clock resumed");
        }
    }

    /// Choose the offset so that the served time is `target` right now.
    ///
    /// The running/frozen state is unchanged. On error the clock is untouched.
    pub fn set(&self, target: impl Into<ClockTarget>) -> Result<(), DomainError> {
        let target = target.into().unix_seconds()?;
        let mut state = lock(&self.state);
        let offset = DomainError::check_finite(target - state.base(self.wall.as_ref()))?;
        state.offset = offset;
        debug!("clock set to {target:.6} (offset {offset:.6})");
        Ok(())
    }

    /// Serve wall-clock (or frozen) time shifted by `seconds`.
    ///
    /// The running/frozen state is unchanged. On error the clock is untouched.
    pub fn set_offset(&self, seconds: f64) -> Result<(), DomainError> {
        let seconds = DomainError::check_finite(seconds)?;
        lock(&self.state).offset = seconds;
        debug!("clock offset set to {seconds:.6}");
        Ok(())
    }

    /// The served time, in Unix seconds.
    pub fn now(&self) -> f64 {
        self.read().1
    }

    /// Whether the clock is frozen.
    pub fn is_frozen(&self) -> bool {
        lock(&self.state).is_frozen()
    }

    /// The current offset in seconds.
    pub fn offset(&self) -> f64 {
        lock(&self.state).offset
    }

    /// A consistent copy of `(offset, frozen_at)`.
    pub fn snapshot(&self) -> ClockSnapshot {
        *lock(&self.state)
    }

    /// One-line status: a pause or play glyph followed by the served instant
    /// in UTC.
    pub fn status(&self) -> String {
        let (snapshot, now) = self.read();
        let glyph = if snapshot.is_frozen() {
            PAUSED_GLYPH
        } else {
            RUNNING_GLYPH
        };
        match unix_time::unix_seconds_to_datetime(now) {
            Some(dt) => format!("{glyph}  {}", dt.format("%Y-%m-%d %H:%M:%S%.6f%:z")),
            None => format!("{glyph}  {now:.6}"),
        }
    }

    fn read(&self) -> (ClockSnapshot, f64) {
        let state = lock(&self.state);
        let now = state.base(self.wall.as_ref()) + state.offset;
        (*state, now)
    }
}
