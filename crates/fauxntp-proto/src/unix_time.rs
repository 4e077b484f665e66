// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Conversion between real-valued Unix time and NTP fixed-point timestamps.
//!
//! Unix time is carried as `f64` seconds since 1970-01-01 00:00:00 UTC, which is what the
//! virtual clock serves. The integral and fractional parts are converted separately so that
//! adding [`EPOCH_DELTA`] never rounds away sub-second precision.
//!
//! ## Example
//!
//! ```
//! use faux_proto::protocol::TimestampFormat;
//!
//! let ts = TimestampFormat::from_unix_seconds(1_700_000_000.5).unwrap();
//! assert_eq!(ts.seconds, 3_908_988_800);
//! assert_eq!(ts.fraction, 1 << 31);
//! assert_eq!(ts.to_unix_seconds(), 1_700_000_000.5);
//! ```

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::DomainError;
use crate::protocol::TimestampFormat;

/// The number of seconds from 1st January 1900 UTC to the start of the Unix epoch.
pub const EPOCH_DELTA: i64 = 2_208_988_800;

/// The number of seconds in one NTP era (2^32 seconds, approximately 136 years).
///
/// Era 0 spans from 1900-01-01 00:00:00 UTC to 2036-02-07 06:28:15 UTC.
/// Era 1 begins at 2036-02-07 06:28:16 UTC.
pub const ERA_SECONDS: i64 = 4_294_967_296; // 1i64 << 32

// 2^32 as a float: the fixed-point scale of the fraction field.
const FRACTION_SCALE: f64 = 4_294_967_296.0;

impl TimestampFormat {
    /// Convert real-valued Unix seconds to an NTP timestamp.
    ///
    /// The whole-second part is shifted to the 1900 epoch and reduced modulo 2^32, so
    /// `t` and `t + 2^32` encode identically and instants before 1900 wrap into the
    /// era. The fraction is truncated to a multiple of 2^-32 s.
    ///
    /// Fails with [`DomainError::NonFinite`] for NaN or infinite input.
    pub fn from_unix_seconds(t: f64) -> Result<Self, DomainError> {
        let t = DomainError::check_finite(t)?;
        let mut whole = t.floor();
        let mut scaled = (t - whole) * FRACTION_SCALE;
        // A tiny negative `t` leaves `t - whole` rounded up to exactly 1.0.
        if scaled >= FRACTION_SCALE {
            whole += 1.0;
            scaled = 0.0;
        }

        // `rem_euclid` on integral floats is exact, so no intermediate ever exceeds 2^33.
        let era_offset = (whole.rem_euclid(FRACTION_SCALE) + EPOCH_DELTA as f64)
            .rem_euclid(FRACTION_SCALE);

        Ok(TimestampFormat {
            seconds: era_offset as u32,
            fraction: scaled as u32,
        })
    }

    /// Convert the timestamp back to real-valued Unix seconds, assuming era 0.
    ///
    /// Values from era 1 (after February 2036) come back 2^32 seconds early.
    pub fn to_unix_seconds(&self) -> f64 {
        (self.seconds as i64 - EPOCH_DELTA) as f64 + self.fraction as f64 / FRACTION_SCALE
    }
}

// Calendar conversions.

impl TimestampFormat {
    /// Convert a UTC calendar instant to an NTP timestamp.
    ///
    /// Works from the instant's integral seconds and nanoseconds rather than a float, so
    /// no precision is lost for instants far from the Unix epoch.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let secs = dt.timestamp();
        let nanos = dt.timestamp_subsec_nanos() as u64;
        TimestampFormat {
            seconds: (secs + EPOCH_DELTA).rem_euclid(ERA_SECONDS) as u32,
            fraction: ((nanos << 32) / 1_000_000_000) as u32,
        }
    }

    /// Convert the timestamp to a UTC calendar instant, assuming era 0.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        let secs = self.seconds as i64 - EPOCH_DELTA;
        let nanos = ((self.fraction as u64 * 1_000_000_000) >> 32) as i64;
        DateTime::UNIX_EPOCH + TimeDelta::seconds(secs) + TimeDelta::nanoseconds(nanos)
    }
}

/// Render real-valued Unix seconds as a UTC calendar instant.
///
/// Returns `None` when the value is not finite or falls outside chrono's range.
pub fn unix_seconds_to_datetime(t: f64) -> Option<DateTime<Utc>> {
    if !t.is_finite() {
        return None;
    }
    let whole = t.floor();
    let nanos = ((t - whole) * 1e9) as u32;
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

/// Convert a UTC calendar instant to real-valued Unix seconds.
pub fn datetime_to_unix_seconds(dt: DateTime<Utc>) -> f64 {
    dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 / 1e9
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const ULP: f64 = 1.0 / FRACTION_SCALE;

    #[test]
    fn unix_epoch_maps_to_epoch_delta() {
        let ts = TimestampFormat::from_unix_seconds(0.0).unwrap();
        assert_eq!(ts.seconds, EPOCH_DELTA as u32);
        assert_eq!(ts.fraction, 0);
        assert_eq!(ts.to_unix_seconds(), 0.0);
    }

    #[test]
    fn ntp_epoch_is_all_zero() {
        let ts = TimestampFormat::from_unix_seconds(-(EPOCH_DELTA as f64)).unwrap();
        assert_eq!(ts.to_bits(), 0);
    }

    #[test]
    fn known_instant_2024() {
        // 2024-01-01 00:00:00 UTC: Unix=1704067200, NTP=3913056000
        let ts = TimestampFormat::from_unix_seconds(1_704_067_200.25).unwrap();
        assert_eq!(ts.seconds, 3_913_056_000);
        assert_eq!(ts.fraction, 1 << 30);
    }

    #[test]
    fn fraction_is_truncated() {
        let ts = TimestampFormat::from_unix_seconds(0.1).unwrap();
        // 0.1 * 2^32 = 429496729.6
        assert_eq!(ts.fraction, 429_496_729);
        assert!((ts.to_unix_seconds() - 0.1).abs() <= ULP);
    }

    #[test]
    fn roundtrip_within_one_fraction_unit() {
        for t in [0.0, 0.5, 1.0e-9, 123_456.789, 1_700_000_000.123_456, 2_085_978_495.999] {
            let back = TimestampFormat::from_unix_seconds(t)
                .unwrap()
                .to_unix_seconds();
            assert!((back - t).abs() <= ULP, "t={t} back={back}");
        }
    }

    #[test]
    fn wraps_at_era_boundary() {
        // Last second of era 0, then the first second of era 1.
        let last = (ERA_SECONDS - 1 - EPOCH_DELTA) as f64;
        let ts = TimestampFormat::from_unix_seconds(last).unwrap();
        assert_eq!(ts.seconds, u32::MAX);

        let ts = TimestampFormat::from_unix_seconds(last + 1.0).unwrap();
        assert_eq!(ts.seconds, 0);
    }

    #[test]
    fn shifted_by_one_era_encodes_identically() {
        let t = 1_700_000_000.25;
        let a = TimestampFormat::from_unix_seconds(t).unwrap();
        let b = TimestampFormat::from_unix_seconds(t + ERA_SECONDS as f64).unwrap();
        let c = TimestampFormat::from_unix_seconds(t - ERA_SECONDS as f64).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn negative_fraction_borrows_from_seconds() {
        let ts = TimestampFormat::from_unix_seconds(-0.5).unwrap();
        assert_eq!(ts.seconds, EPOCH_DELTA as u32 - 1);
        assert_eq!(ts.fraction, 1 << 31);
        assert_eq!(ts.to_unix_seconds(), -0.5);
    }

    #[test]
    fn before_1900_wraps_into_era() {
        let ts = TimestampFormat::from_unix_seconds(-(EPOCH_DELTA as f64) - 1.0).unwrap();
        assert_eq!(ts.seconds, u32::MAX);
    }

    #[test]
    fn non_finite_is_rejected() {
        for t in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                TimestampFormat::from_unix_seconds(t),
                Err(DomainError::NonFinite { .. })
            ));
        }
    }

    #[test]
    fn huge_finite_values_do_not_panic() {
        let ts = TimestampFormat::from_unix_seconds(1.0e300).unwrap();
        let again = TimestampFormat::from_unix_seconds(-1.0e300).unwrap();
        assert_eq!(ts.fraction, 0);
        assert_eq!(again.fraction, 0);
    }

    #[test]
    fn tiny_negative_carries_into_whole_seconds() {
        let ts = TimestampFormat::from_unix_seconds(-1e-20).unwrap();
        assert_eq!(ts.seconds, EPOCH_DELTA as u32);
        assert_eq!(ts.fraction, 0);
        assert_eq!(ts.to_unix_seconds(), 0.0);

        let ts = TimestampFormat::from_unix_seconds(1_000.0 - 1e-9).unwrap();
        assert_eq!(ts.seconds, (EPOCH_DELTA + 999) as u32);
        assert!(ts.fraction > 0xFFFF_0000);
    }

    #[test]
    fn datetime_conversion() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let ts = TimestampFormat::from_datetime(dt);
        assert_eq!(ts.seconds, 3_913_056_000);
        assert_eq!(ts.fraction, 0);
        assert_eq!(ts.to_datetime(), dt);
        assert_eq!(datetime_to_unix_seconds(dt), 1_704_067_200.0);
    }

    #[test]
    fn datetime_subsecond_conversion() {
        let dt = Utc.timestamp_opt(1_704_067_200, 500_000_000).unwrap();
        let ts = TimestampFormat::from_datetime(dt);
        assert_eq!(ts.fraction, 1 << 31);
        assert_eq!(ts.to_datetime(), dt);
    }

    #[test]
    fn unix_seconds_render_as_datetime() {
        let dt = unix_seconds_to_datetime(1_700_000_000.0).unwrap();
        assert_eq!(dt.to_rfc3339(), "2023-11-14T22:13:20+00:00");
        assert!(unix_seconds_to_datetime(f64::NAN).is_none());
        assert!(unix_seconds_to_datetime(1.0e300).is_none());
    }
}
