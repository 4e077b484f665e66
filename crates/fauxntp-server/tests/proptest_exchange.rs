// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Property tests for the exchange handler.

use faux_server::clock::{ManualWallClock, VirtualClock};
use faux_server::exchange::{ServerIdentity, handle};
use faux_server::protocol::TimestampFormat;
use proptest::prelude::*;

proptest! {
    /// The reply's origin timestamp is the request's transmit timestamp, byte
    /// for byte, whatever else the request contains.
    #[test]
    fn origin_echoes_transmit(
        request in prop::collection::vec(any::<u8>(), 48),
        wall in -1e10f64..1e10,
        offset in -1e10f64..1e10,
        frozen in any::<bool>(),
    ) {
        let clock = VirtualClock::with_wall_clock(ManualWallClock::new(wall));
        clock.set_offset(offset).unwrap();
        if frozen {
            clock.stop();
        }

        let reply = handle(&request, &clock, &ServerIdentity::default()).unwrap();
        prop_assert_eq!(&reply[24..32], &request[40..48]);
    }

    /// Reference, receive and transmit timestamps come from one clock reading.
    #[test]
    fn served_timestamps_identical(wall in 0f64..4e9, offset in -1e9f64..1e9) {
        let clock = VirtualClock::with_wall_clock(ManualWallClock::new(wall));
        clock.set_offset(offset).unwrap();

        let reply = handle(&[0u8; 48], &clock, &ServerIdentity::default()).unwrap();
        prop_assert_eq!(&reply[16..24], &reply[32..40]);
        prop_assert_eq!(&reply[32..40], &reply[40..48]);

        let expected = TimestampFormat::from_unix_seconds(wall + offset).unwrap();
        prop_assert_eq!(&reply[40..48], &expected.to_be_bytes()[..]);
    }

    /// Anything but exactly 48 bytes gets no reply.
    #[test]
    fn wrong_length_never_answered(len in (0usize..2048).prop_filter("not 48", |l| *l != 48)) {
        let clock = VirtualClock::with_wall_clock(ManualWallClock::new(0.0));
        prop_assert!(handle(&vec![0u8; len], &clock, &ServerIdentity::default()).is_err());
    }
}
