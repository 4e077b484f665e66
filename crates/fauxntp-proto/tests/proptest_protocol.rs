use faux_proto::protocol::{
    ConstPackedSizeBytes, FromBytes, Packet, ReferenceIdentifier, ShortFormat, Stratum,
    TimestampFormat, ToBytes,
};
use faux_proto::unix_time::{EPOCH_DELTA, ERA_SECONDS};
use proptest::prelude::*;

/// Strategy that generates exactly 48 random bytes.
fn arb_48_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 48)
}

fn arb_timestamp() -> impl Strategy<Value = TimestampFormat> {
    any::<u64>().prop_map(TimestampFormat::from_bits)
}

fn arb_packet() -> impl Strategy<Value = Packet> {
    (
        any::<u8>(),
        any::<[u8; 4]>(),
        arb_timestamp(),
        arb_timestamp(),
        arb_timestamp(),
        arb_timestamp(),
    )
        .prop_map(|(stratum, id, reference, origin, receive, transmit)| Packet {
            stratum: Stratum(stratum),
            reference_id: ReferenceIdentifier(id),
            reference_timestamp: reference,
            origin_timestamp: origin,
            receive_timestamp: receive,
            transmit_timestamp: transmit,
        })
}

proptest! {
    #[test]
    fn short_format_roundtrip(seconds in any::<u16>(), fraction in any::<u16>()) {
        let sf = ShortFormat { seconds, fraction };
        let mut buf = [0u8; 4];
        prop_assert_eq!(sf.to_bytes(&mut buf).unwrap(), 4);
        let (parsed, consumed) = ShortFormat::from_bytes(&buf).unwrap();
        prop_assert_eq!(consumed, 4);
        prop_assert_eq!(sf, parsed);
    }

    #[test]
    fn packet_roundtrip(packet in arb_packet()) {
        let decoded = Packet::decode(&packet.encode()).unwrap();
        prop_assert_eq!(decoded, packet);
    }

    /// Every 48-byte buffer decodes: inbound header fields are never validated.
    #[test]
    fn any_48_bytes_decode(bytes in arb_48_bytes()) {
        let packet = Packet::decode(&bytes).unwrap();
        prop_assert_eq!(packet.stratum.0, bytes[1]);
        prop_assert_eq!(&packet.reference_id.0[..], &bytes[12..16]);
        prop_assert_eq!(&packet.encode()[12..], &bytes[12..]);
    }

    #[test]
    fn wrong_length_always_errors(len in (0usize..200).prop_filter("not 48", |l| *l != 48)) {
        let buf = vec![0u8; len];
        prop_assert!(Packet::decode(&buf).is_err());
    }

    #[test]
    fn encode_header_is_constant(packet in arb_packet()) {
        let buf = packet.encode();
        prop_assert_eq!(buf.len(), Packet::PACKED_SIZE_BYTES);
        prop_assert_eq!(&buf[..1], &[0x1c]);
        prop_assert_eq!(&buf[2..12], &[0, 0xec, 0, 0, 0, 0, 0, 0, 0, 5]);
    }

    /// Conversion recovers `t` within one fraction unit inside era 0 after the Unix epoch.
    #[test]
    fn unix_seconds_roundtrip(t in 0.0f64..((ERA_SECONDS - EPOCH_DELTA) as f64)) {
        let back = TimestampFormat::from_unix_seconds(t).unwrap().to_unix_seconds();
        prop_assert!((back - t).abs() <= 1.0 / 4_294_967_296.0, "t={} back={}", t, back);
    }

    /// Whole seconds are reduced modulo 2^32.
    #[test]
    fn era_shift_encodes_identically(secs in 0i64..(ERA_SECONDS - EPOCH_DELTA), quarter in 0u8..4) {
        let t = secs as f64 + quarter as f64 * 0.25;
        let a = TimestampFormat::from_unix_seconds(t).unwrap();
        let b = TimestampFormat::from_unix_seconds(t + ERA_SECONDS as f64).unwrap();
        prop_assert_eq!(a.to_be_bytes(), b.to_be_bytes());
    }
}
