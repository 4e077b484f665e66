// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use crate::error::FormatError;

use super::types::{header_byte, split_header_byte};
use super::{
    ConstPackedSizeBytes, FromBytes, Packet, PacketByte1, ReferenceIdentifier, ShortFormat,
    Stratum, TimestampFormat, ToBytes,
};

fn check_len(buf: &[u8], needed: usize) -> Result<(), FormatError> {
    if buf.len() < needed {
        return Err(FormatError::BufferTooShort {
            needed,
            available: buf.len(),
        });
    }
    Ok(())
}

impl FromBytes for ShortFormat {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;
        let seconds = u16::from_be_bytes([buf[0], buf[1]]);
        let fraction = u16::from_be_bytes([buf[2], buf[3]]);
        Ok((ShortFormat { seconds, fraction }, Self::PACKED_SIZE_BYTES))
    }
}

impl FromBytes for TimestampFormat {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;
        let seconds = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let fraction = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]);
        Ok((
            TimestampFormat { seconds, fraction },
            Self::PACKED_SIZE_BYTES,
        ))
    }
}

impl FromBytes for PacketByte1 {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;
        Ok((split_header_byte(buf[0]), 1))
    }
}

impl FromBytes for Packet {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;

        // LI/VN/Mode, poll, precision, root delay and root dispersion (bytes 0 and 2..12)
        // are not carried into the decoded packet.
        let stratum = Stratum(buf[1]);
        let reference_id = ReferenceIdentifier([buf[12], buf[13], buf[14], buf[15]]);

        let mut offset = 16;
        let (reference_timestamp, n) = TimestampFormat::from_bytes(&buf[offset..])?;
        offset += n;
        let (origin_timestamp, n) = TimestampFormat::from_bytes(&buf[offset..])?;
        offset += n;
        let (receive_timestamp, n) = TimestampFormat::from_bytes(&buf[offset..])?;
        offset += n;
        let (transmit_timestamp, n) = TimestampFormat::from_bytes(&buf[offset..])?;
        offset += n;

        Ok((
            Packet {
                stratum,
                reference_id,
                reference_timestamp,
                origin_timestamp,
                receive_timestamp,
                transmit_timestamp,
            },
            offset,
        ))
    }
}

// Buffer-based writer implementations (io-independent).

impl ToBytes for ShortFormat {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;
        buf[..4].copy_from_slice(&self.to_be_bytes());
        Ok(Self::PACKED_SIZE_BYTES)
    }
}

impl ToBytes for TimestampFormat {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;
        buf[..8].copy_from_slice(&self.to_be_bytes());
        Ok(Self::PACKED_SIZE_BYTES)
    }
}

impl ToBytes for PacketByte1 {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;
        buf[0] = header_byte(*self);
        Ok(1)
    }
}

impl ToBytes for Packet {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, FormatError> {
        let available = buf.len();
        match buf.first_chunk_mut::<{ Packet::PACKED_SIZE_BYTES }>() {
            Some(fixed) => {
                self.write_fixed(fixed);
                Ok(Self::PACKED_SIZE_BYTES)
            }
            None => Err(FormatError::BufferTooShort {
                needed: Self::PACKED_SIZE_BYTES,
                available,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{LeapIndicator, Mode, Version};

    fn sample_packet() -> Packet {
        Packet {
            stratum: Stratum(2),
            reference_id: ReferenceIdentifier(*b"XTST"),
            reference_timestamp: TimestampFormat {
                seconds: 3_913_056_000,
                fraction: 0xABCD_1234,
            },
            origin_timestamp: TimestampFormat {
                seconds: 3_913_056_001,
                fraction: 0x1111_2222,
            },
            receive_timestamp: TimestampFormat {
                seconds: 3_913_056_002,
                fraction: 0x3333_4444,
            },
            transmit_timestamp: TimestampFormat {
                seconds: 3_913_056_003,
                fraction: 0x5555_6666,
            },
        }
    }

    #[test]
    fn packet_to_bytes_matches_encode() {
        let pkt = sample_packet();
        let mut buf = [0u8; 64];
        let written = pkt.to_bytes(&mut buf).unwrap();
        assert_eq!(written, Packet::PACKED_SIZE_BYTES);
        assert_eq!(&buf[..48], &pkt.encode()[..]);
        assert!(buf[48..].iter().all(|&b| b == 0));
    }

    #[test]
    fn packet_to_bytes_short_buffer() {
        let mut buf = [0u8; 20];
        assert_eq!(
            sample_packet().to_bytes(&mut buf),
            Err(FormatError::BufferTooShort {
                needed: 48,
                available: 20
            })
        );
    }

    #[test]
    fn packet_from_bytes_consumes_48() {
        let pkt = sample_packet();
        let mut buf = [0u8; 60];
        pkt.to_bytes(&mut buf).unwrap();
        let (parsed, consumed) = Packet::from_bytes(&buf).unwrap();
        assert_eq!(consumed, 48);
        assert_eq!(parsed, pkt);
    }

    #[test]
    fn timestamp_from_short_buffer() {
        assert_eq!(
            TimestampFormat::from_bytes(&[1, 2, 3]),
            Err(FormatError::BufferTooShort {
                needed: 8,
                available: 3
            })
        );
    }

    #[test]
    fn header_byte_from_bytes() {
        let ((li, vn, mode), n) = PacketByte1::from_bytes(&[0x23]).unwrap();
        assert_eq!(n, 1);
        assert_eq!(li, LeapIndicator::NoWarning);
        assert_eq!(vn, Version(4));
        assert_eq!(mode, Mode::Client);
        assert!(PacketByte1::from_bytes(&[]).is_err());
    }

    #[test]
    fn short_format_to_bytes() {
        let sf = ShortFormat {
            seconds: 0x0102,
            fraction: 0x0304,
        };
        let mut buf = [0u8; 4];
        assert_eq!(sf.to_bytes(&mut buf), Ok(4));
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(ShortFormat::from_bytes(&buf), Ok((sf, 4)));
    }
}
