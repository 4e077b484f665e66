// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use core::fmt;

use super::ConstPackedSizeBytes;
use crate::error::FormatError;

/// **NTP Short Format** - Used in delay and dispersion header fields where the full resolution and
/// range of the other formats are not justified. It includes a 16-bit unsigned seconds field and a
/// 16-bit fraction field.
///
/// ### Layout
///
/// ```ignore
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          Seconds              |           Fraction            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ShortFormat {
    /// Seconds component (16-bit unsigned).
    pub seconds: u16,
    /// Fractional seconds component (16-bit unsigned).
    pub fraction: u16,
}

/// **NTP Timestamp Format** - A 32-bit unsigned seconds field spanning 136 years and a 32-bit
/// fraction field resolving 232 picoseconds.
///
/// The prime epoch is 0 h 1 January 1900 UTC, when all bits are zero. The seconds field rolls
/// over every 2^32 seconds (first in February 2036); see [`crate::unix_time`] for conversion to
/// and from Unix time.
///
/// ### Layout
///
/// ```ignore
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            Seconds                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            Fraction                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimestampFormat {
    /// Seconds since 1900-01-01 00:00:00 UTC, modulo 2^32.
    pub seconds: u32,
    /// Fractional seconds (32-bit unsigned, resolution of ~232 picoseconds).
    pub fraction: u32,
}

/// A 2-bit integer warning of an impending leap second to be inserted or deleted in the last
/// minute of the current month.
///
/// Note that this field is packed in the actual header.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum LeapIndicator {
    /// No leap required.
    #[default]
    NoWarning = 0,
    /// Last minute of the day has 61 seconds.
    AddOne = 1,
    /// Last minute of the day has 59 seconds.
    SubOne = 2,
    /// Clock unsynchronized.
    Unknown = 3,
}

impl From<u8> for LeapIndicator {
    /// Decodes the low two bits; the upper bits are ignored.
    fn from(value: u8) -> Self {
        match value & 0b11 {
            0 => LeapIndicator::NoWarning,
            1 => LeapIndicator::AddOne,
            2 => LeapIndicator::SubOne,
            _ => LeapIndicator::Unknown,
        }
    }
}

/// A 3-bit integer representing the NTP version number.
///
/// Note that while this struct is 8-bits, this field is packed to 3 in the actual header.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Version(pub(super) u8);

/// A 3-bit integer representing the association mode.
///
/// Note that while this enum is 8-bits, this field is packed to 3 in the actual header.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Reserved mode (value 0).
    Reserved = 0,
    /// Symmetric active mode (value 1).
    SymmetricActive = 1,
    /// Symmetric passive mode (value 2).
    SymmetricPassive = 2,
    /// Client mode (value 3).
    #[default]
    Client = 3,
    /// Server mode (value 4).
    Server = 4,
    /// Broadcast mode (value 5).
    Broadcast = 5,
    /// NTP control message mode (value 6).
    NtpControlMessage = 6,
    /// Reserved for private use (value 7).
    ReservedForPrivateUse = 7,
}

impl From<u8> for Mode {
    /// Decodes the low three bits; the upper bits are ignored.
    fn from(value: u8) -> Self {
        match value & 0b111 {
            0 => Mode::Reserved,
            1 => Mode::SymmetricActive,
            2 => Mode::SymmetricPassive,
            3 => Mode::Client,
            4 => Mode::Server,
            5 => Mode::Broadcast,
            6 => Mode::NtpControlMessage,
            _ => Mode::ReservedForPrivateUse,
        }
    }
}

/// An 8-bit integer representing the stratum.
///
/// ```ignore
/// +--------+-----------------------------------------------------+
/// | Value  | Meaning                                             |
/// +--------+-----------------------------------------------------+
/// | 0      | unspecified or invalid                              |
/// | 1      | primary server (e.g., equipped with a GPS receiver) |
/// | 2-15   | secondary server (via NTP)                          |
/// | 16     | unsynchronized                                      |
/// | 17-255 | reserved                                            |
/// +--------+-----------------------------------------------------+
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Stratum(pub u8);

/// A 4-octet code identifying the reference clock.
///
/// For stratum 1 this is a left-justified, zero-padded ASCII string. fauxntp advertises
/// [`ReferenceIdentifier::FAUX`] unless configured otherwise. Any string beginning with the ASCII
/// character "X" is reserved for unregistered experimentation and development.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ReferenceIdentifier(pub [u8; 4]);

/// **Packet Header** - the fixed 12-word NTP packet as emitted by fauxntp.
///
/// Only the stratum, the reference identifier and the four timestamps vary between packets.
/// The leap indicator, version, mode, poll, precision, root delay and root dispersion fields
/// are written as the associated constants on every encode, and are skipped (not validated)
/// on decode.
///
/// ```ignore
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |LI | VN  |Mode |    Stratum     |     Poll      |  Precision   |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         Root Delay                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         Root Dispersion                       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          Reference ID                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                     Reference Timestamp (64)                  +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                      Origin Timestamp (64)                    +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                      Receive Timestamp (64)                   +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                      Transmit Timestamp (64)                  +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Packet {
    /// Stratum level of the time source.
    pub stratum: Stratum,
    /// Reference identifier of the time source.
    pub reference_id: ReferenceIdentifier,
    /// Time when the system clock was last set or corrected.
    pub reference_timestamp: TimestampFormat,
    /// Time at the client when the request departed for the server.
    pub origin_timestamp: TimestampFormat,
    /// Time at the server when the request arrived from the client.
    pub receive_timestamp: TimestampFormat,
    /// Time at the server when the response left for the client.
    pub transmit_timestamp: TimestampFormat,
}

/// The consecutive types within the first packed byte in the NTP packet.
pub type PacketByte1 = (LeapIndicator, Version, Mode);

// Inherent implementations.

impl TimestampFormat {
    /// Build a timestamp from its raw 64-bit fixed-point value.
    pub const fn from_bits(bits: u64) -> Self {
        TimestampFormat {
            seconds: (bits >> 32) as u32,
            fraction: bits as u32,
        }
    }

    /// The raw 64-bit fixed-point value (seconds in the upper half).
    pub const fn to_bits(self) -> u64 {
        ((self.seconds as u64) << 32) | self.fraction as u64
    }

    /// Network byte order representation.
    pub const fn to_be_bytes(self) -> [u8; 8] {
        self.to_bits().to_be_bytes()
    }

    /// Build a timestamp from its network byte order representation.
    pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self::from_bits(u64::from_be_bytes(bytes))
    }
}

impl ShortFormat {
    /// Network byte order representation.
    pub const fn to_be_bytes(self) -> [u8; 4] {
        let s = self.seconds.to_be_bytes();
        let f = self.fraction.to_be_bytes();
        [s[0], s[1], f[0], f[1]]
    }
}

impl ReferenceIdentifier {
    /// The identifier fauxntp advertises by default.
    pub const FAUX: Self = ReferenceIdentifier(*b"FAUX");

    /// Returns the raw 4-byte representation of the reference identifier.
    pub fn as_bytes(&self) -> [u8; 4] {
        self.0
    }
}

impl Version {
    /// NTP version 3, the version fauxntp advertises.
    pub const V3: Self = Version(3);
}

impl Stratum {
    /// Unspecified or invalid.
    pub const UNSPECIFIED: Self = Stratum(0);
    /// The primary server (e.g. equipped with a GPS receiver).
    pub const PRIMARY: Self = Stratum(1);
}

impl Packet {
    /// Header byte 1 of every encoded packet: no leap warning, NTPv3, server mode (`0x1c`).
    pub const HEADER: PacketByte1 = (LeapIndicator::NoWarning, Version::V3, Mode::Server);
    /// Poll exponent written on every encoded packet.
    pub const POLL: i8 = 0;
    /// Precision exponent written on every encoded packet (about one microsecond).
    pub const PRECISION: i8 = -20;
    /// Root delay written on every encoded packet.
    pub const ROOT_DELAY: ShortFormat = ShortFormat {
        seconds: 0,
        fraction: 0,
    };
    /// Root dispersion written on every encoded packet (5/65536 s).
    pub const ROOT_DISPERSION: ShortFormat = ShortFormat {
        seconds: 0,
        fraction: 5,
    };

    /// Serialize the packet into its 48-byte wire form.
    ///
    /// Header fields other than stratum and reference identifier are always the associated
    /// constants of [`Packet`].
    pub fn encode(&self) -> [u8; Packet::PACKED_SIZE_BYTES] {
        let mut buf = [0u8; Packet::PACKED_SIZE_BYTES];
        self.write_fixed(&mut buf);
        buf
    }

    /// Parse a packet from exactly 48 bytes.
    ///
    /// Shorter or longer buffers are rejected. The leap indicator, version, mode, poll,
    /// precision, root delay and root dispersion of the inbound packet are not inspected.
    pub fn decode(buf: &[u8]) -> Result<Self, FormatError> {
        if buf.len() > Self::PACKED_SIZE_BYTES {
            return Err(FormatError::TrailingBytes {
                expected: Self::PACKED_SIZE_BYTES,
                received: buf.len(),
            });
        }
        let (packet, _) = <Self as super::FromBytes>::from_bytes(buf)?;
        Ok(packet)
    }

    pub(super) fn write_fixed(&self, buf: &mut [u8; Packet::PACKED_SIZE_BYTES]) {
        buf[0] = header_byte(Self::HEADER);
        buf[1] = self.stratum.0;
        buf[2] = Self::POLL as u8;
        buf[3] = Self::PRECISION as u8;
        buf[4..8].copy_from_slice(&Self::ROOT_DELAY.to_be_bytes());
        buf[8..12].copy_from_slice(&Self::ROOT_DISPERSION.to_be_bytes());
        buf[12..16].copy_from_slice(&self.reference_id.0);
        buf[16..24].copy_from_slice(&self.reference_timestamp.to_be_bytes());
        buf[24..32].copy_from_slice(&self.origin_timestamp.to_be_bytes());
        buf[32..40].copy_from_slice(&self.receive_timestamp.to_be_bytes());
        buf[40..48].copy_from_slice(&self.transmit_timestamp.to_be_bytes());
    }
}

/// Pack leap indicator, version and mode into the first header byte.
pub(super) fn header_byte((li, vn, mode): PacketByte1) -> u8 {
    ((li as u8) << 6) | ((vn.0 & 0b111) << 3) | mode as u8
}

/// Unpack the first header byte. Every bit pattern is accepted.
pub(super) fn split_header_byte(byte: u8) -> PacketByte1 {
    (
        LeapIndicator::from(byte >> 6),
        Version((byte >> 3) & 0b111),
        Mode::from(byte),
    )
}

// Size implementations.

impl ConstPackedSizeBytes for ShortFormat {
    const PACKED_SIZE_BYTES: usize = 4;
}

impl ConstPackedSizeBytes for TimestampFormat {
    const PACKED_SIZE_BYTES: usize = 8;
}

impl ConstPackedSizeBytes for Stratum {
    const PACKED_SIZE_BYTES: usize = 1;
}

impl ConstPackedSizeBytes for ReferenceIdentifier {
    const PACKED_SIZE_BYTES: usize = 4;
}

impl ConstPackedSizeBytes for PacketByte1 {
    const PACKED_SIZE_BYTES: usize = 1;
}

impl ConstPackedSizeBytes for Packet {
    const PACKED_SIZE_BYTES: usize = PacketByte1::PACKED_SIZE_BYTES
        + Stratum::PACKED_SIZE_BYTES
        + 2
        + ShortFormat::PACKED_SIZE_BYTES * 2
        + ReferenceIdentifier::PACKED_SIZE_BYTES
        + TimestampFormat::PACKED_SIZE_BYTES * 4;
}

// Default implementations.

impl Default for Version {
    /// Defaults to NTPv3, the version fauxntp advertises.
    fn default() -> Self {
        Version::V3
    }
}

impl Default for ReferenceIdentifier {
    fn default() -> Self {
        ReferenceIdentifier::FAUX
    }
}

impl Default for Packet {
    /// Stratum 1, reference `FAUX`, all timestamps zero.
    fn default() -> Self {
        Packet {
            stratum: Stratum::PRIMARY,
            reference_id: ReferenceIdentifier::default(),
            reference_timestamp: TimestampFormat::default(),
            origin_timestamp: TimestampFormat::default(),
            receive_timestamp: TimestampFormat::default(),
            transmit_timestamp: TimestampFormat::default(),
        }
    }
}

// Display implementations.

impl fmt::Display for ReferenceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &b in &self.0 {
            if b == 0 {
                break;
            }
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "?")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:08x}.{:08x}", self.seconds, self.fraction)
    }
}
