use std::fmt;

use crate::error::{PacketError, Result};

/// A `major.minor` protocol version packed into one byte as `major << 4 | minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

impl ProtocolVersion {
    /// Version carried by discovery and command envelopes (0x30).
    pub const V3_0: Self = Self { major: 3, minor: 0 };

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Encode to the wire byte. Fails if either component exceeds 15.
    pub fn to_byte(self) -> Result<u8> {
        encode_version_byte(self.major, self.minor)
    }

    /// Decode from the wire byte. Every byte is a valid version.
    pub fn from_byte(byte: u8) -> Self {
        let (major, minor) = decode_version_byte(byte);
        Self { major, minor }
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::V3_0
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Pack `major` and `minor` into the high and low nibble of one byte.
pub fn encode_version_byte(major: u8, minor: u8) -> Result<u8> {
    if major > 0x0F {
        return Err(PacketError::VersionOutOfRange {
            field: "major",
            value: major,
        });
    }
    if minor > 0x0F {
        return Err(PacketError::VersionOutOfRange {
            field: "minor",
            value: minor,
        });
    }
    Ok((major << 4) | minor)
}

/// Split a version byte into `(major, minor)`.
pub fn decode_version_byte(byte: u8) -> (u8, u8) {
    (byte >> 4, byte & 0x0F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_values() {
        assert_eq!(encode_version_byte(3, 0).unwrap(), 0x30);
        assert_eq!(encode_version_byte(0, 0).unwrap(), 0x00);
        assert_eq!(encode_version_byte(15, 15).unwrap(), 0xFF);
    }

    #[test]
    fn out_of_range_components_fail() {
        assert!(matches!(
            encode_version_byte(16, 0),
            Err(PacketError::VersionOutOfRange { field: "major", value: 16 })
        ));
        assert!(matches!(
            encode_version_byte(0, 200),
            Err(PacketError::VersionOutOfRange { field: "minor", value: 200 })
        ));
    }

    #[test]
    fn exhaustive_nibble_round_trip() {
        for major in 0..=15u8 {
            for minor in 0..=15u8 {
                let byte = encode_version_byte(major, minor).unwrap();
                assert_eq!(decode_version_byte(byte), (major, minor));
            }
        }
    }

    #[test]
    fn protocol_version_display_and_default() {
        assert_eq!(ProtocolVersion::default().to_string(), "3.0");
        assert_eq!(ProtocolVersion::from_byte(0x21), ProtocolVersion::new(2, 1));
        assert_eq!(ProtocolVersion::V3_0.to_byte().unwrap(), 0x30);
    }
}
