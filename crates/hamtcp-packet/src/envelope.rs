use bytes::Bytes;
use hamtcp_codec::{Reader, Writer};

use crate::error::{u16_len, Result};
use crate::version::ProtocolVersion;

/// Bytes of the envelope that precede the options block.
pub const ENVELOPE_HEADER_SIZE: usize = 6;

/// The outermost frame of every packet on the wire.
///
/// ```text
/// ┌────────────┬──────────┬─────────┬─────────────┬─────────┬─────────┐
/// │ Size (2B)  │ Protocol │ Version │ OptLen (2B) │ Options │ Payload │
/// │ LE         │ (1B)     │ (1B)    │ LE          │         │         │
/// └────────────┴──────────┴─────────┴─────────────┴─────────┴─────────┘
/// ```
///
/// `size` counts everything after itself and is recomputed on every pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEnvelope {
    pub protocol: u8,
    pub version: ProtocolVersion,
    pub options: Bytes,
    pub payload: Bytes,
}

impl TransportEnvelope {
    /// Create an envelope with the standard 3.0 version and no options.
    pub fn new(protocol: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            protocol,
            version: ProtocolVersion::V3_0,
            options: Bytes::new(),
            payload: payload.into(),
        }
    }

    pub fn with_options(mut self, options: impl Into<Bytes>) -> Self {
        self.options = options.into();
        self
    }

    /// Value of the wire `size` field for this envelope.
    pub fn size(&self) -> Result<u16> {
        u16_len("envelope size", 1 + 1 + 2 + self.options.len() + self.payload.len())
    }

    /// True when the version matches what discovery and command traffic use.
    ///
    /// Firmware has been seen sending other values, so a mismatch is only
    /// advisory.
    pub fn is_expected_version(&self) -> bool {
        self.version == ProtocolVersion::V3_0
    }

    pub fn pack(&self) -> Result<Bytes> {
        let size = self.size()?;
        let options_len = u16_len("envelope options", self.options.len())?;
        let mut w = Writer::new();
        w.u16(size)
            .u8(self.protocol)
            .u8(self.version.to_byte()?)
            .u16(options_len)
            .raw_bytes(&self.options)
            .raw_bytes(&self.payload);
        Ok(w.finish())
    }

    pub fn unpack(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        let size = r.u16()?;
        let protocol = r.u8()?;
        let version = ProtocolVersion::from_byte(r.u8()?);
        let options_len = r.u16()? as usize;
        let options = Bytes::copy_from_slice(r.raw_bytes(options_len)?);
        let payload = Bytes::copy_from_slice(r.remaining());

        let actual = data.len() - 2;
        if usize::from(size) != actual {
            tracing::debug!(
                declared = size,
                actual,
                "transport envelope size field does not match buffer"
            );
        }
        if version != ProtocolVersion::V3_0 {
            tracing::warn!(
                %version,
                protocol,
                "transport envelope carries unexpected protocol version"
            );
        }

        Ok(Self {
            protocol,
            version,
            options,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use hamtcp_codec::CodecError;

    use super::*;
    use crate::error::PacketError;
    use crate::protocol::transport;

    #[test]
    fn packs_seed_envelope() {
        let env = TransportEnvelope::new(transport::OBJECT_DISCOVERY, &b"\x01\x02\x03"[..]);
        assert_eq!(
            env.pack().unwrap().as_ref(),
            &[0x07, 0x00, 0x06, 0x30, 0x00, 0x00, 0x01, 0x02, 0x03]
        );
    }

    #[test]
    fn size_counts_options() {
        let env = TransportEnvelope::new(transport::REGISTRATION, &b"xy"[..])
            .with_options(&b"\xAA\xBB\xCC"[..]);
        assert_eq!(env.size().unwrap(), 9);
        let packed = env.pack().unwrap();
        assert_eq!(&packed[4..6], &[3, 0]);
        assert_eq!(TransportEnvelope::unpack(&packed).unwrap(), env);
    }

    #[test]
    fn version_mismatch_is_not_fatal() {
        let data = [0x05, 0x00, 0x07, 0x00, 0x00, 0x00, 0xEE];
        let env = TransportEnvelope::unpack(&data).unwrap();
        assert_eq!(env.version, ProtocolVersion::new(0, 0));
        assert!(!env.is_expected_version());
        assert_eq!(env.payload.as_ref(), &[0xEE]);
    }

    #[test]
    fn wrong_size_field_is_tolerated() {
        let data = [0xFF, 0x00, 0x06, 0x30, 0x00, 0x00, 0x01];
        let env = TransportEnvelope::unpack(&data).unwrap();
        assert_eq!(env.payload.as_ref(), &[0x01]);
    }

    #[test]
    fn truncated_options_fail() {
        let data = [0x08, 0x00, 0x06, 0x30, 0x04, 0x00, 0x01];
        assert!(matches!(
            TransportEnvelope::unpack(&data),
            Err(PacketError::Codec(CodecError::InsufficientData {
                offset: 6,
                needed: 4,
                available: 1
            }))
        ));
    }

    #[test]
    fn empty_input_fails() {
        assert!(matches!(
            TransportEnvelope::unpack(&[]),
            Err(PacketError::Codec(CodecError::InsufficientData { offset: 0, .. }))
        ));
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let env = TransportEnvelope::new(transport::OBJECT_DISCOVERY, vec![0u8; 65_532]);
        assert!(matches!(
            env.pack(),
            Err(PacketError::LengthOverflow { field: "envelope size", .. })
        ));
    }

    #[test]
    fn invalid_version_is_rejected_on_pack() {
        let mut env = TransportEnvelope::new(transport::OBJECT_DISCOVERY, Bytes::new());
        env.version = ProtocolVersion::new(16, 0);
        assert!(matches!(env.pack(), Err(PacketError::VersionOutOfRange { .. })));
    }
}
