use bytes::Bytes;
use hamtcp_codec::{Reader, Writer};

use crate::action::{decode_action, encode_action};
use crate::address::Address;
use crate::error::{u16_len, Result};

/// Bytes before the options block: two addresses, seq, reserved, protocol,
/// action, message length and options length.
pub const HARP_HEADER_SIZE: usize = 20;

/// Version and reserved bytes that follow the options block.
const HARP_TRAILER_SIZE: usize = 2;

/// The addressed frame (HARP): routing, sequencing and sub-protocol selection.
///
/// The version byte after the options is always written as 0, not the
/// envelope's 0x30. Firmware expects 0 here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarpFrame {
    pub src: Address,
    pub dst: Address,
    pub seq: u8,
    /// HARP protocol selector, see [`crate::protocol::harp`].
    pub protocol: u8,
    /// Four-bit action code.
    pub action_code: u8,
    pub response_required: bool,
    pub options: Bytes,
    pub payload: Bytes,
}

impl HarpFrame {
    pub fn new(src: Address, dst: Address, seq: u8, protocol: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            src,
            dst,
            seq,
            protocol,
            action_code: 0,
            response_required: false,
            options: Bytes::new(),
            payload: payload.into(),
        }
    }

    pub fn with_action(mut self, action_code: u8, response_required: bool) -> Self {
        self.action_code = action_code;
        self.response_required = response_required;
        self
    }

    pub fn with_options(mut self, options: impl Into<Bytes>) -> Self {
        self.options = options.into();
        self
    }

    /// Value of the wire message-length field.
    pub fn message_length(&self) -> Result<u16> {
        u16_len(
            "harp message length",
            HARP_HEADER_SIZE + self.options.len() + HARP_TRAILER_SIZE + self.payload.len(),
        )
    }

    pub fn pack(&self) -> Result<Bytes> {
        let action = encode_action(self.action_code, self.response_required)?;
        let msg_len = self.message_length()?;
        let options_len = u16_len("harp options", self.options.len())?;

        let mut w = Writer::new();
        self.src.write(&mut w);
        self.dst.write(&mut w);
        w.u8(self.seq)
            .u8(0)
            .u8(self.protocol)
            .u8(action)
            .u16(msg_len)
            .u16(options_len)
            .raw_bytes(&self.options)
            .u8(0)
            .u8(0)
            .raw_bytes(&self.payload);
        Ok(w.finish())
    }

    pub fn unpack(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        let src = Address::read(&mut r)?;
        let dst = Address::read(&mut r)?;
        let seq = r.u8()?;
        let _reserved = r.u8()?;
        let protocol = r.u8()?;
        let (action_code, response_required) = decode_action(r.u8()?);
        let msg_len = r.u16()?;
        let options_len = r.u16()? as usize;
        let options = Bytes::copy_from_slice(r.raw_bytes(options_len)?);
        let _version = r.u8()?;
        let _reserved2 = r.u8()?;
        let payload = Bytes::copy_from_slice(r.remaining());

        if usize::from(msg_len) != data.len() {
            tracing::debug!(
                declared = msg_len,
                actual = data.len(),
                seq,
                "harp message length does not match buffer"
            );
        }

        Ok(Self {
            src,
            dst,
            seq,
            protocol,
            action_code,
            response_required,
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
    use crate::protocol::harp;

    fn sample() -> HarpFrame {
        HarpFrame::new(
            Address::new(2, 1, 65535),
            Address::new(1, 1, 257),
            5,
            harp::HOI2,
            &b"\xAB\xCD"[..],
        )
        .with_action(3, true)
    }

    #[test]
    fn packs_header_layout() {
        let packed = sample().pack().unwrap();
        assert_eq!(&packed[0..6], &[2, 0, 1, 0, 0xFF, 0xFF]);
        assert_eq!(&packed[6..12], &[1, 0, 1, 0, 0x01, 0x01]);
        assert_eq!(packed[12], 5);
        assert_eq!(packed[13], 0);
        assert_eq!(packed[14], harp::HOI2);
        assert_eq!(packed[15], 0x13);
        // 20 header + 0 options + 2 trailer + 2 payload
        assert_eq!(&packed[16..18], &[24, 0]);
        assert_eq!(&packed[18..20], &[0, 0]);
        assert_eq!(&packed[20..22], &[0, 0]);
        assert_eq!(&packed[22..], &[0xAB, 0xCD]);
        assert_eq!(packed.len(), 24);
    }

    #[test]
    fn trailer_follows_options() {
        let frame = sample().with_options(&b"\x09\x08\x07"[..]);
        let packed = frame.pack().unwrap();
        assert_eq!(&packed[18..20], &[3, 0]);
        assert_eq!(&packed[20..23], &[9, 8, 7]);
        assert_eq!(&packed[23..25], &[0, 0]);
        assert_eq!(HarpFrame::unpack(&packed).unwrap(), frame);
    }

    #[test]
    fn unpack_decomposes_action_byte() {
        let mut packed = sample().pack().unwrap().to_vec();
        packed[15] = 0x04;
        let frame = HarpFrame::unpack(&packed).unwrap();
        assert_eq!(frame.action_code, 4);
        assert!(!frame.response_required);
    }

    #[test]
    fn action_code_out_of_range_fails() {
        let frame = sample().with_action(16, false);
        assert!(matches!(frame.pack(), Err(PacketError::ActionCodeOutOfRange(16))));
    }

    #[test]
    fn truncated_header_fails() {
        let packed = sample().pack().unwrap();
        assert!(matches!(
            HarpFrame::unpack(&packed[..15]),
            Err(PacketError::Codec(CodecError::InsufficientData { offset: 15, needed: 1, .. }))
        ));
    }

    #[test]
    fn missing_trailer_fails() {
        let packed = sample().pack().unwrap();
        assert!(matches!(
            HarpFrame::unpack(&packed[..21]),
            Err(PacketError::Codec(CodecError::InsufficientData { offset: 21, .. }))
        ));
    }
}
