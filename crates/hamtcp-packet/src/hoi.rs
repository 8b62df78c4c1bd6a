use bytes::Bytes;
use hamtcp_codec::{count_fragments, CodecError, Reader, Writer};

use crate::action::{decode_action, encode_action};
use crate::error::Result;

/// Bytes before the parameter block.
pub const HOI_HEADER_SIZE: usize = 6;

/// The application frame (HOI2): a method call on one interface of an object.
///
/// `params` holds already-encoded DataFragments. The fragment count byte is
/// derived from `params` on every pack and is not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoiFrame {
    pub interface_id: u8,
    /// Four-bit action code, see [`crate::protocol::hoi`].
    pub action_code: u8,
    /// Method id.
    pub action_id: u16,
    pub response_required: bool,
    pub params: Bytes,
}

impl HoiFrame {
    pub fn new(interface_id: u8, action_code: u8, action_id: u16, params: impl Into<Bytes>) -> Self {
        Self {
            interface_id,
            action_code,
            action_id,
            response_required: false,
            params: params.into(),
        }
    }

    pub fn with_response_required(mut self, response_required: bool) -> Self {
        self.response_required = response_required;
        self
    }

    /// Number of fragments found by walking `params`.
    pub fn num_fragments(&self) -> Result<u8> {
        let count = count_fragments(&self.params)?;
        u8::try_from(count).map_err(|_| CodecError::TooManyFragments(count).into())
    }

    pub fn pack(&self) -> Result<Bytes> {
        let action = encode_action(self.action_code, self.response_required)?;
        let num_fragments = self.num_fragments()?;
        let mut w = Writer::new();
        w.u8(self.interface_id)
            .u8(action)
            .u16(self.action_id)
            .u8(0)
            .u8(num_fragments)
            .raw_bytes(&self.params);
        Ok(w.finish())
    }

    /// Unpack a frame. The received fragment count is not checked.
    pub fn unpack(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        let interface_id = r.u8()?;
        let (action_code, response_required) = decode_action(r.u8()?);
        let action_id = r.u16()?;
        let _version = r.u8()?;
        let num_fragments = r.u8()?;
        let params = Bytes::copy_from_slice(r.remaining());

        if tracing::enabled!(tracing::Level::TRACE) {
            if let Ok(scanned) = count_fragments(&params) {
                if scanned != usize::from(num_fragments) {
                    tracing::trace!(
                        declared = num_fragments,
                        scanned,
                        interface_id,
                        action_id,
                        "hoi fragment count differs from parameter block"
                    );
                }
            }
        }

        Ok(Self {
            interface_id,
            action_code,
            action_id,
            response_required,
            params,
        })
    }
}
