use bytes::Bytes;
use hamtcp_codec::{Reader, Writer};

use crate::address::Address;
use crate::error::{u16_len, Result};

/// Bytes before the options block.
pub const REGISTRATION_HEADER_SIZE: usize = 20;

/// Discovery and registration frame (Registration2), carried by HARP
/// protocol selector 3.
///
/// `options` is a sequence of `[option_id:1][length:1][data]` records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationFrame {
    /// See [`crate::protocol::registration`].
    pub action_code: u16,
    pub response_code: u16,
    pub req_address: Address,
    pub res_address: Address,
    pub options: Bytes,
}

impl RegistrationFrame {
    pub fn new(action_code: u16, req_address: Address, res_address: Address) -> Self {
        Self {
            action_code,
            response_code: 0,
            req_address,
            res_address,
            options: Bytes::new(),
        }
    }

    pub fn with_options(mut self, options: impl Into<Bytes>) -> Self {
        self.options = options.into();
        self
    }

    pub fn pack(&self) -> Result<Bytes> {
        let options_len = u16_len("registration options", self.options.len())?;
        let mut w = Writer::new();
        w.u16(self.action_code).u16(self.response_code).u8(0).u8(0);
        self.req_address.write(&mut w);
        self.res_address.write(&mut w);
        w.u16(options_len).raw_bytes(&self.options);
        Ok(w.finish())
    }

    pub fn unpack(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        let action_code = r.u16()?;
        let response_code = r.u16()?;
        let _version = r.u8()?;
        let _reserved = r.u8()?;
        let req_address = Address::read(&mut r)?;
        let res_address = Address::read(&mut r)?;
        let options_len = r.u16()? as usize;
        let options = Bytes::copy_from_slice(r.raw_bytes(options_len)?);
        if r.has_remaining() {
            tracing::debug!(
                trailing = r.remaining_len(),
                action_code,
                "ignoring bytes after registration options"
            );
        }
        Ok(Self {
            action_code,
            response_code,
            req_address,
            res_address,
            options,
        })
    }
}


#[cfg(test)]
mod proptests {
    use proptest::collection::vec;
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn pack_unpack_equivalence(
            action_code in any::<u16>(),
            response_code in any::<u16>(),
            req in any::<(u16, u16, u16)>(),
            res in any::<(u16, u16, u16)>(),
            options in vec(any::<u8>(), 0..32),
        ) {
            let mut frame = RegistrationFrame::new(
                action_code,
                Address::new(req.0, req.1, req.2),
                Address::new(res.0, res.1, res.2),
            )
            .with_options(options);
            frame.response_code = response_code;
            prop_assert_eq!(RegistrationFrame::unpack(&frame.pack().unwrap()).unwrap(), frame);
        }
    }
}
