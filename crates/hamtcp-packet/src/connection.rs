use bytes::Bytes;
use hamtcp_codec::{Reader, Writer};

use crate::error::{PacketError, Result};
use crate::protocol::connection;

/// Bytes of the prolog: version, message id, parameter count, reserved.
pub const CONNECTION_PROLOG_SIZE: usize = 4;

/// Size of one parameter record.
pub const CONNECTION_RECORD_SIZE: usize = 6;

/// One `[id][type][reserved:2][value:2]` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionParameter {
    pub id: u8,
    pub type_id: u8,
    pub value: u16,
}

impl ConnectionParameter {
    /// A record carrying a u16 value.
    pub fn u16(id: u8, value: u16) -> Self {
        Self {
            id,
            type_id: connection::TYPE_U16,
            value,
        }
    }
}

/// Connection initialization payload, carried directly in a protocol-7
/// envelope with no HARP layer.
///
/// Parameters use the fixed record format above, not DataFragments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionFrame {
    pub version: u8,
    pub message_id: u8,
    /// Prolog byte with no known meaning, preserved as received.
    pub unknown: u8,
    pub params: Vec<ConnectionParameter>,
}

impl ConnectionFrame {
    pub fn new(params: Vec<ConnectionParameter>) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// First record with the given id.
    pub fn param(&self, id: u8) -> Option<&ConnectionParameter> {
        self.params.iter().find(|p| p.id == id)
    }

    pub fn pack(&self) -> Result<Bytes> {
        let count = u8::try_from(self.params.len()).map_err(|_| PacketError::LengthOverflow {
            field: "connection parameter count",
            len: self.params.len(),
        })?;
        let mut w = Writer::new();
        w.u8(self.version)
            .u8(self.message_id)
            .u8(count)
            .u8(self.unknown);
        for param in &self.params {
            w.u8(param.id).u8(param.type_id).u16(0).u16(param.value);
        }
        Ok(w.finish())
    }

    pub fn unpack(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        let version = r.u8()?;
        let message_id = r.u8()?;
        let count = r.u8()?;
        let unknown = r.u8()?;
        let mut params = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let id = r.u8()?;
            let type_id = r.u8()?;
            let _reserved = r.u16()?;
            let value = r.u16()?;
            params.push(ConnectionParameter { id, type_id, value });
        }
        Ok(Self {
            version,
            message_id,
            unknown,
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use hamtcp_codec::CodecError;

    use super::*;

    #[test]
    fn packs_prolog_and_records() {
        let frame = ConnectionFrame::new(vec![
            ConnectionParameter::u16(connection::CLIENT_ID, 0),
            ConnectionParameter::u16(connection::TIMEOUT, 30),
        ]);
        assert_eq!(
            frame.pack().unwrap().as_ref(),
            &[0, 0, 2, 0, 1, 16, 0, 0, 0, 0, 4, 16, 0, 0, 30, 0]
        );
    }

    #[test]
    fn looks_up_records_by_id() {
        let data = [0, 1, 2, 0x2A, 2, 16, 0, 0, 7, 0, 4, 16, 0, 0, 0x2C, 0x01];
        let frame = ConnectionFrame::unpack(&data).unwrap();
        assert_eq!(frame.message_id, 1);
        assert_eq!(frame.unknown, 0x2A);
        assert_eq!(frame.param(connection::CONNECTION_TYPE).unwrap().value, 7);
        assert_eq!(frame.param(connection::TIMEOUT).unwrap().value, 300);
        assert!(frame.param(connection::CLIENT_ID).is_none());
        assert_eq!(ConnectionFrame::unpack(&frame.pack().unwrap()).unwrap(), frame);
    }

    #[test]
    fn short_record_fails() {
        let data = [0, 0, 1, 0, 4, 16, 0, 0, 30];
        assert!(matches!(
            ConnectionFrame::unpack(&data),
            Err(PacketError::Codec(CodecError::InsufficientData { offset: 8, needed: 2, available: 1 }))
        ));
    }

    #[test]
    fn too_many_records_fail() {
        let frame = ConnectionFrame::new(vec![ConnectionParameter::u16(1, 0); 256]);
        assert!(matches!(frame.pack(), Err(PacketError::LengthOverflow { .. })));
    }
}
