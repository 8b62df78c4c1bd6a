use std::fmt;
use std::str::FromStr;

use hamtcp_codec::{Reader, Writer};

use crate::error::Result;

/// Wire size of a packed address.
pub const ADDRESS_SIZE: usize = 6;

/// A `(module, node, object)` endpoint inside the instrument's object graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    pub module: u16,
    pub node: u16,
    pub object: u16,
}

impl Address {
    pub const fn new(module: u16, node: u16, object: u16) -> Self {
        Self {
            module,
            node,
            object,
        }
    }

    /// Pack as three little-endian u16 values.
    pub fn pack(&self) -> [u8; ADDRESS_SIZE] {
        let mut out = [0u8; ADDRESS_SIZE];
        out[0..2].copy_from_slice(&self.module.to_le_bytes());
        out[2..4].copy_from_slice(&self.node.to_le_bytes());
        out[4..6].copy_from_slice(&self.object.to_le_bytes());
        out
    }

    /// Unpack from the first six bytes of `data`.
    pub fn unpack(data: &[u8]) -> Result<Self> {
        Self::read(&mut Reader::new(data))
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            module: reader.u16()?,
            node: reader.u16()?,
            object: reader.u16()?,
        })
    }

    pub(crate) fn write(&self, writer: &mut Writer) {
        writer.u16(self.module).u16(self.node).u16(self.object);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.module, self.node, self.object)
    }
}

/// Error returned when parsing `module:node:object` text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid address '{0}' (expected <module>:<node>:<object>)")]
pub struct ParseAddressError(String);

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || ParseAddressError(s.to_string());
        let mut parts = s.trim().split(':');
        let mut next = || -> std::result::Result<u16, ParseAddressError> {
            parts
                .next()
                .and_then(|part| part.trim().parse::<u16>().ok())
                .ok_or_else(err)
        };
        let address = Address::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_little_endian_triple() {
        assert_eq!(
            Address::new(1, 2, 3).pack(),
            [0x01, 0x00, 0x02, 0x00, 0x03, 0x00]
        );
    }

    #[test]
    fn displays_colon_separated() {
        assert_eq!(Address::new(1, 2, 3).to_string(), "1:2:3");
    }

    #[test]
    fn boundary_values_round_trip() {
        for address in [Address::new(0, 0, 0), Address::new(65535, 65535, 65535)] {
            assert_eq!(Address::unpack(&address.pack()).unwrap(), address);
        }
    }

    #[test]
    fn truncated_unpack_fails() {
        assert!(matches!(
            Address::unpack(&[1, 0, 2, 0, 3]),
            Err(crate::PacketError::Codec(
                hamtcp_codec::CodecError::InsufficientData { offset: 4, needed: 2, available: 1 }
            ))
        ));
    }

    #[test]
    fn parses_text_form() {
        assert_eq!("2:1:65535".parse::<Address>().unwrap(), Address::new(2, 1, 65535));
        assert!("1:2".parse::<Address>().is_err());
        assert!("1:2:3:4".parse::<Address>().is_err());
        assert!("1:2:70000".parse::<Address>().is_err());
    }
}

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn pack_unpack_equivalence(module in any::<u16>(), node in any::<u16>(), object in any::<u16>()) {
            let address = Address::new(module, node, object);
            prop_assert_eq!(Address::unpack(&address.pack()).unwrap(), address);
        }
    }
}
