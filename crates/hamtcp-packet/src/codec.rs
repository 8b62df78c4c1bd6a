//! Splitting a TCP byte stream into whole packets.
//!
//! Every packet starts with the envelope's u16 `size` field, which counts the
//! bytes after itself, so a packet occupies `2 + size` bytes on the wire.

use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{PacketError, Result};

/// Width of the size prefix.
pub const SIZE_PREFIX: usize = 2;

/// Largest packet a u16 size prefix can describe.
pub const DEFAULT_MAX_PACKET: usize = SIZE_PREFIX + u16::MAX as usize;

/// Configuration for packet readers and writers.
#[derive(Debug, Clone)]
pub struct PacketConfig {
    /// Maximum packet size in bytes, prefix included. Default: 65 537.
    pub max_packet_size: usize,
    /// Read timeout applied to TCP streams.
    pub read_timeout: Option<Duration>,
    /// Write timeout applied to TCP streams.
    pub write_timeout: Option<Duration>,
}

impl Default for PacketConfig {
    fn default() -> Self {
        Self {
            max_packet_size: DEFAULT_MAX_PACKET,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

/// Decode one packet from a buffer.
///
/// Returns `Ok(None)` until the buffer holds a complete packet. On success
/// the packet bytes, size prefix included, are consumed from the buffer and
/// can be handed to [`crate::TransportEnvelope::unpack`].
pub fn decode_packet(src: &mut BytesMut, max_packet_size: usize) -> Result<Option<Bytes>> {
    if src.len() < SIZE_PREFIX {
        return Ok(None);
    }

    let size = u16::from_le_bytes([src[0], src[1]]);
    let total = SIZE_PREFIX + usize::from(size);
    if total > max_packet_size {
        return Err(PacketError::PacketTooLarge {
            size: total,
            max: max_packet_size,
        });
    }
    if src.len() < total {
        return Ok(None);
    }

    Ok(Some(src.split_to(total).freeze()))
}

/// Append one packed envelope to `dst`.
///
/// The packet must carry a size prefix that matches its length.
pub fn encode_packet(packet: &[u8], dst: &mut BytesMut, max_packet_size: usize) -> Result<()> {
    if packet.len() > max_packet_size {
        return Err(PacketError::PacketTooLarge {
            size: packet.len(),
            max: max_packet_size,
        });
    }
    if packet.len() < SIZE_PREFIX {
        return Err(hamtcp_codec::CodecError::InsufficientData {
            offset: 0,
            needed: SIZE_PREFIX,
            available: packet.len(),
        }
        .into());
    }
    let declared = u16::from_le_bytes([packet[0], packet[1]]);
    let actual = packet.len() - SIZE_PREFIX;
    if usize::from(declared) != actual {
        return Err(PacketError::SizeMismatch { declared, actual });
    }
    dst.reserve(packet.len());
    dst.put_slice(packet);
    Ok(())
}
