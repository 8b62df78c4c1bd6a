use std::io::{ErrorKind, Read};
use std::net::TcpStream;

use bytes::{Bytes, BytesMut};

use crate::codec::{decode_packet, PacketConfig};
use crate::envelope::TransportEnvelope;
use crate::error::{PacketError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;
const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Reads complete packets from any `Read` stream.
///
/// Handles partial reads internally; callers always get whole packets.
pub struct PacketReader<T> {
    inner: T,
    buf: BytesMut,
    config: PacketConfig,
}

impl<T: Read> PacketReader<T> {
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, PacketConfig::default())
    }

    pub fn with_config(inner: T, config: PacketConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete packet (blocking), size prefix included.
    ///
    /// Returns `Err(PacketError::ConnectionClosed)` at EOF.
    pub fn read_packet(&mut self) -> Result<Bytes> {
        loop {
            if let Some(packet) = decode_packet(&mut self.buf, self.config.max_packet_size)? {
                tracing::trace!(len = packet.len(), "read packet");
                return Ok(packet);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(PacketError::Io(err)),
            };

            if read == 0 {
                return Err(PacketError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Read the next packet and unpack its envelope.
    pub fn read_envelope(&mut self) -> Result<TransportEnvelope> {
        let packet = self.read_packet()?;
        TransportEnvelope::unpack(&packet)
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    pub fn config(&self) -> &PacketConfig {
        &self.config
    }
}

impl PacketReader<TcpStream> {
    /// Create a reader for a TCP stream and apply the read timeout from config.
    pub fn with_config_tcp(inner: TcpStream, config: PacketConfig) -> Result<Self> {
        inner.set_read_timeout(config.read_timeout)?;
        Ok(Self::with_config(inner, config))
    }
}
