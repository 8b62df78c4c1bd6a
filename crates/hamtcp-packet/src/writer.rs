use std::io::{ErrorKind, Write};
use std::net::TcpStream;

use bytes::BytesMut;

use crate::codec::{encode_packet, PacketConfig};
use crate::envelope::TransportEnvelope;
use crate::error::{PacketError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;

/// Writes complete packets to any `Write` stream.
pub struct PacketWriter<T> {
    inner: T,
    buf: BytesMut,
    config: PacketConfig,
}

impl<T: Write> PacketWriter<T> {
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

    /// Send one packed envelope (blocking), as returned by a message `build()`.
    pub fn send(&mut self, packet: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_packet(packet, &mut self.buf, self.config.max_packet_size)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(PacketError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(PacketError::Io(err)),
            }
        }
        tracing::trace!(len = packet.len(), "wrote packet");

        self.flush()
    }

    /// Pack and send an envelope.
    pub fn write_envelope(&mut self, envelope: &TransportEnvelope) -> Result<()> {
        let packet = envelope.pack()?;
        self.send(&packet)
    }

    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(PacketError::Io(err)),
            }
        }
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

impl PacketWriter<TcpStream> {
    /// Create a writer for a TCP stream and apply the write timeout from config.
    pub fn with_config_tcp(inner: TcpStream, config: PacketConfig) -> Result<Self> {
        inner.set_write_timeout(config.write_timeout)?;
        Ok(Self::with_config(inner, config))
    }
}
