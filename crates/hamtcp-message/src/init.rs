use std::time::Duration;

use bytes::Bytes;
use hamtcp_packet::protocol::{connection, transport};
use hamtcp_packet::{ConnectionFrame, ConnectionParameter, TransportEnvelope};

use crate::error::{MessageError, Result};

/// Settings sent when opening a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitConfig {
    /// Idle timeout requested from the instrument, sent in whole seconds.
    pub timeout: Duration,
    /// Client id record value. The instrument assigns the real id in its reply.
    pub client_id: u16,
    pub connection_type: u16,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            client_id: 0,
            connection_type: 1,
        }
    }
}

/// Connection-initialization request. Precedes addressing, so it carries no
/// HARP layer.
#[derive(Debug, Clone, Default)]
pub struct InitMessage {
    config: InitConfig,
}

impl InitMessage {
    pub fn new(config: InitConfig) -> Self {
        Self { config }
    }

    /// Init request with default settings and the given timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(InitConfig {
            timeout,
            ..InitConfig::default()
        })
    }

    pub fn config(&self) -> &InitConfig {
        &self.config
    }

    /// Build the connection frame carried by this message.
    pub fn frame(&self) -> Result<ConnectionFrame> {
        let secs = self.config.timeout.as_secs();
        let timeout =
            u16::try_from(secs).map_err(|_| MessageError::TimeoutOutOfRange(self.config.timeout))?;
        Ok(ConnectionFrame::new(vec![
            ConnectionParameter::u16(connection::CLIENT_ID, self.config.client_id),
            ConnectionParameter::u16(connection::CONNECTION_TYPE, self.config.connection_type),
            ConnectionParameter::u16(connection::TIMEOUT, timeout),
        ]))
    }

    pub fn build(&self) -> Result<Bytes> {
        let payload = self.frame()?.pack()?;
        let packet = TransportEnvelope::new(transport::INITIALIZATION, payload).pack()?;
        tracing::debug!(
            timeout_secs = self.config.timeout.as_secs(),
            len = packet.len(),
            "built init message"
        );
        Ok(packet)
    }
}

/// Parsed connection-initialization reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitResponse {
    pub ip: TransportEnvelope,
    pub connection: ConnectionFrame,
    pub client_id: u16,
    pub connection_type: u16,
    /// Timeout granted by the instrument, in seconds.
    pub timeout: u16,
}

impl InitResponse {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let ip = TransportEnvelope::unpack(data)?;
        if ip.protocol != transport::INITIALIZATION {
            return Err(MessageError::UnexpectedProtocol {
                layer: "transport",
                expected: transport::INITIALIZATION,
                actual: ip.protocol,
            });
        }
        let connection = ConnectionFrame::unpack(&ip.payload)?;
        let value = |id: u8| {
            connection
                .param(id)
                .map(|p| p.value)
                .ok_or(MessageError::MissingConnectionParameter(id))
        };
        let client_id = value(connection::CLIENT_ID)?;
        let connection_type = value(connection::CONNECTION_TYPE)?;
        let timeout = value(connection::TIMEOUT)?;

        Ok(Self {
            ip,
            connection,
            client_id,
            connection_type,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_initialization_envelope() {
        let packet = InitMessage::with_timeout(Duration::from_secs(300)).build().unwrap();
        let ip = TransportEnvelope::unpack(&packet).unwrap();
        assert_eq!(ip.protocol, transport::INITIALIZATION);
        assert_eq!(
            ip.payload.as_ref(),
            &[
                0, 0, 3, 0, //
                1, 16, 0, 0, 0, 0, //
                2, 16, 0, 0, 1, 0, //
                4, 16, 0, 0, 0x2C, 0x01,
            ]
        );
    }

    #[test]
    fn parses_reply_fields_by_id() {
        let reply = ConnectionFrame::new(vec![
            ConnectionParameter::u16(connection::TIMEOUT, 60),
            ConnectionParameter::u16(connection::CLIENT_ID, 12),
            ConnectionParameter::u16(connection::CONNECTION_TYPE, 1),
        ]);
        let packet = TransportEnvelope::new(transport::INITIALIZATION, reply.pack().unwrap())
            .pack()
            .unwrap();
        let response = InitResponse::parse(&packet).unwrap();
        assert_eq!(response.client_id, 12);
        assert_eq!(response.connection_type, 1);
        assert_eq!(response.timeout, 60);
    }

    #[test]
    fn missing_record_is_reported() {
        let reply = ConnectionFrame::new(vec![ConnectionParameter::u16(connection::CLIENT_ID, 3)]);
        let packet = TransportEnvelope::new(transport::INITIALIZATION, reply.pack().unwrap())
            .pack()
            .unwrap();
        assert!(matches!(
            InitResponse::parse(&packet),
            Err(MessageError::MissingConnectionParameter(2))
        ));
    }

    #[test]
    fn wrong_protocol_is_rejected() {
        let packet = TransportEnvelope::new(transport::OBJECT_DISCOVERY, Bytes::new())
            .pack()
            .unwrap();
        assert!(matches!(
            InitResponse::parse(&packet),
            Err(MessageError::UnexpectedProtocol { layer: "transport", expected: 7, actual: 6 })
        ));
    }

    #[test]
    fn oversized_timeout_is_rejected() {
        let msg = InitMessage::with_timeout(Duration::from_secs(70_000));
        assert!(matches!(msg.build(), Err(MessageError::TimeoutOutOfRange(_))));
    }
}
