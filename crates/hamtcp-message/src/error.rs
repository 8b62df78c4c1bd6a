use std::time::Duration;

/// Errors that can occur while building or parsing messages.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// Frame-level error.
    #[error("packet error: {0}")]
    Packet(#[from] hamtcp_packet::PacketError),

    /// Parameter block error.
    #[error("parameter error: {0}")]
    Codec(#[from] hamtcp_codec::CodecError),

    /// A layer carried a protocol selector other than the one this message uses.
    #[error("unexpected {layer} protocol {actual} (expected {expected})")]
    UnexpectedProtocol {
        layer: &'static str,
        expected: u8,
        actual: u8,
    },

    /// A connection-initialization reply lacked a required record.
    #[error("connection parameter {0} missing from init response")]
    MissingConnectionParameter(u8),

    /// A registration option could not be encoded or decoded.
    #[error("invalid registration option: {0}")]
    InvalidRegistrationOption(String),

    /// The init timeout does not fit the u16 seconds record.
    #[error("init timeout {0:?} out of range (max 65535 s)")]
    TimeoutOutOfRange(Duration),
}

pub type Result<T> = std::result::Result<T, MessageError>;
