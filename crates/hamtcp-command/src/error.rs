use hamtcp_packet::protocol::hoi;

/// Errors that can occur while building commands or interpreting replies.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Message or frame error while building or unpacking.
    #[error("message error: {0}")]
    Message(#[from] hamtcp_message::MessageError),

    /// The reply's parameter block could not be decoded.
    #[error("failed to parse device response: {0}")]
    Codec(#[from] hamtcp_codec::CodecError),

    /// A runtime-configured command lacks an identifying field.
    #[error("command is missing required field '{0}'")]
    MissingField(&'static str),

    /// No source address was passed to `build` or set on the command.
    #[error("no source address available for command")]
    MissingSourceAddress,

    /// Command arguments are inconsistent.
    #[error("invalid command argument: {0}")]
    InvalidArgument(String),

    /// The reply decoded but did not have the expected shape.
    #[error("failed to parse device response: {0}")]
    InvalidResponse(String),

    /// The device answered with an exception action code.
    #[error(
        "device reported {} for interface {interface_id} method {action_id}",
        hoi::action_name(*action_code)
    )]
    DeviceException {
        action_code: u8,
        interface_id: u8,
        action_id: u16,
    },
}

pub type Result<T> = std::result::Result<T, CommandError>;
