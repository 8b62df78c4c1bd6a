use std::fmt;
use std::io;

use hamtcp_command::CommandError;
use hamtcp_message::MessageError;
use hamtcp_packet::PacketError;

// Exit codes shared with the other tools of the family.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied | io::ErrorKind::BrokenPipe => {
            FAILURE
        }
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

/// Anything wrong with bytes on the wire is the input's fault, except
/// length overflows, which only happen while encoding.
pub fn packet_error(context: &str, err: PacketError) -> CliError {
    match err {
        PacketError::Io(source) => io_error(context, source),
        PacketError::LengthOverflow { .. } | PacketError::SizeMismatch { .. } => {
            CliError::new(INTERNAL, format!("{context}: {err}"))
        }
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn message_error(context: &str, err: MessageError) -> CliError {
    match err {
        MessageError::Packet(err) => packet_error(context, err),
        MessageError::TimeoutOutOfRange(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn command_error(context: &str, err: CommandError) -> CliError {
    match err {
        CommandError::Message(err) => message_error(context, err),
        CommandError::MissingField(_)
        | CommandError::MissingSourceAddress
        | CommandError::InvalidArgument(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hamtcp_codec::CodecError;

    #[test]
    fn truncated_input_is_data_invalid() {
        let err = packet_error(
            "decode",
            PacketError::Codec(CodecError::InsufficientData {
                offset: 2,
                needed: 4,
                available: 1,
            }),
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("decode: "));
    }

    #[test]
    fn missing_file_is_failure() {
        let err = io_error("read", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.code, FAILURE);
    }

    #[test]
    fn closed_stdout_is_failure() {
        let err = io_error("write output", io::Error::from(io::ErrorKind::BrokenPipe));
        assert_eq!(err.code, FAILURE);
        assert!(err.message.starts_with("write output: "));
    }

    #[test]
    fn nested_errors_keep_their_class() {
        let err = command_error(
            "encode",
            CommandError::Message(MessageError::Packet(PacketError::ConnectionClosed)),
        );
        assert_eq!(err.code, DATA_INVALID);

        let err = command_error("encode", CommandError::MissingField("protocol"));
        assert_eq!(err.code, USAGE);
    }
}
