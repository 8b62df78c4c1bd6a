/// Errors that can occur while packing or unpacking protocol frames.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    /// A primitive read or write failed (truncated input, bad string, ...).
    #[error(transparent)]
    Codec(#[from] hamtcp_codec::CodecError),

    /// A major/minor version component does not fit in four bits.
    #[error("version {field} {value} out of range (0-15)")]
    VersionOutOfRange { field: &'static str, value: u8 },

    /// An action code does not fit in the low four bits of the action byte.
    #[error("action code {0} out of range (0-15)")]
    ActionCodeOutOfRange(u8),

    /// A computed length does not fit its wire field.
    #[error("{field} overflow ({len} bytes)")]
    LengthOverflow { field: &'static str, len: usize },

    /// A stream packet exceeds the configured maximum size.
    #[error("packet too large ({size} bytes, max {max})")]
    PacketTooLarge { size: usize, max: usize },

    /// An outgoing packet's size prefix disagrees with its length.
    #[error("packet size field {declared} does not match {actual} bytes after the prefix")]
    SizeMismatch { declared: u16, actual: usize },

    /// An I/O error occurred while reading or writing packets.
    #[error("packet I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete packet was received.
    #[error("connection closed (incomplete packet)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, PacketError>;

/// Convert a length to its u16 wire field.
pub(crate) fn u16_len(field: &'static str, len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| PacketError::LengthOverflow { field, len })
}
