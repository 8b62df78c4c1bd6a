/// Errors that can occur while encoding or decoding primitive values and
/// DataFragments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A read needed more bytes than remain in the buffer.
    #[error("insufficient data at offset {offset}: needed {needed} bytes, {available} available")]
    InsufficientData {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A null-terminated string ran to the end of the buffer.
    #[error("string at offset {offset} has no null terminator")]
    MissingTerminator { offset: usize },

    /// A string was not valid UTF-8.
    #[error("string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },

    /// A fragment payload does not fit the u16 length field.
    #[error("fragment type {type_id} payload too large ({len} bytes, max 65535)")]
    FragmentTooLarge { type_id: u8, len: usize },

    /// A fragment payload does not match the shape its type id declares.
    #[error("malformed fragment type {type_id} at offset {offset}: {reason}")]
    MalformedFragment {
        offset: usize,
        type_id: u8,
        reason: String,
    },

    /// More fragments than the one-byte fragment count can describe.
    #[error("too many fragments ({0}, max 255)")]
    TooManyFragments(usize),
}

pub type Result<T> = std::result::Result<T, CodecError>;
