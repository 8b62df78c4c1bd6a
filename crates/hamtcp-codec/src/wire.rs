use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{CodecError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 64;

/// Byte order used for multi-byte values. Hamilton firmware speaks
/// little-endian everywhere, so that is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

macro_rules! put_num {
    ($($name:ident: $ty:ty => $le:ident, $be:ident;)*) => {
        $(
            #[doc = concat!("Append a `", stringify!($ty), "` in the configured byte order.")]
            pub fn $name(&mut self, value: $ty) -> &mut Self {
                match self.order {
                    ByteOrder::Little => self.buf.$le(value),
                    ByteOrder::Big => self.buf.$be(value),
                }
                self
            }
        )*
    };
}

macro_rules! get_num {
    ($($name:ident: $ty:ty = $width:literal;)*) => {
        $(
            #[doc = concat!("Read a `", stringify!($ty), "` in the configured byte order.")]
            pub fn $name(&mut self) -> Result<$ty> {
                let raw = self.take_array::<$width>()?;
                Ok(match self.order {
                    ByteOrder::Little => <$ty>::from_le_bytes(raw),
                    ByteOrder::Big => <$ty>::from_be_bytes(raw),
                })
            }
        )*
    };
}

/// Append-only binary writer.
///
/// Every append returns the writer so calls can be chained; the order of
/// calls is the order of bytes on the wire.
#[derive(Debug, Clone)]
pub struct Writer {
    buf: BytesMut,
    order: ByteOrder,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Create a little-endian writer.
    pub fn new() -> Self {
        Self::with_order(ByteOrder::Little)
    }

    /// Create a writer with an explicit byte order.
    pub fn with_order(order: ByteOrder) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            order,
        }
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.put_u8(value);
        self
    }

    pub fn i8(&mut self, value: i8) -> &mut Self {
        self.buf.put_i8(value);
        self
    }

    put_num! {
        u16: u16 => put_u16_le, put_u16;
        u32: u32 => put_u32_le, put_u32;
        u64: u64 => put_u64_le, put_u64;
        i16: i16 => put_i16_le, put_i16;
        i32: i32 => put_i32_le, put_i32;
        i64: i64 => put_i64_le, put_i64;
        f32: f32 => put_f32_le, put_f32;
        f64: f64 => put_f64_le, put_f64;
    }

    /// Append UTF-8 bytes followed by a single null terminator.
    pub fn string(&mut self, value: &str) -> &mut Self {
        self.buf.reserve(value.len() + 1);
        self.buf.put_slice(value.as_bytes());
        self.buf.put_u8(0);
        self
    }

    /// Append bytes verbatim.
    pub fn raw_bytes(&mut self, value: &[u8]) -> &mut Self {
        self.buf.put_slice(value);
        self
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Bytes written so far, without consuming them.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Take the accumulated bytes, leaving the writer empty.
    pub fn finish(&mut self) -> Bytes {
        self.buf.split().freeze()
    }
}

/// Sequential binary reader over a borrowed buffer.
///
/// Every read advances the cursor by the width of the value; a read that
/// would run past the end fails with [`CodecError::InsufficientData`] and
/// leaves the cursor untouched.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> Reader<'a> {
    /// Create a little-endian reader.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_order(data, ByteOrder::Little)
    }

    pub fn with_order(data: &'a [u8], order: ByteOrder) -> Self {
        Self {
            data,
            pos: 0,
            order,
        }
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes(self.take_array::<1>()?))
    }

    get_num! {
        u16: u16 = 2;
        u32: u32 = 4;
        u64: u64 = 8;
        i16: i16 = 2;
        i32: i32 = 4;
        i64: i64 = 8;
        f32: f32 = 4;
        f64: f64 = 8;
    }

    /// Read a null-terminated UTF-8 string and advance past the terminator.
    pub fn string(&mut self) -> Result<&'a str> {
        let start = self.pos;
        let rest = &self.data[start..];
        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(CodecError::MissingTerminator { offset: start })?;
        let text =
            std::str::from_utf8(&rest[..nul]).map_err(|_| CodecError::InvalidUtf8 { offset: start })?;
        self.pos = start + nul + 1;
        Ok(text)
    }

    /// Read the next `len` bytes.
    pub fn raw_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.take(len)
    }

    /// Consume and return every unread byte.
    pub fn remaining(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        rest
    }

    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn has_remaining(&self) -> bool {
        self.pos < self.data.len()
    }

    /// Current cursor position from the start of the buffer.
    pub fn offset(&self) -> usize {
        self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let available = self.remaining_len();
        if len > available {
            return Err(CodecError::InsufficientData {
                offset: self.pos,
                needed: len,
                available,
            });
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}
