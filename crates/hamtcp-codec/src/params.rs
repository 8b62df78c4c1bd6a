//! DataFragment parameter blocks.
//!
//! A parameter block is a flat run of self-describing fragments:
//!
//! ```text
//! ┌─────────┬───────┬────────────┬──────────────────┐
//! │ Type id │ Flags │ Length     │ Payload          │
//! │ (1B)    │ (1B)  │ (2B LE)    │ (Length bytes)   │
//! └─────────┴───────┴────────────┴──────────────────┘
//! ```
//!
//! Fragment order is part of the firmware contract: the builder appends in
//! call order and the parser yields in wire order.

use bytes::Bytes;

use crate::error::{CodecError, Result};
use crate::types::{HamiltonDataType, FRAGMENT_HEADER_SIZE};
use crate::value::HoiValue;
use crate::wire::{Reader, Writer};

macro_rules! scalar_fragment {
    ($($name:ident: $ty:ty => $dt:ident;)*) => {
        $(
            #[doc = concat!("Append one `", stringify!($ty), "` fragment.")]
            pub fn $name(&mut self, value: $ty) -> &mut Self {
                let mut body = Writer::new();
                body.$name(value);
                self.push(HamiltonDataType::$dt, &body.finish())
            }
        )*
    };
}

macro_rules! array_fragment {
    ($($name:ident: $ty:ty => $put:ident, $dt:ident;)*) => {
        $(
            #[doc = concat!("Append one `", stringify!($ty), "` array fragment.")]
            pub fn $name(&mut self, values: &[$ty]) -> &mut Self {
                let mut body = Writer::new();
                for &value in values {
                    body.$put(value);
                }
                self.push(HamiltonDataType::$dt, &body.finish())
            }
        )*
    };
}

/// Builder for a DataFragment parameter block.
///
/// Appends cannot fail individually; a fragment whose payload overflows its
/// length field is recorded and reported by [`HoiParams::build`].
#[derive(Debug, Clone, Default)]
pub struct HoiParams {
    writer: Writer,
    count: usize,
    error: Option<CodecError>,
}

impl HoiParams {
    pub fn new() -> Self {
        Self::default()
    }

    scalar_fragment! {
        i8: i8 => I8;
        i16: i16 => I16;
        i32: i32 => I32;
        i64: i64 => I64;
        u8: u8 => U8;
        u16: u16 => U16;
        u32: u32 => U32;
        u64: u64 => U64;
        f32: f32 => F32;
        f64: f64 => F64;
    }

    array_fragment! {
        i8_array: i8 => i8, I8Array;
        i16_array: i16 => i16, I16Array;
        i32_array: i32 => i32, I32Array;
        i64_array: i64 => i64, I64Array;
        u16_array: u16 => u16, U16Array;
        u32_array: u32 => u32, U32Array;
        u64_array: u64 => u64, U64Array;
        f32_array: f32 => f32, F32Array;
        f64_array: f64 => f64, F64Array;
    }

    /// Append a null-terminated UTF-8 string fragment.
    pub fn string(&mut self, value: &str) -> &mut Self {
        let mut body = Writer::new();
        body.string(value);
        self.push(HamiltonDataType::String, &body.finish())
    }

    /// Append a one-byte bool fragment.
    pub fn bool_value(&mut self, value: bool) -> &mut Self {
        self.push(HamiltonDataType::Bool, &[u8::from(value)])
    }

    pub fn u8_array(&mut self, values: &[u8]) -> &mut Self {
        self.push(HamiltonDataType::U8Array, values)
    }

    /// Append a bool array, one byte per element.
    pub fn bool_array(&mut self, values: &[bool]) -> &mut Self {
        let body: Vec<u8> = values.iter().map(|&v| u8::from(v)).collect();
        self.push(HamiltonDataType::BoolArray, &body)
    }

    /// Append a string array: a u32 element count followed by the
    /// null-terminated strings.
    pub fn string_array<S: AsRef<str>>(&mut self, values: &[S]) -> &mut Self {
        let count = match string_array_count(values.len()) {
            Ok(count) => count,
            Err(err) => return self.defer(err),
        };
        let mut body = Writer::new();
        body.u32(count);
        for value in values {
            body.string(value.as_ref());
        }
        self.push(HamiltonDataType::StringArray, &body.finish())
    }

    /// Append an already-decoded value with its own type.
    pub fn value(&mut self, value: &HoiValue) -> &mut Self {
        match value {
            HoiValue::I8(v) => self.i8(*v),
            HoiValue::I16(v) => self.i16(*v),
            HoiValue::I32(v) => self.i32(*v),
            HoiValue::I64(v) => self.i64(*v),
            HoiValue::U8(v) => self.u8(*v),
            HoiValue::U16(v) => self.u16(*v),
            HoiValue::U32(v) => self.u32(*v),
            HoiValue::U64(v) => self.u64(*v),
            HoiValue::F32(v) => self.f32(*v),
            HoiValue::F64(v) => self.f64(*v),
            HoiValue::String(v) => self.string(v),
            HoiValue::Bool(v) => self.bool_value(*v),
            HoiValue::I8Array(v) => self.i8_array(v),
            HoiValue::I16Array(v) => self.i16_array(v),
            HoiValue::I32Array(v) => self.i32_array(v),
            HoiValue::I64Array(v) => self.i64_array(v),
            HoiValue::U8Array(v) => self.u8_array(v),
            HoiValue::U16Array(v) => self.u16_array(v),
            HoiValue::U32Array(v) => self.u32_array(v),
            HoiValue::U64Array(v) => self.u64_array(v),
            HoiValue::F32Array(v) => self.f32_array(v),
            HoiValue::F64Array(v) => self.f64_array(v),
            HoiValue::BoolArray(v) => self.bool_array(v),
            HoiValue::StringArray(v) => self.string_array(v),
            HoiValue::Raw {
                type_id,
                flags,
                data,
            } => self.push_raw(*type_id, *flags, data),
        }
    }

    /// Number of fragments appended so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The finished parameter block.
    pub fn build(&self) -> Result<Bytes> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        Ok(Bytes::copy_from_slice(self.writer.as_slice()))
    }

    fn push(&mut self, ty: HamiltonDataType, payload: &[u8]) -> &mut Self {
        self.push_raw(ty.id(), ty.flags(), payload)
    }

    fn push_raw(&mut self, type_id: u8, flags: u8, payload: &[u8]) -> &mut Self {
        let Ok(len) = u16::try_from(payload.len()) else {
            return self.defer(CodecError::FragmentTooLarge {
                type_id,
                len: payload.len(),
            });
        };
        self.writer
            .u8(type_id)
            .u8(flags)
            .u16(len)
            .raw_bytes(payload);
        self.count += 1;
        self
    }

    /// Keep the first failure for `build`.
    fn defer(&mut self, err: CodecError) -> &mut Self {
        if self.error.is_none() {
            self.error = Some(err);
        }
        self
    }
}

fn string_array_count(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| CodecError::FragmentTooLarge {
        type_id: HamiltonDataType::StringArray.id(),
        len,
    })
}

/// Sequential parser over a DataFragment parameter block.
#[derive(Debug, Clone)]
pub struct HoiParamsParser<'a> {
    reader: Reader<'a>,
}

impl<'a> HoiParamsParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: Reader::new(data),
        }
    }

    /// Decode the next fragment into `(type_id, value)`.
    pub fn parse_next(&mut self) -> Result<(u8, HoiValue)> {
        let offset = self.reader.offset();
        let available = self.reader.remaining_len();
        if available < FRAGMENT_HEADER_SIZE {
            return Err(CodecError::InsufficientData {
                offset,
                needed: FRAGMENT_HEADER_SIZE,
                available,
            });
        }

        // Rewind on a short payload so a failed parse consumes nothing.
        let checkpoint = self.reader.clone();
        let type_id = self.reader.u8()?;
        let flags = self.reader.u8()?;
        let len = usize::from(self.reader.u16()?);
        let payload = match self.reader.raw_bytes(len) {
            Ok(payload) => payload,
            Err(err) => {
                self.reader = checkpoint;
                return Err(err);
            }
        };

        let value = decode_fragment(type_id, flags, payload, offset + FRAGMENT_HEADER_SIZE)?;
        Ok((type_id, value))
    }

    /// Decode every remaining fragment in order.
    pub fn parse_all(&mut self) -> Result<Vec<(u8, HoiValue)>> {
        let mut out = Vec::new();
        while self.reader.has_remaining() {
            out.push(self.parse_next()?);
        }
        Ok(out)
    }

    pub fn has_remaining(&self) -> bool {
        self.reader.has_remaining()
    }

    pub fn offset(&self) -> usize {
        self.reader.offset()
    }
}

/// Count the fragments in a parameter block by walking the headers.
///
/// Each step reads a 4-byte header and skips the declared payload length;
/// the walk stops once fewer than 4 bytes remain. A declared length that runs
/// past the end of the buffer is an error.
pub fn count_fragments(params: &[u8]) -> Result<usize> {
    let mut reader = Reader::new(params);
    let mut count = 0usize;
    while reader.remaining_len() >= FRAGMENT_HEADER_SIZE {
        reader.u8()?;
        reader.u8()?;
        let len = reader.u16()?;
        reader.raw_bytes(usize::from(len))?;
        count += 1;
    }
    if reader.has_remaining() {
        tracing::trace!(
            trailing = reader.remaining_len(),
            "ignoring trailing bytes after last fragment"
        );
    }
    Ok(count)
}

fn decode_fragment(type_id: u8, flags: u8, payload: &[u8], offset: usize) -> Result<HoiValue> {
    let Some(ty) = HamiltonDataType::from_id(type_id) else {
        tracing::debug!(type_id, flags, len = payload.len(), "unknown fragment type, keeping raw bytes");
        return Ok(HoiValue::Raw {
            type_id,
            flags,
            data: Bytes::copy_from_slice(payload),
        });
    };

    if let Some(width) = ty.element_width() {
        let fits = if ty.is_array() {
            payload.len() % width == 0
        } else {
            payload.len() == width
        };
        if !fits {
            return Err(CodecError::MalformedFragment {
                offset,
                type_id,
                reason: format!(
                    "{} payload of {} bytes is not a multiple of element width {}",
                    ty.name(),
                    payload.len(),
                    width
                ),
            });
        }
    }

    decode_payload(ty, payload).map_err(|err| rebase(err, offset))
}

fn decode_payload(ty: HamiltonDataType, payload: &[u8]) -> Result<HoiValue> {
    use HamiltonDataType as T;

    let mut r = Reader::new(payload);
    let n = payload.len() / ty.element_width().unwrap_or(1);

    Ok(match ty {
        T::I8 => HoiValue::I8(r.i8()?),
        T::I16 => HoiValue::I16(r.i16()?),
        T::I32 => HoiValue::I32(r.i32()?),
        T::I64 => HoiValue::I64(r.i64()?),
        T::U8 => HoiValue::U8(r.u8()?),
        T::U16 => HoiValue::U16(r.u16()?),
        T::U32 => HoiValue::U32(r.u32()?),
        T::U64 => HoiValue::U64(r.u64()?),
        T::F32 => HoiValue::F32(r.f32()?),
        T::F64 => HoiValue::F64(r.f64()?),
        T::Bool => HoiValue::Bool(r.u8()? != 0),
        T::String => {
            let value = r.string()?.to_owned();
            ensure_consumed(&r, ty)?;
            HoiValue::String(value)
        }
        T::I8Array => HoiValue::I8Array(read_n(&mut r, n, Reader::i8)?),
        T::I16Array => HoiValue::I16Array(read_n(&mut r, n, Reader::i16)?),
        T::I32Array => HoiValue::I32Array(read_n(&mut r, n, Reader::i32)?),
        T::I64Array => HoiValue::I64Array(read_n(&mut r, n, Reader::i64)?),
        T::U8Array => HoiValue::U8Array(payload.to_vec()),
        T::U16Array => HoiValue::U16Array(read_n(&mut r, n, Reader::u16)?),
        T::U32Array => HoiValue::U32Array(read_n(&mut r, n, Reader::u32)?),
        T::U64Array => HoiValue::U64Array(read_n(&mut r, n, Reader::u64)?),
        T::F32Array => HoiValue::F32Array(read_n(&mut r, n, Reader::f32)?),
        T::F64Array => HoiValue::F64Array(read_n(&mut r, n, Reader::f64)?),
        T::BoolArray => HoiValue::BoolArray(payload.iter().map(|&b| b != 0).collect()),
        T::StringArray => {
            let count = r.u32()? as usize;
            // Each string needs at least its terminator.
            let mut values = Vec::with_capacity(count.min(r.remaining_len()));
            for _ in 0..count {
                values.push(r.string()?.to_owned());
            }
            ensure_consumed(&r, ty)?;
            HoiValue::StringArray(values)
        }
    })
}

/// Strings end at their terminator, so any bytes after it would be lost.
fn ensure_consumed(reader: &Reader<'_>, ty: HamiltonDataType) -> Result<()> {
    if !reader.has_remaining() {
        return Ok(());
    }
    Err(CodecError::MalformedFragment {
        offset: reader.offset(),
        type_id: ty.id(),
        reason: format!(
            "{} payload has {} trailing bytes",
            ty.name(),
            reader.remaining_len()
        ),
    })
}

fn read_n<'a, T>(
    reader: &mut Reader<'a>,
    n: usize,
    mut read: impl FnMut(&mut Reader<'a>) -> Result<T>,
) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(read(reader)?);
    }
    Ok(out)
}

/// Shift payload-relative offsets to block-relative ones.
fn rebase(err: CodecError, base: usize) -> CodecError {
    match err {
        CodecError::InsufficientData {
            offset,
            needed,
            available,
        } => CodecError::InsufficientData {
            offset: offset + base,
            needed,
            available,
        },
        CodecError::MissingTerminator { offset } => CodecError::MissingTerminator {
            offset: offset + base,
        },
        CodecError::InvalidUtf8 { offset } => CodecError::InvalidUtf8 {
            offset: offset + base,
        },
        CodecError::MalformedFragment {
            offset,
            type_id,
            reason,
        } => CodecError::MalformedFragment {
            offset: offset + base,
            type_id,
            reason,
        },
        other => other,
    }
}
