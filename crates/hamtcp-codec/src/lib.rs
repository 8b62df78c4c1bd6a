//! Byte-level codec for the Hamilton instrument TCP protocol.
//!
//! This is the lowest layer of hamtcp. It provides:
//! - [`Writer`]/[`Reader`] for fixed-width integers, floats, null-terminated
//!   strings and raw bytes with selectable byte order
//! - [`HoiParams`]/[`HoiParamsParser`] for DataFragment parameter blocks,
//!   the self-describing typed argument format carried by HOI frames
//!
//! Everything here is a pure transformation over in-memory buffers.

pub mod error;
pub mod params;
pub mod types;
pub mod value;
pub mod wire;

pub use error::{CodecError, Result};
pub use params::{count_fragments, HoiParams, HoiParamsParser};
pub use types::{HamiltonDataType, FLAG_BOOL_ARRAY, FRAGMENT_HEADER_SIZE};
pub use value::HoiValue;
pub use wire::{ByteOrder, Reader, Writer};
