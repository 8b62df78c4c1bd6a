//! Frame structures of the Hamilton instrument TCP protocol.
//!
//! A command on the wire nests four layers:
//! - [`TransportEnvelope`]: size, protocol id, version byte, options, payload
//! - [`HarpFrame`]: source/destination addresses, sequence number, sub-protocol
//! - [`HoiFrame`] or [`RegistrationFrame`]: the application request itself
//!
//! Connection initialization skips HARP and carries a [`ConnectionFrame`]
//! directly in the envelope.
//!
//! Every frame packs to bytes and unpacks back to an equal value. Fields that
//! are derived on the wire (envelope size, HARP message length, HOI fragment
//! count) are recomputed on pack and only checked diagnostically on unpack.
//! [`PacketReader`]/[`PacketWriter`] split a TCP stream into whole packets.

pub mod action;
pub mod address;
#[cfg(feature = "async")]
pub mod async_codec;
pub mod codec;
pub mod connection;
pub mod envelope;
pub mod error;
pub mod harp;
pub mod hoi;
pub mod protocol;
pub mod reader;
pub mod registration;
pub mod version;
pub mod writer;

pub use action::{decode_action, encode_action, RESPONSE_REQUIRED};
pub use address::{Address, ParseAddressError, ADDRESS_SIZE};
#[cfg(feature = "async")]
pub use async_codec::PacketCodec;
pub use codec::{decode_packet, encode_packet, PacketConfig, DEFAULT_MAX_PACKET};
pub use connection::{ConnectionFrame, ConnectionParameter};
pub use envelope::TransportEnvelope;
pub use error::{PacketError, Result};
pub use harp::HarpFrame;
pub use hoi::HoiFrame;
pub use reader::PacketReader;
pub use registration::RegistrationFrame;
pub use version::{decode_version_byte, encode_version_byte, ProtocolVersion};
pub use writer::PacketWriter;
