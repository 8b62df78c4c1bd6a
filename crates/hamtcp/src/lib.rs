//! Wire protocol stack for Hamilton liquid-handling instruments over TCP.
//!
//! Every layer is a pure transformation between typed values and bytes; no
//! socket is opened here. Callers own the connection and move packets through
//! it with [`packet::PacketReader`]/[`packet::PacketWriter`] or the
//! tokio codec behind the `async` feature.
//!
//! # Crate Structure
//!
//! - [`codec`]: little-endian primitives and DataFragment parameters
//! - [`packet`]: Transport Envelope, HARP, HOI, registration and connection frames
//! - [`message`]: complete init, registration and command packets
//! - [`command`]: the `Command` trait and concrete instrument commands

/// Re-export codec types.
pub mod codec {
    pub use hamtcp_codec::*;
}

/// Re-export packet types.
pub mod packet {
    pub use hamtcp_packet::*;
}

/// Re-export message types.
pub mod message {
    pub use hamtcp_message::*;
}

/// Re-export command types.
pub mod command {
    pub use hamtcp_command::*;
}
