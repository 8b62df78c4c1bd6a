//! Message builders and response parsers for the Hamilton TCP protocol.
//!
//! Each message composes the frames of `hamtcp-packet` into one ready-to-send
//! packet, and each response type decomposes a received packet back into its
//! nested frames:
//! - [`InitMessage`]/[`InitResponse`]: connection initialization (protocol 7)
//! - [`RegistrationMessage`]/[`RegistrationResponse`]: discovery and registration
//! - [`CommandMessage`]/[`CommandResponse`]: HOI method calls
//!
//! Nothing here performs I/O or assigns sequence numbers.

pub mod command;
pub mod error;
pub mod init;
pub mod registration;

pub use command::{CommandMessage, CommandResponse};
pub use error::{MessageError, Result};
pub use init::{InitConfig, InitMessage, InitResponse};
pub use registration::{RegistrationMessage, RegistrationOption, RegistrationResponse};
