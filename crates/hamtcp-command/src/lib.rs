//! Typed instrument commands for the Hamilton TCP protocol.
//!
//! A [`Command`] knows its `(protocol, interface_id, command_id)` identity,
//! how to encode its arguments and how to read its reply. Statically known
//! commands carry their identity as an associated `ID` constant;
//! [`DynamicCommand`] validates identity once, at construction.
//!
//! Commands only produce and consume bytes. Sending them, assigning sequence
//! numbers (see [`SequenceCounter`]) and matching replies belong to the
//! caller's session.

pub mod command;
pub mod dynamic;
pub mod error;
pub mod instrument;
pub mod sequence;

pub use command::{response_values, Command, CommandHeader, CommandId};
pub use dynamic::{DynamicCommand, DynamicCommandBuilder};
pub use error::{CommandError, Result};
pub use instrument::{
    Aspirate, Dispense, DoorLockStatus, DropTips, IsDoorLocked, IsTipPresent, LockDoor, Park,
    PickupTips, TipPresence, UnlockDoor,
};
pub use sequence::SequenceCounter;
