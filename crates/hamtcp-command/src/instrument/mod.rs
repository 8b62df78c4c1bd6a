//! Commands for the door lock and pipetting channels.
//!
//! Positions, heights and volumes are in the instrument's native integer
//! units (0.01 mm, 0.1 µl, 0.1 µl/s); conversion happens before this layer.
//! Per-channel arguments are arrays indexed like `channels`.

mod door;
mod liquid;
mod pipette;

pub use door::{DoorLockStatus, IsDoorLocked, LockDoor, UnlockDoor};
pub use liquid::{Aspirate, Dispense};
pub use pipette::{DropTips, IsTipPresent, Park, PickupTips, TipPresence};

use crate::error::{CommandError, Result};

/// Interface id of the door lock object.
pub const DOOR_INTERFACE: u8 = 1;

/// Interface id of the pipetting channel object.
pub const PIPETTE_INTERFACE: u8 = 1;

macro_rules! command_header {
    () => {
        fn header(&self) -> &$crate::command::CommandHeader {
            &self.header
        }

        fn header_mut(&mut self) -> &mut $crate::command::CommandHeader {
            &mut self.header
        }
    };
}
pub(crate) use command_header;

/// Check that a per-channel argument has one entry per channel.
pub(crate) fn per_channel(field: &'static str, channels: usize, len: usize) -> Result<()> {
    if len != channels {
        return Err(CommandError::InvalidArgument(format!(
            "{field} has {len} entries for {channels} channels"
        )));
    }
    Ok(())
}
