use hamtcp_packet::protocol::{hoi, transport};
use hamtcp_packet::Address;

use super::{command_header, DOOR_INTERFACE};
use crate::command::{first_value, Command, CommandHeader, CommandId};
use crate::error::{CommandError, Result};

/// Lock the front door.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockDoor {
    pub header: CommandHeader,
}

impl LockDoor {
    pub const ID: CommandId = CommandId::new(transport::OBJECT_DISCOVERY, DOOR_INTERFACE, 1);

    pub fn new(dest: Address) -> Self {
        Self {
            header: CommandHeader::new(dest),
        }
    }
}

impl Command for LockDoor {
    type Response = ();

    fn id(&self) -> CommandId {
        Self::ID
    }

    command_header!();
}

/// Unlock the front door.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockDoor {
    pub header: CommandHeader,
}

impl UnlockDoor {
    pub const ID: CommandId = CommandId::new(transport::OBJECT_DISCOVERY, DOOR_INTERFACE, 2);

    pub fn new(dest: Address) -> Self {
        Self {
            header: CommandHeader::new(dest),
        }
    }
}

impl Command for UnlockDoor {
    type Response = ();

    fn id(&self) -> CommandId {
        Self::ID
    }

    command_header!();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorLockStatus {
    pub locked: bool,
}

/// Query the door lock state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsDoorLocked {
    pub header: CommandHeader,
}

impl IsDoorLocked {
    pub const ID: CommandId = CommandId::new(transport::OBJECT_DISCOVERY, DOOR_INTERFACE, 3);

    pub fn new(dest: Address) -> Self {
        Self {
            header: CommandHeader::new(dest),
        }
    }
}

impl Command for IsDoorLocked {
    type Response = DoorLockStatus;

    fn id(&self) -> CommandId {
        Self::ID
    }

    command_header!();

    fn action_code(&self) -> u8 {
        hoi::STATUS_REQUEST
    }

    fn parse_response_parameters(&self, data: &[u8]) -> Result<Option<DoorLockStatus>> {
        let value = first_value(data, "door lock state")?;
        let locked = value.as_bool().ok_or_else(|| {
            CommandError::InvalidResponse(format!("door lock state should be a bool, got {value}"))
        })?;
        Ok(Some(DoorLockStatus { locked }))
    }
}
