//! The action byte shared by the HARP and HOI layers.
//!
//! Low four bits hold the action code, bit 0x10 is the response-required flag.

use crate::error::{PacketError, Result};

/// Response-required bit of the action byte.
pub const RESPONSE_REQUIRED: u8 = 0x10;

/// Mask selecting the action code.
pub const ACTION_CODE_MASK: u8 = 0x0F;

/// Combine an action code and the response-required flag.
pub fn encode_action(action_code: u8, response_required: bool) -> Result<u8> {
    if action_code > ACTION_CODE_MASK {
        return Err(PacketError::ActionCodeOutOfRange(action_code));
    }
    let flag = if response_required { RESPONSE_REQUIRED } else { 0 };
    Ok(action_code | flag)
}

/// Split an action byte into `(action_code, response_required)`.
///
/// Bits above 0x10 are ignored.
pub fn decode_action(action: u8) -> (u8, bool) {
    (action & ACTION_CODE_MASK, action & RESPONSE_REQUIRED != 0)
}
