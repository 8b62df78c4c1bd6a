use hamtcp_codec::HoiParams;
use hamtcp_packet::protocol::{hoi, transport};
use hamtcp_packet::Address;

use super::{command_header, per_channel, PIPETTE_INTERFACE};
use crate::command::{first_value, Command, CommandHeader, CommandId};
use crate::error::{CommandError, Result};

/// Move all channels to their park position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Park {
    pub header: CommandHeader,
}

impl Park {
    pub const ID: CommandId = CommandId::new(transport::OBJECT_DISCOVERY, PIPETTE_INTERFACE, 3);

    pub fn new(dest: Address) -> Self {
        Self {
            header: CommandHeader::new(dest),
        }
    }
}

impl Command for Park {
    type Response = ();

    fn id(&self) -> CommandId {
        Self::ID
    }

    command_header!();
}

/// Pick up tips on a set of channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickupTips {
    pub header: CommandHeader,
    /// Channel numbers taking part.
    pub channels: Vec<u16>,
    pub x_positions: Vec<i32>,
    pub y_positions: Vec<i32>,
    /// Z height for moves between positions.
    pub traverse_height: i32,
    /// Z where the pickup search begins.
    pub begin_pickup: Vec<i32>,
    /// Z where the pickup search ends.
    pub end_pickup: Vec<i32>,
    pub tip_types: Vec<u16>,
}

impl PickupTips {
    pub const ID: CommandId = CommandId::new(transport::OBJECT_DISCOVERY, PIPETTE_INTERFACE, 4);

    pub fn new(dest: Address) -> Self {
        Self {
            header: CommandHeader::new(dest),
            ..Self::default()
        }
    }
}

impl Command for PickupTips {
    type Response = ();

    fn id(&self) -> CommandId {
        Self::ID
    }

    command_header!();

    fn validate(&self) -> Result<()> {
        let n = self.channels.len();
        per_channel("x_positions", n, self.x_positions.len())?;
        per_channel("y_positions", n, self.y_positions.len())?;
        per_channel("begin_pickup", n, self.begin_pickup.len())?;
        per_channel("end_pickup", n, self.end_pickup.len())?;
        per_channel("tip_types", n, self.tip_types.len())
    }

    fn build_parameters(&self, params: &mut HoiParams) {
        params
            .u16_array(&self.channels)
            .i32_array(&self.x_positions)
            .i32_array(&self.y_positions)
            .i32(self.traverse_height)
            .i32_array(&self.begin_pickup)
            .i32_array(&self.end_pickup)
            .u16_array(&self.tip_types);
    }
}

/// Drop tips on a set of channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropTips {
    pub header: CommandHeader,
    pub channels: Vec<u16>,
    pub x_positions: Vec<i32>,
    pub y_positions: Vec<i32>,
    pub traverse_height: i32,
    pub begin_drop: Vec<i32>,
    pub end_drop: Vec<i32>,
}

impl DropTips {
    pub const ID: CommandId = CommandId::new(transport::OBJECT_DISCOVERY, PIPETTE_INTERFACE, 5);

    pub fn new(dest: Address) -> Self {
        Self {
            header: CommandHeader::new(dest),
            ..Self::default()
        }
    }
}

impl Command for DropTips {
    type Response = ();

    fn id(&self) -> CommandId {
        Self::ID
    }

    command_header!();

    fn validate(&self) -> Result<()> {
        let n = self.channels.len();
        per_channel("x_positions", n, self.x_positions.len())?;
        per_channel("y_positions", n, self.y_positions.len())?;
        per_channel("begin_drop", n, self.begin_drop.len())?;
        per_channel("end_drop", n, self.end_drop.len())
    }

    fn build_parameters(&self, params: &mut HoiParams) {
        params
            .u16_array(&self.channels)
            .i32_array(&self.x_positions)
            .i32_array(&self.y_positions)
            .i32(self.traverse_height)
            .i32_array(&self.begin_drop)
            .i32_array(&self.end_drop);
    }
}

/// Tip sensor reading, one entry per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipPresence {
    pub channels: Vec<bool>,
}

/// Query the tip sensors of every channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsTipPresent {
    pub header: CommandHeader,
}

impl IsTipPresent {
    pub const ID: CommandId = CommandId::new(transport::OBJECT_DISCOVERY, PIPETTE_INTERFACE, 16);

    pub fn new(dest: Address) -> Self {
        Self {
            header: CommandHeader::new(dest),
        }
    }
}

impl Command for IsTipPresent {
    type Response = TipPresence;

    fn id(&self) -> CommandId {
        Self::ID
    }

    command_header!();

    fn action_code(&self) -> u8 {
        hoi::STATUS_REQUEST
    }

    /// Accepts a bool array or an integer array where non-zero means present.
    fn parse_response_parameters(&self, data: &[u8]) -> Result<Option<TipPresence>> {
        let value = first_value(data, "tip presence array")?;
        let channels = match value.as_bool_array() {
            Some(flags) => flags.to_vec(),
            None => value
                .as_i64_array()
                .map(|raw| raw.into_iter().map(|v| v != 0).collect())
                .ok_or_else(|| {
                    CommandError::InvalidResponse(format!(
                        "tip presence should be an array, got {value}"
                    ))
                })?,
        };
        Ok(Some(TipPresence { channels }))
    }
}

#[cfg(test)]
mod tests {
    use hamtcp_codec::{HoiParamsParser, HoiValue};
    use hamtcp_message::CommandResponse;
    use hamtcp_packet::{HarpFrame, HoiFrame, TransportEnvelope};

    use super::*;

    const PIPETTE: Address = Address::new(1, 1, 257);
    const HOST: Address = Address::new(2, 1, 65535);

    fn sent_values(cmd: &impl Command) -> Vec<HoiValue> {
        let packet = cmd.build(Some(HOST), Some(1), true).unwrap();
        let parsed = CommandResponse::parse(&packet).unwrap();
        HoiParamsParser::new(&parsed.hoi.params)
            .parse_all()
            .unwrap()
            .into_iter()
            .map(|(_, v)| v)
            .collect()
    }

    fn status_reply(params: bytes::Bytes) -> CommandResponse {
        let hoi = HoiFrame::new(PIPETTE_INTERFACE, hoi::STATUS_RESPONSE, 16, params);
        let harp = HarpFrame::new(PIPETTE, HOST, 1, 2, hoi.pack().unwrap());
        let packet = TransportEnvelope::new(transport::OBJECT_DISCOVERY, harp.pack().unwrap())
            .pack()
            .unwrap();
        CommandResponse::parse(&packet).unwrap()
    }

    fn pickup() -> PickupTips {
        PickupTips {
            channels: vec![0, 1],
            x_positions: vec![14_000, 14_000],
            y_positions: vec![30_000, 29_100],
            traverse_height: 24_500,
            begin_pickup: vec![20_000, 20_000],
            end_pickup: vec![19_000, 19_000],
            tip_types: vec![4, 4],
            ..PickupTips::new(PIPETTE)
        }
    }

    #[test]
    fn pickup_parameter_order() {
        assert_eq!(
            sent_values(&pickup()),
            vec![
                HoiValue::U16Array(vec![0, 1]),
                HoiValue::I32Array(vec![14_000, 14_000]),
                HoiValue::I32Array(vec![30_000, 29_100]),
                HoiValue::I32(24_500),
                HoiValue::I32Array(vec![20_000, 20_000]),
                HoiValue::I32Array(vec![19_000, 19_000]),
                HoiValue::U16Array(vec![4, 4]),
            ]
        );
    }

    #[test]
    fn pickup_rejects_ragged_arguments() {
        let mut cmd = pickup();
        cmd.tip_types.pop();
        let err = cmd.build(Some(HOST), Some(1), true).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(msg) if msg.contains("tip_types")));
    }

    #[test]
    fn drop_parameter_order() {
        let cmd = DropTips {
            channels: vec![3],
            x_positions: vec![1],
            y_positions: vec![2],
            traverse_height: 3,
            begin_drop: vec![4],
            end_drop: vec![5],
            ..DropTips::new(PIPETTE)
        };
        let values = sent_values(&cmd);
        assert_eq!(values.len(), 6);
        assert_eq!(values[0], HoiValue::U16Array(vec![3]));
        assert_eq!(values[3], HoiValue::I32(3));
        assert_eq!(values[5], HoiValue::I32Array(vec![5]));
    }

    #[test]
    fn park_has_no_parameters() {
        assert!(sent_values(&Park::new(PIPETTE)).is_empty());
    }

    #[test]
    fn reads_tip_presence_from_bool_array() {
        let params = HoiParams::new().bool_array(&[true, false, true]).build().unwrap();
        let presence = IsTipPresent::new(PIPETTE)
            .interpret_response(&status_reply(params))
            .unwrap();
        assert_eq!(
            presence,
            Some(TipPresence {
                channels: vec![true, false, true]
            })
        );
    }

    #[test]
    fn reads_tip_presence_from_integer_array() {
        let params = HoiParams::new().i16_array(&[0, 1]).build().unwrap();
        let presence = IsTipPresent::new(PIPETTE)
            .interpret_response(&status_reply(params))
            .unwrap()
            .unwrap();
        assert_eq!(presence.channels, vec![false, true]);
    }

    #[test]
    fn tip_presence_rejects_scalar() {
        let params = HoiParams::new().string("no").build().unwrap();
        let err = IsTipPresent::new(PIPETTE)
            .interpret_response(&status_reply(params))
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidResponse(_)));
    }
}
