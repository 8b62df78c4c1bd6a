use hamtcp_codec::HoiParams;
use hamtcp_packet::protocol::transport;
use hamtcp_packet::Address;

use super::{command_header, per_channel, PIPETTE_INTERFACE};
use crate::command::{Command, CommandHeader, CommandId};
use crate::error::Result;

/// Aspirate liquid on a set of channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aspirate {
    pub header: CommandHeader,
    pub channels: Vec<u16>,
    pub x_positions: Vec<i32>,
    pub y_positions: Vec<i32>,
    pub traverse_height: i32,
    /// Z of the liquid surface the channel starts from.
    pub liquid_heights: Vec<i32>,
    pub volumes: Vec<u32>,
    pub flow_rates: Vec<u32>,
    /// Wait after aspiration, in 0.1 s.
    pub settling_times: Vec<u32>,
}

impl Aspirate {
    pub const ID: CommandId = CommandId::new(transport::OBJECT_DISCOVERY, PIPETTE_INTERFACE, 6);

    pub fn new(dest: Address) -> Self {
        Self {
            header: CommandHeader::new(dest),
            ..Self::default()
        }
    }
}

impl Command for Aspirate {
    type Response = ();

    fn id(&self) -> CommandId {
        Self::ID
    }

    command_header!();

    fn validate(&self) -> Result<()> {
        let n = self.channels.len();
        per_channel("x_positions", n, self.x_positions.len())?;
        per_channel("y_positions", n, self.y_positions.len())?;
        per_channel("liquid_heights", n, self.liquid_heights.len())?;
        per_channel("volumes", n, self.volumes.len())?;
        per_channel("flow_rates", n, self.flow_rates.len())?;
        per_channel("settling_times", n, self.settling_times.len())
    }

    fn build_parameters(&self, params: &mut HoiParams) {
        params
            .u16_array(&self.channels)
            .i32_array(&self.x_positions)
            .i32_array(&self.y_positions)
            .i32(self.traverse_height)
            .i32_array(&self.liquid_heights)
            .u32_array(&self.volumes)
            .u32_array(&self.flow_rates)
            .u32_array(&self.settling_times);
    }
}

/// Dispense liquid on a set of channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispense {
    pub header: CommandHeader,
    pub channels: Vec<u16>,
    pub x_positions: Vec<i32>,
    pub y_positions: Vec<i32>,
    pub traverse_height: i32,
    /// Z the channel dispenses at.
    pub dispense_heights: Vec<i32>,
    pub volumes: Vec<u32>,
    pub flow_rates: Vec<u32>,
    /// Dispense everything left in the tip, ignoring `volumes`.
    pub empty_tip: Vec<bool>,
}

impl Dispense {
    pub const ID: CommandId = CommandId::new(transport::OBJECT_DISCOVERY, PIPETTE_INTERFACE, 7);

    pub fn new(dest: Address) -> Self {
        Self {
            header: CommandHeader::new(dest),
            ..Self::default()
        }
    }
}

impl Command for Dispense {
    type Response = ();

    fn id(&self) -> CommandId {
        Self::ID
    }

    command_header!();

    fn validate(&self) -> Result<()> {
        let n = self.channels.len();
        per_channel("x_positions", n, self.x_positions.len())?;
        per_channel("y_positions", n, self.y_positions.len())?;
        per_channel("dispense_heights", n, self.dispense_heights.len())?;
        per_channel("volumes", n, self.volumes.len())?;
        per_channel("flow_rates", n, self.flow_rates.len())?;
        per_channel("empty_tip", n, self.empty_tip.len())
    }

    fn build_parameters(&self, params: &mut HoiParams) {
        params
            .u16_array(&self.channels)
            .i32_array(&self.x_positions)
            .i32_array(&self.y_positions)
            .i32(self.traverse_height)
            .i32_array(&self.dispense_heights)
            .u32_array(&self.volumes)
            .u32_array(&self.flow_rates)
            .bool_array(&self.empty_tip);
    }
}

#[cfg(test)]
mod tests {
    use hamtcp_codec::{HamiltonDataType, HoiValue};
    use hamtcp_message::CommandResponse;

    use super::*;
    use crate::error::CommandError;

    const PIPETTE: Address = Address::new(1, 1, 257);

    #[test]
    fn aspirate_parameter_order() {
        let cmd = Aspirate {
            channels: vec![0],
            x_positions: vec![10],
            y_positions: vec![20],
            traverse_height: 30,
            liquid_heights: vec![40],
            volumes: vec![1000],
            flow_rates: vec![500],
            settling_times: vec![5],
            ..Aspirate::new(PIPETTE)
        };
        let packet = cmd.build(Some(Address::new(2, 1, 65535)), Some(9), true).unwrap();
        let parsed = CommandResponse::parse(&packet).unwrap();
        assert_eq!(parsed.hoi.action_id, 6);
        let types: Vec<u8> = parsed
            .parse_params()
            .unwrap()
            .into_iter()
            .map(|(type_id, _)| type_id)
            .collect();
        assert_eq!(
            types,
            [
                HamiltonDataType::U16Array,
                HamiltonDataType::I32Array,
                HamiltonDataType::I32Array,
                HamiltonDataType::I32,
                HamiltonDataType::I32Array,
                HamiltonDataType::U32Array,
                HamiltonDataType::U32Array,
                HamiltonDataType::U32Array,
            ]
            .map(HamiltonDataType::id)
        );
    }

    #[test]
    fn dispense_encodes_empty_tip_flags_last() {
        let cmd = Dispense {
            channels: vec![0, 1],
            x_positions: vec![1, 1],
            y_positions: vec![2, 2],
            dispense_heights: vec![3, 3],
            volumes: vec![100, 200],
            flow_rates: vec![50, 50],
            empty_tip: vec![false, true],
            ..Dispense::new(PIPETTE)
        };
        let packet = cmd.build(Some(Address::new(2, 1, 65535)), Some(9), true).unwrap();
        let values = CommandResponse::parse(&packet).unwrap().parse_params().unwrap();
        assert_eq!(values.len(), 8);
        assert_eq!(values[5].1, HoiValue::U32Array(vec![100, 200]));
        assert_eq!(values[7].1, HoiValue::BoolArray(vec![false, true]));
    }

    #[test]
    fn dispense_rejects_missing_volumes() {
        let cmd = Dispense {
            channels: vec![0],
            x_positions: vec![1],
            y_positions: vec![2],
            dispense_heights: vec![3],
            flow_rates: vec![50],
            empty_tip: vec![false],
            ..Dispense::new(PIPETTE)
        };
        let err = cmd.build(Some(Address::new(2, 1, 65535)), None, true).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(msg) if msg.contains("volumes")));
    }
}
