use bytes::Bytes;
use hamtcp_codec::{HoiParams, HoiParamsParser, HoiValue};
use hamtcp_message::{CommandMessage, CommandResponse, MessageError};
use hamtcp_packet::protocol::hoi;
use hamtcp_packet::Address;

use crate::error::{CommandError, Result};

/// The `(protocol, interface_id, command_id)` triple naming one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId {
    /// Envelope protocol id.
    pub protocol: u8,
    pub interface_id: u8,
    /// HOI method id.
    pub command_id: u16,
}

impl CommandId {
    pub const fn new(protocol: u8, interface_id: u8, command_id: u16) -> Self {
        Self {
            protocol,
            interface_id,
            command_id,
        }
    }
}

/// Per-instance addressing state shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandHeader {
    pub dest: Address,
    pub sequence_number: u8,
    pub source_address: Option<Address>,
}

impl CommandHeader {
    pub fn new(dest: Address) -> Self {
        Self {
            dest,
            sequence_number: 0,
            source_address: None,
        }
    }
}

/// One instrument command.
///
/// Implementors supply their identity, their parameters and how to read the
/// reply. `build` and `interpret_response` tie those into whole packets.
pub trait Command {
    /// Structured result read from a successful reply.
    type Response;

    fn id(&self) -> CommandId;

    fn header(&self) -> &CommandHeader;

    fn header_mut(&mut self) -> &mut CommandHeader;

    /// HOI action code, [`hoi::COMMAND_REQUEST`] unless overridden.
    fn action_code(&self) -> u8 {
        hoi::COMMAND_REQUEST
    }

    /// Check arguments before encoding.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Append this command's arguments. Order is part of the wire contract.
    fn build_parameters(&self, _params: &mut HoiParams) {}

    /// Map the reply's parameter block to a structured result.
    fn parse_response_parameters(&self, _data: &[u8]) -> Result<Option<Self::Response>> {
        Ok(None)
    }

    fn set_source_address(&mut self, src: Address) {
        self.header_mut().source_address = Some(src);
    }

    fn set_sequence_number(&mut self, seq: u8) {
        self.header_mut().sequence_number = seq;
    }

    /// Build the packet, taking `src`/`seq` from the arguments or else from
    /// the header.
    fn build(&self, src: Option<Address>, seq: Option<u8>, response_required: bool) -> Result<Bytes> {
        let header = self.header();
        let source = src
            .or(header.source_address)
            .ok_or(CommandError::MissingSourceAddress)?;
        let sequence = seq.unwrap_or(header.sequence_number);
        self.validate()?;

        let mut params = HoiParams::new();
        self.build_parameters(&mut params);
        let params = params.build().map_err(MessageError::from)?;

        let id = self.id();
        let message = CommandMessage::new(header.dest, id.interface_id, id.command_id)
            .with_protocol(id.protocol)
            .with_action_code(self.action_code())
            .with_params(params);
        Ok(message.build(source, sequence, response_required)?)
    }

    /// Interpret a reply. Exception action codes become
    /// [`CommandError::DeviceException`] before any parameter parsing.
    fn interpret_response(&self, response: &CommandResponse) -> Result<Option<Self::Response>> {
        if response.is_exception() {
            tracing::debug!(
                action = hoi::action_name(response.hoi.action_code),
                interface_id = response.hoi.interface_id,
                action_id = response.hoi.action_id,
                seq = response.sequence_number(),
                "device reported exception"
            );
            return Err(CommandError::DeviceException {
                action_code: response.hoi.action_code,
                interface_id: response.hoi.interface_id,
                action_id: response.hoi.action_id,
            });
        }
        self.parse_response_parameters(response.params())
    }
}

/// Decode a reply parameter block into its values, in order.
pub fn response_values(data: &[u8]) -> Result<Vec<HoiValue>> {
    Ok(HoiParamsParser::new(data)
        .parse_all()?
        .into_iter()
        .map(|(_, value)| value)
        .collect())
}

/// First value of a reply, or an error naming what was expected.
pub(crate) fn first_value(data: &[u8], expected: &str) -> Result<HoiValue> {
    response_values(data)?
        .into_iter()
        .next()
        .ok_or_else(|| CommandError::InvalidResponse(format!("empty reply, expected {expected}")))
}
