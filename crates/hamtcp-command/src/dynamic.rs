use hamtcp_codec::{HoiParams, HoiParamsParser, HoiValue};
use hamtcp_packet::protocol::hoi;
use hamtcp_packet::Address;

use crate::command::{Command, CommandHeader, CommandId};
use crate::error::{CommandError, Result};

/// A command whose identity is only known at runtime, e.g. one found through
/// object discovery or typed on a command line.
///
/// Construction through [`DynamicCommandBuilder::build`] is the single point
/// where a missing protocol, interface id or command id is reported.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicCommand {
    header: CommandHeader,
    id: CommandId,
    action_code: u8,
    params: Vec<HoiValue>,
}

impl DynamicCommand {
    pub fn builder() -> DynamicCommandBuilder {
        DynamicCommandBuilder::default()
    }

    pub fn params(&self) -> &[HoiValue] {
        &self.params
    }
}

impl Command for DynamicCommand {
    /// Every reply value with its type id.
    type Response = Vec<(u8, HoiValue)>;

    fn id(&self) -> CommandId {
        self.id
    }

    fn header(&self) -> &CommandHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut CommandHeader {
        &mut self.header
    }

    fn action_code(&self) -> u8 {
        self.action_code
    }

    fn build_parameters(&self, params: &mut HoiParams) {
        for value in &self.params {
            params.value(value);
        }
    }

    fn parse_response_parameters(&self, data: &[u8]) -> Result<Option<Self::Response>> {
        Ok(Some(HoiParamsParser::new(data).parse_all()?))
    }
}

/// Builder for [`DynamicCommand`].
#[derive(Debug, Clone)]
pub struct DynamicCommandBuilder {
    protocol: Option<u8>,
    interface_id: Option<u8>,
    command_id: Option<u16>,
    action_code: u8,
    params: Vec<HoiValue>,
}

impl Default for DynamicCommandBuilder {
    fn default() -> Self {
        Self {
            protocol: None,
            interface_id: None,
            command_id: None,
            action_code: hoi::COMMAND_REQUEST,
            params: Vec::new(),
        }
    }
}

impl DynamicCommandBuilder {
    pub fn protocol(mut self, protocol: u8) -> Self {
        self.protocol = Some(protocol);
        self
    }

    pub fn interface_id(mut self, interface_id: u8) -> Self {
        self.interface_id = Some(interface_id);
        self
    }

    pub fn command_id(mut self, command_id: u16) -> Self {
        self.command_id = Some(command_id);
        self
    }

    pub fn action_code(mut self, action_code: u8) -> Self {
        self.action_code = action_code;
        self
    }

    /// Append one argument.
    pub fn param(mut self, value: HoiValue) -> Self {
        self.params.push(value);
        self
    }

    pub fn params(mut self, values: impl IntoIterator<Item = HoiValue>) -> Self {
        self.params.extend(values);
        self
    }

    /// Finish the command for `dest`.
    pub fn build(self, dest: Address) -> Result<DynamicCommand> {
        let protocol = self.protocol.ok_or(CommandError::MissingField("protocol"))?;
        let interface_id = self
            .interface_id
            .ok_or(CommandError::MissingField("interface_id"))?;
        let command_id = self.command_id.ok_or(CommandError::MissingField("command_id"))?;
        Ok(DynamicCommand {
            header: CommandHeader::new(dest),
            id: CommandId::new(protocol, interface_id, command_id),
            action_code: self.action_code,
            params: self.params,
        })
    }
}
