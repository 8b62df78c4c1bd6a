use bytes::Bytes;
use hamtcp_codec::{HoiParamsParser, HoiValue};
use hamtcp_packet::protocol::{harp, hoi, transport};
use hamtcp_packet::{Address, HarpFrame, HoiFrame, TransportEnvelope};

use crate::error::{MessageError, Result};

/// A HOI method call addressed to one object.
///
/// Two independent response flags exist: the HARP flag (passed to
/// [`CommandMessage::build`]) asks the transport for a reply frame at all,
/// the HOI flag asks the object for a meaningful payload in that reply.
#[derive(Debug, Clone)]
pub struct CommandMessage {
    dest: Address,
    interface_id: u8,
    method_id: u16,
    params: Bytes,
    protocol: u8,
    action_code: u8,
    hoi_response_required: bool,
}

impl CommandMessage {
    pub fn new(dest: Address, interface_id: u8, method_id: u16) -> Self {
        Self {
            dest,
            interface_id,
            method_id,
            params: Bytes::new(),
            protocol: transport::OBJECT_DISCOVERY,
            action_code: hoi::COMMAND_REQUEST,
            hoi_response_required: false,
        }
    }

    /// Set the encoded DataFragment parameter block.
    pub fn with_params(mut self, params: impl Into<Bytes>) -> Self {
        self.params = params.into();
        self
    }

    /// Override the envelope protocol id.
    pub fn with_protocol(mut self, protocol: u8) -> Self {
        self.protocol = protocol;
        self
    }

    /// Override the action code, e.g. [`hoi::STATUS_REQUEST`] for queries.
    pub fn with_action_code(mut self, action_code: u8) -> Self {
        self.action_code = action_code;
        self
    }

    pub fn with_hoi_response_required(mut self, hoi_response_required: bool) -> Self {
        self.hoi_response_required = hoi_response_required;
        self
    }

    pub fn dest(&self) -> Address {
        self.dest
    }

    pub fn interface_id(&self) -> u8 {
        self.interface_id
    }

    pub fn method_id(&self) -> u16 {
        self.method_id
    }

    pub fn params(&self) -> &Bytes {
        &self.params
    }

    pub fn action_code(&self) -> u8 {
        self.action_code
    }

    /// Build the full packet. The HARP action code follows the HOI one.
    pub fn build(&self, src: Address, seq: u8, harp_response_required: bool) -> Result<Bytes> {
        let hoi = HoiFrame::new(self.interface_id, self.action_code, self.method_id, self.params.clone())
            .with_response_required(self.hoi_response_required);
        let harp = HarpFrame::new(src, self.dest, seq, harp::HOI2, hoi.pack()?)
            .with_action(self.action_code, harp_response_required);
        let packet = TransportEnvelope::new(self.protocol, harp.pack()?).pack()?;
        tracing::debug!(
            %src,
            dest = %self.dest,
            seq,
            interface_id = self.interface_id,
            method_id = self.method_id,
            action = hoi::action_name(self.action_code),
            len = packet.len(),
            "built command message"
        );
        Ok(packet)
    }
}

/// Parsed reply to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub ip: TransportEnvelope,
    pub harp: HarpFrame,
    pub hoi: HoiFrame,
}

impl CommandResponse {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let ip = TransportEnvelope::unpack(data)?;
        let harp = HarpFrame::unpack(&ip.payload)?;
        if harp.protocol != harp::HOI2 {
            return Err(MessageError::UnexpectedProtocol {
                layer: "harp",
                expected: harp::HOI2,
                actual: harp.protocol,
            });
        }
        let hoi = HoiFrame::unpack(&harp.payload)?;
        Ok(Self { ip, harp, hoi })
    }

    pub fn sequence_number(&self) -> u8 {
        self.harp.seq
    }

    /// Encoded DataFragments of the reply.
    pub fn params(&self) -> &Bytes {
        &self.hoi.params
    }

    /// Decode every fragment of the reply.
    pub fn parse_params(&self) -> Result<Vec<(u8, HoiValue)>> {
        Ok(HoiParamsParser::new(&self.hoi.params).parse_all()?)
    }

    /// True when the object reported a failure instead of a result.
    pub fn is_exception(&self) -> bool {
        hoi::is_exception(self.hoi.action_code)
    }

    /// True when this reply answers a command sent to `dest` with `seq`.
    pub fn correlates_with(&self, dest: Address, seq: u8) -> bool {
        self.harp.src == dest && self.harp.seq == seq
    }
}

#[cfg(test)]
mod tests {
    use hamtcp_codec::{HamiltonDataType, HoiParams};

    use super::*;

    fn reply(action_code: u8, params: Bytes) -> Bytes {
        let hoi = HoiFrame::new(1, action_code, 4, params);
        let harp = HarpFrame::new(Address::new(1, 1, 257), Address::new(2, 1, 65535), 5, harp::HOI2, hoi.pack().unwrap())
            .with_action(action_code, false);
        TransportEnvelope::new(transport::OBJECT_DISCOVERY, harp.pack().unwrap())
            .pack()
            .unwrap()
    }

    #[test]
    fn seed_command_unpacks_layer_by_layer() {
        let dest = Address::new(1, 1, 257);
        let params = HoiParams::new().i32(100).build().unwrap();
        let packet = CommandMessage::new(dest, 1, 4)
            .with_params(params.clone())
            .build(Address::new(2, 1, 65535), 5, true)
            .unwrap();

        let ip = TransportEnvelope::unpack(&packet).unwrap();
        assert_eq!(ip.protocol, 6);
        let harp = HarpFrame::unpack(&ip.payload).unwrap();
        assert_eq!(harp.dst, dest);
        assert_eq!(harp.seq, 5);
        assert_eq!(harp.protocol, 2);
        assert!(harp.response_required);
        let hoi = HoiFrame::unpack(&harp.payload).unwrap();
        assert_eq!(hoi.interface_id, 1);
        assert_eq!(hoi.action_id, 4);
        assert_eq!(hoi.action_code, hoi::COMMAND_REQUEST);
        assert!(!hoi.response_required);
        assert_eq!(hoi.params, params);
    }

    #[test]
    fn response_flags_are_independent() {
        let packet = CommandMessage::new(Address::new(1, 1, 257), 1, 4)
            .with_hoi_response_required(true)
            .build(Address::new(2, 1, 65535), 1, false)
            .unwrap();
        let parsed = CommandResponse::parse(&packet).unwrap();
        assert!(!parsed.harp.response_required);
        assert!(parsed.hoi.response_required);
    }

    #[test]
    fn status_action_code_reaches_both_layers() {
        let packet = CommandMessage::new(Address::new(1, 1, 257), 1, 4)
            .with_action_code(hoi::STATUS_REQUEST)
            .build(Address::new(2, 1, 65535), 1, true)
            .unwrap();
        let parsed = CommandResponse::parse(&packet).unwrap();
        assert_eq!(parsed.harp.action_code, hoi::STATUS_REQUEST);
        assert_eq!(parsed.hoi.action_code, hoi::STATUS_REQUEST);
    }

    #[test]
    fn parses_reply_params_and_correlates() {
        let params = HoiParams::new().bool_value(true).build().unwrap();
        let response = CommandResponse::parse(&reply(hoi::COMMAND_RESPONSE, params)).unwrap();
        assert_eq!(response.sequence_number(), 5);
        assert!(!response.is_exception());
        assert!(response.correlates_with(Address::new(1, 1, 257), 5));
        assert!(!response.correlates_with(Address::new(1, 1, 257), 6));
        assert!(!response.correlates_with(Address::new(1, 1, 258), 5));
        assert_eq!(
            response.parse_params().unwrap(),
            vec![(HamiltonDataType::Bool.id(), HoiValue::Bool(true))]
        );
    }

    #[test]
    fn exception_reply_is_flagged() {
        let response = CommandResponse::parse(&reply(hoi::COMMAND_EXCEPTION, Bytes::new())).unwrap();
        assert!(response.is_exception());
    }

    #[test]
    fn truncated_reply_fails() {
        let packet = reply(hoi::COMMAND_RESPONSE, Bytes::new());
        let short = &packet[..packet.len() - 3];
        assert!(matches!(
            CommandResponse::parse(short),
            Err(MessageError::Packet(_))
        ));
    }
}
