use bytes::{BufMut, Bytes, BytesMut};
use hamtcp_codec::Reader;
use hamtcp_packet::protocol::{harp, hoi, registration, transport};
use hamtcp_packet::{Address, HarpFrame, RegistrationFrame, TransportEnvelope};

use crate::error::{MessageError, Result};

/// One `[option_id:1][length:1][data]` record in a registration frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOption {
    /// Ask the node which HARP protocol it speaks.
    HarpProtocolRequest { protocol: u8, request_id: u8 },
    /// Any other option, kept as raw bytes.
    Raw { option_id: u8, data: Bytes },
}

impl RegistrationOption {
    pub fn option_id(&self) -> u8 {
        match self {
            Self::HarpProtocolRequest { .. } => registration::option::HARP_PROTOCOL_REQUEST,
            Self::Raw { option_id, .. } => *option_id,
        }
    }

    fn data(&self) -> Bytes {
        match self {
            Self::HarpProtocolRequest {
                protocol,
                request_id,
            } => Bytes::copy_from_slice(&[*protocol, *request_id]),
            Self::Raw { data, .. } => data.clone(),
        }
    }

    /// Append this option's record to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        let data = self.data();
        let len = u8::try_from(data.len()).map_err(|_| {
            MessageError::InvalidRegistrationOption(format!(
                "option {} data is {} bytes (max 255)",
                self.option_id(),
                data.len()
            ))
        })?;
        dst.put_u8(self.option_id());
        dst.put_u8(len);
        dst.put_slice(&data);
        Ok(())
    }

    /// Parse every record in an options block.
    pub fn parse_all(options: &[u8]) -> Result<Vec<Self>> {
        let mut r = Reader::new(options);
        let mut out = Vec::new();
        while r.has_remaining() {
            let option_id = r.u8()?;
            let len = r.u8()?;
            let data = r.raw_bytes(usize::from(len))?;
            let option = match (option_id, data) {
                (registration::option::HARP_PROTOCOL_REQUEST, &[protocol, request_id]) => {
                    Self::HarpProtocolRequest {
                        protocol,
                        request_id,
                    }
                }
                _ => Self::Raw {
                    option_id,
                    data: Bytes::copy_from_slice(data),
                },
            };
            out.push(option);
        }
        Ok(out)
    }
}

/// Discovery/registration request.
#[derive(Debug, Clone)]
pub struct RegistrationMessage {
    dest: Address,
    action_code: u16,
    options: BytesMut,
}

impl RegistrationMessage {
    pub fn new(dest: Address, action_code: u16) -> Self {
        Self {
            dest,
            action_code,
            options: BytesMut::new(),
        }
    }

    pub fn dest(&self) -> Address {
        self.dest
    }

    pub fn action_code(&self) -> u16 {
        self.action_code
    }

    /// Append one option; options are written in the order they are added.
    pub fn add_registration_option(&mut self, option: RegistrationOption) -> Result<&mut Self> {
        option.encode(&mut self.options)?;
        Ok(self)
    }

    pub fn build(&self, src: Address, req_address: Address, res_address: Address, seq: u8) -> Result<Bytes> {
        let frame = RegistrationFrame::new(self.action_code, req_address, res_address)
            .with_options(self.options.clone().freeze());
        let harp = HarpFrame::new(src, self.dest, seq, harp::REGISTRATION2, frame.pack()?)
            .with_action(hoi::COMMAND_REQUEST, true);
        let packet = TransportEnvelope::new(transport::OBJECT_DISCOVERY, harp.pack()?).pack()?;
        tracing::debug!(
            action = registration::action_name(self.action_code),
            %src,
            dest = %self.dest,
            seq,
            "built registration message"
        );
        Ok(packet)
    }
}

/// Parsed registration reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationResponse {
    pub ip: TransportEnvelope,
    pub harp: HarpFrame,
    pub registration: RegistrationFrame,
}

impl RegistrationResponse {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let ip = TransportEnvelope::unpack(data)?;
        let harp = HarpFrame::unpack(&ip.payload)?;
        if harp.protocol != harp::REGISTRATION2 {
            return Err(MessageError::UnexpectedProtocol {
                layer: "harp",
                expected: harp::REGISTRATION2,
                actual: harp.protocol,
            });
        }
        let registration = RegistrationFrame::unpack(&harp.payload)?;
        Ok(Self {
            ip,
            harp,
            registration,
        })
    }

    pub fn sequence_number(&self) -> u8 {
        self.harp.seq
    }

    pub fn options(&self) -> Result<Vec<RegistrationOption>> {
        RegistrationOption::parse_all(&self.registration.options)
    }
}
