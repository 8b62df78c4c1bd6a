use bytes::{Bytes, BytesMut};
use hamtcp_codec::{HamiltonDataType, HoiParamsParser, HoiValue};
use hamtcp_message::RegistrationOption;
use hamtcp_packet::protocol::{connection, harp, hoi, registration, transport};
use hamtcp_packet::{
    decode_packet, ConnectionFrame, HarpFrame, HoiFrame, RegistrationFrame, TransportEnvelope,
    DEFAULT_MAX_PACKET,
};
use serde::Serialize;

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, message_error, packet_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_decoded, OutputFormat};

/// One packet, broken down as far as its layers are understood.
#[derive(Debug, Serialize)]
pub struct DecodedPacket {
    pub index: usize,
    pub length: usize,
    pub envelope: EnvelopeView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harp: Option<HarpView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoi: Option<HoiView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<RegistrationView>,
    /// Innermost undecoded bytes, written as-is by `--format raw`.
    #[serde(skip)]
    pub body: Bytes,
}

#[derive(Debug, Serialize)]
pub struct EnvelopeView {
    pub protocol: u8,
    pub protocol_name: &'static str,
    pub version: String,
    pub expected_version: bool,
    pub options_len: usize,
    pub payload_len: usize,
}

#[derive(Debug, Serialize)]
pub struct ConnectionView {
    pub version: u8,
    pub message_id: u8,
    pub params: Vec<ConnectionParamView>,
}

#[derive(Debug, Serialize)]
pub struct ConnectionParamView {
    pub id: u8,
    pub name: &'static str,
    pub type_id: u8,
    pub value: u16,
}

#[derive(Debug, Serialize)]
pub struct HarpView {
    pub src: String,
    pub dst: String,
    pub seq: u8,
    pub protocol: u8,
    pub protocol_name: &'static str,
    pub action_code: u8,
    pub response_required: bool,
    pub options_len: usize,
    pub payload_len: usize,
}

#[derive(Debug, Serialize)]
pub struct HoiView {
    pub interface_id: u8,
    pub action_code: u8,
    pub action_name: &'static str,
    pub action_id: u16,
    pub response_required: bool,
    pub exception: bool,
    pub fragments: Vec<FragmentView>,
}

#[derive(Debug, Serialize)]
pub struct FragmentView {
    pub type_id: u8,
    pub type_name: &'static str,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct RegistrationView {
    pub action_code: u16,
    pub action_name: &'static str,
    pub response_code: u16,
    pub req_address: String,
    pub res_address: String,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Serialize)]
pub struct OptionView {
    pub option_id: u8,
    pub value: String,
}

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input = match (&args.hex, &args.file) {
        (Some(text), _) => parse_hex(text)?,
        (None, Some(path)) => std::fs::read(path)
            .map_err(|err| io_error(&format!("read {}", path.display()), err))?,
        (None, None) => return Err(CliError::usage("no input given")),
    };

    for packet in decode_all(&input)? {
        print_decoded(&packet, format).map_err(|err| io_error("write output", err))?;
    }
    Ok(SUCCESS)
}

/// Accepts plain hex, optionally with whitespace or `:` between bytes.
pub fn parse_hex(text: &str) -> CliResult<Vec<u8>> {
    let digits: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(&digits);
    hex::decode(digits).map_err(|err| CliError::new(DATA_INVALID, format!("invalid hex input: {err}")))
}

/// Split `input` into packets by their size prefix and decode each one.
pub fn decode_all(input: &[u8]) -> CliResult<Vec<DecodedPacket>> {
    let mut buf = BytesMut::from(input);
    let mut packets = Vec::new();
    while let Some(packet) =
        decode_packet(&mut buf, DEFAULT_MAX_PACKET).map_err(|err| packet_error("framing", err))?
    {
        let index = packets.len();
        packets.push(decode_one(index, &packet)?);
    }
    if !buf.is_empty() {
        return Err(CliError::new(
            DATA_INVALID,
            format!(
                "{} trailing bytes after {} complete packet(s)",
                buf.len(),
                packets.len()
            ),
        ));
    }
    Ok(packets)
}

fn decode_one(index: usize, packet: &[u8]) -> CliResult<DecodedPacket> {
    let context = format!("packet {index}");
    let envelope =
        TransportEnvelope::unpack(packet).map_err(|err| packet_error(&context, err))?;
    tracing::debug!(index, protocol = envelope.protocol, len = packet.len(), "decoded envelope");

    let mut decoded = DecodedPacket {
        index,
        length: packet.len(),
        envelope: EnvelopeView {
            protocol: envelope.protocol,
            protocol_name: transport::name(envelope.protocol),
            version: envelope.version.to_string(),
            expected_version: envelope.is_expected_version(),
            options_len: envelope.options.len(),
            payload_len: envelope.payload.len(),
        },
        connection: None,
        harp: None,
        hoi: None,
        registration: None,
        body: envelope.payload.clone(),
    };

    if envelope.protocol == transport::INITIALIZATION {
        let frame = ConnectionFrame::unpack(&envelope.payload)
            .map_err(|err| packet_error(&format!("{context} connection frame"), err))?;
        decoded.connection = Some(connection_view(&frame));
        decoded.body = Bytes::new();
        return Ok(decoded);
    }

    let frame = HarpFrame::unpack(&envelope.payload)
        .map_err(|err| packet_error(&format!("{context} HARP frame"), err))?;
    decoded.harp = Some(HarpView {
        src: frame.src.to_string(),
        dst: frame.dst.to_string(),
        seq: frame.seq,
        protocol: frame.protocol,
        protocol_name: harp::name(frame.protocol),
        action_code: frame.action_code,
        response_required: frame.response_required,
        options_len: frame.options.len(),
        payload_len: frame.payload.len(),
    });
    decoded.body = frame.payload.clone();

    match frame.protocol {
        harp::HOI2 => {
            let hoi_frame = HoiFrame::unpack(&frame.payload)
                .map_err(|err| packet_error(&format!("{context} HOI frame"), err))?;
            decoded.hoi = Some(hoi_view(&hoi_frame, &context)?);
            decoded.body = hoi_frame.params;
        }
        harp::REGISTRATION2 => {
            let reg = RegistrationFrame::unpack(&frame.payload)
                .map_err(|err| packet_error(&format!("{context} registration frame"), err))?;
            decoded.registration = Some(registration_view(&reg, &context)?);
            decoded.body = reg.options;
        }
        other => tracing::debug!(index, protocol = other, "no decoder for HARP payload"),
    }
    Ok(decoded)
}

fn connection_view(frame: &ConnectionFrame) -> ConnectionView {
    ConnectionView {
        version: frame.version,
        message_id: frame.message_id,
        params: frame
            .params
            .iter()
            .map(|p| ConnectionParamView {
                id: p.id,
                name: connection::parameter_name(p.id),
                type_id: p.type_id,
                value: p.value,
            })
            .collect(),
    }
}

fn hoi_view(frame: &HoiFrame, context: &str) -> CliResult<HoiView> {
    let fragments = HoiParamsParser::new(&frame.params)
        .parse_all()
        .map_err(|err| message_error(&format!("{context} parameters"), err.into()))?
        .into_iter()
        .map(|(type_id, value)| fragment_view(type_id, &value))
        .collect();
    Ok(HoiView {
        interface_id: frame.interface_id,
        action_code: frame.action_code,
        action_name: hoi::action_name(frame.action_code),
        action_id: frame.action_id,
        response_required: frame.response_required,
        exception: hoi::is_exception(frame.action_code),
        fragments,
    })
}

fn fragment_view(type_id: u8, value: &HoiValue) -> FragmentView {
    FragmentView {
        type_id,
        type_name: HamiltonDataType::from_id(type_id)
            .map(HamiltonDataType::name)
            .unwrap_or("unknown"),
        value: value.to_string(),
    }
}

fn registration_view(frame: &RegistrationFrame, context: &str) -> CliResult<RegistrationView> {
    let options = RegistrationOption::parse_all(&frame.options)
        .map_err(|err| message_error(&format!("{context} registration options"), err))?
        .into_iter()
        .map(|option| OptionView {
            option_id: option.option_id(),
            value: match option {
                RegistrationOption::HarpProtocolRequest {
                    protocol,
                    request_id,
                } => format!("harp protocol request: protocol={protocol} request_id={request_id}"),
                RegistrationOption::Raw { data, .. } => hex::encode(data),
            },
        })
        .collect();
    Ok(RegistrationView {
        action_code: frame.action_code,
        action_name: registration::action_name(frame.action_code),
        response_code: frame.response_code,
        req_address: frame.req_address.to_string(),
        res_address: frame.res_address.to_string(),
        options,
    })
}
