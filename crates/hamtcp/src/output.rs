use std::io::{self, IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use crate::cmd::decode::DecodedPacket;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_decoded(packet: &DecodedPacket, format: OutputFormat) -> io::Result<()> {
    write_decoded(&mut io::stdout().lock(), packet, format)
}

fn write_decoded<W: Write>(
    out: &mut W,
    packet: &DecodedPacket,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(out, packet)?,
        OutputFormat::Table => {
            let mut table = new_table(vec!["LAYER", "FIELD", "VALUE"]);
            for (layer, field, value) in rows(packet) {
                table.add_row(vec![layer.to_string(), field, value]);
            }
            writeln!(out, "{table}")?;
        }
        OutputFormat::Pretty => {
            let mut current = "";
            for (layer, field, value) in rows(packet) {
                if layer != current {
                    writeln!(out, "{layer}:")?;
                    current = layer;
                }
                writeln!(out, "  {field} = {value}")?;
            }
        }
        OutputFormat::Raw => out.write_all(packet.body.as_ref())?,
    }
    out.flush()
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    kind: &'a str,
    length: usize,
    hex: String,
}

pub fn print_encoded(kind: &str, bytes: &[u8], format: OutputFormat) -> io::Result<()> {
    write_encoded(&mut io::stdout().lock(), kind, bytes, format)
}

fn write_encoded<W: Write>(
    out: &mut W,
    kind: &str,
    bytes: &[u8],
    format: OutputFormat,
) -> io::Result<()> {
    let hex = hex::encode(bytes);
    match format {
        OutputFormat::Json => write_json(
            out,
            &EncodedOutput {
                kind,
                length: bytes.len(),
                hex,
            },
        )?,
        OutputFormat::Table => {
            let mut table = new_table(vec!["KIND", "LENGTH", "HEX"]);
            table.add_row(vec![kind.to_string(), bytes.len().to_string(), hex]);
            writeln!(out, "{table}")?;
        }
        OutputFormat::Pretty => writeln!(out, "{hex}")?,
        OutputFormat::Raw => out.write_all(bytes)?,
    }
    out.flush()
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Flatten a decoded packet into `(layer, field, value)` rows, outermost
/// layer first.
fn rows(packet: &DecodedPacket) -> Vec<(&'static str, String, String)> {
    let mut out = Vec::new();
    let mut push = |layer: &'static str, field: &str, value: String| {
        out.push((layer, field.to_string(), value));
    };

    let env = &packet.envelope;
    push("envelope", "packet", format!("#{} ({} bytes)", packet.index, packet.length));
    push(
        "envelope",
        "protocol",
        format!("{} ({})", env.protocol, env.protocol_name),
    );
    let version = if env.expected_version {
        env.version.clone()
    } else {
        format!("{} (unexpected)", env.version)
    };
    push("envelope", "version", version);
    push("envelope", "options", format!("{} bytes", env.options_len));

    if let Some(conn) = &packet.connection {
        push("connection", "version", conn.version.to_string());
        push("connection", "message_id", conn.message_id.to_string());
        for p in &conn.params {
            push("connection", p.name, format!("{} (id {}, type {})", p.value, p.id, p.type_id));
        }
    }

    if let Some(harp) = &packet.harp {
        push("harp", "src", harp.src.clone());
        push("harp", "dst", harp.dst.clone());
        push("harp", "seq", harp.seq.to_string());
        push(
            "harp",
            "protocol",
            format!("{} ({})", harp.protocol, harp.protocol_name),
        );
        push("harp", "action", harp.action_code.to_string());
        push("harp", "response_required", harp.response_required.to_string());
        push("harp", "payload", format!("{} bytes", harp.payload_len));
    }

    if let Some(hoi) = &packet.hoi {
        push("hoi", "interface", hoi.interface_id.to_string());
        push(
            "hoi",
            "action",
            format!("{} ({})", hoi.action_code, hoi.action_name),
        );
        push("hoi", "method", hoi.action_id.to_string());
        push("hoi", "response_required", hoi.response_required.to_string());
        for (i, frag) in hoi.fragments.iter().enumerate() {
            push(
                "hoi",
                &format!("param[{i}]"),
                format!("{}: {}", frag.type_name, frag.value),
            );
        }
    }

    if let Some(reg) = &packet.registration {
        push(
            "registration",
            "action",
            format!("{} ({})", reg.action_code, reg.action_name),
        );
        push("registration", "response_code", reg.response_code.to_string());
        push("registration", "req_address", reg.req_address.clone());
        push("registration", "res_address", reg.res_address.clone());
        for opt in &reg.options {
            push("registration", &format!("option {}", opt.option_id), opt.value.clone());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use hamtcp_codec::HoiParams;
    use hamtcp_message::CommandMessage;
    use hamtcp_packet::Address;

    use super::*;
    use crate::cmd::decode::decode_all;

    #[test]
    fn rows_walk_layers_outside_in() {
        let params = HoiParams::new().u16_array(&[0, 1]).build().unwrap();
        let packet = CommandMessage::new(Address::new(1, 1, 257), 1, 16)
            .with_params(params)
            .build(Address::new(2, 1, 65535), 9, true)
            .unwrap();
        let decoded = decode_all(&packet).unwrap().remove(0);

        let rows = rows(&decoded);
        let layers: Vec<&str> = rows.iter().map(|(layer, _, _)| *layer).collect();
        let first_harp = layers.iter().position(|l| *l == "harp").unwrap();
        let first_hoi = layers.iter().position(|l| *l == "hoi").unwrap();
        assert_eq!(layers[0], "envelope");
        assert!(first_harp < first_hoi);

        let param = rows.iter().find(|(_, field, _)| field == "param[0]").unwrap();
        assert_eq!(param.2, "u16[]: [0, 1]");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn encoded_formats_write_expected_text() {
        let mut out = Vec::new();
        write_encoded(&mut out, "init", &[0xAB, 0x01], OutputFormat::Json).unwrap();
        assert_eq!(out, b"{\"kind\":\"init\",\"length\":2,\"hex\":\"ab01\"}\n");

        let mut out = Vec::new();
        write_encoded(&mut out, "init", &[0xAB, 0x01], OutputFormat::Raw).unwrap();
        assert_eq!(out, [0xAB, 0x01]);
    }

    #[test]
    fn write_failures_are_returned() {
        let formats = [
            OutputFormat::Json,
            OutputFormat::Table,
            OutputFormat::Pretty,
            OutputFormat::Raw,
        ];
        for format in formats {
            let err = write_encoded(&mut ClosedPipe, "command", &[1, 2, 3], format).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        }

        let packet = CommandMessage::new(Address::new(1, 1, 257), 1, 16)
            .build(Address::new(2, 1, 65535), 9, true)
            .unwrap();
        let decoded = decode_all(&packet).unwrap().remove(0);
        let err = write_decoded(&mut ClosedPipe, &decoded, OutputFormat::Raw).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
