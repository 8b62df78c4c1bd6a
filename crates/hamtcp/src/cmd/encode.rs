use std::str::FromStr;
use std::time::Duration;

use hamtcp_codec::{HamiltonDataType, HoiValue};
use hamtcp_command::{Command, DynamicCommand};
use hamtcp_message::{InitConfig, InitMessage};

use crate::cmd::{CommandArgs, EncodeArgs, EncodeTarget, InitArgs};
use crate::exit::{command_error, io_error, message_error, CliError, CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let (kind, bytes) = match args.target {
        EncodeTarget::Init(args) => ("init", encode_init(&args)?),
        EncodeTarget::Command(args) => ("command", encode_command(&args)?),
    };
    print_encoded(kind, &bytes, format).map_err(|err| io_error("write output", err))?;
    Ok(SUCCESS)
}

fn encode_init(args: &InitArgs) -> CliResult<Vec<u8>> {
    let message = InitMessage::new(InitConfig {
        timeout: Duration::from_secs(args.timeout),
        client_id: args.client_id,
        connection_type: args.connection_type,
    });
    let packet = message
        .build()
        .map_err(|err| message_error("encode init", err))?;
    Ok(packet.to_vec())
}

fn encode_command(args: &CommandArgs) -> CliResult<Vec<u8>> {
    let params = args
        .param
        .iter()
        .map(|spec| parse_param(spec).map_err(CliError::usage))
        .collect::<CliResult<Vec<_>>>()?;

    let command = DynamicCommand::builder()
        .protocol(args.protocol)
        .interface_id(args.interface)
        .command_id(args.method)
        .action_code(args.action)
        .params(params)
        .build(args.dest)
        .map_err(|err| command_error("encode command", err))?;

    tracing::debug!(
        dest = %args.dest,
        seq = args.seq,
        params = command.params().len(),
        "encoding command"
    );
    let packet = command
        .build(Some(args.src), Some(args.seq), !args.no_response)
        .map_err(|err| command_error("encode command", err))?;
    Ok(packet.to_vec())
}

/// Parse a `TYPE:VALUE` argument. Array values are comma-separated; an empty
/// value gives an empty array.
pub fn parse_param(spec: &str) -> Result<HoiValue, String> {
    let (type_name, raw) = spec
        .split_once(':')
        .ok_or_else(|| format!("parameter {spec:?} is not TYPE:VALUE"))?;
    let data_type = (0..=u8::MAX)
        .filter_map(HamiltonDataType::from_id)
        .find(|t| t.name() == type_name)
        .ok_or_else(|| format!("unknown parameter type {type_name:?}"))?;

    use HamiltonDataType as T;
    let value = match data_type {
        T::I8 => HoiValue::I8(scalar(raw)?),
        T::I16 => HoiValue::I16(scalar(raw)?),
        T::I32 => HoiValue::I32(scalar(raw)?),
        T::I64 => HoiValue::I64(scalar(raw)?),
        T::U8 => HoiValue::U8(scalar(raw)?),
        T::U16 => HoiValue::U16(scalar(raw)?),
        T::U32 => HoiValue::U32(scalar(raw)?),
        T::U64 => HoiValue::U64(scalar(raw)?),
        T::F32 => HoiValue::F32(scalar(raw)?),
        T::F64 => HoiValue::F64(scalar(raw)?),
        T::Bool => HoiValue::Bool(boolean(raw)?),
        T::String => HoiValue::String(raw.to_string()),
        T::I8Array => HoiValue::I8Array(list(raw)?),
        T::I16Array => HoiValue::I16Array(list(raw)?),
        T::I32Array => HoiValue::I32Array(list(raw)?),
        T::I64Array => HoiValue::I64Array(list(raw)?),
        T::U8Array => HoiValue::U8Array(list(raw)?),
        T::U16Array => HoiValue::U16Array(list(raw)?),
        T::U32Array => HoiValue::U32Array(list(raw)?),
        T::U64Array => HoiValue::U64Array(list(raw)?),
        T::F32Array => HoiValue::F32Array(list(raw)?),
        T::F64Array => HoiValue::F64Array(list(raw)?),
        T::BoolArray => HoiValue::BoolArray(items(raw).map(boolean).collect::<Result<_, _>>()?),
        T::StringArray => HoiValue::StringArray(items(raw).map(str::to_string).collect()),
    };
    Ok(value)
}

fn scalar<V: FromStr>(raw: &str) -> Result<V, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("cannot parse {raw:?} as {}", std::any::type_name::<V>()))
}

fn boolean(raw: &str) -> Result<bool, String> {
    match raw.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(format!("cannot parse {other:?} as bool")),
    }
}

fn items(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').filter(|s| !s.is_empty())
}

fn list<V: FromStr>(raw: &str) -> Result<Vec<V>, String> {
    items(raw).map(scalar::<V>).collect()
}

#[cfg(test)]
mod tests {
    use hamtcp_message::CommandResponse;
    use hamtcp_packet::Address;

    use super::*;
    use crate::exit::USAGE;

    fn args(params: &[&str]) -> CommandArgs {
        CommandArgs {
            dest: Address::new(1, 1, 257),
            src: Address::new(2, 1, 65535),
            seq: 5,
            protocol: 6,
            interface: 1,
            method: 4,
            action: 3,
            param: params.iter().map(|s| s.to_string()).collect(),
            no_response: false,
        }
    }

    #[test]
    fn parses_scalars_and_arrays() {
        assert_eq!(parse_param("i32:-7").unwrap(), HoiValue::I32(-7));
        assert_eq!(parse_param("bool:1").unwrap(), HoiValue::Bool(true));
        assert_eq!(
            parse_param("u16[]:0,1,2").unwrap(),
            HoiValue::U16Array(vec![0, 1, 2])
        );
        assert_eq!(parse_param("i32[]:").unwrap(), HoiValue::I32Array(vec![]));
        assert_eq!(
            parse_param("bool[]:true,false").unwrap(),
            HoiValue::BoolArray(vec![true, false])
        );
    }

    #[test]
    fn string_value_keeps_colons() {
        assert_eq!(
            parse_param("string:a:b").unwrap(),
            HoiValue::String("a:b".into())
        );
    }

    #[test]
    fn rejects_bad_params() {
        assert!(parse_param("i32").unwrap_err().contains("TYPE:VALUE"));
        assert!(parse_param("i128:1").unwrap_err().contains("unknown parameter type"));
        assert!(parse_param("u8:300").unwrap_err().contains("cannot parse"));
    }

    #[test]
    fn command_matches_seed_layout() {
        let bytes = encode_command(&args(&["i32:100"])).unwrap();
        let parsed = CommandResponse::parse(&bytes).unwrap();
        assert_eq!(parsed.ip.protocol, 6);
        assert_eq!(parsed.harp.src, Address::new(2, 1, 65535));
        assert_eq!(parsed.harp.dst, Address::new(1, 1, 257));
        assert_eq!(parsed.harp.seq, 5);
        assert!(parsed.harp.response_required);
        assert_eq!(parsed.hoi.interface_id, 1);
        assert_eq!(parsed.hoi.action_id, 4);
        assert_eq!(parsed.parse_params().unwrap(), vec![(3, HoiValue::I32(100))]);
    }

    #[test]
    fn bad_param_is_usage_error() {
        let err = encode_command(&args(&["i32:abc"])).unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn oversized_init_timeout_is_usage_error() {
        let err = encode_init(&InitArgs {
            timeout: 70_000,
            client_id: 0,
            connection_type: 1,
        })
        .unwrap_err();
        assert_eq!(err.code, USAGE);
    }
}
