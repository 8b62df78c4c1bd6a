use std::path::PathBuf;

use clap::{Args, Subcommand};
use hamtcp_packet::protocol::{hoi, transport};
use hamtcp_packet::Address;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode captured packets layer by layer.
    Decode(DecodeArgs),
    /// Encode a packet and print its bytes.
    Encode(EncodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Packet bytes as hex. Whitespace and `:` separators are ignored.
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub hex: Option<String>,
    /// Read a binary capture; may hold several packets back to back.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(subcommand)]
    pub target: EncodeTarget,
}

#[derive(Subcommand, Debug)]
pub enum EncodeTarget {
    /// Connection initialization request (protocol 7).
    Init(InitArgs),
    /// HOI command wrapped in HARP and a Transport Envelope.
    Command(CommandArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Connection timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
    #[arg(long, default_value_t = 0)]
    pub client_id: u16,
    #[arg(long, default_value_t = 1)]
    pub connection_type: u16,
}

#[derive(Args, Debug)]
pub struct CommandArgs {
    /// Destination object as module:node:object.
    #[arg(long)]
    pub dest: Address,
    /// Source address as module:node:object.
    #[arg(long)]
    pub src: Address,
    /// HARP sequence number.
    #[arg(long, default_value_t = 1)]
    pub seq: u8,
    /// Envelope protocol id.
    #[arg(long, default_value_t = transport::OBJECT_DISCOVERY)]
    pub protocol: u8,
    #[arg(long)]
    pub interface: u8,
    /// Method id.
    #[arg(long)]
    pub method: u16,
    /// HOI action code (0 status request, 3 command request).
    #[arg(long, default_value_t = hoi::COMMAND_REQUEST)]
    pub action: u8,
    /// Argument as TYPE:VALUE, e.g. `i32:100`, `u16[]:0,1`, `string:abc`.
    /// Repeat in wire order.
    #[arg(long, value_name = "TYPE:VALUE")]
    pub param: Vec<String>,
    /// Clear the HARP response-required flag.
    #[arg(long)]
    pub no_response: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
