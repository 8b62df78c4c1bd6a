//! Read a binary capture of device replies and interpret each one.
//!
//! Run with:
//!   cargo run --example decode-capture -- replies.bin

use std::fs::File;

use hamtcp::command::{response_values, CommandError};
use hamtcp::message::CommandResponse;
use hamtcp::packet::{PacketError, PacketReader};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .ok_or("usage: decode-capture <capture.bin>")?;
    let mut reader = PacketReader::new(File::open(&path)?);

    loop {
        let packet = match reader.read_packet() {
            Ok(packet) => packet,
            Err(PacketError::ConnectionClosed) => break,
            Err(e) => return Err(e.into()),
        };

        let response = match CommandResponse::parse(&packet) {
            Ok(response) => response,
            Err(e) => {
                eprintln!("skipping non-command packet: {e}");
                continue;
            }
        };

        let from = response.harp.src;
        let seq = response.sequence_number();
        if response.is_exception() {
            eprintln!("{from} seq={seq}: device exception");
            continue;
        }
        match response_values(response.params()) {
            Ok(values) => {
                let shown: Vec<String> = values.iter().map(ToString::to_string).collect();
                println!("{from} seq={seq}: [{}]", shown.join(", "));
            }
            Err(CommandError::Codec(e)) => eprintln!("{from} seq={seq}: bad parameters: {e}"),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
