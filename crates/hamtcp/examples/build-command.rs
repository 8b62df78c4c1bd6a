//! Build a tip pickup for two channels and write it the way it would go out
//! on a socket.
//!
//! Run with:
//!   cargo run --example build-command > pickup.bin
//!
//! Then inspect it:
//!   cargo run --features cli -- decode --file pickup.bin --format pretty

use hamtcp::command::{Command, PickupTips, SequenceCounter};
use hamtcp::packet::{Address, PacketWriter};

const PIPETTE: Address = Address::new(1, 1, 257);
const HOST: Address = Address::new(2, 1, 65535);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut seq = SequenceCounter::new();

    let mut pickup = PickupTips {
        channels: vec![0, 1],
        x_positions: vec![14_000, 14_000],
        y_positions: vec![30_000, 29_100],
        traverse_height: 24_500,
        begin_pickup: vec![20_000, 20_000],
        end_pickup: vec![19_000, 19_000],
        tip_types: vec![4, 4],
        ..PickupTips::new(PIPETTE)
    };
    pickup.set_source_address(HOST);
    pickup.set_sequence_number(seq.advance());

    let packet = pickup.build(None, None, true)?;
    eprintln!(
        "PickupTips seq={} -> {} bytes",
        pickup.header().sequence_number,
        packet.len()
    );

    let mut writer = PacketWriter::new(std::io::stdout().lock());
    writer.send(&packet)?;
    writer.flush()?;
    Ok(())
}
