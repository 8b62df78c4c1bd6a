use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    println!("hamtcp {}", env!("CARGO_PKG_VERSION"));
    if !args.extended {
        return Ok(SUCCESS);
    }

    println!(
        "target: {}",
        option_env!("HAMTCP_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("rustc: {}", option_env!("RUSTC_VERSION").unwrap_or("unknown"));
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!("features: async={}, cli=true", cfg!(feature = "async"));
    println!("protocol: transport {}", hamtcp_packet::ProtocolVersion::V3_0);

    Ok(SUCCESS)
}
