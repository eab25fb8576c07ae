use airchat_frame::{CHANNEL_COUNT, MAX_FRAME_LEN};
use airchat_link::DEFAULT_BAUD_RATE;
use airchat_session::DEFAULT_PACING_INTERVAL;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("airchat {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: airchat");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target: {}", env!("AIRCHAT_BUILD_TARGET"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!("baud_rate: {DEFAULT_BAUD_RATE}");
    println!("pacing_interval_ms: {}", DEFAULT_PACING_INTERVAL.as_millis());
    println!("max_frame_len: {MAX_FRAME_LEN}");
    println!("channels: {CHANNEL_COUNT}");
    println!(
        "features: session={}, cli=true",
        cfg!(feature = "session")
    );

    Ok(SUCCESS)
}
