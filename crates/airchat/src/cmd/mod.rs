use std::time::{Duration, Instant};

use airchat_link::{LinkConfig, SerialLink, DEFAULT_BAUD_RATE};
use airchat_session::{ChatLink, EngineConfig};
use clap::{Args, Subcommand};

use crate::exit::{session_error, CliError, CliResult, USAGE};
use crate::output::{print_event, OutputFormat};

pub mod channels;
pub mod chat;
pub mod ports;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat session on a radio board.
    Chat(ChatArgs),
    /// Configure the board and send a single message.
    Send(SendArgs),
    /// List the talkgroup channels.
    Channels(ChannelsArgs),
    /// List serial ports on this host.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Chat(args) => chat::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Channels(_) => channels::run(format),
        Command::Ports(_) => ports::run(format),
        Command::Version(args) => version::run(args),
    }
}

/// Serial and pacing settings shared by commands that open the board.
#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Serial line speed.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Minimum gap between transmissions (e.g. 3s, 1500ms).
    #[arg(long, default_value = "3s")]
    pub pacing: String,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Serial port the board is attached to (e.g. /dev/ttyUSB0, COM3).
    pub port: String,
    #[command(flatten)]
    pub link: LinkArgs,
    /// How often inbound events are printed (e.g. 100ms).
    #[arg(long, default_value = "100ms")]
    pub poll_interval: String,
    /// Username to configure on startup.
    #[arg(long, requires = "channel")]
    pub username: Option<String>,
    /// Channel index (0-15) to configure on startup.
    #[arg(long, requires = "username")]
    pub channel: Option<u8>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Serial port the board is attached to.
    pub port: String,
    #[command(flatten)]
    pub link: LinkArgs,
    /// Username to send as (3-16 printable ASCII characters).
    #[arg(long)]
    pub username: String,
    /// Channel index (0-15).
    #[arg(long, short = 'c')]
    pub channel: u8,
    /// Message text.
    pub text: String,
}

#[derive(Args, Debug, Default)]
pub struct ChannelsArgs {}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn open_chat(port: &str, args: &LinkArgs) -> CliResult<ChatLink<SerialLink>> {
    let pacing_interval = parse_duration(&args.pacing)?;
    let link_config = LinkConfig {
        baud_rate: args.baud,
        ..LinkConfig::new(port)
    };
    let engine_config = EngineConfig {
        pacing_interval,
        ..EngineConfig::default()
    };
    ChatLink::open(&link_config, engine_config).map_err(|err| session_error("open failed", err))
}

/// Print events until every queued frame has gone out and had its pacing gap.
pub fn drain_outbound(
    chat: &ChatLink<SerialLink>,
    pacing: Duration,
    poll: Duration,
    format: OutputFormat,
) {
    let frames = chat.pending_outbound() as u32;
    let deadline = Instant::now() + pacing * (frames + 1) + Duration::from_secs(1);

    while chat.pending_outbound() > 0 && chat.is_running() && Instant::now() < deadline {
        for event in chat.poll_inbound_events() {
            print_event(&event, format);
        }
        std::thread::sleep(poll);
    }

    // The last frame dequeued may still be on the wire.
    let settle = Instant::now() + pacing;
    while chat.is_running() && Instant::now() < settle {
        std::thread::sleep(poll);
    }
    for event in chat.poll_inbound_events() {
        print_event(&event, format);
    }
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
