use airchat_frame::{encode_chat, Channel};
use airchat_session::DEFAULT_POLL_INTERVAL;

use crate::cmd::{drain_outbound, open_chat, parse_duration, SendArgs};
use crate::exit::{frame_error, session_error, CliResult, FAILURE, SUCCESS};
use crate::output::{print_event, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let pacing = parse_duration(&args.link.pacing)?;

    // Reject bad input before touching the port.
    Channel::new(args.channel).map_err(|err| frame_error("invalid channel", err))?;
    encode_chat(&args.username, &args.text).map_err(|err| frame_error("not sent", err))?;

    let mut chat = open_chat(&args.port, &args.link)?;
    chat.configure(&args.username, args.channel)
        .map_err(|err| session_error("configure failed", err))?;
    chat.send_chat(&args.text)
        .map_err(|err| session_error("send failed", err))?;

    drain_outbound(&chat, pacing, DEFAULT_POLL_INTERVAL, format);

    let unsent = chat.pending_outbound();
    let result = chat.shutdown();
    for event in chat.poll_inbound_events() {
        print_event(&event, format);
    }
    result.map_err(|err| session_error("link failed", err))?;

    if unsent > 0 {
        eprintln!("error: {unsent} frame(s) were not transmitted");
        return Ok(FAILURE);
    }
    Ok(SUCCESS)
}
