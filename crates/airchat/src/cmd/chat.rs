use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use airchat_frame::Channel;
use airchat_session::SessionError;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use tracing::{debug, info};

use crate::cmd::{drain_outbound, open_chat, parse_duration, ChatArgs};
use crate::exit::{io_error, session_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_event, OutputFormat};

const CONFIG_USAGE: &str = "usage: /config <username> <channel>";

/// One line typed by the user.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Message(String),
    Configure { username: String, channel: u8 },
    Quit,
    Skip,
    Invalid(&'static str),
}

pub fn run(args: ChatArgs, format: OutputFormat) -> CliResult<i32> {
    let pacing = parse_duration(&args.link.pacing)?;
    let poll = parse_duration(&args.poll_interval)?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut chat = open_chat(&args.port, &args.link)?;
    if let (Some(username), Some(channel)) = (&args.username, args.channel) {
        chat.configure(username, channel)
            .map_err(|err| session_error("configure failed", err))?;
    }
    if matches!(format, OutputFormat::Pretty) {
        eprintln!(
            "connected to {}; /config <username> <channel> to set up, /quit to leave",
            args.port
        );
    }

    let lines = spawn_stdin_reader()?;
    let mut stdin_closed = false;

    while running.load(Ordering::SeqCst) && chat.is_running() {
        match lines.recv_timeout(poll) {
            Ok(Ok(line)) => match parse_input(&line) {
                Input::Message(text) => accept(chat.send_chat(&text))?,
                Input::Configure { username, channel } => {
                    accept(chat.configure(&username, channel))?
                }
                Input::Quit => break,
                Input::Skip => {}
                Input::Invalid(hint) => eprintln!("{hint}"),
            },
            Ok(Err(err)) => return Err(io_error("stdin read failed", err)),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                stdin_closed = true;
                break;
            }
        }

        for event in chat.poll_inbound_events() {
            print_event(&event, format);
        }
    }

    if stdin_closed && running.load(Ordering::SeqCst) {
        debug!(pending = chat.pending_outbound(), "stdin closed, flushing outbound queue");
        drain_outbound(&chat, pacing, poll, format);
    }

    let result = chat.shutdown();
    for event in chat.poll_inbound_events() {
        print_event(&event, format);
    }
    result.map_err(|err| session_error("chat link failed", err))?;

    info!("chat session closed");
    Ok(SUCCESS)
}

/// Rejected input is already reported through the inbound queue.
fn accept(result: Result<(), SessionError>) -> CliResult<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.is_validation() => Ok(()),
        Err(err) => Err(session_error("chat link failed", err)),
    }
}

fn parse_input(line: &str) -> Input {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Input::Skip;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Message(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match parts.next() {
        Some("quit") | Some("exit") => Input::Quit,
        Some("config") => match (parts.next(), parts.next(), parts.next()) {
            (Some(username), Some(channel), None) => match parse_channel(channel) {
                Some(channel) => Input::Configure {
                    username: username.to_string(),
                    channel,
                },
                None => Input::Invalid(CONFIG_USAGE),
            },
            _ => Input::Invalid(CONFIG_USAGE),
        },
        _ => Input::Invalid("unknown command; try /config or /quit"),
    }
}

/// Accepts an index (`11`) or a label (`CH13`).
fn parse_channel(input: &str) -> Option<u8> {
    if let Ok(index) = input.parse::<u8>() {
        return Some(index);
    }
    let label = input.to_ascii_uppercase();
    Channel::all()
        .find(|channel| channel.label() == label)
        .map(Channel::index)
}

fn spawn_stdin_reader() -> CliResult<Receiver<io::Result<String>>> {
    let (tx, rx) = crossbeam_channel::unbounded();
    thread::Builder::new()
        .name("airchat-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .map_err(|err| io_error("failed to start stdin reader", err))?;
    Ok(rx)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_messages() {
        assert_eq!(
            parse_input("hello there\r\n"),
            Input::Message("hello there".to_string())
        );
        assert_eq!(parse_input("   "), Input::Skip);
    }

    #[test]
    fn config_accepts_index_or_label() {
        assert_eq!(
            parse_input("/config alice 3"),
            Input::Configure {
                username: "alice".to_string(),
                channel: 3,
            }
        );
        assert_eq!(
            parse_input("/config bob ch13"),
            Input::Configure {
                username: "bob".to_string(),
                channel: 11,
            }
        );
    }

    #[test]
    fn config_with_bad_arguments_is_invalid() {
        assert_eq!(parse_input("/config alice"), Input::Invalid(CONFIG_USAGE));
        assert_eq!(parse_input("/config alice CH99"), Input::Invalid(CONFIG_USAGE));
        assert_eq!(
            parse_input("/config alice 1 extra"),
            Input::Invalid(CONFIG_USAGE)
        );
    }

    #[test]
    fn out_of_range_index_is_left_to_the_session() {
        assert_eq!(
            parse_input("/config alice 40"),
            Input::Configure {
                username: "alice".to_string(),
                channel: 40,
            }
        );
    }

    #[test]
    fn quit_and_unknown_commands() {
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert!(matches!(parse_input("/nick bob"), Input::Invalid(_)));
    }

    #[test]
    fn validation_failures_do_not_end_the_session() {
        assert!(accept(Err(SessionError::NotConfigured)).is_ok());
        assert!(accept(Err(SessionError::ShutDown)).is_err());
    }
}
