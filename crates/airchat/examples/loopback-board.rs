//! Runs a chat session against a simulated radio board over a socket pair.
//!
//! The fake board answers the config frame with nothing, echoes each chat
//! frame back under another username, and finally sends a reset.
//!
//! Run with:
//!   cargo run --example loopback-board

#[cfg(unix)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::io::Write;
    use std::thread;
    use std::time::Duration;

    use airchat::frame::{decode_inbound, encode_chat, FrameReader, Inbound, TAG_CONFIG};
    use airchat::link::loopback_pair;
    use airchat::session::{ChatLink, EngineConfig};

    let (local, remote) = loopback_pair(Some(Duration::from_millis(200)))?;

    let board = thread::spawn(move || -> Result<(), airchat::frame::FrameError> {
        let mut writer = remote.try_clone()?;
        let mut reader = FrameReader::new(remote);
        let mut echoed = 0;
        while echoed < 2 {
            let frame = reader.read_until_sentinel(256)?;
            if frame.is_empty() {
                continue;
            }
            if frame.first() == Some(&TAG_CONFIG) {
                eprintln!("board: configured on channel {}", frame[1]);
                continue;
            }
            if let Inbound::Chat(message) = decode_inbound(&frame) {
                let reply = format!("echo of {}", message.text);
                writer.write_all(&encode_chat("board", &reply)?)?;
                echoed += 1;
            }
        }
        writer.write_all(&[3, 0xFF])?;
        Ok(())
    });

    let config = EngineConfig {
        pacing_interval: Duration::from_millis(300),
        ..EngineConfig::default()
    };
    let mut chat = ChatLink::start(local, config)?;
    chat.configure("alice", 9)?;
    chat.send_chat("hello")?;
    chat.send_chat("anyone out there?")?;

    for _ in 0..30 {
        for event in chat.poll_inbound_events() {
            println!("{event:?}");
        }
        thread::sleep(Duration::from_millis(100));
    }

    chat.shutdown()?;
    let _ = board.join();
    Ok(())
}

#[cfg(not(unix))]
fn main() {
    eprintln!("loopback-board needs Unix domain sockets");
}
