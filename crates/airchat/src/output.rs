use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use airchat_frame::Channel;
use airchat_link::PortSummary;
use airchat_session::{InboundEvent, Origin};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EventOutput<'a> {
    #[serde(flatten)]
    event: &'a InboundEvent,
    timestamp: String,
}

pub fn print_event(event: &InboundEvent, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EventOutput {
                event,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let (kind, from) = event_columns(event);
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KIND", "FROM", "TEXT"])
                .add_row(vec![kind, from, event.text().to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", pretty_event(event)),
        OutputFormat::Raw => {
            let mut line = event.text().as_bytes().to_vec();
            line.push(b'\n');
            print_raw(&line);
        }
    }
}

fn event_columns(event: &InboundEvent) -> (String, String) {
    match event {
        InboundEvent::UserMessage {
            username, origin, ..
        } => {
            let kind = match origin {
                Origin::Peer => "message",
                Origin::Local => "sent",
            };
            (kind.to_string(), username.clone())
        }
        InboundEvent::SystemMessage { severity, .. } => {
            (severity.as_str().to_string(), "-".to_string())
        }
    }
}

fn pretty_event(event: &InboundEvent) -> String {
    match event {
        InboundEvent::UserMessage {
            username,
            text,
            origin: Origin::Peer,
        } => format!("{username}: {text}"),
        InboundEvent::UserMessage {
            username,
            text,
            origin: Origin::Local,
        } => format!("{username} (you): {text}"),
        InboundEvent::SystemMessage { severity, text } => {
            format!("[{}] {text}", severity.as_str())
        }
    }
}

#[derive(Serialize)]
struct ChannelOutput {
    index: u8,
    label: String,
    modulation: &'static str,
}

pub fn print_channels(format: OutputFormat) {
    let rows: Vec<ChannelOutput> = Channel::all()
        .map(|channel| ChannelOutput {
            index: channel.index(),
            label: channel.label(),
            modulation: channel.modulation().as_str(),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["INDEX", "LABEL", "MODULATION"]);
            for row in &rows {
                table.add_row(vec![
                    row.index.to_string(),
                    row.label.clone(),
                    row.modulation.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in &rows {
                println!("{:>2}  {}  {}", row.index, row.label, row.modulation);
            }
        }
        OutputFormat::Raw => {
            for row in &rows {
                println!("{}", row.label);
            }
        }
    }
}

#[derive(Serialize)]
struct PortOutput<'a> {
    name: &'a str,
    kind: &'a str,
    product: Option<&'a str>,
}

pub fn print_ports(ports: &[PortSummary], format: OutputFormat) {
    let rows: Vec<PortOutput<'_>> = ports
        .iter()
        .map(|port| PortOutput {
            name: &port.name,
            kind: port.kind,
            product: port.product.as_deref(),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "KIND", "PRODUCT"]);
            for row in &rows {
                table.add_row(vec![
                    row.name.to_string(),
                    row.kind.to_string(),
                    row.product.unwrap_or("-").to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            if rows.is_empty() {
                println!("no serial ports found");
            }
            for row in &rows {
                match row.product {
                    Some(product) => println!("{} ({}, {product})", row.name, row.kind),
                    None => println!("{} ({})", row.name, row.kind),
                }
            }
        }
        OutputFormat::Raw => {
            for row in &rows {
                println!("{}", row.name);
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
