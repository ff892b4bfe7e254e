use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use plc_chat::config::{self, LogFormat, LoggingConfig};
use plc_chat::port;
use plc_chat::{Notification, StatusToken, Worker, WorkerSettings};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Chat over a power-line-communication modem attached via USB serial.",
    long_about = "Reads lines from stdin, sends them to the remote peer through the PLC modem, \
and prints responses and modem status as they arrive. All serial I/O runs on a single \
background worker thread."
)]
struct Args {
    /// List available serial ports and exit.
    #[arg(short, long)]
    list: bool,

    /// Serial device the modem is attached to (e.g. /dev/ttyACM0 or COM3).
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate for the modem link.
    #[arg(short, long)]
    baud: Option<u32>,

    /// Seconds each send waits per response read.
    #[arg(short, long)]
    timeout_secs: Option<u64>,

    /// Explicit config file path.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::load_from(path)?,
        None => config::load()?,
    };
    init_logging(&config.logging);

    if args.list {
        for name in port::list_ports()? {
            println!("{name}");
        }
        return Ok(());
    }

    let port_name = args
        .port
        .or_else(|| config.serial.port.clone())
        .ok_or("no serial port given; use --port, or --list to see what is available")?;
    let baud = args.baud.unwrap_or(config.serial.default_baud);
    let timeout = args
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.serial.send_timeout());

    let (handle, notifications) = Worker::spawn(WorkerSettings::from(&config.serial));
    handle.open(port_name.clone(), baud)?;

    // Render notifications as they arrive; ends when the worker stops.
    let printer = std::thread::spawn(move || {
        for notification in notifications {
            match notification {
                Notification::Response(line) => match StatusToken::detect(&line) {
                    Some(token) => println!("[modem] {token}"),
                    None => println!("peer: {line}"),
                },
                Notification::NoResponse => println!("[modem] {}", StatusToken::NoResponse),
                Notification::Progress(text) => println!("[progress] {text}"),
                Notification::Error(text) => eprintln!("error: {text}"),
            }
        }
    });

    println!("Chatting via {port_name} at {baud} baud. Type a message; Ctrl+D quits.");
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        handle.submit_send(message, timeout)?;
    }

    handle.shutdown();
    let _ = printer.join();
    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.clone()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Compact => builder.compact().init(),
    }
}
