//! ShakePass Monitor
//!
//! Terminal client for the ShakePass device. Mirrors the device state from
//! its serial stream, animates each generated password and sends commands
//! typed on stdin.
//!
//! Logs go to stderr (`RUST_LOG`, default `info`); redirect them when the
//! live view shares the terminal.

use std::io::{self, BufReader};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use shakepass_display::{LinkStatus, TerminalBackend, TextRenderer, SCREEN_COLS, SCREEN_ROWS};
use shakepass_protocol::{Decoded, HostCommand, BAUD_RATE};

mod app;
mod console;
mod ports;
mod serial;

use crate::app::App;
use crate::ports::Selection;
use crate::serial::CommandWriter;

// ----------------------------------------------------------------------------
// Command-line Interface

#[derive(Debug, Parser)]
#[command(version, about = "Live view and control for a ShakePass device")]
struct Cli {
    #[command(flatten)]
    link: LinkArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Args)]
struct LinkArgs {
    /// Serial port to use instead of auto-detection
    #[arg(long, global = true)]
    port: Option<String>,

    /// Baud rate
    #[arg(long, default_value_t = BAUD_RATE, global = true)]
    baud: u32,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the live view (default)
    Monitor(MonitorArgs),
    /// Send one protocol line, e.g. `GEN` or `LEN:16`
    Send { line: String },
    /// List serial ports and show which one would be picked
    Ports,
}

#[derive(Debug, Args)]
struct MonitorArgs {
    /// Frames per second
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=120))]
    fps: u32,

    /// Turn the device's telemetry stream off on connect
    #[arg(long)]
    no_telemetry: bool,
}

impl Default for MonitorArgs {
    fn default() -> Self {
        Self {
            fps: 30,
            no_telemetry: false,
        }
    }
}

// ----------------------------------------------------------------------------
// Application

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Monitor(MonitorArgs::default())) {
        Command::Monitor(args) => monitor(&cli.link, args),
        Command::Send { line } => send(&cli.link, &line),
        Command::Ports => list_ports(),
    }
}

// ----------------------------------------------------------------------------
// Subcommands

fn monitor(link: &LinkArgs, args: MonitorArgs) -> Result<()> {
    let (inbound_tx, inbound_rx) = mpsc::channel();
    let (actions_tx, actions_rx) = mpsc::channel();

    let (writer, status) = match connect(link) {
        Ok(Connection {
            name,
            port,
            warning,
        }) => {
            let reader = port
                .try_clone()
                .with_context(|| format!("cloning handle for {name}"))?;
            serial::spawn_reader(name.clone(), reader, inbound_tx)
                .context("starting serial reader")?;
            let status = match warning {
                Some(msg) => LinkStatus::Warning(msg),
                None => LinkStatus::Connected(name),
            };
            (Some(CommandWriter::new(port)), status)
        }
        Err(e) => {
            warn!("{e:#}");
            (None, LinkStatus::Error(format!("{e:#}")))
        }
    };

    console::spawn_console(BufReader::new(io::stdin()), actions_tx)
        .context("starting console")?;

    let backend = TerminalBackend::new(io::stdout(), SCREEN_COLS as u8, SCREEN_ROWS as u8);
    let mut app = App::new(TextRenderer::new(backend), writer, inbound_rx, actions_rx);
    app.set_link(status);

    if args.no_telemetry {
        app.send(HostCommand::Telemetry(false));
    }

    info!("{}", console::HELP);
    app.run(Duration::from_millis(1000 / u64::from(args.fps)))
}

fn send(link: &LinkArgs, line: &str) -> Result<()> {
    let cmd = match HostCommand::parse(line) {
        Decoded::Message(cmd) => cmd,
        Decoded::Ignored(reason) => bail!("'{line}' is not a command ({reason:?})"),
    };

    let Connection { name, port, .. } = connect(link)?;
    CommandWriter::new(port)
        .send(cmd)
        .with_context(|| format!("writing to {name}"))?;

    info!("Sent {} to {name}", cmd.encode().trim_end());
    Ok(())
}

fn list_ports() -> Result<()> {
    let candidates = ports::list_candidates().context("listing serial ports")?;
    let selection = ports::select_port(&candidates);

    if candidates.is_empty() {
        println!("no serial ports found");
    }
    for candidate in &candidates {
        let marker = if selection.port() == Some(candidate.name.as_str()) {
            '*'
        } else {
            ' '
        };
        println!("{marker} {:<24} {}", candidate.name, candidate.description);
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// Helper Functions

/// An open device port
struct Connection {
    name: String,
    port: Box<dyn serialport::SerialPort>,
    /// Set when the port was guessed rather than recognised
    warning: Option<String>,
}

/// Resolve and open the device port
fn connect(link: &LinkArgs) -> Result<Connection> {
    let (name, warning) = match &link.port {
        Some(name) => (name.clone(), None),
        None => auto_port()?,
    };

    let port = serial::open(&name, link.baud)
        .with_context(|| format!("opening {name} at {} baud", link.baud))?;
    info!("Connected to {name}");
    Ok(Connection {
        name,
        port,
        warning,
    })
}

fn auto_port() -> Result<(String, Option<String>)> {
    let candidates = ports::list_candidates().context("listing serial ports")?;
    let selection = ports::select_port(&candidates);
    let warning = selection.warning();

    let name = match selection {
        Selection::Matched(name) => {
            info!("Found device on {name}");
            name
        }
        Selection::Sole(name) => {
            info!("Using the only port, {name}");
            name
        }
        Selection::Guessed { name, all } => {
            warn!("No known device among {}, trying {name}", all.join(", "));
            name
        }
        Selection::Nothing => bail!("no serial ports found, plug the device in"),
    };
    Ok((name, warning))
}
