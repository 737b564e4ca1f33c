//! Terminal command input
//!
//! Reads commands from stdin on a worker thread and posts them to the UI
//! thread. Lengths are clamped here before they go on the wire.

use core::fmt;
use std::io::{self, BufRead};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use log::warn;
use shakepass_core::PasswordLength;
use shakepass_protocol::HostCommand;

pub const HELP: &str = "commands: gen | len <n> | telem [on|off] | last | quit";

/// Something the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleAction {
    /// Send a command as is
    Send(HostCommand),
    /// Flip the telemetry stream
    ToggleTelemetry,
    Help,
    Quit,
}

/// Input that could not be understood
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    Unknown(String),
    BadLength(String),
    BadTelemetry(String),
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Unknown(word) => write!(f, "unknown command '{word}' ({HELP})"),
            ConsoleError::BadLength(arg) => write!(f, "length must be a number, got '{arg}'"),
            ConsoleError::BadTelemetry(arg) => write!(f, "telem takes on or off, got '{arg}'"),
        }
    }
}

impl std::error::Error for ConsoleError {}

/// Parse one input line; blank lines yield `None`
pub fn parse(line: &str) -> Result<Option<ConsoleAction>, ConsoleError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let action = match (command.to_ascii_lowercase().as_str(), arg) {
        ("gen" | "g", _) => ConsoleAction::Send(HostCommand::Generate),
        ("last", _) => ConsoleAction::Send(HostCommand::Last),
        ("len" | "l", Some(arg)) => {
            let requested: i64 = arg
                .parse()
                .map_err(|_| ConsoleError::BadLength(arg.into()))?;
            let length = PasswordLength::clamped(requested).get();
            ConsoleAction::Send(HostCommand::SetLength(i64::from(length)))
        }
        ("len" | "l", None) => return Err(ConsoleError::BadLength(String::new())),
        ("telem" | "t", None) => ConsoleAction::ToggleTelemetry,
        ("telem" | "t", Some(arg)) => match arg.to_ascii_lowercase().as_str() {
            "on" => ConsoleAction::Send(HostCommand::Telemetry(true)),
            "off" => ConsoleAction::Send(HostCommand::Telemetry(false)),
            _ => return Err(ConsoleError::BadTelemetry(arg.into())),
        },
        ("help" | "?", _) => ConsoleAction::Help,
        ("quit" | "exit" | "q", _) => ConsoleAction::Quit,
        (other, _) => return Err(ConsoleError::Unknown(other.into())),
    };

    Ok(Some(action))
}

/// Read commands from `input` until it closes or the UI hangs up
///
/// Closing the input counts as `quit`.
pub fn spawn_console<R>(input: R, actions: Sender<ConsoleAction>) -> io::Result<JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("console".into())
        .spawn(move || {
            for line in input.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("console read failed: {e}");
                        break;
                    }
                };

                match parse(&line) {
                    Ok(Some(action)) => {
                        if actions.send(action).is_err() {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!("{e}"),
                }
            }
            let _ = actions.send(ConsoleAction::Quit);
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("gen"), Ok(Some(ConsoleAction::Send(HostCommand::Generate))));
        assert_eq!(parse("  LAST "), Ok(Some(ConsoleAction::Send(HostCommand::Last))));
        assert_eq!(parse("telem"), Ok(Some(ConsoleAction::ToggleTelemetry)));
        assert_eq!(
            parse("telem OFF"),
            Ok(Some(ConsoleAction::Send(HostCommand::Telemetry(false))))
        );
        assert_eq!(parse("quit"), Ok(Some(ConsoleAction::Quit)));
        assert_eq!(parse(""), Ok(None));
    }

    #[test]
    fn test_length_clamped_before_sending() {
        assert_eq!(
            parse("len 30"),
            Ok(Some(ConsoleAction::Send(HostCommand::SetLength(24))))
        );
        assert_eq!(
            parse("len -5"),
            Ok(Some(ConsoleAction::Send(HostCommand::SetLength(8))))
        );
        assert_eq!(
            parse("len 16"),
            Ok(Some(ConsoleAction::Send(HostCommand::SetLength(16))))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("len abc"), Err(ConsoleError::BadLength("abc".into())));
        assert_eq!(parse("len"), Err(ConsoleError::BadLength(String::new())));
        assert_eq!(parse("telem maybe"), Err(ConsoleError::BadTelemetry("maybe".into())));
        assert_eq!(parse("dance"), Err(ConsoleError::Unknown("dance".into())));
    }

    #[test]
    fn test_console_thread_skips_bad_lines_and_quits_on_eof() {
        let (tx, rx) = mpsc::channel();
        let input = Cursor::new("gen\nnonsense\n\nlen 99\n");

        spawn_console(input, tx).unwrap().join().unwrap();

        let got: Vec<ConsoleAction> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![
                ConsoleAction::Send(HostCommand::Generate),
                ConsoleAction::Send(HostCommand::SetLength(24)),
                ConsoleAction::Quit,
            ]
        );
    }
}
