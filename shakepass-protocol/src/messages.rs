//! Message types for the ShakePass line protocol
//!
//! Message types are divided into two categories:
//! - Device → Host: telemetry samples, lifecycle events, generation results
//! - Host → Device: generation trigger, length and telemetry settings

use core::fmt::Write;
use core::num::IntErrorKind;

use heapless::String;

use crate::line::MAX_LINE_LEN;
use crate::phase::Phase;

// Line tags: Device → Host
pub const TAG_SAMPLE: &str = "S:";
pub const TAG_EVENT: &str = "EV:";
pub const TAG_PASSWORD: &str = "PW:";
pub const TAG_STRENGTH: &str = "ST:";
pub const TAG_LENGTH: &str = "LN:";

// Line tags: Host → Device
pub const CMD_GENERATE: &str = "GEN";
pub const CMD_LAST: &str = "LAST";
pub const CMD_LENGTH: &str = "LEN:";
pub const CMD_TELEMETRY: &str = "TELEM:";

/// Longest password the protocol carries
pub const MAX_PASSWORD_LEN: usize = 24;

/// Longest strength label the protocol carries
pub const MAX_LABEL_LEN: usize = 8;

/// Sound level sent when the device has no microphone
pub const NO_SOUND: i16 = -1;

/// Encoded line including the trailing `\n`
pub type Encoded = String<{ MAX_LINE_LEN + 1 }>;

/// Password text as carried by `PW:` lines
pub type Password = String<MAX_PASSWORD_LEN>;

/// Strength label as carried by `ST:` lines
pub type Label = String<MAX_LABEL_LEN>;

/// Why a line was dropped instead of decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IgnoreReason {
    /// Nothing left after trimming whitespace
    Empty,
    /// Bytes are not valid UTF-8
    NotUtf8,
    /// Line does not start with a known tag
    UnknownTag,
    /// Tag recognised but payload invalid
    Malformed,
}

/// Outcome of decoding one line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Decoded<T> {
    /// Line was accepted
    Message(T),
    /// Line was rejected and should be dropped
    Ignored(IgnoreReason),
}

impl<T> Decoded<T> {
    /// The accepted message, if any
    pub fn message(self) -> Option<T> {
        match self {
            Decoded::Message(msg) => Some(msg),
            Decoded::Ignored(_) => None,
        }
    }

    /// Returns true if the line was rejected
    pub fn is_ignored(&self) -> bool {
        matches!(self, Decoded::Ignored(_))
    }
}

/// One telemetry sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSample {
    /// Device uptime in milliseconds
    pub t_ms: u32,
    /// Acceleration in milli-g
    pub ax: i16,
    pub ay: i16,
    pub az: i16,
    /// Microphone level (0-255), `None` without a microphone
    pub sound: Option<u8>,
}

impl SensorSample {
    /// Squared acceleration magnitude in milli-g²
    pub fn magnitude_squared(&self) -> u32 {
        let sq = |v: i16| (v as i32 * v as i32) as u32;
        sq(self.ax) + sq(self.ay) + sq(self.az)
    }

    /// Sound level as sent on the wire
    pub fn wire_sound(&self) -> i16 {
        self.sound.map_or(NO_SOUND, i16::from)
    }

    fn parse_payload(payload: &str) -> Option<Self> {
        let mut fields = payload.split(',').map(str::trim);
        let t_ms = fields.next()?.parse().ok()?;
        let ax = fields.next()?.parse().ok()?;
        let ay = fields.next()?.parse().ok()?;
        let az = fields.next()?.parse().ok()?;
        let sound = match fields.next()?.parse::<i16>().ok()? {
            NO_SOUND => None,
            level => Some(u8::try_from(level).ok()?),
        };
        if fields.next().is_some() {
            return None;
        }

        Some(Self {
            t_ms,
            ax,
            ay,
            az,
            sound,
        })
    }
}

/// Messages from the device to the host
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMessage {
    /// Periodic sensor telemetry
    Sample(SensorSample),
    /// Lifecycle phase transition
    Phase(Phase),
    /// Generated password (cleartext)
    Password(Password),
    /// Strength label for the last generation
    Strength(Label),
    /// Currently configured password length
    Length(u8),
}

impl DeviceMessage {
    /// Decode a raw line (terminator already removed)
    pub fn decode(bytes: &[u8]) -> Decoded<Self> {
        match core::str::from_utf8(bytes) {
            Ok(line) => Self::parse(line),
            Err(_) => Decoded::Ignored(IgnoreReason::NotUtf8),
        }
    }

    /// Parse a text line
    pub fn parse(line: &str) -> Decoded<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Decoded::Ignored(IgnoreReason::Empty);
        }

        let parsed = if let Some(payload) = line.strip_prefix(TAG_SAMPLE) {
            SensorSample::parse_payload(payload).map(DeviceMessage::Sample)
        } else if let Some(payload) = line.strip_prefix(TAG_EVENT) {
            Phase::from_name(payload.trim()).map(DeviceMessage::Phase)
        } else if let Some(payload) = line.strip_prefix(TAG_PASSWORD) {
            bounded_text(payload).map(DeviceMessage::Password)
        } else if let Some(payload) = line.strip_prefix(TAG_STRENGTH) {
            bounded_text(payload.trim()).map(DeviceMessage::Strength)
        } else if let Some(payload) = line.strip_prefix(TAG_LENGTH) {
            payload.trim().parse().ok().map(DeviceMessage::Length)
        } else {
            return Decoded::Ignored(IgnoreReason::UnknownTag);
        };

        match parsed {
            Some(msg) => Decoded::Message(msg),
            None => Decoded::Ignored(IgnoreReason::Malformed),
        }
    }

    /// Encode this message as a line, terminator included
    pub fn encode(&self) -> Encoded {
        let mut out = Encoded::new();
        let _ = match self {
            DeviceMessage::Sample(s) => write!(
                out,
                "{}{},{},{},{},{}",
                TAG_SAMPLE,
                s.t_ms,
                s.ax,
                s.ay,
                s.az,
                s.wire_sound()
            ),
            DeviceMessage::Phase(phase) => write!(out, "{}{}", TAG_EVENT, phase.name()),
            DeviceMessage::Password(pw) => write!(out, "{}{}", TAG_PASSWORD, pw),
            DeviceMessage::Strength(label) => write!(out, "{}{}", TAG_STRENGTH, label),
            DeviceMessage::Length(len) => write!(out, "{}{}", TAG_LENGTH, len),
        };
        let _ = out.push('\n');
        out
    }
}

/// Commands from the host to the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostCommand {
    /// Start a generation cycle
    Generate,
    /// Set the password length; the device clamps the raw request
    SetLength(i64),
    /// Enable or disable the periodic telemetry stream
    Telemetry(bool),
    /// Re-emit the most recent password
    Last,
}

impl HostCommand {
    /// Decode a raw line (terminator already removed)
    pub fn decode(bytes: &[u8]) -> Decoded<Self> {
        match core::str::from_utf8(bytes) {
            Ok(line) => Self::parse(line),
            Err(_) => Decoded::Ignored(IgnoreReason::NotUtf8),
        }
    }

    /// Parse a text line
    pub fn parse(line: &str) -> Decoded<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Decoded::Ignored(IgnoreReason::Empty);
        }

        let parsed = if line == CMD_GENERATE {
            Some(HostCommand::Generate)
        } else if line == CMD_LAST {
            Some(HostCommand::Last)
        } else if let Some(payload) = line.strip_prefix(CMD_LENGTH) {
            parse_saturating(payload.trim()).map(HostCommand::SetLength)
        } else if let Some(payload) = line.strip_prefix(CMD_TELEMETRY) {
            match payload {
                "ON" => Some(HostCommand::Telemetry(true)),
                "OFF" => Some(HostCommand::Telemetry(false)),
                _ => None,
            }
        } else {
            return Decoded::Ignored(IgnoreReason::UnknownTag);
        };

        match parsed {
            Some(cmd) => Decoded::Message(cmd),
            None => Decoded::Ignored(IgnoreReason::Malformed),
        }
    }

    /// Encode this command as a line, terminator included
    pub fn encode(&self) -> Encoded {
        let mut out = Encoded::new();
        let _ = match self {
            HostCommand::Generate => out.push_str(CMD_GENERATE).map_err(|_| core::fmt::Error),
            HostCommand::Last => out.push_str(CMD_LAST).map_err(|_| core::fmt::Error),
            HostCommand::SetLength(n) => write!(out, "{}{}", CMD_LENGTH, n),
            HostCommand::Telemetry(on) => {
                write!(out, "{}{}", CMD_TELEMETRY, if *on { "ON" } else { "OFF" })
            }
        };
        let _ = out.push('\n');
        out
    }
}

/// Copy `text` into a bounded string, rejecting empty or oversized payloads
fn bounded_text<const N: usize>(text: &str) -> Option<String<N>> {
    if text.is_empty() {
        return None;
    }
    let mut out = String::new();
    out.push_str(text).ok()?;
    Some(out)
}

/// Parse an integer, saturating on overflow instead of failing
fn parse_saturating(text: &str) -> Option<i64> {
    match text.parse::<i64>() {
        Ok(n) => Some(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn password(text: &str) -> Password {
        let mut pw = Password::new();
        pw.push_str(text).unwrap();
        pw
    }

    #[test]
    fn test_parse_sample() {
        let msg = DeviceMessage::parse("S:1234,-20,48,-1016,37").message().unwrap();
        assert_eq!(
            msg,
            DeviceMessage::Sample(SensorSample {
                t_ms: 1234,
                ax: -20,
                ay: 48,
                az: -1016,
                sound: Some(37),
            })
        );
    }

    #[test]
    fn test_parse_sample_without_microphone() {
        let msg = DeviceMessage::parse("S:5,0,0,0,-1").message().unwrap();
        match msg {
            DeviceMessage::Sample(s) => assert_eq!(s.sound, None),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_sample_rejects_bad_fields() {
        for line in [
            "S:1,2,3,4",
            "S:1,2,3,4,5,6",
            "S:1,x,3,4,5",
            "S:-1,2,3,4,5",
            "S:1,2,3,4,256",
            "S:1,2,3,4,-2",
            "S:1,40000,3,4,5",
        ] {
            assert_eq!(
                DeviceMessage::parse(line),
                Decoded::Ignored(IgnoreReason::Malformed),
                "{}",
                line
            );
        }
    }

    #[test]
    fn test_parse_events() {
        assert_eq!(
            DeviceMessage::parse("EV:PRE"),
            Decoded::Message(DeviceMessage::Phase(Phase::Pre))
        );
        assert_eq!(
            DeviceMessage::parse("EV: post "),
            Decoded::Message(DeviceMessage::Phase(Phase::Post))
        );
        assert_eq!(
            DeviceMessage::parse("EV:BOOT"),
            Decoded::Ignored(IgnoreReason::Malformed)
        );
    }

    #[test]
    fn test_parse_password_keeps_symbols() {
        let msg = DeviceMessage::parse("PW:a:B,9;{x}=/?").message().unwrap();
        assert_eq!(msg, DeviceMessage::Password(password("a:B,9;{x}=/?")));
    }

    #[test]
    fn test_parse_password_limits() {
        assert_eq!(
            DeviceMessage::parse("PW:"),
            Decoded::Ignored(IgnoreReason::Malformed)
        );
        assert_eq!(
            DeviceMessage::parse("PW:abcdefghijklmnopqrstuvwxy"),
            Decoded::Ignored(IgnoreReason::Malformed)
        );
    }

    #[test]
    fn test_parse_strength_and_length() {
        let mut label = Label::new();
        label.push_str("OK").unwrap();
        assert_eq!(
            DeviceMessage::parse("ST:OK"),
            Decoded::Message(DeviceMessage::Strength(label))
        );
        assert_eq!(
            DeviceMessage::parse("LN:24"),
            Decoded::Message(DeviceMessage::Length(24))
        );
        assert_eq!(
            DeviceMessage::parse("LN:-3"),
            Decoded::Ignored(IgnoreReason::Malformed)
        );
    }

    #[test]
    fn test_device_ignored_reasons() {
        assert_eq!(DeviceMessage::parse("   "), Decoded::Ignored(IgnoreReason::Empty));
        assert_eq!(
            DeviceMessage::parse("HELLO"),
            Decoded::Ignored(IgnoreReason::UnknownTag)
        );
        assert_eq!(
            DeviceMessage::decode(&[b'P', b'W', b':', 0xFF, 0xFE]),
            Decoded::Ignored(IgnoreReason::NotUtf8)
        );
    }

    #[test]
    fn test_encode_device_messages() {
        let sample = DeviceMessage::Sample(SensorSample {
            t_ms: 99,
            ax: -1,
            ay: 2,
            az: -1024,
            sound: None,
        });
        assert_eq!(sample.encode().as_str(), "S:99,-1,2,-1024,-1\n");
        assert_eq!(DeviceMessage::Phase(Phase::Gen).encode().as_str(), "EV:GEN\n");
        assert_eq!(
            DeviceMessage::Password(password("Ab3$efgh")).encode().as_str(),
            "PW:Ab3$efgh\n"
        );
        assert_eq!(DeviceMessage::Length(12).encode().as_str(), "LN:12\n");
    }

    #[test]
    fn test_parse_host_commands() {
        assert_eq!(HostCommand::parse("GEN"), Decoded::Message(HostCommand::Generate));
        assert_eq!(HostCommand::parse("LAST\r"), Decoded::Message(HostCommand::Last));
        assert_eq!(
            HostCommand::parse("LEN:30"),
            Decoded::Message(HostCommand::SetLength(30))
        );
        assert_eq!(
            HostCommand::parse("LEN: -4 "),
            Decoded::Message(HostCommand::SetLength(-4))
        );
        assert_eq!(
            HostCommand::parse("TELEM:OFF"),
            Decoded::Message(HostCommand::Telemetry(false))
        );
        assert_eq!(
            HostCommand::parse("TELEM:ON"),
            Decoded::Message(HostCommand::Telemetry(true))
        );
    }

    #[test]
    fn test_host_command_overflow_saturates() {
        assert_eq!(
            HostCommand::parse("LEN:99999999999999999999999"),
            Decoded::Message(HostCommand::SetLength(i64::MAX))
        );
        assert_eq!(
            HostCommand::parse("LEN:-99999999999999999999999"),
            Decoded::Message(HostCommand::SetLength(i64::MIN))
        );
    }

    #[test]
    fn test_host_command_rejects() {
        assert_eq!(HostCommand::parse("gen"), Decoded::Ignored(IgnoreReason::UnknownTag));
        assert_eq!(HostCommand::parse("LEN:"), Decoded::Ignored(IgnoreReason::Malformed));
        assert_eq!(HostCommand::parse("LEN:1x"), Decoded::Ignored(IgnoreReason::Malformed));
        assert_eq!(
            HostCommand::parse("TELEM:MAYBE"),
            Decoded::Ignored(IgnoreReason::Malformed)
        );
        assert!(HostCommand::parse("").is_ignored());
    }

    #[test]
    fn test_encode_host_commands() {
        assert_eq!(HostCommand::Generate.encode().as_str(), "GEN\n");
        assert_eq!(HostCommand::Last.encode().as_str(), "LAST\n");
        assert_eq!(HostCommand::SetLength(16).encode().as_str(), "LEN:16\n");
        assert_eq!(HostCommand::Telemetry(false).encode().as_str(), "TELEM:OFF\n");
    }

    #[test]
    fn test_magnitude_squared() {
        let s = SensorSample {
            ax: 3,
            ay: -4,
            az: 12,
            ..Default::default()
        };
        assert_eq!(s.magnitude_squared(), 169);
    }

    proptest! {
        #[test]
        fn prop_length_command_survives_encoding(n in any::<i64>()) {
            let line = HostCommand::SetLength(n).encode();
            prop_assert_eq!(
                HostCommand::parse(line.as_str()),
                Decoded::Message(HostCommand::SetLength(n))
            );
        }

        #[test]
        fn prop_sample_survives_encoding(
            t_ms in any::<u32>(),
            ax in any::<i16>(),
            ay in any::<i16>(),
            az in any::<i16>(),
            sound in proptest::option::of(any::<u8>()),
        ) {
            let sample = SensorSample { t_ms, ax, ay, az, sound };
            let line = DeviceMessage::Sample(sample).encode();
            prop_assert_eq!(
                DeviceMessage::parse(line.as_str()),
                Decoded::Message(DeviceMessage::Sample(sample))
            );
        }
    }
}
