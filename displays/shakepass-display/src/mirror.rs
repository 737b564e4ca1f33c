//! Mirrored device state
//!
//! Everything the client knows about the device comes from inbound lines.
//! Worker threads never touch the mirror; they post [`UiUpdate`]s that the
//! UI thread applies in arrival order.

use core::fmt;
use std::time::{Duration, Instant};

use heapless::HistoryBuffer;
use log::{debug, info};
use shakepass_core::password::{Strength, Vocabulary};
use shakepass_protocol::{DeviceMessage, Phase, SensorSample};

/// Samples kept per series
pub const HISTORY_LEN: usize = 140;

/// Strength text while a reveal is running
pub const ANALYZING: &str = "ANALYZING...";

/// Strength text before the first password
pub const NO_STRENGTH: &str = "-";

/// Rolling history of the three axes and the acceleration magnitude
///
/// Every series starts full of zeros so plots have a fixed width from the
/// first frame. Pushing evicts the oldest value.
pub struct SampleHistory {
    ax: HistoryBuffer<f32, HISTORY_LEN>,
    ay: HistoryBuffer<f32, HISTORY_LEN>,
    az: HistoryBuffer<f32, HISTORY_LEN>,
    magnitude: HistoryBuffer<f32, HISTORY_LEN>,
}

impl Default for SampleHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleHistory {
    /// Create a history pre-filled with zeros
    pub fn new() -> Self {
        Self {
            ax: HistoryBuffer::new_with(0.0),
            ay: HistoryBuffer::new_with(0.0),
            az: HistoryBuffer::new_with(0.0),
            magnitude: HistoryBuffer::new_with(0.0),
        }
    }

    /// Append one sample to every series
    pub fn push(&mut self, sample: &SensorSample) {
        self.ax.write(f32::from(sample.ax));
        self.ay.write(f32::from(sample.ay));
        self.az.write(f32::from(sample.az));
        self.magnitude
            .write((sample.magnitude_squared() as f32).sqrt());
    }

    /// X axis, oldest first
    pub fn ax(&self) -> impl Iterator<Item = f32> + '_ {
        self.ax.oldest_ordered().copied()
    }

    /// Y axis, oldest first
    pub fn ay(&self) -> impl Iterator<Item = f32> + '_ {
        self.ay.oldest_ordered().copied()
    }

    /// Z axis, oldest first
    pub fn az(&self) -> impl Iterator<Item = f32> + '_ {
        self.az.oldest_ordered().copied()
    }

    /// Magnitude, oldest first
    pub fn magnitude(&self) -> impl Iterator<Item = f32> + '_ {
        self.magnitude.oldest_ordered().copied()
    }

    /// Most recent magnitude
    pub fn latest_magnitude(&self) -> f32 {
        self.magnitude.recent().copied().unwrap_or(0.0)
    }

    /// Number of values in each series (always [`HISTORY_LEN`])
    pub fn len(&self) -> usize {
        self.magnitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitude.is_empty()
    }
}

/// Serial link status shown in the header
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkStatus {
    #[default]
    Disconnected,
    /// Port open and reader running
    Connected(String),
    /// Usable but worth a look (e.g. port picked from several)
    Warning(String),
    /// Transport or open failure
    Error(String),
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Disconnected => f.write_str("Disconnected"),
            LinkStatus::Connected(port) => write!(f, "Connected: {port}"),
            LinkStatus::Warning(msg) | LinkStatus::Error(msg) => f.write_str(msg),
        }
    }
}

/// Side effect the caller must start after applying a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Animate `password`; updates must carry `id`
    Reveal { id: u64, password: String },
}

/// Updates posted to the UI thread by workers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    /// Partially revealed password text
    RevealFrame { id: u64, text: String },
    /// Reveal finished, host grade attached
    RevealDone { id: u64, strength: Strength },
    /// Link status changed
    Link(LinkStatus),
}

/// Local copy of the device state
pub struct DisplayState {
    phase: Phase,
    phase_since: Instant,
    last_sample: Option<SensorSample>,
    history: SampleHistory,
    length: Option<u8>,
    device_grade: Option<String>,
    password: Option<String>,
    shown: String,
    host_grade: Option<Strength>,
    analyzing: bool,
    reveal_id: u64,
    link: LinkStatus,
    samples_seen: u64,
    ignored_lines: u64,
}

impl DisplayState {
    pub fn new(now: Instant) -> Self {
        Self {
            phase: Phase::Idle,
            phase_since: now,
            last_sample: None,
            history: SampleHistory::new(),
            length: None,
            device_grade: None,
            password: None,
            shown: String::new(),
            host_grade: None,
            analyzing: false,
            reveal_id: 0,
            link: LinkStatus::Disconnected,
            samples_seen: 0,
            ignored_lines: 0,
        }
    }

    /// Apply one decoded device line
    pub fn apply(&mut self, msg: DeviceMessage, now: Instant) -> Option<Effect> {
        match msg {
            DeviceMessage::Sample(sample) => {
                self.history.push(&sample);
                self.last_sample = Some(sample);
                self.samples_seen += 1;
                None
            }
            DeviceMessage::Phase(phase) => {
                debug!("Phase {} -> {}", self.phase.name(), phase.name());
                self.phase = phase;
                self.phase_since = now;
                None
            }
            DeviceMessage::Password(password) => {
                self.reveal_id += 1;
                self.shown.clear();
                self.host_grade = None;
                self.analyzing = true;
                self.password = Some(password.as_str().into());
                Some(Effect::Reveal {
                    id: self.reveal_id,
                    password: password.as_str().into(),
                })
            }
            DeviceMessage::Strength(label) => {
                self.device_grade = Some(label.as_str().into());
                None
            }
            DeviceMessage::Length(length) => {
                self.length = Some(length);
                None
            }
        }
    }

    /// Apply an update posted by a worker
    ///
    /// Reveal updates for anything but the latest password are dropped.
    pub fn apply_ui(&mut self, update: UiUpdate) {
        match update {
            UiUpdate::RevealFrame { id, text } if id == self.reveal_id => {
                self.shown = text;
            }
            UiUpdate::RevealDone { id, strength } if id == self.reveal_id => {
                if let Some(password) = &self.password {
                    self.shown.clone_from(password);
                }
                self.host_grade = Some(strength);
                self.analyzing = false;
            }
            UiUpdate::RevealFrame { id, .. } | UiUpdate::RevealDone { id, .. } => {
                debug!("Dropping stale reveal update {id}");
            }
            UiUpdate::Link(status) => {
                info!("Link: {status}");
                self.link = status;
            }
        }
    }

    /// Count a line that failed to decode
    pub fn note_ignored(&mut self) {
        self.ignored_lines += 1;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Time spent in the current phase
    pub fn phase_age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.phase_since)
    }

    /// Last accelerometer axes, zero before the first sample
    pub fn axes(&self) -> (i16, i16, i16) {
        self.last_sample
            .map_or((0, 0, 0), |s| (s.ax, s.ay, s.az))
    }

    pub fn last_sample(&self) -> Option<&SensorSample> {
        self.last_sample.as_ref()
    }

    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    /// Length last reported with `LN:`
    pub fn length(&self) -> Option<u8> {
        self.length
    }

    /// Label last reported with `ST:`
    pub fn device_grade(&self) -> Option<&str> {
        self.device_grade.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Password text as currently revealed
    pub fn shown(&self) -> &str {
        &self.shown
    }

    pub fn host_grade(&self) -> Option<Strength> {
        self.host_grade
    }

    pub fn is_revealing(&self) -> bool {
        self.analyzing
    }

    /// Strength line text
    pub fn strength_text(&self) -> &'static str {
        match (self.analyzing, self.host_grade) {
            (true, _) => ANALYZING,
            (false, Some(grade)) => grade.label(Vocabulary::Host),
            (false, None) => NO_STRENGTH,
        }
    }

    pub fn link(&self) -> &LinkStatus {
        &self.link
    }

    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    pub fn ignored_lines(&self) -> u64 {
        self.ignored_lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakepass_protocol::{Label, Password};

    fn sample(ax: i16, ay: i16, az: i16) -> DeviceMessage {
        DeviceMessage::Sample(SensorSample {
            t_ms: 1,
            ax,
            ay,
            az,
            sound: None,
        })
    }

    fn password(text: &str) -> DeviceMessage {
        let mut pw = Password::new();
        pw.push_str(text).unwrap();
        DeviceMessage::Password(pw)
    }

    #[test]
    fn test_history_prefilled_with_zeros() {
        let history = SampleHistory::new();
        assert_eq!(history.len(), HISTORY_LEN);
        assert!(history.magnitude().all(|v| v == 0.0));
        assert_eq!(history.latest_magnitude(), 0.0);
    }

    #[test]
    fn test_history_evicts_oldest() {
        let now = Instant::now();
        let mut state = DisplayState::new(now);

        for i in 0..=HISTORY_LEN as i16 {
            state.apply(sample(i, 0, 0), now);
        }

        let ax: Vec<f32> = state.history().ax().collect();
        assert_eq!(ax.len(), HISTORY_LEN);
        assert_eq!(ax[0], 1.0);
        assert_eq!(ax[HISTORY_LEN - 1], HISTORY_LEN as f32);
    }

    #[test]
    fn test_sample_updates_axes_and_magnitude() {
        let now = Instant::now();
        let mut state = DisplayState::new(now);
        assert_eq!(state.axes(), (0, 0, 0));

        assert_eq!(state.apply(sample(300, -400, 0), now), None);

        assert_eq!(state.axes(), (300, -400, 0));
        assert_eq!(state.history().latest_magnitude(), 500.0);
        assert_eq!(state.history().ay().last(), Some(-400.0));
        assert_eq!(state.samples_seen(), 1);
    }

    #[test]
    fn test_phase_change_records_time() {
        let start = Instant::now();
        let mut state = DisplayState::new(start);
        let later = start + Duration::from_millis(500);

        state.apply(DeviceMessage::Phase(Phase::Pre), later);

        assert_eq!(state.phase(), Phase::Pre);
        assert_eq!(state.phase_age(later), Duration::ZERO);
        assert_eq!(
            state.phase_age(later + Duration::from_millis(40)),
            Duration::from_millis(40)
        );
    }

    #[test]
    fn test_password_starts_reveal() {
        let now = Instant::now();
        let mut state = DisplayState::new(now);
        assert_eq!(state.strength_text(), NO_STRENGTH);

        let effect = state.apply(password("aB3$efgh"), now);

        assert_eq!(
            effect,
            Some(Effect::Reveal {
                id: 1,
                password: "aB3$efgh".into()
            })
        );
        assert_eq!(state.shown(), "");
        assert_eq!(state.strength_text(), ANALYZING);
        assert!(state.is_revealing());
    }

    #[test]
    fn test_reveal_updates_apply_in_order() {
        let now = Instant::now();
        let mut state = DisplayState::new(now);
        state.apply(password("aB3$efgh"), now);

        state.apply_ui(UiUpdate::RevealFrame {
            id: 1,
            text: "aQ      ".into(),
        });
        assert_eq!(state.shown(), "aQ      ");

        state.apply_ui(UiUpdate::RevealDone {
            id: 1,
            strength: Strength::Fair,
        });
        assert_eq!(state.shown(), "aB3$efgh");
        assert_eq!(state.host_grade(), Some(Strength::Fair));
        assert_eq!(state.strength_text(), "FAIR");
        assert!(!state.is_revealing());
    }

    #[test]
    fn test_stale_reveal_ignored() {
        let now = Instant::now();
        let mut state = DisplayState::new(now);
        state.apply(password("first-pw1A"), now);
        state.apply(password("second-pw2B"), now);

        state.apply_ui(UiUpdate::RevealFrame {
            id: 1,
            text: "stale".into(),
        });
        state.apply_ui(UiUpdate::RevealDone {
            id: 1,
            strength: Strength::Weak,
        });

        assert_eq!(state.shown(), "");
        assert!(state.is_revealing());
        assert_eq!(state.password(), Some("second-pw2B"));
    }

    #[test]
    fn test_strength_and_length_recorded() {
        let now = Instant::now();
        let mut state = DisplayState::new(now);
        let mut label = Label::new();
        label.push_str("OK").unwrap();

        state.apply(DeviceMessage::Strength(label), now);
        state.apply(DeviceMessage::Length(16), now);

        assert_eq!(state.device_grade(), Some("OK"));
        assert_eq!(state.length(), Some(16));
    }

    #[test]
    fn test_link_status_text() {
        let now = Instant::now();
        let mut state = DisplayState::new(now);
        assert_eq!(state.link().to_string(), "Disconnected");

        state.apply_ui(UiUpdate::Link(LinkStatus::Connected("/dev/ttyACM0".into())));
        assert_eq!(state.link().to_string(), "Connected: /dev/ttyACM0");

        state.apply_ui(UiUpdate::Link(LinkStatus::Warning("Guessed COM1".into())));
        assert_eq!(state.link().to_string(), "Guessed COM1");

        state.apply_ui(UiUpdate::Link(LinkStatus::Error("port vanished".into())));
        assert_eq!(state.link().to_string(), "port vanished");
    }
}
