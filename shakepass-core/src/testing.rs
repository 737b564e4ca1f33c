//! In-memory fakes for unit tests

use std::collections::VecDeque;
use std::string::{String, ToString};
use std::vec::Vec;

use shakepass_protocol::{DeviceMessage, HostCommand};

use crate::traits::{Acceleration, Button, Controls, Icon, Link, SensorSource, StatusDisplay};

/// Sensors with a clock that ticks one millisecond per read
pub struct ScriptedSensors {
    pub clock_ms: u32,
    pub accel: Acceleration,
    pub sound: Option<u8>,
}

impl ScriptedSensors {
    /// Device lying flat on a table, no microphone
    pub fn still() -> Self {
        Self {
            clock_ms: 0,
            accel: Acceleration::new(0, 0, -1024),
            sound: None,
        }
    }
}

impl SensorSource for ScriptedSensors {
    fn now_ms(&mut self) -> u32 {
        self.clock_ms = self.clock_ms.wrapping_add(1);
        self.clock_ms
    }

    fn acceleration(&mut self) -> Acceleration {
        self.accel
    }

    fn sound_level(&mut self) -> Option<u8> {
        self.sound
    }
}

/// What the engine drew on the status display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Length(u8),
    Password(String),
    Strength(String),
    Icon(Icon),
    Clear,
}

/// Whole-board fake driven by the test harness
///
/// The clock only moves when the test calls [`FakeBoard::advance`].
pub struct FakeBoard {
    pub clock_ms: u32,
    pub accel: Acceleration,
    pub sound: Option<u8>,
    pub held_a: bool,
    pub held_b: bool,
    pub clicked_a: bool,
    pub clicked_b: bool,
    pub shaken: bool,
    pub shown: Vec<Shown>,
}

impl FakeBoard {
    pub fn new() -> Self {
        Self {
            clock_ms: 0,
            accel: Acceleration::new(-20, 48, -1016),
            sound: None,
            held_a: false,
            held_b: false,
            clicked_a: false,
            clicked_b: false,
            shaken: false,
            shown: Vec::new(),
        }
    }

    pub fn advance(&mut self, ms: u32) {
        self.clock_ms = self.clock_ms.wrapping_add(ms);
    }

    /// Press and hold both buttons, latching both press edges
    pub fn press_chord(&mut self) {
        self.held_a = true;
        self.held_b = true;
        self.clicked_a = true;
        self.clicked_b = true;
    }

    pub fn release_all(&mut self) {
        self.held_a = false;
        self.held_b = false;
    }

    pub fn last_shown(&self) -> Option<&Shown> {
        self.shown.last()
    }
}

impl SensorSource for FakeBoard {
    fn now_ms(&mut self) -> u32 {
        self.clock_ms
    }

    fn acceleration(&mut self) -> Acceleration {
        self.accel
    }

    fn sound_level(&mut self) -> Option<u8> {
        self.sound
    }
}

impl Controls for FakeBoard {
    fn is_pressed(&mut self, button: Button) -> bool {
        match button {
            Button::A => self.held_a,
            Button::B => self.held_b,
        }
    }

    fn was_pressed(&mut self, button: Button) -> bool {
        let flag = match button {
            Button::A => &mut self.clicked_a,
            Button::B => &mut self.clicked_b,
        };
        core::mem::take(flag)
    }

    fn was_shaken(&mut self) -> bool {
        core::mem::take(&mut self.shaken)
    }
}

impl StatusDisplay for FakeBoard {
    fn show_length(&mut self, length: u8) {
        self.shown.push(Shown::Length(length));
    }

    fn show_password(&mut self, password: &str) {
        self.shown.push(Shown::Password(password.to_string()));
    }

    fn show_strength(&mut self, label: &str) {
        self.shown.push(Shown::Strength(label.to_string()));
    }

    fn show_icon(&mut self, icon: Icon) {
        self.shown.push(Shown::Icon(icon));
    }

    fn clear(&mut self) {
        self.shown.push(Shown::Clear);
    }
}

/// Serial link fake with a command queue and a transcript
#[derive(Default)]
pub struct FakeLink {
    pub incoming: VecDeque<HostCommand>,
    pub sent: Vec<DeviceMessage>,
}

impl FakeLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: HostCommand) {
        self.incoming.push_back(cmd);
    }

    /// Transcript as wire lines without terminators
    pub fn lines(&self) -> Vec<String> {
        self.sent
            .iter()
            .map(|msg| msg.encode().trim_end().to_string())
            .collect()
    }

    /// Transcript with telemetry lines removed
    pub fn non_telemetry_lines(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| !line.starts_with("S:"))
            .collect()
    }

    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl Link for FakeLink {
    fn poll_command(&mut self) -> Option<HostCommand> {
        self.incoming.pop_front()
    }

    fn send(&mut self, msg: DeviceMessage) {
        self.sent.push(msg);
    }
}
