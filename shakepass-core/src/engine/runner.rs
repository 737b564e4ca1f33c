//! Cooperative engine
//!
//! The engine never blocks. Each call to [`Engine::step`] does one slice of
//! work and returns how long the caller should wait before the next call.
//! The firmware turns that into a timer await; tests just advance a fake
//! clock.

use shakepass_protocol::{DeviceMessage, Label, Password, SensorSample};

use crate::config::{EngineConfig, PasswordLength};
use crate::entropy::{EntropyPool, LENGTH_DOWN_SALT, LENGTH_UP_SALT};
use crate::password::{device_strength, generate, Strength, Vocabulary};
use crate::state::{Event, Lifecycle, Phase, TriggerSource};
use crate::traits::{Board, Button, Icon, Link};

use super::telemetry::TelemetryGate;

/// What the engine is doing between two steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Activity {
    /// Idle loop: sample, stream, watch inputs and commands
    Listening,
    /// Extra sampling after a shake gesture
    Stirring { remaining: u8 },
    /// PRE: charging the accumulator before commit
    Charging { remaining: u8 },
    /// GEN: password shown locally, waiting to publish
    Revealing { strength: Strength },
    /// POST: streaming a few more samples
    Settling { remaining: u8 },
    /// Waiting for both buttons to be released
    AwaitingRelease,
}

/// The entropy and password engine
pub struct Engine {
    config: EngineConfig,
    pool: EntropyPool,
    length: PasswordLength,
    telemetry: TelemetryGate,
    lifecycle: Lifecycle,
    activity: Activity,
    last_password: Option<Password>,
    icon_lit: bool,
}

impl Engine {
    /// Create an engine from its configuration
    pub fn new(config: EngineConfig) -> Self {
        Self {
            pool: EntropyPool::with_seed(config.seed),
            length: config.initial_length,
            telemetry: TelemetryGate::new(config.telemetry_enabled, config.telemetry_interval_ms),
            lifecycle: Lifecycle::new(),
            activity: Activity::Listening,
            last_password: None,
            icon_lit: false,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pool(&self) -> &EntropyPool {
        &self.pool
    }

    pub fn length(&self) -> PasswordLength {
        self.length
    }

    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn telemetry_enabled(&self) -> bool {
        self.telemetry.is_enabled()
    }

    /// Most recent password, if one was generated
    pub fn last_password(&self) -> Option<&str> {
        self.last_password.as_deref()
    }

    pub(crate) fn stored_password(&self) -> Option<&Password> {
        self.last_password.as_ref()
    }

    /// Announce the idle phase and show the length
    pub fn boot<B: Board + ?Sized, L: Link + ?Sized>(&mut self, board: &mut B, link: &mut L) {
        board.show_length(self.length.get());
        link.send(DeviceMessage::Phase(self.phase()));
    }

    /// Run one slice of work and return the delay before the next step
    pub fn step<B: Board + ?Sized, L: Link + ?Sized>(
        &mut self,
        board: &mut B,
        link: &mut L,
    ) -> u32 {
        match self.activity {
            Activity::Listening => self.listen(board, link),
            Activity::Stirring { remaining } => self.stir(remaining, board, link),
            Activity::Charging { remaining } => self.charge(remaining, board, link),
            Activity::Revealing { strength } => self.publish(strength, board, link),
            Activity::Settling { remaining } => self.settle(remaining, board, link),
            Activity::AwaitingRelease => self.await_release(board, link),
        }
    }

    fn listen<B: Board + ?Sized, L: Link + ?Sized>(
        &mut self,
        board: &mut B,
        link: &mut L,
    ) -> u32 {
        if core::mem::take(&mut self.icon_lit) {
            board.clear();
        }

        self.pool.sample(board);
        self.send_sample(board, link);

        if board.was_pressed(Button::A) {
            self.adjust_length(self.length.increment(), LENGTH_UP_SALT, board, link);
        }
        if board.was_pressed(Button::B) {
            self.adjust_length(self.length.decrement(), LENGTH_DOWN_SALT, board, link);
        }

        if board.chord_held() {
            self.start_cycle(TriggerSource::Chord, link);
            return 0;
        }

        let threshold = self.config.loud_threshold;
        let mut delay = self.config.idle_tick_ms;
        if board.was_shaken() {
            self.activity = Activity::Stirring {
                remaining: self.config.shake_burst,
            };
            delay = 0;
        } else if let Some(level) = board.sound_level().filter(|&l| l > threshold) {
            let now = board.now_ms();
            self.pool.mix(u32::from(level) ^ now);
            board.show_icon(Icon::Sound);
            self.icon_lit = true;
            delay = self.config.icon_hold_ms;
        }

        // One command per tick, whatever the sensors did
        if let Some(cmd) = link.poll_command() {
            if self.execute(cmd, board, link) {
                return 0;
            }
        }

        delay
    }

    fn stir<B: Board + ?Sized, L: Link + ?Sized>(
        &mut self,
        remaining: u8,
        board: &mut B,
        link: &mut L,
    ) -> u32 {
        if remaining == 0 {
            board.show_icon(Icon::Shake);
            self.icon_lit = true;
            self.activity = Activity::Listening;
            return self.config.icon_hold_ms;
        }

        self.pool.sample(board);
        self.send_sample(board, link);
        self.activity = Activity::Stirring {
            remaining: remaining - 1,
        };
        self.config.shake_tick_ms
    }

    fn charge<B: Board + ?Sized, L: Link + ?Sized>(
        &mut self,
        remaining: u8,
        board: &mut B,
        link: &mut L,
    ) -> u32 {
        if remaining > 0 {
            self.pool.sample(board);
            self.send_sample(board, link);
            self.activity = Activity::Charging {
                remaining: remaining - 1,
            };
            return self.config.charge_tick_ms;
        }

        let password = generate(&mut self.pool, board, self.length.get() as usize);
        let strength = device_strength(&password);

        self.fire(Event::Charged, link);
        board.show_password(&password);
        self.last_password = Some(password);
        self.activity = Activity::Revealing { strength };
        self.config.reveal_pause_ms
    }

    fn publish<B: Board + ?Sized, L: Link + ?Sized>(
        &mut self,
        strength: Strength,
        board: &mut B,
        link: &mut L,
    ) -> u32 {
        let label = strength.label(Vocabulary::Device);
        board.show_strength(label);

        if let Some(password) = &self.last_password {
            link.send(DeviceMessage::Password(password.clone()));
        }
        let mut wire_label = Label::new();
        let _ = wire_label.push_str(label);
        link.send(DeviceMessage::Strength(wire_label));
        link.send(DeviceMessage::Length(self.length.get()));

        self.fire(Event::Published, link);
        self.activity = Activity::Settling {
            remaining: self.config.settle_iterations,
        };
        0
    }

    fn settle<B: Board + ?Sized, L: Link + ?Sized>(
        &mut self,
        remaining: u8,
        board: &mut B,
        link: &mut L,
    ) -> u32 {
        if remaining == 0 {
            self.activity = Activity::AwaitingRelease;
            return 0;
        }

        self.send_sample(board, link);
        self.activity = Activity::Settling {
            remaining: remaining - 1,
        };
        self.config.settle_tick_ms
    }

    fn await_release<B: Board + ?Sized, L: Link + ?Sized>(
        &mut self,
        board: &mut B,
        link: &mut L,
    ) -> u32 {
        if board.any_held() {
            return self.config.release_poll_ms;
        }

        self.fire(Event::Released, link);
        board.show_length(self.length.get());
        self.activity = Activity::Listening;
        0
    }

    /// Enter PRE if idle; returns false if a cycle is already in flight
    pub(crate) fn start_cycle<L: Link + ?Sized>(
        &mut self,
        source: TriggerSource,
        link: &mut L,
    ) -> bool {
        if !self.fire(Event::Trigger(source), link) {
            return false;
        }
        self.activity = Activity::Charging {
            remaining: self.config.charge_iterations,
        };
        true
    }

    /// Apply a new length, show it and confirm it to the host
    pub(crate) fn set_length<B: Board + ?Sized, L: Link + ?Sized>(
        &mut self,
        length: PasswordLength,
        board: &mut B,
        link: &mut L,
    ) {
        self.length = length;
        board.show_length(length.get());
        link.send(DeviceMessage::Length(length.get()));
    }

    pub(crate) fn set_telemetry(&mut self, enabled: bool) {
        self.telemetry.set_enabled(enabled);
    }

    fn adjust_length<B: Board + ?Sized, L: Link + ?Sized>(
        &mut self,
        length: PasswordLength,
        salt: u32,
        board: &mut B,
        link: &mut L,
    ) {
        let now = board.now_ms();
        self.pool.mix(now ^ salt);
        self.set_length(length, board, link);
    }

    fn fire<L: Link + ?Sized>(&mut self, event: Event, link: &mut L) -> bool {
        match self.lifecycle.fire(event) {
            Some(phase) => {
                link.send(DeviceMessage::Phase(phase));
                true
            }
            None => false,
        }
    }

    fn send_sample<B: Board + ?Sized, L: Link + ?Sized>(&mut self, board: &mut B, link: &mut L) {
        let now = board.now_ms();
        if !self.telemetry.ready(now) {
            return;
        }

        let accel = board.acceleration();
        link.send(DeviceMessage::Sample(SensorSample {
            t_ms: now,
            ax: accel.x,
            ay: accel.y,
            az: accel.z,
            sound: board.sound_level(),
        }));
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
