//! UI tick loop
//!
//! Owns the mirror. Every tick drains the reader, worker and console queues
//! in that order, then renders one frame.

use std::io::Write;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use shakepass_display::{
    spawn_reveal, DisplayState, Effect, LinkStatus, Renderer, UiUpdate, FRAME_DELAY,
};
use shakepass_protocol::{Decoded, HostCommand};

use crate::console::{ConsoleAction, HELP};
use crate::serial::{CommandWriter, Inbound};

/// Whether the loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<R: Renderer, W: Write> {
    state: DisplayState,
    renderer: R,
    writer: Option<CommandWriter<W>>,
    inbound: Receiver<Inbound>,
    actions: Receiver<ConsoleAction>,
    ui_tx: Sender<UiUpdate>,
    ui_rx: Receiver<UiUpdate>,
    telemetry_on: bool,
    reveal_delay: Duration,
}

impl<R: Renderer, W: Write> App<R, W> {
    pub fn new(
        renderer: R,
        writer: Option<CommandWriter<W>>,
        inbound: Receiver<Inbound>,
        actions: Receiver<ConsoleAction>,
    ) -> Self {
        let (ui_tx, ui_rx) = mpsc::channel();
        Self {
            state: DisplayState::new(Instant::now()),
            renderer,
            writer,
            inbound,
            actions,
            ui_tx,
            ui_rx,
            telemetry_on: true,
            reveal_delay: FRAME_DELAY,
        }
    }

    /// Override the reveal frame delay
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn telemetry_on(&self) -> bool {
        self.telemetry_on
    }

    pub fn set_link(&mut self, status: LinkStatus) {
        self.state.apply_ui(UiUpdate::Link(status));
    }

    /// Send a command to the device, reporting failures as link status
    pub fn send(&mut self, cmd: HostCommand) {
        if let HostCommand::Telemetry(on) = cmd {
            self.telemetry_on = on;
        }

        let Some(writer) = self.writer.as_mut() else {
            warn!("Not connected, dropping {cmd:?}");
            return;
        };
        if let Err(e) = writer.send(cmd) {
            warn!("Send failed: {e}");
            self.state
                .apply_ui(UiUpdate::Link(LinkStatus::Error(format!("send failed: {e}"))));
        }
    }

    /// Process everything queued, then render one frame
    pub fn tick(&mut self, now: Instant) -> Result<Flow> {
        while let Ok(item) = self.inbound.try_recv() {
            self.handle_inbound(item, now);
        }

        while let Ok(update) = self.ui_rx.try_recv() {
            self.state.apply_ui(update);
        }

        while let Ok(action) = self.actions.try_recv() {
            match action {
                ConsoleAction::Send(cmd) => self.send(cmd),
                ConsoleAction::ToggleTelemetry => {
                    self.send(HostCommand::Telemetry(!self.telemetry_on))
                }
                ConsoleAction::Help => info!("{HELP}"),
                ConsoleAction::Quit => return Ok(Flow::Quit),
            }
        }

        self.renderer
            .render(&self.state, now)
            .context("rendering frame")?;
        Ok(Flow::Continue)
    }

    /// Tick at a fixed interval until asked to quit
    pub fn run(&mut self, frame_interval: Duration) -> Result<()> {
        loop {
            let started = Instant::now();
            if self.tick(started)? == Flow::Quit {
                info!("Quitting");
                return Ok(());
            }
            thread::sleep(frame_interval.saturating_sub(started.elapsed()));
        }
    }

    fn handle_inbound(&mut self, item: Inbound, now: Instant) {
        match item {
            Inbound::Line(Decoded::Message(msg)) => {
                if let Some(Effect::Reveal { id, password }) = self.state.apply(msg, now) {
                    let updates = self.ui_tx.clone();
                    if let Err(e) = spawn_reveal(id, password, updates, self.reveal_delay) {
                        warn!("Could not start reveal: {e}");
                    }
                }
            }
            Inbound::Line(Decoded::Ignored(reason)) => {
                debug!("Ignored line: {reason:?}");
                self.state.note_ignored();
            }
            Inbound::Overflow => {
                debug!("Ignored oversized line");
                self.state.note_ignored();
            }
            Inbound::Status(status) => self.state.apply_ui(UiUpdate::Link(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakepass_core::password::Strength;
    use shakepass_display::DisplayError;
    use shakepass_protocol::{DeviceMessage, IgnoreReason, Password, Phase};

    #[derive(Default)]
    struct CountingRenderer {
        frames: usize,
    }

    impl Renderer for CountingRenderer {
        fn render(&mut self, _state: &DisplayState, _now: Instant) -> Result<(), DisplayError> {
            self.frames += 1;
            Ok(())
        }
    }

    struct Harness {
        app: App<CountingRenderer, Vec<u8>>,
        inbound: Sender<Inbound>,
        actions: Sender<ConsoleAction>,
    }

    fn harness() -> Harness {
        let (inbound, inbound_rx) = mpsc::channel();
        let (actions, actions_rx) = mpsc::channel();
        let app = App::new(
            CountingRenderer::default(),
            Some(CommandWriter::new(Vec::new())),
            inbound_rx,
            actions_rx,
        )
        .with_reveal_delay(Duration::ZERO);
        Harness {
            app,
            inbound,
            actions,
        }
    }

    fn written(app: &App<CountingRenderer, Vec<u8>>) -> String {
        let bytes = app
            .writer
            .as_ref()
            .map(|w| w.get_ref().clone())
            .unwrap_or_default();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_tick_applies_lines_and_renders() {
        let mut h = harness();
        h.inbound
            .send(Inbound::Line(Decoded::Message(DeviceMessage::Phase(Phase::Post))))
            .unwrap();
        h.inbound
            .send(Inbound::Line(Decoded::Ignored(IgnoreReason::Malformed)))
            .unwrap();
        h.inbound.send(Inbound::Overflow).unwrap();

        assert_eq!(h.app.tick(Instant::now()).unwrap(), Flow::Continue);

        assert_eq!(h.app.state().phase(), Phase::Post);
        assert_eq!(h.app.state().ignored_lines(), 2);
        assert_eq!(h.app.renderer.frames, 1);
    }

    #[test]
    fn test_password_reveal_completes() {
        let mut h = harness();
        let mut pw = Password::new();
        pw.push_str("aB3$efghijkl").unwrap();
        h.inbound
            .send(Inbound::Line(Decoded::Message(DeviceMessage::Password(pw))))
            .unwrap();

        h.app.tick(Instant::now()).unwrap();
        assert_eq!(h.app.state().password(), Some("aB3$efghijkl"));

        for _ in 0..200 {
            if !h.app.state().is_revealing() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
            h.app.tick(Instant::now()).unwrap();
        }

        assert!(!h.app.state().is_revealing());
        assert_eq!(h.app.state().shown(), "aB3$efghijkl");
        assert_eq!(h.app.state().host_grade(), Some(Strength::Good));
    }

    #[test]
    fn test_console_actions_write_commands() {
        let mut h = harness();
        h.actions
            .send(ConsoleAction::Send(HostCommand::SetLength(20)))
            .unwrap();
        h.actions.send(ConsoleAction::ToggleTelemetry).unwrap();
        h.actions.send(ConsoleAction::ToggleTelemetry).unwrap();
        h.actions.send(ConsoleAction::Send(HostCommand::Generate)).unwrap();

        h.app.tick(Instant::now()).unwrap();

        assert_eq!(written(&h.app), "LEN:20\nTELEM:OFF\nTELEM:ON\nGEN\n");
        assert!(h.app.telemetry_on());
    }

    #[test]
    fn test_quit_stops_before_render() {
        let mut h = harness();
        h.actions.send(ConsoleAction::Quit).unwrap();

        assert_eq!(h.app.tick(Instant::now()).unwrap(), Flow::Quit);
        assert_eq!(h.app.renderer.frames, 0);
    }

    #[test]
    fn test_status_updates_link() {
        let mut h = harness();
        h.inbound
            .send(Inbound::Status(LinkStatus::Error("COM3: gone".into())))
            .unwrap();

        h.app.tick(Instant::now()).unwrap();

        assert_eq!(h.app.state().link(), &LinkStatus::Error("COM3: gone".into()));
    }

    #[test]
    fn test_send_without_port_is_harmless() {
        let (_inbound, inbound_rx) = mpsc::channel();
        let (_actions, actions_rx) = mpsc::channel();
        let mut app: App<CountingRenderer, Vec<u8>> =
            App::new(CountingRenderer::default(), None, inbound_rx, actions_rx);

        app.send(HostCommand::Telemetry(false));

        assert!(!app.telemetry_on());
        assert_eq!(app.tick(Instant::now()).unwrap(), Flow::Continue);
    }
}
