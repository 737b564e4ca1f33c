//! Text renderer
//!
//! Lays the mirrored state out on a [`Screen`] and presents it through a
//! [`DisplayBackend`]. Rendering never changes the mirror.

use std::time::Instant;


use crate::backend::{DisplayBackend, DisplayError};
use crate::mirror::DisplayState;
use crate::screen::{Screen, SCREEN_COLS};

/// Renderer seam consumed by the UI loop
pub trait Renderer {
    /// Draw one frame from the current state
    fn render(&mut self, state: &DisplayState, now: Instant) -> Result<(), DisplayError>;
}

/// Full scale of an axis bar in milli-g
pub const AXIS_FULL_SCALE: f32 = 2048.0;

/// Cells on each side of an axis bar's centre
const BAR_HALF: usize = 24;

/// Cells in the magnitude plot
const PLOT_WIDTH: usize = 48;

const PLOT_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const TITLE: &str = "SHAKEPASS :: PASSWORD VAULT + LIVE SENSOR TELEMETRY";
const PASSWORD_PREFIX: &str = "PASSWORD: ";
const WAITING: &str = "WAITING...";
const PHASE_HELP: &str = "PRE: entropy mix  |  GEN: password emit  |  POST: settle";

// Row layout
const ROW_TITLE: usize = 0;
const ROW_LINK: usize = 1;
const ROW_STATE: usize = 2;
const ROW_AX: usize = 4;
const ROW_AY: usize = 5;
const ROW_AZ: usize = 6;
const ROW_MAGNITUDE: usize = 7;
const ROW_SOUND: usize = 8;
const ROW_PASSWORD: usize = 10;
const ROW_STRENGTH: usize = 11;
const ROW_HELP: usize = 13;

/// Centre-split bar for one axis, scaled to [`AXIS_FULL_SCALE`]
pub fn axis_bar(value: i16, half: usize) -> String {
    let v = (f32::from(value) / AXIS_FULL_SCALE).clamp(-1.0, 1.0);
    let filled = (v.abs() * half as f32).round() as usize;

    let mut bar = String::with_capacity(half * 2 + 1);
    for i in 0..half {
        bar.push(if v < 0.0 && i >= half - filled { '█' } else { ' ' });
    }
    bar.push('|');
    for i in 0..half {
        bar.push(if v > 0.0 && i < filled { '█' } else { ' ' });
    }
    bar
}

/// One-line plot of the newest `width` values, scaled to the window maximum
pub fn sparkline(values: impl Iterator<Item = f32>, width: usize) -> String {
    let values: Vec<f32> = values.collect();
    let window = &values[values.len().saturating_sub(width)..];
    let max = window.iter().copied().fold(1.0_f32, f32::max);
    let top = (PLOT_LEVELS.len() - 1) as f32;

    window
        .iter()
        .map(|v| {
            let level = (v.max(0.0) / max * top).round() as usize;
            PLOT_LEVELS[level.min(PLOT_LEVELS.len() - 1)]
        })
        .collect()
}

/// Renders into a [`Screen`] and presents it on a backend
pub struct TextRenderer<B: DisplayBackend> {
    backend: B,
    screen: Screen,
}

impl<B: DisplayBackend> TextRenderer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            screen: Screen::new(),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fill the screen buffer without presenting it
    pub fn layout(&mut self, state: &DisplayState, now: Instant) {
        let screen = &mut self.screen;

        screen.set_line(ROW_TITLE, TITLE);
        screen.set_line(ROW_LINK, &format!("LINK: {}", state.link()));

        let length = state
            .length()
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let grade = state.device_grade().unwrap_or("-");
        screen.set_line(
            ROW_STATE,
            &format!(
                "STATE: {:<4} {:>5.1}s   LEN: {:<3} DEVICE: {}",
                state.phase().name(),
                state.phase_age(now).as_secs_f32(),
                length,
                grade
            ),
        );

        let (ax, ay, az) = state.axes();
        for (row, label, value) in [(ROW_AX, "AX", ax), (ROW_AY, "AY", ay), (ROW_AZ, "AZ", az)] {
            screen.set_line(
                row,
                &format!("{label}  {value:>6} {}", axis_bar(value, BAR_HALF)),
            );
        }

        let history = state.history();
        screen.set_line(
            ROW_MAGNITUDE,
            &format!(
                "|A| {:>6.0} {}",
                history.latest_magnitude(),
                sparkline(history.magnitude(), PLOT_WIDTH)
            ),
        );

        let sound = match state.last_sample() {
            Some(sample) => sample
                .sound
                .map_or_else(|| "no microphone".to_string(), |level| level.to_string()),
            None => "-".to_string(),
        };
        screen.set_line(ROW_SOUND, &format!("SND {sound}"));

        let shown = match state.password() {
            None => WAITING,
            Some(_) => state.shown(),
        };
        screen.set_line(ROW_PASSWORD, &format!("{PASSWORD_PREFIX}{shown}"));

        // Highlight the password once it has fully settled
        let settled = state.password().is_some() && !state.is_revealing();
        if settled {
            let start = PASSWORD_PREFIX.len();
            let end = (start + shown.chars().count()).min(SCREEN_COLS);
            screen.set_highlight(ROW_PASSWORD, start as u8, end as u8);
        } else {
            screen.clear_highlight(ROW_PASSWORD);
        }

        screen.set_line(ROW_STRENGTH, &format!("STRENGTH: {}", state.strength_text()));

        let help = if state.phase().is_busy() {
            PHASE_HELP
        } else {
            "A/B: length  A+B: generate  shake/noise: entropy"
        };
        screen.set_line(ROW_HELP, help);
    }
}

impl<B: DisplayBackend> Renderer for TextRenderer<B> {
    fn render(&mut self, state: &DisplayState, now: Instant) -> Result<(), DisplayError> {
        self.layout(state, now);
        self.screen.present(&mut self.backend)
    }
}
