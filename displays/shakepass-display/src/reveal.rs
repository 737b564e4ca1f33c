//! Password reveal animation
//!
//! Each position is scrambled a few times with random characters before the
//! real character settles, left to right. [`RevealFrames`] produces the
//! frames; [`spawn_reveal`] paces them on a worker thread and posts them to
//! the UI thread as [`UiUpdate`]s.

use std::io;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;
use rand::Rng;
use shakepass_core::password::alphabet::ALL;
use shakepass_core::password::host_strength;

use crate::mirror::UiUpdate;

/// Characters used for scrambling
pub const REVEAL_CHARSET: &[u8] = ALL;

/// Random characters shown per position before it settles
pub const SCRAMBLES_PER_CHAR: u8 = 9;

/// Delay after each scramble frame
pub const FRAME_DELAY: Duration = Duration::from_millis(60);

/// One animation frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Text to show, padded with spaces to the password length
    pub text: String,
    /// True when this frame fixed a position to its real character
    pub settled: bool,
}

/// Iterator over the frames of one reveal
pub struct RevealFrames<R> {
    target: Vec<char>,
    shown: Vec<char>,
    pos: usize,
    scrambles: u8,
    rng: R,
}

impl<R: Rng> RevealFrames<R> {
    pub fn new(password: &str, rng: R) -> Self {
        let target: Vec<char> = password.chars().collect();
        let shown = vec![' '; target.len()];
        Self {
            target,
            shown,
            pos: 0,
            scrambles: 0,
            rng,
        }
    }

    fn text(&self) -> String {
        self.shown.iter().collect()
    }
}

impl<R: Rng> Iterator for RevealFrames<R> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let pos = self.pos;
        let real = *self.target.get(pos)?;

        if self.scrambles < SCRAMBLES_PER_CHAR {
            let idx = self.rng.random_range(0..REVEAL_CHARSET.len());
            self.shown[pos] = char::from(REVEAL_CHARSET[idx]);
            self.scrambles += 1;
            return Some(Frame {
                text: self.text(),
                settled: false,
            });
        }

        self.shown[pos] = real;
        self.pos += 1;
        self.scrambles = 0;
        Some(Frame {
            text: self.text(),
            settled: true,
        })
    }
}

/// Run a reveal on a worker thread
///
/// Frames are posted as [`UiUpdate::RevealFrame`], followed by
/// [`UiUpdate::RevealDone`] with the host grade. The worker stops early if
/// the UI side hangs up.
pub fn spawn_reveal(
    id: u64,
    password: String,
    updates: Sender<UiUpdate>,
    delay: Duration,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("reveal".into())
        .spawn(move || {
            for frame in RevealFrames::new(&password, rand::rng()) {
                let settled = frame.settled;
                if updates
                    .send(UiUpdate::RevealFrame { id, text: frame.text })
                    .is_err()
                {
                    debug!("Reveal {id} abandoned");
                    return;
                }
                if !settled {
                    thread::sleep(delay);
                }
            }

            let strength = host_strength(&password);
            let _ = updates.send(UiUpdate::RevealDone { id, strength });
        })
}
