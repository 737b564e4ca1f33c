//! Screen buffer types
//!
//! Provides a character-based screen buffer for the text renderer.

use heapless::String;

use crate::backend::{DisplayBackend, DisplayError};

/// Number of character rows
pub const SCREEN_ROWS: usize = 14;

/// Number of character columns
pub const SCREEN_COLS: usize = 64;

/// Bytes reserved per line (plot glyphs are multi-byte)
const LINE_BYTES: usize = SCREEN_COLS * 4;

/// Screen buffer for text-mode displays
///
/// Holds one frame of text that can be rendered to any `DisplayBackend`
/// implementation. Only marked dirty when a row actually changes.
#[derive(Clone)]
pub struct Screen {
    /// Current display content
    lines: [String<LINE_BYTES>; SCREEN_ROWS],
    /// Highlight state per row (start_col, end_col)
    highlights: [Option<(u8, u8)>; SCREEN_ROWS],
    /// Whether the screen needs to be redrawn
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create a new empty screen
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            highlights: [None; SCREEN_ROWS],
            dirty: true,
        }
    }

    /// Set the content of a row, truncated to [`SCREEN_COLS`] characters
    pub fn set_line(&mut self, row: usize, text: &str) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };

        let mut next: String<LINE_BYTES> = String::new();
        for c in text.chars().take(SCREEN_COLS) {
            if next.push(c).is_err() {
                break;
            }
        }

        if *line != next {
            *line = next;
            self.dirty = true;
        }
    }

    /// Get the content of a specific row
    pub fn get_line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    /// Set highlight (invert) region for a row
    pub fn set_highlight(&mut self, row: usize, start_col: u8, end_col: u8) {
        if row < SCREEN_ROWS && self.highlights[row] != Some((start_col, end_col)) {
            self.highlights[row] = Some((start_col, end_col));
            self.dirty = true;
        }
    }

    /// Clear highlight for a row
    pub fn clear_highlight(&mut self, row: usize) {
        if row < SCREEN_ROWS && self.highlights[row].is_some() {
            self.highlights[row] = None;
            self.dirty = true;
        }
    }

    /// Get highlight region for a row
    pub fn get_highlight(&self, row: usize) -> Option<(u8, u8)> {
        self.highlights.get(row).copied().flatten()
    }

    /// Check if screen needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark screen as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Push the buffer to a backend if anything changed
    pub fn present<B: DisplayBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<(), DisplayError> {
        if !self.dirty {
            return Ok(());
        }
        if !backend.is_ready() {
            return Err(DisplayError::NotInitialized);
        }

        backend.clear()?;
        for (row, line) in self.lines.iter().enumerate() {
            backend.draw_text(row as u8, 0, line)?;
            if let Some((start, end)) = self.highlights[row] {
                backend.invert_region(row as u8, start, end)?;
            }
        }
        backend.flush()?;

        self.mark_clean();
        Ok(())
    }
}
