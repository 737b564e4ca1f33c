//! Display backend trait
//!
//! Defines the interface the renderer draws through, plus an ANSI terminal
//! implementation.

use core::fmt;
use std::io::Write;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Writing to the output failed
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::Communication => f.write_str("display write failed"),
            DisplayError::InvalidCoordinates => f.write_str("coordinates out of range"),
            DisplayError::NotInitialized => f.write_str("display not ready"),
        }
    }
}

impl std::error::Error for DisplayError {}

/// Display backend trait
///
/// Provides a device-agnostic interface for text rendering.
pub trait DisplayBackend {
    /// Clear the entire display
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw text at the specified row and column (0-based, in characters)
    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError>;

    /// Invert a region on the specified row, `end_col` exclusive
    fn invert_region(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError>;

    /// Flush buffered content to the display
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Get the display dimensions as (columns, rows) in characters
    fn dimensions(&self) -> (u8, u8);

    /// Check if the display is ready
    fn is_ready(&self) -> bool;
}

const ESC_CLEAR_ALL: &str = "\x1b[2J";
const ESC_HOME: &str = "\x1b[H";
const ESC_CLEAR_EOL: &str = "\x1b[K";
const ESC_CLEAR_BELOW: &str = "\x1b[J";
const ESC_REVERSE: &str = "\x1b[7m";
const ESC_RESET: &str = "\x1b[0m";

/// ANSI terminal backend
///
/// Rows are buffered and written in one go on `flush`, overwriting the
/// previous frame in place.
pub struct TerminalBackend<W: Write> {
    out: W,
    cols: u8,
    rows: Vec<String>,
    inverted: Vec<Option<(u8, u8)>>,
    started: bool,
}

impl<W: Write> TerminalBackend<W> {
    pub fn new(out: W, cols: u8, rows: u8) -> Self {
        Self {
            out,
            cols,
            rows: vec![String::new(); rows as usize],
            inverted: vec![None; rows as usize],
            started: false,
        }
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn compose(&self) -> String {
        let mut frame = String::new();
        if !self.started {
            frame.push_str(ESC_CLEAR_ALL);
        }
        frame.push_str(ESC_HOME);

        for (row, text) in self.rows.iter().enumerate() {
            match self.inverted[row] {
                Some((start, end)) => {
                    for (col, c) in text.chars().enumerate() {
                        if col == start as usize {
                            frame.push_str(ESC_REVERSE);
                        }
                        if col == end as usize {
                            frame.push_str(ESC_RESET);
                        }
                        frame.push(c);
                    }
                    frame.push_str(ESC_RESET);
                }
                None => frame.push_str(text),
            }
            frame.push_str(ESC_CLEAR_EOL);
            frame.push_str("\r\n");
        }

        frame.push_str(ESC_CLEAR_BELOW);
        frame
    }
}

impl<W: Write> DisplayBackend for TerminalBackend<W> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.rows.iter_mut().for_each(String::clear);
        self.inverted.iter_mut().for_each(|r| *r = None);
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        let line = self
            .rows
            .get_mut(row as usize)
            .ok_or(DisplayError::InvalidCoordinates)?;
        if col >= self.cols {
            return Err(DisplayError::InvalidCoordinates);
        }

        let mut chars: Vec<char> = line.chars().collect();
        if chars.len() < col as usize {
            chars.resize(col as usize, ' ');
        }
        chars.truncate(col as usize);
        chars.extend(text.chars().take((self.cols - col) as usize));
        *line = chars.into_iter().collect();
        Ok(())
    }

    fn invert_region(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError> {
        if start_col > end_col || end_col > self.cols {
            return Err(DisplayError::InvalidCoordinates);
        }
        let slot = self
            .inverted
            .get_mut(row as usize)
            .ok_or(DisplayError::InvalidCoordinates)?;
        *slot = Some((start_col, end_col));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let frame = self.compose();
        self.out
            .write_all(frame.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|_| DisplayError::Communication)?;
        self.started = true;
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (self.cols, self.rows.len() as u8)
    }

    fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(backend: TerminalBackend<Vec<u8>>) -> String {
        String::from_utf8(backend.into_inner()).unwrap()
    }

    #[test]
    fn test_first_flush_clears_terminal() {
        let mut backend = TerminalBackend::new(Vec::new(), 20, 2);
        backend.draw_text(0, 0, "hello").unwrap();
        backend.flush().unwrap();
        backend.flush().unwrap();

        let out = output(backend);
        assert_eq!(out.matches(ESC_CLEAR_ALL).count(), 1);
        assert_eq!(out.matches("hello").count(), 2);
    }

    #[test]
    fn test_draw_text_at_column_truncates() {
        let mut backend = TerminalBackend::new(Vec::new(), 8, 1);
        backend.draw_text(0, 3, "abcdefgh").unwrap();
        backend.flush().unwrap();

        assert!(output(backend).contains("   abcde\x1b[K"));
    }

    #[test]
    fn test_invert_wraps_region() {
        let mut backend = TerminalBackend::new(Vec::new(), 10, 1);
        backend.draw_text(0, 0, "abcdef").unwrap();
        backend.invert_region(0, 1, 3).unwrap();
        backend.flush().unwrap();

        assert!(output(backend).contains("a\x1b[7mbc\x1b[0mdef\x1b[0m"));
    }

    #[test]
    fn test_bad_coordinates_rejected() {
        let mut backend = TerminalBackend::new(Vec::new(), 10, 2);
        assert_eq!(
            backend.draw_text(2, 0, "x"),
            Err(DisplayError::InvalidCoordinates)
        );
        assert_eq!(
            backend.invert_region(0, 4, 11),
            Err(DisplayError::InvalidCoordinates)
        );
        assert_eq!(backend.dimensions(), (10, 2));
    }
}
