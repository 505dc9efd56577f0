//! Circular tape of signed 8-bit cells.

use crate::error::ConfigError;

/// Fixed-size circular memory with a cursor.
///
/// Moving past either end wraps to the other. Cell arithmetic wraps within
/// the `i8` range, so `127 + 1 == -128`.
#[derive(Debug, Clone)]
pub struct Tape {
    /// Backing cells.
    cells: Vec<i8>,
    /// Index of the current cell.
    cursor: usize,
}

impl Tape {
    /// Create a zeroed tape of `size` cells.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTapeSize`] if `size` is zero: a tape with
    /// no cells has nowhere to move.
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::ZeroTapeSize);
        }
        Ok(Tape {
            cells: vec![0; size],
            cursor: 0,
        })
    }

    /// Zero every cell and rewind the cursor.
    pub fn reset(&mut self) {
        self.cells.fill(0);
        self.cursor = 0;
    }

    /// Current cursor position.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move one cell right, wrapping to index 0 after the last cell.
    #[inline]
    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1) % self.cells.len();
    }

    /// Move one cell left, wrapping to the last cell before index 0.
    #[inline]
    pub fn left(&mut self) {
        let len = self.cells.len();
        self.cursor = (self.cursor + len - 1) % len;
    }

    /// Value of the current cell.
    #[inline]
    #[must_use]
    pub fn get(&self) -> i8 {
        self.cells[self.cursor]
    }

    /// Overwrite the current cell.
    #[inline]
    pub fn set(&mut self, value: i8) {
        self.cells[self.cursor] = value;
    }

    /// Add one to the current cell, wrapping.
    #[inline]
    pub fn inc(&mut self) {
        let cell = &mut self.cells[self.cursor];
        *cell = cell.wrapping_add(1);
    }

    /// Subtract one from the current cell, wrapping.
    #[inline]
    pub fn dec(&mut self) {
        let cell = &mut self.cells[self.cursor];
        *cell = cell.wrapping_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_cells_rejected() {
        assert!(matches!(Tape::new(0), Err(ConfigError::ZeroTapeSize)));
    }

    #[test]
    fn test_left_from_zero_wraps_to_end() {
        let mut tape = Tape::new(10).unwrap();
        tape.left();
        assert_eq!(tape.cursor(), 9);
    }

    #[test]
    fn test_right_from_end_wraps_to_zero() {
        let mut tape = Tape::new(10).unwrap();
        for _ in 0..9 {
            tape.right();
        }
        assert_eq!(tape.cursor(), 9);
        tape.right();
        assert_eq!(tape.cursor(), 0);
    }

    #[test]
    fn test_single_cell_tape() {
        let mut tape = Tape::new(1).unwrap();
        tape.left();
        assert_eq!(tape.cursor(), 0);
        tape.right();
        assert_eq!(tape.cursor(), 0);
    }

    #[test]
    fn test_cell_arithmetic_wraps() {
        let mut tape = Tape::new(2).unwrap();
        tape.set(127);
        tape.inc();
        assert_eq!(tape.get(), -128);
        tape.dec();
        assert_eq!(tape.get(), 127);

        tape.set(-128);
        tape.dec();
        assert_eq!(tape.get(), 127);
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let mut tape = Tape::new(4).unwrap();
        for _ in 0..4 {
            tape.inc();
            tape.right();
        }
        tape.right();
        tape.reset();
        assert_eq!(tape.cursor(), 0);
        for _ in 0..4 {
            assert_eq!(tape.get(), 0);
            tape.right();
        }
    }
}
