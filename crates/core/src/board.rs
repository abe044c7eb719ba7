//! Board module - the 10x40 grid of solidified minos
//!
//! Rows 0..20 are the hidden spawn buffer; rows 20..40 are what the player sees.
//! Coordinates: (x, y) where x ranges 0..10 (left to right) and y ranges 0..40
//! (top to bottom).

use arrayvec::ArrayVec;

use crate::piece::FallingPiece;
use crate::types::{Cell, Tetromino, HEIGHT, VISIBLE_HEIGHT, WIDTH};

/// Most rows a single piece can complete
pub const MAX_CLEARED_ROWS: usize = 4;

/// A fixed-size grid of cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [[Cell; WIDTH]; HEIGHT],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            rows: [[None; WIDTH]; HEIGHT],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<(usize, usize)> {
        if x < 0 || x as usize >= WIDTH || y < 0 || y as usize >= HEIGHT {
            return None;
        }
        Some((x as usize, y as usize))
    }

    /// Get cell at position (x, y), `None` when out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|(x, y)| self.rows[y][x])
    }

    /// Set cell at position (x, y); returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some((x, y)) => {
                self.rows[y][x] = cell;
                true
            }
            None => false,
        }
    }

    /// In bounds and empty
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Out of bounds or occupied
    pub fn is_blocked(&self, x: i8, y: i8) -> bool {
        !self.is_free(x, y)
    }

    /// Whether every cell of `piece` is in bounds and empty
    pub fn fits(&self, piece: &FallingPiece) -> bool {
        piece.cells().iter().all(|&(x, y)| self.is_free(x, y))
    }

    pub fn row(&self, y: usize) -> &[Cell; WIDTH] {
        &self.rows[y]
    }

    pub fn rows(&self) -> &[[Cell; WIDTH]; HEIGHT] {
        &self.rows
    }

    /// The rows shown to the player, top to bottom
    pub fn visible_rows(&self) -> &[[Cell; WIDTH]] {
        &self.rows[HEIGHT - VISIBLE_HEIGHT..]
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        y < HEIGHT && self.rows[y].iter().all(|cell| cell.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|cell| cell.is_none())
    }

    /// Write a piece's cells into the grid
    ///
    /// Returns whether any written cell landed inside the visible window.
    /// Cells outside the grid are skipped.
    pub fn place(&mut self, piece: &FallingPiece) -> bool {
        let mut visible = false;
        for (x, y) in piece.cells() {
            if self.set(x, y, Some(piece.tetromino)) && y as usize >= HEIGHT - VISIBLE_HEIGHT {
                visible = true;
            }
        }
        visible
    }

    /// Remove a row, shifting every row above it down by one and emptying row 0
    pub fn clear_row(&mut self, y: usize) {
        if y >= HEIGHT {
            return;
        }
        self.rows.copy_within(0..y, 1);
        self.rows[0] = [None; WIDTH];
    }

    /// Clear all full rows and return their indices (top to bottom, as scanned)
    ///
    /// Rows are removed one at a time from the lowest up, so indices recorded
    /// before the shift stay valid for the rows above.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, MAX_CLEARED_ROWS> {
        let mut full = ArrayVec::new();
        for y in 0..HEIGHT {
            if self.is_row_full(y) {
                full.push(y);
                if full.is_full() {
                    break;
                }
            }
        }

        // Clearing the topmost first would move the lower ones; go bottom-up and
        // account for rows already removed beneath.
        for (removed, &y) in full.iter().rev().enumerate() {
            self.clear_row(y + removed);
        }
        full
    }

    /// Fill a row completely, leaving the given columns empty (test and bench helper)
    pub fn fill_row_except(&mut self, y: usize, holes: &[usize], kind: Tetromino) {
        if y >= HEIGHT {
            return;
        }
        for x in 0..WIDTH {
            self.rows[y][x] = if holes.contains(&x) { None } else { Some(kind) };
        }
    }

    pub fn clear(&mut self) {
        self.rows = [[None; WIDTH]; HEIGHT];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
