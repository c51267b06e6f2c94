//! Board module - manages the game grid
//!
//! The board is a 10x22 grid (2 hidden overflow rows on top of 20 visible
//! rows) where each cell can be empty or filled with a piece kind.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..21
//! (top to bottom). Rows 0..1 are hidden; a piece may also extend above
//! row 0 (negative y) while it is still falling.

use arrayvec::ArrayVec;

use crate::pieces::Tetromino;
use crate::types::{Cell, PieceKind, Rotation, BOARD_ROWS, BOARD_WIDTH, HIDDEN_ROWS};

const WIDTH: usize = BOARD_WIDTH as usize;
const ROWS: usize = BOARD_ROWS as usize;

/// Total number of cells on the board
const BOARD_SIZE: usize = WIDTH * ROWS;

/// Row-major `u8` grid used by snapshots (0 = empty, otherwise `PieceKind::cell_code`)
pub type U8Grid = [[u8; WIDTH]; ROWS];

/// Outcome of writing a piece into the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockResult {
    /// Rows removed by the line clear that followed the lock
    pub lines_cleared: u32,
    /// Some locked cell ended up in the hidden rows or above the board
    pub topped_out: bool,
}

/// The game board - 10 columns x 22 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_ROWS as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Total rows including the hidden ones
    pub fn height(&self) -> u8 {
        BOARD_ROWS
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check whether a single mino may sit at (x, y).
    ///
    /// Horizontal bounds and the floor always apply. Anything above the top
    /// edge (negative y) is free so pieces can spawn partly off-board.
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_ROWS as i8 {
            return false;
        }
        y < 0 || !self.is_occupied(x, y)
    }

    /// Check if `piece`, turned to `rotation` and shifted by (dx, dy), fits.
    pub fn is_valid_placement(&self, piece: &Tetromino, rotation: Rotation, dx: i8, dy: i8) -> bool {
        let candidate = Tetromino {
            rotation,
            ..piece.shifted(dx, dy)
        };
        self.fits(&candidate)
    }

    /// Check if every cell of `piece` is free at its current position
    pub fn fits(&self, piece: &Tetromino) -> bool {
        piece.cells().iter().all(|&(x, y)| self.is_free(x, y))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= ROWS {
            return false;
        }
        let start = y * WIDTH;
        self.cells[start..start + WIDTH].iter().all(|cell| cell.is_some())
    }

    /// Remove row `y`, shift all rows above down by one and empty the top row
    fn remove_row(&mut self, y: usize) {
        // copy_within handles the overlapping ranges
        for row in (1..=y).rev() {
            let src_start = (row - 1) * WIDTH;
            self.cells.copy_within(src_start..src_start + WIDTH, row * WIDTH);
        }
        for cell in &mut self.cells[..WIDTH] {
            *cell = None;
        }
    }

    /// Clear all full rows, returning their original row indices (bottom to top).
    ///
    /// Scans bottom-to-top. After a row is removed the rows above have
    /// shifted down into the same index, so that index is examined again
    /// before moving up.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, ROWS> {
        let mut cleared = ArrayVec::new();
        let mut y = ROWS;

        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                // The row now at `row` started `cleared.len()` rows higher.
                cleared.push(row - cleared.len());
                self.remove_row(row);
            } else {
                y -= 1;
            }
        }

        cleared
    }

    /// Clear all full rows and return how many were removed
    pub fn clear_lines(&mut self) -> u32 {
        self.clear_full_rows().len() as u32
    }

    /// Write `piece` into the grid, then clear full rows.
    ///
    /// Only cells with y >= 0 are written. A piece with any cell in the
    /// hidden rows (or above the board) reports `topped_out`.
    pub fn lock(&mut self, piece: &Tetromino) -> LockResult {
        let mut topped_out = false;

        for (x, y) in piece.cells() {
            if y < HIDDEN_ROWS as i8 {
                topped_out = true;
            }
            if y >= 0 {
                self.set(x, y, Some(piece.kind));
            }
        }

        LockResult {
            lines_cleared: self.clear_lines(),
            topped_out,
        }
    }

    /// True if any cell in the hidden overflow rows is occupied
    pub fn is_top_out(&self) -> bool {
        self.cells[..HIDDEN_ROWS as usize * WIDTH]
            .iter()
            .any(|cell| cell.is_some())
    }

    /// `piece` moved straight down until one more row would collide.
    ///
    /// Preview only; neither the board nor `piece` is modified.
    pub fn ghost_placement(&self, piece: &Tetromino) -> Tetromino {
        let mut ghost = *piece;
        while self.fits(&ghost.shifted(0, 1)) {
            ghost = ghost.shifted(0, 1);
        }
        ghost
    }

    /// Copy the grid into a `u8` matrix for snapshots
    pub fn write_u8_grid(&self, out: &mut U8Grid) {
        for (y, row) in out.iter_mut().enumerate() {
            for (x, slot) in row.iter_mut().enumerate() {
                *slot = self.cells[y * WIDTH + x].map_or(0, |kind| kind.cell_code());
            }
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [None; BOARD_SIZE];
    }

    /// Fill row `y` completely except for the listed columns
    pub fn fill_row_except(&mut self, y: i8, holes: &[i8], kind: PieceKind) {
        for x in 0..BOARD_WIDTH as i8 {
            if !holes.contains(&x) {
                self.set(x, y, Some(kind));
            }
        }
    }

    /// Create from a 2D vector for testing (converts to flat array)
    #[cfg(test)]
    pub fn from_cells(cells_2d: Vec<Vec<Cell>>) -> Self {
        assert_eq!(cells_2d.len(), ROWS);
        assert!(cells_2d.iter().all(|row| row.len() == WIDTH));

        let mut flat = [None; BOARD_SIZE];
        for (y, row) in cells_2d.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                flat[y * WIDTH + x] = *cell;
            }
        }
        Self { cells: flat }
    }

    /// Convert to 2D vector for testing/display
    #[cfg(test)]
    pub fn to_cells(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(WIDTH).map(|row| row.to_vec()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
