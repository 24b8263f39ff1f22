//! Square tile grid.
//!
//! Cells are stored row-major as `size * size` tile values, `0` meaning
//! empty. Every stored value is `0` or a power of two no smaller than 2;
//! constructors enforce this and the engine only ever writes values that
//! preserve it (spawns of 2/4 and doublings).
//!
//! ## Lines
//!
//! Moves operate on lines (rows or columns). [`Grid::line_indices`] yields
//! the cell indices of a line in the order a given direction reads it, so
//! callers can treat every direction as a slide toward the front.

use smallvec::SmallVec;
use std::fmt;

use super::direction::Direction;

/// A tile value: `0` for empty, otherwise a power of two.
pub type Tile = u32;

/// Indices of one line, inline for boards up to 8 wide.
pub type LineIndices = SmallVec<[usize; 8]>;

/// Errors from building a grid out of raw cells.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid size must be positive")]
    ZeroSize,
    #[error("expected {expected} cells, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("cell {index} holds {value}, which is not 0 or a power of two")]
    InvalidTile { index: usize, value: Tile },
}

/// Largest tile a cell can hold. Doubling it would overflow, so two of
/// these never merge.
pub const MAX_TILE: Tile = 1 << 31;

/// Returns true for values a cell may hold.
#[must_use]
pub const fn is_valid_tile(value: Tile) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

/// Returns true if two tiles of `value` would merge.
#[must_use]
pub const fn can_merge(value: Tile) -> bool {
    value != 0 && value < MAX_TILE
}

/// Row-major `size x size` board of tiles.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// Create an empty grid.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "Grid size must be positive");
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a grid from row-major cells, validating length and values.
    ///
    /// ```
    /// use rust_2048::core::Grid;
    ///
    /// let grid = Grid::from_cells(2, vec![2, 4, 4, 2]).unwrap();
    /// assert_eq!(grid.get(1, 0), 4);
    /// assert!(Grid::from_cells(2, vec![2, 3, 0, 0]).is_err());
    /// ```
    pub fn from_cells(size: usize, cells: impl Into<Vec<Tile>>) -> Result<Self, GridError> {
        if size == 0 {
            return Err(GridError::ZeroSize);
        }
        let cells = cells.into();
        let expected = size * size;
        if cells.len() != expected {
            return Err(GridError::LengthMismatch {
                expected,
                actual: cells.len(),
            });
        }
        if let Some((index, &value)) = cells.iter().enumerate().find(|&(_, &v)| !is_valid_tile(v)) {
            return Err(GridError::InvalidTile { index, value });
        }
        Ok(Self { size, cells })
    }

    /// Side length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// All cells, row-major.
    #[must_use]
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Tile at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Tile {
        assert!(row < self.size && col < self.size, "cell ({row}, {col}) out of bounds");
        self.cells[row * self.size + col]
    }

    pub(crate) fn set(&mut self, index: usize, value: Tile) {
        debug_assert!(is_valid_tile(value));
        self.cells[index] = value;
    }

    /// Indices of empty cells in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == 0)
            .map(|(i, _)| i)
            .collect()
    }

    /// True if any cell is empty.
    #[must_use]
    pub fn has_empty(&self) -> bool {
        self.cells.contains(&0)
    }

    /// True if some cell holds exactly `value`.
    #[must_use]
    pub fn contains(&self, value: Tile) -> bool {
        self.cells.contains(&value)
    }

    /// Largest tile, `0` on an empty grid.
    #[must_use]
    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Sum of all tile values.
    #[must_use]
    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().map(|&v| u64::from(v)).sum()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn non_empty_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    /// Cell indices of row or column `line`, in `direction`'s read order.
    ///
    /// | direction | line is | order |
    /// |-----------|---------|-------|
    /// | Left      | row     | left to right |
    /// | Right     | row     | right to left |
    /// | Up        | column  | top to bottom |
    /// | Down      | column  | bottom to top |
    #[must_use]
    pub fn line_indices(&self, direction: Direction, line: usize) -> LineIndices {
        debug_assert!(line < self.size);
        let n = self.size;
        let mut indices: LineIndices = if direction.is_horizontal() {
            (0..n).map(|col| line * n + col).collect()
        } else {
            (0..n).map(|row| row * n + line).collect()
        };
        if !direction.toward_start() {
            indices.reverse();
        }
        indices
    }

    /// True if two orthogonally adjacent cells hold the same mergeable tile.
    #[must_use]
    pub fn has_adjacent_pair(&self) -> bool {
        let n = self.size;
        for row in 0..n {
            for col in 0..n {
                let v = self.cells[row * n + col];
                if !can_merge(v) {
                    continue;
                }
                if col + 1 < n && self.cells[row * n + col + 1] == v {
                    return true;
                }
                if row + 1 < n && self.cells[(row + 1) * n + col] == v {
                    return true;
                }
            }
        }
        false
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({}x{}, {:?})", self.size, self.size, self.cells)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.max_tile().max(1).to_string().len();
        for row in self.cells.chunks(self.size) {
            let line: Vec<String> = row
                .iter()
                .map(|&v| {
                    if v == 0 {
                        format!("{:>width$}", ".")
                    } else {
                        format!("{v:>width$}")
                    }
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
