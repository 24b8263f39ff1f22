//! Single-line slide: compaction, merge, padding.
//!
//! A line is handed over already in its read order (see
//! `Grid::line_indices`), so the slide is always toward index 0:
//!
//! 1. Drop empty cells, keeping order.
//! 2. Scan once from the front. When two consecutive surviving tiles are
//!    equal they become one tile of twice the value and the scan continues
//!    after the pair. A merged tile never merges again in the same move,
//!    and two `MAX_TILE`s never merge at all.
//! 3. Pad with zeros at the back up to the original length.
//!
//! ```
//! use rust_2048::rules::slide_line;
//!
//! let slid = slide_line(&[2, 2, 2, 0]);
//! assert_eq!(slid.values.as_slice(), &[4, 2, 0, 0]);
//! assert_eq!(slid.gained, 4);
//! ```

use smallvec::SmallVec;

use crate::core::{can_merge, Tile};

/// Tile values of one line, inline for boards up to 8 wide.
pub type LineValues = SmallVec<[Tile; 8]>;

/// Result of sliding one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineSlide {
    /// New line contents, same length as the input.
    pub values: LineValues,

    /// Sum of the tiles created by merges.
    pub gained: u64,
}

impl LineSlide {
    /// True if the slide changed any cell of `before`.
    #[must_use]
    pub fn changed(&self, before: &[Tile]) -> bool {
        self.values.as_slice() != before
    }
}

/// Slide `line` toward its front.
#[must_use]
pub fn slide_line(line: &[Tile]) -> LineSlide {
    let compacted: LineValues = line.iter().copied().filter(|&v| v != 0).collect();

    let mut values = LineValues::with_capacity(line.len());
    let mut gained = 0u64;
    let mut i = 0;
    while i < compacted.len() {
        let tile = compacted[i];
        if can_merge(tile) && i + 1 < compacted.len() && compacted[i + 1] == tile {
            let merged = tile * 2;
            values.push(merged);
            gained += u64::from(merged);
            i += 2;
        } else {
            values.push(tile);
            i += 1;
        }
    }

    values.resize(line.len(), 0);
    LineSlide { values, gained }
}
