//! Fixed 2x2 colour filter tile of the sensor.
//!
//! ```text
//!        col even  col odd
//! row even   G1       R
//! row odd    B        G2
//! ```

use std::fmt;

use crate::image_pipeline::common::error::InvalidGridError;

/// Output channel of a decoded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Filter colour sitting over one photosite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CfaRole {
    R,
    G1,
    G2,
    B,
}

impl CfaRole {
    /// Channel this site samples natively.
    #[inline]
    pub fn channel(self) -> Channel {
        match self {
            CfaRole::R => Channel::Red,
            CfaRole::G1 | CfaRole::G2 => Channel::Green,
            CfaRole::B => Channel::Blue,
        }
    }
}

impl fmt::Display for CfaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CfaRole::R => f.write_str("R"),
            CfaRole::G1 => f.write_str("G1"),
            CfaRole::G2 => f.write_str("G2"),
            CfaRole::B => f.write_str("B"),
        }
    }
}

/// Indexed by `[row % 2][col % 2]`.
const ROLE_TABLE: [[CfaRole; 2]; 2] = [
    [CfaRole::G1, CfaRole::R],
    [CfaRole::B, CfaRole::G2],
];

/// Role of the photosite at `(row, col)`.
#[inline]
pub fn role_at(row: usize, col: usize) -> CfaRole {
    ROLE_TABLE[row & 1][col & 1]
}

/// Where a pixel sits relative to the frame edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionClass {
    Interior,
    Border,
    Corner,
}

/// Index partitions of a validated Bayer grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfaGrid {
    rows: usize,
    cols: usize,
    pub even_rows: Vec<usize>,
    pub odd_rows: Vec<usize>,
    pub even_cols: Vec<usize>,
    pub odd_cols: Vec<usize>,
}

impl CfaGrid {
    pub fn new(rows: usize, cols: usize) -> Result<Self, InvalidGridError> {
        if rows % 2 != 0 || cols % 2 != 0 {
            return Err(InvalidGridError::OddDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            even_rows: (0..rows).step_by(2).collect(),
            odd_rows: (1..rows).step_by(2).collect(),
            even_cols: (0..cols).step_by(2).collect(),
            odd_cols: (1..cols).step_by(2).collect(),
        })
    }

    /// Like [`CfaGrid::new`] but also enforces a minimum extent on both axes.
    pub fn with_min_size(rows: usize, cols: usize, min: usize) -> Result<Self, InvalidGridError> {
        let grid = Self::new(rows, cols)?;
        if rows < min || cols < min {
            return Err(InvalidGridError::TooSmall { rows, cols, min });
        }
        Ok(grid)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn role_at(&self, row: usize, col: usize) -> CfaRole {
        role_at(row, col)
    }

    /// Row and column of the native sample feeding `role` in tile `(i, j)`.
    #[inline]
    pub fn tile_site(&self, role: CfaRole, i: usize, j: usize) -> (usize, usize) {
        match role {
            CfaRole::G1 => (self.even_rows[i], self.even_cols[j]),
            CfaRole::R => (self.even_rows[i], self.odd_cols[j]),
            CfaRole::B => (self.odd_rows[i], self.even_cols[j]),
            CfaRole::G2 => (self.odd_rows[i], self.odd_cols[j]),
        }
    }

    pub fn position_class(&self, row: usize, col: usize) -> PositionClass {
        let edge_row = row == 0 || row + 1 == self.rows;
        let edge_col = col == 0 || col + 1 == self.cols;
        match (edge_row, edge_col) {
            (true, true) => PositionClass::Corner,
            (false, false) => PositionClass::Interior,
            _ => PositionClass::Border,
        }
    }
}
