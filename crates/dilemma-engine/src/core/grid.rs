use std::{fmt, ops::Index, str::FromStr};

use arrayvec::ArrayVec;
use rand::Rng as _;
use serde::{Deserialize, Serialize};

use super::{
    seed::GridSeed,
    strategy::{InvalidStrategyMarker, Strategy},
};

/// Maximum number of members in a neighborhood (the cell itself plus 8 neighbors).
pub const NEIGHBORHOOD_CAPACITY: usize = 9;

/// The clipped 3×3 block around a cell, including the cell itself.
///
/// Members are stored in scan order: rows ascending, then columns ascending.
pub type Neighborhood = ArrayVec<Position, NEIGHBORHOOD_CAPACITY>;

/// A zero-based cell coordinate.
///
/// `row` selects a line of the grid (top to bottom) and `col` selects a cell
/// within that line (left to right). The same convention is used for loading,
/// scoring, evolving and rendering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum GridError {
    #[display("grid dimensions must be non-zero, got {rows}x{cols}")]
    Empty { rows: usize, cols: usize },
    #[display("grid dimensions {rows}x{cols} are too large")]
    TooLarge { rows: usize, cols: usize },
    #[display("expected {expected} cells, got {found}")]
    CellCountMismatch { expected: usize, found: usize },
    #[display("row {row} has {found} cells, expected {expected}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("defect ratio must be within [0, 1], got {ratio}")]
    InvalidRatio { ratio: f64 },
}

/// Errors raised while reading a grid from its text description.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseGridError {
    #[display("missing dimension header")]
    MissingHeader,
    #[display("line {line}: expected header \"<rows> <cols>\", got {header:?}")]
    InvalidHeader { line: usize, header: String },
    #[display("invalid grid dimensions {rows}x{cols}")]
    InvalidDimension { rows: usize, cols: usize },
    #[display("missing row {row}")]
    MissingRow { row: usize },
    #[display("row {row} has {found} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("row {row}, column {col}: {source}")]
    InvalidMarker {
        row: usize,
        col: usize,
        source: InvalidStrategyMarker,
    },
    #[display("line {line}: unexpected content after the last row")]
    TrailingRows { line: usize },
}

/// A fixed-size rectangular grid of strategies.
///
/// Cells are stored row-major. Dimensions are set at construction and never
/// change; only the strategy held by a cell can be replaced.
///
/// # Text Format
///
/// The first line holds the dimensions as `<rows> <cols>`. It is followed by
/// exactly `rows` lines of `cols` markers each (`C` or `D`):
///
/// ```
/// use dilemma_engine::{Grid, Position, Strategy};
///
/// let grid: Grid = "2 3\nCCD\nDCC\n".parse().unwrap();
/// assert_eq!(grid.rows(), 2);
/// assert_eq!(grid.cols(), 3);
/// assert_eq!(grid[Position::new(0, 2)], Strategy::Defect);
/// assert_eq!(grid.to_string(), "2 3\nCCD\nDCC\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Strategy>,
}

fn checked_cell_count(rows: usize, cols: usize) -> Result<usize, GridError> {
    if rows == 0 || cols == 0 {
        return Err(GridError::Empty { rows, cols });
    }
    rows.checked_mul(cols)
        .ok_or(GridError::TooLarge { rows, cols })
}

impl Grid {
    /// Creates a grid from row-major cells.
    pub fn new(rows: usize, cols: usize, cells: Vec<Strategy>) -> Result<Self, GridError> {
        let expected = checked_cell_count(rows, cols)?;
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch {
                expected,
                found: cells.len(),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    /// Creates a grid where every cell holds the same strategy.
    pub fn filled(rows: usize, cols: usize, strategy: Strategy) -> Result<Self, GridError> {
        let len = checked_cell_count(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![strategy; len],
        })
    }

    /// Creates a grid from a sequence of rows. All rows must have the same length.
    pub fn from_rows<I, R>(rows: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = Strategy>,
    {
        let mut cells = vec![];
        let mut num_rows = 0;
        let mut num_cols = None;
        for (row, strategies) in rows.into_iter().enumerate() {
            let before = cells.len();
            cells.extend(strategies);
            let found = cells.len() - before;
            let expected = *num_cols.get_or_insert(found);
            if found != expected {
                return Err(GridError::RowLengthMismatch {
                    row,
                    expected,
                    found,
                });
            }
            num_rows += 1;
        }
        Self::new(num_rows, num_cols.unwrap_or(0), cells)
    }

    /// Creates a random grid in which each cell defects with probability `defect_ratio`.
    ///
    /// The same seed always produces the same grid.
    ///
    /// ```
    /// use dilemma_engine::{Grid, GridSeed};
    ///
    /// let seed = GridSeed::from_bytes([7; 16]);
    /// let a = Grid::random(20, 30, 0.1, seed).unwrap();
    /// let b = Grid::random(20, 30, 0.1, seed).unwrap();
    /// assert_eq!(a, b);
    /// ```
    pub fn random(
        rows: usize,
        cols: usize,
        defect_ratio: f64,
        seed: GridSeed,
    ) -> Result<Self, GridError> {
        if !(0.0..=1.0).contains(&defect_ratio) {
            return Err(GridError::InvalidRatio {
                ratio: defect_ratio,
            });
        }
        let len = checked_cell_count(rows, cols)?;
        let mut rng = seed.rng();
        let cells = (0..len)
            .map(|_| {
                if rng.random_bool(defect_ratio) {
                    Strategy::Defect
                } else {
                    Strategy::Cooperate
                }
            })
            .collect();
        Ok(Self { rows, cols, cells })
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells (`rows * cols`).
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub const fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub(crate) fn index_of(&self, pos: Position) -> usize {
        assert!(
            self.contains(pos),
            "position ({}, {}) out of range for {}x{} grid",
            pos.row,
            pos.col,
            self.rows,
            self.cols
        );
        pos.row * self.cols + pos.col
    }

    /// Returns the strategy at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    #[must_use]
    pub fn get(&self, pos: Position) -> Strategy {
        self.cells[self.index_of(pos)]
    }

    /// Replaces the strategy at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    pub fn set(&mut self, pos: Position, strategy: Strategy) {
        let index = self.index_of(pos);
        self.cells[index] = strategy;
    }

    /// Row-major view of all strategies.
    #[must_use]
    pub fn strategies(&self) -> &[Strategy] {
        &self.cells
    }

    /// Returns an iterator over the rows of the grid.
    pub fn row_slices(&self) -> impl Iterator<Item = &[Strategy]> {
        self.cells.chunks_exact(self.cols)
    }

    /// Returns every position of the grid in scan order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Position { row, col }))
    }

    /// Counts the cells holding `strategy`.
    #[must_use]
    pub fn count(&self, strategy: Strategy) -> usize {
        self.cells.iter().filter(|s| **s == strategy).count()
    }

    /// Returns the in-bounds members of the 3×3 block centered at `pos`.
    ///
    /// The cell itself is included. Positions outside the grid are dropped
    /// (there is no wraparound), so corners have 4 members, edges 6 and
    /// interior cells 9.
    ///
    /// ```
    /// use dilemma_engine::{Grid, Position, Strategy};
    ///
    /// let grid = Grid::filled(3, 3, Strategy::Cooperate).unwrap();
    /// let corner = grid.neighborhood(Position::new(0, 0));
    /// assert_eq!(
    ///     corner.as_slice(),
    ///     [
    ///         Position::new(0, 0),
    ///         Position::new(0, 1),
    ///         Position::new(1, 0),
    ///         Position::new(1, 1),
    ///     ]
    /// );
    /// ```
    #[must_use]
    pub fn neighborhood(&self, pos: Position) -> Neighborhood {
        debug_assert!(self.contains(pos));
        let rows = pos.row.saturating_sub(1)..=usize::min(pos.row + 1, self.rows - 1);
        let cols = pos.col.saturating_sub(1)..=usize::min(pos.col + 1, self.cols - 1);
        let mut members = Neighborhood::new();
        for row in rows {
            for col in cols.clone() {
                members.push(Position { row, col });
            }
        }
        members
    }
}

impl Index<Position> for Grid {
    type Output = Strategy;

    fn index(&self, pos: Position) -> &Self::Output {
        &self.cells[self.index_of(pos)]
    }
}

fn parse_header(header: &str) -> Option<(usize, usize)> {
    let mut fields = header.split_whitespace();
    let rows = fields.next()?.parse().ok()?;
    let cols = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((rows, cols))
}

impl FromStr for Grid {
    type Err = ParseGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim_end()));

        let (header_line, header) = lines
            .by_ref()
            .find(|(_, line)| !line.is_empty())
            .ok_or(ParseGridError::MissingHeader)?;
        let (rows, cols) = parse_header(header).ok_or_else(|| ParseGridError::InvalidHeader {
            line: header_line,
            header: header.to_owned(),
        })?;
        let len = checked_cell_count(rows, cols)
            .map_err(|_| ParseGridError::InvalidDimension { rows, cols })?;

        // The header is untrusted until the rows are read.
        let mut cells = Vec::with_capacity(len.min(s.len()));
        for row in 0..rows {
            let (_, line) = lines.next().ok_or(ParseGridError::MissingRow { row })?;
            let found = line.chars().count();
            if found != cols {
                return Err(ParseGridError::RowLength {
                    row,
                    expected: cols,
                    found,
                });
            }
            for (col, marker) in line.chars().enumerate() {
                let strategy = Strategy::try_from(marker)
                    .map_err(|source| ParseGridError::InvalidMarker { row, col, source })?;
                cells.push(strategy);
            }
        }

        if let Some((line, _)) = lines.find(|(_, line)| !line.is_empty()) {
            return Err(ParseGridError::TrailingRows { line });
        }

        Ok(Self { rows, cols, cells })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.rows, self.cols)?;
        for row in self.row_slices() {
            for strategy in row {
                write!(f, "{}", strategy.marker())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::strategy::Strategy::{Cooperate as C, Defect as D};

    #[test]
    fn test_new_rejects_bad_dimensions() {
        assert_eq!(
            Grid::new(0, 3, vec![]),
            Err(GridError::Empty { rows: 0, cols: 3 })
        );
        assert_eq!(
            Grid::new(2, 2, vec![C; 3]),
            Err(GridError::CellCountMismatch {
                expected: 4,
                found: 3
            })
        );
        assert_eq!(
            Grid::filled(usize::MAX, 2, C),
            Err(GridError::TooLarge {
                rows: usize::MAX,
                cols: 2
            })
        );
    }

    #[test]
    fn test_from_rows() {
        let grid = Grid::from_rows([[C, D, C], [D, D, C]]).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.strategies(), [C, D, C, D, D, C]);
        assert_eq!(grid.count(D), 3);

        let err = Grid::from_rows([vec![C, D], vec![C]]).unwrap_err();
        assert_eq!(
            err,
            GridError::RowLengthMismatch {
                row: 1,
                expected: 2,
                found: 1
            }
        );

        let err = Grid::from_rows(Vec::<Vec<Strategy>>::new()).unwrap_err();
        assert_eq!(err, GridError::Empty { rows: 0, cols: 0 });
    }

    #[test]
    fn test_get_and_set_are_row_major() {
        let mut grid = Grid::filled(2, 3, C).unwrap();
        grid.set(Position::new(1, 2), D);
        assert_eq!(grid.get(Position::new(1, 2)), D);
        assert_eq!(grid.strategies()[5], D);
        assert_eq!(grid[Position::new(0, 2)], C);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_out_of_range_panics() {
        let grid = Grid::filled(2, 3, C).unwrap();
        let _ = grid.get(Position::new(0, 3));
    }

    #[test]
    fn test_positions_scan_order() {
        let grid = Grid::filled(2, 2, C).unwrap();
        let positions: Vec<_> = grid.positions().collect();
        assert_eq!(
            positions,
            [
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_neighborhood_sizes() {
        let grid = Grid::filled(4, 5, C).unwrap();
        for pos in grid.positions() {
            let on_row_edge = pos.row == 0 || pos.row == grid.rows() - 1;
            let on_col_edge = pos.col == 0 || pos.col == grid.cols() - 1;
            let expected = match (on_row_edge, on_col_edge) {
                (true, true) => 4,
                (true, false) | (false, true) => 6,
                (false, false) => 9,
            };
            assert_eq!(
                grid.neighborhood(pos).len(),
                expected,
                "unexpected neighborhood size at {pos:?}"
            );
        }
    }

    #[test]
    fn test_neighborhood_degenerate_grids() {
        let single = Grid::filled(1, 1, D).unwrap();
        assert_eq!(
            single.neighborhood(Position::new(0, 0)).as_slice(),
            [Position::new(0, 0)]
        );

        let line = Grid::filled(1, 4, D).unwrap();
        assert_eq!(line.neighborhood(Position::new(0, 0)).len(), 2);
        assert_eq!(line.neighborhood(Position::new(0, 2)).len(), 3);

        let column = Grid::filled(3, 1, D).unwrap();
        assert_eq!(column.neighborhood(Position::new(1, 0)).len(), 3);
    }

    #[test]
    fn test_neighborhood_is_in_scan_order_and_includes_self() {
        let grid = Grid::filled(3, 3, C).unwrap();
        let center = Position::new(1, 1);
        let members = grid.neighborhood(center);
        assert_eq!(members.len(), 9);
        assert!(members.contains(&center));
        assert!(members.is_sorted());
        assert_eq!(members[4], center);
    }

    #[test]
    fn test_parse_header_is_rows_then_cols() {
        let grid: Grid = "3 2\nCD\nDC\nCC\n".parse().unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.get(Position::new(2, 1)), C);
        assert_eq!(grid.get(Position::new(1, 0)), D);
    }

    #[test]
    fn test_parse_tolerates_crlf_and_trailing_blank_lines() {
        let grid: Grid = "\n2 2\r\nCD\r\nDD\r\n\n\n".parse().unwrap();
        assert_eq!(grid.strategies(), [C, D, D, D]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Grid>(), Err(ParseGridError::MissingHeader));
        assert_eq!(
            "2\nCC\n".parse::<Grid>(),
            Err(ParseGridError::InvalidHeader {
                line: 1,
                header: "2".to_owned()
            })
        );
        assert_eq!(
            "2 x\nCC\n".parse::<Grid>(),
            Err(ParseGridError::InvalidHeader {
                line: 1,
                header: "2 x".to_owned()
            })
        );
        assert_eq!(
            "0 2\n".parse::<Grid>(),
            Err(ParseGridError::InvalidDimension { rows: 0, cols: 2 })
        );
        assert_eq!(
            "2 2\nCC\n".parse::<Grid>(),
            Err(ParseGridError::MissingRow { row: 1 })
        );
        assert_eq!(
            "2 2\nCC\nC\n".parse::<Grid>(),
            Err(ParseGridError::RowLength {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            "2 2\nCCD\nCC\n".parse::<Grid>(),
            Err(ParseGridError::RowLength {
                row: 0,
                expected: 2,
                found: 3
            })
        );
        assert_eq!(
            "2 2\nCC\nCX\n".parse::<Grid>(),
            Err(ParseGridError::InvalidMarker {
                row: 1,
                col: 1,
                source: InvalidStrategyMarker('X')
            })
        );
        assert_eq!(
            "1 2\nCC\nDD\n".parse::<Grid>(),
            Err(ParseGridError::TrailingRows { line: 3 })
        );
    }

    #[test]
    fn test_parse_huge_header_without_rows() {
        assert_eq!(
            "1000000 1000000\nCC\n".parse::<Grid>(),
            Err(ParseGridError::RowLength {
                row: 0,
                expected: 1_000_000,
                found: 2,
            })
        );
        assert_eq!(
            "1000000 2\nCC\n".parse::<Grid>(),
            Err(ParseGridError::MissingRow { row: 1 })
        );
    }

    #[test]
    fn test_display_matches_text_format() {
        let grid = Grid::from_rows([[C, C, D], [D, C, C]]).unwrap();
        let text = grid.to_string();
        assert_eq!(text, "2 3\nCCD\nDCC\n");
        assert_eq!(text.parse::<Grid>().unwrap(), grid);
    }

    #[test]
    fn test_random_extremes() {
        let seed = GridSeed::from_bytes([1; 16]);
        let all_c = Grid::random(5, 6, 0.0, seed).unwrap();
        assert_eq!(all_c.count(C), 30);
        let all_d = Grid::random(5, 6, 1.0, seed).unwrap();
        assert_eq!(all_d.count(D), 30);
    }

    #[test]
    fn test_random_rejects_invalid_ratio() {
        let seed = GridSeed::from_bytes([0; 16]);
        assert!(matches!(
            Grid::random(2, 2, 1.5, seed),
            Err(GridError::InvalidRatio { .. })
        ));
        assert!(matches!(
            Grid::random(2, 2, f64::NAN, seed),
            Err(GridError::InvalidRatio { .. })
        ));
    }

    #[test]
    fn test_random_depends_on_seed() {
        let a = Grid::random(16, 16, 0.5, GridSeed::from_bytes([1; 16])).unwrap();
        let b = Grid::random(16, 16, 0.5, GridSeed::from_bytes([2; 16])).unwrap();
        assert_ne!(a, b);
    }
}
