use crate::{Grid, PayoffRule, Position};

/// Computes the payoff of the cell at `pos` for the current strategies.
///
/// The cell plays against every member of its clipped neighborhood, itself
/// included, and the payoffs are summed in scan order. Cooperators then lose
/// [`COOPERATOR_SELF_CORRECTION`](crate::COOPERATOR_SELF_CORRECTION).
///
/// `pos` must be inside the grid.
///
/// ```
/// use dilemma_engine::{Grid, PayoffRule, Position, Strategy, score_cell};
///
/// let grid = Grid::filled(3, 3, Strategy::Cooperate).unwrap();
/// let rule = PayoffRule::new(1.5).unwrap();
/// assert_eq!(score_cell(&grid, Position::new(1, 1), rule), 8.0);
/// assert_eq!(score_cell(&grid, Position::new(0, 0), rule), 3.0);
/// ```
#[must_use]
pub fn score_cell(grid: &Grid, pos: Position, rule: PayoffRule) -> f64 {
    let me = grid.get(pos);
    let total = grid
        .neighborhood(pos)
        .into_iter()
        .map(|other| rule.contribution(me, grid.get(other)))
        .sum::<f64>();
    total - PayoffRule::self_correction(me)
}

/// Scores every cell of `grid` and returns the resulting snapshot.
#[must_use]
pub fn score_grid(grid: Grid, rule: PayoffRule) -> ScoredGrid {
    let scores = grid
        .positions()
        .map(|pos| score_cell(&grid, pos, rule))
        .collect();
    ScoredGrid { grid, scores }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("score layer has {found} entries, expected {expected}")]
pub struct ScoreLayerMismatch {
    expected: usize,
    found: usize,
}

/// A generation's strategies together with the score of every cell.
///
/// Scores belong to exactly this set of strategies; the snapshot cannot be
/// mutated, so it is never read with stale scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredGrid {
    grid: Grid,
    scores: Vec<f64>,
}

impl ScoredGrid {
    /// Pairs a grid with an externally computed row-major score layer.
    pub fn with_scores(grid: Grid, scores: Vec<f64>) -> Result<Self, ScoreLayerMismatch> {
        if scores.len() != grid.cell_count() {
            return Err(ScoreLayerMismatch {
                expected: grid.cell_count(),
                found: scores.len(),
            });
        }
        Ok(Self { grid, scores })
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Returns the score of the cell at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    #[must_use]
    pub fn score(&self, pos: Position) -> f64 {
        self.scores[self.grid.index_of(pos)]
    }

    /// Row-major view of all scores.
    #[must_use]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Returns an iterator over the rows of the score layer.
    pub fn score_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.scores.chunks_exact(self.grid.cols())
    }
}
