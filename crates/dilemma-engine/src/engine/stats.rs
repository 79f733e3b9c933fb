use serde::{Deserialize, Serialize};

use crate::{ScoredGrid, Strategy};

/// Population and payoff summary of one scored generation.
///
/// # Example
///
/// ```
/// use dilemma_engine::{GenerationStats, Grid, PayoffRule, Strategy, score_grid};
///
/// let grid = Grid::filled(3, 3, Strategy::Cooperate).unwrap();
/// let scored = score_grid(grid, PayoffRule::new(1.5).unwrap());
/// let stats = GenerationStats::from_scored(0, &scored);
///
/// assert_eq!(stats.cooperators, 9);
/// assert_eq!(stats.total_score, 40.0);
/// assert_eq!(stats.max_score, 8.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub cooperators: usize,
    pub defectors: usize,
    /// Fraction of cells cooperating, in `[0, 1]`.
    pub cooperator_ratio: f64,
    pub total_score: f64,
    pub mean_score: f64,
    pub max_score: f64,
}

impl GenerationStats {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_scored(generation: usize, scored: &ScoredGrid) -> Self {
        let grid = scored.grid();
        let cooperators = grid.count(Strategy::Cooperate);
        let defectors = grid.cell_count() - cooperators;
        let n = grid.cell_count() as f64;
        let total_score = scored.scores().iter().sum::<f64>();
        let max_score = scored
            .scores()
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        Self {
            generation,
            cooperators,
            defectors,
            cooperator_ratio: cooperators as f64 / n,
            total_score,
            mean_score: total_score / n,
            max_score,
        }
    }
}
