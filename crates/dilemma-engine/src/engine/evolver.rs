use crate::{Grid, Position, ScoredGrid, Strategy};

/// Starting value of the running maximum in the best-neighbor search.
///
/// A member only becomes a candidate once its score reaches this value.
/// Scores produced by [`score_grid`](crate::score_grid) are never negative, so
/// in practice the first member in scan order is always a candidate and a
/// neighborhood where every score is zero copies its first member.
pub const INITIAL_BEST_SCORE: f64 = 0.0;

/// Returns the strategy the cell at `pos` adopts in the next generation.
///
/// The neighborhood (the cell included) is scanned in row-major order. The
/// first member scoring at least [`INITIAL_BEST_SCORE`] becomes the running
/// best, and only strictly higher scores replace it afterwards, so ties go to
/// the member met first. If no member reaches [`INITIAL_BEST_SCORE`], the cell
/// keeps its own strategy.
///
/// `pos` must be inside the grid.
///
/// ```
/// use dilemma_engine::{Grid, PayoffRule, Position, Strategy, next_strategy, score_grid};
///
/// let mut grid = Grid::filled(3, 3, Strategy::Cooperate).unwrap();
/// grid.set(Position::new(1, 1), Strategy::Defect);
/// let scored = score_grid(grid, PayoffRule::new(2.0).unwrap());
///
/// assert_eq!(next_strategy(&scored, Position::new(0, 0)), Strategy::Defect);
/// ```
#[must_use]
pub fn next_strategy(scored: &ScoredGrid, pos: Position) -> Strategy {
    let grid = scored.grid();
    let mut best: Option<(f64, Position)> = None;
    for member in grid.neighborhood(pos) {
        let score = scored.score(member);
        let replaces = match best {
            None => score >= INITIAL_BEST_SCORE,
            Some((best_score, _)) => score > best_score,
        };
        if replaces {
            best = Some((score, member));
        }
    }
    let winner = best.map_or(pos, |(_, member)| member);
    grid.get(winner)
}

/// Builds the next generation from a fully scored snapshot.
///
/// The snapshot is only read; the result is a fresh grid of the same size.
#[must_use]
pub fn evolve(scored: &ScoredGrid) -> Grid {
    let mut next = scored.grid().clone();
    for pos in scored.grid().positions() {
        next.set(pos, next_strategy(scored, pos));
    }
    next
}
