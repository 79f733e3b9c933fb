use std::iter::FusedIterator;

use crate::{GenerationStats, Grid, PayoffRule, ScoredGrid, evolve, score_grid};

/// Drives a grid through successive generations.
///
/// Every transition first scores the whole current grid, then builds the
/// next grid from that finished snapshot. Only the current strategies are
/// kept between transitions.
///
/// # Example
///
/// ```
/// use dilemma_engine::{Grid, PayoffRule, Simulation, Strategy};
///
/// let grid: Grid = "3 3\nCCC\nCDC\nCCC\n".parse().unwrap();
/// let mut simulation = Simulation::new(grid, PayoffRule::new(2.0).unwrap());
///
/// let scored = simulation.step();
/// assert_eq!(scored.grid().count(Strategy::Defect), 1);
/// assert_eq!(simulation.generation(), 1);
/// assert_eq!(simulation.grid().count(Strategy::Defect), 9);
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    grid: Grid,
    rule: PayoffRule,
    generation: usize,
}

impl Simulation {
    #[must_use]
    pub fn new(grid: Grid, rule: PayoffRule) -> Self {
        Self {
            grid,
            rule,
            generation: 0,
        }
    }

    /// Strategies of the current generation.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn rule(&self) -> PayoffRule {
        self.rule
    }

    /// Index of the current generation (the initial grid is generation 0).
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Scores the current generation without advancing.
    #[must_use]
    pub fn scored(&self) -> ScoredGrid {
        score_grid(self.grid.clone(), self.rule)
    }

    /// Advances one generation.
    ///
    /// Returns the scored snapshot of the generation that was just replaced.
    pub fn step(&mut self) -> ScoredGrid {
        let scored = self.scored();
        self.grid = evolve(&scored);
        self.generation += 1;
        scored
    }

    /// Consumes the simulation and yields the current generation followed by
    /// `steps` more, in order.
    ///
    /// With `steps == 0` only the current grid is yielded, unchanged.
    ///
    /// ```
    /// use dilemma_engine::{Grid, PayoffRule, Simulation, Strategy};
    ///
    /// let grid = Grid::filled(2, 2, Strategy::Defect).unwrap();
    /// let simulation = Simulation::new(grid.clone(), PayoffRule::new(1.5).unwrap());
    ///
    /// let indices: Vec<_> = simulation.generations(3).map(|g| g.index()).collect();
    /// assert_eq!(indices, [0, 1, 2, 3]);
    /// ```
    #[must_use]
    pub fn generations(self, steps: usize) -> Generations {
        Generations {
            pending: Some(self.grid),
            rule: self.rule,
            index: self.generation,
            last: self.generation.saturating_add(steps),
        }
    }
}

/// One generation produced by [`Generations`].
#[derive(Debug, Clone)]
pub struct Generation {
    index: usize,
    scored: ScoredGrid,
}

impl Generation {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        self.scored.grid()
    }

    /// Strategies of this generation together with their scores.
    #[must_use]
    pub fn scored(&self) -> &ScoredGrid {
        &self.scored
    }

    #[must_use]
    pub fn into_scored(self) -> ScoredGrid {
        self.scored
    }

    #[must_use]
    pub fn stats(&self) -> GenerationStats {
        GenerationStats::from_scored(self.index, &self.scored)
    }
}

/// Iterator over consecutive generations, created by [`Simulation::generations`].
#[derive(Debug, Clone)]
pub struct Generations {
    pending: Option<Grid>,
    rule: PayoffRule,
    index: usize,
    last: usize,
}

impl Iterator for Generations {
    type Item = Generation;

    fn next(&mut self) -> Option<Self::Item> {
        let grid = self.pending.take()?;
        let scored = score_grid(grid, self.rule);
        let index = self.index;
        if index < self.last {
            self.pending = Some(evolve(&scored));
            self.index += 1;
        }
        Some(Generation { index, scored })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.pending.is_some() {
            (self.last - self.index).checked_add(1)
        } else {
            Some(0)
        };
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

impl FusedIterator for Generations {}
