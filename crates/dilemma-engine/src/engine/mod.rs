//! Generation logic for the spatial prisoner's dilemma.
//!
//! This module builds on the [`Grid`](crate::Grid) data model:
//!
//! - [`PayoffRule`] - Pairwise payoff table parameterized by the temptation `b`
//! - [`score_cell`] / [`score_grid`] - Neighborhood payoffs for one generation
//! - [`ScoredGrid`] - Immutable snapshot of strategies and their scores
//! - [`next_strategy`] / [`evolve`] - Imitate-the-best update rule
//! - [`Simulation`] / [`Generations`] - Generation driver
//! - [`GenerationStats`] - Summary of a scored generation
//!
//! # Generation Flow
//!
//! Each transition runs two phases that never interleave:
//!
//! 1. Score every cell of generation N, producing a complete [`ScoredGrid`]
//! 2. Build generation N+1 by letting every cell copy the best-scoring member
//!    of its neighborhood in that snapshot
//!
//! # Example
//!
//! ```
//! use dilemma_engine::{Grid, PayoffRule, Position, Simulation, Strategy};
//!
//! let mut grid = Grid::filled(3, 3, Strategy::Cooperate).unwrap();
//! grid.set(Position::new(1, 1), Strategy::Defect);
//!
//! let rule = PayoffRule::new(2.0).unwrap();
//! let generations: Vec<_> = Simulation::new(grid, rule).generations(1).collect();
//!
//! assert_eq!(generations.len(), 2);
//! assert_eq!(generations[0].scored().score(Position::new(1, 1)), 16.0);
//! assert_eq!(generations[1].grid().count(Strategy::Defect), 9);
//! ```

pub use self::{evolver::*, payoff::*, scorer::*, simulation::*, stats::*};

mod evolver;
mod payoff;
mod scorer;
mod simulation;
mod stats;
