use std::{fmt::Write as _, path::PathBuf};

use anyhow::Context as _;
use dilemma_engine::{GenerationStats, PayoffRule, ScoredGrid, score_grid};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoreArg {
    /// Grid file in the text format
    input: PathBuf,
    /// Temptation payoff for a defector meeting a cooperator
    b: f64,
    /// Digits printed after the decimal point
    #[arg(long, default_value_t = 2)]
    precision: usize,
}

pub(crate) fn run(arg: &ScoreArg) -> anyhow::Result<()> {
    let ScoreArg {
        input,
        b,
        precision,
    } = arg;

    let rule = PayoffRule::new(*b).context("Invalid temptation payoff")?;
    let grid = util::read_grid_file(input)?;
    let scored = score_grid(grid, rule);

    let stats = GenerationStats::from_scored(0, &scored);
    tracing::info!(
        cooperators = stats.cooperators,
        defectors = stats.defectors,
        total_score = stats.total_score,
        max_score = stats.max_score,
        "Scored {}",
        input.display()
    );

    Output::stdout().write_text(&format_score_table(&scored, *precision))
}

/// One line per grid row, each score tagged with the cell's strategy marker.
fn format_score_table(scored: &ScoredGrid, precision: usize) -> String {
    let width = scored
        .scores()
        .iter()
        .map(|score| format!("{score:.precision$}").len())
        .max()
        .unwrap_or(0);

    let mut table = String::new();
    for (strategies, scores) in scored.grid().row_slices().zip(scored.score_rows()) {
        let cells: Vec<_> = strategies
            .iter()
            .zip(scores)
            .map(|(strategy, score)| format!("{strategy}{score:>width$.precision$}"))
            .collect();
        let _ = writeln!(table, "{}", cells.join(" "));
    }
    table
}
