use std::path::PathBuf;

use anyhow::Context as _;
use dilemma_engine::{Grid, GridSeed, Strategy};
use rand::Rng as _;

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateArg {
    /// Number of rows
    #[arg(long)]
    rows: usize,
    /// Number of columns
    #[arg(long)]
    cols: usize,
    /// Probability that a cell starts as a defector
    #[arg(long, default_value_t = 0.1)]
    defect_ratio: f64,
    /// Hex seed to reproduce an earlier grid (random when omitted)
    #[arg(long)]
    seed: Option<GridSeed>,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateArg) -> anyhow::Result<()> {
    let GenerateArg {
        rows,
        cols,
        defect_ratio,
        seed,
        output,
    } = arg;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let grid = Grid::random(*rows, *cols, *defect_ratio, seed)
        .with_context(|| format!("Failed to generate a {rows}x{cols} grid"))?;

    let mut output = Output::from_output_path(output.clone())?;
    output.write_text(&grid.to_string())?;
    tracing::info!(
        %seed,
        defectors = grid.count(Strategy::Defect),
        "Wrote {rows}x{cols} grid to {}",
        output.display_path()
    );
    Ok(())
}
