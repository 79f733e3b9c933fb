use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use dilemma_engine::{PayoffRule, Simulation};
use dilemma_render::{
    AnimationWriter, DEFAULT_CANVAS_SIZE, DEFAULT_FRAME_DELAY_MS, FrameRenderer, FrameStyle,
    save_png,
};

use crate::{
    schema::summary::RunSummary,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    /// Initial grid in the text format
    input: PathBuf,
    /// Temptation payoff for a defector meeting a cooperator
    b: f64,
    /// Number of generations to advance
    steps: usize,
    /// Image of the final generation
    #[arg(long, default_value = "Prisoners.png")]
    png: PathBuf,
    /// Animation of every generation
    #[arg(long, default_value = "Prisoners.gif")]
    gif: PathBuf,
    /// Skip writing the animation
    #[arg(long)]
    no_gif: bool,
    /// Write per-generation statistics as JSON to this path
    #[arg(long)]
    summary: Option<PathBuf>,
    /// Width and height of the rendered images in pixels
    #[arg(long, default_value_t = DEFAULT_CANVAS_SIZE)]
    canvas_size: u32,
    /// Delay between animation frames
    #[arg(long, default_value_t = DEFAULT_FRAME_DELAY_MS)]
    frame_delay_ms: u32,
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let RunArg {
        input,
        b,
        steps,
        png,
        gif,
        no_gif,
        summary,
        canvas_size,
        frame_delay_ms,
    } = arg;

    let rule = PayoffRule::new(*b).context("Invalid temptation payoff")?;
    let grid = util::read_grid_file(input)?;
    let (rows, cols) = (grid.rows(), grid.cols());
    tracing::info!("Loaded {rows}x{cols} grid from {}", input.display());

    let renderer = FrameRenderer::new(FrameStyle {
        canvas_size: *canvas_size,
        ..FrameStyle::default()
    });
    renderer
        .layout(&grid)
        .context("Grid cannot be rendered at this canvas size")?;

    let mut animation = (!*no_gif)
        .then(|| {
            let file = util::create_file(gif)?;
            AnimationWriter::new(file, *frame_delay_ms).context("Failed to start animation")
        })
        .transpose()?;

    // Statistics are only kept when a summary will be written.
    let mut history = summary.is_some().then(Vec::new);
    let mut last = None;
    for generation in Simulation::new(grid, rule).generations(*steps) {
        let stats = generation.stats();
        tracing::debug!(
            generation = stats.generation,
            cooperators = stats.cooperators,
            defectors = stats.defectors,
            total_score = stats.total_score,
            "Scored generation"
        );
        if let Some(animation) = &mut animation {
            let frame = renderer.render(generation.grid())?;
            animation
                .push_frame(&frame)
                .with_context(|| format!("Failed to write frame {}", stats.generation))?;
        }
        if stats.generation > 0 && stats.generation.is_multiple_of(10) {
            tracing::info!("Finished generation {}/{steps}", stats.generation);
        }
        if let Some(history) = &mut history {
            history.push(stats.clone());
        }
        last = Some((stats, generation.into_scored().into_grid()));
    }

    if let Some(animation) = animation {
        let frames = animation
            .finish()
            .with_context(|| format!("Failed to write animation: {}", gif.display()))?;
        tracing::info!("Wrote {frames} frames to {}", gif.display());
    }

    let (last_stats, last_grid) = last.context("Simulation produced no generations")?;
    let frame = renderer.render(&last_grid)?;
    save_png(&frame, png).with_context(|| format!("Failed to write image: {}", png.display()))?;
    tracing::info!("Wrote final generation to {}", png.display());
    tracing::info!(
        cooperators = last_stats.cooperators,
        defectors = last_stats.defectors,
        "Generation {} reached",
        last_stats.generation
    );

    if let (Some(path), Some(generations)) = (summary, history) {
        let run_summary = RunSummary {
            generated_at: Utc::now(),
            input: input.clone(),
            temptation: *b,
            steps: *steps,
            rows,
            cols,
            generations,
        };
        Output::save_json(&run_summary, Some(path.clone()))?;
        tracing::info!("Wrote run summary to {}", path.display());
    }

    Ok(())
}
