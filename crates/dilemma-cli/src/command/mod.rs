use clap::{Parser, Subcommand};

use self::{generate::GenerateArg, run::RunArg, score::ScoreArg};

mod generate;
mod run;
mod score;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve a grid for a number of generations and render the result
    Run(#[clap(flatten)] RunArg),
    /// Write a random grid in the text format
    Generate(#[clap(flatten)] GenerateArg),
    /// Print the scores of a grid's first generation
    Score(#[clap(flatten)] ScoreArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Run(arg) => run::run(&arg)?,
        Mode::Generate(arg) => generate::run(&arg)?,
        Mode::Score(arg) => score::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_generate_requires_dimensions() {
        assert!(CommandArgs::try_parse_from(["dilemma", "generate", "--rows", "3"]).is_err());
    }
}
