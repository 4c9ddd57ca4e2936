use clap::{Parser, Subcommand};

use self::{apply::ApplyArg, catalog::CatalogArg, evaluate::EvaluateArg};

mod apply;
mod catalog;
mod evaluate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play one generation's round robin and report fitness
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Apply a move script to a fresh game and show the result
    Apply(#[clap(flatten)] ApplyArg),
    /// Write the standard move catalog in the catalog file format
    Catalog(#[clap(flatten)] CatalogArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Apply(arg) => apply::run(&arg)?,
        Mode::Catalog(arg) => catalog::run(&arg)?,
    }
    Ok(())
}
