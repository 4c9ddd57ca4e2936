use std::{io::Write as _, path::PathBuf};

use anyhow::Context as _;
use columns_evaluator::catalog::MoveCatalog;

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CatalogArg {
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CatalogArg) -> anyhow::Result<()> {
    let catalog = MoveCatalog::standard();
    let mut output = Output::to(arg.output.as_deref())?;
    output
        .write_all(catalog.to_lines().as_bytes())
        .and_then(|()| output.flush())
        .with_context(|| format!("Failed to write catalog to {}", output.label()))?;
    tracing::info!(moves = catalog.len(), "catalog written");
    Ok(())
}
