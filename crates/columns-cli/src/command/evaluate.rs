use std::{
    io::Write as _,
    path::{Path, PathBuf},
    thread,
};

use anyhow::{Context as _, bail};
use chrono::Utc;
use columns_evaluator::{codec::INPUT_LEN, network::FeedForwardStrategy};
use columns_training::{
    arena::Arena,
    tournament::{GenerationReport, TrainingSession},
};

use crate::{
    report,
    schema::evaluation::EvaluationReport,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Strategy network JSON files
    strategies: Vec<PathBuf>,
    /// Number of randomly initialized strategies to add
    #[arg(long, default_value_t = 0)]
    random: usize,
    /// Seed of the first random strategy (incremented per strategy)
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Hidden layer sizes of random strategies
    #[arg(long, value_delimiter = ',', default_value = "32")]
    hidden: Vec<usize>,
    /// Arena config JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Catalog file (one move per line)
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Worker threads (defaults to available parallelism)
    #[arg(long)]
    threads: Option<usize>,
    /// Report JSON output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Directory for per-game text logs
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Directory to save the random strategies to
    #[arg(long)]
    save_random: Option<PathBuf>,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let config = util::read_arena_config(arg.config.as_deref())?;
    let catalog = util::read_catalog_file(arg.catalog.as_deref())?;

    let (names, strategies) = load_strategies(arg, catalog.len())?;
    if strategies.len() < 2 {
        bail!(
            "at least two strategies are needed, got {}",
            strategies.len()
        );
    }
    for (name, strategy) in names.iter().zip(&strategies) {
        if strategy.input_len() != INPUT_LEN {
            bail!(
                "strategy {name} takes {} inputs, expected {INPUT_LEN}",
                strategy.input_len()
            );
        }
        if strategy.output_len() != catalog.len() {
            tracing::warn!(
                strategy = %name,
                outputs = strategy.output_len(),
                catalog = catalog.len(),
                "strategy output length differs from catalog length"
            );
        }
    }

    let threads = arg
        .threads
        .or_else(|| thread::available_parallelism().ok().map(Into::into))
        .unwrap_or(1);
    tracing::info!(
        strategies = strategies.len(),
        catalog = catalog.len(),
        threads,
        "evaluating generation"
    );

    let catalog_len = catalog.len();
    let mut session = TrainingSession::new(Arena::new(catalog, config), threads);
    let report = session.evaluate_generation(&strategies)?;

    let mut stdout = Output::stdout();
    report::write_generation_table(&mut stdout, &names, &report)
        .and_then(|()| stdout.flush())
        .context("Failed to write generation report")?;

    if let Some(dir) = &arg.log_dir {
        write_game_logs(dir, &names, &report)?;
    }

    if let Some(path) = &arg.output {
        let saved = EvaluationReport {
            evaluated_at: Utc::now(),
            strategies: &names,
            catalog_len,
            config: session.arena().config(),
            summary: report.summary(),
            report: &report,
        };
        util::save_json(&saved, path)?;
        tracing::info!(path = %path.display(), "report saved");
    }

    session.finish();
    Ok(())
}

fn load_strategies(
    arg: &EvaluateArg,
    catalog_len: usize,
) -> anyhow::Result<(Vec<String>, Vec<FeedForwardStrategy>)> {
    let mut names = vec![];
    let mut strategies = vec![];

    for path in &arg.strategies {
        let strategy = util::read_strategy_file(path)?;
        let name = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
        names.push(name);
        strategies.push(strategy);
    }

    let mut sizes = vec![INPUT_LEN];
    sizes.extend(&arg.hidden);
    sizes.push(catalog_len);
    if sizes.contains(&0) {
        bail!("layer sizes must be positive: {sizes:?}");
    }
    for seed in (arg.seed..).take(arg.random) {
        let strategy = FeedForwardStrategy::seeded(&sizes, seed);
        let name = format!("random-{seed}");
        if let Some(dir) = &arg.save_random {
            util::create_dir(dir)?;
            util::save_json(&strategy, &dir.join(format!("{name}.json")))?;
        }
        names.push(name);
        strategies.push(strategy);
    }

    Ok((names, strategies))
}

fn write_game_logs(
    dir: &Path,
    names: &[String],
    report: &GenerationReport,
) -> anyhow::Result<()> {
    let dir = dir.join(format!("generation_{}", report.generation));
    util::create_dir(&dir)?;
    for game in &report.games {
        let mut output = Output::create(&dir.join(report::game_log_file_name(names, game)))?;
        report::write_game_log(&mut output, report.generation, names, game)
            .and_then(|()| output.flush())
            .with_context(|| format!("Failed to write game log to {}", output.label()))?;
    }
    tracing::info!(games = report.games.len(), dir = %dir.display(), "game logs written");
    Ok(())
}
