//! Plain-text generation tables and per-game logs.

use std::io::{self, Write};

use columns_engine::Player;
use columns_training::{
    arena::PlyRecord,
    tournament::{GameReport, GenerationReport},
};

const NAME_WIDTH: usize = 20;

pub fn write_generation_table<W>(
    out: &mut W,
    names: &[String],
    report: &GenerationReport,
) -> io::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(out, "GENERATION {}", report.generation)?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<NAME_WIDTH$} | {:>8} | {:>7} | {:>4} | {:>5} | {:>6}",
        "Strategy", "Fitness", "Invalid", "Wins", "Draws", "Losses"
    )?;
    writeln!(out, "{}", "-".repeat(NAME_WIDTH + 47))?;
    for stats in &report.stats {
        writeln!(
            out,
            "{:<NAME_WIDTH$} | {:>8.3} | {:>7} | {:>4} | {:>5} | {:>6}",
            names[stats.id], stats.fitness, stats.invalid_moves, stats.wins, stats.draws, stats.losses
        )?;
    }
    if let Some(summary) = report.summary() {
        writeln!(out)?;
        writeln!(
            out,
            "Fitness: best {:.3}, mean {:.3}, worst {:.3}",
            summary.best, summary.mean, summary.worst
        )?;
    }
    let [light, dark, draws] = report.outcome_counts();
    writeln!(
        out,
        "Games: {} (Light won {light}, Dark won {dark}, drawn {draws})",
        report.games.len()
    )?;
    Ok(())
}

/// File name of a game log, e.g. `g3 (alpha,beta).txt`.
pub fn game_log_file_name(names: &[String], game: &GameReport) -> String {
    format!(
        "g{} ({},{}).txt",
        game.pairing.game, names[game.pairing.light], names[game.pairing.dark]
    )
}

pub fn write_game_log<W>(
    out: &mut W,
    generation: usize,
    names: &[String],
    game: &GameReport,
) -> io::Result<()>
where
    W: Write + ?Sized,
{
    let light = &names[game.pairing.light];
    let dark = &names[game.pairing.dark];
    let record = &game.record;

    writeln!(out, "GENERATION {generation}")?;
    writeln!(out, "GAME {} - {light} vs {dark}", game.pairing.game)?;
    writeln!(out)?;
    for ply in &record.plies {
        write_ply(out, ply)?;
    }
    writeln!(out)?;
    writeln!(out, "Game Over. {} ({}).", record.outcome, record.termination)?;
    for (player, name) in [(Player::Light, light), (Player::Dark, dark)] {
        let idx = player.index();
        writeln!(
            out,
            "\t {player}: {name} ({:.3}), score {}, invalid {}.",
            record.fitness[idx], record.scores[idx], record.invalid_moves[idx]
        )?;
    }
    writeln!(out)?;
    write!(out, "{}", record.final_state.board())?;
    writeln!(out)?;
    Ok(())
}

fn write_ply<W>(out: &mut W, ply: &PlyRecord) -> io::Result<()>
where
    W: Write + ?Sized,
{
    write!(
        out,
        "Ply {} ({}, {}): {}",
        ply.ply + 1,
        u8::from(ply.was_rejected()),
        ply.repair_attempts,
        ply.resolution
    )?;
    if let Some(rejection) = &ply.rejection {
        match &ply.proposed {
            Some(proposed) => write!(out, "  [{proposed} rejected: {rejection}]")?,
            None => write!(out, "  [rejected: {rejection}]")?,
        }
    }
    writeln!(out)
}
