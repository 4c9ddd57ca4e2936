use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context as _;
use columns_engine::{GameState, Player};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ApplyArg {
    /// Move script, one move per line (stdin if omitted)
    script: Option<PathBuf>,
}

/// Result of applying a script: how many lines were accepted and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScriptSummary {
    accepted: usize,
    rejected: usize,
}

pub(crate) fn run(arg: &ApplyArg) -> anyhow::Result<()> {
    let script = util::read_text_input(arg.script.as_deref())?;
    let mut game = GameState::new();
    let mut stdout = Output::stdout();

    let summary =
        apply_script(&mut stdout, &mut game, &script).context("Failed to write to stdout")?;
    write_final_state(&mut stdout, &game).context("Failed to write to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;
    tracing::info!(
        accepted = summary.accepted,
        rejected = summary.rejected,
        "script applied"
    );
    Ok(())
}

/// Applies each non-empty line for the side to move. The turn passes only
/// when a move is accepted. Lines starting with `#` are comments.
fn apply_script<W>(out: &mut W, game: &mut GameState, script: &str) -> io::Result<ScriptSummary>
where
    W: Write + ?Sized,
{
    let mut summary = ScriptSummary {
        accepted: 0,
        rejected: 0,
    };
    for (i, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let player = game.current_player();
        match game.apply_str(line) {
            Ok(mv) => {
                writeln!(out, "{:>3}: {player} plays {mv}", i + 1)?;
                game.end_turn();
                summary.accepted += 1;
            }
            Err(err) => {
                writeln!(out, "{:>3}: {player} '{line}' rejected: {err}", i + 1)?;
                summary.rejected += 1;
            }
        }
    }
    Ok(summary)
}

fn write_final_state<W>(out: &mut W, game: &GameState) -> io::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(out)?;
    write!(out, "{}", game.board())?;
    writeln!(out)?;
    for player in Player::ALL {
        let name = player.to_string();
        let [roundels, singles, doubles, triples] = game.inventory(player).counts();
        writeln!(
            out,
            "{name:<5}  score {}  roundels {roundels}  blockers {singles}/{doubles}/{triples}",
            game.score(player)
        )?;
    }
    writeln!(out, "{} to move", game.current_player())?;
    Ok(())
}
