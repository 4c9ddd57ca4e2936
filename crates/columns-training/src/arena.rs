//! Self-play of a single game between two strategies.
//!
//! # Ply Loop
//!
//! Each ply the arena encodes the state, asks the side to move for an output
//! vector, decodes it to a catalog move and applies it:
//!
//! 1. **Accepted** - the player earns [`ArenaConfig::accepted_reward`]
//! 2. **Rejected** (illegal or undecodable) - the player loses
//!    [`ArenaConfig::rejected_penalty`] and a [`RepairScan`] walks the catalog
//!    outward from the selected position. Each further rejected candidate
//!    costs [`ArenaConfig::repair_penalty`]. The first accepted candidate is
//!    played; if none is accepted the ply is a pass.
//!
//! The turn passes after every ply, played or passed.
//!
//! # Termination
//!
//! Checked in this order:
//!
//! - the ply cap ([`ArenaConfig::max_plies`]) is reached
//! - the side to move has no pieces left at all
//! - two passes in a row, by either player
//!
//! The higher score wins; equal scores draw. Outcome bonuses are added to the
//! per-ply fitness deltas.
//!
//! # Errors
//!
//! Rejections are part of play and never abort a game. A failing strategy
//! does: [`ArenaError::Strategy`] is returned and the game is discarded.

use std::cmp::Ordering;

use columns_engine::{GameState, Move, Player, RuleViolation};
use columns_evaluator::{
    catalog::MoveCatalog,
    codec::{self, DecodeError},
    strategy::{Strategy, StrategyError},
};
use serde::{Deserialize, Serialize};

use crate::repair::RepairScan;

/// Fitness shaping and game length limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Plies after which the game is stopped.
    pub max_plies: usize,
    /// Added when the first proposed move is accepted.
    pub accepted_reward: f32,
    /// Subtracted when the first proposed move is rejected.
    pub rejected_penalty: f32,
    /// Subtracted for every rejected repair candidate.
    pub repair_penalty: f32,
    pub win_bonus: f32,
    pub draw_bonus: f32,
    pub loss_bonus: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            max_plies: 100,
            accepted_reward: 0.10,
            rejected_penalty: 0.10,
            repair_penalty: 0.001,
            win_bonus: 1.0,
            draw_bonus: 0.5,
            loss_bonus: 0.0,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
pub enum Outcome {
    #[display("Light Won")]
    LightWon,
    #[display("Dark Won")]
    DarkWon,
    #[display("Draw")]
    Draw,
}

impl Outcome {
    /// Compares final scores given as `[light, dark]`.
    #[must_use]
    pub fn from_scores(scores: [u8; Player::LEN]) -> Self {
        let [light, dark] = scores;
        match light.cmp(&dark) {
            Ordering::Greater => Self::LightWon,
            Ordering::Less => Self::DarkWon,
            Ordering::Equal => Self::Draw,
        }
    }

    #[must_use]
    pub fn winner(self) -> Option<Player> {
        match self {
            Self::LightWon => Some(Player::Light),
            Self::DarkWon => Some(Player::Dark),
            Self::Draw => None,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
pub enum Termination {
    #[display("both players passed in a row")]
    MutualPass,
    #[display("{player} has no pieces left")]
    InventoryExhausted { player: Player },
    #[display("ply limit reached")]
    PlyCap,
}

/// Why the proposed move of a ply was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum Rejection {
    /// The output did not decode to a catalog move.
    #[display("{_0}")]
    Parse(DecodeError),
    /// The decoded move is illegal in the position.
    #[display("{_0}")]
    Rule(RuleViolation),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::Display, derive_more::IsVariant)]
pub enum PlyResolution {
    #[display("{_0}")]
    Played(Move),
    #[display("Pass")]
    Pass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlyRecord {
    /// Zero-based ply number.
    pub ply: usize,
    pub player: Player,
    /// Move decoded from the strategy output, if any.
    pub proposed: Option<Move>,
    pub rejection: Option<Rejection>,
    /// Repair candidates tried, including the accepted one.
    pub repair_attempts: usize,
    pub resolution: PlyResolution,
}

impl PlyRecord {
    #[must_use]
    pub fn was_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}

/// Immutable account of a finished game.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub plies: Vec<PlyRecord>,
    pub outcome: Outcome,
    pub termination: Termination,
    /// `[light, dark]`.
    pub scores: [u8; Player::LEN],
    /// `[light, dark]`, including outcome bonuses.
    pub fitness: [f32; Player::LEN],
    /// `[light, dark]`.
    pub invalid_moves: [usize; Player::LEN],
    #[serde(skip)]
    pub final_state: GameState,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ArenaError {
    #[display("{player} strategy failed at ply {ply}: {source}")]
    Strategy {
        player: Player,
        ply: usize,
        source: StrategyError,
    },
}

/// Plays games under a fixed catalog and config.
#[derive(Debug, Clone)]
pub struct Arena {
    catalog: MoveCatalog,
    config: ArenaConfig,
}

impl Arena {
    #[must_use]
    pub fn new(catalog: MoveCatalog, config: ArenaConfig) -> Self {
        Self { catalog, config }
    }

    #[must_use]
    pub fn catalog(&self) -> &MoveCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Plays a game from the initial position. `light` moves first.
    pub fn play<L, D>(&self, light: &L, dark: &D) -> Result<GameRecord, ArenaError>
    where
        L: Strategy + ?Sized,
        D: Strategy + ?Sized,
    {
        self.play_from(GameState::new(), light, dark)
    }

    /// Plays a game to completion from an arbitrary position.
    pub fn play_from<L, D>(
        &self,
        mut game: GameState,
        light: &L,
        dark: &D,
    ) -> Result<GameRecord, ArenaError>
    where
        L: Strategy + ?Sized,
        D: Strategy + ?Sized,
    {
        let strategies: [&dyn Strategy; Player::LEN] = [&light, &dark];
        let mut fitness = [0.0; Player::LEN];
        let mut invalid_moves = [0; Player::LEN];
        let mut plies = vec![];
        let mut last_passed = false;

        let termination = loop {
            if plies.len() >= self.config.max_plies {
                break Termination::PlyCap;
            }
            let player = game.current_player();
            if game.inventory(player).is_exhausted() {
                break Termination::InventoryExhausted { player };
            }

            let record = self.play_ply(&mut game, plies.len(), strategies[player.index()])?;
            let idx = player.index();
            match (&record.rejection, &record.resolution) {
                (None, _) => fitness[idx] += self.config.accepted_reward,
                (Some(_), resolution) => {
                    invalid_moves[idx] += 1;
                    fitness[idx] -= self.config.rejected_penalty;
                    #[expect(clippy::cast_precision_loss)]
                    let repair_rejections = match resolution {
                        PlyResolution::Played(_) => record.repair_attempts - 1,
                        PlyResolution::Pass => record.repair_attempts,
                    } as f32;
                    fitness[idx] -= self.config.repair_penalty * repair_rejections;
                }
            }
            tracing::trace!(
                ply = record.ply,
                %player,
                proposed = ?record.proposed.as_ref().map(ToString::to_string),
                rejection = ?record.rejection.map(|r| r.to_string()),
                repair_attempts = record.repair_attempts,
                resolution = %record.resolution,
                "ply resolved"
            );

            let passed = record.resolution.is_pass();
            plies.push(record);
            if passed && last_passed {
                break Termination::MutualPass;
            }
            last_passed = passed;
            game.end_turn();
        };

        let scores = game.scores();
        let outcome = Outcome::from_scores(scores);
        for player in Player::ALL {
            fitness[player.index()] += match outcome.winner() {
                None => self.config.draw_bonus,
                Some(winner) if winner == player => self.config.win_bonus,
                Some(_) => self.config.loss_bonus,
            };
        }

        Ok(GameRecord {
            plies,
            outcome,
            termination,
            scores,
            fitness,
            invalid_moves,
            final_state: game,
        })
    }

    fn play_ply(
        &self,
        game: &mut GameState,
        ply: usize,
        strategy: &dyn Strategy,
    ) -> Result<PlyRecord, ArenaError> {
        let player = game.current_player();
        let input = codec::encode_state(game);
        let output = strategy
            .activate(&input)
            .map_err(|source| ArenaError::Strategy {
                player,
                ply,
                source,
            })?;

        let len = self.catalog.len();
        let (proposed, rejection, scan) = match codec::decode_output(&output, &self.catalog) {
            Ok((position, mv)) => match game.apply(mv) {
                Ok(()) => {
                    return Ok(PlyRecord {
                        ply,
                        player,
                        proposed: Some(mv.clone()),
                        rejection: None,
                        repair_attempts: 0,
                        resolution: PlyResolution::Played(mv.clone()),
                    });
                }
                Err(violation) => (
                    Some(mv.clone()),
                    Rejection::Rule(violation),
                    RepairScan::around(position, len),
                ),
            },
            Err(err @ DecodeError::OutOfCatalog { position, .. }) => {
                (None, Rejection::Parse(err), RepairScan::around(position, len))
            }
            Err(err @ DecodeError::NoSelection) => {
                (None, Rejection::Parse(err), RepairScan::from_start(len))
            }
        };

        let mut repair_attempts = 0;
        let mut resolution = PlyResolution::Pass;
        for mv in scan.filter_map(|position| self.catalog.get(position)) {
            repair_attempts += 1;
            if game.apply(mv).is_ok() {
                resolution = PlyResolution::Played(mv.clone());
                break;
            }
        }

        Ok(PlyRecord {
            ply,
            player,
            proposed,
            rejection: Some(rejection),
            repair_attempts,
            resolution,
        })
    }
}

#[cfg(test)]
mod tests {
    use columns_engine::Inventory;

    use super::*;

    /// Always puts all weight on one catalog position.
    #[derive(Debug)]
    struct Prefer(usize);

    impl Strategy for Prefer {
        fn activate(&self, _input: &[f32]) -> Result<Vec<f32>, StrategyError> {
            let mut output = vec![0.0; self.0 + 1];
            output[self.0] = 1.0;
            Ok(output)
        }
    }

    /// Produces no output at all.
    #[derive(Debug)]
    struct Silent;

    impl Strategy for Silent {
        fn activate(&self, _input: &[f32]) -> Result<Vec<f32>, StrategyError> {
            Ok(vec![])
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl Strategy for Broken {
        fn activate(&self, _input: &[f32]) -> Result<Vec<f32>, StrategyError> {
            Err(StrategyError::Failed {
                message: "no network".to_owned(),
            })
        }
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    fn one_move_arena() -> Arena {
        let catalog = MoveCatalog::from_lines("r, 1\n").unwrap();
        Arena::new(catalog, ArenaConfig::default())
    }

    #[test]
    fn test_mutual_pass_ends_game() {
        // both players can only stack roundels on column 0
        let record = one_move_arena().play(&Prefer(0), &Prefer(0)).unwrap();

        assert_eq!(record.termination, Termination::MutualPass);
        assert_eq!(record.plies.len(), 7);
        // Light placed the fifth roundel
        assert_eq!(record.scores, [1, 0]);
        assert_eq!(record.outcome, Outcome::LightWon);
        assert_eq!(record.invalid_moves, [1, 1]);

        let last_two = &record.plies[5..];
        for ply in last_two {
            assert_eq!(ply.resolution, PlyResolution::Pass);
            assert_eq!(
                ply.rejection,
                Some(Rejection::Rule(RuleViolation::ColumnFull { column: 0 }))
            );
            assert_eq!(ply.repair_attempts, 0);
        }
        assert_eq!(last_two[0].player, Player::Dark);
        assert_eq!(last_two[1].player, Player::Light);

        assert_close(record.fitness[0], 3.0 * 0.1 - 0.1 + 1.0);
        assert_close(record.fitness[1], 2.0 * 0.1 - 0.1);
    }

    #[test]
    fn test_mutual_pass_after_exhausted_repair() {
        let catalog = MoveCatalog::from_lines("r, 1\nr, 2\nr, 3\nr, 4\n").unwrap();
        let arena = Arena::new(catalog, ArenaConfig::default());
        // only a triple blocker left, which no catalog entry uses
        let pieces = Inventory::new(0, 0, 0, 1);
        let game = GameState::with_inventories(pieces, pieces);
        let record = arena.play_from(game, &Prefer(1), &Prefer(1)).unwrap();

        assert_eq!(record.termination, Termination::MutualPass);
        assert_eq!(record.plies.len(), 2);
        for (ply, player) in record.plies.iter().zip(Player::ALL) {
            assert_eq!(ply.player, player);
            assert_eq!(ply.proposed, Some("r, 2".parse().unwrap()));
            assert_eq!(
                ply.rejection,
                Some(Rejection::Rule(RuleViolation::OutOfRoundels { player }))
            );
            assert_eq!(ply.repair_attempts, 3);
            assert_eq!(ply.resolution, PlyResolution::Pass);
        }
        assert_eq!(record.invalid_moves, [1, 1]);
        assert_eq!(record.outcome, Outcome::Draw);
        for fitness in record.fitness {
            assert_close(fitness, -0.1 - 3.0 * 0.001 + 0.5);
        }
    }

    #[test]
    fn test_ply_cap() {
        let config = ArenaConfig {
            max_plies: 4,
            ..ArenaConfig::default()
        };
        let arena = Arena::new(MoveCatalog::standard(), config);
        let record = arena.play(&Prefer(0), &Prefer(1)).unwrap();

        assert_eq!(record.termination, Termination::PlyCap);
        assert_eq!(record.plies.len(), 4);
        assert_eq!(record.outcome, Outcome::Draw);
        assert_close(record.fitness[0], 0.2 + 0.5);
        assert_close(record.fitness[1], 0.2 + 0.5);
        assert_eq!(record.final_state.board().column(0).size(), 2);
        assert_eq!(record.final_state.board().column(1).size(), 2);
    }

    #[test]
    fn test_exhausted_inventory_ends_game_before_ply() {
        let arena = Arena::new(MoveCatalog::standard(), ArenaConfig::default());
        let game = GameState::with_inventories(Inventory::INITIAL, Inventory::EMPTY);
        let record = arena.play_from(game, &Prefer(0), &Prefer(0)).unwrap();

        assert_eq!(
            record.termination,
            Termination::InventoryExhausted {
                player: Player::Dark
            }
        );
        assert_eq!(record.plies.len(), 1);
    }

    #[test]
    fn test_repair_scans_outward_until_accepted() {
        let config = ArenaConfig {
            max_plies: 1,
            ..ArenaConfig::default()
        };
        let arena = Arena::new(MoveCatalog::standard(), config);
        // Light has no roundels, so positions 0..12 are all refused
        let game = GameState::with_inventories(Inventory::new(0, 3, 3, 3), Inventory::INITIAL);
        let record = arena.play_from(game, &Prefer(0), &Prefer(0)).unwrap();

        let ply = &record.plies[0];
        assert_eq!(ply.proposed, Some("r, 1".parse().unwrap()));
        assert_eq!(
            ply.rejection,
            Some(Rejection::Rule(RuleViolation::OutOfRoundels {
                player: Player::Light
            }))
        );
        assert_eq!(ply.repair_attempts, 12);
        assert_eq!(ply.resolution, PlyResolution::Played("b, 1".parse().unwrap()));
        assert_eq!(record.invalid_moves, [1, 0]);
        assert_close(record.fitness[0], -0.1 - 11.0 * 0.001 + 0.5);
    }

    #[test]
    fn test_empty_output_scans_from_first_position() {
        let arena = Arena::new(
            MoveCatalog::standard(),
            ArenaConfig {
                max_plies: 1,
                ..ArenaConfig::default()
            },
        );
        let record = arena.play(&Silent, &Silent).unwrap();

        let ply = &record.plies[0];
        assert_eq!(ply.proposed, None);
        assert_eq!(ply.rejection, Some(Rejection::Parse(DecodeError::NoSelection)));
        assert_eq!(ply.repair_attempts, 1);
        assert_eq!(ply.resolution, PlyResolution::Played("r, 1".parse().unwrap()));
        assert!(ply.was_rejected());
    }

    #[test]
    fn test_out_of_catalog_selection_is_repaired() {
        let config = ArenaConfig {
            max_plies: 1,
            ..ArenaConfig::default()
        };
        let arena = Arena::new(one_move_arena().catalog().clone(), config);
        let record = arena.play(&Prefer(3), &Prefer(3)).unwrap();

        let ply = &record.plies[0];
        assert_eq!(
            ply.rejection,
            Some(Rejection::Parse(DecodeError::OutOfCatalog {
                position: 3,
                len: 1
            }))
        );
        assert_eq!(ply.repair_attempts, 1);
        assert_eq!(ply.resolution, PlyResolution::Played("r, 1".parse().unwrap()));
    }

    #[test]
    fn test_strategy_failure_aborts_game() {
        let arena = Arena::new(MoveCatalog::standard(), ArenaConfig::default());
        let err = arena.play(&Prefer(0), &Broken).unwrap_err();
        assert!(matches!(
            err,
            ArenaError::Strategy {
                player: Player::Dark,
                ply: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_outcome_from_scores() {
        assert_eq!(Outcome::from_scores([2, 1]), Outcome::LightWon);
        assert_eq!(Outcome::from_scores([0, 3]), Outcome::DarkWon);
        assert_eq!(Outcome::from_scores([4, 4]), Outcome::Draw);
        assert_eq!(Outcome::Draw.winner(), None);
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: ArenaConfig = serde_json::from_str(r#"{"max_plies": 10}"#).unwrap();
        assert_eq!(config.max_plies, 10);
        assert_close(config.repair_penalty, 0.001);
        assert_close(config.win_bonus, 1.0);
    }
}
