//! All-pairs round robin over one generation of strategies.
//!
//! # Scheduling
//!
//! For `n` strategies, [`round_robin_pairings`] lists every unordered pair
//! `(i, j)` with `i < j` exactly once, `n(n-1)/2` games in total. The lower
//! index always plays Light. Game numbers follow this order.
//!
//! # Parallelization
//!
//! Games share no mutable state. Pairings are split into contiguous chunks,
//! one scoped thread per chunk, and every thread returns its own records.
//! Statistics are folded afterwards in game order, so the result does not
//! depend on the thread count.
//!
//! # Sessions
//!
//! A [`TrainingSession`] numbers generations. Statistics are created fresh
//! for every call to [`TrainingSession::evaluate_generation`] and never reset
//! mid-generation.

use std::thread;

use columns_engine::Player;
use columns_evaluator::strategy::Strategy;
use serde::Serialize;

use crate::arena::{Arena, ArenaError, GameRecord, Outcome};

/// One scheduled game. `light` and `dark` index the strategy list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pairing {
    pub game: usize,
    pub light: usize,
    pub dark: usize,
}

impl Pairing {
    #[must_use]
    pub fn strategy(&self, player: Player) -> usize {
        match player {
            Player::Light => self.light,
            Player::Dark => self.dark,
        }
    }
}

/// Every unordered pair of `count` strategies, lower index first.
#[must_use]
pub fn round_robin_pairings(count: usize) -> Vec<Pairing> {
    let mut pairings = Vec::with_capacity(count * count.saturating_sub(1) / 2);
    for light in 0..count {
        for dark in (light + 1)..count {
            pairings.push(Pairing {
                game: pairings.len(),
                light,
                dark,
            });
        }
    }
    pairings
}

/// Accumulated results of one strategy within a generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StrategyStats {
    pub id: usize,
    pub fitness: f32,
    pub invalid_moves: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl StrategyStats {
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn games(&self) -> usize {
        self.wins + self.draws + self.losses
    }

    fn record(&mut self, player: Player, game: &GameRecord) {
        let idx = player.index();
        self.fitness += game.fitness[idx];
        self.invalid_moves += game.invalid_moves[idx];
        match game.outcome.winner() {
            None => self.draws += 1,
            Some(winner) if winner == player => self.wins += 1,
            Some(_) => self.losses += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    pub pairing: Pairing,
    pub record: GameRecord,
}

/// Best, worst and mean fitness of a generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitnessSummary {
    pub best: f32,
    pub worst: f32,
    pub mean: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub stats: Vec<StrategyStats>,
    pub games: Vec<GameReport>,
}

impl GenerationReport {
    /// `None` for an empty generation.
    #[must_use]
    pub fn summary(&self) -> Option<FitnessSummary> {
        let first = self.stats.first()?.fitness;
        let (best, worst, sum) = self.stats.iter().fold(
            (first, first, 0.0),
            |(best, worst, sum), s| (best.max(s.fitness), worst.min(s.fitness), sum + s.fitness),
        );
        #[expect(clippy::cast_precision_loss)]
        let mean = sum / self.stats.len() as f32;
        Some(FitnessSummary { best, worst, mean })
    }

    #[must_use]
    pub fn outcome_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for game in &self.games {
            let idx = match game.record.outcome {
                Outcome::LightWon => 0,
                Outcome::DarkWon => 1,
                Outcome::Draw => 2,
            };
            counts[idx] += 1;
        }
        counts
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("game {game} ({light} vs {dark}) aborted: {source}")]
pub struct TournamentError {
    pub game: usize,
    pub light: usize,
    pub dark: usize,
    pub source: ArenaError,
}

/// Plays every pairing and returns the games in pairing order.
///
/// `threads` is clamped to at least one.
pub fn play_pairings<S>(
    arena: &Arena,
    strategies: &[S],
    pairings: &[Pairing],
    threads: usize,
) -> Result<Vec<GameReport>, TournamentError>
where
    S: Strategy,
{
    let chunk_size = pairings.len().div_ceil(threads.max(1)).max(1);
    let play_chunk = |chunk: &[Pairing]| -> Result<Vec<GameReport>, TournamentError> {
        chunk
            .iter()
            .map(|&pairing| {
                let record = arena
                    .play(&strategies[pairing.light], &strategies[pairing.dark])
                    .map_err(|source| TournamentError {
                        game: pairing.game,
                        light: pairing.light,
                        dark: pairing.dark,
                        source,
                    })?;
                tracing::debug!(
                    game = pairing.game,
                    light = pairing.light,
                    dark = pairing.dark,
                    outcome = %record.outcome,
                    termination = %record.termination,
                    scores = ?record.scores,
                    plies = record.plies.len(),
                    "game finished"
                );
                Ok(GameReport { pairing, record })
            })
            .collect()
    };

    let chunk_results = thread::scope(|s| {
        let handles = pairings
            .chunks(chunk_size)
            .map(|chunk| s.spawn(move || play_chunk(chunk)))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect::<Vec<_>>()
    });

    let mut games = Vec::with_capacity(pairings.len());
    for result in chunk_results {
        games.extend(result?);
    }
    Ok(games)
}

/// Runs a full round robin and folds per-strategy statistics.
pub fn run_round_robin<S>(
    arena: &Arena,
    strategies: &[S],
    threads: usize,
    generation: usize,
) -> Result<GenerationReport, TournamentError>
where
    S: Strategy,
{
    let pairings = round_robin_pairings(strategies.len());
    let games = play_pairings(arena, strategies, &pairings, threads)?;

    let mut stats = (0..strategies.len())
        .map(StrategyStats::new)
        .collect::<Vec<_>>();
    for game in &games {
        for player in Player::ALL {
            stats[game.pairing.strategy(player)].record(player, &game.record);
        }
    }

    Ok(GenerationReport {
        generation,
        stats,
        games,
    })
}

/// Generation counter and evaluation context shared across generations.
#[derive(Debug)]
pub struct TrainingSession {
    arena: Arena,
    threads: usize,
    generation: usize,
}

impl TrainingSession {
    #[must_use]
    pub fn new(arena: Arena, threads: usize) -> Self {
        Self {
            arena,
            threads: threads.max(1),
            generation: 0,
        }
    }

    /// Number of the next generation to be evaluated.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Plays the round robin for `strategies` and advances the generation.
    ///
    /// A failed generation is not counted.
    pub fn evaluate_generation<S>(
        &mut self,
        strategies: &[S],
    ) -> Result<GenerationReport, TournamentError>
    where
        S: Strategy,
    {
        let report = run_round_robin(&self.arena, strategies, self.threads, self.generation)?;
        if let Some(summary) = report.summary() {
            tracing::info!(
                generation = self.generation,
                strategies = strategies.len(),
                games = report.games.len(),
                best = summary.best,
                mean = summary.mean,
                "generation evaluated"
            );
        }
        self.generation += 1;
        Ok(report)
    }

    /// Ends the session, returning the number of evaluated generations.
    pub fn finish(self) -> usize {
        tracing::debug!(generations = self.generation, "training session finished");
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use columns_evaluator::{
        catalog::MoveCatalog,
        codec::INPUT_LEN,
        network::FeedForwardStrategy,
        strategy::{BoxedStrategy, StrategyError},
    };

    use super::*;
    use crate::arena::ArenaConfig;

    #[derive(Debug)]
    struct Prefer(usize);

    impl Strategy for Prefer {
        fn activate(&self, _input: &[f32]) -> Result<Vec<f32>, StrategyError> {
            let mut output = vec![0.0; self.0 + 1];
            output[self.0] = 1.0;
            Ok(output)
        }
    }

    fn arena() -> Arena {
        Arena::new(MoveCatalog::standard(), ArenaConfig::default())
    }

    fn networks(count: u64) -> Vec<FeedForwardStrategy> {
        (0..count)
            .map(|seed| FeedForwardStrategy::seeded(&[INPUT_LEN, 16, 75], seed))
            .collect()
    }

    #[test]
    fn test_pairings_cover_each_pair_once() {
        for n in 0..8 {
            let pairings = round_robin_pairings(n);
            assert_eq!(pairings.len(), n * n.saturating_sub(1) / 2);
            let unique = pairings
                .iter()
                .map(|p| (p.light, p.dark))
                .collect::<HashSet<_>>();
            assert_eq!(unique.len(), pairings.len());
            for (i, p) in pairings.iter().enumerate() {
                assert_eq!(p.game, i);
                assert!(p.light < p.dark && p.dark < n);
            }
        }
    }

    #[test]
    fn test_stats_are_consistent() {
        let strategies = networks(5);
        let report = run_round_robin(&arena(), &strategies, 2, 0).unwrap();

        assert_eq!(report.games.len(), 10);
        assert_eq!(report.stats.len(), 5);
        for stats in &report.stats {
            assert_eq!(stats.games(), 4);
        }
        let wins = report.stats.iter().map(|s| s.wins).sum::<usize>();
        let losses = report.stats.iter().map(|s| s.losses).sum::<usize>();
        let draws = report.stats.iter().map(|s| s.draws).sum::<usize>();
        assert_eq!(wins, losses);
        assert_eq!(draws % 2, 0);

        let [light_wins, dark_wins, drawn] = report.outcome_counts();
        assert_eq!(light_wins + dark_wins, wins);
        assert_eq!(drawn * 2, draws);
    }

    #[test]
    fn test_thread_count_does_not_change_results() {
        let strategies = networks(4);
        let single = run_round_robin(&arena(), &strategies, 1, 0).unwrap();
        let many = run_round_robin(&arena(), &strategies, 8, 0).unwrap();
        assert_eq!(single.stats, many.stats);
        for (a, b) in single.games.iter().zip(&many.games) {
            assert_eq!(a.pairing, b.pairing);
            assert_eq!(a.record.plies, b.record.plies);
        }
    }

    #[test]
    fn test_fitness_folds_both_seats() {
        // strategy 0 and 2 stack on column 1, strategy 1 on column 2
        let strategies: Vec<BoxedStrategy> =
            vec![Box::new(Prefer(0)), Box::new(Prefer(1)), Box::new(Prefer(0))];
        let report = run_round_robin(&arena(), &strategies, 3, 0).unwrap();

        for stats in &report.stats {
            let expected = report
                .games
                .iter()
                .flat_map(|g| {
                    Player::ALL
                        .into_iter()
                        .filter(|&p| g.pairing.strategy(p) == stats.id)
                        .map(|p| g.record.fitness[p.index()])
                })
                .sum::<f32>();
            assert!((stats.fitness - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_summary() {
        let report = GenerationReport {
            generation: 0,
            stats: vec![
                StrategyStats {
                    fitness: 2.0,
                    ..StrategyStats::new(0)
                },
                StrategyStats {
                    fitness: -1.0,
                    ..StrategyStats::new(1)
                },
                StrategyStats {
                    fitness: 5.0,
                    ..StrategyStats::new(2)
                },
            ],
            games: vec![],
        };
        assert_eq!(
            report.summary(),
            Some(FitnessSummary {
                best: 5.0,
                worst: -1.0,
                mean: 2.0
            })
        );
        let empty = GenerationReport {
            generation: 0,
            stats: vec![],
            games: vec![],
        };
        assert_eq!(empty.summary(), None);
    }

    #[test]
    fn test_session_advances_generation() {
        let mut session = TrainingSession::new(arena(), 2);
        let strategies = networks(3);
        assert_eq!(session.generation(), 0);
        let first = session.evaluate_generation(&strategies).unwrap();
        let second = session.evaluate_generation(&strategies).unwrap();
        assert_eq!(first.generation, 0);
        assert_eq!(second.generation, 1);
        // fresh statistics each generation
        assert_eq!(first.stats, second.stats);
        assert_eq!(session.finish(), 2);
    }

    #[test]
    fn test_failure_reports_game() {
        #[derive(Debug)]
        struct Broken;

        impl Strategy for Broken {
            fn activate(&self, _input: &[f32]) -> Result<Vec<f32>, StrategyError> {
                Err(StrategyError::Failed {
                    message: "boom".to_owned(),
                })
            }
        }

        let strategies: Vec<BoxedStrategy> =
            vec![Box::new(Prefer(0)), Box::new(Prefer(1)), Box::new(Broken)];
        let mut session = TrainingSession::new(arena(), 1);
        let err = session.evaluate_generation(&strategies).unwrap_err();
        assert_eq!((err.game, err.light, err.dark), (1, 0, 2));
        assert_eq!(session.generation(), 0);
    }
}
