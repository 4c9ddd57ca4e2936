//! Self-play evaluation of Columns strategies.
//!
//! This crate turns a list of [`Strategy`](columns_evaluator::strategy::Strategy)
//! values into fitness scores for an external optimizer:
//!
//! 1. **Repair** ([`repair`]) - recovers from illegal moves by scanning the
//!    catalog outward from the rejected position
//! 2. **Arena** ([`arena`]) - plays one game to completion, shaping fitness
//!    per ply and returning an immutable [`GameRecord`](arena::GameRecord)
//! 3. **Tournament** ([`tournament`]) - plays the all-pairs round robin of a
//!    generation in parallel and folds per-strategy statistics
//!
//! # Example
//!
//! ```
//! use columns_evaluator::{
//!     catalog::{MoveCatalog, STANDARD_LEN},
//!     codec::INPUT_LEN,
//!     network::FeedForwardStrategy,
//! };
//! use columns_training::{
//!     arena::{Arena, ArenaConfig},
//!     tournament::TrainingSession,
//! };
//!
//! let strategies = (0..3)
//!     .map(|seed| FeedForwardStrategy::seeded(&[INPUT_LEN, 8, STANDARD_LEN], seed))
//!     .collect::<Vec<_>>();
//!
//! let arena = Arena::new(MoveCatalog::standard(), ArenaConfig::default());
//! let mut session = TrainingSession::new(arena, 2);
//! let report = session.evaluate_generation(&strategies).unwrap();
//! assert_eq!(report.games.len(), 3);
//! ```
//!
//! # Limitations
//!
//! - Strategies are called synchronously; a strategy that never returns
//!   stalls its thread
//! - Breeding the next generation is out of scope: the report only ranks
//!   the current one

pub mod arena;
pub mod repair;
pub mod tournament;
