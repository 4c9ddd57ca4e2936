//! Rule engine and move protocol.
//!
//! - [`GameState`] - board, inventories, side to move and score; validates
//!   and applies placements
//! - [`Move`] - a roundel or blocker placement with its `"r, 1"` text form
//! - [`Inventory`] - unplaced pieces of one player
//!
//! # Example
//!
//! ```
//! use columns_engine::{GameState, MoveError, Player, RuleViolation};
//!
//! let mut game = GameState::new();
//! game.apply_str("b, 5").unwrap();
//! game.end_turn();
//!
//! // Light's blocker seals column 5 against Dark's roundels
//! let err = game.apply_str("r, 5").unwrap_err();
//! assert_eq!(err, MoveError::Rule(RuleViolation::ColumnSealed { column: 4 }));
//! assert_eq!(game.current_player(), Player::Dark);
//! ```

pub use self::{game_state::*, inventory::*, moves::*};

mod game_state;
mod inventory;
mod moves;
