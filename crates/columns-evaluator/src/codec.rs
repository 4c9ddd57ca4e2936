//! State encoding and output decoding.
//!
//! # Input Layout
//!
//! [`encode_state`] emits [`INPUT_LEN`] values:
//!
//! ```text
//! [0..60)   12 columns × 5 levels, bottom to top: token code
//!           (0 empty, 1 light roundel, 2 light blocker, 3 dark roundel, 4 dark blocker)
//! [60..64)  Light inventory: roundels, single, double, triple blockers
//! [64..68)  Dark inventory, same order
//! ```
//!
//! The encoding is absolute: it does not depend on which player is to move.
//!
//! # Output Layout
//!
//! Strategies emit one weight per catalog position. [`decode_output`] turns
//! the weights into a distribution with [`softmax`] and selects the most
//! probable position, breaking ties toward the lowest position.

use columns_engine::{COLUMN_COUNT, GameState, Move, Player, STACK_HEIGHT};
use serde::Serialize;

use crate::catalog::MoveCatalog;

/// Values per player inventory in the encoding.
const INVENTORY_FIELDS: usize = 4;

/// Length of the encoded state vector.
pub const INPUT_LEN: usize = COLUMN_COUNT * STACK_HEIGHT + Player::LEN * INVENTORY_FIELDS;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display, derive_more::Error,
)]
pub enum DecodeError {
    /// The output is empty or holds no comparable value.
    #[display("strategy output has no selectable value")]
    NoSelection,
    /// The selected position has no catalog entry.
    #[display("selected position {position} is outside the catalog of {len} moves")]
    OutOfCatalog { position: usize, len: usize },
}

/// Encodes the full game state as a fixed-length numeric vector.
#[must_use]
pub fn encode_state(game: &GameState) -> [f32; INPUT_LEN] {
    let mut values = [0.0; INPUT_LEN];
    let (board_part, inventory_part) = values.split_at_mut(COLUMN_COUNT * STACK_HEIGHT);

    for (column, slots) in game
        .board()
        .columns()
        .iter()
        .zip(board_part.chunks_exact_mut(STACK_HEIGHT))
    {
        for (level, slot) in slots.iter_mut().enumerate() {
            *slot = f32::from(column.token_at(level).code());
        }
    }
    for (player, slots) in Player::ALL
        .iter()
        .zip(inventory_part.chunks_exact_mut(INVENTORY_FIELDS))
    {
        for (count, slot) in game.inventory(*player).counts().iter().zip(slots) {
            *slot = f32::from(*count);
        }
    }
    values
}

/// Normalizes raw weights into a probability distribution.
///
/// NaN weights get probability zero. If no weight is comparable (empty or
/// all NaN), every probability is zero. Positive infinities share the mass
/// evenly.
#[must_use]
pub fn softmax(raw: &[f32]) -> Vec<f32> {
    let max = raw
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f32::NEG_INFINITY, f32::max);
    if max == f32::NEG_INFINITY {
        return vec![0.0; raw.len()];
    }

    let exps = raw
        .iter()
        .map(|&v| {
            if v.is_nan() {
                0.0
            } else if max.is_infinite() {
                // max is +inf here; only the infinite entries survive
                if v == max { 1.0 } else { 0.0 }
            } else {
                (v - max).exp()
            }
        })
        .collect::<Vec<_>>();
    let sum = exps.iter().sum::<f32>();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Selects the most probable position of `raw`, without bounds checking
/// against a catalog.
///
/// The first position wins among equal probabilities.
pub fn select_position(raw: &[f32]) -> Result<usize, DecodeError> {
    let probabilities = softmax(raw);
    let mut best: Option<(usize, f32)> = None;
    for (position, p) in probabilities.into_iter().enumerate() {
        if best.is_none_or(|(_, best_p)| p > best_p) {
            best = Some((position, p));
        }
    }
    match best {
        Some((position, p)) if p > 0.0 => Ok(position),
        _ => Err(DecodeError::NoSelection),
    }
}

/// Decodes a strategy output into a catalog position and its move.
///
/// ```
/// use columns_evaluator::{catalog::MoveCatalog, codec};
///
/// let catalog = MoveCatalog::standard();
/// let mut raw = vec![0.0; catalog.len()];
/// raw[3] = 2.5;
/// let (position, mv) = codec::decode_output(&raw, &catalog).unwrap();
/// assert_eq!(position, 3);
/// assert_eq!(mv.to_string(), "r, 4");
/// ```
pub fn decode_output<'a>(
    raw: &[f32],
    catalog: &'a MoveCatalog,
) -> Result<(usize, &'a Move), DecodeError> {
    let position = select_position(raw)?;
    let mv = catalog.get(position).ok_or(DecodeError::OutOfCatalog {
        position,
        len: catalog.len(),
    })?;
    Ok((position, mv))
}

#[cfg(test)]
mod tests {
    use columns_engine::Token;

    use super::*;

    #[test]
    fn test_encode_empty_board() {
        let values = encode_state(&GameState::new());
        assert_eq!(values.len(), 68);
        assert!(values[..60].iter().all(|&v| v == 0.0));
        assert_eq!(&values[60..], &[12.0, 3.0, 3.0, 3.0, 12.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_encode_tokens_and_inventories() {
        let mut game = GameState::new();
        game.apply_str("r, 2").unwrap();
        game.apply_str("b, 2").unwrap();
        game.end_turn();
        game.apply_str("b, 12, 12, 11").unwrap();

        let values = encode_state(&game);
        // column 1 occupies slots 5..10
        assert_eq!(
            &values[5..10],
            &[
                f32::from(Token::LightRoundel.code()),
                f32::from(Token::LightBlocker.code()),
                0.0,
                0.0,
                0.0
            ]
        );
        // column 10 got the single token, column 11 the doubled pair
        assert_eq!(&values[50..52], &[4.0, 0.0]);
        assert_eq!(&values[55..58], &[4.0, 4.0, 0.0]);
        assert_eq!(&values[60..64], &[11.0, 2.0, 3.0, 3.0]);
        assert_eq!(&values[64..68], &[12.0, 3.0, 3.0, 2.0]);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0]);
        assert!((p.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!(p[0] < p[1] && p[1] < p[2]);

        // large magnitudes stay finite
        let p = softmax(&[1000.0, 999.0]);
        assert!(p.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_softmax_special_values() {
        let p = softmax(&[f32::NAN, 0.0]);
        assert_eq!(p[0], 0.0);
        assert!((p[1] - 1.0).abs() < 1e-6);

        let p = softmax(&[f32::INFINITY, 5.0, f32::INFINITY]);
        assert_eq!(p, vec![0.5, 0.0, 0.5]);

        assert_eq!(softmax(&[f32::NAN, f32::NAN]), vec![0.0, 0.0]);
        assert!(softmax(&[]).is_empty());
    }

    #[test]
    fn test_select_first_max() {
        assert_eq!(select_position(&[0.1, 0.7, 0.7, 0.2]), Ok(1));
        assert_eq!(select_position(&[0.0; 5]), Ok(0));
        assert_eq!(select_position(&[f32::NAN, -3.0]), Ok(1));
    }

    #[test]
    fn test_decode_errors() {
        let catalog = MoveCatalog::standard();
        assert_eq!(
            decode_output(&[], &catalog),
            Err(DecodeError::NoSelection)
        );
        assert_eq!(
            decode_output(&[f32::NAN; 3], &catalog),
            Err(DecodeError::NoSelection)
        );

        let mut raw = vec![0.0; catalog.len() + 5];
        raw[catalog.len() + 2] = 1.0;
        assert_eq!(
            decode_output(&raw, &catalog),
            Err(DecodeError::OutOfCatalog {
                position: 77,
                len: 75
            })
        );
    }

    #[test]
    fn test_decode_is_deterministic() {
        let catalog = MoveCatalog::standard();
        let raw = (0..catalog.len())
            .map(|i| ((i * 37) % 11) as f32)
            .collect::<Vec<_>>();
        let first = decode_output(&raw, &catalog).unwrap();
        for _ in 0..10 {
            assert_eq!(decode_output(&raw, &catalog).unwrap(), first);
        }
    }
}
