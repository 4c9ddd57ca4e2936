//! Static board model: piece tokens, columns, and the 12-column board.

pub use self::{board::*, column::*, token::*};

pub(crate) mod board;
pub(crate) mod column;
pub(crate) mod token;

/// Number of grid rows.
pub const BOARD_ROWS: usize = 3;
/// Number of grid columns per row.
pub const BOARD_COLS: usize = 4;
/// Number of columns (stacks) on the board, indexed row-major.
pub const COLUMN_COUNT: usize = BOARD_ROWS * BOARD_COLS;
/// Capacity of every column.
pub const STACK_HEIGHT: usize = 5;
