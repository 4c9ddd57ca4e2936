use arrayvec::ArrayVec;

use super::{BOARD_COLS, BOARD_ROWS, COLUMN_COUNT, STACK_HEIGHT, token::Token};

/// Orthogonal neighbors of a column on the 3×4 grid.
///
/// Neighbors never wrap across row boundaries. The order is up, down, left,
/// right (skipping the ones that fall off the grid).
///
/// # Panics
///
/// Panics if `index` is not a valid column index.
#[must_use]
pub fn neighbors_of(index: usize) -> ArrayVec<usize, 4> {
    assert!(index < COLUMN_COUNT, "column index out of range: {index}");
    let row = index / BOARD_COLS;
    let col = index % BOARD_COLS;
    let mut neighbors = ArrayVec::new();
    if row > 0 {
        neighbors.push(index - BOARD_COLS);
    }
    if row + 1 < BOARD_ROWS {
        neighbors.push(index + BOARD_COLS);
    }
    if col > 0 {
        neighbors.push(index - 1);
    }
    if col + 1 < BOARD_COLS {
        neighbors.push(index + 1);
    }
    neighbors
}

/// Returns `true` if the two columns share an edge on the grid.
#[must_use]
pub fn are_neighbors(a: usize, b: usize) -> bool {
    a < COLUMN_COUNT && b < COLUMN_COUNT && neighbors_of(a).contains(&b)
}

/// A single vertical slot holding up to [`STACK_HEIGHT`] tokens, bottom to top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    index: usize,
    stack: ArrayVec<Token, STACK_HEIGHT>,
    neighbors: ArrayVec<usize, 4>,
}

impl Column {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            stack: ArrayVec::new(),
            neighbors: neighbors_of(index),
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.stack.is_full()
    }

    /// Top token, or [`Token::Empty`] for an empty column.
    #[must_use]
    pub fn top(&self) -> Token {
        self.stack.last().copied().unwrap_or_default()
    }

    /// Token at `level` (0 = bottom), or [`Token::Empty`] above the stack.
    #[must_use]
    pub fn token_at(&self, level: usize) -> Token {
        self.stack.get(level).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.stack
    }

    #[must_use]
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    #[must_use]
    pub fn is_neighbor(&self, other: usize) -> bool {
        self.neighbors.contains(&other)
    }

    /// Pushes a token on top of the stack.
    ///
    /// # Panics
    ///
    /// Panics if the column is already full. Capacity is checked by the rule
    /// engine before any push.
    pub(crate) fn push(&mut self, token: Token) {
        debug_assert!(!token.is_empty());
        self.stack.push(token);
    }
}
