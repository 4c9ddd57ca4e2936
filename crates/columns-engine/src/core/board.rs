use std::{array, fmt};

use super::{BOARD_COLS, COLUMN_COUNT, STACK_HEIGHT, column::Column};

/// The fixed 12-column board, indexed row-major over the 3×4 grid.
///
/// The topology never changes after construction; only the stacks grow.
///
/// The `Display` rendering draws the five levels top to bottom, one cell per
/// column, with `~|~` separating the grid rows:
///
/// ```
/// use columns_engine::Board;
///
/// let board = Board::new();
/// let rendering = board.to_string();
/// assert_eq!(rendering.lines().count(), 1 + 5);
/// assert!(rendering.contains("[ -- ]"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    columns: [Column; COLUMN_COUNT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: array::from_fn(Column::new),
        }
    }

    /// # Panics
    ///
    /// Panics if `index >= COLUMN_COUNT`.
    #[must_use]
    pub fn column(&self, index: usize) -> &Column {
        &self.columns[index]
    }

    pub(crate) fn column_mut(&mut self, index: usize) -> &mut Column {
        &mut self.columns[index]
    }

    #[must_use]
    pub fn columns(&self) -> &[Column; COLUMN_COUNT] {
        &self.columns
    }

    #[must_use]
    pub fn heights(&self) -> [usize; COLUMN_COUNT] {
        array::from_fn(|i| self.columns[i].size())
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.columns.iter().all(Column::is_full)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "______ ______ ______ ______ ~|~ ______ |COLUMN GAME| ______ ~|~ ______ ______ ______ ______"
        )?;
        for level in (0..STACK_HEIGHT).rev() {
            for (i, column) in self.columns.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                    if i % BOARD_COLS == 0 {
                        f.write_str("~|~ ")?;
                    }
                }
                write!(f, "[ {:^3}]", column.token_at(level).as_str())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
