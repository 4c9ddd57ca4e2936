//! The move catalog: a fixed, ordered list of move templates.
//!
//! A catalog position is the selection key of the codec (one strategy output
//! per position) and the locality key of move repair (nearby positions are
//! tried first). Positions are stable for the lifetime of a catalog.
//!
//! # Standard Order
//!
//! [`MoveCatalog::standard`] enumerates every structurally valid template in
//! this order:
//!
//! 1. roundels on columns 1 to 12
//! 2. single blockers on columns 1 to 12
//! 3. double blockers `(A, B)` for every neighbor pair with `A < B`
//! 4. triple blockers `(A, A, B)` for every column `A` and each neighbor `B`
//!
//! Within a group, `A` ascends and neighbors are visited in ascending order.
//!
//! # File Format
//!
//! One move per line in its text form (`r, 1`, `b, 2, 3`, ...). Line order is
//! catalog order. Blank lines are skipped and do not take a position.

use std::collections::HashMap;

use columns_engine::{COLUMN_COUNT, Move, MoveParseError, neighbors_of};

/// Number of entries in the standard catalog.
pub const STANDARD_LEN: usize = 75;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CatalogError {
    #[display("catalog line {line}: {source}")]
    InvalidLine { line: usize, source: MoveParseError },
    #[display("catalog line {line}: '{mv}' already listed at position {first}")]
    Duplicate {
        line: usize,
        mv: Move,
        first: usize,
    },
    #[display("catalog is empty")]
    Empty,
}

/// Immutable, positionally ordered set of move templates.
///
/// ```
/// use columns_evaluator::catalog::{MoveCatalog, STANDARD_LEN};
///
/// let catalog = MoveCatalog::standard();
/// assert_eq!(catalog.len(), STANDARD_LEN);
/// assert_eq!(catalog.get(0).unwrap().to_string(), "r, 1");
/// assert_eq!(catalog.get(24).unwrap().to_string(), "b, 1, 2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCatalog {
    entries: Vec<Move>,
    positions: HashMap<Move, usize>,
}

impl Default for MoveCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl MoveCatalog {
    /// Builds the standard 75-entry catalog.
    #[must_use]
    pub fn standard() -> Self {
        let mut entries = Vec::with_capacity(STANDARD_LEN);
        entries.extend((0..COLUMN_COUNT).map(|c| Move::Roundel { column: c }));
        entries.extend((0..COLUMN_COUNT).map(|c| blocker_on(&[c])));
        for a in 0..COLUMN_COUNT {
            for b in sorted_neighbors(a) {
                if b > a {
                    entries.push(blocker_on(&[a, b]));
                }
            }
        }
        for a in 0..COLUMN_COUNT {
            for b in sorted_neighbors(a) {
                entries.push(blocker_on(&[a, a, b]));
            }
        }
        debug_assert_eq!(entries.len(), STANDARD_LEN);

        let positions = entries.iter().cloned().zip(0..).collect();
        Self { entries, positions }
    }

    /// Builds a catalog from moves in position order.
    pub fn from_moves<I>(moves: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Move>,
    {
        Self::from_numbered(moves.into_iter().enumerate().map(|(i, mv)| (i + 1, mv)))
    }

    /// Parses the catalog file format.
    pub fn from_lines(text: &str) -> Result<Self, CatalogError> {
        let mut moves = vec![];
        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            if line.trim().is_empty() {
                continue;
            }
            let mv = line
                .parse::<Move>()
                .map_err(|source| CatalogError::InvalidLine {
                    line: line_no,
                    source,
                })?;
            moves.push((line_no, mv));
        }
        Self::from_numbered(moves)
    }

    fn from_numbered<I>(moves: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (usize, Move)>,
    {
        let mut entries = vec![];
        let mut positions = HashMap::new();
        for (line, mv) in moves {
            if let Some(&first) = positions.get(&mv) {
                return Err(CatalogError::Duplicate { line, mv, first });
            }
            positions.insert(mv.clone(), entries.len());
            entries.push(mv);
        }
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { entries, positions })
    }

    /// Renders the catalog in the file format, one move per line.
    #[must_use]
    pub fn to_lines(&self) -> String {
        let mut text = String::new();
        for mv in &self.entries {
            text.push_str(&mv.to_string());
            text.push('\n');
        }
        text
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Move> {
        self.entries.get(position)
    }

    /// Position of `mv` in the catalog, if listed.
    #[must_use]
    pub fn position(&self, mv: &Move) -> Option<usize> {
        self.positions.get(mv).copied()
    }

    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.entries
    }
}

fn sorted_neighbors(column: usize) -> impl Iterator<Item = usize> {
    let mut neighbors = neighbors_of(column);
    neighbors.sort_unstable();
    neighbors.into_iter()
}

fn blocker_on(columns: &[usize]) -> Move {
    Move::Blocker {
        columns: columns.iter().copied().collect(),
    }
}

#[cfg(test)]
mod tests {
    use columns_engine::{BlockerKind, are_neighbors};

    use super::*;

    #[test]
    fn test_standard_group_sizes() {
        let catalog = MoveCatalog::standard();
        let roundels = catalog.moves().iter().filter(|m| m.is_roundel()).count();
        let count_kind = |kind| {
            catalog
                .moves()
                .iter()
                .filter(|m| m.blocker_kind() == Some(kind))
                .count()
        };
        assert_eq!(roundels, 12);
        assert_eq!(count_kind(BlockerKind::Single), 12);
        assert_eq!(count_kind(BlockerKind::Double), 17);
        assert_eq!(count_kind(BlockerKind::Triple), 34);
    }

    #[test]
    fn test_standard_order() {
        let catalog = MoveCatalog::standard();
        let text = |i: usize| catalog.get(i).unwrap().to_string();
        assert_eq!(text(0), "r, 1");
        assert_eq!(text(11), "r, 12");
        assert_eq!(text(12), "b, 1");
        assert_eq!(text(23), "b, 12");
        assert_eq!(text(24), "b, 1, 2");
        assert_eq!(text(25), "b, 1, 5");
        assert_eq!(text(40), "b, 11, 12");
        assert_eq!(text(41), "b, 1, 1, 2");
        assert_eq!(text(42), "b, 1, 1, 5");
        assert_eq!(text(74), "b, 12, 12, 11");
        assert_eq!(catalog.get(75), None);
    }

    #[test]
    fn test_doubles_and_triples_are_adjacent() {
        for mv in MoveCatalog::standard().moves() {
            match mv.columns() {
                [a, b] => assert!(a < b && are_neighbors(*a, *b), "{mv}"),
                [a, a2, b] => assert!(a == a2 && are_neighbors(*a, *b), "{mv}"),
                _ => {}
            }
        }
    }

    #[test]
    fn test_position_lookup() {
        let catalog = MoveCatalog::standard();
        for (i, mv) in catalog.moves().iter().enumerate() {
            assert_eq!(catalog.position(mv), Some(i));
        }
        assert_eq!(catalog.position(&"b, 1, 3".parse().unwrap()), None);
    }

    #[test]
    fn test_file_format() {
        let standard = MoveCatalog::standard();
        let text = standard.to_lines();
        assert_eq!(text.lines().count(), STANDARD_LEN);
        assert_eq!(MoveCatalog::from_lines(&text).unwrap(), standard);

        let small = MoveCatalog::from_lines("r, 3\n\n  b, 3, 4  \n").unwrap();
        assert_eq!(small.len(), 2);
        assert_eq!(small.get(1).unwrap().columns(), &[2, 3]);
    }

    #[test]
    fn test_file_errors() {
        assert!(matches!(
            MoveCatalog::from_lines("r, 1\nx, 2\n"),
            Err(CatalogError::InvalidLine { line: 2, .. })
        ));
        assert!(matches!(
            MoveCatalog::from_lines("r, 1\nb, 2\nR, 1\n"),
            Err(CatalogError::Duplicate {
                line: 3,
                first: 0,
                ..
            })
        ));
        assert_eq!(MoveCatalog::from_lines("\n\n"), Err(CatalogError::Empty));
        assert_eq!(MoveCatalog::from_moves([]), Err(CatalogError::Empty));
    }
}
