use std::{fmt, slice, str::FromStr};

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::COLUMN_COUNT;

use super::inventory::BlockerKind;

/// Syntactic rejection of a move: the text (or column list) does not
/// describe any move at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::Display, derive_more::Error)]
pub enum MoveParseError {
    #[display("unknown move kind '{kind}' (expected 'r' or 'b')")]
    UnknownKind { kind: String },
    #[display("column '{text}' is not an integer")]
    InvalidColumn { text: String },
    #[display("column {column} is outside 1..=12")]
    ColumnOutOfRange { column: i64 },
    #[display("'{kind}' move takes {expected}, got {count} column(s)")]
    WrongColumnCount {
        kind: char,
        expected: &'static str,
        count: usize,
    },
}

/// A roundel or blocker placement.
///
/// Columns are 0-based internally. The text form (`Display`/`FromStr`) is
/// 1-based: `"r, 1"` places a roundel on column 0, `"b, 6, 6, 7"` places a
/// triple blocker doubled on column 5 with column 6 as the single.
///
/// Constructors only check syntax (column range and count); whether the move
/// is legal in a given position is decided by
/// [`GameState::apply`](crate::GameState::apply).
///
/// ```
/// use columns_engine::Move;
///
/// let mv: Move = "b, 2, 3".parse().unwrap();
/// assert_eq!(mv.columns(), &[1, 2]);
/// assert_eq!(mv.to_string(), "b, 2, 3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Move {
    Roundel { column: usize },
    Blocker { columns: ArrayVec<usize, 3> },
}

impl Move {
    pub fn roundel(column: usize) -> Result<Self, MoveParseError> {
        check_column(column)?;
        Ok(Self::Roundel { column })
    }

    pub fn blocker(columns: &[usize]) -> Result<Self, MoveParseError> {
        if BlockerKind::from_arity(columns.len()).is_none() {
            return Err(MoveParseError::WrongColumnCount {
                kind: 'b',
                expected: "1 to 3",
                count: columns.len(),
            });
        }
        for &column in columns {
            check_column(column)?;
        }
        Ok(Self::Blocker {
            columns: columns.iter().copied().collect(),
        })
    }

    /// Target columns in listed order (a doubled column appears twice).
    #[must_use]
    pub fn columns(&self) -> &[usize] {
        match self {
            Self::Roundel { column } => slice::from_ref(column),
            Self::Blocker { columns } => columns,
        }
    }

    #[must_use]
    pub fn is_roundel(&self) -> bool {
        matches!(self, Self::Roundel { .. })
    }

    /// Inventory bucket consumed by a blocker move; `None` for roundels.
    #[must_use]
    pub fn blocker_kind(&self) -> Option<BlockerKind> {
        match self {
            Self::Roundel { .. } => None,
            Self::Blocker { columns } => BlockerKind::from_arity(columns.len()),
        }
    }

    const fn kind_char(&self) -> char {
        match self {
            Self::Roundel { .. } => 'r',
            Self::Blocker { .. } => 'b',
        }
    }
}

fn check_column(column: usize) -> Result<(), MoveParseError> {
    if column < COLUMN_COUNT {
        return Ok(());
    }
    Err(MoveParseError::ColumnOutOfRange {
        column: i64::try_from(column).map_or(i64::MAX, |c| c.saturating_add(1)),
    })
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind_char())?;
        for column in self.columns() {
            write!(f, ", {}", column + 1)?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let kind = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        if kind != "r" && kind != "b" {
            return Err(MoveParseError::UnknownKind { kind });
        }

        let mut columns = Vec::new();
        for part in parts {
            let text = part.trim();
            let column = text
                .parse::<i64>()
                .map_err(|_| MoveParseError::InvalidColumn {
                    text: text.to_owned(),
                })?;
            let index = column
                .checked_sub(1)
                .and_then(|c| usize::try_from(c).ok())
                .filter(|&c| c < COLUMN_COUNT)
                .ok_or(MoveParseError::ColumnOutOfRange { column })?;
            columns.push(index);
        }

        if kind == "r" {
            if columns.len() != 1 {
                return Err(MoveParseError::WrongColumnCount {
                    kind: 'r',
                    expected: "exactly 1",
                    count: columns.len(),
                });
            }
            return Self::roundel(columns[0]);
        }
        Self::blocker(&columns)
    }
}

impl Serialize for Move {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
