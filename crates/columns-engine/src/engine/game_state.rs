use serde::Serialize;

use crate::core::{Board, COLUMN_COUNT, Player, Token, are_neighbors};

use super::{
    inventory::{BlockerKind, Inventory},
    moves::{Move, MoveParseError},
};

/// Maximum combined height of the three listed columns of a triple blocker
/// (exclusive).
const TRIPLE_HEIGHT_SUM_LIMIT: usize = 11;

/// Reason a syntactically valid move is illegal in the current position.
///
/// Column indices are 0-based; the messages print them 1-based like the
/// move text.
///
/// Rule violations are ordinary game outcomes, not faults: the state is left
/// untouched and the caller decides what to try next.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display, derive_more::Error,
)]
pub enum RuleViolation {
    #[display("column {} does not exist", column + 1)]
    NoSuchColumn { column: usize },
    #[display("{player} has no roundels left")]
    OutOfRoundels { player: Player },
    #[display("{player} has no {kind}s left")]
    OutOfBlockers { player: Player, kind: BlockerKind },
    #[display("column {} is full", column + 1)]
    ColumnFull { column: usize },
    #[display("column {} is sealed by an opposing blocker", column + 1)]
    ColumnSealed { column: usize },
    #[display("double blocker needs two distinct columns")]
    SameColumn,
    #[display("double blocker columns differ in height")]
    HeightMismatch,
    #[display("columns {} and {} are not adjacent", a + 1, b + 1)]
    NotAdjacent { a: usize, b: usize },
    #[display("triple blocker columns are not a doubled column plus a level adjacent column")]
    InvalidTripleShape,
    #[display("triple blocker height sum {sum} is not below 11")]
    StackTooTall { sum: usize },
    #[display("blocker needs 1 to 3 columns, got {count}")]
    BadArity { count: usize },
}

/// Any rejection of a move given in text form.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum MoveError {
    #[display("malformed move: {_0}")]
    Parse(MoveParseError),
    #[display("illegal move: {_0}")]
    Rule(RuleViolation),
}

/// Complete position of a game: board, both inventories, side to move and
/// the running score.
///
/// Accepted moves mutate the state in place; rejected moves leave it
/// untouched. Placing a piece does not pass the turn, call
/// [`GameState::end_turn`] for that.
///
/// A point is scored exactly once per column, when a roundel push brings the
/// column to full height. The point goes to the roundel's owner. Columns
/// completed by a blocker score nothing.
///
/// ```
/// use columns_engine::{GameState, Player};
///
/// let mut game = GameState::new();
/// for _ in 0..5 {
///     game.apply_str("r, 1").unwrap();
/// }
/// assert_eq!(game.score(Player::Light), 1);
/// assert_eq!(game.inventory(Player::Light).roundels(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    inventories: [Inventory; Player::LEN],
    current_player: Player,
    scores: [u8; Player::LEN],
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self::with_inventories(Inventory::INITIAL, Inventory::INITIAL)
    }

    /// Creates an empty board with custom starting inventories.
    #[must_use]
    pub fn with_inventories(light: Inventory, dark: Inventory) -> Self {
        Self {
            board: Board::new(),
            inventories: [light, dark],
            current_player: Player::Light,
            scores: [0; Player::LEN],
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    #[must_use]
    pub fn inventory(&self, player: Player) -> &Inventory {
        &self.inventories[player.index()]
    }

    #[must_use]
    pub fn score(&self, player: Player) -> u8 {
        self.scores[player.index()]
    }

    /// Scores as `(light, dark)`.
    #[must_use]
    pub fn scores(&self) -> [u8; Player::LEN] {
        self.scores
    }

    /// Passes the turn to the other player.
    pub fn end_turn(&mut self) {
        self.current_player = self.current_player.opponent();
    }

    /// Parses and applies a move in text form for the current player.
    pub fn apply_str(&mut self, text: &str) -> Result<Move, MoveError> {
        let mv = text.parse::<Move>()?;
        self.apply(&mv)?;
        Ok(mv)
    }

    /// Applies a move for the current player.
    pub fn apply(&mut self, mv: &Move) -> Result<(), RuleViolation> {
        match mv {
            Move::Roundel { column } => self.place_roundel(*column),
            Move::Blocker { columns } => self.place_blocker(columns),
        }
    }

    /// Places a roundel of the current player on `column`.
    ///
    /// Rejected when the player has no roundels left, the column is full, or
    /// the column's top token is an opposing blocker. The player's own
    /// blockers never seal a column against their own roundels.
    pub fn place_roundel(&mut self, column: usize) -> Result<(), RuleViolation> {
        check_column(column)?;
        let player = self.current_player;
        if self.inventory(player).roundels() == 0 {
            return Err(RuleViolation::OutOfRoundels { player });
        }
        let target = self.board.column(column);
        if target.is_full() {
            return Err(RuleViolation::ColumnFull { column });
        }
        if target.top() == Token::blocker(player.opponent()) {
            return Err(RuleViolation::ColumnSealed { column });
        }

        let taken = self.inventories[player.index()].take_roundel();
        debug_assert!(taken);
        let target = self.board.column_mut(column);
        target.push(Token::roundel(player));
        if target.is_full() {
            self.scores[player.index()] += 1;
        }
        Ok(())
    }

    /// Places a blocker of the current player across `columns`.
    ///
    /// The number of listed columns selects the blocker kind. A doubled
    /// column in a triple blocker receives two tokens. Exactly one piece is
    /// taken from the matching inventory bucket.
    pub fn place_blocker(&mut self, columns: &[usize]) -> Result<(), RuleViolation> {
        let player = self.current_player;
        let kind = BlockerKind::from_arity(columns.len()).ok_or(RuleViolation::BadArity {
            count: columns.len(),
        })?;
        for &column in columns {
            check_column(column)?;
        }
        if self.inventory(player).blockers(kind) == 0 {
            return Err(RuleViolation::OutOfBlockers { player, kind });
        }
        if let Some(&column) = columns.iter().find(|&&c| self.board.column(c).is_full()) {
            return Err(RuleViolation::ColumnFull { column });
        }
        match kind {
            BlockerKind::Single => {}
            BlockerKind::Double => self.check_double(columns[0], columns[1])?,
            BlockerKind::Triple => self.check_triple([columns[0], columns[1], columns[2]])?,
        }

        let taken = self.inventories[player.index()].take_blocker(kind);
        debug_assert!(taken);
        for &column in columns {
            self.board.column_mut(column).push(Token::blocker(player));
        }
        Ok(())
    }

    fn height(&self, column: usize) -> usize {
        self.board.column(column).size()
    }

    fn check_double(&self, a: usize, b: usize) -> Result<(), RuleViolation> {
        if a == b {
            return Err(RuleViolation::SameColumn);
        }
        if self.height(a) != self.height(b) {
            return Err(RuleViolation::HeightMismatch);
        }
        if !are_neighbors(a, b) {
            return Err(RuleViolation::NotAdjacent { a, b });
        }
        Ok(())
    }

    /// A triple blocker lists one column twice (the doubled column) and an
    /// adjacent column once (the single column). The single column must be
    /// level with the doubled column or exactly one higher.
    ///
    /// Each of the three positions of the single column is checked with the
    /// height difference taken in that direction only.
    fn check_triple(&self, columns: [usize; 3]) -> Result<(), RuleViolation> {
        let heights = columns.map(|c| self.height(c));
        let sum = heights.iter().sum::<usize>();
        if sum >= TRIPLE_HEIGHT_SUM_LIMIT {
            return Err(RuleViolation::StackTooTall { sum });
        }

        let steps_up = |single: usize, doubled: usize| {
            heights[single] == heights[doubled] || heights[single] == heights[doubled] + 1
        };
        let [c0, c1, c2] = columns;
        let valid = (c0 == c1 && are_neighbors(c2, c0) && steps_up(2, 0))
            || (c1 == c2 && are_neighbors(c0, c1) && steps_up(0, 1))
            || (c2 == c0 && are_neighbors(c1, c2) && steps_up(1, 2));
        if !valid {
            return Err(RuleViolation::InvalidTripleShape);
        }
        Ok(())
    }
}

fn check_column(column: usize) -> Result<(), RuleViolation> {
    if column < COLUMN_COUNT {
        Ok(())
    } else {
        Err(RuleViolation::NoSuchColumn { column })
    }
}
