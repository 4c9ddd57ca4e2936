use serde::{Deserialize, Serialize};

/// Size class of a blocker placement, selecting an inventory bucket.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum BlockerKind {
    /// One token on one column.
    #[display("single blocker")]
    Single,
    /// One token on each of two adjacent, level columns.
    #[display("double blocker")]
    Double,
    /// Two tokens on one column and one on an adjacent column.
    #[display("triple blocker")]
    Triple,
}

impl BlockerKind {
    /// Maps the number of listed columns to the blocker kind.
    #[must_use]
    pub const fn from_arity(arity: usize) -> Option<Self> {
        match arity {
            1 => Some(Self::Single),
            2 => Some(Self::Double),
            3 => Some(Self::Triple),
            _ => None,
        }
    }

    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }
}

/// Unplaced pieces of one player.
///
/// Counters only ever decrease; nothing is returned to the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    roundels: u8,
    blockers: u8,
    double_blockers: u8,
    triple_blockers: u8,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl Inventory {
    pub const INITIAL: Self = Self {
        roundels: 12,
        blockers: 3,
        double_blockers: 3,
        triple_blockers: 3,
    };

    pub const EMPTY: Self = Self {
        roundels: 0,
        blockers: 0,
        double_blockers: 0,
        triple_blockers: 0,
    };

    #[must_use]
    pub const fn new(
        roundels: u8,
        blockers: u8,
        double_blockers: u8,
        triple_blockers: u8,
    ) -> Self {
        Self {
            roundels,
            blockers,
            double_blockers,
            triple_blockers,
        }
    }

    #[must_use]
    pub const fn roundels(&self) -> u8 {
        self.roundels
    }

    #[must_use]
    pub const fn blockers(&self, kind: BlockerKind) -> u8 {
        match kind {
            BlockerKind::Single => self.blockers,
            BlockerKind::Double => self.double_blockers,
            BlockerKind::Triple => self.triple_blockers,
        }
    }

    /// Counts in encoding order: roundels, single, double, triple blockers.
    #[must_use]
    pub const fn counts(&self) -> [u8; 4] {
        [
            self.roundels,
            self.blockers,
            self.double_blockers,
            self.triple_blockers,
        ]
    }

    /// Returns `true` when every bucket is empty.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.roundels == 0
            && self.blockers == 0
            && self.double_blockers == 0
            && self.triple_blockers == 0
    }

    pub(crate) fn take_roundel(&mut self) -> bool {
        take(&mut self.roundels)
    }

    pub(crate) fn take_blocker(&mut self, kind: BlockerKind) -> bool {
        match kind {
            BlockerKind::Single => take(&mut self.blockers),
            BlockerKind::Double => take(&mut self.double_blockers),
            BlockerKind::Triple => take(&mut self.triple_blockers),
        }
    }
}

fn take(count: &mut u8) -> bool {
    match count.checked_sub(1) {
        Some(rest) => {
            *count = rest;
            true
        }
        None => false,
    }
}
