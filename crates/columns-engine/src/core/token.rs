use serde::{Deserialize, Serialize};

/// One of the two seats at the board.
///
/// Light always moves first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Player {
    #[display("Light")]
    Light,
    #[display("Dark")]
    Dark,
}

impl Player {
    pub const LEN: usize = 2;
    pub const ALL: [Self; Self::LEN] = [Self::Light, Self::Dark];

    /// Seat index: 0 for Light, 1 for Dark.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Light => 0,
            Self::Dark => 1,
        }
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Light),
            1 => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Content of a single stack slot.
///
/// Blockers are fungible: a token placed by a double or triple blocker is
/// indistinguishable from one placed by a single blocker.
///
/// The discriminants are the values used by the state encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Token {
    #[default]
    Empty = 0,
    LightRoundel = 1,
    LightBlocker = 2,
    DarkRoundel = 3,
    DarkBlocker = 4,
}

impl Token {
    #[must_use]
    pub const fn roundel(owner: Player) -> Self {
        match owner {
            Player::Light => Self::LightRoundel,
            Player::Dark => Self::DarkRoundel,
        }
    }

    #[must_use]
    pub const fn blocker(owner: Player) -> Self {
        match owner {
            Player::Light => Self::LightBlocker,
            Player::Dark => Self::DarkBlocker,
        }
    }

    #[must_use]
    pub const fn owner(self) -> Option<Player> {
        match self {
            Self::Empty => None,
            Self::LightRoundel | Self::LightBlocker => Some(Player::Light),
            Self::DarkRoundel | Self::DarkBlocker => Some(Player::Dark),
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub const fn is_roundel(self) -> bool {
        matches!(self, Self::LightRoundel | Self::DarkRoundel)
    }

    #[must_use]
    pub const fn is_blocker(self) -> bool {
        matches!(self, Self::LightBlocker | Self::DarkBlocker)
    }

    /// Numeric code fed to strategies (0 = empty, 1..=4 = pieces).
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Two-letter label used in board renderings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "--",
            Self::LightRoundel => "Lr",
            Self::LightBlocker => "Lb",
            Self::DarkRoundel => "Dr",
            Self::DarkBlocker => "Db",
        }
    }
}
