pub mod connect_four;

mod error;
mod grid;
mod roster;

use std::fmt::{Display, Formatter};

use serde::Serialize;

pub use error::{InsertError, JoinError, LockedError, SelectError};
pub use grid::GridIndex;

pub type PlayerId = String;

/// Number of columns on the board.
pub const COLUMNS: usize = 7;
/// Number of rows on the board, row 0 is the bottom one.
pub const ROWS: usize = 6;
/// Length of a winning line.
pub const WIN_LENGTH: usize = 4;

/// Position of a player in join order.
/// Only affects rendering, both seats play by the same rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    Red,
    Blue,
}

impl Seat {
    pub fn from_position(position: usize) -> Option<Self> {
        match position {
            0 => Some(Self::Red),
            1 => Some(Self::Blue),
            _ => None,
        }
    }

    pub fn position(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Blue => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Self::Red => "\u{1F534}",
            Self::Blue => "\u{1F535}",
        }
    }
}

/// Marker of an empty cell in the rendered board.
pub const EMPTY_MARKER: &str = "\u{26AA}";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishedState {
    Win(PlayerId),
    Draw,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    WaitingForPlayers,
    Turn(PlayerId),
    Finished(FinishedState),
}

impl GameState {
    pub fn is_finished(&self) -> bool {
        matches!(self, GameState::Finished(_))
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GameState::WaitingForPlayers => f.write_str("waiting for players"),
            GameState::Turn(id) => write!(f, "{} to move", id),
            GameState::Finished(FinishedState::Win(id)) => write!(f, "{} won", id),
            GameState::Finished(FinishedState::Draw) => f.write_str("draw"),
        }
    }
}
