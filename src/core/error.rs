use super::{PlayerId, COLUMNS};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum JoinError {
    #[error("invalid player id")]
    InvalidId,
    #[error("player {id} already joined the game")]
    AlreadyJoined { id: PlayerId },
    #[error("game is already full")]
    GameFull,
}

impl JoinError {
    pub fn already_joined(id: impl Into<PlayerId>) -> Self {
        Self::AlreadyJoined { id: id.into() }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SelectError {
    #[error("player {id} is not in the game")]
    NotInGame { id: PlayerId },
    #[error("it is not {id}'s turn")]
    NotYourTurn { id: PlayerId },
    #[error("invalid column (expected: 1-{max}, found: {found})", max = COLUMNS)]
    InvalidColumn { found: i32 },
    #[error("column {column} is already full")]
    ColumnFull { column: usize },
}

impl SelectError {
    pub fn not_in_game(id: impl Into<PlayerId>) -> Self {
        Self::NotInGame { id: id.into() }
    }

    pub fn not_your_turn(id: impl Into<PlayerId>) -> Self {
        Self::NotYourTurn { id: id.into() }
    }
}

/// The board got filled by the last move, the game ended in a draw.
/// Unlike [`SelectError`] the move that triggered it has been applied.
#[derive(thiserror::Error, Debug, PartialEq)]
#[error("board is full, the game ended in a draw")]
pub struct LockedError;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum InsertError {
    #[error(transparent)]
    Select(#[from] SelectError),
    #[error(transparent)]
    Locked(#[from] LockedError),
}

impl InsertError {
    /// Returns `true` if the move was applied before the error was raised.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Locked(_))
    }
}
