pub mod core;
pub mod storage;

pub use crate::core::connect_four::{GameEngine, GameSnapshot};
pub use crate::core::{
    FinishedState, GameState, InsertError, JoinError, LockedError, PlayerId, Seat, SelectError,
};
pub use crate::storage::{GameId, GameStorage, StorageError};
