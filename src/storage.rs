use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::core::connect_four::{GameEngine, GameSnapshot};
use crate::core::{FinishedState, GameState, InsertError, JoinError, SelectError};

pub type GameId = u64;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StorageError {
    #[error("game with this id already exists: {id}")]
    DuplicateGame { id: GameId },
    #[error("game with this id doesn't exist: {id}")]
    NoSuchGame { id: GameId },
    #[error("can't make a move on a finished game")]
    GameIsFinished,
    #[error("game must be finished before deletion")]
    DeleteActiveGameFailed,
    #[error("failed to lock inner mutex: {reason}")]
    MutexPoison { reason: String },
    #[error(transparent)]
    Join(#[from] JoinError),
    #[error(transparent)]
    Select(#[from] SelectError),
}

impl<T> From<PoisonError<T>> for StorageError {
    fn from(value: PoisonError<T>) -> Self {
        Self::MutexPoison {
            reason: value.to_string(),
        }
    }
}

/// A game together with the outcome the engine doesn't track itself.
#[derive(Debug)]
struct Session {
    engine: GameEngine,
    state: GameState,
}

type GameMap = HashMap<GameId, Arc<Mutex<Session>>>;

/// Registry of running games.
///
/// The map lock is only held to look games up, every game has its own lock so
/// moves in one game are serialized while different games run in parallel.
#[derive(Clone, Debug, Default)]
pub struct GameStorage {
    games: Arc<Mutex<GameMap>>,
    seed: Option<u64>,
}

impl GameStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose games pick their first turn deterministically, derived from `seed` and the game id.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn create(&self, id: GameId) -> StorageResult<()> {
        let mut guard = self.games.lock()?;
        match guard.entry(id) {
            Entry::Vacant(e) => {
                let engine = match self.seed {
                    Some(seed) => GameEngine::with_rng(ChaCha8Rng::seed_from_u64(seed ^ id)),
                    None => GameEngine::new(),
                };
                e.insert(Arc::new(Mutex::new(Session {
                    engine,
                    state: GameState::WaitingForPlayers,
                })));
                info!(game = id, "game created");
                Ok(())
            }
            Entry::Occupied(_) => Err(StorageError::DuplicateGame { id }),
        }
    }

    pub fn join(&self, id: GameId, player: &str) -> StorageResult<GameState> {
        let session = self.session(id)?;
        let mut guard = session.lock()?;
        if let Err(err) = guard.engine.join(player) {
            warn!(game = id, player, %err, "join rejected");
            return Err(err.into());
        }
        guard.state = guard.engine.state();
        Ok(guard.state.clone())
    }

    /// Applies a move and returns the resulting state of the game.
    pub fn insert(&self, id: GameId, player: &str, column: i32) -> StorageResult<GameState> {
        let session = self.session(id)?;
        let mut guard = session.lock()?;
        let session = &mut *guard;
        if session.state.is_finished() {
            return Err(StorageError::GameIsFinished);
        }

        let state = match session.engine.insert(player, column) {
            Ok(true) => GameState::Finished(FinishedState::Win(player.to_owned())),
            Ok(false) => session.engine.state(),
            Err(InsertError::Locked(_)) => GameState::Finished(FinishedState::Draw),
            Err(InsertError::Select(err)) => {
                warn!(game = id, player, column, %err, "move rejected");
                return Err(err.into());
            }
        };
        if state.is_finished() {
            info!(game = id, %state, "game finished");
        }
        session.state = state.clone();
        Ok(state)
    }

    pub fn state(&self, id: GameId) -> StorageResult<GameState> {
        let session = self.session(id)?;
        let guard = session.lock()?;
        Ok(guard.state.clone())
    }

    pub fn render(&self, id: GameId) -> StorageResult<String> {
        let session = self.session(id)?;
        let guard = session.lock()?;
        Ok(guard.engine.render())
    }

    pub fn snapshot(&self, id: GameId) -> StorageResult<GameSnapshot> {
        let session = self.session(id)?;
        let guard = session.lock()?;
        Ok(guard.engine.snapshot())
    }

    /// Removes a finished game. Unknown ids are ignored.
    pub fn delete(&self, id: GameId) -> StorageResult<()> {
        let mut guard = self.games.lock()?;
        if let Entry::Occupied(e) = guard.entry(id) {
            if !e.get().lock()?.state.is_finished() {
                return Err(StorageError::DeleteActiveGameFailed);
            }
            e.remove();
            info!(game = id, "game deleted");
        }
        Ok(())
    }

    /// Ids of the games `player` has joined, in ascending order.
    pub fn player_games(&self, player: &str) -> StorageResult<Vec<GameId>> {
        let guard = self.games.lock()?;
        let mut ids = Vec::new();
        for (id, session) in guard.iter() {
            if session.lock()?.engine.seat_of(player).is_some() {
                ids.push(*id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    fn session(&self, id: GameId) -> StorageResult<Arc<Mutex<Session>>> {
        let guard = self.games.lock()?;
        let session = guard.get(&id).cloned();
        session.ok_or(StorageError::NoSuchGame { id })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Creates game 1 with players "a" and "b" and returns the one to move first.
    fn started_game(storage: &GameStorage) -> (String, String) {
        storage.create(1).unwrap();
        storage.join(1, "a").unwrap();
        match storage.join(1, "b").unwrap() {
            GameState::Turn(first) if first == "a" => ("a".into(), "b".into()),
            GameState::Turn(_) => ("b".into(), "a".into()),
            state => panic!("unexpected state: {:?}", state),
        }
    }

    #[test]
    fn test_create_duplicate() {
        let storage = GameStorage::new();
        storage.create(7).unwrap();
        assert_eq!(storage.create(7), Err(StorageError::DuplicateGame { id: 7 }));
        assert_eq!(storage.state(7), Ok(GameState::WaitingForPlayers));
    }

    #[test]
    fn test_no_such_game() {
        let storage = GameStorage::new();
        assert_eq!(storage.join(3, "a"), Err(StorageError::NoSuchGame { id: 3 }));
        assert_eq!(
            storage.insert(3, "a", 1),
            Err(StorageError::NoSuchGame { id: 3 })
        );
        assert!(storage.render(3).is_err());
        // deleting a missing game is fine
        assert_eq!(storage.delete(3), Ok(()));
    }

    #[test]
    fn test_join_errors_are_forwarded() {
        let storage = GameStorage::new();
        storage.create(1).unwrap();
        assert_eq!(storage.join(1, ""), Err(JoinError::InvalidId.into()));
        assert_eq!(storage.join(1, "a"), Ok(GameState::WaitingForPlayers));
        assert_eq!(
            storage.join(1, "a"),
            Err(JoinError::already_joined("a").into())
        );
    }

    #[test]
    fn test_win_finishes_game() {
        let storage = GameStorage::new();
        let (first, second) = started_game(&storage);
        for _ in 0..3 {
            storage.insert(1, &first, 1).unwrap();
            storage.insert(1, &second, 2).unwrap();
        }
        assert_eq!(
            storage.insert(1, &first, 1),
            Ok(GameState::Finished(FinishedState::Win(first.clone())))
        );
        assert_eq!(
            storage.insert(1, &second, 2),
            Err(StorageError::GameIsFinished)
        );
        assert!(storage.state(1).unwrap().is_finished());
    }

    #[test]
    fn test_delete_requires_finished_game() {
        let storage = GameStorage::new();
        let (first, second) = started_game(&storage);
        assert_eq!(storage.delete(1), Err(StorageError::DeleteActiveGameFailed));

        for _ in 0..3 {
            storage.insert(1, &first, 4).unwrap();
            storage.insert(1, &second, 5).unwrap();
        }
        storage.insert(1, &first, 4).unwrap();
        assert_eq!(storage.delete(1), Ok(()));
        assert_eq!(storage.state(1), Err(StorageError::NoSuchGame { id: 1 }));
    }

    #[test]
    fn test_rejected_move_keeps_turn() {
        let storage = GameStorage::new();
        let (first, second) = started_game(&storage);
        assert_eq!(
            storage.insert(1, &second, 1),
            Err(SelectError::not_your_turn(second.clone()).into())
        );
        assert_eq!(
            storage.insert(1, &first, 0),
            Err(SelectError::InvalidColumn { found: 0 }.into())
        );
        assert_eq!(storage.state(1), Ok(GameState::Turn(first.clone())));
        assert_eq!(storage.insert(1, &first, 1), Ok(GameState::Turn(second)));
    }

    #[test]
    fn test_player_games() {
        let storage = GameStorage::new();
        for id in [3, 1, 2] {
            storage.create(id).unwrap();
        }
        storage.join(3, "a").unwrap();
        storage.join(1, "a").unwrap();
        storage.join(2, "b").unwrap();
        assert_eq!(storage.player_games("a"), Ok(vec![1, 3]));
        assert_eq!(storage.player_games("b"), Ok(vec![2]));
        assert_eq!(storage.player_games("c"), Ok(vec![]));
    }

    #[test]
    fn test_seeded_storage_is_deterministic() {
        let turns: Vec<_> = (0..2)
            .map(|_| {
                let storage = GameStorage::with_seed(42);
                (1..=8)
                    .map(|id| {
                        storage.create(id).unwrap();
                        storage.join(id, "a").unwrap();
                        storage.join(id, "b").unwrap()
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        assert_eq!(turns[0], turns[1]);
    }
}
