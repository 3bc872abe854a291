extern crate connect_four;

use std::thread;

use connect_four::{FinishedState, GameState, GameStorage, StorageError};

/// Joins "a" and "b" to game `id` and returns them in move order.
fn start(storage: &GameStorage, id: u64) -> [String; 2] {
    storage.create(id).unwrap();
    storage.join(id, "a").unwrap();
    match storage.join(id, "b").unwrap() {
        GameState::Turn(first) if first == "a" => ["a".into(), "b".into()],
        GameState::Turn(_) => ["b".into(), "a".into()],
        state => panic!("unexpected state: {:?}", state),
    }
}

#[test]
fn games_run_in_parallel() {
    let storage = GameStorage::new();
    let handles: Vec<_> = (0..8)
        .map(|id| {
            let storage = storage.clone();
            thread::spawn(move || {
                let [first, second] = start(&storage, id);
                for _ in 0..3 {
                    storage.insert(id, &first, 1).unwrap();
                    storage.insert(id, &second, 2).unwrap();
                }
                storage.insert(id, &first, 1).unwrap()
            })
        })
        .collect();

    for handle in handles {
        let state = handle.join().unwrap();
        assert!(matches!(state, GameState::Finished(FinishedState::Win(_))));
    }
    for id in 0..8 {
        storage.delete(id).unwrap();
    }
}

#[test]
fn concurrent_moves_in_one_game_are_serialized() {
    let storage = GameStorage::new();
    let players = start(&storage, 1);

    // both players hammer the same game, only moves on their own turn go through
    let handles: Vec<_> = players
        .iter()
        .cloned()
        .map(|player| {
            let storage = storage.clone();
            thread::spawn(move || {
                let mut applied = 0;
                while applied < 3 {
                    match storage.insert(1, &player, 3 + applied) {
                        Ok(_) => applied += 1,
                        Err(StorageError::Select(_)) => thread::yield_now(),
                        Err(err) => panic!("unexpected error: {}", err),
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = storage.snapshot(1).unwrap();
    let placed = snapshot.cells.iter().flatten().filter(|cell| cell.is_some()).count();
    assert_eq!(placed, 6);
    assert_eq!(storage.state(1), Ok(GameState::Turn(players[0].clone())));
}

#[test]
fn render_goes_through_storage() {
    let storage = GameStorage::with_seed(1);
    let [first, _] = start(&storage, 5);
    storage.insert(5, &first, 4).unwrap();
    let board = storage.render(5).unwrap();
    assert_eq!(board.lines().count(), 6);
    assert_ne!(board.lines().last(), Some("\u{26AA}".repeat(7).as_str()));
}
