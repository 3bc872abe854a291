use std::fmt::{Display, Formatter};

use generic_array::typenum::{U6, U7};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, info};

use super::grid::{Direction, Grid, GridIndex, WithGridIndex};
use super::roster::Roster;
use super::{
    GameState, InsertError, JoinError, LockedError, PlayerId, Seat, SelectError, COLUMNS,
    EMPTY_MARKER, ROWS, WIN_LENGTH,
};

type Cell = Option<PlayerId>;
type Board = Grid<Cell, U7, U6>;

/// Positions of four pieces in a row.
pub type Line = [GridIndex; WIN_LENGTH];

/// Serializable view of a game.
/// `cells` is indexed `[column][row]`, row 0 being the bottom one.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub players: Vec<PlayerId>,
    pub turn: Option<PlayerId>,
    pub cells: Vec<Vec<Cell>>,
}

/// Rules engine of a single two-player game on a 7x6 board.
///
/// The random source `R` only decides who moves first once the second player joins.
#[derive(Clone, Debug)]
pub struct GameEngine<R = ChaCha8Rng> {
    board: Board,
    roster: Roster,
    rng: R,
}

impl GameEngine<ChaCha8Rng> {
    pub fn new() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl Default for GameEngine<ChaCha8Rng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> GameEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            board: Board::default(),
            roster: Roster::default(),
            rng,
        }
    }

    /// Adds `id` to the game. The second join picks the first mover at random.
    pub fn join(&mut self, id: &str) -> Result<(), JoinError> {
        let seat = self.roster.push(id)?;
        debug!(player = id, ?seat, "player joined");

        if self.roster.is_full() {
            let first = if self.rng.gen_bool(0.5) {
                Seat::Red
            } else {
                Seat::Blue
            };
            self.roster.start(first);
            debug!(player = ?self.roster.current(), "first turn assigned");
        }
        Ok(())
    }

    /// Drops a piece of `id` into `column` (1-based).
    ///
    /// Returns `true` if the board holds four in a row after the move.
    /// Rejections leave the game untouched. [`InsertError::Locked`] means the
    /// piece was placed and filled the board.
    pub fn insert(&mut self, id: &str, column: i32) -> Result<bool, InsertError> {
        if !self.roster.contains(id) {
            return Err(SelectError::not_in_game(id).into());
        }
        if self.roster.current().map(String::as_str) != Some(id) {
            return Err(SelectError::not_your_turn(id).into());
        }
        let col = column_index(column)?;
        let row = self
            .board
            .line(GridIndex::new(col, 0), Direction::Up)
            .position(Option::is_none)
            .ok_or(SelectError::ColumnFull { column: col + 1 })?;

        self.board[GridIndex::new(col, row)] = Some(id.to_owned());
        debug!(player = id, column, row, "piece placed");

        // A full board ends the game as a draw even if this piece also completed a line.
        if self.is_full() {
            info!("board is full");
            return Err(LockedError.into());
        }

        self.roster.advance();
        let line = self.winning_line();
        if let Some(line) = &line {
            info!(player = id, from = %line[0], to = %line[WIN_LENGTH - 1], "four in a row");
        }
        Ok(line.is_some())
    }

    pub fn current_turn(&self) -> Option<&str> {
        self.roster.current().map(String::as_str)
    }
}

impl<R> GameEngine<R> {
    pub fn players(&self) -> &[PlayerId] {
        self.roster.as_slice()
    }

    pub fn seat_of(&self, id: &str) -> Option<Seat> {
        self.roster.seat_of(id)
    }

    /// Turn state as far as the engine knows it, a finished game is tracked by the owner.
    pub fn state(&self) -> GameState {
        match self.roster.current() {
            Some(id) => GameState::Turn(id.clone()),
            None => GameState::WaitingForPlayers,
        }
    }

    pub fn is_full(&self) -> bool {
        self.board.all_indexed().all(|(_, cell)| cell.is_some())
    }

    /// Finds the first four in a row on the whole board.
    /// Lines are scanned vertically, horizontally, then along both diagonals.
    pub fn winning_line(&self) -> Option<Line> {
        Direction::ALL
            .into_iter()
            .flat_map(|direction| self.board.lines(direction))
            .filter(|line| line.clone().count() >= WIN_LENGTH)
            .find_map(|line| find_run(line.indexed()))
    }

    /// Multi-line picture of the board, top row first.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Board contents indexed `[column][row]`.
    pub fn cells_snapshot(&self) -> Vec<Vec<Cell>> {
        self.board.iter().map(|column| column.to_vec()).collect()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            players: self.roster.as_slice().to_vec(),
            turn: self.roster.current().cloned(),
            cells: self.cells_snapshot(),
        }
    }
}

impl<R> Display for GameEngine<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in (0..ROWS).rev() {
            for col in 0..COLUMNS {
                let marker = match &self.board[GridIndex::new(col, row)] {
                    None => EMPTY_MARKER,
                    Some(id) if self.roster.seat_of(id) == Some(Seat::Red) => Seat::Red.marker(),
                    Some(_) => Seat::Blue.marker(),
                };
                f.write_str(marker)?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

fn column_index(column: i32) -> Result<usize, SelectError> {
    match usize::try_from(column) {
        Ok(col @ 1..=COLUMNS) => Ok(col - 1),
        _ => Err(SelectError::InvalidColumn { found: column }),
    }
}

/// Returns the first run of [`WIN_LENGTH`] equal, non-empty cells.
/// An empty cell or a different owner restarts the run.
fn find_run<'a, I>(cells: I) -> Option<Line>
where
    I: Iterator<Item = (GridIndex, &'a Cell)>,
{
    let mut owner: Option<&PlayerId> = None;
    let mut run = SmallVec::<Line>::new();
    for (index, cell) in cells {
        match cell {
            Some(id) if owner == Some(id) => run.push(index),
            Some(id) => {
                owner = Some(id);
                run.clear();
                run.push(index);
            }
            None => {
                owner = None;
                run.clear();
            }
        }
        if run.len() == WIN_LENGTH {
            return run.into_inner().ok();
        }
    }
    None
}
