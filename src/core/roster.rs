use smallvec::SmallVec;

use super::{JoinError, PlayerId, Seat};

/// Players in join order together with the turn pointer.
/// The turn pointer is set once both seats are taken and alternates from then on.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    players: SmallVec<[PlayerId; 2]>,
    turn: Option<Seat>,
}

impl Roster {
    pub fn as_slice(&self) -> &[PlayerId] {
        self.players.as_slice()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() == 2
    }

    pub fn contains(&self, id: &str) -> bool {
        self.players.iter().any(|player| player == id)
    }

    pub fn seat_of(&self, id: &str) -> Option<Seat> {
        self.players
            .iter()
            .position(|player| player == id)
            .and_then(Seat::from_position)
    }

    pub fn get(&self, seat: Seat) -> Option<&PlayerId> {
        self.players.get(seat.position())
    }

    /// Appends `id` and returns the seat it got.
    pub fn push(&mut self, id: &str) -> Result<Seat, JoinError> {
        if id.is_empty() {
            return Err(JoinError::InvalidId);
        }
        if self.contains(id) {
            return Err(JoinError::already_joined(id));
        }
        let seat = Seat::from_position(self.players.len()).ok_or(JoinError::GameFull)?;
        self.players.push(id.to_owned());
        Ok(seat)
    }

    /// Sets the turn pointer to `seat`, has no effect until both seats are taken.
    pub fn start(&mut self, seat: Seat) {
        if self.is_full() {
            self.turn = Some(seat);
        }
    }

    /// Player allowed to make the next move.
    pub fn current(&self) -> Option<&PlayerId> {
        self.turn.and_then(|seat| self.get(seat))
    }

    /// Hands the turn to the other player and returns them.
    pub fn advance(&mut self) -> Option<&PlayerId> {
        self.turn = self.turn.map(Seat::other);
        self.current()
    }
}
