//! Turn phases and per-turn counters.
//!
//! ```text
//! Idle --StartTurn--> First --ToThen--> Then --ToFinally--> Finally --EndTurn--> Idle (other player)
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PlayerMap, Rejection};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    First,
    Then,
    Finally,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Idle => "Idle",
            Phase::First => "First",
            Phase::Then => "Then",
            Phase::Finally => "Finally",
        };
        f.write_str(name)
    }
}

/// Round, active player, phase and the counters that reset each turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub round: u32,
    pub current: PlayerId,
    pub phase: Phase,
    starting: PlayerId,
    /// The free First-phase pawn step was taken.
    pub first_move_used: bool,
    /// Then-phase actions committed this turn.
    pub then_actions: u32,
    /// Cards activated this Finally phase.
    pub activations_used: u32,
    /// End-of-turn draw already happened (hand-limit discard pending).
    pub end_draw_done: bool,
    /// Whether each player has drawn their starting hand.
    pub opened: PlayerMap<bool>,
}

impl TurnState {
    #[must_use]
    pub fn new(starting: PlayerId) -> Self {
        Self {
            round: 1,
            current: starting,
            phase: Phase::Idle,
            starting,
            first_move_used: false,
            then_actions: 0,
            activations_used: 0,
            end_draw_done: false,
            opened: PlayerMap::default(),
        }
    }

    #[must_use]
    pub fn starting_player(&self) -> PlayerId {
        self.starting
    }

    /// Reject unless it is `player`'s turn.
    pub fn require_player(&self, player: PlayerId, action: &str) -> Result<(), Rejection> {
        if player != self.current {
            return Err(Rejection::illegal(
                action,
                format!("it is {}'s turn", self.current),
            ));
        }
        Ok(())
    }

    /// Idle -> First, clearing the per-turn counters.
    pub fn begin(&mut self) {
        self.phase = Phase::First;
        self.first_move_used = false;
        self.then_actions = 0;
        self.activations_used = 0;
        self.end_draw_done = false;
    }

    /// Finally -> Idle for the other player. Returns true when a new
    /// round began.
    pub fn pass(&mut self) -> bool {
        self.phase = Phase::Idle;
        self.current = self.current.other();
        if self.current == self.starting {
            self.round += 1;
            true
        } else {
            false
        }
    }
}
