//! Actions, selections and their results.
//!
//! An action is a turn-level command (dig, build, activate a card, change
//! phase). A selection answers a pending request for input: the cards to
//! pay with, the cell an effect should hit, the resource to steal.
//!
//! Every submission returns an [`ActionResult`]: accepted with the events
//! it produced, or rejected with the reason and no state change.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::building::{BuildingFamily, BuildingKind};
use super::error::Rejection;
use super::event::MatchEvent;
use super::player::PlayerId;
use super::resource::ResourceKind;
use crate::board::{CellId, PawnId};
use crate::cards::CardRequirement;
use crate::rules::Phase;
use crate::zones::CardUid;

/// A turn-level command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    StartTurn,
    ToThen,
    MovePawn { pawn: PawnId, to: CellId },
    /// `reveal_gold` takes a gold-bearing stone as Gold; otherwise it
    /// surfaces as Stone and the gold stays hidden.
    Dig { cell: CellId, reveal_gold: bool },
    Build { kind: BuildingKind, cell: CellId },
    /// Spend one refined Gold to draw from the gold deck.
    Retrieve,
    ToFinally,
    ActivateCard { card: CardUid },
    EndTurn,
    /// Cancel the pending payment or effect procedure.
    Back,
}

impl ActionKind {
    /// Dig `cell`, taking gold if there is any.
    #[must_use]
    pub const fn dig(cell: CellId) -> Self {
        ActionKind::Dig {
            cell,
            reveal_gold: true,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            ActionKind::StartTurn => "StartTurn",
            ActionKind::ToThen => "ToThen",
            ActionKind::MovePawn { .. } => "MovePawn",
            ActionKind::Dig { .. } => "Dig",
            ActionKind::Build { .. } => "Build",
            ActionKind::Retrieve => "Retrieve",
            ActionKind::ToFinally => "ToFinally",
            ActionKind::ActivateCard { .. } => "ActivateCard",
            ActionKind::EndTurn => "EndTurn",
            ActionKind::Back => "Back",
        }
    }

    /// Whether this action may be taken in `phase`.
    #[must_use]
    pub const fn allowed_in(&self, phase: Phase) -> bool {
        match self {
            ActionKind::StartTurn => matches!(phase, Phase::Idle),
            ActionKind::ToThen => matches!(phase, Phase::First),
            ActionKind::MovePawn { .. } => matches!(phase, Phase::First | Phase::Then),
            ActionKind::Dig { .. }
            | ActionKind::Build { .. }
            | ActionKind::Retrieve
            | ActionKind::ToFinally => matches!(phase, Phase::Then),
            ActionKind::ActivateCard { .. } | ActionKind::EndTurn => matches!(phase, Phase::Finally),
            ActionKind::Back => matches!(phase, Phase::Then | Phase::Finally),
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Input for a pending request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Cell(CellId),
    Cards(SmallVec<[CardUid; 8]>),
    Resource(ResourceKind),
    Family(BuildingFamily),
    PawnStep { pawn: PawnId, to: CellId },
    /// Whether to reveal the gold found while digging.
    RevealGold(bool),
    /// Stop an optional sequence early (pawn movement).
    Finish,
}

impl Selection {
    #[must_use]
    pub fn cards(cards: &[CardUid]) -> Self {
        Selection::Cards(SmallVec::from_slice(cards))
    }
}

/// What a cell selection is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellPurpose {
    Place(ResourceKind),
    Dig,
    Damage,
    Flip,
}

/// Description of the input the match is waiting for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Awaiting {
    Cell {
        purpose: CellPurpose,
        candidates: Vec<CellId>,
        remaining: u32,
    },
    Cards { requirement: CardRequirement },
    Resource {
        options: Vec<ResourceKind>,
        remaining: u32,
    },
    Family { options: Vec<BuildingFamily> },
    /// Any own pawn may step; `Selection::Finish` ends early.
    PawnStep { remaining: u32 },
    /// The stone on `cell` holds gold: reveal it or take plain Stone.
    GoldChoice { cell: CellId },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Accepted,
    Rejected(Rejection),
}

/// Result of a submitted action or selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionResult {
    pub outcome: Outcome,
    /// State changes, in order. Empty when rejected.
    pub events: Vec<MatchEvent>,
}

impl ActionResult {
    #[must_use]
    pub fn accepted(events: Vec<MatchEvent>) -> Self {
        Self {
            outcome: Outcome::Accepted,
            events,
        }
    }

    #[must_use]
    pub fn rejected(reason: Rejection) -> Self {
        Self {
            outcome: Outcome::Rejected(reason),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, Outcome::Accepted)
    }

    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match &self.outcome {
            Outcome::Rejected(r) => Some(r),
            Outcome::Accepted => None,
        }
    }
}

/// An accepted input, as kept in the match history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordedInput {
    Action(ActionKind),
    Selection(Selection),
}

/// A recorded input with metadata for history tracking.
///
/// Used for:
/// - Replay (a seed plus the history reproduces the match)
/// - Debugging
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub input: RecordedInput,
    /// Round when the input was accepted.
    pub round: u32,
    /// Position in the match history.
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, input: RecordedInput, round: u32, sequence: u32) -> Self {
        Self {
            player,
            input,
            round,
            sequence,
        }
    }
}
