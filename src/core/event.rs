//! Match events: the state delta reported with every accepted input.

use serde::{Deserialize, Serialize};

use super::action::Awaiting;
use super::building::BuildingKind;
use super::player::PlayerId;
use super::resource::{ResourceKind, ResourceMap};
use crate::board::{CellId, PawnId};
use crate::cards::DeckKind;
use crate::economy::StealSource;
use crate::rules::{GameResult, Phase};
use crate::zones::CardUid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    TurnStarted { player: PlayerId, round: u32 },
    PhaseChanged { player: PlayerId, phase: Phase },
    TurnEnded { player: PlayerId },

    Refined { player: PlayerId, moved: ResourceMap },
    MinesProduced { player: PlayerId, produced: ResourceMap },
    ResourcesSpent { player: PlayerId, cost: ResourceMap },

    CardDrawn { player: PlayerId, card: CardUid, deck: DeckKind, reshuffled: bool },
    /// A draw was skipped because every hand slot is taken.
    HandFull { player: PlayerId },
    DeckEmpty { player: PlayerId, deck: DeckKind },
    CardDiscarded { player: PlayerId, card: CardUid },
    CardActivated { player: PlayerId, card: CardUid },
    CardMadePersistent { player: PlayerId, card: CardUid },
    /// A persistent card cancelled a disaster aimed at its owner.
    DisasterBlocked { player: PlayerId, blocker: CardUid, card: CardUid },

    PawnMoved { player: PlayerId, pawn: PawnId, from: CellId, to: CellId },
    PawnSpawned { player: PlayerId, pawn: PawnId, cell: CellId },
    TileDug { player: PlayerId, cell: CellId, material: ResourceKind },
    TilePlaced { player: PlayerId, cell: CellId, material: ResourceKind },
    GoldRevealed { player: PlayerId, cell: CellId, has_gold: bool },

    BuildingBuilt { player: PlayerId, kind: BuildingKind, cell: CellId, price: u32 },
    BuildingDamaged {
        owner: PlayerId,
        kind: BuildingKind,
        cell: CellId,
        roll: u32,
        damage: u8,
        destroyed: bool,
    },

    ResourceStolen {
        thief: PlayerId,
        victim: PlayerId,
        kind: ResourceKind,
        source: StealSource,
    },
    ResourceClaimed { player: PlayerId, kind: ResourceKind },

    ScoreChanged { player: PlayerId, score: u32 },

    AwaitingInput { player: PlayerId, awaiting: Awaiting },
    SelectionAccepted { player: PlayerId },
    /// A Place effect asked for more than could be placed.
    EffectClamped { card: CardUid, requested: u32, granted: u32 },
    /// An effect ran out of legal targets and finished early.
    NoEligibleTarget { player: PlayerId, card: CardUid, unresolved: u32 },
    EffectResolved { player: PlayerId, card: CardUid },
    /// `Back` dropped the pending payment or procedure.
    PendingCancelled { player: PlayerId },

    MatchEnded { result: GameResult },
}
