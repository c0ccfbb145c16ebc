//! Legal targets for effect steps.
//!
//! Each helper answers "what could the player pick right now". An empty
//! answer means the step has no eligible target and the procedure ends.

use crate::board::CellId;
use crate::core::{BuildingFamily, MatchState, PlayerId, ResourceKind};

use super::effect::PlaceSource;

/// Units of `kind` the player could place from `source`.
#[must_use]
pub fn place_units(state: &MatchState, player: PlayerId, source: PlaceSource, kind: ResourceKind) -> u32 {
    match source {
        PlaceSource::Supply => state.ledger.supply()[kind],
        PlaceSource::Collected => state.ledger.collected(player)[kind],
    }
}

#[must_use]
pub fn place_cells(state: &MatchState, kind: ResourceKind) -> Vec<CellId> {
    state.board.placeable_cells(kind)
}

/// Materials a chosen-material Place effect could use at all.
#[must_use]
pub fn placeable_materials(state: &MatchState, player: PlayerId, source: PlaceSource) -> Vec<ResourceKind> {
    ResourceKind::LAYERED
        .into_iter()
        .filter(|&k| place_units(state, player, source, k) > 0 && !place_cells(state, k).is_empty())
        .collect()
}

/// Diggable cells next to the player's pawns. `material` filters by
/// layer, so a gold-bearing stone matches `Stone`.
#[must_use]
pub fn dig_cells(state: &MatchState, player: PlayerId, material: Option<ResourceKind>) -> Vec<CellId> {
    state
        .board
        .cells_near_pawns(player)
        .into_iter()
        .filter(|&c| state.board.is_diggable(c))
        .filter(|&c| match material {
            None => true,
            Some(m) => state.board.tile(c).and_then(|t| t.layer.material()) == Some(m),
        })
        .collect()
}

/// Cells of `victim`'s buildings that may still be hit.
#[must_use]
pub fn damage_cells(
    state: &MatchState,
    victim: PlayerId,
    family: Option<BuildingFamily>,
    already_hit: &[CellId],
) -> Vec<CellId> {
    let mut cells: Vec<CellId> = state
        .board
        .buildings_of(victim)
        .filter(|b| family.map_or(true, |f| b.kind.family() == f))
        .map(|b| b.cell)
        .filter(|c| !already_hit.contains(c))
        .collect();
    cells.sort_unstable();
    cells
}

/// Building families `victim` currently has on the board.
#[must_use]
pub fn damage_families(state: &MatchState, victim: PlayerId) -> Vec<BuildingFamily> {
    BuildingFamily::ALL
        .into_iter()
        .filter(|&f| state.board.buildings_of(victim).any(|b| b.kind.family() == f))
        .collect()
}

/// Resource kinds that could be stolen from `victim`.
#[must_use]
pub fn steal_options(state: &MatchState, victim: PlayerId, kind: Option<ResourceKind>) -> Vec<ResourceKind> {
    ResourceKind::ALL
        .into_iter()
        .filter(|&k| kind.map_or(true, |only| only == k))
        .filter(|&k| state.ledger.stealable(victim, k) > 0)
        .collect()
}

#[must_use]
pub fn claim_options(state: &MatchState) -> Vec<ResourceKind> {
    state.ledger.supply().nonzero().map(|(k, _)| k).collect()
}

/// Stone cells whose gold status is still hidden.
#[must_use]
pub fn flip_cells(state: &MatchState) -> Vec<CellId> {
    state
        .board
        .topology()
        .cells()
        .filter(|&c| state.board.is_flippable(c))
        .collect()
}

#[must_use]
pub fn pawn_can_move(state: &MatchState, player: PlayerId) -> bool {
    state
        .board
        .pawns_of(player)
        .any(|p| !state.board.move_targets(p.id).is_empty())
}

/// Damage dealt for a d4 roll: 1 misses, 2-3 hit once, 4 hits twice.
#[must_use]
pub const fn damage_for_roll(roll: u32) -> u8 {
    match roll {
        0 | 1 => 0,
        2 | 3 => 1,
        _ => 2,
    }
}
