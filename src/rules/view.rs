//! Per-player read-only view of a match.
//!
//! Hidden information is filtered here: a viewer sees card identities and
//! the gold card count of their own hand only, and a tile's gold only once
//! it is revealed. An opponent's pending gold choice is not shown.

use serde::Serialize;

use super::engine::GameResult;
use super::turn::Phase;
use crate::board::{Building, BuildingId, CellId, Layer, Pawn, PawnId};
use crate::cards::DeckKind;
use crate::core::{Awaiting, MatchState, PlayerId, PlayerMap, ResourceMap};
use crate::economy::PlayerBuildings;
use crate::zones::CardUid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TileView {
    pub cell: CellId,
    pub layer: Layer,
    /// `None` while hidden.
    pub has_gold: Option<bool>,
    pub pawn: Option<PawnId>,
    pub building: Option<BuildingId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub score: u32,
    pub collected: ResourceMap,
    pub refined: ResourceMap,
    pub hand_size: u32,
    /// Gold cards in hand, for the viewer's own hand only.
    pub gold_cards: Option<u32>,
    /// Card identities, for the viewer's own hand only.
    pub hand: Option<Vec<CardUid>>,
    /// Persistent cards are public.
    pub persistent: Vec<CardUid>,
    pub buildings: PlayerBuildings,
}

#[derive(Clone, Debug, Serialize)]
pub struct MatchView {
    pub viewer: PlayerId,
    pub round: u32,
    pub current: PlayerId,
    pub phase: Phase,
    pub supply: ResourceMap,
    pub tiles: Vec<TileView>,
    pub pawns: Vec<Pawn>,
    pub buildings: Vec<Building>,
    pub players: PlayerMap<PlayerView>,
    pub universal_remaining: usize,
    pub gold_remaining: usize,
    pub discard_size: usize,
    pub awaiting: Option<(PlayerId, Awaiting)>,
    pub result: Option<GameResult>,
}

impl MatchView {
    #[must_use]
    pub fn build(state: &MatchState, viewer: PlayerId) -> Self {
        let tiles = state
            .board
            .tiles()
            .map(|(cell, tile)| TileView {
                cell,
                layer: tile.layer,
                has_gold: tile.revealed.then_some(tile.has_gold),
                pawn: tile.pawn,
                building: tile.building,
            })
            .collect();

        let players = PlayerMap::new(|player| {
            let hand = state.zones.hand(player);
            PlayerView {
                score: state.score(player),
                collected: *state.ledger.collected(player),
                refined: *state.ledger.refined(player),
                hand_size: hand.len(),
                gold_cards: (player == viewer).then(|| hand.gold_cards()),
                hand: (player == viewer).then(|| hand.cards().collect()),
                persistent: hand.persistent().map(|p| p.card).collect(),
                buildings: state.buildings.player(player).clone(),
            }
        });

        let deck = state.zones.deck();
        Self {
            viewer,
            round: state.turn.round,
            current: state.turn.current,
            phase: state.turn.phase,
            supply: *state.ledger.supply(),
            tiles,
            pawns: state.board.pawns().to_vec(),
            buildings: state.board.buildings().to_vec(),
            players,
            universal_remaining: deck.remaining(DeckKind::Universal),
            gold_remaining: deck.remaining(DeckKind::Gold),
            discard_size: deck.discard_len(),
            awaiting: state.awaiting().filter(|(who, awaiting)| {
                *who == viewer || !matches!(awaiting, Awaiting::GoldChoice { .. })
            }),
            result: state.result.clone(),
        }
    }

    #[must_use]
    pub fn tile(&self, cell: CellId) -> Option<&TileView> {
        self.tiles.get(cell.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::standard_cards;
    use crate::core::MatchConfig;

    fn state() -> MatchState {
        let (_, decks) = standard_cards();
        let mut state = MatchState::new(MatchConfig::default(), &decks, PlayerId::ONE, 3).unwrap();
        for _ in 0..3 {
            state.zones.draw(PlayerId::ONE, DeckKind::Universal, &mut state.rng);
            state.zones.draw(PlayerId::TWO, DeckKind::Universal, &mut state.rng);
        }
        state
    }

    #[test]
    fn test_opponent_hand_hidden() {
        let state = state();
        let view = MatchView::build(&state, PlayerId::ONE);

        assert_eq!(view.players[PlayerId::ONE].hand.as_ref().map(Vec::len), Some(3));
        assert!(view.players[PlayerId::TWO].hand.is_none());
        assert_eq!(view.players[PlayerId::TWO].hand_size, 3);
        assert!(view.players[PlayerId::ONE].gold_cards.is_some());
        assert_eq!(view.players[PlayerId::TWO].gold_cards, None);
    }

    #[test]
    fn test_gold_hidden_until_revealed() {
        let state = state();
        let view = MatchView::build(&state, PlayerId::TWO);
        assert!(view.tiles.iter().all(|t| t.has_gold.is_none()));
        assert_eq!(view.tiles.len(), 49);
    }
}
