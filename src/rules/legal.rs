//! Legal action enumeration.
//!
//! Lists the actions `Match::submit_action` would accept right now. Card
//! activations are listed when the cost is affordable; an activation can
//! still be refused later (no open persistent slot).

use super::engine::Match;
use super::turn::Phase;
use crate::board::Layer;
use crate::core::{
    ActionKind, BuildingKind, MatchState, PaymentPurpose, Pending, PlayerId, ResourceKind,
};

impl Match {
    /// Actions `player` may submit in the current state.
    #[must_use]
    pub fn legal_actions(&self, player: PlayerId) -> Vec<ActionKind> {
        let state = self.state();
        if state.is_over() || state.turn.current != player {
            return Vec::new();
        }
        if let Some(pending) = &state.pending {
            let cancellable = !matches!(
                pending,
                Pending::Payment(p) if p.purpose == PaymentPurpose::HandLimit
            );
            return if cancellable { vec![ActionKind::Back] } else { Vec::new() };
        }

        let mut actions = Vec::new();
        match state.turn.phase {
            Phase::Idle => actions.push(ActionKind::StartTurn),
            Phase::First => {
                if !state.turn.first_move_used {
                    push_pawn_moves(state, player, &mut actions);
                }
                actions.push(ActionKind::ToThen);
            }
            Phase::Then => {
                if self.then_action_ready(player) {
                    push_pawn_moves(state, player, &mut actions);
                    for cell in state.board.cells_near_pawns(player) {
                        if !state.board.is_diggable(cell) {
                            continue;
                        }
                        actions.push(ActionKind::dig(cell));
                        // Offered for every stone so the list gives no gold away.
                        if state.board.tile(cell).is_some_and(|t| t.layer == Layer::Stone) {
                            actions.push(ActionKind::Dig {
                                cell,
                                reveal_gold: false,
                            });
                        }
                    }
                    for kind in BuildingKind::ALL {
                        if state.buildings.quote(player, kind).is_err() {
                            continue;
                        }
                        for cell in state.board.cells_near_pawns(player) {
                            if state.board.check_building_site(player, kind, cell).is_ok() {
                                actions.push(ActionKind::Build { kind, cell });
                            }
                        }
                    }
                    let has_gold = state.ledger.refined(player)[ResourceKind::Gold] > 0;
                    if has_gold && state.zones.hand(player).open_slot().is_some() {
                        actions.push(ActionKind::Retrieve);
                    }
                }
                actions.push(ActionKind::ToFinally);
            }
            Phase::Finally => {
                let budget = state.config.card_activations_base
                    + state.buildings.player(player).built(BuildingKind::Burrow);
                if state.turn.activations_used < budget {
                    let refined = state.ledger.refined(player);
                    for card in state.zones.hand(player).cards() {
                        let affordable = self
                            .rules()
                            .definition_of(&state.zones, card)
                            .is_some_and(|def| refined.covers(&def.cost));
                        if affordable {
                            actions.push(ActionKind::ActivateCard { card });
                        }
                    }
                }
                actions.push(ActionKind::EndTurn);
            }
        }
        actions
    }
}

fn push_pawn_moves(state: &MatchState, player: PlayerId, actions: &mut Vec<ActionKind>) {
    for pawn in state.board.pawns_of(player) {
        for to in state.board.move_targets(pawn.id) {
            actions.push(ActionKind::MovePawn { pawn: pawn.id, to });
        }
    }
}
