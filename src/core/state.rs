//! Match state: everything needed to resume a match exactly.
//!
//! ## MatchState
//!
//! - Configuration and turn state (round, player, phase)
//! - Board (tiles, pawns, buildings)
//! - Resource and building ledgers, scores
//! - Card zones (decks, hands, persistent slots, discard)
//! - The pending payment or effect procedure, if any
//! - RNG state and the input history
//!
//! The whole struct is the save format: `to_bytes`/`from_bytes` encode it
//! with bincode.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::action::{ActionRecord, Awaiting, RecordedInput};
use super::building::BuildingKind;
use super::config::{ConfigError, MatchConfig};
use super::event::MatchEvent;
use super::player::{PlayerId, PlayerMap};
use super::resource::{ResourceKind, ResourceMap};
use super::rng::GameRng;
use crate::board::{Board, CellId};
use crate::cards::{CardRequirement, DeckKind, DeckList};
use crate::economy::{BuildingLedger, ResourceLedger};
use crate::effects::EffectProcedure;
use crate::rules::{GameResult, TurnState};
use crate::zones::{CardUid, CardZones, DrawOutcome};

/// Failure to save or load a match.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Codec(#[from] bincode::Error),

    #[error("snapshot holds an invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// What a card payment is for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentPurpose {
    Build {
        kind: BuildingKind,
        cell: CellId,
        /// Master Builder card that fixed the price, if any.
        discount: Option<CardUid>,
    },
    /// End-of-turn discard down to the hand limit.
    HandLimit,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub player: PlayerId,
    pub purpose: PaymentPurpose,
    pub requirement: CardRequirement,
}

/// Input the match is blocked on. At most one at a time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pending {
    Payment(Payment),
    Effect(EffectProcedure),
}

impl Pending {
    #[must_use]
    pub fn player(&self) -> PlayerId {
        match self {
            Pending::Payment(p) => p.player,
            Pending::Effect(e) => e.player,
        }
    }
}

/// Complete match state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchState {
    pub config: MatchConfig,
    pub board: Board,
    pub ledger: ResourceLedger,
    pub buildings: BuildingLedger,
    pub zones: CardZones,
    pub scores: PlayerMap<u32>,
    pub turn: TurnState,
    pub pending: Option<Pending>,
    pub result: Option<GameResult>,
    pub rng: GameRng,
    pub history: im::Vector<ActionRecord>,
}

impl MatchState {
    /// Set up a fresh match: board, pawns, decks and supply.
    pub fn new(
        config: MatchConfig,
        decks: &DeckList,
        starting: PlayerId,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = GameRng::new(seed);
        let mut board_rng = rng.for_context("board");
        let mut board = Board::new(&config.board, config.gold_cells, &mut board_rng);
        for (player, &cell) in config.starting_pawns.iter() {
            board
                .add_pawn(player, cell)
                .map_err(|_| ConfigError::SharedStart(cell))?;
        }

        Ok(Self {
            board,
            ledger: ResourceLedger::new(config.starting_supply),
            buildings: BuildingLedger::new(
                config.base_building_price,
                config.total_buildings_per_kind,
            ),
            zones: CardZones::new(decks, config.hand_slots, config.persistent_slots),
            scores: PlayerMap::default(),
            turn: TurnState::new(starting),
            pending: None,
            result: None,
            rng,
            history: im::Vector::new(),
            config,
        })
    }

    #[must_use]
    pub fn score(&self, player: PlayerId) -> u32 {
        self.scores[player]
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    /// Who the pending input belongs to and what it asks for.
    #[must_use]
    pub fn awaiting(&self) -> Option<(PlayerId, Awaiting)> {
        let pending = self.pending.as_ref()?;
        let awaiting = match pending {
            Pending::Payment(payment) => Awaiting::Cards {
                requirement: payment.requirement,
            },
            Pending::Effect(procedure) => procedure.awaiting(self),
        };
        Some((pending.player(), awaiting))
    }

    /// Add score; reaching the winning score ends the match.
    pub fn add_score(&mut self, player: PlayerId, points: u32, events: &mut Vec<MatchEvent>) {
        if points == 0 {
            return;
        }
        self.scores[player] += points;
        let score = self.scores[player];
        events.push(MatchEvent::ScoreChanged { player, score });

        if self.result.is_none() && score >= self.config.winning_score {
            let result = GameResult::Winner(player);
            info!("{player} reached {score} points and wins");
            events.push(MatchEvent::MatchEnded { result: result.clone() });
            self.result = Some(result);
        }
    }

    /// Remove score, floored at zero.
    pub fn remove_score(&mut self, player: PlayerId, points: u32, events: &mut Vec<MatchEvent>) {
        let before = self.scores[player];
        let score = before.saturating_sub(points);
        if score != before {
            self.scores[player] = score;
            events.push(MatchEvent::ScoreChanged { player, score });
        }
    }

    /// Draw one card into `player`'s hand, reporting what happened.
    pub fn draw_card(
        &mut self,
        player: PlayerId,
        deck: DeckKind,
        events: &mut Vec<MatchEvent>,
    ) -> DrawOutcome {
        let outcome = self.zones.draw(player, deck, &mut self.rng);
        match outcome {
            DrawOutcome::Drawn(draw) => events.push(MatchEvent::CardDrawn {
                player,
                card: draw.card,
                deck,
                reshuffled: draw.reshuffled,
            }),
            DrawOutcome::HandFull => {
                warn!("{player} has no open hand slot, draw skipped");
                events.push(MatchEvent::HandFull { player });
            }
            DrawOutcome::DeckEmpty => {
                warn!("{player} drew from an empty {deck}");
                events.push(MatchEvent::DeckEmpty { player, deck });
            }
        }
        outcome
    }

    /// Resource units in every pool plus those still on the board.
    ///
    /// Constant over a match. Gold is counted with Stone: a gold-bearing
    /// stone layer surfaces as either, at the digger's choice.
    #[must_use]
    pub fn conserved_total(&self) -> ResourceMap {
        let mut total = self.ledger.totals();
        total.add(&self.board.units_on_board());
        let gold = std::mem::take(&mut total[ResourceKind::Gold]);
        total[ResourceKind::Stone] += gold;
        total
    }

    pub(crate) fn record(&mut self, player: PlayerId, input: RecordedInput) {
        let sequence = self.history.len() as u32;
        self.history
            .push_back(ActionRecord::new(player, input, self.turn.round, sequence));
    }

    /// Encode the state with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a state produced by [`MatchState::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let state: Self = bincode::deserialize(bytes)?;
        state.config.validate()?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::standard_cards;

    fn new_state(seed: u64) -> MatchState {
        let (_, decks) = standard_cards();
        MatchState::new(MatchConfig::default(), &decks, PlayerId::ONE, seed).unwrap()
    }

    #[test]
    fn test_new_places_pawns() {
        let state = new_state(1);
        assert_eq!(state.board.pawns().len(), 2);
        assert_eq!(state.board.pawns_of(PlayerId::TWO).count(), 1);
        assert!(state.pending.is_none());
        assert!(!state.is_over());
    }

    #[test]
    fn test_same_seed_same_board() {
        let gold = |s: &MatchState| {
            s.board
                .tiles()
                .filter(|(_, t)| t.has_gold)
                .map(|(c, _)| c)
                .collect::<Vec<_>>()
        };
        assert_eq!(gold(&new_state(9)), gold(&new_state(9)));
    }

    #[test]
    fn test_add_score_ends_match_at_threshold() {
        let mut state = new_state(1);
        let mut events = Vec::new();

        state.add_score(PlayerId::TWO, 14, &mut events);
        assert!(!state.is_over());
        state.add_score(PlayerId::TWO, 1, &mut events);
        assert_eq!(state.result, Some(GameResult::Winner(PlayerId::TWO)));
        assert!(matches!(events.last(), Some(MatchEvent::MatchEnded { .. })));
    }

    #[test]
    fn test_remove_score_floors_at_zero() {
        let mut state = new_state(1);
        let mut events = Vec::new();
        state.remove_score(PlayerId::ONE, 1, &mut events);
        assert_eq!(state.score(PlayerId::ONE), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_bytes_round_trip() {
        let state = new_state(4);
        let bytes = state.to_bytes().unwrap();
        let back = MatchState::from_bytes(&bytes).unwrap();
        assert_eq!(back.conserved_total(), state.conserved_total());
        assert_eq!(back.zones.instances(), state.zones.instances());
        assert_eq!(back.turn, state.turn);
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        assert!(matches!(
            MatchState::from_bytes(&[1, 2, 3]),
            Err(SnapshotError::Codec(_))
        ));
    }
}
