//! The match controller.
//!
//! `Match` is the only thing that mutates match state. Callers submit
//! actions and selections; each submission is either applied in full and
//! answered with the events it caused, or rejected with a reason and no
//! state change.
//!
//! ## Example
//!
//! ```
//! use dig_engine::core::{ActionKind, MatchConfig, PlayerId};
//! use dig_engine::rules::{Match, Phase};
//!
//! let mut game = Match::start(PlayerId::ONE, MatchConfig::default(), 7).unwrap();
//!
//! let result = game.submit_action(PlayerId::ONE, Phase::Idle, ActionKind::StartTurn);
//! assert!(result.is_accepted());
//! assert_eq!(game.phase(), Phase::First);
//!
//! // Not player two's turn.
//! let result = game.submit_action(PlayerId::TWO, Phase::First, ActionKind::ToThen);
//! assert!(!result.is_accepted());
//! ```

use log::{debug, info};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::rulebook::Rulebook;
use super::turn::Phase;
use super::view::MatchView;
use crate::board::{CellId, PawnId};
use crate::cards::{CardRequirement, DeckKind, SuitRequirement};
use crate::core::{
    ActionKind, ActionResult, Awaiting, BuildingKind, ConfigError, MatchConfig, MatchEvent,
    MatchState, Payment, PaymentPurpose, Pending, PlayerId, RecordedInput, Rejection,
    ResourceKind, ResourceMap, Selection, SnapshotError,
};
use crate::effects::{EffectContext, EffectProcedure, Passive};
use crate::zones::{CardUid, DrawOutcome};

/// Result of a finished match.
///
/// Decided the moment a score change reaches the threshold. Only one
/// score changes at a time, so there is always a single winner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Winner(PlayerId),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
        }
    }
}

/// A match in progress.
#[derive(Clone, Debug)]
pub struct Match {
    rules: Rulebook,
    state: MatchState,
}

impl Match {
    /// Start a match with the standard card set.
    pub fn start(starting: PlayerId, config: MatchConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rulebook(Rulebook::standard(), starting, config, seed)
    }

    pub fn with_rulebook(
        rules: Rulebook,
        starting: PlayerId,
        config: MatchConfig,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let state = MatchState::new(config, rules.decks(), starting, seed)?;
        info!("match started, {starting} to move, seed {seed}");
        Ok(Self { rules, state })
    }

    // === Queries ===

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Direct state access for scenario setup and tooling.
    ///
    /// Changes made here bypass every rule check.
    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    #[must_use]
    pub fn rules(&self) -> &Rulebook {
        &self.rules
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.turn.phase
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.state.turn.current
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.state.turn.round
    }

    #[must_use]
    pub fn score(&self, player: PlayerId) -> u32 {
        self.state.score(player)
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.state.result.as_ref()
    }

    /// The input the match is waiting for, and from whom.
    #[must_use]
    pub fn awaiting(&self) -> Option<(PlayerId, Awaiting)> {
        self.state.awaiting()
    }

    /// What `viewer` is allowed to see.
    #[must_use]
    pub fn view(&self, viewer: PlayerId) -> MatchView {
        MatchView::build(&self.state, viewer)
    }

    // === Persistence ===

    pub fn save(&self) -> Result<Vec<u8>, SnapshotError> {
        self.state.to_bytes()
    }

    /// Resume a saved match with the standard card set.
    pub fn restore(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Self::restore_with(Rulebook::standard(), bytes)
    }

    pub fn restore_with(rules: Rulebook, bytes: &[u8]) -> Result<Self, SnapshotError> {
        let state = MatchState::from_bytes(bytes)?;
        Ok(Self { rules, state })
    }

    // === Input ===

    /// Submit a turn action. `phase` is the phase the caller believes the
    /// match is in; a mismatch is rejected.
    pub fn submit_action(&mut self, player: PlayerId, phase: Phase, action: ActionKind) -> ActionResult {
        if self.state.is_over() {
            return ActionResult::rejected(Rejection::MatchOver);
        }

        let backup = self.state.clone();
        let mut events = Vec::new();
        match self.apply_action(player, phase, &action, &mut events) {
            Ok(()) => {
                debug!("{player}: {action} accepted");
                self.state.record(player, RecordedInput::Action(action));
                ActionResult::accepted(events)
            }
            Err(reason) => {
                debug!("{player}: {action} rejected: {reason}");
                self.state = backup;
                ActionResult::rejected(reason)
            }
        }
    }

    /// Answer the pending payment or effect procedure.
    pub fn submit_selection(&mut self, player: PlayerId, selection: Selection) -> ActionResult {
        if self.state.is_over() {
            return ActionResult::rejected(Rejection::MatchOver);
        }

        let backup = self.state.clone();
        let mut events = Vec::new();
        match self.apply_selection(player, &selection, &mut events) {
            Ok(()) => {
                self.state.record(player, RecordedInput::Selection(selection));
                ActionResult::accepted(events)
            }
            Err(reason) => {
                debug!("{player}: selection rejected: {reason}");
                self.state = backup;
                ActionResult::rejected(reason)
            }
        }
    }

    fn apply_action(
        &mut self,
        player: PlayerId,
        phase: Phase,
        action: &ActionKind,
        events: &mut Vec<MatchEvent>,
    ) -> Result<(), Rejection> {
        let name = action.name();
        let turn = &self.state.turn;
        turn.require_player(player, name)?;
        if phase != turn.phase {
            return Err(Rejection::illegal(
                name,
                format!("the match is in the {} phase, not {phase}", turn.phase),
            ));
        }
        if !action.allowed_in(turn.phase) {
            return Err(Rejection::illegal(
                name,
                format!("not available in the {} phase", turn.phase),
            ));
        }
        if self.state.pending.is_some() && *action != ActionKind::Back {
            return Err(Rejection::ProcedureInFlight);
        }

        match *action {
            ActionKind::StartTurn => self.start_turn(player, events),
            ActionKind::ToThen => {
                self.enter_phase(player, Phase::Then, events);
                Ok(())
            }
            ActionKind::MovePawn { pawn, to } => self.move_pawn(player, pawn, to, events),
            ActionKind::Dig { cell, reveal_gold } => self.dig(player, cell, reveal_gold, events),
            ActionKind::Build { kind, cell } => self.build(player, kind, cell, events),
            ActionKind::Retrieve => self.retrieve(player, events),
            ActionKind::ToFinally => {
                self.enter_phase(player, Phase::Finally, events);
                Ok(())
            }
            ActionKind::ActivateCard { card } => self.activate_card(player, card, events),
            ActionKind::EndTurn => self.end_turn(player, events),
            ActionKind::Back => self.back(player, events),
        }
    }

    fn enter_phase(&mut self, player: PlayerId, phase: Phase, events: &mut Vec<MatchEvent>) {
        self.state.turn.phase = phase;
        events.push(MatchEvent::PhaseChanged { player, phase });
    }

    // === Turn flow ===

    fn start_turn(&mut self, player: PlayerId, events: &mut Vec<MatchEvent>) -> Result<(), Rejection> {
        let state = &mut self.state;
        state.turn.begin();
        let round = state.turn.round;
        info!("{player} starts a turn in round {round}");
        events.push(MatchEvent::TurnStarted { player, round });

        if !state.turn.opened[player] {
            state.turn.opened[player] = true;
            for _ in 0..state.config.starting_cards {
                state.draw_card(player, DeckKind::Universal, events);
            }
        }

        let moved = state.ledger.refine_all(player);
        if !moved.is_empty() {
            events.push(MatchEvent::Refined { player, moved });
        }
        let mines = state.buildings.player(player).mines();
        let produced = state.ledger.activate_mines(player, &mines);
        if !produced.is_empty() {
            events.push(MatchEvent::MinesProduced { player, produced });
        }

        events.push(MatchEvent::PhaseChanged {
            player,
            phase: Phase::First,
        });
        Ok(())
    }

    fn end_turn(&mut self, player: PlayerId, events: &mut Vec<MatchEvent>) -> Result<(), Rejection> {
        let state = &mut self.state;
        if !state.turn.end_draw_done {
            let factories = state.buildings.player(player).built(BuildingKind::Factory);
            for _ in 0..state.config.card_draw_per_turn + factories {
                state.draw_card(player, DeckKind::Universal, events);
            }
            state.turn.end_draw_done = true;
        }

        let held = state.zones.hand(player).len();
        let limit = state.config.hand_limit;
        if held > limit {
            let requirement = CardRequirement::new(SuitRequirement::Any, held - limit);
            debug!("{player} holds {held} cards, must discard {}", held - limit);
            state.pending = Some(Pending::Payment(Payment {
                player,
                purpose: PaymentPurpose::HandLimit,
                requirement,
            }));
            events.push(MatchEvent::AwaitingInput {
                player,
                awaiting: Awaiting::Cards { requirement },
            });
            return Ok(());
        }

        self.close_turn(player, events);
        Ok(())
    }

    /// Reset per-round flags and hand over.
    fn close_turn(&mut self, player: PlayerId, events: &mut Vec<MatchEvent>) {
        let state = &mut self.state;
        state.zones.reset_round_flags(player);
        events.push(MatchEvent::TurnEnded { player });

        let new_round = state.turn.pass();
        if new_round {
            info!("round {} begins", state.turn.round);
        }
        events.push(MatchEvent::PhaseChanged {
            player: state.turn.current,
            phase: Phase::Idle,
        });
    }

    fn back(&mut self, player: PlayerId, events: &mut Vec<MatchEvent>) -> Result<(), Rejection> {
        match self.state.pending.take() {
            None => Err(Rejection::NothingPending),
            Some(Pending::Payment(Payment {
                purpose: PaymentPurpose::HandLimit,
                ..
            })) => Err(Rejection::illegal(
                "Back",
                "the hand-limit discard cannot be cancelled",
            )),
            Some(Pending::Payment(_)) => {
                events.push(MatchEvent::PendingCancelled { player });
                Ok(())
            }
            Some(Pending::Effect(procedure)) => {
                // The activation stays spent.
                self.state.zones.discard(procedure.card)?;
                events.push(MatchEvent::CardDiscarded {
                    player,
                    card: procedure.card,
                });
                events.push(MatchEvent::PendingCancelled { player });
                Ok(())
            }
        }
    }

    // === Then-phase actions ===

    /// Whether another Then action is available, counting unused Foremen.
    pub(crate) fn then_action_ready(&self, player: PlayerId) -> bool {
        self.state.turn.then_actions == 0 || self.unused_foreman(player).is_some()
    }

    fn unused_foreman(&self, player: PlayerId) -> Option<CardUid> {
        self.rules
            .passive_cards(&self.state.zones, player, Passive::Foreman)
            .find(|p| !p.used_this_round)
            .map(|p| p.card)
    }

    fn claim_then_action(&mut self, player: PlayerId, action: &str) -> Result<(), Rejection> {
        if self.state.turn.then_actions > 0 {
            let Some(foreman) = self.unused_foreman(player) else {
                return Err(Rejection::illegal(
                    action,
                    "this turn's Then action was already taken",
                ));
            };
            debug!("{player} uses Foreman for an extra action");
            self.state.zones.mark_used(player, foreman);
        }
        self.state.turn.then_actions += 1;
        Ok(())
    }

    fn move_pawn(
        &mut self,
        player: PlayerId,
        pawn: PawnId,
        to: CellId,
        events: &mut Vec<MatchEvent>,
    ) -> Result<(), Rejection> {
        if self.state.turn.phase == Phase::First {
            if self.state.turn.first_move_used {
                return Err(Rejection::illegal("MovePawn", "the First-phase move was already taken"));
            }
            self.state.turn.first_move_used = true;
        } else {
            self.claim_then_action(player, "MovePawn")?;
        }

        let from = self.state.board.move_pawn(player, pawn, to)?;
        events.push(MatchEvent::PawnMoved {
            player,
            pawn,
            from,
            to,
        });
        Ok(())
    }

    fn dig(
        &mut self,
        player: PlayerId,
        cell: CellId,
        reveal_gold: bool,
        events: &mut Vec<MatchEvent>,
    ) -> Result<(), Rejection> {
        self.claim_then_action(player, "Dig")?;
        if !self.state.board.is_adjacent_to_pawn(player, cell) {
            return Err(Rejection::target(format!("{cell} is not next to your pawn")));
        }
        let material = self.state.board.dig(cell, reveal_gold)?;
        self.state.ledger.collect(player, material, 1);
        events.push(MatchEvent::TileDug {
            player,
            cell,
            material,
        });
        Ok(())
    }

    /// Validate the build and wait for the card payment.
    fn build(
        &mut self,
        player: PlayerId,
        kind: BuildingKind,
        cell: CellId,
        events: &mut Vec<MatchEvent>,
    ) -> Result<(), Rejection> {
        if !kind.is_valid() {
            return Err(Rejection::target(format!("{kind} cannot be built")));
        }
        if !self.then_action_ready(player) {
            return Err(Rejection::illegal("Build", "this turn's Then action was already taken"));
        }
        let mut price = self.state.buildings.quote(player, kind)?;
        self.state.board.check_building_site(player, kind, cell)?;

        let discount = self
            .rules
            .passive_cards(&self.state.zones, player, Passive::MasterBuilder)
            .next()
            .map(|p| p.card);
        if discount.is_some() {
            price = 1;
        }

        let requirement = CardRequirement::new(SuitRequirement::Suit(kind.suit()), price);
        self.state.pending = Some(Pending::Payment(Payment {
            player,
            purpose: PaymentPurpose::Build {
                kind,
                cell,
                discount,
            },
            requirement,
        }));
        events.push(MatchEvent::AwaitingInput {
            player,
            awaiting: Awaiting::Cards { requirement },
        });
        Ok(())
    }

    fn complete_build(
        &mut self,
        player: PlayerId,
        kind: BuildingKind,
        cell: CellId,
        discount: Option<CardUid>,
        price: u32,
        events: &mut Vec<MatchEvent>,
    ) -> Result<(), Rejection> {
        self.claim_then_action(player, "Build")?;

        let record = self.state.buildings.record_build(player, kind);
        let health = self.state.config.building_health;
        self.state.board.add_building(player, kind, cell, health);
        info!("{player} built a {kind} on {cell}");
        events.push(MatchEvent::BuildingBuilt {
            player,
            kind,
            cell,
            price,
        });

        if let Some(card) = discount {
            self.state.zones.discard(card)?;
            events.push(MatchEvent::CardDiscarded { player, card });
        }
        self.state.add_score(player, 1, events);

        if record.exhausted_all {
            if let Some((pawn, at)) = self.state.board.spawn_pawn(player, cell) {
                info!("{player} exhausted every building family, new pawn on {at}");
                events.push(MatchEvent::PawnSpawned {
                    player,
                    pawn,
                    cell: at,
                });
            }
        }
        Ok(())
    }

    fn retrieve(&mut self, player: PlayerId, events: &mut Vec<MatchEvent>) -> Result<(), Rejection> {
        self.claim_then_action(player, "Retrieve")?;
        if self.state.zones.hand(player).open_slot().is_none() {
            return Err(Rejection::SlotUnavailable("hand".into()));
        }

        let cost = ResourceMap::from_pairs(&[(ResourceKind::Gold, 1)]);
        self.state.ledger.spend_refined(player, &cost)?;
        events.push(MatchEvent::ResourcesSpent { player, cost });

        if self.state.draw_card(player, DeckKind::Gold, events) == DrawOutcome::DeckEmpty {
            self.state.add_score(player, 1, events);
        }
        Ok(())
    }

    // === Finally-phase actions ===

    fn activate_card(
        &mut self,
        player: PlayerId,
        card: CardUid,
        events: &mut Vec<MatchEvent>,
    ) -> Result<(), Rejection> {
        let budget = self.state.config.card_activations_base
            + self.state.buildings.player(player).built(BuildingKind::Burrow);
        if self.state.turn.activations_used >= budget {
            return Err(Rejection::illegal(
                "ActivateCard",
                format!("all {budget} activations are used"),
            ));
        }
        if !self.state.zones.in_hand(player, card) {
            return Err(Rejection::UnknownCard(card));
        }
        let def = self
            .rules
            .definition_of(&self.state.zones, card)
            .ok_or(Rejection::UnknownCard(card))?;
        let spec = self
            .rules
            .effects()
            .get(&def.effect)
            .ok_or(Rejection::UnknownCard(card))?
            .clone();
        let (name, cost, disaster) = (def.name.clone(), def.cost, def.disaster);

        self.state.ledger.spend_refined(player, &cost)?;
        if !cost.is_empty() {
            events.push(MatchEvent::ResourcesSpent { player, cost });
        }
        self.state.turn.activations_used += 1;
        info!("{player} activates {name}");
        events.push(MatchEvent::CardActivated { player, card });

        if disaster {
            let victim = player.other();
            let guard = self
                .rules
                .passive_cards(&self.state.zones, victim, Passive::Safeguard)
                .next()
                .map(|p| p.card);
            if let Some(blocker) = guard {
                info!("{victim}'s Safeguard blocks {name}");
                self.state.zones.discard(blocker)?;
                self.state.zones.discard(card)?;
                events.push(MatchEvent::DisasterBlocked {
                    player: victim,
                    blocker,
                    card,
                });
                events.push(MatchEvent::CardDiscarded { player: victim, card: blocker });
                events.push(MatchEvent::CardDiscarded { player, card });
                return Ok(());
            }
        }

        if spec.passive().is_some() {
            self.state.zones.make_persistent(player, card)?;
            events.push(MatchEvent::CardMadePersistent { player, card });
            return Ok(());
        }

        let mut ctx = EffectContext {
            state: &mut self.state,
            rules: &self.rules,
            events: &mut *events,
        };
        match EffectProcedure::start(card, player, &spec, &mut ctx) {
            Some(procedure) => {
                let awaiting = procedure.awaiting(&self.state);
                self.state.pending = Some(Pending::Effect(procedure));
                events.push(MatchEvent::AwaitingInput { player, awaiting });
                Ok(())
            }
            None => self.finish_effect(player, card, events),
        }
    }

    fn finish_effect(
        &mut self,
        player: PlayerId,
        card: CardUid,
        events: &mut Vec<MatchEvent>,
    ) -> Result<(), Rejection> {
        self.state.zones.discard(card)?;
        events.push(MatchEvent::CardDiscarded { player, card });
        events.push(MatchEvent::EffectResolved { player, card });
        Ok(())
    }

    // === Selections ===

    fn apply_selection(
        &mut self,
        player: PlayerId,
        selection: &Selection,
        events: &mut Vec<MatchEvent>,
    ) -> Result<(), Rejection> {
        let Some(pending) = self.state.pending.take() else {
            return Err(Rejection::NothingPending);
        };
        if pending.player() != player {
            return Err(Rejection::illegal(
                "Selection",
                format!("waiting for {}", pending.player()),
            ));
        }

        match pending {
            Pending::Payment(payment) => self.resolve_payment(payment, selection, events),
            Pending::Effect(mut procedure) => {
                let mut ctx = EffectContext {
                    state: &mut self.state,
                    rules: &self.rules,
                    events: &mut *events,
                };
                let finished = procedure.resume(selection, &mut ctx)?;
                events.push(MatchEvent::SelectionAccepted { player });
                if finished {
                    self.finish_effect(player, procedure.card, events)
                } else {
                    let awaiting = procedure.awaiting(&self.state);
                    self.state.pending = Some(Pending::Effect(procedure));
                    events.push(MatchEvent::AwaitingInput { player, awaiting });
                    Ok(())
                }
            }
        }
    }

    /// Check a card selection against the payment and discard it.
    fn resolve_payment(
        &mut self,
        payment: Payment,
        selection: &Selection,
        events: &mut Vec<MatchEvent>,
    ) -> Result<(), Rejection> {
        let Selection::Cards(cards) = selection else {
            return Err(Rejection::target("waiting for a card selection"));
        };
        let player = payment.player;

        let mut suits: SmallVec<[ResourceKind; 8]> = SmallVec::new();
        for (i, &card) in cards.iter().enumerate() {
            if cards[..i].contains(&card) || !self.state.zones.in_hand(player, card) {
                return Err(Rejection::UnknownCard(card));
            }
            let def = self
                .rules
                .definition_of(&self.state.zones, card)
                .ok_or(Rejection::UnknownCard(card))?;
            suits.push(def.suit);
        }

        let requirement = payment.requirement;
        let selected = requirement.selection_value(suits);
        if selected != requirement.required_value() {
            return Err(Rejection::InvalidSelectionValue {
                selected,
                required: requirement.required_value(),
            });
        }

        for &card in cards {
            self.state.zones.discard(card)?;
            events.push(MatchEvent::CardDiscarded { player, card });
        }
        events.push(MatchEvent::SelectionAccepted { player });

        match payment.purpose {
            PaymentPurpose::Build {
                kind,
                cell,
                discount,
            } => self.complete_build(player, kind, cell, discount, requirement.count, events),
            PaymentPurpose::HandLimit => {
                self.close_turn(player, events);
                Ok(())
            }
        }
    }
}
