//! Resumable effect procedures.
//!
//! Activating a card starts an [`EffectProcedure`]. The procedure runs
//! until it needs input, then stops and stays in the match state as
//! `Pending::Effect`. Each `resume` call validates the selection before
//! touching anything: an invalid selection is rejected and the procedure
//! keeps waiting with no change; a valid one is applied in full.
//!
//! A step with no eligible target finishes the procedure instead of
//! waiting, reporting `MatchEvent::NoEligibleTarget`.
//!
//! ## Steps
//!
//! ```text
//! ChooseMaterial --Resource--> Place --Cell*--> done
//! ChooseFamily   --Family----> Damage --Cell*--> done
//! Dig            --Cell [--RevealGold]*--> done
//! Flip           --Cell*-->    done
//! Steal / Claim  --Resource*-> done
//! Move           --PawnStep* | Finish--> done
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use super::effect::{EffectSpec, FamilyChoice, MaterialChoice, Passive, PlaceSource};
use super::targeting;
use crate::board::CellId;
use crate::cards::DeckKind;
use crate::core::{
    Awaiting, BuildingFamily, CellPurpose, MatchEvent, MatchState, PlayerId, Rejection,
    ResourceKind, Selection,
};
use crate::rules::Rulebook;
use crate::zones::{CardUid, DrawOutcome};

/// What an effect step needs to run against.
pub struct EffectContext<'a> {
    pub state: &'a mut MatchState,
    pub rules: &'a Rulebook,
    pub events: &'a mut Vec<MatchEvent>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum Step {
    ChooseMaterial {
        count: u32,
        source: PlaceSource,
        reward: u32,
    },
    Place {
        kind: ResourceKind,
        source: PlaceSource,
        remaining: u32,
        /// Zero once the request was clamped.
        reward: u32,
    },
    Dig {
        material: Option<ResourceKind>,
        remaining: u32,
    },
    /// The chosen cell holds gold; nothing is dug until the player answers.
    GoldChoice {
        cell: CellId,
        material: Option<ResourceKind>,
        remaining: u32,
    },
    ChooseFamily { budget: u32 },
    Damage {
        family: Option<BuildingFamily>,
        remaining: u32,
        hit: Vec<CellId>,
    },
    Steal {
        kind: Option<ResourceKind>,
        remaining: u32,
    },
    Claim { remaining: u32 },
    Flip { remaining: u32 },
    Move { remaining: u32 },
}

impl Step {
    fn remaining(&self) -> u32 {
        match self {
            Step::ChooseMaterial { count, .. } => *count,
            Step::ChooseFamily { budget } => *budget,
            Step::Place { remaining, .. }
            | Step::Dig { remaining, .. }
            | Step::GoldChoice { remaining, .. }
            | Step::Damage { remaining, .. }
            | Step::Steal { remaining, .. }
            | Step::Claim { remaining }
            | Step::Flip { remaining }
            | Step::Move { remaining } => *remaining,
        }
    }

    fn expects(&self) -> &'static str {
        match self {
            Step::ChooseMaterial { .. } | Step::Steal { .. } | Step::Claim { .. } => "a resource",
            Step::ChooseFamily { .. } => "a building family",
            Step::Place { .. } | Step::Dig { .. } | Step::Damage { .. } | Step::Flip { .. } => {
                "a cell"
            }
            Step::GoldChoice { .. } => "a gold choice",
            Step::Move { .. } => "a pawn step or finish",
        }
    }
}

/// An in-flight card effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectProcedure {
    pub card: CardUid,
    pub player: PlayerId,
    step: Step,
}

impl EffectProcedure {
    /// Run an effect until it needs input.
    ///
    /// Returns `None` when the effect already finished.
    pub fn start(
        card: CardUid,
        player: PlayerId,
        spec: &EffectSpec,
        ctx: &mut EffectContext<'_>,
    ) -> Option<Self> {
        let step = match *spec {
            EffectSpec::Place {
                material,
                count,
                source,
                reward,
            } => match material {
                MaterialChoice::Fixed(kind) => {
                    place_step(card, player, kind, count, source, reward, ctx)
                }
                MaterialChoice::Chosen => Step::ChooseMaterial {
                    count,
                    source,
                    reward,
                },
            },
            EffectSpec::Dig { material, count } => Step::Dig {
                material,
                remaining: count,
            },
            EffectSpec::Damage { family, budget } => match family {
                FamilyChoice::Any => Step::Damage {
                    family: None,
                    remaining: budget,
                    hit: Vec::new(),
                },
                FamilyChoice::Fixed(f) => Step::Damage {
                    family: Some(f),
                    remaining: budget,
                    hit: Vec::new(),
                },
                FamilyChoice::Chosen => Step::ChooseFamily { budget },
            },
            EffectSpec::Steal { kind, budget } => Step::Steal {
                kind,
                remaining: budget,
            },
            EffectSpec::Claim { budget } => Step::Claim { remaining: budget },
            EffectSpec::Flip { count } => Step::Flip { remaining: count },
            EffectSpec::MovePawn { steps } => Step::Move { remaining: steps },
            EffectSpec::Immediate {
                score,
                draw,
                gold_draw,
            } => {
                apply_immediate(player, score, draw, gold_draw, ctx);
                return None;
            }
            EffectSpec::Persistent(passive) => {
                debug!("{passive:?} is a passive, nothing to run");
                return None;
            }
        };

        let mut procedure = Self { card, player, step };
        if procedure.settle(ctx) {
            None
        } else {
            Some(procedure)
        }
    }

    /// Apply a selection. Returns `Ok(true)` when the effect finished.
    pub fn resume(
        &mut self,
        selection: &Selection,
        ctx: &mut EffectContext<'_>,
    ) -> Result<bool, Rejection> {
        let player = self.player;
        let opponent = player.other();

        let next = match (self.step.clone(), selection) {
            (Step::ChooseMaterial { count, source, reward }, Selection::Resource(kind)) => {
                if !targeting::placeable_materials(ctx.state, player, source).contains(kind) {
                    return Err(Rejection::target(format!("cannot place {kind} now")));
                }
                place_step(self.card, player, *kind, count, source, reward, ctx)
            }

            (
                Step::Place {
                    kind,
                    source,
                    remaining,
                    reward,
                },
                Selection::Cell(cell),
            ) => {
                if !ctx.state.board.is_placeable(*cell, kind) {
                    return Err(Rejection::target(format!("cannot place {kind} on {cell}")));
                }
                let taken = match source {
                    PlaceSource::Supply => ctx.state.ledger.take_supply_for_board(kind),
                    PlaceSource::Collected => {
                        ctx.state.ledger.take_collected_for_board(player, kind)
                    }
                };
                assert!(taken, "placement count was clamped to available units");
                ctx.state.board.place(*cell, kind)?;
                ctx.events.push(MatchEvent::TilePlaced {
                    player,
                    cell: *cell,
                    material: kind,
                });
                Step::Place {
                    kind,
                    source,
                    remaining: remaining - 1,
                    reward,
                }
            }

            (Step::Dig { material, remaining }, Selection::Cell(cell)) => {
                if !targeting::dig_cells(ctx.state, player, material).contains(cell) {
                    return Err(Rejection::target(format!("cannot dig {cell}")));
                }
                if ctx.state.board.tile(*cell).is_some_and(|t| t.holds_gold()) {
                    Step::GoldChoice {
                        cell: *cell,
                        material,
                        remaining,
                    }
                } else {
                    dig_step(player, *cell, true, material, remaining, ctx)?
                }
            }

            (
                Step::GoldChoice {
                    cell,
                    material,
                    remaining,
                },
                Selection::RevealGold(reveal),
            ) => dig_step(player, cell, *reveal, material, remaining, ctx)?,

            (Step::ChooseFamily { budget }, Selection::Family(family)) => {
                if !targeting::damage_families(ctx.state, opponent).contains(family) {
                    return Err(Rejection::target(format!("{opponent} has no {family}")));
                }
                Step::Damage {
                    family: Some(*family),
                    remaining: budget,
                    hit: Vec::new(),
                }
            }

            (
                Step::Damage {
                    family,
                    remaining,
                    mut hit,
                },
                Selection::Cell(cell),
            ) => {
                if !targeting::damage_cells(ctx.state, opponent, family, &hit).contains(cell) {
                    return Err(Rejection::target(format!("no damageable building on {cell}")));
                }
                damage_building(*cell, ctx);
                hit.push(*cell);
                Step::Damage {
                    family,
                    remaining: remaining - 1,
                    hit,
                }
            }

            (Step::Steal { kind, remaining }, Selection::Resource(k)) => {
                if !targeting::steal_options(ctx.state, opponent, kind).contains(k) {
                    return Err(Rejection::target(format!("{opponent} has no {k} to steal")));
                }
                if let Some(source) = ctx.state.ledger.steal(opponent, player, *k) {
                    ctx.events.push(MatchEvent::ResourceStolen {
                        thief: player,
                        victim: opponent,
                        kind: *k,
                        source,
                    });
                }
                Step::Steal {
                    kind,
                    remaining: remaining - 1,
                }
            }

            (Step::Claim { remaining }, Selection::Resource(k)) => {
                if !ctx.state.ledger.claim_from_supply(player, *k) {
                    return Err(Rejection::target(format!("the supply has no {k}")));
                }
                ctx.events.push(MatchEvent::ResourceClaimed { player, kind: *k });
                Step::Claim {
                    remaining: remaining - 1,
                }
            }

            (Step::Flip { remaining }, Selection::Cell(cell)) => {
                let has_gold = ctx.state.board.reveal(*cell)?;
                ctx.events.push(MatchEvent::GoldRevealed {
                    player,
                    cell: *cell,
                    has_gold,
                });
                let eye = ctx
                    .rules
                    .has_passive(&ctx.state.zones, player, Passive::DiscerningEye);
                if has_gold && eye {
                    ctx.state.add_score(player, 1, ctx.events);
                }
                Step::Flip {
                    remaining: remaining - 1,
                }
            }

            (Step::Move { remaining }, Selection::PawnStep { pawn, to }) => {
                let from = ctx.state.board.move_pawn(player, *pawn, *to)?;
                ctx.events.push(MatchEvent::PawnMoved {
                    player,
                    pawn: *pawn,
                    from,
                    to: *to,
                });
                Step::Move {
                    remaining: remaining - 1,
                }
            }

            (Step::Move { .. }, Selection::Finish) => Step::Move { remaining: 0 },

            (step, _) => {
                return Err(Rejection::target(format!(
                    "this effect is waiting for {}",
                    step.expects()
                )));
            }
        };

        self.step = next;
        Ok(self.settle(ctx))
    }

    /// What input the procedure is waiting for.
    #[must_use]
    pub fn awaiting(&self, state: &MatchState) -> Awaiting {
        let opponent = self.player.other();
        match &self.step {
            Step::ChooseMaterial { count, source, .. } => Awaiting::Resource {
                options: targeting::placeable_materials(state, self.player, *source),
                remaining: *count,
            },
            Step::Place { kind, remaining, .. } => Awaiting::Cell {
                purpose: CellPurpose::Place(*kind),
                candidates: targeting::place_cells(state, *kind),
                remaining: *remaining,
            },
            Step::Dig { material, remaining } => Awaiting::Cell {
                purpose: CellPurpose::Dig,
                candidates: targeting::dig_cells(state, self.player, *material),
                remaining: *remaining,
            },
            Step::GoldChoice { cell, .. } => Awaiting::GoldChoice { cell: *cell },
            Step::ChooseFamily { .. } => Awaiting::Family {
                options: targeting::damage_families(state, opponent),
            },
            Step::Damage {
                family,
                remaining,
                hit,
            } => Awaiting::Cell {
                purpose: CellPurpose::Damage,
                candidates: targeting::damage_cells(state, opponent, *family, hit),
                remaining: *remaining,
            },
            Step::Steal { kind, remaining } => Awaiting::Resource {
                options: targeting::steal_options(state, opponent, *kind),
                remaining: *remaining,
            },
            Step::Claim { remaining } => Awaiting::Resource {
                options: targeting::claim_options(state),
                remaining: *remaining,
            },
            Step::Flip { remaining } => Awaiting::Cell {
                purpose: CellPurpose::Flip,
                candidates: targeting::flip_cells(state),
                remaining: *remaining,
            },
            Step::Move { remaining } => Awaiting::PawnStep {
                remaining: *remaining,
            },
        }
    }

    fn has_targets(&self, state: &MatchState) -> bool {
        if let Step::Place { kind, source, .. } = self.step {
            if targeting::place_units(state, self.player, source, kind) == 0 {
                return false;
            }
        }
        match self.awaiting(state) {
            Awaiting::Cell { candidates, .. } => !candidates.is_empty(),
            Awaiting::Resource { options, .. } => !options.is_empty(),
            Awaiting::Family { options } => !options.is_empty(),
            Awaiting::PawnStep { .. } => targeting::pawn_can_move(state, self.player),
            Awaiting::Cards { .. } | Awaiting::GoldChoice { .. } => true,
        }
    }

    /// Finish if the budget is spent or nothing is left to pick.
    fn settle(&mut self, ctx: &mut EffectContext<'_>) -> bool {
        let remaining = self.step.remaining();
        if remaining == 0 {
            if let Step::Place { reward, .. } = self.step {
                ctx.state.add_score(self.player, reward, ctx.events);
            }
            return true;
        }
        if self.has_targets(ctx.state) {
            return false;
        }

        debug!("{} has no target left for {}", self.player, self.card);
        ctx.events.push(MatchEvent::NoEligibleTarget {
            player: self.player,
            card: self.card,
            unresolved: remaining,
        });
        true
    }
}

/// Enter the Place step, clamping the count to what can actually be
/// placed. A clamped request earns no reward.
fn place_step(
    card: CardUid,
    player: PlayerId,
    kind: ResourceKind,
    count: u32,
    source: PlaceSource,
    reward: u32,
    ctx: &mut EffectContext<'_>,
) -> Step {
    let units = targeting::place_units(ctx.state, player, source, kind);
    let cells = targeting::place_cells(ctx.state, kind).len() as u32;
    let granted = count.min(units).min(cells);

    if granted == 0 {
        // Settle reports the missing targets.
        return Step::Place {
            kind,
            source,
            remaining: count,
            reward: 0,
        };
    }
    if granted < count {
        debug!("{card}: placing {granted} of {count} {kind}");
        ctx.events.push(MatchEvent::EffectClamped {
            card,
            requested: count,
            granted,
        });
    }
    Step::Place {
        kind,
        source,
        remaining: granted,
        reward: if granted == count { reward } else { 0 },
    }
}

/// Dig one cell for an effect and continue with the rest of the count.
fn dig_step(
    player: PlayerId,
    cell: CellId,
    reveal_gold: bool,
    material: Option<ResourceKind>,
    remaining: u32,
    ctx: &mut EffectContext<'_>,
) -> Result<Step, Rejection> {
    let surfaced = ctx.state.board.dig(cell, reveal_gold)?;
    ctx.state.ledger.collect(player, surfaced, 1);
    ctx.events.push(MatchEvent::TileDug {
        player,
        cell,
        material: surfaced,
    });
    Ok(Step::Dig {
        material,
        remaining: remaining - 1,
    })
}

fn apply_immediate(
    player: PlayerId,
    score: u32,
    draw: u32,
    gold_draw: u32,
    ctx: &mut EffectContext<'_>,
) {
    ctx.state.add_score(player, score, ctx.events);
    for _ in 0..draw {
        ctx.state.draw_card(player, DeckKind::Universal, ctx.events);
    }
    for _ in 0..gold_draw {
        if ctx.state.draw_card(player, DeckKind::Gold, ctx.events) == DrawOutcome::DeckEmpty {
            ctx.state.add_score(player, 1, ctx.events);
        }
    }
}

/// Roll a d4 against the building on `cell`.
fn damage_building(cell: CellId, ctx: &mut EffectContext<'_>) {
    let roll = ctx.state.rng.roll_die(4);
    let damage = targeting::damage_for_roll(roll);
    let Some(report) = ctx.state.board.damage_building(cell, damage) else {
        return;
    };

    let building = &report.building;
    ctx.events.push(MatchEvent::BuildingDamaged {
        owner: building.owner,
        kind: building.kind,
        cell,
        roll,
        damage,
        destroyed: report.destroyed,
    });
    if report.destroyed {
        debug!("{} lost its {} on {cell}", building.owner, building.kind);
        ctx.state
            .buildings
            .record_destroyed(building.owner, building.kind);
        ctx.state.remove_score(building.owner, 1, ctx.events);
    }
}
