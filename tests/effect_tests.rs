//! Card effect tests.
//!
//! Each test activates one card from the standard set and walks its
//! procedure through selections:
//! - Placement clamping and rewards
//! - Digging, damage, steals, claims, flips and pawn steps
//! - Passive cards (Safeguard, Discerning Eye)
//! - Cancelling with Back

use dig_engine::board::{CellId, Layer};
use dig_engine::core::{
    ActionKind, ActionResult, Awaiting, BuildingFamily, BuildingKind, CellPurpose, MatchConfig,
    MatchEvent, PlayerId, Rejection, ResourceKind, ResourceMap, Selection,
};
use dig_engine::economy::StealSource;
use dig_engine::effects::targeting::damage_for_roll;
use dig_engine::rules::{Match, Phase};
use dig_engine::zones::{CardLocation, CardUid};

const P1: PlayerId = PlayerId::ONE;
const P2: PlayerId = PlayerId::TWO;

// =============================================================================
// Helpers
// =============================================================================

fn new_match(config: MatchConfig, seed: u64) -> Match {
    Match::start(P1, config, seed).expect("valid config")
}

fn act(game: &mut Match, player: PlayerId, action: ActionKind) -> ActionResult {
    let phase = game.phase();
    game.submit_action(player, phase, action)
}

fn select(game: &mut Match, selection: Selection) -> ActionResult {
    let result = game.submit_selection(P1, selection.clone());
    assert!(result.is_accepted(), "{selection:?}: {:?}", result.rejection());
    result
}

fn deal(game: &mut Match, player: PlayerId, name: &str) -> CardUid {
    let id = game
        .rules()
        .cards()
        .find_by_name(name)
        .unwrap_or_else(|| panic!("no card named {name}"))
        .id;
    let uid = game
        .state()
        .zones
        .instances()
        .iter()
        .find(|i| i.card == id && matches!(i.location, CardLocation::Deck(_)))
        .map(|i| i.uid)
        .unwrap_or_else(|| panic!("no copy of {name} left in a deck"));
    game.state_mut().zones.deal(player, uid).unwrap();
    uid
}

fn deal_persistent(game: &mut Match, player: PlayerId, name: &str) -> CardUid {
    let uid = deal(game, player, name);
    game.state_mut().zones.make_persistent(player, uid).unwrap();
    uid
}

/// Give `player` exactly the refined cost of card `name`.
fn afford(game: &mut Match, player: PlayerId, name: &str) {
    let cost = game.rules().cards().find_by_name(name).unwrap().cost;
    let ledger = &mut game.state_mut().ledger;
    for (kind, amount) in cost.nonzero() {
        ledger.collect(player, kind, amount);
    }
    ledger.refine_all(player);
}

/// Deal `name` to player one, pay for it and open the Finally phase.
fn ready(game: &mut Match, name: &str) -> CardUid {
    let card = deal(game, P1, name);
    afford(game, P1, name);
    for action in [ActionKind::StartTurn, ActionKind::ToThen, ActionKind::ToFinally] {
        assert!(act(game, P1, action).is_accepted());
    }
    card
}

fn activate(game: &mut Match, card: CardUid) -> ActionResult {
    let result = act(game, P1, ActionKind::ActivateCard { card });
    assert!(result.is_accepted(), "{:?}", result.rejection());
    result
}

/// Dig `cell` straight down to `layer`, bypassing the rules.
fn lower(game: &mut Match, cell: CellId, layer: Layer) {
    while game.state().board.tile(cell).unwrap().layer != layer {
        game.state_mut().board.dig(cell, true).unwrap();
    }
}

fn finished(result: &ActionResult, card: CardUid) -> bool {
    result
        .events
        .contains(&MatchEvent::EffectResolved { player: P1, card })
}

fn unresolved(result: &ActionResult) -> Option<u32> {
    result.events.iter().find_map(|e| match e {
        MatchEvent::NoEligibleTarget { unresolved, .. } => Some(*unresolved),
        _ => None,
    })
}

// =============================================================================
// Place
// =============================================================================

#[test_log::test]
fn test_place_full_count_pays_reward() {
    let mut game = new_match(MatchConfig::default(), 3);
    lower(&mut game, CellId(20), Layer::Dirt);
    lower(&mut game, CellId(22), Layer::Dirt);
    let card = ready(&mut game, "Seed Scatter");

    activate(&mut game, card);
    assert_eq!(
        game.awaiting(),
        Some((
            P1,
            Awaiting::Cell {
                purpose: CellPurpose::Place(ResourceKind::Grass),
                candidates: vec![CellId(20), CellId(22)],
                remaining: 2,
            }
        ))
    );

    let result = select(&mut game, Selection::Cell(CellId(20)));
    assert!(!finished(&result, card));
    let result = select(&mut game, Selection::Cell(CellId(22)));
    assert!(finished(&result, card));

    assert_eq!(game.score(P1), 1);
    assert_eq!(game.state().board.tile(CellId(22)).unwrap().layer, Layer::Grass);
    // 12 at start, 1 back from the cost, 2 placed.
    assert_eq!(game.state().ledger.supply()[ResourceKind::Grass], 11);
    assert_eq!(
        game.state().zones.instance(card).unwrap().location,
        CardLocation::Discard
    );
}

#[test]
fn test_place_clamped_to_supply_earns_nothing() {
    let supply = ResourceMap::from_pairs(&[(ResourceKind::Dirt, 12), (ResourceKind::Stone, 12)]);
    let mut game = new_match(MatchConfig::default().with_supply(supply), 3);
    lower(&mut game, CellId(20), Layer::Dirt);
    lower(&mut game, CellId(22), Layer::Dirt);
    let card = ready(&mut game, "Seed Scatter");

    // The activation cost is the only grass in supply.
    let result = activate(&mut game, card);
    assert!(result.events.contains(&MatchEvent::EffectClamped {
        card,
        requested: 2,
        granted: 1,
    }));
    assert!(matches!(
        game.awaiting(),
        Some((_, Awaiting::Cell { remaining: 1, .. }))
    ));

    let result = select(&mut game, Selection::Cell(CellId(22)));
    assert!(finished(&result, card));
    assert_eq!(game.score(P1), 0);
    assert_eq!(game.state().ledger.supply()[ResourceKind::Grass], 0);
}

#[test]
fn test_place_without_targets_finishes_at_once() {
    let mut game = new_match(MatchConfig::default(), 3);
    let card = ready(&mut game, "Seed Scatter");

    let result = activate(&mut game, card);
    assert_eq!(unresolved(&result), Some(2));
    assert!(finished(&result, card));
    assert!(game.awaiting().is_none());
    assert_eq!(game.state().turn.activations_used, 1);
    assert_eq!(game.score(P1), 0);
}

#[test]
fn test_invalid_selection_keeps_procedure_waiting() {
    let mut game = new_match(MatchConfig::default(), 3);
    lower(&mut game, CellId(20), Layer::Dirt);
    let card = ready(&mut game, "Seed Scatter");
    activate(&mut game, card);
    let waiting = game.awaiting();

    let result = game.submit_selection(P1, Selection::Cell(CellId(0)));
    assert!(matches!(result.rejection(), Some(Rejection::InvalidTarget(_))));
    let result = game.submit_selection(P1, Selection::Resource(ResourceKind::Grass));
    assert!(matches!(result.rejection(), Some(Rejection::InvalidTarget(_))));
    let result = game.submit_selection(P2, Selection::Cell(CellId(20)));
    assert!(matches!(
        result.rejection(),
        Some(Rejection::IllegalPhaseOrPlayer { .. })
    ));

    assert_eq!(game.awaiting(), waiting);
}

#[test]
fn test_landfill_places_chosen_collected_material() {
    let mut game = new_match(MatchConfig::default(), 3);
    lower(&mut game, CellId(20), Layer::Stone);
    let card = ready(&mut game, "Landfill");
    game.state_mut().ledger.collect(P1, ResourceKind::Dirt, 3);

    activate(&mut game, card);
    assert_eq!(
        game.awaiting(),
        Some((
            P1,
            Awaiting::Resource {
                options: vec![ResourceKind::Dirt],
                remaining: 3,
            }
        ))
    );
    let result = game.submit_selection(P1, Selection::Resource(ResourceKind::Grass));
    assert!(!result.is_accepted());

    let result = select(&mut game, Selection::Resource(ResourceKind::Dirt));
    assert!(result.events.contains(&MatchEvent::EffectClamped {
        card,
        requested: 3,
        granted: 1,
    }));
    let result = select(&mut game, Selection::Cell(CellId(20)));
    assert!(finished(&result, card));

    assert_eq!(game.state().ledger.collected(P1)[ResourceKind::Dirt], 2);
    assert_eq!(game.state().board.tile(CellId(20)).unwrap().layer, Layer::Dirt);
    assert_eq!(game.score(P1), 0);
}

// =============================================================================
// Dig
// =============================================================================

#[test]
fn test_dig_effect_collects_matching_layer() {
    let mut game = new_match(MatchConfig::default(), 3);
    let card = ready(&mut game, "Shovel Crew");
    activate(&mut game, card);

    let Some((_, Awaiting::Cell { candidates, .. })) = game.awaiting() else {
        panic!("expected dig targets");
    };
    select(&mut game, Selection::Cell(candidates[0]));

    // Now dirt, no longer grass.
    let result = game.submit_selection(P1, Selection::Cell(candidates[0]));
    assert!(matches!(result.rejection(), Some(Rejection::InvalidTarget(_))));

    let result = select(&mut game, Selection::Cell(candidates[1]));
    assert!(finished(&result, card));
    assert_eq!(game.state().ledger.collected(P1)[ResourceKind::Grass], 2);
}

#[test]
fn test_dig_effect_without_matching_layer() {
    let mut game = new_match(MatchConfig::default(), 3);
    let card = ready(&mut game, "Deep Dig");

    let result = activate(&mut game, card);
    assert_eq!(unresolved(&result), Some(2));
    assert!(finished(&result, card));
}

/// A gold-bearing cell lowered to its stone, with a fresh P1 pawn beside it.
fn gold_stone_beside_pawn(game: &mut Match) -> CellId {
    let board = &game.state().board;
    let (cell, spot) = board
        .tiles()
        .filter(|(_, t)| t.has_gold && !t.is_occupied())
        .find_map(|(c, _)| {
            let free = board
                .topology()
                .adjacent_cells(c)
                .iter()
                .copied()
                .find(|&n| !board.tile(n).unwrap().is_occupied())?;
            Some((c, free))
        })
        .expect("some gold cell has a free neighbour");

    game.state_mut().board.add_pawn(P1, spot).unwrap();
    lower(game, cell, Layer::Stone);
    cell
}

#[test]
fn test_dig_effect_asks_before_taking_gold() {
    let mut game = new_match(MatchConfig::default(), 3);
    let gold = gold_stone_beside_pawn(&mut game);
    let card = ready(&mut game, "Deep Dig");
    activate(&mut game, card);

    let result = select(&mut game, Selection::Cell(gold));
    assert!(!result
        .events
        .iter()
        .any(|e| matches!(e, MatchEvent::TileDug { .. })));
    assert_eq!(game.awaiting(), Some((P1, Awaiting::GoldChoice { cell: gold })));
    assert_eq!(game.view(P1).awaiting, game.awaiting());
    assert_eq!(game.view(P2).awaiting, None);

    // Nothing is dug while the choice is open.
    let result = game.submit_selection(P1, Selection::Cell(gold));
    assert!(matches!(result.rejection(), Some(Rejection::InvalidTarget(_))));
    assert_eq!(game.state().board.tile(gold).unwrap().layer, Layer::Stone);

    let result = select(&mut game, Selection::RevealGold(false));
    assert!(result.events.contains(&MatchEvent::TileDug {
        player: P1,
        cell: gold,
        material: ResourceKind::Stone,
    }));
    assert_eq!(unresolved(&result), Some(1));
    assert!(finished(&result, card));

    let collected = game.state().ledger.collected(P1);
    assert_eq!(collected[ResourceKind::Stone], 1);
    assert_eq!(collected[ResourceKind::Gold], 0);
    assert!(!game.state().board.tile(gold).unwrap().revealed);
    assert_eq!(game.view(P2).tile(gold).unwrap().has_gold, None);
}

#[test]
fn test_dig_effect_reveals_gold_on_request() {
    let mut game = new_match(MatchConfig::default(), 3);
    let gold = gold_stone_beside_pawn(&mut game);
    let card = ready(&mut game, "Deep Dig");
    activate(&mut game, card);

    select(&mut game, Selection::Cell(gold));
    let result = select(&mut game, Selection::RevealGold(true));
    assert!(result.events.contains(&MatchEvent::TileDug {
        player: P1,
        cell: gold,
        material: ResourceKind::Gold,
    }));
    assert_eq!(game.state().ledger.collected(P1)[ResourceKind::Gold], 1);
    assert!(game.state().board.tile(gold).unwrap().revealed);
}

// =============================================================================
// Damage
// =============================================================================

fn give_building(game: &mut Match, owner: PlayerId, kind: BuildingKind, cell: CellId, health: u8) {
    let state = game.state_mut();
    state.board.add_building(owner, kind, cell, health);
    state.buildings.record_build(owner, kind);
    state.scores[owner] += 1;
}

#[test]
fn test_damage_hits_each_building_once() {
    let mut game = new_match(MatchConfig::default(), 3);
    give_building(&mut game, P2, BuildingKind::Factory, CellId(40), 2);
    let card = ready(&mut game, "Rockslide");

    activate(&mut game, card);
    assert_eq!(
        game.awaiting(),
        Some((
            P1,
            Awaiting::Cell {
                purpose: CellPurpose::Damage,
                candidates: vec![CellId(40)],
                remaining: 2,
            }
        ))
    );

    let result = select(&mut game, Selection::Cell(CellId(40)));
    let (roll, damage) = result
        .events
        .iter()
        .find_map(|e| match e {
            MatchEvent::BuildingDamaged { roll, damage, .. } => Some((*roll, *damage)),
            _ => None,
        })
        .expect("the building was rolled against");
    assert!((1..=4).contains(&roll));
    assert_eq!(damage, damage_for_roll(roll));

    // No second target, so the effect ends with budget left.
    assert_eq!(unresolved(&result), Some(1));
    assert!(finished(&result, card));
}

#[test]
fn test_destroyed_building_costs_its_owner() {
    for seed in 0..64 {
        let mut game = new_match(MatchConfig::default(), seed);
        give_building(&mut game, P2, BuildingKind::Factory, CellId(40), 1);
        let card = ready(&mut game, "Rockslide");
        activate(&mut game, card);

        let result = select(&mut game, Selection::Cell(CellId(40)));
        let destroyed = result
            .events
            .iter()
            .any(|e| matches!(e, MatchEvent::BuildingDamaged { destroyed: true, .. }));
        if !destroyed {
            continue;
        }

        let state = game.state();
        assert!(state.board.building_at(CellId(40)).is_none());
        assert_eq!(state.score(P2), 0);
        assert_eq!(state.buildings.player(P2).built(BuildingKind::Factory), 0);
        // Stock is not given back.
        assert_eq!(state.buildings.player(P2).remaining(BuildingFamily::Factory), 4);
        return;
    }
    panic!("no seed destroyed a one-health building");
}

#[test]
fn test_sabotage_chooses_an_owned_family() {
    let mut game = new_match(MatchConfig::default(), 3);
    give_building(&mut game, P2, BuildingKind::Burrow, CellId(40), 2);
    let card = ready(&mut game, "Sabotage");
    activate(&mut game, card);

    assert_eq!(
        game.awaiting(),
        Some((
            P1,
            Awaiting::Family {
                options: vec![BuildingFamily::Burrow],
            }
        ))
    );
    let result = game.submit_selection(P1, Selection::Family(BuildingFamily::Factory));
    assert!(!result.is_accepted());

    select(&mut game, Selection::Family(BuildingFamily::Burrow));
    assert!(matches!(
        game.awaiting(),
        Some((_, Awaiting::Cell { purpose: CellPurpose::Damage, candidates, .. }))
            if candidates == vec![CellId(40)]
    ));
}

#[test]
fn test_damage_without_buildings() {
    let mut game = new_match(MatchConfig::default(), 3);
    let card = ready(&mut game, "Termites");
    let result = activate(&mut game, card);
    assert_eq!(unresolved(&result), Some(2));
}

// =============================================================================
// Disasters and Safeguard
// =============================================================================

#[test]
fn test_safeguard_blocks_disaster() {
    let mut game = new_match(MatchConfig::default(), 3);
    let guard = deal_persistent(&mut game, P2, "Safeguard");
    game.state_mut().ledger.collect(P2, ResourceKind::Grass, 2);
    let card = ready(&mut game, "Pilfer");

    let result = activate(&mut game, card);
    assert!(result.events.contains(&MatchEvent::DisasterBlocked {
        player: P2,
        blocker: guard,
        card,
    }));
    assert!(game.awaiting().is_none());

    let state = game.state();
    assert_eq!(state.zones.instance(guard).unwrap().location, CardLocation::Discard);
    assert_eq!(state.zones.instance(card).unwrap().location, CardLocation::Discard);
    assert_eq!(state.ledger.collected(P2)[ResourceKind::Grass], 2);
    assert_eq!(state.ledger.refined(P1)[ResourceKind::Grass], 0);
    assert_eq!(state.turn.activations_used, 1);
}

#[test]
fn test_safeguard_ignores_plain_cards() {
    let mut game = new_match(MatchConfig::default(), 3);
    let guard = deal_persistent(&mut game, P2, "Safeguard");
    let card = ready(&mut game, "Forage");
    activate(&mut game, card);
    assert!(game.state().zones.persistent_cards(P2).any(|p| p.card == guard));
}

// =============================================================================
// Steal and claim
// =============================================================================

#[test]
fn test_steal_takes_collected_before_refined() {
    let mut game = new_match(MatchConfig::default(), 3);
    {
        let ledger = &mut game.state_mut().ledger;
        ledger.collect(P2, ResourceKind::Grass, 1);
        ledger.refine_all(P2);
        ledger.collect(P2, ResourceKind::Grass, 1);
    }
    let card = ready(&mut game, "Pilfer");
    activate(&mut game, card);

    let result = select(&mut game, Selection::Resource(ResourceKind::Grass));
    assert!(result.events.contains(&MatchEvent::ResourceStolen {
        thief: P1,
        victim: P2,
        kind: ResourceKind::Grass,
        source: StealSource::Collected,
    }));
    let result = select(&mut game, Selection::Resource(ResourceKind::Grass));
    assert!(result.events.contains(&MatchEvent::ResourceStolen {
        thief: P1,
        victim: P2,
        kind: ResourceKind::Grass,
        source: StealSource::Refined,
    }));
    assert!(finished(&result, card));

    let ledger = &game.state().ledger;
    assert_eq!(ledger.stealable(P2, ResourceKind::Grass), 0);
    assert_eq!(ledger.collected(P1)[ResourceKind::Grass], 2);
}

#[test]
fn test_gold_heist_without_gold() {
    let mut game = new_match(MatchConfig::default(), 3);
    game.state_mut().ledger.collect(P2, ResourceKind::Stone, 3);
    let card = ready(&mut game, "Gold Heist");
    let result = activate(&mut game, card);
    assert_eq!(unresolved(&result), Some(1));
    assert_eq!(game.state().ledger.collected(P2)[ResourceKind::Stone], 3);
}

#[test]
fn test_claim_moves_supply_to_collected() {
    let mut game = new_match(MatchConfig::default(), 3);
    let card = ready(&mut game, "Forage");
    activate(&mut game, card);

    select(&mut game, Selection::Resource(ResourceKind::Dirt));
    let result = select(&mut game, Selection::Resource(ResourceKind::Stone));
    assert!(finished(&result, card));

    let ledger = &game.state().ledger;
    assert_eq!(ledger.collected(P1)[ResourceKind::Dirt], 1);
    assert_eq!(ledger.collected(P1)[ResourceKind::Stone], 1);
    assert_eq!(ledger.supply()[ResourceKind::Dirt], 11);
}

// =============================================================================
// Flip
// =============================================================================

/// An unoccupied cell with (or without) gold, lowered to stone.
fn stone_cell(game: &mut Match, gold: bool) -> CellId {
    let cell = game
        .state()
        .board
        .tiles()
        .find(|(_, t)| t.has_gold == gold && !t.is_occupied())
        .map(|(c, _)| c)
        .expect("board has such a cell");
    lower(game, cell, Layer::Stone);
    cell
}

#[test]
fn test_flip_with_discerning_eye_scores_gold() {
    let mut game = new_match(MatchConfig::default(), 3);
    let gold = stone_cell(&mut game, true);
    let plain = stone_cell(&mut game, false);
    deal_persistent(&mut game, P1, "Discerning Eye");
    let card = ready(&mut game, "Prospecting");
    activate(&mut game, card);

    let result = select(&mut game, Selection::Cell(gold));
    assert!(result.events.contains(&MatchEvent::GoldRevealed {
        player: P1,
        cell: gold,
        has_gold: true,
    }));
    assert_eq!(game.score(P1), 1);

    let result = game.submit_selection(P1, Selection::Cell(gold));
    assert!(!result.is_accepted());

    let result = select(&mut game, Selection::Cell(plain));
    assert!(finished(&result, card));
    assert_eq!(game.score(P1), 1);
    assert_eq!(game.view(P2).tile(plain).unwrap().has_gold, Some(false));
}

#[test]
fn test_flip_without_eye_only_reveals() {
    let mut game = new_match(MatchConfig::default(), 3);
    let gold = stone_cell(&mut game, true);
    let card = ready(&mut game, "Prospecting");
    activate(&mut game, card);

    select(&mut game, Selection::Cell(gold));
    assert_eq!(game.score(P1), 0);
    assert!(game.state().board.tile(gold).unwrap().revealed);
}

// =============================================================================
// Pawn steps
// =============================================================================

#[test]
fn test_move_effect_can_finish_early() {
    let mut game = new_match(MatchConfig::default(), 3);
    let card = ready(&mut game, "Trailblazer");
    activate(&mut game, card);
    assert_eq!(game.awaiting(), Some((P1, Awaiting::PawnStep { remaining: 2 })));

    let theirs = game.state().board.pawns_of(P2).next().unwrap().id;
    let target = game.state().board.move_targets(theirs)[0];
    let result = game.submit_selection(P1, Selection::PawnStep { pawn: theirs, to: target });
    assert!(!result.is_accepted());

    let pawn = game.state().board.pawns_of(P1).next().unwrap().id;
    let to = game.state().board.move_targets(pawn)[0];
    select(&mut game, Selection::PawnStep { pawn, to });
    assert_eq!(game.state().board.pawn(pawn).unwrap().cell, to);

    let result = select(&mut game, Selection::Finish);
    assert!(finished(&result, card));
}

// =============================================================================
// Immediate effects
// =============================================================================

#[test]
fn test_scrounge_draws_two() {
    let mut game = new_match(MatchConfig::default(), 3);
    let card = ready(&mut game, "Scrounge");
    let before = game.state().zones.hand(P1).len();

    let result = activate(&mut game, card);
    assert!(finished(&result, card));
    assert_eq!(game.state().zones.hand(P1).len(), before + 1);
}

#[test]
fn test_gilded_vault_scores_and_draws_gold() {
    let mut game = new_match(MatchConfig::default(), 3);
    let card = ready(&mut game, "Gilded Vault");
    assert_eq!(game.state().zones.hand(P1).gold_cards(), 1);

    activate(&mut game, card);
    assert_eq!(game.score(P1), 2);
    assert!(!game.state().zones.in_hand(P1, card));
    assert_eq!(game.state().zones.hand(P1).gold_cards(), 1);
}

// =============================================================================
// Back
// =============================================================================

#[test]
fn test_back_discards_card_and_keeps_activation_spent() {
    let mut game = new_match(MatchConfig::default(), 3);
    let card = ready(&mut game, "Shovel Crew");
    activate(&mut game, card);

    let result = act(&mut game, P1, ActionKind::Back);
    assert!(result.is_accepted());
    assert!(result.events.contains(&MatchEvent::PendingCancelled { player: P1 }));
    assert!(game.awaiting().is_none());
    assert_eq!(
        game.state().zones.instance(card).unwrap().location,
        CardLocation::Discard
    );
    assert_eq!(game.state().turn.activations_used, 1);
    assert_eq!(game.phase(), Phase::Finally);
}
