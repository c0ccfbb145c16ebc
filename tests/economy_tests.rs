//! Ledger, building and deck tests.
//!
//! These tests exercise the bookkeeping types directly, without a match:
//! - Collected/Refined/Supply transfers
//! - Building prices and stock
//! - Universal reshuffle and the exhaustible gold deck

use dig_engine::cards::{standard_cards, DeckKind, DeckList};
use dig_engine::core::{
    BuildingFamily, BuildingKind, GameRng, PlayerId, Rejection, ResourceKind, ResourceMap,
};
use dig_engine::economy::{BuildingLedger, ResourceLedger, StealSource};
use dig_engine::zones::{CardDeck, CardUid, CardZones, DrawOutcome};

const P1: PlayerId = PlayerId::ONE;
const P2: PlayerId = PlayerId::TWO;

fn supply() -> ResourceMap {
    ResourceMap::from_pairs(&[
        (ResourceKind::Grass, 12),
        (ResourceKind::Dirt, 12),
        (ResourceKind::Stone, 12),
    ])
}

// =============================================================================
// Resource ledger
// =============================================================================

#[test_log::test]
fn test_spend_refined_pays_into_supply() {
    let mut ledger = ResourceLedger::new(supply());
    ledger.collect(P1, ResourceKind::Grass, 2);
    ledger.refine_all(P1);

    let cost = ResourceMap::from_pairs(&[(ResourceKind::Grass, 2)]);
    ledger.spend_refined(P1, &cost).unwrap();

    assert_eq!(ledger.refined(P1)[ResourceKind::Grass], 0);
    assert_eq!(ledger.supply()[ResourceKind::Grass], 14);
}

#[test]
fn test_spend_refined_shortfall_changes_nothing() {
    let mut ledger = ResourceLedger::new(supply());
    ledger.collect(P1, ResourceKind::Grass, 1);
    // Collected units are not spendable until refined.
    let cost = ResourceMap::from_pairs(&[(ResourceKind::Grass, 1)]);
    let before = ledger.clone();

    let err = ledger.spend_refined(P1, &cost).unwrap_err();
    assert!(matches!(err, Rejection::InsufficientResources { .. }));
    assert_eq!(ledger, before);
}

#[test]
fn test_refine_moves_everything() {
    let mut ledger = ResourceLedger::new(supply());
    ledger.collect(P2, ResourceKind::Dirt, 2);
    ledger.collect(P2, ResourceKind::Gold, 1);

    let moved = ledger.refine_all(P2);
    assert_eq!(moved.total(), 3);
    assert!(ledger.collected(P2).is_empty());
    assert_eq!(ledger.refined(P2)[ResourceKind::Gold], 1);
    assert!(ledger.refined(P1).is_empty());
}

#[test]
fn test_transfers_conserve_totals() {
    let mut ledger = ResourceLedger::new(supply());
    let start = ledger.totals();

    assert!(ledger.claim_from_supply(P1, ResourceKind::Stone));
    ledger.refine_all(P1);
    assert!(ledger.claim_from_supply(P1, ResourceKind::Stone));
    assert_eq!(ledger.steal(P1, P2, ResourceKind::Stone), Some(StealSource::Collected));
    assert_eq!(ledger.steal(P1, P2, ResourceKind::Stone), Some(StealSource::Refined));
    assert_eq!(ledger.steal(P1, P2, ResourceKind::Stone), None);

    assert_eq!(ledger.totals(), start);
    assert_eq!(ledger.collected(P2)[ResourceKind::Stone], 2);
}

#[test]
fn test_mines_stop_when_supply_runs_out() {
    let mut ledger = ResourceLedger::new(ResourceMap::from_pairs(&[(ResourceKind::Dirt, 1)]));
    let mines = ResourceMap::from_pairs(&[(ResourceKind::Dirt, 2), (ResourceKind::Grass, 1)]);

    let produced = ledger.activate_mines(P1, &mines);
    assert_eq!(produced, ResourceMap::from_pairs(&[(ResourceKind::Dirt, 1)]));
    assert_eq!(ledger.supply().total(), 0);
}

// =============================================================================
// Buildings
// =============================================================================

#[test]
fn test_price_rises_and_stock_runs_out() {
    let mut ledger = BuildingLedger::new(1, 2);
    assert_eq!(ledger.quote(P1, BuildingKind::Burrow), Ok(1));

    let record = ledger.record_build(P1, BuildingKind::Burrow);
    assert_eq!(record.new_price, 2);
    assert_eq!(record.remaining, 1);
    assert!(!record.exhausted_all);

    ledger.record_build(P1, BuildingKind::Burrow);
    assert_eq!(
        ledger.quote(P1, BuildingKind::Burrow),
        Err(Rejection::NoneRemaining(BuildingFamily::Burrow))
    );
    // The other player is unaffected.
    assert_eq!(ledger.quote(P2, BuildingKind::Burrow), Ok(1));
}

#[test]
fn test_mines_share_one_family() {
    let mut ledger = BuildingLedger::new(1, 3);
    ledger.record_build(P1, BuildingKind::Mine(ResourceKind::Grass));
    ledger.record_build(P1, BuildingKind::Mine(ResourceKind::Stone));

    assert_eq!(ledger.quote(P1, BuildingKind::Mine(ResourceKind::Dirt)), Ok(3));
    let economy = ledger.player(P1);
    assert_eq!(economy.built_family(BuildingFamily::Mine), 2);
    assert_eq!(
        economy.mines(),
        ResourceMap::from_pairs(&[(ResourceKind::Grass, 1), (ResourceKind::Stone, 1)])
    );
}

#[test]
fn test_exhausting_every_family() {
    let mut ledger = BuildingLedger::new(1, 1);
    assert!(!ledger.record_build(P1, BuildingKind::Factory).exhausted_all);
    assert!(!ledger.record_build(P1, BuildingKind::Burrow).exhausted_all);
    assert!(ledger.record_build(P1, BuildingKind::Mine(ResourceKind::Dirt)).exhausted_all);
}

// =============================================================================
// Decks
// =============================================================================

#[test]
fn test_universal_reshuffles_discard() {
    let mut deck = CardDeck::new(Vec::new(), Vec::new());
    for uid in 0..5 {
        deck.discard(CardUid(uid));
    }
    let mut rng = GameRng::new(21);

    let draw = deck.draw(DeckKind::Universal, &mut rng).unwrap();
    assert!(draw.reshuffled);
    assert_eq!(deck.remaining(DeckKind::Universal), 4);
    assert_eq!(deck.discard_len(), 0);
}

#[test]
fn test_empty_gold_deck_draws_nothing() {
    let decks = DeckList {
        universal: Vec::new(),
        gold: Vec::new(),
    };
    let mut zones = CardZones::new(&decks, 4, 1);
    let mut rng = GameRng::new(21);

    assert_eq!(zones.draw(P1, DeckKind::Gold, &mut rng), DrawOutcome::DeckEmpty);
    assert!(zones.hand(P1).is_empty());
}

#[test]
fn test_standard_decks_fill_zones() {
    let (registry, decks) = standard_cards();
    let zones = CardZones::new(&decks, 12, 3);

    assert_eq!(zones.instances().len() as u32, decks.total_copies());
    let gold = zones.deck().remaining(DeckKind::Gold);
    assert_eq!(gold, zones.instances().iter().filter(|i| i.gold).count());
    assert!(zones
        .instances()
        .iter()
        .filter(|i| i.gold)
        .all(|i| registry.get(i.card).is_some_and(|c| c.is_gold())));
}

#[test]
fn test_draws_are_seeded() {
    let (_, decks) = standard_cards();
    let draw_order = |seed| {
        let mut zones = CardZones::new(&decks, 12, 3);
        let mut rng = GameRng::new(seed);
        (0..6)
            .map(|_| match zones.draw(P1, DeckKind::Universal, &mut rng) {
                DrawOutcome::Drawn(draw) => draw.card,
                other => panic!("unexpected {other:?}"),
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(draw_order(5), draw_order(5));
}
