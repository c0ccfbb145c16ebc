//! The standard card set.
//!
//! Every card is listed once in `STANDARD_CARDS` together with the number
//! of copies shuffled into its deck. Gold-suited cards make up the gold
//! deck; everything else goes into the universal deck.
//!
//! The `effect` column names an entry in `EffectLibrary::standard()`.

use crate::core::ResourceKind::{self, Dirt, Gold, Grass, Stone};

use super::definition::{CardDefinition, CardId};
use super::registry::CardRegistry;

/// Which deck a card is shuffled into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DeckKind {
    Universal,
    Gold,
}

impl std::fmt::Display for DeckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckKind::Universal => f.write_str("universal deck"),
            DeckKind::Gold => f.write_str("gold deck"),
        }
    }
}

/// Kind of card, as far as activation is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Form {
    Normal,
    Persistent,
    Disaster,
}

struct CardTemplate {
    name: &'static str,
    suit: ResourceKind,
    cost: &'static [(ResourceKind, u32)],
    form: Form,
    effect: &'static str,
    copies: u32,
}

const fn card(
    name: &'static str,
    suit: ResourceKind,
    cost: &'static [(ResourceKind, u32)],
    effect: &'static str,
    copies: u32,
) -> CardTemplate {
    CardTemplate { name, suit, cost, form: Form::Normal, effect, copies }
}

const fn persistent(
    name: &'static str,
    suit: ResourceKind,
    cost: &'static [(ResourceKind, u32)],
    effect: &'static str,
) -> CardTemplate {
    CardTemplate { name, suit, cost, form: Form::Persistent, effect, copies: 2 }
}

const fn disaster(
    name: &'static str,
    suit: ResourceKind,
    cost: &'static [(ResourceKind, u32)],
    effect: &'static str,
    copies: u32,
) -> CardTemplate {
    CardTemplate { name, suit, cost, form: Form::Disaster, effect, copies }
}

const STANDARD_CARDS: &[CardTemplate] = &[
    // Placement
    card("Seed Scatter", Grass, &[(Grass, 1)], "seed_scatter", 3),
    card("Overgrowth", Grass, &[(Grass, 2)], "overgrowth", 2),
    card("Topsoil", Dirt, &[(Dirt, 1)], "topsoil", 3),
    card("Landfill", Dirt, &[(Dirt, 1), (Grass, 1)], "landfill", 2),
    card("Bedrock Mending", Stone, &[(Stone, 2)], "bedrock_mending", 2),
    // Digging
    card("Shovel Crew", Grass, &[(Grass, 1)], "shovel_crew", 3),
    card("Excavation", Dirt, &[(Dirt, 1), (Grass, 1)], "excavation", 3),
    card("Deep Dig", Stone, &[(Stone, 1), (Dirt, 1)], "deep_dig", 2),
    card("Trenching", Dirt, &[(Dirt, 2)], "trenching", 2),
    // Disasters
    disaster("Rockslide", Stone, &[(Stone, 2)], "rockslide", 2),
    disaster("Sabotage", Dirt, &[(Dirt, 1), (Stone, 1)], "sabotage", 2),
    disaster("Flood", Grass, &[(Grass, 2), (Dirt, 1)], "flood", 1),
    disaster("Termites", Grass, &[(Grass, 1), (Dirt, 1)], "termites", 2),
    disaster("Pilfer", Grass, &[(Grass, 1)], "pilfer", 3),
    disaster("Raid", Stone, &[(Stone, 1), (Grass, 1)], "raid", 2),
    disaster("Gold Heist", Stone, &[(Stone, 2)], "gold_heist", 1),
    // Supply and scouting
    card("Forage", Grass, &[(Grass, 1)], "forage", 3),
    card("Quarry Cart", Stone, &[(Stone, 2)], "quarry_cart", 2),
    card("Survey", Stone, &[(Stone, 1)], "survey", 2),
    card("Prospecting", Dirt, &[(Dirt, 1)], "prospecting", 2),
    card("Trailblazer", Grass, &[(Grass, 1)], "trailblazer", 2),
    card("Tunnel Run", Dirt, &[(Dirt, 1)], "tunnel_run", 2),
    card("Harvest Festival", Grass, &[(Grass, 2), (Dirt, 2)], "harvest_festival", 2),
    card("Scrounge", Dirt, &[(Dirt, 1)], "scrounge", 3),
    // Persistent
    persistent("Discerning Eye", Stone, &[(Stone, 1), (Dirt, 1)], "discerning_eye"),
    persistent("Master Builder", Dirt, &[(Dirt, 2)], "master_builder"),
    persistent("Safeguard", Grass, &[(Grass, 2)], "safeguard"),
    persistent("Foreman", Stone, &[(Stone, 2)], "foreman"),
    // Gold deck
    card("Transmutation", Gold, &[(Gold, 1)], "transmutation", 3),
    card("Midas Touch", Gold, &[(Gold, 1), (Stone, 1)], "midas_touch", 2),
    card("Golden Shovel", Gold, &[(Gold, 1)], "golden_shovel", 2),
    card("Treasure Map", Gold, &[(Gold, 1)], "treasure_map", 2),
    card("Gilded Vault", Gold, &[(Gold, 2)], "gilded_vault", 1),
];

/// Deck composition: card definitions and how many copies of each.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeckList {
    pub universal: Vec<(CardId, u32)>,
    pub gold: Vec<(CardId, u32)>,
}

impl DeckList {
    pub fn add(&mut self, deck: DeckKind, card: CardId, copies: u32) {
        match deck {
            DeckKind::Universal => self.universal.push((card, copies)),
            DeckKind::Gold => self.gold.push((card, copies)),
        }
    }

    /// Total number of card instances across both decks.
    #[must_use]
    pub fn total_copies(&self) -> u32 {
        self.universal.iter().chain(&self.gold).map(|(_, n)| n).sum()
    }
}

/// Build the standard registry and the deck list that goes with it.
#[must_use]
pub fn standard_cards() -> (CardRegistry, DeckList) {
    let mut registry = CardRegistry::new();
    let mut decks = DeckList::default();

    for (i, template) in STANDARD_CARDS.iter().enumerate() {
        let id = CardId::new(i as u32 + 1);
        let mut def = CardDefinition::new(id, template.name, template.suit)
            .with_cost(template.cost)
            .with_effect(template.effect);
        def = match template.form {
            Form::Normal => def,
            Form::Persistent => def.persistent(),
            Form::Disaster => def.disaster(),
        };
        let deck = if def.is_gold() { DeckKind::Gold } else { DeckKind::Universal };
        decks.add(deck, id, template.copies);
        registry.register(def);
    }

    (registry, decks)
}
