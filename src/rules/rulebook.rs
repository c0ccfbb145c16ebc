//! The card set a match is played with.
//!
//! A `Rulebook` ties card definitions to their effects and deck
//! composition, checked once at construction so lookups during play
//! cannot miss.

use thiserror::Error;

use crate::cards::{standard_cards, CardDefinition, CardId, CardRegistry, DeckList};
use crate::core::PlayerId;
use crate::effects::{EffectLibrary, EffectSpec, Passive};
use crate::zones::{CardUid, CardZones, PersistentCard};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RulebookError {
    #[error("card {card:?} names unknown effect {effect:?}")]
    MissingEffect { card: String, effect: String },

    #[error("deck list contains unregistered {0}")]
    UnregisteredCard(CardId),

    #[error("card {card:?} is persistent but its effect has no passive")]
    PersistentWithoutPassive { card: String },
}

#[derive(Clone, Debug)]
pub struct Rulebook {
    cards: CardRegistry,
    effects: EffectLibrary,
    decks: DeckList,
}

impl Rulebook {
    /// Assemble and check a rulebook.
    pub fn new(
        cards: CardRegistry,
        effects: EffectLibrary,
        decks: DeckList,
    ) -> Result<Self, RulebookError> {
        for card in cards.iter() {
            let Some(spec) = effects.get(&card.effect) else {
                return Err(RulebookError::MissingEffect {
                    card: card.name.clone(),
                    effect: card.effect.clone(),
                });
            };
            if card.persistent && spec.passive().is_none() {
                return Err(RulebookError::PersistentWithoutPassive {
                    card: card.name.clone(),
                });
            }
        }
        for &(id, _) in decks.universal.iter().chain(&decks.gold) {
            if !cards.contains(id) {
                return Err(RulebookError::UnregisteredCard(id));
            }
        }
        Ok(Self {
            cards,
            effects,
            decks,
        })
    }

    /// The standard card set.
    #[must_use]
    pub fn standard() -> Self {
        let (cards, decks) = standard_cards();
        Self {
            cards,
            effects: EffectLibrary::standard(),
            decks,
        }
    }

    #[must_use]
    pub fn cards(&self) -> &CardRegistry {
        &self.cards
    }

    #[must_use]
    pub fn effects(&self) -> &EffectLibrary {
        &self.effects
    }

    #[must_use]
    pub fn decks(&self) -> &DeckList {
        &self.decks
    }

    /// Definition of a physical card copy.
    #[must_use]
    pub fn definition_of(&self, zones: &CardZones, card: CardUid) -> Option<&CardDefinition> {
        zones.card_id(card).and_then(|id| self.cards.get(id))
    }

    #[must_use]
    pub fn effect_of(&self, card: CardId) -> Option<&EffectSpec> {
        self.cards
            .get(card)
            .and_then(|def| self.effects.get(&def.effect))
    }

    #[must_use]
    pub fn passive_of(&self, card: CardId) -> Option<Passive> {
        self.effect_of(card).and_then(EffectSpec::passive)
    }

    /// `player`'s persistent cards carrying `passive`.
    pub fn passive_cards<'a>(
        &'a self,
        zones: &'a CardZones,
        player: PlayerId,
        passive: Passive,
    ) -> impl Iterator<Item = &'a PersistentCard> + 'a {
        zones.persistent_cards(player).filter(move |p| {
            zones
                .card_id(p.card)
                .and_then(|id| self.passive_of(id))
                == Some(passive)
        })
    }

    #[must_use]
    pub fn has_passive(&self, zones: &CardZones, player: PlayerId, passive: Passive) -> bool {
        self.passive_cards(zones, player, passive).next().is_some()
    }
}

impl Default for Rulebook {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ResourceKind;

    #[test]
    fn test_standard_rulebook_validates() {
        let (cards, decks) = standard_cards();
        assert!(Rulebook::new(cards, EffectLibrary::standard(), decks).is_ok());
    }

    #[test]
    fn test_missing_effect_rejected() {
        let mut cards = CardRegistry::new();
        cards.register(
            CardDefinition::new(CardId::new(1), "Mystery", ResourceKind::Dirt).with_effect("nothing"),
        );
        let err = Rulebook::new(cards, EffectLibrary::new(), DeckList::default()).unwrap_err();
        assert!(matches!(err, RulebookError::MissingEffect { .. }));
    }

    #[test]
    fn test_unregistered_deck_card_rejected() {
        let mut decks = DeckList::default();
        decks.universal.push((CardId::new(99), 1));
        let err = Rulebook::new(CardRegistry::new(), EffectLibrary::new(), decks).unwrap_err();
        assert_eq!(err, RulebookError::UnregisteredCard(CardId::new(99)));
    }

    #[test]
    fn test_passive_lookup() {
        let rules = Rulebook::standard();
        let eye = rules.cards().find_by_name("Discerning Eye").unwrap().id;
        let forage = rules.cards().find_by_name("Forage").unwrap().id;
        assert_eq!(rules.passive_of(eye), Some(Passive::DiscerningEye));
        assert_eq!(rules.passive_of(forage), None);
    }
}
