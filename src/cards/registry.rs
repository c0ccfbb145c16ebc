//! Card definitions by id and by name.
//!
//! Names are unique: effects, save files and the Python adapter refer to
//! cards by name, so two definitions sharing one would be ambiguous.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};
use crate::core::ResourceKind;

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use dig_engine::cards::{CardRegistry, CardDefinition, CardId};
/// use dig_engine::core::ResourceKind;
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::new(CardId::new(1), "Forage", ResourceKind::Grass));
///
/// let found = registry.get(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Forage");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
    names: FxHashMap<String, CardId>,
}

impl CardRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if the id or the name is already taken.
    pub fn register(&mut self, card: CardDefinition) {
        assert!(
            !self.cards.contains_key(&card.id),
            "card {:?} already registered",
            card.id
        );
        assert!(
            !self.names.contains_key(&card.name),
            "card name {:?} already registered",
            card.name
        );
        self.names.insert(card.name.clone(), card.id);
        self.cards.insert(card.id, card);
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Find a definition by its display name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&CardDefinition> {
        self.names.get(name).and_then(|id| self.cards.get(id))
    }

    /// Definitions of the given suit, in id order.
    pub fn of_suit(&self, suit: ResourceKind) -> Vec<&CardDefinition> {
        let mut found: Vec<_> = self.cards.values().filter(|c| c.suit == suit).collect();
        found.sort_by_key(|c| c.id);
        found
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(CardId::new(1), "Survey", ResourceKind::Stone));

        assert!(registry.contains(CardId::new(1)));
        assert!(!registry.contains(CardId::new(2)));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find_by_name("Survey").map(|c| c.id), Some(CardId::new(1)));
        assert!(registry.find_by_name("Nope").is_none());
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_id_panics() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(CardId::new(1), "A", ResourceKind::Dirt));
        registry.register(CardDefinition::new(CardId::new(1), "B", ResourceKind::Dirt));
    }

    #[test]
    #[should_panic(expected = "name \"A\" already registered")]
    fn test_duplicate_name_panics() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(CardId::new(1), "A", ResourceKind::Dirt));
        registry.register(CardDefinition::new(CardId::new(2), "A", ResourceKind::Grass));
    }

    #[test]
    fn test_of_suit_is_ordered() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(CardId::new(3), "Rubble", ResourceKind::Stone));
        registry.register(CardDefinition::new(CardId::new(1), "Quarry", ResourceKind::Stone));
        registry.register(CardDefinition::new(CardId::new(2), "Sod", ResourceKind::Grass));

        let stone: Vec<_> = registry.of_suit(ResourceKind::Stone).iter().map(|c| c.id).collect();
        assert_eq!(stone, vec![CardId::new(1), CardId::new(3)]);
    }
}
