//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card type: its
//! suit, activation cost, lifecycle flags and the name of the effect it
//! runs. Where a particular copy currently sits is tracked separately by
//! the zones module.

use serde::{Deserialize, Serialize};

use crate::core::{ResourceKind, ResourceMap};

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g., "Transmutation"),
/// not a specific copy in a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use dig_engine::cards::{CardDefinition, CardId};
/// use dig_engine::core::ResourceKind;
///
/// let card = CardDefinition::new(CardId::new(1), "Transmutation", ResourceKind::Gold)
///     .with_cost(&[(ResourceKind::Gold, 1)])
///     .with_effect("transmutation");
///
/// assert!(card.is_gold());
/// assert_eq!(card.cost[ResourceKind::Gold], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub suit: ResourceKind,
    /// Refined resources spent to activate.
    pub cost: ResourceMap,
    /// Moves to a persistent slot instead of the discard pile.
    pub persistent: bool,
    /// Acts against the opponent; can be blocked.
    pub disaster: bool,
    /// Key into the effect library.
    pub effect: String,
}

impl CardDefinition {
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, suit: ResourceKind) -> Self {
        Self {
            id,
            name: name.into(),
            suit,
            cost: ResourceMap::empty(),
            persistent: false,
            disaster: false,
            effect: String::new(),
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: &[(ResourceKind, u32)]) -> Self {
        self.cost = ResourceMap::from_pairs(cost);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effect = effect.into();
        self
    }

    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    #[must_use]
    pub fn disaster(mut self) -> Self {
        self.disaster = true;
        self
    }

    /// Gold-suited cards come from the gold deck and count as gold cards.
    #[must_use]
    pub fn is_gold(&self) -> bool {
        self.suit == ResourceKind::Gold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_builder_flags() {
        let card = CardDefinition::new(CardId::new(2), "Rockslide", ResourceKind::Stone)
            .with_cost(&[(ResourceKind::Stone, 2)])
            .disaster()
            .with_effect("rockslide");

        assert!(card.disaster);
        assert!(!card.persistent);
        assert!(!card.is_gold());
        assert_eq!(card.effect, "rockslide");
        assert_eq!(card.cost.total(), 2);
    }

    #[test]
    fn test_definition_serialization() {
        let card = CardDefinition::new(CardId::new(3), "Safeguard", ResourceKind::Grass).persistent();
        let json = serde_json::to_string(&card).unwrap();
        let back: CardDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(card, back);
    }
}
