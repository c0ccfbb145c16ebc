//! Card-value payment rule.
//!
//! Buildings and the end-of-turn discard are paid with cards. A cost of
//! N cards of a suit is met by a selection worth exactly 2N, where a card
//! of the required suit (or any Gold card, or any card when the
//! requirement is `Any`) is worth 2 and every other card is worth 1.
//! Over- and under-payment are both rejected.

use serde::{Deserialize, Serialize};

use crate::core::ResourceKind;

/// Which suit a payment asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuitRequirement {
    Suit(ResourceKind),
    Any,
}

impl std::fmt::Display for SuitRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuitRequirement::Suit(kind) => write!(f, "{kind}"),
            SuitRequirement::Any => f.write_str("any"),
        }
    }
}

/// A card payment of `count` cards of `suit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRequirement {
    pub suit: SuitRequirement,
    pub count: u32,
}

impl CardRequirement {
    #[must_use]
    pub const fn new(suit: SuitRequirement, count: u32) -> Self {
        Self { suit, count }
    }

    /// Exact selection value that satisfies this requirement.
    #[must_use]
    pub const fn required_value(&self) -> u32 {
        self.count * 2
    }

    /// Value of one card of `suit` toward this requirement.
    #[must_use]
    pub fn card_value(&self, suit: ResourceKind) -> u32 {
        match self.suit {
            SuitRequirement::Any => 2,
            SuitRequirement::Suit(required) if suit == required || suit == ResourceKind::Gold => 2,
            SuitRequirement::Suit(_) => 1,
        }
    }

    /// Total value of a selection, given the suits of the selected cards.
    pub fn selection_value(&self, suits: impl IntoIterator<Item = ResourceKind>) -> u32 {
        suits.into_iter().map(|s| self.card_value(s)).sum()
    }

    /// Whether a selection pays exactly.
    pub fn is_satisfied_by(&self, suits: impl IntoIterator<Item = ResourceKind>) -> bool {
        self.selection_value(suits) == self.required_value()
    }
}
