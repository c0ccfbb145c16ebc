//! Draw piles and the shared discard pile.
//!
//! Draws pick uniformly at random from the remaining cards. An empty
//! universal deck is refilled from the discard pile; the gold deck is
//! never refilled.

use serde::{Deserialize, Serialize};

use super::CardUid;
use crate::cards::DeckKind;
use crate::core::GameRng;

/// A card drawn from a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Draw {
    pub card: CardUid,
    /// The discard pile was shuffled back in before this draw.
    pub reshuffled: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDeck {
    universal: Vec<CardUid>,
    gold: Vec<CardUid>,
    discard: Vec<CardUid>,
}

impl CardDeck {
    #[must_use]
    pub fn new(universal: Vec<CardUid>, gold: Vec<CardUid>) -> Self {
        Self {
            universal,
            gold,
            discard: Vec::new(),
        }
    }

    fn pile(&self, deck: DeckKind) -> &Vec<CardUid> {
        match deck {
            DeckKind::Universal => &self.universal,
            DeckKind::Gold => &self.gold,
        }
    }

    #[must_use]
    pub fn remaining(&self, deck: DeckKind) -> usize {
        self.pile(deck).len()
    }

    #[must_use]
    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    #[must_use]
    pub fn discard_pile(&self) -> &[CardUid] {
        &self.discard
    }

    /// Whether a draw from `deck` would produce a card.
    #[must_use]
    pub fn can_draw(&self, deck: DeckKind) -> bool {
        match deck {
            DeckKind::Universal => !self.universal.is_empty() || !self.discard.is_empty(),
            DeckKind::Gold => !self.gold.is_empty(),
        }
    }

    /// Draw one card uniformly at random.
    pub fn draw(&mut self, deck: DeckKind, rng: &mut GameRng) -> Option<Draw> {
        let mut reshuffled = false;
        if deck == DeckKind::Universal && self.universal.is_empty() && !self.discard.is_empty() {
            self.universal.append(&mut self.discard);
            reshuffled = true;
        }

        let pile = match deck {
            DeckKind::Universal => &mut self.universal,
            DeckKind::Gold => &mut self.gold,
        };
        if pile.is_empty() {
            return None;
        }
        let index = rng.pick_index(pile.len());
        let card = pile.swap_remove(index);
        Some(Draw { card, reshuffled })
    }

    /// Pull a specific card out of `deck`.
    pub fn take(&mut self, deck: DeckKind, card: CardUid) -> bool {
        let pile = match deck {
            DeckKind::Universal => &mut self.universal,
            DeckKind::Gold => &mut self.gold,
        };
        match pile.iter().position(|&c| c == card) {
            Some(index) => {
                pile.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub fn discard(&mut self, card: CardUid) {
        self.discard.push(card);
    }
}
