//! Player hands: fixed hand slots, persistent slots and card counters.

use serde::{Deserialize, Serialize};

use super::CardUid;
use crate::core::Rejection;

/// A card sitting in a persistent slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentCard {
    pub card: CardUid,
    /// Once-per-round abilities mark this.
    pub used_this_round: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    slots: Vec<Option<CardUid>>,
    persistent: Vec<Option<PersistentCard>>,
    plain_cards: u32,
    gold_cards: u32,
}

impl Hand {
    #[must_use]
    pub fn new(hand_slots: usize, persistent_slots: usize) -> Self {
        Self {
            slots: vec![None; hand_slots],
            persistent: vec![None; persistent_slots],
            plain_cards: 0,
            gold_cards: 0,
        }
    }

    /// First empty hand slot.
    #[must_use]
    pub fn open_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    #[must_use]
    pub fn open_persistent_slot(&self) -> Option<usize> {
        self.persistent.iter().position(Option::is_none)
    }

    /// Cards in hand (persistent slots excluded).
    #[must_use]
    pub fn len(&self) -> u32 {
        self.plain_cards + self.gold_cards
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn gold_cards(&self) -> u32 {
        self.gold_cards
    }

    #[must_use]
    pub fn plain_cards(&self) -> u32 {
        self.plain_cards
    }

    /// Cards in hand slot order.
    pub fn cards(&self) -> impl Iterator<Item = CardUid> + '_ {
        self.slots.iter().flatten().copied()
    }

    #[must_use]
    pub fn slots(&self) -> &[Option<CardUid>] {
        &self.slots
    }

    #[must_use]
    pub fn slot_of(&self, card: CardUid) -> Option<usize> {
        self.slots.iter().position(|s| *s == Some(card))
    }

    #[must_use]
    pub fn contains(&self, card: CardUid) -> bool {
        self.slot_of(card).is_some()
    }

    pub fn persistent(&self) -> impl Iterator<Item = &PersistentCard> {
        self.persistent.iter().flatten()
    }

    #[must_use]
    pub fn persistent_slot_of(&self, card: CardUid) -> Option<usize> {
        self.persistent
            .iter()
            .position(|s| s.is_some_and(|p| p.card == card))
    }

    fn counter(&mut self, gold: bool) -> &mut u32 {
        if gold {
            &mut self.gold_cards
        } else {
            &mut self.plain_cards
        }
    }

    /// Put a card in the first open hand slot.
    pub fn insert(&mut self, card: CardUid, gold: bool) -> Result<usize, Rejection> {
        let slot = self
            .open_slot()
            .ok_or_else(|| Rejection::SlotUnavailable("hand".into()))?;
        self.slots[slot] = Some(card);
        *self.counter(gold) += 1;
        Ok(slot)
    }

    /// Take a card out of its hand slot. Returns the freed slot.
    pub fn remove(&mut self, card: CardUid, gold: bool) -> Option<usize> {
        let slot = self.slot_of(card)?;
        self.slots[slot] = None;
        let counter = self.counter(gold);
        *counter = counter.saturating_sub(1);
        Some(slot)
    }

    /// Move a card from its hand slot to an open persistent slot.
    ///
    /// Fails without changes when no persistent slot is open.
    pub fn make_persistent(&mut self, card: CardUid, gold: bool) -> Result<usize, Rejection> {
        let target = self
            .open_persistent_slot()
            .ok_or_else(|| Rejection::SlotUnavailable("persistent".into()))?;
        if self.remove(card, gold).is_none() {
            return Err(Rejection::UnknownCard(card));
        }
        self.persistent[target] = Some(PersistentCard {
            card,
            used_this_round: false,
        });
        Ok(target)
    }

    pub fn remove_persistent(&mut self, card: CardUid) -> bool {
        match self.persistent_slot_of(card) {
            Some(slot) => {
                self.persistent[slot] = None;
                true
            }
            None => false,
        }
    }

    /// Mark a persistent card used. Returns false if it was already used.
    pub fn mark_used(&mut self, card: CardUid) -> bool {
        let Some(slot) = self.persistent_slot_of(card) else {
            return false;
        };
        match &mut self.persistent[slot] {
            Some(p) if !p.used_this_round => {
                p.used_this_round = true;
                true
            }
            _ => false,
        }
    }

    pub fn reset_round_flags(&mut self) {
        for p in self.persistent.iter_mut().flatten() {
            p.used_this_round = false;
        }
    }
}
