//! Card instance tracking across decks, hands and the discard pile.
//!
//! `CardZones` owns every physical card copy in the match. Each copy has
//! a `CardUid` and a recorded `CardLocation`; all movement goes through
//! this type so the recorded location and the containers never disagree.

use log::debug;
use serde::{Deserialize, Serialize};

use super::deck::{CardDeck, Draw};
use super::hand::{Hand, PersistentCard};
use crate::cards::{CardId, DeckKind, DeckList};
use crate::core::{GameRng, PlayerId, PlayerMap, Rejection};

/// Unique identifier of one physical card copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardUid(pub u32);

impl std::fmt::Display for CardUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "card #{}", self.0)
    }
}

/// Where a card copy currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardLocation {
    Deck(DeckKind),
    Discard,
    Hand { player: PlayerId, slot: usize },
    Persistent { player: PlayerId, slot: usize },
}

/// Runtime state of one card copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    pub uid: CardUid,
    pub card: CardId,
    pub gold: bool,
    pub location: CardLocation,
}

/// Result of asking for a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn(Draw),
    /// No open hand slot; nothing was drawn.
    HandFull,
    /// The deck (and, for the universal deck, the discard pile) is empty.
    DeckEmpty,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardZones {
    instances: Vec<CardInstance>,
    deck: CardDeck,
    hands: PlayerMap<Hand>,
}

impl CardZones {
    /// Create every copy named in `decks` and put it in its deck.
    #[must_use]
    pub fn new(decks: &DeckList, hand_slots: usize, persistent_slots: usize) -> Self {
        let mut instances = Vec::new();
        let mut piles = [Vec::new(), Vec::new()];

        let lists = [(DeckKind::Universal, &decks.universal), (DeckKind::Gold, &decks.gold)];
        for (pile, (kind, list)) in lists.into_iter().enumerate() {
            for &(card, copies) in list {
                for _ in 0..copies {
                    let uid = CardUid(instances.len() as u32);
                    instances.push(CardInstance {
                        uid,
                        card,
                        gold: kind == DeckKind::Gold,
                        location: CardLocation::Deck(kind),
                    });
                    piles[pile].push(uid);
                }
            }
        }

        let [universal, gold] = piles;
        Self {
            instances,
            deck: CardDeck::new(universal, gold),
            hands: PlayerMap::new(|_| Hand::new(hand_slots, persistent_slots)),
        }
    }

    #[must_use]
    pub fn instance(&self, uid: CardUid) -> Option<&CardInstance> {
        self.instances.get(uid.0 as usize)
    }

    #[must_use]
    pub fn instances(&self) -> &[CardInstance] {
        &self.instances
    }

    #[must_use]
    pub fn card_id(&self, uid: CardUid) -> Option<CardId> {
        self.instance(uid).map(|i| i.card)
    }

    #[must_use]
    pub fn deck(&self) -> &CardDeck {
        &self.deck
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &Hand {
        &self.hands[player]
    }

    #[must_use]
    pub fn in_hand(&self, player: PlayerId, uid: CardUid) -> bool {
        self.hands[player].contains(uid)
    }

    pub fn persistent_cards(&self, player: PlayerId) -> impl Iterator<Item = &PersistentCard> {
        self.hands[player].persistent()
    }

    fn set_location(&mut self, uid: CardUid, location: CardLocation) {
        self.instances[uid.0 as usize].location = location;
    }

    /// Draw a card from `deck` into `player`'s hand.
    pub fn draw(&mut self, player: PlayerId, deck: DeckKind, rng: &mut GameRng) -> DrawOutcome {
        if self.hands[player].open_slot().is_none() {
            return DrawOutcome::HandFull;
        }
        let Some(draw) = self.deck.draw(deck, rng) else {
            return DrawOutcome::DeckEmpty;
        };

        if draw.reshuffled {
            debug!("discard pile shuffled back into the universal deck");
            for instance in &mut self.instances {
                if instance.location == CardLocation::Discard {
                    instance.location = CardLocation::Deck(DeckKind::Universal);
                }
            }
        }

        let gold = self.instances[draw.card.0 as usize].gold;
        match self.hands[player].insert(draw.card, gold) {
            Ok(slot) => {
                self.set_location(draw.card, CardLocation::Hand { player, slot });
                DrawOutcome::Drawn(draw)
            }
            // Slot availability was checked above.
            Err(_) => DrawOutcome::HandFull,
        }
    }

    /// Move a specific card from its deck into `player`'s hand.
    ///
    /// Used to set up scenarios and by tooling; normal play draws at random.
    pub fn deal(&mut self, player: PlayerId, uid: CardUid) -> Result<usize, Rejection> {
        let instance = self.instance(uid).ok_or(Rejection::UnknownCard(uid))?;
        let (gold, location) = (instance.gold, instance.location);
        let CardLocation::Deck(kind) = location else {
            return Err(Rejection::UnknownCard(uid));
        };
        if self.hands[player].open_slot().is_none() {
            return Err(Rejection::SlotUnavailable("hand".into()));
        }
        self.deck.take(kind, uid);
        let slot = self.hands[player].insert(uid, gold)?;
        self.set_location(uid, CardLocation::Hand { player, slot });
        Ok(slot)
    }

    /// Move a card from a hand or persistent slot to the discard pile.
    pub fn discard(&mut self, uid: CardUid) -> Result<(), Rejection> {
        let instance = self.instance(uid).ok_or(Rejection::UnknownCard(uid))?;
        let gold = instance.gold;
        match instance.location {
            CardLocation::Hand { player, .. } => {
                self.hands[player].remove(uid, gold);
            }
            CardLocation::Persistent { player, .. } => {
                self.hands[player].remove_persistent(uid);
            }
            CardLocation::Deck(_) | CardLocation::Discard => {
                return Err(Rejection::UnknownCard(uid));
            }
        }
        self.deck.discard(uid);
        self.set_location(uid, CardLocation::Discard);
        Ok(())
    }

    /// Move a card from `player`'s hand to a persistent slot.
    pub fn make_persistent(&mut self, player: PlayerId, uid: CardUid) -> Result<usize, Rejection> {
        let gold = self.instance(uid).ok_or(Rejection::UnknownCard(uid))?.gold;
        let slot = self.hands[player].make_persistent(uid, gold)?;
        self.set_location(uid, CardLocation::Persistent { player, slot });
        Ok(slot)
    }

    pub fn mark_used(&mut self, player: PlayerId, uid: CardUid) -> bool {
        self.hands[player].mark_used(uid)
    }

    pub fn reset_round_flags(&mut self, player: PlayerId) {
        self.hands[player].reset_round_flags();
    }
}
