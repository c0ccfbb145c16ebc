//! Resource ledger.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PlayerMap, Rejection, ResourceKind, ResourceMap};

/// Which pile a stolen unit came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StealSource {
    Collected,
    Refined,
}

/// Per-player resource piles plus the shared supply.
///
/// ## Example
///
/// ```
/// use dig_engine::core::{PlayerId, ResourceKind, ResourceMap};
/// use dig_engine::economy::ResourceLedger;
///
/// let mut ledger = ResourceLedger::new(ResourceMap::empty());
/// ledger.collect(PlayerId::ONE, ResourceKind::Grass, 2);
/// ledger.refine_all(PlayerId::ONE);
///
/// let cost = ResourceMap::from_pairs(&[(ResourceKind::Grass, 2)]);
/// assert!(ledger.spend_refined(PlayerId::ONE, &cost).is_ok());
/// assert_eq!(ledger.supply()[ResourceKind::Grass], 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLedger {
    collected: PlayerMap<ResourceMap>,
    refined: PlayerMap<ResourceMap>,
    supply: ResourceMap,
}

impl ResourceLedger {
    #[must_use]
    pub fn new(supply: ResourceMap) -> Self {
        Self {
            collected: PlayerMap::default(),
            refined: PlayerMap::default(),
            supply,
        }
    }

    #[must_use]
    pub fn collected(&self, player: PlayerId) -> &ResourceMap {
        &self.collected[player]
    }

    #[must_use]
    pub fn refined(&self, player: PlayerId) -> &ResourceMap {
        &self.refined[player]
    }

    #[must_use]
    pub fn supply(&self) -> &ResourceMap {
        &self.supply
    }

    /// Units held by both players plus the supply.
    #[must_use]
    pub fn totals(&self) -> ResourceMap {
        let mut total = self.supply;
        for player in PlayerId::all() {
            total.add(&self.collected[player]);
            total.add(&self.refined[player]);
        }
        total
    }

    /// Add freshly dug units to a player's Collected pile.
    pub fn collect(&mut self, player: PlayerId, kind: ResourceKind, amount: u32) {
        self.collected[player][kind] += amount;
    }

    /// Move everything Collected into Refined. Returns what moved.
    pub fn refine_all(&mut self, player: PlayerId) -> ResourceMap {
        let moved = self.collected[player].take_all();
        self.refined[player].add(&moved);
        debug!("{player} refined {moved}");
        moved
    }

    /// Pay `costs` from Refined into Supply. No change on failure.
    pub fn spend_refined(&mut self, player: PlayerId, costs: &ResourceMap) -> Result<(), Rejection> {
        let refined = &mut self.refined[player];
        if !refined.covers(costs) {
            return Err(Rejection::InsufficientResources {
                needed: *costs,
                available: *refined,
            });
        }
        refined.subtract(costs);
        self.supply.add(costs);
        Ok(())
    }

    /// Move one unit from Supply into a player's Collected pile.
    ///
    /// Returns false (no change) when the supply of `kind` is empty.
    pub fn claim_from_supply(&mut self, player: PlayerId, kind: ResourceKind) -> bool {
        if self.supply[kind] == 0 {
            return false;
        }
        self.supply[kind] -= 1;
        self.collected[player][kind] += 1;
        true
    }

    /// Take one unit out of Supply to be placed on the board.
    pub fn take_supply_for_board(&mut self, kind: ResourceKind) -> bool {
        if self.supply[kind] == 0 {
            return false;
        }
        self.supply[kind] -= 1;
        true
    }

    /// Take one unit out of a player's Collected pile to be placed on the board.
    pub fn take_collected_for_board(&mut self, player: PlayerId, kind: ResourceKind) -> bool {
        let pile = &mut self.collected[player][kind];
        if *pile == 0 {
            return false;
        }
        *pile -= 1;
        true
    }

    /// Units of `kind` a victim could lose to a steal.
    #[must_use]
    pub fn stealable(&self, victim: PlayerId, kind: ResourceKind) -> u32 {
        self.collected[victim][kind] + self.refined[victim][kind]
    }

    /// Move one unit from `victim` (Collected first, then Refined) to
    /// `thief`'s Collected pile.
    pub fn steal(
        &mut self,
        victim: PlayerId,
        thief: PlayerId,
        kind: ResourceKind,
    ) -> Option<StealSource> {
        let source = if self.collected[victim][kind] > 0 {
            self.collected[victim][kind] -= 1;
            StealSource::Collected
        } else if self.refined[victim][kind] > 0 {
            self.refined[victim][kind] -= 1;
            StealSource::Refined
        } else {
            return None;
        };
        self.collected[thief][kind] += 1;
        Some(source)
    }

    /// Run every mine once: one unit of the mine's material moves from
    /// Supply to Collected while supply lasts. Returns the units produced.
    pub fn activate_mines(&mut self, player: PlayerId, mines: &ResourceMap) -> ResourceMap {
        let mut produced = ResourceMap::empty();
        for (kind, count) in mines.nonzero() {
            for _ in 0..count {
                if !self.claim_from_supply(player, kind) {
                    debug!("{player}'s {kind} mine idle: supply exhausted");
                    break;
                }
                produced[kind] += 1;
            }
        }
        produced
    }
}
