//! Building stock and price curves.

use serde::{Deserialize, Serialize};

use crate::core::{BuildingFamily, BuildingKind, PlayerId, PlayerMap, Rejection, ResourceKind, ResourceMap};

/// One player's building economy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerBuildings {
    /// Per family, never increases.
    remaining: [u32; 3],
    /// Per family, increases by one per build.
    price: [u32; 3],
    /// Per concrete kind (see `BuildingKind::index`).
    built: [u32; 5],
}

impl PlayerBuildings {
    fn new(base_price: u32, stock: u32) -> Self {
        Self {
            remaining: [stock; 3],
            price: [base_price; 3],
            built: [0; 5],
        }
    }

    #[must_use]
    pub fn remaining(&self, family: BuildingFamily) -> u32 {
        self.remaining[family.index()]
    }

    #[must_use]
    pub fn price(&self, family: BuildingFamily) -> u32 {
        self.price[family.index()]
    }

    #[must_use]
    pub fn built(&self, kind: BuildingKind) -> u32 {
        self.built[kind.index()]
    }

    /// Buildings of a family currently standing.
    #[must_use]
    pub fn built_family(&self, family: BuildingFamily) -> u32 {
        BuildingKind::ALL
            .iter()
            .filter(|k| k.family() == family)
            .map(|k| self.built(*k))
            .sum()
    }

    /// Standing mines per material.
    #[must_use]
    pub fn mines(&self) -> ResourceMap {
        let mut mines = ResourceMap::empty();
        for kind in ResourceKind::LAYERED {
            mines[kind] = self.built(BuildingKind::Mine(kind));
        }
        mines
    }

    /// True once every family's stock is used up.
    #[must_use]
    pub fn all_exhausted(&self) -> bool {
        self.remaining.iter().all(|&r| r == 0)
    }
}

/// What a successful build changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildRecord {
    /// Price after the build.
    pub new_price: u32,
    pub remaining: u32,
    /// This build used up the last family with stock.
    pub exhausted_all: bool,
}

/// Building economy for both players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingLedger {
    players: PlayerMap<PlayerBuildings>,
}

impl BuildingLedger {
    #[must_use]
    pub fn new(base_price: u32, stock: u32) -> Self {
        Self {
            players: PlayerMap::new(|_| PlayerBuildings::new(base_price, stock)),
        }
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerBuildings {
        &self.players[player]
    }

    /// Price to pay for the next building of `kind`'s family, or why not.
    pub fn quote(&self, player: PlayerId, kind: BuildingKind) -> Result<u32, Rejection> {
        let family = kind.family();
        let economy = &self.players[player];
        if economy.remaining(family) == 0 {
            return Err(Rejection::NoneRemaining(family));
        }
        Ok(economy.price(family))
    }

    /// Record a paid build: price +1, stock -1, built +1.
    ///
    /// Panics if the family has no stock; callers `quote` first.
    pub fn record_build(&mut self, player: PlayerId, kind: BuildingKind) -> BuildRecord {
        let economy = &mut self.players[player];
        let family = kind.family().index();
        assert!(economy.remaining[family] > 0, "building stock would go negative");

        economy.remaining[family] -= 1;
        economy.price[family] += 1;
        economy.built[kind.index()] += 1;

        BuildRecord {
            new_price: economy.price[family],
            remaining: economy.remaining[family],
            exhausted_all: economy.all_exhausted(),
        }
    }

    /// Record a destroyed building. Stock is not restored.
    pub fn record_destroyed(&mut self, player: PlayerId, kind: BuildingKind) {
        let built = &mut self.players[player].built[kind.index()];
        assert!(*built > 0, "built count would go negative");
        *built -= 1;
    }
}
