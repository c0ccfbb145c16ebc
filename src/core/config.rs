//! Match configuration.
//!
//! `MatchConfig` carries the tunable numbers of the game. Defaults are the
//! standard rules; builder methods adjust individual values:
//!
//! ```
//! use dig_engine::core::MatchConfig;
//!
//! let config = MatchConfig::default()
//!     .with_winning_score(10)
//!     .with_hand_limit(5);
//!
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::{PlayerId, PlayerMap};
use super::resource::{ResourceKind, ResourceMap};
use crate::board::{BoardLayout, BoardTopology, CellId};

/// Configuration rejected by [`MatchConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("hand needs more slots ({slots}) than the hand limit ({limit})")]
    HandSlotsTooFew { slots: usize, limit: u32 },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("starting pawn for {player} is on {cell}, which is not on the board")]
    PawnOffBoard { player: PlayerId, cell: CellId },

    #[error("both players start on {0}")]
    SharedStart(CellId),

    #[error("{gold} gold cells requested on a board of {cells}")]
    TooMuchGold { gold: usize, cells: usize },
}

/// Tunable match rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Card activations per Finally phase before Burrow bonuses.
    pub card_activations_base: u32,
    /// Cards each player draws at the start of their first turn.
    pub starting_cards: u32,
    /// Hand size a player must discard down to at end of turn.
    pub hand_limit: u32,
    /// Cards drawn at end of turn before Factory bonuses.
    pub card_draw_per_turn: u32,
    /// Starting price (in cards) of every building family.
    pub base_building_price: u32,
    /// Buildings of each family a player may ever build.
    pub total_buildings_per_kind: u32,
    /// Score that ends the match.
    pub winning_score: u32,
    /// Physical hand slots.
    pub hand_slots: usize,
    /// Persistent card slots.
    pub persistent_slots: usize,
    pub board: BoardLayout,
    /// Number of stone cells hiding gold.
    pub gold_cells: usize,
    /// Shared supply at match start.
    pub starting_supply: ResourceMap,
    /// Hit points of a freshly built building.
    pub building_health: u8,
    pub starting_pawns: PlayerMap<CellId>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            card_activations_base: 1,
            starting_cards: 4,
            hand_limit: 6,
            card_draw_per_turn: 1,
            base_building_price: 1,
            total_buildings_per_kind: 5,
            winning_score: 15,
            hand_slots: 12,
            persistent_slots: 3,
            board: BoardLayout::Rect {
                width: 7,
                height: 7,
            },
            gold_cells: 12,
            starting_supply: ResourceMap::from_pairs(&[
                (ResourceKind::Grass, 12),
                (ResourceKind::Dirt, 12),
                (ResourceKind::Stone, 12),
            ]),
            building_health: 2,
            starting_pawns: PlayerMap::new(|p| if p == PlayerId::ONE { CellId(3) } else { CellId(45) }),
        }
    }
}

impl MatchConfig {
    #[must_use]
    pub fn with_card_activations(mut self, base: u32) -> Self {
        self.card_activations_base = base;
        self
    }

    #[must_use]
    pub fn with_starting_cards(mut self, cards: u32) -> Self {
        self.starting_cards = cards;
        self
    }

    #[must_use]
    pub fn with_hand_limit(mut self, limit: u32) -> Self {
        self.hand_limit = limit;
        self
    }

    #[must_use]
    pub fn with_card_draw(mut self, draw: u32) -> Self {
        self.card_draw_per_turn = draw;
        self
    }

    #[must_use]
    pub fn with_building_stock(mut self, base_price: u32, per_family: u32) -> Self {
        self.base_building_price = base_price;
        self.total_buildings_per_kind = per_family;
        self
    }

    #[must_use]
    pub fn with_winning_score(mut self, score: u32) -> Self {
        self.winning_score = score;
        self
    }

    #[must_use]
    pub fn with_supply(mut self, supply: ResourceMap) -> Self {
        self.starting_supply = supply;
        self
    }

    /// Change the board. Starting pawns must still fit it.
    #[must_use]
    pub fn with_board(mut self, board: BoardLayout, gold_cells: usize, pawns: [CellId; 2]) -> Self {
        self.board = board;
        self.gold_cells = gold_cells;
        self.starting_pawns = PlayerMap::new(|p| pawns[p.index()]);
        self
    }

    /// Check the configuration is playable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hand_slots <= self.hand_limit as usize {
            return Err(ConfigError::HandSlotsTooFew {
                slots: self.hand_slots,
                limit: self.hand_limit,
            });
        }
        if self.winning_score == 0 {
            return Err(ConfigError::Zero("winning_score"));
        }
        if self.building_health == 0 {
            return Err(ConfigError::Zero("building_health"));
        }
        if self.persistent_slots == 0 {
            return Err(ConfigError::Zero("persistent_slots"));
        }

        let topology = BoardTopology::from_layout(&self.board);
        if self.gold_cells > topology.len() {
            return Err(ConfigError::TooMuchGold {
                gold: self.gold_cells,
                cells: topology.len(),
            });
        }
        for (player, &cell) in self.starting_pawns.iter() {
            if !topology.contains(cell) {
                return Err(ConfigError::PawnOffBoard { player, cell });
            }
        }
        if self.starting_pawns[PlayerId::ONE] == self.starting_pawns[PlayerId::TWO] {
            return Err(ConfigError::SharedStart(self.starting_pawns[PlayerId::ONE]));
        }
        Ok(())
    }
}
