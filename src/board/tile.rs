//! Layered tiles.

use serde::{Deserialize, Serialize};

use super::{BuildingId, PawnId};
use crate::core::{ResourceKind, ResourceMap};

/// Dig depth of a tile. Digging moves one step down the order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    Grass,
    Dirt,
    Stone,
    Bedrock,
}

impl Layer {
    /// Material surfaced by digging this layer, ignoring gold.
    #[must_use]
    pub const fn material(self) -> Option<ResourceKind> {
        match self {
            Layer::Grass => Some(ResourceKind::Grass),
            Layer::Dirt => Some(ResourceKind::Dirt),
            Layer::Stone => Some(ResourceKind::Stone),
            Layer::Bedrock => None,
        }
    }

    #[must_use]
    pub const fn below(self) -> Layer {
        match self {
            Layer::Grass => Layer::Dirt,
            Layer::Dirt => Layer::Stone,
            Layer::Stone | Layer::Bedrock => Layer::Bedrock,
        }
    }

    /// Layer that placing `kind` on top of this one produces, if legal.
    #[must_use]
    pub const fn raised_by(self, kind: ResourceKind) -> Option<Layer> {
        match (self, kind) {
            (Layer::Dirt, ResourceKind::Grass) => Some(Layer::Grass),
            (Layer::Stone, ResourceKind::Dirt) => Some(Layer::Dirt),
            (Layer::Bedrock, ResourceKind::Stone) => Some(Layer::Stone),
            _ => None,
        }
    }
}

/// One board cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub layer: Layer,
    /// Fixed at setup; cleared when the gold is dug up or the cell is
    /// restored from bedrock.
    pub has_gold: bool,
    /// Whether `has_gold` is public knowledge.
    pub revealed: bool,
    pub pawn: Option<PawnId>,
    pub building: Option<BuildingId>,
}

impl Tile {
    #[must_use]
    pub fn new(has_gold: bool) -> Self {
        Self {
            layer: Layer::Grass,
            has_gold,
            revealed: false,
            pawn: None,
            building: None,
        }
    }

    /// Material digging surfaces. A gold-bearing stone gives Gold only
    /// when the digger reveals it.
    #[must_use]
    pub fn dug_material(&self, reveal_gold: bool) -> Option<ResourceKind> {
        match self.layer {
            Layer::Stone if self.has_gold && reveal_gold => Some(ResourceKind::Gold),
            layer => layer.material(),
        }
    }

    /// Stone layer on top with gold in it.
    #[must_use]
    pub fn holds_gold(&self) -> bool {
        self.layer == Layer::Stone && self.has_gold
    }

    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.pawn.is_some() || self.building.is_some()
    }

    /// Resource units still held in this tile's layers.
    #[must_use]
    pub fn units(&self) -> ResourceMap {
        let mut units = ResourceMap::empty();
        let deep = if self.has_gold {
            ResourceKind::Gold
        } else {
            ResourceKind::Stone
        };
        if self.layer <= Layer::Grass {
            units[ResourceKind::Grass] += 1;
        }
        if self.layer <= Layer::Dirt {
            units[ResourceKind::Dirt] += 1;
        }
        if self.layer <= Layer::Stone {
            units[deep] += 1;
        }
        units
    }
}
