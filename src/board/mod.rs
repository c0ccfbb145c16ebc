//! The board: layered tiles, pawns and buildings over a position-based
//! topology.
//!
//! The board validates and applies physical changes (digging, placing,
//! moving, building). It never touches resource ledgers; callers move the
//! surfaced or consumed units.

mod tile;
mod topology;

pub use tile::{Layer, Tile};
pub use topology::{BoardLayout, BoardTopology, CellId, DISTANCE_EPSILON};

use log::debug;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{BuildingKind, GameRng, PlayerId, Rejection, ResourceKind, ResourceMap};

/// Index of a pawn. Pawns are never removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PawnId(pub u16);

/// Unique building identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pawn {
    pub id: PawnId,
    pub owner: PlayerId,
    pub cell: CellId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub owner: PlayerId,
    pub kind: BuildingKind,
    pub cell: CellId,
    pub health: u8,
}

/// What a hit did to a building.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DamageReport {
    pub building: Building,
    pub damage: u8,
    pub destroyed: bool,
}

/// Small list of cells, sized for a hex ring.
pub type CellList = SmallVec<[CellId; 8]>;

/// Board state for the whole match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Board {
    topology: BoardTopology,
    tiles: Vec<Tile>,
    pawns: Vec<Pawn>,
    buildings: Vec<Building>,
    next_building: u32,
}

impl Board {
    /// Create a fresh board with `gold_cells` gold-bearing stones chosen
    /// uniformly at random.
    #[must_use]
    pub fn new(layout: &BoardLayout, gold_cells: usize, rng: &mut GameRng) -> Self {
        let topology = BoardTopology::from_layout(layout);
        let cells: Vec<CellId> = topology.cells().collect();
        let gold = rng.sample(&cells, gold_cells.min(cells.len()));

        let tiles = cells
            .iter()
            .map(|cell| Tile::new(gold.contains(cell)))
            .collect();

        debug!("board created: {} cells, {} gold", cells.len(), gold.len());

        Self {
            topology,
            tiles,
            pawns: Vec::new(),
            buildings: Vec::new(),
            next_building: 0,
        }
    }

    #[must_use]
    pub fn topology(&self) -> &BoardTopology {
        &self.topology
    }

    #[must_use]
    pub fn tile(&self, cell: CellId) -> Option<&Tile> {
        self.tiles.get(cell.index())
    }

    pub fn tiles(&self) -> impl Iterator<Item = (CellId, &Tile)> {
        self.topology.cells().zip(self.tiles.iter())
    }

    fn checked_tile(&self, cell: CellId) -> Result<&Tile, Rejection> {
        self.tile(cell)
            .ok_or_else(|| Rejection::target(format!("{cell} is not on the board")))
    }

    /// Resource units still held by all tiles.
    #[must_use]
    pub fn units_on_board(&self) -> ResourceMap {
        let mut total = ResourceMap::empty();
        for tile in &self.tiles {
            total.add(&tile.units());
        }
        total
    }

    // === Pawns ===

    #[must_use]
    pub fn pawns(&self) -> &[Pawn] {
        &self.pawns
    }

    #[must_use]
    pub fn pawn(&self, id: PawnId) -> Option<&Pawn> {
        self.pawns.get(usize::from(id.0))
    }

    pub fn pawns_of(&self, owner: PlayerId) -> impl Iterator<Item = &Pawn> {
        self.pawns.iter().filter(move |p| p.owner == owner)
    }

    /// Put a new pawn on a free cell.
    pub fn add_pawn(&mut self, owner: PlayerId, cell: CellId) -> Result<PawnId, Rejection> {
        if self.checked_tile(cell)?.is_occupied() {
            return Err(Rejection::target(format!("{cell} is occupied")));
        }
        let id = PawnId(self.pawns.len() as u16);
        self.pawns.push(Pawn { id, owner, cell });
        self.tiles[cell.index()].pawn = Some(id);
        Ok(id)
    }

    /// Cells a pawn may step to.
    #[must_use]
    pub fn move_targets(&self, pawn: PawnId) -> CellList {
        let Some(pawn) = self.pawn(pawn) else {
            return CellList::new();
        };
        self.topology
            .adjacent_cells(pawn.cell)
            .iter()
            .copied()
            .filter(|&c| !self.tiles[c.index()].is_occupied())
            .collect()
    }

    /// Move one of `owner`'s pawns one step. Returns the cell it left.
    pub fn move_pawn(
        &mut self,
        owner: PlayerId,
        pawn: PawnId,
        to: CellId,
    ) -> Result<CellId, Rejection> {
        let from = match self.pawn(pawn) {
            Some(p) if p.owner == owner => p.cell,
            _ => return Err(Rejection::target(format!("pawn {} is not yours", pawn.0))),
        };
        if !self.move_targets(pawn).contains(&to) {
            return Err(Rejection::target(format!("pawn cannot move to {to}")));
        }

        self.tiles[from.index()].pawn = None;
        self.tiles[to.index()].pawn = Some(pawn);
        self.pawns[usize::from(pawn.0)].cell = to;
        Ok(from)
    }

    #[must_use]
    pub fn is_adjacent_to_pawn(&self, owner: PlayerId, cell: CellId) -> bool {
        self.pawns_of(owner)
            .any(|p| self.topology.are_adjacent(p.cell, cell))
    }

    /// Every cell adjacent to at least one of `owner`'s pawns, ascending.
    #[must_use]
    pub fn cells_near_pawns(&self, owner: PlayerId) -> Vec<CellId> {
        let mut cells: Vec<CellId> = self
            .pawns_of(owner)
            .flat_map(|p| self.topology.adjacent_cells(p.cell).iter().copied())
            .collect();
        cells.sort_unstable();
        cells.dedup();
        cells
    }

    /// Spawn a pawn next to `near`, or on the first free cell if none is.
    pub fn spawn_pawn(&mut self, owner: PlayerId, near: CellId) -> Option<(PawnId, CellId)> {
        let is_free = |board: &Self, c: CellId| !board.tiles[c.index()].is_occupied();
        let spot = self
            .topology
            .adjacent_cells(near)
            .iter()
            .copied()
            .find(|&c| is_free(self, c))
            .or_else(|| self.topology.cells().find(|&c| is_free(self, c)))?;

        let id = self.add_pawn(owner, spot).ok()?;
        Some((id, spot))
    }

    // === Digging and placing ===

    /// Cell can be dug: exists, unoccupied, not bedrock.
    #[must_use]
    pub fn is_diggable(&self, cell: CellId) -> bool {
        self.tile(cell)
            .is_some_and(|t| !t.is_occupied() && t.layer != Layer::Bedrock)
    }

    /// Dig one layer. Returns the surfaced material.
    ///
    /// With `reveal_gold`, a gold-bearing stone surfaces as Gold and the
    /// cell becomes revealed. Otherwise the digger takes Stone and the
    /// gold stays hidden in the bedrock.
    pub fn dig(&mut self, cell: CellId, reveal_gold: bool) -> Result<ResourceKind, Rejection> {
        let tile = self.checked_tile(cell)?;
        if tile.is_occupied() {
            return Err(Rejection::target(format!("{cell} is occupied")));
        }
        let Some(material) = tile.dug_material(reveal_gold) else {
            return Err(Rejection::target(format!("{cell} is already bedrock")));
        };

        let tile = &mut self.tiles[cell.index()];
        if material == ResourceKind::Gold {
            tile.has_gold = false;
            tile.revealed = true;
        }
        tile.layer = tile.layer.below();
        debug!("dug {material} from {cell}, now {:?}", tile.layer);
        Ok(material)
    }

    #[must_use]
    pub fn is_placeable(&self, cell: CellId, kind: ResourceKind) -> bool {
        self.tile(cell)
            .is_some_and(|t| t.building.is_none() && t.layer.raised_by(kind).is_some())
    }

    /// Cells where a unit of `kind` could be placed.
    #[must_use]
    pub fn placeable_cells(&self, kind: ResourceKind) -> Vec<CellId> {
        self.topology
            .cells()
            .filter(|&c| self.is_placeable(c, kind))
            .collect()
    }

    /// Place one unit of `kind`, raising the tile one layer.
    pub fn place(&mut self, cell: CellId, kind: ResourceKind) -> Result<(), Rejection> {
        self.checked_tile(cell)?;
        if !self.is_placeable(cell, kind) {
            return Err(Rejection::target(format!("cannot place {kind} on {cell}")));
        }
        let tile = &mut self.tiles[cell.index()];
        if tile.layer == Layer::Bedrock {
            // Restored stone is plain, whatever was buried before.
            tile.has_gold = false;
        }
        if let Some(raised) = tile.layer.raised_by(kind) {
            tile.layer = raised;
        }
        Ok(())
    }

    // === Gold ===

    /// Stone-topped cells whose gold status is still hidden.
    #[must_use]
    pub fn is_flippable(&self, cell: CellId) -> bool {
        self.tile(cell)
            .is_some_and(|t| t.layer == Layer::Stone && !t.revealed)
    }

    /// Reveal a stone cell. Returns whether it holds gold.
    pub fn reveal(&mut self, cell: CellId) -> Result<bool, Rejection> {
        if !self.is_flippable(cell) {
            return Err(Rejection::target(format!("{cell} has no hidden stone")));
        }
        let tile = &mut self.tiles[cell.index()];
        tile.revealed = true;
        Ok(tile.has_gold)
    }

    // === Buildings ===

    #[must_use]
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn buildings_of(&self, owner: PlayerId) -> impl Iterator<Item = &Building> {
        self.buildings.iter().filter(move |b| b.owner == owner)
    }

    #[must_use]
    pub fn building_at(&self, cell: CellId) -> Option<&Building> {
        let id = self.tile(cell)?.building?;
        self.buildings.iter().find(|b| b.id == id)
    }

    /// Check that `kind` could be built on `cell` by `owner`.
    pub fn check_building_site(
        &self,
        owner: PlayerId,
        kind: BuildingKind,
        cell: CellId,
    ) -> Result<(), Rejection> {
        let tile = self.checked_tile(cell)?;
        if tile.is_occupied() {
            return Err(Rejection::target(format!("{cell} is occupied")));
        }
        if tile.layer == Layer::Bedrock {
            return Err(Rejection::target(format!("{cell} is bedrock")));
        }
        if let BuildingKind::Mine(material) = kind {
            if tile.layer.material() != Some(material) {
                return Err(Rejection::target(format!("{kind} needs a {material} tile")));
            }
        }
        if !self.is_adjacent_to_pawn(owner, cell) {
            return Err(Rejection::target(format!("{cell} is not next to your pawn")));
        }
        let crowded = self
            .topology
            .adjacent_cells(cell)
            .iter()
            .any(|c| self.tiles[c.index()].building.is_some());
        if crowded {
            return Err(Rejection::target(format!("{cell} is next to another building")));
        }
        Ok(())
    }

    /// Put a building down. Site legality is the caller's concern.
    pub fn add_building(
        &mut self,
        owner: PlayerId,
        kind: BuildingKind,
        cell: CellId,
        health: u8,
    ) -> BuildingId {
        let id = BuildingId(self.next_building);
        self.next_building += 1;
        self.buildings.push(Building {
            id,
            owner,
            kind,
            cell,
            health,
        });
        self.tiles[cell.index()].building = Some(id);
        id
    }

    /// Apply damage to the building on `cell`; destroyed buildings leave
    /// the board.
    pub fn damage_building(&mut self, cell: CellId, damage: u8) -> Option<DamageReport> {
        let id = self.tile(cell)?.building?;
        let pos = self.buildings.iter().position(|b| b.id == id)?;

        let building = &mut self.buildings[pos];
        building.health = building.health.saturating_sub(damage);
        let destroyed = building.health == 0;
        let snapshot = building.clone();

        if destroyed {
            self.buildings.remove(pos);
            self.tiles[cell.index()].building = None;
        }
        Some(DamageReport {
            building: snapshot,
            damage,
            destroyed,
        })
    }
}
